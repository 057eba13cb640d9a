use std::collections::BTreeMap;

use time::macros::datetime;

use json_bind_traits::*;
use json_bind_derive::{JsonStructure, JsonEnum};

#[derive(Clone, Copy, PartialEq, Eq, Default, Debug, JsonEnum)]
enum Color {
  #[default]
  Red,
  Green,
  Blue,
}

// A type owned by another crate, so it's bound via the registry
#[derive(Clone, Copy, PartialEq, Default, Debug)]
struct Vector3 {
  x: f32,
  y: f32,
  z: f32,
}

#[allow(clippy::cast_possible_truncation)]
fn registry() -> ConverterRegistry {
  let mut registry = ConverterRegistry::new();
  registry.register_composite(
    "Vector3",
    &["x", "y", "z"],
    |c| Vector3 { x: c[0] as f32, y: c[1] as f32, z: c[2] as f32 },
    |v: &Vector3| vec![v.x.into(), v.y.into(), v.z.into()],
  );
  registry
}

fn context() -> Context {
  Context::new().with_registry(registry()).with_null_style(NullStyle::Literal)
}

#[derive(Clone, PartialEq, Default, Debug, JsonStructure)]
struct Inventory {
  items: Vec<String>,
  counts: [u8; 3],
}

#[derive(Clone, PartialEq, Default, Debug, JsonStructure)]
pub(crate) struct Player {
  pub name: String,
  #[key("hp")]
  health: i32,
  speed: f64,
  alive: bool,
  color: Color,
  #[composite]
  position: Vector3,
  pub(crate) inventory: Inventory,
  tags: Vec<Vec<String>>,
  nickname: Option<String>,
  joined: DateTime,
  #[skip]
  session: u64,
}

fn player() -> Player {
  Player {
    name: "Ada".to_string(),
    health: 12,
    speed: 1.5,
    alive: true,
    color: Color::Green,
    position: Vector3 { x: 1.0, y: 2.0, z: 3.0 },
    inventory: Inventory { items: vec!["sword".to_string()], counts: [1, 2, 3] },
    tags: vec![vec!["a".to_string(), "b".to_string()], vec!["c".to_string()]],
    nickname: None,
    joined: DateTime(datetime!(2021-06-30 23:59:58)),
    session: 7,
  }
}

const PLAYER: &str = concat!(
  r#"{"name":"Ada","hp":12,"speed":1.5,"alive":true,"color":"Green","#,
  r#""position":{"x":1.0,"y":2.0,"z":3.0},"inventory":{"items":["sword"],"counts":[1,2,3]},"#,
  r#""tags":[["a","b"],["c"]],"nickname":null,"joined":"2021-06-30 23:59:58"}"#,
);

#[test]
fn round_trip() {
  let context = context();
  let json = serialize_with(&player(), &context);
  assert_eq!(json, PLAYER);
  assert!(!json.contains("session"), "`session` was serialized despite `skip` attribute");

  let deserialized = deserialize_with::<Player>(&json, &context).unwrap();
  assert_eq!(deserialized, Player { session: 0, ..player() });
  assert_eq!(serialize_with(&deserialized, &context), json);

  // The same, from a `Value`
  let value = parse(PLAYER);
  assert_eq!(bind::<Player>(&value, &context).unwrap(), deserialized);
}

#[test]
fn empty_object() {
  assert_eq!(parse("{}"), Value::Object(Map::new()));
  assert_eq!(deserialize_with::<Player>("{}", &context()).unwrap(), Player::default());
  assert_eq!(deserialize_with::<Player>("", &context()).unwrap(), Player::default());
  assert_eq!(deserialize_with::<Player>("[1, 2]", &context()).unwrap(), Player::default());
}

#[test]
fn partial_binding() {
  let player =
    deserialize_with::<Player>(r#"{"name":"Bo","unknown":{"a":[1]},"hp":3}"#, &context()).unwrap();
  assert_eq!(player, Player { name: "Bo".to_string(), health: 3, ..Player::default() });
}

#[test]
fn composites() {
  let player =
    deserialize_with::<Player>(r#"{"position":{"x":1,"y":2,"z":3}}"#, &context()).unwrap();
  assert_eq!(player.position, Vector3 { x: 1.0, y: 2.0, z: 3.0 });

  // A missing component makes the composite absent, leaving the field as its default
  let player = deserialize_with::<Player>(r#"{"position":{"x":1,"y":2}}"#, &context()).unwrap();
  assert_eq!(player.position, Vector3::default());

  let strict = context().with_mode(Mode::Strict);
  assert_eq!(
    deserialize_with::<Player>(r#"{"position":{"x":1,"y":2}}"#, &strict),
    Err(JsonError::IncompleteComposite { type_name: "Vector3", component: "z" })
  );

  // Unregistered composites are an error, if present
  assert!(matches!(
    deserialize_with::<Player>(r#"{"position":{"x":1,"y":2,"z":3}}"#, &Context::new()),
    Err(JsonError::UnregisteredComposite(_))
  ));
  assert!(deserialize_with::<Player>(r#"{"hp":1}"#, &Context::new()).is_ok());

  // What's written for an unregistered composite is read back
  let unregistered = Context::new().with_null_style(NullStyle::Literal);
  let json = serialize_with(&self::player(), &unregistered);
  assert!(json.contains(r#""position":null"#));
  let player = deserialize_with::<Player>(&json, &unregistered).unwrap();
  assert_eq!(player.position, Vector3::default());
  assert_eq!(player.name, "Ada");
}

#[derive(Clone, PartialEq, Default, Debug, JsonStructure)]
struct Path {
  points: Vec<Registered<Vector3>>,
  anchor: Option<Registered<Vector3>>,
  corners: [Registered<Vector3>; 2],
}

#[test]
fn nested_composites() {
  let path = deserialize_with::<Path>(
    r#"{"points":[{"x":1,"y":2,"z":3}],"anchor":{"x":0,"y":0,"z":-1},"corners":[null,{"x":4,"y":5,"z":6}]}"#,
    &context(),
  )
  .unwrap();
  assert_eq!(path.points, vec![Registered(Vector3 { x: 1.0, y: 2.0, z: 3.0 })]);
  assert_eq!(path.points[0].y, 2.0);
  assert_eq!(path.anchor, Some(Registered(Vector3 { x: 0.0, y: 0.0, z: -1.0 })));
  assert_eq!(path.corners, [Registered::default(), Registered(Vector3 { x: 4.0, y: 5.0, z: 6.0 })]);

  assert_eq!(
    serialize_with(&Path { anchor: None, ..path.clone() }, &context()),
    concat!(
      r#"{"points":[{"x":1.0,"y":2.0,"z":3.0}],"anchor":null,"#,
      r#""corners":[{"x":0.0,"y":0.0,"z":0.0},{"x":4.0,"y":5.0,"z":6.0}]}"#,
    )
  );

  assert_eq!(
    *describe::<Path>().field("points").unwrap().kind(),
    FieldKind::Sequence {
      element: Box::new(FieldKind::Composite { type_name: core::any::type_name::<Vector3>() })
    }
  );

  assert!(matches!(
    deserialize_with::<Path>(r#"{"points":[{"x":1,"y":2,"z":3}]}"#, &Context::new()),
    Err(JsonError::UnregisteredComposite(_))
  ));
}

#[test]
fn unknown_variant() {
  let result = deserialize_with::<Player>(r#"{"color":"Purple"}"#, &context());
  assert!(matches!(
    result,
    Err(JsonError::UnknownVariant { type_name, name }) if type_name.ends_with("Color") && name == "Purple"
  ));
  let player = deserialize_with::<Player>(r#"{"color":"Blue"}"#, &context()).unwrap();
  assert_eq!(player.color, Color::Blue);
}

#[test]
fn nested_sequences() {
  let player = deserialize_with::<Player>(r#"{"tags":[["a","b"],["c"]]}"#, &context()).unwrap();
  assert_eq!(player.tags.len(), 2);
  assert_eq!(player.tags[0], ["a", "b"]);
  assert_eq!(player.tags[1], ["c"]);
}

#[test]
fn strict_mode() {
  let strict = context().with_mode(Mode::Strict);

  let json = r#"{"hp":"many","alive":"yes"}"#;
  let player = deserialize_with::<Player>(json, &context()).unwrap();
  assert_eq!((player.health, player.alive), (0, false));
  assert_eq!(
    deserialize_with::<Player>(json, &strict),
    Err(JsonError::InvalidLeaf { type_name: "i32", text: "many".to_string() })
  );

  assert_eq!(deserialize_with::<Player>(r#"{"hp":1"#, &context()).unwrap(), Player::default());
  assert!(matches!(
    deserialize_with::<Player>(r#"{"hp":1"#, &strict),
    Err(JsonError::Parse(ParseError { kind: ParseErrorKind::UnexpectedEnd, .. }))
  ));
  assert_eq!(
    deserialize_with::<Player>("[]", &strict),
    Err(JsonError::UnexpectedShape { expected: Type::Object, found: Type::Array })
  );

  assert!(deserialize_with::<Player>(PLAYER, &strict).is_ok());
}

#[test]
fn quoted_null() {
  let context = Context::new().with_registry(registry());
  let json = serialize_with(&Player::default(), &context);
  assert!(json.contains(r#""nickname":"null""#));
  // The quoted form binds back as text
  let player = deserialize_with::<Player>(&json, &context).unwrap();
  assert_eq!(player.nickname.as_deref(), Some("null"));
}

#[test]
fn schema() {
  let schema = describe::<Player>();
  assert!(schema.type_name().ends_with("Player"));
  assert_eq!(
    schema.fields().iter().map(FieldDescriptor::name).collect::<Vec<_>>(),
    [
      "name",
      "hp",
      "speed",
      "alive",
      "color",
      "position",
      "inventory",
      "tags",
      "nickname",
      "joined"
    ]
  );
  let kind = |name| schema.field(name).unwrap().kind().clone();
  assert_eq!(kind("hp"), FieldKind::Integer);
  assert_eq!(kind("speed"), FieldKind::Float);
  assert_eq!(kind("color"), FieldKind::Enumerated { variants: &["Red", "Green", "Blue"] });
  assert_eq!(
    kind("position"),
    FieldKind::Composite { type_name: core::any::type_name::<Vector3>() }
  );
  assert_eq!(
    kind("inventory"),
    FieldKind::Object { type_name: core::any::type_name::<Inventory>() }
  );
  assert_eq!(
    kind("tags"),
    FieldKind::Sequence {
      element: Box::new(FieldKind::Sequence { element: Box::new(FieldKind::Text) })
    }
  );
  assert_eq!(kind("nickname"), FieldKind::Optional { inner: Box::new(FieldKind::Text) });
  assert_eq!(kind("joined"), FieldKind::Temporal);
  assert!(schema.field("session").is_none());

  assert!(core::ptr::eq(describe::<Player>(), schema));
}

#[derive(Clone, PartialEq, Default, Debug, JsonStructure)]
struct Wrapper<T: 'static + Default + JsonDeserialize + JsonSerialize> {
  value: T,
  values: Vec<T>,
}

#[test]
fn generics() {
  let wrapper = Wrapper {
    value: Inventory { items: vec![], counts: [4, 5, 6] },
    values: vec![Inventory::default()],
  };
  let json = serialize_with(&wrapper, &context());
  assert_eq!(
    json,
    r#"{"value":{"items":[],"counts":[4,5,6]},"values":[{"items":[],"counts":[0,0,0]}]}"#
  );
  assert_eq!(deserialize_with::<Wrapper<Inventory>>(&json, &context()).unwrap(), wrapper);

  // Racing first accesses publish a single schema
  let schemas = std::thread::scope(|scope| {
    let handles =
      (0 .. 8).map(|_| scope.spawn(describe::<Wrapper<u8>>)).collect::<Vec<_>>();
    handles.into_iter().map(|handle| handle.join().unwrap()).collect::<Vec<_>>()
  });
  assert!(schemas.iter().all(|schema| core::ptr::eq(*schema, schemas[0])));
}

#[derive(PartialEq, Default, Debug, JsonStructure)]
struct Record {
  r#type: String,
  scores: BTreeMap<String, i32>,
  extra: Value,
  flags: Option<Vec<bool>>,
}

#[test]
fn other_fields() {
  let record = deserialize_with::<Record>(
    r#"{"type":"a","scores":{"b":1},"extra":{"c":[null]},"flags":null}"#,
    &context(),
  )
  .unwrap();
  assert_eq!(record.r#type, "a");
  // Maps are never bound
  assert!(record.scores.is_empty());
  assert_eq!(record.extra, parse(r#"{"c":[null]}"#));
  assert_eq!(record.flags, None);

  let record = Record {
    r#type: "b".to_string(),
    scores: BTreeMap::from([("x".to_string(), 1), ("y".to_string(), -2)]),
    extra: Value::Null,
    flags: Some(vec![true]),
  };
  let json = serialize_with(&record, &context());
  assert_eq!(json, r#"{"type":"b","scores":{"x":1,"y":-2},"extra":null,"flags":[true]}"#);
  assert!(parse_strict(&json).is_ok());
}

#[derive(Default, JsonStructure)]
struct Marker;

#[test]
fn unit_structure() {
  assert_eq!(serialize_with(&Marker, &context()), "{}");
  assert!(describe::<Marker>().fields().is_empty());
  assert!(deserialize_with::<Marker>(r#"{"a":1}"#, &context()).is_ok());
}

#[derive(Clone, Copy, PartialEq, Debug, JsonEnum)]
enum Direction {
  #[key("up")]
  Up,
  #[key("down")]
  Down = 5,
}

#[test]
fn renamed_variants() {
  assert_eq!(Direction::VARIANTS, ["up", "down"]);
  assert_eq!(deserialize_with::<Vec<Direction>>(r#"["down","up"]"#, &context()), Ok(vec![
    Direction::Down,
    Direction::Up
  ]));
  assert!(deserialize_with::<Vec<Direction>>(r#"["Up"]"#, &context()).is_err());
  assert_eq!(serialize_with(&[Direction::Up], &context()), r#"["up"]"#);
}
