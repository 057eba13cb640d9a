use core::any::{Any, TypeId, type_name};
use std::{collections::HashMap, sync::Arc};

use crate::{Type, Value, write_float, JsonError, JsonDeserialize, JsonSerialize, Context, FieldKind};

type Construct = Arc<dyn Fn(&[f64]) -> Box<dyn Any> + Send + Sync>;
type Access = Arc<dyn Fn(&dyn Any) -> Option<Vec<f64>> + Send + Sync>;

/// How a composite type is converted.
///
/// A composite is represented as an object of numeric components, such as `{"x":1,"y":2}`.
#[derive(Clone)]
pub struct CompositeConverter {
  name: &'static str,
  components: &'static [&'static str],
  construct: Construct,
  access: Access,
}

impl core::fmt::Debug for CompositeConverter {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("CompositeConverter")
      .field("name", &self.name)
      .field("components", &self.components)
      .finish_non_exhaustive()
  }
}

impl CompositeConverter {
  /// The name the type was registered with.
  pub fn name(&self) -> &'static str {
    self.name
  }

  /// The names of the components, in the order they're constructed with.
  pub fn components(&self) -> &'static [&'static str] {
    self.components
  }

  /// Construct a value from its components.
  ///
  /// Returns `None` if `T` isn't the type this converter was registered for.
  pub fn construct<T: Any>(&self, components: &[f64]) -> Option<T> {
    (self.construct)(components).downcast::<T>().ok().map(|value| *value)
  }

  /// Access the components of a value.
  ///
  /// Returns `None` if the value isn't of the type this converter was registered for.
  pub fn access(&self, value: &dyn Any) -> Option<Vec<f64>> {
    (self.access)(value)
  }
}

/// A composite type the caller owns.
pub trait Composite: Any {
  /// The name of the type.
  const NAME: &'static str;
  /// The names of the components, in the order they're constructed with.
  const COMPONENTS: &'static [&'static str];

  /// Construct a value from its components.
  ///
  /// This is always called with as many components as there are names.
  fn from_components(components: &[f64]) -> Self;

  /// The components of this value.
  fn components(&self) -> Vec<f64>;
}

/// The composite types which may be bound and emitted.
#[derive(Clone, Default, Debug)]
pub struct ConverterRegistry {
  converters: HashMap<TypeId, CompositeConverter>,
}

impl ConverterRegistry {
  /// An empty registry.
  pub fn new() -> Self {
    Self::default()
  }

  /// Register a composite type.
  ///
  /// `construct` is called with the components in the order of `components`, and `access` is
  /// expected to return them in the same order. Registering a type again replaces its converter.
  pub fn register_composite<T: Any>(
    &mut self,
    name: &'static str,
    components: &'static [&'static str],
    construct: impl 'static + Send + Sync + Fn(&[f64]) -> T,
    access: impl 'static + Send + Sync + Fn(&T) -> Vec<f64>,
  ) {
    let construct: Construct =
      Arc::new(move |components: &[f64]| -> Box<dyn Any> { Box::new(construct(components)) });
    let access: Access =
      Arc::new(move |value: &dyn Any| value.downcast_ref::<T>().map(&access));
    tracing::trace!(name, ?components, "registered composite type");
    self
      .converters
      .insert(TypeId::of::<T>(), CompositeConverter { name, components, construct, access });
  }

  /// Register a composite type which implements [`Composite`].
  pub fn register<T: Composite>(&mut self) {
    self.register_composite(T::NAME, T::COMPONENTS, T::from_components, T::components);
  }

  /// The converter for a type, if it's been registered.
  pub fn get<T: Any>(&self) -> Option<&CompositeConverter> {
    self.converters.get(&TypeId::of::<T>())
  }

  /// If a type has been registered.
  pub fn contains<T: Any>(&self) -> bool {
    self.converters.contains_key(&TypeId::of::<T>())
  }
}

/// Register a composite type with the process-wide default context.
///
/// See [`ConverterRegistry::register_composite`].
pub fn register_composite<T: Any>(
  name: &'static str,
  components: &'static [&'static str],
  construct: impl 'static + Send + Sync + Fn(&[f64]) -> T,
  access: impl 'static + Send + Sync + Fn(&T) -> Vec<f64>,
) {
  crate::context::update_default_registry(|registry| {
    registry.register_composite(name, components, construct, access)
  });
}

fn converter<'context, T: Any>(
  context: &'context Context,
) -> Result<&'context CompositeConverter, JsonError> {
  context.registry().get::<T>().ok_or(JsonError::UnregisteredComposite(type_name::<T>()))
}

/// Bind a composite from a `Value`.
///
/// The value must be an object with every component. If any component is missing, the composite is
/// absent and `None` is returned (unless the context is strict). Members other than the components
/// are ignored.
///
/// A null composite is absent, even if its type isn't registered, as that's how an unregistered
/// composite is written.
pub fn deserialize_composite<T: Any>(
  value: &Value,
  context: &Context,
) -> Result<Option<T>, JsonError> {
  if matches!(value, Value::Null) {
    return Ok(None);
  }
  let converter = converter::<T>(context)?;
  let members = match value {
    Value::Object(members) => members,
    _ => {
      context.unexpected_shape(Type::Object, value)?;
      return Ok(None);
    }
  };

  let mut components = Vec::with_capacity(converter.components().len());
  for &component in converter.components() {
    let Some(member) = members.get(component) else {
      if context.is_strict() {
        Err(JsonError::IncompleteComposite { type_name: converter.name(), component })?;
      }
      tracing::debug!(type_name = converter.name(), component, "composite is missing a component");
      return Ok(None);
    };
    components.push(f64::deserialize(member, context)?);
  }
  Ok(converter.construct(&components))
}

/// Write a composite as an object of its components.
///
/// If the type isn't registered, the composite is written as an absent value.
pub fn serialize_composite<T: Any>(value: &T, context: &Context, out: &mut String) {
  let Some((converter, components)) = context
    .registry()
    .get::<T>()
    .and_then(|converter| Some((converter, converter.access(value)?)))
  else {
    tracing::debug!(type_name = type_name::<T>(), "emitting an unregistered composite type");
    context.write_null(out);
    return;
  };

  out.push('{');
  for (i, (name, component)) in converter.components().iter().zip(components).enumerate() {
    if i != 0 {
      out.push(',');
    }
    crate::write_string(out, name);
    out.push(':');
    write_float(out, component);
  }
  out.push('}');
}

/// A composite, bound and emitted with the context's `ConverterRegistry`.
///
/// Fields may be marked as composites directly. This allows composites anywhere a type is bound, such
/// as the elements of a sequence (`Vec<Registered<T>>`) or an optional composite. An absent
/// composite is read as `T::default()`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Debug)]
pub struct Registered<T>(pub T);

impl<T> From<T> for Registered<T> {
  fn from(value: T) -> Self {
    Registered(value)
  }
}

impl<T> core::ops::Deref for Registered<T> {
  type Target = T;
  fn deref(&self) -> &T {
    &self.0
  }
}

impl<T> core::ops::DerefMut for Registered<T> {
  fn deref_mut(&mut self) -> &mut T {
    &mut self.0
  }
}

impl<T: Any + Default> JsonDeserialize for Registered<T> {
  fn kind() -> FieldKind {
    FieldKind::Composite { type_name: type_name::<T>() }
  }
  fn deserialize(value: &Value, context: &Context) -> Result<Self, JsonError> {
    Ok(Registered(deserialize_composite(value, context)?.unwrap_or_default()))
  }
}

impl<T: Any> JsonSerialize for Registered<T> {
  fn serialize(&self, context: &Context, out: &mut String) {
    serialize_composite(&self.0, context, out);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{Mode, NullStyle, parse};

  #[derive(Clone, Copy, PartialEq, Default, Debug)]
  struct Vector2 {
    x: f32,
    y: f32,
  }

  #[allow(clippy::cast_possible_truncation)]
  fn registry() -> ConverterRegistry {
    let mut registry = ConverterRegistry::new();
    registry.register_composite(
      "Vector2",
      &["x", "y"],
      |components| Vector2 { x: components[0] as f32, y: components[1] as f32 },
      |vector: &Vector2| vec![f64::from(vector.x), f64::from(vector.y)],
    );
    registry
  }

  #[test]
  fn bind() {
    let context = Context::new().with_registry(registry());
    assert_eq!(
      deserialize_composite::<Vector2>(&parse(r#"{"y":2.5,"x":1,"w":0}"#), &context),
      Ok(Some(Vector2 { x: 1.0, y: 2.5 }))
    );
    assert_eq!(deserialize_composite::<Vector2>(&parse(r#"{"x":1}"#), &context), Ok(None));
    assert_eq!(deserialize_composite::<Vector2>(&parse("[1,2]"), &context), Ok(None));

    let strict = context.with_mode(Mode::Strict);
    assert_eq!(
      deserialize_composite::<Vector2>(&parse(r#"{"x":1}"#), &strict),
      Err(JsonError::IncompleteComposite { type_name: "Vector2", component: "y" })
    );
  }

  #[test]
  fn unregistered() {
    assert!(matches!(
      deserialize_composite::<Vector2>(&parse(r#"{"x":1,"y":2}"#), &Context::new()),
      Err(JsonError::UnregisteredComposite(_))
    ));
    let mut out = String::new();
    serialize_composite(&Vector2::default(), &Context::new(), &mut out);
    assert_eq!(out, r#""null""#);
  }

  #[test]
  fn unregistered_null() {
    // What's written for an unregistered composite is read back as absent
    assert_eq!(deserialize_composite::<Vector2>(&Value::Null, &Context::new()), Ok(None));
    let literal = Context::new().with_null_style(NullStyle::Literal);
    let mut out = String::new();
    serialize_composite(&Vector2::default(), &literal, &mut out);
    assert_eq!(out, "null");
    assert_eq!(deserialize_composite::<Vector2>(&parse(&out), &literal), Ok(None));
    assert_eq!(
      deserialize_composite::<Vector2>(&Value::Null, &literal.with_mode(Mode::Strict)),
      Ok(None)
    );
  }

  #[test]
  fn registered() {
    let context = Context::new().with_registry(registry());
    let vectors =
      crate::deserialize_with::<Vec<Registered<Vector2>>>(r#"[{"x":1,"y":2},null,{"x":3}]"#, &context)
        .unwrap();
    assert_eq!(
      vectors,
      vec![Registered(Vector2 { x: 1.0, y: 2.0 }), Registered::default(), Registered::default()]
    );
    assert_eq!(
      crate::serialize_with(&vectors[.. 1], &context),
      r#"[{"x":1.0,"y":2.0}]"#
    );
    assert_eq!(
      Registered::<Vector2>::kind(),
      FieldKind::Composite { type_name: type_name::<Vector2>() }
    );
  }

  #[test]
  fn emit() {
    let context = Context::new().with_registry(registry());
    let mut out = String::new();
    serialize_composite(&Vector2 { x: 1.0, y: -0.5 }, &context, &mut out);
    assert_eq!(out, r#"{"x":1.0,"y":-0.5}"#);
  }

  #[test]
  fn owned_composites() {
    #[derive(PartialEq, Debug)]
    struct Rgba(u8, u8, u8, u8);
    impl Composite for Rgba {
      const NAME: &'static str = "Rgba";
      const COMPONENTS: &'static [&'static str] = &["r", "g", "b", "a"];
      #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
      fn from_components(components: &[f64]) -> Self {
        let channel = |i: usize| components[i].clamp(0.0, 255.0) as u8;
        Rgba(channel(0), channel(1), channel(2), channel(3))
      }
      fn components(&self) -> Vec<f64> {
        vec![self.0.into(), self.1.into(), self.2.into(), self.3.into()]
      }
    }

    let mut context = Context::new();
    context.registry_mut().register::<Rgba>();
    assert!(context.registry().contains::<Rgba>());
    assert_eq!(
      deserialize_composite::<Rgba>(&parse(r#"{"r":255,"g":128,"b":0,"a":300}"#), &context),
      Ok(Some(Rgba(255, 128, 0, 255)))
    );
  }
}
