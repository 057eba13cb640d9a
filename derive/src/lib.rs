#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]
#![deny(missing_docs)]

use core::{borrow::Borrow, str::FromStr, iter::Peekable};

extern crate proc_macro;
use proc_macro::{Delimiter, Spacing, Punct, Group, TokenTree, TokenStream};

mod identifier;
mod attributes;
mod r#struct;
mod variant;

// `<` will not open a group, so we use this to take all items within a `< ... >` expression.
fn take_angle_expression(
  iter: &mut Peekable<impl Iterator<Item: Borrow<TokenTree>>>,
) -> TokenStream {
  {
    let Some(peeked) = iter.peek() else { return TokenStream::default() };
    let TokenTree::Punct(punct) = peeked.borrow() else { return TokenStream::default() };
    if punct.as_char() != '<' {
      return TokenStream::default();
    }
  }

  let mut result = vec![];
  let mut count = 0;
  loop {
    let item = iter.next().expect("`TokenTree` unexpectedly terminated when taking `< ... >`");
    result.push(item.borrow().clone());
    if let TokenTree::Punct(punct) = item.borrow() {
      let punct = punct.as_char();
      if punct == '<' {
        count += 1;
      }
      if punct == '>' {
        count -= 1;
      }
      if count == 0 {
        break;
      }
    }
  }
  TokenStream::from_iter(result)
}

// Advance the iterator past the next `,` on this depth, if there is one.
fn skip_comma_delimited(iter: &mut Peekable<impl Iterator<Item: Borrow<TokenTree>>>) {
  loop {
    take_angle_expression(iter);
    let Some(item) = iter.next() else { return };
    if let TokenTree::Punct(punct) = item.borrow() {
      if punct.as_char() == ',' {
        return;
      }
    }
  }
}

// Skip a `Visibility`, if present (`pub`, optionally followed by its scope within parentheses).
fn skip_visibility(iter: &mut Peekable<impl Iterator<Item = TokenTree>>) {
  if !matches!(iter.peek(), Some(TokenTree::Ident(ident)) if ident.to_string() == "pub") {
    return;
  }
  let _pub = iter.next();
  if matches!(iter.peek(), Some(TokenTree::Group(scope)) if scope.delimiter() == Delimiter::Parenthesis)
  {
    let _scope = iter.next();
  }
}

struct Item {
  generic_bounds: String,
  generics: String,
  name: String,
  // `None` for a unit `struct`
  body: Option<Group>,
}

// This is somewhat comparable to `syn::Generics`, especially its `split_for_impl` method.
fn parse_item(item: TokenStream, keyword: &str, derive: &str) -> Item {
  let mut item = item.into_iter().peekable();

  let _ = attributes::parse_outer_attributes(&mut item);
  skip_visibility(&mut item);

  match item.next() {
    Some(TokenTree::Ident(ident)) if ident.to_string() == keyword => {}
    _ => panic!("`{derive}` wasn't applied to a `{keyword}`"),
  }
  let name = match item.next() {
    Some(TokenTree::Ident(ident)) => ident.to_string(),
    _ => panic!("`{derive}` wasn't applied to a `{keyword}` with a name"),
  };

  let generic_bounds_tree = take_angle_expression(&mut item);

  let mut generics_tree = vec![];
  {
    let mut iter = generic_bounds_tree.clone().into_iter().peekable();
    while let Some(component) = iter.next() {
      // Take until the next colon, used to mark trait bounds
      if let TokenTree::Punct(punct) = &component {
        if punct.as_char() == ':' {
          // Skip the actual bounds
          skip_comma_delimited(&mut iter);
          // Add our own comma delimiter and move to the next item
          generics_tree.push(TokenTree::Punct(Punct::new(',', Spacing::Alone)));
          continue;
        }
      }
      // Push this component as it isn't part of the bounds
      generics_tree.push(component);
    }
  }
  // Ensure this is terminated, which it won't be if the last item had bounds yet didn't have a
  // trailing comma
  if let Some(last) = generics_tree.last() {
    match last {
      TokenTree::Punct(punct) if punct.as_char() == '>' => {}
      _ => generics_tree.push(TokenTree::Punct(Punct::new('>', Spacing::Alone))),
    }
  }

  let generic_bounds = generic_bounds_tree.to_string();
  let generics = TokenStream::from_iter(generics_tree).to_string();

  let body = match item.next() {
    Some(TokenTree::Group(body)) => {
      if body.delimiter() != Delimiter::Brace {
        panic!("`{derive}` applied to a `{keyword}` without named fields");
      }
      Some(body)
    }
    Some(TokenTree::Punct(semicolon)) if semicolon.as_char() == ';' => None,
    Some(TokenTree::Ident(ident)) if ident.to_string() == "where" => {
      panic!("`{derive}` doesn't support `where` clauses, please declare bounds inline")
    }
    _ => panic!("`{keyword}`'s name was not followed by its body"),
  };

  Item { generic_bounds, generics, name, body }
}

/// Derive binding and emission for a `struct`.
///
/// This implements `JsonDeserialize`, `JsonSerialize`, and `JsonStructure`. It _requires_ the
/// `struct` derived for implement `Default`. Fields which aren't present in the serialization will
/// be left to their `Default` initialization. If you wish to detect if a field was omitted, please
/// wrap it in `Option`.
///
/// Fields may be (de)serialized with a distinct key using the `key` attribute, accepting a string
/// literal for the key (`key("key")`). Fields may be omitted from (de)serialization with the
/// `skip` attribute. Fields whose type is registered with the context's `ConverterRegistry` are
/// marked with the `composite` attribute. Composites within a field's type, such as the elements of
/// a sequence, are instead wrapped in `Registered`.
///
/// As a procedural macro, this will panic causing a compile-time error on any unexpected input.
#[proc_macro_derive(JsonStructure, attributes(key, skip, composite))]
pub fn derive_json_structure(object: TokenStream) -> TokenStream {
  let Item { generic_bounds, generics, name, body } =
    parse_item(object, "struct", "JsonStructure");

  let fields = match body {
    Some(body) => {
      r#struct::parse_struct_fields(&mut body.stream().into_iter().peekable()).collect::<Vec<_>>()
    }
    None => vec![],
  };

  let mut keys = vec![];
  let mut descriptors = String::new();
  let mut fields_binding = String::new();
  let mut fields_emission = String::new();
  for field in &fields {
    if field.attributes.skip {
      continue;
    }
    let key = field.key();
    assert!(!keys.contains(&key), "multiple fields of `{name}` have the key `{key}`");

    let field_name = field.identifier.raw();
    let ty = &field.ty;
    if field.attributes.composite {
      descriptors.push_str(&format!(
        r#"
        json_bind_traits::FieldDescriptor::new(
          "{key}",
          json_bind_traits::FieldKind::Composite {{ type_name: core::any::type_name::<{ty}>() }},
        ),
        "#
      ));
      fields_binding.push_str(&format!(
        r#"
        fields.bind_composite("{key}", &mut self.{field_name})?;
        "#
      ));
      fields_emission.push_str(&format!(
        r#"
        fields.composite("{key}", &self.{field_name});
        "#
      ));
    } else {
      descriptors.push_str(&format!(
        r#"
        json_bind_traits::FieldDescriptor::new(
          "{key}",
          <{ty} as json_bind_traits::JsonDeserialize>::kind(),
        ),
        "#
      ));
      fields_binding.push_str(&format!(
        r#"
        fields.bind("{key}", &mut self.{field_name})?;
        "#
      ));
      fields_emission.push_str(&format!(
        r#"
        fields.field("{key}", &self.{field_name});
        "#
      ));
    }
    keys.push(key);
  }

  TokenStream::from_str(&format!(
    r#"
    impl{generic_bounds} json_bind_traits::JsonDeserialize for {name}{generics}
      where Self: core::default::Default {{
      fn kind() -> json_bind_traits::FieldKind {{
        json_bind_traits::FieldKind::Object {{ type_name: core::any::type_name::<Self>() }}
      }}
      fn deserialize(
        value: &json_bind_traits::Value,
        context: &json_bind_traits::Context,
      ) -> Result<Self, json_bind_traits::JsonError> {{
        json_bind_traits::bind(value, context)
      }}
    }}

    impl{generic_bounds} json_bind_traits::JsonSerialize for {name}{generics}
      where Self: core::default::Default {{
      fn serialize(&self, context: &json_bind_traits::Context, out: &mut String) {{
        json_bind_traits::emit_structure(self, context, out)
      }}
    }}

    impl{generic_bounds} json_bind_traits::JsonStructure for {name}{generics}
      where Self: core::default::Default {{
      fn schema() -> json_bind_traits::Schema {{
        json_bind_traits::Schema::new(core::any::type_name::<Self>(), vec![{descriptors}])
      }}

      #[allow(unused_variables)]
      fn bind_fields(
        &mut self,
        fields: &json_bind_traits::Fields<'_>,
      ) -> Result<(), json_bind_traits::JsonError> {{
        {fields_binding}
        Ok(())
      }}

      #[allow(unused_variables)]
      fn emit_fields(&self, fields: &mut json_bind_traits::FieldWriter<'_>) {{
        {fields_emission}
      }}
    }}
    "#
  ))
  .expect("typo in implementation of `JsonStructure`")
}

/// Derive binding and emission for an `enum` of unit variants.
///
/// This implements `JsonEnum`, `JsonDeserialize`, and `JsonSerialize`. Variants are represented
/// as their names, which may be replaced using the `key` attribute (`key("name")`). A name which
/// isn't one of the variants is always an error when binding.
///
/// As a procedural macro, this will panic causing a compile-time error on any unexpected input.
#[proc_macro_derive(JsonEnum, attributes(key))]
pub fn derive_json_enum(object: TokenStream) -> TokenStream {
  let Item { generic_bounds, name, body, .. } = parse_item(object, "enum", "JsonEnum");
  assert!(generic_bounds.is_empty(), "`JsonEnum` applied to an `enum` with generics");
  let Some(body) = body else { panic!("`enum`'s name was not followed by its variants") };

  let variants = variant::parse_unit_variants(&mut body.stream().into_iter().peekable());

  let mut names = String::new();
  let mut from_name = String::new();
  let mut to_name = String::new();
  for (i, variant) in variants.iter().enumerate() {
    let key = &variant.key;
    assert!(
      !variants[.. i].iter().any(|other| &other.key == key),
      "multiple variants of `{name}` have the name `{key}`"
    );
    let variant_name = variant.identifier.raw();
    names.push_str(&format!(r#""{key}","#));
    from_name.push_str(&format!(r#""{key}" => Some(Self::{variant_name}),"#));
    to_name.push_str(&format!(r#"Self::{variant_name} => "{key}","#));
  }

  TokenStream::from_str(&format!(
    r#"
    impl json_bind_traits::JsonEnum for {name} {{
      const VARIANTS: &'static [&'static str] = &[{names}];
      fn from_name(name: &str) -> Option<Self> {{
        match name {{
          {from_name}
          _ => None,
        }}
      }}
      fn name(&self) -> &'static str {{
        match *self {{
          {to_name}
        }}
      }}
    }}

    impl json_bind_traits::JsonDeserialize for {name} {{
      fn kind() -> json_bind_traits::FieldKind {{
        json_bind_traits::FieldKind::Enumerated {{
          variants: <Self as json_bind_traits::JsonEnum>::VARIANTS,
        }}
      }}
      fn deserialize(
        value: &json_bind_traits::Value,
        context: &json_bind_traits::Context,
      ) -> Result<Self, json_bind_traits::JsonError> {{
        json_bind_traits::deserialize_enum(value, context)
      }}
    }}

    impl json_bind_traits::JsonSerialize for {name} {{
      fn serialize(&self, _context: &json_bind_traits::Context, out: &mut String) {{
        json_bind_traits::serialize_enum(self, out)
      }}
    }}
    "#
  ))
  .expect("typo in implementation of `JsonEnum`")
}
