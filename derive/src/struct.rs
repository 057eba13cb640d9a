use core::iter::Peekable;

use proc_macro::{Spacing, TokenTree, TokenStream};

use crate::{
  identifier::Identifier,
  attributes::{Attributes, parse_outer_attributes},
};

pub(crate) struct StructField {
  pub(crate) attributes: Attributes,
  pub(crate) identifier: Identifier,
  pub(crate) ty: TokenStream,
}

impl StructField {
  /// The key this field is represented with.
  pub(crate) fn key(&self) -> String {
    self.attributes.key.clone().unwrap_or_else(|| self.identifier.name())
  }

  /// Parse a `StructField`, if present.
  ///
  /// This attempts to follow the syntax from
  /// <https://doc.rust-lang.org/1.91.0/reference/items/structs.html#grammar-StructField>, but only
  /// performs partial validation.
  fn parse_optional(iter: &mut Peekable<impl Iterator<Item = TokenTree>>) -> Option<Self> {
    iter.peek()?;

    let attributes = parse_outer_attributes(iter);
    crate::skip_visibility(iter);
    let identifier = Identifier::parse(iter);

    let Some(TokenTree::Punct(colon)) = iter.next() else {
      panic!("colon not found after identifier within `StructField`")
    };
    assert_eq!(colon.as_char(), ':', "colon wasn't a colon");
    assert!(
      matches!(colon.spacing(), Spacing::Alone),
      "colon between identifier and type wasn't independent"
    );

    // The type runs until the next comma which isn't within `< ... >`
    let mut ty = vec![];
    loop {
      ty.extend(crate::take_angle_expression(iter));
      let Some(item) = iter.next() else { break };
      if matches!(&item, TokenTree::Punct(comma) if comma.as_char() == ',') {
        break;
      }
      ty.push(item);
    }
    assert!(!ty.is_empty(), "field `{}` had no type", identifier.raw());

    Some(StructField { attributes, identifier, ty: TokenStream::from_iter(ty) })
  }
}

/// Parse `StructFields`.
///
/// This follows the syntax from
/// <https://doc.rust-lang.org/1.91.0/reference/items/structs.html#grammar-StructFields>.
pub(crate) fn parse_struct_fields(
  iter: &mut Peekable<impl Iterator<Item = TokenTree>>,
) -> impl Iterator<Item = StructField> {
  core::iter::from_fn(|| StructField::parse_optional(iter))
}
