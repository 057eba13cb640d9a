use core::iter::Peekable;

use proc_macro::TokenTree;

use crate::{identifier::Identifier, attributes::parse_outer_attributes};

pub(crate) struct Variant {
  pub(crate) identifier: Identifier,
  pub(crate) key: String,
}

/// Parse the unit variants of an `enum`.
///
/// Explicit discriminants are allowed, and skipped.
pub(crate) fn parse_unit_variants(
  iter: &mut Peekable<impl Iterator<Item = TokenTree>>,
) -> Vec<Variant> {
  let mut variants = vec![];
  while iter.peek().is_some() {
    let attributes = parse_outer_attributes(iter);
    crate::skip_visibility(iter);
    let identifier = Identifier::parse(iter);
    if matches!(iter.peek(), Some(TokenTree::Group(_))) {
      panic!("`JsonEnum` applied to an `enum` whose variant `{}` has fields", identifier.raw());
    }
    crate::skip_comma_delimited(iter);

    let key = attributes.key.unwrap_or_else(|| identifier.name());
    variants.push(Variant { identifier, key });
  }
  variants
}
