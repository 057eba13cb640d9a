use core::iter::Peekable;

use proc_macro::{Delimiter, TokenTree};

/// The attributes recognized on a field or variant.
#[derive(Default)]
pub(crate) struct Attributes {
  pub(crate) key: Option<String>,
  pub(crate) skip: bool,
  pub(crate) composite: bool,
}

/// Parse the argument of the `key` attribute, a parenthesized string literal.
///
/// The literal is returned without its quotes, yet with any escape sequences intact, so it may be
/// placed back within quotes.
fn parse_key(arguments: Option<TokenTree>) -> String {
  let Some(TokenTree::Group(group)) = arguments else {
    panic!("`key` attribute not followed with `(...)`")
  };
  assert_eq!(
    group.delimiter(),
    Delimiter::Parenthesis,
    "`key` attribute with a non-parentheses group"
  );
  let mut arguments = group.stream().into_iter();
  let Some(TokenTree::Literal(literal)) = arguments.next() else {
    panic!("`key` attribute without a literal argument")
  };
  assert!(arguments.next().is_none(), "`key` attribute with multiple tokens within parentheses");

  let literal = literal.to_string();
  let Some(key) = literal.strip_prefix('"').and_then(|literal| literal.strip_suffix('"')) else {
    panic!("`key` attribute's argument wasn't a string literal")
  };
  key.to_string()
}

/// Parse the outer attributes (`#[...]`) preceding a field or variant.
///
/// Attributes other than `key`, `skip`, and `composite` are ignored.
pub(crate) fn parse_outer_attributes(
  iter: &mut Peekable<impl Iterator<Item = TokenTree>>,
) -> Attributes {
  let mut attributes = Attributes::default();
  while matches!(iter.peek(), Some(TokenTree::Punct(pound)) if pound.as_char() == '#') {
    let _pound = iter.next().expect("peeked attribute couldn't be consumed");
    let Some(TokenTree::Group(group)) = iter.next() else {
      panic!("`#` not followed by a `TokenTree::Group` for its `[ ... ]`")
    };
    assert_eq!(group.delimiter(), Delimiter::Bracket, "attribute had unexpected delimiter");

    let mut attribute = group.stream().into_iter();
    let Some(TokenTree::Ident(name)) = attribute.next() else { continue };
    match name.to_string().as_str() {
      "key" => attributes.key = Some(parse_key(attribute.next())),
      "skip" => attributes.skip = true,
      "composite" => attributes.composite = true,
      _ => {}
    }
  }
  attributes
}
