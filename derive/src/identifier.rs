use core::iter::Peekable;

use proc_macro::{Ident, TokenTree};

pub(crate) struct Identifier {
  ident: Ident,
}

impl Identifier {
  /// Parse an `IDENTIFIER`.
  ///
  /// This doesn't validate the identifier beyond it being a `TokenTree::Ident`, which the compiler
  /// has already done.
  pub(crate) fn parse(iter: &mut Peekable<impl Iterator<Item = TokenTree>>) -> Self {
    let Some(TokenTree::Ident(ident)) = iter.next() else { panic!("invalid `IDENTIFIER`") };
    Self { ident }
  }

  /// The identifier as written, including any `r#` prefix.
  pub(crate) fn raw(&self) -> String {
    self.ident.to_string()
  }

  /// The identifier without any `r#` prefix, as used for its key.
  pub(crate) fn name(&self) -> String {
    let raw = self.raw();
    match raw.strip_prefix("r#") {
      Some(name) => name.to_string(),
      None => raw,
    }
  }
}
