//! Literal parsing helpers for derive attributes.

use syn::meta::ParseNestedMeta;
use syn::{Lit, LitStr};

/// Parses a literal from a field attribute using `extractor`.
///
/// `expected` names the accepted literal kinds in the error message.
fn parse_lit<T, F>(meta: &ParseNestedMeta, key: &str, expected: &str, extractor: F) -> syn::Result<T>
where
    F: FnOnce(Lit) -> Option<T>,
{
    let literal = meta.value()?.parse::<Lit>()?;
    let span = literal.span();
    extractor(literal).ok_or_else(|| syn::Error::new(span, format!("{key} must be a {expected}")))
}

/// Parses a string literal from a field attribute.
///
/// # Examples
///
/// ```rust,ignore
/// use syn::Attribute;
/// let attr: Attribute = syn::parse_quote!(#[flag(name = "tag")]);
/// attr.parse_nested_meta(|meta| {
///     let s = lit_str(&meta, "name")?;
///     assert_eq!(s.value(), "tag");
///     Ok(())
/// }).unwrap();
/// ```
pub(crate) fn lit_str(meta: &ParseNestedMeta, key: &str) -> syn::Result<LitStr> {
    parse_lit(meta, key, "string", |lit| match lit {
        Lit::Str(s) => Some(s),
        _ => None,
    })
}

/// Parses a string or boolean literal, rendering booleans as `"true"` or
/// `"false"`.
pub(crate) fn lit_text_or_bool(meta: &ParseNestedMeta, key: &str) -> syn::Result<String> {
    parse_lit(meta, key, "string or bool", |lit| match lit {
        Lit::Str(s) => Some(s.value()),
        Lit::Bool(b) => Some(b.value.to_string()),
        _ => None,
    })
}
