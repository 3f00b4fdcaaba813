//! Expansion pipeline for `#[derive(FlagBind)]`: parse, then generate.

use proc_macro2::TokenStream;
use syn::DeriveInput;

mod crate_path;
mod generate;
mod parse;

/// Expands the derive for `input`.
///
/// # Errors
///
/// Fails on non-struct input, tuple structs, and malformed `#[flag]`
/// attributes.
pub(crate) fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let record = parse::parse_input(input)?;
    let krate = crate_path::resolve(record.attrs.crate_path.as_ref());
    Ok(generate::generate_flag_bind_impl(input, &record, &krate))
}
