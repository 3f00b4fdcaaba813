//! Procedural macros for `flagbind`.
//!
//! `#[derive(FlagBind)]` generates the field table and slot accessors an
//! option record needs to be bound to command-line flags. Field names are
//! exposed in upper camel case (`tag_name` becomes `TagName`) unless the
//! identifier already starts with an upper-case letter, in which case it is
//! kept verbatim so segmented names such as `Build_Arch` survive.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod derive;

/// Derive macro for `flagbind::FlagBind`.
///
/// Recognised field attributes, all under `#[flag(...)]`:
///
/// - `name`, `short`, `usage`, `env`, `default`: string literals.
/// - `split`, `local`: boolean or string literals.
/// - `flatten`: splice the field's own record in place.
///
/// Only `pub` fields are bound. The struct-level `#[flag(crate = "...")]`
/// overrides the path used to reach the runtime crate.
#[proc_macro_derive(FlagBind, attributes(flag))]
pub fn derive_flag_bind(input: TokenStream) -> TokenStream {
    let derive_input = parse_macro_input!(input as DeriveInput);
    derive::expand(&derive_input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
