//! Parsing utilities for the `FlagBind` derive macro.

use syn::meta::ParseNestedMeta;
use syn::parenthesized;
use syn::{Attribute, Token};

mod input;
mod literals;
#[cfg(test)]
mod tests;
mod type_utils;

pub(crate) use input::{ParsedField, ParsedRecord, parse_input};
use literals::{lit_str, lit_text_or_bool};
pub(crate) use type_utils::FieldType;

#[derive(Default, Clone)]
pub(crate) struct StructAttrs {
    /// Overrides the generated crate path for dependency aliasing.
    ///
    /// When set via `#[flag(crate = "cli_flags")]`, generated code references
    /// types through `cli_flags::` instead of `flagbind::`.
    pub crate_path: Option<syn::Path>,
}

/// Field-level attributes recognised by `#[derive(FlagBind)]`.
///
/// Tag values are kept as written; `split` and `local` accept booleans,
/// which are stored as `"true"`/`"false"`.
#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub(crate) struct FieldAttrs {
    pub name: Option<String>,
    pub short: Option<String>,
    pub usage: Option<String>,
    pub env: Option<String>,
    pub default: Option<String>,
    pub split: Option<String>,
    pub local: Option<String>,
    pub flatten: bool,
}

/// Iterate all `#[flag(...)]` attributes once and apply a callback.
fn parse_flag_attrs<F>(attrs: &[Attribute], mut f: F) -> syn::Result<()>
where
    F: FnMut(&ParseNestedMeta) -> syn::Result<()>,
{
    for attr in attrs.iter().filter(|a| a.path().is_ident("flag")) {
        attr.parse_nested_meta(|meta| f(&meta))?;
    }
    Ok(())
}

/// Consumes an unrecognised key-value or list without recording it.
fn discard_unknown(meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        meta.value()?.parse::<syn::Expr>()?;
    } else if meta.input.peek(syn::token::Paren) {
        let content;
        parenthesized!(content in meta.input);
        content.parse::<proc_macro2::TokenStream>()?;
    }
    Ok(())
}

fn assign_str(target: &mut Option<String>, meta: &ParseNestedMeta, key: &str) -> syn::Result<()> {
    *target = Some(lit_str(meta, key)?.value());
    Ok(())
}

/// Extracts `#[flag(...)]` metadata applied to a struct.
///
/// Only `crate` is recognised; unknown keys are ignored.
pub(crate) fn parse_struct_attrs(attrs: &[Attribute]) -> syn::Result<StructAttrs> {
    let mut out = StructAttrs::default();
    parse_flag_attrs(attrs, |meta| {
        if meta.path.is_ident("crate") {
            let s = lit_str(meta, "crate")?;
            let path: syn::Path =
                syn::parse_str(&s.value()).map_err(|e| syn::Error::new(s.span(), e))?;
            out.crate_path = Some(path);
            return Ok(());
        }
        discard_unknown(meta)
    })?;
    Ok(out)
}

/// Applies a recognised field attribute, returning `true` if handled.
fn apply_field_attr(meta: &ParseNestedMeta, out: &mut FieldAttrs) -> syn::Result<bool> {
    let Some(ident) = meta.path.get_ident() else {
        return Ok(false);
    };
    let key = ident.to_string();
    match key.as_str() {
        "name" => assign_str(&mut out.name, meta, "name")?,
        "short" => assign_str(&mut out.short, meta, "short")?,
        "usage" => assign_str(&mut out.usage, meta, "usage")?,
        "env" => assign_str(&mut out.env, meta, "env")?,
        "default" => assign_str(&mut out.default, meta, "default")?,
        "split" => out.split = Some(lit_text_or_bool(meta, "split")?),
        "local" => out.local = Some(lit_text_or_bool(meta, "local")?),
        "flatten" => out.flatten = true,
        _ => return Ok(false),
    }
    Ok(true)
}

/// Parses field-level `#[flag(...)]` attributes.
///
/// Unknown keys are ignored, matching [`parse_struct_attrs`].
pub(crate) fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut out = FieldAttrs::default();
    parse_flag_attrs(attrs, |meta| {
        if !apply_field_attr(meta, &mut out)? {
            discard_unknown(meta)?;
        }
        Ok(())
    })?;
    Ok(out)
}
