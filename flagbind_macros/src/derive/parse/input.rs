//! Input parsing for the `FlagBind` derive macro.
//!
//! This module gathers the struct identifier, its bindable fields, and all
//! attribute metadata in one pass so macro expansion can fail fast with
//! useful errors.

use heck::ToUpperCamelCase;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, Ident, Type, Visibility};

use super::{FieldAttrs, FieldType, StructAttrs, parse_field_attrs, parse_struct_attrs};

/// A field that takes part in binding.
pub(crate) struct ParsedField {
    pub ident: Ident,
    pub ty: Type,
    /// Name exposed to the binder.
    pub declared: String,
    pub attrs: FieldAttrs,
    pub kind: FieldType,
}

/// Everything the generator needs from the input struct.
pub(crate) struct ParsedRecord {
    pub attrs: StructAttrs,
    pub fields: Vec<ParsedField>,
}

/// Gathers information from the user-provided struct.
///
/// Fields that are neither `pub` nor marked `flatten` are dropped here and
/// never reach the field table.
pub(crate) fn parse_input(input: &DeriveInput) -> syn::Result<ParsedRecord> {
    let attrs = parse_struct_attrs(&input.attrs)?;
    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            Fields::Unit => return Ok(ParsedRecord { attrs, fields: Vec::new() }),
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    data.struct_token,
                    "FlagBind requires named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "FlagBind can only be derived for structs",
            ));
        }
    };

    let mut fields = Vec::new();
    for field in named {
        let Some(ident) = field.ident.clone() else {
            continue;
        };
        let field_attrs = parse_field_attrs(&field.attrs)?;
        let public = matches!(field.vis, Visibility::Public(_));
        if !public && !field_attrs.flatten {
            continue;
        }
        fields.push(ParsedField {
            declared: declared_name(&ident),
            kind: FieldType::classify(&field.ty),
            ty: field.ty.clone(),
            ident,
            attrs: field_attrs,
        });
    }
    Ok(ParsedRecord { attrs, fields })
}

/// Exposed name for a field identifier.
///
/// Identifiers that already start with an upper-case letter are kept
/// verbatim; others are converted to upper camel case.
pub(crate) fn declared_name(ident: &Ident) -> String {
    let raw = ident.unraw().to_string();
    if raw.chars().next().is_some_and(char::is_uppercase) {
        raw
    } else {
        raw.to_upper_camel_case()
    }
}
