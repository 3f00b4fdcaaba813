//! Type introspection helpers.
//!
//! These utilities perform shallow inspection of `syn::Type` values to
//! classify a field into one of the bindable shapes. Matching looks at the
//! final path segment only, so `std::option::Option<T>` and `Option<T>` are
//! treated alike.

use quote::ToTokens;
use syn::{GenericArgument, PathArguments, PathSegment, Type};

/// Bindable shape of a field's declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FieldType {
    Integer,
    String,
    Boolean,
    Sequence,
    OrderedMap,
    HashedMap,
    OptionalInteger,
    OptionalString,
    OptionalBoolean,
    /// Carries the type as written.
    Unsupported(String),
}

impl FieldType {
    /// Classifies `ty`.
    pub(crate) fn classify(ty: &Type) -> Self {
        if is_plain(ty, "i64") {
            return Self::Integer;
        }
        if is_plain(ty, "String") {
            return Self::String;
        }
        if is_plain(ty, "bool") {
            return Self::Boolean;
        }
        if vec_inner(ty).is_some_and(|inner| is_plain(inner, "String")) {
            return Self::Sequence;
        }
        if btree_map_inner(ty).is_some_and(is_string_pair) {
            return Self::OrderedMap;
        }
        if hash_map_inner(ty).is_some_and(is_string_pair) {
            return Self::HashedMap;
        }
        if let Some(inner) = option_inner(ty) {
            if is_plain(inner, "i64") {
                return Self::OptionalInteger;
            }
            if is_plain(inner, "String") {
                return Self::OptionalString;
            }
            if is_plain(inner, "bool") {
                return Self::OptionalBoolean;
            }
        }
        Self::Unsupported(render(ty))
    }
}

fn last_segment(ty: &Type) -> Option<&PathSegment> {
    let Type::Path(p) = ty else {
        return None;
    };
    if p.qself.is_some() {
        return None;
    }
    p.path.segments.last()
}

/// Whether `ty` is the argument-free type `name`.
fn is_plain(ty: &Type, name: &str) -> bool {
    last_segment(ty).is_some_and(|seg| seg.ident == name && seg.arguments.is_none())
}

/// Type arguments of `ty` when its final segment is `wrapper`.
fn type_args<'a>(ty: &'a Type, wrapper: &str) -> Option<Vec<&'a Type>> {
    let seg = last_segment(ty)?;
    if seg.ident != wrapper {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &seg.arguments else {
        return None;
    };
    Some(
        args.args
            .iter()
            .filter_map(|arg| match arg {
                GenericArgument::Type(inner) => Some(inner),
                _ => None,
            })
            .collect(),
    )
}

fn single_arg<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    match type_args(ty, wrapper)?.as_slice() {
        [inner] => Some(*inner),
        _ => None,
    }
}

/// Key and value types of a two-argument map. A map with a custom hasher
/// parameter does not match.
fn map_args<'a>(ty: &'a Type, wrapper: &str) -> Option<(&'a Type, &'a Type)> {
    match type_args(ty, wrapper)?.as_slice() {
        [key, value] => Some((*key, *value)),
        _ => None,
    }
}

/// Returns the inner type if `ty` is `Option<T>`.
pub(crate) fn option_inner(ty: &Type) -> Option<&Type> {
    single_arg(ty, "Option")
}

/// Extracts the element type `T` if `ty` is `Vec<T>`.
pub(crate) fn vec_inner(ty: &Type) -> Option<&Type> {
    single_arg(ty, "Vec")
}

/// Extracts the key and value types if `ty` is `BTreeMap<K, V>`.
pub(crate) fn btree_map_inner(ty: &Type) -> Option<(&Type, &Type)> {
    map_args(ty, "BTreeMap")
}

/// Extracts the key and value types if `ty` is `HashMap<K, V>`.
pub(crate) fn hash_map_inner(ty: &Type) -> Option<(&Type, &Type)> {
    map_args(ty, "HashMap")
}

fn is_string_pair((key, value): (&Type, &Type)) -> bool {
    is_plain(key, "String") && is_plain(value, "String")
}

/// Renders `ty` compactly, e.g. `Vec<u8>` rather than `Vec < u8 >`.
fn render(ty: &Type) -> String {
    ty.to_token_stream()
        .to_string()
        .replace(" :: ", "::")
        .replace(":: ", "::")
        .replace(" <", "<")
        .replace("< ", "<")
        .replace(" >", ">")
        .replace(" ,", ",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use syn::parse_str;

    #[rstest]
    #[case("i64", FieldType::Integer)]
    #[case("String", FieldType::String)]
    #[case("std::string::String", FieldType::String)]
    #[case("bool", FieldType::Boolean)]
    #[case("Vec<String>", FieldType::Sequence)]
    #[case("BTreeMap<String, String>", FieldType::OrderedMap)]
    #[case("std::collections::HashMap<String, String>", FieldType::HashedMap)]
    #[case("Option<i64>", FieldType::OptionalInteger)]
    #[case("Option<String>", FieldType::OptionalString)]
    #[case("core::option::Option<bool>", FieldType::OptionalBoolean)]
    fn classifies_bindable_types(#[case] ty: &str, #[case] expected: FieldType) -> syn::Result<()> {
        assert_eq!(FieldType::classify(&parse_str(ty)?), expected);
        Ok(())
    }

    #[rstest]
    #[case("u32", "u32")]
    #[case("Vec<u8>", "Vec<u8>")]
    #[case("Option<Vec<String>>", "Option<Vec<String>>")]
    #[case("HashMap<String, String, RandomState>", "HashMap<String, String, RandomState>")]
    #[case("BTreeMap<String, i64>", "BTreeMap<String, i64>")]
    #[case("std::time::Duration", "std::time::Duration")]
    fn reports_unsupported_types_as_written(
        #[case] ty: &str,
        #[case] rendered: &str,
    ) -> syn::Result<()> {
        assert_eq!(
            FieldType::classify(&parse_str(ty)?),
            FieldType::Unsupported(rendered.to_owned())
        );
        Ok(())
    }
}
