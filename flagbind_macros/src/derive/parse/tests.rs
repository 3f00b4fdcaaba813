//! Tests for `#[flag(...)]` attribute and input parsing.

use anyhow::{Result, anyhow, ensure};
use rstest::rstest;
use syn::{DeriveInput, Ident, parse_quote};

use super::input::declared_name;
use super::*;

#[rstest]
fn parses_every_field_key() -> Result<()> {
    let field: syn::Field = parse_quote! {
        #[flag(name = "tag", short = "t", usage = "Image tag", env = "TAG,IMAGE_TAG")]
        #[flag(default = "latest", split = false, local = "true")]
        pub tag: String
    };
    let attrs = parse_field_attrs(&field.attrs)?;
    let expected = FieldAttrs {
        name: Some("tag".into()),
        short: Some("t".into()),
        usage: Some("Image tag".into()),
        env: Some("TAG,IMAGE_TAG".into()),
        default: Some("latest".into()),
        split: Some("false".into()),
        local: Some("true".into()),
        flatten: false,
    };
    ensure!(attrs == expected, "unexpected attrs: {attrs:?}");
    Ok(())
}

#[rstest]
fn flatten_is_a_marker() -> Result<()> {
    let field: syn::Field = parse_quote! {
        #[flag(flatten)]
        pub common: Common
    };
    ensure!(parse_field_attrs(&field.attrs)?.flatten, "flatten not set");
    Ok(())
}

#[rstest]
fn unknown_keys_are_ignored() -> Result<()> {
    let field: syn::Field = parse_quote! {
        #[flag(future_key = "x", other(nested = 1), name = "kept")]
        pub value: String
    };
    let attrs = parse_field_attrs(&field.attrs)?;
    ensure!(attrs.name.as_deref() == Some("kept"), "name lost: {attrs:?}");
    Ok(())
}

#[rstest]
#[case::integer_name(quote::quote!(name = 3), "name must be a string")]
#[case::integer_split(quote::quote!(split = 1), "split must be a string or bool")]
fn rejects_wrong_literal_kinds(
    #[case] body: proc_macro2::TokenStream,
    #[case] message: &str,
) -> Result<()> {
    let field: syn::Field = parse_quote! {
        #[flag(#body)]
        pub value: String
    };
    let Err(err) = parse_field_attrs(&field.attrs) else {
        return Err(anyhow!("expected an error for {body}"));
    };
    ensure!(err.to_string() == message, "unexpected message: {err}");
    Ok(())
}

#[rstest]
fn crate_path_is_parsed() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        #[flag(crate = "deps::flagbind")]
        struct Options {}
    };
    let attrs = parse_struct_attrs(&input.attrs)?;
    let path = attrs.crate_path.ok_or_else(|| anyhow!("crate path missing"))?;
    ensure!(
        quote::quote!(#path).to_string() == "deps :: flagbind",
        "unexpected path"
    );
    Ok(())
}

#[rstest]
fn only_public_and_flattened_fields_are_kept() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        struct Options {
            pub tag: String,
            hidden: String,
            pub(crate) internal: String,
            #[flag(flatten)]
            common: Common,
        }
    };
    let record = parse_input(&input)?;
    let names: Vec<_> = record.fields.iter().map(|f| f.declared.as_str()).collect();
    ensure!(names == ["Tag", "Common"], "unexpected fields: {names:?}");
    Ok(())
}

#[rstest]
fn unit_structs_have_no_fields() -> Result<()> {
    let input: DeriveInput = parse_quote! { struct Empty; };
    ensure!(parse_input(&input)?.fields.is_empty(), "expected no fields");
    Ok(())
}

#[rstest]
#[case::tuple(parse_quote! { struct Pair(String, i64); }, "FlagBind requires named fields")]
#[case::enumeration(parse_quote! { enum Mode { A } }, "FlagBind can only be derived for structs")]
fn rejects_unsupported_inputs(#[case] input: DeriveInput, #[case] message: &str) -> Result<()> {
    let Err(err) = parse_input(&input) else {
        return Err(anyhow!("expected an error"));
    };
    ensure!(err.to_string() == message, "unexpected message: {err}");
    Ok(())
}

#[rstest]
#[case("tag_name", "TagName")]
#[case("TagName", "TagName")]
#[case("Tag_Name", "Tag_Name")]
#[case("r#type", "Type")]
#[case("arch", "Arch")]
#[case("http_server", "HttpServer")]
fn declared_names_follow_identifier_case(#[case] ident: &str, #[case] expected: &str) -> Result<()> {
    let parsed: Ident = syn::parse_str(ident)?;
    let got = declared_name(&parsed);
    ensure!(got == expected, "{ident} -> {got}, expected {expected}");
    Ok(())
}
