//! `FlagBind` trait implementation generation.
//!
//! Leaves are numbered depth first. A leaf's index is the count of leaves
//! declared before it, where every flattened field contributes its own
//! `FIELD_COUNT`; both the field table and `slot` use that numbering.

use proc_macro2::{Literal, TokenStream};
use quote::quote;
use syn::{DeriveInput, Type};

use super::parse::{FieldAttrs, FieldType, ParsedField, ParsedRecord};

/// Generate the `FlagBind` implementation for `input`.
pub(crate) fn generate_flag_bind_impl(
    input: &DeriveInput,
    record: &ParsedRecord,
    krate: &TokenStream,
) -> TokenStream {
    let ident = &input.ident;
    let type_name = syn::ext::IdentExt::unraw(ident).to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let mut entries = Vec::with_capacity(record.fields.len());
    let mut arms = Vec::with_capacity(record.fields.len());
    let mut layout = Layout::default();
    for field in &record.fields {
        let offset = layout.offset(krate);
        let member = &field.ident;
        if field.attrs.flatten {
            let ty = &field.ty;
            entries.push(embedded_entry(ty, krate));
            arms.push(quote! {
                if let ::core::option::Option::Some(local) = index.checked_sub(#offset) {
                    if local < <#ty as #krate::FlagBind>::FIELD_COUNT {
                        return <#ty as #krate::FlagBind>::slot(&mut self.#member, local);
                    }
                }
            });
            layout.embedded.push(ty);
        } else {
            entries.push(leaf_entry(field, krate));
            let slot = slot_expr(&field.kind, member, krate);
            arms.push(quote! {
                if index == #offset {
                    return ::core::option::Option::Some(#slot);
                }
            });
            layout.leaves += 1;
        }
    }
    let field_count = layout.offset(krate);
    let silence = arms.is_empty().then(|| quote! { let _ = index; });

    quote! {
        impl #impl_generics #krate::FlagBind for #ident #ty_generics #where_clause {
            const TYPE_NAME: &'static str = #type_name;
            const FIELD_COUNT: usize = #field_count;

            fn fields() -> ::std::vec::Vec<#krate::field::FieldEntry> {
                ::std::vec![#(#entries),*]
            }

            fn slot(&mut self, index: usize) -> ::core::option::Option<#krate::field::Slot<'_>> {
                #silence
                #(#arms)*
                ::core::option::Option::None
            }
        }
    }
}

/// Running count of leaves and flattened records seen so far.
#[derive(Default)]
struct Layout<'a> {
    leaves: usize,
    embedded: Vec<&'a Type>,
}

impl Layout<'_> {
    /// Constant expression for the index of the next leaf.
    fn offset(&self, krate: &TokenStream) -> TokenStream {
        let leaves = Literal::usize_suffixed(self.leaves);
        let embedded = &self.embedded;
        quote! { #leaves #( + <#embedded as #krate::FlagBind>::FIELD_COUNT )* }
    }
}

fn embedded_entry(ty: &Type, krate: &TokenStream) -> TokenStream {
    quote! {
        #krate::field::FieldEntry::Embedded {
            record: <#ty as #krate::FlagBind>::TYPE_NAME,
            fields: <#ty as #krate::FlagBind>::fields(),
        }
    }
}

fn leaf_entry(field: &ParsedField, krate: &TokenStream) -> TokenStream {
    let declared = &field.declared;
    let shape = shape_expr(&field.kind, krate);
    let tags = tags_expr(&field.attrs, krate);
    quote! {
        #krate::field::FieldEntry::Field(
            #krate::field::FieldSpec::new(#declared, #shape).with_tags(#tags)
        )
    }
}

fn shape_expr(kind: &FieldType, krate: &TokenStream) -> TokenStream {
    let variant = match kind {
        FieldType::Integer => quote!(Integer),
        FieldType::String => quote!(String),
        FieldType::Boolean => quote!(Boolean),
        FieldType::Sequence => quote!(Sequence),
        FieldType::OrderedMap | FieldType::HashedMap => quote!(Mapping),
        FieldType::OptionalInteger => quote!(OptionalInteger),
        FieldType::OptionalString => quote!(OptionalString),
        FieldType::OptionalBoolean => quote!(OptionalBoolean),
        FieldType::Unsupported(written) => quote!(Unsupported(#written)),
    };
    quote! { #krate::field::FieldShape::#variant }
}

fn tags_expr(attrs: &FieldAttrs, krate: &TokenStream) -> TokenStream {
    let setters = [
        ("name", &attrs.name),
        ("short", &attrs.short),
        ("usage", &attrs.usage),
        ("env", &attrs.env),
        ("default_value", &attrs.default),
        ("split", &attrs.split),
        ("local", &attrs.local),
    ]
    .into_iter()
    .filter_map(|(setter, value)| {
        let text = value.as_deref()?;
        let method = syn::Ident::new(setter, proc_macro2::Span::call_site());
        Some(quote! { .#method(#text) })
    });
    quote! { #krate::field::Tags::new() #(#setters)* }
}

fn slot_expr(kind: &FieldType, member: &syn::Ident, krate: &TokenStream) -> TokenStream {
    let slot = quote! { #krate::field::Slot };
    let map = quote! { #krate::field::MapSlot };
    match kind {
        FieldType::Integer => quote! { #slot::Integer(&mut self.#member) },
        FieldType::String => quote! { #slot::String(&mut self.#member) },
        FieldType::Boolean => quote! { #slot::Boolean(&mut self.#member) },
        FieldType::Sequence => quote! { #slot::Sequence(&mut self.#member) },
        FieldType::OrderedMap => quote! { #slot::Mapping(#map::Ordered(&mut self.#member)) },
        FieldType::HashedMap => quote! { #slot::Mapping(#map::Hashed(&mut self.#member)) },
        FieldType::OptionalInteger => quote! { #slot::OptionalInteger(&mut self.#member) },
        FieldType::OptionalString => quote! { #slot::OptionalString(&mut self.#member) },
        FieldType::OptionalBoolean => quote! { #slot::OptionalBoolean(&mut self.#member) },
        FieldType::Unsupported(_) => quote! { #slot::Unsupported },
    }
}
