//! Field descriptor extraction.
//!
//! Walks a record's field table depth first, splicing embedded records in
//! place, and resolves flag names for every exported field.

use serde::Serialize;

use crate::FlagBind;
use crate::field::{FieldEntry, FieldShape, Tags};
use crate::naming::{ResolvedName, resolve};

/// An exported field with its resolved naming, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeclaredField {
    /// Depth-first leaf index, as understood by [`FlagBind::slot`].
    pub index: usize,
    /// Declared field name.
    pub declared: &'static str,
    /// Resolved flag name.
    pub flag: String,
    /// Resolved alias.
    pub alias: Option<String>,
    /// Raw tag values.
    pub tags: Tags,
    /// Shape of the field's type.
    pub shape: FieldShape,
}

/// Extracts the exported fields of `T` in declaration order.
///
/// Only fields whose declared name starts with an ASCII upper-case letter
/// are returned. Skipped fields still consume a leaf index.
#[must_use]
pub fn extract<T: FlagBind>() -> Vec<DeclaredField> {
    extract_entries(&T::fields())
}

/// Extracts fields from an explicit table.
#[must_use]
pub fn extract_entries(entries: &[FieldEntry]) -> Vec<DeclaredField> {
    let mut out = Vec::new();
    let mut next_index = 0;
    walk(entries, &mut next_index, &mut out);
    out
}

/// Number of leaves in a table, embedded ones included.
#[must_use]
pub fn leaf_count(entries: &[FieldEntry]) -> usize {
    entries
        .iter()
        .map(|entry| match entry {
            FieldEntry::Field(_) => 1,
            FieldEntry::Embedded { fields, .. } => leaf_count(fields),
        })
        .sum()
}

fn walk(entries: &[FieldEntry], next_index: &mut usize, out: &mut Vec<DeclaredField>) {
    for entry in entries {
        match entry {
            FieldEntry::Embedded { fields, .. } => walk(fields, next_index, out),
            FieldEntry::Field(spec) => {
                let index = *next_index;
                *next_index += 1;
                if !is_exported(spec.declared) {
                    continue;
                }
                let ResolvedName { flag, alias } =
                    resolve(spec.declared, spec.tags.name, spec.tags.short);
                out.push(DeclaredField {
                    index,
                    declared: spec.declared,
                    flag,
                    alias,
                    tags: spec.tags,
                    shape: spec.shape,
                });
            }
        }
    }
}

fn is_exported(declared: &str) -> bool {
    declared.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldSpec;

    fn table() -> Vec<FieldEntry> {
        vec![
            FieldEntry::Field(FieldSpec::new("Verbose", FieldShape::Boolean)),
            FieldEntry::Embedded {
                record: "Common",
                fields: vec![
                    FieldEntry::Field(FieldSpec::new("Arch", FieldShape::String)),
                    FieldEntry::Field(FieldSpec::new("hidden", FieldShape::String)),
                    FieldEntry::Embedded {
                        record: "Deep",
                        fields: vec![FieldEntry::Field(FieldSpec::new(
                            "Plat_Target",
                            FieldShape::OptionalString,
                        ))],
                    },
                ],
            },
            FieldEntry::Field(FieldSpec::new(
                "Ratio",
                FieldShape::Unsupported("f64"),
            )),
        ]
    }

    #[test]
    fn splices_embedded_fields_in_declaration_order() {
        let fields = extract_entries(&table());
        let names: Vec<_> = fields.iter().map(|f| f.declared).collect();
        assert_eq!(names, ["Verbose", "Arch", "Plat_Target", "Ratio"]);
    }

    #[test]
    fn skipped_fields_keep_their_index() {
        let fields = extract_entries(&table());
        let indices: Vec<_> = fields.iter().map(|f| f.index).collect();
        assert_eq!(indices, [0, 1, 3, 4]);
        assert_eq!(leaf_count(&table()), 5);
    }

    #[test]
    fn resolves_names_during_extraction() {
        let fields = extract_entries(&table());
        let target = fields
            .iter()
            .find(|f| f.declared == "Plat_Target")
            .map(|f| (f.flag.as_str(), f.alias.as_deref()));
        assert_eq!(target, Some(("target", Some("plat"))));
    }

    #[test]
    fn extraction_is_repeatable() {
        assert_eq!(extract_entries(&table()), extract_entries(&table()));
    }
}
