//! Field tables: how a record exposes its fields to the binder.
//!
//! A record describes itself with a list of [`FieldEntry`] values (normally
//! generated by `#[derive(FlagBind)]`) and hands out typed [`Slot`]s so the
//! write-back phase can mutate fields without owning them.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

/// Raw per-field tag values, kept exactly as declared.
///
/// Interpretation happens at build time: `split` selects unsplit sequences
/// only when equal to `"false"`, and `local` selects the command-local scope
/// only when equal to `"true"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tags {
    /// Explicit flag name overriding the derived one.
    pub name: Option<&'static str>,
    /// Explicit alias.
    pub short: Option<&'static str>,
    /// Help text.
    pub usage: Option<&'static str>,
    /// Comma-separated environment-variable fallbacks.
    pub env: Option<&'static str>,
    /// Default literal, parsed according to the field kind.
    pub default: Option<&'static str>,
    /// Splitting policy for sequence fields.
    pub split: Option<&'static str>,
    /// Scope selector.
    pub local: Option<&'static str>,
}

impl Tags {
    /// Empty tag set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            name: None,
            short: None,
            usage: None,
            env: None,
            default: None,
            split: None,
            local: None,
        }
    }

    /// Sets the `name` tag.
    #[must_use]
    pub const fn name(mut self, value: &'static str) -> Self {
        self.name = Some(value);
        self
    }

    /// Sets the `short` tag.
    #[must_use]
    pub const fn short(mut self, value: &'static str) -> Self {
        self.short = Some(value);
        self
    }

    /// Sets the `usage` tag.
    #[must_use]
    pub const fn usage(mut self, value: &'static str) -> Self {
        self.usage = Some(value);
        self
    }

    /// Sets the `env` tag.
    #[must_use]
    pub const fn env(mut self, value: &'static str) -> Self {
        self.env = Some(value);
        self
    }

    /// Sets the `default` tag.
    #[must_use]
    pub const fn default_value(mut self, value: &'static str) -> Self {
        self.default = Some(value);
        self
    }

    /// Sets the `split` tag.
    #[must_use]
    pub const fn split(mut self, value: &'static str) -> Self {
        self.split = Some(value);
        self
    }

    /// Sets the `local` tag.
    #[must_use]
    pub const fn local(mut self, value: &'static str) -> Self {
        self.local = Some(value);
        self
    }
}

/// Static shape of a field's Rust type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldShape {
    /// `i64`.
    Integer,
    /// `String`.
    String,
    /// `bool`.
    Boolean,
    /// `Vec<String>`.
    Sequence,
    /// `BTreeMap<String, String>` or `HashMap<String, String>`.
    Mapping,
    /// `Option<i64>`.
    OptionalInteger,
    /// `Option<String>`.
    OptionalString,
    /// `Option<bool>`.
    OptionalBoolean,
    /// Any other type; carries the type as written.
    Unsupported(&'static str),
}

/// One leaf field of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Declared field name, e.g. `TagName` or `Tag_Name`.
    pub declared: &'static str,
    /// Raw tag values.
    pub tags: Tags,
    /// Shape of the field's type.
    pub shape: FieldShape,
}

impl FieldSpec {
    /// Creates an untagged field.
    #[must_use]
    pub const fn new(declared: &'static str, shape: FieldShape) -> Self {
        Self {
            declared,
            tags: Tags::new(),
            shape,
        }
    }

    /// Replaces the field's tags.
    #[must_use]
    pub const fn with_tags(mut self, tags: Tags) -> Self {
        self.tags = tags;
        self
    }
}

/// Entry in a record's field table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEntry {
    /// A bindable leaf field.
    Field(FieldSpec),
    /// An embedded record whose fields are spliced in place.
    Embedded {
        /// Type name of the embedded record.
        record: &'static str,
        /// The embedded record's own table.
        fields: Vec<FieldEntry>,
    },
}

/// Mutable reference to a mapping field.
#[derive(Debug)]
pub enum MapSlot<'a> {
    /// `BTreeMap<String, String>`.
    Ordered(&'a mut BTreeMap<String, String>),
    /// `HashMap<String, String>`.
    Hashed(&'a mut HashMap<String, String>),
}

impl MapSlot<'_> {
    /// Replaces the mapping's contents with `values`.
    pub fn assign(self, values: BTreeMap<String, String>) {
        match self {
            Self::Ordered(target) => *target = values,
            Self::Hashed(target) => *target = values.into_iter().collect(),
        }
    }
}

/// Typed, non-owning locator into one field of a record.
#[derive(Debug)]
pub enum Slot<'a> {
    /// Integer storage.
    Integer(&'a mut i64),
    /// String storage.
    String(&'a mut String),
    /// Boolean storage.
    Boolean(&'a mut bool),
    /// Sequence storage, split or unsplit.
    Sequence(&'a mut Vec<String>),
    /// Mapping storage.
    Mapping(MapSlot<'a>),
    /// Optional integer storage.
    OptionalInteger(&'a mut Option<i64>),
    /// Optional string storage.
    OptionalString(&'a mut Option<String>),
    /// Optional boolean storage.
    OptionalBoolean(&'a mut Option<bool>),
    /// A field whose type cannot be bound.
    Unsupported,
}
