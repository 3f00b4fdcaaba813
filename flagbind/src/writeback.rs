//! Copies parsed flag values back into the option record.
//!
//! Write-back runs after the environment overlay and before any lifecycle
//! hook. Scalars are copied first, then the deferred kinds in a fixed
//! order. Each step only touches descriptors of its own kinds.

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use crate::FlagBind;
use crate::error::RetrievalError;
use crate::field::Slot;
use crate::flags::FlagSet;
use crate::register::{FieldDescriptor, FieldKind};

/// One write-back step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Integer, string and boolean fields.
    Direct,
    /// Verbatim sequences.
    UnsplitSequence,
    /// Comma-split sequences.
    SplitSequence,
    /// `key=value` mappings.
    Mapping,
    /// Optional integers.
    OptionalInteger,
    /// Optional booleans.
    OptionalBoolean,
    /// Optional strings.
    OptionalString,
}

impl Step {
    /// Steps in execution order.
    pub const ORDER: [Self; 7] = [
        Self::Direct,
        Self::UnsplitSequence,
        Self::SplitSequence,
        Self::Mapping,
        Self::OptionalInteger,
        Self::OptionalBoolean,
        Self::OptionalString,
    ];

    /// Whether descriptors of `kind` belong to this step.
    #[must_use]
    pub const fn handles(self, kind: FieldKind) -> bool {
        matches!(
            (self, kind),
            (
                Self::Direct,
                FieldKind::Integer | FieldKind::String | FieldKind::Boolean
            ) | (Self::UnsplitSequence, FieldKind::UnsplitSequence)
                | (Self::SplitSequence, FieldKind::SplitSequence)
                | (Self::Mapping, FieldKind::Mapping)
                | (Self::OptionalInteger, FieldKind::OptionalInteger)
                | (Self::OptionalBoolean, FieldKind::OptionalBoolean)
                | (Self::OptionalString, FieldKind::OptionalString)
        )
    }

    /// Runs this step for every matching descriptor.
    ///
    /// # Errors
    ///
    /// Stops at the first [`RetrievalError`].
    pub fn run<T: FlagBind>(
        self,
        record: &mut T,
        flags: &FlagSet,
        descriptors: &[FieldDescriptor],
    ) -> Result<(), RetrievalError> {
        descriptors
            .iter()
            .filter(|d| self.handles(d.kind))
            .try_for_each(|d| assign(record, flags, d))
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Direct => "direct write-back",
            Self::UnsplitSequence => "unsplit-sequence write-back",
            Self::SplitSequence => "split-sequence write-back",
            Self::Mapping => "mapping write-back",
            Self::OptionalInteger => "optional-integer write-back",
            Self::OptionalBoolean => "optional-boolean write-back",
            Self::OptionalString => "optional-string write-back",
        })
    }
}

/// Runs every step in [`Step::ORDER`].
///
/// # Errors
///
/// Stops at the first [`RetrievalError`]; later steps do not run.
pub fn write_back<T: FlagBind>(
    record: &mut T,
    flags: &FlagSet,
    descriptors: &[FieldDescriptor],
) -> Result<(), RetrievalError> {
    Step::ORDER
        .iter()
        .try_for_each(|step| step.run(record, flags, descriptors))
}

fn assign<T: FlagBind>(
    record: &mut T,
    flags: &FlagSet,
    descriptor: &FieldDescriptor,
) -> Result<(), RetrievalError> {
    let name = descriptor.name.as_str();
    let slot = record
        .slot(descriptor.index)
        .ok_or_else(|| RetrievalError::MissingSlot {
            flag: name.to_owned(),
            index: descriptor.index,
        })?;
    match (descriptor.kind, slot) {
        (FieldKind::Integer, Slot::Integer(target)) => *target = flags.get_int(name)?,
        (FieldKind::String, Slot::String(target)) => flags.get_string(name)?.clone_into(target),
        (FieldKind::Boolean, Slot::Boolean(target)) => *target = flags.get_bool(name)?,
        (FieldKind::UnsplitSequence, Slot::Sequence(target)) => {
            let tokens = flags.get_string_array(name)?;
            if let Some(value) = sequence_value(flags.changed(name)?, tokens) {
                debug!(flag = name, count = value.len(), "wrote back sequence");
                *target = value;
            }
        }
        (FieldKind::SplitSequence, Slot::Sequence(target)) => {
            let tokens = flags.get_string_slice(name)?;
            if let Some(value) = sequence_value(flags.changed(name)?, tokens) {
                debug!(flag = name, count = value.len(), "wrote back sequence");
                *target = value;
            }
        }
        (FieldKind::Mapping, Slot::Mapping(target)) => {
            let tokens = flags.get_string_slice(name)?;
            if flags.changed(name)? {
                let values = parse_mapping(tokens);
                debug!(flag = name, count = values.len(), "wrote back mapping");
                target.assign(values);
            }
        }
        (FieldKind::OptionalInteger, Slot::OptionalInteger(target)) => {
            if flags.changed(name)? {
                *target = Some(flags.get_int(name)?);
                debug!(flag = name, "wrote back optional integer");
            }
        }
        (FieldKind::OptionalBoolean, Slot::OptionalBoolean(target)) => {
            if flags.changed(name)? {
                *target = Some(flags.get_bool(name)?);
                debug!(flag = name, "wrote back optional boolean");
            }
        }
        (FieldKind::OptionalString, Slot::OptionalString(target)) => {
            if flags.changed(name)? {
                *target = Some(flags.get_string(name)?.to_owned());
                debug!(flag = name, "wrote back optional string");
            }
        }
        (kind, _) => {
            return Err(RetrievalError::SlotMismatch {
                field: descriptor.declared.to_owned(),
                kind,
            });
        }
    }
    Ok(())
}

/// Value to store for a sequence flag, if any.
///
/// A flag changed to an explicit empty value yields `[""]` so callers can
/// tell "set to empty" from "never set"; an unchanged flag yields `None`.
#[must_use]
pub fn sequence_value(changed: bool, tokens: &[String]) -> Option<Vec<String>> {
    if !changed {
        return None;
    }
    if tokens.is_empty() {
        return Some(vec![String::new()]);
    }
    Some(tokens.to_vec())
}

/// Parses `key=value` tokens, splitting each once on the first `=`.
///
/// A token without `=` maps to an empty value; a repeated key keeps its
/// last value.
///
/// # Examples
///
/// ```
/// use flagbind::writeback::parse_mapping;
///
/// let parsed = parse_mapping(["a=1", "b", "c=x=y"]);
/// assert_eq!(parsed.get("a").map(String::as_str), Some("1"));
/// assert_eq!(parsed.get("b").map(String::as_str), Some(""));
/// assert_eq!(parsed.get("c").map(String::as_str), Some("x=y"));
/// ```
pub fn parse_mapping<I, S>(tokens: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens
        .into_iter()
        .map(|item| {
            let token = item.as_ref();
            let (key, value) = token.split_once('=').unwrap_or((token, ""));
            (key.to_owned(), value.to_owned())
        })
        .collect()
}
