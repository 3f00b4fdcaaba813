//! Parsed flag state for one invocation.
//!
//! clap's `ArgMatches` cannot be modified after parsing, yet the environment
//! overlay must be able to replace a flag's value. [`FlagSet`] copies the
//! relevant values out of the matches into a typed, mutable view that also
//! records whether each flag was explicitly changed.

use std::collections::BTreeMap;

use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::error::RetrievalError;
use crate::register::{FieldDescriptor, FieldKind, parse_bool};

/// Current value of a flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagValue {
    /// Integer flag.
    Int(i64),
    /// String flag.
    String(String),
    /// Boolean flag.
    Bool(bool),
    /// Comma-split tokens.
    StringSlice(Vec<String>),
    /// Verbatim tokens.
    StringArray(Vec<String>),
}

impl FlagValue {
    /// Type label used in retrieval errors.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::String(_) => "string",
            Self::Bool(_) => "bool",
            Self::StringSlice(_) => "stringSlice",
            Self::StringArray(_) => "stringArray",
        }
    }
}

/// One registered flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flag {
    value: FlagValue,
    changed: bool,
}

impl Flag {
    /// Current value.
    #[must_use]
    pub const fn value(&self) -> &FlagValue {
        &self.value
    }

    /// Whether the value was explicitly supplied.
    #[must_use]
    pub const fn changed(&self) -> bool {
        self.changed
    }
}

/// Typed view over the flags of one invocation, keyed by flag name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagSet {
    flags: BTreeMap<String, Flag>,
}

impl FlagSet {
    /// Reads every descriptor's flag from `matches`.
    ///
    /// Flags absent from the command line take the descriptor default and
    /// are not marked changed.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::Matches`] when `matches` does not know a
    /// descriptor's flag or holds a different value type.
    pub fn from_matches(
        descriptors: &[FieldDescriptor],
        matches: &ArgMatches,
    ) -> Result<Self, RetrievalError> {
        let mut flags = BTreeMap::new();
        for descriptor in descriptors {
            let value = read_value(descriptor, matches)?;
            let changed = matches!(
                matches.value_source(&descriptor.name),
                Some(ValueSource::CommandLine)
            );
            flags.insert(descriptor.name.clone(), Flag { value, changed });
        }
        Ok(Self { flags })
    }

    /// Inserts a flag directly, replacing any previous one.
    pub fn insert(&mut self, name: impl Into<String>, value: FlagValue, changed: bool) {
        self.flags.insert(name.into(), Flag { value, changed });
    }

    /// Looks up a flag by name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Flag> {
        self.flags.get(name)
    }

    /// Whether the named flag was explicitly supplied.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::UnknownFlag`] for unregistered names.
    pub fn changed(&self, name: &str) -> Result<bool, RetrievalError> {
        self.get(name).map(Flag::changed)
    }

    /// Integer value of the named flag.
    ///
    /// # Errors
    ///
    /// Fails for unknown flags and non-integer flags.
    pub fn get_int(&self, name: &str) -> Result<i64, RetrievalError> {
        match self.get(name)?.value() {
            FlagValue::Int(v) => Ok(*v),
            other => Err(mismatch(name, "int", other)),
        }
    }

    /// String value of the named flag.
    ///
    /// # Errors
    ///
    /// Fails for unknown flags and non-string flags.
    pub fn get_string(&self, name: &str) -> Result<&str, RetrievalError> {
        match self.get(name)?.value() {
            FlagValue::String(v) => Ok(v),
            other => Err(mismatch(name, "string", other)),
        }
    }

    /// Boolean value of the named flag.
    ///
    /// # Errors
    ///
    /// Fails for unknown flags and non-boolean flags.
    pub fn get_bool(&self, name: &str) -> Result<bool, RetrievalError> {
        match self.get(name)?.value() {
            FlagValue::Bool(v) => Ok(*v),
            other => Err(mismatch(name, "bool", other)),
        }
    }

    /// Comma-split tokens of the named flag.
    ///
    /// # Errors
    ///
    /// Fails for unknown flags and flags of another type.
    pub fn get_string_slice(&self, name: &str) -> Result<&[String], RetrievalError> {
        match self.get(name)?.value() {
            FlagValue::StringSlice(v) => Ok(v),
            other => Err(mismatch(name, "stringSlice", other)),
        }
    }

    /// Verbatim tokens of the named flag.
    ///
    /// # Errors
    ///
    /// Fails for unknown flags and flags of another type.
    pub fn get_string_array(&self, name: &str) -> Result<&[String], RetrievalError> {
        match self.get(name)?.value() {
            FlagValue::StringArray(v) => Ok(v),
            other => Err(mismatch(name, "stringArray", other)),
        }
    }

    /// Parses `raw` for the named flag's type, stores it and marks the flag
    /// changed.
    ///
    /// Sequence flags replace their tokens on the first set and append on
    /// later ones.
    ///
    /// # Errors
    ///
    /// Fails for unknown flags and values that do not parse.
    pub fn set(&mut self, name: &str, raw: &str) -> Result<(), RetrievalError> {
        let flag = self
            .flags
            .get_mut(name)
            .ok_or_else(|| RetrievalError::UnknownFlag {
                flag: name.to_owned(),
            })?;
        let first = !flag.changed;
        match &mut flag.value {
            FlagValue::Int(v) => *v = raw.parse().map_err(|_| invalid(name, raw, "int"))?,
            FlagValue::String(v) => raw.clone_into(v),
            FlagValue::Bool(v) => *v = parse_bool(raw).ok_or_else(|| invalid(name, raw, "bool"))?,
            FlagValue::StringSlice(tokens) => {
                if first {
                    tokens.clear();
                }
                tokens.extend(split_tokens(raw));
            }
            FlagValue::StringArray(tokens) => {
                if first {
                    tokens.clear();
                }
                tokens.push(raw.to_owned());
            }
        }
        flag.changed = true;
        Ok(())
    }

    fn get(&self, name: &str) -> Result<&Flag, RetrievalError> {
        self.flags.get(name).ok_or_else(|| RetrievalError::UnknownFlag {
            flag: name.to_owned(),
        })
    }
}

fn read_value(
    descriptor: &FieldDescriptor,
    matches: &ArgMatches,
) -> Result<FlagValue, RetrievalError> {
    let name = descriptor.name.as_str();
    let wrap = |source| RetrievalError::Matches {
        flag: name.to_owned(),
        source,
    };
    Ok(match descriptor.kind {
        FieldKind::Integer | FieldKind::OptionalInteger => FlagValue::Int(
            matches
                .try_get_one::<i64>(name)
                .map_err(wrap)?
                .copied()
                .unwrap_or_else(|| descriptor.default.as_integer()),
        ),
        FieldKind::String | FieldKind::OptionalString => FlagValue::String(
            matches
                .try_get_one::<String>(name)
                .map_err(wrap)?
                .map_or_else(|| descriptor.default.as_text().to_owned(), Clone::clone),
        ),
        FieldKind::Boolean | FieldKind::OptionalBoolean => FlagValue::Bool(
            matches
                .try_get_one::<bool>(name)
                .map_err(wrap)?
                .copied()
                .unwrap_or_else(|| descriptor.default.as_bool()),
        ),
        FieldKind::SplitSequence | FieldKind::Mapping => FlagValue::StringSlice(
            raw_occurrences(matches, name)
                .map_err(wrap)?
                .iter()
                .flat_map(|raw| split_tokens(raw))
                .collect(),
        ),
        FieldKind::UnsplitSequence => {
            FlagValue::StringArray(raw_occurrences(matches, name).map_err(wrap)?)
        }
    })
}

fn raw_occurrences(
    matches: &ArgMatches,
    name: &str,
) -> Result<Vec<String>, clap::parser::MatchesError> {
    Ok(matches
        .try_get_many::<String>(name)?
        .map(|values| values.cloned().collect())
        .unwrap_or_default())
}

/// Splits one occurrence of a sequence flag on commas.
///
/// An empty occurrence yields no tokens, which is how an explicit empty
/// value (`--tags=`) is told apart from `--tags=a`.
#[must_use]
pub fn split_tokens(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(',').map(str::to_owned).collect()
}

fn mismatch(name: &str, expected: &'static str, actual: &FlagValue) -> RetrievalError {
    RetrievalError::TypeMismatch {
        flag: name.to_owned(),
        expected,
        actual: actual.type_name(),
    }
}

fn invalid(name: &str, raw: &str, expected: &'static str) -> RetrievalError {
    RetrievalError::InvalidValue {
        flag: name.to_owned(),
        value: raw.to_owned(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn flags() -> FlagSet {
        let mut set = FlagSet::default();
        set.insert("count", FlagValue::Int(3), false);
        set.insert("tag", FlagValue::String("latest".into()), false);
        set.insert("force", FlagValue::Bool(false), false);
        set.insert("labels", FlagValue::StringSlice(vec!["a".into()]), false);
        set.insert("args", FlagValue::StringArray(Vec::new()), false);
        set
    }

    #[rstest]
    #[case("a,b,c", vec!["a", "b", "c"])]
    #[case("a", vec!["a"])]
    #[case("", vec![])]
    #[case("a,", vec!["a", ""])]
    #[case(",", vec!["", ""])]
    fn splits_occurrences(#[case] raw: &str, #[case] expected: Vec<&str>) {
        assert_eq!(split_tokens(raw), expected);
    }

    #[rstest]
    fn typed_getters_reject_mismatches(flags: FlagSet) {
        assert_eq!(flags.get_int("count").ok(), Some(3));
        assert_eq!(flags.get_string("tag").ok(), Some("latest"));
        assert!(matches!(
            flags.get_string("count"),
            Err(RetrievalError::TypeMismatch { expected: "string", actual: "int", .. })
        ));
        assert!(matches!(
            flags.get_string_array("labels"),
            Err(RetrievalError::TypeMismatch { actual: "stringSlice", .. })
        ));
        assert!(matches!(
            flags.get_bool("missing"),
            Err(RetrievalError::UnknownFlag { .. })
        ));
    }

    #[rstest]
    #[expect(
        clippy::panic_in_result_fn,
        reason = "assertions read better than ensure chains here"
    )]
    fn set_parses_and_marks_changed(mut flags: FlagSet) -> Result<(), RetrievalError> {
        flags.set("count", "-4")?;
        flags.set("force", "t")?;
        flags.set("tag", "")?;
        assert_eq!(flags.get_int("count")?, -4);
        assert!(flags.get_bool("force")?);
        assert_eq!(flags.get_string("tag")?, "");
        assert!(flags.changed("tag")?);
        Ok(())
    }

    #[rstest]
    #[expect(
        clippy::panic_in_result_fn,
        reason = "assertions read better than ensure chains here"
    )]
    fn set_replaces_then_appends_sequences(mut flags: FlagSet) -> Result<(), RetrievalError> {
        flags.set("labels", "x,y")?;
        flags.set("labels", "z")?;
        flags.set("args", "p,q")?;
        assert_eq!(flags.get_string_slice("labels")?, ["x", "y", "z"]);
        assert_eq!(flags.get_string_array("args")?, ["p,q"]);
        Ok(())
    }

    #[rstest]
    fn set_rejects_unparsable_values(mut flags: FlagSet) {
        assert!(matches!(
            flags.set("count", "many"),
            Err(RetrievalError::InvalidValue { expected: "int", .. })
        ));
        assert_eq!(flags.changed("count").ok(), Some(false));
    }
}
