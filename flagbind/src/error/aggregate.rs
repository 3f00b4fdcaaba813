//! Aggregated definition errors for one option record.

use std::{error::Error, fmt};

use super::DefinitionError;

/// Every [`DefinitionError`] found while validating one option record.
///
/// Validation runs over all fields before any flag is registered, so a
/// single build reports each offending field at once.
///
/// # Examples
///
/// ```
/// use flagbind::{ConfigError, DefinitionError};
///
/// let err = ConfigError::new(
///     "DeployOptions",
///     vec![DefinitionError::EmptyName { field: "Name_".into() }],
/// );
/// assert_eq!(err.len(), 1);
/// assert!(err.to_string().contains("DeployOptions"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    record: String,
    errors: Vec<DefinitionError>,
}

impl ConfigError {
    /// Create an aggregation for `record`.
    #[must_use]
    pub fn new(record: impl Into<String>, errors: Vec<DefinitionError>) -> Self {
        Self {
            record: record.into(),
            errors,
        }
    }

    /// Returns `Ok(())` when `errors` is empty, otherwise the aggregation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when at least one error was collected.
    pub fn check(record: &str, errors: Vec<DefinitionError>) -> Result<(), Self> {
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Self::new(record, errors))
        }
    }

    /// Type name of the offending record.
    #[must_use]
    pub fn record(&self) -> &str {
        &self.record
    }

    /// Iterate over the contained errors.
    #[must_use = "iterators should be consumed to inspect errors"]
    pub fn iter(&self) -> impl Iterator<Item = &DefinitionError> {
        self.errors.iter()
    }

    /// Number of errors in the aggregation.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether the aggregation is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid option record `{}`:", self.record)?;
        for (i, e) in self.errors.iter().enumerate() {
            write!(f, "\n{}: {e}", i + 1)?;
        }
        Ok(())
    }
}

impl Error for ConfigError {}

impl<'a> IntoIterator for &'a ConfigError {
    type Item = &'a DefinitionError;
    type IntoIter = std::slice::Iter<'a, DefinitionError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl IntoIterator for ConfigError {
    type Item = DefinitionError;
    type IntoIter = std::vec::IntoIter<DefinitionError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}
