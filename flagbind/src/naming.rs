//! Flag naming derived from declared field names.
//!
//! The derivation splits the declared name on `_`, kebab-cases the last
//! segment and moves it to the front. The first element becomes the flag
//! name and the second (when present) the alias, so `Tag_Name` resolves to
//! `--name` with alias `tag`. Existing option records rely on this ordering.

use crate::FlagBind;

/// Resolved flag name and optional alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedName {
    /// Long flag name without leading dashes.
    pub flag: String,
    /// Alias, either a single character or a long alias.
    pub alias: Option<String>,
}

/// Resolves the flag name and alias for a declared field.
///
/// A non-empty explicit `name` wins outright and is returned with the
/// explicit `short` untouched.
///
/// # Examples
///
/// ```
/// use flagbind::naming::resolve;
///
/// let plain = resolve("TagName", None, None);
/// assert_eq!(plain.flag, "tag-name");
/// assert_eq!(plain.alias, None);
///
/// let segmented = resolve("Tag_Name", None, None);
/// assert_eq!(segmented.flag, "name");
/// assert_eq!(segmented.alias.as_deref(), Some("tag"));
/// ```
#[must_use]
pub fn resolve(declared: &str, name: Option<&str>, short: Option<&str>) -> ResolvedName {
    let explicit_alias = short.filter(|s| !s.is_empty()).map(str::to_owned);
    if let Some(explicit) = name.filter(|n| !n.is_empty()) {
        return ResolvedName {
            flag: explicit.to_owned(),
            alias: explicit_alias,
        };
    }

    let (head, last) = declared.rsplit_once('_').unwrap_or(("", declared));
    let mut ordered = vec![kebab_case(last).to_lowercase()];
    if declared.contains('_') {
        ordered.extend(head.split('_').map(str::to_lowercase));
    }

    let mut segments = ordered.into_iter();
    let flag = segments.next().unwrap_or_default();
    let alias = explicit_alias.or_else(|| segments.next().filter(|s| !s.is_empty()));
    ResolvedName { flag, alias }
}

/// Inserts a hyphen between an ASCII lower-case letter and a following
/// ASCII upper-case letter.
#[must_use]
pub fn kebab_case(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len() + 4);
    let mut previous: Option<char> = None;
    for ch in segment.chars() {
        if previous.is_some_and(|p| p.is_ascii_lowercase()) && ch.is_ascii_uppercase() {
            out.push('-');
        }
        out.push(ch);
        previous = Some(ch);
    }
    out
}

/// Derives a command name from a record's type name.
///
/// The first occurrence of `Command` is dropped and the remainder resolved
/// like a field name, so `BuildCommand` becomes `build`.
#[must_use]
pub fn command_name<T: FlagBind>() -> String {
    resolve(&T::TYPE_NAME.replacen("Command", "", 1), None, None).flag
}
