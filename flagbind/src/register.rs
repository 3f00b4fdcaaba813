//! Validation and registration of flags on a `clap::Command`.
//!
//! [`validate`] turns extracted fields into [`FieldDescriptor`]s, reporting
//! every definition error at once. [`register`] then adds one [`Arg`] per
//! descriptor. Registration never runs on an invalid record.

use std::collections::BTreeMap;
use std::fmt;

use clap::builder::BoolishValueParser;
use clap::{Arg, ArgAction, Command, value_parser};
use serde::Serialize;
use tracing::{trace, warn};

use crate::error::{ConfigError, DefinitionError};
use crate::extract::{DeclaredField, extract};
use crate::field::FieldShape;
use crate::FlagBind;

/// Argument id collecting free positional arguments.
pub(crate) const POSITIONAL_ID: &str = "__positional";

/// Bindable field kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKind {
    /// Direct-bind `i64`.
    Integer,
    /// Direct-bind `String`.
    String,
    /// Direct-bind `bool`.
    Boolean,
    /// `Vec<String>` whose occurrences are comma split.
    SplitSequence,
    /// `Vec<String>` whose occurrences are kept verbatim.
    UnsplitSequence,
    /// `key=value` pairs.
    Mapping,
    /// `Option<i64>`, populated only when the flag is changed.
    OptionalInteger,
    /// `Option<String>`, populated only when the flag is changed.
    OptionalString,
    /// `Option<bool>`, populated only when the flag is changed.
    OptionalBoolean,
}

impl FieldKind {
    fn from_shape(shape: FieldShape, split: Option<&str>) -> Option<Self> {
        Some(match shape {
            FieldShape::Integer => Self::Integer,
            FieldShape::String => Self::String,
            FieldShape::Boolean => Self::Boolean,
            FieldShape::Sequence if split == Some("false") => Self::UnsplitSequence,
            FieldShape::Sequence => Self::SplitSequence,
            FieldShape::Mapping => Self::Mapping,
            FieldShape::OptionalInteger => Self::OptionalInteger,
            FieldShape::OptionalString => Self::OptionalString,
            FieldShape::OptionalBoolean => Self::OptionalBoolean,
            FieldShape::Unsupported(_) => return None,
        })
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::SplitSequence => "split-sequence",
            Self::UnsplitSequence => "unsplit-sequence",
            Self::Mapping => "mapping",
            Self::OptionalInteger => "optional-integer",
            Self::OptionalString => "optional-string",
            Self::OptionalBoolean => "optional-boolean",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Flag set a descriptor is registered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scope {
    /// Inherited by subcommands.
    Persistent,
    /// Visible only on the declaring command.
    Local,
}

/// Default value parsed for a descriptor's kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DefaultValue {
    /// Integer kinds.
    Integer(i64),
    /// String kinds.
    Text(String),
    /// Boolean kinds.
    Boolean(bool),
    /// Collection kinds ignore defaults.
    Absent,
}

impl DefaultValue {
    fn parse(kind: FieldKind, raw: Option<&str>, flag: &str) -> Self {
        match kind {
            FieldKind::Integer | FieldKind::OptionalInteger => {
                Self::Integer(raw.map_or(0, |literal| parse_integer_default(literal, flag)))
            }
            FieldKind::String | FieldKind::OptionalString => {
                Self::Text(raw.unwrap_or_default().to_owned())
            }
            FieldKind::Boolean | FieldKind::OptionalBoolean => {
                Self::Boolean(raw.and_then(parse_bool).unwrap_or(false))
            }
            FieldKind::SplitSequence | FieldKind::UnsplitSequence | FieldKind::Mapping => {
                Self::Absent
            }
        }
    }

    /// Integer value, `0` for non-integer defaults.
    #[must_use]
    pub const fn as_integer(&self) -> i64 {
        match self {
            Self::Integer(value) => *value,
            _ => 0,
        }
    }

    /// Text value, empty for non-text defaults.
    #[must_use]
    pub fn as_text(&self) -> &str {
        match self {
            Self::Text(value) => value,
            _ => "",
        }
    }

    /// Boolean value, `false` for non-boolean defaults.
    #[must_use]
    pub const fn as_bool(&self) -> bool {
        matches!(self, Self::Boolean(true))
    }
}

fn parse_integer_default(literal: &str, flag: &str) -> i64 {
    literal.parse().unwrap_or_else(|_| {
        if !literal.is_empty() {
            warn!(flag, literal, "integer default does not parse; using 0");
        }
        0
    })
}

/// Parses the boolean spellings accepted on the command line.
pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "t" | "true" | "y" | "yes" | "on" => Some(true),
        "0" | "f" | "false" | "n" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// A validated, bindable field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    /// Depth-first leaf index into the record.
    pub index: usize,
    /// Declared field name.
    pub declared: &'static str,
    /// Resolved flag name.
    pub name: String,
    /// Resolved alias.
    pub alias: Option<String>,
    /// Help text.
    pub usage: String,
    /// Field kind.
    pub kind: FieldKind,
    /// Parsed default.
    pub default: DefaultValue,
    /// Default literal as declared, compared against by the environment
    /// overlay.
    pub default_literal: String,
    /// Environment-variable fallbacks in declaration order.
    pub env: Vec<String>,
    /// Registration scope.
    pub scope: Scope,
}

/// Extracts and validates the descriptors of `T` against `template`.
///
/// # Errors
///
/// Returns a [`ConfigError`] listing every invalid field.
pub fn descriptors<T: FlagBind>(template: &Command) -> Result<Vec<FieldDescriptor>, ConfigError> {
    validate(T::TYPE_NAME, extract::<T>(), template)
}

/// Validates extracted fields, collecting every definition error.
///
/// Names and aliases must be unique among the fields and must not collide
/// with arguments already present on `template`, including clap's generated
/// `--help` and `--version`.
///
/// # Errors
///
/// Returns a [`ConfigError`] when any field is unsupported, resolves to an
/// empty name, carries an unusable alias, or duplicates another flag.
pub fn validate(
    record: &str,
    fields: Vec<DeclaredField>,
    template: &Command,
) -> Result<Vec<FieldDescriptor>, ConfigError> {
    let mut errors = Vec::new();
    let mut claims = Claims::from_template(template);
    let mut descriptors = Vec::with_capacity(fields.len());

    for field in fields {
        let Some(kind) = FieldKind::from_shape(field.shape, field.tags.split) else {
            if let FieldShape::Unsupported(type_name) = field.shape {
                errors.push(DefinitionError::UnsupportedKind {
                    field: field.declared.to_owned(),
                    type_name: type_name.to_owned(),
                });
            }
            continue;
        };
        if field.flag.is_empty() {
            errors.push(DefinitionError::EmptyName {
                field: field.declared.to_owned(),
            });
            continue;
        }
        claims.claim_long(&field.flag, field.declared, &mut errors);
        if let Some(alias) = &field.alias {
            claims.claim_alias(alias, field.declared, &mut errors);
        }
        descriptors.push(describe(field, kind));
    }

    ConfigError::check(record, errors)?;
    Ok(descriptors)
}

fn describe(field: DeclaredField, kind: FieldKind) -> FieldDescriptor {
    let tags = field.tags;
    let scope = if tags.local == Some("true") {
        Scope::Local
    } else {
        Scope::Persistent
    };
    let env = tags
        .env
        .map(|raw| {
            raw.split(',')
                .filter(|name| !name.is_empty())
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default();
    FieldDescriptor {
        index: field.index,
        declared: field.declared,
        default: DefaultValue::parse(kind, tags.default, &field.flag),
        default_literal: tags.default.unwrap_or_default().to_owned(),
        name: field.flag,
        alias: field.alias,
        usage: tags.usage.unwrap_or_default().to_owned(),
        kind,
        env,
        scope,
    }
}

/// Names and shorts already taken, with a description of the owner.
struct Claims {
    longs: BTreeMap<String, String>,
    shorts: BTreeMap<char, String>,
}

impl Claims {
    fn from_template(template: &Command) -> Self {
        let mut claims = Self {
            longs: BTreeMap::new(),
            shorts: BTreeMap::new(),
        };
        if !template.is_disable_help_flag_set() {
            claims.reserve_builtin("help", 'h');
        }
        let has_version = template.get_version().is_some() || template.get_long_version().is_some();
        if has_version && !template.is_disable_version_flag_set() {
            claims.reserve_builtin("version", 'V');
        }
        for arg in template.get_arguments() {
            let owner = format!("argument `{}` of the command", arg.get_id());
            claims.longs.insert(arg.get_id().to_string(), owner.clone());
            if let Some(long) = arg.get_long() {
                claims.longs.insert(long.to_owned(), owner.clone());
            }
            for alias in arg.get_all_aliases().unwrap_or_default() {
                claims.longs.insert(alias.to_owned(), owner.clone());
            }
            if let Some(short) = arg.get_short() {
                claims.shorts.insert(short, owner.clone());
            }
            for short in arg.get_all_short_aliases().unwrap_or_default() {
                claims.shorts.insert(short, owner.clone());
            }
        }
        claims
    }

    fn reserve_builtin(&mut self, long: &str, short: char) {
        let owner = format!("the built-in `--{long}` flag");
        self.longs.insert(long.to_owned(), owner.clone());
        self.shorts.insert(short, owner);
    }

    fn claim_long(&mut self, name: &str, field: &str, errors: &mut Vec<DefinitionError>) {
        if let Some(existing) = self.longs.get(name) {
            errors.push(DefinitionError::DuplicateFlag {
                flag: name.to_owned(),
                field: field.to_owned(),
                existing: existing.clone(),
            });
            return;
        }
        self.longs
            .insert(name.to_owned(), format!("field `{field}`"));
    }

    fn claim_alias(&mut self, alias: &str, field: &str, errors: &mut Vec<DefinitionError>) {
        if alias.starts_with('-') || alias.chars().any(char::is_whitespace) {
            errors.push(DefinitionError::InvalidAlias {
                field: field.to_owned(),
                alias: alias.to_owned(),
            });
            return;
        }
        match single_char(alias) {
            Some(short) => {
                if let Some(existing) = self.shorts.get(&short) {
                    errors.push(DefinitionError::DuplicateFlag {
                        flag: alias.to_owned(),
                        field: field.to_owned(),
                        existing: existing.clone(),
                    });
                    return;
                }
                self.shorts.insert(short, format!("field `{field}`"));
            }
            None => self.claim_long(alias, field, errors),
        }
    }
}

fn single_char(alias: &str) -> Option<char> {
    let mut chars = alias.chars();
    let first = chars.next()?;
    chars.next().is_none().then_some(first)
}

/// Registers one argument per descriptor on `command`.
///
/// Persistent descriptors become global arguments, local ones plain
/// arguments. Repeated scalar flags override earlier occurrences. When the
/// command declares no subcommands or positionals, a hidden trailing
/// positional collects free arguments.
#[must_use]
pub fn register(template: Command, descriptors: &[FieldDescriptor]) -> Command {
    let wants_positional = !template.has_subcommands()
        && template.get_positionals().next().is_none();
    let mut command = template.args_override_self(true);
    for descriptor in descriptors {
        trace!(
            flag = %descriptor.name,
            kind = %descriptor.kind,
            scope = ?descriptor.scope,
            "registering flag"
        );
        command = command.arg(build_arg(descriptor));
    }
    if wants_positional {
        command = command.arg(
            Arg::new(POSITIONAL_ID)
                .num_args(1..)
                .action(ArgAction::Append)
                .value_parser(value_parser!(String))
                .value_name("ARGS")
                .hide(true),
        );
    }
    command
}

fn build_arg(descriptor: &FieldDescriptor) -> Arg {
    let mut arg = Arg::new(descriptor.name.clone()).long(descriptor.name.clone());
    if !descriptor.usage.is_empty() {
        arg = arg.help(descriptor.usage.clone());
    }
    if let Some(alias) = &descriptor.alias {
        arg = match single_char(alias) {
            Some(short) => arg.short(short),
            None => arg.visible_alias(alias.clone()),
        };
    }
    if descriptor.scope == Scope::Persistent {
        arg = arg.global(true);
    }
    match descriptor.kind {
        FieldKind::Integer | FieldKind::OptionalInteger => arg
            .action(ArgAction::Set)
            .num_args(1)
            .allow_negative_numbers(true)
            .value_parser(value_parser!(i64)),
        FieldKind::String | FieldKind::OptionalString => arg
            .action(ArgAction::Set)
            .num_args(1)
            .allow_hyphen_values(true)
            .value_parser(value_parser!(String)),
        FieldKind::Boolean | FieldKind::OptionalBoolean => arg
            .action(ArgAction::Set)
            .num_args(0..=1)
            .require_equals(true)
            .default_missing_value("true")
            .value_parser(BoolishValueParser::new()),
        FieldKind::SplitSequence | FieldKind::UnsplitSequence | FieldKind::Mapping => arg
            .action(ArgAction::Append)
            .num_args(1)
            .allow_hyphen_values(true)
            .value_parser(value_parser!(String)),
    }
}
