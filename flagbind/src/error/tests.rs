//! Unit tests for error classification and aggregation behaviour.

use clap::{Command, error::ErrorKind};
use rstest::rstest;

use super::{CliError, ConfigError, DefinitionError, is_display_request};

fn build_error(kind: ErrorKind) -> clap::Error {
    Command::new("demo").error(kind, "demo output")
}

#[rstest]
#[case(ErrorKind::DisplayHelp)]
#[case(ErrorKind::DisplayVersion)]
fn recognises_display_requests(#[case] kind: ErrorKind) {
    let err = build_error(kind);
    assert!(is_display_request(&err));
    assert!(CliError::from(err).is_display_request());
}

#[rstest]
#[case(ErrorKind::UnknownArgument)]
#[case(ErrorKind::InvalidValue)]
fn rejects_regular_errors(#[case] kind: ErrorKind) {
    let err = build_error(kind);
    assert!(!is_display_request(&err));
    assert!(!CliError::from(err).is_display_request());
}

#[test]
fn check_passes_without_errors() {
    assert!(ConfigError::check("Empty", Vec::new()).is_ok());
}

#[test]
fn aggregate_lists_every_error_in_order() {
    let err = ConfigError::new(
        "Options",
        vec![
            DefinitionError::UnsupportedKind {
                field: "Ratio".into(),
                type_name: "f64".into(),
            },
            DefinitionError::DuplicateFlag {
                flag: "name".into(),
                field: "Other".into(),
                existing: "field `Name`".into(),
            },
        ],
    );
    let rendered = err.to_string();
    assert_eq!(
        rendered,
        concat!(
            "invalid option record `Options`:\n",
            "1: unsupported type `f64` on field `Ratio`\n",
            "2: flag `name` on field `Other` is already registered by field `Name`"
        )
    );
    assert_eq!(err.len(), 2);
    assert_eq!(err.record(), "Options");
}

#[test]
fn definition_errors_convert_into_cli_errors() {
    let err = ConfigError::new("Options", vec![DefinitionError::EmptyName { field: "X_".into() }]);
    let cli = CliError::from(err.clone());
    assert!(matches!(cli, CliError::Definition(ref inner) if *inner == err));
    assert_eq!(cli.to_string(), err.to_string());
}
