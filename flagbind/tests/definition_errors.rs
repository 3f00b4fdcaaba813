//! Invalid option records are rejected before any input is parsed, with
//! every problem reported at once.

use anyhow::{Result, anyhow, ensure};
use clap::Command;
use flagbind::{
    BoundCommand, BoxError, CliError, DefinitionError, FlagBind, Invocation, Runnable,
};
use rstest::rstest;

#[derive(Default, FlagBind)]
struct BrokenCommand {
    pub port: u32,
    #[flag(name = "target")]
    pub first: String,
    #[flag(name = "target")]
    pub second: String,
    #[flag(short = "h")]
    pub host: String,
    pub ratio: f64,
    #[flag(short = "-x")]
    pub extra: String,
}

impl Runnable for BrokenCommand {
    fn run(&mut self, _: &Invocation<'_>) -> Result<(), BoxError> {
        Ok(())
    }
}

#[rstest]
fn every_definition_error_is_collected() -> Result<()> {
    let Err(err) = BoundCommand::builder(BrokenCommand::default()).build() else {
        return Err(anyhow!("expected build to fail"));
    };
    ensure!(err.record() == "BrokenCommand", "record: {}", err.record());
    let errors: Vec<_> = err.iter().cloned().collect();
    let expected = vec![
        DefinitionError::UnsupportedKind {
            field: "Port".into(),
            type_name: "u32".into(),
        },
        DefinitionError::DuplicateFlag {
            flag: "target".into(),
            field: "Second".into(),
            existing: "field `First`".into(),
        },
        DefinitionError::DuplicateFlag {
            flag: "h".into(),
            field: "Host".into(),
            existing: "the built-in `--help` flag".into(),
        },
        DefinitionError::UnsupportedKind {
            field: "Ratio".into(),
            type_name: "f64".into(),
        },
        DefinitionError::InvalidAlias {
            field: "Extra".into(),
            alias: "-x".into(),
        },
    ];
    ensure!(errors == expected, "unexpected errors: {errors:#?}");
    Ok(())
}

#[rstest]
fn aggregate_renders_a_numbered_list() -> Result<()> {
    let Err(err) = BoundCommand::builder(BrokenCommand::default()).build() else {
        return Err(anyhow!("expected build to fail"));
    };
    let text = err.to_string();
    ensure!(
        text.starts_with("invalid option record `BrokenCommand`:"),
        "unexpected header: {text}"
    );
    ensure!(text.contains("\n1: unsupported type `u32` on field `Port`"), "{text}");
    ensure!(text.contains("\n5: "), "expected five entries: {text}");
    Ok(())
}

#[derive(Default, FlagBind)]
struct VersionedCommand {
    #[flag(short = "V")]
    pub verbose: bool,
}

impl Runnable for VersionedCommand {
    fn run(&mut self, _: &Invocation<'_>) -> Result<(), BoxError> {
        Ok(())
    }
}

#[rstest]
fn version_flag_is_reserved_only_when_a_version_is_set() -> Result<()> {
    ensure!(
        BoundCommand::builder(VersionedCommand::default()).build().is_ok(),
        "-V should be free without a version"
    );
    let built = BoundCommand::builder(VersionedCommand::default())
        .template(Command::new("tool").version("1.0.0"))
        .build();
    ensure!(
        built.as_ref().map_err(flagbind::ConfigError::len).err() == Some(1),
        "expected one collision"
    );
    Ok(())
}

#[rstest]
fn definition_errors_surface_through_cli_error() {
    let err = BoundCommand::builder(BrokenCommand::default())
        .build()
        .map_err(CliError::from)
        .err();
    assert!(matches!(err, Some(CliError::Definition(_))));
}
