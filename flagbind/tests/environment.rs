//! Environment-variable fallbacks and their precedence over flags.

mod common;

use anyhow::{Result, ensure};
use common::{PushCommand, execute};
use flagbind::BoundCommand;
use rstest::rstest;
use serial_test::serial;

#[rstest]
#[case::fills_default(&[], &[("PUSH_TAG", "v2")], "v2")]
#[case::second_name(&[], &[("IMAGE_TAG", "v3")], "v3")]
#[case::first_name_wins(&[], &[("PUSH_TAG", "a"), ("IMAGE_TAG", "b")], "a")]
#[case::empty_is_unset(&[], &[("PUSH_TAG", ""), ("IMAGE_TAG", "b")], "b")]
#[case::explicit_flag_wins(&["--tag", "v9"], &[("PUSH_TAG", "v2")], "v9")]
#[case::explicit_default_is_overridden(&["--tag", "latest"], &[("PUSH_TAG", "v2")], "v2")]
#[case::unset(&[], &[], "latest")]
fn string_fallbacks(
    #[case] args: &[&str],
    #[case] env: &[(&str, &str)],
    #[case] expected: &str,
) -> Result<()> {
    let cmd = execute(PushCommand::default(), args, env)?;
    ensure!(cmd.tag == expected, "expected {expected:?}, got {:?}", cmd.tag);
    Ok(())
}

#[rstest]
fn optional_strings_are_populated_from_env() -> Result<()> {
    let cmd = execute(PushCommand::default(), &[], &[("PUSH_NOTE", "from-env")])?;
    ensure!(cmd.note.as_deref() == Some("from-env"), "note: {:?}", cmd.note);
    Ok(())
}

#[rstest]
fn non_string_flags_ignore_env() -> Result<()> {
    #[derive(Default, flagbind::FlagBind)]
    struct Tuning {
        #[flag(env = "TUNING_LEVEL", default = "1")]
        pub level: i64,
    }

    impl flagbind::Runnable for Tuning {
        fn run(&mut self, _: &flagbind::Invocation<'_>) -> Result<(), flagbind::BoxError> {
            Ok(())
        }
    }

    let cmd = execute(Tuning::default(), &[], &[("TUNING_LEVEL", "9")])?;
    ensure!(cmd.level == 1, "level: {}", cmd.level);
    Ok(())
}

#[rstest]
#[serial]
fn process_environment_is_the_default_source() -> Result<()> {
    let _scope = test_helpers::env::vars(&[("IMAGE_TAG", "from-process")], &["PUSH_TAG"]);
    let mut command = BoundCommand::builder(PushCommand::default()).build()?;
    command.execute_from(["push"])?;
    let tag = &command.record().tag;
    ensure!(tag == "from-process", "tag: {tag}");
    Ok(())
}
