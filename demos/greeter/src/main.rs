//! Greeter entry point: bind the options, run the hooks, report the outcome.

use std::process::ExitCode;

use clap::Command;
use flagbind::BoundCommand;
use flagbind::context::{with_default_io_streams, with_default_log_level};
use greeter::GreetCommand;

fn main() -> ExitCode {
    let template = Command::new("greeter")
        .about("Prints a configurable greeting")
        .version(env!("CARGO_PKG_VERSION"));
    flagbind::main(
        BoundCommand::builder(GreetCommand::default())
            .template(template)
            .option(with_default_io_streams())
            .option(with_default_log_level())
            .build(),
    )
}
