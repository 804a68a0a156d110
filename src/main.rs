//
// main.rs
// Oct-Convert-rs
//
// Binary entry point that hands off execution to the CLI layer and maps its outcome to the process exit code.
//

use std::process::ExitCode;

use oct_convert::cli;

fn main() -> ExitCode {
    // All argument parsing, validation and dispatching lives in the CLI module.
    cli::run()
}
