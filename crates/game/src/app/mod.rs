mod bootstrap;
mod gameplay;
mod loop_runner;

use std::process::ExitCode;

pub(crate) fn run() -> ExitCode {
    loop_runner::run()
}
