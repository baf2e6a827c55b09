//! propmerge - Merge name=value overrides into an XML property file, then launch

use std::process::ExitCode;

use propmerge::cli;

fn main() -> ExitCode {
    cli::run()
}
