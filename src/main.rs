//! felipe - component dependency graph queries

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = felipe::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
