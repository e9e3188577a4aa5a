//! Runs the Rust 2021 demonstrations.

use std::io;
use std::process::ExitCode;

use runnables::{Era, RunConfig};

fn main() -> ExitCode {
    match runnables::run(&RunConfig::for_era(Era::Rust2021), io::stdout()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
