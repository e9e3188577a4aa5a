//! Runnable feature demonstrations for four Rust editions.
//!
//! The crate is split into:
//!
//! - [`harness`]: `Result`-based assertions that record the caller's location
//! - [`runner`]: runs named examples, prints `OK`/`FAILED`, keeps going
//! - [`generator`]: a pull-based lazy sequence with explicit suspension states
//! - [`config`]: TOML run settings
//! - [`demos`]: the examples themselves, one module per edition
//!
//! ```no_run
//! use runnables::{run, RunConfig};
//!
//! let summary = run(&RunConfig::default(), std::io::stdout()).unwrap();
//! println!("{} passed, {} failed", summary.passed, summary.failed);
//! ```

use std::io::{self, Write};

pub mod config;
pub mod demos;
pub mod generator;
pub mod harness;
pub mod runner;

pub use config::{ColorChoice, ConfigError, Overrides, RunConfig};
pub use demos::Era;
pub use generator::{range_gen, Generator, GeneratorState};
pub use harness::{Check, Failure, Location};
pub use runner::{Example, Group, Outcome, Runner, Summary};

/// Runs every era selected by `config`, writing the report to `out`.
pub fn run<W: Write>(config: &RunConfig, out: W) -> io::Result<Summary> {
    let mut runner = Runner::new(out)
        .with_color(config.use_color())
        .with_filter(config.filter.clone())
        .with_summary(config.summary);
    runner.run_groups(&demos::groups(&config.eras))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_single_era() {
        let config = RunConfig {
            color: ColorChoice::Never,
            ..RunConfig::for_era(Era::Rust2024)
        };
        let mut out = Vec::new();
        let summary = run(&config, &mut out).unwrap();
        let output = String::from_utf8(out).unwrap();

        assert!(output.starts_with("Rust 2024 features runnable tests:\n"));
        assert!(output.contains("  test_lazy_generator... OK\n"));
        assert!(!output.contains("Rust 2015"));
        assert_eq!(summary.groups.len(), 1);
        assert_eq!(summary.failed, 0);
    }

    #[test]
    fn test_run_always_color_writes_escapes() {
        let config = RunConfig {
            color: ColorChoice::Always,
            filter: Some("test_lazy_generator".to_string()),
            ..RunConfig::for_era(Era::Rust2024)
        };
        let mut out = Vec::new();
        run(&config, &mut out).unwrap();
        let output = String::from_utf8(out).unwrap();

        assert!(output.starts_with("Rust 2024 features runnable tests:\n"));
        assert!(output.contains("  test_lazy_generator... \x1b["));
    }

    #[test]
    fn test_run_with_summary_line() {
        let config = RunConfig {
            color: ColorChoice::Never,
            filter: Some("generator".to_string()),
            summary: true,
            ..RunConfig::for_era(Era::Rust2024)
        };
        let mut out = Vec::new();
        let summary = run(&config, &mut out).unwrap();
        let output = String::from_utf8(out).unwrap();

        assert_eq!(summary.passed, 3);
        assert!(output.ends_with("3 passed, 0 failed\n"));
    }
}
