//! Example runner.
//!
//! Runs examples in order and prints one status line per example:
//!
//! ```text
//! Rust 2021 features runnable tests:
//!   test_folding... OK
//!   test_broken... FAILED
//!     assertion failed @ src/demos/edition2021.rs:42
//! ```
//!
//! A failed check is reported and the run moves on. A panic is not caught:
//! it means the example itself is wrong, so it takes the whole run down.

use std::io::{self, Write};

use colored::Colorize;
use serde::Serialize;
use tracing::{debug, info};

use crate::harness::{Check, Failure};

/// A named example.
#[derive(Clone, Copy)]
pub struct Example {
    pub label: &'static str,
    pub run: fn() -> Check,
}

impl Example {
    pub const fn new(label: &'static str, run: fn() -> Check) -> Self {
        Example { label, run }
    }
}

impl std::fmt::Debug for Example {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Example").field("label", &self.label).finish()
    }
}

/// Builds a `Vec<Example>` labelled with each function's name.
#[macro_export]
macro_rules! examples {
    ($($func:ident),* $(,)?) => {
        vec![$($crate::runner::Example::new(stringify!($func), $func)),*]
    };
}

/// A banner plus the examples run under it.
#[derive(Debug, Clone)]
pub struct Group {
    pub banner: String,
    pub examples: Vec<Example>,
}

impl Group {
    pub fn new(banner: impl Into<String>, examples: Vec<Example>) -> Self {
        Group {
            banner: banner.into(),
            examples,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Passed,
    Failed { message: String, failure: Failure },
}

impl Outcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, Outcome::Passed)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExampleResult {
    pub label: &'static str,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Results of one group.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    pub banner: String,
    pub results: Vec<ExampleResult>,
}

impl Report {
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.passed()
    }
}

/// Totals over every group in a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
    pub groups: Vec<Report>,
}

impl Summary {
    fn record(&mut self, report: Report) {
        self.passed += report.passed();
        self.failed += report.failed();
        self.groups.push(report);
    }
}

pub struct Runner<W: Write> {
    out: W,
    color: bool,
    filter: Option<String>,
    summary: bool,
}

impl<W: Write> Runner<W> {
    pub fn new(out: W) -> Self {
        Runner {
            out,
            color: false,
            filter: None,
            summary: false,
        }
    }

    /// Color the status markers even when the sink is not a terminal.
    pub fn with_color(mut self, color: bool) -> Self {
        // `colored` checks stdout itself; plain runners never style, so
        // forcing it on leaves them unaffected.
        if color {
            colored::control::set_override(true);
        }
        self.color = color;
        self
    }

    /// Only run examples whose label contains `filter`.
    pub fn with_filter(mut self, filter: Option<String>) -> Self {
        self.filter = filter;
        self
    }

    /// Print a totals line after the last group.
    pub fn with_summary(mut self, summary: bool) -> Self {
        self.summary = summary;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn selected(&self, example: &Example) -> bool {
        match &self.filter {
            Some(filter) => example.label.contains(filter.as_str()),
            None => true,
        }
    }

    fn marker(&self, text: &str, passed: bool) -> String {
        match (self.color, passed) {
            (false, _) => text.to_string(),
            (true, true) => text.green().to_string(),
            (true, false) => text.red().bold().to_string(),
        }
    }

    /// Runs one example and prints its status line.
    ///
    /// Panics raised by the example are not caught.
    pub fn run_example(&mut self, example: &Example) -> io::Result<Outcome> {
        write!(self.out, "  {}... ", example.label)?;
        self.out.flush()?;

        match (example.run)() {
            Ok(()) => {
                writeln!(self.out, "{}", self.marker("OK", true))?;
                debug!(label = example.label, "example passed");
                Ok(Outcome::Passed)
            }
            Err(failure) => {
                let message = failure.to_string();
                writeln!(self.out, "{}", self.marker("FAILED", false))?;
                writeln!(self.out, "    {}", message)?;
                debug!(label = example.label, %failure, "example failed");
                Ok(Outcome::Failed { message, failure })
            }
        }
    }

    pub fn run_group(&mut self, group: &Group) -> io::Result<Report> {
        writeln!(self.out, "{}", group.banner)?;

        let mut report = Report {
            banner: group.banner.clone(),
            results: Vec::with_capacity(group.examples.len()),
        };
        for example in &group.examples {
            if !self.selected(example) {
                continue;
            }
            let outcome = self.run_example(example)?;
            report.results.push(ExampleResult {
                label: example.label,
                outcome,
            });
        }

        info!(
            banner = %group.banner,
            passed = report.passed(),
            failed = report.failed(),
            "group finished"
        );
        Ok(report)
    }

    pub fn run_groups(&mut self, groups: &[Group]) -> io::Result<Summary> {
        let mut summary = Summary::default();
        for group in groups {
            let report = self.run_group(group)?;
            summary.record(report);
        }

        if self.summary {
            writeln!(
                self.out,
                "{} passed, {} failed",
                summary.passed, summary.failed
            )?;
        }
        self.out.flush()?;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::{assert_equal, assert_true, expect_failure};
    use crate::{check, check_eq};
    use std::panic::{self, AssertUnwindSafe};

    fn test_passes() -> Check {
        check_eq!(2 + 2, 4);
        Ok(())
    }

    fn test_fails() -> Check {
        check!(1 > 2);
        Ok(())
    }

    fn test_expectation_fails() -> Check {
        expect_failure(|| Ok::<i32, String>(1))
    }

    fn test_also_passes() -> Check {
        assert_equal("a", "a")
    }

    fn test_panics() -> Check {
        let values: Vec<i32> = Vec::new();
        assert_true(values[3] == 0)
    }

    fn run_to_string(group: &Group) -> (Report, String) {
        let mut runner = Runner::new(Vec::new());
        let report = runner.run_group(group).unwrap();
        let output = String::from_utf8(runner.into_inner()).unwrap();
        (report, output)
    }

    #[test]
    fn test_examples_macro_uses_function_names() {
        let list = examples![test_passes, test_fails];
        let labels: Vec<_> = list.iter().map(|e| e.label).collect();
        assert_eq!(labels, vec!["test_passes", "test_fails"]);
    }

    #[test]
    fn test_passing_example_prints_ok() {
        let group = Group::new("Banner:", examples![test_passes]);
        let (report, output) = run_to_string(&group);
        assert_eq!(output, "Banner:\n  test_passes... OK\n");
        assert_eq!(report.passed(), 1);
        assert_eq!(report.failed(), 0);
    }

    #[test]
    fn test_failure_is_reported_and_run_continues() {
        let group = Group::new(
            "Banner:",
            examples![test_fails, test_expectation_fails, test_also_passes],
        );
        let (report, output) = run_to_string(&group);

        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines[0], "Banner:");
        assert_eq!(lines[1], "  test_fails... FAILED");
        assert!(lines[2].starts_with("    assertion failed @ "));
        assert!(lines[2].contains("runner.rs:"));
        assert_eq!(lines[3], "  test_expectation_fails... FAILED");
        assert!(lines[4].starts_with("    expected failure did not occur @ "));
        assert_eq!(lines[5], "  test_also_passes... OK");
        assert_eq!(lines.len(), 6);

        assert_eq!(report.passed(), 1);
        assert_eq!(report.failed(), 2);
        assert!(matches!(
            report.results[0].outcome,
            Outcome::Failed {
                failure: Failure::Condition { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_outcome_independent_of_previous_failure() {
        let alone = Group::new("B", examples![test_also_passes]);
        let after_failure = Group::new("B", examples![test_fails, test_also_passes]);

        let (first, _) = run_to_string(&alone);
        let (second, _) = run_to_string(&after_failure);
        assert_eq!(first.results[0].outcome, second.results[1].outcome);
    }

    #[test]
    fn test_panic_escapes_runner_and_stops_the_run() {
        let group = Group::new("B", examples![test_passes, test_panics, test_also_passes]);
        let mut runner = Runner::new(Vec::new());

        let result = panic::catch_unwind(AssertUnwindSafe(|| runner.run_group(&group)));
        let payload = result.expect_err("panic should escape the runner");
        let message = payload
            .downcast_ref::<String>()
            .map(String::as_str)
            .unwrap_or_default();
        assert!(message.contains("index out of bounds"));

        let output = String::from_utf8(runner.into_inner()).unwrap();
        assert_eq!(output, "B\n  test_passes... OK\n  test_panics... ");
        assert!(!output.contains("test_also_passes"));
    }

    #[test]
    fn test_color_markers_without_terminal() {
        let group = Group::new("B", examples![test_passes, test_fails]);
        let mut runner = Runner::new(Vec::new()).with_color(true);
        runner.run_group(&group).unwrap();
        let output = String::from_utf8(runner.into_inner()).unwrap();

        assert!(output.contains("\x1b["));
        assert!(output.contains(&"OK".green().to_string()));
        assert!(output.contains(&"FAILED".red().bold().to_string()));
    }

    #[test]
    fn test_plain_markers_stay_plain() {
        colored::control::set_override(true);
        let (_, output) = run_to_string(&Group::new("B", examples![test_passes]));
        assert!(!output.contains("\x1b["));
    }

    #[test]
    fn test_filter_skips_unmatched_examples() {
        let group = Group::new("B", examples![test_passes, test_fails, test_also_passes]);
        let mut runner = Runner::new(Vec::new()).with_filter(Some("passes".to_string()));
        let report = runner.run_group(&group).unwrap();
        let output = String::from_utf8(runner.into_inner()).unwrap();

        assert_eq!(
            output,
            "B\n  test_passes... OK\n  test_also_passes... OK\n"
        );
        assert_eq!(report.results.len(), 2);
    }

    #[test]
    fn test_run_groups_aggregates_and_prints_summary() {
        let groups = vec![
            Group::new("First:", examples![test_passes, test_fails]),
            Group::new("Second:", examples![test_also_passes]),
        ];
        let mut runner = Runner::new(Vec::new()).with_summary(true);
        let summary = runner.run_groups(&groups).unwrap();
        let output = String::from_utf8(runner.into_inner()).unwrap();

        assert_eq!(summary.passed, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.groups.len(), 2);
        assert!(output.ends_with("2 passed, 1 failed\n"));
        assert!(output.contains("First:\n"));
        assert!(output.contains("Second:\n"));
    }

    #[test]
    fn test_summary_serializes_to_json() {
        let groups = vec![Group::new("G:", examples![test_passes, test_fails])];
        let mut runner = Runner::new(io::sink());
        let summary = runner.run_groups(&groups).unwrap();

        let json: serde_json::Value = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["passed"], 1);
        assert_eq!(json["failed"], 1);
        assert_eq!(json["groups"][0]["results"][0]["status"], "passed");
        assert_eq!(json["groups"][0]["results"][1]["status"], "failed");
        assert_eq!(json["groups"][0]["results"][1]["label"], "test_fails");
    }
}
