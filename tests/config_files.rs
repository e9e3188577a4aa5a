use std::io::Write;

use runnables::{run, ConfigError, Era, RunConfig};
use tempfile::NamedTempFile;

fn run_to_string(config: &RunConfig) -> (runnables::Summary, String) {
    let mut out = Vec::new();
    let summary = run(config, &mut out).unwrap();
    (summary, String::from_utf8(out).unwrap())
}

#[test]
fn test_config_file_selects_eras() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, r#"eras = ["2018", "2015"]"#).unwrap();
    writeln!(file, r#"color = "never""#).unwrap();

    let config = RunConfig::load(file.path()).unwrap();
    assert_eq!(config.eras, vec![Era::Rust2018, Era::Rust2015]);

    let (summary, output) = run_to_string(&config);
    let first = output.find("Rust 2018 features runnable tests:").unwrap();
    let second = output.find("Rust 2015 features runnable tests:").unwrap();
    assert!(first < second);
    assert!(!output.contains("Rust 2021"));
    assert_eq!(summary.groups.len(), 2);
    assert_eq!(summary.failed, 0);
}

#[test]
fn test_filtered_run_prints_matching_labels_only() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "filter = \"closure\"\ncolor = \"never\"\nsummary = true").unwrap();

    let config = RunConfig::load(file.path()).unwrap();
    let (summary, output) = run_to_string(&config);

    for line in output.lines().filter(|l| l.starts_with("  ")) {
        assert!(line.contains("closure"), "unexpected line: {line}");
        assert!(line.ends_with("... OK"), "unexpected line: {line}");
    }
    assert!(summary.passed > 0);
    assert!(output.ends_with(&format!("{} passed, 0 failed\n", summary.passed)));
}

#[test]
fn test_every_banner_printed_even_when_filter_matches_nothing() {
    let config = RunConfig {
        filter: Some("no_such_example".to_string()),
        color: runnables::ColorChoice::Never,
        ..RunConfig::default()
    };
    let (summary, output) = run_to_string(&config);

    assert_eq!(summary.passed + summary.failed, 0);
    assert_eq!(output.lines().count(), Era::ALL.len());
}

#[test]
fn test_invalid_config_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "eras = 2018").unwrap();

    let err = RunConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_summary_serializes_to_json() {
    let config = RunConfig {
        filter: Some("test_let_else".to_string()),
        color: runnables::ColorChoice::Never,
        ..RunConfig::for_era(Era::Rust2021)
    };
    let (summary, _) = run_to_string(&config);
    let json: serde_json::Value = serde_json::to_value(&summary).unwrap();

    assert_eq!(json["passed"], 1);
    assert_eq!(json["groups"][0]["results"][0]["label"], "test_let_else");
    assert_eq!(json["groups"][0]["results"][0]["status"], "passed");
}
