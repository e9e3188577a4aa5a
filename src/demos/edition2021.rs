//! Rust 2021: disjoint captures, by-value arrays, const generics, richer
//! patterns and formatting, plus the sum types and collection APIs the
//! examples lean on.

use std::any::Any;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

use rayon::prelude::*;
use thiserror::Error;

use crate::harness::Check;
use crate::runner::Example;
use crate::{check, check_eq, check_fails, check_ne, examples};

pub fn examples() -> Vec<Example> {
    examples![
        test_iterator_folding,
        test_disjoint_closure_captures,
        test_array_into_iter,
        test_const_generics,
        test_or_patterns,
        test_format_captures,
        test_let_else,
        test_destructuring,
        test_match_on_failed_status,
        test_tagged_unions,
        test_any_downcast,
        test_option_combinators,
        test_str_views,
        test_btree_splicing,
        test_parallel_search,
        test_filesystem_probe,
    ]
}

// ============================================================================
// Example: Folding
// ============================================================================

fn sum_all(values: &[f64]) -> f64 {
    values.iter().fold(0.0, |acc, v| acc + v)
}

fn test_iterator_folding() -> Check {
    check_eq!(sum_all(&[1.0, 2.3, 3.0]), 6.3);
    check_ne!(sum_all(&[1.0, 2.3, 4.0]), 6.3);

    let flags = [true, true, true];
    check!(flags.iter().all(|&b| b));
    check!(flags.iter().fold(true, |acc, &b| acc && b));
    Ok(())
}

// ============================================================================
// Example: Closures and Arrays
// ============================================================================

struct Settings {
    name: String,
    retries: u32,
}

fn test_disjoint_closure_captures() -> Check {
    let mut settings = Settings {
        name: "svc".to_string(),
        retries: 0,
    };

    // the closure captures `settings.retries` only, so `settings.name` stays free
    let mut bump = || settings.retries += 1;
    let name = &settings.name;
    bump();
    bump();
    check_eq!(name.as_str(), "svc");
    check_eq!(settings.retries, 2);
    Ok(())
}

fn test_array_into_iter() -> Check {
    let words = [String::from("a"), String::from("b")];
    let owned: Vec<String> = words.into_iter().collect();
    check_eq!(owned, vec!["a", "b"]);
    Ok(())
}

fn sum_array<const N: usize>(values: [i32; N]) -> i32 {
    values.iter().sum()
}

struct Matrix<const R: usize, const C: usize> {
    cells: [[i32; C]; R],
}

impl<const R: usize, const C: usize> Matrix<R, C> {
    fn transpose(&self) -> Matrix<C, R> {
        let mut cells = [[0; R]; C];
        for (r, row) in self.cells.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                cells[c][r] = *value;
            }
        }
        Matrix { cells }
    }
}

fn test_const_generics() -> Check {
    check_eq!(sum_array([1, 2, 3]), 6);
    check_eq!(sum_array([0; 0]), 0);

    let m = Matrix {
        cells: [[1, 2, 3], [4, 5, 6]],
    };
    check_eq!(m.transpose().cells, [[1, 4], [2, 5], [3, 6]]);
    Ok(())
}

// ============================================================================
// Example: Patterns and Formatting
// ============================================================================

fn classify(c: char) -> &'static str {
    match c {
        'a' | 'e' | 'i' | 'o' | 'u' => "vowel",
        'a'..='z' => "consonant",
        _ => "other",
    }
}

fn test_or_patterns() -> Check {
    check_eq!(classify('e'), "vowel");
    check_eq!(classify('k'), "consonant");
    check_eq!(classify('7'), "other");

    let pair = (Some(2), 1);
    check!(matches!(pair, (Some(1 | 2), 0 | 1)));
    check!(!matches!(pair, (Some(3 | 4), _)));
    Ok(())
}

fn test_format_captures() -> Check {
    let name = "ferris";
    let width = 8;
    check_eq!(format!("{name}!"), "ferris!");
    check_eq!(format!("[{name:>width$}]"), "[  ferris]");

    let ratio = 1.23456;
    check_eq!(format!("{ratio:.2}"), "1.23");
    Ok(())
}

fn parse_port(entry: &str) -> Option<u16> {
    let Some((_, port)) = entry.split_once(':') else {
        return None;
    };
    port.parse().ok()
}

fn test_let_else() -> Check {
    check_eq!(parse_port("localhost:8080"), Some(8080));
    check_eq!(parse_port("localhost"), None);
    check_eq!(parse_port("host:http"), None);
    Ok(())
}

fn test_destructuring() -> Check {
    let (x, y, z) = (1, 2.3, "4");
    check_eq!(x, 1);
    check_eq!(y, 2.3);
    check_eq!(z, "4");

    let [a, b] = [1, 2];
    check_eq!(a + b, 3);

    let map: HashMap<&str, i32> = HashMap::from([("a", 1), ("b", 2)]);
    let mut sum = 0;
    for (_key, value) in &map {
        sum += value;
    }
    check_eq!(sum, 3);
    Ok(())
}

// ============================================================================
// Example: Matching on a Status That Fails
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Ok,
    Failed,
}

struct Job {
    valid: bool,
}

impl Job {
    fn status(&self) -> Status {
        if self.valid {
            Status::Ok
        } else {
            Status::Failed
        }
    }

    fn do_work(&self) {}
}

#[derive(Error, Debug)]
#[error("job status: {0}")]
struct JobError(&'static str);

fn status_msg(status: Status) -> &'static str {
    match status {
        Status::Ok => "ok",
        Status::Failed => "not_ok",
    }
}

fn run_job(job: Job) -> Result<(), JobError> {
    match job.status() {
        Status::Ok => {
            job.do_work();
            Ok(())
        }
        status @ Status::Failed => Err(JobError(status_msg(status))),
    }
}

fn test_match_on_failed_status() -> Check {
    check_fails!(|| run_job(Job { valid: false }));
    check!(run_job(Job { valid: true }).is_ok());
    Ok(())
}

// ============================================================================
// Example: Sum Types, Any, Option
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Thing {
    Int(i32),
    Float(f64),
    Point { x: i32, y: i32 },
    Text(String),
}

impl Thing {
    fn index(&self) -> usize {
        match self {
            Thing::Int(_) => 0,
            Thing::Float(_) => 1,
            Thing::Point { .. } => 2,
            Thing::Text(_) => 3,
        }
    }
}

fn test_tagged_unions() -> Check {
    let mut thing = Thing::Int(2);
    check_eq!(thing.index(), 0);
    check!(matches!(thing, Thing::Int(2)));

    thing = Thing::Text("str".to_string());
    check_eq!(thing.index(), 3);
    check_eq!(thing, Thing::Text("str".to_string()));

    if let Thing::Point { x, y } = (Thing::Point { x: 1, y: 2 }) {
        check_eq!(x + y, 3);
    }
    check_ne!(Thing::Float(1.0), Thing::Int(1));
    Ok(())
}

fn test_any_downcast() -> Check {
    let mut value: Box<dyn Any> = Box::new(5i32);
    check!(value.is::<i32>());
    check_eq!(value.downcast_ref::<i32>(), Some(&5));

    if let Some(n) = value.downcast_mut::<i32>() {
        *n = 10;
    }
    check_eq!(value.downcast_ref::<i32>(), Some(&10));
    check!(value.downcast_ref::<String>().is_none());
    Ok(())
}

fn create_string(success: bool) -> Option<String> {
    success.then(|| "str".to_string())
}

fn test_option_combinators() -> Check {
    check_eq!(create_string(true).unwrap_or_default(), "str");
    check_eq!(
        create_string(false).unwrap_or_else(|| "none".to_string()),
        "none"
    );
    check_eq!(create_string(true).map(|s| s.len()), Some(3));

    let mut seen = String::new();
    if let Some(s) = create_string(true) {
        seen = s;
    }
    check_eq!(seen, "str");
    Ok(())
}

fn test_str_views() -> Check {
    let owned = String::from("   trim me");
    let view: &str = owned.trim_start();
    check_eq!(view, "trim me");
    check_eq!(owned, "   trim me");

    const CONSTANT: &str = "something constant";
    check_eq!(CONSTANT.split_whitespace().count(), 2);
    Ok(())
}

// ============================================================================
// Example: Collections
// ============================================================================

fn test_btree_splicing() -> Check {
    let mut master = BTreeMap::from([(1, "one"), (2, "two")]);
    let mut backup = BTreeMap::from([(4, "three")]);
    if let Some((_, value)) = backup.remove_entry(&4) {
        master.insert(3, value);
    }
    check_eq!(master, BTreeMap::from([(1, "one"), (2, "two"), (3, "three")]));
    check!(backup.is_empty());

    let mut src = BTreeSet::from([1, 3, 5]);
    let mut dst = BTreeSet::from([2, 4, 5]);
    dst.append(&mut src);
    check_eq!(dst, BTreeSet::from([1, 2, 3, 4, 5]));
    check!(src.is_empty());
    Ok(())
}

fn test_parallel_search() -> Check {
    let large = vec![1; 100];
    let found = large.par_iter().position_any(|&v| v == 1);
    check!(found.is_some());

    let total: i64 = (1..=1000i64).into_par_iter().map(|n| n * 2).sum();
    check_eq!(total, 1_001_000);
    Ok(())
}

fn test_filesystem_probe() -> Check {
    check!(!Path::new("some_cOmpLiCaTed_filename").exists());
    check!(std::env::temp_dir().is_dir());
    Ok(())
}
