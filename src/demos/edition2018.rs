//! Rust 2018: `?`, `impl Trait`, `dyn Trait`, async/await and the pattern
//! and literal conveniences that arrived around the 2018 edition.

use std::fmt;
use std::num::ParseIntError;

use futures::future::{self, FutureExt};
use thiserror::Error;
use tokio::runtime::{Builder, Runtime};

use crate::harness::Check;
use crate::runner::Example;
use crate::{check, check_eq, check_fails, examples};

pub fn examples() -> Vec<Example> {
    examples![
        test_question_mark_operator,
        test_impl_trait,
        test_dyn_trait,
        test_async_await,
        test_async_oneshot,
        test_futures_combinators,
        test_u128,
        test_non_lexical_lifetimes,
        test_raw_identifiers,
        test_matches_macro,
        test_slice_patterns,
        test_closure_capture_initializers,
        test_try_from,
        test_numeric_literals,
    ]
}

// ============================================================================
// Example: Error Propagation with `?`
// ============================================================================

#[derive(Error, Debug)]
enum ParsePairError {
    #[error("missing ',' separator")]
    MissingSeparator,
    #[error("bad number: {0}")]
    BadNumber(#[from] ParseIntError),
}

fn parse_pair(input: &str) -> Result<(i32, i32), ParsePairError> {
    let (left, right) = input
        .split_once(',')
        .ok_or(ParsePairError::MissingSeparator)?;
    Ok((left.trim().parse()?, right.trim().parse()?))
}

fn test_question_mark_operator() -> Check {
    check_eq!(parse_pair("3, 4").ok(), Some((3, 4)));
    check!(matches!(parse_pair("3 4"), Err(ParsePairError::MissingSeparator)));
    check!(matches!(parse_pair("x,4"), Err(ParsePairError::BadNumber(_))));
    check_fails!(|| parse_pair("1;2"));
    Ok(())
}

// ============================================================================
// Example: impl Trait and dyn Trait
// ============================================================================

fn evens(limit: u32) -> impl Iterator<Item = u32> {
    (0..limit).filter(|n| n % 2 == 0)
}

fn make_adder(n: i32) -> impl Fn(i32) -> i32 {
    move |x| x + n
}

fn test_impl_trait() -> Check {
    check_eq!(evens(7).collect::<Vec<_>>(), vec![0, 2, 4, 6]);
    check_eq!(make_adder(3)(4), 7);
    Ok(())
}

fn describe(value: &dyn fmt::Debug) -> String {
    format!("{:?}", value)
}

fn test_dyn_trait() -> Check {
    let transforms: Vec<Box<dyn Fn(i32) -> i32>> =
        vec![Box::new(|x: i32| x + 1), Box::new(|x: i32| x * 10)];
    let results: Vec<i32> = transforms.iter().map(|f| f(2)).collect();
    check_eq!(results, vec![3, 20]);
    check_eq!(describe(&Some(1)), "Some(1)");
    Ok(())
}

// ============================================================================
// Example: async / await
// ============================================================================

fn runtime() -> Runtime {
    Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
}

async fn fetch_value(id: u32) -> u32 {
    tokio::task::yield_now().await;
    id * 10
}

fn test_async_await() -> Check {
    let rt = runtime();
    let (a, b) = rt.block_on(async { tokio::join!(fetch_value(1), fetch_value(2)) });
    check_eq!((a, b), (10, 20));

    let handle = rt.spawn(fetch_value(4));
    let spawned = rt.block_on(handle).expect("task panicked");
    check_eq!(spawned, 40);
    Ok(())
}

fn test_async_oneshot() -> Check {
    let rt = runtime();
    let received = rt.block_on(async {
        let (tx, rx) = tokio::sync::oneshot::channel();
        tokio::spawn(async move {
            let _ = tx.send("done");
        });
        rx.await
    });
    check_eq!(received.ok(), Some("done"));
    Ok(())
}

fn test_futures_combinators() -> Check {
    let total = futures::executor::block_on(async {
        let squares = future::join_all((1..=3).map(|n| async move { n * n })).await;
        squares.iter().sum::<i32>()
    });
    check_eq!(total, 14);

    let mapped = futures::executor::block_on(future::ready(5).map(|n| n + 1));
    check_eq!(mapped, 6);
    Ok(())
}

// ============================================================================
// Example: Numbers and Borrows
// ============================================================================

fn test_u128() -> Check {
    let big = u64::MAX as u128 * 4;
    check_eq!(big, 73_786_976_294_838_206_460);
    check_eq!(big.checked_mul(u128::MAX), None);
    Ok(())
}

fn test_non_lexical_lifetimes() -> Check {
    let mut scores = vec![1, 2, 3];
    let first = &scores[0];
    let snapshot = *first; // last use of the shared borrow
    scores.push(4);
    check_eq!(snapshot, 1);
    check_eq!(scores.len(), 4);
    Ok(())
}

fn r#match(needle: &str, haystack: &str) -> bool {
    haystack.contains(needle)
}

fn test_raw_identifiers() -> Check {
    check!(r#match("ell", "hello"));
    let r#type = "keyword as name";
    check_eq!(r#type.len(), 15);
    Ok(())
}

// ============================================================================
// Example: Patterns
// ============================================================================

#[derive(Debug)]
enum Token {
    Number(i64),
    Plus,
    Minus,
    Ident(String),
}

fn test_matches_macro() -> Check {
    let tokens = vec![
        Token::Number(2),
        Token::Plus,
        Token::Ident("x".to_string()),
        Token::Minus,
    ];
    let operators = tokens
        .iter()
        .filter(|t| matches!(t, Token::Plus | Token::Minus))
        .count();
    check_eq!(operators, 2);
    check!(matches!(tokens[0], Token::Number(n) if n > 0));
    check!(matches!(&tokens[2], Token::Ident(name) if name == "x"));
    Ok(())
}

fn describe_slice(values: &[i32]) -> String {
    match values {
        [] => "empty".to_string(),
        [only] => format!("one: {}", only),
        [first, .., last] => format!("{}..{}", first, last),
    }
}

fn test_slice_patterns() -> Check {
    check_eq!(describe_slice(&[]), "empty");
    check_eq!(describe_slice(&[7]), "one: 7");
    check_eq!(describe_slice(&[1, 2, 3, 9]), "1..9");
    Ok(())
}

// A block in front of a `move` closure gives it freshly computed captures.
fn test_closure_capture_initializers() -> Check {
    let factor = 3;
    let scale = {
        let factor = factor * 2;
        move |x: i32| x * factor
    };
    check_eq!(scale(5), 30);

    let data = vec![1, 2, 3];
    let total = {
        let data = data.clone();
        move || data.iter().sum::<i32>()
    };
    check_eq!(total(), 6);
    check_eq!(data.len(), 3);
    Ok(())
}

// ============================================================================
// Example: Conversions and Literals
// ============================================================================

#[derive(Debug, PartialEq)]
struct Percent(u8);

impl TryFrom<i32> for Percent {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        if (0..=100).contains(&value) {
            Ok(Percent(value as u8))
        } else {
            Err(format!("{} is out of range", value))
        }
    }
}

fn test_try_from() -> Check {
    check_eq!(Percent::try_from(42), Ok(Percent(42)));
    check!(Percent::try_from(140).is_err());
    check!(u8::try_from(300i32).is_err());
    check_eq!(i16::try_from(1000i32).ok(), Some(1000));
    Ok(())
}

fn test_numeric_literals() -> Check {
    check_eq!(0b1111_0100, 244);
    check_eq!(0o17, 15);
    check_eq!(1_000_000u32, 1000000);
    check_eq!(0xFFu8, u8::MAX);
    check_eq!(1e3, 1000.0);
    Ok(())
}
