//! The 2024 group: standard-library features stabilized during the 2024
//! edition cycle, plus the lazy generator. The crate builds on edition 2021,
//! so edition-gated syntax such as `let` chains is not shown here.

use std::collections::{BTreeMap, BTreeSet};
use std::ffi::CStr;
use std::f64::consts::{E, PI, SQRT_2};
use std::hint::black_box;
use std::iter;
use std::ops::Sub;
use std::ptr;
use std::sync::OnceLock;

use itertools::Itertools;
use rand::Rng;

use crate::generator::{range_gen, Generator, GeneratorState};
use crate::harness::Check;
use crate::runner::Example;
use crate::{check, check_eq, check_ne, examples};

pub fn examples() -> Vec<Example> {
    examples![
        test_lazy_generator,
        test_generator_transfer,
        test_generator_custom_body,
        test_trait_bounds,
        test_associated_types,
        test_scoped_loop_initializer,
        test_mutable_slices,
        test_bit_helpers,
        test_math_constants,
        test_const_evaluation,
        test_starts_ends_with,
        test_contains,
        test_overflow_safe_midpoint,
        test_byte_string_arrays,
        test_once_lock,
        test_option_predicates,
        test_random_branch,
        test_iterator_sources,
    ]
}

// ============================================================================
// Example: Lazy Generators
// ============================================================================

fn test_lazy_generator() -> Check {
    let mut g = range_gen(0, 5);
    let mut values = Vec::new();
    while let Some(v) = g.advance() {
        values.push(v);
    }
    check_eq!(values, vec![0, 1, 2, 3, 4]);
    check_eq!(g.advance(), None);
    check!(g.is_completed());
    Ok(())
}

fn test_generator_transfer() -> Check {
    let mut source = range_gen(10, 20);
    check_eq!(source.advance(), Some(10));

    let mut target = source.transfer();
    check_eq!(source.advance(), None);
    check_eq!(source.state(), GeneratorState::Completed);
    check_eq!(target.advance(), Some(11));
    Ok(())
}

fn test_generator_custom_body() -> Check {
    let mut words = vec!["apple", "pear"].into_iter();
    let mut lengths = Generator::new(move || words.next().map(str::len));

    check_eq!(lengths.state(), GeneratorState::NotStarted);
    check_eq!(lengths.peek(), Some(&5));
    check_eq!(lengths.state(), GeneratorState::Ready);

    let all: Vec<usize> = lengths.by_ref().collect();
    check_eq!(all, vec![5, 4]);
    check!(lengths.is_completed());
    Ok(())
}

// ============================================================================
// Example: Trait Bounds and Associated Types
// ============================================================================

trait SignedInteger: Copy + Sub<Output = Self> + From<i8> {}

impl<T> SignedInteger for T where T: Copy + Sub<Output = T> + From<i8> {}

fn decrement<T: SignedInteger>(value: T) -> T {
    value - T::from(1)
}

fn decrement_where<T>(value: T) -> T
where
    T: SignedInteger,
{
    value - T::from(1)
}

fn test_trait_bounds() -> Check {
    check_eq!(decrement(5i32), 4);
    check_eq!(decrement(0i64), -1);
    check_eq!(decrement_where(-7i16), -8);
    check_eq!(decrement_where(1.5f64), 0.5);
    Ok(())
}

trait Incrementable {
    type Output;

    fn incremented(&self) -> Self::Output;
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Counter {
    count: u32,
}

impl Incrementable for Counter {
    type Output = Counter;

    fn incremented(&self) -> Counter {
        Counter {
            count: self.count + 1,
        }
    }
}

impl Iterator for Counter {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.count < 3 {
            self.count += 1;
            Some(self.count)
        } else {
            None
        }
    }
}

fn test_associated_types() -> Check {
    let counter = Counter { count: 0 };
    check_eq!(counter.incremented(), Counter { count: 1 });
    check_eq!(counter.incremented().incremented().count, 2);
    check_eq!(counter.collect::<Vec<_>>(), vec![1, 2, 3]);
    Ok(())
}

// ============================================================================
// Example: Loops, Slices, Bits
// ============================================================================

fn test_scoped_loop_initializer() -> Check {
    let mut out = String::new();
    for e in {
        let v = vec![1, 2, 3];
        v
    } {
        out.push_str(&e.to_string());
    }
    check_eq!(out.as_str(), "123");
    check_eq!([1, 2, 3].iter().join(""), out);
    Ok(())
}

fn set_zero_then_sum(values: &mut [i32]) -> i32 {
    if let Some(first) = values.first_mut() {
        *first = 0;
    }
    values.iter().sum()
}

fn test_mutable_slices() -> Check {
    let mut small = [9, 2, 3];
    check_eq!(set_zero_then_sum(&mut small), 5);
    check_eq!(small[0], 0);

    let mut wide = vec![1, 5, 10, 11];
    check_eq!(set_zero_then_sum(&mut wide[..]), 26);
    check_eq!(set_zero_then_sum(&mut []), 0);
    Ok(())
}

fn test_bit_helpers() -> Check {
    let bits = 0b1111_0100u8;
    check_eq!(bits.count_ones(), 5);
    check_eq!(bits.leading_zeros(), 0);
    check_eq!(bits.trailing_zeros(), 2);
    check_eq!(1u32.rotate_left(3), 8);
    check!(16u32.is_power_of_two());
    check_eq!(17u32.next_power_of_two(), 32);
    Ok(())
}

fn test_math_constants() -> Check {
    check!(PI > 3.0 && PI < 3.2);
    check!((PI.cos() + 1.0).abs() < 1e-12);
    check!((E.ln() - 1.0).abs() < 1e-12);
    check!((SQRT_2 * SQRT_2 - 2.0).abs() < 1e-12);
    Ok(())
}

// ============================================================================
// Example: Compile-time Evaluation
// ============================================================================

const fn sqr(x: u32) -> u32 {
    x * x
}

const _: () = assert!(sqr(10) == 100);

const SIDE: u32 = sqr(4);

fn test_const_evaluation() -> Check {
    let grid = [0u8; SIDE as usize];
    check_eq!(grid.len(), 16);
    check_eq!(sqr(black_box(12)), 144);
    Ok(())
}

// ============================================================================
// Example: Std Helpers
// ============================================================================

fn test_starts_ends_with() -> Check {
    let line = "hello world";
    check!(line.starts_with("hello"));
    check!(line.ends_with("world"));
    check_eq!(line.strip_prefix("hello "), Some("world"));
    check_eq!(line.strip_suffix("moon"), None);
    check!([1, 2, 3].starts_with(&[1, 2]));
    Ok(())
}

fn test_contains() -> Check {
    let map = BTreeMap::from([("a", 1), ("b", 2)]);
    let set = BTreeSet::from([3, 5, 8]);
    check!(map.contains_key("a"));
    check!(!map.contains_key("z"));
    check!(set.contains(&5));
    check!((1..10).contains(&5));
    check!(!(1..10).contains(&10));
    check!("abc".contains('b'));
    check!([1, 2, 3].contains(&2));
    Ok(())
}

fn midpoint(a: i32, b: i32) -> i32 {
    ((i64::from(a) + i64::from(b)) / 2) as i32
}

fn test_overflow_safe_midpoint() -> Check {
    check_eq!(midpoint(2, 8), 5);
    check_eq!(midpoint(i32::MAX, i32::MAX - 2), i32::MAX - 1);
    check_eq!(midpoint(i32::MIN, i32::MAX), 0);
    check_eq!(i32::MAX.checked_add(1), None);
    Ok(())
}

fn test_byte_string_arrays() -> Check {
    let bytes: [u8; 4] = *b"foo\0";
    check_eq!(bytes, [b'f', b'o', b'o', 0]);

    let text = CStr::from_bytes_with_nul(&bytes).ok().and_then(|c| c.to_str().ok());
    check_eq!(text, Some("foo"));
    Ok(())
}

static GREETING: OnceLock<String> = OnceLock::new();

fn greeting() -> &'static String {
    GREETING.get_or_init(|| "ready".to_string())
}

fn test_once_lock() -> Check {
    check_eq!(greeting().as_str(), "ready");
    check!(ptr::eq(greeting(), greeting()));
    Ok(())
}

fn test_option_predicates() -> Check {
    check!(Some(4).is_some_and(|n| n % 2 == 0));
    check!(!None::<i32>.is_some_and(|n| n > 0));

    let parsed: Result<u8, _> = "42".parse::<u8>();
    check!(parsed.is_ok_and(|n| n == 42));
    check!("x".parse::<u8>().is_err_and(|_| true));
    Ok(())
}

fn test_random_branch() -> Check {
    let roll: u32 = rand::random();
    let parity = if roll % 2 == 0 { "even" } else { "odd" };
    check_eq!(roll % 2 == 0, parity == "even");

    let die = rand::thread_rng().gen_range(1..=6);
    check!((1..=6).contains(&die));
    check_ne!(die, 0);
    Ok(())
}

fn test_iterator_sources() -> Check {
    let powers: Vec<u32> =
        iter::successors(Some(1), |n| if *n < 1000 { Some(n * 10) } else { None }).collect();
    check_eq!(powers, vec![1, 10, 100, 1000]);

    let mut remaining = 3;
    let countdown: Vec<u32> = iter::from_fn(|| {
        if remaining == 0 {
            None
        } else {
            remaining -= 1;
            Some(remaining)
        }
    })
    .collect();
    check_eq!(countdown, vec![2, 1, 0]);
    Ok(())
}
