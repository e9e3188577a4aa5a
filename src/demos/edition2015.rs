//! Rust 2015: ownership, smart pointers, closures, traits and the
//! concurrency primitives that shipped with 1.0.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crossbeam::channel;
use lazy_static::lazy_static;

use crate::harness::Check;
use crate::runner::Example;
use crate::{check, check_eq, check_ne, examples};

pub fn examples() -> Vec<Example> {
    examples![
        test_move_semantics,
        test_move_into_function,
        test_copy_and_clone,
        test_box_unique_ownership,
        test_rc_shared_ownership,
        test_weak_references,
        test_refcell_interior_mutability,
        test_closures,
        test_generic_functions,
        test_variadic_macros,
        test_enum_discriminants,
        test_tuple_destructuring,
        test_fixed_arrays,
        test_for_loops,
        test_hash_containers,
        test_raw_string_literals,
        test_threads,
        test_channel_promise,
        test_const_fn,
        test_trait_objects,
        test_display_to_string,
        test_duration_arithmetic,
        test_lazy_globals,
    ]
}

// ============================================================================
// Example: Move Semantics
// ============================================================================

fn test_move_semantics() -> Check {
    let s = String::from("hello");
    let moved = s; // `s` is unusable from here on
    check_eq!(moved, "hello");

    // mem::take moves the contents out and leaves a valid empty value behind
    let mut source = vec![1, 2, 3];
    let taken = std::mem::take(&mut source);
    check!(source.is_empty());
    check_eq!(taken, vec![1, 2, 3]);
    Ok(())
}

struct Buffer {
    data: Vec<u8>,
}

fn consume(buffer: Buffer) -> usize {
    buffer.data.len()
}

fn test_move_into_function() -> Check {
    let buffer = Buffer { data: vec![0; 16] };
    check_eq!(consume(buffer), 16);
    Ok(())
}

// ============================================================================
// Example: Copy vs Clone
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
struct Point {
    x: i32,
    y: i32,
}

fn test_copy_and_clone() -> Check {
    let a = Point { x: 1, y: 2 };
    let mut b = a; // implicit bitwise copy
    b.x = 10;
    check_eq!(a.x, 1);
    check_eq!(b, Point { x: 10, y: 2 });

    let original = vec![String::from("a")];
    let mut cloned = original.clone();
    cloned.push(String::from("b"));
    check_eq!(original.len(), 1);
    check_eq!(cloned.len(), 2);
    Ok(())
}

// ============================================================================
// Example: Smart Pointers
// ============================================================================

fn test_box_unique_ownership() -> Check {
    let mut slot: Option<Box<i32>> = Some(Box::new(5));
    let owner = slot.take();
    check!(slot.is_none());
    check_eq!(owner.as_deref(), Some(&5));

    let mut boxed = Box::new(vec![1]);
    boxed.push(2);
    check_eq!(*boxed, vec![1, 2]);
    Ok(())
}

fn test_rc_shared_ownership() -> Check {
    let first = Rc::new(String::from("shared"));
    check_eq!(Rc::strong_count(&first), 1);
    {
        let second = Rc::clone(&first);
        check_eq!(Rc::strong_count(&first), 2);
        check!(Rc::ptr_eq(&first, &second));
    }
    check_eq!(Rc::strong_count(&first), 1);
    Ok(())
}

struct TreeNode {
    value: i32,
    parent: RefCell<Weak<TreeNode>>,
    children: RefCell<Vec<Rc<TreeNode>>>,
}

impl TreeNode {
    fn new(value: i32) -> Rc<Self> {
        Rc::new(TreeNode {
            value,
            parent: RefCell::new(Weak::new()),
            children: RefCell::new(Vec::new()),
        })
    }

    fn add_child(parent: &Rc<TreeNode>, value: i32) -> Rc<TreeNode> {
        let child = TreeNode::new(value);
        *child.parent.borrow_mut() = Rc::downgrade(parent);
        parent.children.borrow_mut().push(Rc::clone(&child));
        child
    }
}

fn test_weak_references() -> Check {
    let root = TreeNode::new(1);
    let child = TreeNode::add_child(&root, 2);

    let parent_value = child.parent.borrow().upgrade().map(|p| p.value);
    check_eq!(parent_value, Some(1));
    check_eq!(child.value, 2);
    check_eq!(Rc::weak_count(&root), 1);
    check_eq!(root.children.borrow().len(), 1);

    // the parent link does not keep the root alive
    drop(root);
    check!(child.parent.borrow().upgrade().is_none());
    Ok(())
}

fn test_refcell_interior_mutability() -> Check {
    let log = RefCell::new(Vec::new());
    log.borrow_mut().push("first");
    log.borrow_mut().push("second");
    check_eq!(log.borrow().len(), 2);

    let reader = log.borrow();
    check!(log.try_borrow_mut().is_err());
    drop(reader);
    check!(log.try_borrow_mut().is_ok());
    Ok(())
}

// ============================================================================
// Example: Closures
// ============================================================================

fn test_closures() -> Check {
    let offset = 10;
    let add_offset = |x: i32| x + offset;
    check_eq!(add_offset(5), 15);

    let mut calls = 0;
    let mut count = || calls += 1;
    count();
    count();
    check_eq!(calls, 2);

    let name = String::from("owned");
    let len = move || name.len();
    check_eq!(len(), 5);
    Ok(())
}

// ============================================================================
// Example: Generics and Macros
// ============================================================================

fn largest<T: PartialOrd + Copy>(items: &[T]) -> Option<T> {
    let mut iter = items.iter().copied();
    let first = iter.next()?;
    Some(iter.fold(first, |max, x| if x > max { x } else { max }))
}

fn test_generic_functions() -> Check {
    check_eq!(largest(&[3, 7, 2]), Some(7));
    check_eq!(largest(&[1.5, -2.0]), Some(1.5));
    check_eq!(largest::<char>(&[]), None);
    Ok(())
}

// Recursion over the argument list stands in for a variadic function.
macro_rules! sum {
    () => { 0 };
    ($head:expr $(, $tail:expr)*) => { $head + sum!($($tail),*) };
}

fn test_variadic_macros() -> Check {
    check_eq!(sum!(1, 2, 3, 4), 10);
    check_eq!(sum!(7), 7);
    check_eq!(sum!(), 0);
    Ok(())
}

// ============================================================================
// Example: Enums, Tuples, Arrays
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Red = 0xff0000,
    Green = 0x00ff00,
    Blue = 0x0000ff,
}

fn test_enum_discriminants() -> Check {
    check_eq!(Color::Green as u32, 0x00ff00);
    check_ne!(Color::Red, Color::Blue);
    Ok(())
}

fn min_max(values: &[i32]) -> (i32, i32) {
    values
        .iter()
        .fold((i32::MAX, i32::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

fn test_tuple_destructuring() -> Check {
    let (min, max) = min_max(&[4, -1, 9]);
    check_eq!((min, max), (-1, 9));

    let (a, _, c) = (1, "ignored", 3.5);
    check_eq!(a, 1);
    check_eq!(c, 3.5);
    Ok(())
}

fn test_fixed_arrays() -> Check {
    let arr = [1, 2, 3];
    check_eq!(arr.len(), 3);

    let zeros = [0u8; 4];
    check_eq!(zeros.iter().sum::<u8>(), 0);
    check_eq!(arr.iter().rev().collect::<Vec<_>>(), vec![&3, &2, &1]);
    Ok(())
}

fn test_for_loops() -> Check {
    let mut total = 0;
    for n in 1..=4 {
        total += n;
    }
    check_eq!(total, 10);

    let words = vec!["a", "b"];
    let mut joined = String::new();
    for (i, word) in words.iter().enumerate() {
        joined.push_str(&format!("{}{}", i, word));
    }
    check_eq!(joined, "0a1b");
    Ok(())
}

// ============================================================================
// Example: Collections and Strings
// ============================================================================

fn test_hash_containers() -> Check {
    let mut scores: HashMap<&str, i32> = HashMap::new();
    scores.insert("alice", 3);
    *scores.entry("alice").or_insert(0) += 2;
    scores.entry("bob").or_insert(1);
    check_eq!(scores["alice"], 5);
    check_eq!(scores.len(), 2);

    let set: HashSet<i32> = [1, 2, 2, 3].iter().copied().collect();
    check_eq!(set.len(), 3);
    check!(set.contains(&2));
    Ok(())
}

fn test_raw_string_literals() -> Check {
    let raw = r"C:\path\no\escapes";
    check_eq!(raw.len(), 18);
    check!(raw.contains('\\'));

    let quoted = r#"say "hi""#;
    check_eq!(quoted, "say \"hi\"");
    Ok(())
}

// ============================================================================
// Example: Threads and Channels
// ============================================================================

fn test_threads() -> Check {
    let counter = Arc::new(Mutex::new(0));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let counter = Arc::clone(&counter);
            thread::spawn(move || {
                for _ in 0..100 {
                    *counter.lock().expect("counter lock poisoned") += 1;
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker panicked");
    }
    check_eq!(*counter.lock().expect("counter lock poisoned"), 400);
    Ok(())
}

// A bounded(1) channel plays the promise/future pair: one write, one read.
fn test_channel_promise() -> Check {
    let (promise, future) = channel::bounded::<i32>(1);
    let worker = thread::spawn(move || {
        promise.send(6 * 7).expect("receiver dropped");
    });

    let answer = future.recv().expect("sender dropped before sending");
    worker.join().expect("worker panicked");
    check_eq!(answer, 42);
    check!(future.recv().is_err());
    Ok(())
}

// ============================================================================
// Example: Compile-time Functions
// ============================================================================

const fn square(n: u32) -> u32 {
    n * n
}

const AREA: u32 = square(12);

fn test_const_fn() -> Check {
    check_eq!(AREA, 144);
    check_eq!(square(3), 9);
    Ok(())
}

// ============================================================================
// Example: Traits
// ============================================================================

trait Shape {
    fn area(&self) -> f64;

    fn name(&self) -> &'static str {
        "shape"
    }
}

struct Square(f64);
struct Circle(f64);

impl Shape for Square {
    fn area(&self) -> f64 {
        self.0 * self.0
    }

    fn name(&self) -> &'static str {
        "square"
    }
}

impl Shape for Circle {
    fn area(&self) -> f64 {
        std::f64::consts::PI * self.0 * self.0
    }
}

fn test_trait_objects() -> Check {
    let shapes: Vec<Box<dyn Shape>> = vec![Box::new(Square(2.0)), Box::new(Circle(1.0))];

    let names: Vec<_> = shapes.iter().map(|s| s.name()).collect();
    check_eq!(names, vec!["square", "shape"]);

    let total: f64 = shapes.iter().map(|s| s.area()).sum();
    check!((total - (4.0 + std::f64::consts::PI)).abs() < 1e-12);
    Ok(())
}

struct Version {
    major: u32,
    minor: u32,
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}", self.major, self.minor)
    }
}

fn test_display_to_string() -> Check {
    check_eq!(42.to_string(), "42");
    check_eq!(Version { major: 1, minor: 0 }.to_string(), "v1.0");
    check_eq!("7".parse::<i32>(), Ok(7));
    Ok(())
}

fn test_duration_arithmetic() -> Check {
    let total = Duration::from_millis(1500) + Duration::from_secs(1);
    check_eq!(total.as_millis(), 2500);
    check_eq!(total.as_secs(), 2);
    check!(Duration::from_secs(1) > Duration::from_millis(999));
    Ok(())
}

// ============================================================================
// Example: Lazily Initialized Globals
// ============================================================================

lazy_static! {
    static ref DEFAULT_PORTS: HashMap<&'static str, u16> = {
        let mut ports = HashMap::new();
        ports.insert("http", 80);
        ports.insert("https", 443);
        ports
    };
}

fn test_lazy_globals() -> Check {
    check_eq!(DEFAULT_PORTS.get("https"), Some(&443));
    check_eq!(DEFAULT_PORTS.len(), 2);
    Ok(())
}
