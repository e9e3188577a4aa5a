//! Pull-based lazy generator.
//!
//! A [`Generator`] wraps a producer body that is resumed one step at a time.
//! Each step either yields a value or finishes the sequence. The suspension
//! points are explicit states rather than language-level coroutines:
//!
//! ```text
//! NotStarted --resume--> Ready --advance--> Pending --resume--> ...
//!      \                                       /
//!       `------------- body returns None -----'--> Completed
//! ```

use std::fmt;
use std::iter::FusedIterator;
use std::ops::Add;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorState {
    /// Constructed, body not entered yet.
    NotStarted,
    /// Suspended at a yield point with the value still in the slot.
    Ready,
    /// Suspended at a yield point, value already handed out.
    Pending,
    /// The body ran to completion. Also reported by an empty handle.
    Completed,
}

type Body<T> = Box<dyn FnMut() -> Option<T>>;

pub struct Generator<T> {
    body: Option<Body<T>>,
    state: GeneratorState,
    slot: Option<T>,
}

impl<T> Generator<T> {
    pub fn new<F>(body: F) -> Self
    where
        F: FnMut() -> Option<T> + 'static,
    {
        Generator {
            body: Some(Box::new(body)),
            state: GeneratorState::NotStarted,
            slot: None,
        }
    }

    /// A handle that owns no producer. Behaves like a completed generator.
    pub fn empty() -> Self {
        Generator {
            body: None,
            state: GeneratorState::Completed,
            slot: None,
        }
    }

    pub fn state(&self) -> GeneratorState {
        self.state
    }

    pub fn is_completed(&self) -> bool {
        self.state == GeneratorState::Completed
    }

    /// Produces the next value, or `None` once the sequence is over.
    pub fn advance(&mut self) -> Option<T> {
        match self.state {
            GeneratorState::Completed => None,
            GeneratorState::Ready => {
                self.state = GeneratorState::Pending;
                self.slot.take()
            }
            GeneratorState::NotStarted | GeneratorState::Pending => {
                let value = self.resume()?;
                self.state = GeneratorState::Pending;
                Some(value)
            }
        }
    }

    /// Looks at the next value without consuming it.
    pub fn peek(&mut self) -> Option<&T> {
        if matches!(
            self.state,
            GeneratorState::NotStarted | GeneratorState::Pending
        ) {
            let value = self.resume()?;
            self.slot = Some(value);
            self.state = GeneratorState::Ready;
        }
        self.slot.as_ref()
    }

    /// Moves the producer out, leaving `self` as an empty handle.
    pub fn transfer(&mut self) -> Self {
        std::mem::take(self)
    }

    // Runs the body up to its next yield point. Finishing drops the body.
    fn resume(&mut self) -> Option<T> {
        let Some(body) = self.body.as_mut() else {
            self.state = GeneratorState::Completed;
            return None;
        };
        match body() {
            Some(value) => Some(value),
            None => {
                self.body = None;
                self.slot = None;
                self.state = GeneratorState::Completed;
                None
            }
        }
    }
}

impl<T> Default for Generator<T> {
    fn default() -> Self {
        Generator::empty()
    }
}

impl<T> Iterator for Generator<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.advance()
    }
}

impl<T> FusedIterator for Generator<T> {}

impl<T: fmt::Debug> fmt::Debug for Generator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("state", &self.state)
            .field("slot", &self.slot)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

/// Yields `start, start + 1, ..` up to but excluding `end`.
pub fn range_gen<T>(start: T, end: T) -> Generator<T>
where
    T: Copy + PartialOrd + Add<Output = T> + From<u8> + 'static,
{
    let mut current = start;
    Generator::new(move || {
        if current < end {
            let value = current;
            current = current + T::from(1);
            Some(value)
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_range_collects_in_order() {
        let mut g = range_gen(0, 5);
        let mut values = Vec::new();
        while let Some(n) = g.advance() {
            values.push(n);
        }
        assert_eq!(values, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_empty_tail_after_completion() {
        let mut g = range_gen(0u64, 2);
        assert_eq!(g.advance(), Some(0));
        assert_eq!(g.advance(), Some(1));
        for _ in 0..5 {
            assert_eq!(g.advance(), None);
            assert_eq!(g.state(), GeneratorState::Completed);
        }
    }

    #[test]
    fn test_body_not_entered_until_first_advance() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let mut g = Generator::new(move || {
            counter.set(counter.get() + 1);
            None::<i32>
        });

        assert_eq!(calls.get(), 0);
        assert_eq!(g.state(), GeneratorState::NotStarted);
        assert_eq!(g.advance(), None);
        assert_eq!(calls.get(), 1);

        // Completed generators never resume the body again.
        assert_eq!(g.advance(), None);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_state_transitions() {
        let mut g = range_gen(10i32, 12);
        assert_eq!(g.state(), GeneratorState::NotStarted);
        assert_eq!(g.peek(), Some(&10));
        assert_eq!(g.state(), GeneratorState::Ready);
        assert_eq!(g.advance(), Some(10));
        assert_eq!(g.state(), GeneratorState::Pending);
        assert_eq!(g.advance(), Some(11));
        assert_eq!(g.advance(), None);
        assert!(g.is_completed());
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut g = range_gen(0u8, 3);
        assert_eq!(g.peek(), Some(&0));
        assert_eq!(g.peek(), Some(&0));
        assert_eq!(g.advance(), Some(0));
        assert_eq!(g.advance(), Some(1));
        assert_eq!(g.peek(), Some(&2));
        assert_eq!(g.advance(), Some(2));
        assert_eq!(g.peek(), None);
        assert_eq!(g.advance(), None);
    }

    #[test]
    fn test_transfer_moves_producer() {
        let mut g = range_gen(0, 5);
        assert_eq!(g.advance(), Some(0));

        let mut moved = g.transfer();
        assert_eq!(g.advance(), None);
        assert_eq!(g.peek(), None);
        assert_eq!(g.state(), GeneratorState::Completed);

        assert_eq!(moved.by_ref().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
        assert_eq!(moved.advance(), None);
    }

    #[test]
    fn test_default_is_empty_handle() {
        let mut g: Generator<String> = Generator::default();
        assert!(g.is_completed());
        assert_eq!(g.advance(), None);
    }

    #[test]
    fn test_iterator_adapters() {
        let evens: Vec<_> = range_gen(0i64, 10).filter(|n| n % 2 == 0).collect();
        assert_eq!(evens, vec![0, 2, 4, 6, 8]);

        let sum: u32 = range_gen(1u32, 5).sum();
        assert_eq!(sum, 10);
    }

    #[test]
    fn test_custom_body_with_state() {
        let mut pair = (0u64, 1u64);
        let fib = Generator::new(move || {
            let value = pair.0;
            pair = (pair.1, pair.0.checked_add(pair.1)?);
            Some(value)
        });
        let first: Vec<_> = fib.take(8).collect();
        assert_eq!(first, vec![0, 1, 1, 2, 3, 5, 8, 13]);
    }

    #[test]
    fn test_empty_range() {
        let mut g = range_gen(3, 3);
        assert_eq!(g.advance(), None);
        assert!(g.is_completed());
    }
}
