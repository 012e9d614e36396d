//! Filtered, look-ahead result iterator
//!
//! `ResultIterator` wraps raw query results and a predicate, and keeps one
//! matching value buffered ahead of the caller. The cursor it reports is
//! captured *before* each raw advance, matching or not, so at any observable
//! point it is the position from which the buffered (not yet returned) value
//! would be read again. Resuming a query at that cursor therefore continues
//! exactly where the caller stopped consuming.
//!
//! State transitions:
//! - `Unprimed` → `Buffered` | `Exhausted` (construction)
//! - `Buffered` → `Buffered` | `Exhausted` (each `next()`)
//! - `Exhausted` is terminal
//!
//! Results are read-only; [`ResultIterator::remove`] always fails.

use std::iter::FusedIterator;

use cairn_core::{Container, Cursor, Error, QueryResultIterator, Result};

enum Lookahead<T> {
    Unprimed,
    Buffered(T),
    Exhausted,
}

/// Predicate-filtered query results with a one-item look-ahead
///
/// Not shared between threads; each query builds its own.
pub struct ResultIterator<'a, S, T>
where
    S: QueryResultIterator,
{
    source: S,
    extract: fn(S::Item) -> T,
    predicate: Box<dyn Fn(&T) -> bool + 'a>,
    lookahead: Lookahead<T>,
    cursor: Cursor,
}

fn identity<T>(item: T) -> T {
    item
}

impl<'a, S, T> ResultIterator<'a, S, T>
where
    S: QueryResultIterator<Item = T>,
{
    /// Iterate over raw items that are already the value type
    pub fn new(source: S, predicate: impl Fn(&T) -> bool + 'a) -> Self {
        Self::build(source, identity, predicate)
    }

    /// Iterate over every raw item
    pub fn unfiltered(source: S) -> Self {
        Self::new(source, |_| true)
    }
}

impl<'a, S, T> ResultIterator<'a, S, T>
where
    S: QueryResultIterator,
    S::Item: Container<Entity = T>,
{
    /// Iterate over raw items that wrap the value type
    pub fn over_containers(source: S, predicate: impl Fn(&T) -> bool + 'a) -> Self {
        Self::build(source, <S::Item as Container>::into_entity, predicate)
    }
}

impl<'a, S, T> ResultIterator<'a, S, T>
where
    S: QueryResultIterator,
{
    fn build(source: S, extract: fn(S::Item) -> T, predicate: impl Fn(&T) -> bool + 'a) -> Self {
        let cursor = source.cursor();
        let mut iter = ResultIterator {
            source,
            extract,
            predicate: Box::new(predicate),
            lookahead: Lookahead::Unprimed,
            cursor,
        };
        iter.advance();
        iter
    }

    /// Pull raw items until one matches or the source runs dry
    fn advance(&mut self) {
        loop {
            self.cursor = self.source.cursor();
            match self.source.next() {
                Some(raw) => {
                    let value = (self.extract)(raw);
                    if (self.predicate)(&value) {
                        self.lookahead = Lookahead::Buffered(value);
                        return;
                    }
                }
                None => {
                    self.lookahead = Lookahead::Exhausted;
                    return;
                }
            }
        }
    }

    /// Whether a matching value is buffered
    pub fn has_next(&self) -> bool {
        matches!(self.lookahead, Lookahead::Buffered(_))
    }

    /// The buffered value, without consuming it
    pub fn peek(&self) -> Option<&T> {
        match &self.lookahead {
            Lookahead::Buffered(value) => Some(value),
            _ => None,
        }
    }

    /// Position from which the buffered value would be read again
    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// Results are read-only
    ///
    /// # Errors
    /// Always `UnsupportedOperation`.
    pub fn remove(&mut self) -> Result<()> {
        Err(Error::UnsupportedOperation { operation: "remove" })
    }
}

impl<'a, S, T> Iterator for ResultIterator<'a, S, T>
where
    S: QueryResultIterator,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        match std::mem::replace(&mut self.lookahead, Lookahead::Exhausted) {
            Lookahead::Buffered(value) => {
                self.advance();
                Some(value)
            }
            Lookahead::Unprimed => {
                self.advance();
                self.next()
            }
            Lookahead::Exhausted => None,
        }
    }
}

impl<'a, S, T> FusedIterator for ResultIterator<'a, S, T> where S: QueryResultIterator {}
