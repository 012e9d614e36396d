//! Page request and page response values
//!
//! A caller builds a [`Pagination`] before a query, the assembler returns a
//! copy of it with `current`, `next` and the returned count filled in. The
//! request instance is never mutated, so the caller keeps the pre-call state.
//!
//! Wire form (camelCase):
//!
//! ```text
//! { "pageSize": 20, "current": null, "next": "eyJrIjoi...", "returnedCount": 20 }
//! ```
//!
//! `current: null` means "start from the beginning", `next: null` on a
//! response means "no further pages".

use crate::cursor::Cursor;
use serde::{Deserialize, Serialize};

/// Page request/response value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    page_size: u32,
    #[serde(default)]
    current: Option<Cursor>,
    #[serde(default)]
    next: Option<Cursor>,
    #[serde(default)]
    returned_count: u32,
}

impl Pagination {
    /// Request the first page with `page_size` items
    pub fn new(page_size: u32) -> Self {
        Pagination {
            page_size,
            current: None,
            next: None,
            returned_count: 0,
        }
    }

    /// Request the page starting at `cursor`
    pub fn starting_at(page_size: u32, cursor: Cursor) -> Self {
        Pagination {
            current: Some(cursor),
            ..Pagination::new(page_size)
        }
    }

    /// Items per page
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Start of the current page, `None` for the first page
    pub fn current(&self) -> Option<&Cursor> {
        self.current.as_ref()
    }

    /// Start of the following page, `None` once exhausted
    pub fn next(&self) -> Option<&Cursor> {
        self.next.as_ref()
    }

    /// Number of items actually returned for this page
    pub fn returned_count(&self) -> u32 {
        self.returned_count
    }

    /// Whether a following page exists
    pub fn has_next_page(&self) -> bool {
        self.next.is_some()
    }

    /// Record the outcome of draining a page
    pub fn update(&mut self, current: Option<Cursor>, next: Option<Cursor>, returned: usize) {
        self.current = current;
        self.next = next;
        self.returned_count = u32::try_from(returned).unwrap_or(u32::MAX);
    }

    /// Request for the page after this one, if there is one
    pub fn next_page(&self) -> Option<Pagination> {
        self.next
            .clone()
            .map(|cursor| Pagination::starting_at(self.page_size, cursor))
    }
}

/// Ordered query results plus the pagination that produced them
///
/// `pagination` is `None` when the query ignored paging and drained
/// everything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResults<T> {
    items: Vec<T>,
    pagination: Option<Pagination>,
}

impl<T> PaginatedResults<T> {
    /// Results produced under `pagination`
    pub fn new(items: Vec<T>, pagination: Option<Pagination>) -> Self {
        PaginatedResults { items, pagination }
    }

    /// Empty results for an unpaginated query
    pub fn unpaginated() -> Self {
        PaginatedResults {
            items: Vec::new(),
            pagination: None,
        }
    }

    /// Append an item
    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Items in iteration order
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume, returning the items
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Pagination state after the call
    pub fn pagination(&self) -> Option<&Pagination> {
        self.pagination.as_ref()
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no items were returned
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over the items
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> Extend<T> for PaginatedResults<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl<T> IntoIterator for PaginatedResults<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a PaginatedResults<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
