//! Page assembly
//!
//! Drains a [`ResultIterator`] into [`PaginatedResults`]. With no pagination
//! everything is drained and the result carries no pagination. With a
//! request, at most `page_size` items are drained and a copy of the request
//! is returned with `current`, `next` and the returned count filled in:
//!
//! - `current` is the iterator cursor before draining
//! - `next` is the iterator cursor after draining, or `None` when nothing
//!   matching remains
//!
//! The request itself is never mutated.

use cairn_core::{PaginatedResults, Pagination, QueryResultIterator};
use tracing::debug;

use crate::iterator::ResultIterator;

/// Assemble one page, or everything when `pagination` is `None`
pub fn assemble<S, T>(
    pagination: Option<&Pagination>,
    iter: &mut ResultIterator<'_, S, T>,
) -> PaginatedResults<T>
where
    S: QueryResultIterator,
{
    match pagination {
        None => drain_all(iter),
        Some(request) => assemble_page(request, iter),
    }
}

/// Drain every remaining item, ignoring paging
pub fn drain_all<S, T>(iter: &mut ResultIterator<'_, S, T>) -> PaginatedResults<T>
where
    S: QueryResultIterator,
{
    PaginatedResults::new(iter.collect(), None)
}

fn assemble_page<S, T>(request: &Pagination, iter: &mut ResultIterator<'_, S, T>) -> PaginatedResults<T>
where
    S: QueryResultIterator,
{
    let current = iter.cursor().clone();
    let items: Vec<T> = iter.by_ref().take(request.page_size() as usize).collect();
    let next = iter.has_next().then(|| iter.cursor().clone());

    debug!(
        page_size = request.page_size(),
        returned = items.len(),
        has_next = next.is_some(),
        "Assembled page"
    );

    let mut page = request.clone();
    page.update(Some(current), next, items.len());
    PaginatedResults::new(items, Some(page))
}
