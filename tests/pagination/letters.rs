//! The five-letter walk-through: items [a, b, c, d, e], predicate keeps
//! {a, c, e}, page size 2.

use crate::common::*;
use cairn::{assemble, CursorPosition, MemorySession, ResultIterator};

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
struct Letter {
    id: String,
}

impl Entity for Letter {
    const KIND: &'static str = "Letter";

    fn id(&self) -> &str {
        &self.id
    }
}

fn keep(letter: &Letter) -> bool {
    matches!(letter.id.as_str(), "a" | "c" | "e")
}

fn store() -> MemoryDatastore {
    let store = MemoryDatastore::new();
    store.register_kind(EntityKind::of::<Letter>()).unwrap();
    let mut session = MemorySession::new(store.clone());
    for id in ["a", "b", "c", "d", "e"] {
        session.save(&Letter { id: id.into() }).unwrap();
    }
    store
}

fn position(cursor: &Cursor) -> Option<String> {
    CursorPosition::decode(cursor).unwrap().at
}

#[test]
fn iterator_cursor_tracks_unconsumed_item() {
    let mut session = MemorySession::new(store());
    let query = session.query::<Letter>(None).unwrap();
    let mut iter = ResultIterator::over_containers(query, keep);

    assert_eq!(position(iter.cursor()).as_deref(), Some("a"));
    assert_eq!(iter.next().unwrap().id, "a");
    // 'b' is skipped; the cursor sits before 'c'.
    assert_eq!(position(iter.cursor()).as_deref(), Some("c"));
    assert_eq!(iter.next().unwrap().id, "c");
    assert_eq!(position(iter.cursor()).as_deref(), Some("e"));
    assert_eq!(iter.next().unwrap().id, "e");
    assert!(!iter.has_next());
    assert_eq!(position(iter.cursor()), None);
}

#[test]
fn two_pages_of_two() {
    let store = store();
    let mut session = MemorySession::new(store.clone());

    let query = session.query::<Letter>(None).unwrap();
    let mut iter = ResultIterator::over_containers(query, keep);
    let first = assemble(Some(&Pagination::new(2)), &mut iter);

    let first_ids: Vec<&str> = first.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(first_ids, vec!["a", "c"]);
    let page = first.pagination().unwrap();
    assert_eq!(page.current().map(position), Some(Some("a".to_string())));
    assert_eq!(page.next().map(position), Some(Some("e".to_string())));

    let request = page.next_page().unwrap();
    let query = session.query::<Letter>(request.current()).unwrap();
    let mut iter = ResultIterator::over_containers(query, keep);
    let second = assemble(Some(&request), &mut iter);

    let second_ids: Vec<&str> = second.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(second_ids, vec!["e"]);
    assert!(second.pagination().unwrap().next().is_none());
}

#[test]
fn unbounded_call_returns_every_match() {
    let mut session = MemorySession::new(store());
    let query = session.query::<Letter>(None).unwrap();
    let mut iter = ResultIterator::over_containers(query, keep);

    let all = assemble(None, &mut iter);
    assert_eq!(all.len(), 3);
    assert!(all.pagination().is_none());
}
