//! Isolation and first-committer-wins conflicts

use crate::common::*;
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn uncommitted_writes_are_private() {
    let factory = factory();
    let dao = note_dao(&factory);
    dao.put(&Note::new("a", "before")).unwrap();

    let mut txn = factory.transaction().unwrap();
    dao.put_in(Some(&mut txn), &Note::new("a", "after")).unwrap();
    dao.put_in(Some(&mut txn), &Note::new("b", "new")).unwrap();

    assert_eq!(dao.get("a").unwrap().unwrap().body, "before");
    assert_eq!(dao.get_in(Some(&mut txn), "a").unwrap().unwrap().body, "after");
    assert_eq!(dao.find_all().unwrap().len(), 1);
    assert_eq!(dao.find_in(Some(&mut txn), None, |_| true).unwrap().len(), 2);

    txn.commit().unwrap();
    assert_eq!(dao.get("a").unwrap().unwrap().body, "after");
    assert_eq!(dao.find_all().unwrap().len(), 2);
}

#[test]
fn paging_inside_a_transaction_sees_pending_deletes() {
    let factory = factory();
    let dao = note_dao(&factory);
    seed_notes(&dao, 6);

    let mut txn = factory.transaction().unwrap();
    dao.delete_in(Some(&mut txn), "n01").unwrap();

    let first = dao
        .find_in(Some(&mut txn), Some(&Pagination::new(2)), |_| true)
        .unwrap();
    assert_eq!(ids(&first), vec!["n00", "n02"]);

    let request = first.pagination().unwrap().next_page().unwrap();
    let second = dao.find_in(Some(&mut txn), Some(&request), |_| true).unwrap();
    assert_eq!(ids(&second), vec!["n03", "n04"]);
}

#[test]
fn read_then_stale_commit_conflicts() {
    let factory = factory();
    let dao = note_dao(&factory);
    dao.put(&Note::new("a", "v1")).unwrap();

    let mut first = factory.transaction().unwrap();
    let mut second = factory.transaction().unwrap();

    let mut note = dao.get_in(Some(&mut first), "a").unwrap().unwrap();
    dao.get_in(Some(&mut second), "a").unwrap();

    dao.put_in(Some(&mut second), &Note::new("a", "second")).unwrap();
    second.commit().unwrap();

    note.body = "first".into();
    dao.put_in(Some(&mut first), &note).unwrap();
    let err = first.commit().unwrap_err();
    assert!(matches!(err, Error::TransactionConflict { .. }));
    assert!(!first.is_active());

    assert_eq!(dao.get("a").unwrap().unwrap().body, "second");
}

#[test]
fn concurrent_increments_serialize_through_conflicts() {
    let factory = factory();
    let dao = account_dao(&factory);
    dao.put(&Account { id: "acc".into(), balance: 0 }).unwrap();

    let threads = 4;
    let per_thread = 10;
    let barrier = Arc::new(Barrier::new(threads));

    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let dao = dao.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..per_thread {
                    loop {
                        let mut txn = dao.factory().transaction().unwrap();
                        let mut account = dao.get_in(Some(&mut txn), "acc").unwrap().unwrap();
                        account.balance += 1;
                        dao.put_in(Some(&mut txn), &account).unwrap();
                        match txn.commit() {
                            Ok(()) => break,
                            Err(Error::TransactionConflict { .. }) => continue,
                            Err(other) => panic!("unexpected error: {other:?}"),
                        }
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let total = (threads * per_thread) as i64;
    assert_eq!(dao.get("acc").unwrap().unwrap().balance, total);
}
