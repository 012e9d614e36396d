//! StoreHandle and DaoTransaction state rules

use crate::common::*;
use cairn::{DaoTransaction, MemorySession, StoreHandle, TransactionStatus};

#[test]
fn plain_handle_refuses_commit_and_rollback() {
    let factory = factory();
    let dao = note_dao(&factory);
    let mut handle = factory.begin();
    handle.session_mut().save(&Note::new("a", "x")).unwrap();

    assert!(matches!(handle.commit(), Err(Error::TransactionState { .. })));
    assert!(matches!(handle.rollback(), Err(Error::TransactionState { .. })));

    // The plain write went through regardless.
    assert!(dao.get("a").unwrap().is_some());
}

#[test]
fn plain_handle_cannot_become_dao_transaction() {
    let factory = factory();
    let handle = factory.begin();
    assert!(matches!(
        DaoTransaction::new(handle),
        Err(Error::TransactionState { .. })
    ));
}

#[test]
fn rollback_after_commit_is_quiet() {
    let factory = factory();
    let dao = note_dao(&factory);
    let mut txn = factory.begin_transaction().unwrap();

    txn.session_mut().save(&Note::new("a", "x")).unwrap();
    txn.commit().unwrap();
    txn.rollback().unwrap();
    txn.commit().unwrap();

    assert!(!txn.is_active());
    assert_eq!(
        txn.handle().session().transaction_status(),
        Some(TransactionStatus::Committed)
    );
    assert!(dao.get("a").unwrap().is_some());
}

#[test]
fn dropping_open_transaction_rolls_back() {
    let factory = factory();
    let dao = note_dao(&factory);
    {
        let mut txn = factory.transaction().unwrap();
        dao.put_in(Some(&mut txn), &Note::new("a", "x")).unwrap();
        assert!(txn.is_active());
    }
    assert!(dao.get("a").unwrap().is_none());
}

#[test]
fn handle_over_finished_session_is_a_no_op() {
    let factory = factory();
    note_dao(&factory);
    let mut session = MemorySession::begin(factory.datastore().clone());
    session.rollback_transaction().unwrap();

    let mut handle = StoreHandle::new(session, true);
    assert!(!handle.is_active());
    handle.commit().unwrap();
    handle.rollback().unwrap();
    assert_eq!(
        handle.session().transaction_status(),
        Some(TransactionStatus::RolledBack)
    );
}

#[test]
fn finished_transaction_rejects_further_work() {
    let factory = factory();
    let dao = note_dao(&factory);
    let mut txn = factory.transaction().unwrap();
    txn.commit().unwrap();

    let err = dao.put_in(Some(&mut txn), &Note::new("late", "x")).unwrap_err();
    assert!(matches!(err, Error::TransactionNotActive));
}
