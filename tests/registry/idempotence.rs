//! Registering the same kind more than once

use crate::common::*;
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn sequential_registration_calls_store_once() {
    let registry = EntityRegistry::new();
    let registrar = CountingRegistrar::default();

    assert!(registry.register_entity::<Note>(&registrar).unwrap());
    assert!(!registry.register_entity::<Note>(&registrar).unwrap());
    assert!(!registry
        .register(EntityKind::of::<Note>(), &registrar)
        .unwrap());

    assert_eq!(registrar.calls(), 1);
}

#[test]
fn concurrent_registration_calls_store_once() {
    for _ in 0..50 {
        let registry = Arc::new(EntityRegistry::new());
        let registrar = Arc::new(CountingRegistrar::default());
        let barrier = Arc::new(Barrier::new(2));

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let registrar = Arc::clone(&registrar);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    registry.register_entity::<Note>(registrar.as_ref()).unwrap()
                })
            })
            .collect();

        let performed: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(registrar.calls(), 1);
        assert_eq!(performed.iter().filter(|p| **p).count(), 1);
    }
}

#[test]
fn many_threads_many_kinds() {
    let registry = Arc::new(EntityRegistry::new());
    let store = MemoryDatastore::new();
    let threads = 8;
    let barrier = Arc::new(Barrier::new(threads));

    let handles: Vec<_> = (0..threads)
        .map(|i| {
            let registry = Arc::clone(&registry);
            let store = store.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                // A duplicate store registration would surface as DuplicateKind.
                if i % 2 == 0 {
                    registry.register_entity::<Note>(&store).unwrap();
                    registry.register_entity::<Account>(&store).unwrap();
                } else {
                    registry.register_entity::<Account>(&store).unwrap();
                    registry.register_entity::<Note>(&store).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(registry.len(), 2);
    assert!(store.is_registered("Note"));
    assert!(store.is_registered("Account"));
}

#[test]
fn daos_and_factory_share_registrations() {
    let factory = factory();

    let first = note_dao(&factory);
    let _second = note_dao(&factory);
    assert!(!factory.register::<Note>().unwrap());

    first.put(&Note::new("a", "x")).unwrap();
    assert_eq!(factory.registry().len(), 1);
}

#[test]
fn failed_registration_is_not_recorded() {
    let registry = EntityRegistry::new();
    let store = MemoryDatastore::new();
    // Registered behind the registry's back.
    store.register_kind(EntityKind::of::<Note>()).unwrap();

    let err = registry.register_entity::<Note>(&store).unwrap_err();
    assert!(matches!(err, Error::DuplicateKind { .. }));
    assert!(registry.is_empty());
}

#[test]
fn unregistered_kind_is_refused_by_store() {
    let factory = factory();
    let mut handle = factory.begin();
    let err = handle
        .session_mut()
        .save(&Note::new("a", "x"))
        .unwrap_err();
    assert!(matches!(err, Error::KindNotRegistered { .. }));
}

#[test]
fn global_registry_is_one_instance() {
    assert!(Arc::ptr_eq(&EntityRegistry::global(), &EntityRegistry::global()));
}

#[test]
fn default_factories_over_separate_stores() {
    let first = Arc::new(SessionFactory::new(MemoryDatastore::new()).unwrap());
    let second = Arc::new(SessionFactory::new(MemoryDatastore::new()).unwrap());

    let first_dao = note_dao(&first);
    let second_dao = note_dao(&second);
    first_dao.put(&Note::new("a", "first")).unwrap();
    second_dao.put(&Note::new("a", "second")).unwrap();

    assert!(second.datastore().is_registered("Note"));
    assert_eq!(first_dao.get("a").unwrap().unwrap().body, "first");
    assert_eq!(second_dao.get("a").unwrap().unwrap().body, "second");
}
