//! Bulk registration from kind list resources

use crate::common::*;
use cairn::{parse_kind_list, CONFIG_FILE_NAME};
use std::io::Write;
use std::sync::Arc;
use tempfile::TempDir;

fn builder() -> cairn::SessionFactoryBuilder<MemoryDatastore> {
    SessionFactory::builder()
        .datastore(MemoryDatastore::new())
        .registry(Arc::new(EntityRegistry::new()))
        .entity::<Note>()
        .entity::<Account>()
}

#[test]
fn kind_list_accepts_type_and_kind_names() {
    let factory = builder().build().unwrap();
    let resource = format!(
        "# application kinds\n\n  {}  \n   # Account is listed by kind name\nAccount\n",
        EntityKind::of::<Note>().type_name()
    );

    let kinds = factory
        .register_from_resource(std::io::Cursor::new(resource))
        .unwrap();

    assert_eq!(kinds, vec![EntityKind::of::<Note>(), EntityKind::of::<Account>()]);
    assert!(factory.datastore().is_registered("Note"));
    assert!(factory.datastore().is_registered("Account"));
}

#[test]
fn parse_skips_comments_and_blank_lines() {
    let names = parse_kind_list(std::io::Cursor::new("\n#x\n a \n\t# y\nb\n\n")).unwrap();
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn listing_a_kind_twice_registers_once() {
    let factory = builder().build().unwrap();
    let kinds = factory
        .register_from_resource(std::io::Cursor::new("Note\nNote\n"))
        .unwrap();
    assert_eq!(kinds.len(), 2);
    assert_eq!(factory.registry().len(), 1);
}

#[test]
fn empty_resource_is_configuration_error() {
    let factory = builder().build().unwrap();
    let err = factory
        .register_from_resource(std::io::Cursor::new("# nothing\n\n   \n"))
        .unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
}

#[test]
fn unknown_name_is_unresolvable_and_registers_nothing() {
    let factory = builder().build().unwrap();
    let err = factory
        .register_from_resource(std::io::Cursor::new("Note\nbilling::Invoice\n"))
        .unwrap_err();

    match &err {
        Error::UnresolvableKind { name, .. } => assert_eq!(name, "billing::Invoice"),
        other => panic!("expected unresolvable kind, got {other:?}"),
    }
    assert!(std::error::Error::source(&err).is_some());
    assert!(!factory.datastore().is_registered("Note"));
}

#[test]
fn missing_resource_file_is_configuration_error() {
    let dir = TempDir::new().unwrap();
    let factory = builder().build().unwrap();
    let err = factory
        .register_from_file(&dir.path().join("entities.txt"))
        .unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
}

#[test]
fn config_file_drives_startup_registration() {
    let dir = TempDir::new().unwrap();
    let mut kinds = std::fs::File::create(dir.path().join("entities.txt")).unwrap();
    writeln!(kinds, "# startup kinds").unwrap();
    writeln!(kinds, "Note").unwrap();
    writeln!(kinds, "Account").unwrap();

    let config_path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(
        &config_path,
        "entities = \"entities.txt\"\ndefault_page_size = 5\n",
    )
    .unwrap();

    let config = CairnConfig::from_file(&config_path).unwrap();
    let factory = Arc::new(builder().config(config).build().unwrap());

    assert!(factory.datastore().is_registered("Note"));
    assert!(factory.datastore().is_registered("Account"));

    // DAOs built afterwards find their kind already registered.
    let dao = note_dao(&factory);
    assert_eq!(dao.first_page().page_size(), 5);
    dao.put(&Note::new("a", "x")).unwrap();
}

#[test]
fn default_config_file_is_usable() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    CairnConfig::write_default_if_missing(&path).unwrap();

    let config = CairnConfig::from_file(&path).unwrap();
    assert_eq!(config, CairnConfig::default());
    assert!(builder().config(config).build().is_ok());
}
