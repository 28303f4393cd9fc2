use super::*;
use crate::catalog::{CatalogManager, DataType};
use crate::index::IndexManager;
use crate::store::RecordStore;

struct Fixture {
    catalog: CatalogManager,
    index: IndexManager,
    store: RecordStore,
}

fn fixture(name: &str) -> Fixture {
    let mut heap_path = std::env::temp_dir();
    heap_path.push(format!("limbodb-table-test-{}-{}.db", name, std::process::id()));
    let _ = std::fs::remove_file(&heap_path);
    let mut idx_dir = std::env::temp_dir();
    idx_dir.push(format!("limbodb-table-test-idx-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&idx_dir);

    Fixture {
        catalog: CatalogManager::new(),
        index: IndexManager::new(idx_dir),
        store: RecordStore::open(&heap_path).unwrap(),
    }
}

fn make_users_table(f: &mut Fixture) {
    TableManager::create_table(
        &mut f.catalog,
        &mut f.index,
        &mut f.store,
        "users",
        &["id".to_string(), "name".to_string()],
        &[DataType::Int, DataType::Varchar],
        0,
    )
    .unwrap();
}

#[test]
fn test_insert_and_select() {
    let mut f = fixture("insert");
    make_users_table(&mut f);
    let id = TableManager::insert_into(
        &f.catalog,
        &mut f.index,
        &mut f.store,
        "users",
        vec!["1".to_string(), "alice".to_string()],
    )
    .unwrap();
    let text = TableManager::select(&f.store, id).unwrap();
    let schema = f.catalog.get_schema("users").unwrap();
    assert_eq!(unpack_record(text, schema), vec!["1", "alice"]);
}

#[test]
fn test_insert_populates_primary_key_index() {
    let mut f = fixture("pk-index");
    make_users_table(&mut f);
    let id = TableManager::insert_into(
        &f.catalog,
        &mut f.index,
        &mut f.store,
        "users",
        vec!["1".to_string(), "alice".to_string()],
    )
    .unwrap();
    assert_eq!(f.index.search("users", "id", "1"), [id].into_iter().collect());
}

#[test]
fn test_delete_one() {
    let mut f = fixture("delete-one");
    make_users_table(&mut f);
    let id1 = TableManager::insert_into(&f.catalog, &mut f.index, &mut f.store, "users", vec!["1".into(), "a".into()]).unwrap();
    let _id2 = TableManager::insert_into(&f.catalog, &mut f.index, &mut f.store, "users", vec!["2".into(), "b".into()]).unwrap();

    let count = TableManager::delete_from(&f.catalog, &mut f.index, &mut f.store, "users", DeleteTarget::One(id1)).unwrap();
    assert_eq!(count, 1);
    assert!(TableManager::select(&f.store, id1).is_none());
    assert_eq!(f.index.search("users", "id", "1"), Default::default());
}

#[test]
fn test_delete_all_removes_every_row_and_index_entry() {
    let mut f = fixture("delete-all");
    make_users_table(&mut f);
    for (id, name) in [("1", "a"), ("2", "b"), ("3", "c")] {
        TableManager::insert_into(&f.catalog, &mut f.index, &mut f.store, "users", vec![id.into(), name.into()]).unwrap();
    }

    let count = TableManager::delete_from(&f.catalog, &mut f.index, &mut f.store, "users", DeleteTarget::All).unwrap();
    assert_eq!(count, 3);
    assert!(TableManager::scan(&f.catalog, &f.index, &f.store, "users").unwrap().is_empty());
    assert!(f.index.all_ids("users", "id").is_empty());
}

#[test]
fn test_update_rewrites_row_and_index() {
    let mut f = fixture("update");
    make_users_table(&mut f);
    let id = TableManager::insert_into(&f.catalog, &mut f.index, &mut f.store, "users", vec!["1".into(), "alice".into()]).unwrap();

    TableManager::update(&f.catalog, &mut f.index, &mut f.store, "users", id, vec!["1".into(), "alicia".into()]).unwrap();

    let rows = TableManager::scan(&f.catalog, &f.index, &f.store, "users").unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].1, vec!["1".to_string(), "alicia".to_string()]);
}

#[test]
fn test_scan_skips_deleted_rows() {
    let mut f = fixture("scan");
    make_users_table(&mut f);
    let id1 = TableManager::insert_into(&f.catalog, &mut f.index, &mut f.store, "users", vec!["1".into(), "a".into()]).unwrap();
    TableManager::insert_into(&f.catalog, &mut f.index, &mut f.store, "users", vec!["2".into(), "b".into()]).unwrap();
    TableManager::delete_from(&f.catalog, &mut f.index, &mut f.store, "users", DeleteTarget::One(id1)).unwrap();

    let rows = TableManager::scan(&f.catalog, &f.index, &f.store, "users").unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].1[0], "2");
}

#[test]
fn test_insert_rejects_wrong_arity() {
    let mut f = fixture("arity");
    make_users_table(&mut f);
    let err = TableManager::insert_into(&f.catalog, &mut f.index, &mut f.store, "users", vec!["1".into()]);
    assert!(err.is_err());
}
