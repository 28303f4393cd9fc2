use super::*;
use crate::store::RecordStore;

fn tmp_store(name: &str) -> RecordStore {
    let mut p = std::env::temp_dir();
    p.push(format!("limbodb-catalog-test-{}-{}.db", name, std::process::id()));
    let _ = std::fs::remove_file(&p);
    RecordStore::open(&p).unwrap()
}

#[test]
fn test_create_and_fetch_schema() {
    let mut store = tmp_store("create");
    let mut cat = CatalogManager::new();
    let schema = cat
        .create_table(
            &mut store,
            "Users",
            &["id".to_string(), "name".to_string()],
            &[DataType::Int, DataType::Varchar],
            0,
        )
        .unwrap();
    assert_eq!(schema.name, "users");
    assert_eq!(cat.get_schema("USERS").unwrap().columns, vec!["id", "name"]);
    assert!(cat.column_exists("users", "name"));
    assert!(!cat.column_exists("users", "age"));
}

#[test]
fn test_unknown_column_type_rejected() {
    let mut store = tmp_store("unknown-type");
    let mut cat = CatalogManager::new();
    let err = cat.create_table(&mut store, "t", &["a".into()], &[DataType::Unknown], 0);
    assert!(err.is_err());
}

#[test]
fn test_duplicate_table_rejected() {
    let mut store = tmp_store("dup");
    let mut cat = CatalogManager::new();
    cat.create_table(&mut store, "t", &["a".into()], &[DataType::Int], 0).unwrap();
    let err = cat.create_table(&mut store, "T", &["a".into()], &[DataType::Int], 0);
    assert!(err.is_err());
}

#[test]
fn test_underscore_in_identifier_rejected() {
    let mut store = tmp_store("underscore");
    let mut cat = CatalogManager::new();
    let err = cat.create_table(&mut store, "my_table", &["a".into()], &[DataType::Int], 0);
    assert!(err.is_err());
    let err = cat.create_table(&mut store, "t", &["my_col".into()], &[DataType::Int], 0);
    assert!(err.is_err());
}

#[test]
fn test_drop_table_removes_schema_only() {
    let mut store = tmp_store("drop");
    let mut cat = CatalogManager::new();
    cat.create_table(&mut store, "t", &["a".into()], &[DataType::Int], 0).unwrap();
    assert!(cat.get_schema("t").is_some());
    cat.drop_table_schema(&mut store, "t").unwrap();
    assert!(cat.get_schema("t").is_none());
    assert!(cat.drop_table_schema(&mut store, "t").is_err());
}

#[test]
fn test_schema_round_trips_through_serialize() {
    let schema = TableSchema {
        name: "orders".to_string(),
        columns: vec!["id".to_string(), "total".to_string(), "note".to_string()],
        column_types: vec![DataType::Int, DataType::Float, DataType::Varchar],
        primary_key_index: 0,
    };
    let line = schema.serialize();
    let back = TableSchema::deserialize(&line).unwrap();
    assert_eq!(back.name, schema.name);
    assert_eq!(back.columns, schema.columns);
    assert_eq!(back.column_types, schema.column_types);
    assert_eq!(back.primary_key_index, schema.primary_key_index);
}

#[test]
fn test_load_rebuilds_cache_from_store() {
    let mut store = tmp_store("reload");
    {
        let mut cat = CatalogManager::new();
        cat.create_table(
            &mut store,
            "t",
            &["id".into(), "val".into()],
            &[DataType::Int, DataType::Varchar],
            0,
        )
        .unwrap();
    }
    let mut cat2 = CatalogManager::new();
    cat2.load(&store).unwrap();
    assert_eq!(cat2.list_tables(), vec!["t".to_string()]);
    assert_eq!(cat2.get_schema("t").unwrap().columns, vec!["id", "val"]);
}
