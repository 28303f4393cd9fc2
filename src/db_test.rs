use super::*;
use crate::query::Outcome;

fn tmp_config(name: &str) -> EngineConfig {
    let mut dir = std::env::temp_dir();
    dir.push(format!("limbodb-db-test-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    EngineConfig { data_dir: dir, tree_order: crate::config::DEFAULT_TREE_ORDER }
}

#[test]
fn test_open_creates_directory() {
    let config = tmp_config("open");
    let db = Database::open(&config, "shop").unwrap();
    assert_eq!(db.name(), "shop");
    assert!(config.db_dir("shop").is_dir());
}

#[test]
fn test_list_databases_reflects_created_dirs() {
    let config = tmp_config("list");
    assert!(list_databases(&config).unwrap().is_empty());
    Database::open(&config, "alpha").unwrap();
    Database::open(&config, "beta").unwrap();
    assert_eq!(list_databases(&config).unwrap(), vec!["alpha".to_string(), "beta".to_string()]);
}

#[test]
fn test_database_exists() {
    let config = tmp_config("exists");
    assert!(!database_exists(&config, "ghost"));
    Database::open(&config, "ghost").unwrap();
    assert!(database_exists(&config, "ghost"));
}

#[test]
fn test_execute_roundtrips_through_query_executor() {
    let config = tmp_config("execute");
    let mut db = Database::open(&config, "shop").unwrap();
    db.execute("CREATE TABLE items (id INT, name VARCHAR, PRIMARY KEY (id))").unwrap();
    db.execute("INSERT INTO items VALUES (1, widget)").unwrap();
    match db.execute("SELECT * FROM items").unwrap() {
        Outcome::Rows { rows, .. } => assert_eq!(rows.len(), 1),
        _ => panic!("expected rows"),
    }
}

#[test]
fn test_schema_persists_across_reopen() {
    let config = tmp_config("reopen");
    {
        let mut db = Database::open(&config, "shop").unwrap();
        db.execute("CREATE TABLE items (id INT, name VARCHAR, PRIMARY KEY (id))").unwrap();
        db.execute("INSERT INTO items VALUES (1, widget)").unwrap();
        db.flush().unwrap();
    }
    let mut db = Database::open(&config, "shop").unwrap();
    match db.execute("SELECT * FROM items").unwrap() {
        Outcome::Rows { rows, .. } => {
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0][1], "widget");
        }
        _ => panic!("expected rows"),
    }
}
