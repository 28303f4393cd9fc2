use super::*;

#[test]
fn test_parse_create_table() {
    let stmt = parse("CREATE TABLE users (id INT, name VARCHAR, PRIMARY KEY (id))").unwrap();
    match stmt {
        Statement::CreateTable { table, columns, primary_key } => {
            assert_eq!(table, "users");
            assert_eq!(columns.len(), 2);
            assert_eq!(columns[0].name, "id");
            assert_eq!(primary_key, "id");
        }
        _ => panic!("wrong statement kind"),
    }
}

#[test]
fn test_parse_create_table_requires_primary_key_clause() {
    assert!(parse("CREATE TABLE users (id INT, name VARCHAR)").is_err());
}

#[test]
fn test_parse_create_index() {
    let stmt = parse("CREATE INDEX ON users(name)").unwrap();
    match stmt {
        Statement::CreateIndex { table, column } => {
            assert_eq!(table, "users");
            assert_eq!(column, "name");
        }
        _ => panic!("wrong statement kind"),
    }
}

#[test]
fn test_parse_insert_into() {
    let stmt = parse("INSERT INTO users VALUES (1, alice)").unwrap();
    match stmt {
        Statement::InsertInto { table, columns, values } => {
            assert_eq!(table, "users");
            assert!(columns.is_none());
            assert_eq!(values, vec!["1".to_string(), "alice".to_string()]);
        }
        _ => panic!("wrong statement kind"),
    }
}

#[test]
fn test_parse_insert_into_with_column_list() {
    let stmt = parse("INSERT INTO users (name, id) VALUES (alice, 1)").unwrap();
    match stmt {
        Statement::InsertInto { table, columns, values } => {
            assert_eq!(table, "users");
            assert_eq!(columns.unwrap(), vec!["name".to_string(), "id".to_string()]);
            assert_eq!(values, vec!["alice".to_string(), "1".to_string()]);
        }
        _ => panic!("wrong statement kind"),
    }
}

#[test]
fn test_parse_delete_with_where() {
    let stmt = parse("DELETE FROM users WHERE record_id = 1").unwrap();
    match stmt {
        Statement::DeleteFrom { table, record_id } => {
            assert_eq!(table, "users");
            assert_eq!(record_id.unwrap(), 1);
        }
        _ => panic!("wrong statement kind"),
    }
}

#[test]
fn test_parse_delete_without_where() {
    let stmt = parse("DELETE FROM users").unwrap();
    match stmt {
        Statement::DeleteFrom { record_id, .. } => assert!(record_id.is_none()),
        _ => panic!("wrong statement kind"),
    }
}

#[test]
fn test_parse_delete_rejects_non_record_id_predicate() {
    assert!(parse("DELETE FROM users WHERE name = bob").is_err());
}

#[test]
fn test_parse_delete_rejects_non_equality_on_record_id() {
    assert!(parse("DELETE FROM users WHERE record_id > 1").is_err());
}

#[test]
fn test_parse_operator_precedence() {
    for (text, expected) in [
        ("SELECT * FROM t WHERE a >= 1", Op::Ge),
        ("SELECT * FROM t WHERE a <= 1", Op::Le),
        ("SELECT * FROM t WHERE a != 1", Op::Ne),
        ("SELECT * FROM t WHERE a = 1", Op::Eq),
        ("SELECT * FROM t WHERE a > 1", Op::Gt),
        ("SELECT * FROM t WHERE a < 1", Op::Lt),
    ] {
        let stmt = parse(text).unwrap();
        match stmt {
            Statement::Select { predicate: Some(p), .. } => assert_eq!(p.op, expected),
            _ => panic!("expected a predicate"),
        }
    }
}

#[test]
fn test_parse_update_rejects_non_equality_where() {
    let err = parse("UPDATE users SET name = bob WHERE id > 1");
    assert!(err.is_err());
}

#[test]
fn test_parse_update_with_equality_where() {
    let stmt = parse("UPDATE users SET name = bob WHERE id = 1").unwrap();
    match stmt {
        Statement::Update { table, set_column, set_value, predicate } => {
            assert_eq!(table, "users");
            assert_eq!(set_column, "name");
            assert_eq!(set_value, "bob");
            assert!(predicate.is_some());
        }
        _ => panic!("wrong statement kind"),
    }
}

#[test]
fn test_parse_select_star() {
    let stmt = parse("SELECT * FROM users").unwrap();
    match stmt {
        Statement::Select { table, projection, predicate } => {
            assert_eq!(table, "users");
            assert!(projection.is_none());
            assert!(predicate.is_none());
        }
        _ => panic!("wrong statement kind"),
    }
}

#[test]
fn test_parse_select_with_projection() {
    let stmt = parse("SELECT name, id FROM users WHERE id != 2").unwrap();
    match stmt {
        Statement::Select { table, projection, predicate } => {
            assert_eq!(table, "users");
            assert_eq!(projection.unwrap(), vec!["name".to_string(), "id".to_string()]);
            let p = predicate.unwrap();
            assert_eq!(p.column, "id");
            assert!(matches!(p.op, Op::Ne));
        }
        _ => panic!("wrong statement kind"),
    }
}

#[test]
fn test_parse_select_single_column_projection() {
    let stmt = parse("SELECT name FROM users").unwrap();
    match stmt {
        Statement::Select { projection, .. } => assert_eq!(projection.unwrap(), vec!["name".to_string()]),
        _ => panic!("wrong statement kind"),
    }
}

#[test]
fn test_parse_drop_table() {
    let stmt = parse("DROP TABLE users").unwrap();
    match stmt {
        Statement::DropTable { table } => assert_eq!(table, "users"),
        _ => panic!("wrong statement kind"),
    }
}

#[test]
fn test_parse_rejects_unknown_keyword() {
    assert!(parse("FROBNICATE users").is_err());
}
