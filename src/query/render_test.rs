use super::*;

#[test]
fn test_render_includes_header_and_rows() {
    let columns = vec!["id".to_string(), "name".to_string()];
    let rows = vec![
        vec!["1".to_string(), "alice".to_string()],
        vec!["2".to_string(), "bob".to_string()],
    ];
    let rendered = render_table(&columns, &rows);
    assert!(rendered.contains("id"));
    assert!(rendered.contains("name"));
    assert!(rendered.contains("alice"));
    assert!(rendered.contains("bob"));
}

#[test]
fn test_render_empty_rows_still_shows_header() {
    let columns = vec!["id".to_string()];
    let rendered = render_table(&columns, &[]);
    assert!(rendered.contains("id"));
}
