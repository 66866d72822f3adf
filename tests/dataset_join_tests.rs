use scatter_rs::core::{CellValue, ColumnValues, join_columns};

fn column(pairs: &[(&str, CellValue)]) -> ColumnValues {
    pairs
        .iter()
        .map(|(id, value)| ((*id).to_owned(), value.clone()))
        .collect()
}

fn num(value: f64) -> CellValue {
    CellValue::Number(value)
}

#[test]
fn inner_join_keeps_ids_present_in_every_column() {
    let x = column(&[("D1", num(1.0)), ("D2", num(2.0)), ("D3", num(3.0))]);
    let y = column(&[("D1", num(10.0)), ("D3", num(30.0))]);

    let rows = join_columns(&[&x, &y]).expect("join");
    let ids: Vec<_> = rows.iter().map(|row| row.id.as_str()).collect();
    assert_eq!(ids, vec!["D1", "D3"]);
    assert_eq!(rows[1].x(), 3.0);
    assert_eq!(rows[1].y(), 30.0);
    assert_eq!(rows[1].z(), None);
}

#[test]
fn sentinel_and_text_cells_drop_the_row() {
    let x = column(&[
        ("D1", num(1.0)),
        ("D2", num(-9999.0)),
        ("D3", CellValue::from("n/a")),
        ("D4", num(-9998.0)),
    ]);
    let y = column(&[("D1", num(1.0)), ("D2", num(2.0)), ("D3", num(3.0)), ("D4", num(4.0))]);

    let rows = join_columns(&[&x, &y]).expect("join");
    let ids: Vec<_> = rows.iter().map(|row| row.id.as_str()).collect();
    assert_eq!(ids, vec!["D1", "D4"]);
}

#[test]
fn three_columns_produce_positional_values() {
    let x = column(&[("D1", num(1.0))]);
    let y = column(&[("D1", num(2.0))]);
    let z = column(&[("D1", num(3.0))]);

    let rows = join_columns(&[&x, &y, &z]).expect("join");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].values.as_slice(), &[1.0, 2.0, 3.0]);
    assert_eq!(rows[0].z(), Some(3.0));

    let tuple = rows[0].to_tuple();
    assert_eq!(tuple.last(), Some(&serde_json::json!("D1")));
    assert_eq!(tuple.len(), 4);
}

#[test]
fn row_order_follows_the_first_column() {
    let x = column(&[("B", num(1.0)), ("A", num(2.0)), ("C", num(3.0))]);
    let y = column(&[("C", num(1.0)), ("A", num(2.0)), ("B", num(3.0))]);

    let first = join_columns(&[&x, &y]).expect("join");
    let second = join_columns(&[&x, &y]).expect("join");
    assert_eq!(first, second);
    let ids: Vec<_> = first.iter().map(|row| row.id.as_str()).collect();
    assert_eq!(ids, vec!["B", "A", "C"]);
}

#[test]
fn disjoint_columns_join_to_nothing() {
    let x = column(&[("D1", num(1.0))]);
    let y = column(&[("D2", num(1.0))]);
    assert!(join_columns(&[&x, &y]).expect("join").is_empty());
}
