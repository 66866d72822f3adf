use scatter_rs::ScatterError;
use scatter_rs::core::{CellValue, ParsedRow, TableSchema, parse_table, parse_table_bytes};

#[test]
fn narrow_rows_become_single_values() {
    let table = parse_table("id,w_avg\nD1,1.5\nD2,abc\nD3,\n", TableSchema::Narrow)
        .expect("parse narrow");

    assert_eq!(table.header, vec!["id", "w_avg"]);
    assert_eq!(table.len(), 3);
    assert_eq!(table.rows["D1"], ParsedRow::Single(CellValue::Number(1.5)));
    assert_eq!(
        table.rows["D2"],
        ParsedRow::Single(CellValue::Text("abc".to_owned()))
    );

    let column = table.column_at(1);
    assert_eq!(column.len(), 2);
    assert!(!column.contains_key("D3"));
}

#[test]
fn restated_header_rows_are_dropped() {
    let table = parse_table("id,w_avg\nD1,1\nid,w_avg\nD2,2\n", TableSchema::Narrow)
        .expect("parse narrow");

    let ids: Vec<_> = table.rows.keys().cloned().collect();
    assert_eq!(ids, vec!["D1", "D2"]);
}

#[test]
fn wide_rows_keep_id_and_name_as_text() {
    let table = parse_table(
        "id,name,lat,lon,w_avg\n0101,Autauga,32.5,-86.6,2.75\n0102,123,33.0,-87.0,oops\n",
        TableSchema::Wide,
    )
    .expect("parse wide");

    let row = &table.rows["0101"];
    assert_eq!(row.cell(0), Some(&CellValue::Text("0101".to_owned())));
    assert_eq!(row.cell(1), Some(&CellValue::Text("Autauga".to_owned())));
    assert_eq!(row.cell(4), Some(&CellValue::Number(2.75)));

    let second = &table.rows["0102"];
    assert_eq!(second.cell(1), Some(&CellValue::Text("123".to_owned())));
    assert_eq!(second.cell(4), Some(&CellValue::Text("oops".to_owned())));
}

#[test]
fn header_only_resource_parses_to_empty_table() {
    let table = parse_table("id,w_avg\n", TableSchema::Narrow).expect("parse header only");
    assert!(table.is_empty());
    assert_eq!(table.header.len(), 2);
}

#[test]
fn ragged_rows_are_parse_errors() {
    let err = parse_table("id,w_avg\nD1,1,2\n", TableSchema::Narrow).expect_err("ragged");
    assert!(matches!(err, ScatterError::Parse { .. }));
    assert!(err.is_retryable());
}

#[test]
fn invalid_utf8_is_a_parse_error() {
    let err = parse_table_bytes(b"id,w_avg\nD1,\xff\n", TableSchema::Narrow).expect_err("utf8");
    assert!(matches!(err, ScatterError::Parse { .. }));
}

#[test]
fn quoted_fields_are_unquoted() {
    let table = parse_table(
        "id,name,w_avg\n\"0101\",\"Autauga, AL\",1.25\n",
        TableSchema::Wide,
    )
    .expect("parse quoted");
    assert_eq!(
        table.rows["0101"].cell(1),
        Some(&CellValue::Text("Autauga, AL".to_owned()))
    );
}
