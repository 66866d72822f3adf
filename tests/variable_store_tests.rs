use indexmap::IndexMap;
use scatter_rs::core::{CellValue, ColumnValues, TableSchema, VariableStore, parse_table};

fn column(pairs: &[(&str, f64)]) -> ColumnValues {
    pairs
        .iter()
        .map(|(id, value)| ((*id).to_owned(), CellValue::Number(*value)))
        .collect()
}

#[test]
fn put_then_get_by_collection_and_name() {
    let mut store = VariableStore::new();
    store.put("districts", "w_avg", column(&[("D1", 1.0)]));

    assert!(store.has("districts", "w_avg"));
    assert!(!store.has("counties", "w_avg"));
    let variable = store.get("districts", "w_avg").expect("resident");
    assert_eq!(variable.collection, "districts");
    assert_eq!(variable.value("D1"), Some(&CellValue::Number(1.0)));
}

#[test]
fn put_replaces_the_whole_column() {
    let mut store = VariableStore::new();
    store.put("districts", "w_avg", column(&[("D1", 1.0), ("D2", 2.0)]));
    store.put("districts", "w_avg", column(&[("D3", 3.0)]));

    let variable = store.get("districts", "w_avg").expect("resident");
    assert_eq!(variable.len(), 1);
    assert!(variable.value("D1").is_none());
}

#[test]
fn wide_tables_fan_out_by_declared_position() {
    let table = parse_table(
        "id,name,lat,lon,w_avg,b_avg,sz\nD1,One,1,2,3,4,5\nD2,Two,6,7,8,9,10\n",
        TableSchema::Wide,
    )
    .expect("parse wide");
    let declared: Vec<String> = ["id", "name", "lat", "lon", "w_avg", "b_avg", "sz"]
        .into_iter()
        .map(str::to_owned)
        .collect();

    let mut store = VariableStore::new();
    let written = store.put_wide("districts", &table, &declared);

    assert_eq!(written, &declared[1..]);
    assert!(!store.has("districts", "id"));
    assert_eq!(
        store.get("districts", "name").and_then(|v| v.value("D2")),
        Some(&CellValue::Text("Two".to_owned()))
    );
    assert_eq!(
        store.get("districts", "b_avg").and_then(|v| v.value("D1")),
        Some(&CellValue::Number(4.0))
    );
}

#[test]
fn snapshot_skips_missing_variables() {
    let mut store = VariableStore::new();
    store.put("districts", "w_avg", column(&[("D1", 1.0)]));

    let batch = store.snapshot("districts", &["w_avg".to_owned(), "b_avg".to_owned()]);
    assert_eq!(batch.len(), 1);
    assert!(batch.contains_key("w_avg"));
}

#[test]
fn invalidate_drops_only_that_collection() {
    let mut store = VariableStore::new();
    let mut seeded = IndexMap::new();
    seeded.insert("w_avg".to_owned(), column(&[("D1", 1.0)]));
    seeded.insert("b_avg".to_owned(), column(&[("D1", 2.0)]));
    store.seed("districts", seeded);
    store.put("counties", "w_avg", column(&[("C1", 1.0)]));

    assert_eq!(store.invalidate("districts"), 2);
    assert!(!store.has("districts", "w_avg"));
    assert!(store.has("counties", "w_avg"));
    assert_eq!(store.invalidate("districts"), 0);
}
