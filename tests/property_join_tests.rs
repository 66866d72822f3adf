use proptest::prelude::*;
use scatter_rs::core::{CellValue, ColumnValues, SENTINEL_FLOOR, join_columns};

fn to_column(entries: &[(u8, f64)]) -> ColumnValues {
    entries
        .iter()
        .map(|(id, value)| (format!("e{id}"), CellValue::Number(*value)))
        .collect()
}

proptest! {
    #[test]
    fn joined_rows_match_every_input_column(
        xs in proptest::collection::vec((0u8..40, -12_000.0f64..12_000.0), 0..60),
        ys in proptest::collection::vec((0u8..40, -12_000.0f64..12_000.0), 0..60)
    ) {
        let x = to_column(&xs);
        let y = to_column(&ys);
        let rows = join_columns(&[&x, &y]).expect("join");

        for row in &rows {
            let x_value = x.get(&row.id).and_then(CellValue::as_f64).expect("x present");
            let y_value = y.get(&row.id).and_then(CellValue::as_f64).expect("y present");
            prop_assert_eq!(row.x(), x_value);
            prop_assert_eq!(row.y(), y_value);
            prop_assert!(row.x() > SENTINEL_FLOOR);
            prop_assert!(row.y() > SENTINEL_FLOOR);
        }

        let expected = x
            .iter()
            .filter(|(id, value)| {
                value.is_valid_measure() && y.get(id.as_str()).is_some_and(CellValue::is_valid_measure)
            })
            .count();
        prop_assert_eq!(rows.len(), expected);
    }
}
