use scatter_rs::core::{JoinedRow, SizeMapping};
use scatter_rs::render::{
    CompositionInput, ScatterOptions, SeriesLocation, compose_series, locate_row,
};

fn composed(selected: &[String], highlighted: &[String]) -> Vec<scatter_rs::render::Series> {
    let rows = vec![
        JoinedRow::new("D1", [1.0, 1.0]),
        JoinedRow::new("D2", [2.0, 2.0]),
        JoinedRow::new("D3", [3.0, 3.0]),
    ];
    compose_series(CompositionInput {
        rows: Some(&rows),
        sizes: SizeMapping::Constant(10.0),
        selected,
        highlighted,
        options: &ScatterOptions::default(),
    })
}

#[test]
fn topmost_series_wins() {
    let series = composed(&["D2".to_owned()], &["D2".to_owned(), "D3".to_owned()]);

    assert_eq!(locate_row("D2", &series), SeriesLocation::new(2, 0));
    assert_eq!(locate_row("D3", &series), SeriesLocation::new(2, 1));
    assert_eq!(locate_row("D1", &series), SeriesLocation::new(0, 0));
}

#[test]
fn unknown_ids_resolve_to_not_found() {
    let series = composed(&[], &[]);
    let location = locate_row("missing", &series);

    assert_eq!(location, SeriesLocation::NOT_FOUND);
    assert!(!location.is_found());
    assert_eq!(location.indices(), None);
    assert_eq!(locate_row("D1", &[]), SeriesLocation::NOT_FOUND);
}

#[test]
fn location_serializes_camel_case() {
    let json = serde_json::to_value(SeriesLocation::new(1, 4)).expect("json");
    assert_eq!(json, serde_json::json!({"seriesIndex": 1, "dataIndex": 4}));
}
