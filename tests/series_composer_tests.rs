use serde_json::json;

use scatter_rs::core::{JoinedRow, ScaleOptions, SizeMapping, SizeScale};
use scatter_rs::render::{
    CompositionInput, ItemStyle, ScatterOptions, SeriesKind, SeriesOverride, SeriesStyle,
    compose_render_options, compose_series,
};

fn rows() -> Vec<JoinedRow> {
    vec![
        JoinedRow::new("D1", [1.0, 10.0, 0.0]),
        JoinedRow::new("D3", [3.0, 30.0, 100.0]),
    ]
}

fn sizes() -> SizeMapping {
    SizeMapping::Scaled(
        SizeScale::new(
            (0.0, 100.0),
            ScaleOptions {
                range: (6.0, 48.0),
                exponent: 1.0,
            },
        )
        .expect("scale"),
    )
}

fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_owned()).collect()
}

#[test]
fn built_in_series_come_first_in_canonical_order() {
    let rows = rows();
    let options = ScatterOptions {
        series: vec![SeriesOverride::new("trend").with_data(vec![json!([0, 0]), json!([5, 50])])],
        ..ScatterOptions::default()
    };
    let series = compose_series(CompositionInput {
        rows: Some(&rows),
        sizes: sizes(),
        selected: &[],
        highlighted: &[],
        options: &options,
    });

    let order: Vec<_> = series.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(order, vec!["base", "selected", "highlighted", "trend"]);
    assert_eq!(series[3].kind, SeriesKind::Custom);
    assert_eq!(series[3].len(), 2);
    assert_eq!(series[0].z(), 2);
    assert_eq!(series[1].z(), 4);
    assert_eq!(series[2].z(), 3);
}

#[test]
fn selection_ids_without_a_joined_row_are_dropped() {
    let rows = rows();
    let selected = ids(&["D1", "D2"]);
    let highlighted = ids(&["D3"]);
    let options = ScatterOptions::default();
    let series = compose_series(CompositionInput {
        rows: Some(&rows),
        sizes: sizes(),
        selected: &selected,
        highlighted: &highlighted,
        options: &options,
    });

    let selected_ids: Vec<_> = series[1].points().iter().map(|p| p.row.id.as_str()).collect();
    assert_eq!(selected_ids, vec!["D1"]);
    assert_eq!(series[2].points()[0].row.id, "D3");
    assert_eq!(series[0].len(), 2);
}

#[test]
fn marker_sizes_follow_the_size_mapping() {
    let rows = rows();
    let options = ScatterOptions::default();
    let series = compose_series(CompositionInput {
        rows: Some(&rows),
        sizes: sizes(),
        selected: &[],
        highlighted: &[],
        options: &options,
    });

    let sizes: Vec<_> = series[0].points().iter().map(|p| p.size).collect();
    assert_eq!(sizes, vec![6.0, 48.0]);
}

#[test]
fn missing_rows_compose_no_series() {
    let options = ScatterOptions::default();
    let composed = compose_render_options(CompositionInput {
        rows: None,
        sizes: SizeMapping::Constant(10.0),
        selected: &[],
        highlighted: &[],
        options: &options,
    });
    assert!(composed.series.is_empty());
    assert!(composed.is_loading());
}

#[test]
fn overrides_merge_deeply_into_built_in_series() {
    let rows = rows();
    let options: ScatterOptions = serde_json::from_value(json!({
        "grid": {"left": 40},
        "series": [{
            "id": "base",
            "itemStyle": {"color": "#ccc", "shadowBlur": 2},
            "emphasis": {"itemStyle": {"borderWidth": 2}},
            "encode": {"tooltip": [0, 1]}
        }]
    }))
    .expect("options");

    let composed = compose_render_options(CompositionInput {
        rows: Some(&rows),
        sizes: sizes(),
        selected: &[],
        highlighted: &[],
        options: &options,
    });
    let json = composed.to_json_value().expect("json");

    assert_eq!(json["grid"]["left"], json!(40));
    let base = &json["series"][0];
    assert_eq!(base["id"], json!("base"));
    assert_eq!(base["type"], json!("scatter"));
    assert_eq!(base["z"], json!(2));
    assert_eq!(base["itemStyle"]["color"], json!("#ccc"));
    assert_eq!(base["itemStyle"]["shadowBlur"], json!(2));
    assert_eq!(base["emphasis"]["itemStyle"]["borderWidth"], json!(2));
    assert_eq!(base["encode"]["tooltip"], json!([0, 1]));
    assert_eq!(base["data"][0]["value"], json!([1.0, 10.0, 0.0, "D1"]));
    assert_eq!(base["data"][0]["symbolSize"], json!(6.0));

    let selected = &json["series"][1];
    assert!(selected.get("itemStyle").is_none());
}

#[test]
fn fixed_symbol_size_replaces_per_point_sizes() {
    let rows = rows();
    let options = ScatterOptions {
        series: vec![SeriesOverride::new("base").with_style(SeriesStyle {
            symbol_size: Some(8.0),
            item_style: ItemStyle {
                color: Some("red".to_owned()),
                ..ItemStyle::default()
            },
            ..SeriesStyle::default()
        })],
        ..ScatterOptions::default()
    };
    let series = compose_series(CompositionInput {
        rows: Some(&rows),
        sizes: sizes(),
        selected: &[],
        highlighted: &[],
        options: &options,
    });

    let json = series[0].to_json_value().expect("json");
    assert_eq!(json["symbolSize"], json!(8.0));
    assert!(json["data"][0].get("symbolSize").is_none());
    assert_eq!(series[0].style.series_type.as_deref(), Some("scatter"));
}

#[test]
fn override_z_wins_over_the_built_in_level() {
    let rows = rows();
    let options = ScatterOptions {
        series: vec![SeriesOverride::new("highlighted").with_style(SeriesStyle {
            z: Some(9),
            ..SeriesStyle::default()
        })],
        ..ScatterOptions::default()
    };
    let series = compose_series(CompositionInput {
        rows: Some(&rows),
        sizes: sizes(),
        selected: &[],
        highlighted: &[],
        options: &options,
    });
    assert_eq!(series[2].z(), 9);
}
