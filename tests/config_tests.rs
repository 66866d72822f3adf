use std::time::Duration;

use scatter_rs::fetch::PathLayout;
use scatter_rs::{ScatterError, ScatterQuery, ScatterplotConfig};

#[test]
fn minimal_json_fills_defaults() {
    let config = ScatterplotConfig::from_json_str(r#"{"endpoint": "https://data.test/"}"#)
        .expect("config");

    assert_eq!(config.size_range, (6.0, 48.0));
    assert_eq!(config.fixed_marker_size, 10.0);
    assert_eq!(config.hover_clear_delay(), Duration::from_millis(200));
    assert_eq!(config.path_layout, PathLayout::Nested);
    assert_eq!(config.regional_collections, vec!["schools"]);
    assert_eq!(
        config.wide_variables["schools"],
        vec!["id", "name", "lat", "lon", "all_avg", "frl_pct", "sz"]
    );
    assert_eq!(config.wide_variables.len(), 3);
}

#[test]
fn missing_or_blank_endpoint_is_rejected() {
    assert!(matches!(
        ScatterplotConfig::from_json_str("{}"),
        Err(ScatterError::Configuration(_))
    ));
    assert!(matches!(
        ScatterplotConfig::from_json_str(r#"{"endpoint": " "}"#),
        Err(ScatterError::Configuration(_))
    ));
}

#[test]
fn invalid_sizing_is_rejected() {
    let mut config = ScatterplotConfig::new("https://data.test/");
    config.size_exponent = 0.0;
    assert!(config.validate().is_err());

    let config = ScatterplotConfig::new("https://data.test/").with_size_range(f64::NAN, 10.0);
    assert!(config.validate().is_err());
}

#[test]
fn config_round_trips_through_json() {
    let config = ScatterplotConfig::new("https://data.test/")
        .with_path_layout(PathLayout::Flat)
        .with_hover_clear_delay(Duration::from_millis(75))
        .with_wide_variables("tracts", ["id", "name", "pop"]);

    let json = config.to_json_pretty().expect("serialize");
    assert!(json.contains("\"flat\""));
    let restored = ScatterplotConfig::from_json_str(&json).expect("restore");
    assert_eq!(restored, config);
}

#[test]
fn query_lists_size_variable_first() {
    let query = ScatterQuery::new("districts", "all_ses", "all_avg").with_size_var("sz");
    assert_eq!(query.variables(), vec!["sz", "all_ses", "all_avg"]);
    assert!(query.validate().is_ok());

    let partial = ScatterQuery::new("districts", "all_ses", "");
    assert!(matches!(
        partial.validate(),
        Err(ScatterError::Configuration(_))
    ));
}

#[test]
fn reload_is_needed_only_when_the_query_changes() {
    let query = ScatterQuery::new("schools", "a", "b").with_region("AL");
    assert!(!query.needs_reload(&query.clone()));
    assert!(query.needs_reload(&query.clone().with_region("GA")));
    assert!(query.needs_reload(&query.clone().with_size_var("sz")));
}

#[test]
fn empty_size_variable_is_no_size_dimension() {
    let query = ScatterQuery::new("districts", "all_ses", "all_avg").with_size_var("");
    assert_eq!(query.size_var(), None);
    assert_eq!(query.variables(), vec!["all_ses", "all_avg"]);

    let unsized_query = ScatterQuery::new("districts", "all_ses", "all_avg");
    assert!(!query.needs_reload(&unsized_query));
}
