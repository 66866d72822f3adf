use serde::ser::Error as _;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::core::JoinedRow;
use crate::render::SeriesKind;
use crate::render::merge::MergeOverride;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ItemStyle {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl MergeOverride for ItemStyle {
    fn merge_override(&mut self, other: &Self) {
        self.color.merge_override(&other.color);
        self.border_color.merge_override(&other.border_color);
        self.border_width.merge_override(&other.border_width);
        self.opacity.merge_override(&other.opacity);
        self.extra.merge_override(&other.extra);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatter: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LabelStyle {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl MergeOverride for LabelStyle {
    fn merge_override(&mut self, other: &Self) {
        self.show.merge_override(&other.show);
        self.position.merge_override(&other.position);
        self.formatter.merge_override(&other.formatter);
        self.extra.merge_override(&other.extra);
    }
}

/// Style applied while a point is highlighted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmphasisStyle {
    #[serde(default, skip_serializing_if = "ItemStyle::is_empty")]
    pub item_style: ItemStyle,
    #[serde(default, skip_serializing_if = "LabelStyle::is_empty")]
    pub label: LabelStyle,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EmphasisStyle {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl MergeOverride for EmphasisStyle {
    fn merge_override(&mut self, other: &Self) {
        self.item_style.merge_override(&other.item_style);
        self.label.merge_override(&other.label);
        self.extra.merge_override(&other.extra);
    }
}

/// Partial series configuration; every field is optional so it can act as
/// either a built-in default or a caller override.
///
/// Keys the typed fields do not cover are kept in `extra` and merged deeply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesStyle {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub series_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// Fixed marker size; replaces the per-point size scale when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub silent: Option<bool>,
    #[serde(default, skip_serializing_if = "ItemStyle::is_empty")]
    pub item_style: ItemStyle,
    #[serde(default, skip_serializing_if = "LabelStyle::is_empty")]
    pub label: LabelStyle,
    #[serde(default, skip_serializing_if = "EmphasisStyle::is_empty")]
    pub emphasis: EmphasisStyle,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SeriesStyle {
    /// Built-in defaults for one layer.
    #[must_use]
    pub fn built_in(kind: SeriesKind) -> Self {
        Self {
            series_type: Some("scatter".to_owned()),
            z: Some(kind.default_z()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn merged(mut self, other: &Self) -> Self {
        self.merge_override(other);
        self
    }
}

impl MergeOverride for SeriesStyle {
    fn merge_override(&mut self, other: &Self) {
        self.series_type.merge_override(&other.series_type);
        self.symbol.merge_override(&other.symbol);
        self.symbol_size.merge_override(&other.symbol_size);
        self.z.merge_override(&other.z);
        self.silent.merge_override(&other.silent);
        self.item_style.merge_override(&other.item_style);
        self.label.merge_override(&other.label);
        self.emphasis.merge_override(&other.emphasis);
        self.extra.merge_override(&other.extra);
    }
}

/// Caller supplied series entry, keyed by `id`.
///
/// Entries named `base`, `selected` or `highlighted` override the built-in
/// layers; any other id is emitted as its own series with `data` verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesOverride {
    pub id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<Value>,
    #[serde(flatten)]
    pub style: SeriesStyle,
}

impl SeriesOverride {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_style(mut self, style: SeriesStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn with_data(mut self, data: Vec<Value>) -> Self {
        self.data = data;
        self
    }
}

/// Caller option overrides: per-series entries plus top-level passthrough.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScatterOptions {
    #[serde(default)]
    pub series: Vec<SeriesOverride>,
    #[serde(flatten)]
    pub passthrough: Map<String, Value>,
}

impl ScatterOptions {
    #[must_use]
    pub fn series_override(&self, id: &str) -> Option<&SeriesOverride> {
        self.series.iter().find(|entry| entry.id == id)
    }

    pub fn custom_series(&self) -> impl Iterator<Item = &SeriesOverride> {
        self.series
            .iter()
            .filter(|entry| !SeriesKind::from_id(&entry.id).is_built_in())
    }
}

/// One plotted point with its resolved marker size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub row: JoinedRow,
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SeriesData {
    Points(Vec<SeriesPoint>),
    /// Custom series data, forwarded without interpretation.
    Raw(Vec<Value>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub id: String,
    pub kind: SeriesKind,
    pub data: SeriesData,
    pub style: SeriesStyle,
}

impl Series {
    #[must_use]
    pub fn z(&self) -> i32 {
        self.style.z.unwrap_or_else(|| self.kind.default_z())
    }

    #[must_use]
    pub fn points(&self) -> &[SeriesPoint] {
        match &self.data {
            SeriesData::Points(points) => points,
            SeriesData::Raw(_) => &[],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match &self.data {
            SeriesData::Points(points) => points.len(),
            SeriesData::Raw(values) => values.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index of the first point for `id`.
    #[must_use]
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.points().iter().position(|point| point.row.id == id)
    }

    /// Declarative object handed to the renderer.
    pub fn to_json_value(&self) -> serde_json::Result<Value> {
        let mut object = match serde_json::to_value(&self.style)? {
            Value::Object(object) => object,
            _ => Map::new(),
        };
        object.insert("id".to_owned(), Value::String(self.id.clone()));
        object.insert("z".to_owned(), Value::from(self.z()));

        let data = match &self.data {
            SeriesData::Points(points) => points
                .iter()
                .map(|point| {
                    let mut item = Map::new();
                    item.insert("value".to_owned(), Value::Array(point.row.to_tuple()));
                    if self.style.symbol_size.is_none() {
                        item.insert("symbolSize".to_owned(), serde_json::json!(point.size));
                    }
                    Value::Object(item)
                })
                .collect(),
            SeriesData::Raw(values) => values.clone(),
        };
        object.insert("data".to_owned(), Value::Array(data));
        Ok(Value::Object(object))
    }
}

impl Serialize for Series {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json_value()
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}

/// Full declarative options object for one render pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderOptions {
    pub series: Vec<Series>,
    pub passthrough: Map<String, Value>,
}

impl RenderOptions {
    /// An empty series list tells the renderer data is still loading.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.series.is_empty()
    }

    #[must_use]
    pub fn series_by_id(&self, id: &str) -> Option<&Series> {
        self.series.iter().find(|series| series.id == id)
    }

    pub fn to_json_value(&self) -> serde_json::Result<Value> {
        let mut object = self.passthrough.clone();
        let series = self
            .series
            .iter()
            .map(Series::to_json_value)
            .collect::<serde_json::Result<Vec<_>>>()?;
        object.insert("series".to_owned(), Value::Array(series));
        Ok(Value::Object(object))
    }
}

impl Serialize for RenderOptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json_value()
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}
