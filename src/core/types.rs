use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Values at or below this floor mean "no data".
pub const SENTINEL_FLOOR: f64 = -9999.0;

/// Literal token used by the header row of every resource.
pub const HEADER_ID_TOKEN: &str = "id";

/// One parsed cell: a finite number, or the raw text when coercion failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Coerces a raw cell the way every numeric column is read.
    ///
    /// Only trimmed input that parses as a finite `f64` becomes a number.
    #[must_use]
    pub fn coerce(raw: &str) -> Self {
        match raw.trim().parse::<f64>() {
            Ok(value) if !raw.trim().is_empty() && value.is_finite() => Self::Number(value),
            _ => Self::Text(raw.to_owned()),
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(_) => None,
        }
    }

    /// True when the cell holds a number strictly above [`SENTINEL_FLOOR`].
    #[must_use]
    pub fn is_valid_measure(&self) -> bool {
        self.as_f64().is_some_and(|value| value > SENTINEL_FLOOR)
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(text) if text.is_empty())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// One column keyed by entity id, in file order.
pub type ColumnValues = IndexMap<String, CellValue>;

/// A named column fetched for one collection.
///
/// Values are shared behind an `Arc`; a re-fetch replaces the whole column.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub collection: String,
    pub values: Arc<ColumnValues>,
}

impl Variable {
    #[must_use]
    pub fn new(
        collection: impl Into<String>,
        name: impl Into<String>,
        values: ColumnValues,
    ) -> Self {
        Self {
            name: name.into(),
            collection: collection.into(),
            values: Arc::new(values),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn value(&self, id: &str) -> Option<&CellValue> {
        self.values.get(id)
    }
}

/// Variables keyed by name, in request order.
pub type VariableBatch = IndexMap<String, Variable>;

/// A joined multi-variable row.
///
/// `values` follow the caller's column order; `x`, `y` and `z` name the
/// first three positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedRow {
    pub id: String,
    pub values: SmallVec<[f64; 3]>,
}

impl JoinedRow {
    #[must_use]
    pub fn new(id: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            id: id.into(),
            values: values.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn x(&self) -> f64 {
        self.values.first().copied().unwrap_or(f64::NAN)
    }

    #[must_use]
    pub fn y(&self) -> f64 {
        self.values.get(1).copied().unwrap_or(f64::NAN)
    }

    #[must_use]
    pub fn z(&self) -> Option<f64> {
        self.values.get(2).copied()
    }

    /// Positional `[v1, v2, .., id]` tuple used at the renderer boundary.
    #[must_use]
    pub fn to_tuple(&self) -> Vec<serde_json::Value> {
        let mut tuple: Vec<serde_json::Value> =
            self.values.iter().map(|value| serde_json::json!(value)).collect();
        tuple.push(serde_json::Value::String(self.id.clone()));
        tuple
    }
}

#[cfg(test)]
mod tests {
    use super::CellValue;

    #[test]
    fn coercion_keeps_non_numeric_cells_raw() {
        assert_eq!(CellValue::coerce(" 3.5 "), CellValue::Number(3.5));
        assert_eq!(CellValue::coerce(""), CellValue::Text(String::new()));
        assert_eq!(CellValue::coerce("NaN"), CellValue::Text("NaN".to_owned()));
        assert_eq!(CellValue::coerce("inf"), CellValue::Text("inf".to_owned()));
        assert_eq!(
            CellValue::coerce("Autauga County"),
            CellValue::Text("Autauga County".to_owned())
        );
    }

    #[test]
    fn sentinel_values_are_not_valid_measures() {
        assert!(!CellValue::Number(-9999.0).is_valid_measure());
        assert!(!CellValue::Number(-10_000.0).is_valid_measure());
        assert!(CellValue::Number(-9998.5).is_valid_measure());
        assert!(!CellValue::Text("12".to_owned()).is_valid_measure());
    }
}
