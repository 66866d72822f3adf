use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::types::{CellValue, ColumnValues, SENTINEL_FLOOR};
use crate::error::{ScatterError, ScatterResult};

/// Lower quantile kept by [`robust_domain`].
pub const DOMAIN_LOW_QUANTILE: f64 = 0.001;
/// Upper quantile kept by [`robust_domain`].
pub const DOMAIN_HIGH_QUANTILE: f64 = 0.999;

/// Interpolated quantile over ascending, non-empty `sorted` values.
#[must_use]
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    if !p.is_finite() {
        return None;
    }
    if p <= 0.0 || last == 0 {
        return sorted.first().copied();
    }
    if p >= 1.0 {
        return sorted.last().copied();
    }

    let position = last as f64 * p;
    let lower = position.floor() as usize;
    let lower_value = sorted[lower];
    let upper_value = sorted[(lower + 1).min(last)];
    Some(lower_value + (upper_value - lower_value) * (position - lower as f64))
}

/// Trimmed `[q0.001, q0.999]` range over valid (above sentinel) values.
///
/// Returns `None` when no valid value exists.
#[must_use]
pub fn robust_domain(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    let mut valid: Vec<f64> = values
        .into_iter()
        .filter(|value| value.is_finite() && *value > SENTINEL_FLOOR)
        .collect();
    valid.sort_unstable_by_key(|value| OrderedFloat(*value));

    Some((
        quantile_sorted(&valid, DOMAIN_LOW_QUANTILE)?,
        quantile_sorted(&valid, DOMAIN_HIGH_QUANTILE)?,
    ))
}

/// Robust domain of a column's numeric cells.
#[must_use]
pub fn column_domain(column: &ColumnValues) -> Option<(f64, f64)> {
    robust_domain(column.values().filter_map(CellValue::as_f64))
}

/// Output range and curvature for a size scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleOptions {
    pub range: (f64, f64),
    pub exponent: f64,
}

impl Default for ScaleOptions {
    fn default() -> Self {
        Self {
            range: (0.0, 1.0),
            exponent: 1.0,
        }
    }
}

/// Clamped power scale from a data domain to an output range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeScale {
    domain_low: f64,
    domain_high: f64,
    range_low: f64,
    range_high: f64,
    exponent: f64,
}

impl SizeScale {
    pub fn new(domain: (f64, f64), options: ScaleOptions) -> ScatterResult<Self> {
        let (domain_low, domain_high) = domain;
        let (range_low, range_high) = options.range;
        if !domain_low.is_finite() || !domain_high.is_finite() || domain_low > domain_high {
            return Err(ScatterError::InvalidData(
                "scale domain must be finite and ascending".to_owned(),
            ));
        }
        if !range_low.is_finite() || !range_high.is_finite() {
            return Err(ScatterError::InvalidData(
                "scale range must be finite".to_owned(),
            ));
        }
        if !options.exponent.is_finite() || options.exponent <= 0.0 {
            return Err(ScatterError::InvalidData(
                "scale exponent must be finite and positive".to_owned(),
            ));
        }

        Ok(Self {
            domain_low,
            domain_high,
            range_low,
            range_high,
            exponent: options.exponent,
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_low, self.domain_high)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_low, self.range_high)
    }

    /// Maps `value` into the output range, clamped at both ends.
    ///
    /// A degenerate domain maps everything to the middle of the range.
    #[must_use]
    pub fn map(self, value: f64) -> f64 {
        if value.is_nan() {
            return self.range_low;
        }
        let span = self.domain_high - self.domain_low;
        let normalized = if span == 0.0 {
            0.5
        } else {
            ((value - self.domain_low) / span).clamp(0.0, 1.0)
        };
        if normalized >= 1.0 {
            return self.range_high;
        }
        self.range_low + (self.range_high - self.range_low) * normalized.powf(self.exponent)
    }
}

/// Marker size function for one composition pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SizeMapping {
    Scaled(SizeScale),
    Constant(f64),
}

impl SizeMapping {
    /// Builds a scale over the driving column, or a constant size when there
    /// is no driving column or it holds no valid values.
    pub fn from_column(
        column: Option<&ColumnValues>,
        options: ScaleOptions,
        fallback_size: f64,
    ) -> ScatterResult<Self> {
        match column.and_then(column_domain) {
            Some(domain) => Ok(Self::Scaled(SizeScale::new(domain, options)?)),
            None => Ok(Self::Constant(fallback_size)),
        }
    }

    #[must_use]
    pub fn size(self, value: Option<f64>) -> f64 {
        match (self, value) {
            (Self::Scaled(scale), Some(value)) => scale.map(value),
            (Self::Scaled(scale), None) => scale.range().0,
            (Self::Constant(size), _) => size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::quantile_sorted;

    #[test]
    fn quantile_interpolates_between_neighbours() {
        let sorted = [0.0, 10.0, 20.0, 30.0];
        assert_eq!(quantile_sorted(&sorted, 0.5), Some(15.0));
        assert_eq!(quantile_sorted(&sorted, 0.0), Some(0.0));
        assert_eq!(quantile_sorted(&sorted, 1.0), Some(30.0));
        assert_eq!(quantile_sorted(&[], 0.5), None);
        assert_eq!(quantile_sorted(&[4.0], 0.999), Some(4.0));
    }
}
