use serde::{Deserialize, Serialize};

use crate::render::Series;

/// Position of a row inside a composed series list.
///
/// `{-1, -1}` is the not-found sentinel the renderer boundary expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesLocation {
    pub series_index: i64,
    pub data_index: i64,
}

impl SeriesLocation {
    pub const NOT_FOUND: Self = Self {
        series_index: -1,
        data_index: -1,
    };

    #[must_use]
    pub fn new(series_index: usize, data_index: usize) -> Self {
        Self {
            series_index: series_index as i64,
            data_index: data_index as i64,
        }
    }

    #[must_use]
    pub fn is_found(self) -> bool {
        self.series_index >= 0 && self.data_index >= 0
    }

    /// `(series_index, data_index)` when found.
    #[must_use]
    pub fn indices(self) -> Option<(usize, usize)> {
        Some((
            usize::try_from(self.series_index).ok()?,
            usize::try_from(self.data_index).ok()?,
        ))
    }
}

/// Locates `id`, scanning the topmost (last drawn) series first.
#[must_use]
pub fn locate_row(id: &str, series: &[Series]) -> SeriesLocation {
    series
        .iter()
        .enumerate()
        .rev()
        .find_map(|(series_index, entry)| {
            entry
                .position_of(id)
                .map(|data_index| SeriesLocation::new(series_index, data_index))
        })
        .unwrap_or(SeriesLocation::NOT_FOUND)
}
