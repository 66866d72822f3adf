use std::collections::HashMap;

use tracing::debug;

use crate::core::{JoinedRow, SizeMapping};
use crate::render::{
    RenderOptions, ScatterOptions, Series, SeriesData, SeriesKind, SeriesPoint, SeriesStyle,
};

/// Inputs for one composition pass.
#[derive(Debug, Clone, Copy)]
pub struct CompositionInput<'a> {
    /// Joined rows, or `None` while a driving variable is still missing.
    pub rows: Option<&'a [JoinedRow]>,
    pub sizes: SizeMapping,
    pub selected: &'a [String],
    pub highlighted: &'a [String],
    pub options: &'a ScatterOptions,
}

/// Builds the ordered series list: `base`, `selected`, `highlighted`, then
/// caller supplied custom series.
///
/// Returns an empty list when `rows` is `None`.
#[must_use]
pub fn compose_series(input: CompositionInput<'_>) -> Vec<Series> {
    let Some(rows) = input.rows else {
        debug!("driving data incomplete; composing no series");
        return Vec::new();
    };

    let by_id: HashMap<&str, &JoinedRow> = rows.iter().map(|row| (row.id.as_str(), row)).collect();

    let mut series = Vec::with_capacity(SeriesKind::BUILT_IN.len() + input.options.series.len());
    series.push(built_in_series(
        SeriesKind::Base,
        rows.iter(),
        input.sizes,
        input.options,
    ));
    series.push(built_in_series(
        SeriesKind::Selected,
        pick_rows(&by_id, input.selected).into_iter(),
        input.sizes,
        input.options,
    ));
    series.push(built_in_series(
        SeriesKind::Highlighted,
        pick_rows(&by_id, input.highlighted).into_iter(),
        input.sizes,
        input.options,
    ));
    series.extend(input.options.custom_series().map(|entry| Series {
        id: entry.id.clone(),
        kind: SeriesKind::Custom,
        data: SeriesData::Raw(entry.data.clone()),
        style: entry.style.clone(),
    }));

    debug!(
        base = series[0].len(),
        selected = series[1].len(),
        highlighted = series[2].len(),
        custom = series.len() - SeriesKind::BUILT_IN.len(),
        "composed series"
    );
    series
}

/// Composes series and attaches the caller's top-level passthrough options.
#[must_use]
pub fn compose_render_options(input: CompositionInput<'_>) -> RenderOptions {
    RenderOptions {
        series: compose_series(input),
        passthrough: input.options.passthrough.clone(),
    }
}

/// Rows for `ids` in request order; ids without a joined row are dropped.
fn pick_rows<'a>(by_id: &HashMap<&str, &'a JoinedRow>, ids: &[String]) -> Vec<&'a JoinedRow> {
    ids.iter()
        .filter_map(|id| by_id.get(id.as_str()).copied())
        .collect()
}

fn built_in_series<'a>(
    kind: SeriesKind,
    rows: impl Iterator<Item = &'a JoinedRow>,
    sizes: SizeMapping,
    options: &ScatterOptions,
) -> Series {
    let id = kind.reserved_id().unwrap_or_default();
    let mut style = SeriesStyle::built_in(kind);
    if let Some(entry) = options.series_override(id) {
        style = style.merged(&entry.style);
    }

    let points = rows
        .map(|row| SeriesPoint {
            row: row.clone(),
            size: sizes.size(row.z()),
        })
        .collect();

    Series {
        id: id.to_owned(),
        kind,
        data: SeriesData::Points(points),
        style,
    }
}
