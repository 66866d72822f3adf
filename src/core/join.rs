use tracing::debug;

use crate::core::types::{ColumnValues, HEADER_ID_TOKEN, JoinedRow};
use crate::error::{ScatterError, ScatterResult};

/// Inner-joins columns on their shared entity ids.
///
/// Candidate ids come from the first column in its insertion order, so equal
/// inputs always produce the same row order. An id is kept only when it is
/// neither empty nor the header token and every column holds a number above
/// the sentinel floor for it. Row values follow the column order.
pub fn join_columns(columns: &[&ColumnValues]) -> ScatterResult<Vec<JoinedRow>> {
    let Some((first, _)) = columns.split_first() else {
        return Err(ScatterError::Configuration(
            "cannot join without any columns".to_owned(),
        ));
    };
    if columns.len() < 2 {
        return Err(ScatterError::Configuration(
            "cannot join fewer than two variables".to_owned(),
        ));
    }

    let rows: Vec<JoinedRow> = first
        .keys()
        .filter(|id| is_joinable_id(id))
        .filter_map(|id| {
            let values = columns
                .iter()
                .map(|column| {
                    column
                        .get(id.as_str())
                        .filter(|cell| cell.is_valid_measure())
                        .and_then(|cell| cell.as_f64())
                })
                .collect::<Option<Vec<f64>>>()?;
            Some(JoinedRow::new(id.clone(), values))
        })
        .collect();

    debug!(
        columns = columns.len(),
        candidates = first.len(),
        joined = rows.len(),
        dropped = first.len() - rows.len(),
        "joined columns"
    );
    Ok(rows)
}

fn is_joinable_id(id: &str) -> bool {
    !id.is_empty() && id != HEADER_ID_TOKEN
}
