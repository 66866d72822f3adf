use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::types::{CellValue, ColumnValues, HEADER_ID_TOKEN};
use crate::error::{ScatterError, ScatterResult};

/// Layout of one tabular resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableSchema {
    /// `id,value`: one resource per variable.
    Narrow,
    /// `id,name,v1,v2,..`: one shared resource holding many variables.
    Wide,
}

impl TableSchema {
    /// First column index whose cells are coerced to numbers.
    ///
    /// Wide files keep the entity name at position 1 as text.
    #[must_use]
    pub fn first_numeric_column(self) -> usize {
        match self {
            Self::Narrow => 1,
            Self::Wide => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParsedRow {
    /// Narrow rows carry exactly one value.
    Single(CellValue),
    /// Full row, position 0 echoing the id.
    Tuple(Vec<CellValue>),
}

impl ParsedRow {
    /// Cell at a header position; `Single` rows answer for position 1 only.
    #[must_use]
    pub fn cell(&self, position: usize) -> Option<&CellValue> {
        match self {
            Self::Single(value) => (position == 1).then_some(value),
            Self::Tuple(cells) => cells.get(position),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTable {
    pub schema: TableSchema,
    pub header: Vec<String>,
    pub rows: IndexMap<String, ParsedRow>,
}

impl ParsedTable {
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Extracts the column at `position`, skipping absent and blank cells.
    #[must_use]
    pub fn column_at(&self, position: usize) -> ColumnValues {
        self.rows
            .iter()
            .filter_map(|(id, row)| {
                row.cell(position)
                    .filter(|cell| !cell.is_blank())
                    .map(|cell| (id.clone(), cell.clone()))
            })
            .collect()
    }
}

/// Parses delimited text into a header and id-keyed rows.
pub fn parse_table(text: &str, schema: TableSchema) -> ScatterResult<ParsedTable> {
    parse_table_bytes(text.as_bytes(), schema)
}

/// Parses raw bytes, reporting invalid UTF-8 as a [`ScatterError::Parse`].
pub fn parse_table_bytes(input: &[u8], schema: TableSchema) -> ScatterResult<ParsedTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(false)
        .from_reader(input);

    let mut header = Vec::new();
    let mut rows = IndexMap::new();
    let mut skipped_header_rows = 0_usize;
    let numeric_from = schema.first_numeric_column();

    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|err| map_csv_error(&err))?;
        if index == 0 {
            header = record.iter().map(str::to_owned).collect();
            continue;
        }

        let Some(id) = record.get(0) else {
            continue;
        };
        if id == HEADER_ID_TOKEN {
            skipped_header_rows += 1;
            trace!(line = index + 1, "dropping restated header row");
            continue;
        }

        let row = if schema == TableSchema::Narrow && record.len() == 2 {
            ParsedRow::Single(CellValue::coerce(&record[1]))
        } else {
            ParsedRow::Tuple(
                record
                    .iter()
                    .enumerate()
                    .map(|(column, raw)| {
                        if column >= numeric_from {
                            CellValue::coerce(raw)
                        } else {
                            CellValue::Text(raw.to_owned())
                        }
                    })
                    .collect(),
            )
        };
        rows.insert(id.to_owned(), row);
    }

    debug!(
        ?schema,
        columns = header.len(),
        rows = rows.len(),
        skipped_header_rows,
        "parsed tabular resource"
    );

    Ok(ParsedTable {
        schema,
        header,
        rows,
    })
}

fn map_csv_error(err: &csv::Error) -> ScatterError {
    let line_of = |pos: &Option<csv::Position>| pos.as_ref().map_or(0, csv::Position::line);
    match err.kind() {
        csv::ErrorKind::UnequalLengths {
            pos,
            expected_len,
            len,
        } => ScatterError::Parse {
            row: line_of(pos),
            column: *len,
            reason: format!("ragged row: expected {expected_len} fields, found {len}"),
        },
        csv::ErrorKind::Utf8 { pos, err } => ScatterError::Parse {
            row: line_of(pos),
            column: err.field() as u64,
            reason: format!("invalid UTF-8: {err}"),
        },
        _ => ScatterError::Parse {
            row: err.position().map_or(0, csv::Position::line),
            column: 0,
            reason: err.to_string(),
        },
    }
}
