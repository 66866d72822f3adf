pub mod join;
pub mod parser;
pub mod scale;
pub mod store;
pub mod types;

pub use join::join_columns;
pub use parser::{ParsedRow, ParsedTable, TableSchema, parse_table, parse_table_bytes};
pub use scale::{ScaleOptions, SizeMapping, SizeScale, column_domain, robust_domain};
pub use store::{SharedVariableStore, VariableStore};
pub use types::{
    CellValue, ColumnValues, HEADER_ID_TOKEN, JoinedRow, SENTINEL_FLOOR, Variable, VariableBatch,
};
