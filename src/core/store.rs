use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::core::parser::ParsedTable;
use crate::core::types::{ColumnValues, Variable, VariableBatch};

/// Cache of fetched columns keyed by `(collection, variable)`.
///
/// Owned by one view; a write replaces the whole column.
#[derive(Debug, Clone, Default)]
pub struct VariableStore {
    collections: IndexMap<String, IndexMap<String, Variable>>,
}

/// Store handle shared between a view and its in-flight fetches.
pub type SharedVariableStore = Arc<RwLock<VariableStore>>;

impl VariableStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn shared(self) -> SharedVariableStore {
        Arc::new(RwLock::new(self))
    }

    #[must_use]
    pub fn has(&self, collection: &str, variable: &str) -> bool {
        self.collections
            .get(collection)
            .is_some_and(|vars| vars.contains_key(variable))
    }

    #[must_use]
    pub fn get(&self, collection: &str, variable: &str) -> Option<&Variable> {
        self.collections.get(collection)?.get(variable)
    }

    /// All resident variables of a collection, in insertion order.
    #[must_use]
    pub fn collection(&self, collection: &str) -> Option<&IndexMap<String, Variable>> {
        self.collections.get(collection)
    }

    /// Clones out the requested variables that are resident.
    #[must_use]
    pub fn snapshot(&self, collection: &str, variables: &[String]) -> VariableBatch {
        variables
            .iter()
            .filter_map(|name| {
                self.get(collection, name)
                    .map(|variable| (name.clone(), variable.clone()))
            })
            .collect()
    }

    pub fn put(&mut self, collection: &str, variable: &str, values: ColumnValues) {
        trace!(collection, variable, rows = values.len(), "store put");
        self.put_variable(Variable::new(collection, variable, values));
    }

    pub fn put_variable(&mut self, variable: Variable) {
        self.collections
            .entry(variable.collection.clone())
            .or_default()
            .insert(variable.name.clone(), variable);
    }

    /// Fans a wide table out into one variable per declared column name.
    ///
    /// `declared[i]` names the column at position `i`; position 0 echoes the
    /// id and is skipped. Returns the names written.
    pub fn put_wide(
        &mut self,
        collection: &str,
        table: &ParsedTable,
        declared: &[String],
    ) -> Vec<String> {
        let mut written = Vec::with_capacity(declared.len().saturating_sub(1));
        for (position, name) in declared.iter().enumerate().skip(1) {
            self.put(collection, name, table.column_at(position));
            written.push(name.clone());
        }
        debug!(
            collection,
            variables = written.len(),
            rows = table.len(),
            "fanned out wide resource"
        );
        written
    }

    /// Pre-populates a collection with caller supplied columns.
    pub fn seed(&mut self, collection: &str, columns: IndexMap<String, ColumnValues>) {
        for (name, values) in columns {
            self.put(collection, &name, values);
        }
    }

    /// Drops every variable of `collection`; returns how many were dropped.
    pub fn invalidate(&mut self, collection: &str) -> usize {
        let dropped = self
            .collections
            .shift_remove(collection)
            .map_or(0, |vars| vars.len());
        debug!(collection, dropped, "invalidated collection");
        dropped
    }
}
