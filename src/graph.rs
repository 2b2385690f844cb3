use crate::ast::Schema;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Columns taking part in at least one relationship, keyed by table name.
///
/// Endpoints are indexed under their literal names even when the table or
/// column was never declared; lookups for unknown tables yield nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AdjacencyIndex {
    columns: BTreeMap<String, BTreeSet<String>>,
}

impl AdjacencyIndex {
    pub fn build(schema: &Schema) -> Self {
        let mut columns: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for rel in &schema.relationships {
            for end in [&rel.from, &rel.to] {
                columns
                    .entry(end.table.clone())
                    .or_default()
                    .insert(end.column.clone());
            }
        }

        Self { columns }
    }

    /// Related columns of a table; empty for tables without relationships.
    pub fn columns(&self, table: &str) -> impl Iterator<Item = &str> {
        self.columns
            .get(table)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    pub fn has_relations(&self, table: &str, column: &str) -> bool {
        self.columns
            .get(table)
            .is_some_and(|set| set.contains(column))
    }

    pub fn tables(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
