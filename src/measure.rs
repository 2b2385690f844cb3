use serde::{Deserialize, Serialize};

/// Rectangle size of a rendered table: fixed width, height growing with
/// the number of columns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableMetrics {
    pub node_width: f64,
    pub header_height: f64,
    pub row_height: f64,
}

impl Default for TableMetrics {
    fn default() -> Self {
        Self {
            node_width: 250.0,
            header_height: 40.0,
            row_height: 28.0,
        }
    }
}

impl TableMetrics {
    pub fn node_height(&self, column_count: usize) -> f64 {
        self.header_height + self.row_height * column_count as f64
    }

    pub fn node_size(&self, column_count: usize) -> (f64, f64) {
        (self.node_width, self.node_height(column_count))
    }
}
