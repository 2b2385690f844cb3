use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Header color used when a table declares no `headercolor` setting.
pub const DEFAULT_HEADER_COLOR: &str = "#3498DB";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Schema {
    pub tables: Vec<Table>,
    pub relationships: Vec<Relationship>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    pub header_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub typ: String,
    pub is_primary: bool,
    pub note: Option<String>,
}

/// One endpoint of a relationship: a table and one of its columns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ColumnRef {
    pub table: String,
    pub column: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Relationship {
    pub from: ColumnRef,
    pub to: ColumnRef,
    pub cardinality: Cardinality,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Cardinality {
    OneToMany,  // >
    ManyToOne,  // <
    OneToOne,   // - or absent
    ManyToMany, // <>
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            header_color: DEFAULT_HEADER_COLOR.to_string(),
        }
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}

impl ColumnRef {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

impl Cardinality {
    /// Map a relationship symbol to its cardinality. Unknown or missing
    /// symbols fall back to one-to-one.
    pub fn from_symbol(symbol: Option<&str>) -> Self {
        match symbol {
            Some(">") => Self::OneToMany,
            Some("<") => Self::ManyToOne,
            Some("<>") => Self::ManyToMany,
            _ => Self::OneToOne,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::OneToMany => "(n) -> (1)",
            Self::ManyToOne => "(1) -> (n)",
            Self::ManyToMany => "(n) -> (n)",
            Self::OneToOne => "(1) -> (1)",
        }
    }
}

impl Schema {
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Relationship endpoints naming a table or column that was never declared.
    pub fn dangling_references(&self) -> Vec<&ColumnRef> {
        let tables: HashMap<&str, &Table> =
            self.tables.iter().map(|t| (t.name.as_str(), t)).collect();

        self.relationships
            .iter()
            .flat_map(|r| [&r.from, &r.to])
            .filter(|end| {
                tables
                    .get(end.table.as_str())
                    .is_none_or(|t| t.column(&end.column).is_none())
            })
            .collect()
    }
}
