//! Column metadata discovered from the schema catalog.

use serde::{Deserialize, Serialize};

/// A column of one of the dashboard's tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableColumn {
    /// Column name as stored in the catalog.
    pub name: String,

    /// Underlying type name (`int4`, `varchar`, ...), when known.
    pub type_name: Option<String>,

    /// True for columns with a default, identity columns and generated columns.
    pub has_default: bool,
}

impl TableColumn {
    /// A column that must be supplied on insert.
    pub fn required(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: Some(type_name.into()),
            has_default: false,
        }
    }

    /// A column the database fills in on its own.
    pub fn defaulted(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: Some(type_name.into()),
            has_default: true,
        }
    }
}

/// Returns the columns that must be supplied on insert, in table order.
pub fn insertable(columns: &[TableColumn]) -> Vec<TableColumn> {
    columns.iter().filter(|c| !c.has_default).cloned().collect()
}

/// Finds a column by name. Catalog names are compared exactly.
pub fn find<'a>(columns: &'a [TableColumn], name: &str) -> Option<&'a TableColumn> {
    columns.iter().find(|c| c.name == name)
}
