//! The fixed set of tables the dashboard can address.

use std::fmt;
use std::str::FromStr;

use crate::error::DashError;

/// A table the insert and delete pages may target.
///
/// Table names only ever reach SQL text through this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Table {
    #[default]
    Patient,
    Doctor,
    Hospital,
    Insurance,
    Treatment,
    Visits,
}

impl Table {
    /// All tables, in the order they are offered in select boxes.
    pub const ALL: [Table; 6] = [
        Table::Patient,
        Table::Doctor,
        Table::Hospital,
        Table::Insurance,
        Table::Treatment,
        Table::Visits,
    ];

    /// Returns the table name as it appears in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Patient => "patient",
            Self::Doctor => "doctor",
            Self::Hospital => "hospital",
            Self::Insurance => "insurance",
            Self::Treatment => "treatment",
            Self::Visits => "visits",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Table {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|table| table.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DashError::input(format!("Unknown table '{wanted}'")))
    }
}
