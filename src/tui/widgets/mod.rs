//! TUI widgets for the dashboard.

pub mod chart;
pub mod confirm;
pub mod header;
pub mod input;
pub mod select;
pub mod sidebar;
pub mod status;
pub mod table;
