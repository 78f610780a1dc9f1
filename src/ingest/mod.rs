//! Producing a new goal list from outside input.

pub mod sheet;
pub mod text;

pub use sheet::{SheetsClient, rows_to_goals};
pub use text::apply_status_update;
