//! bracket-watch app glue shared by the binaries: env config, roster CSV, output rows.

pub mod config;
pub mod report;
pub mod roster;

pub use config::{tournament_slug, AppConfig};
pub use report::{entrant_rows, event_summary_lines, write_rows, EntrantRow, ProgressRow, StatusRow};
pub use roster::{load_roster, read_roster, RosterEntry};
