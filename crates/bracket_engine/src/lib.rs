//! Bracket progress inference
//!
//! Turns fetched start.gg snapshots into per-player outcomes:
//! - `index`: free-text player name -> entrant id
//! - `normalize`: raw set -> opponent / result / bracket side, from one entrant's view
//! - `progress`: full history, eliminated after two losses
//! - `status`: latest set only, eliminated when that set is a completed loss
//!
//! The two analyzers use different elimination rules and can disagree for the same
//! player (e.g. a single completed loss in losers bracket). Do not merge them without
//! deciding which rule the output should follow.

pub mod index;
pub mod normalize;
pub mod progress;
pub mod status;

pub use index::{normalize_alias, AliasCollision, EntrantIndex};
pub use normalize::{normalize, BracketSide, MatchResult, NormalizeError, NormalizedMatch};
pub use progress::{analyze_progress, ProgressReport, ELIMINATION_LOSSES};
pub use status::{analyze_status, status_from_latest, PlayerState, SetHistory, StatusReport};
