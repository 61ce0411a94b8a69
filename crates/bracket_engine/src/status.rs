use crate::index::EntrantIndex;
use crate::normalize::{normalize, BracketSide, MatchResult};
use async_trait::async_trait;
use startgg_client::{Entrant, EntrantId, Fetcher, MatchSet, SetState, Standing, Transport};
use std::fmt;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    /// Resolved, but the latest set could not be read.
    NotAvailable,
    Active,
    Eliminated,
    NotFound,
    NoMatches,
}

impl fmt::Display for PlayerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PlayerState::NotAvailable => "N/A",
            PlayerState::Active => "Active",
            PlayerState::Eliminated => "Eliminated",
            PlayerState::NotFound => "Not Found",
            PlayerState::NoMatches => "No matches",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub player_name:         String,
    pub state:               PlayerState,
    pub bracket:             String,
    pub placement:           Option<i64>,
    pub eliminated_by:       String,
    pub last_match_round:    String,
    pub last_match_result:   String,
    pub last_match_opponent: String,
}

impl StatusReport {
    pub fn new(player_name: &str) -> Self {
        Self {
            player_name:         player_name.to_string(),
            state:               PlayerState::NotAvailable,
            bracket:             String::new(),
            placement:           None,
            eliminated_by:       String::new(),
            last_match_round:    String::new(),
            last_match_result:   String::new(),
            last_match_opponent: String::new(),
        }
    }
}

/// Source of an entrant's set history, oldest first.
#[async_trait]
pub trait SetHistory: Send + Sync {
    async fn sets_for(&self, entrant_id: EntrantId) -> Vec<MatchSet>;
}

#[async_trait]
impl<T: Transport> SetHistory for Fetcher<T> {
    async fn sets_for(&self, entrant_id: EntrantId) -> Vec<MatchSet> {
        self.entrant_sets(entrant_id).await
    }
}

/// Latest-set status for one free-text player name.
///
/// Unlike `analyze_progress`, only the most recent set counts: a completed loss there
/// means `Eliminated`, whatever happened before.
pub async fn analyze_status<H>(
    player_name: &str,
    entrants: &[Entrant],
    standings: &[Standing],
    history: &H,
) -> StatusReport
where
    H: SetHistory + ?Sized,
{
    let mut report = StatusReport::new(player_name);

    let Some(subject) = EntrantIndex::build(entrants).lookup(player_name) else {
        debug!("{}: no entrant with that name or tag", player_name);
        report.state = PlayerState::NotFound;
        return report;
    };

    report.placement = standings
        .iter()
        .find(|s| s.entrant_id == Some(subject))
        .and_then(|s| s.placement);

    let sets = history.sets_for(subject).await;
    status_from_latest(report, subject, sets.last())
}

/// Fill `report` from the latest set (or its absence).
pub fn status_from_latest(mut report: StatusReport, subject: EntrantId, latest: Option<&MatchSet>) -> StatusReport {
    let Some(set) = latest else {
        report.state = PlayerState::NoMatches;
        return report;
    };

    report.last_match_round = set.round_label.clone();
    report.bracket = BracketSide::from_round_label(&set.round_label).to_string();

    let m = match normalize(set, subject) {
        Ok(m) => m,
        Err(e) => {
            warn!("{}: latest set unusable: {}", report.player_name, e);
            return report;
        }
    };
    report.last_match_opponent = m.opponent_name.clone();

    report.last_match_result = match m.result {
        MatchResult::Pending => set.state.to_string(),
        other => other.to_string(),
    };
    if m.result == MatchResult::Lose {
        report.eliminated_by = m.opponent_name;
    }

    report.state = if set.state == SetState::Completed && m.result == MatchResult::Lose {
        PlayerState::Eliminated
    } else {
        PlayerState::Active
    };
    report
}
