use startgg_client::{EntrantId, MatchSet};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    Win,
    Lose,
    Pending,
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchResult::Win => write!(f, "Win"),
            MatchResult::Lose => write!(f, "Lose"),
            MatchResult::Pending => write!(f, "Pending"),
        }
    }
}

/// One set seen from the subject entrant's side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedMatch {
    pub round_label:   String,
    pub phase:         String,
    pub opponent_name: String,
    pub opponent_id:   Option<EntrantId>,
    pub result:        MatchResult,
    pub is_next:       bool,
}

impl fmt::Display for NormalizedMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {} vs {}", self.phase, self.round_label, self.opponent_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    #[error("set {set_id:?} has {count} opposing entrants, expected at most one")]
    MultipleOpponents { set_id: String, count: usize },
    #[error("set {set_id:?} has no slot for entrant {entrant_id}")]
    SubjectMissing { set_id: String, entrant_id: EntrantId },
}

/// Classify `set` from `subject`'s point of view.
///
/// Null slots (byes, TBD) are skipped. A preview id or a missing winner is `Pending`;
/// any other winner than the subject counts as a loss.
pub fn normalize(set: &MatchSet, subject: EntrantId) -> Result<NormalizedMatch, NormalizeError> {
    if !set.has_entrant(subject) {
        return Err(NormalizeError::SubjectMissing { set_id: set.id.clone(), entrant_id: subject });
    }

    let opponents: Vec<_> = set.slots
        .iter()
        .filter(|s| s.entrant_id.is_some() && s.entrant_id != Some(subject))
        .collect();
    if opponents.len() > 1 {
        return Err(NormalizeError::MultipleOpponents { set_id: set.id.clone(), count: opponents.len() });
    }
    let opponent = opponents.first();

    let result = match set.winner_id {
        _ if set.is_preview() => MatchResult::Pending,
        None => MatchResult::Pending,
        Some(w) if w == subject => MatchResult::Win,
        Some(_) => MatchResult::Lose,
    };

    Ok(NormalizedMatch {
        round_label:   set.round_label.clone(),
        phase:         set.phase_name.clone(),
        opponent_name: opponent.and_then(|s| s.entrant_name.clone()).unwrap_or_default(),
        opponent_id:   opponent.and_then(|s| s.entrant_id),
        result,
        is_next:       result == MatchResult::Pending,
    })
}

/// Bracket side guessed from round text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BracketSide {
    Winners,
    Losers,
    Other(String),
}

impl BracketSide {
    pub fn from_round_label(label: &str) -> Self {
        let lower = label.to_lowercase();
        if lower.contains("losers") {
            BracketSide::Losers
        } else if lower.contains("winners") {
            BracketSide::Winners
        } else {
            BracketSide::Other(label.to_string())
        }
    }
}

impl fmt::Display for BracketSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BracketSide::Winners => write!(f, "Winners"),
            BracketSide::Losers => write!(f, "Losers"),
            BracketSide::Other(label) => write!(f, "{label}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{loss, pending, set, win, ME};
    use startgg_client::Slot;

    #[test]
    fn win_lose_and_pending() {
        assert_eq!(normalize(&win("1", 7), ME).unwrap().result, MatchResult::Win);

        let lost = normalize(&loss("2", 7), ME).unwrap();
        assert_eq!(lost.result, MatchResult::Lose);
        assert_eq!(lost.opponent_id, Some(7));
        assert_eq!(lost.opponent_name, "opp7");
        assert!(!lost.is_next);

        let next = normalize(&pending("3", 8), ME).unwrap();
        assert_eq!(next.result, MatchResult::Pending);
        assert!(next.is_next);
    }

    #[test]
    fn preview_id_is_pending_even_with_winner() {
        let mut s = win("preview_1300416_1_4", 7);
        s.winner_id = Some(ME);
        assert_eq!(normalize(&s, ME).unwrap().result, MatchResult::Pending);
    }

    #[test]
    fn null_opponent_slot_is_tolerated() {
        let mut s = pending("4", 7);
        s.slots[1] = Slot::empty();
        let m = normalize(&s, ME).unwrap();
        assert_eq!(m.opponent_id, None);
        assert_eq!(m.opponent_name, "");
    }

    #[test]
    fn two_opponents_are_rejected() {
        let mut s = set("5", "Pools", 7, None);
        s.slots.push(Slot::occupied(8, "third"));
        assert_eq!(
            normalize(&s, ME),
            Err(NormalizeError::MultipleOpponents { set_id: "5".into(), count: 2 })
        );
    }

    #[test]
    fn set_without_subject_is_rejected() {
        assert_eq!(
            normalize(&win("6", 7), 999),
            Err(NormalizeError::SubjectMissing { set_id: "6".into(), entrant_id: 999 })
        );
    }

    #[test]
    fn bracket_side_from_round_text() {
        assert_eq!(BracketSide::from_round_label("Losers Round 3"), BracketSide::Losers);
        assert_eq!(BracketSide::from_round_label("LOSERS FINAL").to_string(), "Losers");
        assert_eq!(BracketSide::from_round_label("Winners Semi-Final"), BracketSide::Winners);
        assert_eq!(BracketSide::from_round_label("Grand Final").to_string(), "Grand Final");
        assert_eq!(BracketSide::from_round_label("").to_string(), "");
    }
}
