//! Domain snapshots produced at the fetcher boundary. Read-only for the rest of a run.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

pub type EntrantId = i64;

/// Set id prefix start.gg uses for sets that exist only as a bracket projection.
pub const PREVIEW_MARKER: &str = "preview";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entrant {
    pub id:           EntrantId,
    pub display_name: String,
    /// Participant gamer tags as sent by the API, in order.
    pub gamer_tags:   Vec<String>,
    /// Lower-cased, trimmed aliases: display name plus every gamer tag.
    pub tags:         BTreeSet<String>,
}

impl Entrant {
    pub fn new(id: EntrantId, display_name: impl Into<String>, gamer_tags: Vec<String>) -> Self {
        let display_name = display_name.into();
        let tags = std::iter::once(display_name.as_str())
            .chain(gamer_tags.iter().map(String::as_str))
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        Self { id, display_name, gamer_tags, tags }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SetState {
    Pending,
    InProgress,
    Completed,
}

impl SetState {
    /// start.gg `ActivityState` numbering for sets.
    pub fn from_code(code: i64) -> Self {
        match code {
            3 => SetState::Completed,
            2 | 6 => SetState::InProgress,
            _ => SetState::Pending,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_uppercase().as_str() {
            "COMPLETED" | "FINISHED" => SetState::Completed,
            "ACTIVE" | "IN_PROGRESS" | "CALLED" => SetState::InProgress,
            _ => SetState::Pending,
        }
    }
}

impl fmt::Display for SetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetState::Pending => write!(f, "PENDING"),
            SetState::InProgress => write!(f, "IN_PROGRESS"),
            SetState::Completed => write!(f, "COMPLETED"),
        }
    }
}

/// One side of a set. `entrant_id == None` is a bye or a not-yet-known opponent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub entrant_id:         Option<EntrantId>,
    pub entrant_name:       Option<String>,
    pub standing_placement: Option<i64>,
}

impl Slot {
    pub fn occupied(id: EntrantId, name: impl Into<String>) -> Self {
        Self { entrant_id: Some(id), entrant_name: Some(name.into()), standing_placement: None }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_placement(mut self, placement: i64) -> Self {
        self.standing_placement = Some(placement);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchSet {
    pub id:          String,
    pub round_label: String,
    pub state:       SetState,
    pub winner_id:   Option<EntrantId>,
    pub slots:       Vec<Slot>,
    pub phase_name:  String,
}

impl MatchSet {
    pub fn is_preview(&self) -> bool {
        self.id.contains(PREVIEW_MARKER)
    }

    pub fn has_entrant(&self, entrant_id: EntrantId) -> bool {
        self.slots.iter().any(|s| s.entrant_id == Some(entrant_id))
    }

    pub fn slot_of(&self, entrant_id: EntrantId) -> Option<&Slot> {
        self.slots.iter().find(|s| s.entrant_id == Some(entrant_id))
    }
}

/// Keep only sets where `entrant_id` sits in one of the slots.
pub fn filter_sets_by_entrant(sets: Vec<MatchSet>, entrant_id: EntrantId) -> Vec<MatchSet> {
    sets.into_iter().filter(|s| s.has_entrant(entrant_id)).collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StandingStats {
    pub phase_group_id:  Option<i64>,
    pub final_placement: Option<i64>,
    pub dq:              Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Standing {
    pub placement:    Option<i64>,
    pub entrant_id:   Option<EntrantId>,
    pub entrant_name: String,
    pub stats:        StandingStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventInfo {
    pub id:   i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseRound {
    pub id:      Option<i64>,
    pub number:  Option<i64>,
    pub best_of: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseGroup {
    pub id:                 Option<i64>,
    pub display_identifier: String,
    pub state:              Option<i64>,
    pub rounds:             Vec<PhaseRound>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventStatus {
    pub id:            i64,
    pub name:          String,
    pub state:         String,
    pub num_entrants:  Option<i64>,
    pub top_standings: Vec<Standing>,
    pub phase_groups:  Vec<PhaseGroup>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(id: &str, slots: Vec<Slot>) -> MatchSet {
        MatchSet {
            id: id.to_string(),
            round_label: "Winners Round 1".to_string(),
            state: SetState::Pending,
            winner_id: None,
            slots,
            phase_name: "Pools".to_string(),
        }
    }

    #[test]
    fn entrant_tags_are_folded_and_deduplicated() {
        let e = Entrant::new(7, "  Arslan Ash ", vec!["ARSLAN ASH".into(), "".into(), "Ash".into()]);
        assert_eq!(e.tags.iter().cloned().collect::<Vec<_>>(), vec!["arslan ash", "ash"]);
        assert_eq!(e.gamer_tags.len(), 3);
    }

    #[test]
    fn set_state_codes_and_names() {
        assert_eq!(SetState::from_code(3), SetState::Completed);
        assert_eq!(SetState::from_code(2), SetState::InProgress);
        assert_eq!(SetState::from_code(1), SetState::Pending);
        assert_eq!(SetState::from_name("finished"), SetState::Completed);
        assert_eq!(SetState::from_name("whatever"), SetState::Pending);
        assert_eq!(SetState::InProgress.to_string(), "IN_PROGRESS");
    }

    #[test]
    fn preview_sets_are_detected_by_id() {
        assert!(set("preview_1234_0_1", vec![]).is_preview());
        assert!(!set("81234567", vec![]).is_preview());
    }

    #[test]
    fn filter_keeps_only_sets_with_entrant() {
        let sets = vec![
            set("1", vec![Slot::occupied(1, "a"), Slot::occupied(2, "b")]),
            set("2", vec![Slot::occupied(3, "c"), Slot::empty()]),
            set("3", vec![Slot::empty(), Slot::occupied(1, "a")]),
        ];
        let kept: Vec<_> = filter_sets_by_entrant(sets, 1).into_iter().map(|s| s.id).collect();
        assert_eq!(kept, vec!["1", "3"]);
    }
}
