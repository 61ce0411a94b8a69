//! Wire schema for the start.gg responses we consume.
//!
//! Every field is optional: start.gg returns `null` for anything a token may not see,
//! and nodes inside lists can be `null` too. Conversion into `model` happens here and
//! only here, so analyzers never deal with missing fields.

use crate::model::{
    Entrant, EventInfo, EventStatus, MatchSet, PhaseGroup, PhaseRound, SetState, Slot, Standing,
    StandingStats,
};
use serde::Deserialize;
use tracing::debug;

// ====================================================================
// Envelope + scalars
// ====================================================================

#[derive(Debug, Deserialize)]
pub struct GqlResponse<D> {
    pub data:   Option<D>,
    pub errors: Option<Vec<GqlError>>,
}

#[derive(Debug, Deserialize)]
pub struct GqlError {
    pub message: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdInner {
    Number(serde_json::Number),
    String(String),
}

/// start.gg ids arrive as JSON numbers or strings depending on the field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "IdInner")]
pub struct Id(pub String);

impl From<IdInner> for Id {
    fn from(inner: IdInner) -> Self {
        Self(match inner {
            IdInner::Number(n) => n.to_string(),
            IdInner::String(s) => s,
        })
    }
}

impl Id {
    pub fn as_i64(&self) -> Option<i64> {
        self.0.trim().parse().ok()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SetStateRaw {
    Code(i64),
    Name(String),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub total_pages: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<N> {
    pub page_info: Option<PageInfo>,
    pub nodes:     Option<Vec<Option<N>>>,
}

impl<N> Default for Connection<N> {
    fn default() -> Self {
        Self { page_info: None, nodes: None }
    }
}

impl<N> Connection<N> {
    /// Missing page info counts as zero pages.
    pub fn total_pages(&self) -> i64 {
        self.page_info.as_ref().and_then(|p| p.total_pages).unwrap_or(0)
    }

    pub fn into_nodes(self) -> Vec<N> {
        self.nodes.unwrap_or_default().into_iter().flatten().collect()
    }
}

// ====================================================================
// Nodes
// ====================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantNode {
    pub gamer_tag: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntrantNode {
    pub id:           Option<Id>,
    pub name:         Option<String>,
    pub participants: Option<Vec<Option<ParticipantNode>>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingStatsNode {
    pub phase_group_id:  Option<Id>,
    pub final_placement: Option<i64>,
    pub dq:              Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingNode {
    pub placement: Option<i64>,
    pub entrant:   Option<EntrantNode>,
    pub stats:     Option<StandingStatsNode>,
}

#[derive(Debug, Deserialize)]
pub struct SlotStandingNode {
    pub placement: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SlotEntrantNode {
    pub id:       Option<Id>,
    pub name:     Option<String>,
    pub standing: Option<SlotStandingNode>,
}

#[derive(Debug, Deserialize)]
pub struct SlotNode {
    pub entrant: Option<SlotEntrantNode>,
}

#[derive(Debug, Deserialize)]
pub struct PhaseNode {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PhaseGroupRef {
    pub phase: Option<PhaseNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetNode {
    pub id:              Option<Id>,
    pub round:           Option<i64>,
    pub full_round_text: Option<String>,
    pub state:           Option<SetStateRaw>,
    pub winner_id:       Option<Id>,
    pub slots:           Option<Vec<Option<SlotNode>>>,
    pub phase_group:     Option<PhaseGroupRef>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundNode {
    pub id:      Option<Id>,
    pub number:  Option<i64>,
    pub best_of: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseGroupNode {
    pub id:                 Option<Id>,
    pub display_identifier: Option<String>,
    pub state:              Option<i64>,
    pub rounds:             Option<Vec<Option<RoundNode>>>,
}

// ====================================================================
// Per-query `data` payloads
// ====================================================================

#[derive(Debug, Default, Deserialize)]
pub struct EventInfoData {
    pub event: Option<EventInfoNode>,
}

#[derive(Debug, Deserialize)]
pub struct EventInfoNode {
    pub id:   Option<Id>,
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EventStatusData {
    pub event: Option<EventStatusNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStatusNode {
    pub id:           Option<Id>,
    pub name:         Option<String>,
    pub state:        Option<String>,
    pub num_entrants: Option<i64>,
    pub standings:    Option<Connection<StandingNode>>,
    pub phase_groups: Option<Vec<Option<PhaseGroupNode>>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EntrantsData {
    pub event: Option<EventEntrants>,
}

#[derive(Debug, Deserialize)]
pub struct EventEntrants {
    pub entrants: Option<Connection<EntrantNode>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StandingsData {
    pub event: Option<EventStandings>,
}

#[derive(Debug, Deserialize)]
pub struct EventStandings {
    pub standings: Option<Connection<StandingNode>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EventSetsData {
    pub event: Option<SetsHolder>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EntrantSetsData {
    pub entrant: Option<SetsHolder>,
}

#[derive(Debug, Deserialize)]
pub struct SetsHolder {
    pub sets: Option<Connection<SetNode>>,
}

// ====================================================================
// Connection extractors (used by the paginator)
// ====================================================================

pub fn entrants_connection(data: EntrantsData) -> Connection<EntrantNode> {
    data.event.and_then(|e| e.entrants).unwrap_or_default()
}

pub fn standings_connection(data: StandingsData) -> Connection<StandingNode> {
    data.event.and_then(|e| e.standings).unwrap_or_default()
}

pub fn event_sets_connection(data: EventSetsData) -> Connection<SetNode> {
    data.event.and_then(|e| e.sets).unwrap_or_default()
}

pub fn entrant_sets_connection(data: EntrantSetsData) -> Connection<SetNode> {
    data.entrant.and_then(|e| e.sets).unwrap_or_default()
}

// ====================================================================
// Conversion into the domain model
// ====================================================================

/// Entrants without a numeric id cannot be indexed and are dropped.
pub fn to_entrant(node: EntrantNode) -> Option<Entrant> {
    let Some(id) = node.id.as_ref().and_then(Id::as_i64) else {
        debug!("dropping entrant without numeric id: {:?}", node.name);
        return None;
    };
    let tags = node.participants
        .unwrap_or_default()
        .into_iter()
        .flatten()
        .filter_map(|p| p.gamer_tag)
        .collect();
    Some(Entrant::new(id, node.name.unwrap_or_default(), tags))
}

pub fn to_standing(node: StandingNode) -> Standing {
    let (entrant_id, entrant_name) = match node.entrant {
        Some(e) => (e.id.as_ref().and_then(Id::as_i64), e.name.unwrap_or_default()),
        None => (None, String::new()),
    };
    let stats = node.stats
        .map(|s| StandingStats {
            phase_group_id:  s.phase_group_id.as_ref().and_then(Id::as_i64),
            final_placement: s.final_placement,
            dq:              s.dq,
        })
        .unwrap_or_default();
    Standing { placement: node.placement, entrant_id, entrant_name, stats }
}

/// `fullRoundText` when present, otherwise derived from start.gg's signed round
/// number (negative rounds are on the losers side).
fn round_label(full_round_text: Option<String>, round: Option<i64>) -> String {
    match (full_round_text.filter(|t| !t.trim().is_empty()), round) {
        (Some(text), _) => text,
        (None, Some(n)) if n < 0 => format!("Losers Round {}", n.unsigned_abs()),
        (None, Some(n)) => format!("Winners Round {n}"),
        (None, None) => String::new(),
    }
}

fn to_slot(node: Option<SlotNode>) -> Slot {
    match node.and_then(|s| s.entrant) {
        Some(e) => Slot {
            entrant_id:         e.id.as_ref().and_then(Id::as_i64),
            entrant_name:       e.name,
            standing_placement: e.standing.and_then(|s| s.placement),
        },
        None => Slot::empty(),
    }
}

pub fn to_match_set(node: SetNode) -> MatchSet {
    let winner_id = node.winner_id.as_ref().and_then(Id::as_i64);
    let state = match node.state {
        Some(SetStateRaw::Code(code)) => SetState::from_code(code),
        Some(SetStateRaw::Name(name)) => SetState::from_name(&name),
        None if winner_id.is_some() => SetState::Completed,
        None => SetState::Pending,
    };
    MatchSet {
        id:          node.id.map(|i| i.0).unwrap_or_default(),
        round_label: round_label(node.full_round_text, node.round),
        state,
        winner_id,
        slots:       node.slots.unwrap_or_default().into_iter().map(to_slot).collect(),
        phase_name:  node.phase_group
            .and_then(|g| g.phase)
            .and_then(|p| p.name)
            .unwrap_or_default(),
    }
}

pub fn to_event_info(data: EventInfoData) -> Option<EventInfo> {
    let event = data.event?;
    Some(EventInfo {
        id:   event.id.as_ref().and_then(Id::as_i64)?,
        name: event.name.unwrap_or_default(),
    })
}

pub fn to_event_status(data: EventStatusData) -> Option<EventStatus> {
    let event = data.event?;
    let phase_groups = event.phase_groups
        .unwrap_or_default()
        .into_iter()
        .flatten()
        .map(|g| PhaseGroup {
            id:                 g.id.as_ref().and_then(Id::as_i64),
            display_identifier: g.display_identifier.unwrap_or_default(),
            state:              g.state,
            rounds:             g.rounds
                .unwrap_or_default()
                .into_iter()
                .flatten()
                .map(|r| PhaseRound {
                    id:      r.id.as_ref().and_then(Id::as_i64),
                    number:  r.number,
                    best_of: r.best_of,
                })
                .collect(),
        })
        .collect();

    Some(EventStatus {
        id:            event.id.as_ref().and_then(Id::as_i64)?,
        name:          event.name.unwrap_or_default(),
        state:         event.state.unwrap_or_default(),
        num_entrants:  event.num_entrants,
        top_standings: event.standings
            .unwrap_or_default()
            .into_nodes()
            .into_iter()
            .map(to_standing)
            .collect(),
        phase_groups,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn set_node(value: serde_json::Value) -> SetNode {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn ids_decode_from_numbers_and_strings() {
        let a: Id = serde_json::from_value(json!(19859160)).unwrap();
        let b: Id = serde_json::from_value(json!("19859160")).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_i64(), Some(19859160));

        let preview: Id = serde_json::from_value(json!("preview_1300416_1_0")).unwrap();
        assert_eq!(preview.as_i64(), None);
    }

    #[test]
    fn set_with_null_slot_and_integer_state() {
        let set = to_match_set(set_node(json!({
            "id": 77001,
            "fullRoundText": "Losers Round 3",
            "state": 3,
            "winnerId": "12",
            "slots": [
                { "entrant": { "id": 12, "name": "Knee", "standing": { "placement": 9 } } },
                null,
                { "entrant": null }
            ],
            "phaseGroup": { "phase": { "name": "Top 48" } }
        })));

        assert_eq!(set.id, "77001");
        assert_eq!(set.state, SetState::Completed);
        assert_eq!(set.winner_id, Some(12));
        assert_eq!(set.slots.len(), 3);
        assert_eq!(set.slots[0].standing_placement, Some(9));
        assert_eq!(set.slots[1], Slot::empty());
        assert_eq!(set.slots[2], Slot::empty());
        assert_eq!(set.phase_name, "Top 48");
    }

    #[test]
    fn missing_fields_default_instead_of_failing() {
        let set = to_match_set(set_node(json!({})));
        assert_eq!(set.id, "");
        assert_eq!(set.round_label, "");
        assert_eq!(set.state, SetState::Pending);
        assert!(set.slots.is_empty());
        assert_eq!(set.phase_name, "");
    }

    #[test]
    fn state_is_inferred_from_winner_when_absent() {
        let set = to_match_set(set_node(json!({ "id": 1, "winnerId": 5 })));
        assert_eq!(set.state, SetState::Completed);
    }

    #[test]
    fn round_number_fills_in_missing_round_text() {
        assert_eq!(to_match_set(set_node(json!({ "round": -3 }))).round_label, "Losers Round 3");
        assert_eq!(to_match_set(set_node(json!({ "round": 2 }))).round_label, "Winners Round 2");
        assert_eq!(
            to_match_set(set_node(json!({ "round": 5, "fullRoundText": "Grand Final" }))).round_label,
            "Grand Final"
        );
    }

    #[test]
    fn entrant_without_numeric_id_is_dropped() {
        let node: EntrantNode = serde_json::from_value(json!({ "name": "ghost" })).unwrap();
        assert!(to_entrant(node).is_none());

        let node: EntrantNode = serde_json::from_value(json!({
            "id": "42",
            "name": "TeamX | Player",
            "participants": [ { "gamerTag": "Player" }, null, { "gamerTag": null } ]
        })).unwrap();
        let entrant = to_entrant(node).unwrap();
        assert_eq!(entrant.id, 42);
        assert_eq!(entrant.gamer_tags, vec!["Player"]);
    }

    #[test]
    fn connection_without_page_info_has_zero_pages() {
        let conn: Connection<EntrantNode> = serde_json::from_value(json!({ "nodes": [null] })).unwrap();
        assert_eq!(conn.total_pages(), 0);
        assert!(conn.into_nodes().is_empty());
    }

    #[test]
    fn event_status_collects_top_standings_and_groups() {
        let data: EventStatusData = serde_json::from_value(json!({
            "event": {
                "id": 1300416,
                "name": "Tekken 8",
                "state": "ACTIVE",
                "numEntrants": 2048,
                "standings": { "nodes": [
                    { "placement": 1, "entrant": { "id": 5, "name": "Arslan Ash" } }
                ]},
                "phaseGroups": [
                    { "id": 9, "displayIdentifier": "A1", "state": 2,
                      "rounds": [ { "id": 1, "number": 1, "bestOf": 3 }, null ] },
                    null
                ]
            }
        })).unwrap();

        let status = to_event_status(data).unwrap();
        assert_eq!(status.num_entrants, Some(2048));
        assert_eq!(status.top_standings[0].entrant_name, "Arslan Ash");
        assert_eq!(status.phase_groups.len(), 1);
        assert_eq!(status.phase_groups[0].rounds[0].best_of, Some(3));
    }
}
