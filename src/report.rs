use anyhow::{Context, Result};
use bracket_engine::{NormalizedMatch, ProgressReport, StatusReport};
use serde::Serialize;
use startgg_client::{Entrant, EventStatus};
use std::path::Path;

/// Top of the standings shown in the run summary.
const SUMMARY_TOP: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressRow {
    pub player:        String,
    pub loss_count:    usize,
    pub is_eliminated: bool,
    pub first_loss:    String,
    pub last_loss:     String,
    pub next_match:    String,
    pub last_standing: Option<i64>,
}

fn cell(m: &Option<NormalizedMatch>) -> String {
    m.as_ref().map(ToString::to_string).unwrap_or_default()
}

impl From<&ProgressReport> for ProgressRow {
    fn from(r: &ProgressReport) -> Self {
        Self {
            player:        r.player_name.clone(),
            loss_count:    r.loss_count,
            is_eliminated: r.is_eliminated,
            first_loss:    cell(&r.first_loss),
            last_loss:     cell(&r.second_loss),
            next_match:    cell(&r.next_match),
            last_standing: r.final_standing,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusRow {
    pub player:              String,
    pub state:               String,
    pub bracket:             String,
    pub placement:           Option<i64>,
    pub eliminated_by:       String,
    pub last_match_round:    String,
    pub last_match_result:   String,
    pub last_match_opponent: String,
}

impl From<&StatusReport> for StatusRow {
    fn from(r: &StatusReport) -> Self {
        Self {
            player:              r.player_name.clone(),
            state:               r.state.to_string(),
            bracket:             r.bracket.clone(),
            placement:           r.placement,
            eliminated_by:       r.eliminated_by.clone(),
            last_match_round:    r.last_match_round.clone(),
            last_match_result:   r.last_match_result.clone(),
            last_match_opponent: r.last_match_opponent.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntrantRow {
    pub team:      String,
    pub name:      String,
    pub gamer_tag: String,
}

/// One row per participant tag. `"RB | Knee"` splits on the first `|` into team and
/// name; names without a team prefix get an empty team.
pub fn entrant_rows(entrants: &[Entrant]) -> Vec<EntrantRow> {
    let mut rows = Vec::new();
    for e in entrants {
        let (team, name) = match e.display_name.split_once('|') {
            Some((team, name)) => (team.trim(), name.trim()),
            None => ("", e.display_name.trim()),
        };
        for tag in &e.gamer_tags {
            rows.push(EntrantRow {
                team:      team.to_string(),
                name:      name.to_string(),
                gamer_tag: tag.clone(),
            });
        }
    }
    rows
}

/// Serialize `rows` to a CSV file with a header, creating the parent directory.
pub fn write_rows<S: Serialize>(path: &Path, rows: &[S]) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let mut wtr = csv::Writer::from_path(path).with_context(|| format!("open {}", path.display()))?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Human summary of an event: name, state, entrant count, then the top of the standings.
pub fn event_summary_lines(status: &EventStatus) -> Vec<String> {
    let mut lines = vec![format!(
        "{} [{}] entrants={}",
        status.name,
        if status.state.is_empty() { "?" } else { status.state.as_str() },
        status.num_entrants.map(|n| n.to_string()).unwrap_or_else(|| "?".into()),
    )];
    for s in status.top_standings.iter().take(SUMMARY_TOP) {
        let place = s.placement.map(|p| p.to_string()).unwrap_or_else(|| "-".into());
        lines.push(format!("  {:>3}. {}", place, s.entrant_name));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use bracket_engine::{MatchResult, PlayerState};
    use startgg_client::{Standing, StandingStats};

    fn m(round: &str, opponent: &str) -> NormalizedMatch {
        NormalizedMatch {
            round_label:   round.into(),
            phase:         "Pools".into(),
            opponent_name: opponent.into(),
            opponent_id:   Some(7),
            result:        MatchResult::Lose,
            is_next:       false,
        }
    }

    #[test]
    fn progress_row_renders_match_cells() {
        let report = ProgressReport {
            player_name:    "knee".into(),
            loss_count:     2,
            is_eliminated:  true,
            first_loss:     Some(m("Winners Round 2", "Arslan Ash")),
            second_loss:    Some(m("Losers Round 5", "JDCR")),
            next_match:     None,
            final_standing: Some(33),
        };
        let row = ProgressRow::from(&report);
        assert_eq!(row.first_loss, "Pools / Winners Round 2 vs Arslan Ash");
        assert_eq!(row.last_loss, "Pools / Losers Round 5 vs JDCR");
        assert_eq!(row.next_match, "");
        assert_eq!(row.last_standing, Some(33));
    }

    #[test]
    fn team_prefix_is_split_per_tag() {
        let entrants = vec![
            Entrant::new(1, "RB | Knee", vec!["Knee".into()]),
            Entrant::new(2, "  Arslan Ash ", vec!["Arslan Ash".into()]),
            Entrant::new(3, "A | B | C", vec!["p1".into(), "p2".into()]),
            Entrant::new(4, "No Participants", vec![]),
        ];
        let rows = entrant_rows(&entrants);

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], EntrantRow { team: "RB".into(), name: "Knee".into(), gamer_tag: "Knee".into() });
        assert_eq!(rows[1].team, "");
        assert_eq!(rows[1].name, "Arslan Ash");
        assert_eq!(rows[2].team, "A");
        assert_eq!(rows[2].name, "B | C");
        assert_eq!(rows[3].gamer_tag, "p2");
    }

    #[test]
    fn status_rows_written_with_empty_placement() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("evo-status.csv");

        let mut report = StatusReport::new("knee");
        report.state = PlayerState::NotFound;
        write_rows(&path, &[StatusRow::from(&report)]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "player,state,bracket,placement,eliminated_by,last_match_round,last_match_result,last_match_opponent"
        );
        assert_eq!(lines.next().unwrap(), "knee,Not Found,,,,,,");
    }

    #[test]
    fn summary_lists_top_eight() {
        let standing = |p: i64| Standing {
            placement:    Some(p),
            entrant_id:   Some(p),
            entrant_name: format!("p{p}"),
            stats:        StandingStats::default(),
        };
        let status = EventStatus {
            id:            1,
            name:          "TEKKEN 8".into(),
            state:         "COMPLETED".into(),
            num_entrants:  Some(1500),
            top_standings: (1..=10).map(standing).collect(),
            phase_groups:  vec![],
        };
        let lines = event_summary_lines(&status);
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "TEKKEN 8 [COMPLETED] entrants=1500");
        assert_eq!(lines[8], "    8. p8");
    }
}
