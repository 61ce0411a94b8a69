use crate::normalize::{normalize, MatchResult, NormalizedMatch};
use startgg_client::{EntrantId, MatchSet};
use tracing::warn;

/// Double elimination: the first loss drops to losers bracket, the second ends the run.
pub const ELIMINATION_LOSSES: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressReport {
    pub player_name:    String,
    pub loss_count:     usize,
    pub is_eliminated:  bool,
    pub first_loss:     Option<NormalizedMatch>,
    pub second_loss:    Option<NormalizedMatch>,
    pub next_match:     Option<NormalizedMatch>,
    pub final_standing: Option<i64>,
}

/// Walk the entrant's sets in chronological order.
///
/// The last pending set seen becomes `next_match`. Malformed sets are skipped with a
/// warning. `final_standing` is only filled in once eliminated and comes from the
/// subject's slot on the last accepted set.
pub fn analyze_progress(player_name: &str, subject: EntrantId, sets: &[MatchSet]) -> ProgressReport {
    let mut losses: Vec<NormalizedMatch> = Vec::new();
    let mut next_match = None;
    let mut last_placement = None;

    for set in sets {
        let m = match normalize(set, subject) {
            Ok(m) => m,
            Err(e) => {
                warn!("{}: skipping set: {}", player_name, e);
                continue;
            }
        };
        last_placement = set.slot_of(subject).and_then(|s| s.standing_placement);

        match m.result {
            MatchResult::Pending => next_match = Some(m),
            MatchResult::Lose => losses.push(m),
            MatchResult::Win => {}
        }
    }

    let is_eliminated = losses.len() >= ELIMINATION_LOSSES;
    let loss_count = losses.len();
    let mut losses = losses.into_iter();

    ProgressReport {
        player_name: player_name.to_string(),
        loss_count,
        is_eliminated,
        first_loss: losses.next(),
        second_loss: losses.next(),
        next_match,
        final_standing: if is_eliminated { last_placement } else { None },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{loss, pending, win, ME};
    use startgg_client::Slot;

    #[test]
    fn lose_win_lose_is_eliminated() {
        let mut last = loss("3", 9);
        last.slots[0] = Slot::occupied(ME, "me").with_placement(33);
        let sets = vec![loss("1", 7), win("2", 8), last];

        let report = analyze_progress("me", ME, &sets);
        assert_eq!(report.loss_count, 2);
        assert!(report.is_eliminated);
        assert_eq!(report.first_loss.as_ref().unwrap().opponent_id, Some(7));
        assert_eq!(report.second_loss.as_ref().unwrap().opponent_id, Some(9));
        assert_eq!(report.final_standing, Some(33));
        assert!(report.next_match.is_none());
    }

    #[test]
    fn win_then_pending_is_still_alive() {
        let sets = vec![win("1", 7), pending("2", 8)];
        let report = analyze_progress("me", ME, &sets);

        assert_eq!(report.loss_count, 0);
        assert!(!report.is_eliminated);
        assert_eq!(report.next_match.as_ref().unwrap().opponent_id, Some(8));
        assert!(report.first_loss.is_none());
        assert!(report.second_loss.is_none());
        assert_eq!(report.final_standing, None);
    }

    #[test]
    fn later_pending_set_replaces_earlier_one() {
        let sets = vec![pending("1", 7), win("2", 8), pending("preview_3", 9)];
        let report = analyze_progress("me", ME, &sets);
        assert_eq!(report.next_match.unwrap().opponent_id, Some(9));
    }

    #[test]
    fn single_loss_keeps_player_in() {
        let report = analyze_progress("me", ME, &[win("1", 7), loss("2", 8)]);
        assert_eq!(report.loss_count, 1);
        assert!(!report.is_eliminated);
        assert_eq!(report.final_standing, None);
    }

    #[test]
    fn missing_placement_after_elimination_is_none() {
        let report = analyze_progress("me", ME, &[loss("1", 7), loss("2", 8)]);
        assert!(report.is_eliminated);
        assert_eq!(report.final_standing, None);
    }

    #[test]
    fn malformed_set_is_skipped() {
        let mut broken = loss("2", 8);
        broken.slots.push(Slot::occupied(9, "extra"));
        let report = analyze_progress("me", ME, &[loss("1", 7), broken]);
        assert_eq!(report.loss_count, 1);
        assert!(!report.is_eliminated);
    }

    #[test]
    fn no_sets_is_an_empty_report() {
        let report = analyze_progress("me", ME, &[]);
        assert_eq!(report.loss_count, 0);
        assert!(!report.is_eliminated);
        assert!(report.next_match.is_none());
    }

    #[test]
    fn losses_and_elimination_never_go_back() {
        let sets = vec![loss("1", 7), win("2", 8), pending("3", 9), loss("4", 10), win("5", 11)];
        let mut prev = analyze_progress("me", ME, &[]);
        for n in 1..=sets.len() {
            let report = analyze_progress("me", ME, &sets[..n]);
            assert!(report.loss_count >= prev.loss_count);
            assert!(report.is_eliminated || !prev.is_eliminated);
            prev = report;
        }
        assert!(prev.is_eliminated);
    }

    #[test]
    fn same_input_same_report() {
        let sets = vec![loss("1", 7), pending("2", 8)];
        let a = analyze_progress("me", ME, &sets);
        let b = analyze_progress("me", ME, &sets);
        assert_eq!(a, b);
        assert_eq!(format!("{a:?}"), format!("{b:?}"));
    }
}
