//! Derivation engine: one topological pass over the record after every
//! store write.
//!
//! Pass order: score floors first, then each derived bucket is recomputed
//! from its authoritative source. Each field is written at most once per
//! pass and derivation never touches a field holding an explicit user pick,
//! so there are no update cycles and no clobbered choices.

use super::buckets::{GoalsBucket, RedBucket, YellowBucket};
use super::{Derivable, PredictionRecord};

/// Run the full derivation pass.
pub fn run(record: &mut PredictionRecord) {
    floor_full_time(record);
    derive_total_goals(record);
    derive_yellow_cards(record);
    derive_red_cards(record);
}

/// Full-time can never sit below first-half for the same side: setting
/// first-half seeds full-time up, and raising first-half later pulls an
/// existing full-time up to match.
fn floor_full_time(record: &mut PredictionRecord) {
    let m = &mut record.match_predictions;
    if let (Some(fh), Some(ft)) = (m.first_half_home, m.full_time_home) {
        if ft < fh {
            m.full_time_home = Some(fh);
        }
    }
    if let (Some(fh), Some(ft)) = (m.first_half_away, m.full_time_away) {
        if ft < fh {
            m.full_time_away = Some(fh);
        }
    }
}

/// Total-goals bucket. The full-time score is authoritative; player-derived
/// goal sums only apply while no full-time score exists. An explicit user
/// pick always wins over either source.
fn derive_total_goals(record: &mut PredictionRecord) {
    if matches!(record.match_predictions.total_goals, Some(d) if !d.derived) {
        return;
    }

    let m = &record.match_predictions;
    let from_score = match (m.full_time_home, m.full_time_away) {
        (Some(h), Some(a)) => Some(GoalsBucket::for_total(h.saturating_add(a))),
        _ => None,
    };

    let value = from_score.or_else(|| {
        let sum: u8 = record
            .player_predictions
            .values()
            .map(|p| p.predicted_goals())
            .fold(0u8, |acc, g| acc.saturating_add(g));
        (sum > 0).then(|| GoalsBucket::for_total(sum))
    });

    record.match_predictions.total_goals = value.map(Derivable::auto);
}

fn derive_yellow_cards(record: &mut PredictionRecord) {
    if matches!(record.match_predictions.yellow_cards, Some(d) if !d.derived) {
        return;
    }

    let count =
        record.player_predictions.values().filter(|p| p.yellow_card == Some(true)).count() as u8;
    record.match_predictions.yellow_cards =
        (count > 0).then(|| Derivable::auto(YellowBucket::for_count(count)));
}

fn derive_red_cards(record: &mut PredictionRecord) {
    if matches!(record.match_predictions.red_cards, Some(d) if !d.derived) {
        return;
    }

    let count = record.player_predictions.values().filter(|p| p.predicts_dismissal()).count() as u8;
    record.match_predictions.red_cards =
        (count > 0).then(|| Derivable::auto(RedBucket::for_count(count)));
}
