//! Bonus/penalty accumulator: the irreversible-choice facts handed to the
//! external scoring collaborator.
//!
//! No arithmetic on points happens here; this module only tracks which
//! choices the user made and guards the focus list's capacity and
//! uniqueness.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::record::{FocusEntry, MatchPredictions, PlayerPrediction, PredictionRecord};

/// Maximum number of predictions eligible for the focus multiplier.
pub const FOCUS_CAPACITY: usize = 3;

/// Why a focus addition was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusRefusal {
    CapacityReached,
    Duplicate,
}

/// True exactly when the user never opened the community-data valve and
/// never re-predicted after having opened it in a prior session.
pub fn independent_prediction_bonus(record: &PredictionRecord) -> bool {
    !record.has_viewed_community_data && !record.made_after_community_viewed
}

/// Mark a prediction for the focus multiplier. Capacity is three entries;
/// duplicates are refused without growing the list.
pub fn add_focus(record: &mut PredictionRecord, entry: FocusEntry) -> Result<(), FocusRefusal> {
    if record.focused_predictions.contains(&entry) {
        return Err(FocusRefusal::Duplicate);
    }
    if record.focused_predictions.len() >= FOCUS_CAPACITY {
        return Err(FocusRefusal::CapacityReached);
    }
    record.focused_predictions.push(entry);
    Ok(())
}

/// Remove a focus mark. Returns whether the entry was present.
pub fn remove_focus(record: &mut PredictionRecord, entry: &FocusEntry) -> bool {
    let before = record.focused_predictions.len();
    record.focused_predictions.retain(|e| e != entry);
    record.focused_predictions.len() != before
}

/// The literal payload the scoring collaborator consumes once the fixture
/// is finished and the record frozen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringPayload {
    pub match_predictions: MatchPredictions,
    pub player_predictions: BTreeMap<String, PlayerPrediction>,
    pub focused_predictions: Vec<FocusEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_performance_rating: Option<u8>,
    pub independent_prediction_bonus: bool,
    pub made_after_community_viewed: bool,
    pub has_viewed_community_data: bool,
}

/// Assemble the scoring payload from a frozen record.
pub fn scoring_payload(record: &PredictionRecord) -> ScoringPayload {
    ScoringPayload {
        match_predictions: record.match_predictions.clone(),
        player_predictions: record.player_predictions.clone(),
        focused_predictions: record.focused_predictions.clone(),
        team_performance_rating: record.team_performance_rating,
        independent_prediction_bonus: independent_prediction_bonus(record),
        made_after_community_viewed: record.made_after_community_viewed,
        has_viewed_community_data: record.has_viewed_community_data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lock;
    use crate::record::PredictionCategory;

    #[test]
    fn focus_capacity_and_uniqueness() {
        let mut record = PredictionRecord::new();

        add_focus(&mut record, FocusEntry::match_level(PredictionCategory::TotalGoals)).unwrap();
        add_focus(&mut record, FocusEntry::player(PredictionCategory::WillScore, "p9")).unwrap();
        add_focus(&mut record, FocusEntry::player(PredictionCategory::WillAssist, "p9")).unwrap();

        // Fourth distinct entry refused, length stays 3.
        let fourth = FocusEntry::match_level(PredictionCategory::Corners);
        assert_eq!(add_focus(&mut record, fourth), Err(FocusRefusal::CapacityReached));
        assert_eq!(record.focused_predictions.len(), 3);

        // Duplicate refused without growing the list.
        let dup = FocusEntry::player(PredictionCategory::WillScore, "p9");
        assert_eq!(add_focus(&mut record, dup), Err(FocusRefusal::Duplicate));
        assert_eq!(record.focused_predictions.len(), 3);
    }

    #[test]
    fn same_category_different_player_is_distinct() {
        let mut record = PredictionRecord::new();
        add_focus(&mut record, FocusEntry::player(PredictionCategory::WillScore, "p9")).unwrap();
        add_focus(&mut record, FocusEntry::player(PredictionCategory::WillScore, "p10")).unwrap();
        assert_eq!(record.focused_predictions.len(), 2);
    }

    #[test]
    fn remove_focus_reports_presence() {
        let mut record = PredictionRecord::new();
        let entry = FocusEntry::match_level(PredictionCategory::FirstGoal);
        add_focus(&mut record, entry.clone()).unwrap();

        assert!(remove_focus(&mut record, &entry));
        assert!(!remove_focus(&mut record, &entry));
        assert!(record.focused_predictions.is_empty());
    }

    #[test]
    fn independence_lost_by_either_fact() {
        let mut record = PredictionRecord::new();
        assert!(independent_prediction_bonus(&record));

        lock::open_community_valve(&mut record);
        assert!(!independent_prediction_bonus(&record));

        let mut record = PredictionRecord::new();
        record.made_after_community_viewed = true;
        assert!(!independent_prediction_bonus(&record));
    }

    #[test]
    fn payload_carries_the_three_facts() {
        let mut record = PredictionRecord::new();
        record.made_after_community_viewed = true;
        record.team_performance_rating = Some(7);
        add_focus(&mut record, FocusEntry::match_level(PredictionCategory::TotalGoals)).unwrap();

        let payload = scoring_payload(&record);
        assert!(!payload.independent_prediction_bonus);
        assert!(payload.made_after_community_viewed);
        assert_eq!(payload.focused_predictions.len(), 1);
        assert_eq!(payload.team_performance_rating, Some(7));
    }
}
