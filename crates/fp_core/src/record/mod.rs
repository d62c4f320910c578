//! The canonical prediction record and its field types.
//!
//! One record exists per (fixture, viewing-team) pair. It is plain
//! structured data and round-trips losslessly through JSON for the durable
//! store contract.

pub mod buckets;
pub mod derive;
pub mod editor;
pub mod store;

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use buckets::{
    CornersBucket, FirstGoalBucket, GoalsBucket, MatchScenario, RedBucket, ShotsBucket,
    ShotsOnTargetBucket, Tempo, YellowBucket,
};
pub use editor::PlayerEditSnapshot;
pub use store::{MatchInput, PlayerInput, PredictionStore};

/// A bucket value plus its provenance.
///
/// `derived` values were written by the derivation pass and may be replaced
/// by a later derivation; explicit user picks (`derived == false`) are never
/// clobbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Derivable<T> {
    pub value: T,
    #[serde(default)]
    pub derived: bool,
}

impl<T> Derivable<T> {
    pub fn user(value: T) -> Self {
        Self { value, derived: false }
    }

    pub fn auto(value: T) -> Self {
        Self { value, derived: true }
    }
}

/// Match-level prediction fields. Every field starts unset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchPredictions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_half_home: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_half_away: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_time_home: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_time_away: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_goals: Option<Derivable<GoalsBucket>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_goal: Option<FirstGoalBucket>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yellow_cards: Option<Derivable<YellowBucket>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub red_cards: Option<Derivable<RedBucket>>,
    /// Home possession percentage, 0-100.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub possession_home: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shots: Option<ShotsBucket>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shots_on_target: Option<ShotsOnTargetBucket>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corners: Option<CornersBucket>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tempo: Option<Tempo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenario: Option<MatchScenario>,
}

impl MatchPredictions {
    pub fn is_empty(&self) -> bool {
        self.first_half_home.is_none()
            && self.first_half_away.is_none()
            && self.full_time_home.is_none()
            && self.full_time_away.is_none()
            && self.total_goals.is_none()
            && self.first_goal.is_none()
            && self.yellow_cards.is_none()
            && self.red_cards.is_none()
            && self.possession_home.is_none()
            && self.shots.is_none()
            && self.shots_on_target.is_none()
            && self.corners.is_none()
            && self.tempo.is_none()
            && self.scenario.is_none()
    }

    /// True when at least one field holds an explicit user pick (derived
    /// buckets alone do not count as a user prediction).
    pub fn has_user_pick(&self) -> bool {
        self.first_half_home.is_some()
            || self.first_half_away.is_some()
            || self.full_time_home.is_some()
            || self.full_time_away.is_some()
            || matches!(self.total_goals, Some(d) if !d.derived)
            || self.first_goal.is_some()
            || matches!(self.yellow_cards, Some(d) if !d.derived)
            || matches!(self.red_cards, Some(d) if !d.derived)
            || self.possession_home.is_some()
            || self.shots.is_some()
            || self.shots_on_target.is_some()
            || self.corners.is_some()
            || self.tempo.is_some()
            || self.scenario.is_some()
    }
}

/// Per-player prediction fields. Mutual exclusions (`substituted_out` vs
/// `injured_out`, `direct_red_card` vs `second_yellow_red`) are enforced by
/// the store on write, never stored violated.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerPrediction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub will_score: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal_count: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub will_assist: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assist_count: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yellow_card: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direct_red_card: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second_yellow_red: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub penalty_scored: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub substituted_out: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub substitute_player: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub substitute_minute: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub injured_out: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub injury_substitute_player: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub injury_substitute_minute: Option<u8>,
}

impl PlayerPrediction {
    pub fn is_empty(&self) -> bool {
        *self == PlayerPrediction::default()
    }

    /// Predicted goals for derivation: explicit count, else 1 when the
    /// will-score flag is on.
    pub fn predicted_goals(&self) -> u8 {
        match (self.will_score, self.goal_count) {
            (_, Some(n)) => n,
            (Some(true), None) => 1,
            _ => 0,
        }
    }

    pub fn predicts_dismissal(&self) -> bool {
        self.direct_red_card == Some(true) || self.second_yellow_red == Some(true)
    }
}

/// Categories a prediction can fall into, used for focus marking and for
/// predicted-vs-actual accuracy checks. Player-scoped categories carry the
/// player id next to the entry, not inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionCategory {
    FirstHalfScore,
    FullTimeScore,
    TotalGoals,
    FirstGoal,
    YellowCards,
    RedCards,
    Possession,
    Shots,
    ShotsOnTarget,
    Corners,
    Tempo,
    Scenario,
    WillScore,
    WillAssist,
    PlayerYellowCard,
    PlayerRedCard,
    PenaltyScored,
    SubstitutedOut,
}

/// One focus entry: a prediction marked for a scoring multiplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusEntry {
    pub category: PredictionCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_id: Option<String>,
}

impl FocusEntry {
    pub fn match_level(category: PredictionCategory) -> Self {
        Self { category, player_id: None }
    }

    pub fn player(category: PredictionCategory, player_id: impl Into<String>) -> Self {
        Self { category, player_id: Some(player_id.into()) }
    }
}

/// The persisted prediction record for one (fixture, viewing-team) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionRecord {
    pub match_predictions: MatchPredictions,
    pub player_predictions: BTreeMap<String, PlayerPrediction>,
    pub locked_player_ids: BTreeSet<String>,
    pub is_prediction_locked: bool,
    /// Monotonic: once true, never reset for the life of the record.
    pub has_viewed_community_data: bool,
    /// Monotonic: once true, never reset for the life of the record.
    pub has_viewed_real_lineup: bool,
    pub made_after_community_viewed: bool,
    pub focused_predictions: Vec<FocusEntry>,
    /// Live sentiment signal, 1-10. Re-settable regardless of lock state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_performance_rating: Option<u8>,
    pub timestamp: DateTime<Utc>,
}

impl Default for PredictionRecord {
    fn default() -> Self {
        Self {
            match_predictions: MatchPredictions::default(),
            player_predictions: BTreeMap::new(),
            locked_player_ids: BTreeSet::new(),
            is_prediction_locked: false,
            has_viewed_community_data: false,
            has_viewed_real_lineup: false,
            made_after_community_viewed: false,
            focused_predictions: Vec::new(),
            team_performance_rating: None,
            timestamp: Utc::now(),
        }
    }
}

impl PredictionRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the user holds any prediction at all, match-level or
    /// per-player.
    pub fn has_any_prediction(&self) -> bool {
        self.match_predictions.has_user_pick()
            || self.player_predictions.values().any(|p| !p.is_empty())
    }

    /// Resolve inconsistencies toward "more locked": an open valve always
    /// implies a closed master lock, and a locked player must still hold a
    /// prediction. Applied after deserialization.
    pub fn normalize(&mut self) {
        if self.has_viewed_community_data || self.has_viewed_real_lineup {
            self.is_prediction_locked = true;
        }
        let players = &self.player_predictions;
        self.locked_player_ids.retain(|id| players.get(id).is_some_and(|p| !p.is_empty()));
    }
}
