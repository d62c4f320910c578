//! Prediction store: the only write path into a [`PredictionRecord`].
//!
//! Every field write is gated by the lock engine's verdict for the target
//! scope. Clears are different: deleting a prediction stays allowed under
//! any lock until kickoff, and it never touches the monotonic view flags.
//! Re-selecting the value a field already holds clears it (toggle
//! semantics). Each accepted write touches the timestamp and re-runs the
//! derivation pass.

use chrono::Utc;

use super::buckets::{
    CornersBucket, FirstGoalBucket, GoalsBucket, MatchScenario, RedBucket, ShotsBucket,
    ShotsOnTargetBucket, Tempo, YellowBucket,
};
use super::{derive, Derivable, PlayerPrediction, PredictionRecord};
use crate::lock::{scope_state, LockReason, Scope};
use crate::models::{FixtureStatus, Side};

/// A user selection against one match-level field.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchInput {
    FirstHalfScore(Side, u8),
    FullTimeScore(Side, u8),
    TotalGoals(GoalsBucket),
    FirstGoal(FirstGoalBucket),
    YellowCards(YellowBucket),
    RedCards(RedBucket),
    /// Home possession percentage, 0-100.
    Possession(u8),
    Shots(ShotsBucket),
    ShotsOnTarget(ShotsOnTargetBucket),
    Corners(CornersBucket),
    Tempo(Tempo),
    Scenario(MatchScenario),
}

/// A user selection against one player's fields. Flag variants toggle;
/// count variants imply their parent flag.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerInput {
    WillScore,
    GoalCount(u8),
    WillAssist,
    AssistCount(u8),
    YellowCard,
    DirectRedCard,
    SecondYellowRed,
    PenaltyScored,
    SubstitutedOut { substitute: Option<String>, minute: Option<u8> },
    InjuredOut { substitute: Option<String>, minute: Option<u8> },
}

/// Owner of the canonical record.
#[derive(Debug, Clone, Default)]
pub struct PredictionStore {
    record: PredictionRecord,
}

impl PredictionStore {
    pub fn new() -> Self {
        Self { record: PredictionRecord::new() }
    }

    pub fn from_record(mut record: PredictionRecord) -> Self {
        record.normalize();
        Self { record }
    }

    pub fn record(&self) -> &PredictionRecord {
        &self.record
    }

    pub fn into_record(self) -> PredictionRecord {
        self.record
    }

    /// Apply a match-level selection. No-op with a reason code when the
    /// match scope is not editable.
    pub fn set_match(&mut self, status: FixtureStatus, input: MatchInput) -> Result<(), LockReason> {
        if let Some(reason) = scope_state(&self.record, status, Scope::Match).refusal() {
            log::debug!("match edit rejected: {:?}", reason);
            return Err(reason);
        }

        apply_match_input(&mut self.record, input);
        self.finish_write();
        Ok(())
    }

    /// Apply a selection to one player's prediction. Creates the entry on
    /// first edit; drops it again when the last field toggles off.
    pub fn set_player(
        &mut self,
        status: FixtureStatus,
        player_id: &str,
        input: PlayerInput,
    ) -> Result<(), LockReason> {
        if let Some(reason) = scope_state(&self.record, status, Scope::Player(player_id)).refusal() {
            log::debug!("player {} edit rejected: {:?}", player_id, reason);
            return Err(reason);
        }

        let entry = self.record.player_predictions.entry(player_id.to_string()).or_default();
        apply_player_input(entry, input);
        if entry.is_empty() {
            self.record.player_predictions.remove(player_id);
            self.record.locked_player_ids.remove(player_id);
        }
        self.finish_write();
        Ok(())
    }

    /// Empty all match-level fields. Deleting a prediction is allowed even
    /// while the record is locked by a valve or the master lock; the
    /// monotonic view flags and the lock itself are untouched. Only kickoff
    /// freezes clears.
    pub fn clear_match(&mut self, status: FixtureStatus) -> Result<(), LockReason> {
        self.check_clear(status)?;

        self.record.match_predictions = Default::default();
        self.finish_write();
        Ok(())
    }

    /// Empty one player's fields and release their individual lock. Same
    /// gating as [`Self::clear_match`].
    pub fn clear_player(&mut self, status: FixtureStatus, player_id: &str) -> Result<(), LockReason> {
        self.check_clear(status)?;

        self.record.player_predictions.remove(player_id);
        self.record.locked_player_ids.remove(player_id);
        self.finish_write();
        Ok(())
    }

    fn check_clear(&self, status: FixtureStatus) -> Result<(), LockReason> {
        if !status.has_started() {
            return Ok(());
        }
        if self.record.has_any_prediction() {
            Err(LockReason::MatchStarted)
        } else {
            Err(LockReason::ViewOnly)
        }
    }

    /// The team-performance rating is a live sentiment signal, not a scored
    /// prediction: it bypasses the lock engine entirely. Values clamp to
    /// 1-10.
    pub fn set_team_performance_rating(&mut self, rating: u8) {
        self.record.team_performance_rating = Some(rating.clamp(1, 10));
        self.record.timestamp = Utc::now();
    }

    // Lock-engine transitions, exposed here so callers drive one facade.

    pub fn save_and_lock(&mut self, status: FixtureStatus) -> Result<(), LockReason> {
        crate::lock::save_and_lock(&mut self.record, status)?;
        self.record.timestamp = Utc::now();
        Ok(())
    }

    pub fn unlock_master(&mut self, status: FixtureStatus) -> Result<(), LockReason> {
        crate::lock::unlock_master(&mut self.record, status)?;
        self.record.timestamp = Utc::now();
        Ok(())
    }

    pub fn lock_player(&mut self, player_id: &str) -> Result<(), crate::lock::PlayerLockError> {
        crate::lock::lock_player(&mut self.record, player_id)?;
        self.record.timestamp = Utc::now();
        Ok(())
    }

    pub fn unlock_player(&mut self, status: FixtureStatus, player_id: &str) -> Result<(), LockReason> {
        crate::lock::unlock_player(&mut self.record, status, player_id)?;
        self.record.timestamp = Utc::now();
        Ok(())
    }

    pub fn open_community_valve(&mut self) {
        crate::lock::open_community_valve(&mut self.record);
        self.record.timestamp = Utc::now();
    }

    pub fn reveal_real_lineup(
        &mut self,
        status: FixtureStatus,
        lineup_known: bool,
    ) -> Result<(), crate::lock::RevealRefusal> {
        crate::lock::reveal_real_lineup(&mut self.record, status, lineup_known)?;
        self.record.timestamp = Utc::now();
        Ok(())
    }

    pub fn scope_state(&self, status: FixtureStatus, scope: Scope<'_>) -> crate::lock::ScopeState {
        scope_state(&self.record, status, scope)
    }

    pub fn visibility(&self, status: FixtureStatus) -> crate::lock::Visibility {
        crate::lock::visibility(&self.record, status)
    }

    pub(crate) fn record_mut(&mut self) -> &mut PredictionRecord {
        &mut self.record
    }

    fn finish_write(&mut self) {
        derive::run(&mut self.record);
        self.record.timestamp = Utc::now();
    }
}

/// Toggle helper: re-selecting the held value clears the field.
fn toggle<T: PartialEq>(slot: &mut Option<T>, value: T) {
    if slot.as_ref() == Some(&value) {
        *slot = None;
    } else {
        *slot = Some(value);
    }
}

/// Toggle for derivable buckets: a pick matching a derived value makes the
/// choice explicit instead of clearing it, since the derived value was
/// never a user selection.
fn toggle_derivable<T: PartialEq + Copy>(slot: &mut Option<Derivable<T>>, value: T) {
    match slot {
        Some(d) if !d.derived && d.value == value => *slot = None,
        _ => *slot = Some(Derivable::user(value)),
    }
}

fn apply_match_input(record: &mut PredictionRecord, input: MatchInput) {
    let m = &mut record.match_predictions;
    match input {
        MatchInput::FirstHalfScore(Side::Home, goals) => toggle(&mut m.first_half_home, goals),
        MatchInput::FirstHalfScore(Side::Away, goals) => toggle(&mut m.first_half_away, goals),
        MatchInput::FullTimeScore(Side::Home, goals) => toggle(&mut m.full_time_home, goals),
        MatchInput::FullTimeScore(Side::Away, goals) => toggle(&mut m.full_time_away, goals),
        MatchInput::TotalGoals(bucket) => toggle_derivable(&mut m.total_goals, bucket),
        MatchInput::FirstGoal(bucket) => toggle(&mut m.first_goal, bucket),
        MatchInput::YellowCards(bucket) => toggle_derivable(&mut m.yellow_cards, bucket),
        MatchInput::RedCards(bucket) => toggle_derivable(&mut m.red_cards, bucket),
        MatchInput::Possession(pct) => toggle(&mut m.possession_home, pct.min(100)),
        MatchInput::Shots(bucket) => toggle(&mut m.shots, bucket),
        MatchInput::ShotsOnTarget(bucket) => toggle(&mut m.shots_on_target, bucket),
        MatchInput::Corners(bucket) => toggle(&mut m.corners, bucket),
        MatchInput::Tempo(tempo) => toggle(&mut m.tempo, tempo),
        MatchInput::Scenario(scenario) => toggle(&mut m.scenario, scenario),
    }
}

fn apply_player_input(p: &mut PlayerPrediction, input: PlayerInput) {
    match input {
        PlayerInput::WillScore => {
            if p.will_score == Some(true) {
                p.will_score = None;
                p.goal_count = None;
            } else {
                p.will_score = Some(true);
            }
        }
        PlayerInput::GoalCount(n) => {
            if p.goal_count == Some(n) {
                p.goal_count = None;
            } else {
                p.goal_count = Some(n);
                p.will_score = Some(true);
            }
        }
        PlayerInput::WillAssist => {
            if p.will_assist == Some(true) {
                p.will_assist = None;
                p.assist_count = None;
            } else {
                p.will_assist = Some(true);
            }
        }
        PlayerInput::AssistCount(n) => {
            if p.assist_count == Some(n) {
                p.assist_count = None;
            } else {
                p.assist_count = Some(n);
                p.will_assist = Some(true);
            }
        }
        PlayerInput::YellowCard => toggle(&mut p.yellow_card, true),
        PlayerInput::DirectRedCard => {
            let was_on = p.direct_red_card == Some(true);
            p.direct_red_card = if was_on { None } else { Some(true) };
            if !was_on {
                p.second_yellow_red = None;
            }
        }
        PlayerInput::SecondYellowRed => {
            let was_on = p.second_yellow_red == Some(true);
            p.second_yellow_red = if was_on { None } else { Some(true) };
            if !was_on {
                p.direct_red_card = None;
            }
        }
        PlayerInput::PenaltyScored => toggle(&mut p.penalty_scored, true),
        PlayerInput::SubstitutedOut { substitute, minute } => {
            if p.substituted_out == Some(true) {
                p.substituted_out = None;
                p.substitute_player = None;
                p.substitute_minute = None;
            } else {
                p.substituted_out = Some(true);
                p.substitute_player = substitute;
                p.substitute_minute = minute;
                p.injured_out = None;
                p.injury_substitute_player = None;
                p.injury_substitute_minute = None;
            }
        }
        PlayerInput::InjuredOut { substitute, minute } => {
            if p.injured_out == Some(true) {
                p.injured_out = None;
                p.injury_substitute_player = None;
                p.injury_substitute_minute = None;
            } else {
                p.injured_out = Some(true);
                p.injury_substitute_player = substitute;
                p.injury_substitute_minute = minute;
                p.substituted_out = None;
                p.substitute_player = None;
                p.substitute_minute = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lock;

    const NOT_STARTED: FixtureStatus = FixtureStatus::NotStarted;

    #[test]
    fn toggle_idempotence_on_match_fields() {
        let mut store = PredictionStore::new();

        store.set_match(NOT_STARTED, MatchInput::FullTimeScore(Side::Home, 2)).unwrap();
        assert_eq!(store.record().match_predictions.full_time_home, Some(2));

        store.set_match(NOT_STARTED, MatchInput::FullTimeScore(Side::Home, 2)).unwrap();
        assert_eq!(store.record().match_predictions.full_time_home, None);

        store.set_match(NOT_STARTED, MatchInput::FullTimeScore(Side::Home, 2)).unwrap();
        assert_eq!(store.record().match_predictions.full_time_home, Some(2));
    }

    #[test]
    fn reselecting_a_derived_bucket_makes_it_explicit() {
        let mut store = PredictionStore::new();
        store.set_match(NOT_STARTED, MatchInput::FullTimeScore(Side::Home, 2)).unwrap();
        store.set_match(NOT_STARTED, MatchInput::FullTimeScore(Side::Away, 1)).unwrap();

        let derived = store.record().match_predictions.total_goals.unwrap();
        assert!(derived.derived);

        store.set_match(NOT_STARTED, MatchInput::TotalGoals(derived.value)).unwrap();
        let explicit = store.record().match_predictions.total_goals.unwrap();
        assert_eq!(explicit.value, derived.value);
        assert!(!explicit.derived, "picking the derived value promotes it to an explicit choice");

        // A second identical pick now clears it; derivation refills from the score.
        store.set_match(NOT_STARTED, MatchInput::TotalGoals(explicit.value)).unwrap();
        assert!(store.record().match_predictions.total_goals.unwrap().derived);
    }

    #[test]
    fn rejected_edit_leaves_record_untouched() {
        let mut store = PredictionStore::new();
        store.set_match(NOT_STARTED, MatchInput::FullTimeScore(Side::Home, 1)).unwrap();
        lock::save_and_lock(store.record_mut(), NOT_STARTED).unwrap();

        let before = store.record().clone();
        let err = store.set_match(NOT_STARTED, MatchInput::FullTimeScore(Side::Home, 3));
        assert_eq!(err, Err(LockReason::MasterLockClosed));
        assert_eq!(store.record(), &before);
    }

    #[test]
    fn substitution_and_injury_are_mutually_exclusive() {
        let mut store = PredictionStore::new();
        store
            .set_player(
                NOT_STARTED,
                "p4",
                PlayerInput::InjuredOut { substitute: Some("p12".to_string()), minute: Some(60) },
            )
            .unwrap();

        let p = &store.record().player_predictions["p4"];
        assert_eq!(p.injured_out, Some(true));
        assert_eq!(p.injury_substitute_player.as_deref(), Some("p12"));

        store
            .set_player(
                NOT_STARTED,
                "p4",
                PlayerInput::SubstitutedOut { substitute: Some("p14".to_string()), minute: Some(70) },
            )
            .unwrap();

        let p = &store.record().player_predictions["p4"];
        assert_eq!(p.substituted_out, Some(true));
        assert_eq!(p.injured_out, None);
        assert_eq!(p.injury_substitute_player, None);
        assert_eq!(p.injury_substitute_minute, None);
    }

    #[test]
    fn red_card_variants_are_mutually_exclusive() {
        let mut store = PredictionStore::new();
        store.set_player(NOT_STARTED, "p5", PlayerInput::DirectRedCard).unwrap();
        store.set_player(NOT_STARTED, "p5", PlayerInput::SecondYellowRed).unwrap();

        let p = &store.record().player_predictions["p5"];
        assert_eq!(p.second_yellow_red, Some(true));
        assert_eq!(p.direct_red_card, None);
    }

    #[test]
    fn goal_count_implies_will_score() {
        let mut store = PredictionStore::new();
        store.set_player(NOT_STARTED, "p9", PlayerInput::GoalCount(2)).unwrap();

        let p = &store.record().player_predictions["p9"];
        assert_eq!(p.will_score, Some(true));
        assert_eq!(p.goal_count, Some(2));
    }

    #[test]
    fn toggling_last_field_off_drops_the_entry_and_its_lock() {
        let mut store = PredictionStore::new();
        store.set_player(NOT_STARTED, "p9", PlayerInput::WillScore).unwrap();
        lock::lock_player(store.record_mut(), "p9").unwrap();
        lock::unlock_player(store.record_mut(), NOT_STARTED, "p9").unwrap();

        store.set_player(NOT_STARTED, "p9", PlayerInput::WillScore).unwrap();
        assert!(!store.record().player_predictions.contains_key("p9"));
        assert!(!store.record().locked_player_ids.contains("p9"));
    }

    #[test]
    fn clear_after_community_view_empties_fields_and_preserves_flags() {
        let mut store = PredictionStore::new();
        store.set_match(NOT_STARTED, MatchInput::FullTimeScore(Side::Home, 1)).unwrap();
        store.set_player(NOT_STARTED, "p9", PlayerInput::WillScore).unwrap();
        lock::open_community_valve(store.record_mut());

        // Field edits stay refused, but deleting the prediction is allowed.
        assert_eq!(
            store.set_match(NOT_STARTED, MatchInput::FullTimeScore(Side::Home, 2)),
            Err(LockReason::CommunityViewed)
        );
        store.clear_match(NOT_STARTED).unwrap();
        store.clear_player(NOT_STARTED, "p9").unwrap();

        assert!(store.record().match_predictions.is_empty());
        assert!(store.record().player_predictions.is_empty());
        assert!(store.record().has_viewed_community_data, "view flag survives the clear");
        assert!(store.record().is_prediction_locked, "the permanent lock survives the clear");
    }

    #[test]
    fn clear_bypasses_the_master_lock_but_not_kickoff() {
        let mut store = PredictionStore::new();
        store.set_match(NOT_STARTED, MatchInput::FullTimeScore(Side::Home, 1)).unwrap();
        lock::save_and_lock(store.record_mut(), NOT_STARTED).unwrap();

        store.clear_match(NOT_STARTED).unwrap();
        assert!(store.record().match_predictions.is_empty());

        let mut store = PredictionStore::new();
        store.set_match(NOT_STARTED, MatchInput::FullTimeScore(Side::Home, 1)).unwrap();
        assert_eq!(
            store.clear_match(FixtureStatus::Live { minute: 3 }),
            Err(LockReason::MatchStarted)
        );
        assert_eq!(store.record().match_predictions.full_time_home, Some(1));
    }

    #[test]
    fn clear_match_empties_fields() {
        let mut store = PredictionStore::new();
        store.set_match(NOT_STARTED, MatchInput::FullTimeScore(Side::Home, 1)).unwrap();
        store.set_match(NOT_STARTED, MatchInput::Tempo(Tempo::Fast)).unwrap();

        store.clear_match(NOT_STARTED).unwrap();
        assert!(store.record().match_predictions.is_empty());
    }

    #[test]
    fn rating_bypasses_the_lock_engine() {
        let mut store = PredictionStore::new();
        store.set_match(NOT_STARTED, MatchInput::FullTimeScore(Side::Home, 1)).unwrap();
        lock::save_and_lock(store.record_mut(), NOT_STARTED).unwrap();

        store.set_team_performance_rating(9);
        assert_eq!(store.record().team_performance_rating, Some(9));

        store.set_team_performance_rating(0);
        assert_eq!(store.record().team_performance_rating, Some(1), "rating clamps to 1-10");
        store.set_team_performance_rating(14);
        assert_eq!(store.record().team_performance_rating, Some(10));
    }

    #[test]
    fn derivation_runs_after_each_write() {
        let mut store = PredictionStore::new();
        store.set_player(NOT_STARTED, "p1", PlayerInput::YellowCard).unwrap();
        store.set_player(NOT_STARTED, "p2", PlayerInput::YellowCard).unwrap();
        store.set_player(NOT_STARTED, "p3", PlayerInput::YellowCard).unwrap();

        let yellows = store.record().match_predictions.yellow_cards.unwrap();
        assert_eq!(yellows.value, YellowBucket::ThreeToFive);
        assert!(yellows.derived);
    }
}
