//! Event reconciler: turns the raw event stream and statistic snapshots
//! into the "actual outcome" view.
//!
//! Tallies are recomputed from scratch over the full event list on every
//! update. The upstream push may repeat or reorder deliveries; recomputing
//! keeps the tallies identical either way and nothing double-counts.
//!
//! This module never writes to the prediction record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{CardSeverity, EventKind, FixtureStatus, Lineup, MatchEvent, RosterPlayer, Side, StatSnapshot};
use crate::record::buckets::{
    CornersBucket, FirstGoalBucket, GoalsBucket, RedBucket, ShotsBucket, ShotsOnTargetBucket,
    YellowBucket,
};
use crate::record::PredictionCategory;

/// Per-player facts accumulated from the event stream.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlayerFacts {
    pub goals: u8,
    pub penalty_goals: u8,
    pub assists: u8,
    pub yellow_cards: u8,
    pub dismissed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub substituted_out_minute: Option<u8>,
}

/// The reconciled "actual outcome" view of one fixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActualOutcome {
    pub status: FixtureStatus,
    pub first_half_home: u8,
    pub first_half_away: u8,
    pub full_time_home: u8,
    pub full_time_away: u8,
    pub yellow_cards: u8,
    pub red_cards: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_goal_minute: Option<u8>,
    pub players: BTreeMap<String, PlayerFacts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<StatSnapshot>,
}

/// Result of comparing one predicted value against the reconciled facts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracyCheck {
    pub is_correct: bool,
    pub actual: PredictedValue,
}

/// A predicted value in a shape comparable against the actual outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictedValue {
    Score { home: u8, away: u8 },
    TotalGoals(GoalsBucket),
    FirstGoal(FirstGoalBucket),
    YellowCards(YellowBucket),
    RedCards(RedBucket),
    /// Home possession percentage.
    Possession(u8),
    Shots(ShotsBucket),
    ShotsOnTarget(ShotsOnTargetBucket),
    Corners(CornersBucket),
    Flag(bool),
}

impl ActualOutcome {
    /// Rebuild the outcome view from the full event list. Order of delivery
    /// does not matter and duplicates of the whole list produce the same
    /// result.
    pub fn reconcile(
        status: FixtureStatus,
        events: &[MatchEvent],
        snapshot: Option<&StatSnapshot>,
    ) -> Self {
        let mut out = ActualOutcome {
            status,
            first_half_home: 0,
            first_half_away: 0,
            full_time_home: 0,
            full_time_away: 0,
            yellow_cards: 0,
            red_cards: 0,
            first_goal_minute: None,
            players: BTreeMap::new(),
            stats: snapshot.copied(),
        };

        let mut first_goal: Option<(u8, u8)> = None; // (minute, added)

        for event in events {
            match &event.kind {
                EventKind::Goal { scorer, assist, own_goal, penalty } => {
                    // Own goals count for the opposing side.
                    let credited = if *own_goal { event.side.opposite() } else { event.side };
                    match credited {
                        Side::Home => out.full_time_home += 1,
                        Side::Away => out.full_time_away += 1,
                    }
                    if event.in_first_half() {
                        match credited {
                            Side::Home => out.first_half_home += 1,
                            Side::Away => out.first_half_away += 1,
                        }
                    }

                    let key = (event.minute, event.added_minutes.unwrap_or(0));
                    if first_goal.is_none_or(|cur| key < cur) {
                        first_goal = Some(key);
                    }

                    // Own goals are not credited to the scorer's tally.
                    if !*own_goal {
                        match scorer.as_ref().and_then(|p| p.id.as_deref()) {
                            Some(id) => {
                                let facts = out.players.entry(id.to_string()).or_default();
                                facts.goals += 1;
                                if *penalty {
                                    facts.penalty_goals += 1;
                                }
                            }
                            None => log::warn!(
                                "goal event at minute {} has no scorer id; counted without attribution",
                                event.minute
                            ),
                        }
                    }
                    if let Some(id) = assist.as_ref().and_then(|p| p.id.as_deref()) {
                        out.players.entry(id.to_string()).or_default().assists += 1;
                    }
                }
                EventKind::Card { player, severity } => {
                    if matches!(severity, CardSeverity::Yellow | CardSeverity::SecondYellow) {
                        out.yellow_cards += 1;
                    }
                    if severity.is_red() {
                        out.red_cards += 1;
                    }
                    match player.as_ref().and_then(|p| p.id.as_deref()) {
                        Some(id) => {
                            let facts = out.players.entry(id.to_string()).or_default();
                            if matches!(severity, CardSeverity::Yellow | CardSeverity::SecondYellow) {
                                facts.yellow_cards += 1;
                            }
                            if severity.is_red() {
                                facts.dismissed = true;
                            }
                        }
                        None => log::warn!(
                            "card event at minute {} has no player id; counted without attribution",
                            event.minute
                        ),
                    }
                }
                EventKind::Substitution { player_out, .. } => {
                    match player_out.as_ref().and_then(|p| p.id.as_deref()) {
                        Some(id) => {
                            out.players.entry(id.to_string()).or_default().substituted_out_minute =
                                Some(event.minute);
                        }
                        None => log::warn!(
                            "substitution at minute {} has no outgoing player id; skipped",
                            event.minute
                        ),
                    }
                }
            }
        }

        out.first_goal_minute = first_goal.map(|(minute, _)| minute);
        out
    }

    // Bucketed bands, computed with the same threshold tables the
    // derivation engine uses.

    pub fn total_goals_bucket(&self) -> GoalsBucket {
        GoalsBucket::for_total(self.full_time_home.saturating_add(self.full_time_away))
    }

    pub fn first_goal_bucket(&self) -> FirstGoalBucket {
        match self.first_goal_minute {
            Some(minute) => FirstGoalBucket::for_minute(minute),
            None => FirstGoalBucket::NoGoal,
        }
    }

    pub fn yellow_bucket(&self) -> YellowBucket {
        YellowBucket::for_count(self.yellow_cards)
    }

    pub fn red_bucket(&self) -> RedBucket {
        RedBucket::for_count(self.red_cards)
    }

    pub fn shots_bucket(&self) -> Option<ShotsBucket> {
        self.stats.and_then(|s| s.shots).map(|s| ShotsBucket::for_count(s.total()))
    }

    pub fn shots_on_target_bucket(&self) -> Option<ShotsOnTargetBucket> {
        self.stats.and_then(|s| s.shots_on_target).map(|s| ShotsOnTargetBucket::for_count(s.total()))
    }

    pub fn corners_bucket(&self) -> Option<CornersBucket> {
        self.stats.and_then(|s| s.corners).map(|s| CornersBucket::for_count(s.total()))
    }

    /// Compare a predicted value against the facts. Returns `None` while the
    /// fixture has not started or the needed fact is not yet known.
    pub fn check_accuracy(
        &self,
        category: PredictionCategory,
        player_id: Option<&str>,
        predicted: &PredictedValue,
    ) -> Option<AccuracyCheck> {
        if !self.status.has_started() {
            return None;
        }
        let finished = self.status.is_finished();
        let past_half_time = finished || matches!(self.status, FixtureStatus::Live { minute } if minute > 45);

        let actual = match category {
            PredictionCategory::FirstHalfScore => {
                if !past_half_time {
                    return None;
                }
                PredictedValue::Score { home: self.first_half_home, away: self.first_half_away }
            }
            PredictionCategory::FullTimeScore => {
                if !finished {
                    return None;
                }
                PredictedValue::Score { home: self.full_time_home, away: self.full_time_away }
            }
            PredictionCategory::TotalGoals => {
                if !finished {
                    return None;
                }
                PredictedValue::TotalGoals(self.total_goals_bucket())
            }
            PredictionCategory::FirstGoal => {
                // A goal pins the band immediately; "no goal" is only a fact
                // at full time.
                if self.first_goal_minute.is_none() && !finished {
                    return None;
                }
                PredictedValue::FirstGoal(self.first_goal_bucket())
            }
            PredictionCategory::YellowCards => {
                if !finished {
                    return None;
                }
                PredictedValue::YellowCards(self.yellow_bucket())
            }
            PredictionCategory::RedCards => {
                if !finished {
                    return None;
                }
                PredictedValue::RedCards(self.red_bucket())
            }
            PredictionCategory::Possession => {
                if !finished {
                    return None;
                }
                PredictedValue::Possession(self.stats.and_then(|s| s.possession_home)?)
            }
            PredictionCategory::Shots => {
                if !finished {
                    return None;
                }
                PredictedValue::Shots(self.shots_bucket()?)
            }
            PredictionCategory::ShotsOnTarget => {
                if !finished {
                    return None;
                }
                PredictedValue::ShotsOnTarget(self.shots_on_target_bucket()?)
            }
            PredictionCategory::Corners => {
                if !finished {
                    return None;
                }
                PredictedValue::Corners(self.corners_bucket()?)
            }
            // No actual fact exists for these subjective categories.
            PredictionCategory::Tempo | PredictionCategory::Scenario => return None,
            PredictionCategory::WillScore => self.player_flag(player_id?, finished, |f| f.goals > 0)?,
            PredictionCategory::WillAssist => {
                self.player_flag(player_id?, finished, |f| f.assists > 0)?
            }
            PredictionCategory::PlayerYellowCard => {
                self.player_flag(player_id?, finished, |f| f.yellow_cards > 0)?
            }
            PredictionCategory::PlayerRedCard => {
                self.player_flag(player_id?, finished, |f| f.dismissed)?
            }
            PredictionCategory::PenaltyScored => {
                self.player_flag(player_id?, finished, |f| f.penalty_goals > 0)?
            }
            PredictionCategory::SubstitutedOut => {
                self.player_flag(player_id?, finished, |f| f.substituted_out_minute.is_some())?
            }
        };

        Some(AccuracyCheck { is_correct: *predicted == actual, actual })
    }

    /// Player flags are confirmed as soon as they become true; their absence
    /// is only a fact at full time.
    fn player_flag(
        &self,
        player_id: &str,
        finished: bool,
        f: impl Fn(&PlayerFacts) -> bool,
    ) -> Option<PredictedValue> {
        let value = self.players.get(player_id).map(&f).unwrap_or(false);
        if value || finished {
            Some(PredictedValue::Flag(value))
        } else {
            None
        }
    }
}

/// Overlay substitutions onto a displayed lineup: the outgoing starter's
/// slot is taken over in place by the incoming player, who inherits the
/// formation slot and position label and is tagged with the substitution
/// minute.
pub fn overlay_substitutions(lineup: &Lineup, events: &[MatchEvent], side: Side) -> Lineup {
    let mut result = lineup.clone();

    let mut subs: Vec<&MatchEvent> = events
        .iter()
        .filter(|e| e.side == side && matches!(e.kind, EventKind::Substitution { .. }))
        .collect();
    subs.sort_by_key(|e| (e.minute, e.added_minutes.unwrap_or(0)));

    for event in subs {
        let EventKind::Substitution { player_out, player_in } = &event.kind else { continue };

        let Some(out_id) = player_out.as_ref().and_then(|p| p.id.as_deref()) else {
            log::warn!("substitution at minute {} has no outgoing player id; skipped", event.minute);
            continue;
        };
        let Some(incoming) = player_in.as_ref() else {
            log::warn!("substitution at minute {} has no incoming player; skipped", event.minute);
            continue;
        };

        let Some(slot) = result.slots.iter_mut().find(|s| s.player.id == out_id) else {
            // Outgoing player is not on display (e.g. a sub replacing a sub
            // already overlaid, or bench-only data); nothing to overlay.
            continue;
        };

        let id = incoming.id.clone().or_else(|| incoming.name.clone()).unwrap_or_default();
        let name = incoming.name.clone().or_else(|| incoming.id.clone()).unwrap_or_default();
        slot.player = RosterPlayer {
            id,
            name,
            shirt_number: None,
            position: slot.player.position.clone(),
            rating: None,
        };
        slot.substituted_in_minute = Some(event.minute);
    }

    result
}
