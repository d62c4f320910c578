//! Lock & visibility engine.
//!
//! A pure reducer over (record, fixture status) decides per scope whether
//! edits are allowed, and two one-way valves govern the community and
//! real-lineup views. Every refusal carries exactly one reason code so the
//! presentation layer never has to re-derive "why is this locked".

use serde::{Deserialize, Serialize};

use crate::models::FixtureStatus;
use crate::record::PredictionRecord;

/// Why an edit or transition was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LockReason {
    /// The fixture is live or finished.
    MatchStarted,
    /// The community-data valve was opened for this record.
    CommunityViewed,
    /// The real-lineup valve was opened for this record.
    RealLineupViewed,
    /// A reversible lock is closed (master lock, or an individual player
    /// lock while the master lock is open).
    MasterLockClosed,
    /// The user has no prediction and the fixture has started; the record is
    /// display-only.
    ViewOnly,
}

/// Editability verdict for one scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScopeState {
    Editable,
    Locked { reason: LockReason },
    ViewOnly,
}

impl ScopeState {
    /// The reason an edit against this scope would be refused, if any.
    pub fn refusal(&self) -> Option<LockReason> {
        match self {
            ScopeState::Editable => None,
            ScopeState::Locked { reason } => Some(*reason),
            ScopeState::ViewOnly => Some(LockReason::ViewOnly),
        }
    }

    pub fn is_editable(&self) -> bool {
        matches!(self, ScopeState::Editable)
    }
}

/// An edit scope: the match-level fields or one player's fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope<'a> {
    Match,
    Player(&'a str),
}

/// Refusal reasons for the real-lineup reveal offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealRefusal {
    MatchStarted,
    NoSavedPrediction,
    LineupUnknown,
    AlreadyRevealed,
}

/// Which of the three data views is shown by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataView {
    Own,
    Community,
}

/// The computed visibility flags for the three data views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visibility {
    pub community_visible: bool,
    pub real_lineup_visible: bool,
    pub view_only: bool,
    pub default_view: DataView,
}

/// A permanent lock condition, in refusal priority order. Once any of these
/// holds, unlock transitions are forbidden forever.
fn permanent_reason(record: &PredictionRecord, status: FixtureStatus) -> Option<LockReason> {
    if status.has_started() {
        Some(LockReason::MatchStarted)
    } else if record.has_viewed_community_data {
        Some(LockReason::CommunityViewed)
    } else if record.has_viewed_real_lineup {
        Some(LockReason::RealLineupViewed)
    } else {
        None
    }
}

fn is_view_only(record: &PredictionRecord, status: FixtureStatus) -> bool {
    status.has_started() && !record.has_any_prediction()
}

/// The reducer: editability of one scope given the current record and
/// fixture status.
pub fn scope_state(record: &PredictionRecord, status: FixtureStatus, scope: Scope<'_>) -> ScopeState {
    if is_view_only(record, status) {
        return ScopeState::ViewOnly;
    }
    if let Some(reason) = permanent_reason(record, status) {
        return ScopeState::Locked { reason };
    }

    match scope {
        Scope::Match => {
            if record.is_prediction_locked {
                ScopeState::Locked { reason: LockReason::MasterLockClosed }
            } else {
                ScopeState::Editable
            }
        }
        Scope::Player(id) => {
            if record.locked_player_ids.contains(id) || record.is_prediction_locked {
                ScopeState::Locked { reason: LockReason::MasterLockClosed }
            } else {
                ScopeState::Editable
            }
        }
    }
}

/// Close the master lock. Locks every player scope holding a non-empty
/// prediction along the way.
pub fn save_and_lock(record: &mut PredictionRecord, status: FixtureStatus) -> Result<(), LockReason> {
    if let Some(reason) = scope_state(record, status, Scope::Match).refusal() {
        return Err(reason);
    }

    record.is_prediction_locked = true;
    let locked: Vec<String> = record
        .player_predictions
        .iter()
        .filter(|(_, p)| !p.is_empty())
        .map(|(id, _)| id.clone())
        .collect();
    record.locked_player_ids.extend(locked);
    Ok(())
}

/// Open the master lock. Forbidden once any permanent condition holds.
pub fn unlock_master(record: &mut PredictionRecord, status: FixtureStatus) -> Result<(), LockReason> {
    if let Some(reason) = permanent_reason(record, status) {
        return Err(reason);
    }
    record.is_prediction_locked = false;
    Ok(())
}

/// Lock one player's prediction. Requires at least one non-empty field
/// (locking an empty prediction is meaningless and would violate the
/// record invariant).
pub fn lock_player(record: &mut PredictionRecord, player_id: &str) -> Result<(), PlayerLockError> {
    match record.player_predictions.get(player_id) {
        Some(p) if !p.is_empty() => {
            record.locked_player_ids.insert(player_id.to_string());
            Ok(())
        }
        _ => Err(PlayerLockError::EmptyPrediction),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PlayerLockError {
    #[error("cannot lock a player without any prediction")]
    EmptyPrediction,
}

/// Open one player's lock. Forbidden under the same permanent conditions as
/// the master unlock.
pub fn unlock_player(
    record: &mut PredictionRecord,
    status: FixtureStatus,
    player_id: &str,
) -> Result<(), LockReason> {
    if let Some(reason) = permanent_reason(record, status) {
        return Err(reason);
    }
    record.locked_player_ids.remove(player_id);
    Ok(())
}

/// Open the community-data valve: monotonic, idempotent, and it forces the
/// master lock closed for the life of the record.
pub fn open_community_valve(record: &mut PredictionRecord) {
    if !record.has_viewed_community_data {
        record.has_viewed_community_data = true;
        record.is_prediction_locked = true;
        log::info!("community data valve opened; record permanently locked");
    }
}

/// Open the real-lineup valve. Only offered before kickoff, with at least
/// one prediction in hand, when lineup data exists upstream and the valve is
/// still closed.
pub fn reveal_real_lineup(
    record: &mut PredictionRecord,
    status: FixtureStatus,
    lineup_known: bool,
) -> Result<(), RevealRefusal> {
    if record.has_viewed_real_lineup {
        return Err(RevealRefusal::AlreadyRevealed);
    }
    if status.has_started() {
        return Err(RevealRefusal::MatchStarted);
    }
    if !record.has_any_prediction() {
        return Err(RevealRefusal::NoSavedPrediction);
    }
    if !lineup_known {
        return Err(RevealRefusal::LineupUnknown);
    }

    record.has_viewed_real_lineup = true;
    record.is_prediction_locked = true;
    log::info!("real lineup valve opened; record permanently locked");
    Ok(())
}

/// Visibility of the community and actual views, plus the default view for
/// the presentation layer.
pub fn visibility(record: &PredictionRecord, status: FixtureStatus) -> Visibility {
    let started = status.has_started();
    let view_only = is_view_only(record, status);
    Visibility {
        community_visible: record.has_viewed_community_data || started,
        real_lineup_visible: record.has_viewed_real_lineup || started,
        view_only,
        default_view: if view_only { DataView::Community } else { DataView::Own },
    }
}
