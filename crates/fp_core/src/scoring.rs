//! Scoring collaborator contract and the one-shot submission gate.
//!
//! The external scorer is called once per finished-and-predicted fixture.
//! The gate latches on the first attempt so repeated renders cannot
//! re-trigger the call; a failed call is held as an unavailable state that
//! only an explicit retry re-arms. The locally persisted record stays
//! authoritative either way.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bonus::{scoring_payload, ScoringPayload};
use crate::models::FixtureStatus;
use crate::record::{PredictionCategory, PredictionRecord};

#[derive(Error, Debug)]
pub enum ScoringError {
    #[error("scoring call timed out")]
    Timeout,

    #[error("scoring unavailable: {0}")]
    Unavailable(String),
}

/// One scored line of the breakdown returned by the collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub category: PredictionCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_id: Option<String>,
    pub points: i32,
    #[serde(default)]
    pub focus_multiplier_applied: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub total_points: i32,
    pub entries: Vec<ScoreEntry>,
}

/// The external scoring collaborator.
pub trait ScoringClient {
    fn score(&self, payload: &ScoringPayload) -> Result<ScoreBreakdown, ScoringError>;
}

/// Where the scoring call currently stands for one record.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ScoringState {
    /// Preconditions not met yet, or never attempted.
    #[default]
    NotRequested,
    Available(ScoreBreakdown),
    /// The call failed or timed out; the record stays locked and valid.
    Unavailable,
}

/// One-shot latch around the scoring call.
#[derive(Debug, Default)]
pub struct ScoringGate {
    attempted: bool,
    state: ScoringState,
}

impl ScoringGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ScoringState {
        &self.state
    }

    /// Attempt the scoring call. A no-op unless the fixture is finished, a
    /// prediction exists, and no attempt has been made yet.
    pub fn try_submit<C: ScoringClient>(
        &mut self,
        status: FixtureStatus,
        record: &PredictionRecord,
        client: &C,
    ) -> &ScoringState {
        if self.attempted || !status.is_finished() || !record.has_any_prediction() {
            return &self.state;
        }

        self.attempted = true;
        self.state = match client.score(&scoring_payload(record)) {
            Ok(breakdown) => ScoringState::Available(breakdown),
            Err(err) => {
                log::warn!("scoring call failed: {}", err);
                ScoringState::Unavailable
            }
        };
        &self.state
    }

    /// Re-arm the latch after a failure. Only meaningful from the
    /// unavailable state; a delivered breakdown is final.
    pub fn retry<C: ScoringClient>(
        &mut self,
        status: FixtureStatus,
        record: &PredictionRecord,
        client: &C,
    ) -> &ScoringState {
        if matches!(self.state, ScoringState::Unavailable) {
            self.attempted = false;
            self.state = ScoringState::NotRequested;
        }
        self.try_submit(status, record, client)
    }
}
