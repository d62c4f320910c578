//! # fp_core - Fixture Prediction Core
//!
//! Library core for structured match predictions: the canonical prediction
//! record, the irreversible lock/visibility state machine, field
//! derivations, live-event reconciliation into the actual-outcome view, and
//! the bonus/penalty facts handed to an external scorer.
//!
//! ## Design
//! - One persisted record per (fixture, viewing-team) pair
//! - Editability is a pure function of (record, fixture status); every
//!   refusal carries exactly one reason code
//! - The community-data and real-lineup valves are one-way: once opened the
//!   record is locked for life
//! - Actual-outcome tallies are recomputed from scratch on every event
//!   push, so duplicated or reordered deliveries never double-count
//!
//! Rendering, notification delivery, and the scoring formula itself live in
//! external collaborators.

pub mod bonus;
pub mod lock;
pub mod models;
pub mod persist;
pub mod reconcile;
pub mod record;
pub mod scoring;


// Re-export the main record API
pub use record::{
    Derivable, FocusEntry, MatchInput, MatchPredictions, PlayerEditSnapshot, PlayerInput,
    PlayerPrediction, PredictionCategory, PredictionRecord, PredictionStore,
};

// Re-export the lock engine surface
pub use lock::{
    scope_state, visibility, DataView, LockReason, PlayerLockError, RevealRefusal, Scope,
    ScopeState, Visibility,
};

// Re-export reconciliation
pub use reconcile::{overlay_substitutions, AccuracyCheck, ActualOutcome, PlayerFacts, PredictedValue};

// Re-export bonus facts and scoring contract
pub use bonus::{
    add_focus, independent_prediction_bonus, remove_focus, FocusRefusal, ScoringPayload,
    FOCUS_CAPACITY,
};
pub use scoring::{ScoreBreakdown, ScoreEntry, ScoringClient, ScoringError, ScoringGate, ScoringState};

// Re-export persistence
pub use persist::{record_key, FileStore, KeyValueStore, MemoryStore, PersistError, PredictionRepository};

// Re-export shared models
pub use models::{
    CardSeverity, EventKind, FixtureStatus, Lineup, LineupSlot, MatchEvent, PlayerRef, RosterPlayer,
    Side, SideSplit, StatSnapshot,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
