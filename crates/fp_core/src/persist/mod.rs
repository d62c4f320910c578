//! Durable store contract and the prediction repository.
//!
//! The store is a plain key-value collaborator holding JSON strings. Keys
//! are deterministic per (fixture, viewing-team) pair. The repository adds
//! record (de)serialization, the prior-community-view marker, and
//! load-time normalization toward "more locked".

mod file;

use thiserror::Error;

use crate::record::PredictionRecord;

pub use file::FileStore;

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("store backend error: {0}")]
    Backend(String),
}

/// The durable key-value collaborator. Writes must be applied in call
/// order; values round-trip losslessly.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError>;
}

/// Deterministic record key: the fixture id, suffixed with the team id when
/// the user predicts for a specific one of two favorite teams.
pub fn record_key(fixture_id: &str, team_id: Option<&str>) -> String {
    match team_id {
        Some(team) => format!("prediction:{}:{}", fixture_id, team),
        None => format!("prediction:{}", fixture_id),
    }
}

/// Key of the secondary "previously viewed community data" marker. Kept
/// independent of the record so the fact survives record deletion.
pub fn marker_key(fixture_id: &str, team_id: Option<&str>) -> String {
    match team_id {
        Some(team) => format!("community_viewed:{}:{}", fixture_id, team),
        None => format!("community_viewed:{}", fixture_id),
    }
}

/// In-memory store for tests and embedding.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: std::collections::HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Record persistence over any [`KeyValueStore`].
#[derive(Debug)]
pub struct PredictionRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> PredictionRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load the record for a (fixture, team) pair, if one exists.
    /// Inconsistent lock flags are normalized toward "more locked".
    pub fn load(
        &self,
        fixture_id: &str,
        team_id: Option<&str>,
    ) -> Result<Option<PredictionRecord>, PersistError> {
        let Some(json) = self.store.get(&record_key(fixture_id, team_id))? else {
            return Ok(None);
        };
        let mut record: PredictionRecord = serde_json::from_str(&json)?;
        record.normalize();
        Ok(Some(record))
    }

    /// Load the record, creating a fresh one when absent. A fresh record
    /// consults the prior-view marker: re-predicting a fixture whose
    /// community data was viewed in an earlier session starts flagged.
    pub fn load_or_create(
        &self,
        fixture_id: &str,
        team_id: Option<&str>,
    ) -> Result<PredictionRecord, PersistError> {
        if let Some(record) = self.load(fixture_id, team_id)? {
            return Ok(record);
        }

        let mut record = PredictionRecord::new();
        if self.prior_community_view(fixture_id, team_id)? {
            record.made_after_community_viewed = true;
            log::debug!(
                "fixture {} predicted anew after a prior community view; flagged for scoring",
                fixture_id
            );
        }
        Ok(record)
    }

    /// Persist the record. Callers invoke this after each user action so
    /// writes land in action order.
    pub fn save(
        &mut self,
        fixture_id: &str,
        team_id: Option<&str>,
        record: &PredictionRecord,
    ) -> Result<(), PersistError> {
        // The marker is written before the record: losing the record after a
        // community view must not lose the view fact.
        if record.has_viewed_community_data {
            self.store.set(&marker_key(fixture_id, team_id), "true")?;
        }

        let json = serde_json::to_string(record)?;
        self.store.set(&record_key(fixture_id, team_id), &json)?;
        log::debug!("saved prediction record for {}", record_key(fixture_id, team_id));
        Ok(())
    }

    /// Whether community data was viewed for this pair in any session.
    pub fn prior_community_view(
        &self,
        fixture_id: &str,
        team_id: Option<&str>,
    ) -> Result<bool, PersistError> {
        Ok(self.store.get(&marker_key(fixture_id, team_id))?.is_some())
    }
}
