//! One-deep snapshot for the per-player editor.
//!
//! Opening the editor captures that player's fields and lock state; closing
//! without saving restores both exactly. There is no undo beyond this one
//! snapshot.

use super::store::PredictionStore;
use super::{derive, PlayerPrediction};

#[derive(Debug, Clone)]
pub struct PlayerEditSnapshot {
    player_id: String,
    prediction: Option<PlayerPrediction>,
    was_locked: bool,
}

impl PlayerEditSnapshot {
    /// Capture a player's state at editor-open time.
    pub fn capture(store: &PredictionStore, player_id: &str) -> Self {
        let record = store.record();
        Self {
            player_id: player_id.to_string(),
            prediction: record.player_predictions.get(player_id).cloned(),
            was_locked: record.locked_player_ids.contains(player_id),
        }
    }

    pub fn player_id(&self) -> &str {
        &self.player_id
    }

    /// Restore the captured fields and lock state, discarding any edits made
    /// since capture. Derived match buckets are recomputed from the restored
    /// state.
    pub fn restore(self, store: &mut PredictionStore) {
        let record = store.record_mut();
        match self.prediction {
            Some(p) => {
                record.player_predictions.insert(self.player_id.clone(), p);
            }
            None => {
                record.player_predictions.remove(&self.player_id);
            }
        }
        if self.was_locked {
            record.locked_player_ids.insert(self.player_id);
        } else {
            record.locked_player_ids.remove(&self.player_id);
        }
        derive::run(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::store::PlayerInput;
    use crate::models::FixtureStatus;

    const NOT_STARTED: FixtureStatus = FixtureStatus::NotStarted;

    #[test]
    fn cancel_restores_fields_and_lock_state() {
        let mut store = PredictionStore::new();
        store.set_player(NOT_STARTED, "p7", PlayerInput::WillScore).unwrap();
        store.lock_player("p7").unwrap();

        let snapshot = PlayerEditSnapshot::capture(&store, "p7");

        store.unlock_player(NOT_STARTED, "p7").unwrap();
        store.set_player(NOT_STARTED, "p7", PlayerInput::GoalCount(3)).unwrap();
        store.set_player(NOT_STARTED, "p7", PlayerInput::YellowCard).unwrap();

        snapshot.restore(&mut store);

        let p = &store.record().player_predictions["p7"];
        assert_eq!(p.will_score, Some(true));
        assert_eq!(p.goal_count, None);
        assert_eq!(p.yellow_card, None);
        assert!(store.record().locked_player_ids.contains("p7"));
    }

    #[test]
    fn cancel_on_a_previously_absent_player_removes_the_entry() {
        let mut store = PredictionStore::new();
        let snapshot = PlayerEditSnapshot::capture(&store, "p3");

        store.set_player(NOT_STARTED, "p3", PlayerInput::YellowCard).unwrap();
        assert!(store.record().player_predictions.contains_key("p3"));

        snapshot.restore(&mut store);
        assert!(!store.record().player_predictions.contains_key("p3"));
        // Derived buckets recomputed from the restored (empty) state.
        assert!(store.record().match_predictions.yellow_cards.is_none());
    }
}
