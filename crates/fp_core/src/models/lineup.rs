use serde::{Deserialize, Serialize};

/// One roster entry as supplied by the roster collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterPlayer {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shirt_number: Option<u8>,
    pub position: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
}

impl RosterPlayer {
    pub fn new(id: impl Into<String>, name: impl Into<String>, position: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            shirt_number: None,
            position: position.into(),
            rating: None,
        }
    }
}

/// A player placed in a formation slot.
///
/// `slot` indexes into the formation layout; `substituted_in_minute` is set
/// when the reconciler overlays a substitution onto this slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineupSlot {
    pub slot: u8,
    pub position_label: String,
    pub player: RosterPlayer,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub substituted_in_minute: Option<u8>,
}

/// An ordered starting eleven plus the formation code used to lay it out.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Lineup {
    pub formation: String,
    pub slots: Vec<LineupSlot>,
}

impl Lineup {
    pub fn new(formation: impl Into<String>) -> Self {
        Self { formation: formation.into(), slots: Vec::new() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_json_skips_absent_substitution_minute() {
        let slot = LineupSlot {
            slot: 0,
            position_label: "GK".to_string(),
            player: RosterPlayer::new("gk1", "Keeper", "GK"),
            substituted_in_minute: None,
        };

        let json = serde_json::to_string(&slot).unwrap();
        assert!(!json.contains("substituted_in_minute"));
        let back: LineupSlot = serde_json::from_str(&json).unwrap();
        assert_eq!(slot, back);
    }
}
