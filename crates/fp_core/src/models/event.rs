use serde::{Deserialize, Serialize};

use super::fixture::Side;

/// Reference to a player as carried on the upstream event stream.
///
/// The id can be absent on malformed entries; the reconciler still counts
/// such events toward aggregate tallies but skips per-player attribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl PlayerRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: Some(id.into()), name: Some(name.into()) }
    }
}

/// One entry of the append-only match event list.
///
/// `side` is the acting player's team; own goals are credited to the
/// opposing side by the reconciler, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEvent {
    pub minute: u8,
    /// Added-time minutes past `minute`, when the event fell in stoppage time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added_minutes: Option<u8>,
    pub side: Side,
    #[serde(flatten)]
    pub kind: EventKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    Goal {
        #[serde(skip_serializing_if = "Option::is_none")]
        scorer: Option<PlayerRef>,
        #[serde(skip_serializing_if = "Option::is_none")]
        assist: Option<PlayerRef>,
        #[serde(default)]
        own_goal: bool,
        #[serde(default)]
        penalty: bool,
    },
    Card {
        #[serde(skip_serializing_if = "Option::is_none")]
        player: Option<PlayerRef>,
        severity: CardSeverity,
    },
    Substitution {
        #[serde(skip_serializing_if = "Option::is_none")]
        player_out: Option<PlayerRef>,
        #[serde(skip_serializing_if = "Option::is_none")]
        player_in: Option<PlayerRef>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardSeverity {
    Yellow,
    SecondYellow,
    Red,
}

impl CardSeverity {
    /// Second yellows and straight reds both end in a dismissal.
    pub fn is_red(&self) -> bool {
        matches!(self, CardSeverity::SecondYellow | CardSeverity::Red)
    }
}

impl MatchEvent {
    pub fn goal(minute: u8, side: Side, scorer: PlayerRef) -> Self {
        Self {
            minute,
            added_minutes: None,
            side,
            kind: EventKind::Goal { scorer: Some(scorer), assist: None, own_goal: false, penalty: false },
        }
    }

    pub fn card(minute: u8, side: Side, player: PlayerRef, severity: CardSeverity) -> Self {
        Self { minute, added_minutes: None, side, kind: EventKind::Card { player: Some(player), severity } }
    }

    pub fn substitution(minute: u8, side: Side, player_out: PlayerRef, player_in: PlayerRef) -> Self {
        Self {
            minute,
            added_minutes: None,
            side,
            kind: EventKind::Substitution { player_out: Some(player_out), player_in: Some(player_in) },
        }
    }

    /// True for events inside the regulation first half (no stoppage time).
    pub fn in_first_half(&self) -> bool {
        self.minute <= 45 && self.added_minutes.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_half_cutoff_excludes_added_time() {
        let mut e = MatchEvent::goal(45, Side::Home, PlayerRef::new("p1", "Nine"));
        assert!(e.in_first_half());

        e.added_minutes = Some(2);
        assert!(!e.in_first_half(), "45+2 belongs to the first-half overflow, not the half itself");

        e.added_minutes = None;
        e.minute = 46;
        assert!(!e.in_first_half());
    }

    #[test]
    fn event_json_roundtrip() {
        let e = MatchEvent::card(78, Side::Away, PlayerRef::new("p9", "Vidal"), CardSeverity::SecondYellow);
        let json = serde_json::to_string(&e).unwrap();
        let back: MatchEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(e, back);
        assert!(json.contains("\"type\":\"card\""));
        assert!(json.contains("second_yellow"));
    }

    #[test]
    fn second_yellow_counts_as_red() {
        assert!(CardSeverity::SecondYellow.is_red());
        assert!(CardSeverity::Red.is_red());
        assert!(!CardSeverity::Yellow.is_red());
    }
}
