use serde::{Deserialize, Serialize};

/// A per-side pair of values, e.g. shots for home and away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SideSplit<T> {
    pub home: T,
    pub away: T,
}

impl<T> SideSplit<T> {
    pub fn new(home: T, away: T) -> Self {
        Self { home, away }
    }
}

impl SideSplit<u16> {
    pub fn total(&self) -> u16 {
        self.home + self.away
    }
}

/// Periodic aggregate statistics pushed alongside the event list.
///
/// Every field is optional; a snapshot may carry only the statistics the
/// upstream provider currently has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatSnapshot {
    /// Home possession percentage, 0-100. Away is the complement.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub possession_home: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shots: Option<SideSplit<u16>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shots_on_target: Option<SideSplit<u16>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corners: Option<SideSplit<u16>>,
}
