use serde::{Deserialize, Serialize};

/// Lifecycle phase of the fixture as reported by the event-stream collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum FixtureStatus {
    NotStarted,
    Live { minute: u8 },
    Finished,
}

impl FixtureStatus {
    pub fn is_live(&self) -> bool {
        matches!(self, FixtureStatus::Live { .. })
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, FixtureStatus::Finished)
    }

    /// Live or finished. Once this is true the fixture never returns to
    /// `NotStarted`, which is what makes `matchStarted` refusals permanent.
    pub fn has_started(&self) -> bool {
        !matches!(self, FixtureStatus::NotStarted)
    }
}

impl Default for FixtureStatus {
    fn default() -> Self {
        FixtureStatus::NotStarted
    }
}

/// Which team an event or statistic belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn opposite(&self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_phase_predicates() {
        assert!(!FixtureStatus::NotStarted.has_started());
        assert!(FixtureStatus::Live { minute: 12 }.is_live());
        assert!(FixtureStatus::Live { minute: 12 }.has_started());
        assert!(FixtureStatus::Finished.has_started());
        assert!(!FixtureStatus::Finished.is_live());
    }

    #[test]
    fn side_opposite() {
        assert_eq!(Side::Home.opposite(), Side::Away);
        assert_eq!(Side::Away.opposite(), Side::Home);
    }
}
