//! Bucketed bands used by match-level predictions.
//!
//! The same threshold tables drive prediction derivation and the actual
//! outcome view, so predicted-vs-actual comparison stays apples-to-apples.

use serde::{Deserialize, Serialize};

/// Total goals scored by both teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalsBucket {
    #[serde(rename = "0-1 gol")]
    ZeroToOne,
    #[serde(rename = "2-3 gol")]
    TwoToThree,
    #[serde(rename = "4-5 gol")]
    FourToFive,
    #[serde(rename = "6+ gol")]
    SixPlus,
}

impl GoalsBucket {
    pub fn for_total(total: u8) -> Self {
        match total {
            0..=1 => GoalsBucket::ZeroToOne,
            2..=3 => GoalsBucket::TwoToThree,
            4..=5 => GoalsBucket::FourToFive,
            _ => GoalsBucket::SixPlus,
        }
    }
}

/// Minute band of the first goal of the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FirstGoalBucket {
    #[serde(rename = "1-15")]
    UpTo15,
    #[serde(rename = "16-30")]
    UpTo30,
    #[serde(rename = "31-45")]
    UpTo45,
    #[serde(rename = "46-60")]
    UpTo60,
    #[serde(rename = "61-75")]
    UpTo75,
    #[serde(rename = "76+")]
    After75,
    #[serde(rename = "no_goal")]
    NoGoal,
}

impl FirstGoalBucket {
    pub fn for_minute(minute: u8) -> Self {
        match minute {
            0..=15 => FirstGoalBucket::UpTo15,
            16..=30 => FirstGoalBucket::UpTo30,
            31..=45 => FirstGoalBucket::UpTo45,
            46..=60 => FirstGoalBucket::UpTo60,
            61..=75 => FirstGoalBucket::UpTo75,
            _ => FirstGoalBucket::After75,
        }
    }
}

/// Yellow cards shown in the match, both teams combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum YellowBucket {
    #[serde(rename = "0-2")]
    ZeroToTwo,
    #[serde(rename = "3-5")]
    ThreeToFive,
    #[serde(rename = "6+")]
    SixPlus,
}

impl YellowBucket {
    pub fn for_count(count: u8) -> Self {
        match count {
            0..=2 => YellowBucket::ZeroToTwo,
            3..=5 => YellowBucket::ThreeToFive,
            _ => YellowBucket::SixPlus,
        }
    }
}

/// Dismissals (straight red or second yellow), both teams combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RedBucket {
    #[serde(rename = "0")]
    None,
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2+")]
    TwoPlus,
}

impl RedBucket {
    pub fn for_count(count: u8) -> Self {
        match count {
            0 => RedBucket::None,
            1 => RedBucket::One,
            _ => RedBucket::TwoPlus,
        }
    }
}

/// Total shots, both teams combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotsBucket {
    #[serde(rename = "0-10")]
    UpTo10,
    #[serde(rename = "11-20")]
    UpTo20,
    #[serde(rename = "21+")]
    Over20,
}

impl ShotsBucket {
    pub fn for_count(count: u16) -> Self {
        match count {
            0..=10 => ShotsBucket::UpTo10,
            11..=20 => ShotsBucket::UpTo20,
            _ => ShotsBucket::Over20,
        }
    }
}

/// Total shots on target, both teams combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotsOnTargetBucket {
    #[serde(rename = "0-5")]
    UpTo5,
    #[serde(rename = "6-10")]
    UpTo10,
    #[serde(rename = "11+")]
    Over10,
}

impl ShotsOnTargetBucket {
    pub fn for_count(count: u16) -> Self {
        match count {
            0..=5 => ShotsOnTargetBucket::UpTo5,
            6..=10 => ShotsOnTargetBucket::UpTo10,
            _ => ShotsOnTargetBucket::Over10,
        }
    }
}

/// Total corners, both teams combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CornersBucket {
    #[serde(rename = "0-5")]
    UpTo5,
    #[serde(rename = "6-10")]
    UpTo10,
    #[serde(rename = "11+")]
    Over10,
}

impl CornersBucket {
    pub fn for_count(count: u16) -> Self {
        match count {
            0..=5 => CornersBucket::UpTo5,
            6..=10 => CornersBucket::UpTo10,
            _ => CornersBucket::Over10,
        }
    }
}

/// Expected rhythm of the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tempo {
    Slow,
    Balanced,
    Fast,
}

/// Expected overall shape of the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchScenario {
    HomeDominates,
    Balanced,
    AwayDominates,
    EndToEnd,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goals_thresholds() {
        assert_eq!(GoalsBucket::for_total(0), GoalsBucket::ZeroToOne);
        assert_eq!(GoalsBucket::for_total(1), GoalsBucket::ZeroToOne);
        assert_eq!(GoalsBucket::for_total(3), GoalsBucket::TwoToThree);
        assert_eq!(GoalsBucket::for_total(4), GoalsBucket::FourToFive);
        assert_eq!(GoalsBucket::for_total(5), GoalsBucket::FourToFive);
        assert_eq!(GoalsBucket::for_total(9), GoalsBucket::SixPlus);
    }

    #[test]
    fn goals_bucket_display_names() {
        let json = serde_json::to_string(&GoalsBucket::FourToFive).unwrap();
        assert_eq!(json, "\"4-5 gol\"");
    }

    #[test]
    fn first_goal_bands() {
        assert_eq!(FirstGoalBucket::for_minute(15), FirstGoalBucket::UpTo15);
        assert_eq!(FirstGoalBucket::for_minute(45), FirstGoalBucket::UpTo45);
        assert_eq!(FirstGoalBucket::for_minute(46), FirstGoalBucket::UpTo60);
        assert_eq!(FirstGoalBucket::for_minute(90), FirstGoalBucket::After75);
    }

    #[test]
    fn card_bands() {
        assert_eq!(YellowBucket::for_count(2), YellowBucket::ZeroToTwo);
        assert_eq!(YellowBucket::for_count(5), YellowBucket::ThreeToFive);
        assert_eq!(YellowBucket::for_count(6), YellowBucket::SixPlus);
        assert_eq!(RedBucket::for_count(0), RedBucket::None);
        assert_eq!(RedBucket::for_count(1), RedBucket::One);
        assert_eq!(RedBucket::for_count(3), RedBucket::TwoPlus);
    }
}
