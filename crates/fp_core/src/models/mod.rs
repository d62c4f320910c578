pub mod event;
pub mod fixture;
pub mod formation;
pub mod lineup;
pub mod stats;

pub use event::{CardSeverity, EventKind, MatchEvent, PlayerRef};
pub use fixture::{FixtureStatus, Side};
pub use formation::{layout_for, FormationLayout, SlotCoords};
pub use lineup::{Lineup, LineupSlot, RosterPlayer};
pub use stats::{SideSplit, StatSnapshot};
