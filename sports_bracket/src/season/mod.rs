//! Season play: round-robin groups, standings and playoff seeding.
//!
//! This module provides:
//! - Balanced group draws and full round-robin fixtures per group
//! - Standings with 3/1/0 scoring and points, goal difference, goals-for ranking
//! - Auxiliary counters (cards) tagged with an explicit [`StatCategory`]
//! - Top-K qualification per group and a rank-seeded playoff bracket
//!
//! ## Example
//!
//! ```
//! use sports_bracket::participant::{Participant, ParticipantSet};
//! use sports_bracket::season::{GroupScheduler, StandingsCalculator};
//! use sports_bracket::shuffle::RandomShuffler;
//!
//! let roster = ParticipantSet::new(
//!     (1..=9).map(|id| Participant::new(id, format!("Team {id}"))).collect(),
//! )?;
//!
//! let season = GroupScheduler::new(2).schedule(&roster, &mut RandomShuffler::new())?;
//! assert_eq!(season.matches.len(), 16);
//!
//! let tables =
//!     StandingsCalculator::new().compute_all_groups(&season.groups, &season.matches, &[]);
//! assert_eq!(tables.len(), 2);
//! # Ok::<(), sports_bracket::TournamentError>(())
//! ```

pub mod models;
pub mod playoff;
pub mod scheduler;
pub mod standings;

pub use models::{
    Group, GroupStandings, POINTS_FOR_DRAW, POINTS_FOR_LOSS, POINTS_FOR_WIN, Season,
    StandingsRow, StatCategory, StatRecord,
};
pub use playoff::PlayoffSeeder;
pub use scheduler::{GroupScheduler, MIN_SEASON_PARTICIPANTS, partition, round_robin_matches};
pub use standings::StandingsCalculator;
