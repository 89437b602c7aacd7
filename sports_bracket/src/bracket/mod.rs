//! Single-elimination bracket construction.
//!
//! This module turns a roster into a complete match tree:
//! - Bracket sizing (next power of two) and round count
//! - Seed placement by tier (1, 2, 3-4, 5-8)
//! - Bye allocation that never produces a bye-vs-bye pair
//! - Validation of the final placement before any match exists
//! - Match materialization with bye winners pre-filled into round 2
//!
//! ## Example
//!
//! ```
//! use sports_bracket::bracket::BracketBuilder;
//! use sports_bracket::participant::{Participant, ParticipantSet};
//! use sports_bracket::shuffle::RandomShuffler;
//!
//! let roster = ParticipantSet::new(vec![
//!     Participant::new(1, "Ajax").with_seed(1),
//!     Participant::new(2, "Benfica").with_seed(2),
//!     Participant::new(3, "Celtic"),
//!     Participant::new(4, "Dynamo"),
//!     Participant::new(5, "Espanyol"),
//! ])?;
//!
//! let bracket = BracketBuilder::new()
//!     .with_bronze_match(true)
//!     .build(&roster, &mut RandomShuffler::new())?;
//!
//! assert_eq!(bracket.size, 8);
//! assert_eq!(bracket.bye_count(), 3);
//! # Ok::<(), sports_bracket::TournamentError>(())
//! ```

pub mod builder;
pub mod models;
pub mod positions;

pub use builder::{BracketBuilder, MIN_BRACKET_PARTICIPANTS, materialize};
pub use models::{AdvancementMap, Bracket, SlotKey, bracket_size, total_rounds};
pub use positions::{PlacementReport, Positions, Slot};
