//! # Sports Bracket
//!
//! Tournament structure construction and progression for multi-participant events.
//!
//! The library turns a roster into a balanced single-elimination bracket, moves
//! winners forward round by round, and runs season formats: round-robin groups,
//! standings with deterministic tie-breaks and a playoff bracket seeded from them.
//!
//! ## Architecture
//!
//! Construction flows one way, progression feeds back:
//!
//! - **ParticipantSet** -> **BracketBuilder** / **GroupScheduler** -> matches
//! - completed match -> **AdvancementEngine** -> updated matches
//! - completed round-0 matches -> **StandingsCalculator** -> **PlayoffSeeder**
//!   -> **BracketBuilder**
//!
//! All operations are synchronous and work on in-memory data. Randomness comes
//! from an injected [`shuffle::Shuffler`].
//!
//! ## Core Modules
//!
//! - [`bracket`]: bracket sizing, seed placement, byes, validation
//! - [`advancement`]: status state machine and winner propagation
//! - [`season`]: groups, round-robin fixtures, standings, playoff seeding
//! - [`tournament`]: configuration and the event lifecycle manager
//!
//! ## Example
//!
//! ```
//! use sports_bracket::{BracketBuilder, Participant, ParticipantSet, shuffle::KeepOrder};
//!
//! let roster = ParticipantSet::new(vec![
//!     Participant::new(1, "North").with_seed(1),
//!     Participant::new(2, "South"),
//!     Participant::new(3, "East"),
//! ])?;
//! let bracket = BracketBuilder::new().build(&roster, &mut KeepOrder)?;
//!
//! assert_eq!(bracket.size, 4);
//! assert_eq!(bracket.match_at(1, 1).unwrap().winner, Some(1));
//! # Ok::<(), sports_bracket::TournamentError>(())
//! ```

pub mod advancement;
pub mod bracket;
pub mod errors;
pub mod models;
pub mod participant;
pub mod season;
pub mod shuffle;
pub mod tournament;

pub use advancement::{AdvancementEngine, AdvancementOutcome};
pub use bracket::{Bracket, BracketBuilder};
pub use errors::{TournamentError, TournamentResult};
pub use models::{Match, MatchSlot, MatchStatus, ParticipantId, Score, is_round_complete};
pub use participant::{Participant, ParticipantSet};
pub use season::{GroupScheduler, PlayoffSeeder, StandingsCalculator};
pub use tournament::{TournamentConfig, TournamentManager, TournamentState};
