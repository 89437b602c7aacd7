//! Tournament lifecycle for knockout and season events.
//!
//! This module provides:
//! - Tournament configuration and validation
//! - Participant registration and withdrawal
//! - Knockout start, or groups followed by standings-seeded playoffs
//! - Result entry with automatic advancement
//! - Podium extraction once the bracket is decided
//!
//! ## Example
//!
//! ```
//! use sports_bracket::participant::Participant;
//! use sports_bracket::shuffle::RandomShuffler;
//! use sports_bracket::tournament::{TournamentConfig, TournamentManager, TournamentState};
//!
//! let config = TournamentConfig::season("Spring League".to_string(), 2, 2);
//! let mut manager = TournamentManager::new(config, RandomShuffler::new());
//! for id in 1..=8 {
//!     manager.register(Participant::new(id, format!("Team {id}")))?;
//! }
//!
//! manager.start()?;
//! assert_eq!(manager.state(), TournamentState::RegularSeason);
//! assert_eq!(manager.season().unwrap().matches.len(), 12);
//! # Ok::<(), sports_bracket::TournamentError>(())
//! ```

pub mod manager;
pub mod models;

pub use manager::TournamentManager;
pub use models::{Podium, TournamentConfig, TournamentState, TournamentType};
