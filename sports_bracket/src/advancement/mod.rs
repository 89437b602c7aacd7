//! Round-over-round progression of an elimination bracket.
//!
//! Per-match state machine:
//! - `upcoming -> live -> completed`
//! - `upcoming -> delayed -> upcoming | live`
//! - `bye` is assigned at construction and never left
//!
//! Completing a match with a winner writes that winner into the next round and,
//! for a semifinal, routes the loser into the bronze match.
//!
//! ## Example
//!
//! ```
//! use sports_bracket::advancement::AdvancementEngine;
//! use sports_bracket::bracket::BracketBuilder;
//!
//! let mut bracket = BracketBuilder::new()
//!     .with_bronze_match(true)
//!     .build_ranked(&[1, 2, 3, 4])?;
//! let engine = AdvancementEngine::new();
//!
//! engine.declare_winner(&mut bracket, 1, 1, 1, None)?;
//! engine.declare_winner(&mut bracket, 1, 2, 4, None)?;
//!
//! assert!(bracket.is_round_complete(1));
//! assert_eq!(bracket.final_match().unwrap().player2, Some(4));
//! assert_eq!(bracket.bronze_match().unwrap().player1, Some(2));
//! # Ok::<(), sports_bracket::TournamentError>(())
//! ```

pub mod engine;

pub use engine::{AdvancementEngine, AdvancementOutcome};
