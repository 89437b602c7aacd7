//! Error types for tournament construction and progression.

use thiserror::Error;

use crate::models::{MatchStatus, ParticipantId};

/// Tournament errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TournamentError {
    #[error("Insufficient participants: need {needed}, have {current}")]
    InsufficientParticipants { needed: usize, current: usize },

    #[error("Invalid group configuration: {0}")]
    InvalidGroupConfiguration(String),

    #[error(
        "Bye allocation infeasible: at least {required} unseeded participants required, have {available}"
    )]
    ByeAllocationInfeasible { required: usize, available: usize },

    #[error("Group {group} is underfilled: need {required} qualifiers, have {available}")]
    StandingsGroupUnderfilled {
        group: u32,
        required: usize,
        available: usize,
    },

    /// Internal consistency failure; never expected for valid input.
    #[error("Bracket invariant violated: {0}")]
    InvariantViolation(String),

    #[error("Invalid winner {winner} for match {match_number} of round {round}")]
    InvalidWinnerAssignment {
        round: u32,
        match_number: u32,
        winner: ParticipantId,
    },

    #[error("Match not found: round {round}, match {match_number}")]
    MatchNotFound { round: u32, match_number: u32 },

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidStatusTransition { from: MatchStatus, to: MatchStatus },

    #[error("Match {match_number} of round {round} is missing a participant")]
    MatchNotReady { round: u32, match_number: u32 },

    #[error("Match {match_number} of round {round} is already decided")]
    DownstreamMatchDecided { round: u32, match_number: u32 },

    #[error("Duplicate participant: {0}")]
    DuplicateParticipant(ParticipantId),

    #[error("Duplicate seed: {0}")]
    DuplicateSeed(u32),

    #[error("Participant not found: {0}")]
    ParticipantNotFound(ParticipantId),

    #[error("Invalid score: {0:?}")]
    InvalidScore(String),

    #[error("Result for match {match_number} of round {round} has neither a winner nor a score")]
    MissingResult { round: u32, match_number: u32 },

    #[error("Tournament not in correct phase: expected {expected}, got {actual}")]
    InvalidTransition { expected: String, actual: String },
}

impl TournamentError {
    /// Whether the error points at a defect in this crate rather than bad input.
    pub fn is_internal(&self) -> bool {
        matches!(self, TournamentError::InvariantViolation(_))
    }
}

pub type TournamentResult<T> = Result<T, TournamentError>;
