//! Tournament configuration and lifecycle models.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{TournamentError, TournamentResult};
use crate::models::ParticipantId;

/// Tournament format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentType {
    /// Single-elimination bracket from the registered roster
    Knockout,
    /// Round-robin groups followed by a playoff bracket
    Season,
}

impl fmt::Display for TournamentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TournamentType::Knockout => write!(f, "knockout"),
            TournamentType::Season => write!(f, "season"),
        }
    }
}

/// Tournament lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentState {
    /// Accepting participants
    Registration,
    /// Round-robin groups in progress
    RegularSeason,
    /// Elimination bracket in progress
    Knockout,
    /// Final (and bronze match, if any) decided
    Finished,
}

impl fmt::Display for TournamentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TournamentState::Registration => write!(f, "registration"),
            TournamentState::RegularSeason => write!(f, "regular season"),
            TournamentState::Knockout => write!(f, "knockout"),
            TournamentState::Finished => write!(f, "finished"),
        }
    }
}

/// Tournament configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentConfig {
    /// Tournament name
    pub name: String,
    pub tournament_type: TournamentType,
    /// Add a third-place match to the elimination bracket
    pub bracket_has_bronze_match: bool,
    /// Round-robin groups (season only)
    pub group_count: usize,
    /// Playoff qualifiers taken from each group (season only)
    pub qualifiers_per_group: usize,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            name: "Tournament".to_string(),
            tournament_type: TournamentType::Knockout,
            bracket_has_bronze_match: true,
            group_count: 1,
            qualifiers_per_group: 2,
        }
    }
}

impl TournamentConfig {
    /// Create a single-elimination configuration
    pub fn knockout(name: String, bronze_match: bool) -> Self {
        Self {
            name,
            tournament_type: TournamentType::Knockout,
            bracket_has_bronze_match: bronze_match,
            ..Self::default()
        }
    }

    /// Create a groups-then-playoffs configuration
    pub fn season(name: String, group_count: usize, qualifiers_per_group: usize) -> Self {
        Self {
            name,
            tournament_type: TournamentType::Season,
            group_count,
            qualifiers_per_group,
            ..Self::default()
        }
    }

    /// Validate against the number of registered participants
    pub fn validate(&self, participant_count: usize) -> TournamentResult<()> {
        if participant_count < 2 {
            return Err(TournamentError::InsufficientParticipants {
                needed: 2,
                current: participant_count,
            });
        }

        if self.tournament_type == TournamentType::Knockout {
            return Ok(());
        }

        if self.group_count < 1 || self.group_count > participant_count {
            return Err(TournamentError::InvalidGroupConfiguration(format!(
                "group count must be between 1 and {participant_count}, got {}",
                self.group_count
            )));
        }

        if self.qualifiers_per_group < 1 || self.qualifiers_per_group >= participant_count {
            return Err(TournamentError::InvalidGroupConfiguration(format!(
                "qualifiers per group must be between 1 and {}, got {}",
                participant_count - 1,
                self.qualifiers_per_group
            )));
        }

        if self.group_count * self.qualifiers_per_group < 2 {
            return Err(TournamentError::InvalidGroupConfiguration(
                "playoffs need at least 2 qualifiers".to_string(),
            ));
        }

        Ok(())
    }
}

/// Final placings of a finished tournament
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Podium {
    pub champion: ParticipantId,
    pub runner_up: Option<ParticipantId>,
    pub third_place: Option<ParticipantId>,
}
