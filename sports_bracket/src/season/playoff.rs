//! Playoff qualification and standings-derived seeding.

use log::{info, warn};
use std::cmp::Reverse;

use super::models::{GroupStandings, StandingsRow};
use crate::bracket::{Bracket, BracketBuilder};
use crate::errors::{TournamentError, TournamentResult};
use crate::models::ParticipantId;

/// Takes the top finishers of every group into a rank-seeded playoff bracket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayoffSeeder {
    qualifiers_per_group: usize,
    bronze_match: bool,
}

impl PlayoffSeeder {
    pub fn new(qualifiers_per_group: usize) -> Self {
        Self {
            qualifiers_per_group,
            bronze_match: false,
        }
    }

    pub fn with_bronze_match(mut self, bronze_match: bool) -> Self {
        self.bronze_match = bronze_match;
        self
    }

    /// Top-K rows of each table, concatenated in group order, then stably re-sorted
    /// by wins (descending).
    pub fn qualifiers(&self, tables: &[GroupStandings]) -> TournamentResult<Vec<StandingsRow>> {
        let k = self.qualifiers_per_group;
        let total: usize = tables.iter().map(|t| t.rows.len()).sum();
        if k < 1 || k >= total {
            return Err(TournamentError::InvalidGroupConfiguration(format!(
                "qualifiers per group must be between 1 and {}, got {k}",
                total.saturating_sub(1)
            )));
        }

        let mut qualifiers = Vec::with_capacity(k * tables.len());
        for table in tables {
            if table.rows.len() < k {
                warn!(
                    "Group {} has {} participants, {} qualifiers requested",
                    table.group,
                    table.rows.len(),
                    k
                );
                return Err(TournamentError::StandingsGroupUnderfilled {
                    group: table.group,
                    required: k,
                    available: table.rows.len(),
                });
            }
            qualifiers.extend(table.rows.iter().take(k).cloned());
        }

        qualifiers.sort_by_key(|row| Reverse(row.wins));
        Ok(qualifiers)
    }

    /// Participant ids in playoff seed order
    pub fn seed_order(&self, tables: &[GroupStandings]) -> TournamentResult<Vec<ParticipantId>> {
        Ok(self
            .qualifiers(tables)?
            .into_iter()
            .map(|row| row.participant)
            .collect())
    }

    /// Build the playoff bracket; rank order is the seeding
    pub fn build(&self, tables: &[GroupStandings]) -> TournamentResult<Bracket> {
        let order = self.seed_order(tables)?;
        let bracket = BracketBuilder::new()
            .with_bronze_match(self.bronze_match)
            .build_ranked(&order)?;
        info!(
            "Playoffs seeded from {} groups: {} qualifiers",
            tables.len(),
            order.len()
        );
        Ok(bracket)
    }
}
