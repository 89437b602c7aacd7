//! Single-elimination bracket data models.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::{TournamentError, TournamentResult};
use crate::models::{Match, MatchSlot, MatchStatus, ParticipantId, find_match, is_round_complete};

/// Bracket slot count for `participant_count` participants (next power of two)
pub fn bracket_size(participant_count: usize) -> usize {
    participant_count.max(2).next_power_of_two()
}

/// Number of elimination rounds for a bracket of `size` slots
pub fn total_rounds(size: usize) -> u32 {
    size.max(2).trailing_zeros()
}

/// Composite key of a participant slot in an elimination match
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotKey {
    pub round: u32,
    pub match_number: u32,
    pub slot: MatchSlot,
}

impl SlotKey {
    /// Where the winner of `(round, match_number)` goes in the next round
    pub fn destination(round: u32, match_number: u32) -> Self {
        Self {
            round: round + 1,
            match_number: match_number.div_ceil(2),
            slot: MatchSlot::for_match_number(match_number),
        }
    }
}

/// Participants already known to occupy a later-round slot (bye winners)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdvancementMap {
    entries: BTreeMap<SlotKey, ParticipantId>,
}

impl AdvancementMap {
    pub fn insert(&mut self, key: SlotKey, participant: ParticipantId) {
        self.entries.insert(key, participant);
    }

    pub fn get(&self, round: u32, match_number: u32, slot: MatchSlot) -> Option<ParticipantId> {
        self.entries
            .get(&SlotKey {
                round,
                match_number,
                slot,
            })
            .copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A complete single-elimination match tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    /// First-round slot count, a power of two
    pub size: usize,
    pub total_rounds: u32,
    pub has_bronze_match: bool,
    pub matches: Vec<Match>,
}

impl Bracket {
    /// Rebuild a bracket view from a persisted set of elimination matches
    pub fn from_matches(matches: Vec<Match>) -> TournamentResult<Self> {
        let matches: Vec<Match> = matches.into_iter().filter(|m| m.round >= 1).collect();
        let first_round = matches.iter().filter(|m| m.round == 1).count();
        if first_round == 0 {
            return Err(TournamentError::MatchNotFound {
                round: 1,
                match_number: 1,
            });
        }

        let size = first_round * 2;
        let total_rounds = total_rounds(size);
        let has_bronze_match = total_rounds >= 2 && find_match(&matches, total_rounds, 2).is_some();

        Ok(Self {
            size,
            total_rounds,
            has_bronze_match,
            matches,
        })
    }

    pub fn match_at(&self, round: u32, match_number: u32) -> Option<&Match> {
        find_match(&self.matches, round, match_number)
    }

    pub fn match_at_mut(&mut self, round: u32, match_number: u32) -> Option<&mut Match> {
        self.matches
            .iter_mut()
            .find(|m| m.round == round && m.match_number == match_number)
    }

    /// Matches of one round, excluding the bronze match
    pub fn round(&self, round: u32) -> impl Iterator<Item = &Match> {
        let bronze_round = self.has_bronze_match.then_some(self.total_rounds);
        self.matches.iter().filter(move |m| {
            m.round == round && !(Some(m.round) == bronze_round && m.match_number == 2)
        })
    }

    pub fn final_match(&self) -> Option<&Match> {
        self.match_at(self.total_rounds, 1)
    }

    pub fn bronze_match(&self) -> Option<&Match> {
        if self.has_bronze_match {
            self.match_at(self.total_rounds, 2)
        } else {
            None
        }
    }

    pub fn is_semifinal(&self, round: u32) -> bool {
        self.total_rounds >= 2 && round == self.total_rounds - 1
    }

    pub fn is_bronze(&self, round: u32, match_number: u32) -> bool {
        self.has_bronze_match && round == self.total_rounds && match_number == 2
    }

    pub fn is_round_complete(&self, round: u32) -> bool {
        is_round_complete(&self.matches, round)
    }

    /// Number of first-round byes
    pub fn bye_count(&self) -> usize {
        self.round(1)
            .filter(|m| m.status == MatchStatus::Bye)
            .count()
    }

    pub fn champion(&self) -> Option<ParticipantId> {
        self.final_match().and_then(|m| m.winner)
    }

    pub fn runner_up(&self) -> Option<ParticipantId> {
        self.final_match().and_then(Match::loser)
    }

    /// Bronze match winner, or the lone semifinal loser once a bye semifinal
    /// has left the bronze match without an opponent
    pub fn third_place(&self) -> Option<ParticipantId> {
        let bronze = self.bronze_match()?;
        if bronze.winner.is_some() {
            return bronze.winner;
        }
        if !self.is_round_complete(self.total_rounds - 1) {
            return None;
        }
        match (bronze.player1, bronze.player2) {
            (Some(p), None) | (None, Some(p)) => Some(p),
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.champion().is_some() && (!self.has_bronze_match || self.third_place().is_some())
    }
}
