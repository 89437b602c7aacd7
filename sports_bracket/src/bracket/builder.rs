//! Bracket construction from a participant set or a ranked list.

use log::{debug, info};

use super::models::{AdvancementMap, Bracket, SlotKey, bracket_size, total_rounds};
use super::positions::{
    self, PlacementReport, Positions, fill_unseeded, place_by_rank, place_seeds, plan_pairs,
};
use crate::errors::{TournamentError, TournamentResult};
use crate::models::{Match, MatchSlot, MatchStatus, ParticipantId};
use crate::participant::ParticipantSet;
use crate::shuffle::Shuffler;

/// Minimum participants for any bracket
pub const MIN_BRACKET_PARTICIPANTS: usize = 2;

/// Builds complete single-elimination brackets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BracketBuilder {
    bronze_match: bool,
}

impl BracketBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a third-place match (only created when there are at least two rounds)
    pub fn with_bronze_match(mut self, bronze_match: bool) -> Self {
        self.bronze_match = bronze_match;
        self
    }

    /// Build a seeded bracket.
    ///
    /// Seeds are placed by tier, the unseeded pool is shuffled and distributed so
    /// that no first-round pair is bye-vs-bye. Nothing is returned unless the whole
    /// placement validates.
    pub fn build<S: Shuffler>(
        &self,
        participants: &ParticipantSet,
        shuffler: &mut S,
    ) -> TournamentResult<Bracket> {
        let count = participants.len();
        ensure_enough(count)?;

        let size = bracket_size(count);
        let num_byes = size - count;
        debug!("Building {size}-slot bracket for {count} participants, {num_byes} byes");

        let seeded = participants.seeded();
        let unseeded_count = participants.unseeded().len();
        let placement = place_seeds(size, &seeded, unseeded_count, shuffler);
        let seeded_count = seeded.len() - placement.demoted.len();

        let mut pool: Vec<ParticipantId> = participants
            .unseeded()
            .iter()
            .map(|p| p.id)
            .chain(placement.demoted.iter().copied())
            .collect();
        shuffler.shuffle(&mut pool);

        let plan = plan_pairs(&placement.positions, pool.len(), num_byes)?;
        let filled = fill_unseeded(&placement.positions, &plan, &pool)?;
        let report = positions::validate(&filled, count, num_byes, seeded_count)?;

        Ok(self.finish(&filled, report))
    }

    /// Build a bracket where list order is the seeding (best first).
    ///
    /// The top ranks receive the byes; no tier randomization is applied.
    pub fn build_ranked(&self, ranked: &[ParticipantId]) -> TournamentResult<Bracket> {
        let count = ranked.len();
        ensure_enough(count)?;

        let mut seen = std::collections::HashSet::new();
        if let Some(duplicate) = ranked.iter().find(|id| !seen.insert(**id)) {
            return Err(TournamentError::DuplicateParticipant(*duplicate));
        }

        let size = bracket_size(count);
        let num_byes = size - count;
        let placed = place_by_rank(size, ranked)?;
        let report = positions::validate(&placed, count, num_byes, count)?;

        Ok(self.finish(&placed, report))
    }

    fn finish(&self, positions: &Positions, report: PlacementReport) -> Bracket {
        let bracket = materialize(positions, self.bronze_match);
        info!(
            "Bracket built: {} slots, {} rounds, {} byes ({} to seeds), {} matches",
            bracket.size,
            bracket.total_rounds,
            report.total_byes(),
            report.bye_vs_seed,
            bracket.matches.len()
        );
        bracket
    }
}

fn ensure_enough(count: usize) -> TournamentResult<()> {
    if count < MIN_BRACKET_PARTICIPANTS {
        return Err(TournamentError::InsufficientParticipants {
            needed: MIN_BRACKET_PARTICIPANTS,
            current: count,
        });
    }
    Ok(())
}

/// Turn validated positions into match records.
///
/// Round 1 pairs with a single participant become resolved byes whose winner is
/// pre-filled into round 2; later rounds start empty.
pub fn materialize(positions: &Positions, bronze_match: bool) -> Bracket {
    let size = positions.size();
    let rounds = total_rounds(size);
    let mut advancement = AdvancementMap::default();
    let mut matches = Vec::with_capacity(size);

    for (index, (a, b)) in positions.pairs().enumerate() {
        let match_number = index as u32 + 1;
        let mut first = Match::new(1, match_number);
        first.player1 = a.participant();
        first.player2 = b.participant();

        let sole = match (first.player1, first.player2) {
            (Some(p), None) | (None, Some(p)) => Some(p),
            _ => None,
        };
        if let Some(participant) = sole {
            first.status = MatchStatus::Bye;
            first.winner = Some(participant);
            if rounds >= 2 {
                advancement.insert(SlotKey::destination(1, match_number), participant);
            }
        }
        matches.push(first);
    }

    for round in 2..=rounds {
        let count = (size >> round) as u32;
        for match_number in 1..=count {
            let mut m = Match::new(round, match_number);
            if round == 2 {
                m.player1 = advancement.get(round, match_number, MatchSlot::Player1);
                m.player2 = advancement.get(round, match_number, MatchSlot::Player2);
            }
            matches.push(m);
        }
    }

    let has_bronze_match = bronze_match && rounds >= 2;
    if has_bronze_match {
        matches.push(Match::new(rounds, 2));
    }

    Bracket {
        size,
        total_rounds: rounds,
        has_bronze_match,
        matches,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::participant::Participant;
    use crate::shuffle::{KeepOrder, RandomShuffler};

    fn roster(unseeded: usize, seeds: &[u32]) -> ParticipantSet {
        let mut players = Vec::new();
        for (i, &seed) in seeds.iter().enumerate() {
            players.push(Participant::new(100 + i as i64, format!("Seed {seed}")).with_seed(seed));
        }
        for i in 0..unseeded {
            players.push(Participant::new(i as i64 + 1, format!("Player {}", i + 1)));
        }
        ParticipantSet::new(players).unwrap()
    }

    #[test]
    fn test_rejects_single_participant() {
        let err = BracketBuilder::new()
            .build(&roster(1, &[]), &mut KeepOrder)
            .unwrap_err();
        assert_eq!(
            err,
            TournamentError::InsufficientParticipants {
                needed: 2,
                current: 1
            }
        );
    }

    #[test]
    fn test_two_participants_single_final() {
        let bracket = BracketBuilder::new()
            .with_bronze_match(true)
            .build(&roster(2, &[]), &mut KeepOrder)
            .unwrap();
        assert_eq!(bracket.size, 2);
        assert_eq!(bracket.total_rounds, 1);
        assert_eq!(bracket.matches.len(), 1);
        assert!(!bracket.has_bronze_match);
    }

    #[test]
    fn test_five_unseeded_bye_winners_prefilled() {
        let bracket = BracketBuilder::new()
            .build(&roster(5, &[]), &mut RandomShuffler::seeded(3))
            .unwrap();
        assert_eq!(bracket.size, 8);
        assert_eq!(bracket.matches.len(), 7);
        assert_eq!(bracket.bye_count(), 3);

        for first in bracket.round(1).filter(|m| m.status == MatchStatus::Bye) {
            let key = SlotKey::destination(1, first.match_number);
            let next = bracket.match_at(key.round, key.match_number).unwrap();
            assert_eq!(next.slot(key.slot), first.winner);
        }
        assert!(bracket.round(3).all(|m| m.player1.is_none() && m.player2.is_none()));
    }

    #[test]
    fn test_bronze_match_appended() {
        let bracket = BracketBuilder::new()
            .with_bronze_match(true)
            .build(&roster(6, &[1, 2]), &mut KeepOrder)
            .unwrap();
        assert_eq!(bracket.matches.len(), 8);
        let bronze = bracket.bronze_match().unwrap();
        assert_eq!((bronze.round, bronze.match_number), (3, 2));
        assert_eq!(bronze.status, MatchStatus::Upcoming);
    }

    #[test]
    fn test_seeds_receive_byes_first() {
        // 6 participants in 8 slots: seeds 1 and 2 should both get byes.
        let bracket = BracketBuilder::new()
            .build(&roster(4, &[1, 2]), &mut RandomShuffler::seeded(11))
            .unwrap();
        let first = bracket.match_at(1, 1).unwrap();
        assert_eq!(first.player1, Some(100));
        assert_eq!(first.status, MatchStatus::Bye);
        let last = bracket.match_at(1, 4).unwrap();
        assert_eq!(last.player2, Some(101));
        assert_eq!(last.status, MatchStatus::Bye);
        // Their round-two opponents come from real matches.
        assert_eq!(bracket.match_at(1, 2).unwrap().status, MatchStatus::Upcoming);
        assert_eq!(bracket.match_at(1, 3).unwrap().status, MatchStatus::Upcoming);
    }

    #[test]
    fn test_sparse_seed_sets_build_for_every_draw() {
        for seeds in [[1, 3, 4, 5, 6], [2, 3, 4, 5, 6]] {
            for rng_seed in 0..32 {
                let bracket = BracketBuilder::new()
                    .build(&roster(0, &seeds), &mut RandomShuffler::seeded(rng_seed))
                    .unwrap();
                assert_eq!(bracket.size, 8);
                assert_eq!(bracket.bye_count(), 3, "seeds {seeds:?}, rng seed {rng_seed}");
            }
        }
    }

    #[test]
    fn test_ranked_bracket_order() {
        let bracket = BracketBuilder::new().build_ranked(&[7, 8, 9]).unwrap();
        let first = bracket.match_at(1, 1).unwrap();
        assert_eq!((first.player1, first.player2), (Some(7), None));
        assert_eq!(first.winner, Some(7));
        let second = bracket.match_at(1, 2).unwrap();
        assert_eq!((second.player1, second.player2), (Some(8), Some(9)));
        assert_eq!(bracket.match_at(2, 1).unwrap().player1, Some(7));
    }

    #[test]
    fn test_ranked_rejects_duplicates() {
        let err = BracketBuilder::new().build_ranked(&[1, 2, 1]).unwrap_err();
        assert_eq!(err, TournamentError::DuplicateParticipant(1));
    }
}
