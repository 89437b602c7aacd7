//! Match status transitions and winner propagation.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::bracket::{Bracket, SlotKey};
use crate::errors::{TournamentError, TournamentResult};
use crate::models::{Match, MatchSlot, MatchStatus, ParticipantId, Score, is_round_complete};

/// What a winner declaration changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvancementOutcome {
    pub winner: ParticipantId,
    /// Slot the winner now occupies in the next round
    pub advanced_to: Option<SlotKey>,
    /// Bronze-match slot the semifinal loser now occupies
    pub loser_to_bronze: Option<SlotKey>,
    /// Every match of the declared match's round is terminal
    pub round_complete: bool,
    /// False when the declaration repeated an existing result
    pub changed: bool,
}

/// Drives matches through their lifecycle and moves winners forward
#[derive(Debug, Clone, Copy, Default)]
pub struct AdvancementEngine;

impl AdvancementEngine {
    pub fn new() -> Self {
        Self
    }

    /// Change a match's status without a result (`live`, `delayed`, `upcoming`).
    ///
    /// Completion goes through [`declare_winner`](Self::declare_winner) or
    /// [`record_result`](Self::record_result).
    pub fn set_status(
        &self,
        matches: &mut [Match],
        round: u32,
        match_number: u32,
        status: MatchStatus,
    ) -> TournamentResult<()> {
        let m = find_mut(matches, round, match_number)?;
        if status.is_terminal() || !m.status.can_transition_to(status) {
            return Err(TournamentError::InvalidStatusTransition {
                from: m.status,
                to: status,
            });
        }
        debug!("Match {round}/{match_number}: {} -> {status}", m.status);
        m.status = status;
        Ok(())
    }

    /// Declare the winner of an elimination match and propagate it.
    ///
    /// The winner is written into `(round + 1, ceil(match_number / 2))`, player1 for
    /// odd match numbers and player2 for even ones. A semifinal loser is routed to the
    /// bronze match when one exists. Repeating a declaration is a no-op. Changing a
    /// winner is allowed until the destination match has been decided; nothing is
    /// mutated when any check fails.
    pub fn declare_winner(
        &self,
        bracket: &mut Bracket,
        round: u32,
        match_number: u32,
        winner: ParticipantId,
        score: Option<Score>,
    ) -> TournamentResult<AdvancementOutcome> {
        let current = bracket
            .match_at(round, match_number)
            .ok_or(TournamentError::MatchNotFound {
                round,
                match_number,
            })?
            .clone();

        if current.status == MatchStatus::Bye {
            // Byes are resolved at construction; only a repeat is accepted.
            if current.winner == Some(winner) && score.is_none() {
                return self.propagate(bracket, round, match_number);
            }
            return Err(TournamentError::InvalidStatusTransition {
                from: MatchStatus::Bye,
                to: MatchStatus::Completed,
            });
        }

        check_result(&current, Some(winner), score)?;
        if !current.status.can_transition_to(MatchStatus::Completed) {
            return Err(TournamentError::InvalidStatusTransition {
                from: current.status,
                to: MatchStatus::Completed,
            });
        }

        let loser = current.opponent_of(winner);
        let writes = plan_writes(bracket, round, match_number, winner, loser)?;

        let repeated = current.status == MatchStatus::Completed
            && current.winner == Some(winner)
            && (score.is_none() || current.score == score);

        if let Some(m) = bracket.match_at_mut(round, match_number) {
            if current.winner.is_some() && current.winner != Some(winner) {
                warn!(
                    "Match {round}/{match_number}: winner changed from {:?} to {winner}",
                    current.winner
                );
            }
            m.winner = Some(winner);
            m.status = MatchStatus::Completed;
            if score.is_some() {
                m.score = score;
            }
        }

        let mut outcome = apply_writes(bracket, &writes, winner);
        outcome.changed = !repeated || outcome.changed;
        outcome.round_complete = bracket.is_round_complete(round);

        if outcome.round_complete && outcome.changed {
            info!("Round {round} complete");
        }
        Ok(outcome)
    }

    /// Propagate the winner already stored on a completed (or bye) match.
    ///
    /// Used when results are written by an external entry path.
    pub fn propagate(
        &self,
        bracket: &mut Bracket,
        round: u32,
        match_number: u32,
    ) -> TournamentResult<AdvancementOutcome> {
        let current = bracket
            .match_at(round, match_number)
            .ok_or(TournamentError::MatchNotFound {
                round,
                match_number,
            })?
            .clone();

        let winner = match (current.status.is_terminal(), current.winner) {
            (true, Some(winner)) if current.involves(winner) => winner,
            (_, Some(winner)) if !current.involves(winner) => {
                return Err(TournamentError::InvalidWinnerAssignment {
                    round,
                    match_number,
                    winner,
                });
            }
            _ => {
                return Err(TournamentError::InvalidStatusTransition {
                    from: current.status,
                    to: MatchStatus::Completed,
                });
            }
        };

        let writes = plan_writes(bracket, round, match_number, winner, current.loser())?;
        let mut outcome = apply_writes(bracket, &writes, winner);
        outcome.round_complete = bracket.is_round_complete(round);
        Ok(outcome)
    }

    /// Record a result for a match that does not advance anyone (round-robin).
    ///
    /// With no winner the score must be present; an equal score is a draw and an
    /// unequal one implies the side with more goals.
    pub fn record_result(
        &self,
        matches: &mut [Match],
        round: u32,
        match_number: u32,
        winner: Option<ParticipantId>,
        score: Option<Score>,
    ) -> TournamentResult<bool> {
        let m = find_mut(matches, round, match_number)?;
        check_result(m, winner, score)?;
        if !m.status.can_transition_to(MatchStatus::Completed) {
            return Err(TournamentError::InvalidStatusTransition {
                from: m.status,
                to: MatchStatus::Completed,
            });
        }

        let winner = winner.or_else(|| match score {
            Some(s) if s.player1 > s.player2 => m.player1,
            Some(s) if s.player2 > s.player1 => m.player2,
            _ => None,
        });

        m.winner = winner;
        m.score = score;
        m.status = MatchStatus::Completed;
        Ok(is_round_complete(matches, round))
    }
}

fn find_mut(matches: &mut [Match], round: u32, match_number: u32) -> TournamentResult<&mut Match> {
    matches
        .iter_mut()
        .find(|m| m.round == round && m.match_number == match_number)
        .ok_or(TournamentError::MatchNotFound {
            round,
            match_number,
        })
}

/// Reject results that cannot belong to `m`
fn check_result(
    m: &Match,
    winner: Option<ParticipantId>,
    score: Option<Score>,
) -> TournamentResult<()> {
    if m.player1.is_none() || m.player2.is_none() {
        return Err(TournamentError::MatchNotReady {
            round: m.round,
            match_number: m.match_number,
        });
    }

    let invalid = |winner| TournamentError::InvalidWinnerAssignment {
        round: m.round,
        match_number: m.match_number,
        winner,
    };

    match (winner, score) {
        (Some(w), _) if !m.involves(w) => Err(invalid(w)),
        // A winner with an equal score is fine (penalties); an unequal score must agree.
        (Some(w), Some(s)) if !s.is_draw() => {
            let leader = if s.player1 > s.player2 {
                m.player1
            } else {
                m.player2
            };
            if leader == Some(w) {
                Ok(())
            } else {
                Err(invalid(w))
            }
        }
        (Some(_), _) => Ok(()),
        (None, Some(_)) => Ok(()),
        (None, None) => Err(TournamentError::MissingResult {
            round: m.round,
            match_number: m.match_number,
        }),
    }
}

/// A pending write into a later match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SlotWrite {
    key: SlotKey,
    participant: ParticipantId,
    bronze: bool,
}

/// Compute every downstream write for `winner`, failing before any mutation
fn plan_writes(
    bracket: &Bracket,
    round: u32,
    match_number: u32,
    winner: ParticipantId,
    loser: Option<ParticipantId>,
) -> TournamentResult<Vec<SlotWrite>> {
    let mut writes = Vec::new();
    if round == 0 || round >= bracket.total_rounds || bracket.is_bronze(round, match_number) {
        return Ok(writes);
    }

    let key = SlotKey::destination(round, match_number);
    let next = bracket
        .match_at(key.round, key.match_number)
        .ok_or(TournamentError::MatchNotFound {
            round: key.round,
            match_number: key.match_number,
        })?;
    if next.slot(key.slot) != Some(winner) {
        ensure_undecided(next)?;
    }
    writes.push(SlotWrite {
        key,
        participant: winner,
        bronze: false,
    });

    if let (true, Some(loser), Some(bronze)) =
        (bracket.is_semifinal(round), loser, bracket.bronze_match())
    {
        if !bronze.involves(loser) {
            ensure_undecided(bronze)?;
            let slot = if bronze.player1 == Some(winner) {
                MatchSlot::Player1
            } else if bronze.player2 == Some(winner) {
                MatchSlot::Player2
            } else if bronze.player1.is_none() {
                MatchSlot::Player1
            } else if bronze.player2.is_none() {
                MatchSlot::Player2
            } else {
                return Err(TournamentError::InvariantViolation(format!(
                    "bronze match full, cannot place semifinal loser {loser}"
                )));
            };
            writes.push(SlotWrite {
                key: SlotKey {
                    round: bronze.round,
                    match_number: bronze.match_number,
                    slot,
                },
                participant: loser,
                bronze: true,
            });
        } else {
            let slot = if bronze.player1 == Some(loser) {
                MatchSlot::Player1
            } else {
                MatchSlot::Player2
            };
            writes.push(SlotWrite {
                key: SlotKey {
                    round: bronze.round,
                    match_number: bronze.match_number,
                    slot,
                },
                participant: loser,
                bronze: true,
            });
        }
    }

    Ok(writes)
}

fn ensure_undecided(m: &Match) -> TournamentResult<()> {
    if m.winner.is_some() {
        return Err(TournamentError::DownstreamMatchDecided {
            round: m.round,
            match_number: m.match_number,
        });
    }
    Ok(())
}

fn apply_writes(
    bracket: &mut Bracket,
    writes: &[SlotWrite],
    winner: ParticipantId,
) -> AdvancementOutcome {
    let mut outcome = AdvancementOutcome {
        winner,
        advanced_to: None,
        loser_to_bronze: None,
        round_complete: false,
        changed: false,
    };

    for write in writes {
        if let Some(m) = bracket.match_at_mut(write.key.round, write.key.match_number) {
            if m.slot(write.key.slot) != Some(write.participant) {
                debug!(
                    "Participant {} -> round {} match {} {:?}",
                    write.participant, write.key.round, write.key.match_number, write.key.slot
                );
                m.set_slot(write.key.slot, Some(write.participant));
                outcome.changed = true;
            }
        }
        if write.bronze {
            outcome.loser_to_bronze = Some(write.key);
        } else {
            outcome.advanced_to = Some(write.key);
        }
    }

    outcome
}
