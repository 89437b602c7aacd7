//! Match records shared by the bracket, advancement and season modules.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::errors::{TournamentError, TournamentResult};

/// Participant ID type
pub type ParticipantId = i64;

/// Round number used for round-robin (regular season) matches
pub const ROUND_ROBIN_ROUND: u32 = 0;

/// Match status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    /// Scheduled, not started
    Upcoming,
    /// In progress
    Live,
    /// Postponed
    Delayed,
    /// Finished with a result
    Completed,
    /// Auto-resolved at construction, the sole participant advances
    Bye,
}

impl MatchStatus {
    /// Whether no further play is expected for a match in this status
    pub fn is_terminal(self) -> bool {
        matches!(self, MatchStatus::Completed | MatchStatus::Bye)
    }

    /// Whether a match may move from `self` to `next`.
    ///
    /// `Bye` is only ever assigned at construction and never left.
    /// `Completed -> Completed` covers result corrections.
    pub fn can_transition_to(self, next: MatchStatus) -> bool {
        use MatchStatus::*;
        matches!(
            (self, next),
            (Upcoming, Live)
                | (Upcoming, Delayed)
                | (Delayed, Upcoming)
                | (Delayed, Live)
                | (Upcoming, Completed)
                | (Live, Completed)
                | (Delayed, Completed)
                | (Completed, Completed)
        )
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStatus::Upcoming => write!(f, "upcoming"),
            MatchStatus::Live => write!(f, "live"),
            MatchStatus::Delayed => write!(f, "delayed"),
            MatchStatus::Completed => write!(f, "completed"),
            MatchStatus::Bye => write!(f, "bye"),
        }
    }
}

/// Final score of a match, player1's goals first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Score {
    pub player1: u32,
    pub player2: u32,
}

impl Score {
    pub const fn new(player1: u32, player2: u32) -> Self {
        Self { player1, player2 }
    }

    pub fn is_draw(&self) -> bool {
        self.player1 == self.player2
    }
}

impl FromStr for Score {
    type Err = TournamentError;

    /// Parses `"A-B"`, also accepting `:` and an en dash as separator.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TournamentError::InvalidScore(s.to_string());
        let (left, right) = s
            .split_once(['-', ':', '\u{2013}'])
            .ok_or_else(invalid)?;
        let player1 = left.trim().parse().map_err(|_| invalid())?;
        let player2 = right.trim().parse().map_err(|_| invalid())?;
        Ok(Self { player1, player2 })
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.player1, self.player2)
    }
}

/// One of the two participant slots of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MatchSlot {
    Player1,
    Player2,
}

impl MatchSlot {
    /// Destination slot in the next round for the winner of `match_number`
    pub fn for_match_number(match_number: u32) -> Self {
        if match_number % 2 == 1 {
            MatchSlot::Player1
        } else {
            MatchSlot::Player2
        }
    }
}

/// A single match, either round-robin (round 0) or elimination (round >= 1)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub round: u32,
    /// 1-based within the round; unique across the event for round 0
    pub match_number: u32,
    pub group_number: Option<u32>,
    pub player1: Option<ParticipantId>,
    pub player2: Option<ParticipantId>,
    pub winner: Option<ParticipantId>,
    pub score: Option<Score>,
    pub status: MatchStatus,
}

impl Match {
    /// Create an empty upcoming match
    pub fn new(round: u32, match_number: u32) -> Self {
        Self {
            round,
            match_number,
            group_number: None,
            player1: None,
            player2: None,
            winner: None,
            score: None,
            status: MatchStatus::Upcoming,
        }
    }

    /// Create an upcoming match between two participants
    pub fn between(
        round: u32,
        match_number: u32,
        player1: ParticipantId,
        player2: ParticipantId,
    ) -> Self {
        Self {
            player1: Some(player1),
            player2: Some(player2),
            ..Self::new(round, match_number)
        }
    }

    /// Create a round-robin match inside a group
    pub fn round_robin(
        match_number: u32,
        group_number: u32,
        player1: ParticipantId,
        player2: ParticipantId,
    ) -> Self {
        Self {
            group_number: Some(group_number),
            ..Self::between(ROUND_ROBIN_ROUND, match_number, player1, player2)
        }
    }

    pub fn is_round_robin(&self) -> bool {
        self.round == ROUND_ROBIN_ROUND
    }

    pub fn slot(&self, slot: MatchSlot) -> Option<ParticipantId> {
        match slot {
            MatchSlot::Player1 => self.player1,
            MatchSlot::Player2 => self.player2,
        }
    }

    pub fn set_slot(&mut self, slot: MatchSlot, participant: Option<ParticipantId>) {
        match slot {
            MatchSlot::Player1 => self.player1 = participant,
            MatchSlot::Player2 => self.player2 = participant,
        }
    }

    pub fn involves(&self, participant: ParticipantId) -> bool {
        self.player1 == Some(participant) || self.player2 == Some(participant)
    }

    /// The participant on the other side of `participant`, if any
    pub fn opponent_of(&self, participant: ParticipantId) -> Option<ParticipantId> {
        if self.player1 == Some(participant) {
            self.player2
        } else if self.player2 == Some(participant) {
            self.player1
        } else {
            None
        }
    }

    /// The non-winner participant of a decided match
    pub fn loser(&self) -> Option<ParticipantId> {
        self.winner.and_then(|winner| self.opponent_of(winner))
    }
}

/// Find a match by its `(round, match_number)` key
pub fn find_match(matches: &[Match], round: u32, match_number: u32) -> Option<&Match> {
    matches
        .iter()
        .find(|m| m.round == round && m.match_number == match_number)
}

/// Whether every match of `round` has reached a terminal status.
///
/// A round without matches is not complete.
pub fn is_round_complete(matches: &[Match], round: u32) -> bool {
    let mut in_round = matches.iter().filter(|m| m.round == round).peekable();
    in_round.peek().is_some() && in_round.all(|m| m.status.is_terminal())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_parsing() {
        assert_eq!("3-1".parse::<Score>().unwrap(), Score::new(3, 1));
        assert_eq!(" 2 : 2 ".parse::<Score>().unwrap(), Score::new(2, 2));
        assert_eq!("4\u{2013}0".parse::<Score>().unwrap(), Score::new(4, 0));
        assert!("3".parse::<Score>().is_err());
        assert!("a-b".parse::<Score>().is_err());
        assert!("-1-2".parse::<Score>().is_err());
    }

    #[test]
    fn test_score_display() {
        assert_eq!(Score::new(2, 0).to_string(), "2-0");
        assert!(Score::new(1, 1).is_draw());
    }

    #[test]
    fn test_slot_parity() {
        assert_eq!(MatchSlot::for_match_number(1), MatchSlot::Player1);
        assert_eq!(MatchSlot::for_match_number(2), MatchSlot::Player2);
        assert_eq!(MatchSlot::for_match_number(7), MatchSlot::Player1);
    }

    #[test]
    fn test_status_transitions() {
        assert!(MatchStatus::Upcoming.can_transition_to(MatchStatus::Live));
        assert!(MatchStatus::Delayed.can_transition_to(MatchStatus::Upcoming));
        assert!(MatchStatus::Live.can_transition_to(MatchStatus::Completed));
        assert!(!MatchStatus::Bye.can_transition_to(MatchStatus::Completed));
        assert!(!MatchStatus::Completed.can_transition_to(MatchStatus::Live));
        assert!(!MatchStatus::Upcoming.can_transition_to(MatchStatus::Bye));
    }

    #[test]
    fn test_loser_and_opponent() {
        let mut m = Match::between(1, 1, 10, 20);
        assert_eq!(m.loser(), None);
        m.winner = Some(20);
        assert_eq!(m.loser(), Some(10));
        assert_eq!(m.opponent_of(10), Some(20));
        assert_eq!(m.opponent_of(99), None);
    }

    #[test]
    fn test_round_completion() {
        let mut matches = vec![Match::between(1, 1, 1, 2), Match::between(1, 2, 3, 4)];
        matches[0].status = MatchStatus::Bye;
        assert!(!is_round_complete(&matches, 1));
        matches[1].status = MatchStatus::Completed;
        assert!(is_round_complete(&matches, 1));
        assert!(!is_round_complete(&matches, 2));
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&MatchStatus::Delayed).unwrap();
        assert_eq!(json, "\"delayed\"");
    }
}
