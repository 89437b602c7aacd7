//! Regular-season data models.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{Match, ParticipantId};

/// Points awarded for a win
pub const POINTS_FOR_WIN: u32 = 3;
/// Points awarded to each side of a draw
pub const POINTS_FOR_DRAW: u32 = 1;
/// Points awarded for a loss
pub const POINTS_FOR_LOSS: u32 = 0;

/// A round-robin group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// 1-based group number
    pub number: u32,
    pub members: Vec<ParticipantId>,
}

impl Group {
    pub fn new(number: u32, members: Vec<ParticipantId>) -> Self {
        Self { number, members }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, participant: ParticipantId) -> bool {
        self.members.contains(&participant)
    }

    /// Matches a full round-robin of this group produces
    pub fn fixture_count(&self) -> usize {
        let n = self.members.len();
        n * n.saturating_sub(1) / 2
    }
}

/// Groups plus their round-0 fixtures
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    pub groups: Vec<Group>,
    pub matches: Vec<Match>,
}

impl Season {
    pub fn group(&self, number: u32) -> Option<&Group> {
        self.groups.iter().find(|g| g.number == number)
    }

    pub fn group_of(&self, participant: ParticipantId) -> Option<&Group> {
        self.groups.iter().find(|g| g.contains(participant))
    }

    pub fn group_matches(&self, number: u32) -> impl Iterator<Item = &Match> {
        self.matches
            .iter()
            .filter(move |m| m.group_number == Some(number))
    }
}

/// Category of an auxiliary per-participant counter, tagged where it originates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatCategory {
    YellowCard,
    RedCard,
}

impl fmt::Display for StatCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatCategory::YellowCard => write!(f, "yellow card"),
            StatCategory::RedCard => write!(f, "red card"),
        }
    }
}

/// An auxiliary event counter for one participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatRecord {
    pub participant: ParticipantId,
    pub category: StatCategory,
    pub count: u32,
}

impl StatRecord {
    pub fn new(participant: ParticipantId, category: StatCategory, count: u32) -> Self {
        Self {
            participant,
            category,
            count,
        }
    }
}

/// One line of a standings table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsRow {
    pub participant: ParticipantId,
    pub group: Option<u32>,
    pub played: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub points: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub yellow_cards: u32,
    pub red_cards: u32,
}

impl StandingsRow {
    pub fn new(participant: ParticipantId, group: Option<u32>) -> Self {
        Self {
            participant,
            group,
            ..Default::default()
        }
    }

    pub fn goal_difference(&self) -> i64 {
        i64::from(self.goals_for) - i64::from(self.goals_against)
    }
}

/// Ranked table of a single group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupStandings {
    pub group: u32,
    pub rows: Vec<StandingsRow>,
}

impl GroupStandings {
    /// Row of the participant finishing at `position` (1-indexed)
    pub fn at_position(&self, position: usize) -> Option<&StandingsRow> {
        position.checked_sub(1).and_then(|i| self.rows.get(i))
    }

    pub fn leader(&self) -> Option<&StandingsRow> {
        self.rows.first()
    }
}
