//! Group partitioning and round-robin fixture generation.

use log::{debug, info};
use std::collections::BTreeMap;

use super::models::{Group, Season};
use crate::errors::{TournamentError, TournamentResult};
use crate::models::{Match, ParticipantId};
use crate::participant::ParticipantSet;
use crate::shuffle::Shuffler;

/// Minimum participants for a season
pub const MIN_SEASON_PARTICIPANTS: usize = 2;

/// Draws groups and emits every round-robin pairing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupScheduler {
    group_count: usize,
}

impl GroupScheduler {
    pub fn new(group_count: usize) -> Self {
        Self { group_count }
    }

    pub fn group_count(&self) -> usize {
        self.group_count
    }

    /// Shuffle the roster, split it into balanced groups and schedule each group.
    ///
    /// Groups get `floor(N / G)` members, the first `N mod G` one extra. Match
    /// numbers increase monotonically across the whole season.
    pub fn schedule<S: Shuffler>(
        &self,
        participants: &ParticipantSet,
        shuffler: &mut S,
    ) -> TournamentResult<Season> {
        let count = participants.len();
        ensure_enough(count)?;
        if self.group_count < 1 || self.group_count > count {
            return Err(TournamentError::InvalidGroupConfiguration(format!(
                "group count must be between 1 and {count}, got {}",
                self.group_count
            )));
        }

        let mut ids = participants.ids();
        shuffler.shuffle(&mut ids);
        let groups = partition(&ids, self.group_count);
        let matches = round_robin_matches(&groups);

        info!(
            "Season scheduled: {} participants, {} groups, {} matches",
            count,
            groups.len(),
            matches.len()
        );
        Ok(Season { groups, matches })
    }

    /// Schedule from the group affiliations already carried by every participant.
    ///
    /// Groups are ordered by affiliation number; members keep roster order.
    pub fn from_affiliations(participants: &ParticipantSet) -> TournamentResult<Season> {
        ensure_enough(participants.len())?;

        let mut by_group: BTreeMap<u32, Vec<ParticipantId>> = BTreeMap::new();
        for participant in participants.iter() {
            let group = participant.group.ok_or_else(|| {
                TournamentError::InvalidGroupConfiguration(format!(
                    "participant {} has no group affiliation",
                    participant.id
                ))
            })?;
            by_group.entry(group).or_default().push(participant.id);
        }

        let groups: Vec<Group> = by_group
            .into_iter()
            .map(|(number, members)| Group::new(number, members))
            .collect();
        let matches = round_robin_matches(&groups);

        info!(
            "Season scheduled from affiliations: {} groups, {} matches",
            groups.len(),
            matches.len()
        );
        Ok(Season { groups, matches })
    }
}

fn ensure_enough(count: usize) -> TournamentResult<()> {
    if count < MIN_SEASON_PARTICIPANTS {
        return Err(TournamentError::InsufficientParticipants {
            needed: MIN_SEASON_PARTICIPANTS,
            current: count,
        });
    }
    Ok(())
}

/// Split `ids` into `group_count` contiguous groups numbered from 1
pub fn partition(ids: &[ParticipantId], group_count: usize) -> Vec<Group> {
    if group_count == 0 {
        return Vec::new();
    }

    let base = ids.len() / group_count;
    let extra = ids.len() % group_count;
    let mut groups = Vec::with_capacity(group_count);
    let mut start = 0;

    for index in 0..group_count {
        let len = base + usize::from(index < extra);
        groups.push(Group::new(index as u32 + 1, ids[start..start + len].to_vec()));
        start += len;
    }

    groups
}

/// Every unordered pair `i < j` of each group as a round-0 match
pub fn round_robin_matches(groups: &[Group]) -> Vec<Match> {
    let mut matches = Vec::with_capacity(groups.iter().map(Group::fixture_count).sum());
    let mut match_number = 1;

    for group in groups {
        for (i, &home) in group.members.iter().enumerate() {
            for &away in &group.members[i + 1..] {
                matches.push(Match::round_robin(match_number, group.number, home, away));
                match_number += 1;
            }
        }
        debug!(
            "Group {}: {} members, {} fixtures",
            group.number,
            group.len(),
            group.fixture_count()
        );
    }

    matches
}
