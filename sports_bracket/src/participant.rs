//! Participants and the validated roster handed to the builders.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::errors::{TournamentError, TournamentResult};
use crate::models::ParticipantId;

/// Lowest meaningful seed
pub const MIN_SEED: u32 = 1;
/// Highest meaningful seed; anything above is treated as unseeded
pub const MAX_SEED: u32 = 8;

/// A tournament participant (player or team)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub seed: Option<u32>,
    /// Group affiliation, if already assigned
    pub group: Option<u32>,
}

impl Participant {
    /// Create an unseeded participant
    pub fn new(id: ParticipantId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            seed: None,
            group: None,
        }
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_group(mut self, group: u32) -> Self {
        self.group = Some(group);
        self
    }

    /// Seed number if it lies in the meaningful range
    pub fn effective_seed(&self) -> Option<u32> {
        self.seed.filter(|s| (MIN_SEED..=MAX_SEED).contains(s))
    }

    pub fn is_seeded(&self) -> bool {
        self.effective_seed().is_some()
    }
}

/// A validated participant list: unique ids, unique meaningful seeds
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantSet {
    participants: Vec<Participant>,
}

impl ParticipantSet {
    /// Validate and wrap a roster, preserving declaration order
    pub fn new(participants: Vec<Participant>) -> TournamentResult<Self> {
        let mut ids = HashSet::new();
        let mut seeds = HashSet::new();

        for participant in &participants {
            if !ids.insert(participant.id) {
                return Err(TournamentError::DuplicateParticipant(participant.id));
            }
            if let Some(seed) = participant.effective_seed() {
                if !seeds.insert(seed) {
                    return Err(TournamentError::DuplicateSeed(seed));
                }
            }
        }

        Ok(Self { participants })
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter()
    }

    pub fn as_slice(&self) -> &[Participant] {
        &self.participants
    }

    pub fn get(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn ids(&self) -> Vec<ParticipantId> {
        self.participants.iter().map(|p| p.id).collect()
    }

    /// Seeded participants ordered by seed (best first)
    pub fn seeded(&self) -> Vec<&Participant> {
        let mut seeded: Vec<&Participant> =
            self.participants.iter().filter(|p| p.is_seeded()).collect();
        seeded.sort_by_key(|p| p.effective_seed());
        seeded
    }

    /// Unseeded participants in declaration order
    pub fn unseeded(&self) -> Vec<&Participant> {
        self.participants.iter().filter(|p| !p.is_seeded()).collect()
    }

    /// Add a participant, re-checking id and seed uniqueness
    pub fn insert(&mut self, participant: Participant) -> TournamentResult<()> {
        if self.get(participant.id).is_some() {
            return Err(TournamentError::DuplicateParticipant(participant.id));
        }
        if let Some(seed) = participant.effective_seed() {
            if self.participants.iter().any(|p| p.effective_seed() == Some(seed)) {
                return Err(TournamentError::DuplicateSeed(seed));
            }
        }
        self.participants.push(participant);
        Ok(())
    }

    pub fn remove(&mut self, id: ParticipantId) -> TournamentResult<Participant> {
        let index = self
            .participants
            .iter()
            .position(|p| p.id == id)
            .ok_or(TournamentError::ParticipantNotFound(id))?;
        Ok(self.participants.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_outside_range_is_unseeded() {
        assert!(Participant::new(1, "a").with_seed(8).is_seeded());
        assert!(!Participant::new(2, "b").with_seed(9).is_seeded());
        assert!(!Participant::new(3, "c").with_seed(0).is_seeded());
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let err = ParticipantSet::new(vec![Participant::new(1, "a"), Participant::new(1, "b")])
            .unwrap_err();
        assert_eq!(err, TournamentError::DuplicateParticipant(1));
    }

    #[test]
    fn test_rejects_duplicate_meaningful_seeds_only() {
        let err = ParticipantSet::new(vec![
            Participant::new(1, "a").with_seed(2),
            Participant::new(2, "b").with_seed(2),
        ])
        .unwrap_err();
        assert_eq!(err, TournamentError::DuplicateSeed(2));

        let ok = ParticipantSet::new(vec![
            Participant::new(1, "a").with_seed(12),
            Participant::new(2, "b").with_seed(12),
        ]);
        assert!(ok.is_ok());
    }

    #[test]
    fn test_seeded_sorted_by_seed() {
        let set = ParticipantSet::new(vec![
            Participant::new(1, "a").with_seed(4),
            Participant::new(2, "b"),
            Participant::new(3, "c").with_seed(1),
        ])
        .unwrap();
        let seeded: Vec<_> = set.seeded().iter().map(|p| p.id).collect();
        assert_eq!(seeded, vec![3, 1]);
        assert_eq!(set.unseeded().len(), 1);
    }

    #[test]
    fn test_insert_and_remove() {
        let mut set = ParticipantSet::default();
        set.insert(Participant::new(1, "a").with_seed(1)).unwrap();
        assert!(set.insert(Participant::new(2, "b").with_seed(1)).is_err());
        set.insert(Participant::new(2, "b")).unwrap();
        assert_eq!(set.remove(1).unwrap().name, "a");
        assert_eq!(
            set.remove(1).unwrap_err(),
            TournamentError::ParticipantNotFound(1)
        );
        assert_eq!(set.len(), 1);
    }
}
