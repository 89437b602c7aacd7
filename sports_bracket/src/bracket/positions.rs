//! First-round position pipeline.
//!
//! Each phase takes the previous [`Positions`] by reference and returns a new
//! one, so every phase can be exercised on its own:
//!
//! 1. [`place_seeds`] pins seeds 1/2 and draws seeds 3-4 and 5-8 into their tiers
//! 2. [`plan_pairs`] decides how many unseeded participants each pair receives
//! 3. [`fill_unseeded`] places the (already shuffled) unseeded pool
//! 4. [`validate`] counts pair kinds and rejects any broken invariant
//!
//! [`place_by_rank`] replaces phases 1-3 for standings-seeded playoffs.

use log::{debug, error, warn};
use std::collections::HashSet;

use crate::errors::{TournamentError, TournamentResult};
use crate::models::ParticipantId;
use crate::participant::Participant;
use crate::shuffle::Shuffler;

/// Content of one first-round bracket position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Bye-eligible empty slot
    Empty,
    Seeded { id: ParticipantId, seed: u32 },
    Unseeded(ParticipantId),
}

impl Slot {
    pub fn participant(&self) -> Option<ParticipantId> {
        match self {
            Slot::Empty => None,
            Slot::Seeded { id, .. } | Slot::Unseeded(id) => Some(*id),
        }
    }

    pub fn seed(&self) -> Option<u32> {
        match self {
            Slot::Seeded { seed, .. } => Some(*seed),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }
}

/// First-round slot mapping, `0..size`; pair `k` is positions `2k` and `2k+1`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Positions {
    slots: Vec<Slot>,
}

impl Positions {
    pub fn empty(size: usize) -> Self {
        Self {
            slots: vec![Slot::Empty; size],
        }
    }

    pub fn size(&self) -> usize {
        self.slots.len()
    }

    pub fn slot(&self, index: usize) -> Slot {
        self.slots.get(index).copied().unwrap_or(Slot::Empty)
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn pair_count(&self) -> usize {
        self.slots.len() / 2
    }

    pub fn pair(&self, pair: usize) -> (Slot, Slot) {
        (self.slot(2 * pair), self.slot(2 * pair + 1))
    }

    pub fn pairs(&self) -> impl Iterator<Item = (Slot, Slot)> + '_ {
        self.slots.chunks(2).map(|pair| (pair[0], pair[1]))
    }

    fn placed_count(&self) -> usize {
        self.slots.iter().filter(|s| !s.is_empty()).count()
    }
}

/// Positions reserved for a seed tier, before conflict removal
fn tier_positions(size: usize, tier: SeedTier) -> Vec<usize> {
    match tier {
        SeedTier::First => vec![0],
        SeedTier::Second => vec![size - 1],
        SeedTier::Quarter => vec![size / 2 - 1, size / 2],
        SeedTier::Eighth if size >= 4 => {
            vec![size / 4 - 1, size / 4, 3 * size / 4 - 1, 3 * size / 4]
        }
        SeedTier::Eighth => Vec::new(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SeedTier {
    First,
    Second,
    Quarter,
    Eighth,
}

impl SeedTier {
    const ALL: [SeedTier; 4] = [
        SeedTier::First,
        SeedTier::Second,
        SeedTier::Quarter,
        SeedTier::Eighth,
    ];

    fn of(seed: u32) -> Option<Self> {
        match seed {
            1 => Some(SeedTier::First),
            2 => Some(SeedTier::Second),
            3 | 4 => Some(SeedTier::Quarter),
            5..=8 => Some(SeedTier::Eighth),
            _ => None,
        }
    }

    fn is_drawn(self) -> bool {
        matches!(self, SeedTier::Quarter | SeedTier::Eighth)
    }
}

/// Output of the seed phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedPlacement {
    pub positions: Positions,
    /// Seeds whose tier had no room in this bracket size; they join the unseeded pool
    pub demoted: Vec<ParticipantId>,
}

/// Place seeded participants into their tier positions.
///
/// `seeded` must be ordered by seed. Seeds 1 and 2 are deterministic; the 3-4 and
/// 5-8 tiers are drawn by shuffling the tier's positions. When the drawn positions
/// would leave more seedless pairs than `unseeded_count` (plus demoted seeds) can
/// cover, positions in seedless pairs are taken first, keeping the drawn order
/// within each group.
pub fn place_seeds<S: Shuffler>(
    size: usize,
    seeded: &[&Participant],
    unseeded_count: usize,
    shuffler: &mut S,
) -> SeedPlacement {
    let mut slots = vec![Slot::Empty; size];
    let mut reserved: HashSet<usize> = HashSet::new();
    let mut demoted = Vec::new();

    for tier in SeedTier::ALL {
        let members: Vec<&Participant> = seeded
            .iter()
            .copied()
            .filter(|p| p.effective_seed().and_then(SeedTier::of) == Some(tier))
            .collect();

        let mut available: Vec<usize> = tier_positions(size, tier)
            .into_iter()
            .filter(|pos| *pos < size && !reserved.contains(pos))
            .collect();
        available.dedup();
        reserved.extend(available.iter().copied());

        if tier.is_drawn() {
            shuffler.shuffle(&mut available);

            let taken = members.len().min(available.len());
            let pool = unseeded_count + demoted.len() + (members.len() - taken);
            let open = open_pairs_after(&slots, &available[..taken]);
            if taken > 0 && open > pool {
                debug!(
                    "{tier:?} draw leaves {open} seedless pairs for {pool} unseeded, reordering"
                );
                prefer_seedless_pairs(&slots, &mut available);
            }
        }

        for (index, participant) in members.into_iter().enumerate() {
            match (available.get(index), participant.effective_seed()) {
                (Some(&pos), Some(seed)) => {
                    slots[pos] = Slot::Seeded {
                        id: participant.id,
                        seed,
                    };
                }
                _ => {
                    debug!(
                        "Seed {:?} has no tier position in a {}-slot bracket, demoting",
                        participant.seed, size
                    );
                    demoted.push(participant.id);
                }
            }
        }
    }

    SeedPlacement {
        positions: Positions { slots },
        demoted,
    }
}

/// Pairs that would hold no seed once `taken` positions are filled
fn open_pairs_after(slots: &[Slot], taken: &[usize]) -> usize {
    (0..slots.len() / 2)
        .filter(|&pair| {
            [2 * pair, 2 * pair + 1]
                .iter()
                .all(|pos| slots[*pos].is_empty() && !taken.contains(pos))
        })
        .count()
}

/// Move positions that seat a seed in a still seedless pair to the front
fn prefer_seedless_pairs(slots: &[Slot], available: &mut Vec<usize>) {
    let mut covered: HashSet<usize> = slots
        .iter()
        .enumerate()
        .filter(|(_, slot)| !slot.is_empty())
        .map(|(pos, _)| pos / 2)
        .collect();

    let (mut preferred, mut rest) = (Vec::new(), Vec::new());
    for &pos in available.iter() {
        if covered.insert(pos / 2) {
            preferred.push(pos);
        } else {
            rest.push(pos);
        }
    }
    preferred.append(&mut rest);
    *available = preferred;
}

/// How many unseeded participants each pair receives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairPlan {
    /// Indexed by pair; 0, 1 or 2
    pub fills: Vec<usize>,
    /// Zero-seed pairs in fill priority order
    pub open_pairs: Vec<usize>,
    /// Single-seed pairs that need one unseeded opponent
    pub contested_seed_pairs: Vec<usize>,
    /// Zero-seed pairs receiving two unseeded participants
    pub advantaged_pairs: Vec<usize>,
    pub seed_byes: usize,
    pub unseeded_byes: usize,
}

/// Decide bye and advantage allocation for the unseeded pool.
///
/// Byes go to the best single-seed pairs first. Zero-seed pairs that sit next to a
/// good seed's pair are filled with two unseeded participants first, so that seed
/// meets a real match winner in round two. Fails when the pool cannot give every
/// zero-seed pair at least one participant.
pub fn plan_pairs(
    positions: &Positions,
    pool_size: usize,
    num_byes: usize,
) -> TournamentResult<PairPlan> {
    let pair_count = positions.pair_count();
    let mut seed_pairs: Vec<(u32, usize)> = Vec::new();
    let mut open_by_index: Vec<usize> = Vec::new();
    let mut seeds_by_rank: Vec<(u32, usize)> = Vec::new();

    for (pair, (a, b)) in positions.pairs().enumerate() {
        for seed in [a.seed(), b.seed()].into_iter().flatten() {
            seeds_by_rank.push((seed, pair));
        }
        match (a.seed(), b.seed()) {
            (None, None) => open_by_index.push(pair),
            (Some(seed), None) | (None, Some(seed)) => seed_pairs.push((seed, pair)),
            (Some(_), Some(_)) => {}
        }
    }
    seed_pairs.sort();
    seeds_by_rank.sort();

    if pool_size < open_by_index.len() {
        warn!(
            "Unseeded pool of {} cannot cover {} open pairs",
            pool_size,
            open_by_index.len()
        );
        return Err(TournamentError::ByeAllocationInfeasible {
            required: open_by_index.len(),
            available: pool_size,
        });
    }

    let seed_byes = seed_pairs.len().min(num_byes);
    let unseeded_byes = num_byes - seed_byes;
    if unseeded_byes > open_by_index.len() {
        return Err(TournamentError::InvariantViolation(format!(
            "{unseeded_byes} unseeded byes for {} open pairs",
            open_by_index.len()
        )));
    }

    // Sibling pairs of the best seeds first, then the rest in bracket order.
    let mut open_pairs: Vec<usize> = Vec::with_capacity(open_by_index.len());
    for &(_, pair) in &seeds_by_rank {
        let sibling = pair ^ 1;
        if open_by_index.contains(&sibling) && !open_pairs.contains(&sibling) {
            open_pairs.push(sibling);
        }
    }
    for &pair in &open_by_index {
        if !open_pairs.contains(&pair) {
            open_pairs.push(pair);
        }
    }

    let full_count = open_pairs.len() - unseeded_byes;
    let advantaged_pairs: Vec<usize> = open_pairs[..full_count].to_vec();
    let contested_seed_pairs: Vec<usize> =
        seed_pairs[seed_byes..].iter().map(|&(_, pair)| pair).collect();

    let mut fills = vec![0; pair_count];
    for &pair in &open_pairs {
        fills[pair] = 1;
    }
    for &pair in &advantaged_pairs {
        fills[pair] = 2;
    }
    for &pair in &contested_seed_pairs {
        fills[pair] = 1;
    }

    let planned: usize = fills.iter().sum();
    if planned != pool_size {
        error!("Pair plan places {planned} of {pool_size} unseeded participants");
        return Err(TournamentError::InvariantViolation(format!(
            "pair plan places {planned} unseeded participants, pool has {pool_size}"
        )));
    }

    debug!(
        "Pair plan: {} seed byes, {} unseeded byes, {} advantaged pairs",
        seed_byes,
        unseeded_byes,
        advantaged_pairs.len()
    );

    Ok(PairPlan {
        fills,
        open_pairs,
        contested_seed_pairs,
        advantaged_pairs,
        seed_byes,
        unseeded_byes,
    })
}

/// Place the unseeded pool according to `plan`.
///
/// Every open pair receives one participant before any pair receives a second.
pub fn fill_unseeded(
    positions: &Positions,
    plan: &PairPlan,
    pool: &[ParticipantId],
) -> TournamentResult<Positions> {
    let mut slots = positions.slots.clone();
    let mut pool = pool.iter().copied();

    let mut place = |slots: &mut Vec<Slot>, pair: usize| -> TournamentResult<()> {
        let id = pool.next().ok_or_else(|| {
            TournamentError::InvariantViolation("unseeded pool exhausted".to_string())
        })?;
        let target = [2 * pair, 2 * pair + 1]
            .into_iter()
            .find(|&pos| slots[pos].is_empty())
            .ok_or_else(|| {
                TournamentError::InvariantViolation(format!("pair {pair} has no open slot"))
            })?;
        slots[target] = Slot::Unseeded(id);
        Ok(())
    };

    for &pair in &plan.open_pairs {
        place(&mut slots, pair)?;
    }
    for &pair in &plan.advantaged_pairs {
        place(&mut slots, pair)?;
    }
    for &pair in &plan.contested_seed_pairs {
        place(&mut slots, pair)?;
    }

    if pool.next().is_some() {
        return Err(TournamentError::InvariantViolation(
            "unseeded participants left after fill".to_string(),
        ));
    }

    Ok(Positions { slots })
}

/// Rank-ordered placement: rank order is the seeding.
///
/// The top `size - ranked.len()` ranks each get a bye (one per pair, in order), the
/// remaining ranks fill the rest of the positions sequentially.
pub fn place_by_rank(size: usize, ranked: &[ParticipantId]) -> TournamentResult<Positions> {
    if ranked.len() > size {
        return Err(TournamentError::InvariantViolation(format!(
            "{} ranked participants do not fit a {}-slot bracket",
            ranked.len(),
            size
        )));
    }

    let num_byes = size - ranked.len();
    let mut slots = vec![Slot::Empty; size];
    let mut next_position = 0;

    for (index, &id) in ranked.iter().enumerate() {
        let slot = Slot::Seeded {
            id,
            seed: index as u32 + 1,
        };
        if index < num_byes {
            // Opponent slot 2*index + 1 stays empty.
            slots[2 * index] = slot;
            next_position = 2 * (index + 1);
        } else {
            slots[next_position] = slot;
            next_position += 1;
        }
    }

    Ok(Positions { slots })
}

/// Pair-kind counts of a finished placement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlacementReport {
    pub bye_vs_seed: usize,
    pub bye_vs_unseeded: usize,
    pub seed_vs_seed: usize,
    pub seed_vs_unseeded: usize,
    pub unseeded_vs_unseeded: usize,
    pub bye_vs_bye: usize,
}

impl PlacementReport {
    pub fn count(positions: &Positions) -> Self {
        let mut report = Self::default();
        for pair in positions.pairs() {
            match pair {
                (Slot::Empty, Slot::Empty) => report.bye_vs_bye += 1,
                (Slot::Empty, Slot::Seeded { .. }) | (Slot::Seeded { .. }, Slot::Empty) => {
                    report.bye_vs_seed += 1
                }
                (Slot::Empty, Slot::Unseeded(_)) | (Slot::Unseeded(_), Slot::Empty) => {
                    report.bye_vs_unseeded += 1
                }
                (Slot::Seeded { .. }, Slot::Seeded { .. }) => report.seed_vs_seed += 1,
                (Slot::Seeded { .. }, Slot::Unseeded(_))
                | (Slot::Unseeded(_), Slot::Seeded { .. }) => report.seed_vs_unseeded += 1,
                (Slot::Unseeded(_), Slot::Unseeded(_)) => report.unseeded_vs_unseeded += 1,
            }
        }
        report
    }

    /// Empty slots across all pairs
    pub fn total_byes(&self) -> usize {
        self.bye_vs_seed + self.bye_vs_unseeded + 2 * self.bye_vs_bye
    }
}

/// Check a finished placement before any match is materialized.
pub fn validate(
    positions: &Positions,
    participant_count: usize,
    num_byes: usize,
    seeded_count: usize,
) -> TournamentResult<PlacementReport> {
    let report = PlacementReport::count(positions);
    debug!("Placement report: {report:?}");

    let violation = if report.bye_vs_bye != 0 {
        Some(format!("{} bye-vs-bye pairs", report.bye_vs_bye))
    } else if report.total_byes() != num_byes {
        Some(format!(
            "{} byes placed, expected {}",
            report.total_byes(),
            num_byes
        ))
    } else if report.bye_vs_seed > seeded_count {
        Some(format!(
            "{} seed byes exceed {} seeded participants",
            report.bye_vs_seed, seeded_count
        ))
    } else if positions.placed_count() != participant_count {
        Some(format!(
            "{} participants placed, expected {}",
            positions.placed_count(),
            participant_count
        ))
    } else {
        None
    };

    match violation {
        Some(reason) => {
            error!("Bracket placement rejected: {reason}");
            Err(TournamentError::InvariantViolation(reason))
        }
        None => Ok(report),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shuffle::{KeepOrder, ReverseOrder};

    fn seeded(ids_and_seeds: &[(ParticipantId, u32)]) -> Vec<Participant> {
        ids_and_seeds
            .iter()
            .map(|&(id, seed)| Participant::new(id, format!("S{seed}")).with_seed(seed))
            .collect()
    }

    #[test]
    fn test_seed_one_and_two_are_pinned() {
        let players = seeded(&[(1, 1), (2, 2), (3, 3), (4, 4)]);
        let refs: Vec<&Participant> = players.iter().collect();
        for placement in [
            place_seeds(8, &refs, 4, &mut KeepOrder),
            place_seeds(8, &refs, 4, &mut ReverseOrder),
        ] {
            assert_eq!(placement.positions.slot(0).participant(), Some(1));
            assert_eq!(placement.positions.slot(7).participant(), Some(2));
            let quarter: HashSet<_> = [3usize, 4]
                .iter()
                .filter_map(|&p| placement.positions.slot(p).participant())
                .collect();
            assert_eq!(quarter, HashSet::from([3, 4]));
        }
    }

    #[test]
    fn test_eighth_tier_positions() {
        let players = seeded(&[(1, 1), (5, 5), (6, 6)]);
        let refs: Vec<&Participant> = players.iter().collect();
        let placement = place_seeds(16, &refs, 13, &mut KeepOrder);
        assert_eq!(placement.positions.slot(3).participant(), Some(5));
        assert_eq!(placement.positions.slot(4).participant(), Some(6));
        assert!(placement.demoted.is_empty());
    }

    #[test]
    fn test_seeds_without_room_are_demoted() {
        let players = seeded(&[(1, 1), (2, 2), (3, 3)]);
        let refs: Vec<&Participant> = players.iter().collect();
        let placement = place_seeds(2, &refs, 0, &mut KeepOrder);
        assert_eq!(placement.demoted, vec![3]);

        let players = seeded(&[(1, 1), (5, 5)]);
        let refs: Vec<&Participant> = players.iter().collect();
        let placement = place_seeds(4, &refs, 2, &mut KeepOrder);
        assert_eq!(placement.demoted, vec![5]);
    }

    #[test]
    fn test_short_pool_draws_seeds_into_seedless_pairs() {
        // Seeds 2-6 with no unseeded players: pair 0 can only be covered by an eighth seed.
        let players = seeded(&[(2, 2), (3, 3), (4, 4), (5, 5), (6, 6)]);
        let refs: Vec<&Participant> = players.iter().collect();
        let placement = place_seeds(8, &refs, 0, &mut ReverseOrder);

        assert_eq!(placement.positions.slot(1).participant(), Some(5));
        assert_eq!(placement.positions.slot(6).participant(), Some(6));
        let plan = plan_pairs(&placement.positions, 0, 3).unwrap();
        assert_eq!(plan.seed_byes, 3);
        assert!(plan.open_pairs.is_empty());
    }

    #[test]
    fn test_draw_untouched_when_pool_covers_open_pairs() {
        let players = seeded(&[(2, 2), (3, 3), (4, 4), (5, 5), (6, 6)]);
        let refs: Vec<&Participant> = players.iter().collect();
        let placement = place_seeds(8, &refs, 1, &mut ReverseOrder);

        assert_eq!(placement.positions.slot(6).participant(), Some(5));
        assert_eq!(placement.positions.slot(5).participant(), Some(6));
        assert!(placement.positions.slot(1).is_empty());
    }

    #[test]
    fn test_plan_gives_byes_to_best_seeds_and_advantage_to_their_siblings() {
        // 8 slots, seeds 1 and 2, four unseeded: 6 participants, 2 byes.
        let players = seeded(&[(1, 1), (2, 2)]);
        let refs: Vec<&Participant> = players.iter().collect();
        let placement = place_seeds(8, &refs, 4, &mut KeepOrder);
        let plan = plan_pairs(&placement.positions, 4, 2).unwrap();

        assert_eq!(plan.seed_byes, 2);
        assert_eq!(plan.unseeded_byes, 0);
        // Seed 1 sits in pair 0, its sibling is pair 1; seed 2 in pair 3, sibling pair 2.
        assert_eq!(plan.advantaged_pairs, vec![1, 2]);
        assert_eq!(plan.fills, vec![0, 2, 2, 0]);
    }

    #[test]
    fn test_plan_rejects_small_pool() {
        // Seeds 1, 2, 5, 6 doubled up in pairs 0 and 3 leave two empty pairs.
        let mut positions = Positions::empty(8);
        positions.slots[0] = Slot::Seeded { id: 1, seed: 1 };
        positions.slots[1] = Slot::Seeded { id: 5, seed: 5 };
        positions.slots[6] = Slot::Seeded { id: 6, seed: 6 };
        positions.slots[7] = Slot::Seeded { id: 2, seed: 2 };
        let err = plan_pairs(&positions, 1, 3).unwrap_err();
        assert_eq!(
            err,
            TournamentError::ByeAllocationInfeasible {
                required: 2,
                available: 1
            }
        );
    }

    #[test]
    fn test_fill_touches_every_open_pair_first() {
        let positions = Positions::empty(8);
        let plan = plan_pairs(&positions, 5, 3).unwrap();
        let filled = fill_unseeded(&positions, &plan, &[10, 11, 12, 13, 14]).unwrap();
        let report = validate(&filled, 5, 3, 0).unwrap();
        assert_eq!(report.bye_vs_bye, 0);
        assert_eq!(report.bye_vs_unseeded, 3);
        assert_eq!(report.unseeded_vs_unseeded, 1);
        // The first four go one per pair.
        assert_eq!(filled.slot(0).participant(), Some(10));
        assert_eq!(filled.slot(2).participant(), Some(11));
        assert_eq!(filled.slot(4).participant(), Some(12));
        assert_eq!(filled.slot(6).participant(), Some(13));
    }

    #[test]
    fn test_place_by_rank_gives_top_ranks_byes() {
        let positions = place_by_rank(8, &[1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(positions.pair(0), (Slot::Seeded { id: 1, seed: 1 }, Slot::Empty));
        assert_eq!(positions.pair(1), (Slot::Seeded { id: 2, seed: 2 }, Slot::Empty));
        assert_eq!(positions.pair(2).0.participant(), Some(3));
        assert_eq!(positions.pair(2).1.participant(), Some(4));
        assert_eq!(positions.pair(3).1.participant(), Some(6));
        let report = validate(&positions, 6, 2, 6).unwrap();
        assert_eq!(report.bye_vs_seed, 2);
    }

    #[test]
    fn test_validate_rejects_bye_vs_bye() {
        let mut positions = Positions::empty(4);
        positions.slots[0] = Slot::Unseeded(1);
        positions.slots[1] = Slot::Unseeded(2);
        let err = validate(&positions, 2, 2, 0).unwrap_err();
        assert!(matches!(err, TournamentError::InvariantViolation(_)));
    }

    #[test]
    fn test_validate_rejects_wrong_bye_total() {
        let mut positions = Positions::empty(4);
        positions.slots[0] = Slot::Unseeded(1);
        positions.slots[2] = Slot::Unseeded(2);
        positions.slots[3] = Slot::Unseeded(3);
        assert!(validate(&positions, 3, 2, 0).is_err());
        assert!(validate(&positions, 3, 1, 0).is_ok());
    }
}
