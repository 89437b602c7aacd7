//! Tournament manager owning one event's match set.

use log::info;

use super::models::{Podium, TournamentConfig, TournamentState, TournamentType};
use crate::advancement::{AdvancementEngine, AdvancementOutcome};
use crate::bracket::{Bracket, BracketBuilder};
use crate::errors::{TournamentError, TournamentResult};
use crate::models::{
    Match, MatchStatus, ParticipantId, ROUND_ROBIN_ROUND, Score, is_round_complete,
};
use crate::participant::{Participant, ParticipantSet};
use crate::season::{
    GroupScheduler, GroupStandings, PlayoffSeeder, Season, StandingsCalculator, StatRecord,
};
use crate::shuffle::Shuffler;

/// Tournament manager.
///
/// Holds exclusive ownership of an event's matches; every construction step
/// replaces them wholesale or leaves them untouched.
pub struct TournamentManager<S: Shuffler> {
    config: TournamentConfig,
    state: TournamentState,
    participants: ParticipantSet,
    season: Option<Season>,
    bracket: Option<Bracket>,
    stats: Vec<StatRecord>,
    engine: AdvancementEngine,
    standings: StandingsCalculator,
    shuffler: S,
}

impl<S: Shuffler> TournamentManager<S> {
    /// Create a new tournament manager
    pub fn new(config: TournamentConfig, shuffler: S) -> Self {
        Self {
            config,
            state: TournamentState::Registration,
            participants: ParticipantSet::default(),
            season: None,
            bracket: None,
            stats: Vec::new(),
            engine: AdvancementEngine::new(),
            standings: StandingsCalculator::new(),
            shuffler,
        }
    }

    pub fn config(&self) -> &TournamentConfig {
        &self.config
    }

    pub fn state(&self) -> TournamentState {
        self.state
    }

    pub fn participants(&self) -> &ParticipantSet {
        &self.participants
    }

    pub fn season(&self) -> Option<&Season> {
        self.season.as_ref()
    }

    pub fn bracket(&self) -> Option<&Bracket> {
        self.bracket.as_ref()
    }

    /// Register a participant
    pub fn register(&mut self, participant: Participant) -> TournamentResult<()> {
        self.expect_state(TournamentState::Registration)?;
        self.participants.insert(participant)
    }

    /// Withdraw a participant before the tournament starts
    pub fn withdraw(&mut self, id: ParticipantId) -> TournamentResult<Participant> {
        self.expect_state(TournamentState::Registration)?;
        self.participants.remove(id)
    }

    /// Close registration and build the first structure.
    ///
    /// Knockout events get their bracket; season events get their groups (from
    /// existing affiliations when every participant has one, otherwise drawn).
    pub fn start(&mut self) -> TournamentResult<()> {
        self.expect_state(TournamentState::Registration)?;
        self.config.validate(self.participants.len())?;

        match self.config.tournament_type {
            TournamentType::Knockout => {
                let bracket = BracketBuilder::new()
                    .with_bronze_match(self.config.bracket_has_bronze_match)
                    .build(&self.participants, &mut self.shuffler)?;
                self.bracket = Some(bracket);
                self.transition(TournamentState::Knockout);
            }
            TournamentType::Season => {
                let affiliated = self.participants.iter().all(|p| p.group.is_some());
                let season = if affiliated {
                    GroupScheduler::from_affiliations(&self.participants)?
                } else {
                    GroupScheduler::new(self.config.group_count)
                        .schedule(&self.participants, &mut self.shuffler)?
                };
                self.season = Some(season);
                self.transition(TournamentState::RegularSeason);
            }
        }
        Ok(())
    }

    /// Mark a match live, delayed or back to upcoming
    pub fn set_match_status(
        &mut self,
        round: u32,
        match_number: u32,
        status: MatchStatus,
    ) -> TournamentResult<()> {
        let matches = match round {
            ROUND_ROBIN_ROUND => self.season.as_mut().map(|s| &mut s.matches),
            _ => self.bracket.as_mut().map(|b| &mut b.matches),
        };
        let matches = matches.ok_or(TournamentError::MatchNotFound {
            round,
            match_number,
        })?;
        self.engine.set_status(matches, round, match_number, status)
    }

    /// Record a round-robin result; returns whether the regular season is complete
    pub fn record_group_result(
        &mut self,
        match_number: u32,
        winner: Option<ParticipantId>,
        score: Option<Score>,
    ) -> TournamentResult<bool> {
        self.expect_state(TournamentState::RegularSeason)?;
        let season = self.season.as_mut().ok_or(TournamentError::MatchNotFound {
            round: ROUND_ROBIN_ROUND,
            match_number,
        })?;
        self.engine.record_result(
            &mut season.matches,
            ROUND_ROBIN_ROUND,
            match_number,
            winner,
            score,
        )
    }

    /// Attach an auxiliary counter (e.g. cards) to a participant
    pub fn add_stat(&mut self, record: StatRecord) -> TournamentResult<()> {
        if self.participants.get(record.participant).is_none() {
            return Err(TournamentError::ParticipantNotFound(record.participant));
        }
        self.stats.push(record);
        Ok(())
    }

    /// Current per-group standings
    pub fn standings(&self) -> Vec<GroupStandings> {
        match &self.season {
            Some(season) => {
                self.standings
                    .compute_all_groups(&season.groups, &season.matches, &self.stats)
            }
            None => Vec::new(),
        }
    }

    /// Seed the playoff bracket from completed group standings
    pub fn start_playoffs(&mut self) -> TournamentResult<()> {
        self.expect_state(TournamentState::RegularSeason)?;
        // Singleton groups play no fixtures and qualify as they stand.
        let no_fixtures = self.season.as_ref().is_some_and(|s| s.matches.is_empty());
        if !no_fixtures && !self.is_round_complete(ROUND_ROBIN_ROUND) {
            return Err(TournamentError::InvalidTransition {
                expected: "completed regular season".to_string(),
                actual: "regular season in progress".to_string(),
            });
        }

        let bracket = PlayoffSeeder::new(self.config.qualifiers_per_group)
            .with_bronze_match(self.config.bracket_has_bronze_match)
            .build(&self.standings())?;
        self.bracket = Some(bracket);
        self.transition(TournamentState::Knockout);
        Ok(())
    }

    /// Declare an elimination match winner and advance it
    pub fn record_knockout_result(
        &mut self,
        round: u32,
        match_number: u32,
        winner: ParticipantId,
        score: Option<Score>,
    ) -> TournamentResult<AdvancementOutcome> {
        self.expect_state(TournamentState::Knockout)?;
        let bracket = self.bracket.as_mut().ok_or(TournamentError::MatchNotFound {
            round,
            match_number,
        })?;

        let outcome = self
            .engine
            .declare_winner(bracket, round, match_number, winner, score)?;
        if bracket.is_finished() {
            self.transition(TournamentState::Finished);
        }
        Ok(outcome)
    }

    /// Whether every match of `round` is terminal; round 0 is the regular season
    pub fn is_round_complete(&self, round: u32) -> bool {
        if round == ROUND_ROBIN_ROUND {
            self.season
                .as_ref()
                .is_some_and(|s| is_round_complete(&s.matches, round))
        } else {
            self.bracket
                .as_ref()
                .is_some_and(|b| b.is_round_complete(round))
        }
    }

    /// Every match of the event, round-robin first, for bulk persistence
    pub fn matches(&self) -> Vec<Match> {
        let season = self.season.iter().flat_map(|s| s.matches.iter());
        let bracket = self.bracket.iter().flat_map(|b| b.matches.iter());
        season.chain(bracket).cloned().collect()
    }

    pub fn podium(&self) -> Option<Podium> {
        if self.state != TournamentState::Finished {
            return None;
        }
        let bracket = self.bracket.as_ref()?;
        Some(Podium {
            champion: bracket.champion()?,
            runner_up: bracket.runner_up(),
            third_place: bracket.third_place(),
        })
    }

    fn expect_state(&self, expected: TournamentState) -> TournamentResult<()> {
        if self.state != expected {
            return Err(TournamentError::InvalidTransition {
                expected: expected.to_string(),
                actual: self.state.to_string(),
            });
        }
        Ok(())
    }

    fn transition(&mut self, next: TournamentState) {
        info!(
            "Tournament '{}': {} -> {}",
            self.config.name, self.state, next
        );
        self.state = next;
    }
}
