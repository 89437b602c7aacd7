//! Command-line driver for tournament draws and simulations.
//!
//! Builds brackets and group seasons from player lists and prints them as
//! JSON, or plays out a whole event with random results.

mod config;
mod logging;

use anyhow::{Context, Error, bail};
use log::info;
use pico_args::Arguments;
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::Serialize;
use sports_bracket::season::{GroupScheduler, GroupStandings, Season};
use sports_bracket::shuffle::RandomShuffler;
use sports_bracket::tournament::{Podium, TournamentConfig, TournamentManager, TournamentState};
use sports_bracket::{
    Bracket, BracketBuilder, MatchStatus, Participant, ParticipantId, ParticipantSet, Score,
};

use config::{CliConfig, CliOverrides};

const HELP: &str = "\
Draw brackets, schedule group seasons and simulate tournaments

USAGE:
  sb_cli <COMMAND> --player NAME[:SEED] [--player ...] [OPTIONS]

COMMANDS:
  bracket                  Draw a single-elimination bracket and print it as JSON
  season                   Split players into round-robin groups and print the fixtures
  simulate                 Play a whole event with random results and print the podium

OPTIONS:
  --player     NAME[:SEED] Participant, optionally seeded 1-8 (repeatable)
  --name       TEXT        Event name                        [default: env SB_NAME or Tournament]
  --groups     N           Round-robin groups                [default: env SB_GROUPS or 2]
  --qualifiers K           Playoff qualifiers per group      [default: env SB_QUALIFIERS or 2]
  --seed       N           RNG seed for a reproducible draw  [default: env SB_RNG_SEED or random]

FLAGS:
  --no-bronze              Skip the third-place match        [default: env SB_BRONZE or true]
  --season                 Simulate groups then playoffs instead of a straight knockout
  -h, --help               Print help information

ENVIRONMENT:
  RUST_LOG                 Log filter (logs go to stderr)
  (Variables may also be placed in a .env file)
";

struct Args {
    command: String,
    players: Vec<String>,
    season: bool,
    overrides: CliOverrides,
}

/// Bracket draw output
#[derive(Serialize)]
struct BracketOutput<'a> {
    name: &'a str,
    participants: &'a [Participant],
    bracket: &'a Bracket,
}

/// Season schedule output
#[derive(Serialize)]
struct SeasonOutput<'a> {
    name: &'a str,
    participants: &'a [Participant],
    season: &'a Season,
}

/// Simulation output
#[derive(Serialize)]
struct SimulationOutput<'a> {
    name: &'a str,
    state: TournamentState,
    standings: Vec<GroupStandings>,
    podium: Podium,
    champion: &'a str,
}

fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        return Ok(());
    }

    let args = Args {
        command: pargs
            .subcommand()?
            .context("missing command, see --help")?,
        players: pargs.values_from_str("--player")?,
        season: pargs.contains("--season"),
        overrides: CliOverrides {
            name: pargs.opt_value_from_str("--name")?,
            group_count: pargs.opt_value_from_str("--groups")?,
            qualifiers_per_group: pargs.opt_value_from_str("--qualifiers")?,
            bronze_match: pargs.contains("--no-bronze").then_some(false),
            rng_seed: pargs.opt_value_from_str("--seed")?,
        },
    };

    let remaining = pargs.finish();
    if !remaining.is_empty() {
        bail!("unexpected arguments: {remaining:?}");
    }

    logging::init();

    let config = CliConfig::from_env(args.overrides)?;
    config.validate()?;
    let roster = parse_roster(&args.players)?;
    let mut rng = match config.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    info!(
        "Running '{}' for '{}' with {} players",
        args.command,
        config.name,
        roster.len()
    );

    let json = match args.command.as_str() {
        "bracket" => draw_bracket(&config, &roster, &mut rng)?,
        "season" => draw_season(&config, &roster, &mut rng)?,
        "simulate" => simulate(&config, &roster, args.season, &mut rng)?,
        other => bail!("unknown command '{other}', see --help"),
    };
    println!("{json}");
    Ok(())
}

/// Parse `NAME[:SEED]` into a participant numbered by position
fn parse_player(id: ParticipantId, raw: &str) -> Result<Participant, Error> {
    let (name, seed) = match raw.rsplit_once(':') {
        Some((name, seed)) => {
            let seed: u32 = seed
                .trim()
                .parse()
                .with_context(|| format!("invalid seed in player '{raw}'"))?;
            (name, Some(seed))
        }
        None => (raw, None),
    };

    let name = name.trim();
    if name.is_empty() {
        bail!("player '{raw}' has no name");
    }

    let participant = Participant::new(id, name);
    Ok(match seed {
        Some(seed) => participant.with_seed(seed),
        None => participant,
    })
}

fn parse_roster(players: &[String]) -> Result<ParticipantSet, Error> {
    let participants = players
        .iter()
        .enumerate()
        .map(|(index, raw)| parse_player(index as ParticipantId + 1, raw))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ParticipantSet::new(participants)?)
}

fn draw_bracket(
    config: &CliConfig,
    roster: &ParticipantSet,
    rng: &mut StdRng,
) -> Result<String, Error> {
    let mut shuffler = RandomShuffler::from_rng(StdRng::seed_from_u64(rng.random()));
    let bracket = BracketBuilder::new()
        .with_bronze_match(config.bronze_match)
        .build(roster, &mut shuffler)?;

    logging::log_command_summary("bracket", roster.len(), bracket.matches.len());
    Ok(serde_json::to_string_pretty(&BracketOutput {
        name: &config.name,
        participants: roster.as_slice(),
        bracket: &bracket,
    })?)
}

fn draw_season(
    config: &CliConfig,
    roster: &ParticipantSet,
    rng: &mut StdRng,
) -> Result<String, Error> {
    let mut shuffler = RandomShuffler::from_rng(StdRng::seed_from_u64(rng.random()));
    let season = GroupScheduler::new(config.group_count).schedule(roster, &mut shuffler)?;

    logging::log_command_summary("season", roster.len(), season.matches.len());
    Ok(serde_json::to_string_pretty(&SeasonOutput {
        name: &config.name,
        participants: roster.as_slice(),
        season: &season,
    })?)
}

/// A random final score; `winner_first` decides which side scores more
fn random_score(rng: &mut StdRng, winner_first: bool) -> Score {
    let high = rng.random_range(1..=5);
    let low = rng.random_range(0..high);
    if winner_first {
        Score::new(high, low)
    } else {
        Score::new(low, high)
    }
}

fn simulate(
    config: &CliConfig,
    roster: &ParticipantSet,
    season: bool,
    rng: &mut StdRng,
) -> Result<String, Error> {
    let tournament: TournamentConfig = if season {
        config.season()
    } else {
        config.knockout()
    };
    let shuffler = RandomShuffler::from_rng(StdRng::seed_from_u64(rng.random()));
    let mut manager = TournamentManager::new(tournament, shuffler);
    for participant in roster.iter() {
        manager.register(participant.clone())?;
    }
    manager.start()?;

    if manager.state() == TournamentState::RegularSeason {
        let fixtures: Vec<u32> = manager
            .matches()
            .iter()
            .filter(|m| m.is_round_robin())
            .map(|m| m.match_number)
            .collect();
        for match_number in fixtures {
            // Draws are allowed in group play.
            let score = Score::new(rng.random_range(0..=4), rng.random_range(0..=4));
            manager.record_group_result(match_number, None, Some(score))?;
        }
        manager.start_playoffs()?;
    }

    while manager.state() == TournamentState::Knockout {
        let playable: Vec<(u32, u32, ParticipantId, ParticipantId)> = manager
            .bracket()
            .context("knockout phase without a bracket")?
            .matches
            .iter()
            .filter(|m| m.status != MatchStatus::Completed && m.status != MatchStatus::Bye)
            .filter_map(|m| Some((m.round, m.match_number, m.player1?, m.player2?)))
            .collect();
        if playable.is_empty() {
            bail!("bracket stalled before a champion was decided");
        }

        for (round, match_number, player1, player2) in playable {
            let first_wins = rng.random_bool(0.5);
            let winner = if first_wins { player1 } else { player2 };
            let score = random_score(rng, first_wins);
            manager.record_knockout_result(round, match_number, winner, Some(score))?;
        }
    }

    let podium = manager.podium().context("tournament finished without a podium")?;
    let champion = roster
        .get(podium.champion)
        .map(|p| p.name.as_str())
        .unwrap_or_default();
    logging::log_command_summary("simulate", roster.len(), manager.matches().len());

    Ok(serde_json::to_string_pretty(&SimulationOutput {
        name: &config.name,
        state: manager.state(),
        standings: manager.standings(),
        podium,
        champion,
    })?)
}
