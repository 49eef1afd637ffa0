//! Headless self-play harness.
//!
//! Plays seeded random games (two players alternating, random kind on a
//! random empty square) until the board fills or a turn cap is hit, then
//! prints a summary per game. Set `RUST_LOG=rps_arena=debug` to watch duels and cascades.

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use rps_arena::core::{ArenaConfig, DamageRoll, GameRng, PieceKind, PlayerId};
use rps_arena::events::{ArenaEvent, EventLog, TracingSink};
use rps_arena::progression::MemoryStore;
use rps_arena::session::Session;

#[derive(Parser, Debug)]
#[command(name = "simulate", about = "Play random rock/paper/scissors arena games")]
struct Args {
    /// Base seed; game i uses seed + i
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of games to play
    #[arg(long, default_value_t = 10)]
    games: u64,

    /// Board side length
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..))]
    size: u8,

    /// Roll base damage uniformly in MIN..=MAX instead of the fixed default
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"])]
    uniform: Option<Vec<f32>>,

    /// Stop a game after this many turns even if squares remain
    #[arg(long, default_value_t = 100)]
    max_turns: u32,

    /// Log every event through tracing
    #[arg(long)]
    trace_events: bool,
}

impl Args {
    fn damage_roll(&self) -> Option<DamageRoll> {
        match self.uniform.as_deref() {
            Some(&[min, max]) => Some(DamageRoll::Uniform { min, max }),
            _ => None,
        }
    }
}

struct GameSummary {
    turns: u32,
    destroyed: usize,
    chain_reactions: usize,
    survivors: usize,
}

fn play(args: &Args, seed: u64) -> GameSummary {
    let mut config = ArenaConfig::new().with_board_size(args.size).with_seed(seed);
    if let Some(roll) = args.damage_roll() {
        config = config.with_damage(roll);
    }

    let log = EventLog::new();
    let store = MemoryStore::new();
    let trace = args.trace_events;
    let mut tracer = TracingSink;
    let sink = {
        let mut log = log.clone();
        move |event: &ArenaEvent| -> Result<(), rps_arena::SinkError> {
            use rps_arena::events::NotificationSink;
            if trace {
                tracer.publish(event)?;
            }
            log.publish(event)
        }
    };

    let mut session = Session::new(config)
        .with_sink(sink)
        .with_progression(store.clone());
    session.initialize();

    let mut moves = GameRng::new(seed).for_context("moves");
    let mut destroyed = 0;
    let mut player = 1;

    while session.turn_number() < args.max_turns {
        let empty = session.board().empty_positions();
        let Some(&pos) = moves.choose(&empty) else {
            break;
        };
        let kind = *moves.choose(&PieceKind::ALL).unwrap_or(&PieceKind::Rock);

        match session.place_piece(pos.x, pos.y, kind, PlayerId::new(player)) {
            Ok(report) => {
                destroyed += report.destroyed().len();
                if let Some(err) = report.cascade_failure {
                    tracing::error!(%err, "cascade failure during simulation");
                }
            }
            Err(err) => tracing::warn!(%err, "unexpected rejection"),
        }
        player = if player == 1 { 2 } else { 1 };
    }

    let survivors = session.board().len();
    let turns = session.turn_number();
    session.end_game();

    if let Ok(Some(saved)) = store.load() {
        tracing::debug!(turn = saved.turn_number, active = saved.active, "last synced snapshot");
    }

    GameSummary {
        turns,
        destroyed,
        chain_reactions: log.named("chain_reaction").len(),
        survivors,
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    if let Some(roll) = args.damage_roll() {
        if !roll.is_valid() {
            Args::command()
                .error(ErrorKind::ValueValidation, "--uniform needs finite MIN <= MAX")
                .exit();
        }
    }
    tracing::info!(games = args.games, seed = args.seed, "starting simulation");

    let mut total_destroyed = 0;
    for game in 0..args.games {
        let summary = play(&args, args.seed.wrapping_add(game));
        total_destroyed += summary.destroyed;
        println!(
            "game {:>3}: {:>2} turns, {:>2} destroyed, {:>2} chain reactions, {:>2} survivors",
            game, summary.turns, summary.destroyed, summary.chain_reactions, summary.survivors
        );
    }

    println!("total destroyed: {total_destroyed}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_size_is_a_parse_error() {
        let err = Args::try_parse_from(["simulate", "--size", "0"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
        assert!(Args::try_parse_from(["simulate", "--size", "1"]).is_ok());
    }

    #[test]
    fn test_uniform_flag_builds_roll() {
        let args = Args::try_parse_from(["simulate", "--uniform", "40", "10"]).unwrap();
        let roll = args.damage_roll().unwrap();
        assert_eq!(roll, DamageRoll::Uniform { min: 40.0, max: 10.0 });
        assert!(!roll.is_valid());
    }
}
