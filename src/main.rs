//! go3-sim: a one-ply Monte Carlo Go player.
//!
//! ## Usage
//!
//! - `go3-sim` - Start the GTP server (default)
//! - `go3-sim gtp` - Start the GTP server
//! - `go3-sim demo` - Self-play one game and print the result
//!
//! Logs go to stderr; set `RUST_LOG` to change the level.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::info;

use go3_sim::board::{Color, GoBoard, format_point};
use go3_sim::config::{EngineConfig, MoveSelection, SimulationRule};
use go3_sim::constants::{
    DEFAULT_KOMI, DEFAULT_LIMIT, DEFAULT_SIM, DEFAULT_SIZE, PASS, UCB_EXPLORATION,
};
use go3_sim::engine::SimulationPlayer;
use go3_sim::gtp::GtpEngine;
use go3_sim::score::score_board;

/// go3-sim: a Go player that selects moves by simulation
#[derive(Parser)]
#[command(name = "go3-sim")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    engine: EngineArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct EngineArgs {
    /// Number of simulations per move, so total playouts = sim * legal moves
    #[arg(long, default_value_t = DEFAULT_SIM)]
    sim: u32,

    /// Type of move selection: simple or ucb
    #[arg(long, default_value_t = MoveSelection::Simple)]
    moveselect: MoveSelection,

    /// Type of simulation policy: random or rulebased
    #[arg(long, default_value_t = SimulationRule::Random)]
    simrule: SimulationRule,

    /// Reject self-atari moves in rule-based playouts
    #[arg(long)]
    movefilter: bool,

    /// Maximum plies per playout
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    limit: usize,

    /// Komi
    #[arg(long, default_value_t = DEFAULT_KOMI, allow_negative_numbers = true)]
    komi: f64,

    /// UCB1 exploration constant
    #[arg(long, default_value_t = UCB_EXPLORATION)]
    exploration: f64,

    /// Board size
    #[arg(long, default_value_t = DEFAULT_SIZE)]
    size: usize,

    /// Seed for the playout random number generator
    #[arg(long)]
    seed: Option<u64>,
}

impl From<EngineArgs> for EngineConfig {
    fn from(args: EngineArgs) -> Self {
        EngineConfig {
            sim: args.sim,
            move_selection: args.moveselect,
            simulation_rule: args.simrule,
            check_selfatari: args.movefilter,
            limit: args.limit,
            komi: args.komi,
            exploration: args.exploration,
            size: args.size,
            seed: args.seed,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Start the GTP (Go Text Protocol) server for use with GUI applications
    Gtp,
    /// Self-play one game and print every position
    Demo,
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = EngineConfig::from(cli.engine);
    config.validate()?;
    info!(?config, "engine configured");

    match cli.command {
        Some(Commands::Gtp) | None => GtpEngine::new(config).run_stdio(),
        Some(Commands::Demo) => {
            run_demo(config);
            Ok(())
        }
    }
}

fn run_demo(config: EngineConfig) {
    println!("go3-sim: one-ply Monte Carlo Go\n");
    let komi = config.komi;
    let mut board = GoBoard::new(config.size);
    let mut player = SimulationPlayer::new(config);

    let mut color = Color::Black;
    let mut passes = 0;
    let max_moves = board.size() * board.size() * 3;
    for n in 1..=max_moves {
        let mv = player.get_move(&board, color);
        let mv = match board.play_move(mv, color) {
            Ok(()) => mv,
            Err(_) => {
                board.pass(color);
                PASS
            }
        };
        println!("{n}. {color} {}", format_point(mv, board.size()));
        println!("{board}");

        passes = if mv == PASS { passes + 1 } else { 0 };
        if passes >= 2 {
            break;
        }
        color = color.opponent();
    }

    let score = score_board(&board, komi);
    println!("Final score (Black's view, komi {komi}): {score:+.1}");
}
