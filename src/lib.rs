//! go3-sim: a one-ply Monte Carlo Go player.
//!
//! For every legal move the player runs random games to the end, scores
//! them with area scoring and plays the move that won most often. The
//! playout budget is either split evenly across candidates or allocated
//! with UCB1.
//!
//! ## Modules
//!
//! - [`constants`] - Board size limits and engine defaults
//! - [`board`] - Board state, legality, captures and ko
//! - [`score`] - Area scoring and winner
//! - [`patterns`] - 3x3 patterns for the rule-based policy
//! - [`playout`] - Playout policies and the playout driver
//! - [`engine`] - Candidate evaluation and the simulation player
//! - [`ucb`] - UCB1 budget allocation
//! - [`config`] - Engine options and validation
//! - [`gtp`] - Go Text Protocol front-end
//!
//! ## Example
//!
//! ```
//! use go3_sim::board::{Color, GoBoard, format_point};
//! use go3_sim::config::EngineConfig;
//! use go3_sim::engine::SimulationPlayer;
//!
//! let config = EngineConfig { sim: 2, seed: Some(7), ..Default::default() };
//! let mut player = SimulationPlayer::new(config);
//! let board = GoBoard::new(5);
//! let mv = player.get_move(&board, Color::Black);
//! println!("Black plays {}", format_point(mv, board.size()));
//! ```

pub mod board;
pub mod config;
pub mod constants;
pub mod engine;
pub mod gtp;
pub mod patterns;
pub mod playout;
pub mod score;
pub mod ucb;
