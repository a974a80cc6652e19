//! Board geometry limits and engine defaults.
//!
//! The board uses a 1D array with a ring of border padding, so the
//! geometry itself depends on the runtime board size. Only the bounds
//! and the special move values are fixed here.

use crate::board::Point;

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size used when none is requested.
pub const DEFAULT_SIZE: usize = 7;

/// Smallest supported board size.
pub const MIN_SIZE: usize = 2;

/// Largest supported board size (GTP coordinates run out after 25 columns).
pub const MAX_SIZE: usize = 25;

// =============================================================================
// Special Move Values
// =============================================================================

/// Pass move marker. Index 0 is always border padding, so it is never a playable point.
pub const PASS: Point = 0;

// =============================================================================
// Simulation Parameters
// =============================================================================

/// Default number of playouts per candidate move.
pub const DEFAULT_SIM: u32 = 10;

/// Default ply limit for a single playout.
pub const DEFAULT_LIMIT: usize = 100;

/// Default komi (compensation points for White).
pub const DEFAULT_KOMI: f64 = 6.5;

/// UCB1 exploration constant. sqrt(2) is the textbook value; smaller is greedier.
pub const UCB_EXPLORATION: f64 = 0.4;
