//! UCB1 allocation of the playout budget across candidate moves.
//!
//! Each candidate is a bandit arm paying 1 when its playout is won by the
//! side to move. Every arm is pulled once, then the arm maximizing
//! `mean + C * sqrt(ln(total) / visits)` is pulled until the budget runs
//! out. The arm with the best final mean is played, which is not
//! necessarily the most-pulled one.

use crate::board::{Color, GoBoard, Point};
use crate::constants::PASS;
use crate::engine::{Simulator, report_win_rates};

/// Per-arm statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArmStats {
    pub wins: u32,
    pub visits: u32,
}

impl ArmStats {
    /// Mean reward, 0 for an unvisited arm.
    #[inline]
    pub fn mean(&self) -> f64 {
        if self.visits > 0 {
            self.wins as f64 / self.visits as f64
        } else {
            0.0
        }
    }

    fn record(&mut self, won: bool) {
        self.visits += 1;
        if won {
            self.wins += 1;
        }
    }
}

/// UCB1 value of a visited arm after `total_visits` pulls overall.
#[inline]
pub fn ucb_score(arm: &ArmStats, c: f64, total_visits: u32) -> f64 {
    arm.mean() + c * ((total_visits as f64).ln() / arm.visits as f64).sqrt()
}

/// Arm to pull next: the first unvisited arm, else the first arm with the
/// highest UCB value.
pub fn find_best(stats: &[ArmStats], c: f64, total_visits: u32) -> usize {
    if let Some(i) = stats.iter().position(|arm| arm.visits == 0) {
        return i;
    }
    let mut best = 0;
    let mut best_score = f64::NEG_INFINITY;
    for (i, arm) in stats.iter().enumerate() {
        let score = ucb_score(arm, c, total_visits);
        if score > best_score {
            best_score = score;
            best = i;
        }
    }
    best
}

/// Arm with the highest mean reward; the first one wins ties.
pub fn best_arm(stats: &[ArmStats]) -> usize {
    let mut best = 0;
    let mut best_mean = f64::NEG_INFINITY;
    for (i, arm) in stats.iter().enumerate() {
        let mean = arm.mean();
        if mean > best_mean {
            best_mean = mean;
            best = i;
        }
    }
    best
}

/// Spend `budget` playouts over `moves` with UCB1 and return the move to play.
pub fn run_ucb<S: Simulator + ?Sized>(
    simulator: &mut S,
    board: &GoBoard,
    c: f64,
    moves: &[Point],
    color: Color,
    budget: usize,
) -> Point {
    if moves.is_empty() {
        return PASS;
    }
    let stats = run_arms(simulator, board, c, moves, color, budget);
    let (wins, visits): (Vec<u32>, Vec<u32>) =
        stats.iter().map(|arm| (arm.wins, arm.visits)).unzip();
    report_win_rates(board.size(), moves, &wins, &visits);
    moves[best_arm(&stats)]
}

/// The bandit loop itself, returning the final statistics.
pub fn run_arms<S: Simulator + ?Sized>(
    simulator: &mut S,
    board: &GoBoard,
    c: f64,
    moves: &[Point],
    color: Color,
    budget: usize,
) -> Vec<ArmStats> {
    let mut stats = vec![ArmStats::default(); moves.len()];
    if moves.is_empty() {
        return stats;
    }
    for n in 0..budget {
        let i = find_best(&stats, c, n as u32);
        let result = simulator.simulate(board, moves[i], color);
        stats[i].record(result == color);
    }
    stats
}
