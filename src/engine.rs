//! One-ply Monte Carlo move selection.
//!
//! Every legal move (plus pass) is a candidate. Candidates are evaluated by
//! playouts from a private copy of the board, either with the same number of
//! playouts each ([`MoveSelection::Simple`]) or with a UCB1 split of the same
//! total budget ([`MoveSelection::Ucb`]).
//!
//! Candidates are enumerated in ascending point order (row-major, bottom row
//! first) with pass last, so ties resolve the same way on every run.

use fastrand::Rng;
use tracing::{debug, info};

use crate::board::{Color, GoBoard, Point, format_point};
use crate::config::{EngineConfig, MoveSelection};
use crate::constants::PASS;
use crate::playout::{MoveGenerator, PlayoutDriver, PlayoutPolicy};
use crate::ucb::run_ucb;

/// Reward source for move evaluation: plays out one game after `mv` and
/// returns the winner.
pub trait Simulator {
    fn simulate(&mut self, board: &GoBoard, mv: Point, to_play: Color) -> Color;
}

impl<G: MoveGenerator> Simulator for PlayoutDriver<G> {
    fn simulate(&mut self, board: &GoBoard, mv: Point, to_play: Color) -> Color {
        PlayoutDriver::simulate(self, board, mv, to_play)
    }
}

/// Legal points for `color` in ascending order, followed by `PASS`.
///
/// Empty when no point is legal.
pub fn candidate_moves(board: &GoBoard, color: Color) -> Vec<Point> {
    let mut moves: Vec<Point> = board
        .empty_points()
        .into_iter()
        .filter(|&pt| board.is_legal(pt, color))
        .collect();
    if !moves.is_empty() {
        moves.push(PASS);
    }
    moves
}

/// Run `n` playouts after `mv` and count the ones won by `color`.
pub fn simulate_move<S: Simulator + ?Sized>(
    simulator: &mut S,
    board: &GoBoard,
    mv: Point,
    color: Color,
    n: u32,
) -> u32 {
    let mut wins = 0;
    for _ in 0..n {
        if simulator.simulate(board, mv, color) == color {
            wins += 1;
        }
    }
    wins
}

/// The move with the most wins; the earliest candidate wins ties.
pub fn select_best_move(moves: &[Point], wins: &[u32]) -> Point {
    let mut best = 0;
    for i in 1..moves.len().min(wins.len()) {
        if wins[i] > wins[best] {
            best = i;
        }
    }
    moves.get(best).copied().unwrap_or(PASS)
}

/// Pick a move for `color` on `board` with the given strategy.
///
/// `sim` is the number of playouts per candidate; UCB mode spends
/// `sim * candidates` playouts in total. The board is never modified.
pub fn select_move<S: Simulator + ?Sized>(
    simulator: &mut S,
    board: &GoBoard,
    color: Color,
    selection: MoveSelection,
    sim: u32,
    exploration: f64,
) -> Point {
    let moves = candidate_moves(board, color);
    if moves.is_empty() {
        return PASS;
    }
    debug!(%color, candidates = moves.len(), %selection, sim, "selecting move");

    let pristine = board.clone();
    match selection {
        MoveSelection::Simple => {
            let wins: Vec<u32> = moves
                .iter()
                .map(|&mv| simulate_move(&mut *simulator, &pristine, mv, color, sim))
                .collect();
            report_win_rates(board.size(), &moves, &wins, &vec![sim; moves.len()]);
            select_best_move(&moves, &wins)
        }
        MoveSelection::Ucb => {
            let budget = sim as usize * moves.len();
            run_ucb(simulator, &pristine, exploration, &moves, color, budget)
        }
    }
}

/// Log per-candidate win rates, best first. Diagnostics only.
pub fn report_win_rates(size: usize, moves: &[Point], wins: &[u32], visits: &[u32]) {
    let mut rates: Vec<(String, f64)> = moves
        .iter()
        .zip(wins.iter().zip(visits))
        .map(|(&mv, (&w, &v))| {
            let rate = if v > 0 { w as f64 / v as f64 } else { 0.0 };
            (format_point(mv, size), rate)
        })
        .collect();
    rates.sort_by(|a, b| b.1.total_cmp(&a.1));
    let line = rates
        .iter()
        .map(|(mv, rate)| format!("{mv}: {rate:.2}"))
        .collect::<Vec<_>>()
        .join(", ");
    info!(target: "go3::report", "win rates: {line}");
}

/// A Go player that picks moves by simulation.
///
/// Komi, ply limit, playout policy and selection strategy are all fixed at
/// construction.
pub struct SimulationPlayer<G = PlayoutPolicy> {
    config: EngineConfig,
    driver: PlayoutDriver<G>,
}

impl SimulationPlayer<PlayoutPolicy> {
    /// Build a player using the playout policy named in `config`.
    pub fn new(config: EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => Rng::with_seed(seed),
            None => Rng::new(),
        };
        Self::with_rng(config, rng)
    }

    /// Build a player that continues from an existing random stream.
    pub fn with_rng(config: EngineConfig, rng: Rng) -> Self {
        let policy = config.playout_policy();
        Self::with_generator(config, policy, rng)
    }
}

impl<G: MoveGenerator> SimulationPlayer<G> {
    /// Build a player with a custom playout move generator.
    pub fn with_generator(config: EngineConfig, generator: G, rng: Rng) -> Self {
        let driver = PlayoutDriver::new(generator, config.komi, config.limit, rng);
        Self { config, driver }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[inline]
    pub fn komi(&self) -> f64 {
        self.config.komi
    }

    /// Split off an independent random stream, e.g. to rebuild the player.
    pub fn fork_rng(&mut self) -> Rng {
        self.driver.rng_mut().fork()
    }

    /// Choose the move to play for `color`. Returns `PASS` if nothing is legal.
    pub fn get_move(&mut self, board: &GoBoard, color: Color) -> Point {
        select_move(
            &mut self.driver,
            board,
            color,
            self.config.move_selection,
            self.config.sim,
            self.config.exploration,
        )
    }

    /// One playout after `mv` for `to_play`; see [`PlayoutDriver::simulate`].
    pub fn simulate(&mut self, board: &GoBoard, mv: Point, to_play: Color) -> Color {
        self.driver.simulate(board, mv, to_play)
    }

    /// Play `board` out with `color` to move; see [`PlayoutDriver::play_game`].
    pub fn play_game(&mut self, board: &mut GoBoard, color: Color) -> Color {
        self.driver.play_game(board, color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::parse_point;

    /// Black wins only after one chosen move; counts every call.
    struct Rigged {
        black_move: Point,
        calls: usize,
    }

    impl Simulator for Rigged {
        fn simulate(&mut self, _board: &GoBoard, mv: Point, _to_play: Color) -> Color {
            self.calls += 1;
            if mv == self.black_move {
                Color::Black
            } else {
                Color::White
            }
        }
    }

    /// Every playout ends in a tie.
    struct AlwaysDraw;

    impl Simulator for AlwaysDraw {
        fn simulate(&mut self, _board: &GoBoard, _mv: Point, _to_play: Color) -> Color {
            Color::Empty
        }
    }

    #[test]
    fn test_candidates_end_with_pass() {
        let board = GoBoard::new(3);
        let moves = candidate_moves(&board, Color::Black);
        assert_eq!(moves.len(), 10);
        assert_eq!(moves.last(), Some(&PASS));
        assert!(moves[..9].windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_no_legal_moves_returns_pass() {
        // Black fills a 2x2 board but for one eye it cannot fill itself.
        let mut board = GoBoard::new(2);
        for v in ["a2", "b1", "b2"] {
            board
                .play_move(parse_point(v, 2).unwrap(), Color::Black)
                .unwrap();
        }
        assert!(candidate_moves(&board, Color::Black).is_empty());
        let mut sim = Rigged {
            black_move: PASS,
            calls: 0,
        };
        for selection in [MoveSelection::Simple, MoveSelection::Ucb] {
            let mv = select_move(&mut sim, &board, Color::Black, selection, 5, 0.4);
            assert_eq!(mv, PASS);
        }
        assert_eq!(sim.calls, 0, "no playouts without candidates");
    }

    #[test]
    fn test_simple_mode_picks_rigged_candidate() {
        let board = GoBoard::new(3);
        let target = parse_point("b2", 3).unwrap();
        let mut sim = Rigged {
            black_move: target,
            calls: 0,
        };
        let mv = select_move(&mut sim, &board, Color::Black, MoveSelection::Simple, 4, 0.4);
        assert_eq!(mv, target);
        // 9 points + pass, 4 playouts each.
        assert_eq!(sim.calls, 40);
    }

    #[test]
    fn test_simple_mode_for_white_avoids_black_move() {
        let board = GoBoard::new(3);
        let target = parse_point("a1", 3).unwrap();
        let mut sim = Rigged {
            black_move: target,
            calls: 0,
        };
        // White wins everywhere except `target`; the first other candidate is chosen.
        let mv = select_move(&mut sim, &board, Color::White, MoveSelection::Simple, 2, 0.4);
        assert_eq!(mv, parse_point("b1", 3).unwrap());
    }

    #[test]
    fn test_ucb_mode_picks_rigged_candidate() {
        let board = GoBoard::new(3);
        let target = PASS;
        let mut sim = Rigged {
            black_move: target,
            calls: 0,
        };
        let mv = select_move(&mut sim, &board, Color::Black, MoveSelection::Ucb, 3, 0.4);
        assert_eq!(mv, target);
        assert_eq!(sim.calls, 30);
    }

    #[test]
    fn test_ties_go_to_first_candidate() {
        let board = GoBoard::new(3);
        let first = board.empty_points()[0];
        for selection in [MoveSelection::Simple, MoveSelection::Ucb] {
            let mv = select_move(&mut AlwaysDraw, &board, Color::Black, selection, 3, 0.4);
            assert_eq!(mv, first, "{selection}");
        }
    }

    #[test]
    fn test_select_best_move_first_max() {
        assert_eq!(select_best_move(&[5, 6, 7], &[1, 3, 3]), 6);
        assert_eq!(select_best_move(&[], &[]), PASS);
    }

    #[test]
    fn test_player_does_not_mutate_board() {
        let config = EngineConfig {
            sim: 2,
            seed: Some(1),
            ..Default::default()
        };
        let mut player = SimulationPlayer::new(config);
        let board = GoBoard::new(4);
        let before = board.clone();
        let mv = player.get_move(&board, Color::Black);
        assert_eq!(board, before);
        assert!(board.is_legal(mv, Color::Black));
    }
}
