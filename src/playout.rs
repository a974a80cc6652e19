//! Playout policies and the playout driver.
//!
//! A playout plays moves from a [`MoveGenerator`] until both sides pass in
//! succession or the ply limit is reached, then scores the board.
//!
//! Two generators are provided:
//! - uniform random over legal points, never filling one's own true eye;
//! - rule-based: 3x3 pattern moves around the last two moves, optionally
//!   rejecting self-atari, falling back to random.

use fastrand::Rng;
use tracing::debug;

use crate::board::{Color, GoBoard, Point};
use crate::constants::PASS;
use crate::patterns::pat3_match;
use crate::score::winner;

/// Source of playout moves for the side to move.
///
/// Implementations must return a legal point or `PASS`.
pub trait MoveGenerator {
    fn generate_move(&self, board: &GoBoard, rng: &mut Rng) -> Point;
}

/// Playout policy, chosen once when the engine is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayoutPolicy {
    Random,
    RuleBased { check_selfatari: bool },
}

impl MoveGenerator for PlayoutPolicy {
    fn generate_move(&self, board: &GoBoard, rng: &mut Rng) -> Point {
        match *self {
            PlayoutPolicy::Random => {
                generate_random_move(board, board.current_player(), true, rng)
            }
            PlayoutPolicy::RuleBased { check_selfatari } => {
                generate_move_with_filter(board, true, check_selfatari, rng)
            }
        }
    }
}

/// A uniformly random legal move for `color`, or `PASS` if none exists.
///
/// With `use_eye_filter`, points that are true eyes of `color` are skipped.
pub fn generate_random_move(
    board: &GoBoard,
    color: Color,
    use_eye_filter: bool,
    rng: &mut Rng,
) -> Point {
    let mut moves = board.empty_points();
    rng.shuffle(&mut moves);
    moves
        .into_iter()
        .find(|&pt| board.is_legal(pt, color) && !(use_eye_filter && board.is_eye(pt, color)))
        .unwrap_or(PASS)
}

/// Empty points around the last two moves that match a 3x3 pattern.
pub fn generate_pattern_moves(board: &GoBoard) -> Vec<Point> {
    let mut moves = Vec::new();
    for last in [board.last_move(), board.last2_move()] {
        if last == PASS {
            continue;
        }
        for pt in board
            .neighbors(last)
            .into_iter()
            .chain(board.diag_neighbors(last))
        {
            if board.get_color(pt) == Color::Empty && !moves.contains(&pt) && pat3_match(board, pt)
            {
                moves.push(pt);
            }
        }
    }
    moves
}

/// True if playing `pt` leaves the resulting block of `color` with a single liberty.
pub fn selfatari(board: &GoBoard, pt: Point, color: Color) -> bool {
    let mut copy = board.clone();
    copy.play_move(pt, color).is_ok() && copy.block_liberty_count(pt) == 1
}

/// Draw candidates at random until one is legal and not an own eye
/// (and, if requested, not self-atari).
pub fn filter_moves_and_generate(
    board: &GoBoard,
    mut moves: Vec<Point>,
    check_selfatari: bool,
    rng: &mut Rng,
) -> Option<Point> {
    let color = board.current_player();
    while !moves.is_empty() {
        let candidate = moves.swap_remove(rng.usize(..moves.len()));
        if !board.is_legal(candidate, color) || board.is_eye(candidate, color) {
            continue;
        }
        if check_selfatari && selfatari(board, candidate, color) {
            continue;
        }
        return Some(candidate);
    }
    None
}

/// Rule-based move: filtered pattern moves first, random with the eye filter otherwise.
pub fn generate_move_with_filter(
    board: &GoBoard,
    use_pattern: bool,
    check_selfatari: bool,
    rng: &mut Rng,
) -> Point {
    let color = board.current_player();
    let moves = if use_pattern {
        generate_pattern_moves(board)
    } else {
        Vec::new()
    };
    filter_moves_and_generate(board, moves, check_selfatari, rng)
        .unwrap_or_else(|| generate_random_move(board, color, true, rng))
}

/// Plays simulated games to the end and reports the winner.
pub struct PlayoutDriver<G = PlayoutPolicy> {
    generator: G,
    komi: f64,
    limit: usize,
    rng: Rng,
}

impl<G: MoveGenerator> PlayoutDriver<G> {
    pub fn new(generator: G, komi: f64, limit: usize, rng: Rng) -> Self {
        Self {
            generator,
            komi,
            limit,
            rng,
        }
    }

    pub fn rng_mut(&mut self) -> &mut Rng {
        &mut self.rng
    }

    /// Play `mv` for `to_play` on a private copy of `board`, then play the
    /// game out from the opponent's turn.
    pub fn simulate(&mut self, board: &GoBoard, mv: Point, to_play: Color) -> Color {
        let mut copy = board.clone();
        play_or_pass(&mut copy, mv, to_play);
        self.play_game(&mut copy, to_play.opponent())
    }

    /// Play the game on `board` starting with `color` to move.
    ///
    /// Stops after two consecutive passes or `limit` plies and returns the
    /// area-scoring winner.
    pub fn play_game(&mut self, board: &mut GoBoard, color: Color) -> Color {
        let mut to_play = color;
        let mut passes = 0;
        let mut plies = 0;

        while plies < self.limit {
            let mv = self.generator.generate_move(board, &mut self.rng);
            let mv = play_or_pass(board, mv, to_play);
            if mv == PASS {
                passes += 1;
            } else {
                passes = 0;
            }
            plies += 1;
            to_play = to_play.opponent();
            if passes >= 2 {
                break;
            }
        }

        winner(board, self.komi)
    }
}

/// Play `mv`, treating a rejected move as a pass. Returns the move actually played.
fn play_or_pass(board: &mut GoBoard, mv: Point, color: Color) -> Point {
    match board.play_move(mv, color) {
        Ok(()) => mv,
        Err(err) => {
            debug!(mv, %err, "generator produced an illegal move, passing instead");
            board.pass(color);
            PASS
        }
    }
}
