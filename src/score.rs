//! Area scoring (Chinese rules).
//!
//! A player's score is their stones plus the empty regions that touch only
//! their stones. Regions touching both colors (dame) or neither count for
//! nobody. Komi is subtracted from Black's side, so the result is read from
//! Black's point of view.

use crate::board::{Color, GoBoard};

/// Score the board from Black's point of view.
///
/// Each point is visited once by the outer scan and at most once by a
/// region fill. The board is not modified.
pub fn score_board(board: &GoBoard, komi: f64) -> f64 {
    let mut score = -komi;
    let mut counted = vec![false; board.maxpoint()];
    let mut stack = Vec::new();

    for pt in 0..board.maxpoint() {
        if counted[pt] {
            continue;
        }
        match board.get_color(pt) {
            Color::Border => {}
            Color::Black => score += 1.0,
            Color::White => score -= 1.0,
            Color::Empty => {
                let mut black_flag = false;
                let mut white_flag = false;
                let mut region_size = 0usize;

                counted[pt] = true;
                stack.push(pt);
                while let Some(p) = stack.pop() {
                    region_size += 1;
                    for nb in board.neighbors(p) {
                        match board.get_color(nb) {
                            Color::Empty if !counted[nb] => {
                                counted[nb] = true;
                                stack.push(nb);
                            }
                            // Once both colors are seen the region is dame;
                            // keep filling only to mark it.
                            Color::Black if !(black_flag && white_flag) => black_flag = true,
                            Color::White if !(black_flag && white_flag) => white_flag = true,
                            _ => {}
                        }
                    }
                }

                match (black_flag, white_flag) {
                    (true, false) => score += region_size as f64,
                    (false, true) => score -= region_size as f64,
                    _ => {}
                }
            }
        }
    }
    score
}

/// Winner under area scoring: `Black`, `White`, or `Empty` on an exact tie.
pub fn winner(board: &GoBoard, komi: f64) -> Color {
    let score = score_board(board, komi);
    if score > 0.0 {
        Color::Black
    } else if score < 0.0 {
        Color::White
    } else {
        Color::Empty
    }
}
