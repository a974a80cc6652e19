//! Go board representation and move execution.
//!
//! The board is a flat array with a ring of border padding. With a row
//! stride of `size + 1`, the point at row `r`, column `c` (both 1-based)
//! lives at `r * (size + 1) + c`; column 0 of each row doubles as the right
//! border of the row below it. Index 0 is border, which is what lets
//! [`PASS`] share the `Point` type.
//!
//! `GoBoard` is a plain value: `clone()` copies one small vector, which is
//! what every playout does before mutating.

use std::fmt;

use thiserror::Error;

use crate::constants::{MAX_SIZE, MIN_SIZE, PASS};

/// A point on the board, represented as an index into the padded 1D array.
pub type Point = usize;

/// Contents of a board point, and also the side to move or the winner.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Empty,
    Black,
    White,
    /// Off-board padding. Never a playable point.
    Border,
}

impl Color {
    /// The other player. `Empty` and `Border` map to themselves.
    #[inline]
    pub fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
            other => other,
        }
    }

    #[inline]
    pub fn is_stone(self) -> bool {
        matches!(self, Color::Black | Color::White)
    }

    /// Parse a GTP color argument (`b`, `black`, `w`, `white`).
    pub fn parse(s: &str) -> Option<Color> {
        match s.to_ascii_lowercase().as_str() {
            "b" | "black" => Some(Color::Black),
            "w" | "white" => Some(Color::White),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Color::Empty => "empty",
            Color::Black => "black",
            Color::White => "white",
            Color::Border => "border",
        };
        f.write_str(name)
    }
}

/// Reasons a move can be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("point is off the board")]
    OffBoard,
    #[error("point is not empty")]
    Occupied,
    #[error("retakes ko")]
    Ko,
    #[error("suicide")]
    Suicide,
    #[error("{0} is not a player")]
    WrongColor(Color),
}

/// A Go position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GoBoard {
    size: usize,
    /// Row stride (`size + 1`).
    ns: usize,
    board: Vec<Color>,
    current_player: Color,
    ko_recapture: Option<Point>,
    /// Last move played, `PASS` if it was a pass or no move was played yet.
    last_move: Point,
    last2_move: Point,
}

impl Default for GoBoard {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_SIZE)
    }
}

impl GoBoard {
    /// Create an empty board of the given size with Black to move.
    ///
    /// # Panics
    /// Panics if `size` is outside `MIN_SIZE..=MAX_SIZE`.
    pub fn new(size: usize) -> Self {
        let mut board = GoBoard {
            size: 0,
            ns: 1,
            board: Vec::new(),
            current_player: Color::Black,
            ko_recapture: None,
            last_move: PASS,
            last2_move: PASS,
        };
        board.reset(size);
        board
    }

    /// Clear the board and resize it.
    ///
    /// # Panics
    /// Panics if `size` is outside `MIN_SIZE..=MAX_SIZE`.
    pub fn reset(&mut self, size: usize) {
        assert!(
            (MIN_SIZE..=MAX_SIZE).contains(&size),
            "board size {size} out of range"
        );
        self.size = size;
        self.ns = size + 1;
        self.board = vec![Color::Border; size * size + 3 * (size + 1)];
        for row in 1..=size {
            let start = row * self.ns + 1;
            self.board[start..start + size].fill(Color::Empty);
        }
        self.current_player = Color::Black;
        self.ko_recapture = None;
        self.last_move = PASS;
        self.last2_move = PASS;
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Length of the padded array; every `Point` is below this.
    #[inline]
    pub fn maxpoint(&self) -> usize {
        self.board.len()
    }

    #[inline]
    pub fn current_player(&self) -> Color {
        self.current_player
    }

    #[inline]
    pub fn last_move(&self) -> Point {
        self.last_move
    }

    #[inline]
    pub fn last2_move(&self) -> Point {
        self.last2_move
    }

    #[inline]
    pub fn ko_recapture(&self) -> Option<Point> {
        self.ko_recapture
    }

    /// Point at 1-based `row` and `col`. Row 1 is the bottom row in GTP terms.
    #[inline]
    pub fn pt(&self, row: usize, col: usize) -> Point {
        debug_assert!((1..=self.size).contains(&row) && (1..=self.size).contains(&col));
        row * self.ns + col
    }

    /// Inverse of [`GoBoard::pt`].
    #[inline]
    pub fn row_col(&self, pt: Point) -> (usize, usize) {
        (pt / self.ns, pt % self.ns)
    }

    #[inline]
    pub fn get_color(&self, pt: Point) -> Color {
        self.board[pt]
    }

    #[inline]
    pub fn is_on_board(&self, pt: Point) -> bool {
        pt < self.board.len() && self.board[pt] != Color::Border
    }

    /// All playable points in ascending index order (row 1 first, then by column).
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.board.len()).filter(|&pt| self.board[pt] != Color::Border)
    }

    /// Empty points in ascending index order.
    ///
    /// This order is the canonical candidate order used by move selection.
    pub fn empty_points(&self) -> Vec<Point> {
        (0..self.board.len())
            .filter(|&pt| self.board[pt] == Color::Empty)
            .collect()
    }

    /// The 4 orthogonal neighbors (S, W, E, N) of an on-board point.
    #[inline]
    pub fn neighbors(&self, pt: Point) -> [Point; 4] {
        [pt - self.ns, pt - 1, pt + 1, pt + self.ns]
    }

    /// The 4 diagonal neighbors of an on-board point.
    #[inline]
    pub fn diag_neighbors(&self, pt: Point) -> [Point; 4] {
        [
            pt - self.ns - 1,
            pt - self.ns + 1,
            pt + self.ns - 1,
            pt + self.ns + 1,
        ]
    }

    /// First orthogonal neighbor of `pt` holding `color`, if any.
    pub fn find_neighbor_of_color(&self, pt: Point, color: Color) -> Option<Point> {
        self.neighbors(pt)
            .into_iter()
            .find(|&nb| self.board[nb] == color)
    }

    /// True if every orthogonal neighbor is `color` or border.
    pub fn is_surrounded(&self, pt: Point, color: Color) -> bool {
        self.neighbors(pt)
            .into_iter()
            .all(|nb| matches!(self.board[nb], c if c == color || c == Color::Border))
    }

    /// Check if an empty point is a true eye for `color`.
    ///
    /// The point must be surrounded by `color`. Opponent stones on the
    /// diagonals make it false: one is tolerated in the center, none at
    /// the edge.
    pub fn is_eye(&self, pt: Point, color: Color) -> bool {
        if !self.is_surrounded(pt, color) {
            return false;
        }
        let opp = color.opponent();
        let mut false_count = 0;
        let mut at_edge = false;
        for d in self.diag_neighbors(pt) {
            match self.board[d] {
                Color::Border => at_edge = true,
                c if c == opp => false_count += 1,
                _ => {}
            }
        }
        let tolerance = if at_edge { 0 } else { 1 };
        false_count <= tolerance
    }

    /// All points 4-connected to `pt` that share its color.
    ///
    /// For an empty point this is its connected empty region; for a stone
    /// it is the block.
    pub fn connected_component(&self, pt: Point) -> Vec<Point> {
        let color = self.board[pt];
        let mut marked = vec![false; self.board.len()];
        let mut stack = vec![pt];
        let mut component = Vec::new();
        marked[pt] = true;

        while let Some(p) = stack.pop() {
            component.push(p);
            for nb in self.neighbors(p) {
                if !marked[nb] && self.board[nb] == color {
                    marked[nb] = true;
                    stack.push(nb);
                }
            }
        }
        component
    }

    fn has_liberty(&self, block: &[Point]) -> bool {
        block
            .iter()
            .any(|&p| self.find_neighbor_of_color(p, Color::Empty).is_some())
    }

    /// Number of distinct liberties of the block containing `pt`.
    pub fn block_liberty_count(&self, pt: Point) -> usize {
        let mut seen = vec![false; self.board.len()];
        let mut libs = 0;
        for p in self.connected_component(pt) {
            for nb in self.neighbors(p) {
                if self.board[nb] == Color::Empty && !seen[nb] {
                    seen[nb] = true;
                    libs += 1;
                }
            }
        }
        libs
    }

    /// Remove the block at `pt` if it has no liberties.
    ///
    /// Returns the point if exactly one stone was captured (a ko candidate).
    fn capture_if_dead(&mut self, pt: Point) -> Option<Point> {
        let block = self.connected_component(pt);
        if self.has_liberty(&block) {
            return None;
        }
        for &p in &block {
            self.board[p] = Color::Empty;
        }
        (block.len() == 1).then_some(pt)
    }

    /// Check legality without modifying the board. `PASS` is always legal.
    pub fn is_legal(&self, pt: Point, color: Color) -> bool {
        if !color.is_stone() {
            return false;
        }
        if pt == PASS {
            return true;
        }
        if !self.is_on_board(pt) || self.board[pt] != Color::Empty {
            return false;
        }
        if self.ko_recapture == Some(pt) {
            return false;
        }
        // A stone with an empty neighbor always has a liberty.
        if self.find_neighbor_of_color(pt, Color::Empty).is_some() {
            return true;
        }
        self.clone().play_move(pt, color).is_ok()
    }

    /// Pass for `color`. Clears the ko and hands the move to the opponent.
    pub fn pass(&mut self, color: Color) {
        self.ko_recapture = None;
        self.current_player = color.opponent();
        self.last2_move = self.last_move;
        self.last_move = PASS;
    }

    /// Play `color` at `pt`, resolving captures.
    ///
    /// On error the board is left unchanged.
    pub fn play_move(&mut self, pt: Point, color: Color) -> Result<(), MoveError> {
        if !color.is_stone() {
            return Err(MoveError::WrongColor(color));
        }
        if pt == PASS {
            self.pass(color);
            return Ok(());
        }
        if !self.is_on_board(pt) {
            return Err(MoveError::OffBoard);
        }
        if self.board[pt] != Color::Empty {
            return Err(MoveError::Occupied);
        }
        if self.ko_recapture == Some(pt) {
            return Err(MoveError::Ko);
        }

        let opp = color.opponent();
        let in_enemy_eye = self.is_surrounded(pt, opp);
        self.board[pt] = color;

        let mut single_captures = Vec::new();
        for nb in self.neighbors(pt) {
            if self.board[nb] == opp {
                if let Some(captured) = self.capture_if_dead(nb) {
                    single_captures.push(captured);
                }
            }
        }

        // No capture can leave the new block without liberties, so the
        // rollback below never has stones to restore.
        let block = self.connected_component(pt);
        if !self.has_liberty(&block) {
            self.board[pt] = Color::Empty;
            return Err(MoveError::Suicide);
        }

        self.ko_recapture = if in_enemy_eye && single_captures.len() == 1 {
            Some(single_captures[0])
        } else {
            None
        };
        self.current_player = opp;
        self.last2_move = self.last_move;
        self.last_move = pt;
        Ok(())
    }
}

/// Column letters for GTP vertices; `I` is skipped.
const COLUMN_LETTERS: &[u8] = b"ABCDEFGHJKLMNOPQRSTUVWXYZ";

/// Convert a point to a GTP vertex (e.g. `C4`), or `pass`.
pub fn format_point(pt: Point, size: usize) -> String {
    if pt == PASS {
        return "pass".into();
    }
    let ns = size + 1;
    let (row, col) = (pt / ns, pt % ns);
    format!("{}{row}", COLUMN_LETTERS[col - 1] as char)
}

/// Parse a GTP vertex for a board of the given size.
///
/// Returns `None` for malformed or off-board vertices.
pub fn parse_point(s: &str, size: usize) -> Option<Point> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("pass") {
        return Some(PASS);
    }
    let mut chars = s.chars();
    let letter = chars.next()?.to_ascii_uppercase();
    let col = COLUMN_LETTERS.iter().position(|&c| c as char == letter)? + 1;
    let row: usize = chars.as_str().parse().ok()?;
    if !(1..=size).contains(&row) || col > size {
        return None;
    }
    Some(row * (size + 1) + col)
}

impl fmt::Display for GoBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (1..=self.size).rev() {
            write!(f, "{row:>2} ")?;
            for col in 1..=self.size {
                let ch = match self.board[self.pt(row, col)] {
                    Color::Black => 'X',
                    Color::White => 'O',
                    _ => '.',
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        write!(f, "   ")?;
        for &letter in &COLUMN_LETTERS[..self.size] {
            write!(f, "{} ", letter as char)?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(board: &mut GoBoard, vertex: &str, color: Color) {
        let pt = parse_point(vertex, board.size()).expect("valid vertex");
        board
            .play_move(pt, color)
            .unwrap_or_else(|e| panic!("{vertex} should be legal: {e}"));
    }

    #[test]
    fn test_empty_board_layout() {
        let board = GoBoard::new(5);
        assert_eq!(board.maxpoint(), 25 + 18);
        assert_eq!(board.empty_points().len(), 25);
        assert_eq!(board.get_color(PASS), Color::Border);
        assert_eq!(board.current_player(), Color::Black);
        for pt in board.points() {
            for nb in board.neighbors(pt) {
                assert!(nb < board.maxpoint());
            }
        }
    }

    #[test]
    fn test_empty_points_row_major() {
        let board = GoBoard::new(3);
        let pts = board.empty_points();
        assert_eq!(pts[0], board.pt(1, 1));
        assert_eq!(pts[1], board.pt(1, 2));
        assert_eq!(pts[3], board.pt(2, 1));
        assert!(pts.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_parse_format_roundtrip() {
        let board = GoBoard::new(9);
        for pt in board.points() {
            let s = format_point(pt, 9);
            assert_eq!(parse_point(&s, 9), Some(pt), "roundtrip failed for {s}");
        }
        assert_eq!(parse_point("pass", 9), Some(PASS));
        assert_eq!(parse_point("PASS", 9), Some(PASS));
        assert_eq!(parse_point("j9", 9), Some(board.pt(9, 9)));
        assert_eq!(parse_point("i5", 9), None);
        assert_eq!(parse_point("k1", 9), None);
        assert_eq!(parse_point("a10", 9), None);
        assert_eq!(parse_point("a0", 9), None);
    }

    #[test]
    fn test_play_and_occupied() {
        let mut board = GoBoard::new(5);
        play(&mut board, "c3", Color::Black);
        assert_eq!(board.current_player(), Color::White);
        let c3 = parse_point("c3", 5).unwrap();
        assert_eq!(board.get_color(c3), Color::Black);
        assert_eq!(board.last_move(), c3);
        assert_eq!(board.play_move(c3, Color::White), Err(MoveError::Occupied));
        assert!(!board.is_legal(c3, Color::White));
    }

    #[test]
    fn test_wrong_color_and_off_board() {
        let mut board = GoBoard::new(5);
        assert_eq!(
            board.play_move(board.pt(1, 1), Color::Empty),
            Err(MoveError::WrongColor(Color::Empty))
        );
        assert_eq!(board.play_move(6, Color::Black), Err(MoveError::OffBoard));
    }

    #[test]
    fn test_capture_single_stone() {
        let mut board = GoBoard::new(5);
        play(&mut board, "c3", Color::White);
        play(&mut board, "b3", Color::Black);
        play(&mut board, "d3", Color::Black);
        play(&mut board, "c2", Color::Black);
        play(&mut board, "c4", Color::Black);
        let c3 = parse_point("c3", 5).unwrap();
        assert_eq!(board.get_color(c3), Color::Empty);
    }

    #[test]
    fn test_suicide_rejected() {
        let mut board = GoBoard::new(5);
        play(&mut board, "a2", Color::Black);
        play(&mut board, "b1", Color::Black);
        let a1 = parse_point("a1", 5).unwrap();
        assert!(!board.is_legal(a1, Color::White));
        let before = board.clone();
        assert_eq!(board.play_move(a1, Color::White), Err(MoveError::Suicide));
        assert_eq!(board, before, "failed move must not change the board");
        assert!(board.is_legal(a1, Color::Black));
    }

    #[test]
    fn test_ko_recapture_forbidden() {
        // . X O .
        // X O . O
        // . X O .
        let mut board = GoBoard::new(5);
        for v in ["b4", "a3", "b2"] {
            play(&mut board, v, Color::Black);
        }
        for v in ["c4", "d3", "c2", "b3"] {
            play(&mut board, v, Color::White);
        }
        // Black captures at c3, White may not retake at b3 immediately.
        play(&mut board, "c3", Color::Black);
        let b3 = parse_point("b3", 5).unwrap();
        assert_eq!(board.get_color(b3), Color::Empty);
        assert_eq!(board.ko_recapture(), Some(b3));
        assert_eq!(board.play_move(b3, Color::White), Err(MoveError::Ko));

        // A pass clears the ko.
        board.pass(Color::White);
        board.pass(Color::Black);
        assert!(board.is_legal(b3, Color::White));
    }

    #[test]
    fn test_is_eye() {
        let mut board = GoBoard::new(5);
        play(&mut board, "a2", Color::Black);
        play(&mut board, "b1", Color::Black);
        let a1 = parse_point("a1", 5).unwrap();
        assert!(board.is_eye(a1, Color::Black));
        assert!(!board.is_eye(a1, Color::White));

        // An opponent diagonal at the edge makes it false.
        play(&mut board, "b2", Color::White);
        assert!(!board.is_eye(a1, Color::Black));
    }

    #[test]
    fn test_connected_component_and_liberties() {
        let mut board = GoBoard::new(5);
        play(&mut board, "c3", Color::Black);
        play(&mut board, "c4", Color::Black);
        let c3 = parse_point("c3", 5).unwrap();
        assert_eq!(board.connected_component(c3).len(), 2);
        assert_eq!(board.block_liberty_count(c3), 6);
        let a1 = parse_point("a1", 5).unwrap();
        assert_eq!(board.connected_component(a1).len(), 23);
    }

    #[test]
    fn test_display() {
        let mut board = GoBoard::new(3);
        play(&mut board, "a1", Color::Black);
        play(&mut board, "c3", Color::White);
        let text = board.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0].trim_end(), " 3 . . O");
        assert_eq!(lines[2].trim_end(), " 1 X . .");
        assert_eq!(lines[3].trim_end(), "   A B C");
    }
}
