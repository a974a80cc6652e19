//! 3x3 pattern matching for the rule-based playout policy.
//!
//! Each pattern is a 9-character string for a 3x3 grid centred on the
//! candidate point. All rotations, reflections and color swaps of the
//! source patterns are expanded into a 8192-byte bitfield (`PAT3SET`)
//! indexed by a 16-bit encoding of the 8 neighbors (env8).

use std::sync::OnceLock;

use crate::board::{Color, GoBoard, Point};

/// The 3x3 pattern sources:
/// - X: player to move
/// - O: opponent
/// - .: empty
/// - x: not X (O, . or #)
/// - o: not O (X, . or #)
/// - ?: any
/// - #: off board
const PAT3_SRC: &[&str] = &[
    // hane: enclosing hane
    "XOX...???",
    // hane: non-cutting hane
    "XO....?.?",
    // hane: magari
    "XO?X..x.?",
    // katatsuke or diagonal attachment
    ".O.X.....",
    // cut1: unprotected cut
    "XO?O.o?o?",
    // cut1: peeped cut
    "XO?O.X???",
    // cut2
    "?X?O.Oooo",
    // cut keima
    "OX?o.O???",
    // side: chase
    "X.?O.?##?",
    // side: block side cut
    "OX?X.O###",
    // side: block side connection
    "?X?x.O###",
    // side: sagari
    "?XOx.x###",
    // side: cut
    "?OXX.O###",
];

static PAT3SET: OnceLock<[u8; 8192]> = OnceLock::new();

/// Check if the 3x3 neighborhood of `pt` matches any pattern, from the
/// point of view of the player to move.
pub fn pat3_match(board: &GoBoard, pt: Point) -> bool {
    let pat3set = PAT3SET.get_or_init(make_pat3set);
    let env8 = compute_code(&neighborhood(board, pt));
    let byte_idx = (env8 >> 3) as usize;
    let bit_idx = (env8 & 7) as u8;
    (pat3set[byte_idx] & (1 << bit_idx)) != 0
}

/// Read the 3x3 grid around `pt` in pattern-string layout, top row first.
fn neighborhood(board: &GoBoard, pt: Point) -> [u8; 9] {
    let me = board.current_player();
    let [south, west, east, north] = board.neighbors(pt);
    let [sw, se, nw, ne] = board.diag_neighbors(pt);
    [nw, north, ne, west, pt, east, sw, south, se].map(|p| match board.get_color(p) {
        Color::Border => b'#',
        Color::Empty => b'.',
        c if c == me => b'X',
        _ => b'O',
    })
}

fn make_pat3set() -> [u8; 8192] {
    let mut pat3set = [0u8; 8192];
    for pat_src in PAT3_SRC {
        let mut src = [0u8; 9];
        src.copy_from_slice(pat_src.as_bytes());
        pat_enumerate(src, &mut pat3set);
    }
    pat3set
}

/// Enumerate all rotations, reflections, and color swaps of a pattern.
fn pat_enumerate(mut src: [u8; 9], pat3set: &mut [u8; 8192]) {
    for _ in 0..2 {
        for _ in 0..2 {
            for _ in 0..2 {
                for _ in 0..2 {
                    pat_wildexp(&src, 0, pat3set);
                    swapcolor(&mut src);
                }
                horizflip(&mut src);
            }
            vertflip(&mut src);
        }
        rot90(&mut src);
    }
}

/// Expand wildcards and add all concrete patterns to the set.
fn pat_wildexp(src: &[u8; 9], i: usize, pat3set: &mut [u8; 8192]) {
    if i == 9 {
        let env8 = compute_code(src);
        pat3set[(env8 >> 3) as usize] |= 1 << (env8 & 7);
        return;
    }
    let choices: &[u8] = match src[i] {
        b'?' => b"XO.#",
        b'x' => b"O.#",
        b'o' => b"X.#",
        _ => return pat_wildexp(src, i + 1, pat3set),
    };
    for &c in choices {
        let mut new_src = *src;
        new_src[i] = c;
        pat_wildexp(&new_src, i + 1, pat3set);
    }
}

/// Compute the 16-bit env8 code of a concrete 3x3 grid.
///
/// ```text
/// 0 1 2     bits: 7 0 4
/// 3 4 5  ->       3 . 1
/// 6 7 8           6 2 5
/// ```
/// The low byte holds the orthogonal neighbors, the high byte the diagonals.
fn compute_code(src: &[u8; 9]) -> u16 {
    let mut env8: u16 = 0;
    env8 |= code(src[1], 0);
    env8 |= code(src[5], 1);
    env8 |= code(src[7], 2);
    env8 |= code(src[3], 3);
    env8 |= code(src[2], 0) << 8;
    env8 |= code(src[8], 1) << 8;
    env8 |= code(src[6], 2) << 8;
    env8 |= code(src[0], 3) << 8;
    env8
}

/// Two bits per neighbor, stored at positions `p` and `p + 4`.
fn code(color: u8, p: u8) -> u16 {
    let c: u16 = match color {
        b'O' => 0,
        b'X' => 1,
        b'.' => 2,
        _ => 3,
    };
    let hi = (c >> 1) & 1;
    let lo = c & 1;
    ((hi << 4) | lo) << p
}

fn swapcolor(src: &mut [u8; 9]) {
    for c in src.iter_mut() {
        *c = match *c {
            b'X' => b'O',
            b'O' => b'X',
            b'x' => b'o',
            b'o' => b'x',
            other => other,
        };
    }
}

fn horizflip(src: &mut [u8; 9]) {
    src.swap(0, 6);
    src.swap(1, 7);
    src.swap(2, 8);
}

fn vertflip(src: &mut [u8; 9]) {
    src.swap(0, 2);
    src.swap(3, 5);
    src.swap(6, 8);
}

fn rot90(src: &mut [u8; 9]) {
    let t = src[0];
    src[0] = src[2];
    src[2] = src[8];
    src[8] = src[6];
    src[6] = t;

    let t = src[1];
    src[1] = src[5];
    src[5] = src[7];
    src[7] = src[3];
    src[3] = t;
}
