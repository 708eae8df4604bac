//! Ray geometry: the eight compass directions and per-square lookup tables.
//!
//! All tables are generated by `const fn` at compile time and are read-only,
//! so they can be shared freely between threads.

use crate::game_state::chess_types::{square_bit, Square};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    pub const ORTHOGONAL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub const DIAGONAL: [Direction; 4] = [
        Direction::NorthEast,
        Direction::SouthEast,
        Direction::SouthWest,
        Direction::NorthWest,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::NorthEast => 1,
            Direction::East => 2,
            Direction::SouthEast => 3,
            Direction::South => 4,
            Direction::SouthWest => 5,
            Direction::West => 6,
            Direction::NorthWest => 7,
        }
    }

    #[inline]
    pub const fn from_index(index: usize) -> Direction {
        Self::ALL[index % 8]
    }

    #[inline]
    pub const fn opposite(self) -> Direction {
        Self::from_index(self.index() + 4)
    }

    #[inline]
    pub const fn is_diagonal(self) -> bool {
        self.index() % 2 == 1
    }

    /// `true` if `other` is this direction or its opposite.
    #[inline]
    pub fn same_line(self, other: Direction) -> bool {
        self == other || self == other.opposite()
    }
}

const NO_DIRECTION: u8 = 8;

const fn step_of(direction: usize) -> (i32, i32) {
    match direction {
        0 => (0, 1),
        1 => (1, 1),
        2 => (1, 0),
        3 => (1, -1),
        4 => (0, -1),
        5 => (-1, -1),
        6 => (-1, 0),
        _ => (-1, 1),
    }
}

/// Squares along each ray, nearest first. Only the first `RAY_LEN` are valid.
pub static RAY_SQUARES: [[[Square; 7]; 8]; 64] = generate_ray_squares();
pub static RAY_LEN: [[u8; 8]; 64] = generate_ray_lengths();
pub static RAY_MASKS: [[u64; 8]; 64] = generate_ray_masks();
static DIRECTION_BETWEEN: [[u8; 64]; 64] = generate_direction_between();
static BETWEEN_MASKS: [[u64; 64]; 64] = generate_between_masks();

/// Ordered squares outward from `square` in `direction`.
#[inline]
pub fn ray(square: Square, direction: Direction) -> &'static [Square] {
    let sq = square as usize;
    let d = direction.index();
    &RAY_SQUARES[sq][d][..RAY_LEN[sq][d] as usize]
}

#[inline]
pub fn ray_mask(square: Square, direction: Direction) -> u64 {
    RAY_MASKS[square as usize][direction.index()]
}

/// Direction leading from `from` to `to`, if both share a rank, file or diagonal.
#[inline]
pub fn direction_between(from: Square, to: Square) -> Option<Direction> {
    let code = DIRECTION_BETWEEN[from as usize][to as usize];
    if code == NO_DIRECTION {
        None
    } else {
        Some(Direction::from_index(code as usize))
    }
}

/// Squares strictly between `a` and `b`; zero when they do not share a line.
#[inline]
pub fn between_mask(a: Square, b: Square) -> u64 {
    BETWEEN_MASKS[a as usize][b as usize]
}

/// Squares beyond `through` when walking from `from` past it.
#[inline]
pub fn squares_beyond(from: Square, through: Square) -> u64 {
    match direction_between(from, through) {
        Some(direction) => ray_mask(through, direction),
        None => 0,
    }
}

#[inline]
pub fn on_mask(mask: u64, square: Square) -> bool {
    mask & square_bit(square) != 0
}

/// Squares set in `mask`, lowest first.
pub fn squares_in(mut mask: u64) -> impl Iterator<Item = Square> {
    std::iter::from_fn(move || {
        if mask == 0 {
            return None;
        }
        let square = mask.trailing_zeros() as Square;
        mask &= mask - 1;
        Some(square)
    })
}

const fn generate_ray_squares() -> [[[Square; 7]; 8]; 64] {
    let mut table = [[[0u8; 7]; 8]; 64];
    let mut sq = 0usize;
    while sq < 64 {
        let mut d = 0usize;
        while d < 8 {
            let (df, dr) = step_of(d);
            let mut file = (sq % 8) as i32 + df;
            let mut rank = (sq / 8) as i32 + dr;
            let mut n = 0usize;
            while file >= 0 && file < 8 && rank >= 0 && rank < 8 {
                table[sq][d][n] = (rank * 8 + file) as u8;
                n += 1;
                file += df;
                rank += dr;
            }
            d += 1;
        }
        sq += 1;
    }
    table
}

const fn generate_ray_lengths() -> [[u8; 8]; 64] {
    let mut table = [[0u8; 8]; 64];
    let mut sq = 0usize;
    while sq < 64 {
        let mut d = 0usize;
        while d < 8 {
            let (df, dr) = step_of(d);
            let mut file = (sq % 8) as i32 + df;
            let mut rank = (sq / 8) as i32 + dr;
            let mut n = 0u8;
            while file >= 0 && file < 8 && rank >= 0 && rank < 8 {
                n += 1;
                file += df;
                rank += dr;
            }
            table[sq][d] = n;
            d += 1;
        }
        sq += 1;
    }
    table
}

const fn generate_ray_masks() -> [[u64; 8]; 64] {
    let squares = generate_ray_squares();
    let lengths = generate_ray_lengths();
    let mut table = [[0u64; 8]; 64];
    let mut sq = 0usize;
    while sq < 64 {
        let mut d = 0usize;
        while d < 8 {
            let mut mask = 0u64;
            let mut n = 0usize;
            while n < lengths[sq][d] as usize {
                mask |= 1u64 << squares[sq][d][n];
                n += 1;
            }
            table[sq][d] = mask;
            d += 1;
        }
        sq += 1;
    }
    table
}

const fn generate_direction_between() -> [[u8; 64]; 64] {
    let squares = generate_ray_squares();
    let lengths = generate_ray_lengths();
    let mut table = [[NO_DIRECTION; 64]; 64];
    let mut sq = 0usize;
    while sq < 64 {
        let mut d = 0usize;
        while d < 8 {
            let mut n = 0usize;
            while n < lengths[sq][d] as usize {
                table[sq][squares[sq][d][n] as usize] = d as u8;
                n += 1;
            }
            d += 1;
        }
        sq += 1;
    }
    table
}

const fn generate_between_masks() -> [[u64; 64]; 64] {
    let squares = generate_ray_squares();
    let lengths = generate_ray_lengths();
    let mut table = [[0u64; 64]; 64];
    let mut sq = 0usize;
    while sq < 64 {
        let mut d = 0usize;
        while d < 8 {
            let mut passed = 0u64;
            let mut n = 0usize;
            while n < lengths[sq][d] as usize {
                let target = squares[sq][d][n] as usize;
                table[sq][target] = passed;
                passed |= 1u64 << target;
                n += 1;
            }
            d += 1;
        }
        sq += 1;
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    // a1=0 .. h8=63
    const A1: Square = 0;
    const B2: Square = 9;
    const C4: Square = 26;
    const C5: Square = 34;
    const A5: Square = 32;
    const B5: Square = 33;
    const D5: Square = 35;
    const H8: Square = 63;

    #[test]
    fn opposite_pairs_are_symmetric() {
        for direction in Direction::ALL {
            assert_eq!(direction.opposite().opposite(), direction);
            assert_ne!(direction.opposite(), direction);
            assert_eq!(direction.is_diagonal(), direction.opposite().is_diagonal());
            assert!(direction.same_line(direction.opposite()));
        }
        assert!(!Direction::North.same_line(Direction::East));
    }

    #[test]
    fn rays_are_ordered_outward() {
        assert_eq!(ray(A1, Direction::NorthEast), &[9, 18, 27, 36, 45, 54, 63]);
        assert_eq!(ray(D5, Direction::West), &[34, 33, 32]);
        assert!(ray(H8, Direction::North).is_empty());
        assert_eq!(ray(A1, Direction::South).len(), 0);
    }

    #[test]
    fn between_mask_covers_only_interior_squares() {
        // rook on a5 checking a king on d5
        let mask = between_mask(D5, A5);
        assert_eq!(mask, square_bit(B5) | square_bit(C5));
        assert_eq!(between_mask(A5, D5), mask);
        assert_eq!(between_mask(B2, C4), 0);
        assert_eq!(between_mask(A1, B2), 0);
    }

    #[test]
    fn direction_between_reports_shared_lines() {
        assert_eq!(direction_between(A1, H8), Some(Direction::NorthEast));
        assert_eq!(direction_between(H8, A1), Some(Direction::SouthWest));
        assert_eq!(direction_between(D5, A5), Some(Direction::West));
        assert_eq!(direction_between(B2, C4), None);
        assert_eq!(direction_between(A1, A1), None);
    }

    #[test]
    fn squares_beyond_extends_past_the_blocker() {
        // walking from a5 through d5 continues e5..h5
        let beyond = squares_beyond(A5, D5);
        assert_eq!(beyond.count_ones(), 4);
        assert!(on_mask(beyond, 39));
        assert!(!on_mask(beyond, D5));
    }
}
