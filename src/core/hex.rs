//! Hex Geometry
//!
//! Cube coordinates, the hex distance metric, line drawing, and the
//! "odd-q" offset conversion used for rectangular terrain storage.
//!
//! All arithmetic is integer-only. Line interpolation is carried out on
//! coordinates scaled by the line length, so rounding is exact and the
//! same on every platform.

use std::fmt;
use serde::{Serialize, Deserialize};

// =============================================================================
// CUBE COORDINATE
// =============================================================================

/// A hex cell in cube coordinates.
///
/// Invariant: `q + r + s == 0`. The only constructors are [`Hex::new`]
/// (which derives `s`) and [`Hex::try_from_cube`] (which checks it).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Hex {
    q: i32,
    r: i32,
    s: i32,
}

impl Hex {
    /// The origin hex.
    pub const ORIGIN: Self = Self { q: 0, r: 0, s: 0 };

    /// Create a hex from axial coordinates. `s` is derived.
    #[inline]
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r, s: -q - r }
    }

    /// Create a hex from all three cube coordinates.
    ///
    /// Returns `None` if `q + r + s != 0`.
    pub fn try_from_cube(q: i32, r: i32, s: i32) -> Option<Self> {
        if q + r + s == 0 {
            Some(Self { q, r, s })
        } else {
            None
        }
    }

    /// Cube q coordinate (equal to the offset column).
    #[inline]
    pub const fn q(self) -> i32 {
        self.q
    }

    /// Cube r coordinate.
    #[inline]
    pub const fn r(self) -> i32 {
        self.r
    }

    /// Cube s coordinate.
    #[inline]
    pub const fn s(self) -> i32 {
        self.s
    }

    /// Hex distance: `(|dq| + |dr| + |ds|) / 2`.
    #[inline]
    pub fn distance(self, other: Hex) -> u32 {
        let dq = (self.q - other.q).unsigned_abs();
        let dr = (self.r - other.r).unsigned_abs();
        let ds = (self.s - other.s).unsigned_abs();
        (dq + dr + ds) / 2
    }

    /// The neighbouring hex in `direction` (`Direction::None` is the hex itself).
    #[inline]
    pub fn neighbor(self, direction: Direction) -> Hex {
        let (dq, dr) = direction.offset();
        Hex::new(self.q + dq, self.r + dr)
    }

    /// Convert to an odd-q offset grid position.
    #[inline]
    pub fn to_grid(self) -> GridPos {
        let col = self.q;
        let row = self.r + (self.q - (self.q & 1)) / 2;
        GridPos { row, col }
    }
}

impl fmt::Debug for Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hex({}, {}, {})", self.q, self.r, self.s)
    }
}

// =============================================================================
// LINE DRAWING
// =============================================================================

/// Divide and round half away from zero. `n` must be positive.
#[inline]
fn div_round(x: i64, n: i64) -> i64 {
    if x >= 0 {
        (2 * x + n) / (2 * n)
    } else {
        -((-2 * x + n) / (2 * n))
    }
}

/// Round a scaled fractional cube point to the nearest valid hex.
///
/// The point is `(q / n, r / n, s / n)` with `q + r + s == 0` and `n > 0`.
/// The coordinate with the largest rounding error is recomputed from the
/// other two, which keeps the result on the `q + r + s == 0` plane.
pub fn cube_round_scaled(q: i64, r: i64, s: i64, n: i64) -> Hex {
    debug_assert!(n > 0, "scale must be positive");
    debug_assert_eq!(q + r + s, 0, "scaled point must lie on the cube plane");

    let mut rq = div_round(q, n);
    let mut rr = div_round(r, n);
    let mut rs = div_round(s, n);

    let dq = (q - rq * n).abs();
    let dr = (r - rr * n).abs();
    let ds = (s - rs * n).abs();

    if dq > dr && dq > ds {
        rq = -rr - rs;
    } else if dr > ds {
        rr = -rq - rs;
    } else {
        rs = -rq - rr;
    }

    debug_assert_eq!(rq + rr + rs, 0);
    Hex {
        q: rq as i32,
        r: rr as i32,
        s: rs as i32,
    }
}

/// Hexes on the straight line from `a` to `b`, both inclusive.
///
/// The line is sampled at `distance(a, b)` equal steps; each sample is
/// rounded to the nearest hex. The result has `distance + 1` entries,
/// starts with `a` and ends with `b`.
pub fn linedraw(a: Hex, b: Hex) -> Vec<Hex> {
    let n = a.distance(b) as i64;
    if n == 0 {
        return vec![a];
    }

    let (aq, ar, as_) = (a.q as i64, a.r as i64, a.s as i64);
    let (dq, dr, ds) = (
        b.q as i64 - aq,
        b.r as i64 - ar,
        b.s as i64 - as_,
    );

    (0..=n)
        .map(|i| cube_round_scaled(aq * n + dq * i, ar * n + dr * i, as_ * n + ds * i, n))
        .collect()
}

// =============================================================================
// OFFSET GRID POSITION
// =============================================================================

/// Row/column position in the rectangular terrain grid ("odd-q" layout).
///
/// On the wire the row is `x` and the column is `y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridPos {
    /// Row index.
    #[serde(rename = "x")]
    pub row: i32,
    /// Column index.
    #[serde(rename = "y")]
    pub col: i32,
}

impl GridPos {
    /// Create a grid position.
    #[inline]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Convert to cube coordinates: `q = col`, `r = row - (col - (col & 1)) / 2`.
    #[inline]
    pub fn to_hex(self) -> Hex {
        let q = self.col;
        let r = self.row - (self.col - (self.col & 1)) / 2;
        Hex::new(q, r)
    }

    /// Position one step away in `direction`.
    ///
    /// The step is taken in hex space, so the result honours the column
    /// parity of the odd-q layout. No bounds checking.
    #[inline]
    pub fn step(self, direction: Direction) -> GridPos {
        self.to_hex().neighbor(direction).to_grid()
    }

    /// Check `0 <= row < rows && 0 <= col < cols`.
    #[inline]
    pub fn in_bounds(self, rows: usize, cols: usize) -> bool {
        self.row >= 0
            && self.col >= 0
            && (self.row as usize) < rows
            && (self.col as usize) < cols
    }

    /// Hex distance between two grid positions.
    #[inline]
    pub fn distance(self, other: GridPos) -> u32 {
        self.to_hex().distance(other.to_hex())
    }
}

// =============================================================================
// DIRECTION
// =============================================================================

/// A movement direction on the flat-topped hex grid.
///
/// Raw wire values: 0 = None, 1 = N, 2 = NE, 3 = SE, 4 = S, 5 = SW, 6 = NW.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    /// Stay in place.
    #[default]
    None = 0,
    /// Up one row.
    North = 1,
    /// Up and to the right.
    NorthEast = 2,
    /// Down and to the right.
    SouthEast = 3,
    /// Down one row.
    South = 4,
    /// Down and to the left.
    SouthWest = 5,
    /// Up and to the left.
    NorthWest = 6,
}

/// Axial (dq, dr) offsets indexed by `Direction as usize`.
pub const DIRECTION_OFFSETS: [(i32, i32); 7] = [
    (0, 0),   // None
    (0, -1),  // N
    (1, -1),  // NE
    (1, 0),   // SE
    (0, 1),   // S
    (-1, 1),  // SW
    (-1, 0),  // NW
];

impl Direction {
    /// Every direction, `None` first.
    pub const ALL: [Direction; 7] = [
        Direction::None,
        Direction::North,
        Direction::NorthEast,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::NorthWest,
    ];

    /// Parse a raw wire value. Returns `None` when out of range.
    pub fn from_raw(value: i64) -> Option<Direction> {
        match value {
            0 => Some(Direction::None),
            1 => Some(Direction::North),
            2 => Some(Direction::NorthEast),
            3 => Some(Direction::SouthEast),
            4 => Some(Direction::South),
            5 => Some(Direction::SouthWest),
            6 => Some(Direction::NorthWest),
            _ => None,
        }
    }

    /// Axial offset for one step.
    #[inline]
    pub fn offset(self) -> (i32, i32) {
        DIRECTION_OFFSETS[self as usize]
    }

    /// The opposite direction. `None` is its own inverse.
    pub fn inverse(self) -> Direction {
        match self {
            Direction::None => Direction::None,
            Direction::North => Direction::South,
            Direction::NorthEast => Direction::SouthWest,
            Direction::SouthEast => Direction::NorthWest,
            Direction::South => Direction::North,
            Direction::SouthWest => Direction::NorthEast,
            Direction::NorthWest => Direction::SouthEast,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
