//! Compass directions and the structural templates tied to them
//!
//! Offsets are `(row, col)` pairs relative to the checked cell.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use super::grid::Grid;

type Offset = (isize, isize);

/// Compass direction. The declaration order is the sort order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Direction {
    North,
    South,
    West,
    East,
}

/// A shape to look for around a cell
#[derive(Debug, Clone, Copy)]
pub struct TunnelCheck {
    /// Cells that must be plain corridor
    pub corridor: &'static [Offset],
    /// Cells that must be off-grid or not open space
    pub walled: &'static [Offset],
}

impl TunnelCheck {
    pub fn matches(&self, grid: &Grid, r: usize, c: usize) -> bool {
        self.corridor.iter().all(|&(dr, dc)| {
            grid.offset(r, c, dr, dc)
                .is_some_and(|(nr, nc)| grid.flags(nr, nc).is_pure_corridor())
        }) && self.walled.iter().all(|&(dr, dc)| {
            grid.offset(r, c, dr, dc)
                .is_none_or(|(nr, nc)| !grid.flags(nr, nc).is_open())
        })
    }
}

/// A corridor cell open only toward one direction
#[derive(Debug, Clone, Copy)]
pub struct CloseEnd {
    pub check: TunnelCheck,
    /// Where to continue once the cell is closed
    pub recurse: Offset,
}

/// A straight corridor run ending in a wall, suitable for a staircase
#[derive(Debug, Clone, Copy)]
pub struct StairEnd {
    pub check: TunnelCheck,
    /// The cell a stair at this end leads into
    pub next: Offset,
}

const NORTH_CLOSE: CloseEnd = CloseEnd {
    check: TunnelCheck {
        corridor: &[(0, 0)],
        walled: &[(0, -1), (1, -1), (1, 0), (1, 1), (0, 1)],
    },
    recurse: (-1, 0),
};

const SOUTH_CLOSE: CloseEnd = CloseEnd {
    check: TunnelCheck {
        corridor: &[(0, 0)],
        walled: &[(0, -1), (-1, -1), (-1, 0), (-1, 1), (0, 1)],
    },
    recurse: (1, 0),
};

const WEST_CLOSE: CloseEnd = CloseEnd {
    check: TunnelCheck {
        corridor: &[(0, 0)],
        walled: &[(-1, 0), (-1, 1), (0, 1), (1, 1), (1, 0)],
    },
    recurse: (0, -1),
};

const EAST_CLOSE: CloseEnd = CloseEnd {
    check: TunnelCheck {
        corridor: &[(0, 0)],
        walled: &[(-1, 0), (-1, -1), (0, -1), (1, -1), (1, 0)],
    },
    recurse: (0, 1),
};

const NORTH_STAIR: StairEnd = StairEnd {
    check: TunnelCheck {
        corridor: &[(0, 0), (1, 0), (2, 0)],
        walled: &[(1, -1), (0, -1), (-1, -1), (-1, 0), (-1, 1), (0, 1), (1, 1)],
    },
    next: (1, 0),
};

const SOUTH_STAIR: StairEnd = StairEnd {
    check: TunnelCheck {
        corridor: &[(0, 0), (-1, 0), (-2, 0)],
        walled: &[(-1, -1), (0, -1), (1, -1), (1, 0), (1, 1), (0, 1), (-1, 1)],
    },
    next: (-1, 0),
};

const WEST_STAIR: StairEnd = StairEnd {
    check: TunnelCheck {
        corridor: &[(0, 0), (0, 1), (0, 2)],
        walled: &[(-1, 1), (-1, 0), (-1, -1), (0, -1), (1, -1), (1, 0), (1, 1)],
    },
    next: (0, 1),
};

const EAST_STAIR: StairEnd = StairEnd {
    check: TunnelCheck {
        corridor: &[(0, 0), (0, -1), (0, -2)],
        walled: &[(-1, -1), (-1, 0), (-1, 1), (0, 1), (1, 1), (1, 0), (1, -1)],
    },
    next: (0, -1),
};

impl Direction {
    /// Every direction in sort order
    pub fn all() -> impl Iterator<Item = Direction> {
        Direction::iter()
    }

    /// Unit step as `(row, col)`
    pub const fn delta(self) -> Offset {
        match self {
            Direction::North => (-1, 0),
            Direction::South => (1, 0),
            Direction::West => (0, -1),
            Direction::East => (0, 1),
        }
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
            Direction::East => Direction::West,
        }
    }

    pub const fn close_end(self) -> &'static CloseEnd {
        match self {
            Direction::North => &NORTH_CLOSE,
            Direction::South => &SOUTH_CLOSE,
            Direction::West => &WEST_CLOSE,
            Direction::East => &EAST_CLOSE,
        }
    }

    pub const fn stair_end(self) -> &'static StairEnd {
        match self {
            Direction::North => &NORTH_STAIR,
            Direction::South => &SOUTH_STAIR,
            Direction::West => &WEST_STAIR,
            Direction::East => &EAST_STAIR,
        }
    }
}
