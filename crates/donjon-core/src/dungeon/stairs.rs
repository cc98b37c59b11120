//! Staircases
//!
//! Stairs go at the closed end of a straight corridor run, facing along it.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use tracing::{debug, trace};

use crate::rng::DungeonRng;

use super::cell::CellFlags;
use super::direction::Direction;
use super::grid::{Grid, half_grid, intersection};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StairKind {
    Down,
    Up,
}

impl StairKind {
    pub const fn key(self) -> &'static str {
        match self {
            StairKind::Down => "down",
            StairKind::Up => "up",
        }
    }

    /// Map label
    pub const fn label(self) -> char {
        match self {
            StairKind::Down => 'd',
            StairKind::Up => 'u',
        }
    }

    pub const fn cell_flag(self) -> CellFlags {
        match self {
            StairKind::Down => CellFlags::STAIR_DN,
            StairKind::Up => CellFlags::STAIR_UP,
        }
    }
}

/// A placed staircase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stair {
    pub row: usize,
    pub col: usize,
    /// The corridor cell the stair leads into
    pub next_row: usize,
    pub next_col: usize,
    pub kind: StairKind,
}

/// Corridor cell able to take a stair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Terminus {
    pub row: usize,
    pub col: usize,
    pub next_row: usize,
    pub next_col: usize,
}

/// Every intersection that ends a straight corridor run, row-major
pub fn stair_ends(grid: &Grid) -> Vec<Terminus> {
    let mut list = Vec::new();

    for (i, j) in half_grid(grid.half_rows(), grid.half_cols()) {
        let (r, c) = intersection(i, j);
        if !grid.flags(r, c).is_pure_corridor() {
            continue;
        }

        let end = Direction::all()
            .map(Direction::stair_end)
            .find(|end| end.check.matches(grid, r, c));
        if let Some(end) = end
            && let Some((next_row, next_col)) = grid.offset(r, c, end.next.0, end.next.1)
        {
            list.push(Terminus {
                row: r,
                col: c,
                next_row,
                next_col,
            });
        }
    }
    list
}

/// Place up to `count` stairs on random termini
///
/// The first stair goes down, the second up, the rest are a coin flip.
pub fn place_stairs(grid: &mut Grid, count: u32, rng: &mut DungeonRng) -> Vec<Stair> {
    let mut stairs = Vec::new();
    if count == 0 {
        return stairs;
    }

    let mut ends = stair_ends(grid);
    trace!(termini = ends.len(), "found stair termini");

    for n in 0..count {
        let Some(idx) = rng.choose_index(ends.len()) else {
            break;
        };
        let end = ends.remove(idx);

        let kind = match n {
            0 => StairKind::Down,
            1 => StairKind::Up,
            _ if rng.rn2(2) == 0 => StairKind::Down,
            _ => StairKind::Up,
        };

        grid.set(end.row, end.col, kind.cell_flag());
        grid.set_label(end.row, end.col, kind.label());
        stairs.push(Stair {
            row: end.row,
            col: end.col,
            next_row: end.next_row,
            next_col: end.next_col,
            kind,
        });
    }

    debug!(requested = count, placed = stairs.len(), "placed stairs");
    stairs
}
