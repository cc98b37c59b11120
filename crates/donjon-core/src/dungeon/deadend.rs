//! Dead-end removal
//!
//! Trims corridor stubs back toward the nearest junction or room.

use tracing::debug;

use crate::rng::DungeonRng;

use super::cell::CellFlags;
use super::direction::Direction;
use super::grid::{Grid, half_grid, intersection};

/// Collapse dead ends at roughly `percent`% of the open intersections
///
/// 100 collapses every dead end, 0 leaves the grid alone. Returns the number
/// of cells blanked.
pub fn collapse_tunnels(grid: &mut Grid, percent: u8, rng: &mut DungeonRng) -> usize {
    if percent == 0 {
        return 0;
    }
    let all = percent >= 100;
    let mut removed = 0;

    for (i, j) in half_grid(grid.half_rows(), grid.half_cols()) {
        let (r, c) = intersection(i, j);
        let flags = grid.flags(r, c);
        if !flags.is_open() || flags.intersects(CellFlags::STAIRS) {
            continue;
        }
        if all || rng.percent(u32::from(percent)) {
            removed += collapse(grid, r, c);
        }
    }

    debug!(removed, percent, "collapsed dead ends");
    removed
}

/// Follow a dead end from `(r, c)` until it stops being one
fn collapse(grid: &mut Grid, mut r: usize, mut c: usize) -> usize {
    let mut removed = 0;

    while grid.flags(r, c).is_open() {
        let Some(close) = Direction::all()
            .map(Direction::close_end)
            .find(|end| end.check.matches(grid, r, c))
        else {
            break;
        };

        grid.reset(r, c);
        removed += 1;

        let (dr, dc) = close.recurse;
        match grid.offset(r, c, dr, dc) {
            Some((nr, nc)) => (r, c) = (nr, nc),
            None => break,
        }
    }
    removed
}
