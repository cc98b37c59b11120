//! Cell grid storage
//!
//! The grid keeps one flat, row-major array per cell attribute: flags, owning
//! room id and label. Rooms refer to cells by coordinates and cells refer to
//! rooms by id, so there are no references between the two.
//!
//! Placement works on a coarser half-grid: intersection `(i, j)` is the cell
//! `(2i + 1, 2j + 1)`. Rooms and corridors always start and end on odd
//! coordinates, walls and door openings fall on the even ones between them.

use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;

use super::cell::{Cell, CellFlags};

/// Dungeon cell grid of `(rows + 1) x (cols + 1)` cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridParts")]
pub struct Grid {
    rows: usize,
    cols: usize,
    flags: Vec<CellFlags>,
    room_ids: Vec<u16>,
    labels: Vec<Option<char>>,
}

/// Serialized form of a [`Grid`], checked before it becomes one
#[derive(Deserialize)]
struct GridParts {
    rows: usize,
    cols: usize,
    flags: Vec<CellFlags>,
    room_ids: Vec<u16>,
    labels: Vec<Option<char>>,
}

impl TryFrom<GridParts> for Grid {
    type Error = SnapshotError;

    fn try_from(parts: GridParts) -> Result<Self, Self::Error> {
        let GridParts { rows, cols, flags, room_ids, labels } = parts;
        if rows % 2 != 0 || cols % 2 != 0 {
            return Err(SnapshotError::InvalidDimensions { rows, cols });
        }
        let expected = rows
            .checked_add(1)
            .zip(cols.checked_add(1))
            .and_then(|(r, c)| r.checked_mul(c))
            .ok_or(SnapshotError::InvalidDimensions { rows, cols })?;

        for (field, found) in [
            ("flags", flags.len()),
            ("room_ids", room_ids.len()),
            ("labels", labels.len()),
        ] {
            if found != expected {
                return Err(SnapshotError::CellCount { field, expected, found });
            }
        }
        Ok(Self { rows, cols, flags, room_ids, labels })
    }
}

impl Grid {
    /// Allocate a blank grid. `rows` and `cols` are rounded down to even.
    pub fn new(rows: usize, cols: usize) -> Self {
        let rows = (rows / 2) * 2;
        let cols = (cols / 2) * 2;
        let len = (rows + 1) * (cols + 1);
        Self {
            rows,
            cols,
            flags: vec![CellFlags::empty(); len],
            room_ids: vec![0; len],
            labels: vec![None; len],
        }
    }

    /// Highest row index
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Highest column index
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of half-grid rows (`n_i`)
    pub fn half_rows(&self) -> usize {
        self.rows / 2
    }

    /// Number of half-grid columns (`n_j`)
    pub fn half_cols(&self) -> usize {
        self.cols / 2
    }

    pub fn in_bounds(&self, r: isize, c: isize) -> bool {
        r >= 0 && c >= 0 && r as usize <= self.rows && c as usize <= self.cols
    }

    fn index(&self, r: usize, c: usize) -> usize {
        debug_assert!(
            r <= self.rows && c <= self.cols,
            "cell ({}, {}) outside {}x{} grid",
            r,
            c,
            self.rows + 1,
            self.cols + 1
        );
        r * (self.cols + 1) + c
    }

    /// Step from `(r, c)` by `(dr, dc)`, or `None` if that leaves the grid
    pub fn offset(&self, r: usize, c: usize, dr: isize, dc: isize) -> Option<(usize, usize)> {
        let nr = r as isize + dr;
        let nc = c as isize + dc;
        if self.in_bounds(nr, nc) {
            Some((nr as usize, nc as usize))
        } else {
            None
        }
    }

    pub fn flags(&self, r: usize, c: usize) -> CellFlags {
        self.flags[self.index(r, c)]
    }

    /// True if the cell carries every flag in `flags`
    pub fn has(&self, r: usize, c: usize, flags: CellFlags) -> bool {
        self.flags(r, c).contains(flags)
    }

    /// True if the cell carries any flag in `flags`
    pub fn has_any(&self, r: usize, c: usize, flags: CellFlags) -> bool {
        self.flags(r, c).intersects(flags)
    }

    pub fn set(&mut self, r: usize, c: usize, flags: CellFlags) {
        let idx = self.index(r, c);
        self.flags[idx].insert(flags);
    }

    pub fn clear(&mut self, r: usize, c: usize, flags: CellFlags) {
        let idx = self.index(r, c);
        self.flags[idx].remove(flags);
    }

    pub fn room_id(&self, r: usize, c: usize) -> u16 {
        self.room_ids[self.index(r, c)]
    }

    pub fn set_room_id(&mut self, r: usize, c: usize, id: u16) {
        let idx = self.index(r, c);
        self.room_ids[idx] = id;
    }

    pub fn label(&self, r: usize, c: usize) -> Option<char> {
        self.labels[self.index(r, c)]
    }

    /// Write a label and mark the cell LABEL
    pub fn set_label(&mut self, r: usize, c: usize, label: char) {
        let idx = self.index(r, c);
        self.labels[idx] = Some(label);
        self.flags[idx].insert(CellFlags::LABEL);
    }

    /// Reset a cell to blank: no flags, no room, no label
    pub fn reset(&mut self, r: usize, c: usize) {
        let idx = self.index(r, c);
        self.flags[idx] = CellFlags::empty();
        self.room_ids[idx] = 0;
        self.labels[idx] = None;
    }

    pub fn cell(&self, r: usize, c: usize) -> Cell {
        let idx = self.index(r, c);
        Cell {
            flags: self.flags[idx],
            room_id: self.room_ids[idx],
            label: self.labels[idx],
        }
    }

    /// Iterate over all cells in row-major order as `(row, col, cell)`
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        let width = self.cols + 1;
        (0..self.flags.len()).map(move |idx| {
            (
                idx / width,
                idx % width,
                Cell {
                    flags: self.flags[idx],
                    room_id: self.room_ids[idx],
                    label: self.labels[idx],
                },
            )
        })
    }
}

/// Full-grid cell of half-grid intersection `(i, j)`
pub const fn intersection(i: usize, j: usize) -> (usize, usize) {
    (i * 2 + 1, j * 2 + 1)
}

/// All half-grid intersections in row-major order
pub fn half_grid(n_i: usize, n_j: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..n_i).flat_map(move |i| (0..n_j).map(move |j| (i, j)))
}
