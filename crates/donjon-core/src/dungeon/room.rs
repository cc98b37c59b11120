//! Rooms and room placement
//!
//! Rooms are carved on the half-grid so that every room spans odd rows and
//! columns and its walls fall on even ones. Two placement strategies exist:
//! - packed: try a room at every intersection, in row-major order
//! - scattered: a fixed number of attempts at random anchors
//!
//! A placement that would overlap another room or a blocked cell is dropped
//! whole; rooms are never clipped, resized or moved.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::RoomLayout;
use crate::rng::DungeonRng;

use super::cell::CellFlags;
use super::direction::Direction;
use super::door::Door;
use super::grid::{Grid, half_grid, intersection};

/// Hard cap on rooms per dungeon
pub const MAX_ROOMS: usize = 999;

/// Size of one cell in room measurements
const UNIT: usize = 10;

/// A placed room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// 1-based id, in placement order
    pub id: u16,
    /// Anchor row (same as `north`)
    pub row: usize,
    /// Anchor column (same as `west`)
    pub col: usize,
    pub north: usize,
    pub south: usize,
    pub west: usize,
    pub east: usize,
    /// Height in units of 10 per cell
    pub height: usize,
    /// Width in units of 10 per cell
    pub width: usize,
    pub area: usize,
    /// Doors per wall, in the order they were registered
    pub doors: BTreeMap<Direction, Vec<Door>>,
}

impl Room {
    /// Room covering cells `(r1, c1)` to `(r2, c2)` inclusive
    pub fn new(id: u16, r1: usize, c1: usize, r2: usize, c2: usize) -> Self {
        let height = (r2 - r1 + 1) * UNIT;
        let width = (c2 - c1 + 1) * UNIT;
        Self {
            id,
            row: r1,
            col: c1,
            north: r1,
            south: r2,
            west: c1,
            east: c2,
            height,
            width,
            area: height * width,
            doors: BTreeMap::new(),
        }
    }

    /// Height in half-grid steps
    pub fn half_height(&self) -> usize {
        (self.south - self.north) / 2 + 1
    }

    /// Width in half-grid steps
    pub fn half_width(&self) -> usize {
        (self.east - self.west) / 2 + 1
    }

    /// Check if a cell is inside the room
    pub fn contains(&self, r: usize, c: usize) -> bool {
        r >= self.north && r <= self.south && c >= self.west && c <= self.east
    }

    /// Every cell the room covers, row-major
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + use<> {
        let (west, east) = (self.west, self.east);
        (self.north..=self.south).flat_map(move |r| (west..=east).map(move |c| (r, c)))
    }

    /// Doors on one wall
    pub fn doors_on(&self, dir: Direction) -> &[Door] {
        self.doors.get(&dir).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn door_count(&self) -> usize {
        self.doors.values().map(Vec::len).sum()
    }
}

/// Room dimension ranges in half-grid steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomSizing {
    /// Smallest side
    pub base: usize,
    /// Number of distinct side lengths
    pub radix: usize,
    /// Largest side in cells, used to size scattered placement
    pub max: usize,
}

impl RoomSizing {
    pub fn new(room_min: u32, room_max: u32) -> Self {
        let room_min = room_min as usize;
        let room_max = room_max as usize;
        Self {
            base: (room_min + 1) / 2,
            radix: room_max.saturating_sub(room_min) / 2 + 1,
            max: room_max,
        }
    }
}

/// Partially specified room: unset fields are chosen at random
#[derive(Debug, Clone, Copy, Default)]
struct RoomPrototype {
    i: Option<usize>,
    j: Option<usize>,
    height: Option<usize>,
    width: Option<usize>,
}

/// Place rooms with the configured strategy; returns the number placed
pub fn place_rooms(
    grid: &mut Grid,
    rooms: &mut Vec<Room>,
    layout: RoomLayout,
    sizing: RoomSizing,
    rng: &mut DungeonRng,
) -> usize {
    let before = rooms.len();
    match layout {
        RoomLayout::Packed => pack_rooms(grid, rooms, sizing, rng),
        RoomLayout::Scattered => scatter_rooms(grid, rooms, sizing, rng),
    }
    let placed = rooms.len() - before;
    debug!(placed, strategy = %layout, "placed rooms");
    placed
}

fn pack_rooms(grid: &mut Grid, rooms: &mut Vec<Room>, sizing: RoomSizing, rng: &mut DungeonRng) {
    for (i, j) in half_grid(grid.half_rows(), grid.half_cols()) {
        let (r, c) = intersection(i, j);
        if grid.has(r, c, CellFlags::ROOM) {
            continue;
        }
        // Thin out rooms along the top and left edges
        if (i == 0 || j == 0) && rng.rn2(2) == 0 {
            continue;
        }

        let proto = RoomPrototype {
            i: Some(i),
            j: Some(j),
            ..RoomPrototype::default()
        };
        place_room(grid, rooms, proto, sizing, rng);
    }
}

fn scatter_rooms(grid: &mut Grid, rooms: &mut Vec<Room>, sizing: RoomSizing, rng: &mut DungeonRng) {
    let attempts = alloc_rooms(grid, sizing);
    trace!(attempts, "scattering rooms");
    for _ in 0..attempts {
        place_room(grid, rooms, RoomPrototype::default(), sizing, rng);
    }
}

/// Number of scattered placement attempts for this grid
fn alloc_rooms(grid: &Grid, sizing: RoomSizing) -> usize {
    let dungeon_area = grid.rows() * grid.cols();
    let room_area = sizing.max * sizing.max;
    if room_area == 0 {
        return 0;
    }
    dungeon_area / room_area
}

/// Fill in the unset parts of a prototype: `(i, j, height, width)`
///
/// Returns `None` when a random anchor cannot fit the drawn size at all.
fn select_room(
    proto: RoomPrototype,
    n_i: usize,
    n_j: usize,
    sizing: RoomSizing,
    rng: &mut DungeonRng,
) -> Option<(usize, usize, usize, usize)> {
    let height = match (proto.height, proto.i) {
        (Some(h), _) => h,
        (None, Some(i)) => {
            // Never let a fixed anchor push the room off the grid
            let space = n_i.saturating_sub(sizing.base + i);
            rng.rn2(space.min(sizing.radix) as u32) as usize + sizing.base
        }
        (None, None) => rng.rn2(sizing.radix as u32) as usize + sizing.base,
    };
    let width = match (proto.width, proto.j) {
        (Some(w), _) => w,
        (None, Some(j)) => {
            let space = n_j.saturating_sub(sizing.base + j);
            rng.rn2(space.min(sizing.radix) as u32) as usize + sizing.base
        }
        (None, None) => rng.rn2(sizing.radix as u32) as usize + sizing.base,
    };
    let i = match proto.i {
        Some(i) => i,
        None if n_i > height => rng.rn2((n_i - height) as u32) as usize,
        None => return None,
    };
    let j = match proto.j {
        Some(j) => j,
        None if n_j > width => rng.rn2((n_j - width) as u32) as usize,
        None => return None,
    };
    Some((i, j, height, width))
}

fn place_room(
    grid: &mut Grid,
    rooms: &mut Vec<Room>,
    proto: RoomPrototype,
    sizing: RoomSizing,
    rng: &mut DungeonRng,
) -> Option<u16> {
    if rooms.len() >= MAX_ROOMS {
        return None;
    }

    let (i, j, height, width) =
        select_room(proto, grid.half_rows(), grid.half_cols(), sizing, rng)?;

    let r1 = i * 2 + 1;
    let c1 = j * 2 + 1;
    let r2 = (i + height) * 2 - 1;
    let c2 = (j + width) * 2 - 1;

    let max_row = grid.half_rows() * 2;
    let max_col = grid.half_cols() * 2;
    if r2 >= max_row || c2 >= max_col {
        trace!(r1, c1, r2, c2, "room out of bounds");
        return None;
    }
    if !room_fits(grid, r1, c1, r2, c2) {
        trace!(r1, c1, r2, c2, "room collides");
        return None;
    }

    let id = (rooms.len() + 1) as u16;
    let room = Room::new(id, r1, c1, r2, c2);

    for (r, c) in room.cells() {
        grid.set(r, c, CellFlags::ROOM);
        grid.set_room_id(r, c, id);
        if grid.has(r, c, CellFlags::ENTRANCE) {
            grid.clear(r, c, CellFlags::ESPACE);
        }
        grid.clear(r, c, CellFlags::PERIMETER);
    }

    let wall = CellFlags::ROOM | CellFlags::ENTRANCE;
    for r in (r1 - 1)..=(r2 + 1) {
        for c in [c1 - 1, c2 + 1] {
            if !grid.has_any(r, c, wall) {
                grid.set(r, c, CellFlags::PERIMETER);
            }
        }
    }
    for c in (c1 - 1)..=(c2 + 1) {
        for r in [r1 - 1, r2 + 1] {
            if !grid.has_any(r, c, wall) {
                grid.set(r, c, CellFlags::PERIMETER);
            }
        }
    }

    trace!(id, r1, c1, r2, c2, "placed room");
    rooms.push(room);
    Some(id)
}

/// No blocked cell and no part of another room inside the rectangle
fn room_fits(grid: &Grid, r1: usize, c1: usize, r2: usize, c2: usize) -> bool {
    (r1..=r2).all(|r| (c1..=c2).all(|c| !grid.has_any(r, c, CellFlags::BLOCK_ROOM)))
}

/// Write each room's number, centred on its middle row
pub fn label_rooms(grid: &mut Grid, rooms: &[Room]) {
    for room in rooms {
        let label = room.id.to_string();
        let label_r = (room.north + room.south) / 2;
        let start = (room.west + room.east) as isize - label.len() as isize;
        let label_c = start / 2 + 1;

        for (offset, ch) in label.chars().enumerate() {
            grid.set_label(label_r, (label_c + offset as isize) as usize, ch);
        }
    }
}
