//! Doors (sills, opening and reconciliation)
//!
//! Doors are resolved in two phases:
//! 1. Opening: each room picks candidate openings (sills) in its walls and
//!    opens a random subset, recording the doors in its own per-wall lists.
//! 2. Fix-up: after corridors are carved, every tentative door is checked
//!    against the final grid. Surviving doors are registered once in the
//!    dungeon-wide list and mirrored into the room on the far side.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use tracing::{debug, trace};

use crate::rng::DungeonRng;

use super::cell::CellFlags;
use super::direction::Direction;
use super::grid::Grid;
use super::room::Room;

/// Door kind
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DoorType {
    /// Open archway
    Arch,
    /// Unlocked door
    Open,
    /// Locked door
    Lock,
    /// Trapped door
    Trap,
    /// Secret door, looks like wall
    Secret,
    /// Portcullis
    Portc,
}

impl DoorType {
    /// Weighted draw: 15/45/15/15/10/10 out of 110
    pub fn random(rng: &mut DungeonRng) -> Self {
        Self::from_roll(rng.rn2(110))
    }

    /// Map a roll in 0..110 to a door kind
    pub const fn from_roll(roll: u32) -> Self {
        match roll {
            0..15 => DoorType::Arch,
            15..60 => DoorType::Open,
            60..75 => DoorType::Lock,
            75..90 => DoorType::Trap,
            90..100 => DoorType::Secret,
            _ => DoorType::Portc,
        }
    }

    /// Cell flag stamped on the door cell
    pub const fn cell_flag(self) -> CellFlags {
        match self {
            DoorType::Arch => CellFlags::ARCH,
            DoorType::Open => CellFlags::DOOR,
            DoorType::Lock => CellFlags::LOCKED,
            DoorType::Trap => CellFlags::TRAPPED,
            DoorType::Secret => CellFlags::SECRET,
            DoorType::Portc => CellFlags::PORTC,
        }
    }

    /// Short key, e.g. for legends
    pub const fn key(self) -> &'static str {
        match self {
            DoorType::Arch => "arch",
            DoorType::Open => "open",
            DoorType::Lock => "lock",
            DoorType::Trap => "trap",
            DoorType::Secret => "secret",
            DoorType::Portc => "portc",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            DoorType::Arch => "Archway",
            DoorType::Open => "Unlocked Door",
            DoorType::Lock => "Locked Door",
            DoorType::Trap => "Trapped Door",
            DoorType::Secret => "Secret Door",
            DoorType::Portc => "Portcullis",
        }
    }

    /// Every kind is at least an opening in the wall
    pub const fn is_arch(self) -> bool {
        true
    }

    /// Has an actual door leaf
    pub const fn is_door(self) -> bool {
        matches!(self, DoorType::Open | DoorType::Lock | DoorType::Trap)
    }

    pub const fn is_locked(self) -> bool {
        matches!(self, DoorType::Lock)
    }

    pub const fn is_trapped(self) -> bool {
        matches!(self, DoorType::Trap)
    }

    pub const fn is_secret(self) -> bool {
        matches!(self, DoorType::Secret)
    }

    pub const fn is_portcullis(self) -> bool {
        matches!(self, DoorType::Portc)
    }

    /// Drawn as wall
    pub const fn looks_like_wall(self) -> bool {
        matches!(self, DoorType::Secret)
    }
}

/// A door in a room wall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Door {
    pub row: usize,
    pub col: usize,
    pub kind: DoorType,
    /// Room on the far side, if the door does not open onto a corridor
    pub out_id: Option<u16>,
}

/// Candidate opening in a room wall
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sill {
    /// Room edge cell the opening starts from
    pub sill_r: usize,
    pub sill_c: usize,
    pub dir: Direction,
    /// Wall cell that becomes the door
    pub door_r: usize,
    pub door_c: usize,
    pub out_id: Option<u16>,
}

/// Room pairs already joined by a door (the "connects" set)
///
/// Keeps rooms from getting more than one door between them.
#[derive(Debug, Clone, Default)]
pub struct ConnectionTracker {
    pairs: HashSet<(u16, u16)>,
}

impl ConnectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(a: u16, b: u16) -> (u16, u16) {
        if a <= b { (a, b) } else { (b, a) }
    }

    pub fn are_connected(&self, a: u16, b: u16) -> bool {
        self.pairs.contains(&Self::key(a, b))
    }

    /// Record a connection; false if the pair was already connected
    pub fn connect(&mut self, a: u16, b: u16) -> bool {
        self.pairs.insert(Self::key(a, b))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn clear(&mut self) {
        self.pairs.clear();
    }
}

/// Open doors in every room, in id order; returns the number of doors opened
pub fn open_rooms(
    grid: &mut Grid,
    rooms: &mut [Room],
    connects: &mut ConnectionTracker,
    rng: &mut DungeonRng,
) -> usize {
    let opened: usize = rooms
        .iter_mut()
        .map(|room| open_room(grid, room, connects, rng))
        .sum();
    debug!(opened, connections = connects.len(), "opened rooms");
    opened
}

fn open_room(
    grid: &mut Grid,
    room: &mut Room,
    connects: &mut ConnectionTracker,
    rng: &mut DungeonRng,
) -> usize {
    let mut sills = door_sills(grid, room);
    if sills.is_empty() {
        return 0;
    }
    rng.shuffle(&mut sills);

    let n_opens = alloc_opens(room, rng);
    let mut opened = 0;

    for sill in sills.into_iter().take(n_opens) {
        if grid.has_any(sill.door_r, sill.door_c, CellFlags::DOORSPACE) {
            continue;
        }
        if let Some(out_id) = sill.out_id
            && !connects.connect(room.id, out_id)
        {
            trace!(room = room.id, out_id, "rooms already connected");
            continue;
        }

        let (dr, dc) = sill.dir.delta();
        for x in 0..3 {
            let r = (sill.sill_r as isize + dr * x) as usize;
            let c = (sill.sill_c as isize + dc * x) as usize;
            grid.clear(r, c, CellFlags::PERIMETER);
            grid.set(r, c, CellFlags::ENTRANCE);
        }

        let kind = DoorType::random(rng);
        grid.set(sill.door_r, sill.door_c, kind.cell_flag());

        room.doors.entry(sill.dir).or_default().push(Door {
            row: sill.door_r,
            col: sill.door_c,
            kind,
            out_id: sill.out_id,
        });
        opened += 1;
    }
    opened
}

/// Number of openings to attempt for a room
fn alloc_opens(room: &Room, rng: &mut DungeonRng) -> usize {
    let linear = ((room.half_width() * room.half_height()) as f64).sqrt() as usize;
    linear + rng.rn2(linear as u32) as usize
}

/// Valid sills along every wall not too close to the dungeon edge
pub fn door_sills(grid: &Grid, room: &Room) -> Vec<Sill> {
    let mut list = Vec::new();

    if room.north >= 3 {
        for c in (room.west..=room.east).step_by(2) {
            list.extend(check_sill(grid, room, room.north, c, Direction::North));
        }
    }
    if room.south + 3 <= grid.rows() {
        for c in (room.west..=room.east).step_by(2) {
            list.extend(check_sill(grid, room, room.south, c, Direction::South));
        }
    }
    if room.west >= 3 {
        for r in (room.north..=room.south).step_by(2) {
            list.extend(check_sill(grid, room, r, room.west, Direction::West));
        }
    }
    if room.east + 3 <= grid.cols() {
        for r in (room.north..=room.south).step_by(2) {
            list.extend(check_sill(grid, room, r, room.east, Direction::East));
        }
    }
    list
}

fn check_sill(grid: &Grid, room: &Room, sill_r: usize, sill_c: usize, dir: Direction) -> Option<Sill> {
    let (dr, dc) = dir.delta();
    let (door_r, door_c) = grid.offset(sill_r, sill_c, dr, dc)?;
    if !grid.has(door_r, door_c, CellFlags::PERIMETER)
        || grid.has_any(door_r, door_c, CellFlags::BLOCK_DOOR)
    {
        return None;
    }

    let (out_r, out_c) = grid.offset(door_r, door_c, dr, dc)?;
    if grid.has(out_r, out_c, CellFlags::BLOCKED) {
        return None;
    }

    let out_id = if grid.has(out_r, out_c, CellFlags::ROOM) {
        let out_id = grid.room_id(out_r, out_c);
        if out_id == room.id {
            return None;
        }
        Some(out_id)
    } else {
        None
    };

    Some(Sill {
        sill_r,
        sill_c,
        dir,
        door_r,
        door_c,
        out_id,
    })
}

/// Reconcile tentative doors with the final grid
///
/// A door survives only if its cell is open space and no earlier door claimed
/// the same cell. Survivors are returned as the dungeon-wide door list; doors
/// leading into another room are also added to that room under the opposite
/// wall. Walls left without doors are removed from the room's map, and a
/// dropped door whose cell never opened up loses its door flag.
pub fn fix_doors(grid: &mut Grid, rooms: &mut [Room]) -> Vec<Door> {
    let mut claimed = vec![vec![false; grid.cols() + 1]; grid.rows() + 1];
    let mut doors = Vec::new();
    let mut mirrored = Vec::new();

    let tentative: Vec<BTreeMap<Direction, Vec<Door>>> = rooms
        .iter_mut()
        .map(|room| std::mem::take(&mut room.doors))
        .collect();

    for (room, walls) in rooms.iter_mut().zip(tentative) {
        for (dir, list) in walls {
            let mut kept = Vec::with_capacity(list.len());
            for door in list {
                if !grid.flags(door.row, door.col).is_open() {
                    trace!(room = room.id, row = door.row, col = door.col, "door leads nowhere");
                    grid.clear(door.row, door.col, CellFlags::DOORSPACE);
                } else if !claimed[door.row][door.col] {
                    claimed[door.row][door.col] = true;
                    kept.push(door);
                }
            }

            if kept.is_empty() {
                continue;
            }
            for door in &kept {
                if let Some(out_id) = door.out_id {
                    mirrored.push((out_id, dir.opposite(), *door));
                }
            }
            doors.extend(kept.iter().copied());
            room.doors.insert(dir, kept);
        }
    }

    for (out_id, dir, door) in mirrored {
        if let Some(target) = rooms.get_mut(usize::from(out_id).wrapping_sub(1)) {
            target.doors.entry(dir).or_default().push(door);
        }
    }

    debug!(doors = doors.len(), "fixed doors");
    doors
}
