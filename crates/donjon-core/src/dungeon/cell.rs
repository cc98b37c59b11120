//! Map cell attributes

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Cell attribute flags
    ///
    /// Attributes accumulate through the pipeline; several can be set at once.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CellFlags: u16 {
        const BLOCKED = 0x0001;
        const ROOM = 0x0002;
        const CORRIDOR = 0x0004;
        const PERIMETER = 0x0008;
        const ENTRANCE = 0x0010;
        const ARCH = 0x0020;
        const DOOR = 0x0040;
        const LOCKED = 0x0080;
        const TRAPPED = 0x0100;
        const SECRET = 0x0200;
        const PORTC = 0x0400;
        const STAIR_DN = 0x0800;
        const STAIR_UP = 0x1000;
        const LABEL = 0x2000;
    }
}

impl CellFlags {
    /// Walkable space
    pub const OPENSPACE: Self = Self::ROOM.union(Self::CORRIDOR);

    /// Any door kind
    pub const DOORSPACE: Self = Self::ARCH
        .union(Self::DOOR)
        .union(Self::LOCKED)
        .union(Self::TRAPPED)
        .union(Self::SECRET)
        .union(Self::PORTC);

    /// Everything an entrance may leave behind
    pub const ESPACE: Self = Self::ENTRANCE.union(Self::DOORSPACE).union(Self::LABEL);

    pub const STAIRS: Self = Self::STAIR_DN.union(Self::STAIR_UP);

    /// Cells a room may not be placed over
    pub const BLOCK_ROOM: Self = Self::BLOCKED.union(Self::ROOM);

    /// Cells a tunnel may not cross
    pub const BLOCK_CORR: Self = Self::BLOCKED.union(Self::PERIMETER).union(Self::CORRIDOR);

    /// Cells that cannot take a new door
    pub const BLOCK_DOOR: Self = Self::BLOCKED.union(Self::DOORSPACE);

    /// Room or corridor
    pub const fn is_open(self) -> bool {
        self.intersects(Self::OPENSPACE)
    }

    /// Nothing but corridor
    pub fn is_pure_corridor(self) -> bool {
        self == Self::CORRIDOR
    }
}

// Manual serde impl for CellFlags
impl Serialize for CellFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CellFlags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u16::deserialize(deserializer)?;
        Ok(CellFlags::from_bits_truncate(bits))
    }
}

/// A single map cell, as read back from a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cell {
    /// Attribute flags
    pub flags: CellFlags,

    /// Room number (0 = not in room)
    pub room_id: u16,

    /// Single-character label (room numbers, stair marks)
    pub label: Option<char>,
}

impl Cell {
    /// Create a blank cell
    pub const fn blank() -> Self {
        Self {
            flags: CellFlags::empty(),
            room_id: 0,
            label: None,
        }
    }

    pub const fn is_open(&self) -> bool {
        self.flags.is_open()
    }

    pub const fn is_blank(&self) -> bool {
        self.flags.is_empty() && self.room_id == 0 && self.label.is_none()
    }
}
