//! Dungeon model and generation pipeline
//!
//! Contains the cell grid, rooms, doors, corridors and stairs, and the
//! generator that ties them together.

mod cell;
mod corridor;
mod deadend;
mod direction;
mod door;
mod generation;
mod grid;
mod layout;
mod room;
mod stairs;

pub use cell::{Cell, CellFlags};
pub use corridor::carve_corridors;
pub use deadend::collapse_tunnels;
pub use direction::{CloseEnd, Direction, StairEnd, TunnelCheck};
pub use door::{ConnectionTracker, Door, DoorType, Sill, door_sills, fix_doors, open_rooms};
pub use generation::{Dungeon, Generator, generate};
pub use grid::{Grid, half_grid, intersection};
pub use layout::apply_layout;
pub use room::{MAX_ROOMS, Room, RoomSizing, label_rooms, place_rooms};
pub use stairs::{Stair, StairKind, Terminus, place_stairs, stair_ends};
