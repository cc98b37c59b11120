//! donjon-core: procedural dungeon generation
//!
//! Builds a tile map of rooms, corridors, doors and stairs from a seed and a
//! handful of shape parameters. The same seed and configuration always give
//! the same dungeon.
//!
//! This crate does no I/O; rendering the result is left to the caller.
//!
//! ```
//! use donjon_core::{DungeonConfig, generate};
//!
//! let config = DungeonConfig::with_seed(42).with_size(21, 31);
//! let dungeon = generate(&config).unwrap();
//! assert_eq!(dungeon.rows(), 20);
//! ```

pub mod config;
pub mod dungeon;
mod error;
mod rng;

pub use config::{CorridorLayout, DungeonConfig, DungeonLayout, RoomLayout};
pub use dungeon::{Dungeon, generate};
pub use error::{ConfigError, SnapshotError};
pub use rng::DungeonRng;
