//! Configuration and snapshot errors
//!
//! Generation itself never fails: rejected placements are skipped. The only
//! errors are malformed configurations, reported before any cell is touched,
//! and malformed snapshots, reported while deserializing.

use thiserror::Error;

/// Errors raised when validating a [`crate::DungeonConfig`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid dungeon dimensions: {rows}x{cols} (both must be at least 1)")]
    InvalidDimensions { rows: u32, cols: u32 },

    #[error("Invalid room size range: min {min}, max {max}")]
    InvalidRoomSize { min: u32, max: u32 },

    #[error("Dead-end removal must be a percentage (0-100), got {0}")]
    InvalidDeadendPercent(u8),
}

/// Errors raised when loading a serialized [`crate::Dungeon`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("Invalid grid dimensions in snapshot: {rows}x{cols} (both must be even)")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("Grid {field} holds {found} cells, expected {expected}")]
    CellCount {
        field: &'static str,
        expected: usize,
        found: usize,
    },
}
