//! Generation parameters
//!
//! A `DungeonConfig` is the complete input of a generation run: together with
//! its seed it determines the resulting map exactly.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::error::ConfigError;

/// Overall dungeon shape, applied as a mask before anything is placed
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DungeonLayout {
    /// Square with a blocked centre
    Box,
    /// Plus-shaped, corners blocked
    Cross,
    /// Circle inscribed in the grid
    Round,
}

/// Room placement strategy
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RoomLayout {
    /// Try a room at every intersection
    #[default]
    Packed,
    /// A fixed number of attempts at random anchors
    Scattered,
}

/// Corridor straightness
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum CorridorLayout {
    Labyrinth,
    #[default]
    Bent,
    Straight,
}

impl CorridorLayout {
    /// Percent chance that a tunnel keeps its previous heading
    pub const fn straight_bias(self) -> u32 {
        match self {
            CorridorLayout::Labyrinth => 0,
            CorridorLayout::Bent => 50,
            CorridorLayout::Straight => 100,
        }
    }
}

/// Input of a generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonConfig {
    /// Requested rows; rounded down to an even number
    pub rows: u32,
    /// Requested columns; rounded down to an even number
    pub cols: u32,
    pub layout: Option<DungeonLayout>,
    /// Smallest room side, in cells
    pub room_min: u32,
    /// Largest room side, in cells
    pub room_max: u32,
    pub room_layout: RoomLayout,
    pub corridor_layout: CorridorLayout,
    /// Percent of dead ends to remove (0-100)
    pub remove_deadends: u8,
    /// Number of staircases to place
    pub add_stairs: u32,
    pub seed: u64,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            rows: 39,
            cols: 39,
            layout: None,
            room_min: 3,
            room_max: 9,
            room_layout: RoomLayout::Packed,
            corridor_layout: CorridorLayout::Bent,
            remove_deadends: 50,
            add_stairs: 2,
            seed: 0,
        }
    }
}

impl DungeonConfig {
    /// Default configuration with the given seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    pub fn with_size(mut self, rows: u32, cols: u32) -> Self {
        self.rows = rows;
        self.cols = cols;
        self
    }

    pub fn with_layout(mut self, layout: Option<DungeonLayout>) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_room_size(mut self, min: u32, max: u32) -> Self {
        self.room_min = min;
        self.room_max = max;
        self
    }

    pub fn with_room_layout(mut self, room_layout: RoomLayout) -> Self {
        self.room_layout = room_layout;
        self
    }

    pub fn with_corridor_layout(mut self, corridor_layout: CorridorLayout) -> Self {
        self.corridor_layout = corridor_layout;
        self
    }

    pub fn with_remove_deadends(mut self, percent: u8) -> Self {
        self.remove_deadends = percent;
        self
    }

    pub fn with_stairs(mut self, count: u32) -> Self {
        self.add_stairs = count;
        self
    }

    /// Check the configuration before generation starts
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::InvalidDimensions {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if self.room_min == 0 || self.room_max < self.room_min {
            return Err(ConfigError::InvalidRoomSize {
                min: self.room_min,
                max: self.room_max,
            });
        }
        if self.remove_deadends > 100 {
            return Err(ConfigError::InvalidDeadendPercent(self.remove_deadends));
        }
        Ok(())
    }
}
