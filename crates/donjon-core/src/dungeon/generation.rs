//! Dungeon generation
//!
//! Runs the whole pipeline on one random stream and freezes the result:
//!
//! 1. Allocate the grid and apply the layout mask
//! 2. Place rooms, open their doors, write room labels
//! 3. Carve corridors, place stairs, collapse dead ends
//! 4. Reconcile doors and clear what is left of the mask
//!
//! Every step draws from the same stream, so the order of the steps is part
//! of what a seed means.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::DungeonConfig;
use crate::error::ConfigError;
use crate::rng::DungeonRng;

use super::cell::{Cell, CellFlags};
use super::corridor::carve_corridors;
use super::deadend::collapse_tunnels;
use super::door::{ConnectionTracker, Door, fix_doors, open_rooms};
use super::grid::Grid;
use super::layout::apply_layout;
use super::room::{Room, RoomSizing, label_rooms, place_rooms};
use super::stairs::{Stair, StairKind, place_stairs};

/// Generate a dungeon
///
/// Fails only if the configuration is invalid; everything that goes wrong
/// during generation just means fewer rooms, doors or stairs.
#[instrument(
    skip(config),
    fields(seed = config.seed, rows = config.rows, cols = config.cols)
)]
pub fn generate(config: &DungeonConfig) -> Result<Dungeon, ConfigError> {
    let generator = Generator::new(config)?;
    Ok(generator.run())
}

/// State for a single generation run
#[derive(Debug)]
pub struct Generator {
    config: DungeonConfig,
    rng: DungeonRng,
    grid: Grid,
    rooms: Vec<Room>,
    connects: ConnectionTracker,
}

impl Generator {
    pub fn new(config: &DungeonConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config: config.clone(),
            rng: DungeonRng::new(config.seed),
            grid: Grid::new(config.rows as usize, config.cols as usize),
            rooms: Vec::new(),
            connects: ConnectionTracker::new(),
        })
    }

    /// Run every stage and hand back the finished dungeon
    pub fn run(mut self) -> Dungeon {
        let blocked = apply_layout(&mut self.grid, self.config.layout);
        debug!(blocked, "applied layout");

        let sizing = RoomSizing::new(self.config.room_min, self.config.room_max);
        place_rooms(
            &mut self.grid,
            &mut self.rooms,
            self.config.room_layout,
            sizing,
            &mut self.rng,
        );
        open_rooms(&mut self.grid, &mut self.rooms, &mut self.connects, &mut self.rng);
        self.connects.clear();
        label_rooms(&mut self.grid, &self.rooms);

        carve_corridors(&mut self.grid, self.config.corridor_layout, &mut self.rng);
        let stairs = place_stairs(&mut self.grid, self.config.add_stairs, &mut self.rng);
        collapse_tunnels(&mut self.grid, self.config.remove_deadends, &mut self.rng);

        let doors = fix_doors(&mut self.grid, &mut self.rooms);
        let emptied = empty_blocks(&mut self.grid);
        debug!(emptied, "cleared blocked cells");

        debug!(
            rooms = self.rooms.len(),
            doors = doors.len(),
            stairs = stairs.len(),
            "dungeon complete"
        );

        Dungeon {
            seed: self.rng.seed(),
            grid: self.grid,
            rooms: self.rooms,
            doors,
            stairs,
        }
    }
}

/// Reset every cell the layout mask left behind
fn empty_blocks(grid: &mut Grid) -> usize {
    let mut emptied = 0;
    for r in 0..=grid.rows() {
        for c in 0..=grid.cols() {
            if grid.has(r, c, CellFlags::BLOCKED) {
                grid.reset(r, c);
                emptied += 1;
            }
        }
    }
    emptied
}

/// A finished dungeon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dungeon {
    seed: u64,
    grid: Grid,
    rooms: Vec<Room>,
    doors: Vec<Door>,
    stairs: Vec<Stair>,
}

impl Dungeon {
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Highest row index (requested rows rounded down to even)
    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    /// Highest column index (requested columns rounded down to even)
    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Cell at `(r, c)`, `None` outside the grid
    pub fn cell(&self, r: usize, c: usize) -> Option<Cell> {
        (r <= self.rows() && c <= self.cols()).then(|| self.grid.cell(r, c))
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Room by its 1-based id
    pub fn room(&self, id: u16) -> Option<&Room> {
        let idx = usize::from(id).checked_sub(1)?;
        self.rooms.get(idx)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Every door, each listed once
    pub fn doors(&self) -> &[Door] {
        &self.doors
    }

    /// Stairs in placement order
    pub fn stairs(&self) -> &[Stair] {
        &self.stairs
    }

    pub fn stairs_of(&self, kind: StairKind) -> impl Iterator<Item = &Stair> + '_ {
        self.stairs.iter().filter(move |stair| stair.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CorridorLayout, DungeonLayout, RoomLayout};

    fn config(seed: u64) -> DungeonConfig {
        DungeonConfig::with_seed(seed)
    }

    #[test]
    fn test_generate_default() {
        let dungeon = generate(&config(1)).unwrap();

        assert_eq!(dungeon.seed(), 1);
        assert_eq!(dungeon.rows(), 38);
        assert_eq!(dungeon.cols(), 38);
        assert!(dungeon.room_count() > 0);
        assert_eq!(dungeon.grid().cells().count(), 39 * 39);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let bad = config(1).with_size(0, 10);
        assert_eq!(
            generate(&bad),
            Err(ConfigError::InvalidDimensions { rows: 0, cols: 10 })
        );
    }

    #[test]
    fn test_room_lookup() {
        let dungeon = generate(&config(3)).unwrap();

        assert!(dungeon.room(0).is_none());
        assert!(dungeon.room(dungeon.room_count() as u16 + 1).is_none());
        for room in dungeon.rooms() {
            assert_eq!(dungeon.room(room.id), Some(room));
        }
    }

    #[test]
    fn test_cell_lookup_is_bounded() {
        let dungeon = generate(&config(3).with_size(10, 12)).unwrap();

        assert!(dungeon.cell(10, 12).is_some());
        assert!(dungeon.cell(11, 0).is_none());
        assert!(dungeon.cell(0, 13).is_none());
    }

    #[test]
    fn test_masked_cells_end_up_blank() {
        for layout in [DungeonLayout::Box, DungeonLayout::Cross, DungeonLayout::Round] {
            let dungeon = generate(&config(8).with_layout(Some(layout))).unwrap();
            assert!(
                dungeon
                    .grid()
                    .cells()
                    .all(|(_, _, cell)| !cell.flags.contains(CellFlags::BLOCKED)),
                "{} layout left blocked cells",
                layout
            );
        }
    }

    #[test]
    fn test_stairs_of_filters_by_kind() {
        let dungeon = generate(&config(4).with_stairs(4)).unwrap();

        let down = dungeon.stairs_of(StairKind::Down).count();
        let up = dungeon.stairs_of(StairKind::Up).count();
        assert_eq!(down + up, dungeon.stairs().len());
        if let Some(first) = dungeon.stairs().first() {
            assert_eq!(first.kind, StairKind::Down);
        }
    }

    #[test]
    fn test_every_option_combination_generates() {
        for room_layout in [RoomLayout::Packed, RoomLayout::Scattered] {
            for corridor_layout in [
                CorridorLayout::Labyrinth,
                CorridorLayout::Bent,
                CorridorLayout::Straight,
            ] {
                let cfg = config(12)
                    .with_room_layout(room_layout)
                    .with_corridor_layout(corridor_layout)
                    .with_remove_deadends(100);
                let dungeon = generate(&cfg).unwrap();
                assert!(dungeon.rows() > 0);
            }
        }
    }

    #[test]
    fn test_empty_blocks_counts() {
        let mut grid = Grid::new(4, 4);
        grid.set(0, 0, CellFlags::BLOCKED);
        grid.set(2, 2, CellFlags::BLOCKED | CellFlags::PERIMETER);

        assert_eq!(empty_blocks(&mut grid), 2);
        assert!(grid.cells().all(|(_, _, cell)| cell.is_blank()));
    }
}
