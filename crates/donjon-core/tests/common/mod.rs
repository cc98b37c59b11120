use std::collections::HashSet;

use donjon_core::Dungeon;
use donjon_core::dungeon::{CellFlags, Direction, Door};

/// Structural invariants every generated dungeon must satisfy
pub fn check_invariants(dungeon: &Dungeon) {
    check_rooms(dungeon);
    check_doors(dungeon);
    check_door_links(dungeon);
    check_stairs(dungeon);

    for (r, c, cell) in dungeon.grid().cells() {
        assert!(
            !cell.flags.contains(CellFlags::BLOCKED),
            "blocked cell left at ({}, {})",
            r,
            c
        );
    }
}

pub fn check_rooms(dungeon: &Dungeon) {
    let grid = dungeon.grid();
    let mut covered = HashSet::new();

    for (idx, room) in dungeon.rooms().iter().enumerate() {
        assert_eq!(room.id as usize, idx + 1, "room ids must be sequential");
        assert!(room.south < grid.rows() && room.east < grid.cols());

        for (r, c) in room.cells() {
            assert!(covered.insert((r, c)), "rooms overlap at ({}, {})", r, c);
            assert!(grid.has(r, c, CellFlags::ROOM));
            assert_eq!(grid.room_id(r, c), room.id);
        }
    }
}

pub fn check_doors(dungeon: &Dungeon) {
    let grid = dungeon.grid();
    let mut seen = HashSet::new();

    for door in dungeon.doors() {
        assert!(seen.insert((door.row, door.col)), "door listed twice at ({}, {})", door.row, door.col);

        let flags = grid.flags(door.row, door.col);
        let kinds = flags & CellFlags::DOORSPACE;
        assert_eq!(kinds, door.kind.cell_flag(), "door kind flag at ({}, {})", door.row, door.col);

        let beside_open = Direction::all().any(|dir| {
            let (dr, dc) = dir.delta();
            grid.offset(door.row, door.col, dr, dc)
                .is_some_and(|(r, c)| grid.flags(r, c).is_open())
        });
        assert!(beside_open, "door at ({}, {}) leads nowhere", door.row, door.col);
    }
}

/// Rooms holding `door`, with the wall it sits on
fn holders(dungeon: &Dungeon, door: &Door) -> Vec<(u16, Direction)> {
    let mut found = Vec::new();
    for room in dungeon.rooms() {
        for (dir, list) in &room.doors {
            for held in list {
                if held == door {
                    found.push((room.id, *dir));
                }
            }
        }
    }
    found
}

pub fn check_door_links(dungeon: &Dungeon) {
    let mut entries = 0;
    for room in dungeon.rooms() {
        for list in room.doors.values() {
            assert!(!list.is_empty(), "room {} has an empty wall entry", room.id);
            entries += list.len();
            for door in list {
                assert!(dungeon.doors().contains(door), "room {} holds an unlisted door", room.id);
            }
        }
    }

    let mut expected = 0;
    for door in dungeon.doors() {
        let found = holders(dungeon, door);
        match door.out_id {
            None => {
                assert_eq!(found.len(), 1, "corridor door {:?} held by {:?}", door, found);
                expected += 1;
            }
            Some(out_id) => {
                assert_eq!(found.len(), 2, "linked door {:?} held by {:?}", door, found);
                let (a, dir_a) = found[0];
                let (b, dir_b) = found[1];
                assert_ne!(a, b);
                assert!(a == out_id || b == out_id);
                assert_eq!(dir_a.opposite(), dir_b);
                expected += 2;
            }
        }
    }
    assert_eq!(entries, expected);
}

pub fn check_stairs(dungeon: &Dungeon) {
    let grid = dungeon.grid();
    for (n, stair) in dungeon.stairs().iter().enumerate() {
        let cell = grid.cell(stair.row, stair.col);
        assert!(cell.flags.contains(stair.kind.cell_flag()));
        assert!(cell.flags.contains(CellFlags::CORRIDOR));
        assert_eq!(cell.label, Some(stair.kind.label()));

        let step = stair.row.abs_diff(stair.next_row) + stair.col.abs_diff(stair.next_col);
        assert_eq!(step, 1, "stair {} does not face a neighbour", n);
    }
}

/// Pure corridor cells that still end in a wall
pub fn dead_ends(dungeon: &Dungeon) -> Vec<(usize, usize)> {
    let grid = dungeon.grid();
    grid.cells()
        .filter(|(_, _, cell)| cell.flags.is_pure_corridor())
        .filter(|&(r, c, _)| Direction::all().any(|dir| dir.close_end().check.matches(grid, r, c)))
        .map(|(r, c, _)| (r, c))
        .collect()
}

/// FNV-1a over every cell's flags, room id and label, row-major
pub fn fingerprint(dungeon: &Dungeon) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for (_, _, cell) in dungeon.grid().cells() {
        let label = cell.label.map_or(0, u32::from);
        for value in [u64::from(cell.flags.bits()), u64::from(cell.room_id), u64::from(label)] {
            hash = (hash ^ value).wrapping_mul(0x0100_0000_01b3);
        }
    }
    hash
}
