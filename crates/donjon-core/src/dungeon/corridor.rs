//! Corridor carving
//!
//! A randomized depth-first maze walk over the half-grid. Every intersection
//! that is neither corridor nor masked off seeds a new walk, so unreachable
//! pockets between rooms still get their own maze.
//!
//! The walk keeps its own stack of frames instead of recursing. Each frame
//! draws its direction order when pushed, so the random stream is consumed
//! in the same order a recursive walk would consume it.

use tracing::{debug, trace};

use crate::config::CorridorLayout;
use crate::rng::DungeonRng;

use super::cell::CellFlags;
use super::direction::Direction;
use super::grid::{Grid, half_grid, intersection};

/// One step of the walk: an intersection and the directions left to try
#[derive(Debug)]
struct Frame {
    i: usize,
    j: usize,
    dirs: [Direction; 4],
    next: usize,
}

/// Carve corridors from every intersection; returns the number of tunnels dug
pub fn carve_corridors(grid: &mut Grid, layout: CorridorLayout, rng: &mut DungeonRng) -> usize {
    let bias = layout.straight_bias();
    let mut dug = 0;

    for (i, j) in half_grid(grid.half_rows(), grid.half_cols()) {
        let (r, c) = intersection(i, j);
        // A walk seeded inside the mask would leave corridor on BLOCKED cells
        if grid.has_any(r, c, CellFlags::CORRIDOR | CellFlags::BLOCKED) {
            continue;
        }
        dug += tunnel(grid, i, j, bias, rng);
    }

    debug!(dug, %layout, "carved corridors");
    dug
}

/// Walk from `(i, j)`; returns the number of tunnel segments opened
fn tunnel(grid: &mut Grid, i: usize, j: usize, bias: u32, rng: &mut DungeonRng) -> usize {
    let mut stack = vec![Frame {
        i,
        j,
        dirs: tunnel_dirs(None, bias, rng),
        next: 0,
    }];
    let mut opened = 0;

    while let Some(frame) = stack.last_mut() {
        let Some(&dir) = frame.dirs.get(frame.next) else {
            stack.pop();
            continue;
        };
        frame.next += 1;

        if let Some((ni, nj)) = open_tunnel(grid, frame.i, frame.j, dir) {
            opened += 1;
            stack.push(Frame {
                i: ni,
                j: nj,
                dirs: tunnel_dirs(Some(dir), bias, rng),
                next: 0,
            });
        }
    }
    opened
}

/// Order in which to try directions
///
/// Always a shuffle of all four. With a previous direction, one extra draw
/// decides whether that direction jumps to the front.
fn tunnel_dirs(last: Option<Direction>, bias: u32, rng: &mut DungeonRng) -> [Direction; 4] {
    let mut dirs = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];
    rng.shuffle(&mut dirs);

    if let Some(last) = last
        && rng.percent(bias)
        && let Some(pos) = dirs.iter().position(|&d| d == last)
    {
        dirs[..=pos].rotate_right(1);
    }
    dirs
}

/// Try to dig from intersection `(i, j)` toward `dir`
///
/// Returns the neighbouring intersection if the tunnel was dug.
fn open_tunnel(grid: &mut Grid, i: usize, j: usize, dir: Direction) -> Option<(usize, usize)> {
    let (di, dj) = dir.delta();
    let (this_r, this_c) = intersection(i, j);
    let next_r = (i as isize + di) * 2 + 1;
    let next_c = (j as isize + dj) * 2 + 1;

    if !grid.in_bounds(next_r, next_c) {
        return None;
    }
    let (next_r, next_c) = (next_r as usize, next_c as usize);
    let mid_r = (this_r + next_r) / 2;
    let mid_c = (this_c + next_c) / 2;

    if !sound_tunnel(grid, (mid_r, mid_c), (next_r, next_c)) {
        trace!(i, j, %dir, "tunnel blocked");
        return None;
    }
    delve_tunnel(grid, (this_r, this_c), (next_r, next_c));

    Some(((next_r - 1) / 2, (next_c - 1) / 2))
}

/// Every cell from `from` to `to` inclusive
fn span(from: (usize, usize), to: (usize, usize)) -> impl Iterator<Item = (usize, usize)> {
    let (r1, r2) = (from.0.min(to.0), from.0.max(to.0));
    let (c1, c2) = (from.1.min(to.1), from.1.max(to.1));
    (r1..=r2).flat_map(move |r| (c1..=c2).map(move |c| (r, c)))
}

/// Nothing on the way may be blocked, perimeter or already corridor
fn sound_tunnel(grid: &Grid, mid: (usize, usize), next: (usize, usize)) -> bool {
    span(mid, next).all(|(r, c)| !grid.has_any(r, c, CellFlags::BLOCK_CORR))
}

fn delve_tunnel(grid: &mut Grid, this: (usize, usize), next: (usize, usize)) {
    for (r, c) in span(this, next) {
        grid.clear(r, c, CellFlags::ENTRANCE);
        grid.set(r, c, CellFlags::CORRIDOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor_cells(grid: &Grid) -> usize {
        grid.cells()
            .filter(|(_, _, cell)| cell.flags.contains(CellFlags::CORRIDOR))
            .count()
    }

    #[test]
    fn test_empty_grid_becomes_full_maze() {
        let mut grid = Grid::new(10, 10);
        let mut rng = DungeonRng::new(7);

        let dug = carve_corridors(&mut grid, CorridorLayout::Labyrinth, &mut rng);

        // A spanning tree over 5x5 intersections
        assert_eq!(dug, 24);
        for (i, j) in half_grid(5, 5) {
            let (r, c) = intersection(i, j);
            assert!(grid.has(r, c, CellFlags::CORRIDOR), "({}, {}) not carved", r, c);
        }
        // Even-even cells are never dug
        assert!(!grid.has(2, 2, CellFlags::CORRIDOR));
        assert_eq!(corridor_cells(&grid), 25 + 24);
    }

    #[test]
    fn test_outer_border_untouched() {
        let mut grid = Grid::new(12, 16);
        let mut rng = DungeonRng::new(3);
        carve_corridors(&mut grid, CorridorLayout::Bent, &mut rng);

        for c in 0..=grid.cols() {
            assert!(!grid.has(0, c, CellFlags::CORRIDOR));
            assert!(!grid.has(grid.rows(), c, CellFlags::CORRIDOR));
        }
        for r in 0..=grid.rows() {
            assert!(!grid.has(r, 0, CellFlags::CORRIDOR));
            assert!(!grid.has(r, grid.cols(), CellFlags::CORRIDOR));
        }
    }

    #[test]
    fn test_masked_intersections_seed_nothing() {
        let mut grid = Grid::new(6, 6);
        for r in 0..=6 {
            for c in 0..=6 {
                grid.set(r, c, CellFlags::BLOCKED);
            }
        }
        let mut rng = DungeonRng::new(4);
        let mut untouched = DungeonRng::new(4);

        assert_eq!(carve_corridors(&mut grid, CorridorLayout::Bent, &mut rng), 0);
        assert_eq!(corridor_cells(&grid), 0);
        assert_eq!(rng.rn2(1000), untouched.rn2(1000));
    }

    #[test]
    fn test_perimeter_and_blocked_stop_tunnels() {
        let mut grid = Grid::new(10, 10);
        for r in 0..=10 {
            grid.set(r, 4, CellFlags::PERIMETER);
        }
        grid.set(7, 7, CellFlags::BLOCKED);
        let mut rng = DungeonRng::new(11);

        carve_corridors(&mut grid, CorridorLayout::Straight, &mut rng);

        for r in 0..=10 {
            assert_eq!(grid.flags(r, 4), CellFlags::PERIMETER);
        }
        assert_eq!(grid.flags(7, 7), CellFlags::BLOCKED);
        assert!(grid.has(1, 1, CellFlags::CORRIDOR));
        assert!(grid.has(1, 5, CellFlags::CORRIDOR));
    }

    #[test]
    fn test_delve_clears_entrance() {
        let mut grid = Grid::new(10, 10);
        grid.set(1, 2, CellFlags::ENTRANCE | CellFlags::DOOR);

        delve_tunnel(&mut grid, (1, 1), (1, 3));

        assert_eq!(grid.flags(1, 2), CellFlags::CORRIDOR | CellFlags::DOOR);
        assert!(grid.has(1, 1, CellFlags::CORRIDOR));
        assert!(grid.has(1, 3, CellFlags::CORRIDOR));
    }

    #[test]
    fn test_open_tunnel_rejects_leaving_grid() {
        let mut grid = Grid::new(10, 10);
        assert_eq!(open_tunnel(&mut grid, 0, 0, Direction::North), None);
        assert_eq!(open_tunnel(&mut grid, 4, 4, Direction::East), None);
        assert_eq!(open_tunnel(&mut grid, 0, 0, Direction::East), Some((0, 1)));
    }

    #[test]
    fn test_straight_bias_keeps_direction() {
        let mut rng = DungeonRng::new(5);
        for last in Direction::all() {
            for _ in 0..20 {
                let dirs = tunnel_dirs(Some(last), 100, &mut rng);
                assert_eq!(dirs[0], last);
                let mut sorted = dirs;
                sorted.sort();
                assert_eq!(sorted, [Direction::North, Direction::South, Direction::West, Direction::East]);
            }
        }
    }

    #[test]
    fn test_same_seed_same_maze() {
        let carve = |seed| {
            let mut grid = Grid::new(30, 30);
            let mut rng = DungeonRng::new(seed);
            carve_corridors(&mut grid, CorridorLayout::Bent, &mut rng);
            grid
        };
        assert_eq!(carve(99), carve(99));
    }
}
