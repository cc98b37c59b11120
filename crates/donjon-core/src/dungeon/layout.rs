//! Layout masks
//!
//! Blocks out cells before anything is placed so the dungeon takes the shape
//! of its layout. Later collision checks treat BLOCKED as impassable.

use crate::config::DungeonLayout;

use super::cell::CellFlags;
use super::grid::Grid;

type Template = [[u8; 3]; 3];

const BOX: Template = [[1, 1, 1], [1, 0, 1], [1, 1, 1]];
const CROSS: Template = [[0, 1, 0], [1, 1, 1], [0, 1, 0]];

impl DungeonLayout {
    /// Scaled template for the mask, `None` for computed shapes
    pub const fn template(self) -> Option<&'static Template> {
        match self {
            DungeonLayout::Box => Some(&BOX),
            DungeonLayout::Cross => Some(&CROSS),
            DungeonLayout::Round => None,
        }
    }
}

/// Apply the layout to a fresh grid; returns the number of blocked cells
pub fn apply_layout(grid: &mut Grid, layout: Option<DungeonLayout>) -> usize {
    let Some(layout) = layout else {
        return 0;
    };
    match layout.template() {
        Some(template) => mask_cells(grid, template),
        None => round_mask(grid),
    }
}

/// Nearest-neighbour scale of the template over the whole grid
fn mask_cells(grid: &mut Grid, template: &Template) -> usize {
    let r_scale = template.len() as f64 / (grid.rows() + 1) as f64;
    let c_scale = template[0].len() as f64 / (grid.cols() + 1) as f64;
    let mut blocked = 0;

    for r in 0..=grid.rows() {
        for c in 0..=grid.cols() {
            let tr = (r as f64 * r_scale) as usize;
            let tc = (c as f64 * c_scale) as usize;
            if template[tr][tc] == 0 {
                grid.set(r, c, CellFlags::BLOCKED);
                blocked += 1;
            }
        }
    }
    blocked
}

/// Block everything further from the centre than half the width
fn round_mask(grid: &mut Grid) -> usize {
    let center_r = (grid.rows() / 2) as f64;
    let center_c = (grid.cols() / 2) as f64;
    let radius = grid.cols() / 2;
    let mut blocked = 0;

    for r in 0..=grid.rows() {
        for c in 0..=grid.cols() {
            let dr = r as f64 - center_r;
            let dc = c as f64 - center_c;
            let distance = (dr * dr + dc * dc).sqrt() as usize;
            if distance > radius {
                grid.set(r, c, CellFlags::BLOCKED);
                blocked += 1;
            }
        }
    }
    blocked
}
