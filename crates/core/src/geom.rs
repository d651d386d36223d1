//! Continuous-space helpers: pixel coordinates and circle-versus-wall-cell overlap.

use serde::{Deserialize, Serialize};

use crate::maze::MazeGrid;
use crate::types::Pos;

pub const PHYSICS_EPSILON: f32 = 1e-3;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PixelPos {
    pub x: f32,
    pub y: f32,
}

impl PixelPos {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Self) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

#[must_use]
pub fn cell_center(pos: Pos, cell_size: f32) -> PixelPos {
    PixelPos::new((pos.x as f32 + 0.5) * cell_size, (pos.y as f32 + 0.5) * cell_size)
}

#[must_use]
pub fn pixel_to_cell(pixel: PixelPos, cell_size: f32) -> Pos {
    Pos { y: (pixel.y / cell_size).floor() as i32, x: (pixel.x / cell_size).floor() as i32 }
}

/// Strict overlap: a circle resting flush against a wall face does not collide.
#[must_use]
pub fn circle_overlaps_cell(center: PixelPos, radius: f32, cell: Pos, cell_size: f32) -> bool {
    let min_x = cell.x as f32 * cell_size;
    let min_y = cell.y as f32 * cell_size;
    let nearest_x = center.x.clamp(min_x, min_x + cell_size);
    let nearest_y = center.y.clamp(min_y, min_y + cell_size);
    let dx = center.x - nearest_x;
    let dy = center.y - nearest_y;
    dx.mul_add(dx, dy * dy) + PHYSICS_EPSILON < radius * radius
}

/// Whether a circle overlaps any wall cell; cells outside the grid count as walls.
#[must_use]
pub fn circle_hits_wall(grid: &MazeGrid, center: PixelPos, radius: f32, cell_size: f32) -> bool {
    let min = pixel_to_cell(PixelPos::new(center.x - radius, center.y - radius), cell_size);
    let max = pixel_to_cell(PixelPos::new(center.x + radius, center.y + radius), cell_size);
    for y in min.y..=max.y {
        for x in min.x..=max.x {
            let cell = Pos { y, x };
            if grid.is_wall(cell) && circle_overlaps_cell(center, radius, cell, cell_size) {
                return true;
            }
        }
    }
    false
}
