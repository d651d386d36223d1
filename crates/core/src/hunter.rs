//! Pursuit for hunters: discrete tile stepping over a shared distance field, and
//! continuous chasing with per-axis wall sliding.

use tracing::trace;

use crate::geom::{PixelPos, cell_center, circle_hits_wall, pixel_to_cell};
use crate::maze::{DistanceField, MazeGrid};
use crate::types::{Direction, HunterId, HunterMovement, Pos};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HunterRules {
    pub movement: HunterMovement,
    pub phases_through_walls: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Hunter {
    pub id: HunterId,
    pub spawn: Pos,
    pub pos: Pos,
    /// Only meaningful for continuous hunters; tile hunters keep it on their cell centre.
    pub pixel: PixelPos,
}

impl Hunter {
    pub fn spawn(id: HunterId, pos: Pos, cell_size: f32) -> Self {
        Self { id, spawn: pos, pos, pixel: cell_center(pos, cell_size) }
    }
}

/// Distances to the pursued cell. Built once per tick and shared by every tile hunter.
pub enum PursuitField {
    Manhattan { target: Pos },
    Paths { target: Pos, field: DistanceField },
}

impl PursuitField {
    pub fn build(grid: &MazeGrid, target: Pos, phases_through_walls: bool) -> Self {
        if phases_through_walls {
            Self::Manhattan { target }
        } else {
            Self::Paths { target, field: grid.distances_from(target) }
        }
    }

    /// Path distance where one exists, Manhattan otherwise.
    pub fn distance(&self, from: Pos) -> u32 {
        match self {
            Self::Manhattan { target } => from.manhattan(*target),
            Self::Paths { target, field } => {
                field.get(from).unwrap_or_else(|| from.manhattan(*target))
            }
        }
    }
}

/// Move one cell toward the target if some neighbour strictly shortens the distance.
/// Ties go to the first candidate in [`Direction::ALL`].
pub fn step_tile_hunter(
    hunter: &mut Hunter,
    grid: &MazeGrid,
    field: &PursuitField,
    rules: HunterRules,
    cell_size: f32,
) -> bool {
    let mut best: Option<Pos> = None;
    let mut best_distance = field.distance(hunter.pos);
    for direction in Direction::ALL {
        let candidate = hunter.pos.step(direction);
        let blocked = if rules.phases_through_walls {
            !grid.in_bounds(candidate)
        } else {
            grid.is_wall(candidate)
        };
        if blocked {
            continue;
        }
        let distance = field.distance(candidate);
        if distance < best_distance {
            best_distance = distance;
            best = Some(candidate);
        }
    }
    let Some(next) = best else {
        return false;
    };
    trace!(hunter = ?hunter.id, from = ?hunter.pos, to = ?next, "tile hunter step");
    hunter.pos = next;
    hunter.pixel = cell_center(next, cell_size);
    true
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChaseMotion {
    pub step_px: f32,
    pub radius: f32,
    pub cell_size: f32,
}

/// Advance along the straight line to `target`. Without phasing, each axis is tried on its
/// own and dropped if it would push the body into a wall.
pub fn step_continuous_hunter(
    hunter: &mut Hunter,
    grid: &MazeGrid,
    target: PixelPos,
    rules: HunterRules,
    motion: ChaseMotion,
) -> bool {
    let dx = target.x - hunter.pixel.x;
    let dy = target.y - hunter.pixel.y;
    let distance = dx.hypot(dy);
    if distance <= f32::EPSILON {
        return false;
    }
    let travel = motion.step_px.min(distance);
    let move_x = dx / distance * travel;
    let move_y = dy / distance * travel;
    let before = hunter.pixel;

    if rules.phases_through_walls {
        let max_x = grid.width() as f32 * motion.cell_size - motion.radius;
        let max_y = grid.height() as f32 * motion.cell_size - motion.radius;
        hunter.pixel.x = (hunter.pixel.x + move_x).clamp(motion.radius, max_x);
        hunter.pixel.y = (hunter.pixel.y + move_y).clamp(motion.radius, max_y);
    } else {
        let along_x = PixelPos::new(hunter.pixel.x + move_x, hunter.pixel.y);
        if !circle_hits_wall(grid, along_x, motion.radius, motion.cell_size) {
            hunter.pixel = along_x;
        }
        let along_y = PixelPos::new(hunter.pixel.x, hunter.pixel.y + move_y);
        if !circle_hits_wall(grid, along_y, motion.radius, motion.cell_size) {
            hunter.pixel = along_y;
        }
    }
    hunter.pos = pixel_to_cell(hunter.pixel, motion.cell_size);
    hunter.pixel != before
}

/// Tile hunters catch from an adjacent cell; continuous hunters on body overlap.
pub fn is_capture(
    hunter: &Hunter,
    player_pos: Pos,
    player_pixel: PixelPos,
    movement: HunterMovement,
    capture_distance_px: f32,
) -> bool {
    match movement {
        HunterMovement::Tile => hunter.pos.manhattan(player_pos) <= 1,
        HunterMovement::Continuous => hunter.pixel.distance(player_pixel) < capture_distance_px,
    }
}
