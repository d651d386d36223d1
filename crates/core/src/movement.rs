//! Player movement against the grid: one-cell tile steps and continuous dashes.
//!
//! Both flavours report their side effects as [`TickEvent`]s pushed onto the caller's
//! buffer and return whether the open exit was reached.

use tracing::trace;

use crate::config::SessionConfig;
use crate::geom::{PixelPos, cell_center, pixel_to_cell};
use crate::maze::MazeGrid;
use crate::player::Player;
use crate::types::{Direction, Pos, TickEvent};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Goal {
    pub end: Pos,
    pub key_required: bool,
}

impl Goal {
    pub fn is_open(self, has_key: bool) -> bool {
        !self.key_required || has_key
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DashMotion {
    pub step_px: f32,
    pub radius: f32,
    pub cell_size: f32,
}

impl DashMotion {
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            step_px: config.dash_step_px(),
            radius: config.collision_radius(),
            cell_size: config.cell_size_px,
        }
    }
}

/// Shift the player one cell. Walls and out-of-bounds targets leave the player in place.
pub fn step_tile(
    grid: &mut MazeGrid,
    goal: Goal,
    player: &mut Player,
    direction: Direction,
    cell_size: f32,
    tick: u64,
    events: &mut Vec<TickEvent>,
) -> bool {
    let target = player.pos.step(direction);
    if grid.is_wall(target) {
        trace!(?target, ?direction, "tile step blocked");
        events.push(TickEvent::WallBump { at: player.pos, direction });
        return false;
    }
    player.place(target, cell_size, tick);
    events.push(TickEvent::PlayerMoved { to: target });
    enter_cell(grid, goal, player, events)
}

/// Start a dash from a standstill. Ignored while a dash is already under way.
pub fn launch_dash(
    grid: &MazeGrid,
    player: &mut Player,
    direction: Direction,
    cell_size: f32,
    events: &mut Vec<TickEvent>,
) -> bool {
    if player.is_dashing() {
        return false;
    }
    if grid.is_wall(player.pos.step(direction)) {
        trace!(at = ?player.pos, ?direction, "dash launch blocked");
        events.push(TickEvent::WallBump { at: player.pos, direction });
        return false;
    }
    let lane = cell_center(player.pos, cell_size);
    if direction.is_horizontal() {
        player.pixel.y = lane.y;
    } else {
        player.pixel.x = lane.x;
    }
    player.dash = Some(direction);
    events.push(TickEvent::DashLaunched { direction });
    true
}

/// Carry an active dash forward by one tick of travel.
pub fn advance_dash(
    grid: &mut MazeGrid,
    goal: Goal,
    player: &mut Player,
    motion: DashMotion,
    tick: u64,
    events: &mut Vec<TickEvent>,
) -> bool {
    let Some(direction) = player.dash else {
        return false;
    };
    let sign = axis_sign(direction);
    let (_, stop) = dash_stop(grid, player.pos, direction, motion.radius, motion.cell_size);
    let current = axis_value(player.pixel, direction);
    let remaining = (stop - current) * sign;
    let arrived = remaining <= motion.step_px;
    let next = if arrived { stop } else { current + sign * motion.step_px };
    set_axis_value(&mut player.pixel, direction, next);

    let target = pixel_to_cell(player.pixel, motion.cell_size);
    let mut reached = false;
    let crossed = player.pos.manhattan(target);
    for _ in 0..crossed {
        let cell = player.pos.step(direction);
        player.enter(cell, tick);
        reached |= enter_cell(grid, goal, player, events);
    }
    if crossed > 0 {
        events.push(TickEvent::PlayerMoved { to: player.pos });
    }
    if arrived {
        player.dash = None;
        events.push(TickEvent::DashStopped { at: player.pos });
    }
    reached
}

/// Last open cell along the ray from `from`, and the axis coordinate at which a circle of
/// `radius` rests flush against the wall face beyond it.
pub fn dash_stop(
    grid: &MazeGrid,
    from: Pos,
    direction: Direction,
    radius: f32,
    cell_size: f32,
) -> (Pos, f32) {
    let mut last = from;
    while grid.is_path(last.step(direction)) {
        last = last.step(direction);
    }
    let face = match direction {
        Direction::Right => (last.x + 1) as f32 * cell_size,
        Direction::Left => last.x as f32 * cell_size,
        Direction::Down => (last.y + 1) as f32 * cell_size,
        Direction::Up => last.y as f32 * cell_size,
    };
    (last, face - axis_sign(direction) * radius)
}

fn enter_cell(
    grid: &mut MazeGrid,
    goal: Goal,
    player: &mut Player,
    events: &mut Vec<TickEvent>,
) -> bool {
    let at = player.pos;
    if grid.take_key(at) {
        player.has_key = true;
        events.push(TickEvent::KeyPickup { at });
    }
    if at != goal.end {
        return false;
    }
    if goal.is_open(player.has_key) {
        events.push(TickEvent::GoalTouched { at });
        true
    } else {
        events.push(TickEvent::ExitLocked { at });
        false
    }
}

fn axis_sign(direction: Direction) -> f32 {
    let (dx, dy) = direction.delta();
    (dx + dy) as f32
}

fn axis_value(pixel: PixelPos, direction: Direction) -> f32 {
    if direction.is_horizontal() { pixel.x } else { pixel.y }
}

fn set_axis_value(pixel: &mut PixelPos, direction: Direction, value: f32) {
    if direction.is_horizontal() {
        pixel.x = value;
    } else {
        pixel.y = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{PHYSICS_EPSILON, circle_hits_wall};
    use crate::level::{Level, LevelLegend, parse_level};

    const CELL: f32 = 20.0;

    fn fixture(rows: &[&str]) -> (MazeGrid, Goal, Player) {
        let level = Level::new(1, "fixture", rows);
        let parsed = parse_level(&level, &LevelLegend::default()).expect("fixture parses");
        let goal = Goal { end: parsed.end, key_required: parsed.key.is_some() };
        let player = Player::spawn(parsed.start, CELL, 8);
        (parsed.grid, goal, player)
    }

    fn motion() -> DashMotion {
        DashMotion { step_px: 12.0, radius: 7.0, cell_size: CELL }
    }

    #[test]
    fn step_into_wall_bumps_without_moving() {
        let (mut grid, goal, mut player) = fixture(&["#####", "#S.E#", "#####"]);
        let mut events = Vec::new();
        let reached = step_tile(&mut grid, goal, &mut player, Direction::Up, CELL, 1, &mut events);
        assert!(!reached);
        assert_eq!(player.pos, Pos::new(1, 1));
        let bump = TickEvent::WallBump { at: Pos::new(1, 1), direction: Direction::Up };
        assert_eq!(events, vec![bump]);
    }

    #[test]
    fn exit_stays_locked_until_key_is_held() {
        let (mut grid, goal, mut player) = fixture(&["#######", "#.S.EK#", "#######"]);
        let mut events = Vec::new();
        for tick in 1..=2 {
            step_tile(&mut grid, goal, &mut player, Direction::Right, CELL, tick, &mut events);
        }
        assert!(events.contains(&TickEvent::ExitLocked { at: Pos::new(4, 1) }));
        assert!(!step_tile(&mut grid, goal, &mut player, Direction::Right, CELL, 3, &mut events));
        assert!(events.contains(&TickEvent::KeyPickup { at: Pos::new(5, 1) }));
        assert!(!events.iter().any(|event| matches!(event, TickEvent::GoalTouched { .. })));
        events.clear();
        assert!(step_tile(&mut grid, goal, &mut player, Direction::Left, CELL, 4, &mut events));
        assert_eq!(events.last(), Some(&TickEvent::GoalTouched { at: Pos::new(4, 1) }));
    }

    #[test]
    fn dash_stops_flush_against_the_first_wall() {
        let (mut grid, goal, mut player) = fixture(&["#######", "#S....#", "#####E#", "#######"]);
        let mut events = Vec::new();
        assert!(launch_dash(&grid, &mut player, Direction::Right, CELL, &mut events));
        let mut ticks = 0;
        while player.is_dashing() {
            ticks += 1;
            advance_dash(&mut grid, goal, &mut player, motion(), ticks, &mut events);
            assert!(!circle_hits_wall(&grid, player.pixel, 7.0, CELL));
            assert!(ticks < 20, "dash never stopped");
        }
        assert_eq!(player.pos, Pos::new(5, 1));
        let wall_face = 6.0 * CELL;
        assert!((wall_face - player.pixel.x - 7.0).abs() <= PHYSICS_EPSILON);
        assert_eq!(events.last(), Some(&TickEvent::DashStopped { at: Pos::new(5, 1) }));
    }

    #[test]
    fn dash_into_adjacent_wall_is_rejected() {
        let (grid, _, mut player) = fixture(&["#####", "#S.E#", "#####"]);
        let mut events = Vec::new();
        assert!(!launch_dash(&grid, &mut player, Direction::Left, CELL, &mut events));
        assert!(!player.is_dashing());
        let bump = TickEvent::WallBump { at: Pos::new(1, 1), direction: Direction::Left };
        assert_eq!(events, vec![bump]);
    }

    #[test]
    fn dash_collects_the_key_and_finishes_through_the_exit() {
        let (mut grid, goal, mut player) = fixture(&["#######", "#S.K.E#", "#######"]);
        let mut events = Vec::new();
        launch_dash(&grid, &mut player, Direction::Right, CELL, &mut events);
        let mut reached = false;
        let mut tick = 0;
        while player.is_dashing() {
            tick += 1;
            reached |= advance_dash(&mut grid, goal, &mut player, motion(), tick, &mut events);
        }
        assert!(reached);
        assert!(player.has_key);
        assert!(events.contains(&TickEvent::GoalTouched { at: Pos::new(5, 1) }));
    }

    #[test]
    fn stop_coordinate_accounts_for_direction() {
        let (grid, _, _) = fixture(&["#####", "#S..#", "#..E#", "#####"]);
        let (last, stop) = dash_stop(&grid, Pos::new(3, 2), Direction::Left, 7.0, CELL);
        assert_eq!(last, Pos::new(1, 2));
        assert!((stop - 27.0).abs() < 1e-4);
        let (last, stop) = dash_stop(&grid, Pos::new(1, 1), Direction::Down, 7.0, CELL);
        assert_eq!(last, Pos::new(1, 2));
        assert!((stop - 53.0).abs() < 1e-4);
    }
}
