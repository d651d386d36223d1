//! Drawing for the status bar and the maze board.

use app::app_loop::{AppMode, AppState};
use app::layout::{BoardTransform, FrameLayout, PanelRect};
use app::{format_elapsed, mode_label, outcome_headline, reason_code};
use labyrinth::fx::{hunter_pulse, light_radius_px, time_is_low};
use labyrinth::geom::cell_center;
use labyrinth::{Session, SessionSource};
use macroquad::prelude::*;

const WALL_COLOR: Color = Color { r: 0.12, g: 0.13, b: 0.2, a: 1.0 };
const FLOOR_COLOR: Color = Color { r: 0.03, g: 0.03, b: 0.06, a: 1.0 };
const PLAYER_COLOR: Color = Color { r: 0.35, g: 0.85, b: 1.0, a: 1.0 };
const HUNTER_COLOR: Color = Color { r: 1.0, g: 0.25, b: 0.3, a: 1.0 };
const KEY_COLOR: Color = Color { r: 1.0, g: 0.85, b: 0.2, a: 1.0 };
const EXIT_OPEN_COLOR: Color = Color { r: 0.2, g: 0.9, b: 0.45, a: 1.0 };
const EXIT_LOCKED_COLOR: Color = Color { r: 0.45, g: 0.45, b: 0.5, a: 1.0 };
const STATUS_FONT_SIZE: f32 = 24.0;

pub fn draw_frame(app: &AppState, layout: &FrameLayout, elapsed_seconds: f32) {
    let session = app.session();
    let grid = session.grid();
    let cell = session.config().cell_size_px;
    let transform =
        BoardTransform::fit(layout.board, grid.width() as f32 * cell, grid.height() as f32 * cell);

    draw_board(session, &transform, elapsed_seconds);
    draw_trail(session, &transform);
    draw_actors(session, &transform, elapsed_seconds);
    draw_status(session, layout.status);
    if let AppMode::Finished(outcome) = &app.mode {
        let headline = outcome_headline(outcome);
        let detail = format!(
            "{}  {}  [R] retry  [Enter] next",
            reason_code(outcome),
            format_elapsed(outcome.elapsed_time_seconds)
        );
        let (x, y) = (layout.board.x + 20.0, layout.board.y + layout.board.height / 2.0);
        let shade = Color::new(0.0, 0.0, 0.0, 0.75);
        draw_rectangle(layout.board.x, y - 40.0, layout.board.width, 70.0, shade);
        draw_text(headline, x, y, 36.0, WHITE);
        draw_text(&detail, x, y + 22.0, 18.0, LIGHTGRAY);
    }
}

fn draw_board(session: &Session, transform: &BoardTransform, elapsed_seconds: f32) {
    let grid = session.grid();
    let cell = session.config().cell_size_px;
    let size = transform.length(cell);
    let goal = session.goal();
    let exit_color =
        if goal.is_open(session.player().has_key) { EXIT_OPEN_COLOR } else { EXIT_LOCKED_COLOR };

    for pos in grid.positions() {
        if !session.is_lit(pos) {
            continue;
        }
        let (x, y) = transform.to_screen(cell_center(pos, cell));
        let (x, y) = (x - size / 2.0, y - size / 2.0);
        let color = if grid.is_wall(pos) { WALL_COLOR } else { FLOOR_COLOR };
        draw_rectangle(x, y, size, size, color);
        if pos == goal.end {
            draw_rectangle(x + size * 0.15, y + size * 0.15, size * 0.7, size * 0.7, exit_color);
        }
        if grid.cell(pos).is_some_and(|cell| cell.is_key) {
            let (cx, cy) = transform.to_screen(cell_center(pos, cell));
            draw_circle(cx, cy, size * 0.22, KEY_COLOR);
        }
    }

    if session.rules().darkness {
        let radius = transform.length(light_radius_px(
            session.config().darkness_light_radius_cells * cell,
            elapsed_seconds,
        ));
        let (px, py) = transform.to_screen(session.player().pixel);
        draw_circle_lines(px, py, radius, 2.0, Color::new(1.0, 0.9, 0.6, 0.25));
    }
}

fn draw_trail(session: &Session, transform: &BoardTransform) {
    let cell = session.config().cell_size_px;
    let size = transform.length(cell) * 0.3;
    for (pos, opacity) in session.trail_opacities() {
        if opacity <= 0.0 || !session.is_lit(pos) {
            continue;
        }
        let (x, y) = transform.to_screen(cell_center(pos, cell));
        draw_circle(x, y, size, Color { a: opacity * 0.6, ..PLAYER_COLOR });
    }
}

fn draw_actors(session: &Session, transform: &BoardTransform, elapsed_seconds: f32) {
    let config = session.config();
    let radius = transform.length(config.collision_radius());
    let player = session.player();

    for hunter in session.hunters() {
        if !session.is_lit(hunter.pos) {
            continue;
        }
        let distance = hunter.pixel.distance(player.pixel) / config.cell_size_px;
        let pulse = hunter_pulse(elapsed_seconds, distance);
        let (x, y) = transform.to_screen(hunter.pixel);
        draw_circle(x, y, radius * (1.0 + 0.25 * pulse), Color { a: 0.35 * pulse, ..HUNTER_COLOR });
        draw_circle(x, y, radius, HUNTER_COLOR);
    }

    let (x, y) = transform.to_screen(player.pixel);
    draw_circle(x, y, radius, PLAYER_COLOR);
    if player.has_key {
        draw_circle(x, y, radius * 0.35, KEY_COLOR);
    }
}

fn draw_status(session: &Session, panel: PanelRect) {
    let where_label = match session.source() {
        SessionSource::Level { id } => format!("Level {id}"),
        SessionSource::Generated { size, .. } => format!("{size}x{size}"),
    };
    let mut status = format!(
        "{}  {}  {}",
        mode_label(session.mode()),
        where_label,
        format_elapsed(session.elapsed_seconds())
    );
    if session.controls_mirrored() {
        status.push_str("  MIRRORED");
    }
    draw_text(&status, panel.x, panel.y + STATUS_FONT_SIZE, STATUS_FONT_SIZE, WHITE);

    if let Some(left) = session.time_left_secs() {
        let color = if time_is_low(left, session.config().time_low_threshold_secs) {
            HUNTER_COLOR
        } else {
            WHITE
        };
        let text = format!("{left}s");
        let width = measure_text(&text, None, STATUS_FONT_SIZE as u16, 1.0).width;
        let x = panel.x + panel.width - width;
        draw_text(&text, x, panel.y + STATUS_FONT_SIZE, STATUS_FONT_SIZE, color);
    }
}
