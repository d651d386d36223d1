//! Keyboard input collection for one rendered frame.

use app::keys::HeldKeys;
use labyrinth::{Controls, Direction};
use macroquad::prelude::{KeyCode, get_keys_down, is_key_pressed};

#[derive(Default)]
pub struct FrameInput {
    pub held: Vec<Direction>,
    /// New maze (or the same level again).
    pub restart: bool,
    /// Next catalog level after a win.
    pub advance_level: bool,
}

pub fn capture_frame_input(controls: &Controls) -> FrameInput {
    let down: Vec<KeyCode> = get_keys_down().into_iter().collect();
    FrameInput {
        held: controls.held_directions(&HeldKeys(&down)),
        restart: is_key_pressed(KeyCode::R),
        advance_level: is_key_pressed(KeyCode::Enter) || is_key_pressed(KeyCode::N),
    }
}
