//! Binding names (`"ArrowUp"`, `"KeyW"`, `"Digit1"`) to macroquad key codes.

use labyrinth::{Controls, Direction, KeyState};
use macroquad::prelude::KeyCode;

pub fn key_code_for(name: &str) -> Option<KeyCode> {
    let code = match name {
        "ArrowUp" => KeyCode::Up,
        "ArrowDown" => KeyCode::Down,
        "ArrowLeft" => KeyCode::Left,
        "ArrowRight" => KeyCode::Right,
        "Space" => KeyCode::Space,
        "Enter" => KeyCode::Enter,
        "KeyA" => KeyCode::A,
        "KeyB" => KeyCode::B,
        "KeyC" => KeyCode::C,
        "KeyD" => KeyCode::D,
        "KeyE" => KeyCode::E,
        "KeyF" => KeyCode::F,
        "KeyG" => KeyCode::G,
        "KeyH" => KeyCode::H,
        "KeyI" => KeyCode::I,
        "KeyJ" => KeyCode::J,
        "KeyK" => KeyCode::K,
        "KeyL" => KeyCode::L,
        "KeyM" => KeyCode::M,
        "KeyN" => KeyCode::N,
        "KeyO" => KeyCode::O,
        "KeyP" => KeyCode::P,
        "KeyQ" => KeyCode::Q,
        "KeyR" => KeyCode::R,
        "KeyS" => KeyCode::S,
        "KeyT" => KeyCode::T,
        "KeyU" => KeyCode::U,
        "KeyV" => KeyCode::V,
        "KeyW" => KeyCode::W,
        "KeyX" => KeyCode::X,
        "KeyY" => KeyCode::Y,
        "KeyZ" => KeyCode::Z,
        "Digit0" => KeyCode::Key0,
        "Digit1" => KeyCode::Key1,
        "Digit2" => KeyCode::Key2,
        "Digit3" => KeyCode::Key3,
        "Digit4" => KeyCode::Key4,
        "Digit5" => KeyCode::Key5,
        "Digit6" => KeyCode::Key6,
        "Digit7" => KeyCode::Key7,
        "Digit8" => KeyCode::Key8,
        "Digit9" => KeyCode::Key9,
        _ => return None,
    };
    Some(code)
}

/// Bound names the window layer cannot report.
pub fn unmapped_bindings(controls: &Controls) -> Vec<String> {
    Direction::ALL
        .into_iter()
        .flat_map(|direction| controls.keys_for(direction).iter())
        .filter(|name| key_code_for(name).is_none())
        .cloned()
        .collect()
}

/// Key state backed by a set of held key codes.
pub struct HeldKeys<'a>(pub &'a [KeyCode]);

impl KeyState for HeldKeys<'_> {
    fn is_held(&self, key: &str) -> bool {
        key_code_for(key).is_some_and(|code| self.0.contains(&code))
    }
}
