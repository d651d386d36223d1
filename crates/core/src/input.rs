//! Rebindable key-to-direction bindings. Keys are plain names (`"ArrowUp"`, `"KeyW"`) so
//! the shell can map whatever its windowing layer reports.

use serde::{Deserialize, Serialize};

use crate::types::Direction;

/// Something that can answer "is this key held right now".
pub trait KeyState {
    fn is_held(&self, key: &str) -> bool;
}

impl<F> KeyState for F
where
    F: Fn(&str) -> bool,
{
    fn is_held(&self, key: &str) -> bool {
        self(key)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Controls {
    pub up: Vec<String>,
    pub down: Vec<String>,
    pub left: Vec<String>,
    pub right: Vec<String>,
}

impl Default for Controls {
    fn default() -> Self {
        fn keys(names: &[&str]) -> Vec<String> {
            names.iter().map(|name| (*name).to_string()).collect()
        }
        Self {
            up: keys(&["ArrowUp", "KeyW"]),
            down: keys(&["ArrowDown", "KeyS"]),
            left: keys(&["ArrowLeft", "KeyA"]),
            right: keys(&["ArrowRight", "KeyD"]),
        }
    }
}

impl Controls {
    pub fn keys_for(&self, direction: Direction) -> &[String] {
        match direction {
            Direction::Up => &self.up,
            Direction::Down => &self.down,
            Direction::Left => &self.left,
            Direction::Right => &self.right,
        }
    }

    /// Replace the bindings of one direction, unbinding those keys everywhere else.
    pub fn rebind(&mut self, direction: Direction, keys: Vec<String>) {
        for other in Direction::ALL {
            if other != direction {
                self.keys_for_mut(other).retain(|key| !keys.contains(key));
            }
        }
        *self.keys_for_mut(direction) = keys;
    }

    pub fn direction_for_key(&self, key: &str) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|&direction| self.keys_for(direction).iter().any(|bound| bound == key))
    }

    /// Directions whose bindings are currently held, in [`Direction::ALL`] order.
    pub fn held_directions(&self, keys: &impl KeyState) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|&direction| self.keys_for(direction).iter().any(|key| keys.is_held(key)))
            .collect()
    }

    /// Keys bound to more than one direction.
    pub fn conflicts(&self) -> Vec<String> {
        let mut seen: Vec<&String> = Vec::new();
        let mut conflicts = Vec::new();
        for direction in Direction::ALL {
            for key in self.keys_for(direction) {
                if seen.contains(&key) && !conflicts.contains(key) {
                    conflicts.push(key.clone());
                }
            }
            seen.extend(self.keys_for(direction));
        }
        conflicts
    }

    fn keys_for_mut(&mut self, direction: Direction) -> &mut Vec<String> {
        match direction {
            Direction::Up => &mut self.up,
            Direction::Down => &mut self.down,
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
        }
    }
}
