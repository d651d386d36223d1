//! Randomized perfect-maze generation split into sizing, carving and marker placement.

mod carve;
mod generator;
mod size;

pub use generator::{GeneratedMaze, MazeGenerator};
pub use size::{MazeSize, SizeError, SizePreset};
