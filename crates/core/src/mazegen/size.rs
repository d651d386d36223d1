//! Caller-boundary validation of generator requests.

use std::fmt;

pub const MIN_MAZE_SIZE: u32 = 5;
pub const MAX_MAZE_SIZE: u32 = 101;
pub const DEFAULT_MAZE_SIZE: u32 = 15;

/// Odd edge length in `[MIN_MAZE_SIZE, MAX_MAZE_SIZE]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MazeSize(u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SizeError {
    Even(u32),
    TooSmall(u32),
    TooLarge(u32),
}

impl fmt::Display for SizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Even(size) => write!(f, "maze size {size} must be odd"),
            Self::TooSmall(size) => write!(f, "maze size {size} is below {MIN_MAZE_SIZE}"),
            Self::TooLarge(size) => write!(f, "maze size {size} is above {MAX_MAZE_SIZE}"),
        }
    }
}

impl std::error::Error for SizeError {}

impl MazeSize {
    pub fn new(size: u32) -> Result<Self, SizeError> {
        if size < MIN_MAZE_SIZE {
            return Err(SizeError::TooSmall(size));
        }
        if size > MAX_MAZE_SIZE {
            return Err(SizeError::TooLarge(size));
        }
        if size % 2 == 0 {
            return Err(SizeError::Even(size));
        }
        Ok(Self(size))
    }

    /// Round up to the next odd size and clamp into range.
    pub fn rounded_up(size: u32) -> Self {
        let clamped = size.clamp(MIN_MAZE_SIZE, MAX_MAZE_SIZE);
        Self(if clamped % 2 == 0 { clamped + 1 } else { clamped })
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn cells(self) -> usize {
        self.0 as usize
    }
}

impl Default for MazeSize {
    fn default() -> Self {
        Self(DEFAULT_MAZE_SIZE)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SizePreset {
    Small,
    Medium,
    Large,
}

impl SizePreset {
    pub const ALL: [SizePreset; 3] = [SizePreset::Small, SizePreset::Medium, SizePreset::Large];

    pub fn size(self) -> MazeSize {
        match self {
            Self::Small => MazeSize(11),
            Self::Medium => MazeSize(15),
            Self::Large => MazeSize(21),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Small => "Small (11x11)",
            Self::Medium => "Medium (15x15)",
            Self::Large => "Large (21x21)",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_even_small_and_large_sizes() {
        assert_eq!(MazeSize::new(4), Err(SizeError::TooSmall(4)));
        assert_eq!(MazeSize::new(3), Err(SizeError::TooSmall(3)));
        assert_eq!(MazeSize::new(12), Err(SizeError::Even(12)));
        assert_eq!(MazeSize::new(103), Err(SizeError::TooLarge(103)));
        assert_eq!(MazeSize::new(5).map(MazeSize::get), Ok(5));
    }

    #[test]
    fn rounding_up_always_yields_a_valid_size() {
        assert_eq!(MazeSize::rounded_up(0).get(), 5);
        assert_eq!(MazeSize::rounded_up(6).get(), 7);
        assert_eq!(MazeSize::rounded_up(9).get(), 9);
        assert_eq!(MazeSize::rounded_up(500).get(), MAX_MAZE_SIZE);
        for raw in 0..120 {
            let size = MazeSize::rounded_up(raw).get();
            assert!(MazeSize::new(size).is_ok(), "{raw} rounded to invalid {size}");
        }
    }

    #[test]
    fn presets_are_valid_sizes() {
        for preset in SizePreset::ALL {
            assert!(MazeSize::new(preset.size().get()).is_ok(), "{}", preset.label());
        }
    }
}
