//! Simulation tunables shared by every session.

use serde::{Deserialize, Serialize};

pub const DEFAULT_TICK_RATE_HZ: u32 = 30;
pub const CELL_SIZE_PX: f32 = 20.0;
pub const RADIUS_FACTOR: f32 = 0.35;
pub const HUNTER_CONTINUOUS_SPEED_PX_PER_SEC: f32 = 85.0;
pub const DASH_SPEED_PX_PER_SEC: f32 = 360.0;
pub const TILE_HUNTER_STEP_TICKS: u32 = 10;
pub const PLAYER_TRAIL_LENGTH: usize = 8;
pub const TRAIL_FADE_RATE: f32 = 0.15;
pub const TRAIL_UPDATE_INTERVAL_MS: u32 = 45;
pub const TIME_LOW_THRESHOLD_SECS: u32 = 10;
pub const DARKNESS_LIGHT_RADIUS_CELLS: f32 = 2.5;
pub const MAX_TICKS_PER_FRAME: u32 = 8;
pub const INPUT_BUFFER_CAPACITY: usize = 4;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub tick_rate_hz: u32,
    pub cell_size_px: f32,
    pub radius_factor: f32,
    pub hunter_speed_px_per_sec: f32,
    pub dash_speed_px_per_sec: f32,
    pub tile_hunter_step_ticks: u32,
    pub trail_length: usize,
    pub trail_fade_rate: f32,
    pub trail_update_interval_ms: u32,
    pub time_low_threshold_secs: u32,
    pub darkness_light_radius_cells: f32,
    pub max_ticks_per_frame: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: DEFAULT_TICK_RATE_HZ,
            cell_size_px: CELL_SIZE_PX,
            radius_factor: RADIUS_FACTOR,
            hunter_speed_px_per_sec: HUNTER_CONTINUOUS_SPEED_PX_PER_SEC,
            dash_speed_px_per_sec: DASH_SPEED_PX_PER_SEC,
            tile_hunter_step_ticks: TILE_HUNTER_STEP_TICKS,
            trail_length: PLAYER_TRAIL_LENGTH,
            trail_fade_rate: TRAIL_FADE_RATE,
            trail_update_interval_ms: TRAIL_UPDATE_INTERVAL_MS,
            time_low_threshold_secs: TIME_LOW_THRESHOLD_SECS,
            darkness_light_radius_cells: DARKNESS_LIGHT_RADIUS_CELLS,
            max_ticks_per_frame: MAX_TICKS_PER_FRAME,
        }
    }
}

impl SessionConfig {
    /// Override the logic tick rate, ignoring zero.
    pub fn with_tick_rate(mut self, tick_rate_hz: u32) -> Self {
        if tick_rate_hz > 0 {
            self.tick_rate_hz = tick_rate_hz;
        }
        self
    }

    pub fn tick_seconds(&self) -> f32 {
        1.0 / self.tick_rate_hz as f32
    }

    pub fn collision_radius(&self) -> f32 {
        self.cell_size_px * self.radius_factor
    }

    pub fn hunter_step_px(&self) -> f32 {
        self.hunter_speed_px_per_sec * self.tick_seconds()
    }

    pub fn dash_step_px(&self) -> f32 {
        self.dash_speed_px_per_sec * self.tick_seconds()
    }

    pub fn ticks_for_seconds(&self, seconds: u32) -> u64 {
        u64::from(seconds) * u64::from(self.tick_rate_hz)
    }

    pub fn ticks_to_seconds(&self, ticks: u64) -> f64 {
        ticks as f64 / f64::from(self.tick_rate_hz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_derive_per_tick_quantities() {
        let config = SessionConfig::default();
        assert!((config.collision_radius() - 7.0).abs() < 1e-4);
        assert!((config.dash_step_px() - 12.0).abs() < 1e-4);
        assert_eq!(config.ticks_for_seconds(10), 300);
        assert!((config.ticks_to_seconds(45) - 1.5).abs() < 1e-9);
    }

    #[test]
    fn zero_tick_rate_override_is_ignored() {
        let config = SessionConfig::default().with_tick_rate(0);
        assert_eq!(config.tick_rate_hz, DEFAULT_TICK_RATE_HZ);
        assert_eq!(SessionConfig::default().with_tick_rate(60).tick_rate_hz, 60);
    }
}
