//! Presentation curves. Pure functions of elapsed time so the simulation never carries
//! animation state.

use std::f32::consts::TAU;

/// Opacity of a trail segment `age_ms` old: steps down by `fade_rate` every `interval_ms`.
pub fn trail_opacity(age_ms: u64, fade_rate: f32, interval_ms: u32) -> f32 {
    let steps = age_ms / u64::from(interval_ms.max(1));
    (1.0 - fade_rate * steps as f32).max(0.0)
}

/// Darkness light radius with a slow flicker of a few percent.
pub fn light_radius_px(base_radius_px: f32, elapsed_seconds: f32) -> f32 {
    base_radius_px * (1.0 + 0.04 * (elapsed_seconds * TAU * 0.5).sin())
}

/// Hunter glow in `[0, 1]`. Beats faster as the hunter closes in.
pub fn hunter_pulse(elapsed_seconds: f32, distance_cells: f32) -> f32 {
    let rate_hz = 0.75 + 2.25 / (1.0 + distance_cells.max(0.0));
    0.5 + 0.5 * (elapsed_seconds * TAU * rate_hz).sin()
}

pub fn time_is_low(seconds_left: u32, threshold_secs: u32) -> bool {
    seconds_left <= threshold_secs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trail_fades_in_steps_and_clamps_at_zero() {
        assert!((trail_opacity(0, 0.15, 45) - 1.0).abs() < 1e-6);
        assert!((trail_opacity(44, 0.15, 45) - 1.0).abs() < 1e-6);
        assert!((trail_opacity(90, 0.15, 45) - 0.7).abs() < 1e-6);
        assert_eq!(trail_opacity(10_000, 0.15, 45), 0.0);
    }

    #[test]
    fn pulse_stays_in_unit_range() {
        for step in 0..200 {
            let t = step as f32 * 0.037;
            let value = hunter_pulse(t, (step % 7) as f32);
            assert!((0.0..=1.0).contains(&value));
            let radius = light_radius_px(50.0, t);
            assert!((47.9..=52.1).contains(&radius));
        }
    }
}
