pub mod app_loop;
pub mod args;
pub mod controls_file;
pub mod keys;
pub mod layout;

use labyrinth::{GameMode, LossCause, Outcome, OutcomeEvent};

pub const APP_NAME: &str = "Labyrinth";

/// Map an `OutcomeEvent` to its reason code string.
pub fn reason_code(event: &OutcomeEvent) -> &'static str {
    match (event.outcome, event.cause) {
        (Outcome::Won, _) => "WIN_EXIT",
        (Outcome::Lost, Some(LossCause::Timeout)) => "LOSS_TIMEOUT",
        (Outcome::Lost, _) => "LOSS_CAPTURED",
    }
}

/// Banner shown over the board once a session ends.
pub fn outcome_headline(event: &OutcomeEvent) -> &'static str {
    match (event.outcome, event.cause) {
        (Outcome::Won, _) => "ESCAPED",
        (Outcome::Lost, Some(LossCause::Timeout)) => "OUT OF TIME",
        (Outcome::Lost, _) => "CAUGHT IN THE DARK",
    }
}

/// `m:ss.t`, truncated to tenths.
pub fn format_elapsed(seconds: f64) -> String {
    let tenths = (seconds.max(0.0) * 10.0).floor() as u64;
    let minutes = tenths / 600;
    let secs = (tenths % 600) / 10;
    format!("{minutes}:{secs:02}.{}", tenths % 10)
}

pub fn mode_label(mode: GameMode) -> &'static str {
    match mode {
        GameMode::Normal => "Normal",
        GameMode::Darkness => "Darkness",
        GameMode::Dash => "Dash",
        GameMode::Levels => "Levels",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labyrinth::SessionSource;

    fn event(outcome: Outcome, cause: Option<LossCause>) -> OutcomeEvent {
        OutcomeEvent {
            outcome,
            elapsed_ticks: 90,
            elapsed_time_seconds: 3.0,
            cause,
            mode: GameMode::Normal,
            level_or_size_id: 15,
            source: SessionSource::Generated { seed: 1, size: 15, with_key: false },
        }
    }

    #[test]
    fn reason_codes_follow_outcome_and_cause() {
        assert_eq!(reason_code(&event(Outcome::Won, None)), "WIN_EXIT");
        assert_eq!(reason_code(&event(Outcome::Lost, Some(LossCause::Captured))), "LOSS_CAPTURED");
        assert_eq!(reason_code(&event(Outcome::Lost, Some(LossCause::Timeout))), "LOSS_TIMEOUT");
    }

    #[test]
    fn headline_distinguishes_timeouts_from_captures() {
        assert_eq!(outcome_headline(&event(Outcome::Won, None)), "ESCAPED");
        let timeout = event(Outcome::Lost, Some(LossCause::Timeout));
        assert_eq!(outcome_headline(&timeout), "OUT OF TIME");
        assert_eq!(
            outcome_headline(&event(Outcome::Lost, Some(LossCause::Captured))),
            "CAUGHT IN THE DARK"
        );
    }

    #[test]
    fn elapsed_time_truncates_to_tenths() {
        assert_eq!(format_elapsed(0.0), "0:00.0");
        assert_eq!(format_elapsed(3.1), "0:03.1");
        assert_eq!(format_elapsed(59.99), "0:59.9");
        assert_eq!(format_elapsed(125.5), "2:05.5");
        assert_eq!(format_elapsed(-1.0), "0:00.0");
    }
}
