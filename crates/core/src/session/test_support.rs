//! Shared fixtures for the session test suite.

use super::*;

pub(super) fn level(rows: &[&str]) -> Level {
    Level::new(1, "fixture", rows)
}

pub(super) fn session(level: &Level) -> Session {
    Session::from_level(level, SessionConfig::default()).expect("fixture level is valid")
}

pub(super) fn corridor() -> Session {
    session(&level(&["######", "#S..E#", "######"]))
}

pub(super) fn hunted(
    rows: &[&str],
    movement: HunterMovement,
    phases_through_walls: bool,
) -> Session {
    let mut level = level(rows);
    level.hunter_movement_type = Some(movement);
    level.hunter_phases_through_walls = phases_through_walls;
    session(&level)
}

pub(super) fn finished(result: &AdvanceResult) -> &OutcomeEvent {
    match &result.stop_reason {
        AdvanceStopReason::Finished(outcome) => outcome,
        AdvanceStopReason::BudgetExhausted => panic!("session did not finish: {result:?}"),
    }
}
