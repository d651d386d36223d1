use labyrinth::{Direction, OutcomeEvent, Session, TickClock, TickEvent};
use tracing::{debug, info};

/// Logic ticks a direction must stay held before it repeats.
pub const HOLD_REPEAT_TICKS: u32 = 5;

/// A feedback cue for the sound/visual collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Step,
    Bump,
    Whoosh,
    Thud,
    KeyChime,
    LockedBuzz,
    Goal,
    Caught,
    TimerBeep { seconds_left: u32 },
    TimerExpired,
}

pub fn cue_for(event: &TickEvent) -> Cue {
    match event {
        TickEvent::PlayerMoved { .. } => Cue::Step,
        TickEvent::WallBump { .. } => Cue::Bump,
        TickEvent::DashLaunched { .. } => Cue::Whoosh,
        TickEvent::DashStopped { .. } => Cue::Thud,
        TickEvent::KeyPickup { .. } => Cue::KeyChime,
        TickEvent::ExitLocked { .. } => Cue::LockedBuzz,
        TickEvent::GoalTouched { .. } => Cue::Goal,
        TickEvent::Captured { .. } => Cue::Caught,
        TickEvent::TimeWarning { seconds_left } => Cue::TimerBeep { seconds_left: *seconds_left },
        TickEvent::TimeUp => Cue::TimerExpired,
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum AppMode {
    #[default]
    Playing,
    Finished(OutcomeEvent),
}

pub struct AppState {
    pub mode: AppMode,
    session: Session,
    clock: TickClock,
    held: Vec<Direction>,
    repeat_in: u32,
    cues: Vec<Cue>,
}

impl AppState {
    pub fn new(session: Session) -> Self {
        let config = session.config();
        let clock = TickClock::new(config.tick_rate_hz, config.max_ticks_per_frame);
        Self {
            mode: AppMode::Playing,
            session,
            clock,
            held: Vec::new(),
            repeat_in: HOLD_REPEAT_TICKS,
            cues: Vec::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Swap in a new session, discarding the old one and any queued cues.
    pub fn restart(&mut self, session: Session) {
        *self = Self::new(session);
    }

    /// Feed one display frame: directions held this frame and the frame's duration.
    pub fn frame(&mut self, held: &[Direction], frame_seconds: f64) {
        if matches!(self.mode, AppMode::Finished(_)) {
            return;
        }

        for &direction in held {
            if !self.held.contains(&direction) {
                self.session.push_input(direction);
                self.repeat_in = HOLD_REPEAT_TICKS;
            }
        }

        let ticks = self.clock.advance(frame_seconds);
        for _ in 0..ticks {
            self.repeat_held(held);
            self.session.tick();
            self.cues.extend(self.session.drain_events().iter().map(cue_for));
            if let Some(outcome) = self.session.outcome() {
                info!(
                    outcome = ?outcome.outcome,
                    cause = ?outcome.cause,
                    seconds = outcome.elapsed_time_seconds,
                    "session finished"
                );
                self.mode = AppMode::Finished(outcome.clone());
                break;
            }
        }

        self.held.clear();
        self.held.extend_from_slice(held);
    }

    pub fn drain_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }

    fn repeat_held(&mut self, held: &[Direction]) {
        let Some(&direction) = held.last() else {
            return;
        };
        if !self.held.contains(&direction)
            || self.session.pending_inputs() > 0
            || self.session.player().is_dashing()
        {
            return;
        }
        self.repeat_in = self.repeat_in.saturating_sub(1);
        if self.repeat_in == 0 {
            debug!(?direction, "repeating held direction");
            self.session.push_input(direction);
            self.repeat_in = HOLD_REPEAT_TICKS;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labyrinth::{Level, Outcome, SessionConfig};

    const FRAME: f64 = 1.0 / 30.0;

    fn corridor_app() -> AppState {
        let level = Level::new(1, "corridor", &["########", "#S....E#", "########"]);
        AppState::new(Session::from_level(&level, SessionConfig::default()).expect("session"))
    }

    #[test]
    fn events_map_to_cues() {
        assert_eq!(cue_for(&TickEvent::TimeUp), Cue::TimerExpired);
        assert_eq!(
            cue_for(&TickEvent::TimeWarning { seconds_left: 3 }),
            Cue::TimerBeep { seconds_left: 3 }
        );
    }

    #[test]
    fn fresh_press_moves_one_cell() {
        let mut app = corridor_app();
        app.frame(&[Direction::Right], FRAME);
        assert_eq!(app.session().player().pos.x, 2);
        assert_eq!(app.drain_cues(), vec![Cue::Step]);
        assert!(app.drain_cues().is_empty());
    }

    #[test]
    fn holding_a_direction_repeats_it() {
        let mut app = corridor_app();
        app.frame(&[Direction::Right], FRAME);
        for _ in 0..HOLD_REPEAT_TICKS {
            app.frame(&[Direction::Right], FRAME);
        }
        assert_eq!(app.session().player().pos.x, 3);
    }

    #[test]
    fn reaching_the_exit_finishes_the_app() {
        let mut app = corridor_app();
        for _ in 0..40 {
            app.frame(&[Direction::Right], FRAME);
        }
        match &app.mode {
            AppMode::Finished(outcome) => assert_eq!(outcome.outcome, Outcome::Won),
            AppMode::Playing => panic!("holding right should reach the exit"),
        }
        assert!(app.drain_cues().contains(&Cue::Goal));
    }
}
