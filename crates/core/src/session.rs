//! One play-through of a maze. A `Session` owns the grid, the player, the hunters and the
//! clocks, and moves them forward one fixed logic tick at a time.
//! Tick order: buffered input and player movement, then every hunter against the same
//! player snapshot, then the time limit, then terminal resolution.

use std::collections::VecDeque;
use std::fmt;

use slotmap::SlotMap;
use tracing::debug;

use crate::config::{INPUT_BUFFER_CAPACITY, SessionConfig};
use crate::fx::trail_opacity;
use crate::geom::cell_center;
use crate::hunter::{
    ChaseMotion, Hunter, HunterRules, PursuitField, is_capture, step_continuous_hunter,
    step_tile_hunter,
};
use crate::journal::InputJournal;
use crate::level::{Level, LevelError, ParsedLevel};
use crate::maze::MazeGrid;
use crate::mazegen::{MazeGenerator, MazeSize};
use crate::movement::{DashMotion, Goal, advance_dash, launch_dash, step_tile};
use crate::player::Player;
use crate::types::*;

mod hash;
#[cfg(test)]
mod test_support;

/// Mechanics in force for one session, resolved from the mode or the level flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionRules {
    pub dash: bool,
    pub darkness: bool,
    pub controls: ControlScheme,
    pub hunters: HunterRules,
    pub time_limit_secs: Option<u32>,
}

impl SessionRules {
    pub fn for_mode(mode: GameMode) -> Self {
        Self {
            dash: mode == GameMode::Dash,
            darkness: mode == GameMode::Darkness,
            ..Self::default()
        }
    }

    pub fn for_level(level: &Level) -> Self {
        Self {
            dash: level.is_dash_level,
            darkness: level.is_darkness_level,
            controls: level.control_scheme,
            hunters: HunterRules {
                movement: level.hunter_movement_type.unwrap_or_default(),
                phases_through_walls: level.hunter_phases_through_walls,
            },
            time_limit_secs: level.time_limit.filter(|&secs| secs > 0),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum SessionError {
    Level(LevelError),
    LevelsModeRequiresLevel,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Level(err) => write!(f, "level content error: {err}"),
            Self::LevelsModeRequiresLevel => {
                write!(f, "levels mode sessions must be built from a level definition")
            }
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Level(err) => Some(err),
            Self::LevelsModeRequiresLevel => None,
        }
    }
}

impl From<LevelError> for SessionError {
    fn from(err: LevelError) -> Self {
        Self::Level(err)
    }
}

pub struct Session {
    config: SessionConfig,
    mode: GameMode,
    source: SessionSource,
    rules: SessionRules,
    grid: MazeGrid,
    start: Pos,
    goal: Goal,
    player: Player,
    hunters: SlotMap<HunterId, Hunter>,
    tick: u64,
    state: SessionState,
    pending: VecDeque<Direction>,
    events: Vec<TickEvent>,
    journal: InputJournal,
    outcome: Option<OutcomeEvent>,
    last_time_warning: Option<u32>,
}

impl Session {
    /// Campaign session. Content errors abort construction.
    pub fn from_level(level: &Level, config: SessionConfig) -> Result<Self, SessionError> {
        let parsed = level.parse()?;
        Ok(Self::assemble(
            parsed,
            SessionRules::for_level(level),
            GameMode::Levels,
            SessionSource::Level { id: level.id },
            config,
        ))
    }

    pub fn generated(
        seed: u64,
        size: MazeSize,
        with_key: bool,
        mode: GameMode,
        config: SessionConfig,
    ) -> Result<Self, SessionError> {
        if mode == GameMode::Levels {
            return Err(SessionError::LevelsModeRequiresLevel);
        }
        let maze = MazeGenerator::new(seed, size).with_key(with_key).generate();
        let source = SessionSource::Generated { seed, size: size.get(), with_key };
        Ok(Self::assemble(maze.into(), SessionRules::for_mode(mode), mode, source, config))
    }

    fn assemble(
        parsed: ParsedLevel,
        rules: SessionRules,
        mode: GameMode,
        source: SessionSource,
        config: SessionConfig,
    ) -> Self {
        let cell_size = config.cell_size_px;
        let player = Player::spawn(parsed.start, cell_size, config.trail_length);
        let mut hunters = SlotMap::with_key();
        for &spawn in &parsed.hunter_spawns {
            hunters.insert_with_key(|id| Hunter::spawn(id, spawn, cell_size));
        }
        debug!(
            ?mode,
            ?source,
            width = parsed.grid.width(),
            height = parsed.grid.height(),
            hunters = hunters.len(),
            dash = rules.dash,
            darkness = rules.darkness,
            time_limit = ?rules.time_limit_secs,
            "session ready"
        );
        Self {
            journal: InputJournal::new(source, mode, config.tick_rate_hz),
            config,
            mode,
            source,
            rules,
            goal: Goal { end: parsed.end, key_required: parsed.key.is_some() },
            grid: parsed.grid,
            start: parsed.start,
            player,
            hunters,
            tick: 0,
            state: SessionState::Running,
            pending: VecDeque::with_capacity(INPUT_BUFFER_CAPACITY),
            events: Vec::new(),
            outcome: None,
            last_time_warning: None,
        }
    }

    /// Queue a direction for the coming ticks. Mirrored levels swap left and right here,
    /// before the movement engine sees it. Ignored once the session is over.
    pub fn push_input(&mut self, direction: Direction) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        self.journal.append(self.tick, direction);
        if self.pending.len() == INPUT_BUFFER_CAPACITY {
            self.pending.pop_front();
        }
        self.pending.push_back(self.rules.controls.apply(direction));
        true
    }

    /// Run a single logic tick unless the session already ended.
    pub fn tick(&mut self) -> SessionState {
        if !self.state.is_terminal() {
            self.step();
        }
        self.state
    }

    pub fn advance(&mut self, max_ticks: u32) -> AdvanceResult {
        let mut simulated_ticks = 0;
        while simulated_ticks < max_ticks && !self.state.is_terminal() {
            self.step();
            simulated_ticks += 1;
        }
        let stop_reason = match &self.outcome {
            Some(outcome) => AdvanceStopReason::Finished(outcome.clone()),
            None => AdvanceStopReason::BudgetExhausted,
        };
        AdvanceResult { simulated_ticks, stop_reason }
    }

    pub fn drain_events(&mut self) -> Vec<TickEvent> {
        std::mem::take(&mut self.events)
    }

    fn step(&mut self) {
        self.tick += 1;
        let mut fresh = Vec::new();
        let reached_goal = self.move_player(&mut fresh);
        let captured = self.move_hunters(&mut fresh);
        let timed_out = self.run_clock(&mut fresh);

        let resolved = if captured {
            SessionState::Lost(LossCause::Captured)
        } else if reached_goal {
            SessionState::Won
        } else if timed_out {
            fresh.push(TickEvent::TimeUp);
            SessionState::Lost(LossCause::Timeout)
        } else {
            SessionState::Running
        };
        self.publish(fresh);
        if resolved.is_terminal() {
            self.finish(resolved);
        }
    }

    fn move_player(&mut self, fresh: &mut Vec<TickEvent>) -> bool {
        let cell_size = self.config.cell_size_px;
        if self.rules.dash {
            if !self.player.is_dashing()
                && let Some(direction) = self.pending.pop_back()
            {
                self.pending.clear();
                launch_dash(&self.grid, &mut self.player, direction, cell_size, fresh);
            }
            let motion = DashMotion::from_config(&self.config);
            return advance_dash(
                &mut self.grid,
                self.goal,
                &mut self.player,
                motion,
                self.tick,
                fresh,
            );
        }
        let Some(direction) = self.pending.pop_front() else {
            return false;
        };
        step_tile(
            &mut self.grid,
            self.goal,
            &mut self.player,
            direction,
            cell_size,
            self.tick,
            fresh,
        )
    }

    fn move_hunters(&mut self, fresh: &mut Vec<TickEvent>) -> bool {
        if self.hunters.is_empty() {
            return false;
        }
        let player_pos = self.player.pos;
        let player_pixel = self.player.pixel;
        let rules = self.rules.hunters;
        let cell_size = self.config.cell_size_px;
        let radius = self.config.collision_radius();

        match rules.movement {
            HunterMovement::Tile => {
                let interval = u64::from(self.config.tile_hunter_step_ticks.max(1));
                if self.tick % interval == 0 {
                    let field =
                        PursuitField::build(&self.grid, player_pos, rules.phases_through_walls);
                    for hunter in self.hunters.values_mut() {
                        step_tile_hunter(hunter, &self.grid, &field, rules, cell_size);
                    }
                }
            }
            HunterMovement::Continuous => {
                let motion =
                    ChaseMotion { step_px: self.config.hunter_step_px(), radius, cell_size };
                for hunter in self.hunters.values_mut() {
                    step_continuous_hunter(hunter, &self.grid, player_pixel, rules, motion);
                }
            }
        }

        let capture_distance = radius * 2.0;
        let captor = self
            .hunters
            .values()
            .find(|hunter| {
                is_capture(hunter, player_pos, player_pixel, rules.movement, capture_distance)
            })
            .map(|hunter| hunter.id);
        match captor {
            Some(hunter) => {
                fresh.push(TickEvent::Captured { hunter });
                true
            }
            None => false,
        }
    }

    fn run_clock(&mut self, fresh: &mut Vec<TickEvent>) -> bool {
        let Some(limit) = self.time_limit_ticks() else {
            return false;
        };
        if self.tick >= limit {
            return true;
        }
        let Some(seconds_left) = self.time_left_secs() else {
            return false;
        };
        if seconds_left <= self.config.time_low_threshold_secs
            && self.last_time_warning != Some(seconds_left)
        {
            self.last_time_warning = Some(seconds_left);
            fresh.push(TickEvent::TimeWarning { seconds_left });
        }
        false
    }

    /// At most one event of each kind per tick; the first one wins.
    fn publish(&mut self, fresh: Vec<TickEvent>) {
        let mut published: Vec<TickEvent> = Vec::with_capacity(fresh.len());
        for event in fresh {
            if !published.iter().any(|seen| seen.same_kind(&event)) {
                published.push(event);
            }
        }
        self.events.extend(published);
    }

    fn finish(&mut self, state: SessionState) {
        let (outcome, cause) = match state {
            SessionState::Running => return,
            SessionState::Won => (Outcome::Won, None),
            SessionState::Lost(cause) => (Outcome::Lost, Some(cause)),
        };
        self.state = state;
        self.pending.clear();
        let event = OutcomeEvent {
            outcome,
            elapsed_ticks: self.tick,
            elapsed_time_seconds: self.config.ticks_to_seconds(self.tick),
            cause,
            mode: self.mode,
            level_or_size_id: self.source.level_or_size_id(),
            source: self.source,
        };
        debug!(?outcome, ?cause, tick = self.tick, "session finished");
        self.outcome = Some(event);
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.config.ticks_to_seconds(self.tick)
    }

    pub fn outcome(&self) -> Option<&OutcomeEvent> {
        self.outcome.as_ref()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn source(&self) -> SessionSource {
        self.source
    }

    pub fn rules(&self) -> SessionRules {
        self.rules
    }

    pub fn grid(&self) -> &MazeGrid {
        &self.grid
    }

    pub fn start(&self) -> Pos {
        self.start
    }

    pub fn goal(&self) -> Goal {
        self.goal
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn hunters(&self) -> impl Iterator<Item = &Hunter> {
        self.hunters.values()
    }

    pub fn hunter(&self, id: HunterId) -> Option<&Hunter> {
        self.hunters.get(id)
    }

    pub fn journal(&self) -> &InputJournal {
        &self.journal
    }

    pub fn pending_inputs(&self) -> usize {
        self.pending.len()
    }

    pub fn controls_mirrored(&self) -> bool {
        self.rules.controls == ControlScheme::Mirrored
    }

    pub fn time_limit_ticks(&self) -> Option<u64> {
        self.rules.time_limit_secs.map(|secs| self.config.ticks_for_seconds(secs))
    }

    /// Whole seconds left on the countdown, rounded up.
    pub fn time_left_secs(&self) -> Option<u32> {
        let limit = self.time_limit_ticks()?;
        let remaining = limit.saturating_sub(self.tick);
        let rate = u64::from(self.config.tick_rate_hz.max(1));
        Some(u32::try_from(remaining.div_ceil(rate)).unwrap_or(u32::MAX))
    }

    /// In darkness only cells near the player are drawn; everywhere else is always lit.
    pub fn is_lit(&self, pos: Pos) -> bool {
        if !self.rules.darkness {
            return true;
        }
        let cell_size = self.config.cell_size_px;
        let radius = self.config.darkness_light_radius_cells * cell_size;
        cell_center(pos, cell_size).distance(self.player.pixel) <= radius
    }

    /// Trail cells with their current opacity, oldest first.
    pub fn trail_opacities(&self) -> Vec<(Pos, f32)> {
        let rate = u64::from(self.config.tick_rate_hz.max(1));
        self.player
            .trail
            .segments()
            .map(|segment| {
                let age_ms = self.tick.saturating_sub(segment.tick) * 1000 / rate;
                let opacity = trail_opacity(
                    age_ms,
                    self.config.trail_fade_rate,
                    self.config.trail_update_interval_ms,
                );
                (segment.pos, opacity)
            })
            .collect()
    }
}
