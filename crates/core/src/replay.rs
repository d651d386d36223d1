use std::fmt;

use crate::config::SessionConfig;
use crate::content::LevelCatalog;
use crate::journal::InputJournal;
use crate::mazegen::{MazeSize, SizeError};
use crate::session::{Session, SessionError};
use crate::types::{AdvanceStopReason, OutcomeEvent, SessionSource};

#[derive(Debug, PartialEq, Eq)]
pub enum ReplayError {
    UnknownLevel(u32),
    InvalidSize(SizeError),
    Session(SessionError),
    /// An input was recorded for a tick the rebuilt session never reached.
    InputAfterFinish { tick: u64 },
    TickBudgetExceeded { ticks: u64 },
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownLevel(id) => write!(f, "journal references unknown level {id}"),
            Self::InvalidSize(err) => write!(f, "journal maze size rejected: {err}"),
            Self::Session(err) => write!(f, "session construction failed: {err}"),
            Self::InputAfterFinish { tick } => {
                write!(f, "input recorded at tick {tick} after the session had finished")
            }
            Self::TickBudgetExceeded { ticks } => {
                write!(f, "session still running after {ticks} ticks")
            }
        }
    }
}

impl std::error::Error for ReplayError {}

#[derive(Debug, PartialEq)]
pub struct ReplayResult {
    pub outcome: OutcomeEvent,
    pub final_snapshot_hash: u64,
    pub final_tick: u64,
}

pub fn session_for_journal(
    catalog: &LevelCatalog,
    journal: &InputJournal,
    config: &SessionConfig,
) -> Result<Session, ReplayError> {
    let config = config.clone().with_tick_rate(journal.tick_rate_hz);
    match journal.source {
        SessionSource::Level { id } => {
            let level = catalog.get(id).ok_or(ReplayError::UnknownLevel(id))?;
            Session::from_level(level, config).map_err(ReplayError::Session)
        }
        SessionSource::Generated { seed, size, with_key } => {
            let size = MazeSize::new(size).map_err(ReplayError::InvalidSize)?;
            Session::generated(seed, size, with_key, journal.mode, config)
                .map_err(ReplayError::Session)
        }
    }
}

/// Ticks simulated between event drains while replaying.
const REPLAY_BATCH_TICKS: u64 = 1_800;

/// Run up to `ticks` ticks in bounded batches, discarding feedback events as they pile up.
fn advance_discarding_events(session: &mut Session, ticks: u64) -> AdvanceStopReason {
    let mut remaining = ticks;
    while remaining > 0 {
        let batch = u32::try_from(remaining.min(REPLAY_BATCH_TICKS)).unwrap_or(u32::MAX);
        let result = session.advance(batch);
        session.drain_events();
        if matches!(result.stop_reason, AdvanceStopReason::Finished(_))
            || result.simulated_ticks == 0
        {
            return result.stop_reason;
        }
        remaining = remaining.saturating_sub(u64::from(result.simulated_ticks));
    }
    AdvanceStopReason::BudgetExhausted
}

/// Rebuild the journal's session and feed each input after the tick it was recorded at,
/// then run idle until the session ends or `max_ticks` have elapsed.
pub fn replay_to_end(
    catalog: &LevelCatalog,
    journal: &InputJournal,
    config: &SessionConfig,
    max_ticks: u64,
) -> Result<ReplayResult, ReplayError> {
    let mut session = session_for_journal(catalog, journal, config)?;

    for record in &journal.inputs {
        let gap = record.tick.saturating_sub(session.current_tick());
        if let AdvanceStopReason::Finished(_) = advance_discarding_events(&mut session, gap) {
            return Err(ReplayError::InputAfterFinish { tick: record.tick });
        }
        if !session.push_input(record.direction) {
            return Err(ReplayError::InputAfterFinish { tick: record.tick });
        }
    }

    let budget = max_ticks.saturating_sub(session.current_tick());
    if let AdvanceStopReason::Finished(outcome) = advance_discarding_events(&mut session, budget) {
        return Ok(ReplayResult {
            outcome,
            final_snapshot_hash: session.snapshot_hash(),
            final_tick: session.current_tick(),
        });
    }
    match session.outcome() {
        Some(outcome) => Ok(ReplayResult {
            outcome: outcome.clone(),
            final_snapshot_hash: session.snapshot_hash(),
            final_tick: session.current_tick(),
        }),
        None => Err(ReplayError::TickBudgetExceeded { ticks: max_ticks }),
    }
}
