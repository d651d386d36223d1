use serde::{Deserialize, Serialize};

use crate::types::{Direction, GameMode, SessionSource};

pub const JOURNAL_FORMAT_VERSION: u16 = 1;

/// Every direction a session accepted, keyed by the tick it arrived after. Together with the
/// source and tick rate this is enough to rebuild the session exactly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputJournal {
    pub format_version: u16,
    pub build_id: String,
    pub source: SessionSource,
    pub mode: GameMode,
    pub tick_rate_hz: u32,
    pub inputs: Vec<InputRecord>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRecord {
    pub tick: u64,
    pub direction: Direction,
}

impl InputJournal {
    pub fn new(source: SessionSource, mode: GameMode, tick_rate_hz: u32) -> Self {
        Self {
            format_version: JOURNAL_FORMAT_VERSION,
            build_id: env!("CARGO_PKG_VERSION").to_string(),
            source,
            mode,
            tick_rate_hz,
            inputs: Vec::new(),
        }
    }

    pub fn append(&mut self, tick: u64, direction: Direction) {
        self.inputs.push(InputRecord { tick, direction });
    }
}
