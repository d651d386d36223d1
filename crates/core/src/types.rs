use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    pub struct HunterId;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { y, x }
    }

    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self { y: self.y + dy, x: self.x + dx }
    }

    pub fn manhattan(self, other: Self) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Vertical before horizontal. Pursuit tie-breaks walk this order.
    pub const ALL: [Direction; 4] =
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    pub fn mirrored(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            other => other,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    Normal,
    Darkness,
    Dash,
    Levels,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HunterMovement {
    #[default]
    Tile,
    Continuous,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlScheme {
    #[default]
    Normal,
    Mirrored,
}

impl ControlScheme {
    pub fn apply(self, direction: Direction) -> Direction {
        match self {
            Self::Normal => direction,
            Self::Mirrored => direction.mirrored(),
        }
    }
}

/// Per-tick feedback notifications. At most one of each kind fires per tick.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickEvent {
    PlayerMoved { to: Pos },
    WallBump { at: Pos, direction: Direction },
    DashLaunched { direction: Direction },
    DashStopped { at: Pos },
    KeyPickup { at: Pos },
    ExitLocked { at: Pos },
    GoalTouched { at: Pos },
    Captured { hunter: HunterId },
    TimeWarning { seconds_left: u32 },
    TimeUp,
}

impl TickEvent {
    fn kind_index(&self) -> u8 {
        match self {
            Self::PlayerMoved { .. } => 0,
            Self::WallBump { .. } => 1,
            Self::DashLaunched { .. } => 2,
            Self::DashStopped { .. } => 3,
            Self::KeyPickup { .. } => 4,
            Self::ExitLocked { .. } => 5,
            Self::GoalTouched { .. } => 6,
            Self::Captured { .. } => 7,
            Self::TimeWarning { .. } => 8,
            Self::TimeUp => 9,
        }
    }

    pub fn same_kind(&self, other: &Self) -> bool {
        self.kind_index() == other.kind_index()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LossCause {
    Captured,
    Timeout,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Won,
    Lost,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionSource {
    Generated { seed: u64, size: u32, with_key: bool },
    Level { id: u32 },
}

impl SessionSource {
    /// The size for generated mazes, the level id for authored ones.
    pub fn level_or_size_id(&self) -> u32 {
        match self {
            Self::Generated { size, .. } => *size,
            Self::Level { id } => *id,
        }
    }
}

/// Terminal report handed to the progress/highscore collaborator. Emitted once per session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutcomeEvent {
    pub outcome: Outcome,
    pub elapsed_ticks: u64,
    pub elapsed_time_seconds: f64,
    pub cause: Option<LossCause>,
    pub mode: GameMode,
    /// Level id for authored levels, maze side length for generated ones.
    pub level_or_size_id: u32,
    pub source: SessionSource,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Running,
    Won,
    Lost(LossCause),
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum AdvanceStopReason {
    Finished(OutcomeEvent),
    BudgetExhausted,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AdvanceResult {
    pub simulated_ticks: u32,
    pub stop_reason: AdvanceStopReason,
}
