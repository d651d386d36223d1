pub mod clock;
pub mod config;
pub mod content;
pub mod fx;
pub mod geom;
pub mod hunter;
pub mod input;
pub mod journal;
pub mod level;
pub mod maze;
pub mod mazegen;
pub mod movement;
pub mod player;
pub mod replay;
pub mod session;
pub mod types;

pub use clock::TickClock;
pub use config::SessionConfig;
pub use content::LevelCatalog;
pub use input::{Controls, KeyState};
pub use journal::{InputJournal, InputRecord};
pub use level::{Level, LevelError, ParsedLevel};
pub use maze::{MazeCell, MazeGrid};
pub use mazegen::{MazeSize, SizeError, SizePreset};
pub use replay::*;
pub use session::{Session, SessionError, SessionRules};
pub use types::*;
