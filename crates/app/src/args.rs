//! Launch options: `--seed`, `--size`, `--mode`, `--level` and `--key`.

use std::ffi::OsString;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, ValueEnum};
use labyrinth::{
    GameMode, LevelCatalog, MazeSize, Session, SessionConfig, SessionError, SessionSource,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeedChoice {
    Cli(u64),
    Generated(u64),
}

impl SeedChoice {
    pub fn value(self) -> u64 {
        match self {
            Self::Cli(seed) | Self::Generated(seed) => seed,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LaunchArgs {
    pub seed: SeedChoice,
    pub size: MazeSize,
    pub mode: GameMode,
    /// Catalog level to open; set only in `GameMode::Levels`.
    pub level: Option<u32>,
    pub with_key: bool,
}

impl LaunchArgs {
    /// Where the session built from these options comes from.
    pub fn source(&self) -> SessionSource {
        match self.level {
            Some(id) => SessionSource::Level { id },
            None => SessionSource::Generated {
                seed: self.seed.value(),
                size: self.size.get(),
                with_key: self.with_key,
            },
        }
    }

    pub fn build_session(
        &self,
        catalog: &LevelCatalog,
        config: SessionConfig,
    ) -> Result<Session, LaunchError> {
        match self.level {
            Some(id) => {
                let level = catalog.get(id).ok_or(LaunchError::UnknownLevel(id))?;
                Ok(Session::from_level(level, config)?)
            }
            None => Ok(Session::generated(
                self.seed.value(),
                self.size,
                self.with_key,
                self.mode,
                config,
            )?),
        }
    }

    /// The same options pointed at another catalog level.
    pub fn with_level(self, id: u32) -> Self {
        Self { level: Some(id), mode: GameMode::Levels, ..self }
    }

    /// A fresh generated maze for the same mode and size.
    pub fn reseeded(self, seed: u64) -> Self {
        Self { seed: SeedChoice::Generated(seed), ..self }
    }
}

#[derive(Debug)]
pub enum LaunchError {
    UnknownLevel(u32),
    Session(SessionError),
}

impl fmt::Display for LaunchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownLevel(id) => write!(f, "no level with id {id}"),
            Self::Session(err) => write!(f, "session could not start: {err}"),
        }
    }
}

impl std::error::Error for LaunchError {}

impl From<SessionError> for LaunchError {
    fn from(err: SessionError) -> Self {
        Self::Session(err)
    }
}

static GENERATED_SEED_COUNTER: AtomicU64 = AtomicU64::new(0);

pub fn generate_runtime_seed() -> u64 {
    let now_nanos =
        SystemTime::now().duration_since(UNIX_EPOCH).map_or(0_u128, |duration| duration.as_nanos());
    let pid = u64::from(std::process::id());
    let counter = GENERATED_SEED_COUNTER.fetch_add(1, Ordering::Relaxed);

    let entropy = (now_nanos as u64)
        ^ ((now_nanos >> 64) as u64)
        ^ pid.rotate_left(17)
        ^ counter.rotate_left(7);

    mix_seed(entropy)
}

/// Command line for the game window.
#[derive(Parser, Debug)]
#[command(name = "labyrinth", version, about = "Find the exit before the hunters find you")]
pub struct Cli {
    /// Seed for generated mazes; random when omitted
    #[arg(long)]
    pub seed: Option<u64>,
    /// Odd maze side length for generated mazes
    #[arg(long, value_parser = parse_size)]
    pub size: Option<MazeSize>,
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,
    /// Catalog level to open; implies `--mode levels`
    #[arg(long)]
    pub level: Option<u32>,
    /// Place a key that must be collected before the exit opens
    #[arg(long)]
    pub key: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Normal,
    Darkness,
    Dash,
    Levels,
}

impl From<ModeArg> for GameMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Normal => Self::Normal,
            ModeArg::Darkness => Self::Darkness,
            ModeArg::Dash => Self::Dash,
            ModeArg::Levels => Self::Levels,
        }
    }
}

impl Cli {
    pub fn resolve(self, generated_seed: u64) -> Result<LaunchArgs, clap::Error> {
        let mode = match (self.mode.map(GameMode::from), self.level) {
            (Some(mode), Some(_)) if mode != GameMode::Levels => {
                return Err(Self::command().error(
                    ErrorKind::ArgumentConflict,
                    "--level only applies to --mode levels",
                ));
            }
            (_, Some(_)) => GameMode::Levels,
            (Some(mode), None) => mode,
            (None, None) => GameMode::Normal,
        };
        let level = match mode {
            GameMode::Levels => Some(self.level.unwrap_or(1)),
            _ => None,
        };

        Ok(LaunchArgs {
            seed: match self.seed {
                Some(seed) => SeedChoice::Cli(seed),
                None => SeedChoice::Generated(generated_seed),
            },
            size: self.size.unwrap_or_default(),
            mode,
            level,
            with_key: self.key,
        })
    }
}

/// Parses `args` (program name first) and resolves them into launch options.
pub fn resolve_launch_args<I, T>(args: I, generated_seed: u64) -> Result<LaunchArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Cli::try_parse_from(args)?.resolve(generated_seed)
}

fn parse_size(raw: &str) -> Result<MazeSize, String> {
    let size = raw.parse::<u32>().map_err(|_| format!("'{raw}' is not a whole number"))?;
    MazeSize::new(size).map_err(|err| err.to_string())
}

fn mix_seed(mut value: u64) -> u64 {
    value ^= value >> 30;
    value = value.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    value ^= value >> 27;
    value = value.wrapping_mul(0x94D0_49BB_1331_11EB);
    value ^ (value >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_a_generated_normal_maze() {
        let launch =
            resolve_launch_args(["labyrinth"], 9_876_543).expect("empty args should resolve");
        assert_eq!(launch.seed, SeedChoice::Generated(9_876_543));
        assert_eq!(launch.size, MazeSize::default());
        assert_eq!(launch.mode, GameMode::Normal);
        assert_eq!(launch.level, None);
        assert!(!launch.with_key);
    }

    #[test]
    fn parses_separate_and_inline_values() {
        let args = ["labyrinth", "--seed", "4242", "--size=21", "--mode", "dash", "--key"];
        let launch = resolve_launch_args(args, 1).expect("valid args should parse");
        assert_eq!(launch.seed, SeedChoice::Cli(4_242));
        assert_eq!(launch.size.get(), 21);
        assert_eq!(launch.mode, GameMode::Dash);
        assert!(launch.with_key);
        assert_eq!(
            launch.source(),
            SessionSource::Generated { seed: 4_242, size: 21, with_key: true }
        );
    }

    #[test]
    fn level_flag_selects_levels_mode() {
        let launch =
            resolve_launch_args(["labyrinth", "--level=3"], 1).expect("level flag should parse");
        assert_eq!(launch.mode, GameMode::Levels);
        assert_eq!(launch.level, Some(3));
        assert_eq!(launch.source(), SessionSource::Level { id: 3 });

        let launch = resolve_launch_args(["labyrinth", "--mode", "levels"], 1)
            .expect("levels mode should parse");
        assert_eq!(launch.level, Some(1));
    }

    #[test]
    fn level_with_other_mode_is_rejected() {
        let err = resolve_launch_args(["labyrinth", "--mode=dash", "--level=2"], 1)
            .expect_err("level outside levels mode should error");
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
        assert!(err.to_string().contains("--level"), "error should name the flag: {err}");
    }

    #[test]
    fn even_size_is_rejected() {
        let err = resolve_launch_args(["labyrinth", "--size", "12"], 1)
            .expect_err("even size should error");
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
        assert!(err.to_string().contains("odd"), "error should explain odd requirement: {err}");
    }

    #[test]
    fn errors_when_flag_has_no_value() {
        assert!(resolve_launch_args(["labyrinth", "--seed"], 1).is_err());
    }

    #[test]
    fn errors_when_seed_value_is_not_a_number() {
        let err = resolve_launch_args(["labyrinth", "--seed=abc"], 1)
            .expect_err("non-numeric seed value should error");
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn errors_when_flag_is_provided_more_than_once() {
        assert!(resolve_launch_args(["labyrinth", "--seed=1", "--seed", "2"], 1).is_err());
    }

    #[test]
    fn unknown_mode_and_option_are_rejected() {
        assert!(resolve_launch_args(["labyrinth", "--mode=fast"], 1).is_err());
        assert!(resolve_launch_args(["labyrinth", "--speed=3"], 1).is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn builds_sessions_for_both_sources() {
        let catalog = LevelCatalog::builtin();
        let generated = resolve_launch_args(["labyrinth", "--seed=7", "--size=11"], 1)
            .expect("generated args");
        let session = generated
            .build_session(&catalog, SessionConfig::default())
            .expect("generated session builds");
        assert_eq!(session.grid().width(), 11);

        let missing = generated.with_level(99).build_session(&catalog, SessionConfig::default());
        assert!(matches!(missing, Err(LaunchError::UnknownLevel(99))));
    }

    #[test]
    fn generated_seed_changes_between_calls() {
        let first = generate_runtime_seed();
        let second = generate_runtime_seed();
        assert_ne!(first, second, "runtime seed generation should vary per call");
    }
}
