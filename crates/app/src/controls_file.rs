//! Persisted key bindings.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use labyrinth::Controls;
use serde::{Deserialize, Serialize};

pub const CONTROLS_FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ControlsFile {
    pub format_version: u32,
    pub controls: Controls,
}

#[derive(Debug)]
pub enum ControlsFileError {
    Io(io::Error),
    Format(serde_json::Error),
    UnsupportedVersion(u32),
}

impl fmt::Display for ControlsFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "controls file I/O failed: {err}"),
            Self::Format(err) => write!(f, "controls file is malformed: {err}"),
            Self::UnsupportedVersion(version) => {
                write!(f, "controls file format version {version} is not supported")
            }
        }
    }
}

impl std::error::Error for ControlsFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Format(err) => Some(err),
            Self::UnsupportedVersion(_) => None,
        }
    }
}

impl From<io::Error> for ControlsFileError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for ControlsFileError {
    fn from(err: serde_json::Error) -> Self {
        Self::Format(err)
    }
}

impl ControlsFile {
    pub fn new(controls: Controls) -> Self {
        Self { format_version: CONTROLS_FORMAT_VERSION, controls }
    }

    pub fn get_default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "Labyrinth").map(|proj_dirs| {
            let mut path = proj_dirs.config_dir().to_path_buf();
            path.push("controls.json");
            path
        })
    }

    pub fn write_atomic(&self, path: &Path) -> Result<(), ControlsFileError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(self)?;

        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, path)?;

        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, ControlsFileError> {
        let content = fs::read_to_string(path)?;
        let file: Self = serde_json::from_str(&content)?;
        if file.format_version != CONTROLS_FORMAT_VERSION {
            return Err(ControlsFileError::UnsupportedVersion(file.format_version));
        }
        Ok(file)
    }

    /// Saved bindings, or the defaults when no file exists yet.
    pub fn load_or_default(path: &Path) -> Result<Controls, ControlsFileError> {
        match Self::load(path) {
            Ok(file) => Ok(file.controls),
            Err(ControlsFileError::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
                Ok(Controls::default())
            }
            Err(err) => Err(err),
        }
    }
}
