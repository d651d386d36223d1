//! Hand-authored level definitions and their conversion into a playable grid.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::maze::{MazeGrid, Terrain};
use crate::types::{ControlScheme, HunterMovement, Pos};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelUnlocks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocks_aura_palette_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocks_core_matrix_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocks_trail_signature_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub maze_definition: Vec<String>,
    pub width: usize,
    pub height: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hunter_movement_type: Option<HunterMovement>,
    #[serde(default)]
    pub hunter_phases_through_walls: bool,
    #[serde(default)]
    pub is_dash_level: bool,
    #[serde(default)]
    pub is_darkness_level: bool,
    #[serde(default)]
    pub control_scheme: ControlScheme,
    #[serde(flatten)]
    pub unlocks: LevelUnlocks,
}

impl Level {
    /// A plain level whose declared dimensions follow its rows.
    pub fn new(id: u32, name: &str, rows: &[&str]) -> Self {
        Self {
            id,
            name: name.to_string(),
            description: String::new(),
            maze_definition: rows.iter().map(|row| (*row).to_string()).collect(),
            width: rows.first().map_or(0, |row| row.chars().count()),
            height: rows.len(),
            time_limit: None,
            hunter_movement_type: None,
            hunter_phases_through_walls: false,
            is_dash_level: false,
            is_darkness_level: false,
            control_scheme: ControlScheme::Normal,
            unlocks: LevelUnlocks::default(),
        }
    }

    pub fn parse(&self) -> Result<ParsedLevel, LevelError> {
        parse_level(self, &LevelLegend::default())
    }
}

/// Glyph-to-terrain mapping for level rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelLegend {
    pub wall: char,
    pub path: Vec<char>,
    pub start: char,
    pub end: char,
    pub key: char,
    pub hunter: char,
}

impl Default for LevelLegend {
    fn default() -> Self {
        Self { wall: '#', path: vec!['.', ' '], start: 'S', end: 'E', key: 'K', hunter: 'H' }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Glyph {
    Wall,
    Path,
    Start,
    End,
    Key,
    Hunter,
}

impl LevelLegend {
    fn glyph(&self, ch: char) -> Option<Glyph> {
        if ch == self.wall {
            Some(Glyph::Wall)
        } else if ch == self.start {
            Some(Glyph::Start)
        } else if ch == self.end {
            Some(Glyph::End)
        } else if ch == self.key {
            Some(Glyph::Key)
        } else if ch == self.hunter {
            Some(Glyph::Hunter)
        } else if self.path.contains(&ch) {
            Some(Glyph::Path)
        } else {
            None
        }
    }
}

/// Read-only playable view of a level or generated maze.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedLevel {
    pub grid: MazeGrid,
    pub start: Pos,
    pub end: Pos,
    pub key: Option<Pos>,
    pub hunter_spawns: Vec<Pos>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LevelError {
    Empty,
    HeightMismatch { declared: usize, actual: usize },
    RowWidthMismatch { row: usize, declared: usize, actual: usize },
    UnknownGlyph { pos: Pos, glyph: char },
    MissingStart,
    MissingEnd,
    DuplicateStart { first: Pos, second: Pos },
    DuplicateEnd { first: Pos, second: Pos },
    DuplicateKey { first: Pos, second: Pos },
    OpenBorder { pos: Pos },
    Unreachable { pos: Pos },
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "level has no rows"),
            Self::HeightMismatch { declared, actual } => {
                write!(f, "declared height {declared} but definition has {actual} rows")
            }
            Self::RowWidthMismatch { row, declared, actual } => {
                write!(f, "row {row} has width {actual}, expected {declared}")
            }
            Self::UnknownGlyph { pos, glyph } => {
                write!(f, "unknown glyph {glyph:?} at ({}, {})", pos.x, pos.y)
            }
            Self::MissingStart => write!(f, "level has no start marker"),
            Self::MissingEnd => write!(f, "level has no end marker"),
            Self::DuplicateStart { second, .. } => {
                write!(f, "second start marker at ({}, {})", second.x, second.y)
            }
            Self::DuplicateEnd { second, .. } => {
                write!(f, "second end marker at ({}, {})", second.x, second.y)
            }
            Self::DuplicateKey { second, .. } => {
                write!(f, "second key marker at ({}, {})", second.x, second.y)
            }
            Self::OpenBorder { pos } => {
                write!(f, "border cell ({}, {}) is not a wall", pos.x, pos.y)
            }
            Self::Unreachable { pos } => {
                write!(f, "cell ({}, {}) cannot be reached from the start", pos.x, pos.y)
            }
        }
    }
}

impl std::error::Error for LevelError {}

fn set_once(
    slot: &mut Option<Pos>,
    pos: Pos,
    duplicate: fn(Pos, Pos) -> LevelError,
) -> Result<(), LevelError> {
    if let Some(first) = *slot {
        return Err(duplicate(first, pos));
    }
    *slot = Some(pos);
    Ok(())
}

pub fn parse_level(level: &Level, legend: &LevelLegend) -> Result<ParsedLevel, LevelError> {
    let rows = &level.maze_definition;
    if rows.is_empty() || level.width == 0 {
        return Err(LevelError::Empty);
    }
    if rows.len() != level.height {
        return Err(LevelError::HeightMismatch { declared: level.height, actual: rows.len() });
    }

    // Every row must match the declared width before the grid is sized from it.
    for (y, row) in rows.iter().enumerate() {
        let actual = row.chars().count();
        if actual != level.width {
            return Err(LevelError::RowWidthMismatch { row: y, declared: level.width, actual });
        }
    }

    let mut grid = MazeGrid::filled(level.width, level.height);
    let mut start = None;
    let mut end = None;
    let mut key = None;
    let mut hunter_spawns = Vec::new();

    for (y, row) in rows.iter().enumerate() {
        for (x, ch) in row.chars().enumerate() {
            let pos = Pos { y: y as i32, x: x as i32 };
            let glyph = legend.glyph(ch).ok_or(LevelError::UnknownGlyph { pos, glyph: ch })?;
            if glyph == Glyph::Wall {
                continue;
            }
            grid.set_terrain(pos, Terrain::Path);
            match glyph {
                Glyph::Start => {
                    set_once(&mut start, pos, |first, second| LevelError::DuplicateStart {
                        first,
                        second,
                    })?;
                    grid.mark_start(pos);
                }
                Glyph::End => {
                    set_once(&mut end, pos, |first, second| LevelError::DuplicateEnd {
                        first,
                        second,
                    })?;
                    grid.mark_end(pos);
                }
                Glyph::Key => {
                    set_once(&mut key, pos, |first, second| LevelError::DuplicateKey {
                        first,
                        second,
                    })?;
                    grid.mark_key(pos);
                }
                Glyph::Hunter => hunter_spawns.push(pos),
                Glyph::Path | Glyph::Wall => {}
            }
        }
    }

    let start = start.ok_or(LevelError::MissingStart)?;
    let end = end.ok_or(LevelError::MissingEnd)?;

    if let Some(pos) = grid.positions().find(|&pos| {
        let on_border = pos.x == 0
            || pos.y == 0
            || pos.x as usize == level.width - 1
            || pos.y as usize == level.height - 1;
        on_border && grid.is_path(pos)
    }) {
        return Err(LevelError::OpenBorder { pos });
    }

    if let Some(&pos) = grid.unreachable_from(start).first() {
        return Err(LevelError::Unreachable { pos });
    }

    Ok(ParsedLevel { grid, start, end, key, hunter_spawns })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(rows: &[&str]) -> Level {
        Level::new(1, "test", rows)
    }

    #[test]
    fn parses_markers_and_hunters_in_row_major_order() {
        let parsed = level(&["#######", "#S.H.K#", "#.###.#", "#H..E.#", "#######"])
            .parse()
            .expect("level should parse");
        assert_eq!(parsed.start, Pos::new(1, 1));
        assert_eq!(parsed.end, Pos::new(4, 3));
        assert_eq!(parsed.key, Some(Pos::new(5, 1)));
        assert_eq!(parsed.hunter_spawns, vec![Pos::new(3, 1), Pos::new(1, 3)]);
        assert!(parsed.grid.is_path(Pos::new(3, 1)), "hunter spawns stand on path");
        assert!(parsed.grid.cell(Pos::new(5, 1)).is_some_and(|cell| cell.is_key));
    }

    #[test]
    fn rejects_row_width_mismatch() {
        let err = level(&["#####", "#S.E#", "####"]).parse().expect_err("short row");
        assert_eq!(err, LevelError::RowWidthMismatch { row: 2, declared: 5, actual: 4 });
    }

    #[test]
    fn oversized_declared_width_is_a_content_error() {
        let mut bad = level(&["#####", "#S.E#", "#####"]);
        bad.width = usize::MAX / 2;
        assert_eq!(
            bad.parse(),
            Err(LevelError::RowWidthMismatch { row: 0, declared: usize::MAX / 2, actual: 5 })
        );
    }

    #[test]
    fn rejects_declared_height_mismatch() {
        let mut bad = level(&["#####", "#S.E#", "#####"]);
        bad.height = 4;
        assert_eq!(bad.parse(), Err(LevelError::HeightMismatch { declared: 4, actual: 3 }));
    }

    #[test]
    fn rejects_missing_and_duplicate_markers() {
        assert_eq!(level(&["#####", "#..E#", "#####"]).parse(), Err(LevelError::MissingStart));
        assert_eq!(level(&["#####", "#S..#", "#####"]).parse(), Err(LevelError::MissingEnd));
        assert!(matches!(
            level(&["######", "#SSE.#", "######"]).parse(),
            Err(LevelError::DuplicateStart { .. })
        ));
        assert!(matches!(
            level(&["######", "#SEE.#", "######"]).parse(),
            Err(LevelError::DuplicateEnd { .. })
        ));
    }

    #[test]
    fn rejects_unreachable_cells_and_open_borders() {
        assert_eq!(
            level(&["#######", "#S#.E.#", "#######"]).parse(),
            Err(LevelError::Unreachable { pos: Pos::new(3, 1) })
        );
        assert_eq!(
            level(&["#####", "#S.E.", "#####"]).parse(),
            Err(LevelError::OpenBorder { pos: Pos::new(4, 1) })
        );
    }

    #[test]
    fn rejects_unknown_glyphs() {
        assert_eq!(
            level(&["#####", "#S?E#", "#####"]).parse(),
            Err(LevelError::UnknownGlyph { pos: Pos::new(2, 1), glyph: '?' })
        );
    }

    #[test]
    fn deserializes_camel_case_level_json() {
        let json = serde_json::json!({
            "id": 7,
            "name": "Drift",
            "mazeDefinition": ["#####", "#S.E#", "#####"],
            "width": 5,
            "height": 3,
            "timeLimit": 30,
            "hunterMovementType": "continuous",
            "hunterPhasesThroughWalls": true,
            "controlScheme": "mirrored",
            "unlocksCoreMatrixId": "HEXAGON"
        });
        let level: Level = serde_json::from_value(json).expect("level json should parse");
        assert_eq!(level.time_limit, Some(30));
        assert_eq!(level.hunter_movement_type, Some(HunterMovement::Continuous));
        assert!(level.hunter_phases_through_walls);
        assert_eq!(level.control_scheme, ControlScheme::Mirrored);
        assert_eq!(level.unlocks.unlocks_core_matrix_id.as_deref(), Some("HEXAGON"));
        assert!(!level.is_dash_level);
        assert!(level.parse().is_ok());
    }
}
