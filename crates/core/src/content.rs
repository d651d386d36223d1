//! The built-in campaign. Unlock identifiers are data for the progress collaborator; the
//! simulation never reads them.

use crate::level::{Level, LevelError, LevelUnlocks};
use crate::types::{ControlScheme, HunterMovement};

pub mod unlocks {
    pub const CORE_TRIANGLE: &str = "TRIANGLE";
    pub const CORE_SQUARE: &str = "SQUARE";
    pub const CORE_HEXAGON: &str = "HEXAGON";
    pub const CORE_DIAMOND: &str = "DIAMOND";

    pub const AURA_ARCANE_FUCHSIA: &str = "arcane_fuchsia";
    pub const AURA_CRIMSON_CORE: &str = "crimson_core";
    pub const AURA_VERIDIAN_STREAM: &str = "veridian_stream";
    pub const AURA_VOID_VIOLET: &str = "void_violet";
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LevelCatalog {
    levels: Vec<Level>,
}

impl LevelCatalog {
    pub fn new(levels: Vec<Level>) -> Self {
        Self { levels }
    }

    pub fn builtin() -> Self {
        Self::new(builtin_levels())
    }

    /// A JSON array of level objects, camelCase fields.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text).map(Self::new)
    }

    pub fn get(&self, id: u32) -> Option<&Level> {
        self.levels.iter().find(|level| level.id == id)
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn next_after(&self, id: u32) -> Option<&Level> {
        self.levels.iter().filter(|level| level.id > id).min_by_key(|level| level.id)
    }

    /// First level that fails to parse.
    pub fn validate(&self) -> Result<(), (u32, LevelError)> {
        for level in &self.levels {
            level.parse().map_err(|err| (level.id, err))?;
        }
        Ok(())
    }
}

fn core_unlock(id: &str) -> LevelUnlocks {
    LevelUnlocks { unlocks_core_matrix_id: Some(id.to_string()), ..LevelUnlocks::default() }
}

fn aura_unlock(id: &str) -> LevelUnlocks {
    LevelUnlocks { unlocks_aura_palette_id: Some(id.to_string()), ..LevelUnlocks::default() }
}

fn described(mut level: Level, description: &str, unlocks: LevelUnlocks) -> Level {
    level.description = description.to_string();
    level.unlocks = unlocks;
    level
}

fn builtin_levels() -> Vec<Level> {
    let first_steps = described(
        Level::new(
            1,
            "First Steps",
            &[
                "#########",
                "#S..#...#",
                "###.#.#.#",
                "#...#.#.#",
                "#.###.#.#",
                "#.....#E#",
                "#########",
            ],
        ),
        "Find the way out.",
        core_unlock(unlocks::CORE_TRIANGLE),
    );

    let locked_door = described(
        Level::new(
            2,
            "Locked Door",
            &[
                "#########",
                "#S..#..K#",
                "#.#.#.###",
                "#.#...#E#",
                "#.#####.#",
                "#.......#",
                "#########",
            ],
        ),
        "The exit stays sealed until the key is collected.",
        aura_unlock(unlocks::AURA_ARCANE_FUCHSIA),
    );

    let mut sentinel = described(
        Level::new(
            3,
            "Sentinel",
            &[
                "###########",
                "#S....#...#",
                "#.###.#.#.#",
                "#.#.....#.#",
                "#.#.###.#.#",
                "#...#H....#",
                "###.#.###.#",
                "#.....#..E#",
                "###########",
            ],
        ),
        "A sentinel patrols the halls. Do not let it reach you.",
        core_unlock(unlocks::CORE_SQUARE),
    );
    sentinel.hunter_movement_type = Some(HunterMovement::Tile);

    let mut countdown = described(
        Level::new(
            4,
            "Countdown",
            &[
                "#########",
                "#S......#",
                "#######.#",
                "#.......#",
                "#.#######",
                "#......E#",
                "#########",
            ],
        ),
        "Twenty seconds. Run.",
        aura_unlock(unlocks::AURA_CRIMSON_CORE),
    );
    countdown.time_limit = Some(20);

    let mut drifter = described(
        Level::new(
            5,
            "Drifter",
            &[
                "###########",
                "#S..#.....#",
                "#.#.#.###.#",
                "#.#...#...#",
                "#.#####.#.#",
                "#...H...#E#",
                "###########",
            ],
        ),
        "This one glides instead of stepping.",
        core_unlock(unlocks::CORE_HEXAGON),
    );
    drifter.hunter_movement_type = Some(HunterMovement::Continuous);

    let mut phantom = described(
        Level::new(
            6,
            "Phantom",
            &[
                "#########",
                "#S..#...#",
                "#.#.#.#.#",
                "#.#...#.#",
                "#.#####.#",
                "#H.....E#",
                "#########",
            ],
        ),
        "Walls mean nothing to it.",
        aura_unlock(unlocks::AURA_VERIDIAN_STREAM),
    );
    phantom.hunter_movement_type = Some(HunterMovement::Tile);
    phantom.hunter_phases_through_walls = true;

    let mut slipstream = described(
        Level::new(
            7,
            "Slipstream",
            &[
                "#########",
                "#S......#",
                "#.###.#.#",
                "#.#...#.#",
                "#.#.###.#",
                "#...#..E#",
                "#########",
            ],
        ),
        "Every move carries you until a wall stops you.",
        core_unlock(unlocks::CORE_DIAMOND),
    );
    slipstream.is_dash_level = true;

    let mut looking_glass = described(
        Level::new(
            8,
            "Looking Glass",
            &[
                "###########",
                "#S#.......#",
                "#.#.#####.#",
                "#...#...#.#",
                "#####.#.#.#",
                "#.....#...#",
                "#.#######.#",
                "#........E#",
                "###########",
            ],
        ),
        "Dark, and left is right.",
        aura_unlock(unlocks::AURA_VOID_VIOLET),
    );
    looking_glass.is_darkness_level = true;
    looking_glass.control_scheme = ControlScheme::Mirrored;

    let mut gauntlet = described(
        Level::new(
            9,
            "Gauntlet",
            &[
                "###########",
                "#S...#...H#",
                "#.#.#.#.#.#",
                "#...K.....#",
                "#.#.#.#.#.#",
                "#H...#...E#",
                "###########",
            ],
        ),
        "Everything at once.",
        LevelUnlocks::default(),
    );
    gauntlet.hunter_movement_type = Some(HunterMovement::Continuous);
    gauntlet.hunter_phases_through_walls = true;
    gauntlet.time_limit = Some(45);

    vec![
        first_steps,
        locked_door,
        sentinel,
        countdown,
        drifter,
        phantom,
        slipstream,
        looking_glass,
        gauntlet,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_builtin_level_parses() {
        let catalog = LevelCatalog::builtin();
        assert_eq!(catalog.len(), 9);
        assert_eq!(catalog.validate(), Ok(()));
    }

    #[test]
    fn ids_are_sequential_and_lookup_works() {
        let catalog = LevelCatalog::builtin();
        for (index, level) in catalog.levels().iter().enumerate() {
            assert_eq!(level.id as usize, index + 1);
        }
        assert_eq!(catalog.get(4).and_then(|level| level.time_limit), Some(20));
        assert_eq!(catalog.next_after(8).map(|level| level.id), Some(9));
        assert!(catalog.next_after(9).is_none());
        assert!(catalog.get(99).is_none());
    }

    #[test]
    fn hunter_levels_have_spawns() {
        let catalog = LevelCatalog::builtin();
        for level in catalog.levels() {
            let parsed = level.parse().expect("builtin level parses");
            assert_eq!(
                level.hunter_movement_type.is_some(),
                !parsed.hunter_spawns.is_empty(),
                "level {}",
                level.id
            );
        }
    }

    #[test]
    fn catalog_round_trips_through_json() {
        let catalog = LevelCatalog::builtin();
        let text = serde_json::to_string(catalog.levels()).expect("serialize levels");
        assert!(text.contains("\"mazeDefinition\""));
        assert!(text.contains("\"unlocksCoreMatrixId\":\"TRIANGLE\""));
        assert_eq!(LevelCatalog::from_json(&text).expect("parse levels"), catalog);
    }
}
