//! Generator orchestration: carve, then place Start, End and the optional Key.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;
use tracing::debug;

use super::carve::{carve_passages, lattice_cells, pick_index};
use super::size::MazeSize;
use crate::level::ParsedLevel;
use crate::maze::MazeGrid;
use crate::types::Pos;

pub const GENERATED_START: Pos = Pos { y: 1, x: 1 };

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedMaze {
    pub seed: u64,
    pub size: MazeSize,
    pub grid: MazeGrid,
    pub start: Pos,
    pub end: Pos,
    pub key: Option<Pos>,
}

impl From<GeneratedMaze> for ParsedLevel {
    fn from(maze: GeneratedMaze) -> Self {
        Self {
            grid: maze.grid,
            start: maze.start,
            end: maze.end,
            key: maze.key,
            hunter_spawns: Vec::new(),
        }
    }
}

pub struct MazeGenerator {
    seed: u64,
    size: MazeSize,
    with_key: bool,
}

impl MazeGenerator {
    pub fn new(seed: u64, size: MazeSize) -> Self {
        Self { seed, size, with_key: false }
    }

    pub fn with_key(mut self, with_key: bool) -> Self {
        self.with_key = with_key;
        self
    }

    /// Panics if the carved grid breaks a maze invariant; that would be a generator bug.
    pub fn generate(&self) -> GeneratedMaze {
        let size = self.size.cells();
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut grid = MazeGrid::filled(size, size);

        let lattice = lattice_cells(size);
        let origin = lattice[pick_index(&mut rng, lattice.len())];
        carve_passages(&mut grid, origin, &mut rng);

        let start = GENERATED_START;
        let distances = grid.distances_from(start);
        let (end, solution_len) = distances
            .farthest()
            .filter(|(end, _)| *end != start)
            .unwrap_or_else(|| panic!("maze of size {size} has no cell distinct from start"));

        let key = self.with_key.then(|| {
            let candidates: Vec<Pos> =
                lattice.iter().copied().filter(|&pos| pos != start && pos != end).collect();
            candidates[pick_index(&mut rng, candidates.len())]
        });

        grid.mark_start(start);
        grid.mark_end(end);
        if let Some(key) = key {
            grid.mark_key(key);
        }

        assert!(grid.border_is_walled(), "generated maze has an open border");
        assert_eq!(
            grid.open_edge_count() + 1,
            grid.path_positions().count(),
            "generated maze is not a spanning tree"
        );
        assert!(grid.unreachable_from(start).is_empty(), "generated maze is disconnected");

        debug!(seed = self.seed, size, ?end, solution_len, ?key, "generated maze");
        GeneratedMaze { seed: self.seed, size: self.size, grid, start, end, key }
    }
}
