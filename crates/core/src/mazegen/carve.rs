//! Depth-first carving over the odd-coordinate cell lattice.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::Rng;

use crate::maze::{MazeGrid, Terrain};
use crate::types::{Direction, Pos};

pub(super) fn pick_index(rng: &mut ChaCha8Rng, len: usize) -> usize {
    debug_assert!(len > 0);
    (rng.next_u64() % len as u64) as usize
}

/// Lattice cells sit on odd coordinates inside the border.
pub(super) fn lattice_cells(size: usize) -> Vec<Pos> {
    (1..size)
        .step_by(2)
        .flat_map(|y| (1..size).step_by(2).map(move |x| Pos { y: y as i32, x: x as i32 }))
        .collect()
}

fn two_steps(pos: Pos, direction: Direction) -> Pos {
    pos.step(direction).step(direction)
}

/// Carve a spanning tree of the lattice, starting from `origin`.
pub(super) fn carve_passages(grid: &mut MazeGrid, origin: Pos, rng: &mut ChaCha8Rng) {
    let size = grid.width();
    let mut visited = vec![false; size * size];
    let visited_index = |pos: Pos| (pos.y as usize) * size + (pos.x as usize);

    let mut stack = vec![origin];
    visited[visited_index(origin)] = true;
    grid.set_terrain(origin, Terrain::Path);

    while let Some(&current) = stack.last() {
        let candidates: Vec<Direction> = Direction::ALL
            .into_iter()
            .filter(|&direction| {
                let next = two_steps(current, direction);
                next.x > 0
                    && next.y > 0
                    && (next.x as usize) < size - 1
                    && (next.y as usize) < size - 1
                    && !visited[visited_index(next)]
            })
            .collect();

        if candidates.is_empty() {
            stack.pop();
            continue;
        }

        let direction = candidates[pick_index(rng, candidates.len())];
        let between = current.step(direction);
        let next = two_steps(current, direction);
        grid.set_terrain(between, Terrain::Path);
        grid.set_terrain(next, Terrain::Path);
        visited[visited_index(next)] = true;
        stack.push(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::rand_core::SeedableRng;

    #[test]
    fn lattice_for_five_has_four_cells() {
        assert_eq!(
            lattice_cells(5),
            vec![Pos::new(1, 1), Pos::new(3, 1), Pos::new(1, 3), Pos::new(3, 3)]
        );
    }

    #[test]
    fn carving_opens_every_lattice_cell_and_nothing_on_the_border() {
        let mut grid = MazeGrid::filled(9, 9);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        carve_passages(&mut grid, Pos::new(1, 1), &mut rng);

        for cell in lattice_cells(9) {
            assert!(grid.is_path(cell), "lattice cell {cell:?} left uncarved");
        }
        assert!(grid.border_is_walled());
        let even_even_open = grid.path_positions().filter(|pos| pos.x % 2 == 0 && pos.y % 2 == 0);
        assert_eq!(even_even_open.count(), 0, "pillars must stay walls");
    }

    #[test]
    fn pick_index_stays_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for len in 1..10 {
            for _ in 0..20 {
                assert!(pick_index(&mut rng, len) < len);
            }
        }
    }
}
