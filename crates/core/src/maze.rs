//! Grid of maze cells addressed by (row, column) plus the reachability queries the
//! generator, the level parser and the hunters share.

use std::collections::VecDeque;

use crate::types::{Direction, Pos};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Terrain {
    Wall,
    Path,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MazeCell {
    pub terrain: Terrain,
    pub is_start: bool,
    pub is_end: bool,
    pub is_key: bool,
}

impl MazeCell {
    pub const WALL: Self =
        Self { terrain: Terrain::Wall, is_start: false, is_end: false, is_key: false };
    pub const PATH: Self =
        Self { terrain: Terrain::Path, is_start: false, is_end: false, is_key: false };

    pub fn is_wall(&self) -> bool {
        self.terrain == Terrain::Wall
    }

    pub fn is_path(&self) -> bool {
        self.terrain == Terrain::Path
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MazeGrid {
    width: usize,
    height: usize,
    cells: Vec<MazeCell>,
}

impl MazeGrid {
    /// A grid with every cell walled in.
    pub fn filled(width: usize, height: usize) -> Self {
        Self { width, height, cells: vec![MazeCell::WALL; width * height] }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    pub fn cell(&self, pos: Pos) -> Option<&MazeCell> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some(&self.cells[self.index(pos)])
    }

    /// Out-of-bounds positions read as walls.
    pub fn is_wall(&self, pos: Pos) -> bool {
        self.cell(pos).is_none_or(MazeCell::is_wall)
    }

    pub fn is_path(&self, pos: Pos) -> bool {
        !self.is_wall(pos)
    }

    pub fn set_terrain(&mut self, pos: Pos, terrain: Terrain) {
        if let Some(cell) = self.cell_mut(pos) {
            cell.terrain = terrain;
        }
    }

    pub fn mark_start(&mut self, pos: Pos) {
        if let Some(cell) = self.cell_mut(pos) {
            cell.is_start = true;
        }
    }

    pub fn mark_end(&mut self, pos: Pos) {
        if let Some(cell) = self.cell_mut(pos) {
            cell.is_end = true;
        }
    }

    pub fn mark_key(&mut self, pos: Pos) {
        if let Some(cell) = self.cell_mut(pos) {
            cell.is_key = true;
        }
    }

    /// Clear the key marker, returning whether one was present.
    pub fn take_key(&mut self, pos: Pos) -> bool {
        match self.cell_mut(pos) {
            Some(cell) if cell.is_key => {
                cell.is_key = false;
                true
            }
            _ => false,
        }
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.height).flat_map(move |y| {
            (0..self.width).map(move |x| Pos { y: y as i32, x: x as i32 })
        })
    }

    pub fn path_positions(&self) -> impl Iterator<Item = Pos> + '_ {
        self.positions().filter(|&pos| self.is_path(pos))
    }

    pub fn border_is_walled(&self) -> bool {
        self.positions()
            .filter(|pos| {
                pos.x == 0
                    || pos.y == 0
                    || pos.x as usize == self.width - 1
                    || pos.y as usize == self.height - 1
            })
            .all(|pos| self.is_wall(pos))
    }

    /// Breadth-first step counts from `origin` over path cells.
    pub fn distances_from(&self, origin: Pos) -> DistanceField {
        let mut field = DistanceField { width: self.width, steps: vec![None; self.cells.len()] };
        if self.is_wall(origin) {
            return field;
        }
        let mut queue = VecDeque::new();
        field.steps[self.index(origin)] = Some(0);
        queue.push_back(origin);
        while let Some(current) = queue.pop_front() {
            let next_steps = field.steps[self.index(current)].unwrap_or(0) + 1;
            for direction in Direction::ALL {
                let neighbor = current.step(direction);
                if self.is_wall(neighbor) {
                    continue;
                }
                let idx = self.index(neighbor);
                if field.steps[idx].is_none() {
                    field.steps[idx] = Some(next_steps);
                    queue.push_back(neighbor);
                }
            }
        }
        field
    }

    pub fn is_reachable(&self, from: Pos, to: Pos) -> bool {
        self.distances_from(from).get(to).is_some()
    }

    /// Shortest sequence of tile steps from `from` to `to`.
    pub fn route(&self, from: Pos, to: Pos) -> Option<Vec<Direction>> {
        let field = self.distances_from(to);
        let mut remaining = field.get(from)?;
        let mut current = from;
        let mut steps = Vec::with_capacity(remaining as usize);
        while remaining > 0 {
            let direction = Direction::ALL.into_iter().find(|&direction| {
                field.get(current.step(direction)).is_some_and(|d| d + 1 == remaining)
            })?;
            current = current.step(direction);
            remaining -= 1;
            steps.push(direction);
        }
        Some(steps)
    }

    /// Path cells that cannot be reached from `origin`, in row-major order.
    pub fn unreachable_from(&self, origin: Pos) -> Vec<Pos> {
        let field = self.distances_from(origin);
        self.path_positions().filter(|&pos| field.get(pos).is_none()).collect()
    }

    /// Count of orthogonal adjacencies between path cells.
    pub fn open_edge_count(&self) -> usize {
        self.path_positions()
            .map(|pos| {
                [Direction::Right, Direction::Down]
                    .into_iter()
                    .filter(|&direction| self.is_path(pos.step(direction)))
                    .count()
            })
            .sum()
    }

    /// Row strings using the level glyphs.
    pub fn to_rows(&self) -> Vec<String> {
        (0..self.height)
            .map(|y| {
                (0..self.width)
                    .map(|x| {
                        let cell = &self.cells[y * self.width + x];
                        if cell.is_start {
                            'S'
                        } else if cell.is_end {
                            'E'
                        } else if cell.is_key {
                            'K'
                        } else if cell.is_wall() {
                            '#'
                        } else {
                            '.'
                        }
                    })
                    .collect()
            })
            .collect()
    }

    fn cell_mut(&mut self, pos: Pos) -> Option<&mut MazeCell> {
        if !self.in_bounds(pos) {
            return None;
        }
        let idx = self.index(pos);
        Some(&mut self.cells[idx])
    }

    fn index(&self, pos: Pos) -> usize {
        (pos.y as usize) * self.width + (pos.x as usize)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistanceField {
    width: usize,
    steps: Vec<Option<u32>>,
}

impl DistanceField {
    pub fn get(&self, pos: Pos) -> Option<u32> {
        if pos.x < 0 || pos.y < 0 || pos.x as usize >= self.width {
            return None;
        }
        self.steps.get((pos.y as usize) * self.width + (pos.x as usize)).copied().flatten()
    }

    /// Reachable cell with the greatest step count; ties go to the largest (y, x).
    pub fn farthest(&self) -> Option<(Pos, u32)> {
        let mut best: Option<(Pos, u32)> = None;
        for (idx, steps) in self.steps.iter().enumerate() {
            let Some(steps) = *steps else {
                continue;
            };
            let pos = Pos { y: (idx / self.width) as i32, x: (idx % self.width) as i32 };
            let better = match best {
                None => true,
                Some((best_pos, best_steps)) => {
                    steps > best_steps || (steps == best_steps && pos > best_pos)
                }
            };
            if better {
                best = Some((pos, steps));
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor() -> MazeGrid {
        let mut grid = MazeGrid::filled(7, 3);
        for x in 1..6 {
            grid.set_terrain(Pos::new(x, 1), Terrain::Path);
        }
        grid
    }

    #[test]
    fn out_of_bounds_reads_as_wall() {
        let grid = corridor();
        assert!(grid.is_wall(Pos::new(-1, 1)));
        assert!(grid.is_wall(Pos::new(7, 1)));
        assert!(grid.is_wall(Pos::new(2, 3)));
        assert!(grid.is_path(Pos::new(2, 1)));
    }

    #[test]
    fn distances_count_steps_along_corridor() {
        let grid = corridor();
        let field = grid.distances_from(Pos::new(1, 1));
        assert_eq!(field.get(Pos::new(5, 1)), Some(4));
        assert_eq!(field.get(Pos::new(0, 0)), None);
        assert_eq!(field.farthest(), Some((Pos::new(5, 1), 4)));
    }

    #[test]
    fn take_key_consumes_marker_once() {
        let mut grid = corridor();
        grid.mark_key(Pos::new(3, 1));
        assert!(grid.take_key(Pos::new(3, 1)));
        assert!(!grid.take_key(Pos::new(3, 1)));
    }

    #[test]
    fn unreachable_cells_are_reported_row_major() {
        let mut grid = corridor();
        grid.set_terrain(Pos::new(3, 1), Terrain::Wall);
        assert_eq!(grid.unreachable_from(Pos::new(1, 1)), vec![Pos::new(4, 1), Pos::new(5, 1)]);
        assert!(grid.border_is_walled());
        assert_eq!(grid.open_edge_count(), 2);
    }

    #[test]
    fn route_walks_the_shortest_path() {
        let grid = corridor();
        assert_eq!(grid.route(Pos::new(1, 1), Pos::new(4, 1)), Some(vec![Direction::Right; 3]));
        assert_eq!(grid.route(Pos::new(2, 1), Pos::new(2, 1)), Some(Vec::new()));
        assert_eq!(grid.route(Pos::new(1, 1), Pos::new(0, 0)), None);
    }
}
