use std::collections::VecDeque;

use crate::geom::{PixelPos, cell_center};
use crate::types::{Direction, Pos};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrailSegment {
    pub pos: Pos,
    pub tick: u64,
}

/// Recently visited cells, oldest first. Rendering only; never read by collision.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trail {
    capacity: usize,
    segments: VecDeque<TrailSegment>,
}

impl Trail {
    pub fn new(capacity: usize) -> Self {
        Self { capacity, segments: VecDeque::with_capacity(capacity) }
    }

    pub fn record(&mut self, pos: Pos, tick: u64) {
        if self.capacity == 0 || self.segments.back().is_some_and(|last| last.pos == pos) {
            return;
        }
        if self.segments.len() == self.capacity {
            self.segments.pop_front();
        }
        self.segments.push_back(TrailSegment { pos, tick });
    }

    pub fn segments(&self) -> impl Iterator<Item = &TrailSegment> {
        self.segments.iter()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub pos: Pos,
    /// Circle centre. Tracks the cell centre except while dashing.
    pub pixel: PixelPos,
    pub has_key: bool,
    pub dash: Option<Direction>,
    pub trail: Trail,
}

impl Player {
    pub fn spawn(pos: Pos, cell_size: f32, trail_length: usize) -> Self {
        Self {
            pos,
            pixel: cell_center(pos, cell_size),
            has_key: false,
            dash: None,
            trail: Trail::new(trail_length),
        }
    }

    pub fn is_dashing(&self) -> bool {
        self.dash.is_some()
    }

    /// Snap onto a cell centre, as tile steps do.
    pub fn place(&mut self, pos: Pos, cell_size: f32, tick: u64) {
        self.pixel = cell_center(pos, cell_size);
        self.enter(pos, tick);
    }

    /// Change the occupied cell without touching the continuous position.
    pub fn enter(&mut self, pos: Pos, tick: u64) {
        if pos != self.pos {
            self.trail.record(self.pos, tick);
        }
        self.pos = pos;
    }
}
