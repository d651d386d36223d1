//! Layout model for the status bar and maze board.

use labyrinth::geom::PixelPos;
use taffy::prelude::*;
use taffy::{TaffyError, TaffyTree};

const FRAME_PADDING: f32 = 16.0;
const STATUS_HEIGHT: f32 = 36.0;
const STATUS_GAP: f32 = 12.0;

pub struct LayoutNodes {
    root: NodeId,
    status: NodeId,
    board: NodeId,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Maze pixel space mapped onto a panel, centred and uniformly scaled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoardTransform {
    pub origin_x: f32,
    pub origin_y: f32,
    pub scale: f32,
}

impl BoardTransform {
    pub fn fit(panel: PanelRect, maze_width_px: f32, maze_height_px: f32) -> Self {
        if maze_width_px <= 0.0 || maze_height_px <= 0.0 {
            return Self { origin_x: panel.x, origin_y: panel.y, scale: 1.0 };
        }
        let scale = (panel.width / maze_width_px).min(panel.height / maze_height_px).max(0.0);
        Self {
            origin_x: panel.x + (panel.width - maze_width_px * scale) / 2.0,
            origin_y: panel.y + (panel.height - maze_height_px * scale) / 2.0,
            scale,
        }
    }

    pub fn to_screen(&self, pixel: PixelPos) -> (f32, f32) {
        (self.origin_x + pixel.x * self.scale, self.origin_y + pixel.y * self.scale)
    }

    pub fn length(&self, px: f32) -> f32 {
        px * self.scale
    }
}

pub struct FrameLayout {
    pub status: PanelRect,
    pub board: PanelRect,
}

pub fn setup_layout(taffy: &mut TaffyTree<()>) -> Result<LayoutNodes, TaffyError> {
    let status = taffy.new_leaf(Style {
        size: Size { width: percent(1.0), height: length(STATUS_HEIGHT) },
        margin: taffy::Rect {
            left: zero(),
            right: zero(),
            top: zero(),
            bottom: length(STATUS_GAP),
        },
        ..Default::default()
    })?;
    let board = taffy.new_leaf(Style { flex_grow: 1.0, ..Default::default() })?;
    let root = taffy.new_with_children(
        Style {
            display: Display::Flex,
            flex_direction: FlexDirection::Column,
            size: Size { width: percent(1.0), height: percent(1.0) },
            padding: taffy::Rect {
                left: length(FRAME_PADDING),
                right: length(FRAME_PADDING),
                top: length(FRAME_PADDING),
                bottom: length(FRAME_PADDING),
            },
            ..Default::default()
        },
        &[status, board],
    )?;
    Ok(LayoutNodes { root, status, board })
}

pub fn compute_frame_layout(
    taffy: &mut TaffyTree<()>,
    nodes: &LayoutNodes,
    viewport_width: f32,
    viewport_height: f32,
) -> Result<FrameLayout, TaffyError> {
    let available_size = Size {
        width: AvailableSpace::Definite(viewport_width),
        height: AvailableSpace::Definite(viewport_height),
    };
    taffy.compute_layout(nodes.root, available_size)?;

    let l_root = taffy.layout(nodes.root)?;
    let l_status = taffy.layout(nodes.status)?;
    let l_board = taffy.layout(nodes.board)?;

    Ok(FrameLayout {
        status: panel_rect(l_status, &[l_root]),
        board: panel_rect(l_board, &[l_root]),
    })
}

fn panel_rect(layout: &taffy::Layout, parents: &[&taffy::Layout]) -> PanelRect {
    let mut x = layout.location.x;
    let mut y = layout.location.y;
    for parent in parents {
        x += parent.location.x;
        y += parent.location.y;
    }

    PanelRect { x, y, width: layout.size.width, height: layout.size.height }
}
