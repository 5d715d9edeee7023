//! Per-cell debug geometry and text, drawn through the `DebugDraw` seam so
//! the same drawing code serves gizmos, logs and tests.

use std::fmt::Write;

use bevy::prelude::*;

use layout::config::{
    DEBUG_BLOCKED_FRACTION, DEBUG_CONNECTION_FRACTION, DEBUG_TEXT_HEIGHT_FRACTION,
};
use layout::grid::LayoutGrid;
use layout::sides::Side;

pub const CONNECTION_COLOR: Color = Color::srgb(0.1, 0.9, 0.2);
pub const BLOCKED_COLOR: Color = Color::srgb(0.9, 0.1, 0.1);

/// Sink for debug primitives.
pub trait DebugDraw {
    fn line(&mut self, start: Vec3, end: Vec3, color: Color);

    fn text(&mut self, anchor: Vec3, text: &str);
}

/// Draw the cell at `position`: a segment per connected side, a shorter one
/// per side it disables, and optionally its summary above it.
/// Returns `false` for positions outside the grid.
pub fn draw_cell_debug(
    grid: &LayoutGrid,
    position: IVec2,
    drawer: &mut dyn DebugDraw,
    show_text: bool,
) -> bool {
    let Some(cell) = grid.cell(position) else {
        return false;
    };
    let origin = cell.world_position(grid.transform());
    let size = grid.cell_size();

    for side in Side::ALL {
        if cell.has_connections().get(side) {
            let end = origin + side.world_direction() * size * DEBUG_CONNECTION_FRACTION;
            drawer.line(origin, end, CONNECTION_COLOR);
        }
    }
    for side in Side::ALL {
        if cell.disable_neighbour_sides().get(side) {
            let end = origin + side.world_direction() * size * DEBUG_BLOCKED_FRACTION;
            drawer.line(origin, end, BLOCKED_COLOR);
        }
    }

    if show_text {
        let anchor = origin + Vec3::Y * size * DEBUG_TEXT_HEIGHT_FRACTION;
        drawer.text(anchor, &cell_debug_summary(grid, position));
    }
    true
}

/// Multi-line description of a cell's state. Empty for positions outside
/// the grid.
pub fn cell_debug_summary(grid: &LayoutGrid, position: IVec2) -> String {
    let Some(cell) = grid.cell(position) else {
        return String::new();
    };
    let index = grid.index(position).unwrap_or_default();
    let world = cell.world_position(grid.transform());
    let yaw = f32::from(cell.rotation()) * 90.0;
    let content = cell.content().map_or("none", |c| c.as_str());
    let asset = cell.asset().map_or("none", |a| a.as_str());

    let mut text = String::new();
    let _ = writeln!(text, "Grid Location: X={} Y={} (i={})", position.x, position.y, index);
    let _ = writeln!(text, "Grid Rotation: {}", cell.rotation());
    let _ = writeln!(text, "World Location: X={:.1} Y={:.1} Z={:.1}", world.x, world.y, world.z);
    let _ = writeln!(text, "World Rotation: Yaw={yaw:.0}");
    let _ = writeln!(text, "Is Generated: {}", cell.is_generated());
    let _ = writeln!(text, "Is Blocked by Neighbour: {}", cell.is_blocked_by_neighbour(grid));
    let _ = writeln!(text, "Unique Seed: {}", cell.unique_seed());
    let _ = writeln!(text, "Content: {content}");
    let _ = writeln!(text, "Asset: {asset}");
    let _ = writeln!(text, "Unique Sublevel Name: {}", cell.unique_sublevel_name());
    text
}
