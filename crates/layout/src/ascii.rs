//! ASCII map of a layout grid, one character per cell.
//!
//! Rows are printed from the top (highest y) down so that +Y points up, the
//! same way the grid reads in a top-down view. Built on demand from
//! `&LayoutGrid`; no systems involved.

use crate::cell::LayoutCell;
use crate::grid::LayoutGrid;
use crate::query::LayoutQuery;
use crate::sides::CellSides;

/// Character for a cell.
///
/// Priority: generated pattern > blocked by a neighbour > required > empty.
pub fn cell_to_char(cell: &LayoutCell, grid: &LayoutGrid) -> char {
    if cell.is_generated() {
        return pattern_char(cell.has_connections());
    }
    if cell.is_blocked_by_neighbour(grid) {
        return 'x';
    }
    if cell.is_required_to_generate(grid) {
        return '?';
    }
    '.'
}

/// Box-drawing glyph for a connection pattern. `o` is a generated cell
/// with no connections.
pub fn pattern_char(sides: CellSides) -> char {
    // East, north, west, south with +Y drawn upwards.
    match (sides.px, sides.py, sides.nx, sides.ny) {
        (false, false, false, false) => 'o',
        (true, false, false, false) => '╶',
        (false, true, false, false) => '╵',
        (false, false, true, false) => '╴',
        (false, false, false, true) => '╷',
        (true, false, true, false) => '─',
        (false, true, false, true) => '│',
        (true, true, false, false) => '└',
        (false, true, true, false) => '┘',
        (false, false, true, true) => '┐',
        (true, false, false, true) => '┌',
        (true, true, true, false) => '┴',
        (false, true, true, true) => '┤',
        (true, false, true, true) => '┬',
        (true, true, false, true) => '├',
        (true, true, true, true) => '┼',
    }
}

/// Full map with a y-coordinate gutter and a legend.
pub fn build_layout_map(grid: &LayoutGrid) -> String {
    let dims = grid.dimensions();
    let mut out = String::new();

    for y in (0..dims.y as i32).rev() {
        out.push_str(&format!("{:>3} ", y));
        for x in 0..dims.x as i32 {
            let ch = grid
                .cell(bevy::math::IVec2::new(x, y))
                .map(|c| cell_to_char(c, grid))
                .unwrap_or(' ');
            out.push(ch);
        }
        out.push('\n');
    }

    out.push_str("    ");
    for x in 0..dims.x {
        out.push(char::from_digit(x % 10, 10).unwrap_or('?'));
    }
    out.push('\n');
    out.push_str("Legend: . empty  ? required  x blocked  o closed  box glyphs = connections\n");
    out
}
