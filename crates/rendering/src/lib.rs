//! Debug rendering for layout grids.

pub mod cell_debug;
pub mod layout_debug;

pub use cell_debug::{cell_debug_summary, draw_cell_debug, DebugDraw};
pub use layout_debug::{LayoutDebugPlugin, LayoutDebugSettings};
