//! Grid cells for procedurally generated level layouts.
//!
//! A `LayoutGrid` holds one `LayoutCell` per position. Generators pick
//! content from a `ContentCatalog`, check it with `validate_candidate`, commit
//! it with `assign`, and finally stream the chosen asset in with
//! `load_content`. Everything random is drawn from per-cell streams seeded by
//! position and layout seed, so a layout regenerates identically.

pub mod ascii;
pub mod catalog;
pub mod cell;
pub mod config;
pub mod diagnostics;
pub mod grid;
pub mod plugin;
pub mod query;
pub mod rng;
pub mod sides;
pub mod streaming;
pub mod validators;

#[cfg(test)]
mod integration_tests;
#[cfg(any(test, feature = "bench"))]
pub mod test_harness;

pub use catalog::{AssetPath, ContentCatalog, ContentDefinition, ContentId};
pub use cell::{CellState, LayoutCell};
pub use config::LayoutConfig;
pub use grid::LayoutGrid;
pub use plugin::{
    AssignCellContent, CellAssignmentRejected, CellContentAssigned, CellContentLoaded,
    LayoutPlugin, LayoutSet, LoadCellContent, UnloadCellContent,
};
pub use query::LayoutQuery;
pub use sides::{CellSides, Side};
