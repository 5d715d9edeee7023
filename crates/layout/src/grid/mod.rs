//! The layout grid: owns every cell, answers neighbour queries, and routes
//! per-position operations to cells.

pub mod connectivity;
pub mod layout_grid;

#[cfg(test)]
mod tests;

pub use layout_grid::*;
