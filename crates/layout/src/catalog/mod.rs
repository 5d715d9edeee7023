//! Content catalog: the authored table of connection patterns, blocking
//! patterns, asset choices and spawn validators that cells draw from.

pub mod table;
pub mod types;

#[cfg(test)]
mod tests;

pub use table::*;
pub use types::*;
