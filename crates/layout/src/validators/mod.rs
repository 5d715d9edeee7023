//! Spawn validators: pluggable checks a catalog row runs before its content
//! may be committed to a cell.

pub mod builtin;
pub mod registry;


pub use builtin::*;
pub use registry::*;
