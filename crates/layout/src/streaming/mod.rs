//! Interface to the engine service that instantiates a cell's sub-level
//! content, plus an in-memory implementation.
//!
//! Ownership is modelled with `ContentHandle`: the cell holds the only handle
//! to its instance, and dropping it is the release request. Completion comes
//! back through `ContentStreamer::poll_completed`; a completion for a handle
//! the cell no longer holds is ignored.

pub mod queued;
pub mod types;

#[cfg(test)]
mod tests;

pub use queued::*;
pub use types::*;
