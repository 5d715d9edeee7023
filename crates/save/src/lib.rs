//! Persistence for generated layouts.
//!
//! A snapshot stores the content id and rotation of every generated cell,
//! behind a small checksummed header. Everything else a cell carries is
//! rebuilt from the catalog when the snapshot is restored.

pub mod atomic_write;
pub mod save_plugin;
pub mod snapshot;
pub mod snapshot_error;
pub mod snapshot_header;

pub use save_plugin::{
    LayoutRestored, LayoutSaved, LoadLayoutEvent, SaveLayoutEvent, SavePlugin, SnapshotFailed,
};
pub use snapshot::{LayoutSnapshot, SnapshotEntry};
pub use snapshot_error::SnapshotError;
