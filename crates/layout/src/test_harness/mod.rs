//! # TestLayout – fixtures for layout tests and benches
//!
//! `TestLayout` drives a `LayoutGrid` directly against the fixture catalog,
//! recording diagnostics and receiver deliveries. `TestLayoutApp` wraps a
//! headless Bevy `App` with `LayoutPlugin` for event-level tests.

mod app;
mod fixtures;

pub use app::TestLayoutApp;
pub use fixtures::*;

use bevy::prelude::*;

use crate::catalog::{ContentCatalog, ContentId};
use crate::cell::LayoutCell;
use crate::config::LayoutConfig;
use crate::diagnostics::RecordingDiagnostics;
use crate::grid::{LayoutGrid, LoadOutcome};
use crate::streaming::QueuedStreamer;

/// A layout grid plus everything its operations need, with recording sinks.
pub struct TestLayout {
    pub grid: LayoutGrid,
    pub catalog: ContentCatalog,
    pub diagnostics: RecordingDiagnostics,
    pub streamer: QueuedStreamer,
    pub received: ReceiverLog,
}

impl TestLayout {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// Empty `width` x `height` grid, seed 0, fixture catalog, deferred
    /// fixture streamer.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_config(LayoutConfig::with_size(width, height))
    }

    pub fn with_config(config: LayoutConfig) -> Self {
        let received = ReceiverLog::default();
        Self {
            grid: LayoutGrid::new(&config),
            catalog: fixture_catalog(),
            diagnostics: RecordingDiagnostics::new(),
            streamer: fixture_streamer(&received),
            received,
        }
    }

    pub fn with_catalog(mut self, catalog: ContentCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Switch to a streamer that completes loads inside `load_content`.
    pub fn synchronous(mut self) -> Self {
        self.streamer = fixture_streamer(&self.received).synchronous();
        self
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Commit without validating.
    pub fn assign(&mut self, position: IVec2, content: &str, rotation: i32) -> bool {
        let id = ContentId::from(content);
        self.grid
            .assign(position, Some(&id), rotation, &self.catalog, &self.diagnostics)
    }

    pub fn clear(&mut self, position: IVec2) -> bool {
        self.grid
            .assign(position, None, 0, &self.catalog, &self.diagnostics)
    }

    pub fn validate(&self, position: IVec2, content: &str, rotation: i32) -> bool {
        self.grid.validate_candidate(
            position,
            &self.catalog,
            &ContentId::from(content),
            rotation,
            &self.diagnostics,
        )
    }

    /// Validate, then commit when valid.
    pub fn place(&mut self, position: IVec2, content: &str, rotation: i32) -> bool {
        self.validate(position, content, rotation) && self.assign(position, content, rotation)
    }

    pub fn load(&mut self, position: IVec2) -> Option<LoadOutcome> {
        self.grid
            .load_content(position, &mut self.streamer, &self.diagnostics)
    }

    /// Deliver everything the streamer has finished.
    pub fn poll(&mut self) -> Vec<(IVec2, usize)> {
        self.grid.poll_streamer(&mut self.streamer)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn cell(&self, position: IVec2) -> &LayoutCell {
        self.grid
            .cell(position)
            .unwrap_or_else(|| panic!("no cell at {position}"))
    }
}
