//! Shared catalog, streamer and receiver fixtures.

use std::sync::{Arc, Mutex};

use bevy::prelude::*;

use crate::catalog::{ContentCatalog, ContentDefinition, ContentId};
use crate::cell::CellState;
use crate::query::LayoutQuery;
use crate::sides::CellSides;
use crate::streaming::{
    Bounds, ContentEntity, LayoutDataReceiver, LoadRequest, LoadedInstance, QueuedStreamer,
};

/// Catalog name the fixtures are registered under.
pub const FIXTURE_CATALOG: &str = "Fixtures";

/// Asset the fixture streamer does not know, for missing-asset paths.
pub const MISSING_ASSET: &str = "cells/missing";

/// Half extents of the floor entity every fixture asset spawns.
pub const FLOOR_HALF_EXTENTS: Vec3 = Vec3::new(400.0, 50.0, 400.0);

/// Rows in authoring order. Patterns are unrotated:
///
/// | row      | connects        | disables | assets          |
/// |----------|-----------------|----------|-----------------|
/// | Cross    | all             | -        | 1               |
/// | Straight | +X -X           | -        | 2               |
/// | Corner   | +X +Y           | -        | 1               |
/// | Tee      | +X +Y -X        | -        | 1               |
/// | DeadEnd  | +X              | -        | 1               |
/// | Gate     | +X -X           | +Y       | 1               |
/// | Closed   | none            | -        | none            |
/// | Unset    | +X              | -        | one blank entry |
/// | Ghost    | +X              | -        | unknown asset   |
pub fn fixture_catalog() -> ContentCatalog {
    ContentCatalog::new(FIXTURE_CATALOG)
        .with_row(
            "Cross",
            ContentDefinition::new(CellSides::ALL).with_assets(["cells/cross"]),
        )
        .with_row(
            "Straight",
            ContentDefinition::new(CellSides::new(true, false, true, false))
                .with_assets(["cells/straight_a", "cells/straight_b"]),
        )
        .with_row(
            "Corner",
            ContentDefinition::new(CellSides::new(true, true, false, false))
                .with_assets(["cells/corner"]),
        )
        .with_row(
            "Tee",
            ContentDefinition::new(CellSides::new(true, true, true, false))
                .with_assets(["cells/tee"]),
        )
        .with_row(
            "DeadEnd",
            ContentDefinition::new(CellSides::new(true, false, false, false))
                .with_assets(["cells/dead_end"]),
        )
        .with_row(
            "Gate",
            ContentDefinition::new(CellSides::new(true, false, true, false))
                .disabling(CellSides::new(false, true, false, false))
                .with_assets(["cells/gate"]),
        )
        .with_row("Closed", ContentDefinition::new(CellSides::NONE))
        .with_row(
            "Unset",
            ContentDefinition::new(CellSides::new(true, false, false, false)).with_assets([""]),
        )
        .with_row(
            "Ghost",
            ContentDefinition::new(CellSides::new(true, false, false, false))
                .with_assets([MISSING_ASSET]),
        )
}

/// Every asset named by `fixture_catalog` except `MISSING_ASSET`.
pub const FIXTURE_ASSETS: [&str; 7] = [
    "cells/cross",
    "cells/straight_a",
    "cells/straight_b",
    "cells/corner",
    "cells/tee",
    "cells/dead_end",
    "cells/gate",
];

// ---------------------------------------------------------------------------
// Receivers
// ---------------------------------------------------------------------------

/// One `on_layout_data_received` call.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceivedLayoutData {
    pub receiver: String,
    pub cell: IVec2,
    pub content: Option<ContentId>,
    pub seed: i32,
    pub required: CellSides,
}

/// Shared record of every delivery, across all instances.
#[derive(Debug, Clone, Default)]
pub struct ReceiverLog(Arc<Mutex<Vec<ReceivedLayoutData>>>);

impl ReceiverLog {
    pub fn entries(&self) -> Vec<ReceivedLayoutData> {
        self.0.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn for_cell(&self, cell: IVec2) -> Vec<ReceivedLayoutData> {
        self.entries().into_iter().filter(|e| e.cell == cell).collect()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&self, data: ReceivedLayoutData) {
        if let Ok(mut entries) = self.0.lock() {
            entries.push(data);
        }
    }
}

pub struct RecordingReceiver {
    name: String,
    log: ReceiverLog,
}

impl RecordingReceiver {
    pub fn new(name: impl Into<String>, log: ReceiverLog) -> Self {
        Self {
            name: name.into(),
            log,
        }
    }
}

impl LayoutDataReceiver for RecordingReceiver {
    fn on_layout_data_received(&mut self, layout: &dyn LayoutQuery, cell: &CellState, seed: i32) {
        self.log.push(ReceivedLayoutData {
            receiver: self.name.clone(),
            cell: cell.position(),
            content: cell.content().cloned(),
            seed,
            required: cell.required_connections(layout),
        });
    }
}

// ---------------------------------------------------------------------------
// Streamer
// ---------------------------------------------------------------------------

/// Instance every fixture asset spawns, centered on the requested position:
/// `Floor` (no receiver), `Spawner` and `Lights` (receivers), in that order.
pub fn fixture_instance(request: &LoadRequest, log: &ReceiverLog) -> LoadedInstance {
    LoadedInstance::new(vec![
        ContentEntity::new("Floor", Bounds::new(request.position, FLOOR_HALF_EXTENTS)),
        ContentEntity::new("Spawner", Bounds::new(request.position, Vec3::splat(10.0)))
            .with_receiver(RecordingReceiver::new("Spawner", log.clone())),
        ContentEntity::new("Lights", Bounds::new(request.position, Vec3::splat(10.0)))
            .with_receiver(RecordingReceiver::new("Lights", log.clone())),
    ])
}

/// Deferred streamer knowing every fixture asset.
pub fn fixture_streamer(log: &ReceiverLog) -> QueuedStreamer {
    let mut streamer = QueuedStreamer::new();
    for asset in FIXTURE_ASSETS {
        let log = log.clone();
        streamer.register_asset(asset, move |request: &LoadRequest| fixture_instance(request, &log));
    }
    streamer
}
