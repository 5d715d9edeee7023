//! In-memory content for the demo: every catalog asset spawns a floor slab
//! and a prop scatterer that logs the seed it receives.

use bevy::prelude::*;

use layout::cell::CellState;
use layout::streaming::{
    Bounds, ContentEntity, LayoutDataReceiver, LoadRequest, LoadedInstance, QueuedStreamer,
};
use layout::{ContentCatalog, LayoutQuery};

/// Fraction of the cell size the floor slab covers on each side of center.
const FLOOR_HALF_FRACTION: f32 = 0.45;
const FLOOR_THICKNESS: f32 = 20.0;

struct PropScatter {
    asset: String,
}

impl LayoutDataReceiver for PropScatter {
    fn on_layout_data_received(&mut self, layout: &dyn LayoutQuery, cell: &CellState, seed: i32) {
        let p = cell.position();
        debug!(
            "{} at ({}, {}): scatter seed {}, {} required sides",
            self.asset,
            p.x,
            p.y,
            seed,
            cell.required_connections(layout).count()
        );
    }
}

fn demo_instance(request: &LoadRequest, cell_size: f32) -> LoadedInstance {
    let half = cell_size * FLOOR_HALF_FRACTION;
    LoadedInstance::new(vec![
        ContentEntity::new(
            "Floor",
            Bounds::new(request.position, Vec3::new(half, FLOOR_THICKNESS, half)),
        ),
        ContentEntity::new("Props", Bounds::new(request.position, Vec3::splat(half * 0.5)))
            .with_receiver(PropScatter {
                asset: request.asset.to_string(),
            }),
    ])
}

/// Deferred streamer that knows every non-blank asset named by `catalog`.
pub fn demo_streamer(catalog: &ContentCatalog, cell_size: f32) -> QueuedStreamer {
    let mut streamer = QueuedStreamer::new();
    for (_, definition) in catalog.rows() {
        for asset in definition.assets.iter().filter(|a| !a.is_blank()) {
            streamer.register_asset(asset.clone(), move |request: &LoadRequest| {
                demo_instance(request, cell_size)
            });
        }
    }
    streamer
}
