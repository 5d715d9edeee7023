use std::path::PathBuf;

use bevy::prelude::*;

use layout::diagnostics::LayoutDiagnostics;
use layout::{ContentCatalog, LayoutGrid, LayoutSet};

use crate::snapshot::LayoutSnapshot;

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Write the current layout to `path`.
#[derive(Event, Debug, Clone)]
pub struct SaveLayoutEvent {
    pub path: PathBuf,
}

/// Replace the current layout with the snapshot stored at `path`.
#[derive(Event, Debug, Clone)]
pub struct LoadLayoutEvent {
    pub path: PathBuf,
}

#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct LayoutSaved {
    pub path: PathBuf,
    pub cells: usize,
}

#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct LayoutRestored {
    pub path: PathBuf,
    pub cells: usize,
}

/// A save or load that did not complete. The layout is unchanged.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct SnapshotFailed {
    pub path: PathBuf,
    pub error: String,
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

fn save_requested_layouts(
    mut requests: EventReader<SaveLayoutEvent>,
    grid: Res<LayoutGrid>,
    mut saved: EventWriter<LayoutSaved>,
    mut failed: EventWriter<SnapshotFailed>,
) {
    for request in requests.read() {
        let snapshot = LayoutSnapshot::capture(&grid);
        match snapshot.save_to_file(&request.path) {
            Ok(()) => {
                info!(
                    "Saved layout ({} cells) to {}",
                    snapshot.entries.len(),
                    request.path.display()
                );
                saved.send(LayoutSaved {
                    path: request.path.clone(),
                    cells: snapshot.entries.len(),
                });
            }
            Err(e) => {
                error!("Save failed for {}: {e}", request.path.display());
                failed.send(SnapshotFailed {
                    path: request.path.clone(),
                    error: e.to_string(),
                });
            }
        }
    }
}

fn load_requested_layouts(
    mut requests: EventReader<LoadLayoutEvent>,
    mut grid: ResMut<LayoutGrid>,
    catalog: Res<ContentCatalog>,
    diagnostics: Res<LayoutDiagnostics>,
    mut restored: EventWriter<LayoutRestored>,
    mut failed: EventWriter<SnapshotFailed>,
) {
    for request in requests.read() {
        let result = LayoutSnapshot::load_from_file(&request.path)
            .and_then(|snapshot| snapshot.restore(&mut grid, &catalog, diagnostics.sink()));
        match result {
            Ok(cells) => {
                info!("Restored {cells} cells from {}", request.path.display());
                restored.send(LayoutRestored {
                    path: request.path.clone(),
                    cells,
                });
            }
            Err(e) => {
                warn!("Load failed for {}: {e}", request.path.display());
                failed.send(SnapshotFailed {
                    path: request.path.clone(),
                    error: e.to_string(),
                });
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

/// Saves and restores the `LayoutGrid` resource. Runs between assignment and
/// streaming, so a load request sent alongside a restore sees the restored
/// cells.
pub struct SavePlugin;

impl Plugin for SavePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<SaveLayoutEvent>()
            .add_event::<LoadLayoutEvent>()
            .add_event::<LayoutSaved>()
            .add_event::<LayoutRestored>()
            .add_event::<SnapshotFailed>()
            .add_systems(
                Update,
                (save_requested_layouts, load_requested_layouts)
                    .chain()
                    .after(LayoutSet::Assign)
                    .before(LayoutSet::Stream),
            );
    }
}
