//! Event-driven access to the layout grid from a Bevy app.
//!
//! Generators send `AssignCellContent`, `LoadCellContent` and
//! `UnloadCellContent`; the systems here apply them to `LayoutGrid` in send
//! order and answer with `CellContentAssigned`, `CellAssignmentRejected` and
//! `CellContentLoaded`.
//!
//! ```text
//! LayoutSet::Assign  →  LayoutSet::Stream
//! ```
//!
//! * **Assign** – apply assignment requests, validating first when asked.
//! * **Stream** – start loads, release unloaded cells, deliver finished loads.

use bevy::prelude::*;

use crate::catalog::{ContentCatalog, ContentId};
use crate::config::LayoutConfig;
use crate::diagnostics::{LayoutDiagnostic, LayoutDiagnostics};
use crate::grid::{LayoutGrid, LoadOutcome};
use crate::query::LayoutQuery;
use crate::streaming::ContentStreaming;
use crate::validators::ValidatorRegistry;

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Put `content` at `rotation` into the cell at `position`, or clear it when
/// `content` is `None`. With `validate` the candidate must pass
/// `validate_candidate` first; clearing is never validated.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct AssignCellContent {
    pub position: IVec2,
    pub content: Option<ContentId>,
    pub rotation: i32,
    pub validate: bool,
}

impl AssignCellContent {
    pub fn place(position: IVec2, content: impl Into<ContentId>, rotation: i32) -> Self {
        Self {
            position,
            content: Some(content.into()),
            rotation,
            validate: true,
        }
    }

    pub fn force(position: IVec2, content: impl Into<ContentId>, rotation: i32) -> Self {
        Self {
            validate: false,
            ..Self::place(position, content, rotation)
        }
    }

    pub fn clear(position: IVec2) -> Self {
        Self {
            position,
            content: None,
            rotation: 0,
            validate: false,
        }
    }
}

/// An assignment was committed.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct CellContentAssigned {
    pub position: IVec2,
    pub content: Option<ContentId>,
    pub rotation: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    OutOfBounds,
    UnknownContent,
    FailedValidation,
}

/// An assignment request left its cell unchanged.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct CellAssignmentRejected {
    pub position: IVec2,
    pub content: Option<ContentId>,
    pub rotation: i32,
    pub reason: RejectReason,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadCellContent {
    pub position: IVec2,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnloadCellContent {
    pub position: IVec2,
}

/// A cell's content finished loading and `receivers` entities got layout data.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellContentLoaded {
    pub position: IVec2,
    pub receivers: usize,
}

// ---------------------------------------------------------------------------
// Sets
// ---------------------------------------------------------------------------

/// Ordered phases of the layout systems in `Update`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum LayoutSet {
    Assign,
    Stream,
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

/// Applies assignment requests in the order they were sent, so each request
/// sees the cells committed before it.
pub fn apply_cell_assignments(
    mut requests: EventReader<AssignCellContent>,
    mut grid: ResMut<LayoutGrid>,
    catalog: Res<ContentCatalog>,
    diagnostics: Res<LayoutDiagnostics>,
    mut assigned: EventWriter<CellContentAssigned>,
    mut rejected: EventWriter<CellAssignmentRejected>,
) {
    for request in requests.read() {
        let reject = |reason| CellAssignmentRejected {
            position: request.position,
            content: request.content.clone(),
            rotation: request.rotation,
            reason,
        };

        if !grid.in_bounds(request.position) {
            rejected.send(reject(RejectReason::OutOfBounds));
            continue;
        }
        if let Some(content) = request.content.as_ref() {
            if !catalog.contains(content) {
                diagnostics.sink().report(LayoutDiagnostic::UnknownContent {
                    cell: request.position,
                    content: content.clone(),
                    catalog: catalog.name().to_string(),
                });
                rejected.send(reject(RejectReason::UnknownContent));
                continue;
            }
            if request.validate
                && !grid.validate_candidate(
                    request.position,
                    &catalog,
                    content,
                    request.rotation,
                    diagnostics.sink(),
                )
            {
                debug!(
                    "Layout: rejected '{}' rot {} at ({}, {})",
                    content, request.rotation, request.position.x, request.position.y
                );
                rejected.send(reject(RejectReason::FailedValidation));
                continue;
            }
        }

        grid.assign(
            request.position,
            request.content.as_ref(),
            request.rotation,
            &catalog,
            diagnostics.sink(),
        );
        let rotation = grid
            .cell(request.position)
            .map(|c| c.rotation())
            .unwrap_or_default();
        match request.content.as_ref() {
            Some(content) => info!(
                "Layout: assigned '{}' rot {} at ({}, {})",
                content, rotation, request.position.x, request.position.y
            ),
            None => info!(
                "Layout: cleared ({}, {})",
                request.position.x, request.position.y
            ),
        }
        assigned.send(CellContentAssigned {
            position: request.position,
            content: request.content.clone(),
            rotation,
        });
    }
}

pub fn load_requested_content(
    mut requests: EventReader<LoadCellContent>,
    mut grid: ResMut<LayoutGrid>,
    mut streaming: ResMut<ContentStreaming>,
    diagnostics: Res<LayoutDiagnostics>,
    mut loaded: EventWriter<CellContentLoaded>,
) {
    for request in requests.read() {
        let outcome = grid.load_content(request.position, streaming.0.as_mut(), diagnostics.sink());
        debug!(
            "Layout: load at ({}, {}) -> {:?}",
            request.position.x, request.position.y, outcome
        );
        if let Some(LoadOutcome::Loaded { delivered, .. }) = outcome {
            loaded.send(CellContentLoaded {
                position: request.position,
                receivers: delivered,
            });
        }
    }
}

pub fn unload_requested_content(
    mut requests: EventReader<UnloadCellContent>,
    mut grid: ResMut<LayoutGrid>,
) {
    for request in requests.read() {
        if grid.unload_content(request.position) {
            debug!(
                "Layout: unloaded ({}, {})",
                request.position.x, request.position.y
            );
        }
    }
}

/// Delivers loads the streamer finished since the last frame.
pub fn poll_content_streaming(
    mut grid: ResMut<LayoutGrid>,
    mut streaming: ResMut<ContentStreaming>,
    mut loaded: EventWriter<CellContentLoaded>,
) {
    for (position, receivers) in grid.poll_streamer(streaming.0.as_mut()) {
        loaded.send(CellContentLoaded {
            position,
            receivers,
        });
    }
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

/// Registers layout resources, events and systems.
///
/// Resources already present are kept, so an app can insert its own
/// `LayoutConfig`, `ContentCatalog` or `ContentStreaming` before adding the
/// plugin.
pub struct LayoutPlugin;

impl Plugin for LayoutPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LayoutConfig>()
            .init_resource::<LayoutGrid>()
            .init_resource::<ContentCatalog>()
            .init_resource::<ValidatorRegistry>()
            .init_resource::<LayoutDiagnostics>()
            .init_resource::<ContentStreaming>()
            .add_event::<AssignCellContent>()
            .add_event::<CellContentAssigned>()
            .add_event::<CellAssignmentRejected>()
            .add_event::<LoadCellContent>()
            .add_event::<UnloadCellContent>()
            .add_event::<CellContentLoaded>()
            .configure_sets(Update, (LayoutSet::Assign, LayoutSet::Stream).chain())
            .add_systems(Update, apply_cell_assignments.in_set(LayoutSet::Assign))
            .add_systems(
                Update,
                (
                    load_requested_content,
                    unload_requested_content,
                    poll_content_streaming,
                )
                    .chain()
                    .in_set(LayoutSet::Stream),
            );
    }
}
