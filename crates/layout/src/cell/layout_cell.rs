use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;

use crate::catalog::{AssetPath, ContentCatalog, ContentId};
use crate::diagnostics::{DiagnosticsSink, LayoutDiagnostic};
use crate::grid::GridTransform;
use crate::query::{CandidateView, LayoutQuery};
use crate::rng::CellRng;
use crate::sides::CellSides;
use crate::streaming::{
    CompletedLoad, ContentEntity, ContentHandle, ContentStreamer, InstanceId, LoadRequest,
    LoadedInstance,
};

use super::state::{normalize_rotation, CellState};

/// Outcome of `LayoutCell::load_content`.
#[derive(Debug)]
pub enum LoadStart {
    /// A handle is already held; nothing was requested.
    AlreadyLoaded,
    /// No asset selected for this cell.
    NoAsset,
    /// The streamer does not know the selected asset.
    Failed,
    /// Instantiation is in flight; completion arrives through the streamer.
    Pending(InstanceId),
    /// Loaded synchronously; hand this to the grid for delivery.
    Ready(CompletedLoad),
}

struct LoadedContent {
    handle: ContentHandle,
    instance: Option<LoadedInstance>,
}

/// One grid position: its logical state, the asset chosen for its content,
/// and ownership of that asset's streamed instance.
pub struct LayoutCell {
    state: CellState,
    asset: Option<AssetPath>,
    loaded: Option<LoadedContent>,
}

impl LayoutCell {
    pub fn new(position: IVec2, unique_seed: u32) -> Self {
        Self {
            state: CellState::empty(position, unique_seed),
            asset: None,
            loaded: None,
        }
    }

    pub fn state(&self) -> &CellState {
        &self.state
    }

    pub fn position(&self) -> IVec2 {
        self.state.position()
    }

    pub fn rotation(&self) -> u8 {
        self.state.rotation()
    }

    pub fn content(&self) -> Option<&ContentId> {
        self.state.content()
    }

    pub fn has_connections(&self) -> CellSides {
        self.state.has_connections()
    }

    pub fn disable_neighbour_sides(&self) -> CellSides {
        self.state.disable_neighbour_sides()
    }

    pub fn is_generated(&self) -> bool {
        self.state.is_generated()
    }

    pub fn unique_seed(&self) -> u32 {
        self.state.unique_seed()
    }

    /// Asset picked for this cell's content, if any.
    pub fn asset(&self) -> Option<&AssetPath> {
        self.asset.as_ref()
    }

    pub fn unique_sublevel_name(&self) -> String {
        let p = self.position();
        format!("LayoutCell_{}_{}_Sublevel", p.x, p.y)
    }

    // -----------------------------------------------------------------------
    // Geometry
    // -----------------------------------------------------------------------

    pub fn world_position(&self, transform: &GridTransform) -> Vec3 {
        transform.cell_to_world(self.position())
    }

    /// Quarter turns about the vertical axis. A turn carries world +X onto
    /// world +Z, matching the side rotation +X -> +Y on the grid.
    pub fn world_rotation(&self) -> Quat {
        Quat::from_rotation_y(-FRAC_PI_2 * f32::from(self.rotation()))
    }

    // -----------------------------------------------------------------------
    // Neighbour constraints
    // -----------------------------------------------------------------------

    pub fn required_connections(&self, layout: &(impl LayoutQuery + ?Sized)) -> CellSides {
        self.state.required_connections(layout)
    }

    pub fn blocked_connections(&self, layout: &(impl LayoutQuery + ?Sized)) -> CellSides {
        self.state.blocked_connections(layout)
    }

    pub fn is_blocked_by_neighbour(&self, layout: &(impl LayoutQuery + ?Sized)) -> bool {
        self.state.is_blocked_by_neighbour(layout)
    }

    pub fn is_required_to_generate(&self, layout: &(impl LayoutQuery + ?Sized)) -> bool {
        self.state.is_required_to_generate(layout)
    }

    // -----------------------------------------------------------------------
    // Validation and assignment
    // -----------------------------------------------------------------------

    /// Whether `content` at `rotation` could be placed here right now.
    ///
    /// The candidate is simulated on a copy of this cell's state; the live
    /// cell and its neighbours are never touched. Spawn validators run first,
    /// in catalog order, each with a fresh stream from the unique seed, and
    /// stop at the first rejection.
    pub fn validate_candidate(
        &self,
        layout: &(impl LayoutQuery + ?Sized),
        catalog: &ContentCatalog,
        content: &ContentId,
        rotation: i32,
        diagnostics: &dyn DiagnosticsSink,
    ) -> bool {
        let Some(definition) = catalog.lookup(content) else {
            diagnostics.report(LayoutDiagnostic::UnknownContent {
                cell: self.position(),
                content: content.clone(),
                catalog: catalog.name().to_string(),
            });
            return false;
        };

        let candidate = self
            .state
            .with_pattern(content.clone(), definition, normalize_rotation(rotation));
        let view = CandidateView::new(layout, &candidate);

        let validators_pass = definition.validators.iter().all(|validator| {
            let mut rng = candidate.random_stream();
            validator.is_valid_spawn(&view, &candidate, &mut rng)
        });

        validators_pass && candidate.fits_neighbours(&view)
    }

    /// Commit `content` at `rotation`, or clear the cell when `content` is
    /// `None`. Does not validate. Returns `false` and leaves the cell
    /// untouched when the content id is unknown.
    pub fn assign(
        &mut self,
        content: Option<&ContentId>,
        rotation: i32,
        catalog: &ContentCatalog,
        diagnostics: &dyn DiagnosticsSink,
    ) -> bool {
        let Some(content) = content else {
            self.clear();
            return true;
        };

        let Some(definition) = catalog.lookup(content) else {
            diagnostics.report(LayoutDiagnostic::UnknownContent {
                cell: self.position(),
                content: content.clone(),
                catalog: catalog.name().to_string(),
            });
            return false;
        };

        self.state = self
            .state
            .with_pattern(content.clone(), definition, normalize_rotation(rotation))
            .generated();
        self.asset = select_asset(&definition.assets, &mut self.state.random_stream());
        self.loaded = None;
        true
    }

    /// Back to unassigned: no content, empty patterns, instance released.
    pub fn clear(&mut self) {
        self.state = CellState::empty(self.position(), self.unique_seed());
        self.asset = None;
        self.loaded = None;
    }

    // -----------------------------------------------------------------------
    // Content lifecycle
    // -----------------------------------------------------------------------

    /// Ask `streamer` to instantiate this cell's asset at the cell's world
    /// transform.
    pub fn load_content(
        &mut self,
        transform: &GridTransform,
        streamer: &mut dyn ContentStreamer,
        diagnostics: &dyn DiagnosticsSink,
    ) -> LoadStart {
        if self.loaded.is_some() {
            return LoadStart::AlreadyLoaded;
        }
        let Some(asset) = self.asset.clone() else {
            return LoadStart::NoAsset;
        };

        let request = LoadRequest::new(
            self.position(),
            asset.clone(),
            self.world_position(transform),
            self.world_rotation(),
            self.unique_sublevel_name(),
        );
        let Some(ticket) = streamer.load_instance(request) else {
            diagnostics.report(LayoutDiagnostic::MissingAsset {
                cell: self.position(),
                asset,
            });
            return LoadStart::Failed;
        };

        let instance = ticket.handle.id();
        self.loaded = Some(LoadedContent {
            handle: ticket.handle,
            instance: None,
        });
        match ticket.immediate {
            Some(content) => LoadStart::Ready(CompletedLoad {
                instance,
                cell: self.position(),
                content,
            }),
            None => LoadStart::Pending(instance),
        }
    }

    /// Release the instance, if any, without waiting for the unload.
    pub fn unload_content(&mut self) -> bool {
        self.loaded.take().is_some()
    }

    /// Handle currently owned by this cell.
    pub fn instance_id(&self) -> Option<InstanceId> {
        self.loaded.as_ref().map(|l| l.handle.id())
    }

    /// A load is requested and has not completed yet.
    pub fn is_loading(&self) -> bool {
        self.loaded.as_ref().is_some_and(|l| l.instance.is_none())
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.as_ref().is_some_and(|l| l.instance.is_some())
    }

    /// Whether a completion for `instance` belongs to this cell's current,
    /// still-pending load.
    pub fn awaits(&self, instance: InstanceId) -> bool {
        self.loaded
            .as_ref()
            .is_some_and(|l| l.handle.id() == instance && l.instance.is_none())
    }

    pub(crate) fn attach(&mut self, content: LoadedInstance) {
        if let Some(loaded) = self.loaded.as_mut() {
            loaded.instance = Some(content);
        }
    }

    /// Top-level entities of the loaded content; empty until loaded.
    pub fn entities(&self) -> &[ContentEntity] {
        self.loaded
            .as_ref()
            .and_then(|l| l.instance.as_ref())
            .map(|i| i.entities.as_slice())
            .unwrap_or_default()
    }

    /// Whether `point` lies inside any top-level entity of the loaded content.
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.entities().iter().any(|e| e.bounds.contains(point))
    }
}

/// Uniform pick over `assets`. Blank entries count as a pick of nothing.
pub fn select_asset(assets: &[AssetPath], rng: &mut CellRng) -> Option<AssetPath> {
    if assets.is_empty() {
        return None;
    }
    let asset = &assets[rng.index(assets.len())];
    (!asset.is_blank()).then(|| asset.clone())
}

/// Hand each receiving entity of `content` the layout, the cell, and the
/// next value of a fresh stream from the cell's seed, in enumeration order.
/// Returns how many entities received data.
pub fn deliver_layout_data(
    layout: &dyn LayoutQuery,
    cell: &CellState,
    content: &mut LoadedInstance,
) -> usize {
    let mut rng = cell.random_stream();
    let mut delivered = 0;
    for entity in &mut content.entities {
        if let Some(receiver) = entity.receiver.as_mut() {
            receiver.on_layout_data_received(layout, cell, rng.entity_seed());
            delivered += 1;
        }
    }
    delivered
}
