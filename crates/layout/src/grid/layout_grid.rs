use bevy::prelude::*;

use crate::catalog::{ContentCatalog, ContentId};
use crate::cell::{deliver_layout_data, CellState, LayoutCell, LoadStart};
use crate::config::LayoutConfig;
use crate::diagnostics::DiagnosticsSink;
use crate::query::LayoutQuery;
use crate::rng::cell_seed;
use crate::streaming::{CompletedLoad, ContentStreamer, InstanceId};

/// Maps grid coordinates to world space. Grid X runs along world X, grid Y
/// along world Z; cells sit on the plane through `origin`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridTransform {
    pub origin: Vec3,
    pub cell_size: f32,
}

impl GridTransform {
    pub fn cell_to_world(&self, position: IVec2) -> Vec3 {
        self.origin + Vec3::new(position.x as f32, 0.0, position.y as f32) * self.cell_size
    }

    /// Cell whose center is nearest to `world`, ignoring height.
    pub fn world_to_cell(&self, world: Vec3) -> IVec2 {
        let local = (world - self.origin) / self.cell_size;
        IVec2::new(local.x.round() as i32, local.z.round() as i32)
    }
}

/// Result of `LayoutGrid::load_content`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    AlreadyLoaded,
    NoAsset,
    Failed,
    /// Requested; completion arrives through `poll_streamer`.
    Pending(InstanceId),
    /// Loaded synchronously and delivered to `delivered` receivers.
    Loaded { instance: InstanceId, delivered: usize },
}

/// The full grid of layout cells. Size, origin, cell size and seed are fixed
/// at construction and every position holds a cell from the start.
#[derive(Resource)]
pub struct LayoutGrid {
    cells: Vec<LayoutCell>,
    width: u32,
    height: u32,
    seed: u32,
    transform: GridTransform,
}

impl FromWorld for LayoutGrid {
    fn from_world(world: &mut World) -> Self {
        let config = world
            .get_resource::<LayoutConfig>()
            .cloned()
            .unwrap_or_default();
        Self::new(&config)
    }
}

impl LayoutGrid {
    pub fn new(config: &LayoutConfig) -> Self {
        let mut cells = Vec::with_capacity((config.width * config.height) as usize);
        for y in 0..config.height as i32 {
            for x in 0..config.width as i32 {
                let position = IVec2::new(x, y);
                cells.push(LayoutCell::new(position, cell_seed(config.seed, position)));
            }
        }
        Self {
            cells,
            width: config.width,
            height: config.height,
            seed: config.seed,
            transform: GridTransform {
                origin: config.origin,
                cell_size: config.cell_size,
            },
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn transform(&self) -> &GridTransform {
        &self.transform
    }

    pub fn cell_size(&self) -> f32 {
        self.transform.cell_size
    }

    #[inline]
    pub fn index(&self, position: IVec2) -> Option<usize> {
        self.in_bounds(position)
            .then(|| position.y as usize * self.width as usize + position.x as usize)
    }

    pub fn cell(&self, position: IVec2) -> Option<&LayoutCell> {
        self.index(position).map(|i| &self.cells[i])
    }

    pub fn cell_mut(&mut self, position: IVec2) -> Option<&mut LayoutCell> {
        self.index(position).map(move |i| &mut self.cells[i])
    }

    /// All cells, row by row from y = 0.
    pub fn cells(&self) -> impl Iterator<Item = &LayoutCell> {
        self.cells.iter()
    }

    pub fn generated_cells(&self) -> impl Iterator<Item = &LayoutCell> {
        self.cells.iter().filter(|c| c.is_generated())
    }

    pub fn world_position(&self, position: IVec2) -> Vec3 {
        self.transform.cell_to_world(position)
    }

    // -----------------------------------------------------------------------
    // Cell operations by position
    // -----------------------------------------------------------------------

    /// `false` for positions outside the grid.
    pub fn validate_candidate(
        &self,
        position: IVec2,
        catalog: &ContentCatalog,
        content: &ContentId,
        rotation: i32,
        diagnostics: &dyn DiagnosticsSink,
    ) -> bool {
        self.cell(position).is_some_and(|cell| {
            cell.validate_candidate(self, catalog, content, rotation, diagnostics)
        })
    }

    /// See `LayoutCell::assign`. `false` for positions outside the grid.
    pub fn assign(
        &mut self,
        position: IVec2,
        content: Option<&ContentId>,
        rotation: i32,
        catalog: &ContentCatalog,
        diagnostics: &dyn DiagnosticsSink,
    ) -> bool {
        self.cell_mut(position)
            .is_some_and(|cell| cell.assign(content, rotation, catalog, diagnostics))
    }

    /// Every catalog row and rotation that currently validates at `position`,
    /// in catalog order then rotation order.
    pub fn valid_candidates(
        &self,
        position: IVec2,
        catalog: &ContentCatalog,
        diagnostics: &dyn DiagnosticsSink,
    ) -> Vec<(ContentId, u8)> {
        let Some(cell) = self.cell(position) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for (id, _) in catalog.rows() {
            for rotation in 0..4u8 {
                if cell.validate_candidate(self, catalog, id, i32::from(rotation), diagnostics) {
                    out.push((id.clone(), rotation));
                }
            }
        }
        out
    }

    /// Start loading the cell's content. A synchronous load is delivered
    /// before this returns. `None` for positions outside the grid.
    pub fn load_content(
        &mut self,
        position: IVec2,
        streamer: &mut dyn ContentStreamer,
        diagnostics: &dyn DiagnosticsSink,
    ) -> Option<LoadOutcome> {
        let index = self.index(position)?;
        let transform = self.transform;
        let outcome = match self.cells[index].load_content(&transform, streamer, diagnostics) {
            LoadStart::AlreadyLoaded => LoadOutcome::AlreadyLoaded,
            LoadStart::NoAsset => LoadOutcome::NoAsset,
            LoadStart::Failed => LoadOutcome::Failed,
            LoadStart::Pending(instance) => LoadOutcome::Pending(instance),
            LoadStart::Ready(completed) => {
                let instance = completed.instance;
                let delivered = self.complete_load(completed).unwrap_or(0);
                LoadOutcome::Loaded {
                    instance,
                    delivered,
                }
            }
        };
        Some(outcome)
    }

    pub fn unload_content(&mut self, position: IVec2) -> bool {
        self.cell_mut(position).is_some_and(|cell| cell.unload_content())
    }

    /// Deliver a finished load to its cell. Returns how many entities
    /// received layout data, or `None` when the cell no longer awaits this
    /// instance (unloaded or reassigned meanwhile).
    pub fn complete_load(&mut self, mut completed: CompletedLoad) -> Option<usize> {
        let index = self.index(completed.cell)?;
        if !self.cells[index].awaits(completed.instance) {
            debug!(
                "LayoutGrid: dropping stale completion {} for cell ({}, {})",
                completed.instance, completed.cell.x, completed.cell.y
            );
            return None;
        }
        let delivered = deliver_layout_data(&*self, self.cells[index].state(), &mut completed.content);
        self.cells[index].attach(completed.content);
        Some(delivered)
    }

    /// Drain `streamer` and deliver everything it finished. Returns the cells
    /// that completed with their delivery counts.
    pub fn poll_streamer(&mut self, streamer: &mut dyn ContentStreamer) -> Vec<(IVec2, usize)> {
        let mut done = Vec::new();
        for completed in streamer.poll_completed() {
            let cell = completed.cell;
            if let Some(delivered) = self.complete_load(completed) {
                done.push((cell, delivered));
            }
        }
        done
    }

    /// First cell whose loaded content contains `point`.
    pub fn contains_point(&self, point: Vec3) -> Option<IVec2> {
        self.cells
            .iter()
            .find(|c| c.contains_point(point))
            .map(|c| c.position())
    }

    /// Reset every cell, releasing all loaded content.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
    }
}

impl LayoutQuery for LayoutGrid {
    fn dimensions(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }

    fn cell_state(&self, position: IVec2) -> Option<&CellState> {
        self.cell(position).map(|c| c.state())
    }
}
