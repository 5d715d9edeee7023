use bevy::prelude::*;

use layout::grid::LayoutGrid;
use layout::plugin::LayoutSet;

use crate::cell_debug::{draw_cell_debug, DebugDraw};

/// Toggles for the layout debug overlay.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutDebugSettings {
    pub enabled: bool,
    /// Log every generated cell's summary whenever the grid changes.
    pub show_text: bool,
    /// Include cells that were never assigned.
    pub include_empty: bool,
}

impl Default for LayoutDebugSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            show_text: false,
            include_empty: false,
        }
    }
}

/// Immediate-mode lines through Bevy gizmos. Gizmos cannot render text, so
/// text is dropped here and logged by `log_cell_summaries` instead.
pub struct GizmoDrawer<'a, 'w, 's> {
    gizmos: &'a mut Gizmos<'w, 's>,
}

impl<'a, 'w, 's> GizmoDrawer<'a, 'w, 's> {
    pub fn new(gizmos: &'a mut Gizmos<'w, 's>) -> Self {
        Self { gizmos }
    }
}

impl DebugDraw for GizmoDrawer<'_, '_, '_> {
    fn line(&mut self, start: Vec3, end: Vec3, color: Color) {
        self.gizmos.line(start, end, color);
    }

    fn text(&mut self, _anchor: Vec3, _text: &str) {}
}

/// Text to the log at debug level; lines are dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDrawer;

impl DebugDraw for LogDrawer {
    fn line(&mut self, _start: Vec3, _end: Vec3, _color: Color) {}

    fn text(&mut self, anchor: Vec3, text: &str) {
        debug!("Layout cell at {anchor}:\n{text}");
    }
}

pub fn draw_layout_debug(
    grid: Res<LayoutGrid>,
    settings: Res<LayoutDebugSettings>,
    mut gizmos: Gizmos,
) {
    if !settings.enabled {
        return;
    }
    let mut drawer = GizmoDrawer::new(&mut gizmos);
    for cell in grid.cells() {
        if settings.include_empty || cell.is_generated() {
            draw_cell_debug(&grid, cell.position(), &mut drawer, false);
        }
    }
}

pub fn log_cell_summaries(grid: Res<LayoutGrid>, settings: Res<LayoutDebugSettings>) {
    if !settings.enabled || !settings.show_text || !grid.is_changed() {
        return;
    }
    let mut drawer = LogDrawer;
    for cell in grid.cells() {
        if settings.include_empty || cell.is_generated() {
            draw_cell_debug(&grid, cell.position(), &mut drawer, true);
        }
    }
}

/// Debug overlay for `LayoutPlugin`. Needs gizmos, so add it only to apps
/// that render.
pub struct LayoutDebugPlugin;

impl Plugin for LayoutDebugPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LayoutDebugSettings>().add_systems(
            Update,
            (draw_layout_debug, log_cell_summaries).after(LayoutSet::Stream),
        );
    }
}
