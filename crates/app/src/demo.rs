//! The demo run: place a fixed arrangement through plugin events, stream it
//! in, optionally save it, and summarize the result.

use std::fmt;

use bevy::ecs::event::Events;
use bevy::prelude::*;

use layout::ascii::build_layout_map;
use layout::plugin::CellAssignmentRejected;
use layout::streaming::ContentStreaming;
use layout::{
    AssignCellContent, CellContentAssigned, CellContentLoaded, ContentCatalog, LayoutConfig,
    LayoutGrid, LayoutPlugin, LoadCellContent, Side,
};
use save::{LayoutSaved, SaveLayoutEvent, SavePlugin, SnapshotFailed};

use crate::settings::DemoSettings;
use crate::streamer::demo_streamer;

pub const DEMO_WIDTH: u32 = 4;
pub const DEMO_HEIGHT: u32 = 3;

/// Frames to wait for deferred loads before reporting.
pub const MAX_STREAM_TICKS: u32 = 8;

/// A closed loop of halls around a vault, row by row from the bottom.
/// `(x, y, row, rotation)`.
pub const STARTER_ARRANGEMENT: [(i32, i32, &str, i32); 12] = [
    (0, 0, "Bend", 0),
    (1, 0, "Junction", 0),
    (2, 0, "Hall", 0),
    (3, 0, "Bend", 1),
    (0, 1, "Hall", 1),
    (1, 1, "Vault", 3),
    (2, 1, "Wall", 0),
    (3, 1, "Hall", 1),
    (0, 2, "Bend", 3),
    (1, 2, "Hall", 0),
    (2, 2, "Hall", 0),
    (3, 2, "Bend", 2),
];

/// Headless app with layout and save plugins over `catalog`. `setup` runs
/// before the first update; the binary adds logging there.
pub fn build_app_with(
    settings: &DemoSettings,
    catalog: ContentCatalog,
    setup: impl FnOnce(&mut App),
) -> App {
    let config = LayoutConfig::with_size(DEMO_WIDTH, DEMO_HEIGHT).with_seed(settings.seed);
    let streamer = demo_streamer(&catalog, config.cell_size);

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(config)
        .insert_resource(catalog)
        .insert_resource(ContentStreaming::new(streamer))
        .add_plugins((LayoutPlugin, SavePlugin));
    setup(&mut app);
    app.update();
    app
}

fn drain<E: Event>(app: &mut App) -> Vec<E> {
    app.world_mut().resource_mut::<Events<E>>().drain().collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved { path: String, cells: usize },
    Failed { path: String, error: String },
}

#[derive(Debug, Clone)]
pub struct DemoReport {
    pub assigned: usize,
    pub rejected: Vec<CellAssignmentRejected>,
    pub loaded: usize,
    pub receivers: usize,
    pub map: String,
    pub fully_connected: bool,
    pub open_connections: Vec<(IVec2, Side)>,
    pub save: Option<SaveOutcome>,
}

pub fn run_demo(app: &mut App, settings: &DemoSettings) -> DemoReport {
    for (x, y, row, rotation) in STARTER_ARRANGEMENT {
        app.world_mut()
            .send_event(AssignCellContent::place(IVec2::new(x, y), row, rotation));
    }
    app.update();
    let assigned = drain::<CellContentAssigned>(app).len();
    let rejected = drain::<CellAssignmentRejected>(app);

    let (positions, expected) = {
        let grid = app.world().resource::<LayoutGrid>();
        let positions: Vec<IVec2> = grid.generated_cells().map(|c| c.position()).collect();
        let expected = grid.generated_cells().filter(|c| c.asset().is_some()).count();
        (positions, expected)
    };
    for position in positions {
        app.world_mut().send_event(LoadCellContent { position });
    }

    let mut loaded = Vec::new();
    for _ in 0..MAX_STREAM_TICKS {
        app.update();
        loaded.extend(drain::<CellContentLoaded>(app));
        if loaded.len() >= expected {
            break;
        }
    }
    if loaded.len() < expected {
        warn!(
            "Only {} of {} cells finished loading after {} frames",
            loaded.len(),
            expected,
            MAX_STREAM_TICKS
        );
    }

    let save = settings.save_path.as_ref().map(|path| {
        app.world_mut()
            .send_event(SaveLayoutEvent { path: path.clone() });
        app.update();
        let shown = path.display().to_string();
        match (drain::<LayoutSaved>(app).pop(), drain::<SnapshotFailed>(app).pop()) {
            (Some(saved), _) => SaveOutcome::Saved {
                path: shown,
                cells: saved.cells,
            },
            (None, Some(failed)) => SaveOutcome::Failed {
                path: shown,
                error: failed.error,
            },
            (None, None) => SaveOutcome::Failed {
                path: shown,
                error: "no response from the save system".to_string(),
            },
        }
    });

    let grid = app.world().resource::<LayoutGrid>();
    DemoReport {
        assigned,
        rejected,
        loaded: loaded.len(),
        receivers: loaded.iter().map(|l| l.receivers).sum(),
        map: build_layout_map(grid),
        fully_connected: grid.is_fully_connected(),
        open_connections: grid.open_connections(),
        save,
    }
}

impl fmt::Display for DemoReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.map)?;
        writeln!(
            f,
            "Assigned {} cells, {} requests rejected",
            self.assigned,
            self.rejected.len()
        )?;
        for r in &self.rejected {
            let content = r
                .content
                .as_ref()
                .map(|c| c.as_str().to_string())
                .unwrap_or_else(|| "<clear>".to_string());
            writeln!(
                f,
                "  rejected '{}' rot {} at ({}, {}): {:?}",
                content, r.rotation, r.position.x, r.position.y, r.reason
            )?;
        }
        writeln!(
            f,
            "Streamed {} cells, {} receivers notified",
            self.loaded, self.receivers
        )?;
        writeln!(
            f,
            "Fully connected: {}",
            if self.fully_connected { "yes" } else { "no" }
        )?;
        if self.open_connections.is_empty() {
            writeln!(f, "Open connections: none")?;
        } else {
            let open: Vec<String> = self
                .open_connections
                .iter()
                .map(|(p, side)| format!("({}, {}) {}", p.x, p.y, side.label()))
                .collect();
            writeln!(f, "Open connections: {}", open.join(", "))?;
        }
        match &self.save {
            Some(SaveOutcome::Saved { path, cells }) => {
                writeln!(f, "Saved {cells} cells to {path}")?
            }
            Some(SaveOutcome::Failed { path, error }) => {
                writeln!(f, "Save to {path} failed: {error}")?
            }
            None => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layout::plugin::RejectReason;
    use layout::validators::ValidatorRegistry;
    use save::LayoutSnapshot;

    fn demo_catalog() -> ContentCatalog {
        DemoSettings::default()
            .load_catalog(&ValidatorRegistry::default())
            .unwrap()
    }

    fn run(settings: &DemoSettings) -> DemoReport {
        let mut app = build_app_with(settings, demo_catalog(), |_| {});
        run_demo(&mut app, settings)
    }

    #[test]
    fn test_starter_arrangement_is_closed_loop() {
        let report = run(&DemoSettings::default());
        assert_eq!(report.assigned, 12, "{report}");
        assert!(report.rejected.is_empty(), "{report}");
        assert!(report.fully_connected, "{report}");
        assert!(report.open_connections.is_empty(), "{report}");
    }

    #[test]
    fn test_every_cell_with_an_asset_streams_in() {
        let report = run(&DemoSettings::default());
        // The wall has no asset; every other cell spawns one receiver.
        assert_eq!(report.loaded, 11);
        assert_eq!(report.receivers, 11);
    }

    #[test]
    fn test_same_seed_same_map() {
        let settings = DemoSettings {
            seed: 99,
            ..Default::default()
        };
        let a = run(&settings);
        let b = run(&settings);
        assert_eq!(a.map, b.map);
        assert_eq!(format!("{a}"), format!("{b}"));
    }

    #[test]
    fn test_placement_into_walled_cell_is_rejected() {
        let settings = DemoSettings::default();
        let mut app = build_app_with(&settings, demo_catalog(), |_| {});
        run_demo(&mut app, &settings);

        // Every neighbour of (2, 1) is generated without a side facing it.
        app.world_mut()
            .send_event(AssignCellContent::place(IVec2::new(2, 1), "Vault", 0));
        app.update();
        let rejected = drain::<CellAssignmentRejected>(&mut app);
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].reason, RejectReason::FailedValidation);
    }

    #[test]
    fn test_save_path_writes_snapshot() {
        let dir = std::env::temp_dir().join("layoutgen_demo_save");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("demo.lyts");
        let settings = DemoSettings {
            save_path: Some(path.clone()),
            seed: 5,
            ..Default::default()
        };

        let report = run(&settings);
        assert!(matches!(
            report.save,
            Some(SaveOutcome::Saved { cells: 12, .. })
        ));
        let snapshot = LayoutSnapshot::load_from_file(&path).unwrap();
        assert_eq!(snapshot.seed, 5);
        assert_eq!(snapshot.entries.len(), 12);
        assert!(format!("{report}").contains("Saved 12 cells"));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_report_lists_rejections_and_open_sides() {
        let report = DemoReport {
            assigned: 1,
            rejected: vec![CellAssignmentRejected {
                position: IVec2::new(2, 0),
                content: None,
                rotation: 0,
                reason: RejectReason::OutOfBounds,
            }],
            loaded: 0,
            receivers: 0,
            map: String::new(),
            fully_connected: false,
            open_connections: vec![(IVec2::new(0, 0), Side::PosX)],
            save: None,
        };
        let text = format!("{report}");
        assert!(text.contains("rejected '<clear>' rot 0 at (2, 0): OutOfBounds"), "{text}");
        assert!(text.contains("Fully connected: no"), "{text}");
        assert!(text.contains("Open connections: (0, 0) +X"), "{text}");
    }
}
