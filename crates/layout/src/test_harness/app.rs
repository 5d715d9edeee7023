use bevy::app::App;
use bevy::ecs::event::Events;
use bevy::prelude::*;

use crate::catalog::ContentCatalog;
use crate::config::LayoutConfig;
use crate::diagnostics::{LayoutDiagnostics, RecordingDiagnostics};
use crate::grid::LayoutGrid;
use crate::plugin::LayoutPlugin;
use crate::streaming::ContentStreaming;

use super::fixtures::{fixture_catalog, fixture_streamer, ReceiverLog};

/// A headless Bevy App running `LayoutPlugin` over the fixture catalog.
pub struct TestLayoutApp {
    app: App,
    received: ReceiverLog,
    diagnostics: std::sync::Arc<RecordingDiagnostics>,
}

impl TestLayoutApp {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_config(LayoutConfig::with_size(width, height))
    }

    pub fn with_config(config: LayoutConfig) -> Self {
        Self::with_setup(config, |_| {})
    }

    /// `setup` runs after `LayoutPlugin` is added and before the first
    /// update, for tests that layer more plugins on top. Resources are
    /// inserted before the plugin so `init_resource` keeps them.
    pub fn with_setup(config: LayoutConfig, setup: impl FnOnce(&mut App)) -> Self {
        let received = ReceiverLog::default();
        let diagnostics = std::sync::Arc::new(RecordingDiagnostics::new());

        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(config);
        app.insert_resource(fixture_catalog());
        app.insert_resource(ContentStreaming::new(fixture_streamer(&received)));
        app.insert_resource(LayoutDiagnostics(diagnostics.clone()));
        app.add_plugins(LayoutPlugin);
        setup(&mut app);
        app.update();

        Self {
            app,
            received,
            diagnostics,
        }
    }

    pub fn with_catalog(mut self, catalog: ContentCatalog) -> Self {
        self.app.insert_resource(catalog);
        self
    }

    /// Run `n` frames.
    pub fn tick(&mut self, n: u32) {
        for _ in 0..n {
            self.app.update();
        }
    }

    pub fn send<E: Event>(&mut self, event: E) -> &mut Self {
        self.app.world_mut().send_event(event);
        self
    }

    /// Remove and return every buffered event of type `E`. Use for output
    /// events only; requests not yet read by a system would be lost.
    pub fn take_events<E: Event>(&mut self) -> Vec<E> {
        self.app
            .world_mut()
            .resource_mut::<Events<E>>()
            .drain()
            .collect()
    }

    pub fn grid(&self) -> &LayoutGrid {
        self.app.world().resource::<LayoutGrid>()
    }

    pub fn received(&self) -> &ReceiverLog {
        &self.received
    }

    pub fn diagnostics(&self) -> &RecordingDiagnostics {
        &self.diagnostics
    }

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }
}
