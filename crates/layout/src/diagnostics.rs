//! Diagnostics reported by layout operations.
//!
//! Cell operations never fail hard. Lookups that miss (unknown catalog rows,
//! assets the streamer does not know) are reported to an injected
//! `DiagnosticsSink` and the operation returns `false` or does nothing.

use std::fmt;
use std::sync::{Arc, Mutex};

use bevy::prelude::*;

use crate::catalog::{AssetPath, ContentId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutDiagnostic {
    /// A content id was not found in the catalog.
    UnknownContent {
        cell: IVec2,
        content: ContentId,
        catalog: String,
    },
    /// The selected asset could not be instantiated; the cell loads nothing.
    MissingAsset { cell: IVec2, asset: AssetPath },
}

impl LayoutDiagnostic {
    pub fn severity(&self) -> Severity {
        match self {
            LayoutDiagnostic::UnknownContent { .. } => Severity::Warning,
            LayoutDiagnostic::MissingAsset { .. } => Severity::Info,
        }
    }
}

impl fmt::Display for LayoutDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutDiagnostic::UnknownContent {
                cell,
                content,
                catalog,
            } => write!(
                f,
                "cell ({}, {}): '{}' is not a valid row entry inside '{}'",
                cell.x, cell.y, content, catalog
            ),
            LayoutDiagnostic::MissingAsset { cell, asset } => write!(
                f,
                "cell ({}, {}): asset '{}' could not be loaded, leaving cell empty",
                cell.x, cell.y, asset
            ),
        }
    }
}

/// Receiver for layout diagnostics. Shared across validation calls, so it
/// must tolerate concurrent reports.
pub trait DiagnosticsSink: Send + Sync {
    fn report(&self, diagnostic: LayoutDiagnostic);
}

/// Forwards diagnostics to `bevy::log` at their severity.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDiagnostics;

impl DiagnosticsSink for LogDiagnostics {
    fn report(&self, diagnostic: LayoutDiagnostic) {
        match diagnostic.severity() {
            Severity::Info => info!("{}", diagnostic),
            Severity::Warning => warn!("{}", diagnostic),
        }
    }
}

/// Keeps every reported diagnostic in memory.
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    reports: Mutex<Vec<LayoutDiagnostic>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far.
    pub fn reports(&self) -> Vec<LayoutDiagnostic> {
        match self.reports.lock() {
            Ok(reports) => reports.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.reports().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticsSink for RecordingDiagnostics {
    fn report(&self, diagnostic: LayoutDiagnostic) {
        match self.reports.lock() {
            Ok(mut reports) => reports.push(diagnostic),
            Err(poisoned) => poisoned.into_inner().push(diagnostic),
        }
    }
}

/// The sink plugin systems report through. Defaults to `LogDiagnostics`.
#[derive(Resource, Clone)]
pub struct LayoutDiagnostics(pub Arc<dyn DiagnosticsSink>);

impl Default for LayoutDiagnostics {
    fn default() -> Self {
        Self(Arc::new(LogDiagnostics))
    }
}

impl LayoutDiagnostics {
    pub fn sink(&self) -> &dyn DiagnosticsSink {
        self.0.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_content_display_names_row_and_catalog() {
        let diagnostic = LayoutDiagnostic::UnknownContent {
            cell: IVec2::new(2, 3),
            content: ContentId::from("Corridor"),
            catalog: "Dungeon".to_string(),
        };
        let msg = format!("{diagnostic}");
        assert!(msg.contains("'Corridor'"), "got: {msg}");
        assert!(msg.contains("'Dungeon'"), "got: {msg}");
        assert!(msg.contains("(2, 3)"), "got: {msg}");
        assert_eq!(diagnostic.severity(), Severity::Warning);
    }

    #[test]
    fn test_recording_sink_keeps_order() {
        let sink = RecordingDiagnostics::new();
        assert!(sink.is_empty());
        sink.report(LayoutDiagnostic::MissingAsset {
            cell: IVec2::ZERO,
            asset: AssetPath::from("a"),
        });
        sink.report(LayoutDiagnostic::MissingAsset {
            cell: IVec2::ONE,
            asset: AssetPath::from("b"),
        });
        let reports = sink.reports();
        assert_eq!(reports.len(), 2);
        assert!(matches!(
            &reports[1],
            LayoutDiagnostic::MissingAsset { cell, .. } if *cell == IVec2::ONE
        ));
    }
}
