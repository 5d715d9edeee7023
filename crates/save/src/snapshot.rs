//! Binary snapshots of a generated layout.
//!
//! Only the authored choices are stored: content id and rotation per
//! generated cell. Connection patterns and asset picks are rebuilt from the
//! catalog and the per-cell seeds on restore.

use std::path::Path;

use bevy::prelude::*;
use bitcode::{Decode, Encode};

use layout::diagnostics::DiagnosticsSink;
use layout::{ContentCatalog, ContentId, LayoutGrid, LayoutQuery};

use crate::atomic_write::atomic_write;
use crate::snapshot_error::SnapshotError;
use crate::snapshot_header::{unwrap_header, wrap_with_header};

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct SnapshotEntry {
    pub x: i32,
    pub y: i32,
    pub content: String,
    pub rotation: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Encode, Decode)]
pub struct LayoutSnapshot {
    pub width: u32,
    pub height: u32,
    pub seed: u32,
    pub entries: Vec<SnapshotEntry>,
}

impl LayoutSnapshot {
    /// Record every generated cell in row-major order.
    pub fn capture(grid: &LayoutGrid) -> Self {
        let entries = grid
            .generated_cells()
            .filter_map(|cell| {
                let content = cell.content()?;
                Some(SnapshotEntry {
                    x: cell.position().x,
                    y: cell.position().y,
                    content: content.as_str().to_string(),
                    rotation: cell.rotation(),
                })
            })
            .collect();
        Self {
            width: grid.width(),
            height: grid.height(),
            seed: grid.seed(),
            entries,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        wrap_with_header(&bitcode::encode(self))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let (_, payload) = unwrap_header(bytes)?;
        Ok(bitcode::decode(payload)?)
    }

    /// Clear `grid` and re-assign every entry without validation. Entries
    /// whose content is not in `catalog` are reported to `diagnostics` and
    /// skipped. Returns the number of cells restored.
    pub fn restore(
        &self,
        grid: &mut LayoutGrid,
        catalog: &ContentCatalog,
        diagnostics: &dyn DiagnosticsSink,
    ) -> Result<usize, SnapshotError> {
        let snapshot = UVec2::new(self.width, self.height);
        if grid.dimensions() != snapshot {
            return Err(SnapshotError::DimensionMismatch {
                grid: grid.dimensions(),
                snapshot,
            });
        }
        if grid.seed() != self.seed {
            warn!(
                "Restoring a layout saved with seed {} into a grid seeded {}; asset picks may differ",
                self.seed,
                grid.seed()
            );
        }

        grid.clear();
        let mut restored = 0;
        for entry in &self.entries {
            let position = IVec2::new(entry.x, entry.y);
            let content = ContentId::new(entry.content.as_str());
            if grid.assign(
                position,
                Some(&content),
                i32::from(entry.rotation),
                catalog,
                diagnostics,
            ) {
                restored += 1;
            }
        }
        Ok(restored)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), SnapshotError> {
        atomic_write(path, &self.to_bytes())?;
        Ok(())
    }

    pub fn load_from_file(path: &Path) -> Result<Self, SnapshotError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }
}
