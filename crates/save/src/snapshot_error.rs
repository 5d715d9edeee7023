// ---------------------------------------------------------------------------
// SnapshotError: failures while writing or reading layout snapshots
// ---------------------------------------------------------------------------

use std::fmt;

use bevy::math::UVec2;

/// Errors raised by snapshot encoding, decoding, file I/O and restore.
#[derive(Debug)]
pub enum SnapshotError {
    /// I/O error (file not found, permission denied, disk full, etc.)
    Io(std::io::Error),
    /// The payload could not be decoded.
    Decode(String),
    /// The bytes do not start with the snapshot magic.
    BadMagic,
    /// Fewer bytes than the header, or than the size the header announces.
    Truncated { expected: usize, found: usize },
    /// Written by a newer format version than this build reads.
    UnsupportedVersion { supported: u32, found: u32 },
    /// The payload does not hash to the stored checksum.
    ChecksumMismatch { stored: u32, computed: u32 },
    /// The snapshot was taken from a grid of a different size.
    DimensionMismatch { grid: UVec2, snapshot: UVec2 },
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::Io(e) => write!(f, "I/O error: {e}"),
            SnapshotError::Decode(msg) => write!(f, "Decoding error: {msg}"),
            SnapshotError::BadMagic => write!(f, "Not a layout snapshot (bad magic bytes)"),
            SnapshotError::Truncated { expected, found } => write!(
                f,
                "Snapshot is truncated: expected {expected} bytes, found {found}"
            ),
            SnapshotError::UnsupportedVersion { supported, found } => write!(
                f,
                "Snapshot format v{found} is newer than the supported v{supported}"
            ),
            SnapshotError::ChecksumMismatch { stored, computed } => write!(
                f,
                "Snapshot is corrupted: checksum mismatch (stored {stored:#010X}, computed {computed:#010X})"
            ),
            SnapshotError::DimensionMismatch { grid, snapshot } => write!(
                f,
                "Snapshot is {}x{} but the grid is {}x{}",
                snapshot.x, snapshot.y, grid.x, grid.y
            ),
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SnapshotError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SnapshotError {
    fn from(e: std::io::Error) -> Self {
        SnapshotError::Io(e)
    }
}

impl From<bitcode::Error> for SnapshotError {
    fn from(e: bitcode::Error) -> Self {
        SnapshotError::Decode(e.to_string())
    }
}
