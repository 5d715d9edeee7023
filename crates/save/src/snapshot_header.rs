// ---------------------------------------------------------------------------
// snapshot_header – Fixed header in front of every layout snapshot
// ---------------------------------------------------------------------------
//
// Header format (16 bytes, little-endian):
//   [0..4]   Magic bytes: "LYTS"
//   [4..8]   Format version (u32)
//   [8..12]  Payload size in bytes (u32)
//   [12..16] xxHash32 checksum of the payload
//
// On save: encode LayoutSnapshot -> prepend header
// On load: check magic -> check version -> check size and checksum -> decode

use xxhash_rust::xxh32::xxh32;

use crate::snapshot_error::SnapshotError;

/// Magic bytes identifying a layout snapshot.
pub const MAGIC: [u8; 4] = *b"LYTS";

pub const HEADER_SIZE: usize = 16;

/// Bumped whenever the payload schema changes.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

const XXHASH_SEED: u32 = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotHeader {
    pub format_version: u32,
    pub payload_size: u32,
    pub checksum: u32,
}

impl SnapshotHeader {
    pub fn for_payload(payload: &[u8]) -> Self {
        Self {
            format_version: SNAPSHOT_FORMAT_VERSION,
            payload_size: payload.len() as u32,
            checksum: xxh32(payload, XXHASH_SEED),
        }
    }
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

/// Returns `[header] ++ payload`.
pub fn wrap_with_header(payload: &[u8]) -> Vec<u8> {
    let header = SnapshotHeader::for_payload(payload);
    let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
    out.extend_from_slice(&MAGIC);
    out.extend_from_slice(&header.format_version.to_le_bytes());
    out.extend_from_slice(&header.payload_size.to_le_bytes());
    out.extend_from_slice(&header.checksum.to_le_bytes());
    out.extend_from_slice(payload);
    out
}

/// Validate the header and return it with the payload it covers. Bytes past
/// the announced payload size are ignored.
pub fn unwrap_header(bytes: &[u8]) -> Result<(SnapshotHeader, &[u8]), SnapshotError> {
    if bytes.len() < MAGIC.len() || bytes[..MAGIC.len()] != MAGIC {
        return Err(SnapshotError::BadMagic);
    }
    if bytes.len() < HEADER_SIZE {
        return Err(SnapshotError::Truncated {
            expected: HEADER_SIZE,
            found: bytes.len(),
        });
    }

    let header = SnapshotHeader {
        format_version: read_u32(bytes, 4),
        payload_size: read_u32(bytes, 8),
        checksum: read_u32(bytes, 12),
    };

    if header.format_version > SNAPSHOT_FORMAT_VERSION {
        return Err(SnapshotError::UnsupportedVersion {
            supported: SNAPSHOT_FORMAT_VERSION,
            found: header.format_version,
        });
    }

    let end = HEADER_SIZE + header.payload_size as usize;
    if bytes.len() < end {
        return Err(SnapshotError::Truncated {
            expected: end,
            found: bytes.len(),
        });
    }

    let payload = &bytes[HEADER_SIZE..end];
    let computed = xxh32(payload, XXHASH_SEED);
    if computed != header.checksum {
        return Err(SnapshotError::ChecksumMismatch {
            stored: header.checksum,
            computed,
        });
    }

    Ok((header, payload))
}
