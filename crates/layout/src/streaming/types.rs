use std::fmt;
use std::sync::{Arc, Mutex};

use bevy::prelude::*;

use crate::catalog::AssetPath;
use crate::cell::CellState;
use crate::query::LayoutQuery;

/// Identifier the streamer assigns to one instantiation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub u64);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Instances whose owning handle was dropped. Shared between a streamer and
/// the handles it gives out; the streamer drains it when it next polls.
#[derive(Debug, Clone, Default)]
pub struct ReleaseQueue(Arc<Mutex<Vec<InstanceId>>>);

impl ReleaseQueue {
    pub fn push(&self, id: InstanceId) {
        match self.0.lock() {
            Ok(mut queue) => queue.push(id),
            Err(poisoned) => poisoned.into_inner().push(id),
        }
    }

    pub fn drain(&self) -> Vec<InstanceId> {
        match self.0.lock() {
            Ok(mut queue) => std::mem::take(&mut *queue),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

/// Exclusive ownership of one streamed instance.
///
/// Not `Clone`: exactly one cell owns a given instantiation. Dropping the
/// handle requests release immediately; it does not wait for the unload.
#[derive(Debug)]
pub struct ContentHandle {
    id: InstanceId,
    releases: ReleaseQueue,
}

impl ContentHandle {
    pub fn new(id: InstanceId, releases: ReleaseQueue) -> Self {
        Self { id, releases }
    }

    pub fn id(&self) -> InstanceId {
        self.id
    }
}

impl Drop for ContentHandle {
    fn drop(&mut self) {
        self.releases.push(self.id);
    }
}

/// What a cell asks the streamer to instantiate.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadRequest {
    pub cell: IVec2,
    pub asset: AssetPath,
    pub position: Vec3,
    pub rotation: Quat,
    pub unique_name: String,
    pub visible: bool,
    pub block_on_load: bool,
    pub block_on_unload: bool,
    pub distance_streaming: bool,
}

impl LoadRequest {
    /// Request with the flags cells always use: hidden, non-blocking in both
    /// directions, and exempt from distance streaming.
    pub fn new(cell: IVec2, asset: AssetPath, position: Vec3, rotation: Quat, unique_name: String) -> Self {
        Self {
            cell,
            asset,
            position,
            rotation,
            unique_name,
            visible: false,
            block_on_load: false,
            block_on_unload: false,
            distance_streaming: false,
        }
    }
}

/// Streamer's answer to an accepted load request. `immediate` carries the
/// instance when it was loaded synchronously.
#[derive(Debug)]
pub struct LoadTicket {
    pub handle: ContentHandle,
    pub immediate: Option<LoadedInstance>,
}

/// A finished instantiation travelling back to its cell.
#[derive(Debug)]
pub struct CompletedLoad {
    pub instance: InstanceId,
    pub cell: IVec2,
    pub content: LoadedInstance,
}

/// Axis-aligned box given by center and half extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl Bounds {
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    /// Strictly inside on every axis.
    pub fn contains(&self, point: Vec3) -> bool {
        (point - self.center).abs().cmplt(self.half_extents).all()
    }
}

/// Capability for streamed content that wants layout context once loaded.
pub trait LayoutDataReceiver: Send + Sync {
    /// Called once per load with the owning layout, the cell that loaded the
    /// content, and a seed drawn from that cell's stream.
    fn on_layout_data_received(&mut self, layout: &dyn LayoutQuery, cell: &CellState, seed: i32);
}

/// A top-level entity inside loaded content.
pub struct ContentEntity {
    pub name: String,
    pub bounds: Bounds,
    pub receiver: Option<Box<dyn LayoutDataReceiver>>,
}

impl ContentEntity {
    pub fn new(name: impl Into<String>, bounds: Bounds) -> Self {
        Self {
            name: name.into(),
            bounds,
            receiver: None,
        }
    }

    pub fn with_receiver(mut self, receiver: impl LayoutDataReceiver + 'static) -> Self {
        self.receiver = Some(Box::new(receiver));
        self
    }
}

impl fmt::Debug for ContentEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentEntity")
            .field("name", &self.name)
            .field("bounds", &self.bounds)
            .field("receiver", &self.receiver.is_some())
            .finish()
    }
}

/// Instantiated sub-content: its top-level entities in enumeration order.
#[derive(Debug, Default)]
pub struct LoadedInstance {
    pub entities: Vec<ContentEntity>,
}

impl LoadedInstance {
    pub fn new(entities: Vec<ContentEntity>) -> Self {
        Self { entities }
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        self.entities.iter().any(|e| e.bounds.contains(point))
    }
}

/// Engine service that instantiates sub-level content for cells.
pub trait ContentStreamer: Send + Sync {
    /// Start instantiating `request.asset`. `None` means the asset is unknown
    /// and nothing will load.
    fn load_instance(&mut self, request: LoadRequest) -> Option<LoadTicket>;

    /// Loads that finished since the last poll, in completion order.
    /// A completion may arrive for an instance that was already released.
    fn poll_completed(&mut self) -> Vec<CompletedLoad>;
}

/// The streamer plugin systems load through.
#[derive(Resource)]
pub struct ContentStreaming(pub Box<dyn ContentStreamer>);

impl Default for ContentStreaming {
    fn default() -> Self {
        Self(Box::new(super::QueuedStreamer::default()))
    }
}

impl ContentStreaming {
    pub fn new(streamer: impl ContentStreamer + 'static) -> Self {
        Self(Box::new(streamer))
    }
}
