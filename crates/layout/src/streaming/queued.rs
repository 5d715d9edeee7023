use std::collections::{BTreeSet, HashMap};

use bevy::prelude::*;

use crate::catalog::AssetPath;

use super::types::{
    CompletedLoad, ContentHandle, ContentStreamer, InstanceId, LoadRequest, LoadTicket,
    LoadedInstance, ReleaseQueue,
};

/// Builds a fresh instance of a registered asset for one request.
pub type InstanceFactory = Box<dyn Fn(&LoadRequest) -> LoadedInstance + Send + Sync>;

/// In-memory streamer. Instances are built from registered factories and
/// complete on the next `poll_completed`, or right away in synchronous mode.
///
/// Released instances still complete if they were in flight; the owning cell
/// ignores completions for handles it no longer holds.
#[derive(Default)]
pub struct QueuedStreamer {
    factories: HashMap<AssetPath, InstanceFactory>,
    pending: Vec<(InstanceId, LoadRequest)>,
    releases: ReleaseQueue,
    next_id: u64,
    synchronous: bool,
    live: BTreeSet<InstanceId>,
    released: Vec<InstanceId>,
    requests: Vec<LoadRequest>,
}

impl QueuedStreamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Complete every load inside `load_instance`.
    pub fn synchronous(mut self) -> Self {
        self.synchronous = true;
        self
    }

    pub fn register_asset<F>(&mut self, asset: impl Into<AssetPath>, factory: F)
    where
        F: Fn(&LoadRequest) -> LoadedInstance + Send + Sync + 'static,
    {
        self.factories.insert(asset.into(), Box::new(factory));
    }

    pub fn with_asset<F>(mut self, asset: impl Into<AssetPath>, factory: F) -> Self
    where
        F: Fn(&LoadRequest) -> LoadedInstance + Send + Sync + 'static,
    {
        self.register_asset(asset, factory);
        self
    }

    /// Apply dropped handles to the live set.
    pub fn process_releases(&mut self) {
        for id in self.releases.drain() {
            if self.live.remove(&id) {
                debug!("QueuedStreamer: released instance {}", id);
            }
            self.released.push(id);
        }
    }

    /// Instances requested and not yet released.
    pub fn live_instances(&self) -> usize {
        self.live.len()
    }

    pub fn released(&self) -> &[InstanceId] {
        &self.released
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Every accepted request, in order.
    pub fn requests(&self) -> &[LoadRequest] {
        &self.requests
    }

    fn build(&self, request: &LoadRequest) -> LoadedInstance {
        self.factories
            .get(&request.asset)
            .map(|factory| factory(request))
            .unwrap_or_default()
    }
}

impl ContentStreamer for QueuedStreamer {
    fn load_instance(&mut self, request: LoadRequest) -> Option<LoadTicket> {
        self.process_releases();
        if !self.factories.contains_key(&request.asset) {
            return None;
        }

        let id = InstanceId(self.next_id);
        self.next_id += 1;
        self.live.insert(id);

        let immediate = if self.synchronous {
            Some(self.build(&request))
        } else {
            self.pending.push((id, request.clone()));
            None
        };
        debug!(
            "QueuedStreamer: instance {} of '{}' for '{}'",
            id, request.asset, request.unique_name
        );
        self.requests.push(request);

        Some(LoadTicket {
            handle: ContentHandle::new(id, self.releases.clone()),
            immediate,
        })
    }

    fn poll_completed(&mut self) -> Vec<CompletedLoad> {
        self.process_releases();
        let pending = std::mem::take(&mut self.pending);
        pending
            .into_iter()
            .map(|(instance, request)| CompletedLoad {
                instance,
                cell: request.cell,
                content: self.build(&request),
            })
            .collect()
    }
}
