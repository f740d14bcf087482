use alphagrid_common::ObjectHandle;
use std::collections::BTreeMap;

use crate::registry::{Placement, SpawnCollaborator};

/// In-memory spawn collaborator.
///
/// Hands out fresh handles and keeps the placements it was asked to create.
/// Stands in for a scene graph in tests and command-line runs.
#[derive(Debug, Default)]
pub struct RecordingSpawner {
    live: BTreeMap<ObjectHandle, Placement>,
    spawned: usize,
    destroyed: usize,
}

impl RecordingSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Objects currently alive.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Total objects ever spawned.
    pub fn spawned(&self) -> usize {
        self.spawned
    }

    /// Total objects destroyed.
    pub fn destroyed(&self) -> usize {
        self.destroyed
    }

    pub fn get(&self, handle: ObjectHandle) -> Option<&Placement> {
        self.live.get(&handle)
    }

    pub fn placements(&self) -> impl Iterator<Item = &Placement> {
        self.live.values()
    }
}

impl SpawnCollaborator for RecordingSpawner {
    fn spawn(&mut self, placement: &Placement) -> ObjectHandle {
        let handle = ObjectHandle::new();
        self.live.insert(handle, *placement);
        self.spawned += 1;
        handle
    }

    fn destroy(&mut self, handle: ObjectHandle) {
        if self.live.remove(&handle).is_some() {
            self.destroyed += 1;
        } else {
            tracing::warn!(?handle, "destroy requested for unknown object");
        }
    }
}
