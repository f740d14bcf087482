use alphagrid_common::ObjectHandle;
use alphagrid_decompose::Region;
use glam::{UVec2, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where and how large a collider object should be, plus the region it backs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub world_center: Vec2,
    pub world_size: Vec2,
    pub region: Region,
    /// Block side in pixels the region was measured in.
    pub min_block_size: u32,
}

/// Host capability that creates and destroys physical collider objects.
///
/// Implementations must return a handle no live object already uses, and
/// must stop routing contacts to a handle once it has been destroyed.
pub trait SpawnCollaborator {
    fn spawn(&mut self, placement: &Placement) -> ObjectHandle;
    fn destroy(&mut self, handle: ObjectHandle);
}

/// Converts grid space (block units, y down) into world space (y up).
///
/// The image is centred on `origin` and spans `world_size`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldMapping {
    pub origin: Vec2,
    pub world_size: Vec2,
    pub pixel_size: UVec2,
    pub min_block_size: u32,
}

impl WorldMapping {
    pub fn new(origin: Vec2, world_size: Vec2, pixel_size: UVec2, min_block_size: u32) -> Self {
        Self {
            origin,
            world_size,
            pixel_size,
            min_block_size,
        }
    }

    /// World extent of one block.
    pub fn block_world_size(&self) -> Vec2 {
        let pixel = self.world_size / self.pixel_size.max(UVec2::ONE).as_vec2();
        pixel * self.min_block_size as f32
    }

    pub fn grid_to_world(&self, grid: Vec2) -> Vec2 {
        let block = self.block_world_size();
        let half = self.world_size / 2.0;
        self.origin + Vec2::new(grid.x * block.x - half.x, half.y - grid.y * block.y)
    }

    pub fn placement(&self, region: Region) -> Placement {
        Placement {
            world_center: self.grid_to_world(region.center()),
            world_size: self.block_world_size() * region.side() as f32,
            region,
            min_block_size: self.min_block_size,
        }
    }
}

/// Errors from registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("no live region for handle {0:?}")]
    UnknownHandle(ObjectHandle),
    #[error("spawn collaborator returned handle {0:?} which is already live")]
    DuplicateHandle(ObjectHandle),
}

/// A record of every change to the live region set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RegistryEvent {
    Registered { handle: ObjectHandle, region: Region },
    Retired { handle: ObjectHandle, region: Region },
}

/// The set of live collider regions and their external objects.
///
/// Uses BTreeMap so iteration over live regions is deterministic.
#[derive(Debug)]
pub struct ColliderRegistry<S> {
    spawner: S,
    mapping: WorldMapping,
    live: BTreeMap<ObjectHandle, Placement>,
    event_log: Vec<RegistryEvent>,
}

impl<S: SpawnCollaborator> ColliderRegistry<S> {
    pub fn new(spawner: S, mapping: WorldMapping) -> Self {
        Self {
            spawner,
            mapping,
            live: BTreeMap::new(),
            event_log: Vec::new(),
        }
    }

    /// Place a region in the world and record the handle the collaborator returns.
    pub fn register(&mut self, region: Region) -> Result<ObjectHandle, RegistryError> {
        let placement = self.mapping.placement(region);
        let handle = self.spawner.spawn(&placement);
        if self.live.contains_key(&handle) {
            tracing::error!(?handle, "spawn collaborator reused a live handle");
            return Err(RegistryError::DuplicateHandle(handle));
        }
        tracing::debug!(
            ?handle,
            level = region.level.get(),
            x = placement.world_center.x,
            y = placement.world_center.y,
            "collider registered"
        );
        self.live.insert(handle, placement);
        self.event_log
            .push(RegistryEvent::Registered { handle, region });
        Ok(handle)
    }

    /// Register every region of a decomposition. Stops at the first failure.
    pub fn populate(
        &mut self,
        regions: impl IntoIterator<Item = Region>,
    ) -> Result<Vec<ObjectHandle>, RegistryError> {
        let handles = regions
            .into_iter()
            .map(|r| self.register(r))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::info!(count = handles.len(), "colliders populated");
        Ok(handles)
    }

    /// Remove a region and destroy its external object.
    ///
    /// An unknown handle (including one already retired) changes nothing
    /// and is reported as `UnknownHandle`.
    pub fn retire(&mut self, handle: ObjectHandle) -> Result<Region, RegistryError> {
        let Some(placement) = self.live.remove(&handle) else {
            tracing::warn!(?handle, "retire on unknown handle ignored");
            return Err(RegistryError::UnknownHandle(handle));
        };
        self.spawner.destroy(handle);
        tracing::debug!(?handle, level = placement.region.level.get(), "collider retired");
        self.event_log.push(RegistryEvent::Retired {
            handle,
            region: placement.region,
        });
        Ok(placement.region)
    }

    pub fn get(&self, handle: ObjectHandle) -> Option<&Placement> {
        self.live.get(&handle)
    }

    pub fn contains(&self, handle: ObjectHandle) -> bool {
        self.live.contains_key(&handle)
    }

    /// Number of live regions.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Live regions in handle order.
    pub fn regions(&self) -> impl Iterator<Item = (ObjectHandle, &Placement)> {
        self.live.iter().map(|(h, p)| (*h, p))
    }

    /// Sum of live region areas in blocks.
    pub fn total_area(&self) -> u64 {
        self.live.values().map(|p| p.region.area()).sum()
    }

    pub fn mapping(&self) -> &WorldMapping {
        &self.mapping
    }

    pub fn spawner(&self) -> &S {
        &self.spawner
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[RegistryEvent] {
        &self.event_log
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<RegistryEvent> {
        std::mem::take(&mut self.event_log)
    }
}
