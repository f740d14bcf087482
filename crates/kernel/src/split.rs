use alphagrid_common::ObjectHandle;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard};

use crate::registry::{ColliderRegistry, RegistryError, SpawnCollaborator};

/// Tag carried by a contact. Only `Destructive` contacts split regions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactTag {
    Destructive,
    Other(String),
}

/// A contact routed by the host to one collider object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactEvent {
    pub handle: ObjectHandle,
    pub tag: ContactTag,
}

impl ContactEvent {
    pub fn destructive(handle: ObjectHandle) -> Self {
        Self {
            handle,
            tag: ContactTag::Destructive,
        }
    }
}

/// What a single contact did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitOutcome {
    /// Non-destructive tag, nothing changed.
    Ignored,
    /// Handle not live (never registered or already retired), nothing changed.
    Unknown(ObjectHandle),
    /// Minimum-size region removed without children.
    Retired(ObjectHandle),
    /// Region replaced by its four quadrants.
    Split {
        parent: ObjectHandle,
        children: [ObjectHandle; 4],
    },
}

/// Errors that abort one transition.
#[derive(Debug, thiserror::Error)]
pub enum SplitError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("collider registry lock poisoned")]
    Poisoned,
}

/// Counters for a batch of contacts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SplitStats {
    pub contacts: usize,
    pub ignored: usize,
    pub unknown: usize,
    pub retired: usize,
    pub split: usize,
}

impl SplitStats {
    /// Add another batch's counters to this one.
    pub fn merge(&mut self, other: SplitStats) {
        self.contacts += other.contacts;
        self.ignored += other.ignored;
        self.unknown += other.unknown;
        self.retired += other.retired;
        self.split += other.split;
    }

    fn record(&mut self, outcome: SplitOutcome) {
        self.contacts += 1;
        match outcome {
            SplitOutcome::Ignored => self.ignored += 1,
            SplitOutcome::Unknown(_) => self.unknown += 1,
            SplitOutcome::Retired(_) => self.retired += 1,
            SplitOutcome::Split { .. } => self.split += 1,
        }
    }
}

/// Reacts to destructive contacts by splitting or retiring live regions.
///
/// Each region is `Whole(level)` until a destructive contact arrives; it is
/// then retired, after first registering four half-size quadrants unless it
/// is already at the minimum level. Retired is terminal.
///
/// The registry sits behind a mutex held for a whole transition, so
/// contacts may arrive from several threads. A second contact on the same
/// handle only runs after the first has retired it, and then reports
/// `Unknown` instead of splitting twice.
#[derive(Debug)]
pub struct SplitEngine<S> {
    registry: Mutex<ColliderRegistry<S>>,
}

impl<S: SpawnCollaborator> SplitEngine<S> {
    pub fn new(registry: ColliderRegistry<S>) -> Self {
        Self {
            registry: Mutex::new(registry),
        }
    }

    /// Lock the registry for inspection.
    pub fn registry(&self) -> Result<MutexGuard<'_, ColliderRegistry<S>>, SplitError> {
        self.registry.lock().map_err(|_| SplitError::Poisoned)
    }

    pub fn into_registry(self) -> Result<ColliderRegistry<S>, SplitError> {
        self.registry.into_inner().map_err(|_| SplitError::Poisoned)
    }

    /// Apply one contact.
    pub fn on_contact(&self, event: &ContactEvent) -> Result<SplitOutcome, SplitError> {
        let _span = tracing::info_span!("contact", handle = ?event.handle).entered();
        if event.tag != ContactTag::Destructive {
            tracing::trace!(tag = ?event.tag, "non-destructive contact ignored");
            return Ok(SplitOutcome::Ignored);
        }

        let mut registry = self.registry()?;
        let Some(placement) = registry.get(event.handle).copied() else {
            tracing::warn!("contact on unknown handle ignored");
            return Ok(SplitOutcome::Unknown(event.handle));
        };

        let Some(quadrants) = placement.region.quadrants() else {
            registry.retire(event.handle)?;
            tracing::debug!("minimum-size region retired");
            return Ok(SplitOutcome::Retired(event.handle));
        };

        let mut children = [event.handle; 4];
        for (i, quadrant) in quadrants.into_iter().enumerate() {
            match registry.register(quadrant) {
                Ok(handle) => children[i] = handle,
                Err(err) => {
                    // undo the partial split so the parent stays whole
                    for child in &children[..i] {
                        if let Err(rollback) = registry.retire(*child) {
                            tracing::error!(?child, %rollback, "rollback of partial split failed");
                        }
                    }
                    return Err(err.into());
                }
            }
        }
        registry.retire(event.handle)?;

        tracing::debug!(level = placement.region.level.get(), "region split into quadrants");
        Ok(SplitOutcome::Split {
            parent: event.handle,
            children,
        })
    }

    /// Apply a batch of contacts in order.
    ///
    /// A failed transition is logged and skipped; it does not stop the batch.
    pub fn process(&self, events: impl IntoIterator<Item = ContactEvent>) -> SplitStats {
        let mut stats = SplitStats::default();
        for event in events {
            match self.on_contact(&event) {
                Ok(outcome) => stats.record(outcome),
                Err(err) => {
                    tracing::error!(handle = ?event.handle, %err, "contact transition failed");
                    stats.contacts += 1;
                }
            }
        }
        tracing::info!(
            contacts = stats.contacts,
            split = stats.split,
            retired = stats.retired,
            "contact batch processed"
        );
        stats
    }
}
