//! Collider kernel: the live region registry and the split state machine
//! driven by destructive contacts.
//!
//! # Invariants
//! - No two live regions share a handle.
//! - Every registry mutation is recorded in the event log.
//! - A split registers four quadrants before the parent is retired; a
//!   retired handle never transitions again.

pub mod registry;
pub mod spawner;
pub mod split;

pub use registry::{
    ColliderRegistry, Placement, RegistryError, RegistryEvent, SpawnCollaborator, WorldMapping,
};
pub use spawner::RecordingSpawner;
pub use split::{ContactEvent, ContactTag, SplitEngine, SplitError, SplitOutcome, SplitStats};

pub fn crate_info() -> &'static str {
    "alphagrid-kernel v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("kernel"));
    }
}
