//! Contacts delivered from several threads at once.

use alphagrid_common::{BlockCoord, ObjectHandle, RegionLevel};
use alphagrid_decompose::Region;
use alphagrid_kernel::{
    ColliderRegistry, ContactEvent, RecordingSpawner, SplitEngine, SplitOutcome, WorldMapping,
};
use glam::{UVec2, Vec2};
use std::sync::atomic::{AtomicUsize, Ordering};

fn engine_with_row(count: u32) -> (SplitEngine<RecordingSpawner>, Vec<ObjectHandle>) {
    let mapping = WorldMapping::new(Vec2::ZERO, Vec2::splat(256.0), UVec2::splat(256), 1);
    let mut registry = ColliderRegistry::new(RecordingSpawner::new(), mapping);
    let regions = (0..count).map(|i| Region::new(BlockCoord::new(i * 2, 0), RegionLevel::new(1).unwrap()));
    let handles = registry.populate(regions).unwrap();
    (SplitEngine::new(registry), handles)
}

#[test]
fn distinct_handles_split_independently() {
    let (engine, handles) = engine_with_row(32);
    std::thread::scope(|s| {
        for chunk in handles.chunks(8) {
            let engine = &engine;
            s.spawn(move || {
                for h in chunk {
                    let outcome = engine.on_contact(&ContactEvent::destructive(*h)).unwrap();
                    assert!(matches!(outcome, SplitOutcome::Split { .. }));
                }
            });
        }
    });
    let registry = engine.registry().unwrap();
    assert_eq!(registry.len(), 32 * 4);
    assert!(handles.iter().all(|h| !registry.contains(*h)));
}

#[test]
fn racing_contacts_on_one_handle_split_once() {
    let (engine, handles) = engine_with_row(16);
    let splits = AtomicUsize::new(0);
    let unknown = AtomicUsize::new(0);

    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                for h in &handles {
                    match engine.on_contact(&ContactEvent::destructive(*h)).unwrap() {
                        SplitOutcome::Split { .. } => splits.fetch_add(1, Ordering::Relaxed),
                        SplitOutcome::Unknown(_) => unknown.fetch_add(1, Ordering::Relaxed),
                        other => panic!("unexpected outcome {other:?}"),
                    };
                }
            });
        }
    });

    assert_eq!(splits.load(Ordering::Relaxed), 16);
    assert_eq!(unknown.load(Ordering::Relaxed), 16 * 3);
    let registry = engine.into_registry().unwrap();
    assert_eq!(registry.len(), 64);
    assert_eq!(registry.spawner().destroyed(), 16);
}
