//! End-to-end runs from an alpha buffer to live colliders and splits.

use alphagrid_common::{BlockCoord, DecomposeConfig, RegionLevel};
use alphagrid_decompose::{Region, decompose_buffer};
use alphagrid_grid::AlphaBuffer;
use alphagrid_kernel::{
    ColliderRegistry, ContactEvent, RecordingSpawner, SplitEngine, SplitOutcome, WorldMapping,
};
use glam::{UVec2, Vec2};
use std::collections::HashSet;

fn registry_for(buffer: &AlphaBuffer, config: &DecomposeConfig) -> ColliderRegistry<RecordingSpawner> {
    let mapping = WorldMapping::new(
        Vec2::ZERO,
        Vec2::new(buffer.width() as f32, buffer.height() as f32),
        UVec2::new(buffer.width(), buffer.height()),
        config.min_block_size,
    );
    ColliderRegistry::new(RecordingSpawner::new(), mapping)
}

#[test]
fn solid_square_interior_gets_one_collider() {
    // All-solid grid whose classified range is 4x4.
    let buffer = AlphaBuffer::filled(5, 5, 255);
    let config = DecomposeConfig {
        transparent_threshold: 0,
        edge_neighbor_threshold: 8,
        min_block_size: 1,
        max_region_size: 4,
    };
    let result = decompose_buffer(&buffer, &config).unwrap();
    assert_eq!(result.stats.texture_boundary_count, 12);
    assert_eq!(result.regions.len(), 1);
    let region = result.regions[0];
    assert!(region.side() <= 4);
    assert_eq!(region.origin, BlockCoord::new(1, 1));

    let mut registry = registry_for(&buffer, &config);
    registry.populate(result.regions).unwrap();
    assert_eq!(registry.len(), 1);
}

#[test]
fn isolated_block_gets_no_collider() {
    let mut data = vec![0u8; 25];
    data[2 * 5 + 2] = 255;
    let buffer = AlphaBuffer::new(5, 5, data).unwrap();
    let config = DecomposeConfig {
        transparent_threshold: 10,
        edge_neighbor_threshold: 6,
        min_block_size: 1,
        max_region_size: 8,
    };
    let result = decompose_buffer(&buffer, &config).unwrap();
    assert_eq!(result.solid_blocks, 1);
    assert_eq!(result.stats.edge_count, 1);
    assert_eq!(result.stats.min_neighbors, Some(1));
    assert!(result.regions.is_empty());
}

#[test]
fn destructive_contact_splits_size_eight_region() {
    let buffer = AlphaBuffer::filled(16, 16, 255);
    let config = DecomposeConfig {
        min_block_size: 1,
        max_region_size: 8,
        ..DecomposeConfig::default()
    };
    let mut registry = registry_for(&buffer, &config);
    let parent = Region::new(BlockCoord::new(4, 4), RegionLevel::from_units(8).unwrap());
    let handle = registry.register(parent).unwrap();
    let engine = SplitEngine::new(registry);

    let SplitOutcome::Split { children, .. } =
        engine.on_contact(&ContactEvent::destructive(handle)).unwrap()
    else {
        panic!("size-8 region must split");
    };

    let registry = engine.registry().unwrap();
    assert!(!registry.contains(handle));
    let centers: HashSet<(i32, i32)> = children
        .iter()
        .map(|c| {
            let r = registry.get(*c).unwrap().region;
            assert_eq!(r.side(), 4);
            let d = r.center() - parent.center();
            (d.x as i32, d.y as i32)
        })
        .collect();
    let expected: HashSet<(i32, i32)> = [(-2, -2), (2, -2), (-2, 2), (2, 2)].into_iter().collect();
    assert_eq!(centers, expected);
    assert_eq!(registry.total_area(), parent.area());
}

#[test]
fn transparent_image_yields_nothing() {
    let buffer = AlphaBuffer::filled(64, 64, 0);
    let config = DecomposeConfig::default();
    let result = decompose_buffer(&buffer, &config).unwrap();
    assert_eq!(result.solid_blocks, 0);
    assert!(result.regions.is_empty());

    let mut registry = registry_for(&buffer, &config);
    let handles = registry.populate(result.regions).unwrap();
    assert!(handles.is_empty());
    assert!(registry.is_empty());
    assert_eq!(registry.spawner().spawned(), 0);
}

#[test]
fn decomposed_sprite_splits_down_to_nothing() {
    // Opaque rectangle with transparent margins.
    let (w, h) = (48u32, 40u32);
    let data = (0..h)
        .flat_map(|y| (0..w).map(move |x| if (6..42).contains(&x) && (5..35).contains(&y) { 255 } else { 0 }))
        .collect();
    let buffer = AlphaBuffer::new(w, h, data).unwrap();
    let config = DecomposeConfig {
        transparent_threshold: 128,
        edge_neighbor_threshold: 8,
        min_block_size: 2,
        max_region_size: 8,
    };
    let result = decompose_buffer(&buffer, &config).unwrap();
    assert!(!result.regions.is_empty());
    let covered = result.covered_blocks();

    let mut registry = registry_for(&buffer, &config);
    registry.populate(result.regions).unwrap();
    assert_eq!(registry.total_area(), covered);
    let engine = SplitEngine::new(registry);

    let mut pending: Vec<_> = engine.registry().unwrap().regions().map(|(h, _)| h).collect();
    while let Some(h) = pending.pop() {
        if let SplitOutcome::Split { children, .. } =
            engine.on_contact(&ContactEvent::destructive(h)).unwrap()
        {
            pending.extend(children);
        }
    }
    let registry = engine.into_registry().unwrap();
    assert!(registry.is_empty());
    assert_eq!(registry.spawner().live_count(), 0);
}
