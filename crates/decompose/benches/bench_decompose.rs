use std::hint::black_box;
use std::time::Instant;

use alphagrid_common::{DecomposeConfig, RegionLevel};
use alphagrid_decompose::{decompose, decompose_buffer};
use alphagrid_grid::{AlphaBuffer, SolidityGrid, classify};

/// Opaque disc on a transparent background.
fn make_disc(size: u32) -> AlphaBuffer {
    let c = size as f32 / 2.0;
    let r2 = (size as f32 * 0.45).powi(2);
    let mut data = Vec::with_capacity((size * size) as usize);
    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 - c;
            let dy = y as f32 - c;
            data.push(if dx * dx + dy * dy < r2 { 255 } else { 0 });
        }
    }
    AlphaBuffer::new(size, size, data).expect("disc buffer has matching length")
}

fn bench_build(size: u32, block: u32, iterations: usize) {
    let buffer = make_disc(size);
    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(SolidityGrid::build(black_box(&buffer), block, 128));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  build ({size}px, block={block}, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
}

fn bench_classify_decompose(size: u32, block: u32, max_level: u8, iterations: usize) {
    let buffer = make_disc(size);
    let base = SolidityGrid::build(&buffer, block, 128);
    let start = Instant::now();
    let mut regions = 0;
    for _ in 0..iterations {
        let mut grid = base.clone();
        classify(&mut grid, 8);
        regions = black_box(decompose(&mut grid, RegionLevel::new(max_level).expect("benchmark level in range")).count());
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  classify+decompose ({size}px, block={block}, max level {max_level}, {iterations} iters): {per_iter:?}/iter, {regions} regions"
    );
}

fn bench_pipeline(size: u32, iterations: usize) {
    let buffer = make_disc(size);
    let config = DecomposeConfig::default();
    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(decompose_buffer(black_box(&buffer), &config));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  full pass ({size}px, default config, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
}

fn main() {
    println!("=== Decomposition Benchmarks ===\n");

    println!("Grid build:");
    bench_build(256, 4, 200);
    bench_build(1024, 4, 20);
    bench_build(1024, 1, 5);

    println!("\nClassify + decompose:");
    bench_classify_decompose(512, 2, 3, 50);
    bench_classify_decompose(1024, 1, 5, 5);

    println!("\nFull pass:");
    bench_pipeline(512, 50);
    bench_pipeline(2048, 5);

    println!("\n=== Done ===");
}
