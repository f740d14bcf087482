use std::path::{Path, PathBuf};

use alphagrid_assets::{AlphaImage, ImageSource};
use alphagrid_common::DecomposeConfig;
use alphagrid_decompose::{Decomposition, decompose_buffer};
use alphagrid_kernel::{
    ColliderRegistry, ContactEvent, RecordingSpawner, SplitEngine, SplitStats, WorldMapping,
};
use clap::{Args, Parser, Subcommand};
use glam::{UVec2, Vec2};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "alphagrid-cli", about = "Derive box colliders from an image's alpha channel")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ImageArgs {
    /// PNG image to read
    image: PathBuf,
    /// Decomposition config (YAML, or JSON by extension)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Pixels per world unit
    #[arg(long, default_value = "100")]
    ppu: f32,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Decompose an image and list the generated colliders
    Decompose {
        #[command(flatten)]
        image: ImageArgs,
        /// Print regions and placements as JSON
        #[arg(long)]
        json: bool,
    },
    /// Decompose, then deliver destructive contacts to live colliders
    Split {
        #[command(flatten)]
        image: ImageArgs,
        /// Number of destructive contacts to deliver
        #[arg(short = 'n', long, default_value = "10")]
        contacts: usize,
    },
    /// Carve a transparent circle into an image and save the result
    Carve {
        #[command(flatten)]
        image: ImageArgs,
        /// Circle centre X in world units
        #[arg(long, allow_hyphen_values = true)]
        x: f32,
        /// Circle centre Y in world units
        #[arg(long, allow_hyphen_values = true)]
        y: f32,
        /// Circle radius in world units
        #[arg(short, long)]
        radius: f32,
        /// Output PNG path
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<DecomposeConfig> {
    let config = match path {
        Some(path) => DecomposeConfig::load(path)?,
        None => DecomposeConfig::default(),
    };
    tracing::debug!(?config, "decomposition config");
    Ok(config)
}

fn load_image(args: &ImageArgs) -> anyhow::Result<AlphaImage> {
    Ok(AlphaImage::open_with_ppu(&args.image, args.ppu, Vec2::ZERO)?)
}

fn mapping_for(image: &AlphaImage, config: &DecomposeConfig) -> WorldMapping {
    WorldMapping::new(
        image.world_origin(),
        image.world_size(),
        UVec2::new(image.pixel_width(), image.pixel_height()),
        config.min_block_size,
    )
}

fn summarize(label: &str, result: &Decomposition) {
    println!(
        "{label}: grid={}x{}, solid={}, edges={}, regions={}, covered blocks={}",
        result.grid_width,
        result.grid_height,
        result.solid_blocks,
        result.stats.edge_count,
        result.regions.len(),
        result.covered_blocks()
    );
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("alphagrid-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("grid: {}", alphagrid_grid::crate_info());
            println!("decompose: {}", alphagrid_decompose::crate_info());
            println!("kernel: {}", alphagrid_kernel::crate_info());
            println!("assets: {}", alphagrid_assets::crate_info());
            println!("default config: {:?}", DecomposeConfig::default());
        }
        Commands::Decompose { image, json } => {
            let config = load_config(image.config.as_deref())?;
            let img = load_image(&image)?;
            let result = decompose_buffer(&img.alpha_buffer(), &config)?;

            let mut registry = ColliderRegistry::new(RecordingSpawner::new(), mapping_for(&img, &config));
            registry.populate(result.regions.iter().copied())?;

            if json {
                let placements: Vec<_> = registry.regions().map(|(_, p)| *p).collect();
                let out = serde_json::json!({
                    "decomposition": result,
                    "placements": placements,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                summarize("Decomposition", &result);
                for (_, p) in registry.regions() {
                    println!(
                        "  block ({:>3},{:>3}) side {:>2} -> world ({:.3}, {:.3}) size {:.3}",
                        p.region.origin.x,
                        p.region.origin.y,
                        p.region.side(),
                        p.world_center.x,
                        p.world_center.y,
                        p.world_size.x
                    );
                }
            }
        }
        Commands::Split { image, contacts } => {
            let config = load_config(image.config.as_deref())?;
            let img = load_image(&image)?;
            let result = decompose_buffer(&img.alpha_buffer(), &config)?;
            summarize("Decomposition", &result);

            let mut registry = ColliderRegistry::new(RecordingSpawner::new(), mapping_for(&img, &config));
            registry.populate(result.regions)?;
            let area_before = registry.total_area();
            let engine = SplitEngine::new(registry);

            // Hit the largest live regions first, re-reading the live set after each contact.
            let mut stats = SplitStats::default();
            for _ in 0..contacts {
                let target = engine
                    .registry()?
                    .regions()
                    .max_by_key(|(_, p)| p.region.level)
                    .map(|(h, _)| h);
                let Some(handle) = target else {
                    println!("No live colliders left");
                    break;
                };
                stats.merge(engine.process([ContactEvent::destructive(handle)]));
            }

            let registry = engine.into_registry()?;
            println!(
                "Contacts: {}, split: {}, retired: {}",
                stats.contacts, stats.split, stats.retired
            );
            println!(
                "Live colliders: {}, covered blocks {} -> {}",
                registry.len(),
                area_before,
                registry.total_area()
            );
        }
        Commands::Carve {
            image,
            x,
            y,
            radius,
            output,
        } => {
            let config = load_config(image.config.as_deref())?;
            let mut img = load_image(&image)?;
            let before = decompose_buffer(&img.alpha_buffer(), &config)?;

            let cleared = img.carve_circle(Vec2::new(x, y), radius);
            println!("Carved {cleared} pixels at ({x}, {y}) r={radius}");
            if img.take_dirty() {
                img.save_png(&output)?;
                println!("Saved {}", output.display());
            }

            // Carving does not touch existing colliders; show what a fresh pass would produce.
            let after = decompose_buffer(&img.alpha_buffer(), &config)?;
            summarize("Before", &before);
            summarize("After", &after);
        }
    }

    Ok(())
}
