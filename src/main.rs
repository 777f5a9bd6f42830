//! floorplan-nav command line
//!
//! Generates walk masks from floorplan rasters, renders overlays, runs test
//! routes and validates saved projects.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use image::imageops;
use tracing_subscriber::EnvFilter;

use floorplan_nav::core::error::Result;
use floorplan_nav::core::{config, set_config, FloorplanConfig, PixelPoint};
use floorplan_nav::io::load_project;
use floorplan_nav::mask::{MaskBuilder, WalkMask};
use floorplan_nav::pathfinding::{path_length, RouteWorker, SearchStatus};

/// Walkability masks, zone validation and grid routing for floorplans
#[derive(Parser, Debug)]
#[command(name = "floorplan-nav")]
#[command(about = "Build walk masks, route over them and validate floorplan projects")]
struct Cli {
    /// TOML config overriding the built-in defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a walk mask from a floorplan image
    Automask(AutomaskArgs),
    /// Render a mask as a colored overlay
    Overlay(OverlayArgs),
    /// Find a route between two pixels of a mask
    Route(RouteArgs),
    /// Validate a saved project directory
    Validate(ValidateArgs),
}

#[derive(Args, Debug)]
struct AutomaskArgs {
    /// Floorplan raster (PNG, JPEG, ...)
    image: PathBuf,

    /// Output mask image (white = walkable)
    #[arg(long, short, default_value = "mask.png")]
    out: PathBuf,

    /// Fixed wall threshold (luma below is wall)
    #[arg(long)]
    threshold: Option<u8>,

    /// Pick the threshold with Otsu's method
    #[arg(long)]
    auto_threshold: bool,

    /// Wall safety margin in pixels
    #[arg(long)]
    inflate: Option<u32>,

    /// Gap sealing radius in pixels
    #[arg(long)]
    seal_gaps: Option<u32>,

    /// Keep open space around the building
    #[arg(long)]
    keep_outside: bool,
}

#[derive(Args, Debug)]
struct OverlayArgs {
    /// Binary mask image
    mask: PathBuf,

    /// Draw the overlay on top of this floorplan image
    #[arg(long)]
    background: Option<PathBuf>,

    /// Output image
    #[arg(long, short, default_value = "overlay.png")]
    out: PathBuf,

    /// Overlay alpha (defaults to the configured value)
    #[arg(long)]
    alpha: Option<u8>,
}

#[derive(Args, Debug)]
struct RouteArgs {
    /// Binary mask image
    mask: PathBuf,

    /// Start pixel as x,y
    #[arg(long, value_parser = parse_point)]
    from: PixelPoint,

    /// End pixel as x,y
    #[arg(long, value_parser = parse_point)]
    to: PixelPoint,

    /// Pixels per search node
    #[arg(long)]
    stride: Option<u32>,

    /// Node expansion cap
    #[arg(long)]
    max_expanded: Option<usize>,

    /// 4-connected moves only
    #[arg(long)]
    no_diagonal: bool,

    /// Print the outcome as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// Project directory (containing project.json)
    project: PathBuf,
}

fn parse_point(s: &str) -> std::result::Result<PixelPoint, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got '{}'", s))?;
    let x = x.trim().parse().map_err(|e| format!("bad x in '{}': {}", s, e))?;
    let y = y.trim().parse().map_err(|e| format!("bad y in '{}': {}", s, e))?;
    Ok(PixelPoint::new(x, y))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("floorplan_nav=info")),
        )
        .init();

    let cli = Cli::parse();

    if let Some(path) = &cli.config {
        let loaded = FloorplanConfig::load(path)?;
        if set_config(loaded).is_err() {
            tracing::warn!("Config already initialized; ignoring {}", path.display());
        }
    }

    match cli.command {
        Command::Automask(args) => automask(args),
        Command::Overlay(args) => overlay(args),
        Command::Route(args) => route(args).await,
        Command::Validate(args) => validate(args),
    }
}

fn automask(args: AutomaskArgs) -> Result<()> {
    let mut mask_config = config().mask.clone();
    if let Some(threshold) = args.threshold {
        mask_config.threshold = threshold;
    }
    if args.auto_threshold {
        mask_config.auto_threshold = true;
    }
    if let Some(inflate) = args.inflate {
        mask_config.inflate_px = inflate;
    }
    if let Some(seal) = args.seal_gaps {
        mask_config.seal_gaps_px = seal;
    }
    if args.keep_outside {
        mask_config.remove_outside = false;
    }

    let image = image::open(&args.image)?;
    let report = MaskBuilder::new(mask_config).build(&image)?;
    report.mask.to_binary_image().save(&args.out)?;

    let total = report.mask.width() as usize * report.mask.height() as usize;
    println!(
        "Threshold {}{}: {} of {} pixels walkable ({:.1}%), {} wall, {} exterior",
        report.effective_threshold,
        if report.auto_threshold_used { " (auto)" } else { "" },
        report.mask.walkable_count(),
        total,
        100.0 * report.mask.walkable_count() as f64 / total as f64,
        report.wall_pixels,
        report.exterior_pixels,
    );
    println!("Mask written to {}", args.out.display());
    Ok(())
}

fn overlay(args: OverlayArgs) -> Result<()> {
    let mask = WalkMask::from_binary_image(&image::open(&args.mask)?)?;
    let tint = mask.to_overlay_image(args.alpha.unwrap_or(config().overlay_alpha));

    let output = match &args.background {
        Some(path) => {
            let mut base = image::open(path)?.to_rgba8();
            imageops::overlay(&mut base, &tint, 0, 0);
            base
        }
        None => tint,
    };
    output.save(&args.out)?;
    println!("Overlay written to {}", args.out.display());
    Ok(())
}

async fn route(args: RouteArgs) -> Result<()> {
    let mask = WalkMask::from_binary_image(&image::open(&args.mask)?)?;

    let mut router_config = config().router.clone();
    if let Some(stride) = args.stride {
        router_config.stride = stride.max(1);
    }
    if let Some(max) = args.max_expanded {
        router_config.max_expanded_nodes = max;
    }
    if args.no_diagonal {
        router_config.allow_diagonal = false;
    }

    let mut worker = RouteWorker::new();
    let outcome = worker
        .request(&mask, args.from, args.to, &router_config)
        .await?;

    if args.json {
        let json = serde_json::json!({
            "status": format!("{:?}", outcome.status),
            "nodes_expanded": outcome.nodes_expanded,
            "length": outcome.path.as_deref().map(path_length),
            "path": outcome.path,
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    match (&outcome.status, &outcome.path) {
        (SearchStatus::Found, Some(path)) => {
            println!(
                "Route found: {} waypoints, {:.1} px, {} nodes expanded",
                path.len(),
                path_length(path),
                outcome.nodes_expanded
            );
            for point in path {
                println!("  {}", point);
            }
        }
        (status, _) => {
            println!(
                "No route ({:?}) after {} nodes expanded",
                status, outcome.nodes_expanded
            );
        }
    }
    Ok(())
}

fn validate(args: ValidateArgs) -> Result<()> {
    let project = load_project(&args.project)?;
    let findings = project.validate();

    if findings.is_empty() {
        println!("OK: {} zones, project is ready to lock", project.zones().len());
        return Ok(());
    }

    println!("{} finding(s):", findings.len());
    for finding in &findings {
        println!("  - {}", finding);
    }
    std::process::exit(1);
}
