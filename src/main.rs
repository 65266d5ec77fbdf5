//! # Punkify CLI
//!
//! Command-line interface for pixel-art avatar generation.
//!
//! ## Usage
//!
//! ```bash
//! # Generate an avatar with the default punk profile
//! punkify generate photo.jpg
//!
//! # Reproducible output with a fixed seed
//! punkify generate --seed 1337 -o avatar.png photo.jpg
//!
//! # The chunkier 32-block profile
//! punkify generate --profile punk-mini photo.jpg
//!
//! # Override individual settings
//! punkify generate --grid-size 40 --canvas-size 480 --background '#000000' photo.jpg
//!
//! # Quantize only, no cosmetic features
//! punkify generate --no-features photo.jpg
//!
//! # List profiles, dump a catalog for editing
//! punkify profiles
//! punkify catalog --profile punk > catalog.json
//! punkify generate --catalog catalog.json photo.jpg
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use punkify::{
    PipelineConfig, PunkifyError, generate,
    pipeline::PROFILES,
    sample::CropPolicy,
};

/// Punkify - pixel-art avatar generator
#[derive(Parser, Debug)]
#[command(name = "punkify")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a pixel-art avatar from an image file
    Generate {
        /// Source image (any decodable raster format)
        input: PathBuf,

        /// Output PNG path
        #[arg(short, long, default_value = "punk.png")]
        output: PathBuf,

        /// Seed for the overlay randomness (omit for a fresh avatar each run)
        #[arg(long)]
        seed: Option<u64>,

        /// Built-in profile to start from
        #[arg(long, default_value = "punk")]
        profile: String,

        /// Full pipeline config as JSON (overrides --profile)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Grid resolution in blocks
        #[arg(long)]
        grid_size: Option<u32>,

        /// Canvas side length in pixels (must be a multiple of the grid size)
        #[arg(long)]
        canvas_size: Option<u32>,

        /// Background color as #RRGGBB
        #[arg(long)]
        background: Option<String>,

        /// Crop policy: center-square or stretch
        #[arg(long)]
        crop: Option<String>,

        /// Alpha cutoff; samples at or below it stay background (0-255)
        #[arg(long)]
        alpha_threshold: Option<u8>,

        /// Feature catalog as JSON (replaces the profile's catalog)
        #[arg(long, value_name = "FILE")]
        catalog: Option<PathBuf>,

        /// Disable cosmetic feature overlays entirely
        #[arg(long)]
        no_features: bool,

        /// Print which features were applied
        #[arg(long)]
        print_features: bool,
    },

    /// List built-in profiles
    Profiles,

    /// Dump a built-in feature catalog as JSON
    Catalog {
        /// Profile whose catalog to dump
        #[arg(long, default_value = "punk")]
        profile: String,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), PunkifyError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            input,
            output,
            seed,
            profile,
            config,
            grid_size,
            canvas_size,
            background,
            crop,
            alpha_threshold,
            catalog,
            no_features,
            print_features,
        } => {
            let mut cfg = match config {
                Some(path) => {
                    let text = std::fs::read_to_string(&path)?;
                    serde_json::from_str(&text).map_err(|e| {
                        PunkifyError::InvalidConfiguration(format!(
                            "{}: {}",
                            path.display(),
                            e
                        ))
                    })?
                }
                None => PipelineConfig::parse(&profile)
                    .map_err(PunkifyError::InvalidConfiguration)?,
            };

            // Flag overrides on top of the profile/config file
            if let Some(g) = grid_size {
                cfg.grid_size = g;
            }
            if let Some(c) = canvas_size {
                cfg.canvas_side = c;
            }
            if let Some(hex) = background {
                cfg.background = hex.parse().map_err(|e| {
                    PunkifyError::InvalidConfiguration(format!("--background: {}", e))
                })?;
            }
            if let Some(policy) = crop {
                cfg.crop = parse_crop(&policy)?;
            }
            if let Some(t) = alpha_threshold {
                cfg.alpha_threshold = t;
            }
            if let Some(s) = seed {
                cfg.seed = Some(s);
            }
            if let Some(path) = catalog {
                let text = std::fs::read_to_string(&path)?;
                cfg.catalog = serde_json::from_str(&text).map_err(|e| {
                    PunkifyError::InvalidConfiguration(format!("{}: {}", path.display(), e))
                })?;
            }
            if no_features {
                cfg.catalog.clear();
            }

            println!(
                "Generating avatar from {} ({} blocks, {}px)...",
                input.display(),
                cfg.grid_size,
                cfg.canvas_side
            );

            let source_bytes = std::fs::read(&input)?;
            let avatar = generate(&source_bytes, &cfg)?;

            std::fs::write(&output, &avatar.png_data)?;
            println!("Saved to {} (seed {})", output.display(), avatar.seed);

            if print_features {
                if avatar.applied.is_empty() {
                    println!("No features applied");
                } else {
                    let names: Vec<String> =
                        avatar.applied.iter().map(|k| k.to_string()).collect();
                    println!("Applied features: {}", names.join(", "));
                }
            }
        }

        Commands::Profiles => {
            println!("Available profiles:");
            for name in PROFILES {
                // Built-in names always parse
                let cfg = PipelineConfig::parse(name).unwrap();
                println!(
                    "  {:<10} {} blocks on a {}px canvas, {} palette colors, {} features",
                    name,
                    cfg.grid_size,
                    cfg.canvas_side,
                    cfg.palette.len(),
                    cfg.catalog.len()
                );
            }
        }

        Commands::Catalog { profile } => {
            let cfg = PipelineConfig::parse(&profile)
                .map_err(PunkifyError::InvalidConfiguration)?;
            let json = serde_json::to_string_pretty(&cfg.catalog).map_err(|e| {
                PunkifyError::InvalidConfiguration(format!("catalog serialization: {}", e))
            })?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn parse_crop(s: &str) -> Result<CropPolicy, PunkifyError> {
    match s {
        "center-square" => Ok(CropPolicy::CenterSquare),
        "stretch" => Ok(CropPolicy::Stretch),
        other => Err(PunkifyError::InvalidConfiguration(format!(
            "Unknown crop policy '{}'. Available: center-square, stretch",
            other
        ))),
    }
}
