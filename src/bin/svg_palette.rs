use anyhow::{Context, Result};
use clap::Parser;
use serde_json::{Map, Value};
use std::fs;
use std::path::PathBuf;
use svg_palette::swatch::{encode_png, render_swatch};
use svg_palette::{DEFAULT_N_COLORS, ReduceOptions, find_dominant_colors};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Find the dominant colors referenced in SVG (or any markup) files.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// One or more input documents
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Number of dominant colors to report
    #[arg(short = 'k', long, default_value_t = DEFAULT_N_COLORS)]
    n_colors: usize,

    /// Colors sampled per k-means iteration
    #[arg(short, long, default_value_t = ReduceOptions::new().batch_size())]
    batch_size: usize,

    /// Seed for k-means initialization and sampling
    #[arg(short, long, default_value_t = ReduceOptions::new().seed())]
    seed: u64,

    /// Maximum number of k-means iterations
    #[arg(long, default_value_t = ReduceOptions::new().max_iterations())]
    max_iterations: usize,

    /// Convergence threshold (squared center shift)
    #[arg(long, default_value_t = ReduceOptions::new().tolerance())]
    tolerance: f64,

    /// Print a JSON object keyed by input path instead of plain lists
    #[arg(long)]
    json: bool,

    /// Write a PNG swatch strip per input into this directory
    #[arg(short = 'd', long)]
    swatch_dir: Option<PathBuf>,

    /// Swatch cell size in pixels
    #[arg(long, default_value_t = 64)]
    cell_size: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let options = ReduceOptions::new()
        .with_batch_size(args.batch_size)
        .with_seed(args.seed)
        .with_max_iterations(args.max_iterations)
        .with_tolerance(args.tolerance);
    options.validate().context("invalid k-means options")?;

    let mut report = Map::new();

    for input in &args.inputs {
        let text = fs::read_to_string(input)
            .with_context(|| format!("failed to read {}", input.display()))?;
        let palette = find_dominant_colors(&text, args.n_colors, &options)
            .with_context(|| format!("palette extraction failed for {}", input.display()))?;
        tracing::info!(input = %input.display(), colors = palette.len(), "Palette ready");

        if args.json {
            report.insert(
                input.display().to_string(),
                Value::from(palette.to_hex_strings()),
            );
        } else {
            if args.inputs.len() > 1 {
                println!("{}:", input.display());
            }
            println!("Dominant colors found:");
            for (i, color) in palette.iter().enumerate() {
                println!("{}. {}", i + 1, color);
            }
        }

        if let Some(dir) = &args.swatch_dir {
            if palette.is_empty() {
                tracing::warn!(input = %input.display(), "No colors found, skipping swatch");
                continue;
            }
            let stem = input.file_stem().unwrap_or_default().to_string_lossy();
            let out_path = dir.join(format!("{stem}.png"));
            fs::create_dir_all(dir)?;
            let swatch = render_swatch(&palette, args.cell_size).context("swatch too large")?;
            let png = encode_png(&swatch).context("swatch encoding failed")?;
            fs::write(&out_path, png)?;
            tracing::info!(path = %out_path.display(), "Saved swatch");
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&Value::Object(report))?);
    }

    Ok(())
}
