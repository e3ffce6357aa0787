//! # cardpress CLI
//!
//! Command-line interface for composing promotional image cards.
//!
//! ## Usage
//!
//! ```bash
//! # Render a single JSON preset
//! cardpress render preset.json -o card.png
//!
//! # Render a batch of news items with the built-in news layout
//! cardpress batch posts.json --title-font Bold.ttf --small-font Regular.ttf --logo logo.png
//!
//! # More logging
//! RUST_LOG=cardpress=debug cardpress render preset.json
//! ```

use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use cardpress::{
    CardError,
    assets::{load_font, load_image},
    batch::{BatchRunner, DirectorySink, NewsItem},
    config::{CardConfig, OutputFormat},
    preset::{NewsTemplate, PresetFile},
    render::{Composer, encode, write_card},
    text::{BlockFont, FontRef},
};

/// cardpress - layered image card compositor
#[derive(Parser, Debug)]
#[command(name = "cardpress")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// JSON config file (canvas size, output directory, format)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compose one card from a JSON preset file
    Render {
        /// Preset file
        preset: PathBuf,

        /// Output file (defaults to <output_dir>/<preset name>.<ext>)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Compose news cards for every item in a JSON array
    Batch {
        /// JSON array of news items
        posts: PathBuf,

        /// Title font (TTF/OTF); block font when omitted
        #[arg(long, value_name = "FILE")]
        title_font: Option<PathBuf>,

        /// Title font size in pixels
        #[arg(long, default_value = "48")]
        title_size: f32,

        /// Source line font (TTF/OTF); block font when omitted
        #[arg(long, value_name = "FILE")]
        small_font: Option<PathBuf>,

        /// Source line font size in pixels
        #[arg(long, default_value = "24")]
        small_size: f32,

        /// Logo placed near the bottom-left corner
        #[arg(long, value_name = "FILE")]
        logo: Option<PathBuf>,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), CardError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = CardConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Render { preset, output } => {
            let composer = Composer::from_config(&config)?;
            let canvas = composer.compose(&PresetFile::load(&preset)?)?;

            let path = output.unwrap_or_else(|| {
                let stem = preset.file_stem().unwrap_or_default().to_string_lossy();
                config
                    .output_dir
                    .join(format!("{}.{}", stem, config.format.extension()))
            });
            let format = format_for(&path).unwrap_or(config.format);
            write_card(&path, &encode(&canvas, format, config.jpeg_quality)?)?;
            println!("{}", path.display());
            Ok(())
        }

        Commands::Batch {
            posts,
            title_font,
            title_size,
            small_font,
            small_size,
            logo,
        } => {
            let items = NewsItem::load_all(&posts)?;
            info!(count = items.len(), path = %posts.display(), "loaded news items");

            let mut template = NewsTemplate::new(
                font_or_block(title_font.as_deref(), title_size, BlockFont::TITLE)?,
                font_or_block(small_font.as_deref(), small_size, BlockFont::SMALL)?,
            );
            if let Some(logo) = logo {
                let image = load_image(&logo, None)?;
                template = template.with_logo(Arc::unwrap_or_clone(image));
            }

            let sink = DirectorySink::new(config.clone());
            let runner = BatchRunner::new(template, config)?;
            let images = tokio::runtime::Runtime::new()?.block_on(runner.resolve_images(&items));
            let report = runner.render_all(&items, &images, &sink);

            for (index, error) in &report.failures {
                eprintln!("  item {}: {}", index, error);
            }
            println!("generated {} of {}", report.succeeded, report.total);
            Ok(())
        }
    }
}

fn font_or_block(path: Option<&Path>, px: f32, fallback: BlockFont) -> Result<FontRef, CardError> {
    match path {
        Some(path) => load_font(path, px),
        None => {
            warn!("no font file given, using block font");
            Ok(Arc::new(fallback))
        }
    }
}

/// Output format implied by a file extension.
fn format_for(path: &Path) -> Option<OutputFormat> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some(OutputFormat::Png),
        "jpg" | "jpeg" => Some(OutputFormat::Jpeg),
        _ => None,
    }
}
