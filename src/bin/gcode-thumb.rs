//! CLI binary for gcode-thumbnail.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ThumbnailSettings` and runs the step over a G-code file.

use anyhow::{Context, Result};
use clap::Parser;
use gcode_thumbnail::{
    extract_thumbnail, process_file, process_text, settings_schema, Outcome, OutcomeSummary,
    ThumbnailSettings,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Embed a logo, write to a new file
  gcode-thumb part.gcode --image logo.png -o part_thumb.gcode

  # Rewrite in place with a 220x124 preview, replacing any existing one
  gcode-thumb part.gcode --image C:/Images/logo.png --width 220 --height 124 \
      --replace-existing -o part.gcode

  # Use a host settings dictionary
  gcode-thumb part.gcode --settings thumbnail.json

  # Dump the embedded thumbnail back to PNG
  gcode-thumb part.gcode --extract preview.png

  # Print the settings declaration for a slicer host
  gcode-thumb --print-schema

FORMAT:
  The thumbnail is inserted after the first line starting with ';LAYER_COUNT:':

    ;
    ; thumbnail begin 300x300 12345
    ; iVBORw0KGgo...   (78 base64 chars per line)
    ; thumbnail end
    ;
"#;

/// Embed a custom base64 PNG thumbnail into slicer G-code.
#[derive(Parser, Debug)]
#[command(
    name = "gcode-thumb",
    version,
    about = "Embed a custom base64 PNG thumbnail into slicer G-code",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input G-code file.
    #[arg(required_unless_present = "print_schema")]
    input: Option<PathBuf>,

    /// Write G-code to this file instead of stdout (may equal INPUT).
    #[arg(short, long, env = "GCODE_THUMB_OUTPUT")]
    output: Option<PathBuf>,

    /// Image to embed. Forward slashes work on Windows too.
    #[arg(short, long, env = "GCODE_THUMB_IMAGE")]
    image: Option<String>,

    /// JSON settings dictionary (image_path, target_width, target_height, …).
    #[arg(long, env = "GCODE_THUMB_SETTINGS")]
    settings: Option<PathBuf>,

    /// Thumbnail box width in pixels.
    #[arg(long, env = "GCODE_THUMB_WIDTH",
          value_parser = clap::value_parser!(u32).range(1..))]
    width: Option<u32>,

    /// Thumbnail box height in pixels.
    #[arg(long, env = "GCODE_THUMB_HEIGHT",
          value_parser = clap::value_parser!(u32).range(1..))]
    height: Option<u32>,

    /// Base64 characters per comment line.
    #[arg(long, env = "GCODE_THUMB_CHUNK_SIZE")]
    chunk_size: Option<usize>,

    /// Insertion marker line prefix.
    #[arg(long, env = "GCODE_THUMB_MARKER")]
    marker: Option<String>,

    /// Remove thumbnail blocks already in the file before inserting.
    #[arg(long, env = "GCODE_THUMB_REPLACE_EXISTING")]
    replace_existing: bool,

    /// Write the first embedded thumbnail of INPUT to this PNG and exit.
    #[arg(long, value_name = "PNG", conflicts_with_all = ["output", "image"])]
    extract: Option<PathBuf>,

    /// Print the host settings declaration as JSON and exit.
    #[arg(long)]
    print_schema: bool,

    /// Print a JSON summary of the outcome on stderr.
    #[arg(long)]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "GCODE_THUMB_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "GCODE_THUMB_QUIET")]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run(&cli) {
        tracing::error!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn run(cli: &Cli) -> Result<()> {
    if cli.print_schema {
        let json = serde_json::to_string_pretty(&settings_schema())
            .context("Failed to serialise settings schema")?;
        println!("{json}");
        return Ok(());
    }

    let input = cli
        .input
        .as_ref()
        .context("An input G-code file is required")?;

    // ── Extract mode ─────────────────────────────────────────────────────
    if let Some(ref png_path) = cli.extract {
        let gcode = std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read {}", input.display()))?;
        let thumb = extract_thumbnail(&gcode)
            .with_context(|| format!("No usable thumbnail in {}", input.display()))?;
        std::fs::write(png_path, &thumb.png)
            .with_context(|| format!("Failed to write {}", png_path.display()))?;
        if !cli.quiet {
            eprintln!(
                "Extracted {}x{} thumbnail → {}",
                thumb.width,
                thumb.height,
                png_path.display()
            );
        }
        return Ok(());
    }

    // ── Embed mode ───────────────────────────────────────────────────────
    let settings = build_settings(cli)?;

    let outcome = if let Some(ref output_path) = cli.output {
        process_file(input, output_path, &settings).context("Processing failed")?
    } else {
        let gcode = std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read {}", input.display()))?;
        let (result, outcome) = process_text(&gcode, &settings);
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(result.as_bytes())
            .context("Failed to write to stdout")?;
        outcome
    };

    if cli.json {
        let summary = serde_json::to_string_pretty(&OutcomeSummary::from(&outcome))
            .context("Failed to serialise outcome")?;
        eprintln!("{summary}");
    } else if !cli.quiet {
        if let Outcome::Inserted(ref r) = outcome {
            eprintln!(
                "✔ {} → {}x{} thumbnail, {} lines after layer {} line {}",
                r.image_name,
                r.width,
                r.height,
                r.body_lines,
                r.layer,
                r.line + 1
            );
        }
    }

    Ok(())
}

/// Merge the settings file (if any) with CLI overrides.
fn build_settings(cli: &Cli) -> Result<ThumbnailSettings> {
    let base = match cli.settings {
        Some(ref path) => ThumbnailSettings::from_json_file(path)
            .with_context(|| format!("Invalid settings file {}", path.display()))?,
        None => ThumbnailSettings::default(),
    };

    let builder = ThumbnailSettings::builder()
        .image_path(cli.image.clone().unwrap_or(base.image_path))
        .target_width(cli.width.unwrap_or(base.target_width))
        .target_height(cli.height.unwrap_or(base.target_height))
        .chunk_size(cli.chunk_size.unwrap_or(base.chunk_size))
        .marker(cli.marker.clone().unwrap_or(base.marker))
        .replace_existing(cli.replace_existing || base.replace_existing);

    builder.build().context("Invalid configuration")
}
