//! CLI tool for turning a JSON slide outline into a PowerPoint deck.

use anyhow::{Context, Result};
use clap::Parser;
use deckgen_core::Deck;
use deckgen_pptx::{DeckSummary, PptxInspector, DEFAULT_FILE_NAME, EMU_PER_INCH, PPTX_CONTENT_TYPE};
use deckgen_render::{fonts, DeckBuilder, RenderOptions};
use std::fs::File;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Generate a visual PowerPoint deck from a JSON slide outline.
#[derive(Parser, Debug)]
#[command(name = "deckgen")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input JSON file, or "-" to read from stdin
    input: PathBuf,

    /// Output .pptx file
    #[arg(short, long, default_value = DEFAULT_FILE_NAME)]
    output: PathBuf,

    /// Font file used for chart labels
    #[arg(long, default_value = fonts::DEFAULT_FONT_PATH)]
    font: PathBuf,

    /// Resolution of chart images in dots per inch
    #[arg(long, default_value = "150")]
    dpi: f64,

    /// Print what ended up on each slide after writing the deck
    #[arg(short, long)]
    summary: bool,

    /// Print the summary as JSON (implies --summary)
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<deckgen_core::Error>() {
                Some(err) if err.is_parse_error() => eprintln!("{}", err),
                _ => eprintln!("Error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let json = read_input(&args.input)?;
    let deck = Deck::from_json(&json)?;
    if args.verbose {
        eprintln!("Loaded {} slides", deck.len());
    }

    let registry = fonts::init(&args.font);
    log::debug!(
        "Chart font family '{}' ({} faces available)",
        registry.family(),
        registry.face_count()
    );

    let options = RenderOptions::default().with_dpi(args.dpi);
    let bytes = DeckBuilder::new().with_options(options).build(&deck)?;

    log::debug!("Writing {} bytes of {}", bytes.len(), PPTX_CONTENT_TYPE);
    write_output(&args.output, &bytes)?;
    if args.verbose {
        eprintln!("Written to: {}", args.output.display());
    }

    if args.summary || args.json {
        let summary = PptxInspector::new().inspect(Cursor::new(bytes))?;
        if args.json {
            let json = serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?;
            println!("{}", json);
        } else {
            print_summary(&summary);
        }
    }

    Ok(())
}

/// Read the whole input document.
fn read_input(path: &Path) -> Result<String> {
    let mut json = String::new();
    if path.as_os_str() == "-" {
        std::io::stdin()
            .read_to_string(&mut json)
            .context("Failed to read from stdin")?;
    } else {
        File::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?
            .read_to_string(&mut json)
            .with_context(|| format!("Failed to read {}", path.display()))?;
    }
    Ok(json)
}

/// Write output to a file.
fn write_output(path: &Path, content: &[u8]) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    file.write_all(content)
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    Ok(())
}

fn print_summary(summary: &DeckSummary) {
    println!("{} slides", summary.slide_count());
    for slide in &summary.slides {
        let title = slide.texts.first().map(String::as_str).unwrap_or("");
        println!("--- Slide {}: {}", slide.number, title);
        for text in slide.texts.iter().skip(1) {
            println!("  {}", text);
        }
        for &(x, y, width, height) in &slide.pictures {
            println!(
                "  [picture {:.2}x{:.2} in at ({:.2}, {:.2})]",
                inches(width),
                inches(height),
                inches(x),
                inches(y)
            );
        }
    }
}

fn inches(emu: i64) -> f64 {
    emu as f64 / EMU_PER_INCH as f64
}
