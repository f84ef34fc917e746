//! BeatMind CLI - render and check step-sequencer beats from the command line
//!
//! Reads beat JSON (a bare beat or a full model reply) and writes MIDI files,
//! quality reports or the genre catalog.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};

use beatmind_lib::arranger::{self, MidiExportOptions};
use beatmind_lib::commands;
use beatmind_lib::{analysis, encoding, genres};

/// BeatMind - Beat pattern to MIDI renderer
#[derive(Parser)]
#[command(name = "beatmind")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a beat JSON file to a Standard MIDI File
    Render {
        /// Beat JSON file ("-" for stdin)
        input: String,

        /// Output .mid path (default: <beat name>.mid)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the file as base64 instead of writing it
        #[arg(long)]
        base64: bool,

        /// Ticks per quarter note (1-32767)
        #[arg(long, default_value_t = 960, value_parser = clap::value_parser!(u16).range(1..=0x7FFF))]
        ppq: u16,
    },

    /// Report groove and tempo issues for a beat JSON file
    Analyze {
        /// Beat JSON file ("-" for stdin)
        input: String,
    },

    /// Extract the beat from a raw model reply
    ParseResponse {
        /// Reply text file ("-" for stdin)
        input: String,
    },

    /// List available genres
    Genres {
        /// Print only the genre ids, one per line
        #[arg(long)]
        ids: bool,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render { input, output, base64, ppq } => run_render(&input, output, base64, ppq),
        Commands::Analyze { input } => run_analyze(&input),
        Commands::ParseResponse { input } => run_parse_response(&input),
        Commands::Genres { ids } => run_genres(ids),
    }
}

fn run_render(input: &str, output: Option<PathBuf>, as_base64: bool, ppq: u16) -> Result<()> {
    let beat = load_beat(input)?;

    let options = MidiExportOptions {
        ppq,
        ..Default::default()
    };
    let midi_bytes = arranger::render_with_options(&beat.tracks, beat.bpm, &beat.key, &options)
        .context("Failed to export MIDI")?;

    if as_base64 {
        println!("{}", encoding::midi_to_base64(&midi_bytes));
        return Ok(());
    }

    let path = output.unwrap_or_else(|| PathBuf::from(commands::midi_filename(beat.name.as_deref())));
    commands::save_midi(&path, &midi_bytes).map_err(|e| anyhow!(e.message().to_string()))?;
    println!("{}", path.display());
    Ok(())
}

fn run_analyze(input: &str) -> Result<()> {
    let beat = load_beat(input)?;
    let report = analysis::analyze(&beat.tracks, beat.bpm);

    for issue in &report.issues {
        log::warn!("{}", issue);
    }
    print_json(&report)
}

fn run_parse_response(input: &str) -> Result<()> {
    let text = read_input(input)?;
    let response = commands::parse_beat_response_command(&text)
        .map_err(|e| anyhow!(e.message().to_string()))?;
    print_json(&response)
}

fn run_genres(ids_only: bool) -> Result<()> {
    if ids_only {
        for id in genres::list_genre_ids() {
            println!("{}", id);
        }
        return Ok(());
    }
    print_json(&genres::list_genres())
}

fn load_beat(input: &str) -> Result<beatmind_lib::BeatPattern> {
    let text = read_input(input)?;
    let document: Value = serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", input))?;

    commands::beat_from_document(&document).map_err(|e| anyhow!(e.message().to_string()))
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        return Ok(text);
    }

    std::fs::read_to_string(Path::new(input)).with_context(|| format!("Failed to read {}", input))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
