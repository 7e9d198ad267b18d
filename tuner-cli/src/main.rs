//! # Tuner CLI
//!
//! Headless front-end for `tuner-core`. Reads pitch-detector frames as text,
//! one `<frequency_hz> <probability>` pair per line, and prints the note and
//! direction updates the tuner emits.
//!
//! ## Architecture
//! - **Worker Thread**: parses frames and runs them through the tuner
//! - **Main Thread**: receives tuner events over a crossbeam channel and prints them

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::thread;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use crossbeam_channel::Receiver;
use tuner_core::{
    ChannelCallback, ClassificationMode, Instrument, PitchFrame, Selection, Tuner, TunerEvent,
    TuningCatalog,
};

/// Classify pitch-detector output against a chromatic scale or an instrument tuning
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON preset catalog to use instead of the built-in presets
    #[arg(long, global = true)]
    presets: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the available tuning presets
    List {
        /// Only list presets for this instrument
        #[arg(long)]
        instrument: Option<Instrument>,
    },
    /// Print the preset catalog as JSON
    Export,
    /// Tune from a stream of detector frames
    Run {
        /// Instrument to tune (Chromatic, Guitar, Bass, Ukulele)
        #[arg(long, default_value = "Chromatic")]
        instrument: String,

        /// Tuning preset name, required for anything but Chromatic
        #[arg(long)]
        tuning: Option<String>,

        /// File with one "<hz> <probability>" frame per line (default: stdin)
        #[arg(long)]
        input: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let catalog = match &args.presets {
        Some(path) => TuningCatalog::load(path)?,
        None => TuningCatalog::builtin().clone(),
    };
    log::info!("[MAIN] Loaded {} tuning presets", catalog.len());

    match args.command {
        Commands::List { instrument } => list_presets(&catalog, instrument),
        Commands::Export => println!("{}", catalog.to_json_string()?),
        Commands::Run {
            instrument,
            tuning,
            input,
        } => {
            let selection = Selection {
                instrument: Some(instrument),
                tuning,
            };
            let reader: Box<dyn BufRead + Send> = match input {
                Some(path) => Box::new(BufReader::new(
                    File::open(&path)
                        .with_context(|| format!("failed to open {}", path.display()))?,
                )),
                None => Box::new(BufReader::new(io::stdin())),
            };
            run(Tuner::new(catalog), selection, reader)?;
        }
    }
    Ok(())
}

fn list_presets(catalog: &TuningCatalog, instrument: Option<Instrument>) {
    for preset in catalog.iter() {
        if instrument.is_some_and(|i| i != preset.instrument) {
            continue;
        }
        let strings: Vec<String> = preset
            .strings
            .iter()
            .map(|s| format!("{} ({:.2})", s.label, s.frequency))
            .collect();
        println!("{:<8} {:<20} {}", preset.instrument, preset.name, strings.join(" "));
    }
}

/// Checks the selection against the catalog before any frames are read.
fn check_selection(tuner: &Tuner, selection: &Selection) -> Result<()> {
    match ClassificationMode::from_selection(selection) {
        ClassificationMode::Unselected => bail!(
            "instrument {:?} needs a known instrument name and a --tuning",
            selection.instrument.as_deref().unwrap_or_default()
        ),
        ClassificationMode::FixedTuning(name) => {
            tuner.catalog().get(&name)?;
            Ok(())
        }
        ClassificationMode::Chromatic => Ok(()),
    }
}

fn parse_frame(line: &str) -> Result<Option<PitchFrame>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let mut fields = line.split_whitespace();
    let (Some(hz), Some(probability), None) = (fields.next(), fields.next(), fields.next()) else {
        bail!("expected \"<hz> <probability>\", got {line:?}");
    };
    let hz: f32 = hz.parse().with_context(|| format!("bad frequency {hz:?}"))?;
    let probability: f32 = probability
        .parse()
        .with_context(|| format!("bad probability {probability:?}"))?;
    Ok(Some(PitchFrame::new(hz, probability)))
}

/// Runs the tuner on a worker thread and prints its events as they arrive.
fn run(tuner: Tuner, selection: Selection, reader: Box<dyn BufRead + Send>) -> Result<()> {
    check_selection(&tuner, &selection)?;

    let (event_tx, event_rx) = crossbeam_channel::unbounded();
    let worker = thread::spawn(move || -> Result<usize> {
        log::debug!("[WORKER] Starting tuner thread...");
        let mut callback = ChannelCallback::new(event_tx);
        let mut frames = 0;
        for (number, line) in reader.lines().enumerate() {
            let line = line.context("failed to read frame input")?;
            let frame = match parse_frame(&line) {
                Ok(Some(frame)) => frame,
                Ok(None) => continue,
                Err(e) => {
                    log::warn!("[WORKER] Skipping line {}: {:#}", number + 1, e);
                    continue;
                }
            };
            frames += 1;
            if let Err(e) = tuner.process(frame, &selection, &mut callback) {
                log::warn!("[WORKER] Skipping line {}: {}", number + 1, e);
            }
        }
        log::debug!("[WORKER] Input exhausted after {frames} frames");
        Ok(frames)
    });

    print_events(&event_rx);

    let frames = worker
        .join()
        .map_err(|_| anyhow::anyhow!("tuner thread panicked"))??;
    log::info!("[MAIN] Processed {frames} frames");
    Ok(())
}

/// Prints one line per note/direction pair until the worker hangs up.
fn print_events(events: &Receiver<TunerEvent>) {
    let mut note = None;
    for event in events.iter() {
        match event {
            TunerEvent::Note(label) => note = Some(label),
            TunerEvent::Direction(direction) => {
                println!("{:<3} {}", note.take().unwrap_or_default(), direction);
            }
        }
    }
}
