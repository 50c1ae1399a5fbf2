use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::warn;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use careconnect::{report, FileSource, Settings, StreamSource, TriageReport};

#[derive(Parser, Debug)]
#[command(name = "careconnect")]
#[command(about = "Triage vital-sign readings and route emergencies to the nearest facility")]
struct Args {
    /// Path to the readings file (one `heartRate,bloodPressure,spo2` per line); "-" for stdin
    #[arg(short, long, default_value = "health_data.txt")]
    input: PathBuf,

    /// Configuration file (capacities, facilities, distances, thresholds)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Graph node the patient is located at
    #[arg(short, long)]
    patient_node: Option<usize>,

    /// Ingestion queue capacity
    #[arg(long)]
    queue_capacity: Option<usize>,

    /// Triage heap capacity
    #[arg(long)]
    heap_capacity: Option<usize>,

    /// Export the run as JSON to this file
    #[arg(short, long)]
    export: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(node) = args.patient_node {
        settings.patient_node = node;
    }
    if let Some(capacity) = args.queue_capacity {
        settings.queue_capacity = capacity;
    }
    if let Some(capacity) = args.heap_capacity {
        settings.heap_capacity = capacity;
    }

    let mut pipeline = settings
        .build_pipeline()
        .context("Failed to initialize data structures")?;

    let report = if args.input == Path::new("-") {
        let stdin = io::stdin();
        let mut source = StreamSource::new(stdin.lock(), "stdin");
        pipeline.run(&mut source)
    } else {
        let mut source = FileSource::open(&args.input).with_context(|| {
            format!(
                "Could not open {}; expected one `heartRate,bloodPressure,spo2` record per line, e.g.\n120,165,88\n95,142,97",
                args.input.display()
            )
        })?;
        pipeline.run(&mut source)
    };

    if let Some(err) = &report.ingest.input_error {
        warn!(source = %report.source, "input ended early: {}", err);
    }

    let mut stdout = io::stdout().lock();
    write!(
        stdout,
        "{}",
        report::ReportView {
            report: &report,
            graph: pipeline.graph(),
        }
    )?;

    if let Some(export_path) = args.export {
        export_to_file(&report, &export_path)?;
        writeln!(stdout, "Exported triage report to: {}", export_path.display())?;
    }

    Ok(())
}

/// Write the JSON export of a run.
fn export_to_file(report: &TriageReport, export_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&report::to_json(report))?;
    std::fs::write(export_path, json)
        .with_context(|| format!("Failed to write {}", export_path.display()))
}
