//! `virlog_dump`: prints an ESET virlog.dat file as `;`-separated text.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use eset_virlog::{output, Layout, ParsedRecord, Virlog};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;

/// Output formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Header line plus one `;`-separated line per record.
    #[default]
    Text,
    /// One JSON object per record.
    Json,
}

/// Parse an ESET (NOD32) virlog.dat detection log.
#[derive(Parser, Debug)]
#[command(name = "virlog_dump", version, about)]
struct Args {
    /// Path to the virlog.dat file.
    virlog: PathBuf,

    /// Record layout of the log.
    #[arg(long, value_enum, default_value_t = Layout::Delimited)]
    layout: Layout,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Write records to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Do not print per-field diagnostics.
    #[arg(short, long)]
    quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let virlog = Virlog::open_with_layout(&args.virlog, args.layout)
        .with_context(|| format!("Failed to open {}", args.virlog.display()))?;
    let records = virlog.parse();
    debug!(count = records.len(), "Parsed records");

    if !args.quiet {
        print_diagnostics(&records)?;
    }

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_records(&mut BufWriter::new(file), &virlog, &records, args.format)
        }
        None => write_records(&mut io::stdout().lock(), &virlog, &records, args.format),
    }
}

/// Prints every diagnostic to stderr in record order.
fn print_diagnostics(records: &[ParsedRecord]) -> Result<()> {
    let stderr = io::stderr();
    let mut stderr = stderr.lock();
    for diagnostic in records.iter().flat_map(|record| &record.diagnostics) {
        writeln!(stderr, "{}", diagnostic)?;
    }
    Ok(())
}

fn write_records<W: Write>(
    writer: &mut W,
    virlog: &Virlog,
    records: &[ParsedRecord],
    format: Format,
) -> Result<()> {
    match format {
        Format::Text => output::write_text(writer, &virlog.header(), records)?,
        #[cfg(feature = "serde")]
        Format::Json => output::write_json_lines(writer, records)?,
        #[cfg(not(feature = "serde"))]
        Format::Json => anyhow::bail!("JSON output requires the `serde` feature"),
    }
    Ok(())
}

/// Installs a stderr subscriber; `RUST_LOG` overrides the verbosity flag.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let level = level.as_str().to_lowercase();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("eset_virlog={level},virlog_dump={level}", level = level))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
