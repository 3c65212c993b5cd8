use anyhow::{Context, bail};
use clap::Parser;
use kmpare::{BlockArena, Error, fit, read_counts, report};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Compare k-mer count libraries with a weighted goodness-of-fit statistic.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Input k-mer count files (one per library): `<sequence> <count>` lines
    #[arg(short, long, num_args = 1.., required = true)]
    infile: Vec<PathBuf>,

    /// Comparison set(s) of 1-based library indices, e.g. "{1 2}"
    #[arg(short, long, num_args = 0..)]
    compset: Vec<String>,

    /// Output file path (must not already exist)
    #[arg(short, long)]
    outfile: PathBuf,
}

// Exit codes: one per failing stage.
const EXIT_CONFIG: u8 = 2;
const EXIT_UNAVAILABLE: u8 = 3;
const EXIT_EMPTY: u8 = 4;
const EXIT_MALFORMED: u8 = 5;
const EXIT_OUTPUT_EXISTS: u8 = 6;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => {
            eprintln!("finished!");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e:#}");
            eprintln!("--> exiting");
            ExitCode::from(exit_code(&e))
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    if args.outfile.exists() {
        return Err(Error::OutputExists(args.outfile.clone()).into());
    }

    let sets = args
        .compset
        .iter()
        .map(|s| parse_set(s, args.infile.len()))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let store = read_counts(&args.infile)?;

    let mut stats = BlockArena::<f64>::new();
    fit(&store, &sets, &mut stats)?;

    eprintln!("dumping results to file: {}", args.outfile.display());
    let file = File::create(&args.outfile).map_err(|source| Error::FileUnavailable {
        path: args.outfile.clone(),
        source,
    })?;
    let mut w = BufWriter::new(file);
    report::write_header(&mut w, store.nlibs(), &sets)
        .and_then(|_| report::write_table(&mut w, &store, sets.len(), &stats))
        .and_then(|_| w.flush())
        .with_context(|| format!("could not write file: {}", args.outfile.display()))?;
    Ok(())
}

/// Parse a brace-delimited comparison set like `{1 2}` or `{1,3}` into
/// 0-based library indices bounded by `nlibs`.
fn parse_set(s: &str, nlibs: usize) -> anyhow::Result<Vec<usize>> {
    let Some(inner) = s
        .trim()
        .strip_prefix('{')
        .and_then(|t| t.strip_suffix('}'))
    else {
        bail!("comparison set {s:?} must be brace-delimited, e.g. \"{{1 2}}\"");
    };
    let mut set = Vec::new();
    for tok in inner.split(|c: char| c.is_whitespace() || c == ',') {
        if tok.is_empty() {
            continue;
        }
        let idx: usize = tok
            .parse()
            .with_context(|| format!("invalid library index {tok:?} in set {s:?}"))?;
        if idx == 0 || idx > nlibs {
            return Err(Error::IndexOutOfRange {
                index: idx,
                limit: nlibs,
            }
            .into());
        }
        set.push(idx - 1);
    }
    if set.is_empty() {
        bail!("comparison set {s:?} names no libraries");
    }
    Ok(set)
}

fn exit_code(e: &anyhow::Error) -> u8 {
    match e.downcast_ref::<Error>() {
        Some(Error::OutputExists(_)) => EXIT_OUTPUT_EXISTS,
        Some(Error::FileUnavailable { .. }) => EXIT_UNAVAILABLE,
        Some(Error::EmptyInput(_)) => EXIT_EMPTY,
        Some(Error::MalformedLine { .. }) => EXIT_MALFORMED,
        Some(Error::IndexOutOfRange { .. }) | Some(Error::AlreadyInitialized) | None => EXIT_CONFIG,
    }
}
