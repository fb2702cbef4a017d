use crate::cli::output::*;
use anyhow::{Context, Result};
use clap::Args;
use comfy_table::Cell;
use sccs_core::{Config, CutpointBounds, EntryRef, SccsError, Tail};
use sccs_engine::{classify, ScoredEntry};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct CutpointArgs {
    /// Tab-separated `label<TAB>divergence` lines
    #[arg(value_name = "TSV")]
    pub input: PathBuf,

    /// CDF offset above the median (defaults to the hit-only bound)
    #[arg(long, allow_hyphen_values = true)]
    pub dy: Option<f64>,

    /// Maximum admissible divergence (defaults to the hit-only bound)
    #[arg(long)]
    pub mre: Option<f64>,

    /// Which end is kept (low, high, two-tailed)
    #[arg(long)]
    pub tail: Option<Tail>,

    /// Write the good labels here
    #[arg(long, value_name = "FILE")]
    pub good: Option<PathBuf>,

    /// Write the bad labels here
    #[arg(long, value_name = "FILE")]
    pub bad: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

fn score_error(path: &Path, err: csv::Error) -> SccsError {
    if err.is_io_error() {
        if let csv::ErrorKind::Io(io) = err.into_kind() {
            return SccsError::Io(io);
        }
        return SccsError::Parse(format!("{}: unreadable", path.display()));
    }
    SccsError::Parse(format!("{}: {}", path.display(), err))
}

fn read_scores(path: &Path) -> Result<Vec<ScoredEntry>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| score_error(path, e))?;

    let mut scores = Vec::new();
    for record in reader.deserialize::<(String, f64)>() {
        let (label, divergence) =
            record.map_err(|e| score_error(path, e))?;
        scores.push(ScoredEntry::new(EntryRef::whole(label, 0), divergence));
    }
    Ok(scores)
}

fn write_labels(path: &Path, entries: &[ScoredEntry]) -> Result<()> {
    let mut file = std::fs::File::create(path)
        .map_err(SccsError::from)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for scored in entries {
        writeln!(file, "{}\t{}", scored.entry.name, scored.divergence).map_err(SccsError::from)?;
    }
    Ok(())
}

pub fn run(args: CutpointArgs, config: &Config) -> Result<()> {
    let defaults = config.cutpoint.hit_only;
    let bounds = CutpointBounds::new(
        args.dy.unwrap_or(defaults.dy),
        args.mre.unwrap_or(defaults.mre),
    );
    let tail = args.tail.unwrap_or(config.cutpoint.tail);

    let scores = read_scores(&args.input)?;
    let total = scores.len();
    let result = classify(scores, bounds, tail)?;

    if let Some(path) = &args.good {
        write_labels(path, &result.partition.good)?;
    }
    if let Some(path) = &args.bad {
        write_labels(path, &result.partition.bad)?;
    }

    if args.json {
        let names = |entries: &[ScoredEntry]| -> Vec<String> {
            entries.iter().map(|s| s.entry.name.clone()).collect()
        };
        let report = serde_json::json!({
            "dy": bounds.dy,
            "mre": bounds.mre,
            "tail": tail.to_string(),
            "cutoff": result.cutoff,
            "cutpoint": result.cutpoint,
            "good": names(&result.partition.good),
            "bad": names(&result.partition.bad),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    heading("Cutpoint");
    println!(
        "{}",
        summary_table(&[
            ("Entries", total.to_string()),
            ("Dy / Mre", format!("{} / {}", bounds.dy, bounds.mre)),
            ("Tail", tail.to_string()),
            ("Cutoff", format!("{:.3}", result.cutoff)),
            ("Cutpoint", result.cutpoint.to_string()),
            ("Good", result.partition.good.len().to_string()),
            ("Bad", result.partition.bad.len().to_string()),
        ])
    );

    let mut table = table_with_header(&["Label", "Divergence", "Set"]);
    for scored in &result.divergences {
        let set = if result.partition.good.contains(scored) { "good" } else { "bad" };
        table.add_row(vec![
            Cell::new(&scored.entry.name),
            Cell::new(format_score(scored.divergence)),
            Cell::new(set),
        ]);
    }
    println!("{}", table);
    Ok(())
}
