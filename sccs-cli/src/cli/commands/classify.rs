use super::read_sequences;
use crate::cli::output::*;
use anyhow::{Context, Result};
use clap::Args;
use sccs_bio::{read_entries, GenomeSource};
use sccs_core::{Config, Tail};
use sccs_engine::{
    resolve_context_size, CandidateOptions, CandidateSetEngine, CandidateSets, ClusterOptions,
    CsvRenderer, OutputTarget,
};
use std::path::PathBuf;

#[derive(Args)]
pub struct ClassifyArgs {
    /// Seed alignment or FASTA; headers carry `name:start-end(strand)` coordinates
    #[arg(long, value_name = "FASTA")]
    pub seeds: PathBuf,

    /// Candidate entry file (name, start, end, strand; tab-separated)
    #[arg(long, value_name = "TSV")]
    pub candidates: PathBuf,

    /// Registered genome key
    #[arg(long, required_unless_present = "genome_dir", conflicts_with = "genome_dir")]
    pub genome: Option<String>,

    /// Directory of per-chromosome FASTA files
    #[arg(long, value_name = "DIR")]
    pub genome_dir: Option<PathBuf>,

    /// Flank size; stored in the seed file, read back from it when omitted
    #[arg(long, value_name = "BASES")]
    pub context: Option<u64>,

    /// Iteration index; selects the context-phase preset
    #[arg(long, default_value = "0")]
    pub run: usize,

    /// Context-phase CDF offset (overrides the run preset)
    #[arg(long, allow_hyphen_values = true)]
    pub dy: Option<f64>,

    /// Context-phase divergence bound (overrides the run preset)
    #[arg(long)]
    pub mre: Option<f64>,

    /// Which end is kept (low, high, two-tailed)
    #[arg(long)]
    pub tail: Option<Tail>,

    /// Fixed word size for both phases
    #[arg(short = 'k', long)]
    pub word_size: Option<usize>,

    /// Output directory for entry files and divergence series
    #[arg(short = 'o', long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Output file prefix (defaults to the seed file stem)
    #[arg(long)]
    pub prefix: Option<String>,

    /// Cluster the seeds and classify against each sub-context
    #[arg(long)]
    pub per_context: bool,

    /// Write divergence series as CSV next to the entry files
    #[arg(long)]
    pub plots: bool,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ClassifyArgs, config: Config) -> Result<()> {
    let delta = resolve_context_size(args.context, Some(&args.seeds))?;

    let source = match (&args.genome_dir, &args.genome) {
        (Some(dir), _) => GenomeSource::from_dir("local", dir),
        (None, Some(key)) => GenomeSource::new(&config.genomes, key)?,
        (None, None) => anyhow::bail!("either --genome or --genome-dir is required"),
    };

    let seeds = read_sequences(&args.seeds)?;
    let candidates = read_entries(&args.candidates)
        .with_context(|| format!("Failed to read {}", args.candidates.display()))?;

    let prefix = args.prefix.clone().unwrap_or_else(|| {
        args.seeds
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "sccs".to_string())
    });
    let options = CandidateOptions {
        word_size: args.word_size,
        dy: args.dy,
        mre: args.mre,
        tail: args.tail,
        output: Some(OutputTarget::new(&args.output_dir, prefix)),
    };

    let mut cluster_options = ClusterOptions::from_config(&config);
    cluster_options.word_size = args.word_size.or(cluster_options.word_size);

    let mut engine = CandidateSetEngine::new(config, &source)?;
    if args.plots {
        std::fs::create_dir_all(&args.output_dir).map_err(sccs_core::SccsError::from)?;
        engine = engine.with_renderer(Box::new(CsvRenderer::new(&args.output_dir)));
    }

    let results = if args.per_context {
        engine.compute_per_context(
            &seeds,
            &candidates,
            args.run,
            delta,
            &options,
            &cluster_options,
        )?
    } else {
        vec![engine.compute_candidate_sets(&seeds, &candidates, args.run, delta, &options)?]
    };

    if args.json {
        let report: Vec<serde_json::Value> = results.iter().map(json_summary).collect();
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for (i, sets) in results.iter().enumerate() {
        if results.len() > 1 {
            heading(&format!("Sub-context {}", i));
        } else {
            heading("Candidate sets");
        }
        print_summary(sets);
    }
    Ok(())
}

fn json_summary(sets: &CandidateSets) -> serde_json::Value {
    let phase = |p: &sccs_engine::PhaseResult| {
        serde_json::json!({
            "delta": p.delta,
            "word_size": p.word_size,
            "dy": p.bounds.dy,
            "mre": p.bounds.mre,
            "cutoff": p.cutoff,
            "cutpoint": p.cutpoint,
            "good": p.good.len(),
            "bad": p.bad.len(),
        })
    };
    serde_json::json!({
        "run": sets.run,
        "hit_only": phase(&sets.hit_only),
        "context": phase(&sets.context),
        "good": sets.final_good.iter().map(|e| e.to_string()).collect::<Vec<_>>(),
        "bad": sets.final_bad.iter().map(|e| e.to_string()).collect::<Vec<_>>(),
    })
}

fn print_summary(sets: &CandidateSets) {
    let a = &sets.hit_only;
    let b = &sets.context;
    println!(
        "{}",
        summary_table(&[
            ("Run", sets.run.to_string()),
            ("Context size", b.delta.to_string()),
            ("Hit-only word size", a.word_size.to_string()),
            ("Hit-only cutoff", format!("{:.3} (cutpoint {})", a.cutoff, a.cutpoint)),
            ("Hit-only good / bad", format!("{} / {}", a.good.len(), a.bad.len())),
            ("Context word size", b.word_size.to_string()),
            ("Context cutoff", format!("{:.3} (cutpoint {})", b.cutoff, b.cutpoint)),
            ("Context good / bad", format!("{} / {}", b.good.len(), b.bad.len())),
            ("Final good", sets.final_good.len().to_string()),
            ("Final bad", sets.final_bad.len().to_string()),
        ])
    );

    if sets.final_good.is_empty() {
        status(Status::Warn, "No candidate survived both phases");
    }
    if let Some(files) = &sets.files {
        status(Status::Done, &format!("Wrote {}", files.good.display()));
        status(Status::Done, &format!("Wrote {}", files.bad.display()));
    }
}
