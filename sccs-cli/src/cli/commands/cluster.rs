use super::read_sequences;
use crate::cli::output::*;
use anyhow::Result;
use clap::Args;
use comfy_table::Cell;
use sccs_bio::write_entries;
use sccs_core::{Alphabet, Config, DivergenceKind};
use sccs_engine::{krnn_cluster, ClusterOptions};
use std::path::PathBuf;

#[derive(Args)]
pub struct ClusterArgs {
    /// Input FASTA file
    #[arg(value_name = "FASTA")]
    pub input: PathBuf,

    /// Fixed word size (selected from the input when omitted)
    #[arg(short = 'k', long)]
    pub word_size: Option<usize>,

    /// Smallest neighbor count tried
    #[arg(long)]
    pub k_min: Option<usize>,

    /// Largest neighbor count tried
    #[arg(long)]
    pub k_max: Option<usize>,

    /// Components smaller than this are treated as outliers
    #[arg(long)]
    pub min_cluster_size: Option<usize>,

    /// Divergence measure (jensen-shannon, kullback-leibler)
    #[arg(long)]
    pub measure: Option<DivergenceKind>,

    /// Alphabet (nucleotide, purine)
    #[arg(long)]
    pub alphabet: Option<Alphabet>,

    /// Write one entry file per cluster of the best trial into this directory
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// File name prefix for the cluster entry files
    #[arg(long, default_value = "cluster")]
    pub prefix: String,

    /// Number of trials listed
    #[arg(long, default_value = "5")]
    pub trials: usize,

    /// Show progress bars
    #[arg(long)]
    pub progress: bool,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ClusterArgs, config: &Config) -> Result<()> {
    let mut options = ClusterOptions::from_config(config);
    options.word_size = args.word_size.or(options.word_size);
    options.k_min = args.k_min.or(options.k_min);
    options.k_max = args.k_max.or(options.k_max);
    if let Some(size) = args.min_cluster_size {
        options.min_cluster_size = size;
    }
    if let Some(measure) = args.measure {
        options.measure = measure;
    }
    if let Some(alphabet) = args.alphabet {
        options.alphabet = alphabet;
    }
    options.show_progress |= args.progress && !args.json;

    let sequences = read_sequences(&args.input)?;
    let trials = krnn_cluster(&sequences, &options)?;
    let best = &trials[0];

    let mut written = Vec::new();
    if let Some(dir) = &args.output_dir {
        std::fs::create_dir_all(dir).map_err(sccs_core::SccsError::from)?;
        for (i, cluster) in best.clusters.iter().enumerate() {
            let path = dir.join(format!("{}.cluster{}.tsv", args.prefix, i));
            write_entries(&path, cluster)?;
            written.push(path);
        }
    }

    if args.json {
        let report = serde_json::json!({
            "word_size": best.word_size,
            "trials": trials
                .iter()
                .take(args.trials)
                .map(|t| {
                    // JSON has no infinity
                    let score = Some(t.score).filter(|s| s.is_finite());
                    let clusters: Vec<Vec<String>> = t
                        .clusters
                        .iter()
                        .map(|c| c.iter().map(|e| e.to_string()).collect())
                        .collect();
                    serde_json::json!({ "k": t.k, "score": score, "clusters": clusters })
                })
                .collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    heading("Clustering trials");
    let mut table = table_with_header(&["Rank", "k", "Clusters", "Sizes", "Davies-Bouldin"]);
    for (rank, trial) in trials.iter().take(args.trials).enumerate() {
        let sizes: Vec<String> = trial.clusters.iter().map(|c| c.len().to_string()).collect();
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(if trial.is_fallback() { "-".to_string() } else { trial.k.to_string() }),
            Cell::new(trial.len()),
            Cell::new(sizes.join(", ")),
            Cell::new(format_score(trial.score)),
        ]);
    }
    println!("{}", table);

    if best.is_fallback() {
        status(
            Status::Warn,
            "No neighbor count produced a usable partition; all sequences form one cluster",
        );
    }
    status(Status::Note, &format!("Word size {}", best.word_size));
    for path in &written {
        status(Status::Done, &format!("Wrote {}", path.display()));
    }
    Ok(())
}
