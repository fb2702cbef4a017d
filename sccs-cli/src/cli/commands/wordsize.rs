use super::read_sequences;
use crate::cli::output::*;
use anyhow::Result;
use clap::Args;
use comfy_table::Cell;
use sccs_bio::WordSizeSelector;
use sccs_core::{Alphabet, Config};
use std::path::PathBuf;

#[derive(Args)]
pub struct WordsizeArgs {
    /// Input FASTA file
    #[arg(value_name = "FASTA")]
    pub input: PathBuf,

    /// Largest word size evaluated
    #[arg(long)]
    pub limit: Option<usize>,

    /// Conditional relative entropy threshold
    #[arg(long)]
    pub crecut: Option<f64>,

    /// Number of sequences sampled
    #[arg(long)]
    pub sample_size: Option<usize>,

    /// Alphabet (nucleotide, purine)
    #[arg(long)]
    pub alphabet: Option<Alphabet>,

    /// Show the per-sequence choice for the first N sequences
    #[arg(long, value_name = "N")]
    pub details: Option<usize>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: WordsizeArgs, config: &Config) -> Result<()> {
    let mut selection = config.word_size.clone();
    if let Some(limit) = args.limit {
        selection.limit = limit;
    }
    if let Some(crecut) = args.crecut {
        selection.crecut = crecut;
    }
    if let Some(sample_size) = args.sample_size {
        selection.sample_size = sample_size;
    }
    let alphabet = args.alphabet.unwrap_or(config.profile.alphabet);

    let sequences = read_sequences(&args.input)?;
    let selector = WordSizeSelector::new(&selection, alphabet)?;
    let word_size = selector.select(&sequences)?;

    if args.json {
        let report = serde_json::json!({
            "word_size": word_size,
            "sequences": sequences.len(),
            "limit": selection.limit,
            "crecut": selection.crecut,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if let Some(n) = args.details {
        heading("Per-sequence word sizes");
        let mut table = table_with_header(&["Sequence", "Length", "k", "CRE at k"]);
        for seq in sequences.iter().take(n) {
            let curve = match selector.cre_profile(&seq.sequence) {
                Ok(curve) => curve,
                Err(e) => {
                    status(Status::Warn, &format!("{}: {}", seq.entry, e));
                    continue;
                }
            };
            let k = selector.pick_for(&seq.sequence)?;
            let cre = curve
                .iter()
                .find(|(l, _)| *l == k)
                .map(|(_, c)| format_score(*c))
                .unwrap_or_else(|| "-".to_string());
            table.add_row(vec![
                Cell::new(seq.entry.to_string()),
                Cell::new(seq.len()),
                Cell::new(k),
                Cell::new(cre),
            ]);
        }
        println!("{}", table);
    }

    let message = format!(
        "Selected word size {} from {} sequences",
        word_size,
        sequences.len()
    );
    status(Status::Done, &message);
    Ok(())
}
