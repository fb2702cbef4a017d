/// End-to-end candidate classification over a synthetic genome
use sccs_bio::{parse_fasta, read_entries, GenomeSource, Sequence, SequenceSource};
use sccs_core::{Config, CutpointBounds, EntryRef, Strand};
use sccs_engine::{
    resolve_context_size, CandidateOptions, CandidateSetEngine, CsvRenderer, OutputTarget,
};
use sccs_test::{init_test_logging, mutate, MarkovSource, TestEnvironment, TestGenome};
use std::collections::HashSet;

const CORE_LEN: usize = 300;
const FLANK_LEN: u64 = 100;

struct Layout {
    genome: TestGenome,
    seeds: Vec<EntryRef>,
    hits: Vec<EntryRef>,
    decoys: Vec<EntryRef>,
}

/// Sixteen family members with conserved flanks (half of them seeds), plus
/// four unrelated regions from a different source
fn layout() -> Layout {
    let family = MarkovSource::random(2, 0.8, 11);
    let stranger = MarkovSource::random(2, 0.8, 97);
    let core = family.generate(CORE_LEN, 1);
    let left = family.generate(FLANK_LEN as usize, 2);
    let right = family.generate(FLANK_LEN as usize, 3);

    let mut genome = TestGenome::new("chr1", 5);
    let mut members = Vec::new();
    for i in 0..16u64 {
        genome.spacer(50);
        genome.append(&mutate(&left, 0.05, 100 + i));
        members.push(genome.append(&mutate(&core, 0.05, 200 + i)));
        genome.append(&mutate(&right, 0.05, 300 + i));
    }

    let mut decoys = Vec::new();
    for i in 0..4u64 {
        genome.spacer(FLANK_LEN as usize + 50);
        let strand = if i % 2 == 0 { Strand::Forward } else { Strand::Reverse };
        decoys.push(genome.insert(&stranger.generate(CORE_LEN, 400 + i), strand));
    }
    genome.spacer(FLANK_LEN as usize + 50);

    let hits = members.split_off(8);
    Layout {
        genome,
        seeds: members,
        hits,
        decoys,
    }
}

fn config() -> Config {
    let mut config = Config::default();
    // Keeps 70% of twelve candidates: exactly the eight family members
    config.cutpoint.hit_only = CutpointBounds::new(0.2, 0.7);
    config
}

fn seed_sequences(source: &GenomeSource, seeds: &[EntryRef]) -> Vec<Sequence> {
    source
        .fetch_all(seeds, 0)
        .into_iter()
        .map(|s| s.unwrap())
        .collect()
}

#[test]
fn test_hit_only_phase_separates_family_from_strangers() {
    init_test_logging();
    let env = TestEnvironment::new().unwrap();
    let layout = layout();
    let dir = env.write_genome("synthetic", &[&layout.genome]).unwrap();
    let source = GenomeSource::from_dir("synthetic", &dir);

    let seeds = seed_sequences(&source, &layout.seeds);
    let mut candidates = layout.hits.clone();
    candidates.extend(layout.decoys.iter().cloned());

    let engine = CandidateSetEngine::new(config(), &source).unwrap();
    let options = CandidateOptions {
        word_size: Some(4),
        ..CandidateOptions::default()
    };
    let sets = engine
        .compute_candidate_sets(&seeds, &candidates, 0, 0, &options)
        .unwrap();

    let good: HashSet<_> = sets.hit_only.good.iter().cloned().collect();
    let hits: HashSet<_> = layout.hits.iter().cloned().collect();
    assert_eq!(good, hits);
    assert_eq!(sets.hit_only.cutpoint, 8);
    assert!(layout.decoys.iter().all(|d| sets.final_bad.contains(d)));

    let scores = &sets.hit_only.divergences;
    assert!(scores.windows(2).all(|w| w[0].divergence <= w[1].divergence));
    assert_eq!(scores.len(), candidates.len());
}

#[test]
fn test_context_phase_refines_hit_only_survivors() {
    init_test_logging();
    let env = TestEnvironment::new().unwrap();
    let layout = layout();
    let dir = env.write_genome("synthetic", &[&layout.genome]).unwrap();
    let source = GenomeSource::from_dir("synthetic", &dir);

    let seeds = seed_sequences(&source, &layout.seeds);
    let mut candidates = layout.hits.clone();
    candidates.extend(layout.decoys.iter().cloned());

    let engine = CandidateSetEngine::new(config(), &source)
        .unwrap()
        .with_renderer(Box::new(CsvRenderer::new(env.out_dir()).without_timestamp()));
    let options = CandidateOptions {
        word_size: Some(4),
        output: Some(OutputTarget::new(env.out_dir(), "run1")),
        ..CandidateOptions::default()
    };
    let sets = engine
        .compute_candidate_sets(&seeds, &candidates, 1, FLANK_LEN, &options)
        .unwrap();

    assert_eq!(sets.context.delta, FLANK_LEN);
    assert_eq!(sets.context.bounds, CutpointBounds::new(0.45, 0.85));
    assert_eq!(sets.context.divergences.len(), sets.hit_only.good.len());

    // Final good and bad split the candidates exactly
    let good: HashSet<_> = sets.final_good.iter().cloned().collect();
    let bad: HashSet<_> = sets.final_bad.iter().cloned().collect();
    assert!(good.is_disjoint(&bad));
    assert_eq!(good.len() + bad.len(), candidates.len());
    assert!(good.iter().all(|e| sets.hit_only.good.contains(e)));

    let files = sets.files.as_ref().unwrap();
    assert_eq!(read_entries(&files.good).unwrap(), sets.final_good);
    assert_eq!(read_entries(&files.bad).unwrap(), sets.final_bad);

    assert!(env.out_dir().join("divergence_run1_delta0.csv").exists());
    assert!(env.out_dir().join("divergence_run1_delta100.csv").exists());
}

#[test]
fn test_per_context_runs_write_suffixed_files() {
    let env = TestEnvironment::new().unwrap();
    let layout = layout();
    let dir = env.write_genome("synthetic", &[&layout.genome]).unwrap();
    let source = GenomeSource::from_dir("synthetic", &dir);

    let seeds = seed_sequences(&source, &layout.seeds);
    let engine = CandidateSetEngine::new(config(), &source).unwrap();
    let options = CandidateOptions {
        word_size: Some(4),
        output: Some(OutputTarget::new(env.out_dir(), "seeds")),
        ..CandidateOptions::default()
    };
    let cluster_options = sccs_engine::ClusterOptions {
        word_size: Some(4),
        ..sccs_engine::ClusterOptions::default()
    };

    let runs = engine
        .compute_per_context(&seeds, &layout.hits, 0, 0, &options, &cluster_options)
        .unwrap();
    assert!(!runs.is_empty());
    assert!(env.out_dir().join("seeds.ctx0.good.tsv").exists());
    assert!(env.out_dir().join("seeds.ctx0.bad.tsv").exists());
}

#[test]
fn test_context_size_round_trips_through_seed_file() {
    let env = TestEnvironment::new().unwrap();
    let path = env
        .write_file("seeds.fa", ">s1\nACGTACGTAC\n>s2\nTTGACCA\n")
        .unwrap();

    assert!(resolve_context_size(None, Some(&path)).is_err());
    assert_eq!(resolve_context_size(Some(250), Some(&path)).unwrap(), 250);
    assert_eq!(resolve_context_size(None, Some(&path)).unwrap(), 250);

    // The annotation does not disturb the records
    let records = parse_fasta(&path).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].sequence, b"TTGACCA".to_vec());
}
