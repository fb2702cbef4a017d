//! Two-phase candidate classification against a seed set.
//!
//! Phase A scores the bare candidate regions against a hybrid of the seeds
//! with the fixed hit-only bounds. Phase B takes Phase A's good set, widens
//! every region (and every seed) by the context size, and cuts again with
//! run-dependent bounds. The final good set is Phase B's; the final bad set
//! is everything either phase rejected.

use crate::clustering::{krnn_cluster, ClusterOptions};
use crate::cutpoint::{classify, ScoredEntry};
use crate::render::{NullRenderer, Renderer, Series};
use rayon::prelude::*;
use sccs_bio::formats::annotation::{read_context_size, write_context_size, CONTEXT_SIZE_TAG};
use sccs_bio::{
    hybrid_profile, measure_for, write_entries, DivergenceMeasure, ProfileBuilder, ProfileInput,
    Sequence, SequenceSource, WordSizeSelector,
};
use sccs_core::{Config, CutpointBounds, EntryRef, SccsError, SccsResult, Tail};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Where final entry files are written
#[derive(Debug, Clone, PartialEq)]
pub struct OutputTarget {
    pub dir: PathBuf,
    pub prefix: String,
}

impl OutputTarget {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
        }
    }

    pub fn good_path(&self) -> PathBuf {
        self.dir.join(format!("{}.good.tsv", self.prefix))
    }

    pub fn bad_path(&self) -> PathBuf {
        self.dir.join(format!("{}.bad.tsv", self.prefix))
    }

    /// Target for the `index`-th sub-context
    pub fn for_context(&self, index: usize) -> Self {
        Self::new(self.dir.clone(), format!("{}.ctx{}", self.prefix, index))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateOptions {
    /// Fixed word size for both phases; selected per phase when unset
    pub word_size: Option<usize>,
    /// Context-phase CDF offset; the run preset when unset
    pub dy: Option<f64>,
    /// Context-phase divergence bound; the run preset when unset
    pub mre: Option<f64>,
    pub tail: Option<Tail>,
    pub output: Option<OutputTarget>,
}

/// Outcome of one phase
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseResult {
    pub delta: u64,
    pub word_size: usize,
    pub bounds: CutpointBounds,
    pub cutoff: f64,
    pub cutpoint: usize,
    /// Every scored entry, ascending by divergence
    pub divergences: Vec<ScoredEntry>,
    pub good: Vec<EntryRef>,
    pub bad: Vec<EntryRef>,
}

impl PhaseResult {
    fn empty(delta: u64, word_size: usize, bounds: CutpointBounds) -> Self {
        Self {
            delta,
            word_size,
            bounds,
            cutoff: 0.0,
            cutpoint: 0,
            divergences: Vec::new(),
            good: Vec::new(),
            bad: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FinalFiles {
    pub good: PathBuf,
    pub bad: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CandidateSets {
    pub run: usize,
    pub hit_only: PhaseResult,
    pub context: PhaseResult,
    pub final_good: Vec<EntryRef>,
    /// Phase A rejections followed by Phase B rejections
    pub final_bad: Vec<EntryRef>,
    pub files: Option<FinalFiles>,
}

/// Context size for a run: the explicit value (persisted into the seed file
/// when one is given), else the seed file's annotation
pub fn resolve_context_size(explicit: Option<u64>, seed_file: Option<&Path>) -> SccsResult<u64> {
    match (explicit, seed_file) {
        (Some(delta), Some(path)) => {
            write_context_size(path, delta)?;
            Ok(delta)
        }
        (Some(delta), None) => Ok(delta),
        (None, Some(path)) => read_context_size(path)?.ok_or_else(|| {
            SccsError::MissingAnnotation(format!(
                "{} has no {} annotation and no context size was given",
                path.display(),
                CONTEXT_SIZE_TAG
            ))
        }),
        (None, None) => Err(SccsError::MissingAnnotation(format!(
            "no context size given and no seed alignment to read {} from",
            CONTEXT_SIZE_TAG
        ))),
    }
}

pub struct CandidateSetEngine<'a> {
    config: Config,
    source: &'a dyn SequenceSource,
    measure: Box<dyn DivergenceMeasure>,
    renderer: Box<dyn Renderer>,
}

impl<'a> CandidateSetEngine<'a> {
    pub fn new(config: Config, source: &'a dyn SequenceSource) -> SccsResult<Self> {
        config.validate()?;
        let measure = measure_for(config.divergence.measure);
        Ok(Self {
            config,
            source,
            measure,
            renderer: Box::new(NullRenderer),
        })
    }

    pub fn with_renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Bounds for the context phase of `run`
    pub fn context_bounds(&self, run: usize, options: &CandidateOptions) -> CutpointBounds {
        let preset = self.config.cutpoint.preset_for_run(run);
        CutpointBounds::new(
            options.dy.unwrap_or(preset.dy),
            options.mre.unwrap_or(preset.mre),
        )
    }

    /// Classify `candidates` against `seeds` in the hit-only and context phases
    pub fn compute_candidate_sets(
        &self,
        seeds: &[Sequence],
        candidates: &[EntryRef],
        run: usize,
        delta: u64,
        options: &CandidateOptions,
    ) -> SccsResult<CandidateSets> {
        if seeds.is_empty() {
            return Err(SccsError::EmptyInput("no seed sequences".to_string()));
        }
        if candidates.is_empty() {
            return Err(SccsError::EmptyInput("no candidate entries".to_string()));
        }

        let tail = options.tail.unwrap_or(self.config.cutpoint.tail);
        info!(
            "Run {}: {} candidates against {} seeds (context size {})",
            run,
            candidates.len(),
            seeds.len(),
            delta
        );

        let hits = self.source.fetch_all(candidates, 0);
        let hit_only = self.run_phase(
            seeds,
            candidates,
            hits,
            0,
            self.config.cutpoint.hit_only,
            options.word_size,
            tail,
            run,
        )?;
        info!(
            "Hit-only phase kept {} of {} (cutpoint {})",
            hit_only.good.len(),
            candidates.len(),
            hit_only.cutpoint
        );

        let (context, final_bad) = if delta == 0 {
            (hit_only.clone(), hit_only.bad.clone())
        } else {
            let extended_seeds = self.extend_seeds(seeds, delta)?;
            let widened = self.source.fetch_all(&hit_only.good, delta);
            let context = self.run_phase(
                &extended_seeds,
                &hit_only.good,
                widened,
                delta,
                self.context_bounds(run, options),
                options.word_size,
                tail,
                run,
            )?;
            info!(
                "Context phase kept {} of {} (cutpoint {})",
                context.good.len(),
                hit_only.good.len(),
                context.cutpoint
            );

            let mut bad = hit_only.bad.clone();
            bad.extend(context.bad.iter().cloned());
            (context, bad)
        };

        let final_good = context.good.clone();
        let files = match &options.output {
            Some(target) => {
                std::fs::create_dir_all(&target.dir)?;
                let files = FinalFiles {
                    good: target.good_path(),
                    bad: target.bad_path(),
                };
                write_entries(&files.good, &final_good)?;
                write_entries(&files.bad, &final_bad)?;
                debug!("Wrote {} and {}", files.good.display(), files.bad.display());
                Some(files)
            }
            None => None,
        };

        Ok(CandidateSets {
            run,
            hit_only,
            context,
            final_good,
            final_bad,
            files,
        })
    }

    /// Cluster the seeds into sub-contexts and classify the candidates against each
    pub fn compute_per_context(
        &self,
        seeds: &[Sequence],
        candidates: &[EntryRef],
        run: usize,
        delta: u64,
        options: &CandidateOptions,
        cluster_options: &ClusterOptions,
    ) -> SccsResult<Vec<CandidateSets>> {
        let trials = krnn_cluster(seeds, cluster_options)?;
        let best = &trials[0];
        info!("Seeds form {} sub-contexts", best.len());

        best.members
            .iter()
            .enumerate()
            .map(|(index, members)| {
                let sub_seeds: Vec<Sequence> = members.iter().map(|&i| seeds[i].clone()).collect();
                let sub_options = CandidateOptions {
                    output: options.output.as_ref().map(|t| t.for_context(index)),
                    ..options.clone()
                };
                self.compute_candidate_sets(&sub_seeds, candidates, run, delta, &sub_options)
            })
            .collect()
    }

    fn extend_seeds(&self, seeds: &[Sequence], delta: u64) -> SccsResult<Vec<Sequence>> {
        let entries: Vec<EntryRef> = seeds.iter().map(|s| s.entry.clone()).collect();
        let mut extended = Vec::with_capacity(seeds.len());
        for (entry, result) in entries.iter().zip(self.source.fetch_all(&entries, delta)) {
            match result {
                Ok(seq) => extended.push(seq),
                Err(SccsError::Io(e)) => return Err(SccsError::Io(e)),
                Err(e) => warn!("Seed {} cannot be widened by {}: {}", entry, delta, e),
            }
        }
        if extended.is_empty() {
            return Err(SccsError::EmptyInput(format!(
                "no seed could be widened by {}",
                delta
            )));
        }
        Ok(extended)
    }

    fn phase_word_size(&self, seeds: &[Sequence], explicit: Option<usize>) -> SccsResult<usize> {
        match explicit.or(self.config.profile.word_size) {
            Some(k) => Ok(k),
            None => WordSizeSelector::new(&self.config.word_size, self.config.profile.alphabet)?
                .select(seeds),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn run_phase(
        &self,
        seeds: &[Sequence],
        entries: &[EntryRef],
        fetched: Vec<SccsResult<Sequence>>,
        delta: u64,
        bounds: CutpointBounds,
        word_size: Option<usize>,
        tail: Tail,
        run: usize,
    ) -> SccsResult<PhaseResult> {
        let word_size = self.phase_word_size(seeds, word_size)?;
        if entries.is_empty() {
            return Ok(PhaseResult::empty(delta, word_size, bounds));
        }

        let builder = ProfileBuilder::new(word_size, self.config.profile.alphabet)?;
        let reference = hybrid_profile(&builder, ProfileInput::RawSequences(seeds))?;
        let measure = self.measure.as_ref();
        let sentinel = measure.sentinel();

        let scored = entries
            .par_iter()
            .zip(fetched.into_par_iter())
            .map(|(entry, fetched)| -> SccsResult<ScoredEntry> {
                let divergence = match fetched {
                    Ok(seq) => match builder.build(&seq) {
                        Ok(profile) => measure.divergence(&profile, &reference)?,
                        Err(SccsError::InvalidWordSize { .. }) | Err(SccsError::EmptyInput(_)) => {
                            debug!("{} cannot be profiled at word size {}", entry, word_size);
                            sentinel
                        }
                        Err(e) => return Err(e),
                    },
                    Err(SccsError::Io(e)) => return Err(SccsError::Io(e)),
                    Err(e) => {
                        warn!("Cannot fetch {}: {}", entry, e);
                        sentinel
                    }
                };
                Ok(ScoredEntry::new(entry.clone(), divergence))
            })
            .collect::<SccsResult<Vec<_>>>()?;

        let classification = classify(scored, bounds, tail)?;

        let mut series = Series::new(format!("divergence_run{}_delta{}", run, delta));
        for (rank, scored) in classification.divergences.iter().enumerate() {
            series.push(rank as f64, scored.divergence, scored.entry.to_string());
        }
        self.renderer.render(&series)?;

        let partition = classification.partition;
        Ok(PhaseResult {
            delta,
            word_size,
            bounds,
            cutoff: classification.cutoff,
            cutpoint: classification.cutpoint,
            divergences: classification.divergences,
            good: partition.good.into_iter().map(|s| s.entry).collect(),
            bad: partition.bad.into_iter().map(|s| s.entry).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sccs_bio::MemorySequenceSource;
    use sccs_core::Strand;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_explicit_context_is_persisted() {
        let dir = TempDir::new().unwrap();
        let seeds = dir.path().join("seeds.fa");
        std::fs::write(&seeds, ">s\nACGT\n").unwrap();

        assert_eq!(resolve_context_size(Some(75), Some(&seeds)).unwrap(), 75);
        assert_eq!(resolve_context_size(None, Some(&seeds)).unwrap(), 75);
        assert_eq!(resolve_context_size(Some(10), None).unwrap(), 10);
    }

    #[test]
    fn test_missing_annotation() {
        let dir = TempDir::new().unwrap();
        let seeds = dir.path().join("seeds.fa");
        std::fs::write(&seeds, ">s\nACGT\n").unwrap();

        assert!(matches!(
            resolve_context_size(None, Some(&seeds)),
            Err(SccsError::MissingAnnotation(_))
        ));
        assert!(matches!(
            resolve_context_size(None, None),
            Err(SccsError::MissingAnnotation(_))
        ));
    }

    #[test]
    fn test_context_bounds_follow_run_presets() {
        let source = MemorySequenceSource::new();
        let engine = CandidateSetEngine::new(Config::default(), &source).unwrap();

        let none = CandidateOptions::default();
        assert_eq!(engine.context_bounds(1, &none), CutpointBounds::new(0.45, 0.85));
        assert_eq!(engine.context_bounds(9, &none), CutpointBounds::new(0.48, 0.935));

        let explicit = CandidateOptions {
            dy: Some(0.3),
            ..CandidateOptions::default()
        };
        assert_eq!(engine.context_bounds(0, &explicit), CutpointBounds::new(0.3, 0.70));
    }

    #[test]
    fn test_empty_inputs_fail() {
        let source = MemorySequenceSource::new();
        let engine = CandidateSetEngine::new(Config::default(), &source).unwrap();
        let seed = Sequence::from_id("s", b"ACGTACGT".to_vec());
        let entry = EntryRef::new("chr1", 0, 4, Strand::Forward);
        let options = CandidateOptions::default();

        assert!(matches!(
            engine.compute_candidate_sets(&[], &[entry], 0, 0, &options),
            Err(SccsError::EmptyInput(_))
        ));
        assert!(matches!(
            engine.compute_candidate_sets(&[seed], &[], 0, 0, &options),
            Err(SccsError::EmptyInput(_))
        ));
    }

    #[test]
    fn test_unfetchable_candidates_score_sentinel() {
        let mut source = MemorySequenceSource::new();
        source.insert("chr1", b"ACGTACGTACGTACGTACGT".to_vec());
        let engine = CandidateSetEngine::new(Config::default(), &source).unwrap();

        let seeds = vec![Sequence::from_id("s", b"ACGTACGTACGT".to_vec())];
        let candidates = vec![
            EntryRef::new("chr1", 0, 12, Strand::Forward),
            EntryRef::new("chr1", 2, 14, Strand::Forward),
            EntryRef::new("chrZ", 0, 12, Strand::Forward),
            EntryRef::new("chr1", 0, 2, Strand::Forward),
        ];
        let options = CandidateOptions {
            word_size: Some(3),
            ..CandidateOptions::default()
        };

        let sets = engine
            .compute_candidate_sets(&seeds, &candidates, 0, 0, &options)
            .unwrap();
        let worst = &sets.hit_only.divergences[2..];
        assert!(worst.iter().all(|s| s.divergence == 1.0));
        assert!(sets.final_bad.contains(&candidates[2]));
        assert!(sets.final_bad.contains(&candidates[3]));
        // delta 0: the context phase is the hit-only phase
        assert_eq!(sets.context, sets.hit_only);
        assert!(sets.files.is_none());
    }
}
