//! Reciprocal k-NN clustering of sequence sets into homogeneous sub-contexts
//!
//! Every candidate neighbor count `k` yields one trial: the reciprocal k-NN
//! graph over pairwise profile divergences is cut into connected components,
//! small components are folded into their neighbors' clusters, and the result
//! is scored with the Davies–Bouldin index. Trials come back best first.

pub mod krnn;
pub mod matrix;
pub mod validity;

pub use krnn::reciprocal_partition;
pub use matrix::DistanceMatrix;
pub use validity::davies_bouldin;

use rayon::prelude::*;
use sccs_bio::{measure_for, Profile, ProfileBuilder, Sequence, WordSizeSelector};
use sccs_core::{Alphabet, Config, DivergenceKind, EntryRef, SccsError, SccsResult, WordSizeConfig};
use std::cmp::Ordering;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct ClusterOptions {
    /// Fixed word size; selected from the input when unset
    pub word_size: Option<usize>,
    pub alphabet: Alphabet,
    pub word_size_selection: WordSizeConfig,
    pub measure: DivergenceKind,
    pub k_min: Option<usize>,
    pub k_max: Option<usize>,
    pub k_span: usize,
    pub min_cluster_size: usize,
    pub show_progress: bool,
}

impl ClusterOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            word_size: config.profile.word_size,
            alphabet: config.profile.alphabet,
            word_size_selection: config.word_size.clone(),
            measure: config.divergence.measure,
            k_min: config.clustering.k_min,
            k_max: config.clustering.k_max,
            k_span: config.clustering.k_span,
            min_cluster_size: config.clustering.min_cluster_size,
            show_progress: config.performance.show_progress,
        }
    }

    /// Neighbor counts tried for `n` points; empty when `n` is too small
    pub fn k_range(&self, n: usize) -> std::ops::RangeInclusive<usize> {
        let k_min = self
            .k_min
            .unwrap_or_else(|| 4usize.max((0.1 * n as f64).ceil() as usize));
        let k_max = self
            .k_max
            .unwrap_or(k_min + self.k_span)
            .min(n.saturating_sub(1));
        k_min..=k_max
    }
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// One partition of the input
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterTrial {
    /// Davies–Bouldin index; lower is better
    pub score: f64,
    /// Neighbor count; 0 for the whole-input fallback
    pub k: usize,
    pub word_size: usize,
    pub clusters: Vec<Vec<EntryRef>>,
    /// Input indices per cluster, parallel to `clusters`
    pub members: Vec<Vec<usize>>,
}

impl ClusterTrial {
    fn from_members(
        entries: &[EntryRef],
        members: Vec<Vec<usize>>,
        score: f64,
        k: usize,
        word_size: usize,
    ) -> Self {
        let clusters = members
            .iter()
            .map(|m| m.iter().map(|&i| entries[i].clone()).collect())
            .collect();
        Self {
            score,
            k,
            word_size,
            clusters,
            members,
        }
    }

    fn whole(entries: &[EntryRef], word_size: usize) -> Self {
        Self::from_members(
            entries,
            vec![(0..entries.len()).collect()],
            f64::INFINITY,
            0,
            word_size,
        )
    }

    /// The single-cluster fallback rather than a real partition
    pub fn is_fallback(&self) -> bool {
        self.k == 0
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }
}

/// Cluster already-profiled entries; `profiles[i]` is `None` where profiling failed
pub fn cluster_profiles(
    entries: &[EntryRef],
    profiles: &[Option<Profile>],
    word_size: usize,
    options: &ClusterOptions,
) -> SccsResult<Vec<ClusterTrial>> {
    if entries.is_empty() {
        return Err(SccsError::EmptyInput("no sequences to cluster".to_string()));
    }
    if entries.len() != profiles.len() {
        return Err(SccsError::InvalidParameter(format!(
            "{} entries but {} profiles",
            entries.len(),
            profiles.len()
        )));
    }
    if options.min_cluster_size == 0 {
        return Err(SccsError::InvalidParameter(
            "min_cluster_size must be positive".to_string(),
        ));
    }

    let n = entries.len();
    if profiles.iter().all(Option::is_none) {
        warn!(
            "None of the {} sequences could be profiled at word size {}, keeping one cluster",
            n, word_size
        );
        return Ok(vec![ClusterTrial::whole(entries, word_size)]);
    }

    let measure = measure_for(options.measure);
    let matrix = DistanceMatrix::build(profiles, measure.as_ref(), options.show_progress);

    let range = options.k_range(n);
    debug!("Trying neighbor counts {:?} over {} sequences", range, n);

    let mut trials: Vec<ClusterTrial> = range
        .into_par_iter()
        .map(|k| -> SccsResult<Option<ClusterTrial>> {
            let Some(members) = reciprocal_partition(&matrix, k, options.min_cluster_size) else {
                debug!("k = {}: no component of {} or more", k, options.min_cluster_size);
                return Ok(None);
            };
            let score = davies_bouldin(&members, profiles, measure.as_ref())?;
            debug!("k = {}: {} clusters, Davies-Bouldin {:.4}", k, members.len(), score);
            Ok(Some(ClusterTrial::from_members(entries, members, score, k, word_size)))
        })
        .collect::<SccsResult<Vec<Option<ClusterTrial>>>>()?
        .into_iter()
        .flatten()
        .collect();

    if trials.is_empty() {
        warn!(
            "No neighbor count produced a usable partition of {} sequences, keeping one cluster",
            n
        );
        return Ok(vec![ClusterTrial::whole(entries, word_size)]);
    }

    trials.sort_by(|a, b| {
        a.score
            .partial_cmp(&b.score)
            .unwrap_or(Ordering::Equal)
            .then(a.k.cmp(&b.k))
    });

    let best = &trials[0];
    info!(
        "Best partition: {} clusters at k = {} (Davies-Bouldin {:.4})",
        best.len(),
        best.k,
        best.score
    );
    Ok(trials)
}

/// Cluster a sequence set, profiling it at the configured or selected word size
pub fn krnn_cluster(
    sequences: &[Sequence],
    options: &ClusterOptions,
) -> SccsResult<Vec<ClusterTrial>> {
    if sequences.is_empty() {
        return Err(SccsError::EmptyInput("no sequences to cluster".to_string()));
    }

    let word_size = match options.word_size {
        Some(k) => k,
        None => WordSizeSelector::new(&options.word_size_selection, options.alphabet)?
            .select(sequences)?,
    };
    let builder = ProfileBuilder::new(word_size, options.alphabet)?;

    let profiles: Vec<Option<Profile>> = builder
        .build_each(sequences)
        .into_iter()
        .zip(sequences)
        .map(|(result, seq)| match result {
            Ok(profile) => Ok(Some(profile)),
            Err(SccsError::InvalidWordSize { .. }) | Err(SccsError::EmptyInput(_)) => {
                debug!("{} cannot be profiled at word size {}", seq.entry, word_size);
                Ok(None)
            }
            Err(e) => Err(e),
        })
        .collect::<SccsResult<_>>()?;

    let entries: Vec<EntryRef> = sequences.iter().map(|s| s.entry.clone()).collect();
    cluster_profiles(&entries, &profiles, word_size, options)
}
