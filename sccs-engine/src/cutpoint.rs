//! CDF-driven cutpoint selection over divergence-sorted entries

use sccs_core::{CutpointBounds, EntryRef, SccsError, SccsResult, Tail};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// An entry and its divergence from the reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredEntry {
    pub entry: EntryRef,
    pub divergence: f64,
}

impl ScoredEntry {
    pub fn new(entry: EntryRef, divergence: f64) -> Self {
        Self { entry, divergence }
    }
}

/// Stable ascending sort by divergence
pub fn sort_by_divergence(pairs: &mut [ScoredEntry]) {
    pairs.sort_by(|a, b| {
        a.divergence
            .partial_cmp(&b.divergence)
            .unwrap_or(Ordering::Equal)
    });
}

fn check_values(values: &[f64]) -> SccsResult<()> {
    if values.is_empty() {
        return Err(SccsError::EmptyInput(
            "no divergence values to place a cutpoint in".to_string(),
        ));
    }
    if let Some(bad) = values.iter().find(|v| v.is_nan() || **v < 0.0) {
        return Err(SccsError::InvalidParameter(format!(
            "divergence values must be non-negative numbers, got {}",
            bad
        )));
    }
    Ok(())
}

/// Divergence threshold for `values` (any order).
///
/// The threshold is the largest observed value not above `mre` whose
/// empirical CDF stays at or below `0.5 + dy`. When no value qualifies the
/// smallest observed value is used if it is within `mre`, else zero. The
/// result is nudged up by 0.001 and rounded to three decimals.
pub fn cutoff_value(values: &[f64], bounds: CutpointBounds) -> SccsResult<f64> {
    bounds.validate()?;
    check_values(values)?;

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let n = sorted.len() as f64;
    let target = 0.5 + bounds.dy;
    let mut cutoff = None;
    let mut i = 0;
    while i < sorted.len() {
        let value = sorted[i];
        // F(value) counts every tie
        let mut j = i;
        while j < sorted.len() && sorted[j] == value {
            j += 1;
        }
        if value > bounds.mre || j as f64 / n > target {
            break;
        }
        cutoff = Some(value);
        i = j;
    }

    let cutoff = cutoff.unwrap_or_else(|| {
        if sorted[0] <= bounds.mre {
            sorted[0]
        } else {
            0.0
        }
    });
    Ok(((cutoff + 0.001) * 1000.0).round() / 1000.0)
}

/// Number of entries at or below the cutoff; lies in `[0, N]`
pub fn select_cutpoint(pairs: &[ScoredEntry], dy: f64, mre: f64) -> SccsResult<usize> {
    let values: Vec<f64> = pairs.iter().map(|p| p.divergence).collect();
    let cutoff = cutoff_value(&values, CutpointBounds::new(dy, mre))?;
    Ok(values.iter().filter(|&&v| v <= cutoff).count())
}

/// Good and bad entries after a cut
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    pub good: Vec<ScoredEntry>,
    pub bad: Vec<ScoredEntry>,
}

/// Split a divergence-sorted list at `cutpoint` according to `tail`
pub fn partition(sorted: Vec<ScoredEntry>, cutpoint: usize, tail: Tail) -> Partition {
    let n = sorted.len();
    let cut = cutpoint.min(n);
    let mut sorted = sorted;

    match tail {
        Tail::Low => {
            let bad = sorted.split_off(cut);
            Partition { good: sorted, bad }
        }
        Tail::High => {
            let good = sorted.split_off(cut);
            Partition { good, bad: sorted }
        }
        Tail::TwoTailed => {
            let rejected = n - cut;
            let low = rejected / 2;
            let high = rejected - low;

            let upper = sorted.split_off(n - high);
            let good = sorted.split_off(low);
            let mut bad = sorted;
            bad.extend(upper);
            Partition { good, bad }
        }
    }
}

/// Cutpoint, cutoff and partition for one set of scored entries
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub cutoff: f64,
    pub cutpoint: usize,
    /// Every entry, ascending by divergence
    pub divergences: Vec<ScoredEntry>,
    pub partition: Partition,
}

pub fn classify(
    mut pairs: Vec<ScoredEntry>,
    bounds: CutpointBounds,
    tail: Tail,
) -> SccsResult<Classification> {
    sort_by_divergence(&mut pairs);
    let values: Vec<f64> = pairs.iter().map(|p| p.divergence).collect();
    let cutoff = cutoff_value(&values, bounds)?;
    let cutpoint = values.iter().filter(|&&v| v <= cutoff).count();

    tracing::debug!(
        "Cutoff {:.3} (Dy {}, Mre {}) keeps {} of {} below it",
        cutoff,
        bounds.dy,
        bounds.mre,
        cutpoint,
        pairs.len()
    );

    Ok(Classification {
        cutoff,
        cutpoint,
        partition: partition(pairs.clone(), cutpoint, tail),
        divergences: pairs,
    })
}
