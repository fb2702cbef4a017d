use crate::progress::create_progress_bar;
use rayon::prelude::*;
use sccs_bio::{DivergenceMeasure, Profile};

/// Dense pairwise divergence matrix, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    values: Vec<f64>,
}

impl DistanceMatrix {
    /// Rows are computed in parallel. A missing profile is at the measure's
    /// sentinel distance from everything but itself.
    pub fn build(
        profiles: &[Option<Profile>],
        measure: &dyn DivergenceMeasure,
        show_progress: bool,
    ) -> Self {
        let n = profiles.len();
        let pb = create_progress_bar(n as u64, "Pairwise divergences", show_progress);

        let rows: Vec<Vec<f64>> = (0..n)
            .into_par_iter()
            .map(|i| {
                let row = (0..n)
                    .map(|j| {
                        if i == j {
                            return 0.0;
                        }
                        match (&profiles[i], &profiles[j]) {
                            (Some(a), Some(b)) => measure
                                .divergence(a, b)
                                .unwrap_or_else(|_| measure.sentinel()),
                            _ => measure.sentinel(),
                        }
                    })
                    .collect();
                pb.inc(1);
                row
            })
            .collect();
        pb.finish_and_clear();

        Self {
            n,
            values: rows.into_iter().flatten().collect(),
        }
    }

    pub fn from_rows(rows: Vec<Vec<f64>>) -> Self {
        let n = rows.len();
        Self {
            n,
            values: rows.into_iter().flatten().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.n + j]
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.n..(i + 1) * self.n]
    }

    /// The `k` nearest other points of `i`, nearest first; ties go to the lower index
    pub fn nearest(&self, i: usize, k: usize) -> Vec<usize> {
        let row = self.row(i);
        let mut others: Vec<usize> = (0..self.n).filter(|&j| j != i).collect();
        others.sort_by(|&a, &b| row[a].total_cmp(&row[b]).then(a.cmp(&b)));
        others.truncate(k);
        others
    }
}
