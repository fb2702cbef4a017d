//! Davies–Bouldin cluster validity over profile centroids

use sccs_bio::{DivergenceMeasure, HybridAccumulator, Profile};
use sccs_core::{SccsError, SccsResult};

/// Hybrid centroid of the profiled members; `None` when no member has a profile
fn centroid(members: &[usize], profiles: &[Option<Profile>]) -> SccsResult<Option<Profile>> {
    let mut acc = HybridAccumulator::new();
    for profile in members.iter().filter_map(|&i| profiles[i].as_ref()) {
        acc.add(profile)?;
    }
    match acc.finish() {
        Ok(profile) => Ok(Some(profile)),
        Err(SccsError::EmptyInput(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Mean divergence of members to their centroid; unprofiled members score the sentinel
fn scatter(
    members: &[usize],
    profiles: &[Option<Profile>],
    center: &Profile,
    measure: &dyn DivergenceMeasure,
) -> SccsResult<f64> {
    let mut total = 0.0;
    for &i in members {
        total += match &profiles[i] {
            Some(p) => measure.divergence(p, center)?,
            None => measure.sentinel(),
        };
    }
    Ok(total / members.len() as f64)
}

/// Mean over clusters of the worst `(S_i + S_j) / d(c_i, c_j)`; lower is better.
///
/// Fewer than two clusters, a cluster without any profile, or coincident
/// centroids score `+inf`.
pub fn davies_bouldin(
    clusters: &[Vec<usize>],
    profiles: &[Option<Profile>],
    measure: &dyn DivergenceMeasure,
) -> SccsResult<f64> {
    if clusters.len() < 2 {
        return Ok(f64::INFINITY);
    }

    let mut centers = Vec::with_capacity(clusters.len());
    for members in clusters {
        match centroid(members, profiles)? {
            Some(center) => centers.push(center),
            None => return Ok(f64::INFINITY),
        }
    }

    let scatters = clusters
        .iter()
        .zip(&centers)
        .map(|(members, center)| scatter(members, profiles, center, measure))
        .collect::<SccsResult<Vec<f64>>>()?;

    let mut total = 0.0;
    for i in 0..clusters.len() {
        let mut worst = 0.0f64;
        for j in 0..clusters.len() {
            if i == j {
                continue;
            }
            let separation = measure.divergence(&centers[i], &centers[j])?;
            if separation <= 0.0 {
                return Ok(f64::INFINITY);
            }
            worst = worst.max((scatters[i] + scatters[j]) / separation);
        }
        total += worst;
    }
    Ok(total / clusters.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sccs_bio::{JensenShannon, ProfileBuilder};
    use sccs_core::Alphabet;

    fn profiles(members: &[&[u8]]) -> Vec<Option<Profile>> {
        let builder = ProfileBuilder::new(1, Alphabet::Nucleotide).unwrap();
        members
            .iter()
            .map(|s| builder.build_symbols(s).ok())
            .collect()
    }

    #[test]
    fn test_single_cluster_is_infinite() {
        let p = profiles(&[b"AAAA", b"CCCC"]);
        assert_eq!(davies_bouldin(&[vec![0, 1]], &p, &JensenShannon).unwrap(), f64::INFINITY);
    }

    #[test]
    fn test_tight_clusters_beat_mixed() {
        let p = profiles(&[b"AAAAAAAC", b"AAAAAAAA", b"CCCCCCCA", b"CCCCCCCC"]);
        let separated = davies_bouldin(&[vec![0, 1], vec![2, 3]], &p, &JensenShannon).unwrap();
        let mixed = davies_bouldin(&[vec![0, 2], vec![1, 3]], &p, &JensenShannon).unwrap();
        assert!(separated.is_finite());
        assert!(separated < mixed);
    }

    #[test]
    fn test_unprofiled_cluster() {
        let p = profiles(&[b"AAAA", b"AAAC", b"NNNN"]);
        assert_eq!(
            davies_bouldin(&[vec![0, 1], vec![2]], &p, &JensenShannon).unwrap(),
            f64::INFINITY
        );
    }
}
