//! Reciprocal k-nearest-neighbor graph partitioning

use super::matrix::DistanceMatrix;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{NodeIndex, UnGraph};

/// Edge (i, j) iff each point is among the other's `k` nearest neighbors
pub fn reciprocal_graph(matrix: &DistanceMatrix, neighbors: &[Vec<usize>]) -> UnGraph<usize, f64> {
    let n = matrix.len();
    let mut graph = UnGraph::<usize, f64>::with_capacity(n, n);
    let nodes: Vec<NodeIndex> = (0..n).map(|i| graph.add_node(i)).collect();

    for (i, near) in neighbors.iter().enumerate() {
        for &j in near {
            if i < j && neighbors[j].contains(&i) {
                graph.add_edge(nodes[i], nodes[j], matrix.get(i, j));
            }
        }
    }
    graph
}

/// Cluster with the largest vote among `near` (nearest first); ties go to the
/// cluster seen first
fn majority_label(near: &[usize], labels: &[Option<usize>]) -> Option<usize> {
    let mut votes: Vec<(usize, usize)> = Vec::new();
    for label in near.iter().filter_map(|&j| labels[j]) {
        match votes.iter_mut().find(|(l, _)| *l == label) {
            Some((_, count)) => *count += 1,
            None => votes.push((label, 1)),
        }
    }

    let mut best: Option<(usize, usize)> = None;
    for (label, count) in votes {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((label, count));
        }
    }
    best.map(|(label, _)| label)
}

/// Give every unlabeled point a cluster: first by neighbor majority,
/// repeated while that makes progress, then by nearest labeled point
fn reassign_outliers(
    matrix: &DistanceMatrix,
    neighbors: &[Vec<usize>],
    labels: &mut [Option<usize>],
) {
    let n = labels.len();
    loop {
        let pending: Vec<usize> = (0..n).filter(|&i| labels[i].is_none()).collect();
        if pending.is_empty() {
            return;
        }

        let mut progressed = false;
        for &i in &pending {
            if let Some(label) = majority_label(&neighbors[i], labels) {
                labels[i] = Some(label);
                progressed = true;
            }
        }

        if !progressed {
            let snapshot = labels.to_vec();
            for i in pending {
                labels[i] = (0..n)
                    .filter(|&j| snapshot[j].is_some())
                    .min_by(|&a, &b| matrix.get(i, a).total_cmp(&matrix.get(i, b)).then(a.cmp(&b)))
                    .and_then(|j| snapshot[j]);
            }
            return;
        }
    }
}

/// Partition all points from the reciprocal `k`-NN graph.
///
/// Connected components with at least `min_cluster_size` members seed the
/// clusters; every other point is reassigned. Returns `None` when no
/// component is large enough. Members are ascending, clusters ordered by
/// their first member.
pub fn reciprocal_partition(
    matrix: &DistanceMatrix,
    k: usize,
    min_cluster_size: usize,
) -> Option<Vec<Vec<usize>>> {
    let n = matrix.len();
    if n == 0 || k == 0 {
        return None;
    }

    let neighbors: Vec<Vec<usize>> = (0..n).map(|i| matrix.nearest(i, k)).collect();
    let graph = reciprocal_graph(matrix, &neighbors);

    // On an undirected graph the strongly connected components are the connected ones
    let mut seeds: Vec<Vec<usize>> = tarjan_scc(&graph)
        .into_iter()
        .map(|component| {
            let mut members: Vec<usize> = component.into_iter().map(|ix| graph[ix]).collect();
            members.sort_unstable();
            members
        })
        .filter(|members| members.len() >= min_cluster_size)
        .collect();
    if seeds.is_empty() {
        return None;
    }
    seeds.sort_by_key(|members| members[0]);

    let mut labels: Vec<Option<usize>> = vec![None; n];
    for (label, members) in seeds.iter().enumerate() {
        for &i in members {
            labels[i] = Some(label);
        }
    }
    reassign_outliers(matrix, &neighbors, &mut labels);

    let mut clusters = vec![Vec::new(); seeds.len()];
    for (i, label) in labels.into_iter().enumerate() {
        if let Some(label) = label {
            clusters[label].push(i);
        }
    }
    Some(clusters)
}
