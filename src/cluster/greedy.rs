/// Greedy-edge tour construction
///
/// Sorts all n(n-1)/2 undirected edges by length and accepts the shortest
/// edge that neither raises an endpoint's degree above 2 nor closes a
/// cycle, stopping at n-1 accepted edges so the path stays open. When a
/// live progress collaborator is attached, the edges are drawn in
/// ascending order through the incremental partial sorter so an early
/// cancellation never pays for a full sort.
use tracing::debug;

use crate::cluster::DistanceMatrix;
use crate::progress::{ClusterStage, Progress};
use crate::sort::IncrementalSorter;
use crate::{HaplosortError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct GreedyEdge {
    i: u32,
    k: u32,
    d: i64,
}

/// Runs the greedy-edge construction. On cancellation a partial (possibly
/// empty) ordering is returned; the orchestrator discards it. A violated
/// post-condition is an internal defect and surfaces as
/// `HaplosortError::Invariant`.
pub fn greedy_solve(distances: &DistanceMatrix, progress: &mut dyn Progress) -> Result<Vec<usize>> {
    let n = distances.len();
    if n <= 1 {
        return Ok((0..n).collect());
    }

    // enumerate every undirected edge; one factor is even so /2 is exact
    let edge_count = n * (n - 1) / 2;
    let mut edges = Vec::new();
    edges.try_reserve_exact(edge_count)?;
    for i in 0..(n - 1) {
        for k in (i + 1)..n {
            edges.push(GreedyEdge {
                i: i as u32,
                k: k as u32,
                d: distances.get(i, k),
            });
        }
    }

    if progress.is_cancelled() {
        return Ok(Vec::new());
    }

    if progress.is_live() {
        // incremental sort: a row's worth of edges per progress tick, so a
        // cancellation mid-sort abandons the remaining work
        let mut sorter = IncrementalSorter::with_comparator(&mut edges, |a, b| a.d.cmp(&b.d));

        for i in 0..(n - 1) {
            for _ in (i + 1)..n {
                sorter.next();
            }

            if progress.is_cancelled() {
                return Ok(Vec::new());
            }
            progress.report(i, ClusterStage::Construction);
        }
    } else {
        edges.sort_unstable_by(|a, b| a.d.cmp(&b.d));
    }

    if progress.is_cancelled() {
        return Ok(Vec::new());
    }

    // Accept edges shortest-first. Degree caps are tracked per node; cycle
    // prevention uses group tags with relabel-on-merge, since an edge
    // joining two nodes of the same group would close a cycle.
    let mut accepted: Vec<GreedyEdge> = Vec::with_capacity(n - 1);
    let mut degrees = vec![0u8; n];
    let mut groups = vec![0u32; n];
    let mut next_group = 1u32;

    for edge in &edges {
        let i = edge.i as usize;
        if degrees[i] == 2 {
            continue;
        }
        let k = edge.k as usize;
        if degrees[k] == 2 {
            continue;
        }

        let group_i = groups[i];
        let group_k = groups[k];
        if group_i != 0 && group_i == group_k {
            continue;
        }

        accepted.push(*edge);
        degrees[i] += 1;
        degrees[k] += 1;

        if group_i == 0 && group_k == 0 {
            groups[i] = next_group;
            groups[k] = next_group;
            next_group += 1;
        } else if group_i == 0 {
            groups[i] = group_k;
        } else if group_k == 0 {
            groups[k] = group_i;
        } else {
            // joining two groups; one gets relabeled into the other
            for tag in groups.iter_mut() {
                if *tag == group_k {
                    *tag = group_i;
                }
            }
        }

        if accepted.len() == n - 1 {
            // deliberately no return edge
            break;
        }

        if progress.is_cancelled() {
            return Ok(Vec::new());
        }
    }

    check_post_conditions(&degrees, &groups)?;
    debug!(edges = accepted.len(), "greedy edge set accepted");

    if progress.is_cancelled() {
        return Ok(Vec::new());
    }

    linearize(accepted, &degrees, n, progress)
}

/// An open path leaves exactly two degree-1 ends, all other nodes at
/// degree 2, and a single connected group.
fn check_post_conditions(degrees: &[u8], groups: &[u32]) -> Result<()> {
    let mut degree1_count = 0usize;
    let universal_group = groups[0];

    for (node, (&degree, &group)) in degrees.iter().zip(groups).enumerate() {
        match degree {
            1 => degree1_count += 1,
            2 => {}
            other => {
                return Err(HaplosortError::Invariant(format!(
                    "greedy construction left node {node} with degree {other}"
                )))
            }
        }

        if group != universal_group {
            return Err(HaplosortError::Invariant(format!(
                "greedy construction left node {node} outside the main group"
            )));
        }
    }

    if degree1_count != 2 {
        return Err(HaplosortError::Invariant(format!(
            "greedy construction produced {degree1_count} path ends instead of 2"
        )));
    }

    Ok(())
}

/// Walks the accepted edge jumble from one degree-1 end to the other,
/// producing the ordering. Consumed edges are swap-removed.
fn linearize(
    mut edges: Vec<GreedyEdge>,
    degrees: &[u8],
    n: usize,
    progress: &mut dyn Progress,
) -> Result<Vec<usize>> {
    let mut path = Vec::with_capacity(n);
    let mut remaining = edges.len();

    let mut last = degrees
        .iter()
        .position(|&d| d == 1)
        .ok_or_else(|| HaplosortError::Invariant("no path end found".into()))?;
    path.push(last);

    while remaining > 0 {
        let mut found = None;
        for index in 0..remaining {
            let edge = edges[index];
            if edge.i as usize == last {
                found = Some((index, edge.k as usize));
                break;
            }
            if edge.k as usize == last {
                found = Some((index, edge.i as usize));
                break;
            }
        }

        if progress.is_cancelled() {
            break;
        }

        let (index, next) = found.ok_or_else(|| {
            HaplosortError::Invariant(format!("no unused edge continues from node {last}"))
        })?;

        path.push(next);
        last = next;
        remaining -= 1;
        edges[index] = edges[remaining];
    }

    Ok(path)
}
