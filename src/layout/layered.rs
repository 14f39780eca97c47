//! Layered (Sugiyama-style) node placement:
//!   1. Rank assignment (longest path from sources)
//!   2. Ordering within ranks (iterated barycenter crossing reduction)
//!   3. Coordinate assignment (real box sizes, ranks centered)
//!
//! All output is deterministic: ties break on node index, so a fixed
//! node list (same ids, order, sizes), edge list, and direction always
//! produce the same coordinates.

use crate::graph::Point;
use crate::layout::{Direction, LayoutGraph, LayoutSpacing, Placement};

/// Barycenter sweep rounds before giving up on further improvement.
const MAX_SWEEPS: usize = 4;

/// The default placement strategy.
pub struct LayeredPlacement;

impl Placement for LayeredPlacement {
    fn name(&self) -> &str {
        "layered"
    }

    fn place(
        &self,
        graph: &LayoutGraph,
        spacing: &LayoutSpacing,
        direction: Direction,
    ) -> Vec<Point> {
        if graph.n == 0 {
            return Vec::new();
        }
        let ranks = assign_ranks(graph);
        let mut order = rank_buckets(&ranks);
        minimize_crossings(&mut order, graph);
        assign_centers(&order, graph, spacing, direction)
    }
}

/// Longest-path layering via Kahn's algorithm, processed in node-index
/// order. Sources get rank 0; every other node gets 1 + the max rank of
/// its predecessors, so all surviving edges point to higher ranks.
/// Nodes caught in a cycle are parked one rank past the processed ones.
fn assign_ranks(graph: &LayoutGraph) -> Vec<usize> {
    let n = graph.n;
    let mut in_degree: Vec<usize> = graph.rev.iter().map(Vec::len).collect();
    let mut ranks = vec![0usize; n];

    let mut queue: Vec<usize> = (0..n).filter(|&v| in_degree[v] == 0).collect();
    let mut queued = vec![false; n];
    for &v in &queue {
        queued[v] = true;
    }

    let mut head = 0;
    while head < queue.len() {
        let u = queue[head];
        head += 1;
        for &v in &graph.adj[u] {
            ranks[v] = ranks[v].max(ranks[u] + 1);
            in_degree[v] -= 1;
            if in_degree[v] == 0 {
                queued[v] = true;
                queue.push(v);
            }
        }
    }

    if queue.len() < n {
        let max_rank = queue.iter().map(|&v| ranks[v]).max().unwrap_or(0);
        for v in 0..n {
            if !queued[v] {
                ranks[v] = max_rank + 1;
            }
        }
    }

    ranks
}

/// Bucket nodes by rank; within a rank the initial order is node-index
/// (input) order.
fn rank_buckets(ranks: &[usize]) -> Vec<Vec<usize>> {
    let max_rank = ranks.iter().copied().max().unwrap_or(0);
    let mut buckets = vec![Vec::new(); max_rank + 1];
    for (v, &r) in ranks.iter().enumerate() {
        buckets[r].push(v);
    }
    buckets
}

/// Mean position of `neighbors` within `adjacent`, or MAX when the node
/// has no neighbors there (pushes it after the connected nodes; stable
/// sorting keeps the relative order of such nodes unchanged).
fn barycenter(adjacent: &[usize], neighbors: &[usize]) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for &nb in neighbors {
        if let Some(pos) = adjacent.iter().position(|&x| x == nb) {
            sum += pos as f64;
            count += 1;
        }
    }
    if count == 0 {
        f64::MAX
    } else {
        sum / count as f64
    }
}

/// Reorder rank `r` by barycenters relative to the previous rank.
fn sweep_down(order: &mut [Vec<usize>], graph: &LayoutGraph, r: usize) {
    let prev = order[r - 1].clone();
    let mut scored: Vec<(usize, f64)> = order[r]
        .iter()
        .map(|&v| (v, barycenter(&prev, &graph.rev[v])))
        .collect();
    scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    order[r] = scored.into_iter().map(|(v, _)| v).collect();
}

/// Reorder rank `r` by barycenters relative to the next rank.
fn sweep_up(order: &mut [Vec<usize>], graph: &LayoutGraph, r: usize) {
    let next = order[r + 1].clone();
    let mut scored: Vec<(usize, f64)> = order[r]
        .iter()
        .map(|&v| (v, barycenter(&next, &graph.adj[v])))
        .collect();
    scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    order[r] = scored.into_iter().map(|(v, _)| v).collect();
}

/// Count crossings between two adjacent ranks by brute-force inversion
/// counting, which is fine at dashboard graph sizes.
fn count_crossings(rank_a: &[usize], rank_b: &[usize], graph: &LayoutGraph) -> usize {
    let mut pos_b = vec![usize::MAX; graph.n];
    for (i, &v) in rank_b.iter().enumerate() {
        pos_b[v] = i;
    }

    let mut spans: Vec<(usize, usize)> = Vec::new();
    for (i, &u) in rank_a.iter().enumerate() {
        for &v in &graph.adj[u] {
            if pos_b[v] != usize::MAX {
                spans.push((i, pos_b[v]));
            }
        }
    }

    let mut crossings = 0;
    for i in 0..spans.len() {
        for j in (i + 1)..spans.len() {
            let (a1, b1) = spans[i];
            let (a2, b2) = spans[j];
            if (a1 < a2 && b1 > b2) || (a1 > a2 && b1 < b2) {
                crossings += 1;
            }
        }
    }
    crossings
}

fn total_crossings(order: &[Vec<usize>], graph: &LayoutGraph) -> usize {
    (0..order.len().saturating_sub(1))
        .map(|r| count_crossings(&order[r], &order[r + 1], graph))
        .sum()
}

/// Iterated barycenter heuristic: alternate down/up sweeps, keep the
/// best ordering seen, stop on the first round without improvement.
fn minimize_crossings(order: &mut Vec<Vec<usize>>, graph: &LayoutGraph) {
    if order.len() <= 1 {
        return;
    }

    let mut best = order.clone();
    let mut best_crossings = total_crossings(order, graph);

    for _ in 0..MAX_SWEEPS {
        for r in 1..order.len() {
            sweep_down(order, graph, r);
        }
        for r in (0..order.len() - 1).rev() {
            sweep_up(order, graph, r);
        }

        let crossings = total_crossings(order, graph);
        if crossings < best_crossings {
            best_crossings = crossings;
            best = order.clone();
        } else {
            *order = best;
            return;
        }
    }

    *order = best;
}

/// Turn ranks and in-rank order into center coordinates.
///
/// The rank axis (LR: x, TB: y) advances by each rank's widest node plus
/// the rank separation; every node in a rank is centered within that
/// band. The cross axis stacks nodes in order, separated by `node_sep`,
/// and each rank is centered against the widest rank.
fn assign_centers(
    order: &[Vec<usize>],
    graph: &LayoutGraph,
    spacing: &LayoutSpacing,
    direction: Direction,
) -> Vec<Point> {
    let main = |v: usize| match direction {
        Direction::LR => graph.sizes[v].width,
        Direction::TB => graph.sizes[v].height,
    };
    let cross = |v: usize| match direction {
        Direction::LR => graph.sizes[v].height,
        Direction::TB => graph.sizes[v].width,
    };

    let rank_extents: Vec<f64> = order
        .iter()
        .map(|bucket| bucket.iter().map(|&v| main(v)).fold(0.0, f64::max))
        .collect();

    let rank_spans: Vec<f64> = order
        .iter()
        .map(|bucket| {
            if bucket.is_empty() {
                0.0
            } else {
                bucket.iter().map(|&v| cross(v)).sum::<f64>()
                    + (bucket.len() - 1) as f64 * spacing.node_sep
            }
        })
        .collect();
    let max_span = rank_spans.iter().copied().fold(0.0, f64::max);

    let mut centers = vec![Point::default(); graph.n];
    let mut rank_cursor = spacing.margin;

    for (r, bucket) in order.iter().enumerate() {
        let rank_center = rank_cursor + rank_extents[r] / 2.0;
        let mut cross_cursor = spacing.margin + (max_span - rank_spans[r]) / 2.0;

        for &v in bucket {
            let cross_center = cross_cursor + cross(v) / 2.0;
            centers[v] = match direction {
                Direction::LR => Point {
                    x: rank_center,
                    y: cross_center,
                },
                Direction::TB => Point {
                    x: cross_center,
                    y: rank_center,
                },
            };
            cross_cursor += cross(v) + spacing.node_sep;
        }

        rank_cursor += rank_extents[r] + spacing.rank_sep;
    }

    centers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeSize;

    /// Hand-build a LayoutGraph with uniform 180×64 boxes.
    fn graph(n: usize, edges: &[(usize, usize)]) -> LayoutGraph {
        let mut adj = vec![Vec::new(); n];
        let mut rev = vec![Vec::new(); n];
        for &(u, v) in edges {
            adj[u].push(v);
            rev[v].push(u);
        }
        LayoutGraph {
            n,
            adj,
            rev,
            sizes: vec![NodeSize::default(); n],
        }
    }

    #[test]
    fn ranks_follow_the_longest_path() {
        // 0 → 1 → 3 and 0 → 2 → 3: node 3 ends up below BOTH paths.
        let g = graph(4, &[(0, 1), (0, 2), (1, 3), (2, 3)]);
        let ranks = assign_ranks(&g);
        assert_eq!(ranks, vec![0, 1, 1, 2]);
    }

    #[test]
    fn shortcut_edges_do_not_pull_nodes_up() {
        // 0 → 2 directly, but also 0 → 1 → 2: rank(2) = 2, not 1.
        let g = graph(3, &[(0, 1), (1, 2), (0, 2)]);
        let ranks = assign_ranks(&g);
        assert_eq!(ranks, vec![0, 1, 2]);
    }

    #[test]
    fn isolated_nodes_sit_in_rank_zero() {
        let g = graph(3, &[(0, 1)]);
        let ranks = assign_ranks(&g);
        assert_eq!(ranks[2], 0);
    }

    #[test]
    fn cycles_terminate_and_get_parked() {
        let g = graph(3, &[(0, 1), (1, 2), (2, 1)]);
        let ranks = assign_ranks(&g);
        assert_eq!(ranks[0], 0);
        // The 1 ⇄ 2 cycle is parked past the processed ranks.
        assert_eq!(ranks[1], 1);
        assert_eq!(ranks[2], 1);
    }

    #[test]
    fn barycenter_ordering_untangles_a_cross() {
        // Rank 0: [0, 1]; rank 1 starts as [2, 3] but 0→3 and 1→2 cross.
        let g = graph(4, &[(0, 3), (1, 2)]);
        let ranks = assign_ranks(&g);
        let mut order = rank_buckets(&ranks);
        assert_eq!(total_crossings(&order, &g), 1);
        minimize_crossings(&mut order, &g);
        assert_eq!(total_crossings(&order, &g), 0);
        assert_eq!(order[1], vec![3, 2]);
    }

    #[test]
    fn placement_is_pure() {
        let g = graph(5, &[(0, 1), (0, 2), (1, 3), (2, 3), (2, 4)]);
        let spacing = LayoutSpacing::default();
        let a = LayeredPlacement.place(&g, &spacing, Direction::LR);
        let b = LayeredPlacement.place(&g, &spacing, Direction::LR);
        assert_eq!(a, b);
    }

    #[test]
    fn empty_graph_places_nothing() {
        let g = graph(0, &[]);
        let centers = LayeredPlacement.place(&g, &LayoutSpacing::default(), Direction::TB);
        assert!(centers.is_empty());
    }

    #[test]
    fn centers_start_inside_the_margin() {
        let g = graph(2, &[(0, 1)]);
        let spacing = LayoutSpacing::default();
        let centers = LayeredPlacement.place(&g, &spacing, Direction::TB);
        // 180×64 boxes, TB: first center sits at margin + half box.
        assert_eq!(centers[0].x, 20.0 + 90.0);
        assert_eq!(centers[0].y, 20.0 + 32.0);
        assert_eq!(centers[1].y, 20.0 + 64.0 + 80.0 + 32.0);
    }
}
