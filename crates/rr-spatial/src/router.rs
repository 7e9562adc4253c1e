//! Routing trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! The route generator calls routing via the [`Router`] trait, so callers can
//! swap in A* or a precomputed table without touching generation.  The
//! default [`DijkstraRouter`] is a plain binary-heap Dijkstra over the CSR
//! graph.
//!
//! # Cost units
//!
//! Costs are `f64` in whatever unit the chosen [`WeightKey`] carries (metres
//! for `Length`).  Every [`Path`] also reports its physical length in metres,
//! summed over the exact edges it traverses.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use rr_core::{EdgeId, NodeId};

use crate::network::WalkGraph;
use crate::{SpatialError, SpatialResult};

// ── WeightKey ─────────────────────────────────────────────────────────────────

/// Which edge attribute a path minimises.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum WeightKey {
    /// Physical length in metres.
    #[default]
    Length,
    /// The edge's mutable weight (defaults to the length).
    Weight,
}

impl WeightKey {
    #[inline]
    fn cost(self, graph: &WalkGraph, edge: EdgeId) -> f64 {
        match self {
            WeightKey::Length => graph.edge_length_m[edge.index()],
            WeightKey::Weight => graph.edge_weight[edge.index()],
        }
    }
}

// ── Path ──────────────────────────────────────────────────────────────────────

/// The result of a routing query.
///
/// `edges[i]` joins `nodes[i]` to `nodes[i + 1]`; recording the edge pins
/// which parallel edge was taken, so `length_m` is exact.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    /// Nodes in travel order, source and destination included.
    pub nodes: Vec<NodeId>,
    /// Edges in travel order.  Always `nodes.len() - 1` long for a
    /// non-empty path.
    pub edges: Vec<EdgeId>,
    /// Total cost under the weight the path was computed with.
    pub cost: f64,
    /// Total length in metres.
    pub length_m: f64,
}

impl Path {
    /// A zero-length path that stays on `node`.
    pub fn at(node: NodeId) -> Self {
        Path { nodes: vec![node], edges: vec![], cost: 0.0, length_m: 0.0 }
    }

    pub fn source(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    pub fn target(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }

    /// Append a path that starts where `self` ends, dropping the duplicated
    /// junction node.
    fn append(&mut self, next: Path) {
        if self.nodes.is_empty() {
            *self = next;
            return;
        }
        debug_assert_eq!(self.target(), next.source());
        self.nodes.extend(next.nodes.into_iter().skip(1));
        self.edges.extend(next.edges);
        self.cost += next.cost;
        self.length_m += next.length_m;
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable shortest-path engine.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so they can be shared across Rayon
/// workers during parallel candidate generation.
pub trait Router: Send + Sync {
    /// Compute a shortest path from `from` to `to` minimising `weight`.
    ///
    /// `from == to` yields a single-node path rather than an error.
    ///
    /// # Errors
    ///
    /// - [`SpatialError::NodeNotFound`] if either endpoint is not in `graph`.
    /// - [`SpatialError::NoRoute`] if `to` is unreachable from `from`.
    fn shortest_path(
        &self,
        graph: &WalkGraph,
        from: NodeId,
        to: NodeId,
        weight: WeightKey,
    ) -> SpatialResult<Path>;

    /// Shortest path visiting `points` in order.
    ///
    /// Segment paths are concatenated with the junction node kept once.  If
    /// any segment has no path the whole request fails; no partial route is
    /// returned.  An empty `points` slice yields an empty path.
    fn route_through(
        &self,
        graph: &WalkGraph,
        points: &[NodeId],
        weight: WeightKey,
    ) -> SpatialResult<Path> {
        let Some((&first, rest)) = points.split_first() else {
            return Ok(Path::default());
        };
        if !graph.contains(first) {
            return Err(SpatialError::NodeNotFound(first));
        }

        let mut path = Path::at(first);
        let mut cur = first;
        for &next in rest {
            let segment = self.shortest_path(graph, cur, next, weight)?;
            path.append(segment);
            cur = next;
        }
        Ok(path)
    }
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Standard Dijkstra's algorithm over the CSR pedestrian graph.
///
/// Weights are non-negative by construction (the builder and
/// [`WalkGraph::set_edge_weight`] reject anything else).  Among parallel
/// edges the cheapest wins; exact ties go to the lower parallel key.
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn shortest_path(
        &self,
        graph: &WalkGraph,
        from: NodeId,
        to: NodeId,
        weight: WeightKey,
    ) -> SpatialResult<Path> {
        dijkstra(graph, from, to, weight)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// Totally ordered `f64` wrapper for the heap.
#[derive(Copy, Clone, PartialEq, Debug)]
struct Cost(f64);

impl Eq for Cost {}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn dijkstra(
    graph: &WalkGraph,
    from: NodeId,
    to: NodeId,
    weight: WeightKey,
) -> SpatialResult<Path> {
    for node in [from, to] {
        if !graph.contains(node) {
            return Err(SpatialError::NodeNotFound(node));
        }
    }
    if from == to {
        return Ok(Path::at(from));
    }

    let n = graph.node_count();
    // dist[v] = best known cost to reach v.
    let mut dist      = vec![f64::INFINITY; n];
    // prev_edge[v] = EdgeId that reached v; EdgeId::INVALID for unreached nodes.
    let mut prev_edge = vec![EdgeId::INVALID; n];

    dist[from.index()] = 0.0;

    // Min-heap: (cost, node). Reverse makes BinaryHeap (max) behave as min-heap.
    // Secondary key NodeId ensures deterministic tie-breaking.
    let mut heap: BinaryHeap<Reverse<(Cost, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((Cost(0.0), from)));

    while let Some(Reverse((Cost(cost), node))) = heap.pop() {
        if node == to {
            return Ok(reconstruct(graph, &prev_edge, from, to, cost));
        }

        // Skip stale heap entries.
        if cost > dist[node.index()] {
            continue;
        }

        for edge in graph.out_edges(node) {
            let neighbor = graph.edge_to[edge.index()];
            let new_cost = cost + weight.cost(graph, edge);

            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev_edge[neighbor.index()] = edge;
                heap.push(Reverse((Cost(new_cost), neighbor)));
            }
        }
    }

    Err(SpatialError::NoRoute { from, to })
}

fn reconstruct(
    graph: &WalkGraph,
    prev_edge: &[EdgeId],
    from: NodeId,
    to: NodeId,
    cost: f64,
) -> Path {
    let mut edges = Vec::new();
    let mut cur = to;
    while cur != from {
        let e = prev_edge[cur.index()];
        edges.push(e);
        cur = graph.edge_from[e.index()];
    }
    edges.reverse();

    let mut nodes = Vec::with_capacity(edges.len() + 1);
    nodes.push(from);
    nodes.extend(edges.iter().map(|e| graph.edge_to[e.index()]));

    Path {
        length_m: graph.edges_length(&edges),
        nodes,
        edges,
        cost,
    }
}
