//! Pedestrian graph representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edge_from[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! All edge arrays (`edge_from`, `edge_to`, `edge_key`, `edge_length_m`,
//! `edge_weight`) are sorted by source node and indexed by `EdgeId`.  Within
//! one source node, edges keep their insertion order, so iteration (and with
//! it shortest-path tie-breaking) is deterministic.
//!
//! # Parallel edges
//!
//! Several edges may join the same ordered node pair (a footway and a
//! crossing, say).  Each gets its own `EdgeId` and a parallel key `0, 1, …`
//! in insertion order, and each is addressable on its own.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) over unit-sphere vectors maps `(lat, lon)` to the
//! nearest `NodeId` by exact great-circle distance.

use std::collections::HashMap;

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use rr_core::{EdgeId, GeoPoint, NodeId, NodeTag, Preferences};

use crate::{SpatialError, SpatialResult};

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree spatial index: a unit-sphere vector with the
/// associated `NodeId`.
#[derive(Clone)]
struct NodeEntry {
    point: [f64; 3],
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 3]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared chord length.  Monotone in great-circle distance.
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        let dz = self.point[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

// ── WalkGraph ─────────────────────────────────────────────────────────────────

/// Directed multi-edge pedestrian graph in CSR format plus a spatial index.
///
/// Read-only once built, except for [`set_edge_weight`](Self::set_edge_weight)
/// which is meant to be called before the graph is shared.  Do not construct
/// directly; use [`WalkGraphBuilder`].
#[derive(Clone)]
pub struct WalkGraph {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Geographic position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<GeoPoint>,

    /// The provider's own identifier for each node.  Indexed by `NodeId`.
    pub node_key: Vec<i64>,

    /// Park / river / normal classification of each node.
    pub node_tag: Vec<NodeTag>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// CSR row pointer.  Outgoing edges of node `n` are at EdgeIds
    /// `node_out_start[n] .. node_out_start[n+1]`.
    /// Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Edge data (indexed by EdgeId = position in sorted order) ──────────
    /// Source node of each edge.
    pub edge_from: Vec<NodeId>,

    /// Destination node of each edge.
    pub edge_to: Vec<NodeId>,

    /// Parallel-edge key: 0 for the first edge between an ordered node pair,
    /// 1 for the second, and so on.
    pub edge_key: Vec<u16>,

    /// Length of each edge in metres.
    pub edge_length_m: Vec<f64>,

    /// Path cost of each edge.  Defaults to the length.
    pub edge_weight: Vec<f64>,

    // ── Spatial index ─────────────────────────────────────────────────────
    spatial_idx: RTree<NodeEntry>,
}

impl WalkGraph {
    /// Construct an empty graph with no nodes or edges.
    ///
    /// Any path request against an empty graph fails with
    /// [`SpatialError::NodeNotFound`].
    pub fn empty() -> Self {
        WalkGraph {
            node_pos:       Vec::new(),
            node_key:       Vec::new(),
            node_tag:       Vec::new(),
            node_out_start: vec![0],
            edge_from:      Vec::new(),
            edge_to:        Vec::new(),
            edge_key:       Vec::new(),
            edge_length_m:  Vec::new(),
            edge_weight:    Vec::new(),
            spatial_idx:    RTree::new(),
        }
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    /// `true` if `node` indexes a node of this graph.
    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.node_count()
    }

    /// Iterator over every `NodeId` in index order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.node_count() as u32).map(NodeId)
    }

    // ── Node data ─────────────────────────────────────────────────────────

    #[inline]
    pub fn position(&self, node: NodeId) -> GeoPoint {
        self.node_pos[node.index()]
    }

    /// Coordinates of a node sequence, in order.
    pub fn coords(&self, nodes: &[NodeId]) -> Vec<GeoPoint> {
        nodes.iter().map(|&n| self.position(n)).collect()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    ///
    /// A contiguous index range; no allocation.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    /// Out-degree of `node` (number of outgoing edges, parallel ones included).
    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// Destinations of the outgoing edges of `node`.  A neighbour reached by
    /// parallel edges appears once per edge.
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.out_edges(node).map(|e| self.edge_to[e.index()])
    }

    /// All parallel edges from `from` to `to`, in key order.
    pub fn edges_between(&self, from: NodeId, to: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        self.out_edges(from).filter(move |e| self.edge_to[e.index()] == to)
    }

    /// The edge with the given parallel key, if present.
    pub fn edge(&self, from: NodeId, to: NodeId, key: u16) -> Option<EdgeId> {
        self.edges_between(from, to).find(|e| self.edge_key[e.index()] == key)
    }

    /// The shortest parallel edge from `from` to `to`.  Ties go to the lower key.
    pub fn shortest_edge_between(&self, from: NodeId, to: NodeId) -> Option<EdgeId> {
        self.edges_between(from, to).fold(None, |best: Option<EdgeId>, e| match best {
            Some(b) if self.edge_length_m[b.index()] <= self.edge_length_m[e.index()] => Some(b),
            _ => Some(e),
        })
    }

    /// Total length of a node sequence, taking the shortest parallel edge
    /// between each consecutive pair.
    ///
    /// Returns `Some(0.0)` for sequences shorter than two nodes and `None`
    /// if some consecutive pair is not joined by an edge.
    pub fn path_length(&self, nodes: &[NodeId]) -> Option<f64> {
        nodes.windows(2).try_fold(0.0, |acc, w| {
            self.shortest_edge_between(w[0], w[1])
                .map(|e| acc + self.edge_length_m[e.index()])
        })
    }

    /// Total length of an explicit edge sequence.
    pub fn edges_length(&self, edges: &[EdgeId]) -> f64 {
        edges.iter().map(|e| self.edge_length_m[e.index()]).sum()
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Replace the path cost of one edge.
    ///
    /// # Errors
    ///
    /// [`SpatialError::NegativeWeight`] if `weight` is negative or not finite.
    pub fn set_edge_weight(&mut self, edge: EdgeId, weight: f64) -> SpatialResult<()> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(SpatialError::NegativeWeight { edge, weight });
        }
        self.edge_weight[edge.index()] = weight;
        Ok(())
    }

    /// Set every edge weight to its length scaled by
    /// [`Preferences::edge_factor`] of its endpoint tags.  Returns the number
    /// of edges whose weight differs from their length.
    ///
    /// Overwrites any weight loaded with the graph.
    pub fn apply_preferences(&mut self, prefs: &Preferences) -> usize {
        let mut changed = 0;
        for e in 0..self.edge_count() {
            let from = self.node_tag[self.edge_from[e].index()];
            let to   = self.node_tag[self.edge_to[e].index()];
            let factor = prefs.edge_factor(from, to);
            if factor != 1.0 {
                changed += 1;
            }
            self.edge_weight[e] = self.edge_length_m[e] * factor;
        }
        changed
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Return the node nearest to `pos` by great-circle distance.
    ///
    /// Equidistant nodes resolve to the lowest `NodeId`.  Returns `None` only
    /// if the graph has no nodes.
    pub fn nearest_node(&self, pos: GeoPoint) -> Option<NodeId> {
        let query = pos.unit_vector();
        let mut iter = self.spatial_idx.nearest_neighbor_iter_with_distance_2(&query);
        let (first, best) = iter.next()?;
        let mut winner = first.id;
        for (entry, d2) in iter {
            if d2 > best {
                break;
            }
            winner = winner.min(entry.id);
        }
        Some(winner)
    }

    /// Like [`nearest_node`](Self::nearest_node), but gives up when the
    /// nearest node is farther than `max_m` metres.
    pub fn nearest_node_within(&self, pos: GeoPoint, max_m: f64) -> Option<NodeId> {
        self.nearest_node(pos)
            .filter(|&n| self.position(n).distance_m(pos) <= max_m)
    }

    /// Return up to `k` nearest nodes to `pos`, sorted by ascending distance.
    pub fn k_nearest_nodes(&self, pos: GeoPoint, k: usize) -> Vec<NodeId> {
        self.spatial_idx
            .nearest_neighbor_iter(&pos.unit_vector())
            .take(k)
            .map(|e| e.id)
            .collect()
    }
}

// ── WalkGraphBuilder ──────────────────────────────────────────────────────────

/// Construct a [`WalkGraph`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use rr_core::GeoPoint;
/// use rr_spatial::WalkGraphBuilder;
///
/// let mut b = WalkGraphBuilder::new();
/// let a = b.add_node(GeoPoint::new(35.83, 128.75));
/// let c = b.add_node(GeoPoint::new(35.84, 128.75));
/// b.add_footway(a, c, 1_100.0);
/// let graph = b.build().unwrap();
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 2); // both directions
/// ```
pub struct WalkGraphBuilder {
    nodes:     Vec<GeoPoint>,
    keys:      Vec<i64>,
    tags:      Vec<NodeTag>,
    raw_edges: Vec<RawEdge>,
    next_key:  HashMap<(NodeId, NodeId), u16>,
}

struct RawEdge {
    from:     NodeId,
    to:       NodeId,
    key:      u16,
    length_m: f64,
    weight:   f64,
}

impl WalkGraphBuilder {
    pub fn new() -> Self {
        Self {
            nodes:     Vec::new(),
            keys:      Vec::new(),
            tags:      Vec::new(),
            raw_edges: Vec::new(),
            next_key:  HashMap::new(),
        }
    }

    /// Add a node and return its `NodeId` (sequential from 0).  The provider
    /// key defaults to the index.
    pub fn add_node(&mut self, pos: GeoPoint) -> NodeId {
        let key = self.nodes.len() as i64;
        self.add_keyed_node(key, pos)
    }

    /// Add a node carrying the provider's own identifier.
    pub fn add_keyed_node(&mut self, key: i64, pos: GeoPoint) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        self.keys.push(key);
        self.tags.push(NodeTag::Normal);
        id
    }

    /// Classify a node added earlier.  Nodes start as [`NodeTag::Normal`];
    /// an unknown `id` is ignored.
    pub fn set_node_tag(&mut self, id: NodeId, tag: NodeTag) {
        if let Some(slot) = self.tags.get_mut(id.index()) {
            *slot = tag;
        }
    }

    /// Add a **directed** edge whose cost is its length.  Returns the
    /// parallel key assigned to it.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, length_m: f64) -> u16 {
        self.add_weighted_edge(from, to, length_m, length_m)
    }

    /// Add a **directed** edge with an explicit path cost.
    pub fn add_weighted_edge(&mut self, from: NodeId, to: NodeId, length_m: f64, weight: f64) -> u16 {
        let slot = self.next_key.entry((from, to)).or_insert(0);
        let key = *slot;
        *slot = slot.saturating_add(1);
        self.raw_edges.push(RawEdge { from, to, key, length_m, weight });
        key
    }

    /// Convenience: add edges in **both directions**, the common case for
    /// pedestrian ways.
    pub fn add_footway(&mut self, a: NodeId, b: NodeId, length_m: f64) {
        self.add_edge(a, b, length_m);
        self.add_edge(b, a, length_m);
    }

    /// Look up the position of a node added earlier (used by loaders to
    /// compute fallback edge lengths).
    pub fn node_pos(&self, id: NodeId) -> GeoPoint {
        self.nodes[id.index()]
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`WalkGraph`].
    ///
    /// # Errors
    ///
    /// - [`SpatialError::NodeNotFound`] if an edge references an unknown node.
    /// - [`SpatialError::NegativeWeight`] if a length or weight is negative
    ///   or not finite.
    pub fn build(self) -> SpatialResult<WalkGraph> {
        let node_count = self.nodes.len();
        let edge_count = self.raw_edges.len();

        // Stable sort keeps insertion order among a node's edges.
        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        for (i, e) in raw.iter().enumerate() {
            for node in [e.from, e.to] {
                if node.index() >= node_count {
                    return Err(SpatialError::NodeNotFound(node));
                }
            }
            for value in [e.length_m, e.weight] {
                if !value.is_finite() || value < 0.0 {
                    return Err(SpatialError::NegativeWeight { edge: EdgeId(i as u32), weight: value });
                }
            }
        }

        let edge_from:     Vec<NodeId> = raw.iter().map(|e| e.from).collect();
        let edge_to:       Vec<NodeId> = raw.iter().map(|e| e.to).collect();
        let edge_key:      Vec<u16>    = raw.iter().map(|e| e.key).collect();
        let edge_length_m: Vec<f64>    = raw.iter().map(|e| e.length_m).collect();
        let edge_weight:   Vec<f64>    = raw.iter().map(|e| e.weight).collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        // Bulk-load R-tree for O(N log N) construction (faster than N inserts).
        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, &pos)| NodeEntry {
                point: pos.unit_vector(),
                id: NodeId(i as u32),
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        Ok(WalkGraph {
            node_pos: self.nodes,
            node_key: self.keys,
            node_tag: self.tags,
            node_out_start,
            edge_from,
            edge_to,
            edge_key,
            edge_length_m,
            edge_weight,
            spatial_idx,
        })
    }
}

impl Default for WalkGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
