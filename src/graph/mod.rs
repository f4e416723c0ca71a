//! Value-keyed spatial graph of road nodes
//!
//! An undirected graph of 2D points with a uniform spatial hash over unit
//! grid cells for radius queries. Nodes are keyed by coordinate value, never
//! by allocation identity: two nodes at the same coordinates are the same
//! vertex, so independent growth branches that land on the same point dedup
//! on insert instead of silently forking the graph.
//!
//! The spatial hash trades memory for amortized O(1) radius queries, which
//! the growth engine issues several times per agent step against a graph
//! that reaches thousands of nodes.

use ahash::{AHashMap, AHashSet};
use glam::DVec2;
use ordered_float::OrderedFloat;
use std::collections::VecDeque;
use std::hash::{Hash, Hasher};

use crate::core::types::RoadClass;

/// A road-network vertex
///
/// Coordinates are immutable once the node is inserted into a graph.
/// Equality and hashing consider only (x, y); the class tag rides along for
/// edge classification and snap eligibility but never distinguishes two
/// nodes at the same point.
#[derive(Debug, Clone, Copy)]
pub struct Node {
    pub x: OrderedFloat<f64>,
    pub y: OrderedFloat<f64>,
    pub class: RoadClass,
}

impl Node {
    pub fn new(position: DVec2, class: RoadClass) -> Self {
        Self {
            x: OrderedFloat(position.x),
            y: OrderedFloat(position.y),
            class,
        }
    }

    pub fn position(&self) -> DVec2 {
        DVec2::new(self.x.0, self.y.0)
    }

    pub fn distance(&self, other: &Node) -> f64 {
        self.position().distance(other.position())
    }

    /// Spatial hash cell containing this node
    fn cell(&self) -> (i64, i64) {
        (self.x.0.floor() as i64, self.y.0.floor() as i64)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.x.hash(state);
        self.y.hash(state);
    }
}

/// Undirected graph with a spatial hash index
///
/// Invariants: adjacency is symmetric, carries no self-loops or parallel
/// edges, and a node appears in the spatial index exactly when it appears in
/// the adjacency map.
#[derive(Debug, Clone, Default)]
pub struct SpatialGraph {
    adjacency: AHashMap<Node, Vec<Node>>,
    cells: AHashMap<(i64, i64), Vec<Node>>,
    num_edges: usize,
}

impl SpatialGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_nodes(&self) -> usize {
        self.adjacency.len()
    }

    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    /// Register a node with no neighbors; no-op if a node with the same
    /// coordinates is already present
    pub fn add_node(&mut self, node: Node) {
        if self.adjacency.contains_key(&node) {
            return;
        }
        self.adjacency.insert(node, Vec::new());
        self.cells.entry(node.cell()).or_default().push(node);
    }

    /// Insert the undirected edge a-b
    ///
    /// Rejects self-loops and duplicate edges (returns false, graph
    /// untouched). Missing endpoints are added implicitly.
    pub fn connect(&mut self, a: Node, b: Node) -> bool {
        if a == b {
            return false;
        }
        self.add_node(a);
        self.add_node(b);
        if self.adjacency[&a].contains(&b) {
            return false;
        }
        if let Some(adj) = self.adjacency.get_mut(&a) {
            adj.push(b);
        }
        if let Some(adj) = self.adjacency.get_mut(&b) {
            adj.push(a);
        }
        self.num_edges += 1;
        true
    }

    /// Replace the edge a-b with a-mid and mid-b
    ///
    /// If a and b were not adjacent the two new edges are still inserted;
    /// callers invoke this right after detecting that a proposed segment
    /// crosses a-b, when adjacency is known.
    pub fn split_edge(&mut self, a: Node, b: Node, mid: Node) {
        if self.adjacency.get(&a).is_some_and(|adj| adj.contains(&b)) {
            if let Some(adj) = self.adjacency.get_mut(&a) {
                adj.retain(|n| *n != b);
            }
            if let Some(adj) = self.adjacency.get_mut(&b) {
                adj.retain(|n| *n != a);
            }
            self.num_edges -= 1;
        }
        self.connect(a, mid);
        self.connect(mid, b);
    }

    /// Disconnect a node from all neighbors and drop it from the graph and
    /// the spatial index
    pub fn remove_node(&mut self, node: Node) {
        let Some(neighbors) = self.adjacency.remove(&node) else {
            return;
        };
        for neighbor in neighbors {
            if let Some(adj) = self.adjacency.get_mut(&neighbor) {
                adj.retain(|n| *n != node);
                self.num_edges -= 1;
            }
        }
        if let Some(cell) = self.cells.get_mut(&node.cell()) {
            cell.retain(|n| *n != node);
        }
    }

    /// All nodes strictly within `radius` of `query`, excluding any node at
    /// the query's own coordinates; no ordering guarantee
    pub fn nodes_near(&self, query: &Node, radius: f64) -> Vec<Node> {
        let reach = radius.ceil() as i64 + 1;
        let (cx, cy) = query.cell();
        let mut found = Vec::new();
        for dx in -reach..=reach {
            for dy in -reach..=reach {
                let Some(cell) = self.cells.get(&(cx + dx, cy + dy)) else {
                    continue;
                };
                for node in cell {
                    if node != query && node.distance(query) < radius {
                        found.push(*node);
                    }
                }
            }
        }
        found
    }

    /// Neighbors of `node`, empty if the node is absent
    pub fn adjacent(&self, node: &Node) -> &[Node] {
        self.adjacency.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.adjacency.keys()
    }

    /// Partition the graph into connected components by breadth-first
    /// traversal; discovery order within a component, no ordering guarantee
    /// across components
    pub fn connected_components(&self) -> Vec<Vec<Node>> {
        let mut components = Vec::new();
        let mut seen: AHashSet<Node> = AHashSet::new();
        for root in self.adjacency.keys() {
            if seen.contains(root) {
                continue;
            }
            seen.insert(*root);
            let mut component = vec![*root];
            let mut frontier = VecDeque::from([*root]);
            while let Some(current) = frontier.pop_front() {
                for neighbor in self.adjacent(&current) {
                    if seen.insert(*neighbor) {
                        component.push(*neighbor);
                        frontier.push_back(*neighbor);
                    }
                }
            }
            components.push(component);
        }
        components
    }
}
