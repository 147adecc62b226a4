// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Grid Network Visualizer - Shortest-Path Routing
//
// Dijkstra over the current graph snapshot. Pure: nothing is cached between
// calls, so a path is only as fresh as the store it was computed from.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap, HashMap, HashSet};

use log::debug;

use crate::error::NetworkError;
use crate::graph::GraphStore;
use crate::types::{NodeId, Path};

// ---------------------------------------------------------------------------
// Frontier entry
// ---------------------------------------------------------------------------

/// Heap entry ordered so that `BinaryHeap` pops the smallest distance first.
/// Equal distances pop in ascending id order; this is the only tie-break,
/// so among equal-cost paths the one returned is implementation-defined.
#[derive(Debug)]
struct Frontier<'a> {
    distance: f64,
    node: &'a NodeId,
}

impl PartialEq for Frontier<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier<'_> {}

impl PartialOrd for Frontier<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.node.cmp(self.node))
    }
}

// ---------------------------------------------------------------------------
// Search tree
// ---------------------------------------------------------------------------

/// Settled distances and predecessor links from one source.
struct SearchTree<'a> {
    distance: HashMap<&'a NodeId, f64>,
    predecessor: HashMap<&'a NodeId, &'a NodeId>,
}

/// Run Dijkstra from `start`. When `stop_at` is given the search ends as soon
/// as that node is settled; its distance and predecessor chain are final.
fn search<'a>(store: &'a GraphStore, start: &'a NodeId, stop_at: Option<&NodeId>) -> SearchTree<'a> {
    let adjacency = store.adjacency();
    let mut distance: HashMap<&NodeId, f64> = HashMap::new();
    let mut predecessor: HashMap<&NodeId, &NodeId> = HashMap::new();
    let mut visited: HashSet<&NodeId> = HashSet::new();
    let mut frontier = BinaryHeap::new();

    distance.insert(start, 0.0);
    frontier.push(Frontier { distance: 0.0, node: start });

    while let Some(Frontier { distance: current_distance, node: current }) = frontier.pop() {
        // Lazy deletion: an entry is stale if the node was settled through a
        // cheaper entry already.
        if !visited.insert(current) {
            continue;
        }
        if stop_at == Some(current) {
            break;
        }
        let Some(edges) = adjacency.get(current) else { continue };
        for &(neighbor, latency) in edges {
            if visited.contains(neighbor) {
                continue;
            }
            let candidate = current_distance + latency;
            let known = distance.get(neighbor).copied().unwrap_or(f64::INFINITY);
            if candidate < known {
                distance.insert(neighbor, candidate);
                predecessor.insert(neighbor, current);
                frontier.push(Frontier { distance: candidate, node: neighbor });
            }
        }
    }

    SearchTree { distance, predecessor }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Minimum-latency path from `start` to `end`, both inclusive.
///
/// Either endpoint missing, or the two lying in different components, yields
/// [`NetworkError::NoPathFound`]. `start == end` yields a single-node path,
/// which callers should treat as nothing to animate.
pub fn shortest_path(store: &GraphStore, start: &NodeId, end: &NodeId) -> Result<Path, NetworkError> {
    let no_path = || NetworkError::NoPathFound { from: start.clone(), to: end.clone() };

    // Borrow the ids out of the store so the search tree can hold references.
    let (Some(start_node), Some(end_node)) = (store.node(start), store.node(end)) else {
        return Err(no_path());
    };
    let (start, end) = (&start_node.id, &end_node.id);

    let tree = search(store, start, Some(end));

    let mut nodes = vec![end.clone()];
    let mut arrivals = vec![*tree.distance.get(end).ok_or_else(no_path)?];
    let mut cursor = end;
    while cursor != start {
        let prev = *tree.predecessor.get(cursor).ok_or_else(no_path)?;
        nodes.push(prev.clone());
        arrivals.push(tree.distance.get(prev).copied().ok_or_else(no_path)?);
        cursor = prev;
    }
    nodes.reverse();
    arrivals.reverse();
    let times = departure_times(store, &nodes, &arrivals);

    debug!(
        "shortest path {} -> {}: {} hops, cost {}",
        start,
        end,
        nodes.len() - 1,
        arrivals.last().copied().unwrap_or(0.0)
    );
    Ok(Path { nodes, arrivals, times })
}

/// `times[i] = arrivals[i] + sum of processing delays of nodes[..i]`: a packet
/// waits at every node it leaves, never at the one it ends on.
fn departure_times(store: &GraphStore, nodes: &[NodeId], arrivals: &[f64]) -> Vec<f64> {
    let mut waited = 0.0;
    nodes
        .iter()
        .zip(arrivals)
        .map(|(id, &arrival)| {
            let time = arrival + waited;
            waited += store.node(id).map_or(0.0, |n| n.processing_delay);
            time
        })
        .collect()
}

/// Minimum latency from `source` to every node reachable from it (itself included).
pub fn distances(store: &GraphStore, source: &NodeId) -> Result<BTreeMap<NodeId, f64>, NetworkError> {
    let source = &store
        .node(source)
        .ok_or_else(|| NetworkError::NodeNotFound(source.clone()))?
        .id;
    let tree = search(store, source, None);
    Ok(tree
        .distance
        .into_iter()
        .map(|(id, d)| (id.clone(), d))
        .collect())
}

/// Destination → first hop out of `source`, for every destination reachable
/// from `source` other than `source` itself.
pub fn routing_table(store: &GraphStore, source: &NodeId) -> Result<BTreeMap<NodeId, NodeId>, NetworkError> {
    let source = &store
        .node(source)
        .ok_or_else(|| NetworkError::NodeNotFound(source.clone()))?
        .id;
    let tree = search(store, source, None);

    let mut table = BTreeMap::new();
    for &destination in tree.predecessor.keys() {
        let mut hop = destination;
        while let Some(&prev) = tree.predecessor.get(hop) {
            if prev == source {
                break;
            }
            hop = prev;
        }
        table.insert(destination.clone(), hop.clone());
    }
    Ok(table)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
