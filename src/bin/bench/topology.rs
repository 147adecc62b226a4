// Random Grid Topologies - seedable, one graph per run

use grid_netsim::{GraphStore, NodeId, SimulatorConfig};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Shape of the generated graphs.
pub struct TopologySpec {
    pub nodes: usize,
    /// Probability that any given pair of placed nodes is linked.
    pub density: f64,
    pub max_latency: f64,
}

/// Place `spec.nodes` nodes on distinct random cells and link pairs with
/// probability `spec.density`. Node count is capped at the number of cells.
pub fn random_graph(rng: &mut ChaCha8Rng, spec: &TopologySpec) -> (GraphStore, Vec<NodeId>) {
    let config = SimulatorConfig::default();
    let size = config.grid_size as i64;
    let mut store = GraphStore::new(&config);

    let mut cells: Vec<(i64, i64)> = (0..size)
        .flat_map(|x| (0..size).map(move |y| (x, y)))
        .collect();
    cells.shuffle(rng);

    let mut ids = Vec::new();
    for (i, &(x, y)) in cells.iter().take(spec.nodes).enumerate() {
        let id = NodeId::from(format!("n{}", i));
        if store.add_node(id.clone(), x, y).is_ok() {
            ids.push(id);
        }
    }

    for a in 0..ids.len() {
        for b in (a + 1)..ids.len() {
            if rng.gen_bool(spec.density.clamp(0.0, 1.0)) {
                let latency = rng.gen_range(0.1..spec.max_latency.max(0.2));
                let _ = store.add_connection(ids[a].clone(), ids[b].clone(), latency);
            }
        }
    }

    (store, ids)
}
