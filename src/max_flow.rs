use std::collections::{HashMap, HashSet};
use std::fmt::Display;

use log::trace;
use pathfinding::prelude::{bfs, bfs_reach, dfs};
use petgraph::graph::NodeIndex;
use priority_queue::PriorityQueue;

use crate::common::{Capacity, INFINITE};
use crate::network::FlowNetwork;

/// Result of a max-flow run: the flow value and the source side of the
/// minimum cut.
#[derive(Debug, Clone)]
pub struct FlowOutcome {
    pub value: Capacity,
    pub source_side: HashSet<NodeIndex>,
}

impl FlowOutcome {
    pub fn is_source_side(&self, node: NodeIndex) -> bool {
        self.source_side.contains(&node)
    }
}

/// Augmenting-path maximum flow. Implementors only choose how a path is
/// found; pushing flow and reading off the cut are shared.
pub trait MaxFlow {
    /// A source-to-sink path in the residual graph, source first.
    fn augmenting_path(&self, network: &FlowNetwork) -> Option<Vec<NodeIndex>>;

    fn max_flow(&self, network: &mut FlowNetwork) -> FlowOutcome {
        while let Some(path) = self.augmenting_path(network) {
            let Some(amount) = network.bottleneck(&path) else {
                break;
            };
            if amount <= 0 || !network.augment(&path, amount) {
                break;
            }
            trace!("augmented {} along {} vertices", amount, path.len());
        }
        FlowOutcome {
            value: network.flow_value(),
            source_side: source_side(network),
        }
    }
}

/// Vertices reachable from the source through positive residual capacity.
pub fn source_side(network: &FlowNetwork) -> HashSet<NodeIndex> {
    bfs_reach(network.source(), |&node| network.residual_successors(node)).collect()
}

/// Shortest augmenting paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdmondsKarp;

impl MaxFlow for EdmondsKarp {
    fn augmenting_path(&self, network: &FlowNetwork) -> Option<Vec<NodeIndex>> {
        let sink = network.sink();
        bfs(
            &network.source(),
            |&node| network.residual_successors(node),
            |&node| node == sink,
        )
    }
}

/// Any augmenting path, found depth first.
#[derive(Debug, Clone, Copy, Default)]
pub struct FordFulkerson;

impl MaxFlow for FordFulkerson {
    fn augmenting_path(&self, network: &FlowNetwork) -> Option<Vec<NodeIndex>> {
        let sink = network.sink();
        dfs(
            network.source(),
            |&node| network.residual_successors(node).collect::<Vec<_>>(),
            |&node| node == sink,
        )
    }
}

/// Augments along the path whose smallest residual capacity is largest.
#[derive(Debug, Clone, Copy, Default)]
pub struct FattestPath;

impl MaxFlow for FattestPath {
    fn augmenting_path(&self, network: &FlowNetwork) -> Option<Vec<NodeIndex>> {
        let (source, sink) = (network.source(), network.sink());
        let mut width: HashMap<NodeIndex, Capacity> = HashMap::from([(source, INFINITE)]);
        let mut parent: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        let mut done = HashSet::new();
        let mut q: PriorityQueue<NodeIndex, Capacity> = PriorityQueue::new();
        q.push(source, INFINITE);
        while let Some((node, node_width)) = q.pop() {
            if node == sink {
                return Some(trace_back(&parent, source, sink));
            }
            done.insert(node);
            for next in network.residual_successors(node) {
                if done.contains(&next) {
                    continue;
                }
                let Some((_, residual)) = network.residual_arc(node, next) else {
                    continue;
                };
                let next_width = node_width.min(residual);
                if next_width > width.get(&next).copied().unwrap_or(0) {
                    width.insert(next, next_width);
                    parent.insert(next, node);
                    q.push_increase(next, next_width);
                }
            }
        }
        None
    }
}

fn trace_back(
    parent: &HashMap<NodeIndex, NodeIndex>,
    source: NodeIndex,
    sink: NodeIndex,
) -> Vec<NodeIndex> {
    let mut path = vec![sink];
    let mut node = sink;
    while node != source {
        match parent.get(&node) {
            Some(&prev) => {
                path.push(prev);
                node = prev;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

/// Selectable strategy, for callers that pick one at runtime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Algorithm {
    #[default]
    EdmondsKarp,
    FordFulkerson,
    FattestPath,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [
        Algorithm::EdmondsKarp,
        Algorithm::FordFulkerson,
        Algorithm::FattestPath,
    ];
}

impl MaxFlow for Algorithm {
    fn augmenting_path(&self, network: &FlowNetwork) -> Option<Vec<NodeIndex>> {
        match self {
            Algorithm::EdmondsKarp => EdmondsKarp.augmenting_path(network),
            Algorithm::FordFulkerson => FordFulkerson.augmenting_path(network),
            Algorithm::FattestPath => FattestPath.augmenting_path(network),
        }
    }
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Algorithm::EdmondsKarp => "edmonds-karp",
            Algorithm::FordFulkerson => "ford-fulkerson",
            Algorithm::FattestPath => "fattest-path",
        };
        write!(f, "{name}")
    }
}
