use std::collections::HashSet;

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction::{Incoming, Outgoing};

use crate::common::{Capacity, TeamIdx, INFINITE};
use crate::division::Division;

#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum Vertex {
    Source,
    Sink,
    /// Remaining games between two teams, `i < j`.
    Game(TeamIdx, TeamIdx),
    Team(TeamIdx),
}

#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct FlowEdge {
    /// As given when the edge was added; may be negative.
    pub capacity: Capacity,
    pub flow: Capacity,
}

impl FlowEdge {
    fn new(capacity: Capacity) -> Self {
        FlowEdge { capacity, flow: 0 }
    }
    /// Negative capacities carry nothing.
    pub fn effective_capacity(&self) -> Capacity {
        self.capacity.max(0)
    }
    pub fn residual(&self) -> Capacity {
        self.effective_capacity() - self.flow
    }
}

/// A way to move flow from one vertex to the next in the residual graph:
/// push more along an edge, or cancel flow already on an edge that points
/// the other way.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum ResidualArc {
    Forward(EdgeIndex),
    Backward(EdgeIndex),
}

/// Directed graph with a distinguished source and sink, carrying a flow.
#[derive(Debug, Clone)]
pub struct FlowNetwork {
    graph: DiGraph<Vertex, FlowEdge>,
    source: NodeIndex,
    sink: NodeIndex,
    teams: Vec<NodeIndex>,
}

impl FlowNetwork {
    pub fn new() -> Self {
        let mut graph = DiGraph::new();
        let source = graph.add_node(Vertex::Source);
        let sink = graph.add_node(Vertex::Sink);
        FlowNetwork {
            graph,
            source,
            sink,
            teams: Vec::new(),
        }
    }
    pub fn source(&self) -> NodeIndex {
        self.source
    }
    pub fn sink(&self) -> NodeIndex {
        self.sink
    }
    pub fn add_vertex(&mut self, vertex: Vertex) -> NodeIndex {
        let node = self.graph.add_node(vertex);
        if let Vertex::Team(k) = vertex {
            if self.teams.len() <= k {
                self.teams.resize(k + 1, NodeIndex::end());
            }
            self.teams[k] = node;
        }
        node
    }
    pub fn add_edge(&mut self, from: NodeIndex, to: NodeIndex, capacity: Capacity) -> EdgeIndex {
        self.graph.add_edge(from, to, FlowEdge::new(capacity))
    }
    pub fn vertex(&self, node: NodeIndex) -> Vertex {
        self.graph[node]
    }
    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }
    pub fn team_vertex(&self, team: TeamIdx) -> Option<NodeIndex> {
        self.teams
            .get(team)
            .copied()
            .filter(|&node| node != NodeIndex::end())
    }
    pub fn edge(&self, edge: EdgeIndex) -> FlowEdge {
        self.graph[edge]
    }
    /// `(from, to, edge)` for every edge, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (Vertex, Vertex, FlowEdge)> + '_ {
        self.graph
            .edge_references()
            .map(|e| (self.graph[e.source()], self.graph[e.target()], *e.weight()))
    }

    /// Vertices reachable from `node` in one step of the residual graph.
    pub fn residual_successors(&self, node: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        let forward = self
            .graph
            .edges_directed(node, Outgoing)
            .filter(|e| e.weight().residual() > 0)
            .map(|e| e.target());
        let backward = self
            .graph
            .edges_directed(node, Incoming)
            .filter(|e| e.weight().flow > 0)
            .map(|e| e.source());
        forward.chain(backward)
    }

    /// The widest residual arc from `from` to `to`, with its residual capacity.
    pub fn residual_arc(&self, from: NodeIndex, to: NodeIndex) -> Option<(ResidualArc, Capacity)> {
        let forward = self
            .graph
            .edges_connecting(from, to)
            .map(|e| (ResidualArc::Forward(e.id()), e.weight().residual()));
        let backward = self
            .graph
            .edges_connecting(to, from)
            .map(|e| (ResidualArc::Backward(e.id()), e.weight().flow));
        forward
            .chain(backward)
            .filter(|(_, residual)| *residual > 0)
            .max_by_key(|(_, residual)| *residual)
    }

    /// Smallest residual capacity along `path`, or `None` if some step has none.
    pub fn bottleneck(&self, path: &[NodeIndex]) -> Option<Capacity> {
        path.windows(2)
            .map(|step| self.residual_arc(step[0], step[1]).map(|(_, residual)| residual))
            .try_fold(INFINITE, |acc, residual| residual.map(|r| acc.min(r)))
    }

    /// Pushes `amount` along `path`. Returns `false`, leaving the flow
    /// untouched, if some step cannot carry it.
    pub fn augment(&mut self, path: &[NodeIndex], amount: Capacity) -> bool {
        let mut arcs = Vec::with_capacity(path.len().saturating_sub(1));
        for step in path.windows(2) {
            match self.residual_arc(step[0], step[1]) {
                Some((arc, residual)) if residual >= amount => arcs.push(arc),
                _ => return false,
            }
        }
        for arc in arcs {
            match arc {
                ResidualArc::Forward(e) => self.graph[e].flow += amount,
                ResidualArc::Backward(e) => self.graph[e].flow -= amount,
            }
        }
        true
    }

    pub fn reset_flow(&mut self) {
        for edge in self.graph.edge_weights_mut() {
            edge.flow = 0;
        }
    }

    /// Net flow leaving the source.
    pub fn flow_value(&self) -> Capacity {
        let out: Capacity = self
            .graph
            .edges_directed(self.source, Outgoing)
            .map(|e| e.weight().flow)
            .sum();
        let back: Capacity = self
            .graph
            .edges_directed(self.source, Incoming)
            .map(|e| e.weight().flow)
            .sum();
        out - back
    }

    pub fn total_source_capacity(&self) -> Capacity {
        self.graph
            .edges_directed(self.source, Outgoing)
            .map(|e| e.weight().effective_capacity())
            .sum()
    }

    /// Total capacity of edges leaving `source_side`.
    pub fn cut_capacity(&self, source_side: &HashSet<NodeIndex>) -> Capacity {
        self.graph
            .edge_references()
            .filter(|e| source_side.contains(&e.source()) && !source_side.contains(&e.target()))
            .map(|e| e.weight().effective_capacity())
            .sum()
    }
}

impl Default for FlowNetwork {
    fn default() -> Self {
        Self::new()
    }
}

/// Network deciding whether every remaining game can be handed out without
/// any team passing `team`'s best possible win total.
///
/// One game vertex per unordered pair `i < j` fed from the source with the
/// games left between them, fanning out to both team vertices without limit.
/// Every team, `team` included, drains into the sink with capacity
/// `best(team) - wins(k)`, which may be negative.
pub fn build_elimination_network(division: &Division, team: TeamIdx) -> FlowNetwork {
    let n = division.number_of_teams();
    let best = division.best_possible_wins(team);
    let mut network = FlowNetwork::new();
    let source = network.source();
    let sink = network.sink();
    let teams: Vec<NodeIndex> = (0..n).map(|k| network.add_vertex(Vertex::Team(k))).collect();
    for i in 0..n {
        for j in (i + 1)..n {
            let game = network.add_vertex(Vertex::Game(i, j));
            network.add_edge(source, game, Capacity::from(division.against_at(i, j)));
            network.add_edge(game, teams[i], INFINITE);
            network.add_edge(game, teams[j], INFINITE);
        }
    }
    for (k, &node) in teams.iter().enumerate() {
        network.add_edge(node, sink, best - Capacity::from(division.wins_at(k)));
    }
    network
}
