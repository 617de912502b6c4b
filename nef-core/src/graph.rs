//! Plain graph storage shared by the builder and the runtime handle.

use std::collections::HashMap;

use serde::Serialize;

use crate::connection::{Connection, ConnectionId, Weight};
use crate::node::{Node, NodeId, NodeKind, SimulationMode};

/// Nodes in insertion order plus a name index, and the connection list.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    name: String,
    nodes: Vec<Node>,
    index: HashMap<String, NodeId>,
    connections: Vec<Connection>,
}

impl Graph {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn node(&self, name: &str) -> Option<&Node> {
        self.index.get(name).and_then(|id| self.nodes.get(id.index()))
    }

    pub fn node_by_id(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(id.0 as usize)
    }

    /// Every connection from `source` to `destination`, in declaration order.
    pub fn connections_between(
        &self,
        source: NodeId,
        destination: NodeId,
    ) -> impl Iterator<Item = &Connection> {
        self.connections
            .iter()
            .filter(move |c| c.source.node == source && c.destination.node == destination)
    }

    pub(crate) fn next_node_id(&self) -> NodeId {
        NodeId(self.nodes.len() as u32)
    }

    pub(crate) fn next_connection_id(&self) -> ConnectionId {
        ConnectionId(self.connections.len() as u32)
    }

    pub(crate) fn push_node(&mut self, node: Node) -> NodeId {
        let id = node.id;
        debug_assert_eq!(id, self.next_node_id());
        self.index.insert(node.name.clone(), id);
        self.nodes.push(node);
        id
    }

    pub(crate) fn push_connection(&mut self, connection: Connection) -> ConnectionId {
        let id = connection.id;
        debug_assert_eq!(id, self.next_connection_id());
        self.connections.push(connection);
        id
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    pub fn summary(&self) -> NetworkSummary {
        let signal_label = |id: NodeId, signal: &str| {
            let name = self.node_by_id(id).map(|n| n.name.as_str()).unwrap_or("?");
            format!("{}:{}", name, signal)
        };

        NetworkSummary {
            name: self.name.clone(),
            nodes: self
                .nodes
                .iter()
                .map(|n| NodeSummary {
                    name: n.name.clone(),
                    kind: match n.kind {
                        NodeKind::Input(_) => "input",
                        NodeKind::Population(_) => "population",
                    },
                    dimensions: n.dimensions,
                    units: n.units(),
                    mode: n.mode(),
                    controllable: matches!(&n.kind, NodeKind::Input(i) if i.controllable),
                })
                .collect(),
            connections: self
                .connections
                .iter()
                .map(|c| ConnectionSummary {
                    source: signal_label(c.source.node, &c.source.signal),
                    destination: signal_label(c.destination.node, &c.destination.signal),
                    weight: c.weight.clone(),
                    pstc: c.pstc,
                    modulatory: c.modulatory,
                    learning_rate: c.learning_rate,
                })
                .collect(),
        }
    }
}

/// Flat, serializable description of a network.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NetworkSummary {
    pub name: String,
    pub nodes: Vec<NodeSummary>,
    pub connections: Vec<ConnectionSummary>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeSummary {
    pub name: String,
    pub kind: &'static str,
    pub dimensions: usize,
    pub units: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<SimulationMode>,
    pub controllable: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConnectionSummary {
    pub source: String,
    pub destination: String,
    pub weight: Weight,
    pub pstc: f64,
    pub modulatory: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub learning_rate: Option<f64>,
}
