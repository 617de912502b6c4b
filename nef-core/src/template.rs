//! Reusable sub-circuits.

use crate::connection::ConnectionId;
use crate::error::NefResult;
use crate::network::Network;
use crate::node::NodeId;

/// A circuit-building strategy. Arguments live in the implementing type;
/// `build` may only use the public [`Network`] API, so it is held to the same
/// invariants and errors as any direct caller.
pub trait CircuitTemplate {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Add this circuit's nodes and connections to `net`.
    fn build(&self, net: &mut Network) -> NefResult<()>;
}

/// Nodes and connections added by one [`Network::apply`] call, in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TemplateOutput {
    pub nodes: Vec<NodeId>,
    pub connections: Vec<ConnectionId>,
}

impl TemplateOutput {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.connections.is_empty()
    }
}
