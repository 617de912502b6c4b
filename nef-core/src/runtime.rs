//! Handle given to the execution engine once a network is finalized.
//!
//! The graph structure is frozen. The one runtime mutation allowed is
//! replacing the values of a controllable input.

use tracing::debug;

use crate::error::{NefError, NefResult};
use crate::function::InputFunction;
use crate::graph::{Graph, NetworkSummary};
use crate::node::{Node, NodeKind};

#[derive(Debug)]
pub struct RuntimeHandle {
    graph: Graph,
}

impl RuntimeHandle {
    pub(crate) fn new(graph: Graph) -> Self {
        Self { graph }
    }

    pub fn name(&self) -> &str {
        self.graph.name()
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Inputs whose values can be changed while running.
    pub fn controls(&self) -> impl Iterator<Item = &Node> {
        self.graph
            .nodes()
            .iter()
            .filter(|n| matches!(&n.kind, NodeKind::Input(i) if i.controllable))
    }

    /// Replace the values of a controllable input. The dimensionality is fixed.
    pub fn set_input(&mut self, name: &str, values: &[f64]) -> NefResult<()> {
        let id = self
            .graph
            .node(name)
            .map(|n| n.id)
            .ok_or_else(|| NefError::UnknownNode(name.to_string()))?;
        let node = self
            .graph
            .node_mut(id)
            .ok_or_else(|| NefError::UnknownNode(name.to_string()))?;
        let dimensions = node.dimensions;

        let spec = match &mut node.kind {
            NodeKind::Input(spec) if spec.controllable => spec,
            _ => return Err(NefError::NotControllable(name.to_string())),
        };
        if values.len() != dimensions {
            return Err(NefError::InvalidDimension {
                name: name.to_string(),
                reason: "value count does not match input dimensionality",
            });
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(NefError::InvalidParameter(format!("non-finite value for '{}'", name)));
        }

        spec.function = InputFunction::Constant(values.to_vec());
        debug!(target: "nef-core", "input '{}' set to {:?}", name, values);
        Ok(())
    }

    /// Current output of an input node at time `t`.
    pub fn input_value(&self, name: &str, t: f64) -> NefResult<Vec<f64>> {
        let node = self.graph.node(name).ok_or_else(|| NefError::UnknownNode(name.to_string()))?;
        match &node.kind {
            NodeKind::Input(spec) => Ok(spec.function.value_at(t)),
            NodeKind::Population(_) => {
                Err(NefError::InvalidParameter(format!("'{}' is not an input", name)))
            }
        }
    }

    pub fn summary(&self) -> NetworkSummary {
        self.graph.summary()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.summary())
    }
}
