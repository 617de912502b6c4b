//! Network builder: validates every node and connection as it is declared,
//! then hands the finished graph to a [`RuntimeHandle`].
//!
//! Semantics:
//! - Node names are unique per network; ids are dense and follow insertion order.
//! - Both endpoints of a connection must already exist when it is declared.
//! - `finalize()` moves the graph out; afterwards every mutating call fails
//!   with [`NefError::NetworkFinalized`].

use tracing::{debug, info, warn};

use crate::connection::{ConnectOptions, Connection, ConnectionId, Endpoint, EndpointRef};
use crate::error::{NefError, NefResult};
use crate::function::InputFunction;
use crate::graph::Graph;
use crate::node::{Node, NodeId, PopulationOptions};
use crate::runtime::RuntimeHandle;
use crate::template::{CircuitTemplate, TemplateOutput};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NetworkState {
    Building,
    Finalized,
}

#[derive(Debug)]
pub struct Network {
    graph: Graph,
    name: String,
    state: NetworkState,
}

impl Network {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        debug!(target: "nef-core", "created network '{}'", name);
        Self { graph: Graph::new(name.clone()), name, state: NetworkState::Building }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> NetworkState {
        self.state
    }

    pub fn is_finalized(&self) -> bool {
        self.state == NetworkState::Finalized
    }

    /// The graph assembled so far. Empty once finalized.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn node(&self, name: &str) -> Option<&Node> {
        self.graph.node(name)
    }

    pub fn node_by_id(&self, id: NodeId) -> Option<&Node> {
        self.graph.node_by_id(id)
    }

    pub fn nodes(&self) -> &[Node] {
        self.graph.nodes()
    }

    pub fn connections(&self) -> &[Connection] {
        self.graph.connections()
    }

    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// Add a controllable constant input; `values` fixes its dimensionality.
    pub fn make_input(&mut self, name: &str, values: impl Into<Vec<f64>>) -> NefResult<NodeId> {
        let r = self.add_input_node(name, InputFunction::Constant(values.into()), true);
        self.logged("make_input", r)
    }

    /// Add a fixed (non-controllable) function input.
    pub fn add_function_input(&mut self, name: &str, function: InputFunction) -> NefResult<NodeId> {
        let r = self.add_input_node(name, function, false);
        self.logged("add_function_input", r)
    }

    /// Add a population of `units` simulated units representing a `dimensions`-vector.
    pub fn make(
        &mut self,
        name: &str,
        units: usize,
        dimensions: usize,
        options: PopulationOptions,
    ) -> NefResult<NodeId> {
        let r = self.add_population_node(name, units, dimensions, options);
        self.logged("make", r)
    }

    /// Declare an extra named output signal on an existing node. Re-declaring is a no-op.
    pub fn declare_origin(&mut self, node: impl Into<EndpointRef>, signal: &str) -> NefResult<()> {
        let r = self.declare_signal(node.into(), signal, true);
        self.logged("declare_origin", r)
    }

    /// Declare an extra named input signal on an existing node. Re-declaring is a no-op.
    /// Inputs have no terminations, so declaring one on an input fails.
    pub fn declare_termination(
        &mut self,
        node: impl Into<EndpointRef>,
        signal: &str,
    ) -> NefResult<()> {
        let r = self.declare_signal(node.into(), signal, false);
        self.logged("declare_termination", r)
    }

    /// Connect `source` to `destination`. Each call adds a distinct connection,
    /// even between an already connected pair.
    pub fn connect(
        &mut self,
        source: impl Into<EndpointRef>,
        destination: impl Into<EndpointRef>,
        options: ConnectOptions,
    ) -> NefResult<ConnectionId> {
        let r = self.add_connection(source.into(), destination.into(), options);
        self.logged("connect", r)
    }

    /// Run a reusable sub-circuit against this network. The template goes
    /// through the same public calls as any other caller.
    pub fn apply<T: CircuitTemplate + ?Sized>(
        &mut self,
        template: &T,
    ) -> NefResult<TemplateOutput> {
        let r = self.ensure_building();
        self.logged("apply", r)?;

        let first_node = self.graph.len();
        let first_connection = self.graph.connections().len();
        template.build(self)?;

        let output = TemplateOutput {
            nodes: self.graph.nodes()[first_node..].iter().map(|n| n.id).collect(),
            connections: self.graph.connections()[first_connection..]
                .iter()
                .map(|c| c.id)
                .collect(),
        };
        info!(
            target: "nef-core",
            "template '{}' added {} nodes and {} connections to '{}'",
            template.name(),
            output.nodes.len(),
            output.connections.len(),
            self.name
        );
        Ok(output)
    }

    /// Hand the graph to the runtime. The network keeps its name and state only.
    pub fn finalize(&mut self) -> NefResult<RuntimeHandle> {
        let r = self.ensure_building();
        self.logged("finalize", r)?;

        let graph = core::mem::replace(&mut self.graph, Graph::new(self.name.clone()));
        self.state = NetworkState::Finalized;
        info!(
            target: "nef-core",
            "finalized '{}': {} nodes, {} connections",
            self.name,
            graph.len(),
            graph.connections().len()
        );
        Ok(RuntimeHandle::new(graph))
    }

    /// Resolve a caller reference to a node id.
    pub fn resolve(&self, endpoint: &EndpointRef) -> NefResult<NodeId> {
        match endpoint {
            EndpointRef::Id(id, _) => self
                .graph
                .node_by_id(*id)
                .map(|n| n.id)
                .ok_or_else(|| NefError::UnknownNode(format!("#{}", id.0))),
            EndpointRef::Name(name, _) => self
                .graph
                .node(name)
                .map(|n| n.id)
                .ok_or_else(|| NefError::UnknownNode(name.clone())),
        }
    }

    fn logged<T>(&self, op: &str, result: NefResult<T>) -> NefResult<T> {
        if let Err(e) = &result {
            warn!(target: "nef-core", "{} rejected on '{}': {}", op, self.name, e);
        }
        result
    }

    fn ensure_building(&self) -> NefResult<()> {
        match self.state {
            NetworkState::Building => Ok(()),
            NetworkState::Finalized => Err(NefError::NetworkFinalized(self.name.clone())),
        }
    }

    fn ensure_unique(&self, name: &str) -> NefResult<()> {
        if self.graph.contains(name) {
            return Err(NefError::DuplicateName {
                network: self.name.clone(),
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn add_input_node(
        &mut self,
        name: &str,
        function: InputFunction,
        controllable: bool,
    ) -> NefResult<NodeId> {
        self.ensure_building()?;
        self.ensure_unique(name)?;
        if function.dimensions() == 0 {
            return Err(NefError::InvalidDimension {
                name: name.to_string(),
                reason: "input has no values",
            });
        }

        let node = Node::input(self.graph.next_node_id(), name.to_string(), function, controllable);
        debug!(target: "nef-core", "  + input '{}' ({}-D)", name, node.dimensions);
        Ok(self.graph.push_node(node))
    }

    fn add_population_node(
        &mut self,
        name: &str,
        units: usize,
        dimensions: usize,
        options: PopulationOptions,
    ) -> NefResult<NodeId> {
        self.ensure_building()?;
        self.ensure_unique(name)?;
        if units == 0 {
            return Err(NefError::InvalidDimension {
                name: name.to_string(),
                reason: "unit count must be positive",
            });
        }
        if dimensions == 0 {
            return Err(NefError::InvalidDimension {
                name: name.to_string(),
                reason: "dimensionality must be positive",
            });
        }
        if !(options.radius > 0.0 && options.radius.is_finite()) {
            return Err(NefError::InvalidParameter(format!(
                "radius of '{}' must be positive",
                name
            )));
        }

        let id = self.graph.next_node_id();
        let node = Node::population(id, name.to_string(), units, dimensions, options);
        debug!(
            target: "nef-core",
            "  + population '{}' ({} units, {}-D, {:?})",
            name, units, dimensions, options.mode
        );
        Ok(self.graph.push_node(node))
    }

    fn declare_signal(&mut self, node: EndpointRef, signal: &str, origin: bool) -> NefResult<()> {
        self.ensure_building()?;
        let id = self.resolve(&node)?;
        if let Some(n) = self.graph.node_mut(id) {
            // Inputs only emit; they have nothing to terminate on
            if !origin && n.is_input() {
                return Err(NefError::UnknownSignal {
                    node: n.name.clone(),
                    signal: signal.to_string(),
                });
            }
            let list = if origin { &mut n.origins } else { &mut n.terminations };
            if !list.iter().any(|s| s == signal) {
                list.push(signal.to_string());
            }
        }
        Ok(())
    }

    fn add_connection(
        &mut self,
        source: EndpointRef,
        destination: EndpointRef,
        options: ConnectOptions,
    ) -> NefResult<ConnectionId> {
        self.ensure_building()?;
        let src_id = self.resolve(&source)?;
        let dst_id = self.resolve(&destination)?;
        let src = self
            .graph
            .node_by_id(src_id)
            .ok_or_else(|| NefError::UnknownNode(format!("#{}", src_id.0)))?;
        let dst = self
            .graph
            .node_by_id(dst_id)
            .ok_or_else(|| NefError::UnknownNode(format!("#{}", dst_id.0)))?;

        let origin = source.signal_name().unwrap_or(src.default_origin()).to_string();
        if !src.has_origin(&origin) {
            return Err(NefError::UnknownSignal { node: src.name.clone(), signal: origin });
        }
        let termination = destination
            .signal_name()
            .unwrap_or(crate::node::DEFAULT_TERMINATION)
            .to_string();
        if !dst.has_termination(&termination) {
            return Err(NefError::UnknownSignal { node: dst.name.clone(), signal: termination });
        }

        options.validate()?;
        options.weight.check_shape(src.dimensions, dst.dimensions)?;

        debug!(
            target: "nef-core",
            "  + {}:{} -> {}:{} (pstc {})",
            src.name, origin, dst.name, termination, options.pstc
        );
        let connection = Connection {
            id: self.graph.next_connection_id(),
            source: Endpoint { node: src_id, signal: origin },
            destination: Endpoint { node: dst_id, signal: termination },
            weight: options.weight,
            pstc: options.pstc,
            modulatory: options.modulatory,
            learning_rate: options.learning_rate,
        };
        Ok(self.graph.push_connection(connection))
    }
}
