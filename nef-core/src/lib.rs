//! nef-core: builder for networks of neural populations, inputs and connections.
//!
//! A [`Network`] is assembled through validated calls (`make_input`, `make`,
//! `connect`, `apply`) and then handed to an execution engine with
//! [`Network::finalize`]. Neuron dynamics, weight solving and learning rules are
//! the engine's business; this crate only builds and checks the graph.

pub mod connection;
pub mod error;
pub mod function;
pub mod graph;
pub mod network;
pub mod node;
pub mod runtime;
pub mod template;

// Re-exports
pub use connection::{
    ConnectOptions, Connection, ConnectionId, Endpoint, EndpointRef, Weight, DEFAULT_PSTC,
};
pub use error::{NefError, NefResult};
pub use function::{FourierFunction, InputFunction, MAX_COMPONENTS};
pub use graph::{Graph, NetworkSummary};
pub use network::{Network, NetworkState};
pub use node::{Node, NodeId, NodeKind, PopulationOptions, SimulationMode};
pub use runtime::RuntimeHandle;
pub use template::{CircuitTemplate, TemplateOutput};
