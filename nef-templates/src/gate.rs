//! Gate: a control population that can shut off another population.

use nef_core::{
    CircuitTemplate, ConnectOptions, EndpointRef, NefError, NefResult, Network, PopulationOptions,
    Weight, DEFAULT_PSTC,
};
use tracing::debug;

/// Termination added to the gated population.
pub const GATE_TERMINATION: &str = "gate";

/// Inhibitory strength from the gate onto the gated population.
pub const GATE_INHIBITION: f64 = -10.0;

/// Adds a 1-D population `name` whose activity inhibits `gated` through a
/// dedicated `"gate"` termination.
#[derive(Clone, Debug, PartialEq)]
pub struct Gate {
    pub name: String,
    pub gated: String,
    pub neurons: usize,
    pub pstc: f64,
}

impl Gate {
    pub fn new(name: impl Into<String>, gated: impl Into<String>) -> Self {
        Self { name: name.into(), gated: gated.into(), neurons: 40, pstc: DEFAULT_PSTC }
    }

    pub fn neurons(mut self, neurons: usize) -> Self {
        self.neurons = neurons;
        self
    }

    pub fn pstc(mut self, pstc: f64) -> Self {
        self.pstc = pstc;
        self
    }
}

impl CircuitTemplate for Gate {
    fn name(&self) -> &str {
        "gate"
    }

    fn build(&self, net: &mut Network) -> NefResult<()> {
        let gated = net
            .node(&self.gated)
            .ok_or_else(|| NefError::UnknownNode(self.gated.clone()))?;
        if gated.is_input() {
            return Err(NefError::UnknownSignal {
                node: self.gated.clone(),
                signal: GATE_TERMINATION.to_string(),
            });
        }
        let gated_dims = gated.dimensions;

        net.make(&self.name, self.neurons, 1, PopulationOptions::default())?;
        net.declare_termination(self.gated.as_str(), GATE_TERMINATION)?;
        net.connect(
            self.name.as_str(),
            EndpointRef::signal(self.gated.as_str(), GATE_TERMINATION),
            ConnectOptions::default()
                .weight(Weight::filled(gated_dims, 1, GATE_INHIBITION))
                .pstc(self.pstc),
        )?;
        debug!(target: "nef-templates", "gate '{}' on '{}'", self.name, self.gated);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nef_core::NodeId;

    #[test]
    fn gate_adds_population_and_inhibitory_connection() {
        let mut net = Network::new("net");
        let error = net.make("error", 100, 2, PopulationOptions::default()).unwrap();
        let out = net.apply(&Gate::new("Gate", "error").pstc(0.01)).unwrap();

        assert_eq!(out.nodes, vec![NodeId(1)]);
        assert_eq!(out.connections.len(), 1);
        let gate = net.node("Gate").unwrap();
        assert_eq!(gate.units(), 40);
        assert_eq!(gate.dimensions, 1);
        assert!(net.node("error").unwrap().has_termination(GATE_TERMINATION));

        let c = &net.connections()[0];
        assert_eq!(c.destination.node, error);
        assert_eq!(c.destination.signal, "gate");
        assert_eq!(c.weight, Weight::filled(2, 1, -10.0));
        assert_eq!(c.pstc, 0.01);
    }

    #[test]
    fn missing_gated_population_adds_nothing() {
        let mut net = Network::new("net");
        let err = net.apply(&Gate::new("Gate", "error")).unwrap_err();
        assert_eq!(err, NefError::UnknownNode("error".into()));
        assert!(net.is_empty());
    }

    #[test]
    fn inputs_cannot_be_gated() {
        let mut net = Network::new("net");
        net.make_input("switch", vec![0.0]).unwrap();
        let err = net.apply(&Gate::new("Gate", "switch")).unwrap_err();
        assert_eq!(
            err,
            NefError::UnknownSignal { node: "switch".into(), signal: GATE_TERMINATION.into() }
        );
        assert_eq!(net.len(), 1);
        assert!(net.connections().is_empty());
        assert!(net.node("switch").unwrap().terminations.is_empty());
    }

    #[test]
    fn gate_name_collision() {
        let mut net = Network::new("net");
        net.make("error", 100, 1, PopulationOptions::default()).unwrap();
        net.make("Gate", 10, 1, PopulationOptions::default()).unwrap();
        let err = net.apply(&Gate::new("Gate", "error")).unwrap_err();
        assert!(matches!(err, NefError::DuplicateName { .. }));
    }
}
