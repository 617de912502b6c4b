//! Basal ganglia action selection circuit.
//!
//! Five populations (striatum D1/D2, subthalamic nucleus, globus pallidus
//! internal/external), one dimension per action, wired with the
//! Gurney-Prescott-Redgrave connection pattern. Excitatory projections use an
//! AMPA time constant, inhibitory ones a GABA time constant.

use nef_core::{
    CircuitTemplate, ConnectOptions, NefError, NefResult, Network, PopulationOptions, Weight,
};
use tracing::debug;

pub const STR_D1: &str = "StrD1";
pub const STR_D2: &str = "StrD2";
pub const STN: &str = "STN";
pub const GPI: &str = "GPi";
pub const GPE: &str = "GPe";

/// Connection strengths of the model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BasalGangliaWeights {
    /// input -> striatum
    pub ws: f64,
    /// input -> STN
    pub wt: f64,
    /// striatum -> GPi / GPe
    pub wm: f64,
    /// GPe -> GPi / STN
    pub wg: f64,
    /// STN -> GPi (diffuse)
    pub wp: f64,
    /// STN -> GPe (diffuse)
    pub we: f64,
    /// D1 gain boost
    pub lg: f64,
    /// D2 gain cut
    pub le: f64,
}

impl Default for BasalGangliaWeights {
    fn default() -> Self {
        Self { ws: 1.0, wt: 1.0, wm: 1.0, wg: 1.0, wp: 0.9, we: 0.3, lg: 0.2, le: 0.2 }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BasalGanglia {
    pub input: String,
    pub output: String,
    pub dimensions: usize,
    /// Units per action.
    pub neurons: usize,
    /// Share unit parameters across actions (maps to the quick construction path).
    pub same_neurons: bool,
    pub tau_ampa: f64,
    pub tau_gaba: f64,
    pub weights: BasalGangliaWeights,
}

impl BasalGanglia {
    pub fn new(input: impl Into<String>, output: impl Into<String>, dimensions: usize) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            dimensions,
            neurons: 100,
            same_neurons: true,
            tau_ampa: 0.002,
            tau_gaba: 0.008,
            weights: BasalGangliaWeights::default(),
        }
    }

    pub fn neurons(mut self, neurons: usize) -> Self {
        self.neurons = neurons;
        self
    }

    pub fn same_neurons(mut self, same: bool) -> Self {
        self.same_neurons = same;
        self
    }
}

impl CircuitTemplate for BasalGanglia {
    fn name(&self) -> &str {
        "basal ganglia"
    }

    fn build(&self, net: &mut Network) -> NefResult<()> {
        let d = self.dimensions;
        for (endpoint, into_nuclei) in [(&self.input, true), (&self.output, false)] {
            let node = net
                .node(endpoint)
                .ok_or_else(|| NefError::UnknownNode(endpoint.clone()))?;
            if !into_nuclei && node.is_input() {
                return Err(NefError::UnknownSignal {
                    node: endpoint.clone(),
                    signal: nef_core::node::DEFAULT_TERMINATION.to_string(),
                });
            }
            // The nuclei are d-dimensional on both sides; d == 0 is left to `make`
            let (from, to) = if into_nuclei { (node.dimensions, d) } else { (d, node.dimensions) };
            if d > 0 {
                Weight::Identity.check_shape(from, to)?;
            }
        }
        let units = self.neurons.saturating_mul(d);
        let options = PopulationOptions::default().quick(self.same_neurons);
        for name in [STR_D1, STR_D2, STN, GPI, GPE] {
            net.make(name, units, d, options)?;
        }

        let w = self.weights;
        let ampa = |weight: Weight| ConnectOptions::default().weight(weight).pstc(self.tau_ampa);
        let gaba = |weight: Weight| ConnectOptions::default().weight(weight).pstc(self.tau_gaba);

        let input = self.input.as_str();
        net.connect(input, STR_D1, ampa(Weight::Scalar(w.ws * (1.0 + w.lg))))?;
        net.connect(input, STR_D2, ampa(Weight::Scalar(w.ws * (1.0 - w.le))))?;
        net.connect(input, STN, ampa(Weight::Scalar(w.wt)))?;

        net.connect(STR_D1, GPI, gaba(Weight::Scalar(-w.wm)))?;
        net.connect(STR_D2, GPE, gaba(Weight::Scalar(-w.wm)))?;

        // STN excitation is diffuse: every action drives every channel
        net.connect(STN, GPI, ampa(Weight::filled(d, d, w.wp)))?;
        net.connect(STN, GPE, ampa(Weight::filled(d, d, w.we)))?;

        net.connect(GPE, GPI, gaba(Weight::Scalar(-w.wg)))?;
        net.connect(GPE, STN, gaba(Weight::Scalar(-w.wg)))?;

        net.connect(GPI, self.output.as_str(), gaba(Weight::Identity))?;

        debug!(target: "nef-templates", "basal ganglia with {} actions, {} units each", d, units);
        Ok(())
    }
}
