//! Nodes: populations of simulated units and function inputs.

use serde::{Deserialize, Serialize};

use crate::function::InputFunction;

/// Default output signal of a population.
pub const POPULATION_ORIGIN: &str = "X";
/// Default output signal of an input.
pub const INPUT_ORIGIN: &str = "origin";
/// Default input signal of a population.
pub const DEFAULT_TERMINATION: &str = "input";

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// How the engine should run a population.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulationMode {
    /// Full spiking simulation of every unit.
    #[default]
    Spiking,
    /// Rate-based approximation.
    Rate,
    /// Output computed analytically, units are not simulated.
    Direct,
}

/// Options for [`crate::Network::make`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PopulationOptions {
    pub mode: SimulationMode,
    /// Ask the engine for its faster, approximate construction path.
    pub quick: bool,
    /// Radius of the represented vector space.
    pub radius: f64,
}

impl Default for PopulationOptions {
    fn default() -> Self {
        Self { mode: SimulationMode::Spiking, quick: false, radius: 1.0 }
    }
}

impl PopulationOptions {
    pub fn direct() -> Self {
        Self { mode: SimulationMode::Direct, ..Self::default() }
    }

    pub fn with_mode(mut self, mode: SimulationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn quick(mut self, quick: bool) -> Self {
        self.quick = quick;
        self
    }

    pub fn radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PopulationSpec {
    pub units: usize,
    pub options: PopulationOptions,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputSpec {
    pub function: InputFunction,
    /// Controllable inputs may have their values replaced after finalize.
    pub controllable: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    Input(InputSpec),
    Population(PopulationSpec),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
    pub dimensions: usize,
    /// Named output signals.
    pub origins: Vec<String>,
    /// Named input signals.
    pub terminations: Vec<String>,
}

impl Node {
    pub(crate) fn population(
        id: NodeId,
        name: String,
        units: usize,
        dimensions: usize,
        options: PopulationOptions,
    ) -> Self {
        Self {
            id,
            name,
            kind: NodeKind::Population(PopulationSpec { units, options }),
            dimensions,
            origins: vec![POPULATION_ORIGIN.to_string()],
            terminations: vec![DEFAULT_TERMINATION.to_string()],
        }
    }

    pub(crate) fn input(
        id: NodeId,
        name: String,
        function: InputFunction,
        controllable: bool,
    ) -> Self {
        let dimensions = function.dimensions();
        Self {
            id,
            name,
            kind: NodeKind::Input(InputSpec { function, controllable }),
            dimensions,
            origins: vec![INPUT_ORIGIN.to_string()],
            terminations: Vec::new(),
        }
    }

    pub fn is_input(&self) -> bool {
        matches!(self.kind, NodeKind::Input(_))
    }

    pub fn is_population(&self) -> bool {
        matches!(self.kind, NodeKind::Population(_))
    }

    /// Number of simulated units; inputs have none.
    pub fn units(&self) -> usize {
        match &self.kind {
            NodeKind::Population(p) => p.units,
            NodeKind::Input(_) => 0,
        }
    }

    pub fn mode(&self) -> Option<SimulationMode> {
        match &self.kind {
            NodeKind::Population(p) => Some(p.options.mode),
            NodeKind::Input(_) => None,
        }
    }

    pub fn default_origin(&self) -> &str {
        match self.kind {
            NodeKind::Population(_) => POPULATION_ORIGIN,
            NodeKind::Input(_) => INPUT_ORIGIN,
        }
    }

    pub fn has_origin(&self, signal: &str) -> bool {
        self.origins.iter().any(|o| o == signal)
    }

    pub fn has_termination(&self, signal: &str) -> bool {
        self.terminations.iter().any(|t| t == signal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn population_defaults() {
        let n = Node::population(NodeId(0), "pre".into(), 60, 1, PopulationOptions::default());
        assert!(n.is_population());
        assert_eq!(n.units(), 60);
        assert_eq!(n.mode(), Some(SimulationMode::Spiking));
        assert_eq!(n.default_origin(), "X");
        assert!(n.has_termination("input"));
        assert!(!n.has_origin("error"));
    }

    #[test]
    fn input_takes_dimensions_from_function() {
        let n = Node::input(NodeId(3), "switch".into(), InputFunction::Constant(vec![0.0]), true);
        assert!(n.is_input());
        assert_eq!(n.dimensions, 1);
        assert_eq!(n.units(), 0);
        assert_eq!(n.mode(), None);
        assert_eq!(n.default_origin(), "origin");
        assert!(n.terminations.is_empty());
    }

    #[test]
    fn option_builders() {
        let o = PopulationOptions::direct().quick(true).radius(1.5);
        assert_eq!(o.mode, SimulationMode::Direct);
        assert!(o.quick);
        assert_eq!(o.radius, 1.5);
    }
}
