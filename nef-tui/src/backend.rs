// Backend abstraction for the TUI so an engine can stand behind the same view.

use nef_core::{NefResult, NodeKind, RuntimeHandle};

/// One probed signal: a single dimension of an input node.
#[derive(Clone, Debug, PartialEq)]
pub struct Probe {
    pub node: String,
    pub dim: usize,
}

/// Common interface for anything holding a finalized network the TUI can show.
pub trait NetworkBackend {
    /// The finalized network.
    fn handle(&self) -> &RuntimeHandle;

    /// Signals shown as rows in the trace view.
    fn probes(&self) -> &[Probe];

    /// Value of every probe at time `t`, in `probes()` order.
    fn sample(&self, t: f64) -> Vec<f64>;

    /// Replace a controllable input's values.
    fn set_control(&mut self, name: &str, values: &[f64]) -> NefResult<()>;

    /// Names of controllable inputs.
    fn controls(&self) -> Vec<String> {
        self.handle().controls().map(|n| n.name.clone()).collect()
    }
}

/// Backend reading inputs straight from the runtime handle.
pub struct HandleBackend {
    handle: RuntimeHandle,
    probes: Vec<Probe>,
}

impl HandleBackend {
    pub fn new(handle: RuntimeHandle) -> Self {
        let probes = handle
            .graph()
            .nodes()
            .iter()
            .filter(|n| matches!(n.kind, NodeKind::Input(_)))
            .flat_map(|n| (0..n.dimensions).map(move |dim| Probe { node: n.name.clone(), dim }))
            .collect();
        Self { handle, probes }
    }
}

impl NetworkBackend for HandleBackend {
    fn handle(&self) -> &RuntimeHandle {
        &self.handle
    }

    fn probes(&self) -> &[Probe] {
        &self.probes
    }

    fn sample(&self, t: f64) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.probes.len());
        let mut cached: Option<(&str, Vec<f64>)> = None;
        for p in &self.probes {
            // Probes of one node are adjacent; evaluate each node once
            let fresh = !matches!(&cached, Some((name, _)) if *name == p.node);
            if fresh {
                let values = self.handle.input_value(&p.node, t).unwrap_or_default();
                cached = Some((p.node.as_str(), values));
            }
            let v = cached
                .as_ref()
                .and_then(|(_, values)| values.get(p.dim).copied())
                .unwrap_or(0.0);
            out.push(v);
        }
        out
    }

    fn set_control(&mut self, name: &str, values: &[f64]) -> NefResult<()> {
        self.handle.set_input(name, values)
    }
}
