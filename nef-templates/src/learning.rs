//! Learned termination (feature "learning").
//!
//! Declares a `pre -> post` connection whose weights the engine adapts,
//! driven by an error population feeding a modulatory `"error"` termination
//! on `post`. The learning rule itself runs inside the engine; this template
//! only records the rate and seeds the starting weights.

use nef_core::{
    CircuitTemplate, ConnectOptions, EndpointRef, NefError, NefResult, Network, PopulationOptions,
    Weight,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Modulatory termination added to the post population.
pub const ERROR_TERMINATION: &str = "error";

/// Bound of the uniform distribution initial weights are drawn from.
pub const INITIAL_WEIGHT_SCALE: f64 = 1e-3;

#[derive(Clone, Debug, PartialEq)]
pub struct LearnedTermination {
    pub err_name: String,
    pub n_err: usize,
    pub pre: String,
    pub post: String,
    pub rate: f64,
    pub seed: u64,
}

impl LearnedTermination {
    pub fn new(pre: impl Into<String>, post: impl Into<String>) -> Self {
        Self {
            err_name: "error".to_string(),
            n_err: 100,
            pre: pre.into(),
            post: post.into(),
            rate: 5e-7,
            seed: 0,
        }
    }

    pub fn error_population(mut self, name: impl Into<String>, neurons: usize) -> Self {
        self.err_name = name.into();
        self.n_err = neurons;
        self
    }

    pub fn rate(mut self, rate: f64) -> Self {
        self.rate = rate;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Starting weights, `post_dims × pre_dims`, reproducible from `seed`.
    pub fn initial_weights(&self, pre_dims: usize, post_dims: usize) -> Weight {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let rows = (0..post_dims)
            .map(|_| {
                (0..pre_dims)
                    .map(|_| rng.gen_range(-INITIAL_WEIGHT_SCALE..=INITIAL_WEIGHT_SCALE))
                    .collect()
            })
            .collect();
        Weight::Matrix(rows)
    }
}

impl CircuitTemplate for LearnedTermination {
    fn name(&self) -> &str {
        "learned termination"
    }

    fn build(&self, net: &mut Network) -> NefResult<()> {
        if !(self.rate >= 0.0 && self.rate.is_finite()) {
            return Err(NefError::InvalidParameter(format!(
                "learning rate must be >= 0, got {}",
                self.rate
            )));
        }
        let dims = |net: &Network, name: &str| {
            net.node(name)
                .map(|n| n.dimensions)
                .ok_or_else(|| NefError::UnknownNode(name.to_string()))
        };
        let pre_dims = dims(net, &self.pre)?;
        let post_dims = dims(net, &self.post)?;
        if net.node(&self.post).is_some_and(|n| n.is_input()) {
            return Err(NefError::UnknownSignal {
                node: self.post.clone(),
                signal: ERROR_TERMINATION.to_string(),
            });
        }

        net.make(&self.err_name, self.n_err, post_dims, PopulationOptions::default())?;
        net.declare_termination(self.post.as_str(), ERROR_TERMINATION)?;
        net.connect(
            self.pre.as_str(),
            self.post.as_str(),
            ConnectOptions::default()
                .weight(self.initial_weights(pre_dims, post_dims))
                .learned(self.rate),
        )?;
        net.connect(
            self.err_name.as_str(),
            EndpointRef::signal(self.post.as_str(), ERROR_TERMINATION),
            ConnectOptions::default().modulatory(),
        )?;
        debug!(
            target: "nef-templates",
            "learned termination {} -> {} (error '{}', rate {})",
            self.pre, self.post, self.err_name, self.rate
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pre_post(net: &mut Network) {
        net.make("pre", 60, 1, PopulationOptions::default()).unwrap();
        net.make("post", 60, 1, PopulationOptions::default()).unwrap();
    }

    #[test]
    fn builds_error_pathway() {
        let mut net = Network::new("net");
        pre_post(&mut net);
        let t = LearnedTermination::new("pre", "post")
            .error_population("error", 100)
            .rate(5e-7)
            .seed(27);
        let out = net.apply(&t).unwrap();
        assert_eq!(out.nodes.len(), 1);
        assert_eq!(out.connections.len(), 2);

        let error = net.node("error").unwrap();
        assert_eq!(error.units(), 100);
        assert_eq!(error.dimensions, 1);

        let learned = &net.connections()[0];
        assert_eq!(learned.learning_rate, Some(5e-7));
        assert!(!learned.modulatory);
        match &learned.weight {
            Weight::Matrix(rows) => {
                assert_eq!(rows.len(), 1);
                assert!(rows[0][0].abs() <= INITIAL_WEIGHT_SCALE);
            }
            other => panic!("expected matrix weight, got {:?}", other),
        }

        let teach = &net.connections()[1];
        assert!(teach.modulatory);
        assert_eq!(teach.destination.signal, ERROR_TERMINATION);
    }

    #[test]
    fn initial_weights_follow_seed() {
        let t = LearnedTermination::new("pre", "post").seed(27);
        assert_eq!(t.initial_weights(3, 2), t.initial_weights(3, 2));
        assert_ne!(t.initial_weights(3, 2), t.clone().seed(28).initial_weights(3, 2));
        assert!(t.initial_weights(3, 2).check_shape(3, 2).is_ok());
    }

    #[test]
    fn unknown_post_fails_like_direct_call() {
        let mut net = Network::new("net");
        net.make("pre", 60, 1, PopulationOptions::default()).unwrap();
        let err = net.apply(&LearnedTermination::new("pre", "post")).unwrap_err();
        assert_eq!(err, NefError::UnknownNode("post".into()));
    }

    #[test]
    fn negative_rate_is_rejected() {
        let mut net = Network::new("net");
        pre_post(&mut net);
        let err = net.apply(&LearnedTermination::new("pre", "post").rate(-1.0)).unwrap_err();
        assert!(matches!(err, NefError::InvalidParameter(_)));
        assert_eq!(net.len(), 2);
        assert!(!net.node("post").unwrap().has_termination(ERROR_TERMINATION));

        // Nothing was left behind, so a corrected retry goes through
        let out = net.apply(&LearnedTermination::new("pre", "post").rate(5e-7)).unwrap();
        assert_eq!(out.nodes.len(), 1);
        assert_eq!(out.connections.len(), 2);
    }

    #[test]
    fn input_cannot_be_post() {
        let mut net = Network::new("net");
        net.make("pre", 60, 1, PopulationOptions::default()).unwrap();
        net.make_input("post", vec![0.0]).unwrap();
        let err = net.apply(&LearnedTermination::new("pre", "post")).unwrap_err();
        assert!(matches!(err, NefError::UnknownSignal { .. }));
        assert_eq!(net.len(), 2);
    }
}
