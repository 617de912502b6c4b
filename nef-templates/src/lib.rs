//! nef-templates: reusable circuits built on nef-core's public API
//!
//! - Gate: control population that inhibits a target through a "gate" termination
//! - Basal ganglia action selection
//! - Learned termination with an error pathway (feature "learning")
//! - The demo networks assembled from the above

pub mod basal_ganglia;
pub mod demos;
pub mod gate;
#[cfg(feature = "learning")]
pub mod learning;

// Re-exports
pub use basal_ganglia::{BasalGanglia, BasalGangliaWeights};
pub use gate::Gate;
#[cfg(feature = "learning")]
pub use learning::LearnedTermination;
