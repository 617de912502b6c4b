//! The two reference networks: basal ganglia action selection and a
//! learned communication channel. Both are returned unfinalized.

use nef_core::{NefResult, Network, PopulationOptions};
#[cfg(feature = "learning")]
use nef_core::{ConnectOptions, FourierFunction, InputFunction};
use tracing::info;

use crate::basal_ganglia::BasalGanglia;
#[cfg(feature = "learning")]
use crate::{gate::Gate, learning::LearnedTermination};

/// Seed of the white-noise input in the learning demo.
pub const NOISE_SEED: u64 = 12;
/// Seed of the learned connection's starting weights.
pub const WEIGHT_SEED: u64 = 27;

/// Controllable `dimensions`-D input selecting among actions, a direct-mode
/// output, and a basal ganglia with 50 units per action between them.
pub fn basal_ganglia(dimensions: usize) -> NefResult<Network> {
    let mut net = Network::new("Basal Ganglia");
    let input = net.make_input("input", vec![0.0; dimensions])?;
    let output = net.make("output", 1, dimensions, PopulationOptions::direct().quick(true))?;

    let bg = BasalGanglia::new("input", "output", dimensions)
        .neurons(50)
        .same_neurons(false);
    net.apply(&bg)?;

    info!(target: "nef-templates", "built '{}' ({:?} -> {:?})", net.name(), input, output);
    Ok(net)
}

/// `pre` learns to reproduce a white-noise signal in `post`, with a
/// switchable gate on the error population and a direct-mode readout of
/// the actual error.
#[cfg(feature = "learning")]
pub fn learn_communication(noise_seed: u64, weight_seed: u64) -> NefResult<Network> {
    const N: usize = 60;
    const D: usize = 1;

    let mut net = Network::new("Learn Communication");
    let a = net.make("pre", N, D, PopulationOptions::default())?;
    let b = net.make("post", N, D, PopulationOptions::default())?;

    let noise = FourierFunction::white_noise(0.1, 10.0, 0.5, noise_seed)?;
    let input = net.add_function_input("input", InputFunction::Fourier(vec![noise]))?;
    net.connect(input, a, ConnectOptions::default())?;

    net.apply(
        &LearnedTermination::new("pre", "post")
            .error_population("error", 100)
            .rate(5e-7)
            .seed(weight_seed),
    )?;
    net.connect("pre", "error", ConnectOptions::default())?;
    net.connect("post", "error", ConnectOptions::default().scalar(-1.0))?;

    net.make_input("switch", vec![0.0])?;
    net.apply(&Gate::new("Gate", "error").neurons(40).pstc(0.01))?;
    net.connect("switch", "Gate", ConnectOptions::default())?;

    let actual = net.make("actual error", 1, 1, PopulationOptions::direct())?;
    net.connect(a, actual, ConnectOptions::default())?;
    net.connect(b, actual, ConnectOptions::default().scalar(-1.0))?;

    info!(target: "nef-templates", "built '{}' with {} nodes", net.name(), net.len());
    Ok(net)
}
