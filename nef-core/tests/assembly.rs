//! End-to-end assembly through the public API.

use nef_core::*;

#[test]
fn direct_mode_scenario() {
    let mut net = Network::new("Basal Ganglia");
    let input = net.make_input("input", vec![0.0; 5]).unwrap();
    let output = net
        .make("output", 1, 5, PopulationOptions::direct().quick(true))
        .unwrap();

    let c = net.connect("input", "output", ConnectOptions::default()).unwrap();
    assert_eq!(net.connections().len(), 1);
    let conn = &net.connections()[c.0 as usize];
    assert_eq!(conn.source.node, input);
    assert_eq!(conn.destination.node, output);
    assert_eq!(conn.weight, Weight::Identity);

    let handle = net.finalize().unwrap();
    assert_eq!(handle.name(), "Basal Ganglia");
    assert_eq!(handle.graph().len(), 2);
    assert_eq!(handle.graph().connections().len(), 1);
    assert_eq!(handle.graph().node("output").unwrap().mode(), Some(SimulationMode::Direct));
}

#[test]
fn mutation_after_finalize_fails() {
    struct Noop;
    impl CircuitTemplate for Noop {
        fn name(&self) -> &str {
            "noop"
        }
        fn build(&self, _net: &mut Network) -> NefResult<()> {
            Ok(())
        }
    }

    let mut net = Network::new("net");
    net.make("a", 10, 1, PopulationOptions::default()).unwrap();
    let _handle = net.finalize().unwrap();
    assert_eq!(net.state(), NetworkState::Finalized);

    assert!(matches!(net.make_input("i", vec![0.0]), Err(NefError::NetworkFinalized(_))));
    let late_make = net.make("b", 1, 1, PopulationOptions::default());
    assert!(matches!(late_make, Err(NefError::NetworkFinalized(_))));
    let late_connect = net.connect("a", "a", ConnectOptions::default());
    assert!(matches!(late_connect, Err(NefError::NetworkFinalized(_))));
    assert!(matches!(net.apply(&Noop), Err(NefError::NetworkFinalized(_))));
}

#[test]
fn learn_communication_wiring() {
    // Same shape as the supervised-learning demo, built by hand
    let mut net = Network::new("Learn Communication");
    let a = net.make("pre", 60, 1, PopulationOptions::default()).unwrap();
    let b = net.make("post", 60, 1, PopulationOptions::default()).unwrap();
    let noise = FourierFunction::white_noise(0.1, 10.0, 0.5, 12).unwrap();
    let input = net.add_function_input("input", InputFunction::Fourier(vec![noise])).unwrap();
    net.connect(input, a, ConnectOptions::default()).unwrap();

    net.make("error", 100, 1, PopulationOptions::default()).unwrap();
    net.connect("pre", "error", ConnectOptions::default()).unwrap();
    net.connect("post", "error", ConnectOptions::default().scalar(-1.0)).unwrap();

    let actual = net.make("actual error", 1, 1, PopulationOptions::direct()).unwrap();
    net.connect(a, actual, ConnectOptions::default()).unwrap();
    net.connect(b, actual, ConnectOptions::default().scalar(-1.0)).unwrap();

    let handle = net.finalize().unwrap();
    let summary = handle.summary();
    assert_eq!(summary.nodes.len(), 5);
    assert_eq!(summary.connections.len(), 5);
    assert_eq!(summary.connections[2].source, "post:X");
    assert_eq!(summary.connections[2].destination, "error:input");
    assert_eq!(summary.connections[2].weight, Weight::Scalar(-1.0));
    assert!(handle.controls().next().is_none());
}
