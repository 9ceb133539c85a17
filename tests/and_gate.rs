use shape_mlp::{Dataset, Network, Topology};

fn and_gate() -> Dataset {
    let xs = vec![
        vec![0.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 0.0],
        vec![1.0, 1.0],
    ];
    let ys = vec![vec![0.0], vec![0.0], vec![0.0], vec![1.0]];
    Dataset::from_rows(&xs, &ys).unwrap()
}

#[test]
fn learns_logical_and_with_online_gradient_descent() {
    let data = and_gate();
    let topology = Topology::new(2, 3, 3, 1).unwrap();
    let mut net = Network::new_with_seed(topology, 0.1, 0).unwrap();
    let mut trainer = net.trainer();

    let mut mse = net.evaluate_mse(&data).unwrap();
    let mut epochs = 0;
    while mse >= 0.01 && epochs < 100_000 {
        for idx in 0..data.len() {
            net.train_with(data.input(idx), data.target(idx), &mut trainer)
                .unwrap();
        }
        epochs += 1;
        mse = net.evaluate_mse(&data).unwrap();
    }

    assert!(mse < 0.01, "mse {mse} after {epochs} epochs");

    let high = net.forward(&[1.0, 1.0]).unwrap()[0];
    let low = net.forward(&[0.0, 0.0]).unwrap()[0];
    assert!(
        (1.0 - high).abs() < (1.0 - low).abs(),
        "high={high} low={low}"
    );
    assert!(high > 0.5 && low < 0.5, "high={high} low={low}");
}

#[test]
fn fit_reaches_target_error_on_and() {
    let data = and_gate();
    let topology = Topology::new(2, 3, 3, 1).unwrap();
    let mut net = Network::new_with_seed(topology, 0.1, 1).unwrap();

    let report = net
        .fit(
            &data,
            shape_mlp::FitConfig {
                max_epochs: 100_000,
                target_error: 0.02,
                log_every: 0,
            },
        )
        .unwrap();

    assert!(report.converged, "stopped at {report:?}");
    assert!(report.final_error <= 0.02);
    assert!(report.epochs < 100_000);
}
