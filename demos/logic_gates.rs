use shape_mlp::{Dataset, FitConfig, Network, Topology};

fn main() -> shape_mlp::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let xs = vec![
        vec![0.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 0.0],
        vec![1.0, 1.0],
    ];

    for (name, ys) in [
        ("and", [0.0, 0.0, 0.0, 1.0]),
        ("or", [0.0, 1.0, 1.0, 1.0]),
    ] {
        let ys: Vec<Vec<f64>> = ys.iter().map(|&y| vec![y]).collect();
        let train = Dataset::from_rows(&xs, &ys)?;

        // 2 -> 3 -> 3 -> 3 -> 1 network.
        let mut net = Network::new_with_seed(Topology::new(2, 3, 3, 1)?, 0.1, 0)?;
        let report = net.fit(
            &train,
            FitConfig {
                max_epochs: 100_000,
                target_error: 0.01,
                log_every: 10_000,
            },
        )?;

        println!(
            "{name}: epochs={} error={:.5} mse={:.5}",
            report.epochs,
            report.final_error,
            net.evaluate_mse(&train)?
        );
        for x in &xs {
            println!("  x={x:?} y={:.4}", net.forward(x)?[0]);
        }
    }

    Ok(())
}
