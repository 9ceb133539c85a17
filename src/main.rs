use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, Subcommand};
use log::{error, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use shape_mlp::report::render_grid;
use shape_mlp::{
    ConfusionMatrix, DEFAULT_LEARNING_RATE, Dataset, FitConfig, Network, Shape, Topology, data,
};

#[derive(Parser)]
#[command(name = "shape-mlp")]
#[command(about = "Train and run a small sigmoid MLP on binary pixel-grid shapes")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a network on every sample file in a folder and save it
    Train {
        /// Folder of labelled sample files
        train_folder: PathBuf,
        /// Pixels per sample
        inputs: usize,
        /// Hidden layers before the output layer (0 behaves like 1)
        hidden_layers: usize,
        /// Neurons per hidden layer
        neurons_per_layer: usize,
        /// Output classes
        outputs: usize,
        /// Where to write the trained model
        #[arg(long, default_value = "model.txt")]
        model: PathBuf,
        #[arg(long, default_value_t = DEFAULT_LEARNING_RATE)]
        learning_rate: f64,
        #[arg(long, default_value_t = FitConfig::default().max_epochs)]
        max_epochs: usize,
        #[arg(long, default_value_t = FitConfig::default().target_error)]
        target_error: f64,
        /// Log progress every N epochs (0 disables)
        #[arg(long, default_value_t = FitConfig::default().log_every)]
        log_every: usize,
        /// Seed for weight initialization (random when omitted)
        #[arg(long)]
        seed: Option<u64>,
        /// Folder of held-out samples to report a confusion matrix on
        #[arg(long)]
        eval: Option<PathBuf>,
    },
    /// Classify a single sample file with a saved model
    Predict {
        /// Model file written by `train`
        model_file: PathBuf,
        /// Sample file (its label line is ignored)
        input_file: PathBuf,
        /// Minimum activation to accept the winning class
        #[arg(long, default_value_t = 0.8)]
        threshold: f64,
        /// Print the input grid before the prediction
        #[arg(long)]
        show: bool,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Usage errors exit with 1; --help / --version exit with 0.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    let result = match cli.command {
        Commands::Train {
            train_folder,
            inputs,
            hidden_layers,
            neurons_per_layer,
            outputs,
            model,
            learning_rate,
            max_epochs,
            target_error,
            log_every,
            seed,
            eval,
        } => Topology::new(inputs, hidden_layers, neurons_per_layer, outputs).and_then(|t| {
            let cfg = FitConfig {
                max_epochs,
                target_error,
                log_every,
            };
            train(TrainArgs {
                train_folder: &train_folder,
                topology: t,
                model: &model,
                learning_rate,
                cfg,
                seed,
                eval: eval.as_deref(),
            })
        }),
        Commands::Predict {
            model_file,
            input_file,
            threshold,
            show,
        } => predict(&model_file, &input_file, threshold, show),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

struct TrainArgs<'a> {
    train_folder: &'a Path,
    topology: Topology,
    model: &'a Path,
    learning_rate: f64,
    cfg: FitConfig,
    seed: Option<u64>,
    eval: Option<&'a Path>,
}

fn load_dataset(folder: &Path) -> shape_mlp::Result<Dataset> {
    let samples = data::load_samples_from_dir(folder)?;
    if samples.is_empty() {
        return Err(shape_mlp::Error::InvalidData(format!(
            "no samples in {}",
            folder.display()
        )));
    }
    info!("loaded {} samples from {}", samples.len(), folder.display());
    Dataset::from_samples(&samples)
}

fn train(args: TrainArgs<'_>) -> shape_mlp::Result<()> {
    let dataset = load_dataset(args.train_folder)?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut net = Network::new_with_rng(args.topology, args.learning_rate, &mut rng)?;

    let report = net.fit(&dataset, args.cfg)?;

    let start_forward = Instant::now();
    net.forward(dataset.input(0))?;
    let forward_time = start_forward.elapsed();

    info!(
        "learning completed for {} epochs, error = {} (converged: {})",
        report.epochs, report.final_error, report.converged
    );
    info!("learning time: {} ms", report.elapsed.as_millis());
    info!("network forward time: {} us", forward_time.as_micros());
    info!("memory usage: {} bytes", net.memory_usage());

    net.save(args.model)?;
    info!("model saved to {}", args.model.display());

    if let Some(folder) = args.eval {
        let test = load_dataset(folder)?;
        let matrix = ConfusionMatrix::from_predictions(&net, &test)?;
        print_confusion(&matrix);
    }
    Ok(())
}

fn print_confusion(matrix: &ConfusionMatrix) {
    let label = |c: usize| Shape::from_index(c).map_or_else(|| format!("class {c}"), |s| s.to_string());

    println!("Confusion matrix (rows: actual, columns: predicted)");
    for actual in 0..matrix.classes() {
        let row: Vec<String> = (0..matrix.classes())
            .map(|p| format!("{:>5}", matrix.count(actual, p)))
            .collect();
        println!("{:>10} {}", label(actual), row.join(""));
    }
    for c in 0..matrix.classes() {
        println!(
            "{:>10} precision={:.3} recall={:.3} f1={:.3}",
            label(c),
            matrix.precision(c),
            matrix.recall(c),
            matrix.f1(c)
        );
    }
    println!(
        "accuracy={:.3} macro_f1={:.3}",
        matrix.accuracy(),
        matrix.macro_f1()
    );
}

fn predict(model: &Path, input: &Path, threshold: f64, show: bool) -> shape_mlp::Result<()> {
    let net = Network::load(model, DEFAULT_LEARNING_RATE)?;
    let pixels = data::load_input(input)?;

    if show {
        let width = (pixels.len() as f64).sqrt().round() as usize;
        print!("{}", render_grid(&pixels, width.max(1)));
    }

    let out = net.forward(&pixels)?;
    match Shape::classify(&out, threshold) {
        Some((shape, confidence)) => {
            println!("Shape: {shape}");
            println!("Accuracy: {confidence}");
        }
        None => println!("Unknown shape"),
    }
    Ok(())
}
