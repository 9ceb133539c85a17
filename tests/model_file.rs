use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use shape_mlp::{DEFAULT_LEARNING_RATE, Error, Network, Topology};

static COUNTER: AtomicUsize = AtomicUsize::new(0);

fn temp_path(name: &str) -> PathBuf {
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!(
        "shape_mlp_{}_{}_{}",
        std::process::id(),
        n,
        name
    ))
}

#[test]
fn save_then_load_reproduces_topology_and_weights() {
    let topology = Topology::new(49, 2, 10, 3).unwrap();
    let net = Network::new_with_seed(topology, DEFAULT_LEARNING_RATE, 99).unwrap();
    let path = temp_path("roundtrip.txt");

    net.save(&path).unwrap();
    let loaded = Network::load(&path, DEFAULT_LEARNING_RATE).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(loaded.topology(), topology);
    assert_eq!(loaded, net);

    let input = vec![1.0; 49];
    assert_eq!(loaded.forward(&input).unwrap(), net.forward(&input).unwrap());
}

#[test]
fn saved_file_has_header_line_and_expected_weight_count() {
    let topology = Topology::new(3, 2, 4, 2).unwrap();
    let net = Network::new_with_seed(topology, DEFAULT_LEARNING_RATE, 1).unwrap();
    let path = temp_path("layout.txt");

    net.save(&path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("3 2 4 2"));
    let weights: Vec<f64> = lines
        .flat_map(str::split_whitespace)
        .map(|t| t.parse().unwrap())
        .collect();
    assert_eq!(weights.len(), 4 * 3 + 4 * 4 + 2 * 4);
    assert_eq!(weights.len(), topology.weight_count());
    assert_eq!(weights[0], net.layers()[0].units()[0].weights()[0]);
    assert_eq!(
        *weights.last().unwrap(),
        *net.layers()[2].units()[1].weights().last().unwrap()
    );
}

#[test]
fn loads_files_with_trailing_spaces_and_short_precision() {
    // Six significant digits, trailing separator after every number.
    let path = temp_path("legacy.txt");
    std::fs::write(&path, "2 1 2 1 \n0.41 0.67 0.34 1e-05 0.123457 0.5 ").unwrap();
    let net = Network::load(&path, DEFAULT_LEARNING_RATE).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(net.layers()[0].units()[1].weights(), &[0.34, 1e-5]);
    assert_eq!(net.layers()[1].units()[0].weights(), &[0.123457, 0.5]);
}

#[test]
fn truncated_file_fails_with_model_load() {
    let path = temp_path("truncated.txt");
    std::fs::write(&path, "2 1 2 1\n0.1 0.2 0.3\n").unwrap();
    let err = Network::load(&path, DEFAULT_LEARNING_RATE).unwrap_err();
    std::fs::remove_file(&path).unwrap();

    match err {
        Error::ModelLoad(msg) => assert!(msg.contains("truncated"), "{msg}"),
        other => panic!("expected ModelLoad, got {other:?}"),
    }
}

#[test]
fn missing_file_fails_with_model_load() {
    let path = temp_path("never_written.txt");
    assert!(matches!(
        Network::load(&path, DEFAULT_LEARNING_RATE),
        Err(Error::ModelLoad(_))
    ));
}

#[test]
fn unwritable_destination_fails_with_model_save() {
    let net = Network::new_with_seed(Topology::new(2, 1, 2, 1).unwrap(), 0.1, 0).unwrap();
    let path = temp_path("no_such_dir").join("model.txt");

    match net.save(&path) {
        Err(Error::ModelSave { path: p, .. }) => assert_eq!(p, path),
        other => panic!("expected ModelSave, got {other:?}"),
    }
}

#[test]
fn save_replaces_existing_model_without_leaving_staging_file() {
    let path = temp_path("replace.txt");
    let first = Network::new_with_seed(Topology::new(3, 1, 4, 2).unwrap(), 0.1, 1).unwrap();
    let second = Network::new_with_seed(Topology::new(2, 2, 3, 1).unwrap(), 0.1, 2).unwrap();

    first.save(&path).unwrap();
    second.save(&path).unwrap();
    let loaded = Network::load(&path, 0.1).unwrap();
    let staging = path.with_file_name(format!(
        "{}.tmp",
        path.file_name().unwrap().to_string_lossy()
    ));
    std::fs::remove_file(&path).unwrap();

    assert_eq!(loaded, second);
    assert!(!staging.exists());
}

#[test]
fn failed_save_cleans_up_and_keeps_destination() {
    let net = Network::new_with_seed(Topology::new(2, 1, 2, 1).unwrap(), 0.1, 0).unwrap();
    let path = temp_path("occupied");
    std::fs::create_dir_all(path.join("inner")).unwrap();

    let result = net.save(&path);
    let staging = path.with_file_name(format!(
        "{}.tmp",
        path.file_name().unwrap().to_string_lossy()
    ));
    let still_there = path.join("inner").is_dir();
    let staging_left = staging.exists();
    std::fs::remove_dir_all(&path).unwrap();

    assert!(matches!(result, Err(Error::ModelSave { .. })), "{result:?}");
    assert!(still_there);
    assert!(!staging_left);
}
