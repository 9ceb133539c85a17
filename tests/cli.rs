use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

const BIN: &str = env!("CARGO_BIN_EXE_shape-mlp");

const CROSS: &str = "1 0
0 1 0
1 1 1
0 1 0
";

const RING: &str = "0 1
1 1 1
1 0 1
1 1 1
";

fn run(args: &[&str]) -> Output {
    Command::new(BIN)
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .unwrap()
}

fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("shape_mlp_cli_{}_{tag}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn usage_errors_exit_with_one() {
    for args in [
        &[][..],
        &["classify"][..],
        &["train", "samples", "nine", "1", "3", "2"][..],
        &["predict", "model.txt"][..],
    ] {
        let out = run(args);
        assert_eq!(out.status.code(), Some(1), "{args:?}");
        assert!(!out.stderr.is_empty(), "{args:?}");
    }
}

#[test]
fn help_exits_with_zero() {
    let out = run(&["--help"]);
    assert_eq!(out.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&out.stdout).contains("train"));
}

#[test]
fn runtime_errors_exit_with_one() {
    let dir = scratch_dir("runtime");
    let empty = dir.join("empty");
    fs::create_dir_all(&empty).unwrap();
    let missing_model = dir.join("missing.txt");
    let input = dir.join("input.txt");
    fs::write(&input, CROSS).unwrap();

    let train = run(&["train", empty.to_str().unwrap(), "9", "1", "3", "2"]);
    let predict = run(&[
        "predict",
        missing_model.to_str().unwrap(),
        input.to_str().unwrap(),
    ]);
    fs::remove_dir_all(&dir).unwrap();

    assert_eq!(train.status.code(), Some(1));
    assert_eq!(predict.status.code(), Some(1));
}

#[test]
fn train_then_predict_round_trip() {
    let dir = scratch_dir("roundtrip");
    let samples = dir.join("samples");
    fs::create_dir_all(&samples).unwrap();
    fs::write(samples.join("cross.txt"), CROSS).unwrap();
    fs::write(samples.join("ring.txt"), RING).unwrap();
    let model = dir.join("model.txt");

    let train = run(&[
        "train",
        samples.to_str().unwrap(),
        "9",
        "1",
        "4",
        "2",
        "--model",
        model.to_str().unwrap(),
        "--max-epochs",
        "10",
        "--seed",
        "1",
        "--log-every",
        "0",
    ]);
    let saved = fs::read_to_string(&model).unwrap_or_default();
    let predict = run(&[
        "predict",
        model.to_str().unwrap(),
        samples.join("cross.txt").to_str().unwrap(),
    ]);
    fs::remove_dir_all(&dir).unwrap();

    assert_eq!(train.status.code(), Some(0));
    assert!(saved.starts_with("9 1 4 2\n"), "{saved:?}");
    assert_eq!(predict.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&predict.stdout);
    assert!(
        stdout.starts_with("Shape: ") || stdout.starts_with("Unknown shape"),
        "{stdout:?}"
    );
}
