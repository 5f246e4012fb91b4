//! Runs a full configuration end to end, in-process, for each demonstration program.

use node::Config;
use std::{collections::HashMap, path::PathBuf};
use test_logger::LOGGER_INIT;

fn config(run_id: &str, extras: &[(&str, &str)]) -> Config {
    LOGGER_INIT();
    let mut extras_map = HashMap::new();
    extras_map.insert("run_id".to_string(), run_id.to_string());
    for (key, value) in extras {
        extras_map.insert(key.to_string(), value.to_string());
    }
    Config {
        n: 4,
        t: 1,
        node_id: 0,
        peers: Vec::new(),
        preprocessing_dir: PathBuf::new(),
        skip_preprocessing: true,
        extras: extras_map,
    }
}

#[tokio::test]
async fn runs_open_zero() {
    let config = config("open_zero", &[("value", "11")]);
    let result = node::run(&config, 0).await.unwrap();
    assert_eq!(result, math_lib::GF::from_u64(11));
}

#[tokio::test]
async fn runs_multiply() {
    let config = config("multiply", &[("x", "6"), ("y", "7")]);
    let result = node::run(&config, 0).await.unwrap();
    assert_eq!(result, math_lib::GF::from_u64(42));
}

#[tokio::test]
async fn runs_equality_on_equal_operands() {
    let config = config("equality", &[("x", "5"), ("y", "5"), ("k", "1")]);
    let result = node::run(&config, 0).await.unwrap();
    assert_eq!(result, math_lib::GF::one());
}

#[tokio::test]
async fn networked_config_fails_with_peer_unreachable() {
    let mut config = config("open_zero", &[]);
    config.peers = vec!["127.0.0.1:9000".to_string(), "127.0.0.1:9001".to_string()];
    let error = node::run(&config, 0).await.unwrap_err();
    let code = node::exit_code(&error);
    assert_eq!(code, 3);
}
