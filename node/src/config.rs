//! The node's configuration file: party count/threshold, peer addresses, the
//! preprocessing directory, and program-specific extras.

use serde::{Deserialize, Serialize};
use std::{collections::HashMap, path::PathBuf};

/// Top-level configuration loaded from the `--config` YAML file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Total number of parties.
    pub n: usize,
    /// Tolerated-faults threshold.
    pub t: usize,
    /// This party's own index, as declared in its configuration file. `main` checks this
    /// against the `--node-id` the process was actually started with and refuses to run on a
    /// mismatch, catching a config file copied to the wrong party's deployment.
    pub node_id: usize,
    /// Network addresses of every peer, indexed by party id. Empty means "run every party
    /// in this one process against an in-memory router" (the harness's test/demo mode).
    #[serde(default)]
    pub peers: Vec<String>,
    /// Directory holding pre-generated preprocessing files, laid out as
    /// `<dir>/<kind>_<n>_<t>/<my_id>.dat`.
    pub preprocessing_dir: PathBuf,
    /// When set, skip reading `preprocessing_dir` and use a small in-memory supply instead;
    /// only useful for demo runs, never for an honest multi-party run.
    #[serde(default)]
    pub skip_preprocessing: bool,
    /// Program-specific values (e.g. `run_id`, `k`), passed through to the program as strings.
    #[serde(default)]
    pub extras: HashMap<String, String>,
}

impl Config {
    /// Loads the configuration from a YAML file at `path`, allowing any field to be overridden
    /// by an environment variable using `__` as the nesting separator, e.g.
    /// `PREPROCESSING_DIR=/tmp/prep` or `EXTRAS__RUN_ID=equality`.
    pub fn new(path: PathBuf) -> Result<Self, config::ConfigError> {
        let source = config::File::from(path).format(config::FileFormat::Yaml);
        let config =
            config::Config::builder().add_source(source).add_source(config::Environment::default().separator("__")).build()?;
        config.try_deserialize()
    }

    /// Checks the given `--node-id` against this file's own declared `node_id`, catching a
    /// config file deployed to the wrong party (e.g. party 2's config copied onto party 1's
    /// host by mistake).
    pub fn check_node_id(&self, cli_node_id: usize) -> anyhow::Result<()> {
        if self.node_id == cli_node_id {
            Ok(())
        } else {
            anyhow::bail!("--node-id {cli_node_id} does not match this configuration's own node_id {}", self.node_id)
        }
    }
}
