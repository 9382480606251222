use std::path::PathBuf;

use anyhow::{Context, bail};
use serde::Deserialize;

/// Environment variable naming an optional YAML config file.
pub const CONFIG_PATH_ENV: &str = "WARDEN_CONFIG";

const USAGE: &str = "usage: warden [port]";

/// Server configuration, built once at startup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub document_root: PathBuf,
    /// Listen backlog passed to `listen(2)`.
    pub backlog: u32,
    /// Optional cap on concurrently handled connections. Unbounded when unset.
    pub max_connections: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8080,
            document_root: PathBuf::from("www"),
            backlog: 5,
            max_connections: None,
        }
    }
}

impl Config {
    /// Loads the process configuration: defaults, then the YAML file named by
    /// `WARDEN_CONFIG`, then `WARDEN_*` variables, then the positional port argument.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => {
                let raw = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading config file {}", path))?;
                Self::from_yaml(&raw).with_context(|| format!("parsing config file {}", path))?
            }
            Err(_) => Self::default(),
        };

        cfg.apply_env(|key| std::env::var(key).ok())?;
        cfg.apply_args(std::env::args().skip(1))?;
        Ok(cfg)
    }

    pub fn from_yaml(raw: &str) -> anyhow::Result<Self> {
        let cfg = serde_yaml::from_str(raw)?;
        Ok(cfg)
    }

    /// Overrides fields from `WARDEN_HOST`, `WARDEN_PORT` and `WARDEN_ROOT`.
    pub fn apply_env<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("WARDEN_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("WARDEN_PORT") {
            self.port = port
                .parse()
                .with_context(|| format!("invalid WARDEN_PORT {:?}", port))?;
        }
        if let Some(root) = lookup("WARDEN_ROOT") {
            self.document_root = PathBuf::from(root);
        }
        Ok(())
    }

    /// Applies command line arguments. The first one is the port; any others are ignored.
    pub fn apply_args<I>(&mut self, args: I) -> anyhow::Result<()>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        if let Some(port) = args.next() {
            self.port = match port.parse() {
                Ok(p) => p,
                Err(_) => bail!("invalid port {:?}\n{}", port, USAGE),
            };
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
