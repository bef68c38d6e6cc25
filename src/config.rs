use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::Parser;
use serde::Deserialize;

/// Command-line flags. Every flag can also come from the environment.
#[derive(Debug, Default, Parser)]
#[command(name = "httpgod", version, about = "A tiny HTTP/1.0 file and CGI server")]
pub struct Cli {
    /// An address to serve
    #[arg(long, env = "HTTPGOD_HOST")]
    pub host: Option<String>,

    /// A port to listen
    #[arg(long, env = "HTTPGOD_PORT")]
    pub port: Option<u16>,

    /// A path to dispatch
    #[arg(long, env = "HTTPGOD_ROOT")]
    pub root: Option<PathBuf>,

    /// Show hidden files and folders
    #[arg(long, env = "HTTPGOD_HIDDEN")]
    pub hidden: bool,

    /// YAML file to read settings from before applying flags
    #[arg(long, env = "HTTPGOD_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub root: PathBuf,
    pub show_hidden: bool,
    pub cgi: CgiConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// The single request path that runs a script instead of touching the root.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CgiConfig {
    pub route: String,
    pub script: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            root: PathBuf::from("."),
            show_hidden: false,
            cgi: CgiConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3030,
        }
    }
}

impl Default for CgiConfig {
    fn default() -> Self {
        Self {
            route: "/test.cgi".to_string(),
            script: PathBuf::from("./test.cgi"),
        }
    }
}

impl Config {
    /// Builds the startup configuration: defaults, then the optional YAML
    /// file, then flags. The result is validated.
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let mut cfg = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        cfg.apply(cli);
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("can't read config file {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("can't parse config file {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Overrides file or default values with whatever flags were given.
    pub fn apply(&mut self, cli: &Cli) {
        if let Some(host) = &cli.host {
            self.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.server.port = port;
        }
        if let Some(root) = &cli.root {
            self.root = root.clone();
        }
        if cli.hidden {
            self.show_hidden = true;
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let meta = std::fs::metadata(&self.root)
            .with_context(|| format!("root folder {} does not exist", self.root.display()))?;
        if !meta.is_dir() {
            bail!("root {} is not a folder", self.root.display());
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
