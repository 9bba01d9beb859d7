use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

/// Default cap on an uploaded body: 100 MiB.
pub const DEFAULT_MAX_UPLOAD_SIZE: u64 = 100 * 1024 * 1024;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub static_files: StaticFilesConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Which side of the file transfer the server plays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Serve files from `source_dir` (GET/HEAD).
    #[default]
    Download,
    /// Store request bodies into `target_dir` (POST).
    Upload,
}

impl std::str::FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "download" => Ok(Mode::Download),
            "upload" => Ok(Mode::Upload),
            other => anyhow::bail!("unknown mode `{}` (expected download or upload)", other),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    pub mode: Mode,
    pub source_dir: PathBuf,
    pub target_dir: PathBuf,
    pub max_upload_size: u64,
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Download,
            source_dir: PathBuf::from("."),
            target_dir: PathBuf::from("."),
            max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,
        }
    }
}

impl Config {
    /// Loads the configuration file named by `SPOOL_CONFIG` (if set), then
    /// applies the environment overrides.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var_os("SPOOL_CONFIG") {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        cfg.apply_env()?;
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    fn apply_env(&mut self) -> anyhow::Result<()> {
        if let Ok(addr) = std::env::var("LISTEN") {
            self.server.listen_addr = addr;
        }
        if let Ok(mode) = std::env::var("SPOOL_MODE") {
            self.static_files.mode = mode.parse()?;
        }
        if let Some(dir) = std::env::var_os("SOURCE_PATH") {
            self.static_files.source_dir = PathBuf::from(dir);
        }
        if let Some(dir) = std::env::var_os("TARGET_PATH") {
            self.static_files.target_dir = PathBuf::from(dir);
        }
        if let Ok(size) = std::env::var("MAX_UPLOAD_SIZE") {
            self.static_files.max_upload_size = size
                .trim()
                .parse()
                .with_context(|| format!("Invalid MAX_UPLOAD_SIZE `{}`", size))?;
        }
        Ok(())
    }

    /// Replaces the port of the listen address, keeping its host.
    pub fn with_port(mut self, port: u16) -> Self {
        let host = self
            .server
            .listen_addr
            .rsplit_once(':')
            .map(|(host, _)| host)
            .unwrap_or("127.0.0.1");
        self.server.listen_addr = format!("{}:{}", host, port);
        self
    }
}
