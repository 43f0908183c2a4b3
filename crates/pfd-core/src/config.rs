use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Default HTTP port; TLS is not supported.
pub const DEFAULT_PORT: u16 = 80;

/// Global configuration loaded from `~/.config/pfd/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PfdConfig {
    /// Number of parallel connections per file when the CLI does not pass one.
    pub workers: usize,
    /// Port used for locations that do not carry an explicit `:port`.
    pub port: u16,
    /// Seconds allowed for the TCP connect.
    pub connect_timeout_secs: u64,
    /// Seconds a single socket read may wait for data (None = wait forever).
    /// A transfer that keeps making progress never hits this.
    #[serde(default)]
    pub read_timeout_secs: Option<u64>,
    /// `User-Agent` sent with HEAD probes.
    pub user_agent: String,
    /// Directory for downloaded files (None = current directory).
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
}

impl Default for PfdConfig {
    fn default() -> Self {
        Self {
            workers: 1,
            port: DEFAULT_PORT,
            connect_timeout_secs: 15,
            read_timeout_secs: Some(60),
            user_agent: "Console Http Client".to_string(),
            download_dir: None,
        }
    }
}

impl PfdConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_secs.map(Duration::from_secs)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("pfd")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<PfdConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = PfdConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: PfdConfig = toml::from_str(&data)?;
    Ok(cfg)
}
