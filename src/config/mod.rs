use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8000";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://catalog.sqlite?mode=rwc";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_address: String,
    pub database_url: String,
    pub base_url: String,
    pub model: String,
    /// Enables the oracle intent path. `None` is a fully supported mode.
    pub api_key: Option<String>,
    pub llm: LlmConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            llm: LlmConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub max_retries: usize,
    pub retry_base_ms: u64,
    pub retry_jitter_ms: u64,
    pub respect_retry_after: bool,
    /// Upper bound for the whole intent extraction call, retries included.
    pub oracle_timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 2_000,
            request_timeout_ms: 5_000,
            max_retries: 0,
            retry_base_ms: 200,
            retry_jitter_ms: 200,
            respect_retry_after: false,
            oracle_timeout_ms: 5_000,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct FileConfig {
    pub bind_address: Option<String>,
    pub database_url: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub llm: Option<PartialLlmConfig>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PartialLlmConfig {
    pub connect_timeout_ms: Option<u64>,
    pub request_timeout_ms: Option<u64>,
    pub max_retries: Option<usize>,
    pub retry_base_ms: Option<u64>,
    pub retry_jitter_ms: Option<u64>,
    pub respect_retry_after: Option<bool>,
    pub oracle_timeout_ms: Option<u64>,
}

impl PartialLlmConfig {
    /// Field-by-field merge, `self` wins.
    fn or(self, other: PartialLlmConfig) -> PartialLlmConfig {
        PartialLlmConfig {
            connect_timeout_ms: self.connect_timeout_ms.or(other.connect_timeout_ms),
            request_timeout_ms: self.request_timeout_ms.or(other.request_timeout_ms),
            max_retries: self.max_retries.or(other.max_retries),
            retry_base_ms: self.retry_base_ms.or(other.retry_base_ms),
            retry_jitter_ms: self.retry_jitter_ms.or(other.retry_jitter_ms),
            respect_retry_after: self.respect_retry_after.or(other.respect_retry_after),
            oracle_timeout_ms: self.oracle_timeout_ms.or(other.oracle_timeout_ms),
        }
    }

    fn resolve(self) -> LlmConfig {
        let d = LlmConfig::default();
        LlmConfig {
            connect_timeout_ms: self.connect_timeout_ms.unwrap_or(d.connect_timeout_ms),
            request_timeout_ms: self.request_timeout_ms.unwrap_or(d.request_timeout_ms),
            max_retries: self.max_retries.unwrap_or(d.max_retries),
            retry_base_ms: self.retry_base_ms.unwrap_or(d.retry_base_ms),
            retry_jitter_ms: self.retry_jitter_ms.unwrap_or(d.retry_jitter_ms),
            respect_retry_after: self.respect_retry_after.unwrap_or(d.respect_retry_after),
            oracle_timeout_ms: self.oracle_timeout_ms.unwrap_or(d.oracle_timeout_ms),
        }
    }
}

impl AppConfig {
    pub fn from_cli(cli: &crate::Cli) -> Result<Self> {
        let project_root = std::env::current_dir().context("resolve current dir")?;

        let project_cfg = load_project_config(&project_root).unwrap_or_default();
        let file_cfg = load_file_config().unwrap_or_default();

        Ok(Self::merge(cli, project_cfg, file_cfg, |key| {
            std::env::var(key).ok()
        }))
    }

    /// Priority: CLI args, environment, project config, user config, defaults.
    pub fn merge(
        cli: &crate::Cli,
        project_cfg: FileConfig,
        file_cfg: FileConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());

        let bind_address = non_empty(&cli.bind)
            .or_else(|| env("CATALOG_BIND"))
            .or(project_cfg.bind_address)
            .or(file_cfg.bind_address)
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());
        let database_url = cli
            .database_url
            .clone()
            .or_else(|| env("DATABASE_URL"))
            .or(project_cfg.database_url)
            .or(file_cfg.database_url)
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let base_url = non_empty(&cli.base_url)
            .or_else(|| env("OPENAI_BASE_URL"))
            .or(project_cfg.base_url)
            .or(file_cfg.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let model = non_empty(&cli.model)
            .or_else(|| env("OPENAI_MODEL"))
            .or(project_cfg.model)
            .or(file_cfg.model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        // an empty key in .env means "disabled", same as no key at all
        let api_key = cli
            .api_key
            .clone()
            .or_else(|| env("OPENAI_API_KEY"))
            .or(project_cfg.api_key)
            .or(file_cfg.api_key)
            .filter(|k| !k.trim().is_empty());

        let llm = project_cfg
            .llm
            .unwrap_or_default()
            .or(file_cfg.llm.unwrap_or_default())
            .resolve();

        Self {
            bind_address,
            database_url,
            base_url,
            model,
            api_key,
            llm,
        }
    }

    pub fn oracle_enabled(&self) -> bool {
        self.api_key.is_some()
    }
}

pub fn load_file_config() -> Result<FileConfig> {
    use std::env;

    fn candidate_paths() -> Vec<PathBuf> {
        let mut v = Vec::new();
        if let Ok(p) = env::var("CATALOG_SEARCH_CONFIG") {
            v.push(PathBuf::from(p));
        }
        if let Ok(xdg_home) = env::var("XDG_CONFIG_HOME") {
            v.push(Path::new(&xdg_home).join("catalog-search/config.toml"));
        } else if let Some(dir) = dirs::config_dir() {
            v.push(dir.join("catalog-search/config.toml"));
        }
        v
    }

    for p in candidate_paths() {
        if p.exists() {
            let s = fs::read_to_string(&p)
                .with_context(|| format!("read config file: {}", p.display()))?;
            match toml::from_str::<FileConfig>(&s) {
                Ok(cfg) => {
                    info!(path=%p.display(), "loaded config file");
                    return Ok(cfg);
                }
                Err(e) => {
                    warn!(path=%p.display(), error=%e.to_string(), "parse config failed");
                    continue;
                }
            }
        }
    }
    Ok(FileConfig::default())
}

/// Load project-specific configuration from .catalog/config.toml
pub fn load_project_config(project_root: &Path) -> Result<FileConfig> {
    let project_config_path = project_root.join(".catalog").join("config.toml");

    if !project_config_path.exists() {
        return Ok(FileConfig::default());
    }

    let s = fs::read_to_string(&project_config_path).with_context(|| {
        format!(
            "read project config file: {}",
            project_config_path.display()
        )
    })?;
    match toml::from_str::<FileConfig>(&s) {
        Ok(cfg) => {
            info!(path=%project_config_path.display(), "loaded project config file");
            Ok(cfg)
        }
        Err(e) => {
            warn!(path=%project_config_path.display(), error=%e.to_string(), "parse project config failed");
            Ok(FileConfig::default())
        }
    }
}
