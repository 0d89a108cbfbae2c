//! Configuration file support for starport.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (prefixed with `STARPORT_`, nested keys joined
//!    with `__`, e.g. `STARPORT_PAGINATION__PAGE_CAP`)
//! 3. Config file (./starport.toml, then ~/.config/starport/config.toml)
//! 4. Built-in defaults
//!
//! The GitHub token can also come from `STARPORT_GITHUB_TOKEN`, or from a
//! plain `GITHUB_TOKEN` when nothing else is configured.
//!
//! Example config file:
//! ```toml
//! [github]
//! token = "ghp_..."  # or use STARPORT_GITHUB_TOKEN / GITHUB_TOKEN
//! api_url = "https://api.github.com"
//! timeout_secs = 30
//!
//! [pagination]
//! per_page = 100
//! page_cap = 100
//!
//! [export]
//! dir = "~/stars"
//! format = "csv"
//! pretty = true
//! ```

use std::path::PathBuf;
use std::time::Duration;

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::Deserialize;
use starport::{DEFAULT_PAGE_CAP, ExportFormat, JsonStyle};

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// GitHub API configuration.
    pub github: GitHubConfig,
    /// Page size and page cap defaults.
    pub pagination: PaginationConfig,
    /// Export defaults.
    pub export: ExportConfig,
}

/// GitHub API configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Personal access token. Optional; unauthenticated requests get a lower rate limit.
    pub token: Option<String>,
    /// API root, for GitHub Enterprise.
    pub api_url: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: None,
            timeout_secs: 30,
        }
    }
}

/// Pagination defaults.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Items per page. When unset, `page` uses 30 and `all`/`export` use 100.
    pub per_page: Option<u32>,
    /// Maximum page requests for one aggregation.
    pub page_cap: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            per_page: None,
            page_cap: DEFAULT_PAGE_CAP,
        }
    }
}

/// Export defaults.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory export artifacts are written to.
    pub dir: Option<PathBuf>,
    /// Default export format.
    pub format: ExportFormat,
    /// Pretty-print JSON exports.
    pub pretty: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: None,
            format: ExportFormat::Json,
            pretty: true,
        }
    }
}

impl Config {
    /// Load configuration using the config crate's layered approach.
    ///
    /// Sources are loaded in order (later sources override earlier):
    /// 1. Built-in defaults
    /// 2. XDG config file (~/.config/starport/config.toml)
    /// 3. Local config file (./starport.toml)
    /// 4. Environment variables with STARPORT_ prefix
    /// 5. `STARPORT_GITHUB_TOKEN`
    pub fn load() -> Self {
        let mut builder = ConfigBuilder::builder();

        if let Some(xdg_config) = Self::default_config_path()
            && xdg_config.exists()
        {
            tracing::debug!("Loading config from {:?}", xdg_config);
            builder = builder.add_source(
                File::from(xdg_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        let local_config = PathBuf::from("starport.toml");
        if local_config.exists() {
            tracing::debug!("Loading config from ./starport.toml");
            builder = builder.add_source(
                File::from(local_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        // e.g., STARPORT_GITHUB__API_URL -> github.api_url
        builder = builder.add_source(
            Environment::with_prefix("STARPORT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder = match builder.set_override_option(
            "github.token",
            std::env::var("STARPORT_GITHUB_TOKEN").ok(),
        ) {
            Ok(builder) => builder,
            Err(e) => {
                tracing::warn!("Failed to apply STARPORT_GITHUB_TOKEN: {}", e);
                return Config::default();
            }
        };

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<Config>() {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to deserialize config: {}", e);
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to build config: {}", e);
                Config::default()
            }
        }
    }

    /// Get the GitHub token, falling back to `GITHUB_TOKEN`.
    pub fn github_token(&self) -> Option<String> {
        resolve_token(
            self.github.token.as_deref(),
            std::env::var("GITHUB_TOKEN").ok().as_deref(),
        )
    }

    /// Request timeout for the HTTP transport.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.github.timeout_secs.max(1))
    }

    pub fn json_style(&self) -> JsonStyle {
        if self.export.pretty {
            JsonStyle::Pretty
        } else {
            JsonStyle::Compact
        }
    }

    /// Export directory, falling back to the data directory.
    pub fn export_dir(&self) -> PathBuf {
        self.export
            .dir
            .clone()
            .or_else(Self::default_export_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Get the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "starport").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Get the default export directory (`$XDG_DATA_HOME/starport/exports` on Linux).
    pub fn default_export_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "starport").map(|dirs| dirs.data_dir().join("exports"))
    }
}

/// First non-blank token wins.
fn resolve_token(configured: Option<&str>, fallback: Option<&str>) -> Option<String> {
    configured
        .into_iter()
        .chain(fallback)
        .map(str::trim)
        .find(|t| !t.is_empty())
        .map(str::to_string)
}
