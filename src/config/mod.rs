pub mod cli;
pub mod toml_config;

use crate::domain::ports::{AuthTransport, ConfigProvider, RouteStyle};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::time::Duration;
use self::toml_config::{LogFormat, TomlConfig};

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

pub const DEFAULT_API_BASE: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_CONFIG_FILE: &str = "sniplink.toml";

/// 合併檔案、環境變數與命令列之後的最終設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base: String,
    pub route_style: RouteStyle,
    pub timeout_seconds: u64,
    pub token_file: String,
    pub auth_transport: AuthTransport,
    pub log_level: Option<String>,
    pub log_format: LogFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            route_style: RouteStyle::default(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            token_file: default_token_file(),
            auth_transport: AuthTransport::default(),
            log_level: None,
            log_format: LogFormat::default(),
        }
    }
}

pub fn default_token_file() -> String {
    dirs::home_dir()
        .map(|home| home.join(".sniplink").join("token"))
        .unwrap_or_else(|| std::path::PathBuf::from(".sniplink").join("token"))
        .to_string_lossy()
        .into_owned()
}

impl Settings {
    pub fn from_toml(config: &TomlConfig) -> Self {
        let defaults = Self::default();
        Self {
            api_base: config.api.base_url.clone().unwrap_or(defaults.api_base),
            route_style: config.api.route_style.unwrap_or(defaults.route_style),
            timeout_seconds: config.api.timeout_seconds.unwrap_or(defaults.timeout_seconds),
            token_file: config.auth.token_file.clone().unwrap_or(defaults.token_file),
            auth_transport: config.auth.transport.unwrap_or(defaults.auth_transport),
            log_level: config.logging.level.clone(),
            log_format: config.logging.format.unwrap_or(defaults.log_format),
        }
    }
}

impl ConfigProvider for Settings {
    fn api_base(&self) -> &str {
        &self.api_base
    }

    fn route_style(&self) -> RouteStyle {
        self.route_style
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn token_file(&self) -> &str {
        &self.token_file
    }

    fn auth_transport(&self) -> AuthTransport {
        self.auth_transport
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validation::validate_url("api.base_url", &self.api_base)?;
        validation::validate_range("api.timeout_seconds", self.timeout_seconds, 1, 300)?;
        validation::validate_path("auth.token_file", &self.token_file)?;
        Ok(())
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "sniplink")]
#[command(about = "Shorten URLs, resolve short codes and check click counts")]
#[command(version)]
pub struct CliConfig {
    /// Path to a TOML configuration file (defaults to ./sniplink.toml when present)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Base URL of the shortener backend
    #[arg(long, global = true, env = "SNIPLINK_API_BASE")]
    pub api_base: Option<String>,

    #[arg(long, global = true, value_enum)]
    pub route_style: Option<RouteStyle>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    #[arg(long, global = true)]
    pub token_file: Option<String>,

    /// How the session token is sent to the backend
    #[arg(long = "auth", global = true, value_enum)]
    pub auth_transport: Option<AuthTransport>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Print results as JSON")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create a short link for a long URL
    Shorten { long_url: String },
    /// Look up the original URL behind a short code
    Resolve { code: String },
    /// Show the click count of a short code
    Stats { code: String },
    /// Show the signed-in user
    Whoami,
    /// Print the sign-in URL, or store the token from the sign-in callback
    Login {
        #[arg(long, default_value = "github")]
        provider: String,
        /// Callback URL the browser landed on after signing in
        #[arg(long, conflicts_with = "token")]
        callback: Option<String>,
        #[arg(long)]
        token: Option<String>,
    },
    /// End the session and forget the stored token
    Logout,
    /// Shorten every URL in a file and write a CSV report
    Batch {
        #[arg(short, long)]
        input: String,
        #[arg(short, long)]
        output: String,
    },
    /// Interactive shorten/fetch form
    Interactive,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 依序套用：預設值 → TOML 檔 → 環境變數/命令列
    pub fn settings(&self) -> Result<Settings> {
        let file_config = match &self.config {
            Some(path) => Some(TomlConfig::from_file(path)?),
            None if std::path::Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Some(TomlConfig::from_file(DEFAULT_CONFIG_FILE)?)
            }
            None => None,
        };

        let mut settings = match &file_config {
            Some(config) => {
                config.validate()?;
                Settings::from_toml(config)
            }
            None => Settings::default(),
        };

        if let Some(api_base) = &self.api_base {
            settings.api_base = api_base.clone();
        }
        if let Some(route_style) = self.route_style {
            settings.route_style = route_style;
        }
        if let Some(timeout) = self.timeout {
            settings.timeout_seconds = timeout;
        }
        if let Some(token_file) = &self.token_file {
            settings.token_file = token_file.clone();
        }
        if let Some(transport) = self.auth_transport {
            settings.auth_transport = transport;
        }

        settings.validate()?;
        Ok(settings)
    }
}
