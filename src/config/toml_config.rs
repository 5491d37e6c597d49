use crate::domain::ports::{AuthTransport, RouteStyle};
use crate::utils::error::{Result, ShortenerError};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// `sniplink.toml` 的內容，所有區段皆為選填
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub route_style: Option<RouteStyle>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    pub token_file: Option<String>,
    pub transport: Option<AuthTransport>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub format: Option<LogFormat>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ShortenerError::Io)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ShortenerError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SNIPLINK_API_BASE})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::OnceLock;

        static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
        let re = PLACEHOLDER.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static regex"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        if let Some(base_url) = &self.api.base_url {
            crate::utils::validation::validate_url("api.base_url", base_url)?;
        }

        if let Some(timeout) = self.api.timeout_seconds {
            crate::utils::validation::validate_range("api.timeout_seconds", timeout, 1, 300)?;
        }

        if let Some(token_file) = &self.auth.token_file {
            crate::utils::validation::validate_path("auth.token_file", token_file)?;
        }

        if let Some(level) = &self.logging.level {
            let valid_levels = ["trace", "debug", "info", "warn", "error"];
            if !valid_levels.contains(&level.to_ascii_lowercase().as_str()) {
                return Err(ShortenerError::InvalidConfigValueError {
                    field: "logging.level".to_string(),
                    value: level.clone(),
                    reason: format!("Unsupported level. Valid levels: {}", valid_levels.join(", ")),
                });
            }
        }

        Ok(())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[api]
base_url = "https://sn.ip"
route_style = "root"
timeout_seconds = 5

[auth]
token_file = "/tmp/sniplink-token"
transport = "cookie"

[logging]
level = "debug"
format = "json"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.api.base_url.as_deref(), Some("https://sn.ip"));
        assert_eq!(config.api.route_style, Some(RouteStyle::Root));
        assert_eq!(config.api.timeout_seconds, Some(5));
        assert_eq!(config.auth.transport, Some(AuthTransport::Cookie));
        assert_eq!(config.logging.format, Some(LogFormat::Json));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_is_valid() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert!(config.api.base_url.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SNIPLINK_TEST_BASE", "https://test.sn.ip");

        let config = TomlConfig::from_toml_str(
            r#"
[api]
base_url = "${SNIPLINK_TEST_BASE}"
"#,
        )
        .unwrap();
        assert_eq!(config.api.base_url.as_deref(), Some("https://test.sn.ip"));

        std::env::remove_var("SNIPLINK_TEST_BASE");
    }

    #[test]
    fn test_unset_env_var_is_kept() {
        let config = TomlConfig::from_toml_str(
            r#"
[auth]
token_file = "${SNIPLINK_TEST_SURELY_UNSET}/token"
"#,
        )
        .unwrap();
        assert_eq!(
            config.auth.token_file.as_deref(),
            Some("${SNIPLINK_TEST_SURELY_UNSET}/token")
        );
    }

    #[test]
    fn test_config_validation() {
        let config = TomlConfig::from_toml_str(
            r#"
[api]
base_url = "invalid-url"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str(
            r#"
[api]
timeout_seconds = 0
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str(
            r#"
[logging]
level = "loud"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_route_style_fails_to_parse() {
        let result = TomlConfig::from_toml_str(
            r#"
[api]
route_style = "sideways"
"#,
        );
        assert!(matches!(
            result,
            Err(ShortenerError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[api]\nbase_url = \"http://localhost:9090\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.api.base_url.as_deref(), Some("http://localhost:9090"));
    }
}
