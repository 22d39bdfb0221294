use serde::Deserialize;

/// Application configuration, built once at startup and passed by reference.
///
/// Values come from an optional `epulo.toml` next to the binary, overridden by
/// `EPULO__SECTION__FIELD` environment variables (e.g. `EPULO__FACEBOOK__APP_ID`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub facebook: FacebookConfig,
    pub session: SessionConfig,
    pub database: DatabaseConfig,
    pub mailer: MailerConfig,
    pub logging: LoggingConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory served for static assets (ungated).
    pub static_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FacebookConfig {
    pub app_id: String,
    pub app_secret: String,
    /// Redirect URI registered with the Facebook app.
    pub callback_url: String,
    /// OAuth dialog base; overridable so tests can point it elsewhere.
    pub dialog_url: String,
    /// Graph API base; overridable so tests can point it elsewhere.
    pub graph_url: String,
    /// Bound on every provider round trip, in seconds.
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Overwrite profile fields from the provider on every login, not just
    /// the first. Off by default.
    pub refresh_profile_on_login: bool,
    /// How long a rehydrated user stays cached, in seconds. 0 disables the
    /// cache and every request hits the database.
    pub cache_ttl_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MailerConfig {
    /// HTTP mail relay base URL.
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub origins: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            facebook: FacebookConfig::default(),
            session: SessionConfig::default(),
            database: DatabaseConfig::default(),
            mailer: MailerConfig::default(),
            logging: LoggingConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            static_dir: "./public".to_string(),
        }
    }
}

impl Default for FacebookConfig {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            app_secret: String::new(),
            callback_url: "http://localhost:5000/auth/facebook/callback".to_string(),
            dialog_url: "https://www.facebook.com/dialog/oauth".to_string(),
            graph_url: "https://graph.facebook.com".to_string(),
            timeout_secs: 10,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            refresh_profile_on_login: false,
            cache_ttl_secs: 60,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:./data/epulo.db".to_string(),
        }
    }
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8025".to_string(),
            timeout_secs: 10,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            origins: "*".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),
    #[error("Missing required configuration field: {0}")]
    MissingField(&'static str),
}

impl Config {
    /// Load configuration from `epulo.toml` (optional) and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("epulo").required(false))
            .add_source(config::Environment::with_prefix("EPULO").separator("__"))
            .build()
            .map_err(|e| ConfigError::Load(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| ConfigError::Load(e.to_string()))?;

        if config.facebook.app_id.is_empty() {
            return Err(ConfigError::MissingField("facebook.app_id"));
        }
        if config.facebook.app_secret.is_empty() {
            return Err(ConfigError::MissingField("facebook.app_secret"));
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.session.cache_ttl_secs, 60);
        assert!(!config.session.refresh_profile_on_login);
        assert_eq!(config.facebook.graph_url, "https://graph.facebook.com");
        assert_eq!(config.facebook.timeout_secs, 10);
    }

    #[test]
    fn test_missing_field_error_message() {
        let err = ConfigError::MissingField("facebook.app_id");
        assert_eq!(
            err.to_string(),
            "Missing required configuration field: facebook.app_id"
        );
    }
}
