use crate::error::ConfigError;
use crate::settings::Settings;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{DatabaseSettings, LoggingSettings, ServerOverrides, ServerSettings};

/// The file consulted when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Loads the application configuration.
///
/// Sources are layered from lowest to highest precedence: built-in defaults,
/// the TOML file (optional unless a path is given explicitly), `REPORTING__*`
/// environment variables and finally `DATABASE_URL`.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };
    assemble(file, std::env::var("DATABASE_URL").ok())
}

fn assemble<S>(file: S, database_url: Option<String>) -> Result<Settings, ConfigError>
where
    S: config::Source + Send + Sync + 'static,
{
    let builder = config::Config::builder()
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 8000)?
        .set_default("database.url", "sqlite://reporting_system.db")?
        .set_default("database.max_connections", 5)?
        .set_default("database.acquire_timeout_secs", 5)?
        .set_default("logging.filter", "info,tower_http=info")?
        .set_default("logging.json", false)?
        .add_source(file)
        .add_source(
            config::Environment::with_prefix("REPORTING")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .set_override_option("database.url", database_url)?
        .build()?;

    let settings = builder.try_deserialize::<Settings>()?;
    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};

    fn from_toml(toml: &str, database_url: Option<&str>) -> Result<Settings, ConfigError> {
        assemble(
            File::from_str(toml, FileFormat::Toml),
            database_url.map(str::to_string),
        )
    }

    #[test]
    fn defaults_apply_when_file_is_empty() {
        let settings = from_toml("", None).unwrap();
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 8000);
        assert_eq!(settings.database.max_connections, 5);
        assert!(settings.logging.directory.is_none());
        assert!(!settings.logging.json);
    }

    #[test]
    fn file_values_override_defaults() {
        let settings = from_toml(
            r#"
            [server]
            port = 9100

            [logging]
            filter = "debug"
            directory = "logs"
            "#,
            None,
        )
        .unwrap();
        assert_eq!(settings.server.port, 9100);
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.logging.filter, "debug");
        assert_eq!(settings.logging.directory.as_deref(), Some("logs"));
    }

    #[test]
    fn database_url_override_wins_over_file() {
        let settings = from_toml(
            "[database]\nurl = \"sqlite://from_file.db\"\n",
            Some("sqlite://from_env.db"),
        )
        .unwrap();
        assert_eq!(settings.database.url, "sqlite://from_env.db");
    }

    #[test]
    fn zero_port_is_rejected() {
        let err = from_toml("[server]\nport = 0\n", None).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn zero_connections_is_rejected() {
        let err = from_toml("[database]\nmax_connections = 0\n", None).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn overrides_replace_only_given_fields() {
        let mut server = ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 8000,
        };
        ServerOverrides {
            host: None,
            port: Some(3000),
        }
        .apply(&mut server);
        assert_eq!(server.host, "127.0.0.1");
        assert_eq!(server.socket_addr().unwrap().port(), 3000);
    }
}
