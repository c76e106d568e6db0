use std::path::PathBuf;

use anyhow::{anyhow, Context};
use serde::Deserialize;

const DEFAULT_ENV: &str = "local";
const ENV_VAR_NAME: &str = "BOOKSHELF_ENV";
const CONFIG_DIR_ENV: &str = "BOOKSHELF_CONFIG_DIR";
const ENV_PREFIX: &str = "BOOKSHELF";

/// Plain environment variables honoured for deployments that predate the
/// `BOOKSHELF_` prefix, mapped to their settings key.
const LEGACY_VARS: &[(&str, &str)] = &[
    ("DB_HOST", "database.host"),
    ("DB_USER", "database.user"),
    ("DB_PASSWORD", "database.password"),
    ("DB_NAME", "database.name"),
    ("DB_DATE_STRINGS", "database.date_strings"),
    ("PORT", "server.port"),
];

/// Deployment environment the application is running in.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }

    fn parse(raw: &str) -> anyhow::Result<Self> {
        match raw {
            "local" => Ok(Environment::Local),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            other => Err(anyhow!(
                "unsupported environment '{}'; expected local/staging/production",
                other
            )),
        }
    }
}

/// Top-level configuration structure loaded from layered sources.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

impl Settings {
    /// Load configuration by layering `.env`, base file, environment overlay,
    /// prefixed variables and finally the legacy plain variables.
    pub fn load() -> anyhow::Result<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();

        let environment = std::env::var(ENV_VAR_NAME).unwrap_or_else(|_| DEFAULT_ENV.to_string());
        let environment = Environment::parse(&environment)?;

        let config_dir = match std::env::var(CONFIG_DIR_ENV) {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => std::env::current_dir()
                .map(|cwd| cwd.join("config"))
                .with_context(|| "unable to resolve current directory")?,
        };

        let base_path = config_dir.join("base.toml");
        let environment_path = config_dir.join(format!("{}.toml", environment.as_str()));

        let mut builder = config::Config::builder()
            .add_source(config::File::from(base_path).required(false))
            .add_source(config::File::from(environment_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            );

        for (key, value) in legacy_overrides(|name| std::env::var(name).ok()) {
            builder = builder
                .set_override(key, value)
                .with_context(|| format!("failed to apply override for '{}'", key))?;
        }

        let cfg = builder
            .build()
            .with_context(|| "failed to build configuration")?;

        let mut settings: Settings = cfg
            .try_deserialize()
            .with_context(|| "failed to deserialize configuration")?;

        settings.environment = environment;

        Ok(settings)
    }
}

/// Translate legacy variables into settings overrides.
///
/// `DB_DATE_STRINGS` only enables date strings when it is exactly `true`;
/// any other value disables them.
fn legacy_overrides<F>(lookup: F) -> Vec<(&'static str, String)>
where
    F: Fn(&str) -> Option<String>,
{
    LEGACY_VARS
        .iter()
        .filter_map(|&(var, key)| {
            let value = lookup(var)?;
            let value = if var == "DB_DATE_STRINGS" {
                (value == "true").to_string()
            } else {
                value
            };
            Some((key, value))
        })
        .collect()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "ServerSettings::default_host")]
    pub host: String,
    #[serde(default = "ServerSettings::default_port")]
    pub port: u16,
}

impl ServerSettings {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        5000
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

/// Connection parameters for the MySQL database.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "DatabaseSettings::default_host")]
    pub host: String,
    #[serde(default = "DatabaseSettings::default_port")]
    pub port: u16,
    #[serde(default = "DatabaseSettings::default_user")]
    pub user: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "DatabaseSettings::default_name")]
    pub name: String,
    /// Format dates on the server instead of decoding native `DATE` values.
    #[serde(default)]
    pub date_strings: bool,
}

impl DatabaseSettings {
    fn default_host() -> String {
        "localhost".to_string()
    }

    fn default_port() -> u16 {
        3306
    }

    fn default_user() -> String {
        "root".to_string()
    }

    fn default_name() -> String {
        "bookshelf".to_string()
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            user: Self::default_user(),
            password: String::new(),
            name: Self::default_name(),
            date_strings: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetrySettings {
    #[serde(default)]
    pub log_format: LogFormat,
    #[serde(default = "TelemetrySettings::default_filter")]
    pub filter: String,
}

impl TelemetrySettings {
    fn default_filter() -> String {
        "info".to_string()
    }
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            filter: Self::default_filter(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn default_environment_is_local() {
        let settings = Settings::default();
        assert_eq!(settings.environment, Environment::Local);
    }

    #[test]
    fn default_server_listens_on_5000() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 5000);
        assert_eq!(settings.server.host, "0.0.0.0");
    }

    #[test]
    fn default_database_targets_local_mysql() {
        let settings = Settings::default();
        assert_eq!(settings.database.host, "localhost");
        assert_eq!(settings.database.port, 3306);
        assert!(!settings.database.date_strings);
    }

    #[test]
    fn unknown_environment_is_rejected() {
        assert!(Environment::parse("qa").is_err());
        assert_eq!(
            Environment::parse("production").unwrap(),
            Environment::Production
        );
    }

    #[test]
    fn legacy_variables_map_to_settings_keys() {
        let env: HashMap<&str, &str> = [
            ("DB_HOST", "db.internal"),
            ("DB_NAME", "library"),
            ("PORT", "8081"),
        ]
        .into_iter()
        .collect();

        let overrides = legacy_overrides(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(
            overrides,
            vec![
                ("database.host", "db.internal".to_string()),
                ("database.name", "library".to_string()),
                ("server.port", "8081".to_string()),
            ]
        );
    }

    #[test]
    fn date_strings_flag_requires_exact_true() {
        let on = legacy_overrides(|name| (name == "DB_DATE_STRINGS").then(|| "true".to_string()));
        assert_eq!(on, vec![("database.date_strings", "true".to_string())]);

        let off = legacy_overrides(|name| (name == "DB_DATE_STRINGS").then(|| "TRUE".to_string()));
        assert_eq!(off, vec![("database.date_strings", "false".to_string())]);
    }

    #[test]
    fn overrides_deserialize_into_settings() {
        let settings: Settings = config::Config::builder()
            .set_override("database.date_strings", "true")
            .unwrap()
            .set_override("server.port", "8081")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert!(settings.database.date_strings);
        assert_eq!(settings.server.port, 8081);
        assert_eq!(settings.database.user, "root");
    }
}
