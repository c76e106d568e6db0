//! Tracing subscriber bootstrap.

use anyhow::{anyhow, Context};
use bookshelf_kernel::settings::{LogFormat, TelemetrySettings};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` wins over the configured filter.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let from_env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(from_env.as_deref(), settings)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match settings.log_format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|err| anyhow!("failed to install tracing subscriber: {}", err))?;

    tracing::debug!(
        target: "bookshelf-telemetry",
        format = ?settings.log_format,
        "tracing initialized"
    );
    Ok(())
}

/// An unparseable `RUST_LOG` falls back to the configured filter, which must parse.
fn build_filter(
    from_env: Option<&str>,
    settings: &TelemetrySettings,
) -> anyhow::Result<EnvFilter> {
    if let Some(filter) = from_env.and_then(|raw| EnvFilter::try_new(raw).ok()) {
        return Ok(filter);
    }
    EnvFilter::try_new(&settings.filter)
        .with_context(|| format!("invalid log filter '{}'", settings.filter))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(filter: &str) -> TelemetrySettings {
        TelemetrySettings {
            filter: filter.to_string(),
            ..TelemetrySettings::default()
        }
    }

    #[test]
    fn configured_filter_must_parse() {
        assert!(build_filter(None, &settings("bookshelf=debug,sqlx=warn")).is_ok());

        let err = build_filter(None, &settings("bookshelf=loud")).unwrap_err();
        assert_eq!(err.to_string(), "invalid log filter 'bookshelf=loud'");
    }

    #[test]
    fn env_filter_overrides_configured_one() {
        assert!(build_filter(Some("debug"), &settings("bookshelf=loud")).is_ok());

        let err = build_filter(Some("sqlx=loud"), &settings("bookshelf=loud")).unwrap_err();
        assert_eq!(err.to_string(), "invalid log filter 'bookshelf=loud'");
        assert!(build_filter(Some("sqlx=loud"), &settings("info")).is_ok());
    }
}
