//! Initialisation du logging à partir de la configuration

use anyhow::Result;
use betdaqconfig::Config;
use tracing::Level;
use tracing_subscriber::{
    Registry, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

pub fn string_to_level(s: &str) -> Option<Level> {
    match s.trim().to_uppercase().as_str() {
        "ERROR" => Some(Level::ERROR),
        "WARN" | "WARNING" => Some(Level::WARN),
        "INFO" => Some(Level::INFO),
        "DEBUG" => Some(Level::DEBUG),
        "TRACE" => Some(Level::TRACE),
        _ => None,
    }
}

fn level_to_levelfilter(level: Level) -> LevelFilter {
    match level {
        Level::ERROR => LevelFilter::ERROR,
        Level::WARN => LevelFilter::WARN,
        Level::INFO => LevelFilter::INFO,
        Level::DEBUG => LevelFilter::DEBUG,
        Level::TRACE => LevelFilter::TRACE,
    }
}

/// Niveau minimal configuré, `INFO` si la valeur est invalide
pub fn configured_level(config: &Config) -> LevelFilter {
    config
        .get_log_min_level()
        .ok()
        .and_then(|l| string_to_level(&l))
        .map(level_to_levelfilter)
        .unwrap_or(LevelFilter::INFO)
}

/// Installe le subscriber global
///
/// Utilise `host.logger.min_level` et `host.logger.enable_console`.
/// Échoue si un subscriber global est déjà installé.
pub fn init_logging(config: &Config) -> Result<()> {
    let filter = configured_level(config);
    let enable_console = config.get_log_enable_console().unwrap_or(true);

    let console = enable_console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_level(true)
            .with_ansi(true)
    });

    Registry::default().with(filter).with(console).try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_to_level() {
        assert_eq!(string_to_level("debug"), Some(Level::DEBUG));
        assert_eq!(string_to_level(" WARN "), Some(Level::WARN));
        assert_eq!(string_to_level("verbose"), None);
    }

    #[test]
    fn test_configured_level() {
        let config = Config::from_yaml_str("host:\n  logger:\n    min_level: debug\n").unwrap();
        assert_eq!(configured_level(&config), LevelFilter::DEBUG);

        let config = Config::from_yaml_str("host:\n  logger:\n    min_level: loud\n").unwrap();
        assert_eq!(configured_level(&config), LevelFilter::INFO);
    }
}
