//! Extension pour intégrer la configuration BetDAQ dans betdaqconfig
//!
//! Le trait `BetdaqConfigExt` ajoute à `betdaqconfig::Config` les méthodes
//! d'accès aux credentials et aux paramètres de connexion BetDAQ.

use crate::client::{
    ClientSettings, DEFAULT_API_VERSION, DEFAULT_CURRENCY, DEFAULT_LANGUAGE,
    DEFAULT_READONLY_URL, DEFAULT_SECURE_URL,
};
use crate::transport::DEFAULT_HTTP_TIMEOUT;
use anyhow::{Result, anyhow};
use betdaqconfig::Config;
use serde_yaml::Value;
use std::time::Duration;

const ACCOUNT: [&str; 2] = ["accounts", "betdaq"];

/// Trait d'extension pour gérer la configuration BetDAQ
///
/// # Exemple
///
/// ```rust,ignore
/// use betdaqconfig::get_config;
/// use betdaq::BetdaqConfigExt;
///
/// let config = get_config()?;
/// let (username, _password) = config.get_betdaq_credentials()?;
/// println!("BetDAQ user: {}", username);
/// ```
pub trait BetdaqConfigExt {
    /// Récupère le nom d'utilisateur BetDAQ
    ///
    /// # Errors
    ///
    /// Retourne une erreur si le nom d'utilisateur n'est pas configuré
    fn get_betdaq_username(&self) -> Result<String>;

    fn set_betdaq_username(&self, username: &str) -> Result<()>;

    /// Récupère le mot de passe BetDAQ
    ///
    /// Peut aussi venir de `BETDAQ_CONFIG__ACCOUNTS__BETDAQ__PASSWORD`.
    ///
    /// # Errors
    ///
    /// Retourne une erreur si le mot de passe n'est pas configuré
    fn get_betdaq_password(&self) -> Result<String>;

    fn set_betdaq_password(&self, password: &str) -> Result<()>;

    /// Récupère le couple (username, password)
    fn get_betdaq_credentials(&self) -> Result<(String, String)>;

    fn get_betdaq_application_identifier(&self) -> Result<Option<String>>;

    fn set_betdaq_application_identifier(&self, identifier: &str) -> Result<()>;

    fn get_betdaq_api_version(&self) -> Result<String>;

    fn get_betdaq_currency(&self) -> Result<String>;

    fn set_betdaq_currency(&self, currency: &str) -> Result<()>;

    fn get_betdaq_language(&self) -> Result<String>;

    fn get_betdaq_readonly_url(&self) -> Result<String>;

    fn get_betdaq_secure_url(&self) -> Result<String>;

    /// Timeout HTTP global en secondes
    fn get_betdaq_timeout_secs(&self) -> Result<u64>;

    fn set_betdaq_timeout_secs(&self, secs: u64) -> Result<()>;

    /// Assemble les settings complets d'un client
    fn get_betdaq_settings(&self) -> Result<ClientSettings>;
}

fn account_path(key: &str) -> [&str; 3] {
    [ACCOUNT[0], ACCOUNT[1], key]
}

fn non_empty_string(config: &Config, path: &[&str]) -> Option<String> {
    match config.get_value(path) {
        Ok(Value::String(s)) if !s.trim().is_empty() => Some(s),
        _ => None,
    }
}

fn string_or(config: &Config, path: &[&str], default: &str) -> String {
    non_empty_string(config, path).unwrap_or_else(|| default.to_string())
}

impl BetdaqConfigExt for Config {
    fn get_betdaq_username(&self) -> Result<String> {
        non_empty_string(self, &account_path("username"))
            .ok_or_else(|| anyhow!("BetDAQ username not configured"))
    }

    fn set_betdaq_username(&self, username: &str) -> Result<()> {
        self.set_value(
            &account_path("username"),
            Value::String(username.to_string()),
        )
    }

    fn get_betdaq_password(&self) -> Result<String> {
        non_empty_string(self, &account_path("password"))
            .ok_or_else(|| anyhow!("BetDAQ password not configured"))
    }

    fn set_betdaq_password(&self, password: &str) -> Result<()> {
        self.set_value(
            &account_path("password"),
            Value::String(password.to_string()),
        )
    }

    fn get_betdaq_credentials(&self) -> Result<(String, String)> {
        let username = self.get_betdaq_username()?;
        let password = self.get_betdaq_password()?;
        Ok((username, password))
    }

    fn get_betdaq_application_identifier(&self) -> Result<Option<String>> {
        Ok(non_empty_string(self, &account_path("application_identifier")))
    }

    fn set_betdaq_application_identifier(&self, identifier: &str) -> Result<()> {
        self.set_value(
            &account_path("application_identifier"),
            Value::String(identifier.to_string()),
        )
    }

    fn get_betdaq_api_version(&self) -> Result<String> {
        // Une version écrite sans guillemets arrive comme un nombre
        match self.get_value(&["betdaq", "api_version"]) {
            Ok(Value::Number(n)) => Ok(n.to_string()),
            _ => Ok(string_or(self, &["betdaq", "api_version"], DEFAULT_API_VERSION)),
        }
    }

    fn get_betdaq_currency(&self) -> Result<String> {
        Ok(string_or(self, &["betdaq", "currency"], DEFAULT_CURRENCY))
    }

    fn set_betdaq_currency(&self, currency: &str) -> Result<()> {
        self.set_value(&["betdaq", "currency"], Value::String(currency.to_string()))
    }

    fn get_betdaq_language(&self) -> Result<String> {
        Ok(string_or(self, &["betdaq", "language"], DEFAULT_LANGUAGE))
    }

    fn get_betdaq_readonly_url(&self) -> Result<String> {
        Ok(string_or(self, &["betdaq", "readonly_url"], DEFAULT_READONLY_URL))
    }

    fn get_betdaq_secure_url(&self) -> Result<String> {
        Ok(string_or(self, &["betdaq", "secure_url"], DEFAULT_SECURE_URL))
    }

    fn get_betdaq_timeout_secs(&self) -> Result<u64> {
        match self.get_value(&["betdaq", "timeout_secs"]) {
            Ok(Value::Number(n)) => n
                .as_u64()
                .ok_or_else(|| anyhow!("Invalid betdaq.timeout_secs: {}", n)),
            _ => Ok(DEFAULT_HTTP_TIMEOUT.as_secs()),
        }
    }

    fn set_betdaq_timeout_secs(&self, secs: u64) -> Result<()> {
        self.set_value(
            &["betdaq", "timeout_secs"],
            Value::Number(serde_yaml::Number::from(secs)),
        )
    }

    fn get_betdaq_settings(&self) -> Result<ClientSettings> {
        let (username, password) = self.get_betdaq_credentials()?;
        let mut settings = ClientSettings::new(username, password);
        settings.api_version = self.get_betdaq_api_version()?;
        settings.currency = self.get_betdaq_currency()?;
        settings.language = self.get_betdaq_language()?;
        settings.application_identifier = self.get_betdaq_application_identifier()?;
        settings.readonly_url = self.get_betdaq_readonly_url()?;
        settings.secure_url = self.get_betdaq_secure_url()?;
        settings.timeout = Duration::from_secs(self.get_betdaq_timeout_secs()?);
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(yaml: &str) -> Config {
        Config::from_yaml_str(yaml).unwrap()
    }

    #[test]
    fn test_defaults_without_credentials() {
        let config = config("{}");
        assert!(config.get_betdaq_username().is_err());
        assert!(config.get_betdaq_password().is_err());
        assert!(config.get_betdaq_settings().is_err());
        assert_eq!(config.get_betdaq_api_version().unwrap(), "2.0");
        assert_eq!(config.get_betdaq_currency().unwrap(), "GBP");
        assert_eq!(config.get_betdaq_readonly_url().unwrap(), DEFAULT_READONLY_URL);
        assert_eq!(config.get_betdaq_timeout_secs().unwrap(), 30);
        assert_eq!(config.get_betdaq_application_identifier().unwrap(), None);
    }

    #[test]
    fn test_settings_from_yaml() {
        let config = config(
            r#"
accounts:
  betdaq:
    username: punter
    password: hunter2
    application_identifier: my-bot
betdaq:
  currency: EUR
  readonly_url: http://localhost:8080/ro
  timeout_secs: 5
"#,
        );

        let settings = config.get_betdaq_settings().unwrap();
        assert_eq!(settings.username, "punter");
        assert_eq!(settings.password, "hunter2");
        assert_eq!(settings.application_identifier.as_deref(), Some("my-bot"));
        assert_eq!(settings.currency, "EUR");
        assert_eq!(settings.language, "en");
        assert_eq!(settings.readonly_url, "http://localhost:8080/ro");
        assert_eq!(settings.secure_url, DEFAULT_SECURE_URL);
        assert_eq!(settings.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_setters_roundtrip_in_memory() {
        let config = config("{}");
        config.set_betdaq_username("punter").unwrap();
        config.set_betdaq_password("plain").unwrap();
        config.set_betdaq_currency("USD").unwrap();
        config.set_betdaq_timeout_secs(12).unwrap();

        assert_eq!(
            config.get_betdaq_credentials().unwrap(),
            ("punter".to_string(), "plain".to_string())
        );
        assert_eq!(config.get_betdaq_currency().unwrap(), "USD");
        assert_eq!(config.get_betdaq_timeout_secs().unwrap(), 12);
    }

    #[test]
    fn test_password_is_returned_verbatim() {
        let config = config("accounts:\n  betdaq:\n    password: \"pa:ss word \"\n");
        assert_eq!(config.get_betdaq_password().unwrap(), "pa:ss word ");

        config.set_betdaq_password("   ").unwrap();
        assert!(config.get_betdaq_password().is_err());
    }

    #[test]
    fn test_unquoted_api_version() {
        let config = config("betdaq:\n  api_version: 2.0\n");
        assert_eq!(config.get_betdaq_api_version().unwrap(), "2.0");
    }
}
