//! Client BetDAQ : les deux handles de service partageant un même transport

use crate::config_ext::BetdaqConfigExt;
use crate::service::{ServiceHandle, ServiceKind};
use crate::transport::{DEFAULT_HTTP_TIMEOUT, HttpTransport, Transport};
use betdaqconfig::Config;
use betdaqsoap::{BETDAQ_API_NS, ExternalApiHeader};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub const DEFAULT_READONLY_URL: &str = "https://api.betdaq.com/v2.0/ReadOnlyService.asmx";
pub const DEFAULT_SECURE_URL: &str = "https://api.betdaq.com/v2.0/Secure/SecureService.asmx";
pub const DEFAULT_API_VERSION: &str = "2.0";
pub const DEFAULT_CURRENCY: &str = "GBP";
pub const DEFAULT_LANGUAGE: &str = "en";

/// Paramètres nécessaires pour construire un [`Client`]
#[derive(Clone)]
pub struct ClientSettings {
    pub username: String,
    pub password: String,
    pub api_version: String,
    pub currency: String,
    pub language: String,
    pub application_identifier: Option<String>,
    pub readonly_url: String,
    pub secure_url: String,
    pub namespace: String,
    pub timeout: Duration,
}

impl ClientSettings {
    /// Settings pointant sur les endpoints publics BetDAQ
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            currency: DEFAULT_CURRENCY.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            application_identifier: None,
            readonly_url: DEFAULT_READONLY_URL.to_string(),
            secure_url: DEFAULT_SECURE_URL.to_string(),
            namespace: BETDAQ_API_NS.to_string(),
            timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }

    fn header(&self, with_password: bool) -> ExternalApiHeader {
        ExternalApiHeader {
            version: self.api_version.clone(),
            currency: self.currency.clone(),
            language_code: self.language.clone(),
            username: self.username.clone(),
            password: with_password.then(|| self.password.clone()),
            application_identifier: self.application_identifier.clone(),
        }
    }
}

impl fmt::Debug for ClientSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSettings")
            .field("username", &self.username)
            .field("password", &"***")
            .field("api_version", &self.api_version)
            .field("currency", &self.currency)
            .field("language", &self.language)
            .field("application_identifier", &self.application_identifier)
            .field("readonly_url", &self.readonly_url)
            .field("secure_url", &self.secure_url)
            .field("namespace", &self.namespace)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Client de l'API BetDAQ
///
/// Porte le service sécurisé (authentifié) et le service readonly.
#[derive(Debug, Clone)]
pub struct Client {
    secure_client: ServiceHandle,
    readonly_client: ServiceHandle,
}

impl Client {
    /// Crée un client HTTP à partir de settings explicites
    pub fn new(settings: ClientSettings) -> Self {
        let transport = Arc::new(HttpTransport::new(settings.timeout));
        Self::with_transport(settings, transport)
    }

    /// Crée un client sur un transport fourni par l'appelant
    pub fn with_transport(settings: ClientSettings, transport: Arc<dyn Transport>) -> Self {
        let secure_client = ServiceHandle::new(
            ServiceKind::Secure,
            settings.secure_url.clone(),
            settings.namespace.clone(),
            settings.header(true),
            transport.clone(),
        );
        let readonly_client = ServiceHandle::new(
            ServiceKind::ReadOnly,
            settings.readonly_url.clone(),
            settings.namespace.clone(),
            settings.header(false),
            transport,
        );

        Self {
            secure_client,
            readonly_client,
        }
    }

    /// Crée un client à partir de la configuration
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let settings = config.get_betdaq_settings()?;
        info!(
            username = %settings.username,
            readonly_url = %settings.readonly_url,
            secure_url = %settings.secure_url,
            "BetDAQ client configured"
        );
        Ok(Self::new(settings))
    }

    pub fn secure_client(&self) -> &ServiceHandle {
        &self.secure_client
    }

    pub fn readonly_client(&self) -> &ServiceHandle {
        &self.readonly_client
    }
}
