//! HTTP transport for SOAP calls
//!
//! The [`Transport`] trait is the seam between the services and the network.
//! [`HttpTransport`] posts envelopes with a blocking `ureq` agent.

use crate::error::BoxError;
use betdaqsoap::{SoapEnvelope, parse_soap_envelope};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use ureq::Agent;

/// Default global timeout of one SOAP call
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// How the transport should hand back the response of one call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseMode {
    /// Parse the SOAP envelope
    #[default]
    Parsed,
    /// Leave the wire body untouched
    Raw,
}

/// One SOAP request ready to be posted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapCall {
    pub endpoint: String,
    pub soap_action: String,
    pub body: String,
}

/// Result of a SOAP call:
/// - HTTP status code
/// - raw XML body (always)
/// - parsed SOAP envelope, in `Parsed` mode and if parsing succeeded
#[derive(Debug, Clone)]
pub struct WireResponse {
    pub status: u16,
    pub raw_body: String,
    pub envelope: Option<SoapEnvelope>,
}

impl WireResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    /// DNS failure, refused or reset connection, timeout
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("transport error: {0}")]
    Other(#[source] BoxError),
}

/// Sends SOAP requests to a service endpoint
pub trait Transport: Send + Sync {
    fn send(&self, call: &SoapCall, mode: ResponseMode) -> Result<WireResponse, TransportError>;
}

/// Blocking HTTP transport
///
/// 4xx/5xx are not treated as errors: SOAP faults come back as HTTP 500 and
/// their body must stay readable.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    agent: Agent,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Self {
        let config = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build();

        Self {
            agent: config.into(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(DEFAULT_HTTP_TIMEOUT)
    }
}

fn classify_error(err: ureq::Error) -> TransportError {
    match err {
        ureq::Error::Io(_)
        | ureq::Error::Timeout(_)
        | ureq::Error::HostNotFound
        | ureq::Error::ConnectionFailed => TransportError::Connection(err.to_string()),
        other => TransportError::Other(Box::new(other)),
    }
}

impl Transport for HttpTransport {
    fn send(&self, call: &SoapCall, mode: ResponseMode) -> Result<WireResponse, TransportError> {
        debug!(
            endpoint = %call.endpoint,
            action = %call.soap_action,
            ?mode,
            "Sending SOAP request"
        );

        // SOAPAction header: "namespace + operation", quoted
        let soap_action_header = format!(r#""{}""#, call.soap_action);

        let mut response = self
            .agent
            .post(&call.endpoint)
            .header("Content-Type", "text/xml; charset=utf-8")
            .header("SOAPAction", &soap_action_header)
            .send(call.body.clone())
            .map_err(classify_error)?;

        let status = response.status().as_u16();
        let raw_body = response
            .body_mut()
            .read_to_string()
            .map_err(classify_error)?;

        debug!(status, bytes = raw_body.len(), "Received SOAP response");

        let envelope = match mode {
            ResponseMode::Raw => None,
            ResponseMode::Parsed => match parse_soap_envelope(raw_body.as_bytes()) {
                Ok(env) => Some(env),
                Err(e) => {
                    debug!(error = %e, "Response body is not a SOAP envelope");
                    None
                }
            },
        };

        Ok(WireResponse {
            status,
            raw_body,
            envelope,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_response_success_range() {
        let mut response = WireResponse {
            status: 200,
            raw_body: String::new(),
            envelope: None,
        };
        assert!(response.is_success());
        response.status = 500;
        assert!(!response.is_success());
    }

    #[test]
    fn test_classify_connection_errors() {
        assert!(matches!(
            classify_error(ureq::Error::HostNotFound),
            TransportError::Connection(_)
        ));
        assert!(matches!(
            classify_error(ureq::Error::ConnectionFailed),
            TransportError::Connection(_)
        ));
        assert!(matches!(
            classify_error(ureq::Error::TooManyRedirects),
            TransportError::Other(_)
        ));
    }
}
