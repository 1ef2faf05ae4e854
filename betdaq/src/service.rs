//! Handles on the two BetDAQ SOAP services

use crate::transport::{ResponseMode, SoapCall, Transport, TransportError, WireResponse};
use betdaqsoap::{
    ExternalApiHeader, SoapBuildError, SoapFault, SoapParseError, build_soap_request,
    parse_soap_envelope, parse_soap_fault,
};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    /// Authenticated service, state-changing operations
    Secure,
    /// Read-only service, market data
    ReadOnly,
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceKind::Secure => write!(f, "secure"),
            ServiceKind::ReadOnly => write!(f, "readonly"),
        }
    }
}

/// Failure while invoking an operation on a service
#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("operation name is empty")]
    EmptyMethod,

    #[error("cannot build SOAP request: {0}")]
    Build(#[from] SoapBuildError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("SOAP fault: {0}")]
    Fault(SoapFault),

    #[error("HTTP status {0} without a SOAP envelope")]
    HttpStatus(u16),

    #[error("invalid SOAP response: {0}")]
    Parse(#[from] SoapParseError),

    #[error("no {0}Response element in SOAP body")]
    MissingResult(String),
}

/// One SOAP service: endpoint, namespace, header and the transport to reach it
#[derive(Clone)]
pub struct ServiceHandle {
    kind: ServiceKind,
    endpoint: String,
    namespace: String,
    header: ExternalApiHeader,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for ServiceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceHandle")
            .field("kind", &self.kind)
            .field("endpoint", &self.endpoint)
            .field("namespace", &self.namespace)
            .field("username", &self.header.username)
            .finish()
    }
}

impl ServiceHandle {
    pub fn new(
        kind: ServiceKind,
        endpoint: impl Into<String>,
        namespace: impl Into<String>,
        header: ExternalApiHeader,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            kind,
            endpoint: endpoint.into(),
            namespace: namespace.into(),
            header,
            transport,
        }
    }

    pub fn kind(&self) -> ServiceKind {
        self.kind
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn header(&self) -> &ExternalApiHeader {
        &self.header
    }

    /// `SOAPAction` header value for an operation
    pub fn soap_action(&self, method: &str) -> String {
        format!("{}{}", self.namespace, method)
    }

    /// Invokes `method` with `params`
    ///
    /// In `Parsed` mode the returned response always carries its envelope and
    /// SOAP faults are turned into [`InvokeError::Fault`]. In `Raw` mode the
    /// body is returned as received.
    pub fn invoke(
        &self,
        method: &str,
        params: &Value,
        mode: ResponseMode,
    ) -> Result<WireResponse, InvokeError> {
        if method.trim().is_empty() {
            return Err(InvokeError::EmptyMethod);
        }

        let body = build_soap_request(&self.namespace, method, params, Some(&self.header))?;
        let call = SoapCall {
            endpoint: self.endpoint.clone(),
            soap_action: self.soap_action(method),
            body,
        };

        debug!(service = %self.kind, method, ?mode, "Invoking operation");
        let mut response = self.transport.send(&call, mode)?;

        if mode == ResponseMode::Raw {
            return Ok(response);
        }

        let envelope = match response.envelope.take() {
            Some(envelope) => envelope,
            None => match parse_soap_envelope(response.raw_body.as_bytes()) {
                Ok(envelope) => envelope,
                Err(_) if !response.is_success() => {
                    warn!(
                        service = %self.kind,
                        method,
                        status = response.status,
                        "HTTP error without SOAP envelope"
                    );
                    return Err(InvokeError::HttpStatus(response.status));
                }
                Err(e) => return Err(e.into()),
            },
        };

        if let Some(fault) = parse_soap_fault(&envelope.body) {
            warn!(service = %self.kind, method, fault = %fault, "SOAP fault");
            return Err(InvokeError::Fault(fault));
        }

        response.envelope = Some(envelope);
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use betdaqsoap::{BETDAQ_API_NS, build_soap_fault};
    use std::sync::Mutex;

    struct Canned {
        status: u16,
        body: String,
        calls: Mutex<Vec<(SoapCall, ResponseMode)>>,
    }

    impl Transport for Canned {
        fn send(
            &self,
            call: &SoapCall,
            mode: ResponseMode,
        ) -> Result<WireResponse, TransportError> {
            self.calls.lock().unwrap().push((call.clone(), mode));
            Ok(WireResponse {
                status: self.status,
                raw_body: self.body.clone(),
                envelope: None,
            })
        }
    }

    fn handle(status: u16, body: &str) -> (ServiceHandle, Arc<Canned>) {
        let transport = Arc::new(Canned {
            status,
            body: body.to_string(),
            calls: Mutex::new(Vec::new()),
        });
        let header = ExternalApiHeader {
            version: "2.0".to_string(),
            currency: "GBP".to_string(),
            language_code: "en".to_string(),
            username: "punter".to_string(),
            password: None,
            application_identifier: None,
        };
        let handle = ServiceHandle::new(
            ServiceKind::ReadOnly,
            "http://localhost/ReadOnlyService.asmx",
            BETDAQ_API_NS,
            header,
            transport.clone(),
        );
        (handle, transport)
    }

    const OK_BODY: &str = r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"><soap:Body><GetPricesResponse xmlns="http://www.GlobalBettingExchange.com/ExternalAPI/"><GetPricesResult><ReturnStatus Code="0"/></GetPricesResult></GetPricesResponse></soap:Body></soap:Envelope>"#;

    #[test]
    fn test_invoke_builds_call() {
        let (handle, transport) = handle(200, OK_BODY);
        let response = handle
            .invoke("GetPrices", &Value::Null, ResponseMode::Parsed)
            .unwrap();
        assert!(response.envelope.is_some());

        let calls = transport.calls.lock().unwrap();
        let (call, mode) = &calls[0];
        assert_eq!(*mode, ResponseMode::Parsed);
        assert_eq!(call.endpoint, "http://localhost/ReadOnlyService.asmx");
        assert_eq!(
            call.soap_action,
            "http://www.GlobalBettingExchange.com/ExternalAPI/GetPrices"
        );
        assert!(call.body.contains("getPricesRequest"));
        assert!(!call.body.contains("password"));
    }

    #[test]
    fn test_invoke_raw_skips_envelope() {
        let (handle, _) = handle(200, "not even xml");
        let response = handle
            .invoke("GetPrices", &Value::Null, ResponseMode::Raw)
            .unwrap();
        assert!(response.envelope.is_none());
        assert_eq!(response.raw_body, "not even xml");
    }

    #[test]
    fn test_invoke_reports_fault() {
        let fault = build_soap_fault("soap:Client", "Invalid credentials", None).unwrap();
        let (handle, _) = handle(500, &fault);
        let err = handle
            .invoke("GetPrices", &Value::Null, ResponseMode::Parsed)
            .unwrap_err();
        match err {
            InvokeError::Fault(f) => assert_eq!(f.fault_string, "Invalid credentials"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_invoke_parses_envelope_on_error_status() {
        let (handle, _) = handle(500, OK_BODY);
        let response = handle
            .invoke("GetPrices", &Value::Null, ResponseMode::Parsed)
            .unwrap();
        assert_eq!(response.status, 500);
        assert!(response.envelope.is_some());
    }

    #[test]
    fn test_invoke_http_error_without_envelope() {
        let (handle, _) = handle(503, "Service Unavailable");
        let err = handle
            .invoke("GetPrices", &Value::Null, ResponseMode::Parsed)
            .unwrap_err();
        assert!(matches!(err, InvokeError::HttpStatus(503)));
    }

    #[test]
    fn test_invoke_garbage_body_is_parse_error() {
        let (handle, _) = handle(200, "<html/>");
        let err = handle
            .invoke("GetPrices", &Value::Null, ResponseMode::Parsed)
            .unwrap_err();
        assert!(matches!(err, InvokeError::Parse(SoapParseError::MissingEnvelope)));
    }

    #[test]
    fn test_invoke_rejects_empty_method() {
        let (handle, transport) = handle(200, OK_BODY);
        let err = handle
            .invoke("  ", &Value::Null, ResponseMode::Parsed)
            .unwrap_err();
        assert!(matches!(err, InvokeError::EmptyMethod));
        assert!(transport.calls.lock().unwrap().is_empty());
    }
}
