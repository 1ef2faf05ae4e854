//! Error type returned by every BetDAQ API call

use betdaqsoap::SoapFault;
use serde_json::Value;
use thiserror::Error;

/// Boxed error preserved as the cause of a failed invocation
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias for BetDAQ operations
pub type Result<T> = std::result::Result<T, ApiError>;

fn describe_status(description: &Option<String>) -> &str {
    description
        .as_deref()
        .unwrap_or("unsuccessful return status")
}

/// Why a call failed
#[derive(Debug, Error)]
pub enum ErrorCause {
    /// The service could not be reached
    #[error("ConnectionError")]
    Connection(String),

    /// The service answered with a SOAP fault
    #[error("SOAP fault: {0}")]
    Fault(SoapFault),

    /// The call went through but `ReturnStatus` is not a success
    #[error("{}", describe_status(.description))]
    Status { description: Option<String> },

    /// Any other failure, original error kept as source
    #[error("{0}")]
    Invocation(#[source] BoxError),
}

/// Single error type raised by [`crate::RequestGateway`]
#[derive(Debug, Error)]
#[error("{method} failed (status {status:?}): {cause}")]
pub struct ApiError {
    /// `ReturnStatus.Code` when the response carried one
    pub status: Option<i64>,
    pub method: String,
    pub params: Value,
    #[source]
    pub cause: ErrorCause,
}

impl ApiError {
    pub fn new(status: Option<i64>, method: &str, params: &Value, cause: ErrorCause) -> Self {
        Self {
            status,
            method: method.to_string(),
            params: params.clone(),
            cause,
        }
    }

    pub fn connection(method: &str, params: &Value, detail: impl Into<String>) -> Self {
        Self::new(None, method, params, ErrorCause::Connection(detail.into()))
    }

    pub fn invocation<E>(method: &str, params: &Value, error: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::new(None, method, params, ErrorCause::Invocation(error.into()))
    }

    /// Whether the service could not be reached
    pub fn is_connection_error(&self) -> bool {
        matches!(self.cause, ErrorCause::Connection(_))
    }

    /// Whether the call went through with a failing return code
    pub fn is_status_error(&self) -> bool {
        matches!(self.cause, ErrorCause::Status { .. })
    }
}
