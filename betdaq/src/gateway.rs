//! Point d'entrée des appels à l'API BetDAQ
//!
//! [`RequestGateway::request`] invoque une opération sur l'un des deux
//! services et ramène toute erreur à [`ApiError`]. [`RequestGateway::process_response`]
//! met en forme une réponse réussie pour les endpoints.

use crate::client::Client;
use crate::error::{ApiError, ErrorCause, Result};
use crate::service::{InvokeError, ServiceHandle};
use crate::transport::{ResponseMode, TransportError, WireResponse};
use crate::utils::{check_status_code, is_truthy, make_tz_naive};
use betdaqsoap::{
    RAW_ELEMENTS_KEY, body_to_mapping, find_result_element, parse_soap_envelope, serialize_result,
};
use chrono::{NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Réponse normalisée renvoyée aux endpoints
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestResult {
    pub data: Value,
    pub date_time_sent: NaiveDateTime,
    /// Toujours sans fuseau, heure UTC
    pub date_time_received: NaiveDateTime,
}

/// Répartit les opérations sur un [`Client`] emprunté
#[derive(Debug, Clone, Copy)]
pub struct RequestGateway<'a> {
    client: &'a Client,
}

impl<'a> RequestGateway<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &'a Client {
        self.client
    }

    /// Invoque `method` avec `params`
    ///
    /// `secure` choisit le service sécurisé, sinon le service readonly est
    /// utilisé. `raw` ne vaut que pour le service readonly : le body SOAP est
    /// alors renvoyé tel quel sous forme de mapping, sans conversion ni
    /// contrôle du statut.
    pub fn request(&self, method: &str, params: &Value, secure: bool, raw: bool) -> Result<Value> {
        let handle = if secure {
            if raw {
                debug!(method, "Raw mode ignored on the secure service");
            }
            self.client.secure_client()
        } else {
            self.client.readonly_client()
        };

        if !secure && raw {
            let response = handle
                .invoke(method, params, ResponseMode::Raw)
                .map_err(|e| invoke_error(method, params, e))?;
            return decode_raw(method, params, &response);
        }

        let response = handle
            .invoke(method, params, ResponseMode::Parsed)
            .map_err(|e| invoke_error(method, params, e))?;
        decode_parsed(handle, method, params, &response)
    }

    /// Met en forme une réponse déjà convertie
    ///
    /// - `Timestamp` donne `date_time_received` (heure courante à défaut)
    /// - si `error_handler` est fourni et que la réponse porte des
    ///   `_raw_elements`, la réponse passe d'abord par le handler
    /// - `result_target` sélectionne le champ renvoyé dans `data` (`[]` s'il
    ///   est absent), sinon toute la réponse est renvoyée
    pub fn process_response(
        response: Value,
        date_time_sent: NaiveDateTime,
        result_target: Option<&str>,
        error_handler: Option<&dyn Fn(Value) -> Value>,
    ) -> RequestResult {
        let date_time_received = response
            .get("Timestamp")
            .and_then(make_tz_naive)
            .unwrap_or_else(|| Utc::now().naive_utc());

        let raw_elements = response.get(RAW_ELEMENTS_KEY).is_some_and(is_truthy);
        let response = match error_handler {
            Some(handler) if raw_elements => handler(response),
            _ => response,
        };

        let data = match result_target {
            Some(target) => response
                .get(target)
                .cloned()
                .unwrap_or_else(|| Value::Array(Vec::new())),
            None => response,
        };

        RequestResult {
            data,
            date_time_sent,
            date_time_received,
        }
    }
}

fn invoke_error(method: &str, params: &Value, err: InvokeError) -> ApiError {
    match err {
        InvokeError::Transport(TransportError::Connection(detail)) => {
            warn!(method, %detail, "BetDAQ service unreachable");
            ApiError::connection(method, params, detail)
        }
        InvokeError::Transport(TransportError::Other(source)) => {
            ApiError::new(None, method, params, ErrorCause::Invocation(source))
        }
        InvokeError::Fault(fault) => ApiError::new(None, method, params, ErrorCause::Fault(fault)),
        other => ApiError::invocation(method, params, other),
    }
}

fn decode_raw(method: &str, params: &Value, response: &WireResponse) -> Result<Value> {
    let envelope = parse_soap_envelope(response.raw_body.as_bytes())
        .map_err(|e| ApiError::invocation(method, params, InvokeError::Parse(e)))?;
    debug!(method, status = response.status, "Returning raw SOAP body");
    Ok(Value::Object(body_to_mapping(&envelope.body.content)))
}

fn decode_parsed(
    handle: &ServiceHandle,
    method: &str,
    params: &Value,
    response: &WireResponse,
) -> Result<Value> {
    let result = response
        .envelope
        .as_ref()
        .and_then(|envelope| find_result_element(&envelope.body, method))
        .ok_or_else(|| {
            ApiError::invocation(method, params, InvokeError::MissingResult(method.to_string()))
        })?;

    let data = serialize_result(result, handle.namespace());

    if let Err(failure) = check_status_code(&data) {
        warn!(method, code = ?failure.code, "Unsuccessful return status");
        return Err(ApiError::new(
            failure.code,
            method,
            params,
            ErrorCause::Status {
                description: failure.description,
            },
        ));
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn sent() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 4)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_process_response_result_target() {
        let response = json!({"Foo": [1, 2, 3], "Timestamp": "2024-05-04T13:00:01+01:00"});
        let result = RequestGateway::process_response(response, sent(), Some("Foo"), None);

        assert_eq!(result.data, json!([1, 2, 3]));
        assert_eq!(result.date_time_sent, sent());
        assert_eq!(
            result.date_time_received,
            NaiveDate::from_ymd_opt(2024, 5, 4)
                .unwrap()
                .and_hms_opt(12, 0, 1)
                .unwrap()
        );
    }

    #[test]
    fn test_process_response_missing_target_defaults_to_empty_list() {
        let result =
            RequestGateway::process_response(json!({"Bar": 1}), sent(), Some("Foo"), None);
        assert_eq!(result.data, json!([]));
    }

    #[test]
    fn test_process_response_serializes() {
        let response = json!({"Timestamp": "2024-05-04T12:00:01Z"});
        let result = RequestGateway::process_response(response, sent(), None, None);
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["date_time_sent"], json!("2024-05-04T12:00:00"));
        assert_eq!(value["date_time_received"], json!("2024-05-04T12:00:01"));
    }
}
