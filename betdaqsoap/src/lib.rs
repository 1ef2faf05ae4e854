//! # Module SOAP pour l'API BetDAQ
//!
//! Cette crate implémente la couche SOAP utilisée par le client BetDAQ :
//! construction des enveloppes de requête, parsing des réponses et des faults,
//! et conversion des arbres XML en mappings `serde_json`.
//!
//! ## Fonctionnalités
//!
//! - ✅ Construction d'enveloppes SOAP 1.1 avec `ExternalApiHeader`
//! - ✅ Parsing d'enveloppes SOAP et extraction des `*Result`
//! - ✅ Détection des SOAP Faults
//! - ✅ Conversion XML → mapping (`elem2dict`, corps brut, résultat typé)
//!
//! ## Architecture
//!
//! - [`SoapEnvelope`] : Enveloppe SOAP complète
//! - [`ExternalApiHeader`] : En-tête d'authentification BetDAQ
//! - [`SoapFault`] : Erreur SOAP
//! - [`elem2dict`], [`body_to_mapping`], [`serialize_result`] : conversions
//!
//! ## Exemple
//!
//! ```ignore
//! use betdaqsoap::{parse_soap_envelope, find_result_element, serialize_result, BETDAQ_API_NS};
//!
//! let envelope = parse_soap_envelope(body.as_bytes())?;
//! let result = find_result_element(&envelope.body, "GetAccountBalances").unwrap();
//! let data = serialize_result(result, BETDAQ_API_NS);
//! assert_eq!(data["ReturnStatus"]["Code"], 0);
//! ```

mod builder;
mod envelope;
mod fault;
mod mapping;
mod parser;
mod serialize;

pub use builder::{
    ExternalApiHeader, SoapBuildError, build_soap_request, build_soap_response,
    request_element_name,
};
pub use envelope::{SoapBody, SoapEnvelope, SoapHeader};
pub use fault::{SoapFault, build_soap_fault, parse_soap_fault};
pub use mapping::{body_to_mapping, elem2dict, local_name};
pub use parser::{
    SoapParseError, find_child_named, find_result_element, parse_raw_element,
    parse_soap_envelope,
};
pub use serialize::{RAW_ELEMENTS_KEY, SIMPLE_CONTENT_KEY, serialize_result};

/// Namespace des enveloppes SOAP 1.1
pub const SOAP_ENV_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// Namespace des opérations de l'API externe BetDAQ
pub const BETDAQ_API_NS: &str = "http://www.GlobalBettingExchange.com/ExternalAPI/";
