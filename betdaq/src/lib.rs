//! # Client SOAP BetDAQ
//!
//! Adaptateur entre une application et l'API d'échange de paris BetDAQ.
//!
//! ## Fonctionnalités
//!
//! - ✅ Service sécurisé (authentifié) et service readonly
//! - ✅ Mode brut par appel sur le service readonly
//! - ✅ Erreur unique [`ApiError`] (connexion, fault, statut, invocation)
//! - ✅ Réponses normalisées `{data, date_time_sent, date_time_received}`
//! - ✅ Configuration YAML via `betdaqconfig`
//!
//! ## Exemple
//!
//! ```no_run
//! use betdaq::{Client, ClientSettings, RequestGateway};
//! use chrono::Utc;
//! use serde_json::json;
//!
//! let client = Client::new(ClientSettings::new("punter", "secret"));
//! let gateway = RequestGateway::new(&client);
//!
//! let sent = Utc::now().naive_utc();
//! let response = gateway.request("GetOddsLadder", &json!({"@PriceFormat": 1}), false, false)?;
//! let result = RequestGateway::process_response(response, sent, Some("Ladder"), None);
//! println!("{}", result.data);
//! # Ok::<(), betdaq::ApiError>(())
//! ```

pub mod client;
pub mod config_ext;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod service;
pub mod transport;
pub mod utils;

pub use client::{Client, ClientSettings};
pub use config_ext::BetdaqConfigExt;
pub use error::{ApiError, BoxError, ErrorCause, Result};
pub use gateway::{RequestGateway, RequestResult};
pub use logging::init_logging;
pub use service::{InvokeError, ServiceHandle, ServiceKind};
pub use transport::{HttpTransport, ResponseMode, SoapCall, Transport, TransportError, WireResponse};
pub use utils::{StatusFailure, check_status_code, check_status_code_with, make_tz_naive};

pub use betdaqsoap::elem2dict;
