//! Construction des requêtes SOAP BetDAQ

use crate::SOAP_ENV_NS;
use serde_json::Value;
use xmltree::{Element, XMLNode};

/// Erreur de construction d'une enveloppe SOAP
#[derive(Debug, thiserror::Error)]
pub enum SoapBuildError {
    #[error("XML emit error: {0}")]
    Xml(#[from] xmltree::Error),

    #[error("Emitted XML is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Invalid parameter '{0}': {1}")]
    InvalidParam(String, String),
}

/// En-tête `ExternalApiHeader` attendu par tous les services BetDAQ
///
/// Le service sécurisé exige `password`, le service readonly s'en passe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalApiHeader {
    pub version: String,
    pub currency: String,
    pub language_code: String,
    pub username: String,
    pub password: Option<String>,
    pub application_identifier: Option<String>,
}

impl ExternalApiHeader {
    /// Construit l'élément XML de l'en-tête dans le namespace donné
    pub fn to_element(&self, namespace: &str) -> Element {
        let mut header = Element::new("ExternalApiHeader");
        let attributes = &mut header.attributes;
        attributes.insert("xmlns".to_string(), namespace.to_string());
        attributes.insert("version".to_string(), self.version.clone());
        attributes.insert("currency".to_string(), self.currency.clone());
        attributes.insert("languageCode".to_string(), self.language_code.clone());
        attributes.insert("username".to_string(), self.username.clone());
        if let Some(password) = &self.password {
            attributes.insert("password".to_string(), password.clone());
        }
        if let Some(app_id) = &self.application_identifier {
            attributes.insert("applicationIdentifier".to_string(), app_id.clone());
        }
        header
    }
}

fn build_soap_envelope(
    header_child: Option<Element>,
    body_child: Element,
) -> Result<String, SoapBuildError> {
    let mut envelope = Element::new("soap:Envelope");
    envelope
        .attributes
        .insert("xmlns:soap".to_string(), SOAP_ENV_NS.to_string());

    if let Some(child) = header_child {
        let mut header = Element::new("soap:Header");
        header.children.push(XMLNode::Element(child));
        envelope.children.push(XMLNode::Element(header));
    }

    let mut body = Element::new("soap:Body");
    body.children.push(XMLNode::Element(body_child));
    envelope.children.push(XMLNode::Element(body));

    let mut buf = Vec::new();
    let config = xmltree::EmitterConfig::new()
        .write_document_declaration(true)
        .perform_indent(false);
    envelope.write_with_config(&mut buf, config)?;

    Ok(String::from_utf8(buf)?)
}

/// Nom de l'élément de requête d'une opération : `GetOddsLadder` → `getOddsLadderRequest`
pub fn request_element_name(method: &str) -> String {
    let mut chars = method.chars();
    match chars.next() {
        Some(first) => format!("{}{}Request", first.to_lowercase(), chars.as_str()),
        None => "Request".to_string(),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn append_child(parent: &mut Element, name: &str, value: &Value) -> Result<(), SoapBuildError> {
    match value {
        Value::Null => Ok(()),
        Value::Array(items) => {
            for item in items {
                append_child(parent, name, item)?;
            }
            Ok(())
        }
        _ => {
            let mut child = Element::new(name);
            apply_value(&mut child, name, value)?;
            parent.children.push(XMLNode::Element(child));
            Ok(())
        }
    }
}

/// Applique une valeur JSON sur un élément (convention xmltodict : `@attr`, `#text`)
fn apply_value(elem: &mut Element, name: &str, value: &Value) -> Result<(), SoapBuildError> {
    match value {
        Value::Null => Ok(()),
        Value::Object(map) => {
            for (key, v) in map {
                if let Some(attr) = key.strip_prefix('@') {
                    match v {
                        Value::Null => {}
                        _ => {
                            let text = scalar_text(v).ok_or_else(|| {
                                SoapBuildError::InvalidParam(
                                    key.clone(),
                                    "attribute value must be a scalar".to_string(),
                                )
                            })?;
                            elem.attributes.insert(attr.to_string(), text);
                        }
                    }
                } else if key == "#text" {
                    if let Some(text) = scalar_text(v) {
                        elem.children.push(XMLNode::Text(text));
                    }
                } else {
                    append_child(elem, key, v)?;
                }
            }
            Ok(())
        }
        Value::Array(_) => Err(SoapBuildError::InvalidParam(
            name.to_string(),
            "a sequence must be the value of a named field".to_string(),
        )),
        scalar => {
            if let Some(text) = scalar_text(scalar) {
                elem.children.push(XMLNode::Text(text));
            }
            Ok(())
        }
    }
}

/// Construit une requête SOAP BetDAQ
///
/// # Arguments
///
/// * `namespace` - Namespace de l'API (ex: [`crate::BETDAQ_API_NS`])
/// * `method` - Nom de l'opération (ex: "GetOddsLadder")
/// * `params` - Paramètres de l'opération, appliqués sur `<getOddsLadderRequest>`
/// * `header` - En-tête `ExternalApiHeader` optionnel
///
/// Les clés préfixées par `@` deviennent des attributs, `#text` le texte de
/// l'élément, les tableaux répètent l'élément et `null` est omis.
pub fn build_soap_request(
    namespace: &str,
    method: &str,
    params: &Value,
    header: Option<&ExternalApiHeader>,
) -> Result<String, SoapBuildError> {
    let mut method_elem = Element::new(method);
    method_elem
        .attributes
        .insert("xmlns".to_string(), namespace.to_string());

    let request_name = request_element_name(method);
    let mut request_elem = Element::new(&request_name);
    apply_value(&mut request_elem, &request_name, params)?;
    method_elem.children.push(XMLNode::Element(request_elem));

    build_soap_envelope(header.map(|h| h.to_element(namespace)), method_elem)
}

/// Construit une réponse SOAP BetDAQ
///
/// `result` est renommé `{method}Result` et placé dans `{method}Response`.
pub fn build_soap_response(
    namespace: &str,
    method: &str,
    mut result: Element,
) -> Result<String, SoapBuildError> {
    let mut response_elem = Element::new(&format!("{}Response", method));
    response_elem
        .attributes
        .insert("xmlns".to_string(), namespace.to_string());

    result.name = format!("{}Result", method);
    response_elem.children.push(XMLNode::Element(result));

    build_soap_envelope(None, response_elem)
}
