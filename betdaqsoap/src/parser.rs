//! Parser SOAP pour les réponses BetDAQ

use super::{SoapBody, SoapEnvelope, SoapHeader};
use crate::mapping::local_name;
use std::io::BufReader;
use xmltree::{Element, XMLNode};

/// Erreur de parsing SOAP
#[derive(Debug, thiserror::Error)]
pub enum SoapParseError {
    #[error("XML parse error: {0}")]
    XmlError(#[from] xmltree::ParseError),

    #[error("Missing SOAP Envelope")]
    MissingEnvelope,

    #[error("Missing SOAP Body")]
    MissingBody,
}

/// Parse une enveloppe SOAP complète
pub fn parse_soap_envelope(xml: &[u8]) -> Result<SoapEnvelope, SoapParseError> {
    let reader = BufReader::new(xml);
    let root = Element::parse(reader)?;

    if local_name(&root.name) != "Envelope" {
        return Err(SoapParseError::MissingEnvelope);
    }

    let header = find_child_named(&root, "Header").map(|e| SoapHeader { content: e.clone() });

    let body_elem = find_child_named(&root, "Body").ok_or(SoapParseError::MissingBody)?;

    let body = SoapBody {
        content: body_elem.clone(),
    };

    Ok(SoapEnvelope { header, body })
}

/// Parse un fragment XML isolé (typiquement une entrée de `_raw_elements`)
pub fn parse_raw_element(xml: &str) -> Result<Element, SoapParseError> {
    Ok(Element::parse(BufReader::new(xml.as_bytes()))?)
}

/// Premier enfant dont le nom local est exactement `name`
pub fn find_child_named<'a>(parent: &'a Element, name: &str) -> Option<&'a Element> {
    parent.children.iter().find_map(|node| match node {
        XMLNode::Element(elem) if local_name(&elem.name) == name => Some(elem),
        _ => None,
    })
}

/// Localise `{method}Result` dans `{method}Response`
///
/// Si la réponse ne contient pas d'élément `Result`, l'élément `Response`
/// lui-même est renvoyé.
pub fn find_result_element<'a>(body: &'a SoapBody, method: &str) -> Option<&'a Element> {
    let response_name = format!("{}Response", method);
    let result_name = format!("{}Result", method);

    let response = find_child_named(&body.content, &response_name)?;
    Some(find_child_named(response, &result_name).unwrap_or(response))
}
