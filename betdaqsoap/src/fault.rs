//! SOAP Faults renvoyés par les services BetDAQ

use crate::builder::SoapBuildError;
use crate::parser::find_child_named;
use crate::{SOAP_ENV_NS, SoapBody};
use std::fmt;
use xmltree::{Element, XMLNode};

/// Erreur SOAP (Fault)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapFault {
    /// Code du fault (ex: "soap:Client", "soap:Server")
    pub fault_code: String,

    /// Description de l'erreur
    pub fault_string: String,

    /// Texte du bloc `detail`, s'il est présent
    pub detail: Option<String>,
}

impl fmt::Display for SoapFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.fault_code, self.fault_string)?;
        if let Some(detail) = &self.detail {
            write!(f, " ({})", detail)?;
        }
        Ok(())
    }
}

fn collect_text(elem: &Element, out: &mut Vec<String>) {
    for node in &elem.children {
        match node {
            XMLNode::Text(t) | XMLNode::CData(t) => {
                let t = t.trim();
                if !t.is_empty() {
                    out.push(t.to_string());
                }
            }
            XMLNode::Element(child) => collect_text(child, out),
            _ => {}
        }
    }
}

fn child_text(parent: &Element, name: &str) -> Option<String> {
    find_child_named(parent, name)
        .and_then(|e| e.get_text().map(|t| t.trim().to_string()))
}

/// Extrait le fault du corps SOAP, s'il y en a un
pub fn parse_soap_fault(body: &SoapBody) -> Option<SoapFault> {
    let fault = find_child_named(&body.content, "Fault")?;

    let detail = find_child_named(fault, "detail").and_then(|d| {
        let mut parts = Vec::new();
        collect_text(d, &mut parts);
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    });

    Some(SoapFault {
        fault_code: child_text(fault, "faultcode").unwrap_or_default(),
        fault_string: child_text(fault, "faultstring").unwrap_or_default(),
        detail,
    })
}

/// Construit un SOAP Fault XML
///
/// # Arguments
///
/// * `fault_code` - Code du fault (ex: "soap:Client")
/// * `fault_string` - Message d'erreur
/// * `detail` - Texte de détail optionnel
pub fn build_soap_fault(
    fault_code: &str,
    fault_string: &str,
    detail: Option<&str>,
) -> Result<String, SoapBuildError> {
    let mut fault = Element::new("soap:Fault");

    let mut faultcode_elem = Element::new("faultcode");
    faultcode_elem
        .children
        .push(XMLNode::Text(fault_code.to_string()));
    fault.children.push(XMLNode::Element(faultcode_elem));

    let mut faultstring_elem = Element::new("faultstring");
    faultstring_elem
        .children
        .push(XMLNode::Text(fault_string.to_string()));
    fault.children.push(XMLNode::Element(faultstring_elem));

    if let Some(text) = detail {
        let mut detail_elem = Element::new("detail");
        detail_elem.children.push(XMLNode::Text(text.to_string()));
        fault.children.push(XMLNode::Element(detail_elem));
    }

    let mut body = Element::new("soap:Body");
    body.children.push(XMLNode::Element(fault));

    let mut envelope = Element::new("soap:Envelope");
    envelope
        .attributes
        .insert("xmlns:soap".to_string(), SOAP_ENV_NS.to_string());
    envelope.children.push(XMLNode::Element(body));

    let mut buf = Vec::new();
    let config = xmltree::EmitterConfig::new()
        .perform_indent(true)
        .indent_string("  ");
    envelope.write_with_config(&mut buf, config)?;

    Ok(String::from_utf8(buf)?)
}
