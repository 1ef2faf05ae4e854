//! Sérialisation typée des éléments `*Result` en `serde_json::Value`

use crate::mapping::{insert_repeated, local_name};
use serde_json::{Map, Value};
use tracing::warn;
use xmltree::{Element, EmitterConfig, XMLNode};

/// Clé recevant les enfants qui n'appartiennent pas au namespace de l'API
pub const RAW_ELEMENTS_KEY: &str = "_raw_elements";

/// Clé recevant le texte d'un élément qui porte aussi des attributs
pub const SIMPLE_CONTENT_KEY: &str = "_value_1";

fn typed_scalar(text: &str) -> Value {
    let trimmed = text.trim();

    match trimmed {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }

    // Seuls les entiers i64 exacts sont typés : "007" ou "2.10" restent des chaînes
    if let Ok(i) = trimmed.parse::<i64>() {
        if i.to_string() == trimmed {
            return Value::Number(i.into());
        }
    }

    Value::String(trimmed.to_string())
}

fn raw_xml(elem: &Element) -> Option<String> {
    let mut buf = Vec::new();
    let config = EmitterConfig::new().write_document_declaration(false);
    match elem.write_with_config(&mut buf, config) {
        Ok(()) => Some(String::from_utf8_lossy(&buf).into_owned()),
        Err(e) => {
            warn!(element = %elem.name, error = %e, "Cannot serialize raw element");
            None
        }
    }
}

fn is_foreign(elem: &Element, api_namespace: &str) -> bool {
    matches!(&elem.namespace, Some(ns) if ns != api_namespace)
}

/// Convertit un élément de résultat en structure imbriquée simple
///
/// - attributs et enfants deviennent des champs (nom local)
/// - entiers i64 et booléens sont typés, le reste (décimaux compris) reste en chaîne
/// - le texte d'un élément à attributs est rangé sous [`SIMPLE_CONTENT_KEY`]
/// - les enfants répétés deviennent des listes, les éléments vides `null`
/// - les enfants d'un autre namespace sont conservés en XML sous [`RAW_ELEMENTS_KEY`]
pub fn serialize_result(element: &Element, api_namespace: &str) -> Value {
    let text = element
        .get_text()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());
    let children: Vec<&Element> = element
        .children
        .iter()
        .filter_map(XMLNode::as_element)
        .collect();

    if element.attributes.is_empty() && children.is_empty() {
        return text.map(|t| typed_scalar(&t)).unwrap_or(Value::Null);
    }

    let mut map = Map::new();
    for (name, value) in &element.attributes {
        map.insert(local_name(name).to_string(), typed_scalar(value));
    }

    let mut raw_elements = Vec::new();
    for child in children {
        if is_foreign(child, api_namespace) {
            if let Some(xml) = raw_xml(child) {
                raw_elements.push(Value::String(xml));
            }
            continue;
        }
        insert_repeated(
            &mut map,
            local_name(&child.name).to_string(),
            serialize_result(child, api_namespace),
        );
    }

    if let Some(text) = text {
        map.insert(SIMPLE_CONTENT_KEY.to_string(), typed_scalar(&text));
    }
    if !raw_elements.is_empty() {
        map.insert(RAW_ELEMENTS_KEY.to_string(), Value::Array(raw_elements));
    }

    Value::Object(map)
}
