//! Conversions d'arbres XML en mappings génériques

use serde_json::{Map, Value};
use xmltree::{Element, XMLNode};

/// Nom local d'une balise, sans namespace `{uri}` ni préfixe `ns:`
pub fn local_name(tag: &str) -> &str {
    let tag = match tag.rfind('}') {
        Some(idx) => &tag[idx + 1..],
        None => tag,
    };
    match tag.rfind(':') {
        Some(idx) => &tag[idx + 1..],
        None => tag,
    }
}

fn child_elements(node: &Element) -> impl Iterator<Item = &Element> {
    node.children.iter().filter_map(XMLNode::as_element)
}

/// Insère une valeur ; une clé répétée accumule ses valeurs dans une liste
pub(crate) fn insert_repeated(map: &mut Map<String, Value>, key: String, value: Value) {
    match map.get_mut(&key) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            map.insert(key, value);
        }
    }
}

/// Texte placé avant le premier nœud enfant (ni les enfants ni la queue)
fn leading_text(elem: &Element) -> Option<&str> {
    match elem.children.first() {
        Some(XMLNode::Text(t)) | Some(XMLNode::CData(t)) => Some(t.as_str()),
        _ => None,
    }
}

/// Convertit un arbre XML en mapping imbriqué
///
/// Chaque enfant devient une clé (nom local). Un enfant dont le texte initial
/// n'est pas vide donne ce texte, sinon ses propres enfants sont convertis récursivement.
/// Les attributs sont ignorés. Des frères de même nom produisent une liste
/// `[v1, v2, v3, ...]`.
pub fn elem2dict(node: &Element) -> Map<String, Value> {
    let mut result = Map::new();

    for element in child_elements(node) {
        let key = local_name(&element.name).to_string();

        let value = match leading_text(element) {
            Some(text) if !text.trim().is_empty() => Value::String(text.to_string()),
            _ => Value::Object(elem2dict(element)),
        };

        insert_repeated(&mut result, key, value);
    }

    result
}

fn node_value(elem: &Element) -> Value {
    let text = elem
        .get_text()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());
    let has_children = child_elements(elem).next().is_some();

    if elem.attributes.is_empty() && !has_children {
        return text.map(Value::String).unwrap_or(Value::Null);
    }

    let mut map = Map::new();
    for (name, value) in &elem.attributes {
        map.insert(
            format!("@{}", local_name(name)),
            Value::String(value.clone()),
        );
    }
    for child in child_elements(elem) {
        insert_repeated(&mut map, local_name(&child.name).to_string(), node_value(child));
    }
    if let Some(text) = text {
        map.insert("#text".to_string(), Value::String(text));
    }

    Value::Object(map)
}

/// Convertit le contenu brut d'un corps SOAP en mapping
///
/// Les attributs sont conservés sous `@nom`, le texte d'un élément qui porte
/// aussi des attributs ou des enfants sous `#text`. Les préfixes de namespace
/// sont retirés des clés.
pub fn body_to_mapping(body: &Element) -> Map<String, Value> {
    let mut result = Map::new();
    for child in child_elements(body) {
        insert_repeated(&mut result, local_name(&child.name).to_string(), node_value(child));
    }
    result
}
