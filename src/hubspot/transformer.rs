//! Mapping from raw CRM records to normalized items.

use serde_json::Value;

use super::api::HubSpotObject;
use crate::item::{IntegrationItem, ItemType};

/// Placeholder for records without a `name` property.
const UNNAMED: &str = "Unnamed";

fn stringify_id(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Map one raw record to an [`IntegrationItem`].
///
/// Pure: id stringified, name defaulted, timestamps carried through
/// unparsed, parent left unset (the object namespace is flat).
pub fn object_to_item(object: &HubSpotObject, item_type: ItemType) -> IntegrationItem {
    let name = object
        .properties
        .get("name")
        .and_then(|v| v.as_str())
        .unwrap_or(UNNAMED)
        .to_string();

    IntegrationItem {
        id: stringify_id(&object.id),
        name,
        item_type,
        creation_time: object.created_at.clone(),
        last_modified_time: object.updated_at.clone(),
        parent_id: None,
    }
}
