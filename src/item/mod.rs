//! Normalized representation of remote CRM records.

use serde::{Deserialize, Serialize};

/// Kind of CRM record an item was derived from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Company,
    Contact,
}

/// A CRM record normalized for cross-provider display.
///
/// Derived and stateless: constructed fresh on every fetch, never stored.
/// Timestamps are carried through as the provider sent them, unparsed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntegrationItem {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_time: Option<String>,
    /// Always unset for HubSpot: the object namespace is flat.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}
