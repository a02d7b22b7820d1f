//! HubSpot CRM object aggregation.
//!
//! Given retrieved credentials, fetches the companies and contacts
//! collections and normalizes each record into an [`IntegrationItem`].

mod api;
mod transformer;

pub use api::{HubSpotClient, HubSpotObject};
pub use transformer::object_to_item;

use crate::credentials::CredentialRecord;
use crate::error::IntegrationError;
use crate::item::{IntegrationItem, ItemType};

/// Fetch and normalize all items visible to the given credentials.
///
/// Both collection fetches must succeed; partial results are never
/// returned. Output preserves remote response order, companies before
/// contacts.
pub async fn fetch_items(
    credentials: &CredentialRecord,
    api_base_url: &str,
) -> Result<Vec<IntegrationItem>, IntegrationError> {
    let access_token = credentials
        .access_token
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or(IntegrationError::MissingAccessToken)?;

    let client = HubSpotClient::new(access_token.to_string(), api_base_url.to_string());

    let companies = client.fetch_companies().await?;
    let contacts = client.fetch_contacts().await?;

    let mut items: Vec<IntegrationItem> = companies
        .iter()
        .map(|c| object_to_item(c, ItemType::Company))
        .collect();
    items.extend(contacts.iter().map(|c| object_to_item(c, ItemType::Contact)));

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn record(json: &str) -> CredentialRecord {
        serde_json::from_str(json).unwrap()
    }

    #[tokio::test]
    async fn test_missing_access_token_makes_no_request() {
        // Unroutable base URL: a network attempt would error differently
        let err = fetch_items(&record(r#"{"scope": "crm"}"#), "http://127.0.0.1:1")
            .await
            .unwrap_err();
        assert!(matches!(err, IntegrationError::MissingAccessToken));
    }

    #[tokio::test]
    async fn test_empty_access_token_rejected() {
        let err = fetch_items(&record(r#"{"access_token": ""}"#), "http://127.0.0.1:1")
            .await
            .unwrap_err();
        assert!(matches!(err, IntegrationError::MissingAccessToken));
    }

    #[tokio::test]
    async fn test_aggregates_companies_before_contacts() {
        let mut server = Server::new_async().await;
        let _companies = server
            .mock("GET", "/crm/v3/objects/companies")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"results": [
                    {"id": "1", "properties": {"name": "Acme"}},
                    {"id": "2", "properties": {"name": "Globex"}}
                ]}"#,
            )
            .create_async()
            .await;
        let _contacts = server
            .mock("GET", "/crm/v3/objects/contacts")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"results": [{"id": "9", "properties": {"name": "Jane Doe"}}]}"#)
            .create_async()
            .await;

        let items = fetch_items(&record(r#"{"access_token": "tok"}"#), &server.url())
            .await
            .unwrap();

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].name, "Acme");
        assert_eq!(items[0].item_type, ItemType::Company);
        assert_eq!(items[1].name, "Globex");
        assert_eq!(items[2].name, "Jane Doe");
        assert_eq!(items[2].item_type, ItemType::Contact);
    }

    #[tokio::test]
    async fn test_single_company_example() {
        let mut server = Server::new_async().await;
        let _companies = server
            .mock("GET", "/crm/v3/objects/companies")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"results": [{"id": 1, "properties": {"name": "Acme"}}]}"#)
            .create_async()
            .await;
        let _contacts = server
            .mock("GET", "/crm/v3/objects/contacts")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"results": []}"#)
            .create_async()
            .await;

        let items = fetch_items(&record(r#"{"access_token": "tok"}"#), &server.url())
            .await
            .unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "1");
        assert_eq!(items[0].name, "Acme");
        assert_eq!(items[0].item_type, ItemType::Company);
    }

    #[tokio::test]
    async fn test_contact_fetch_failure_aborts_aggregation() {
        let mut server = Server::new_async().await;
        let _companies = server
            .mock("GET", "/crm/v3/objects/companies")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"results": [{"id": "1", "properties": {"name": "Acme"}}]}"#)
            .create_async()
            .await;
        let _contacts = server
            .mock("GET", "/crm/v3/objects/contacts")
            .with_status(500)
            .with_body("upstream down")
            .create_async()
            .await;

        let err = fetch_items(&record(r#"{"access_token": "tok"}"#), &server.url())
            .await
            .unwrap_err();

        match err {
            IntegrationError::UpstreamFetchFailed { collection, .. } => {
                assert_eq!(collection, "contacts");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
