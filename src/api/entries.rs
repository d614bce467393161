//! ACL entries and dictionary items. These belong to the container (ACL or
//! dictionary ID), not to a service version, so no version resolution is
//! involved.

use reqwest::Method;

use super::types::{AclEntry, AclEntryInput, DictionaryItem, DictionaryItemInput};
use super::{ApiError, Client};

impl Client {
    pub async fn list_acl_entries(
        &self,
        service_id: &str,
        acl_id: &str,
    ) -> Result<Vec<AclEntry>, ApiError> {
        self.get(&["service", service_id, "acl", acl_id, "entries"])
            .await
    }

    pub async fn get_acl_entry(
        &self,
        service_id: &str,
        acl_id: &str,
        id: &str,
    ) -> Result<AclEntry, ApiError> {
        self.get(&["service", service_id, "acl", acl_id, "entry", id])
            .await
    }

    pub async fn create_acl_entry(
        &self,
        service_id: &str,
        acl_id: &str,
        input: &AclEntryInput,
    ) -> Result<AclEntry, ApiError> {
        self.send_form(
            Method::POST,
            &["service", service_id, "acl", acl_id, "entry"],
            input,
        )
        .await
    }

    pub async fn update_acl_entry(
        &self,
        service_id: &str,
        acl_id: &str,
        id: &str,
        input: &AclEntryInput,
    ) -> Result<AclEntry, ApiError> {
        self.send_form(
            Method::PATCH,
            &["service", service_id, "acl", acl_id, "entry", id],
            input,
        )
        .await
    }

    pub async fn delete_acl_entry(
        &self,
        service_id: &str,
        acl_id: &str,
        id: &str,
    ) -> Result<(), ApiError> {
        self.delete(&["service", service_id, "acl", acl_id, "entry", id])
            .await
    }

    pub async fn list_dictionary_items(
        &self,
        service_id: &str,
        dictionary_id: &str,
    ) -> Result<Vec<DictionaryItem>, ApiError> {
        self.get(&["service", service_id, "dictionary", dictionary_id, "items"])
            .await
    }

    pub async fn get_dictionary_item(
        &self,
        service_id: &str,
        dictionary_id: &str,
        key: &str,
    ) -> Result<DictionaryItem, ApiError> {
        self.get(&["service", service_id, "dictionary", dictionary_id, "item", key])
            .await
    }

    pub async fn create_dictionary_item(
        &self,
        service_id: &str,
        dictionary_id: &str,
        key: &str,
        value: &str,
    ) -> Result<DictionaryItem, ApiError> {
        let input = DictionaryItemInput {
            item_key: Some(key.to_string()),
            item_value: value.to_string(),
        };
        self.send_form(
            Method::POST,
            &["service", service_id, "dictionary", dictionary_id, "item"],
            &input,
        )
        .await
    }

    pub async fn update_dictionary_item(
        &self,
        service_id: &str,
        dictionary_id: &str,
        key: &str,
        value: &str,
    ) -> Result<DictionaryItem, ApiError> {
        let input = DictionaryItemInput {
            item_key: None,
            item_value: value.to_string(),
        };
        self.send_form(
            Method::PATCH,
            &["service", service_id, "dictionary", dictionary_id, "item", key],
            &input,
        )
        .await
    }

    pub async fn delete_dictionary_item(
        &self,
        service_id: &str,
        dictionary_id: &str,
        key: &str,
    ) -> Result<(), ApiError> {
        self.delete(&["service", service_id, "dictionary", dictionary_id, "item", key])
            .await
    }
}
