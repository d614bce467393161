//! KV stores and their entries. These are account-level resources under
//! `/resources/stores/kv` and use JSON bodies with cursor pagination.

use reqwest::Method;
use serde_json::json;
use tracing::debug;

use super::types::{KvStore, Page};
use super::{ApiError, Client};

const PAGE_LIMIT: &str = "1000";

impl Client {
    pub async fn list_kv_stores(&self) -> Result<Vec<KvStore>, ApiError> {
        self.collect_pages(&["resources", "stores", "kv"]).await
    }

    pub async fn get_kv_store(&self, id: &str) -> Result<KvStore, ApiError> {
        self.get(&["resources", "stores", "kv", id]).await
    }

    pub async fn create_kv_store(&self, name: &str) -> Result<KvStore, ApiError> {
        let url = self.url(&["resources", "stores", "kv"]);
        self.json(
            self.request(Method::POST, url)
                .json(&json!({ "name": name })),
        )
        .await
    }

    pub async fn delete_kv_store(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&["resources", "stores", "kv", id]).await
    }

    pub async fn list_kv_keys(&self, store_id: &str) -> Result<Vec<String>, ApiError> {
        self.collect_pages(&["resources", "stores", "kv", store_id, "keys"])
            .await
    }

    /// The stored value, byte for byte.
    pub async fn get_kv_entry(&self, store_id: &str, key: &str) -> Result<Vec<u8>, ApiError> {
        let url = self.url(&["resources", "stores", "kv", store_id, "keys", key]);
        let resp = self.execute(self.request(Method::GET, url)).await?;
        Ok(resp.bytes().await?.to_vec())
    }

    pub async fn put_kv_entry(&self, store_id: &str, key: &str, value: &str) -> Result<(), ApiError> {
        let url = self.url(&["resources", "stores", "kv", store_id, "keys", key]);
        self.execute(self.request(Method::PUT, url).body(value.to_string()))
            .await?;
        Ok(())
    }

    pub async fn delete_kv_entry(&self, store_id: &str, key: &str) -> Result<(), ApiError> {
        self.delete(&["resources", "stores", "kv", store_id, "keys", key])
            .await
    }

    async fn collect_pages<T>(&self, segments: &[&str]) -> Result<Vec<T>, ApiError>
    where
        T: serde::de::DeserializeOwned,
    {
        let mut items = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let mut url = self.url(segments);
            {
                let mut query = url.query_pairs_mut();
                query.append_pair("limit", PAGE_LIMIT);
                if let Some(c) = &cursor {
                    query.append_pair("cursor", c);
                }
            }
            let page: Page<T> = self.json(self.request(Method::GET, url)).await?;
            items.extend(page.data);
            match page.meta.next_cursor.filter(|c| !c.is_empty()) {
                Some(next) if cursor.as_deref() != Some(next.as_str()) => cursor = Some(next),
                Some(next) => {
                    debug!(cursor = %next, "cursor did not advance, stopping");
                    return Ok(items);
                }
                None => return Ok(items),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use std::time::Duration;

    #[tokio::test]
    async fn keys_follow_cursor() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/resources/stores/kv/st1/keys")
            .match_query(Matcher::Regex("^limit=1000$".into()))
            .with_body(r#"{"data":["a","b"],"meta":{"next_cursor":"c2"}}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/resources/stores/kv/st1/keys")
            .match_query(Matcher::Regex("cursor=c2".into()))
            .with_body(r#"{"data":["c"],"meta":{"next_cursor":""}}"#)
            .create_async()
            .await;

        let client = Client::new(&server.url(), "t", Duration::from_secs(5)).unwrap();
        let keys = client.list_kv_keys("st1").await.unwrap();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn repeated_cursor_ends_listing() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/resources/stores/kv/st1/keys")
            .match_query(Matcher::Regex("^limit=1000$".into()))
            .with_body(r#"{"data":["a"],"meta":{"next_cursor":"c1"}}"#)
            .expect(1)
            .create_async()
            .await;
        let again = server
            .mock("GET", "/resources/stores/kv/st1/keys")
            .match_query(Matcher::Regex("cursor=c1".into()))
            .with_body(r#"{"data":["b"],"meta":{"next_cursor":"c1"}}"#)
            .expect(1)
            .create_async()
            .await;

        let client = Client::new(&server.url(), "t", Duration::from_secs(5)).unwrap();
        let keys = client.list_kv_keys("st1").await.unwrap();
        assert_eq!(keys, vec!["a", "b"]);
        again.assert_async().await;
    }

    #[tokio::test]
    async fn binary_values_are_returned_unchanged() {
        let mut server = mockito::Server::new_async().await;
        let value: &[u8] = &[0x89, b'P', b'N', b'G', 0x00, 0xff, 0xfe];
        server
            .mock("GET", "/resources/stores/kv/st1/keys/logo")
            .with_body(value)
            .create_async()
            .await;

        let client = Client::new(&server.url(), "t", Duration::from_secs(5)).unwrap();
        let got = client.get_kv_entry("st1", "logo").await.unwrap();
        assert_eq!(got, value);
    }

    #[tokio::test]
    async fn put_entry_sends_raw_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/resources/stores/kv/st1/keys/greeting")
            .match_body("hello world")
            .with_status(200)
            .create_async()
            .await;

        let client = Client::new(&server.url(), "t", Duration::from_secs(5)).unwrap();
        client.put_kv_entry("st1", "greeting", "hello world").await.unwrap();
        mock.assert_async().await;
    }
}
