//! Services, service versions and purging.

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::{Method, Url};
use serde_json::json;

use super::types::{PurgeResult, Service, ServiceDetails, ServiceInput, UpdateVersionInput, Version};
use super::{ApiError, Client};
use crate::service::ServiceDirectory;
use crate::version::{VersionCloner, VersionDirectory};

const PAGE_SIZE: usize = 100;

impl Client {
    /// All services visible to the token, following pagination.
    pub async fn list_services(&self) -> Result<Vec<Service>, ApiError> {
        let mut services = Vec::new();
        let mut page = 1usize;
        loop {
            let mut url = self.url(&["service"]);
            url.query_pairs_mut()
                .append_pair("page", &page.to_string())
                .append_pair("per_page", &PAGE_SIZE.to_string());
            let batch: Vec<Service> = self.json(self.request(Method::GET, url)).await?;
            let done = batch.len() < PAGE_SIZE;
            services.extend(batch);
            if done {
                return Ok(services);
            }
            page += 1;
        }
    }

    pub async fn service_details(&self, service_id: &str) -> Result<ServiceDetails, ApiError> {
        self.get(&["service", service_id, "details"]).await
    }

    pub async fn create_service(&self, input: &ServiceInput) -> Result<Service, ApiError> {
        self.send_form(Method::POST, &["service"], input).await
    }

    pub async fn update_service(
        &self,
        service_id: &str,
        input: &ServiceInput,
    ) -> Result<Service, ApiError> {
        self.send_form(Method::PUT, &["service", service_id], input)
            .await
    }

    pub async fn delete_service(&self, service_id: &str) -> Result<(), ApiError> {
        self.delete(&["service", service_id]).await
    }

    pub async fn list_versions(&self, service_id: &str) -> Result<Vec<Version>, ApiError> {
        self.get(&["service", service_id, "version"]).await
    }

    pub async fn clone_version(&self, service_id: &str, number: u32) -> Result<Version, ApiError> {
        self.put(&["service", service_id, "version", &number.to_string(), "clone"])
            .await
    }

    pub async fn activate_version(&self, service_id: &str, number: u32) -> Result<Version, ApiError> {
        self.put(&["service", service_id, "version", &number.to_string(), "activate"])
            .await
    }

    pub async fn deactivate_version(
        &self,
        service_id: &str,
        number: u32,
    ) -> Result<Version, ApiError> {
        self.put(&["service", service_id, "version", &number.to_string(), "deactivate"])
            .await
    }

    pub async fn lock_version(&self, service_id: &str, number: u32) -> Result<Version, ApiError> {
        self.put(&["service", service_id, "version", &number.to_string(), "lock"])
            .await
    }

    pub async fn stage_version(&self, service_id: &str, number: u32) -> Result<Version, ApiError> {
        let n = number.to_string();
        self.put(&["service", service_id, "version", &n, "activate", "staging"])
            .await
    }

    pub async fn unstage_version(&self, service_id: &str, number: u32) -> Result<Version, ApiError> {
        let n = number.to_string();
        self.put(&["service", service_id, "version", &n, "deactivate", "staging"])
            .await
    }

    pub async fn update_version(
        &self,
        service_id: &str,
        number: u32,
        input: &UpdateVersionInput,
    ) -> Result<Version, ApiError> {
        let n = number.to_string();
        self.send_form(Method::PUT, &["service", service_id, "version", &n], input)
            .await
    }

    pub async fn purge_all(&self, service_id: &str) -> Result<PurgeResult, ApiError> {
        let url = self.url(&["service", service_id, "purge_all"]);
        self.json(self.request(Method::POST, url)).await
    }

    pub async fn purge_key(
        &self,
        service_id: &str,
        key: &str,
        soft: bool,
    ) -> Result<PurgeResult, ApiError> {
        let url = self.url(&["service", service_id, "purge", key]);
        self.json(soft_purge(self.request(Method::POST, url), soft))
            .await
    }

    /// Purge many surrogate keys in one request. Returns purge IDs by key.
    pub async fn purge_keys(
        &self,
        service_id: &str,
        keys: &[String],
        soft: bool,
    ) -> Result<BTreeMap<String, String>, ApiError> {
        let url = self.url(&["service", service_id, "purge"]);
        let req = self
            .request(Method::POST, url)
            .json(&json!({ "surrogate_keys": keys }));
        self.json(soft_purge(req, soft)).await
    }

    pub async fn purge_url(&self, target: &str, soft: bool) -> Result<PurgeResult, ApiError> {
        let url = self.purge_url_for(target);
        self.json(soft_purge(self.request(Method::POST, url), soft))
            .await
    }

    /// `/purge/{host}{path}` for a cached URL. The scheme and fragment are
    /// dropped, the path is kept as given and the query string stays a query.
    fn purge_url_for(&self, target: &str) -> Url {
        let stripped = target
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(target);
        let stripped = stripped.split_once('#').map_or(stripped, |(s, _)| s);
        let (path, query) = match stripped.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (stripped, None),
        };

        let mut url = self.url(&["purge"]);
        let full = format!("{}/{}", url.path(), path);
        url.set_path(&full);
        url.set_query(query);
        url
    }
}

fn soft_purge(req: reqwest::RequestBuilder, soft: bool) -> reqwest::RequestBuilder {
    if soft {
        req.header("Fastly-Soft-Purge", "1")
    } else {
        req
    }
}

#[async_trait]
impl VersionDirectory for Client {
    async fn list_versions(&self, service_id: &str) -> anyhow::Result<Vec<Version>> {
        Ok(Client::list_versions(self, service_id).await?)
    }
}

#[async_trait]
impl VersionCloner for Client {
    async fn clone_version(&self, service_id: &str, number: u32) -> anyhow::Result<u32> {
        Ok(Client::clone_version(self, service_id, number).await?.number)
    }
}

#[async_trait]
impl ServiceDirectory for Client {
    async fn list_services(&self) -> anyhow::Result<Vec<Service>> {
        Ok(Client::list_services(self).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use std::time::Duration;

    use crate::version::{ResolutionPolicy, VersionResolver, VersionSpec};

    fn client(server: &mockito::Server) -> Client {
        Client::new(&server.url(), "token", Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn list_services_follows_pages() {
        let mut server = mockito::Server::new_async().await;
        let full: Vec<_> = (0..PAGE_SIZE)
            .map(|i| serde_json::json!({"id": format!("id{i}"), "name": format!("svc{i}")}))
            .collect();
        let first = server
            .mock("GET", "/service")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("page".into(), "1".into()),
                Matcher::UrlEncoded("per_page".into(), "100".into()),
            ]))
            .with_body(serde_json::to_string(&full).unwrap())
            .create_async()
            .await;
        let second = server
            .mock("GET", "/service")
            .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
            .with_body(r#"[{"id":"last","name":"tail"}]"#)
            .create_async()
            .await;

        let services = client(&server).list_services().await.unwrap();
        assert_eq!(services.len(), PAGE_SIZE + 1);
        assert_eq!(services.last().unwrap().id, "last");
        first.assert_async().await;
        second.assert_async().await;
    }

    #[tokio::test]
    async fn resolver_clones_through_the_api() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/service/abc/version")
            .with_body(r#"[{"number":1,"active":true,"locked":true},{"number":2,"active":false,"locked":false}]"#)
            .create_async()
            .await;
        let clone = server
            .mock("PUT", "/service/abc/version/1/clone")
            .with_body(r#"{"number":3,"active":false,"locked":false,"service_id":"abc"}"#)
            .expect(1)
            .create_async()
            .await;

        let api = client(&server);
        let policy = ResolutionPolicy::editable().with_auto_clone(true);
        let resolved = VersionResolver::new(&api, &api)
            .resolve("abc", Some(VersionSpec::Active), &policy)
            .await
            .unwrap();
        assert_eq!(resolved.number, 3);
        assert!(resolved.cloned);
        clone.assert_async().await;
    }

    #[tokio::test]
    async fn purge_url_drops_scheme() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/purge/www.example.com/images/logo.png")
            .match_header("fastly-soft-purge", "1")
            .with_body(r#"{"status":"ok","id":"108-1391560174-974124"}"#)
            .create_async()
            .await;

        let result = client(&server)
            .purge_url("https://www.example.com/images/logo.png", true)
            .await
            .unwrap();
        assert_eq!(result.status, "ok");
        mock.assert_async().await;
    }

    #[test]
    fn purge_url_keeps_query_string() {
        let c = Client::new("https://api.fastly.com", "t", Duration::from_secs(1)).unwrap();
        assert_eq!(
            c.purge_url_for("https://www.example.com/page?id=1&lang=en").as_str(),
            "https://api.fastly.com/purge/www.example.com/page?id=1&lang=en"
        );
        assert_eq!(
            c.purge_url_for("www.example.com/a%20b.html#top").as_str(),
            "https://api.fastly.com/purge/www.example.com/a%20b.html"
        );
    }

    #[tokio::test]
    async fn purge_url_with_query_hits_the_same_path() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/purge/www.example.com/page")
            .match_query(Matcher::UrlEncoded("id".into(), "1".into()))
            .with_body(r#"{"status":"ok","id":"108-1"}"#)
            .expect(1)
            .create_async()
            .await;

        client(&server)
            .purge_url("https://www.example.com/page?id=1", false)
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn purge_keys_sends_json_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/service/abc/purge")
            .match_header("fastly-soft-purge", "1")
            .match_body(Matcher::Json(serde_json::json!({ "surrogate_keys": ["foo", "bar"] })))
            .with_body(r#"{"foo":"123","bar":"456"}"#)
            .expect(1)
            .create_async()
            .await;

        let keys = vec!["foo".to_string(), "bar".to_string()];
        let purged = client(&server).purge_keys("abc", &keys, true).await.unwrap();
        assert_eq!(purged.keys().collect::<Vec<_>>(), vec!["bar", "foo"]);
        assert_eq!(purged["foo"], "123");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn create_service_sends_form() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/service")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("name".into(), "Foo".into()),
                Matcher::UrlEncoded("type".into(), "wasm".into()),
            ]))
            .with_body(r#"{"id":"12345","name":"Foo","type":"wasm"}"#)
            .expect(1)
            .create_async()
            .await;

        let input = ServiceInput {
            name: Some("Foo".into()),
            service_type: Some("wasm".into()),
            comment: None,
        };
        let service = client(&server).create_service(&input).await.unwrap();
        assert_eq!(service.id, "12345");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn update_version_sends_comment() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/service/abc/version/4")
            .match_body(Matcher::UrlEncoded("comment".into(), "new origin".into()))
            .with_body(r#"{"number":4,"comment":"new origin"}"#)
            .create_async()
            .await;

        let input = UpdateVersionInput {
            comment: Some("new origin".into()),
        };
        let v = client(&server).update_version("abc", 4, &input).await.unwrap();
        assert_eq!(v.comment.as_deref(), Some("new origin"));
        mock.assert_async().await;
    }
}
