//! CRUD for resources scoped to a service version: ACLs, backends, domains,
//! healthchecks and dictionaries all share the same URL layout.

use reqwest::Method;
use serde::Serialize;

use super::types::VersionedResource;
use super::{ApiError, Client};

impl Client {
    pub async fn list_resources<R: VersionedResource>(
        &self,
        service_id: &str,
        version: u32,
    ) -> Result<Vec<R>, ApiError> {
        let n = version.to_string();
        self.get(&["service", service_id, "version", &n, R::KIND]).await
    }

    pub async fn get_resource<R: VersionedResource>(
        &self,
        service_id: &str,
        version: u32,
        name: &str,
    ) -> Result<R, ApiError> {
        let n = version.to_string();
        self.get(&["service", service_id, "version", &n, R::KIND, name])
            .await
    }

    pub async fn create_resource<R, I>(
        &self,
        service_id: &str,
        version: u32,
        input: &I,
    ) -> Result<R, ApiError>
    where
        R: VersionedResource,
        I: Serialize,
    {
        let n = version.to_string();
        self.send_form(Method::POST, &["service", service_id, "version", &n, R::KIND], input)
            .await
    }

    pub async fn update_resource<R, I>(
        &self,
        service_id: &str,
        version: u32,
        name: &str,
        input: &I,
    ) -> Result<R, ApiError>
    where
        R: VersionedResource,
        I: Serialize,
    {
        let n = version.to_string();
        self.send_form(
            Method::PUT,
            &["service", service_id, "version", &n, R::KIND, name],
            input,
        )
        .await
    }

    pub async fn delete_resource<R: VersionedResource>(
        &self,
        service_id: &str,
        version: u32,
        name: &str,
    ) -> Result<(), ApiError> {
        let n = version.to_string();
        self.delete(&["service", service_id, "version", &n, R::KIND, name])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{Backend, BackendInput, HealthCheck};
    use mockito::Matcher;
    use std::time::Duration;

    #[tokio::test]
    async fn create_backend_posts_form() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/service/abc/version/5/backend")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("name".into(), "origin".into()),
                Matcher::UrlEncoded("address".into(), "origin.example.com".into()),
                Matcher::UrlEncoded("port".into(), "443".into()),
                Matcher::UrlEncoded("use_ssl".into(), "1".into()),
            ]))
            .with_body(
                r#"{"name":"origin","service_id":"abc","version":5,"address":"origin.example.com","port":443,"use_ssl":true}"#,
            )
            .create_async()
            .await;

        let client = Client::new(&server.url(), "t", Duration::from_secs(5)).unwrap();
        let input = BackendInput {
            name: Some("origin".into()),
            address: Some("origin.example.com".into()),
            port: Some(443),
            use_ssl: Some(true),
            ..Default::default()
        };
        let backend: Backend = client.create_resource("abc", 5, &input).await.unwrap();
        assert_eq!(backend.port, Some(443));
        assert!(backend.use_ssl);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn list_healthchecks() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/service/abc/version/1/healthcheck")
            .with_body(
                r#"[{"name":"root","service_id":"abc","version":1,"path":"/","threshold":3,"comment":null}]"#,
            )
            .create_async()
            .await;

        let client = Client::new(&server.url(), "t", Duration::from_secs(5)).unwrap();
        let checks: Vec<HealthCheck> = client.list_resources("abc", 1).await.unwrap();
        assert_eq!(checks.len(), 1);
        assert_eq!(checks[0].threshold, Some(3));
    }
}
