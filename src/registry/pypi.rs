//! PyPI JSON API implementation.

use async_trait::async_trait;
use log::debug;
use reqwest::Client;

use crate::http::{FetchError, HttpClient};
use crate::package::PackageName;

use super::{Registry, ReleaseMetadata};

pub const DEFAULT_INDEX_URL: &str = "https://pypi.org";

/// PyPI API response types (internal).
mod api {
    use serde::Deserialize;

    #[derive(Deserialize, Debug)]
    pub struct Project {
        pub info: Info,
    }

    #[derive(Deserialize, Debug)]
    pub struct Info {
        #[serde(default)]
        pub name: Option<String>,
        #[serde(default)]
        pub version: Option<String>,
        #[serde(default)]
        pub requires_dist: Option<Vec<String>>,
    }
}

impl From<api::Project> for ReleaseMetadata {
    fn from(project: api::Project) -> Self {
        ReleaseMetadata {
            name: project.info.name,
            version: project.info.version.filter(|v| !v.is_empty()),
            requires_dist: project.info.requires_dist.unwrap_or_default(),
        }
    }
}

/// Looks packages up through `GET {index}/pypi/{name}/json`.
pub struct PyPiRegistry {
    http_client: HttpClient,
    index_url: String,
}

impl PyPiRegistry {
    /// Create a registry client for the public PyPI index.
    pub fn new(client: Client) -> Self {
        Self::with_index_url(client, DEFAULT_INDEX_URL)
    }

    /// Create a registry client for a custom index.
    pub fn with_index_url(client: Client, index_url: &str) -> Self {
        Self::from_http_client(HttpClient::new(client), index_url)
    }

    /// Create from an existing HttpClient.
    pub fn from_http_client(http_client: HttpClient, index_url: &str) -> Self {
        Self {
            http_client,
            index_url: index_url.trim_end_matches('/').to_string(),
        }
    }

    fn project_url(&self, name: &PackageName) -> String {
        format!("{}/pypi/{}/json", self.index_url, name)
    }
}

#[async_trait]
impl Registry for PyPiRegistry {
    fn index_url(&self) -> &str {
        &self.index_url
    }

    async fn latest_release(&self, name: &PackageName) -> Result<ReleaseMetadata, FetchError> {
        let url = self.project_url(name);
        debug!("Fetching metadata for {} from {}...", name, url);
        let project: api::Project = self.http_client.get_json(&url).await?;
        Ok(project.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::RetryPolicy;

    fn registry_for(url: &str) -> PyPiRegistry {
        let http = HttpClient::new(Client::new()).with_retry_policy(RetryPolicy::none());
        PyPiRegistry::from_http_client(http, url)
    }

    fn name(raw: &str) -> PackageName {
        PackageName::parse(raw).unwrap()
    }

    #[test]
    fn test_default_index_url() {
        let registry = PyPiRegistry::new(Client::new());
        assert_eq!(registry.index_url(), "https://pypi.org");
    }

    #[test]
    fn test_project_url_strips_trailing_slash() {
        let registry = PyPiRegistry::with_index_url(Client::new(), "http://localhost:8080/");
        assert_eq!(
            registry.project_url(&name("Requests")),
            "http://localhost:8080/pypi/requests/json"
        );
    }

    #[tokio::test]
    async fn test_latest_release_with_requirements() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/pypi/requests/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "info": {
                        "name": "requests",
                        "version": "2.32.3",
                        "requires_dist": ["urllib3 (>=1.21.1)", "certifi (>=2017.4.17)"]
                    },
                    "releases": {}
                }"#,
            )
            .create_async()
            .await;

        let release = registry_for(&server.url())
            .latest_release(&name("requests"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(release.name.as_deref(), Some("requests"));
        assert_eq!(release.version.as_deref(), Some("2.32.3"));
        assert_eq!(
            release.requires_dist,
            vec!["urllib3 (>=1.21.1)", "certifi (>=2017.4.17)"]
        );
    }

    #[tokio::test]
    async fn test_latest_release_null_requires_dist() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/pypi/six/json")
            .with_status(200)
            .with_body(r#"{"info": {"name": "six", "version": "1.16.0", "requires_dist": null}}"#)
            .create_async()
            .await;

        let release = registry_for(&server.url())
            .latest_release(&name("six"))
            .await
            .unwrap();

        assert!(release.requires_dist.is_empty());
    }

    #[tokio::test]
    async fn test_latest_release_missing_requires_dist() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/pypi/six/json")
            .with_status(200)
            .with_body(r#"{"info": {"version": ""}}"#)
            .create_async()
            .await;

        let release = registry_for(&server.url())
            .latest_release(&name("six"))
            .await
            .unwrap();

        assert_eq!(release, ReleaseMetadata::default());
    }

    #[tokio::test]
    async fn test_latest_release_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/pypi/nonexistent-pkg-xyz/json")
            .with_status(404)
            .with_body(r#"{"message": "Not Found"}"#)
            .create_async()
            .await;

        let result = registry_for(&server.url())
            .latest_release(&name("nonexistent-pkg-xyz"))
            .await;

        assert_eq!(result.unwrap_err(), FetchError::NotFound);
    }

    #[tokio::test]
    async fn test_latest_release_missing_info_is_decode_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/pypi/odd/json")
            .with_status(200)
            .with_body(r#"{"releases": {}}"#)
            .create_async()
            .await;

        let result = registry_for(&server.url())
            .latest_release(&name("odd"))
            .await;

        assert!(matches!(result, Err(FetchError::Decode(_))));
    }
}
