use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::model::{MediaServerCreate, MediaServerRead, MediaServerUpdate};

/// Shown when the backend gives no usable reason.
pub const GENERIC_ERROR: &str = "Something went wrong, please try again";

/// Errors returned by the media server endpoints.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure (connect, timeout, TLS)
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("Backend error ({status}): {detail}")]
    Backend { status: u16, detail: String },

    /// Response body did not have the expected shape
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl ApiError {
    /// Text suitable for the result area or a toast.
    pub fn user_message(&self) -> String {
        match self {
            Self::Backend { detail, .. } if !detail.is_empty() => detail.clone(),
            Self::Request(e) => e.to_string(),
            _ => GENERIC_ERROR.to_string(),
        }
    }
}

/// Pull a readable reason out of an error body.
/// Handles `{"detail": "..."}` and the validation form `{"detail": [{"msg": "..."}]}`.
fn error_detail(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.trim().to_string();
    };
    match value.get("detail") {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
            .collect::<Vec<_>>()
            .join("; "),
        _ => String::new(),
    }
}

/// HTTP client for the `/mediaservers` resource.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(format!("ServerDeck/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/mediaservers/{path}", self.base_url)
    }

    /// Check the status and decode a JSON body.
    async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            let detail = error_detail(&body);
            warn!("Backend returned {}: {}", status, detail);
            return Err(ApiError::Backend {
                status: status.as_u16(),
                detail,
            });
        }
        serde_json::from_str(&body).map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// Like `read_json`, for endpoints that answer with a bare message.
    /// A body that is not a JSON string is returned as plain text.
    async fn read_message(resp: reqwest::Response) -> Result<String, ApiError> {
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            let detail = error_detail(&body);
            warn!("Backend returned {}: {}", status, detail);
            return Err(ApiError::Backend {
                status: status.as_u16(),
                detail,
            });
        }
        Ok(serde_json::from_str::<String>(&body).unwrap_or(body))
    }

    /// GET `/mediaservers/`
    pub async fn list(&self) -> Result<Vec<MediaServerRead>, ApiError> {
        let resp = self.client.get(self.url("")).send().await?;
        let servers: Vec<MediaServerRead> = Self::read_json(resp).await?;
        debug!("Fetched {} media servers", servers.len());
        Ok(servers)
    }

    /// POST `/mediaservers/`
    pub async fn create(&self, data: &MediaServerCreate) -> Result<MediaServerRead, ApiError> {
        let resp = self.client.post(self.url("")).json(data).send().await?;
        Self::read_json(resp).await
    }

    /// PUT `/mediaservers/{id}`
    pub async fn update(
        &self,
        id: i64,
        data: &MediaServerUpdate,
    ) -> Result<MediaServerRead, ApiError> {
        let resp = self
            .client
            .put(self.url(&id.to_string()))
            .json(data)
            .send()
            .await?;
        Self::read_json(resp).await
    }

    /// DELETE `/mediaservers/{id}`
    pub async fn delete(&self, id: i64) -> Result<String, ApiError> {
        let resp = self.client.delete(self.url(&id.to_string())).send().await?;
        Self::read_message(resp).await
    }

    /// POST `/mediaservers/test` with unsaved form data.
    pub async fn test(&self, data: &MediaServerCreate) -> Result<String, ApiError> {
        let resp = self.client.post(self.url("test")).json(data).send().await?;
        Self::read_message(resp).await
    }

    /// POST `/mediaservers/{id}/refresh`, optionally scoped to a folder.
    pub async fn refresh_library(
        &self,
        id: i64,
        folder_path: Option<&str>,
    ) -> Result<String, ApiError> {
        let mut url = self.url(&format!("{id}/refresh"));
        if let Some(folder) = folder_path.filter(|f| !f.is_empty()) {
            url.push_str(&format!("?folder_path={}", urlencoding::encode(folder)));
        }
        let resp = self
            .client
            .post(&url)
            .json(&serde_json::json!({}))
            .send()
            .await?;
        Self::read_message(resp).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::MediaServerType;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> ApiClient {
        ApiClient::new(&format!("{}/api/v1/", server.uri()), Duration::from_secs(5)).unwrap()
    }

    fn server_json(id: i64, name: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "name": name,
            "server_type": "emby",
            "url": "http://192.168.1.5:8096",
            "api_key": "1234567890",
            "enabled": true,
            "added_at": "2024-01-01T00:00:00Z"
        })
    }

    fn home_emby() -> MediaServerCreate {
        MediaServerCreate {
            name: "Home Emby".to_string(),
            server_type: MediaServerType::Emby,
            url: "http://192.168.1.5:8096".to_string(),
            api_key: "1234567890".to_string(),
            enabled: true,
        }
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let api = ApiClient::new("http://localhost:7889/api/v1/", Duration::from_secs(1)).unwrap();
        assert_eq!(api.base_url(), "http://localhost:7889/api/v1");
        assert_eq!(api.url(""), "http://localhost:7889/api/v1/mediaservers/");
        assert_eq!(api.url("7"), "http://localhost:7889/api/v1/mediaservers/7");
    }

    #[test]
    fn test_error_detail_shapes() {
        assert_eq!(error_detail(r#"{"detail":"Media Server not found"}"#), "Media Server not found");
        assert_eq!(
            error_detail(r#"{"detail":[{"msg":"field required"},{"msg":"bad url"}]}"#),
            "field required; bad url"
        );
        assert_eq!(error_detail(r#"{"other":1}"#), "");
        assert_eq!(error_detail("Bad Gateway\n"), "Bad Gateway");
    }

    #[test]
    fn test_user_message_fallback() {
        let err = ApiError::Backend {
            status: 500,
            detail: String::new(),
        };
        assert_eq!(err.user_message(), GENERIC_ERROR);
        let err = ApiError::Parse("eof".to_string());
        assert_eq!(err.user_message(), GENERIC_ERROR);
        let err = ApiError::Backend {
            status: 404,
            detail: "gone".to_string(),
        };
        assert_eq!(err.user_message(), "gone");
    }

    #[tokio::test]
    async fn test_list_servers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/mediaservers/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                server_json(1, "Den"),
                server_json(2, "Office"),
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let servers = client(&server).list().await.unwrap();
        assert_eq!(servers.len(), 2);
        assert_eq!(servers[1].name, "Office");
    }

    #[tokio::test]
    async fn test_create_sends_exact_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/mediaservers/"))
            .and(body_json(serde_json::json!({
                "name": "Home Emby",
                "server_type": "emby",
                "url": "http://192.168.1.5:8096",
                "api_key": "1234567890",
                "enabled": true
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(server_json(9, "Home Emby")))
            .expect(1)
            .mount(&server)
            .await;

        let created = client(&server).create(&home_emby()).await.unwrap();
        assert_eq!(created.id, 9);
    }

    #[tokio::test]
    async fn test_update_sends_partial_body() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/v1/mediaservers/3"))
            .and(body_json(serde_json::json!({ "enabled": false })))
            .respond_with(ResponseTemplate::new(200).set_body_json(server_json(3, "Den")))
            .expect(1)
            .mount(&server)
            .await;

        let update = MediaServerUpdate {
            enabled: Some(false),
            ..Default::default()
        };
        let updated = client(&server).update(3, &update).await.unwrap();
        assert_eq!(updated.id, 3);
    }

    #[tokio::test]
    async fn test_delete_returns_message() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/mediaservers/5"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!("Media Server Deleted Successfully!")),
            )
            .mount(&server)
            .await;

        let msg = client(&server).delete(5).await.unwrap();
        assert_eq!(msg, "Media Server Deleted Successfully!");
    }

    #[tokio::test]
    async fn test_test_connection_failure_surfaces_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/mediaservers/test"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "detail": "Connection to Emby timed out"
            })))
            .mount(&server)
            .await;

        let err = client(&server).test(&home_emby()).await.unwrap_err();
        match &err {
            ApiError::Backend { status, .. } => assert_eq!(*status, 400),
            other => panic!("Expected Backend error, got {other:?}"),
        }
        assert_eq!(err.user_message(), "Connection to Emby timed out");
    }

    #[tokio::test]
    async fn test_refresh_encodes_folder_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/mediaservers/2/refresh"))
            .and(query_param("folder_path", "/media/Movies/Alien (1979)"))
            .and(body_json(serde_json::json!({})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!("Library refresh triggered on 'Den'")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let msg = client(&server)
            .refresh_library(2, Some("/media/Movies/Alien (1979)"))
            .await
            .unwrap();
        assert_eq!(msg, "Library refresh triggered on 'Den'");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_request_error() {
        let api = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = api.list().await.unwrap_err();
        assert!(matches!(err, ApiError::Request(_)));
        assert!(!err.user_message().is_empty());
    }
}
