//! Async HTTP client for the Formbricks management API.

use std::{future::Future, time::Duration};

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  payload::{ResponsePayload, SurveyPayload},
};

/// Header carrying the management API key.
pub const API_KEY_HEADER: &str = "x-api-key";

// ─── Trait ───────────────────────────────────────────────────────────────────

/// The two management endpoints the seeder needs.
///
/// Implemented by [`FormbricksClient`]; tests substitute a fake.
pub trait ManagementApi: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// `POST /api/v1/management/surveys`; returns the assigned survey id.
  fn create_survey<'a>(
    &'a self,
    payload: &'a SurveyPayload,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a;

  /// `POST /api/v1/management/responses`; returns the assigned response id.
  fn create_response<'a>(
    &'a self,
    payload: &'a ResponsePayload,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a;
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// Connection settings for a Formbricks instance.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  /// Base URL, e.g. `http://localhost:3000`.
  pub host:    String,
  pub api_key: String,
  /// Applied to every request.
  pub timeout: Duration,
}

/// Async HTTP client for the Formbricks management REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct FormbricksClient {
  client: Client,
  config: ApiConfig,
}

/// Success body: `{"data": {"id": "..."}}`.
#[derive(Deserialize)]
struct Created {
  data: CreatedData,
}

#[derive(Deserialize)]
struct CreatedData {
  id: String,
}

impl FormbricksClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder().timeout(config.timeout).build()?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api/v1/management{}",
      self.config.host.trim_end_matches('/'),
      path
    )
  }

  async fn post<T: Serialize + ?Sized>(&self, path: &'static str, body: &T) -> Result<String> {
    let resp = self
      .client
      .post(self.url(path))
      .header(API_KEY_HEADER, &self.config.api_key)
      .json(body)
      .send()
      .await?;

    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      return Err(Error::Status { endpoint: path, status, body });
    }
    let created: Created = resp.json().await?;
    Ok(created.data.id)
  }
}

impl ManagementApi for FormbricksClient {
  type Error = Error;

  async fn create_survey(&self, payload: &SurveyPayload) -> Result<String> {
    self.post("/surveys", payload).await
  }

  async fn create_response(&self, payload: &ResponsePayload) -> Result<String> {
    self.post("/responses", payload).await
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use serde_json::Map;
  use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
    task::JoinHandle,
  };

  use super::*;
  use crate::payload::{HiddenFields, SurveyKind, SurveyStatus};

  /// Serve one canned HTTP response on a local port. The handle yields the
  /// raw request as received.
  async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let host = format!("http://{}", listener.local_addr().unwrap());
    let handle = tokio::spawn(async move {
      let (mut socket, _) = listener.accept().await.unwrap();
      let request = read_request(&mut socket).await;
      let response = format!(
        "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
      );
      socket.write_all(response.as_bytes()).await.unwrap();
      socket.shutdown().await.ok();
      request
    });
    (host, handle)
  }

  async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
      let n = socket.read(&mut chunk).await.unwrap();
      if n == 0 {
        break;
      }
      buf.extend_from_slice(&chunk[..n]);
      let text = String::from_utf8_lossy(&buf);
      if let Some(end) = text.find("\r\n\r\n") {
        let length = text[..end]
          .lines()
          .find_map(|l| {
            let (name, value) = l.split_once(':')?;
            name.eq_ignore_ascii_case("content-length").then(|| value.trim().parse().ok())?
          })
          .unwrap_or(0usize);
        if buf.len() >= end + 4 + length {
          break;
        }
      }
    }
    String::from_utf8_lossy(&buf).into_owned()
  }

  fn survey() -> SurveyPayload {
    SurveyPayload {
      name:           "Pulse".to_string(),
      kind:           SurveyKind::Link,
      status:         SurveyStatus::InProgress,
      environment_id: "env".to_string(),
      blocks:         vec![],
      questions:      vec![],
      endings:        vec![],
      hidden_fields:  HiddenFields::default(),
    }
  }

  fn response() -> ResponsePayload {
    let now = Utc::now();
    ResponsePayload {
      created_at:     now,
      updated_at:     now,
      finished:       true,
      language:       "en".to_string(),
      survey_id:      "srv-1".to_string(),
      environment_id: "env".to_string(),
      data:           Map::new(),
    }
  }

  #[tokio::test]
  async fn created_survey_returns_its_id() {
    let (host, server) = serve_once("200 OK", r#"{"data":{"id":"cm1abc"}}"#).await;

    let id = client(&host).create_survey(&survey()).await.unwrap();

    assert_eq!(id, "cm1abc");
    let request = server.await.unwrap();
    let lower = request.to_ascii_lowercase();
    assert!(request.starts_with("POST /api/v1/management/surveys "), "{request}");
    assert!(lower.contains("x-api-key: key\r\n"), "{request}");
    assert!(request.contains(r#""environmentId":"env""#), "{request}");
  }

  #[tokio::test]
  async fn rejected_response_is_a_status_error() {
    let (host, server) = serve_once("500 Internal Server Error", r#"{"error":"boom"}"#).await;

    let err = client(&host).create_response(&response()).await.unwrap_err();

    let Error::Status { endpoint, status, body } = &err else {
      panic!("expected status error, got {err:?}")
    };
    assert_eq!(*endpoint, "/responses");
    assert_eq!(*status, reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("boom"));
    assert!(server.await.unwrap().starts_with("POST /api/v1/management/responses "));
  }

  #[tokio::test]
  async fn success_without_id_is_an_error() {
    let (host, _server) = serve_once("200 OK", r#"{"data":{}}"#).await;
    let err = client(&host).create_survey(&survey()).await.unwrap_err();
    assert!(matches!(err, Error::Http(_)), "{err:?}");
  }

  fn client(host: &str) -> FormbricksClient {
    FormbricksClient::new(ApiConfig {
      host:    host.to_string(),
      api_key: "key".to_string(),
      timeout: Duration::from_secs(5),
    })
    .unwrap()
  }

  #[test]
  fn urls_join_cleanly() {
    assert_eq!(
      client("http://localhost:3000").url("/surveys"),
      "http://localhost:3000/api/v1/management/surveys"
    );
    assert_eq!(
      client("https://forms.example.com/").url("/responses"),
      "https://forms.example.com/api/v1/management/responses"
    );
  }

  #[test]
  fn created_body_yields_id() {
    let created: Created =
      serde_json::from_str(r#"{"data":{"id":"cm1abc","name":"x"}}"#).unwrap();
    assert_eq!(created.data.id, "cm1abc");
  }
}
