//! Chat-completion backends.

use std::{future::Future, time::Duration};

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ─── Trait ───────────────────────────────────────────────────────────────────

/// A model that answers one system + user message pair with text.
///
/// Implemented by [`OpenAiProvider`]; tests substitute a scripted fake.
pub trait CompletionProvider: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn complete<'a>(
    &'a self,
    system: &'a str,
    user: &'a str,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a;
}

// ─── OpenAI ──────────────────────────────────────────────────────────────────

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
  /// Root of an OpenAI-compatible API, without `/chat/completions`.
  pub base_url: String,
  pub api_key:  String,
  pub model:    String,
  pub timeout:  Duration,
}

#[derive(Debug, Error)]
pub enum OpenAiError {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("chat completion → {status}: {body}")]
  Status {
    status: reqwest::StatusCode,
    body:   String,
  },

  #[error("response carried no message content")]
  NoContent,
}

/// Client for `POST {base_url}/chat/completions` in JSON mode.
#[derive(Clone)]
pub struct OpenAiProvider {
  client: Client,
  config: OpenAiConfig,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
  model:           &'a str,
  messages:        [ChatMessage<'a>; 2],
  response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
  role:    &'static str,
  content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
  #[serde(rename = "type")]
  kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
  choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
  message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
  content: Option<String>,
}

impl ChatResponse {
  fn into_content(self) -> Option<String> {
    self.choices.into_iter().next()?.message.content
  }
}

impl OpenAiProvider {
  pub fn new(config: OpenAiConfig) -> Result<Self, OpenAiError> {
    let client = Client::builder().timeout(config.timeout).build()?;
    Ok(Self { client, config })
  }

  fn url(&self) -> String {
    format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
  }

  fn request<'a>(&'a self, system: &'a str, user: &'a str) -> ChatRequest<'a> {
    ChatRequest {
      model:           &self.config.model,
      messages:        [
        ChatMessage { role: "system", content: system },
        ChatMessage { role: "user", content: user },
      ],
      response_format: ResponseFormat { kind: "json_object" },
    }
  }
}

impl CompletionProvider for OpenAiProvider {
  type Error = OpenAiError;

  async fn complete(&self, system: &str, user: &str) -> Result<String, OpenAiError> {
    tracing::debug!(model = %self.config.model, "requesting completion");
    let resp = self
      .client
      .post(self.url())
      .bearer_auth(&self.config.api_key)
      .json(&self.request(system, user))
      .send()
      .await?;

    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      return Err(OpenAiError::Status { status, body });
    }
    let reply: ChatResponse = resp.json().await?;
    reply.into_content().ok_or(OpenAiError::NoContent)
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;
  use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    task::JoinHandle,
  };

  use super::*;

  /// Answer one request on a local port with a canned response. The handle
  /// yields the raw request.
  async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
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
    (base_url, handle)
  }

  async fn read_request(socket: &mut TcpStream) -> String {
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

  fn provider(base_url: &str) -> OpenAiProvider {
    OpenAiProvider::new(OpenAiConfig {
      base_url: base_url.to_string(),
      api_key:  "sk-test".to_string(),
      model:    DEFAULT_MODEL.to_string(),
      timeout:  Duration::from_secs(5),
    })
    .unwrap()
  }

  #[test]
  fn url_appends_endpoint() {
    assert_eq!(
      provider("https://api.openai.com/v1/").url(),
      "https://api.openai.com/v1/chat/completions"
    );
  }

  #[test]
  fn request_is_json_mode_with_system_first() {
    let p = provider(DEFAULT_BASE_URL);
    assert_eq!(
      serde_json::to_value(p.request("sys", "usr")).unwrap(),
      json!({
        "model": "gpt-4o-mini",
        "messages": [
          { "role": "system", "content": "sys" },
          { "role": "user", "content": "usr" }
        ],
        "response_format": { "type": "json_object" }
      })
    );
  }

  #[test]
  fn content_comes_from_first_choice() {
    let reply: ChatResponse = serde_json::from_value(json!({
      "id": "chatcmpl-1",
      "choices": [
        { "index": 0, "message": { "role": "assistant", "content": "{\"a\":1}" } },
        { "index": 1, "message": { "role": "assistant", "content": "ignored" } }
      ]
    }))
    .unwrap();
    assert_eq!(reply.into_content().as_deref(), Some("{\"a\":1}"));
  }

  #[test]
  fn no_choices_means_no_content() {
    let reply: ChatResponse = serde_json::from_value(json!({ "choices": [] })).unwrap();
    assert!(reply.into_content().is_none());
  }

  #[tokio::test]
  async fn completion_sends_bearer_key_and_returns_content() {
    let (base_url, server) = serve_once(
      "200 OK",
      r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"{\"ok\":true}"}}]}"#,
    )
    .await;

    let content = provider(&base_url).complete("sys", "usr").await.unwrap();

    assert_eq!(content, r#"{"ok":true}"#);
    let request = server.await.unwrap();
    assert!(request.starts_with("POST /chat/completions "), "{request}");
    assert!(request.to_lowercase().contains("authorization: bearer sk-test\r\n"), "{request}");
    assert!(request.contains(r#""response_format":{"type":"json_object"}"#), "{request}");
  }

  #[tokio::test]
  async fn rejected_completion_is_a_status_error() {
    let (base_url, server) =
      serve_once("429 Too Many Requests", r#"{"error":"rate limited"}"#).await;

    let err = provider(&base_url).complete("sys", "usr").await.unwrap_err();

    server.await.unwrap();
    let OpenAiError::Status { status, body } = &err else {
      panic!("expected status error, got {err:?}")
    };
    assert_eq!(*status, reqwest::StatusCode::TOO_MANY_REQUESTS);
    assert!(body.contains("rate limited"), "{body}");
  }

  #[tokio::test]
  async fn empty_choices_is_no_content() {
    let (base_url, server) = serve_once("200 OK", r#"{"choices":[]}"#).await;

    let err = provider(&base_url).complete("sys", "usr").await.unwrap_err();

    server.await.unwrap();
    assert!(matches!(err, OpenAiError::NoContent), "{err:?}");
  }
}
