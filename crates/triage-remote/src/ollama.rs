//! Ollama `/api/generate` client.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use triage_contracts::error::{EngineResult, TriageError};
use triage_core::config::RemoteConfig;
use triage_core::traits::ReasoningProvider;

/// Request body for `/api/generate`.
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// Response body from `/api/generate` (non-streaming).
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// A `ReasoningProvider` backed by an Ollama-compatible HTTP server.
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl OllamaProvider {
    /// Build a provider for `endpoint` (e.g. `http://localhost:11434`).
    ///
    /// `timeout` bounds the HTTP exchange itself; the orchestrator applies
    /// its own budget on top.
    pub fn new(endpoint: &str, model: &str, timeout: Duration) -> EngineResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TriageError::Config {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            endpoint: endpoint.trim().trim_end_matches('/').to_string(),
            model: model.to_string(),
            client,
            timeout_secs: timeout.as_secs().max(1),
        })
    }

    pub fn from_config(config: &RemoteConfig) -> EngineResult<Self> {
        Self::new(&config.endpoint, &config.model, config.timeout())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.endpoint)
    }

    fn map_send_error(&self, e: reqwest::Error) -> TriageError {
        if e.is_timeout() {
            TriageError::RemoteTimeout {
                secs: self.timeout_secs,
            }
        } else {
            TriageError::RemoteUnavailable {
                endpoint: self.endpoint.clone(),
                reason: e.to_string(),
            }
        }
    }
}

#[async_trait]
impl ReasoningProvider for OllamaProvider {
    fn name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> EngineResult<String> {
        let url = self.generate_url();
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        debug!(%url, model = %self.model, "sending generate request");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TriageError::RemoteStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                TriageError::RemoteTimeout {
                    secs: self.timeout_secs,
                }
            } else {
                TriageError::MalformedResponse {
                    reason: format!("generate response did not decode: {e}"),
                }
            }
        })?;

        debug!(response_len = parsed.response.len(), "generate request completed");
        Ok(parsed.response)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use triage_contracts::error::TriageError;
    use triage_core::config::RemoteConfig;
    use triage_core::traits::ReasoningProvider;

    use super::{GenerateRequest, OllamaProvider};

    /// Serve exactly one canned HTTP response on an ephemeral port and
    /// return the endpoint plus a handle yielding the raw request text.
    async fn one_shot_server(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if request_complete(&request) {
                    break;
                }
            }

            let reply = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&request).into_owned()
        });

        (format!("http://{addr}"), handle)
    }

    /// True once the headers and a `Content-Length` body have arrived.
    fn request_complete(raw: &[u8]) -> bool {
        let text = String::from_utf8_lossy(raw);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..header_end]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        raw.len() >= header_end + 4 + content_length
    }

    fn provider(endpoint: &str) -> OllamaProvider {
        OllamaProvider::new(endpoint, "medgemma", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn request_body_is_non_streaming() {
        let body = GenerateRequest {
            model: "medgemma",
            prompt: "assess",
            stream: false,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"model": "medgemma", "prompt": "assess", "stream": false})
        );
    }

    #[test]
    fn endpoint_trailing_slash_is_trimmed() {
        let p = provider(" http://localhost:11434/ ");
        assert_eq!(p.endpoint(), "http://localhost:11434");
        assert_eq!(p.generate_url(), "http://localhost:11434/api/generate");
        assert_eq!(p.name(), "medgemma");
    }

    #[test]
    fn builds_from_config() {
        let p = OllamaProvider::from_config(&RemoteConfig::default()).unwrap();
        assert_eq!(p.endpoint(), "http://localhost:11434");
        assert_eq!(p.timeout_secs, 8);
    }

    #[tokio::test]
    async fn returns_response_text() {
        let (endpoint, server) =
            one_shot_server("200 OK", r#"{"model":"medgemma","response":"{\"risk_score\": 20}","done":true}"#).await;

        let text = provider(&endpoint).complete("assess this patient").await.unwrap();
        assert_eq!(text, r#"{"risk_score": 20}"#);

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/generate"), "request: {request}");
        assert!(request.contains("\"stream\":false"));
        assert!(request.contains("assess this patient"));
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let (endpoint, server) = one_shot_server("503 Service Unavailable", "model loading").await;

        match provider(&endpoint).complete("x").await {
            Err(TriageError::RemoteStatus { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "model loading");
            }
            other => panic!("expected RemoteStatus, got {:?}", other),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn undecodable_body_is_malformed() {
        let (endpoint, server) = one_shot_server("200 OK", r#"{"unexpected": true}"#).await;

        assert!(matches!(
            provider(&endpoint).complete("x").await,
            Err(TriageError::MalformedResponse { .. })
        ));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn refused_connection_is_unavailable() {
        // Bind then drop to obtain a port with nothing listening.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        match provider(&format!("http://{addr}")).complete("x").await {
            Err(TriageError::RemoteUnavailable { endpoint, .. }) => {
                assert_eq!(endpoint, format!("http://{addr}"));
            }
            other => panic!("expected RemoteUnavailable, got {:?}", other),
        }
    }
}
