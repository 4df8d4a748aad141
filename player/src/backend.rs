use serde::Serialize;
use std::time::Duration;
use sweeptrace_protocol::{GenerateRequest, GenerateResponse, ProcessRequest, ProcessResponse};

use crate::{CollaboratorError, Settings};

/// Source of fresh problems.
#[allow(async_fn_in_trait)]
pub trait ProblemGenerator {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, CollaboratorError>;
}

/// Runs the external solver over a problem set and returns its traces.
#[allow(async_fn_in_trait)]
pub trait ProblemSolver {
    async fn process(&self, request: &ProcessRequest) -> Result<ProcessResponse, CollaboratorError>;
}

/// Generator and solver reached over the service's REST API.
#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, CollaboratorError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, CollaboratorError> {
        Self::new(settings.api_url.clone(), settings.request_timeout())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<String, CollaboratorError> {
        let url = self.endpoint(path);
        log::debug!("POST {}", url);

        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;
        log::debug!("{} answered {}", url, status);

        if !status.is_success() {
            return Err(CollaboratorError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(text)
    }
}

impl ProblemGenerator for HttpBackend {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, CollaboratorError> {
        let text = self.post("generate", request).await?;
        serde_json::from_str(&text).map_err(|err| CollaboratorError::Decode(err.to_string()))
    }
}

impl ProblemSolver for HttpBackend {
    async fn process(&self, request: &ProcessRequest) -> Result<ProcessResponse, CollaboratorError> {
        let text = self.post("process", request).await?;
        Ok(ProcessResponse::from_json(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves a single canned HTTP response and hands back the request it received.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let read = socket.read(&mut buf).await.unwrap();
                request.extend_from_slice(&buf[..read]);
                if read == 0 || request_complete(&request) {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&request).into_owned()
        });

        (format!("http://{addr}/"), handle)
    }

    fn request_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);
        let Some((head, body)) = text.split_once("\r\n\r\n") else {
            return false;
        };
        let length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        body.len() >= length
    }

    #[test]
    fn endpoint_joins_base_url() {
        let backend = HttpBackend::new("http://solver.local:8000/", Duration::from_secs(1)).unwrap();

        assert_eq!(backend.endpoint("process"), "http://solver.local:8000/api/process");
    }

    #[tokio::test]
    async fn generate_posts_difficulty_and_count() {
        let (url, server) = serve_once("200 OK", r#"{"problems":[{"id":0,"grid":[[0,1],[1,-1]]}]}"#).await;
        let backend = HttpBackend::new(url, Duration::from_secs(5)).unwrap();

        let response = backend
            .generate(&GenerateRequest {
                difficulty: "Beginner".to_owned(),
                count: 1,
            })
            .await
            .unwrap();

        assert_eq!(response.problems[0].grid, vec![vec![0, 1], vec![1, -1]]);
        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/generate "));
        assert!(request.contains(r#"{"difficulty":"Beginner","count":1}"#));
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let (url, server) = serve_once("400 Bad Request", r#"{"detail":"No problems to process."}"#).await;
        let backend = HttpBackend::new(url, Duration::from_secs(5)).unwrap();

        let err = backend
            .process(&ProcessRequest { problems: vec![] })
            .await
            .unwrap_err();

        match err {
            CollaboratorError::Status { status, body } => {
                assert_eq!(status, 400);
                assert!(body.contains("No problems"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn process_without_results_is_a_shape_error() {
        let (url, server) = serve_once("200 OK", r#"{"status":"ok"}"#).await;
        let backend = HttpBackend::new(url, Duration::from_secs(5)).unwrap();

        let err = backend
            .process(&ProcessRequest { problems: vec![] })
            .await
            .unwrap_err();

        assert!(matches!(err, CollaboratorError::Shape(_)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn malformed_generate_payload_is_a_decode_error() {
        let (url, server) = serve_once("200 OK", r#"{"problems":"none"}"#).await;
        let backend = HttpBackend::new(url, Duration::from_secs(5)).unwrap();

        let err = backend
            .generate(&GenerateRequest {
                difficulty: "Expert".to_owned(),
                count: 2,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, CollaboratorError::Decode(_)));
        server.await.unwrap();
    }
}
