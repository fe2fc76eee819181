//! HTTP client for a remote planning poker server.

use async_trait::async_trait;
use poker_application::{PlanningPokerPort, PokerError};
use poker_domain::{
    AgreementMode, Card, CloseReport, ErrorKind, Finalization, JoinOutcome, ParticipantName,
    SessionCode, SessionResults, SessionSummary, SessionView, StoryCursor, StoryDraft, VoteReceipt,
};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// Error body returned by the server: `{ "error": { "code", "message" } }`
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: String,
    message: String,
}

#[derive(Debug, Deserialize)]
struct LeaveResponse {
    revealed: bool,
}

/// [`PlanningPokerPort`] over HTTP/JSON.
pub struct HttpPokerClient {
    base: Url,
    client: Client,
}

impl HttpPokerClient {
    /// Client for the server at `base_url` (e.g. `http://127.0.0.1:8080`).
    pub fn new(base_url: &str) -> Result<Self, PokerError> {
        let base = Url::parse(base_url)
            .map_err(|e| PokerError::Transport(format!("invalid server URL {}: {}", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(PokerError::Transport(format!(
                "invalid server URL {}: not a base URL",
                base_url
            )));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| PokerError::Transport(e.to_string()))?;
        Ok(Self { base, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `base` + percent-encoded path segments.
    fn url(&self, segments: &[&str]) -> Result<Url, PokerError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| PokerError::Transport(format!("{} cannot be a base URL", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn session_url(&self, code: &SessionCode, rest: &[&str]) -> Result<Url, PokerError> {
        let mut segments = vec!["api", "sessions", code.as_str()];
        segments.extend_from_slice(rest);
        self.url(&segments)
    }

    /// Create a session on the server. Not part of the participant port:
    /// only the organizer creates sessions.
    pub async fn create_session(
        &self,
        title: &str,
        stories: &[StoryDraft],
        mode: Option<AgreementMode>,
    ) -> Result<SessionSummary, PokerError> {
        let url = self.url(&["api", "sessions"])?;
        self.send(self.request(Method::POST, url).json(&json!({
            "title": title,
            "stories": stories,
            "mode": mode,
        })))
        .await
    }

    pub async fn list_sessions(&self) -> Result<Vec<SessionSummary>, PokerError> {
        let url = self.url(&["api", "sessions"])?;
        self.send(self.request(Method::GET, url)).await
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!("{} {}", method, url);
        self.client.request(method, url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, PokerError> {
        let response = request.send().await.map_err(transport)?;
        let response = check_status(response).await?;
        response.json::<T>().await.map_err(transport)
    }
}

fn transport(e: reqwest::Error) -> PokerError {
    PokerError::Transport(e.to_string())
}

/// HTTP status → error kind, mirroring the server's mapping.
fn kind_for_status(status: StatusCode) -> Option<ErrorKind> {
    match status {
        StatusCode::NOT_FOUND => Some(ErrorKind::NotFound),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => Some(ErrorKind::InvalidInput),
        StatusCode::CONFLICT => Some(ErrorKind::IllegalTransition),
        StatusCode::GONE => Some(ErrorKind::Closed),
        _ => None,
    }
}

fn remote_error(status: StatusCode, body: &str) -> PokerError {
    let (code, message) = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => (envelope.error.code, envelope.error.message),
        Err(_) => (
            "http_error".to_string(),
            format!("{}: {}", status, body.trim()),
        ),
    };
    match kind_for_status(status) {
        Some(kind) => PokerError::Remote {
            kind,
            code,
            message,
        },
        None => PokerError::Transport(message),
    }
}

async fn check_status(response: Response) -> Result<Response, PokerError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(remote_error(status, &body))
}

#[async_trait]
impl PlanningPokerPort for HttpPokerClient {
    async fn view(
        &self,
        code: &SessionCode,
        viewer: Option<&ParticipantName>,
    ) -> Result<SessionView, PokerError> {
        let mut request = self.request(Method::GET, self.session_url(code, &[])?);
        if let Some(viewer) = viewer {
            request = request.query(&[("viewer", viewer.as_str())]);
        }
        self.send(request).await
    }

    async fn join(
        &self,
        code: &SessionCode,
        participant: &ParticipantName,
    ) -> Result<JoinOutcome, PokerError> {
        let url = self.session_url(code, &["participants"])?;
        self.send(
            self.request(Method::POST, url)
                .json(&json!({ "name": participant })),
        )
        .await
    }

    async fn leave(
        &self,
        code: &SessionCode,
        participant: &ParticipantName,
    ) -> Result<bool, PokerError> {
        let url = self.session_url(code, &["participants", participant.as_str()])?;
        let response: LeaveResponse = self.send(self.request(Method::DELETE, url)).await?;
        Ok(response.revealed)
    }

    async fn submit_vote(
        &self,
        code: &SessionCode,
        participant: &ParticipantName,
        card: Card,
    ) -> Result<VoteReceipt, PokerError> {
        let url = self.session_url(code, &["votes"])?;
        self.send(
            self.request(Method::POST, url)
                .json(&json!({ "participant": participant, "card": card })),
        )
        .await
    }

    async fn request_close(
        &self,
        code: &SessionCode,
        cursor: Option<StoryCursor>,
    ) -> Result<CloseReport, PokerError> {
        let url = self.session_url(code, &["close"])?;
        self.send(
            self.request(Method::POST, url)
                .json(&json!({ "cursor": cursor })),
        )
        .await
    }

    async fn reset_votes(&self, code: &SessionCode) -> Result<StoryCursor, PokerError> {
        let url = self.session_url(code, &["reset"])?;
        self.send(self.request(Method::POST, url)).await
    }

    async fn request_finalize(&self, code: &SessionCode) -> Result<Finalization, PokerError> {
        let url = self.session_url(code, &["finalize"])?;
        self.send(self.request(Method::POST, url)).await
    }

    async fn results(&self, code: &SessionCode) -> Result<SessionResults, PokerError> {
        let url = self.session_url(code, &["results"])?;
        self.send(self.request(Method::GET, url)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_url_encodes_segments() {
        let client = HttpPokerClient::new("http://localhost:8080/").unwrap();
        let code = SessionCode::from_number(42);

        let url = client
            .session_url(&code, &["participants", "Ann Lee/2"])
            .unwrap();

        assert_eq!(
            url.as_str(),
            "http://localhost:8080/api/sessions/000042/participants/Ann%20Lee%2F2"
        );
    }

    #[test]
    fn test_url_keeps_base_path_prefix() {
        let client = HttpPokerClient::new("http://example.com/poker").unwrap();
        let url = client.url(&["api", "deck"]).unwrap();
        assert_eq!(url.as_str(), "http://example.com/poker/api/deck");
    }

    #[test]
    fn test_rejects_non_base_url() {
        assert!(HttpPokerClient::new("mailto:team@example.com").is_err());
        assert!(HttpPokerClient::new("not a url").is_err());
    }

    #[test]
    fn test_remote_error_from_envelope() {
        let body = r#"{"error":{"code":"illegal_transition","message":"story 0 has not been revealed"}}"#;
        let error = remote_error(StatusCode::CONFLICT, body);

        assert_eq!(error.kind(), Some(ErrorKind::IllegalTransition));
        assert_eq!(error.code(), "illegal_transition");
        assert_eq!(error.to_string(), "story 0 has not been revealed");
        assert!(error.is_retryable());
    }

    #[test]
    fn test_remote_error_without_envelope() {
        let error = remote_error(StatusCode::BAD_GATEWAY, "upstream down");
        assert!(matches!(error, PokerError::Transport(_)));

        let error = remote_error(StatusCode::GONE, "");
        assert_eq!(error.kind(), Some(ErrorKind::Closed));
        assert!(!error.is_retryable());
    }
}
