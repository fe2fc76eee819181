//! Request handlers
//!
//! Handlers parse path and body into domain values, call the service and
//! serialize the domain read models as-is.

use super::error::ApiError;
use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use poker_application::{CreateSessionInput, PlanningPokerService};
use poker_domain::{
    AgreementMode, Card, CloseReport, Deck, Finalization, JoinOutcome, ParticipantName,
    SessionCode, SessionResults, SessionSummary, SessionView, StoryCursor, VoteReceipt,
    parse_story_list,
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

pub type AppState = Arc<PlanningPokerService>;

type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub title: String,
    /// Any shape accepted by the story list import
    pub stories: Value,
    #[serde(default)]
    pub mode: Option<AgreementMode>,
}

#[derive(Debug, Deserialize)]
pub struct JoinRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub participant: String,
    /// Card face, as a string (`"5"`, `"coffee"`, `"?"`) or a number
    pub card: Value,
}

#[derive(Debug, Default, Deserialize)]
pub struct CloseRequest {
    #[serde(default)]
    pub cursor: Option<StoryCursor>,
}

#[derive(Debug, Deserialize)]
pub struct ViewQuery {
    #[serde(default)]
    pub viewer: Option<String>,
}

fn card_from(value: &Value) -> Result<Card, ApiError> {
    match value {
        Value::String(face) => Ok(face.parse()?),
        Value::Number(n) => Ok(n.to_string().parse()?),
        other => Err(poker_domain::DomainError::InvalidCard(other.to_string()).into()),
    }
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn deck() -> Json<&'static [Card]> {
    Json(Deck::values())
}

pub async fn create_session(
    State(service): State<AppState>,
    payload: Result<Json<CreateSessionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SessionSummary>), ApiError> {
    let Json(request) = payload?;
    let stories = parse_story_list(&request.stories)?;
    let mut input = CreateSessionInput::new(request.title, stories);
    if let Some(mode) = request.mode {
        input = input.with_mode(mode);
    }
    let summary = service.create_session(input).await?;
    Ok((StatusCode::CREATED, Json(summary)))
}

pub async fn list_sessions(State(service): State<AppState>) -> Json<Vec<SessionSummary>> {
    Json(service.list_sessions().await)
}

pub async fn session_view(
    State(service): State<AppState>,
    Path(code): Path<String>,
    query: Result<Query<ViewQuery>, QueryRejection>,
) -> ApiResult<SessionView> {
    let code: SessionCode = code.parse()?;
    let Query(query) = query?;
    let viewer = query
        .viewer
        .filter(|v| !v.trim().is_empty())
        .map(ParticipantName::new)
        .transpose()?;
    let mut view = service.session_view(&code, viewer.as_ref()).await?;
    // Callers are not authenticated, so a hidden card is never echoed back
    if let Some(current) = view.current.as_mut()
        && !current.is_revealed()
    {
        current.your_vote = None;
    }
    Ok(Json(view))
}

pub async fn join_session(
    State(service): State<AppState>,
    Path(code): Path<String>,
    payload: Result<Json<JoinRequest>, JsonRejection>,
) -> ApiResult<JoinOutcome> {
    let code: SessionCode = code.parse()?;
    let Json(request) = payload?;
    let name = ParticipantName::new(&request.name)?;
    Ok(Json(service.join_session(&code, &name).await?))
}

pub async fn leave_session(
    State(service): State<AppState>,
    Path((code, name)): Path<(String, String)>,
) -> ApiResult<Value> {
    let code: SessionCode = code.parse()?;
    let name = ParticipantName::new(&name)?;
    let revealed = service.leave_session(&code, &name).await?;
    Ok(Json(json!({ "revealed": revealed })))
}

pub async fn submit_vote(
    State(service): State<AppState>,
    Path(code): Path<String>,
    payload: Result<Json<VoteRequest>, JsonRejection>,
) -> ApiResult<VoteReceipt> {
    let code: SessionCode = code.parse()?;
    let Json(request) = payload?;
    let participant = ParticipantName::new(&request.participant)?;
    let card = card_from(&request.card)?;
    Ok(Json(service.submit_vote(&code, &participant, card).await?))
}

/// The body is optional; without a cursor the server closes whatever is
/// revealed or replays the last close.
pub async fn request_close(
    State(service): State<AppState>,
    Path(code): Path<String>,
    body: Bytes,
) -> ApiResult<CloseReport> {
    let code: SessionCode = code.parse()?;
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        CloseRequest::default()
    } else {
        serde_json::from_slice::<CloseRequest>(&body)?
    };
    Ok(Json(service.request_close(&code, request.cursor).await?))
}

pub async fn reset_votes(
    State(service): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<StoryCursor> {
    let code: SessionCode = code.parse()?;
    Ok(Json(service.reset_votes(&code).await?))
}

pub async fn request_finalize(
    State(service): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<Finalization> {
    let code: SessionCode = code.parse()?;
    Ok(Json(service.request_finalize(&code).await?))
}

pub async fn results(
    State(service): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<SessionResults> {
    let code: SessionCode = code.parse()?;
    Ok(Json(service.results(&code).await?))
}
