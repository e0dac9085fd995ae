use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::session_from_headers;
use crate::backend::User;
use crate::confluence::{CheckedItem, ConfluenceChecklist, ConfluenceSummary};
use crate::error::JournalError;
use crate::journal::{HistoryEntry, Journal, RuleWarning, SaveOutcome};
use crate::models::{ConfluenceLogRow, InstrumentSpec, SortOrder, UserSettings, ALL_INSTRUMENTS};
use crate::scoring::{IccAssessment, IccForm};

#[derive(Clone)]
pub struct ApiState {
    pub journal: Journal,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/auth/login", post(login))
        .route("/auth/callback", post(callback))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
        .route("/settings", get(get_settings).put(put_settings))
        .route("/instruments", get(instruments))
        .route("/icc/assess", post(assess_icc))
        .route("/icc/setups", post(save_icc))
        .route("/history", get(history))
        .route("/confluence/checklist", get(confluence_checklist))
        .route("/confluence/assess", post(assess_confluence))
        .route("/confluence/logs", get(confluence_logs).post(save_confluence))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
}

#[derive(Deserialize)]
pub struct CallbackRequest {
    /// Fragment (or full URL) the magic link redirected to.
    pub fragment: String,
}

#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Tokens the client keeps for later requests, plus who they belong to.
#[derive(Serialize)]
pub struct CallbackResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub user: User,
}

#[derive(Deserialize)]
pub struct SaveSetupRequest {
    #[serde(flatten)]
    pub form: IccForm,
    #[serde(default)]
    pub confirm_override: bool,
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub order: SortOrder,
}

#[derive(Serialize)]
pub struct AssessResponse {
    pub assessment: IccAssessment,
    pub warnings: Vec<RuleWarning>,
}

#[derive(Deserialize)]
pub struct ConfluenceRequest {
    #[serde(default)]
    pub checked: Vec<CheckedItem>,
}

#[derive(Serialize)]
pub struct InstrumentResponse {
    pub symbol: &'static str,
    #[serde(flatten)]
    pub spec: InstrumentSpec,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn login(
    State(state): State<ApiState>,
    Json(req): Json<LoginRequest>,
) -> Result<StatusCode, JournalError> {
    state.journal.request_login(&req.email).await?;
    Ok(StatusCode::ACCEPTED)
}

async fn callback(
    State(state): State<ApiState>,
    Json(req): Json<CallbackRequest>,
) -> Result<Json<CallbackResponse>, JournalError> {
    let (session, user) = state.journal.complete_login(&req.fragment).await?;
    Ok(Json(CallbackResponse {
        access_token: session.access_token,
        refresh_token: session.refresh_token,
        user,
    }))
}

async fn refresh(
    State(state): State<ApiState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<CallbackResponse>, JournalError> {
    let (session, user) = state.journal.refresh(&req.refresh_token).await?;
    Ok(Json(CallbackResponse {
        access_token: session.access_token,
        refresh_token: session.refresh_token,
        user,
    }))
}

async fn logout(
    State(state): State<ApiState>,
    headers: HeaderMap,
) -> Result<StatusCode, JournalError> {
    let session = session_from_headers(&headers);
    state.journal.logout(session.as_ref()).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_settings(State(state): State<ApiState>, headers: HeaderMap) -> Json<UserSettings> {
    let session = session_from_headers(&headers);
    Json(state.journal.load_settings(session.as_ref()).await)
}

async fn put_settings(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(settings): Json<UserSettings>,
) -> Result<Json<UserSettings>, JournalError> {
    let session = session_from_headers(&headers);
    let saved = state
        .journal
        .save_settings(session.as_ref(), settings)
        .await?;
    Ok(Json(saved))
}

async fn instruments() -> Json<Vec<InstrumentResponse>> {
    Json(
        ALL_INSTRUMENTS
            .iter()
            .map(|i| InstrumentResponse {
                symbol: i.symbol(),
                spec: i.spec(),
            })
            .collect(),
    )
}

async fn assess_icc(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(form): Json<IccForm>,
) -> Result<Json<AssessResponse>, JournalError> {
    let session = session_from_headers(&headers);
    let (assessment, warnings) = state.journal.assess(session.as_ref(), &form).await?;
    Ok(Json(AssessResponse {
        assessment,
        warnings,
    }))
}

async fn save_icc(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(req): Json<SaveSetupRequest>,
) -> Result<(StatusCode, Json<SaveOutcome>), JournalError> {
    let session = session_from_headers(&headers);
    let outcome = state
        .journal
        .save_setup(session.as_ref(), &req.form, req.confirm_override)
        .await?;
    let status = match outcome {
        SaveOutcome::Saved { .. } => StatusCode::CREATED,
        SaveOutcome::NeedsConfirmation { .. } => StatusCode::OK,
    };
    Ok((status, Json(outcome)))
}

async fn history(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<HistoryEntry>>, JournalError> {
    let session = session_from_headers(&headers);
    Ok(Json(
        state
            .journal
            .history(session.as_ref(), query.order)
            .await?,
    ))
}

async fn confluence_checklist() -> Json<ConfluenceChecklist> {
    Json(ConfluenceChecklist::default())
}

async fn assess_confluence(
    Json(req): Json<ConfluenceRequest>,
) -> Result<Json<ConfluenceSummary>, JournalError> {
    let checklist = ConfluenceChecklist::with_checked(&req.checked)?;
    Ok(Json(checklist.summary()))
}

async fn save_confluence(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(req): Json<ConfluenceRequest>,
) -> Result<(StatusCode, Json<ConfluenceSummary>), JournalError> {
    let session = session_from_headers(&headers);
    let checklist = ConfluenceChecklist::with_checked(&req.checked)?;
    let summary = state
        .journal
        .save_confluence(session.as_ref(), &checklist)
        .await?;
    Ok((StatusCode::CREATED, Json(summary)))
}

async fn confluence_logs(
    State(state): State<ApiState>,
    headers: HeaderMap,
) -> Result<Json<Vec<ConfluenceLogRow>>, JournalError> {
    let session = session_from_headers(&headers);
    Ok(Json(state.journal.confluence_history(session.as_ref()).await?))
}
