//! HTTP surface: `GET /fiscalite` and `GET /sante`.

use crate::app::FiscalApp;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use fiscal_assistant::query::{MAX_QUERY_CHARS, MIN_QUERY_CHARS};
use fiscal_core::{AppError, AppResult};
use serde::{Deserialize, Deserializer, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::Instrument;

const INTERNAL_ERROR_MESSAGE: &str =
    "Une erreur est survenue lors du traitement de votre question. Veuillez réessayer plus tard.";

/// Query string of `/fiscalite`.
#[derive(Debug, Deserialize)]
pub struct FiscaliteParams {
    pub question: Option<String>,
    #[serde(default = "default_strict", deserialize_with = "flexible_bool")]
    pub strict: bool,
    pub session: Option<String>,
}

fn default_strict() -> bool {
    true
}

/// `true`/`false` in any case, `1`/`0`, `yes`/`no` or `on`/`off`.
fn flexible_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "invalid boolean '{}'",
            other
        ))),
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct FiscaliteResponse {
    pub reponse: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Error body `{"detail": ...}` with its status.
#[derive(Debug, PartialEq)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "detail": self.detail }));
        (self.status, body).into_response()
    }
}

/// Trimmed question, or a 400 when it is missing or out of bounds.
fn validate_question(question: Option<&str>) -> Result<&str, ApiError> {
    let question = question.map(str::trim).unwrap_or_default();
    let len = question.chars().count();

    if len < MIN_QUERY_CHARS {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            format!(
                "La question doit contenir au moins {} caractères",
                MIN_QUERY_CHARS
            ),
        ));
    }
    if len > MAX_QUERY_CHARS {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            format!(
                "La question ne doit pas dépasser {} caractères",
                MAX_QUERY_CHARS
            ),
        ));
    }
    Ok(question)
}

pub async fn fiscalite(
    State(app): State<Arc<FiscalApp>>,
    params: Result<Query<FiscaliteParams>, QueryRejection>,
) -> Result<Json<FiscaliteResponse>, ApiError> {
    let Query(params) = params.map_err(|rejection| {
        ApiError::new(
            StatusCode::BAD_REQUEST,
            format!("Paramètres invalides : {}", rejection.body_text()),
        )
    })?;
    let question = validate_question(params.question.as_deref())?;
    let span = tracing::info_span!(
        "fiscalite",
        request_id = %uuid::Uuid::new_v4(),
        strict = params.strict
    );

    async {
        tracing::info!("Question received: {}", question);
        match app
            .respond(question, params.strict, params.session.as_deref())
            .await
        {
            Ok(answer) => {
                tracing::info!(origin = ?answer.origin, "Answer sent");
                Ok(Json(FiscaliteResponse {
                    reponse: answer.text,
                }))
            }
            Err(e) => {
                tracing::error!("Failed to answer: {}", e);
                Err(ApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE,
                ))
            }
        }
    }
    .instrument(span)
    .await
}

pub async fn sante(State(app): State<Arc<FiscalApp>>) -> Result<Json<HealthResponse>, ApiError> {
    match app.health().await {
        Ok(()) => Ok(Json(HealthResponse { status: "ok" })),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            Err(ApiError::new(StatusCode::SERVICE_UNAVAILABLE, e.detail()))
        }
    }
}

pub fn router(app: Arc<FiscalApp>) -> Router {
    Router::new()
        .route("/fiscalite", get(fiscalite))
        .route("/sante", get(sante))
        .with_state(app)
}

/// Bind and serve until Ctrl-C.
pub async fn serve(app: Arc<FiscalApp>, bind: &str) -> AppResult<()> {
    let addr: SocketAddr = bind
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid bind address '{}': {}", bind, e)))?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", addr);
    tracing::info!("Endpoints: GET /fiscalite?question=..., GET /sante");

    axum::serve(listener, router(app))
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
