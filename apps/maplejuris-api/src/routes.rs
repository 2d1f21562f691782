use axum::{
	Json, Router,
	extract::State,
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};

use maplejuris_service::Error as ServiceError;

use crate::state::AppState;

pub const API_VERSION: &str = "1.0.0";

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/api/health", get(health))
		.route("/api/chat", post(chat))
		.with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct QuestionRequest {
	pub question: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
	pub question: String,
	pub answer: Option<String>,
	pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
	pub status: String,
	pub version: String,
}

async fn health() -> Json<HealthResponse> {
	Json(HealthResponse { status: "healthy".to_string(), version: API_VERSION.to_string() })
}

async fn chat(
	State(state): State<AppState>,
	Json(payload): Json<QuestionRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
	if payload.question.is_empty() {
		return Err(json_error(
			StatusCode::UNPROCESSABLE_ENTITY,
			"invalid_request",
			"question must be non-empty.",
		));
	}

	let result = state.graph.run(&payload.question).await?;

	if let Some(error) = result.error.as_deref() {
		tracing::warn!(error, "Graph returned an error.");
	}

	Ok(Json(ChatResponse { question: result.question, answer: result.answer, error: result.error }))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}

impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}

pub fn json_error(status: StatusCode, code: &str, message: impl Into<String>) -> ApiError {
	ApiError::new(status, code, message)
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::InvalidInput { message } =>
				json_error(StatusCode::UNPROCESSABLE_ENTITY, "invalid_request", message),
			other => {
				// Internal detail is logged, never returned to the caller.
				tracing::error!(error = %other, "Critical error in chat endpoint.");

				json_error(
					StatusCode::INTERNAL_SERVER_ERROR,
					"internal_error",
					"Failed to process question. Please try again.",
				)
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}
