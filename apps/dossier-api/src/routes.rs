use axum::{
	Json, Router,
	body::Bytes,
	extract::{Path, State},
	http::{HeaderMap, StatusCode, header},
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Serialize, de::DeserializeOwned};
use sha2::{Digest, Sha256};

use crate::state::AppState;
use dossier_config::{AUTH_MODE_STATIC_KEYS, Security};
use dossier_service::{DossierService, Error, RequestContext};

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/actions/{action}", post(dispatch))
		.with_state(state)
}

/// Resolves the caller from request headers according to `security.auth_mode`.
///
/// Anything unrecognized yields an anonymous context; the service guard turns that into
/// `UNAUTHORIZED`.
pub fn request_context(security: &Security, headers: &HeaderMap) -> RequestContext {
	if security.auth_mode == AUTH_MODE_STATIC_KEYS {
		let Some(token) = bearer_token(headers) else {
			return RequestContext::anonymous();
		};

		let presented = Sha256::digest(token.as_bytes());

		return security
			.auth_keys
			.iter()
			.find(|key| digests_match(&Sha256::digest(key.token.as_bytes()), &presented))
			.map(|key| RequestContext::for_user(key.user_id.as_str()))
			.unwrap_or_default();
	}

	headers
		.get(security.user_header.as_str())
		.and_then(|value| value.to_str().ok())
		.map(RequestContext::for_user)
		.unwrap_or_default()
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn dispatch(
	State(state): State<AppState>,
	Path(action): Path<String>,
	headers: HeaderMap,
	body: Bytes,
) -> Result<Response, ApiError> {
	let service = state.service.as_ref();
	let ctx = request_context(&service.cfg.security, &headers);

	// Credentials are checked before the body is decoded, so a bad body never masks a 401.
	dossier_service::require_caller(&ctx)?;

	run_action(service, &ctx, &action, &body).await
}

async fn run_action(
	service: &DossierService,
	ctx: &RequestContext,
	action: &str,
	body: &[u8],
) -> Result<Response, ApiError> {
	let response = match action {
		"createProject" => respond(service.create_project(ctx, decode(body)?).await?),
		"updateProject" => respond(service.update_project(ctx, decode(body)?).await?),
		"archiveProject" => respond(service.archive_project(ctx, decode(body)?).await?),
		"listProjects" => respond(service.list_projects(ctx, decode(body)?).await?),
		"getProjectWithDetails" =>
			respond(service.get_project_with_details(ctx, decode(body)?).await?),
		"saveSource" => respond(service.save_source(ctx, decode(body)?).await?),
		"deleteSource" => respond(service.delete_source(ctx, decode(body)?).await?),
		"saveNote" => respond(service.save_note(ctx, decode(body)?).await?),
		"deleteNote" => respond(service.delete_note(ctx, decode(body)?).await?),
		"createJob" => respond(service.create_job(ctx, decode(body)?).await?),
		"updateJob" => respond(service.update_job(ctx, decode(body)?).await?),
		"listJobs" => respond(service.list_jobs(ctx, decode(body)?).await?),
		_ => {
			return Err(json_error(
				StatusCode::NOT_FOUND,
				"NOT_FOUND",
				format!("Unknown action: {action}."),
			));
		},
	};

	Ok(response)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
	let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
	let token = value.strip_prefix("Bearer ")?.trim();

	if token.is_empty() { None } else { Some(token) }
}

// Visits every byte, so timing does not depend on where the inputs differ.
fn digests_match(left: &[u8], right: &[u8]) -> bool {
	let diff = left.iter().zip(right).fold(0_u8, |acc, (a, b)| acc | (a ^ b));

	left.len() == right.len() && diff == 0
}

// An empty body decodes as `{}` so actions whose fields are all optional can be called bare.
fn decode<T>(body: &[u8]) -> Result<T, ApiError>
where
	T: DeserializeOwned,
{
	let body = if body.iter().all(u8::is_ascii_whitespace) { b"{}".as_slice() } else { body };

	serde_json::from_slice(body).map_err(|err| {
		json_error(
			StatusCode::BAD_REQUEST,
			"INVALID_REQUEST",
			format!("Invalid request body: {err}."),
		)
	})
}

fn respond<T>(value: T) -> Response
where
	T: Serialize,
{
	Json(value).into_response()
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

	pub fn status(&self) -> StatusCode {
		self.status
	}
}

pub fn json_error(status: StatusCode, code: &str, message: impl Into<String>) -> ApiError {
	ApiError::new(status, code, message)
}

impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::Unauthorized =>
				json_error(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "Unauthorized."),
			Error::NotFound { message } => json_error(StatusCode::NOT_FOUND, "NOT_FOUND", message),
			Error::InvalidRequest { message } =>
				json_error(StatusCode::BAD_REQUEST, "INVALID_REQUEST", message),
			Error::Storage(err) => {
				tracing::error!(error = %err, "Storage error while handling an action.");

				json_error(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", "Internal error.")
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
