use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use crate::{DossierService, Error, RequestContext, Result, access, require_caller};
use dossier_domain::{kinds::SourceType, validate};
use dossier_storage::models::Source;

/// Inserts when `id` is absent. With an `id`, every mutable field is replaced.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SaveSourceRequest {
	pub id: Option<i64>,
	pub project_id: i64,
	#[serde(rename = "type")]
	pub source_type: Option<SourceType>,
	pub title: String,
	pub url: Option<String>,
	pub citation_text: Option<String>,
	pub citation_meta: Option<Value>,
	pub snippet: Option<String>,
	pub metadata: Option<Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeleteSourceRequest {
	pub id: i64,
	pub project_id: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SourceItem {
	pub id: i64,
	pub project_id: i64,
	#[serde(rename = "type")]
	pub source_type: String,
	pub title: String,
	pub url: Option<String>,
	pub citation_text: Option<String>,
	pub citation_meta: Option<Value>,
	pub snippet: Option<String>,
	pub metadata: Option<Value>,
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
}
impl From<Source> for SourceItem {
	fn from(source: Source) -> Self {
		Self {
			id: source.id,
			project_id: source.project_id,
			source_type: source.r#type,
			title: source.title,
			url: source.url,
			citation_text: source.citation_text,
			citation_meta: source.citation_meta,
			snippet: source.snippet,
			metadata: source.metadata,
			created_at: source.created_at,
		}
	}
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SourceResponse {
	pub source: SourceItem,
}

impl DossierService {
	pub async fn save_source(
		&self,
		ctx: &RequestContext,
		req: SaveSourceRequest,
	) -> Result<SourceResponse> {
		let caller = require_caller(ctx)?;
		let limits = &self.cfg.limits;

		if let Some(id) = req.id {
			validate::check_id("$.id", id)?;
		}

		let url = validate::normalize_url(req.url);

		validate::check_id("$.project_id", req.project_id)?;
		validate::check_title("$.title", &req.title, limits)?;
		validate::check_url("$.url", url.as_deref(), limits)?;
		validate::check_optional_content("$.citation_text", req.citation_text.as_deref(), limits)?;
		validate::check_json("$.citation_meta", req.citation_meta.as_ref())?;
		validate::check_optional_content("$.snippet", req.snippet.as_deref(), limits)?;
		validate::check_json("$.metadata", req.metadata.as_ref())?;

		let source_type = req.source_type.unwrap_or_default();
		let mut tx = self.db.pool.begin().await?;

		access::lock_owned_project(&mut tx, req.project_id, caller.user_id()).await?;

		let source: Source = match req.id {
			Some(id) => {
				let updated: Option<Source> = sqlx::query_as(
					"\
UPDATE sources
SET
	type = $3,
	title = $4,
	url = $5,
	citation_text = $6,
	citation_meta = $7,
	snippet = $8,
	metadata = $9
WHERE id = $1 AND project_id = $2
RETURNING *",
				)
				.bind(id)
				.bind(req.project_id)
				.bind(source_type.as_str())
				.bind(req.title.trim())
				.bind(url.as_deref())
				.bind(req.citation_text.as_deref())
				.bind(req.citation_meta.as_ref())
				.bind(req.snippet.as_deref())
				.bind(req.metadata.as_ref())
				.fetch_optional(&mut *tx)
				.await?;

				updated.ok_or_else(|| Error::not_found(access::SOURCE_NOT_FOUND))?
			},
			None => {
				sqlx::query_as(
					"\
INSERT INTO sources (
	project_id,
	type,
	title,
	url,
	citation_text,
	citation_meta,
	snippet,
	metadata,
	created_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
RETURNING *",
				)
				.bind(req.project_id)
				.bind(source_type.as_str())
				.bind(req.title.trim())
				.bind(url.as_deref())
				.bind(req.citation_text.as_deref())
				.bind(req.citation_meta.as_ref())
				.bind(req.snippet.as_deref())
				.bind(req.metadata.as_ref())
				.bind(OffsetDateTime::now_utc())
				.fetch_one(&mut *tx)
				.await?
			},
		};

		tx.commit().await?;

		tracing::info!(
			source_id = source.id,
			project_id = source.project_id,
			owner_id = caller.user_id(),
			replaced = req.id.is_some(),
			"Source saved."
		);

		Ok(SourceResponse { source: source.into() })
	}

	pub async fn delete_source(
		&self,
		ctx: &RequestContext,
		req: DeleteSourceRequest,
	) -> Result<SourceResponse> {
		let caller = require_caller(ctx)?;

		validate::check_id("$.id", req.id)?;
		validate::check_id("$.project_id", req.project_id)?;

		let deleted: Option<Source> = sqlx::query_as(
			"\
DELETE FROM sources s
USING projects p
WHERE s.id = $1 AND s.project_id = $2 AND p.id = s.project_id AND p.owner_id = $3
RETURNING s.*",
		)
		.bind(req.id)
		.bind(req.project_id)
		.bind(caller.user_id())
		.fetch_optional(&self.db.pool)
		.await?;
		let Some(source) = deleted else {
			tracing::debug!(
				source_id = req.id,
				project_id = req.project_id,
				"Source delete matched no owned row."
			);

			return Err(Error::not_found(access::SOURCE_NOT_FOUND));
		};

		tracing::info!(
			source_id = source.id,
			project_id = source.project_id,
			owner_id = caller.user_id(),
			"Source deleted."
		);

		Ok(SourceResponse { source: source.into() })
	}
}
