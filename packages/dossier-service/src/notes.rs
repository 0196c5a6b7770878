use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use crate::{DossierService, Error, RequestContext, Result, access, require_caller};
use dossier_domain::{kinds::NoteType, validate};
use dossier_storage::models::Note;

/// Inserts when `id` is absent. With an `id`, every mutable field is replaced, `source_id`
/// included.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SaveNoteRequest {
	pub id: Option<i64>,
	pub project_id: i64,
	pub source_id: Option<i64>,
	#[serde(rename = "type")]
	pub note_type: Option<NoteType>,
	pub content: String,
	pub heading: Option<String>,
	pub tags: Option<Vec<String>>,
	pub location: Option<Value>,
	pub ai_meta: Option<Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeleteNoteRequest {
	pub id: i64,
	pub project_id: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NoteItem {
	pub id: i64,
	pub project_id: i64,
	pub source_id: Option<i64>,
	#[serde(rename = "type")]
	pub note_type: String,
	pub content: String,
	pub heading: Option<String>,
	pub tags: Option<Vec<String>>,
	pub location: Option<Value>,
	pub ai_meta: Option<Value>,
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	#[serde(with = "time::serde::rfc3339")]
	pub updated_at: OffsetDateTime,
}
impl From<Note> for NoteItem {
	fn from(note: Note) -> Self {
		Self {
			id: note.id,
			project_id: note.project_id,
			source_id: note.source_id,
			note_type: note.r#type,
			content: note.content,
			heading: note.heading,
			tags: note.tags,
			location: note.location,
			ai_meta: note.ai_meta,
			created_at: note.created_at,
			updated_at: note.updated_at,
		}
	}
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NoteResponse {
	pub note: NoteItem,
}

impl DossierService {
	pub async fn save_note(
		&self,
		ctx: &RequestContext,
		req: SaveNoteRequest,
	) -> Result<NoteResponse> {
		let caller = require_caller(ctx)?;
		let limits = &self.cfg.limits;

		if let Some(id) = req.id {
			validate::check_id("$.id", id)?;
		}

		validate::check_id("$.project_id", req.project_id)?;

		if let Some(source_id) = req.source_id {
			validate::check_id("$.source_id", source_id)?;
		}

		let tags = validate::normalize_tags(req.tags);

		validate::check_content("$.content", &req.content, limits)?;
		validate::check_optional_title("$.heading", req.heading.as_deref(), limits)?;
		validate::check_tags("$.tags", tags.as_deref(), limits)?;
		validate::check_json("$.location", req.location.as_ref())?;
		validate::check_json("$.ai_meta", req.ai_meta.as_ref())?;

		let note_type = req.note_type.unwrap_or_default();
		let now = OffsetDateTime::now_utc();
		let mut tx = self.db.pool.begin().await?;

		access::lock_owned_project(&mut tx, req.project_id, caller.user_id()).await?;

		if let Some(source_id) = req.source_id {
			access::lock_project_source(&mut tx, source_id, req.project_id).await?;
		}

		let note: Note = match req.id {
			Some(id) => {
				let updated: Option<Note> = sqlx::query_as(
					"\
UPDATE notes
SET
	source_id = $3,
	type = $4,
	content = $5,
	heading = $6,
	tags = $7,
	location = $8,
	ai_meta = $9,
	updated_at = $10
WHERE id = $1 AND project_id = $2
RETURNING *",
				)
				.bind(id)
				.bind(req.project_id)
				.bind(req.source_id)
				.bind(note_type.as_str())
				.bind(req.content.trim())
				.bind(req.heading.as_deref())
				.bind(tags.as_deref())
				.bind(req.location.as_ref())
				.bind(req.ai_meta.as_ref())
				.bind(now)
				.fetch_optional(&mut *tx)
				.await?;

				updated.ok_or_else(|| Error::not_found(access::NOTE_NOT_FOUND))?
			},
			None => {
				sqlx::query_as(
					"\
INSERT INTO notes (
	project_id,
	source_id,
	type,
	content,
	heading,
	tags,
	location,
	ai_meta,
	created_at,
	updated_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
RETURNING *",
				)
				.bind(req.project_id)
				.bind(req.source_id)
				.bind(note_type.as_str())
				.bind(req.content.trim())
				.bind(req.heading.as_deref())
				.bind(tags.as_deref())
				.bind(req.location.as_ref())
				.bind(req.ai_meta.as_ref())
				.bind(now)
				.fetch_one(&mut *tx)
				.await?
			},
		};

		tx.commit().await?;

		tracing::info!(
			note_id = note.id,
			project_id = note.project_id,
			owner_id = caller.user_id(),
			replaced = req.id.is_some(),
			"Note saved."
		);

		Ok(NoteResponse { note: note.into() })
	}

	pub async fn delete_note(
		&self,
		ctx: &RequestContext,
		req: DeleteNoteRequest,
	) -> Result<NoteResponse> {
		let caller = require_caller(ctx)?;

		validate::check_id("$.id", req.id)?;
		validate::check_id("$.project_id", req.project_id)?;

		let deleted: Option<Note> = sqlx::query_as(
			"\
DELETE FROM notes n
USING projects p
WHERE n.id = $1 AND n.project_id = $2 AND p.id = n.project_id AND p.owner_id = $3
RETURNING n.*",
		)
		.bind(req.id)
		.bind(req.project_id)
		.bind(caller.user_id())
		.fetch_optional(&self.db.pool)
		.await?;
		let Some(note) = deleted else {
			tracing::debug!(
				note_id = req.id,
				project_id = req.project_id,
				"Note delete matched no owned row."
			);

			return Err(Error::not_found(access::NOTE_NOT_FOUND));
		};

		tracing::info!(
			note_id = note.id,
			project_id = note.project_id,
			owner_id = caller.user_id(),
			"Note deleted."
		);

		Ok(NoteResponse { note: note.into() })
	}
}
