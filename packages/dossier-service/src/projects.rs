use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
	DossierService, Error, NoteItem, RequestContext, Result, SourceItem, access, require_caller,
};
use dossier_domain::{kinds::ProjectStatus, validate};
use dossier_storage::models::{Note, Project, Source};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateProjectRequest {
	pub title: String,
	pub description: Option<String>,
	pub topic: Option<String>,
	pub tags: Option<Vec<String>>,
	pub status: Option<ProjectStatus>,
}

/// Partial update. Omitted fields keep their stored values.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateProjectRequest {
	pub id: i64,
	pub title: Option<String>,
	pub description: Option<String>,
	pub topic: Option<String>,
	pub tags: Option<Vec<String>>,
	pub status: Option<ProjectStatus>,
}
impl UpdateProjectRequest {
	fn is_empty(&self) -> bool {
		self.title.is_none()
			&& self.description.is_none()
			&& self.topic.is_none()
			&& self.tags.is_none()
			&& self.status.is_none()
	}
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArchiveProjectRequest {
	pub id: i64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListProjectsRequest {
	#[serde(default)]
	pub include_archived: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GetProjectRequest {
	pub id: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProjectItem {
	pub id: i64,
	pub owner_id: String,
	pub title: String,
	pub description: Option<String>,
	pub topic: Option<String>,
	pub tags: Option<Vec<String>>,
	pub status: String,
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	#[serde(with = "time::serde::rfc3339")]
	pub updated_at: OffsetDateTime,
}
impl From<Project> for ProjectItem {
	fn from(project: Project) -> Self {
		Self {
			id: project.id,
			owner_id: project.owner_id,
			title: project.title,
			description: project.description,
			topic: project.topic,
			tags: project.tags,
			status: project.status,
			created_at: project.created_at,
			updated_at: project.updated_at,
		}
	}
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProjectResponse {
	pub project: ProjectItem,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProjectListResponse {
	pub projects: Vec<ProjectItem>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProjectDetailsResponse {
	pub project: ProjectItem,
	pub sources: Vec<SourceItem>,
	pub notes: Vec<NoteItem>,
}

impl DossierService {
	pub async fn create_project(
		&self,
		ctx: &RequestContext,
		req: CreateProjectRequest,
	) -> Result<ProjectResponse> {
		let caller = require_caller(ctx)?;
		let limits = &self.cfg.limits;
		let tags = validate::normalize_tags(req.tags);

		validate::check_title("$.title", &req.title, limits)?;
		validate::check_optional_content("$.description", req.description.as_deref(), limits)?;
		validate::check_optional_title("$.topic", req.topic.as_deref(), limits)?;
		validate::check_tags("$.tags", tags.as_deref(), limits)?;

		let now = OffsetDateTime::now_utc();
		let status = req.status.unwrap_or_default();
		let project: Project = sqlx::query_as(
			"\
INSERT INTO projects (owner_id, title, description, topic, tags, status, created_at, updated_at)
VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
RETURNING *",
		)
		.bind(caller.user_id())
		.bind(req.title.trim())
		.bind(req.description.as_deref())
		.bind(req.topic.as_deref())
		.bind(tags.as_deref())
		.bind(status.as_str())
		.bind(now)
		.fetch_one(&self.db.pool)
		.await?;

		tracing::info!(project_id = project.id, owner_id = caller.user_id(), "Project created.");

		Ok(ProjectResponse { project: project.into() })
	}

	pub async fn update_project(
		&self,
		ctx: &RequestContext,
		req: UpdateProjectRequest,
	) -> Result<ProjectResponse> {
		let caller = require_caller(ctx)?;
		let limits = &self.cfg.limits;

		validate::check_id("$.id", req.id)?;

		if let Some(title) = req.title.as_deref() {
			validate::check_title("$.title", title, limits)?;
		}

		validate::check_optional_content("$.description", req.description.as_deref(), limits)?;
		validate::check_optional_title("$.topic", req.topic.as_deref(), limits)?;

		if req.is_empty() {
			let project = load_owned_project(&self.db.pool, req.id, caller.user_id()).await?;

			return Ok(ProjectResponse { project: project.into() });
		}

		let tags = validate::normalize_tags(req.tags);

		validate::check_tags("$.tags", tags.as_deref(), limits)?;

		let project: Option<Project> = sqlx::query_as(
			"\
UPDATE projects
SET
	title = COALESCE($3, title),
	description = COALESCE($4, description),
	topic = COALESCE($5, topic),
	tags = COALESCE($6, tags),
	status = COALESCE($7, status),
	updated_at = $8
WHERE id = $1 AND owner_id = $2
RETURNING *",
		)
		.bind(req.id)
		.bind(caller.user_id())
		.bind(req.title.as_deref().map(str::trim))
		.bind(req.description.as_deref())
		.bind(req.topic.as_deref())
		.bind(tags.as_deref())
		.bind(req.status.map(ProjectStatus::as_str))
		.bind(OffsetDateTime::now_utc())
		.fetch_optional(&self.db.pool)
		.await?;
		let Some(project) = project else {
			tracing::debug!(project_id = req.id, "Project update matched no owned row.");

			return Err(Error::not_found(access::PROJECT_NOT_FOUND));
		};

		tracing::info!(project_id = project.id, owner_id = caller.user_id(), "Project updated.");

		Ok(ProjectResponse { project: project.into() })
	}

	pub async fn archive_project(
		&self,
		ctx: &RequestContext,
		req: ArchiveProjectRequest,
	) -> Result<ProjectResponse> {
		let caller = require_caller(ctx)?;

		validate::check_id("$.id", req.id)?;

		let project: Option<Project> = sqlx::query_as(
			"\
UPDATE projects
SET status = $3, updated_at = $4
WHERE id = $1 AND owner_id = $2
RETURNING *",
		)
		.bind(req.id)
		.bind(caller.user_id())
		.bind(ProjectStatus::Archived.as_str())
		.bind(OffsetDateTime::now_utc())
		.fetch_optional(&self.db.pool)
		.await?;
		let Some(project) = project else {
			return Err(Error::not_found(access::PROJECT_NOT_FOUND));
		};

		tracing::info!(project_id = project.id, owner_id = caller.user_id(), "Project archived.");

		Ok(ProjectResponse { project: project.into() })
	}

	pub async fn list_projects(
		&self,
		ctx: &RequestContext,
		req: ListProjectsRequest,
	) -> Result<ProjectListResponse> {
		let caller = require_caller(ctx)?;
		let projects: Vec<Project> = sqlx::query_as(
			"\
SELECT *
FROM projects
WHERE owner_id = $1 AND ($2 OR status <> $3)
ORDER BY updated_at DESC, id DESC",
		)
		.bind(caller.user_id())
		.bind(req.include_archived)
		.bind(ProjectStatus::Archived.as_str())
		.fetch_all(&self.db.pool)
		.await?;

		Ok(ProjectListResponse { projects: projects.into_iter().map(ProjectItem::from).collect() })
	}

	pub async fn get_project_with_details(
		&self,
		ctx: &RequestContext,
		req: GetProjectRequest,
	) -> Result<ProjectDetailsResponse> {
		let caller = require_caller(ctx)?;

		validate::check_id("$.id", req.id)?;

		// One snapshot for the project and its children.
		let mut tx = self.db.pool.begin().await?;

		sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
			.execute(&mut *tx)
			.await?;

		let project = load_owned_project(&mut *tx, req.id, caller.user_id()).await?;
		let sources: Vec<Source> = sqlx::query_as(
			"\
SELECT *
FROM sources
WHERE project_id = $1
ORDER BY created_at, id",
		)
		.bind(project.id)
		.fetch_all(&mut *tx)
		.await?;
		let notes: Vec<Note> = sqlx::query_as(
			"\
SELECT *
FROM notes
WHERE project_id = $1
ORDER BY created_at, id",
		)
		.bind(project.id)
		.fetch_all(&mut *tx)
		.await?;

		tx.commit().await?;

		Ok(ProjectDetailsResponse {
			project: project.into(),
			sources: sources.into_iter().map(SourceItem::from).collect(),
			notes: notes.into_iter().map(NoteItem::from).collect(),
		})
	}
}

async fn load_owned_project<'e, E>(executor: E, project_id: i64, owner_id: &str) -> Result<Project>
where
	E: sqlx::PgExecutor<'e>,
{
	let project: Option<Project> = sqlx::query_as(
		"\
SELECT *
FROM projects
WHERE id = $1 AND owner_id = $2",
	)
	.bind(project_id)
	.bind(owner_id)
	.fetch_optional(executor)
	.await?;

	project.ok_or_else(|| Error::not_found(access::PROJECT_NOT_FOUND))
}
