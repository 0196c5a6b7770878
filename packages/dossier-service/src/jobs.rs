use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use crate::{DossierService, Error, RequestContext, Result, access, require_caller};
use dossier_domain::{
	kinds::{JobStatus, JobType},
	policy::{self, JobAccess},
	validate,
};
use dossier_storage::models::Job;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateJobRequest {
	pub project_id: Option<i64>,
	pub job_type: Option<JobType>,
	pub input: Option<Value>,
	pub output: Option<Value>,
	pub status: Option<JobStatus>,
}

/// Only `output` and `status` are writable after creation.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateJobRequest {
	pub id: i64,
	pub output: Option<Value>,
	pub status: Option<JobStatus>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListJobsRequest {
	pub project_id: Option<i64>,
	pub status: Option<JobStatus>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JobItem {
	pub id: i64,
	pub project_id: Option<i64>,
	pub job_type: String,
	pub input: Option<Value>,
	pub output: Option<Value>,
	pub status: String,
	pub created_by: String,
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
}
impl From<Job> for JobItem {
	fn from(job: Job) -> Self {
		Self {
			id: job.id,
			project_id: job.project_id,
			job_type: job.job_type,
			input: job.input,
			output: job.output,
			status: job.status,
			created_by: job.created_by,
			created_at: job.created_at,
		}
	}
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JobResponse {
	pub job: JobItem,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JobListResponse {
	pub jobs: Vec<JobItem>,
}

#[derive(sqlx::FromRow)]
struct LockedJob {
	#[sqlx(flatten)]
	job: Job,
	project_owner_id: Option<String>,
}

impl DossierService {
	pub async fn create_job(
		&self,
		ctx: &RequestContext,
		req: CreateJobRequest,
	) -> Result<JobResponse> {
		let caller = require_caller(ctx)?;

		if let Some(project_id) = req.project_id {
			validate::check_id("$.project_id", project_id)?;
		}

		validate::check_json("$.input", req.input.as_ref())?;
		validate::check_json("$.output", req.output.as_ref())?;

		let job_type = req.job_type.unwrap_or_default();
		let status = req.status.unwrap_or_default();
		let mut tx = self.db.pool.begin().await?;

		if let Some(project_id) = req.project_id {
			access::lock_owned_project(&mut tx, project_id, caller.user_id()).await?;
		}

		let job: Job = sqlx::query_as(
			"\
INSERT INTO jobs (project_id, job_type, input, output, status, created_by, created_at)
VALUES ($1, $2, $3, $4, $5, $6, $7)
RETURNING *",
		)
		.bind(req.project_id)
		.bind(job_type.as_str())
		.bind(req.input.as_ref())
		.bind(req.output.as_ref())
		.bind(status.as_str())
		.bind(caller.user_id())
		.bind(OffsetDateTime::now_utc())
		.fetch_one(&mut *tx)
		.await?;

		tx.commit().await?;

		tracing::info!(
			job_id = job.id,
			project_id = ?job.project_id,
			created_by = caller.user_id(),
			job_type = job.job_type.as_str(),
			"Job created."
		);

		Ok(JobResponse { job: job.into() })
	}

	pub async fn update_job(
		&self,
		ctx: &RequestContext,
		req: UpdateJobRequest,
	) -> Result<JobResponse> {
		let caller = require_caller(ctx)?;

		validate::check_id("$.id", req.id)?;
		validate::check_json("$.output", req.output.as_ref())?;

		let mut tx = self.db.pool.begin().await?;
		let locked: Option<LockedJob> = sqlx::query_as(
			"\
SELECT j.*, p.owner_id AS project_owner_id
FROM jobs j
LEFT JOIN projects p ON p.id = j.project_id
WHERE j.id = $1
FOR UPDATE OF j",
		)
		.bind(req.id)
		.fetch_optional(&mut *tx)
		.await?;
		let Some(LockedJob { job, project_owner_id }) = locked else {
			return Err(Error::not_found(access::JOB_NOT_FOUND));
		};
		let job_access = JobAccess {
			project_id: job.project_id,
			project_owner_id: project_owner_id.as_deref(),
			created_by: &job.created_by,
		};

		if !policy::job_write_decision(&job_access, caller.user_id()).is_allowed() {
			tracing::debug!(job_id = job.id, "Job write denied for caller.");

			return Err(Error::not_found(access::JOB_NOT_FOUND));
		}
		if req.output.is_none() && req.status.is_none() {
			tx.commit().await?;

			return Ok(JobResponse { job: job.into() });
		}

		let job: Job = sqlx::query_as(
			"\
UPDATE jobs
SET output = COALESCE($2, output), status = COALESCE($3, status)
WHERE id = $1
RETURNING *",
		)
		.bind(job.id)
		.bind(req.output.as_ref())
		.bind(req.status.map(JobStatus::as_str))
		.fetch_one(&mut *tx)
		.await?;

		tx.commit().await?;

		tracing::info!(
			job_id = job.id,
			caller_id = caller.user_id(),
			status = job.status.as_str(),
			"Job updated."
		);

		Ok(JobResponse { job: job.into() })
	}

	pub async fn list_jobs(
		&self,
		ctx: &RequestContext,
		req: ListJobsRequest,
	) -> Result<JobListResponse> {
		let caller = require_caller(ctx)?;

		if let Some(project_id) = req.project_id {
			validate::check_id("$.project_id", project_id)?;

			let owned: Option<i64> =
				sqlx::query_scalar("SELECT id FROM projects WHERE id = $1 AND owner_id = $2")
					.bind(project_id)
					.bind(caller.user_id())
					.fetch_optional(&self.db.pool)
					.await?;

			if owned.is_none() {
				return Err(Error::not_found(access::PROJECT_NOT_FOUND));
			}
		}

		let mut builder = sqlx::QueryBuilder::new(
			"SELECT j.* FROM jobs j JOIN projects p ON p.id = j.project_id WHERE p.owner_id = ",
		);

		builder.push_bind(caller.user_id());

		if let Some(project_id) = req.project_id {
			builder.push(" AND j.project_id = ");
			builder.push_bind(project_id);
		}
		if let Some(status) = req.status {
			builder.push(" AND j.status = ");
			builder.push_bind(status.as_str());
		}

		builder.push(" ORDER BY j.created_at DESC, j.id DESC");

		let jobs: Vec<Job> = builder.build_query_as().fetch_all(&self.db.pool).await?;

		Ok(JobListResponse { jobs: jobs.into_iter().map(JobItem::from).collect() })
	}
}
