//! Row locks that pin a parent record for the rest of a write transaction.
//!
//! Each helper both proves visibility to the caller and holds a `FOR SHARE` lock, so the
//! checked row cannot change or disappear before the guarded write commits.

use sqlx::{Postgres, Transaction};

use crate::{Error, Result};

pub(crate) const PROJECT_NOT_FOUND: &str = "Project not found.";
pub(crate) const SOURCE_NOT_FOUND: &str = "Source not found.";
pub(crate) const NOTE_NOT_FOUND: &str = "Note not found.";
pub(crate) const JOB_NOT_FOUND: &str = "Job not found.";

pub(crate) async fn lock_owned_project(
	tx: &mut Transaction<'_, Postgres>,
	project_id: i64,
	owner_id: &str,
) -> Result<()> {
	let found: Option<i64> = sqlx::query_scalar(
		"\
SELECT id
FROM projects
WHERE id = $1 AND owner_id = $2
FOR SHARE",
	)
	.bind(project_id)
	.bind(owner_id)
	.fetch_optional(&mut **tx)
	.await?;

	if found.is_none() {
		tracing::debug!(project_id, "Project is missing or owned by another user.");

		return Err(Error::not_found(PROJECT_NOT_FOUND));
	}

	Ok(())
}

pub(crate) async fn lock_project_source(
	tx: &mut Transaction<'_, Postgres>,
	source_id: i64,
	project_id: i64,
) -> Result<()> {
	let found: Option<i64> = sqlx::query_scalar(
		"\
SELECT id
FROM sources
WHERE id = $1 AND project_id = $2
FOR SHARE",
	)
	.bind(source_id)
	.bind(project_id)
	.fetch_optional(&mut **tx)
	.await?;

	if found.is_none() {
		tracing::debug!(source_id, project_id, "Source is missing or belongs to another project.");

		return Err(Error::not_found(SOURCE_NOT_FOUND));
	}

	Ok(())
}
