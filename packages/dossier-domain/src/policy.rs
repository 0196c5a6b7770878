use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessDecision {
	Allow,
	Deny,
}
impl AccessDecision {
	pub fn is_allowed(self) -> bool {
		matches!(self, Self::Allow)
	}
}

/// The ownership facts of a job, gathered together with the job row.
#[derive(Debug, Clone, Copy)]
pub struct JobAccess<'a> {
	pub project_id: Option<i64>,
	/// Owner of the linked project. `None` when the job has no project or the project row is gone.
	pub project_owner_id: Option<&'a str>,
	pub created_by: &'a str,
}

/// Decides whether `caller_id` may modify a job.
///
/// A job linked to a project belongs to the project's owner, regardless of who created it. A job
/// without a project belongs to its creator. Listing never returns project-less jobs, so their
/// creator only sees them through create and update responses.
pub fn job_write_decision(job: &JobAccess<'_>, caller_id: &str) -> AccessDecision {
	let allowed = match job.project_id {
		Some(_) => job.project_owner_id == Some(caller_id),
		None => job.created_by == caller_id,
	};

	if allowed { AccessDecision::Allow } else { AccessDecision::Deny }
}
