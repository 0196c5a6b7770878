pub mod auth;
pub mod jobs;
pub mod notes;
pub mod projects;
pub mod sources;

mod access;
mod error;

pub use auth::{Caller, RequestContext, require_caller};
pub use error::{Error, Result};
pub use jobs::{
	CreateJobRequest, JobItem, JobListResponse, JobResponse, ListJobsRequest, UpdateJobRequest,
};
pub use notes::{DeleteNoteRequest, NoteItem, NoteResponse, SaveNoteRequest};
pub use projects::{
	ArchiveProjectRequest, CreateProjectRequest, GetProjectRequest, ListProjectsRequest,
	ProjectDetailsResponse, ProjectItem, ProjectListResponse, ProjectResponse,
	UpdateProjectRequest,
};
pub use sources::{DeleteSourceRequest, SaveSourceRequest, SourceItem, SourceResponse};

use dossier_config::Config;
use dossier_storage::db::Db;

/// Entry point for every action. Each call takes the caller's [`RequestContext`] explicitly and
/// resolves the caller before touching the store.
pub struct DossierService {
	pub cfg: Config,
	pub db: Db,
}
impl DossierService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self { cfg, db }
	}
}
