//! Closed value sets stored in text columns.
//!
//! Requests carry these as typed enums so an unknown value is rejected while the body is being
//! decoded, before any handler runs.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
	#[default]
	Active,
	Archived,
}
impl ProjectStatus {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Active => "active",
			Self::Archived => "archived",
		}
	}
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
	#[default]
	Web,
	Pdf,
	Book,
	Article,
	Video,
	Other,
}
impl SourceType {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Web => "web",
			Self::Pdf => "pdf",
			Self::Book => "book",
			Self::Article => "article",
			Self::Video => "video",
			Self::Other => "other",
		}
	}
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteType {
	#[default]
	Summary,
	Quote,
	Idea,
	Question,
	Outline,
}
impl NoteType {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Summary => "summary",
			Self::Quote => "quote",
			Self::Idea => "idea",
			Self::Question => "question",
			Self::Outline => "outline",
		}
	}
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
	#[default]
	Summary,
	Outline,
	Citation,
	Question,
}
impl JobType {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Summary => "summary",
			Self::Outline => "outline",
			Self::Citation => "citation",
			Self::Question => "question",
		}
	}
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
	#[default]
	Pending,
	Completed,
	Failed,
}
impl JobStatus {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Pending => "pending",
			Self::Completed => "completed",
			Self::Failed => "failed",
		}
	}
}
