use serde_json::Value;
use time::OffsetDateTime;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Project {
	pub id: i64,
	pub owner_id: String,
	pub title: String,
	pub description: Option<String>,
	pub topic: Option<String>,
	pub tags: Option<Vec<String>>,
	pub status: String,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Source {
	pub id: i64,
	pub project_id: i64,
	pub r#type: String,
	pub title: String,
	pub url: Option<String>,
	pub citation_text: Option<String>,
	pub citation_meta: Option<Value>,
	pub snippet: Option<String>,
	pub metadata: Option<Value>,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Note {
	pub id: i64,
	pub project_id: i64,
	pub source_id: Option<i64>,
	pub r#type: String,
	pub content: String,
	pub heading: Option<String>,
	pub tags: Option<Vec<String>>,
	pub location: Option<Value>,
	pub ai_meta: Option<Value>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Job {
	pub id: i64,
	pub project_id: Option<i64>,
	pub job_type: String,
	pub input: Option<Value>,
	pub output: Option<Value>,
	pub status: String,
	pub created_by: String,
	pub created_at: OffsetDateTime,
}
