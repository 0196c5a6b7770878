use serde_json::Value;
use url::Url;

use dossier_config::Limits;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectCode {
	Empty,
	TooLong,
	TooManyTags,
	InvalidUrl,
	InvalidId,
	ContainsNul,
}

/// A field that failed validation, addressed by its JSON path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
	pub field: String,
	pub code: RejectCode,
}
impl Rejection {
	fn new(field: impl Into<String>, code: RejectCode) -> Self {
		Self { field: field.into(), code }
	}

	pub fn message(&self) -> String {
		let field = self.field.as_str();

		match self.code {
			RejectCode::Empty => format!("{field} must be non-empty."),
			RejectCode::TooLong => format!("{field} is too long."),
			RejectCode::TooManyTags => format!("{field} has too many entries."),
			RejectCode::InvalidUrl => format!("{field} must be an absolute http or https URL."),
			RejectCode::InvalidId => format!("{field} must be a positive integer."),
			RejectCode::ContainsNul => format!("{field} must not contain NUL characters."),
		}
	}
}

pub fn check_id(field: &str, id: i64) -> Result<(), Rejection> {
	if id <= 0 {
		return Err(Rejection::new(field, RejectCode::InvalidId));
	}

	Ok(())
}

/// Titles and headings: required, single-line sized.
pub fn check_title(field: &str, value: &str, limits: &Limits) -> Result<(), Rejection> {
	check_required(field, value, limits.max_title_chars)
}

/// Note bodies: required, document sized.
pub fn check_content(field: &str, value: &str, limits: &Limits) -> Result<(), Rejection> {
	check_required(field, value, limits.max_content_chars)
}

pub fn check_optional_title(
	field: &str,
	value: Option<&str>,
	limits: &Limits,
) -> Result<(), Rejection> {
	check_optional(field, value, limits.max_title_chars)
}

pub fn check_optional_content(
	field: &str,
	value: Option<&str>,
	limits: &Limits,
) -> Result<(), Rejection> {
	check_optional(field, value, limits.max_content_chars)
}

pub fn check_tags(field: &str, tags: Option<&[String]>, limits: &Limits) -> Result<(), Rejection> {
	let Some(tags) = tags else {
		return Ok(());
	};

	if tags.len() as u64 > u64::from(limits.max_tags) {
		return Err(Rejection::new(field, RejectCode::TooManyTags));
	}

	for (idx, tag) in tags.iter().enumerate() {
		check_required(&format!("{field}[{idx}]"), tag, limits.max_tag_chars)?;
	}

	Ok(())
}

/// Accepts absolute `http`/`https` URLs with a host. Scheme case does not matter.
pub fn check_url(field: &str, url: Option<&str>, limits: &Limits) -> Result<(), Rejection> {
	let Some(url) = url else {
		return Ok(());
	};

	check_text(field, url, limits.max_content_chars)?;

	let parsed = Url::parse(url).map_err(|_| Rejection::new(field, RejectCode::InvalidUrl))?;

	if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
		return Err(Rejection::new(field, RejectCode::InvalidUrl));
	}

	Ok(())
}

/// JSON documents are stored as `jsonb`, which cannot hold NUL in strings or keys.
pub fn check_json(field: &str, value: Option<&Value>) -> Result<(), Rejection> {
	match value {
		Some(value) if json_has_nul(value) => Err(Rejection::new(field, RejectCode::ContainsNul)),
		_ => Ok(()),
	}
}

/// Trims surrounding whitespace from every tag, keeping order.
pub fn normalize_tags(tags: Option<Vec<String>>) -> Option<Vec<String>> {
	tags.map(|tags| tags.into_iter().map(|tag| tag.trim().to_string()).collect())
}

/// A blank URL counts as absent.
pub fn normalize_url(url: Option<String>) -> Option<String> {
	url.map(|url| url.trim().to_string()).filter(|url| !url.is_empty())
}

fn check_required(field: &str, value: &str, max_chars: u32) -> Result<(), Rejection> {
	if value.trim().is_empty() {
		return Err(Rejection::new(field, RejectCode::Empty));
	}

	check_text(field, value, max_chars)
}

fn check_optional(field: &str, value: Option<&str>, max_chars: u32) -> Result<(), Rejection> {
	match value {
		Some(value) => check_text(field, value, max_chars),
		None => Ok(()),
	}
}

fn check_text(field: &str, value: &str, max_chars: u32) -> Result<(), Rejection> {
	if value.contains('\0') {
		return Err(Rejection::new(field, RejectCode::ContainsNul));
	}
	if value.chars().count() as u64 > u64::from(max_chars) {
		return Err(Rejection::new(field, RejectCode::TooLong));
	}

	Ok(())
}

fn json_has_nul(value: &Value) -> bool {
	match value {
		Value::String(text) => text.contains('\0'),
		Value::Array(items) => items.iter().any(json_has_nul),
		Value::Object(map) =>
			map.iter().any(|(key, value)| key.contains('\0') || json_has_nul(value)),
		Value::Null | Value::Bool(_) | Value::Number(_) => false,
	}
}
