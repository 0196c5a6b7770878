use crate::{Error, Result};

/// Per-request facts handed to every action. Built by the transport layer from whatever the
/// identity provider attached to the request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestContext {
	user_id: Option<String>,
}
impl RequestContext {
	pub fn anonymous() -> Self {
		Self::default()
	}

	pub fn for_user(user_id: impl Into<String>) -> Self {
		Self { user_id: Some(user_id.into()) }
	}

	pub fn user_id(&self) -> Option<&str> {
		self.user_id.as_deref()
	}
}

/// An authenticated caller. Only [`require_caller`] produces one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Caller {
	user_id: String,
}
impl Caller {
	pub fn user_id(&self) -> &str {
		&self.user_id
	}
}

pub fn require_caller(ctx: &RequestContext) -> Result<Caller> {
	let Some(user_id) = ctx.user_id().map(str::trim).filter(|user_id| !user_id.is_empty()) else {
		return Err(Error::Unauthorized);
	};

	Ok(Caller { user_id: user_id.to_string() })
}
