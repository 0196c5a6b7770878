use serde::Deserialize;

pub const AUTH_MODE_TRUSTED_HEADER: &str = "trusted_header";
pub const AUTH_MODE_STATIC_KEYS: &str = "static_keys";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub limits: Limits,
	pub security: Security,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
	#[serde(default = "default_acquire_timeout_ms")]
	pub acquire_timeout_ms: u64,
}

/// Upper bounds applied to user-supplied text before anything is written.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Limits {
	pub max_title_chars: u32,
	pub max_content_chars: u32,
	pub max_tags: u32,
	pub max_tag_chars: u32,
}
impl Default for Limits {
	fn default() -> Self {
		Self { max_title_chars: 300, max_content_chars: 100_000, max_tags: 32, max_tag_chars: 64 }
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct Security {
	pub bind_localhost_only: bool,
	/// Either "trusted_header" or "static_keys".
	pub auth_mode: String,
	/// Header carrying the caller id when an upstream identity proxy fronts the service.
	#[serde(default = "default_user_header")]
	pub user_header: String,
	#[serde(default)]
	pub auth_keys: Vec<SecurityAuthKey>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SecurityAuthKey {
	pub token_id: String,
	pub token: String,
	pub user_id: String,
}

fn default_acquire_timeout_ms() -> u64 {
	5_000
}

fn default_user_header() -> String {
	"X-Dossier-User-Id".to_string()
}
