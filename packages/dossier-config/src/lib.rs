mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	AUTH_MODE_STATIC_KEYS, AUTH_MODE_TRUSTED_HEADER, Config, Limits, Postgres, Security,
	SecurityAuthKey, Service, Storage,
};

use std::{collections::HashSet, fs, net::SocketAddr, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	parse_at(&raw, path)
}

/// Parses an in-memory TOML document with the same normalization and validation as [`load`].
pub fn parse(raw: &str) -> Result<Config> {
	parse_at(raw, Path::new("<inline>"))
}

pub fn validate(cfg: &Config) -> Result<()> {
	let http_addr: SocketAddr = cfg.service.http_bind.parse().map_err(|_| Error::Validation {
		message: "service.http_bind must be a valid socket address.".to_string(),
	})?;

	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.storage.postgres.acquire_timeout_ms == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.acquire_timeout_ms must be greater than zero.".to_string(),
		});
	}

	for (label, value) in [
		("limits.max_title_chars", cfg.limits.max_title_chars),
		("limits.max_content_chars", cfg.limits.max_content_chars),
		("limits.max_tags", cfg.limits.max_tags),
		("limits.max_tag_chars", cfg.limits.max_tag_chars),
	] {
		if value == 0 {
			return Err(Error::Validation {
				message: format!("{label} must be greater than zero."),
			});
		}
	}

	match cfg.security.auth_mode.as_str() {
		AUTH_MODE_TRUSTED_HEADER => validate_trusted_header(cfg, &http_addr)?,
		AUTH_MODE_STATIC_KEYS => validate_static_keys(cfg)?,
		_ => {
			return Err(Error::Validation {
				message: "security.auth_mode must be one of trusted_header or static_keys."
					.to_string(),
			});
		},
	}

	Ok(())
}

fn validate_trusted_header(cfg: &Config, http_addr: &SocketAddr) -> Result<()> {
	if cfg.security.user_header.is_empty() {
		return Err(Error::Validation {
			message: "security.user_header must be non-empty when \
				security.auth_mode=trusted_header."
				.to_string(),
		});
	}
	if cfg.security.bind_localhost_only && !http_addr.ip().is_loopback() {
		return Err(Error::Validation {
			message: "service.http_bind must be a loopback address when \
				security.bind_localhost_only is true."
				.to_string(),
		});
	}

	Ok(())
}

fn validate_static_keys(cfg: &Config) -> Result<()> {
	if cfg.security.auth_keys.is_empty() {
		return Err(Error::Validation {
			message: "security.auth_keys must be non-empty when security.auth_mode=static_keys."
				.to_string(),
		});
	}

	let mut token_ids = HashSet::new();
	let mut tokens = HashSet::new();

	for key in &cfg.security.auth_keys {
		if key.token_id.trim().is_empty() {
			return Err(Error::Validation {
				message: "security.auth_keys.token_id must be non-empty.".to_string(),
			});
		}
		if key.user_id.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("security.auth_keys[{}].user_id must be non-empty.", key.token_id),
			});
		}
		if !token_ids.insert(key.token_id.as_str()) {
			return Err(Error::Validation {
				message: "token_id must be unique across security.auth_keys.".to_string(),
			});
		}
		if !tokens.insert(key.token.as_str()) {
			return Err(Error::Validation {
				message: "token must be unique across security.auth_keys.".to_string(),
			});
		}
	}

	Ok(())
}

fn parse_at(raw: &str, path: &Path) -> Result<Config> {
	let mut cfg: Config = toml::from_str(raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

fn normalize(cfg: &mut Config) {
	cfg.security.auth_mode = cfg.security.auth_mode.trim().to_string();
	cfg.security.user_header = cfg.security.user_header.trim().to_string();

	cfg.security.auth_keys.retain(|key| !key.token.trim().is_empty());
}
