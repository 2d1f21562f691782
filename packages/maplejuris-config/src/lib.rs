mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Chat, Config, EmbeddingProviderConfig, LlmProviderConfig, Postgres, Providers, Service, Storage};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.database.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.database must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}

	for (label, key) in
		[("embedding", &cfg.providers.embedding.api_key), ("llm", &cfg.providers.llm.api_key)]
	{
		if key.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} api_key must be non-empty."),
			});
		}
	}
	for (label, timeout) in [
		("providers.embedding", cfg.providers.embedding.timeout_ms),
		("providers.llm", cfg.providers.llm.timeout_ms),
	] {
		if timeout == 0 {
			return Err(Error::Validation {
				message: format!("{label}.timeout_ms must be greater than zero."),
			});
		}
	}

	if cfg.chat.top_k == 0 {
		return Err(Error::Validation {
			message: "chat.top_k must be greater than zero.".to_string(),
		});
	}
	if cfg.chat.excerpt_chars == 0 {
		return Err(Error::Validation {
			message: "chat.excerpt_chars must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg
		.chat
		.prompt_dir
		.as_deref()
		.map(|dir| dir.as_os_str().is_empty())
		.unwrap_or(false)
	{
		cfg.chat.prompt_dir = None;
	}
}
