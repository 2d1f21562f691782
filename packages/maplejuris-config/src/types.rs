use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	#[serde(default)]
	pub chat: Chat,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	#[serde(default = "default_pg_host")]
	pub host: String,
	#[serde(default = "default_pg_port")]
	pub port: u16,
	#[serde(default = "default_pg_database")]
	pub database: String,
	#[serde(default)]
	pub user: String,
	#[serde(default)]
	pub password: String,
	#[serde(default = "default_pool_max_conns")]
	pub pool_max_conns: u32,
}
impl Postgres {
	/// Renders a connection URL. An unset user selects passwordless
	/// authentication as `postgres:///<database>`; note that sqlx resolves
	/// the empty host to TCP localhost, so true unix-socket peer auth needs
	/// an explicit socket path, e.g.
	/// `database = "maplejuris?host=/var/run/postgresql"`.
	pub fn dsn(&self) -> String {
		if self.user.is_empty() {
			return format!("postgres:///{}", self.database);
		}
		if self.password.is_empty() {
			return format!("postgres://{}@{}:{}/{}", self.user, self.host, self.port, self.database);
		}

		format!(
			"postgres://{}:{}@{}:{}/{}",
			self.user, self.password, self.host, self.port, self.database
		)
	}
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	pub llm: LlmProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub api_base: String,
	pub api_key: String,
	#[serde(default = "default_embedding_path")]
	pub path: String,
	#[serde(default = "default_embedding_model")]
	pub model: String,
	#[serde(default = "default_embedding_dimensions")]
	pub dimensions: u32,
	#[serde(default = "default_embedding_timeout_ms")]
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct LlmProviderConfig {
	pub api_base: String,
	pub api_key: String,
	#[serde(default = "default_llm_path")]
	pub path: String,
	#[serde(default = "default_llm_model")]
	pub model: String,
	#[serde(default)]
	pub temperature: f32,
	#[serde(default = "default_llm_timeout_ms")]
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
	#[serde(default = "default_top_k")]
	pub top_k: u32,
	#[serde(default = "default_excerpt_chars")]
	pub excerpt_chars: usize,
	/// Optional override for the prompt template directory.
	#[serde(default)]
	pub prompt_dir: Option<PathBuf>,
}
impl Default for Chat {
	fn default() -> Self {
		Self {
			top_k: default_top_k(),
			excerpt_chars: default_excerpt_chars(),
			prompt_dir: None,
		}
	}
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_pg_host() -> String {
	"localhost".to_string()
}

fn default_pg_port() -> u16 {
	5432
}

fn default_pg_database() -> String {
	"maplejuris".to_string()
}

fn default_pool_max_conns() -> u32 {
	5
}

fn default_embedding_path() -> String {
	"/embeddings".to_string()
}

fn default_embedding_model() -> String {
	"text-embedding-3-small".to_string()
}

fn default_embedding_dimensions() -> u32 {
	1_536
}

fn default_embedding_timeout_ms() -> u64 {
	30_000
}

fn default_llm_path() -> String {
	"/chat/completions".to_string()
}

fn default_llm_model() -> String {
	"gpt-4o-mini".to_string()
}

fn default_llm_timeout_ms() -> u64 {
	60_000
}

fn default_top_k() -> u32 {
	5
}

fn default_excerpt_chars() -> usize {
	300
}
