pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failures raised while loading or validating the service configuration.
/// Read and parse failures keep the offending path; validation failures
/// carry the rule that was broken.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Unable to read config file at {path:?}.")]
	ReadConfig { path: std::path::PathBuf, source: std::io::Error },
	#[error("Config file at {path:?} is not valid TOML.")]
	ParseConfig { path: std::path::PathBuf, source: toml::de::Error },
	#[error("{message}")]
	Validation { message: String },
}
