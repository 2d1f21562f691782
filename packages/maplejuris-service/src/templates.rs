use std::{
	io::ErrorKind,
	path::{Path, PathBuf},
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Prompt template not found at {path:?}.")]
	NotFound { path: PathBuf },
	#[error("Permission denied reading prompt template at {path:?}.")]
	PermissionDenied { path: PathBuf },
	#[error("Failed to read prompt template at {path:?}.")]
	Io { path: PathBuf, source: std::io::Error },
}

/// Reads named prompt assets from a fixed directory. Defaults to the
/// `prompts/` directory shipped with this crate.
pub struct TemplateLoader {
	dir: PathBuf,
}
impl TemplateLoader {
	pub fn new(dir: impl Into<PathBuf>) -> Self {
		Self { dir: dir.into() }
	}

	pub fn dir(&self) -> &Path {
		&self.dir
	}

	pub fn load(&self, name: &str) -> Result<String, Error> {
		let path = self.dir.join(name);

		std::fs::read_to_string(&path).map_err(|err| match err.kind() {
			ErrorKind::NotFound => Error::NotFound { path: path.clone() },
			ErrorKind::PermissionDenied => Error::PermissionDenied { path: path.clone() },
			_ => Error::Io { path: path.clone(), source: err },
		})
	}
}
impl Default for TemplateLoader {
	fn default() -> Self {
		Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("prompts"))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn loads_shipped_templates() {
		let loader = TemplateLoader::default();

		let system = loader.load("chat_system.md").expect("System template must load.");
		let human = loader.load("chat_human.md").expect("Human template must load.");

		assert!(!system.trim().is_empty());
		assert!(human.contains("{question}"));
		assert!(human.contains("{format_instructions}"));
	}

	#[test]
	fn missing_template_is_a_distinct_error() {
		let loader = TemplateLoader::default();

		let err = loader.load("no_such_template.md").expect_err("Load must fail.");

		assert!(matches!(err, Error::NotFound { .. }));
	}
}
