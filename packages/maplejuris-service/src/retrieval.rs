use std::sync::Arc;

use maplejuris_config::EmbeddingProviderConfig;
use maplejuris_providers::embedding;
use maplejuris_storage::{db::Db, models::SectionHit, queries};

use crate::{BoxFuture, Error, Result, SectionRetriever};

/// Embeds a query and performs nearest-neighbor search over the embedded
/// statute sections. Read-only; holds the shared connection pool for the
/// process lifetime.
pub struct RetrievalAgent {
	db: Arc<Db>,
	cfg: EmbeddingProviderConfig,
}
impl RetrievalAgent {
	pub fn new(db: Arc<Db>, cfg: EmbeddingProviderConfig) -> Self {
		Self { db, cfg }
	}

	pub async fn process(&self, query: &str, k: u32) -> Result<Vec<SectionHit>> {
		if query.trim().is_empty() {
			return Err(Error::InvalidInput { message: "Query cannot be empty.".to_string() });
		}

		tracing::info!(k, "Searching statute sections.");

		let vector = embedding::embed_query(&self.cfg, query)
			.await
			.map_err(|err| Error::Retrieval { message: err.to_string() })?;
		let hits = queries::similar_sections(&self.db, &vector, i64::from(k)).await.map_err(
			|err| match err {
				maplejuris_storage::Error::InvalidArgument(message) =>
					Error::InvalidInput { message },
				other => Error::Retrieval { message: other.to_string() },
			},
		)?;

		tracing::info!(count = hits.len(), "Retrieved statute sections.");

		Ok(hits)
	}
}
impl SectionRetriever for RetrievalAgent {
	fn search<'a>(&'a self, query: &'a str, k: u32) -> BoxFuture<'a, Result<Vec<SectionHit>>> {
		Box::pin(self.process(query, k))
	}
}
