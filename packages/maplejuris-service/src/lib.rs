pub mod chat;
pub mod graph;
pub mod retrieval;
pub mod routing;
pub mod schema;
pub mod templates;

use std::{future::Future, pin::Pin};

pub use chat::ChatAgent;
pub use graph::{ChatGraph, ChatGraphState, GRAPH_ERROR_MESSAGE};
pub use maplejuris_storage::models::SectionHit;
pub use retrieval::RetrievalAgent;
pub use schema::{ChatAgentResponse, FORMAT_INSTRUCTIONS};
pub use templates::TemplateLoader;

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid input: {message}")]
	InvalidInput { message: String },
	#[error(transparent)]
	Template(#[from] templates::Error),
	#[error("Retrieval failed: {message}")]
	Retrieval { message: String },
	#[error("Generation failed: {message}")]
	Generation { message: String },
}

/// Similarity search over the statute corpus, injected into the graph so
/// tests can substitute a stand-in.
pub trait SectionRetriever
where
	Self: Send + Sync,
{
	fn search<'a>(&'a self, query: &'a str, k: u32) -> BoxFuture<'a, Result<Vec<SectionHit>>>;
}

/// Answer generation against a language model, injected into the graph so
/// tests can substitute a stand-in.
pub trait QuestionAnswerer
where
	Self: Send + Sync,
{
	fn answer<'a>(&'a self, question: &'a str) -> BoxFuture<'a, Result<ChatAgentResponse>>;
}
