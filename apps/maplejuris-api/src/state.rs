use std::sync::Arc;

use maplejuris_service::{ChatAgent, ChatGraph, RetrievalAgent, TemplateLoader};
use maplejuris_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub graph: Arc<ChatGraph>,
}
impl AppState {
	pub async fn new(config: maplejuris_config::Config) -> color_eyre::Result<Self> {
		let db = Arc::new(Db::connect(&config.storage.postgres).await?);
		let loader = match config.chat.prompt_dir.as_deref() {
			Some(dir) => TemplateLoader::new(dir),
			None => TemplateLoader::default(),
		};
		// A missing or unreadable prompt template fails startup here.
		let chat_agent = ChatAgent::new(&loader, config.providers.llm)?;
		let retrieval_agent = RetrievalAgent::new(db, config.providers.embedding);
		let graph =
			ChatGraph::new(Arc::new(retrieval_agent), Arc::new(chat_agent), &config.chat);

		Ok(Self { graph: Arc::new(graph) })
	}
}
