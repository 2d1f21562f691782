use serde_json::Value;

use maplejuris_config::LlmProviderConfig;

use crate::{
	BoxFuture, Error, QuestionAnswerer, Result,
	schema::{self, ChatAgentResponse},
	templates::TemplateLoader,
};

pub const SYSTEM_TEMPLATE: &str = "chat_system.md";
pub const HUMAN_TEMPLATE: &str = "chat_human.md";

/// Combines the fixed prompt templates with the format instructions, sends
/// the rendered prompt to the configured language model, and validates the
/// reply against [`ChatAgentResponse`].
pub struct ChatAgent {
	cfg: LlmProviderConfig,
	system_prompt: String,
	human_template: String,
}
impl ChatAgent {
	/// Loads both prompt templates eagerly; a missing or unreadable template
	/// means the agent cannot be built.
	pub fn new(loader: &TemplateLoader, cfg: LlmProviderConfig) -> Result<Self> {
		let system_prompt = loader.load(SYSTEM_TEMPLATE)?;
		let human_template = loader.load(HUMAN_TEMPLATE)?;

		tracing::info!(dir = ?loader.dir(), "Loaded chat prompt templates.");

		Ok(Self { cfg, system_prompt, human_template })
	}

	pub fn render_messages(&self, question: &str) -> Vec<Value> {
		let human = self
			.human_template
			.replace("{question}", question)
			.replace("{format_instructions}", schema::FORMAT_INSTRUCTIONS);

		vec![
			serde_json::json!({ "role": "system", "content": self.system_prompt }),
			serde_json::json!({ "role": "user", "content": human }),
		]
	}

	pub async fn process(&self, question: &str) -> Result<ChatAgentResponse> {
		if question.trim().is_empty() {
			return Err(Error::InvalidInput { message: "Question cannot be empty.".to_string() });
		}

		let messages = self.render_messages(question);
		let raw = maplejuris_providers::chat::complete(&self.cfg, &messages)
			.await
			.map_err(|err| Error::Generation { message: err.to_string() })?;

		schema::parse_response(&raw)
	}
}
impl QuestionAnswerer for ChatAgent {
	fn answer<'a>(&'a self, question: &'a str) -> BoxFuture<'a, Result<ChatAgentResponse>> {
		Box::pin(self.process(question))
	}
}
