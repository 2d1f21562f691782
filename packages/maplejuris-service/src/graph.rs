use std::sync::Arc;

use serde::Serialize;

use maplejuris_storage::models::SectionHit;

use crate::{Error, QuestionAnswerer, Result, SectionRetriever, routing};

/// The fixed, user-safe message written by the error-handling node. It
/// deliberately replaces whatever detail the failing node recorded.
pub const GRAPH_ERROR_MESSAGE: &str = "Error executing the graph";

/// State carried between graph nodes. Replaced wholesale at each step, never
/// mutated in place. Every terminal state keeps the original question and
/// populates exactly one of `answer` and `error`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatGraphState {
	pub question: String,
	pub needs_retrieval: bool,
	pub retrieved_sections: Vec<SectionHit>,
	pub answer: Option<String>,
	pub error: Option<String>,
}
impl ChatGraphState {
	fn start(question: &str) -> Self {
		Self {
			question: question.to_string(),
			needs_retrieval: false,
			retrieved_sections: Vec::new(),
			answer: None,
			error: None,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Node {
	RouteQuestion,
	RetrieveSections,
	ProcessChatAgent,
	HandleError,
	End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RetrievalRoute {
	Retrieve,
	DirectAnswer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChatRoute {
	Pass,
	Fail,
}

/// Sequences routing, optional retrieval, answer generation, and error
/// handling for one question. Node failures are captured into state rather
/// than raised, so every run ends in a valid terminal state.
pub struct ChatGraph {
	retriever: Arc<dyn SectionRetriever>,
	answerer: Arc<dyn QuestionAnswerer>,
	top_k: u32,
	excerpt_chars: usize,
}
impl ChatGraph {
	pub fn new(
		retriever: Arc<dyn SectionRetriever>,
		answerer: Arc<dyn QuestionAnswerer>,
		chat: &maplejuris_config::Chat,
	) -> Self {
		Self { retriever, answerer, top_k: chat.top_k, excerpt_chars: chat.excerpt_chars }
	}

	pub async fn run(&self, question: &str) -> Result<ChatGraphState> {
		if question.trim().is_empty() {
			return Err(Error::InvalidInput { message: "Question cannot be empty.".to_string() });
		}

		let mut state = ChatGraphState::start(question);
		let mut node = Node::RouteQuestion;

		loop {
			match node {
				Node::RouteQuestion => {
					let (route, next) = self.route_question(state);

					state = next;
					node = match route {
						RetrievalRoute::Retrieve => Node::RetrieveSections,
						RetrievalRoute::DirectAnswer => Node::ProcessChatAgent,
					};
				},
				Node::RetrieveSections => {
					state = self.retrieve_sections(state).await;
					node = Node::ProcessChatAgent;
				},
				Node::ProcessChatAgent => {
					state = self.process_chat_agent(state).await;
					node = match Self::chat_route(&state) {
						ChatRoute::Pass => Node::End,
						ChatRoute::Fail => Node::HandleError,
					};
				},
				Node::HandleError => {
					state = Self::handle_error(state);
					node = Node::End;
				},
				Node::End => break,
			}
		}

		Ok(state)
	}

	fn route_question(&self, state: ChatGraphState) -> (RetrievalRoute, ChatGraphState) {
		let needs_retrieval = routing::needs_retrieval(&state.question);
		let route = if needs_retrieval {
			RetrievalRoute::Retrieve
		} else {
			RetrievalRoute::DirectAnswer
		};

		tracing::info!(?route, "Routed question.");

		(route, ChatGraphState { needs_retrieval, retrieved_sections: Vec::new(), ..state })
	}

	async fn retrieve_sections(&self, state: ChatGraphState) -> ChatGraphState {
		match self.retriever.search(&state.question, self.top_k).await {
			Ok(sections) => {
				ChatGraphState { retrieved_sections: sections, ..state }
			},
			Err(err) => {
				// Retrieval failure degrades to a no-context answer instead
				// of halting the run.
				tracing::error!(%err, "Retrieval failed; continuing without context.");

				ChatGraphState {
					retrieved_sections: Vec::new(),
					error: Some(err.to_string()),
					..state
				}
			},
		}
	}

	async fn process_chat_agent(&self, state: ChatGraphState) -> ChatGraphState {
		let prompt = if state.retrieved_sections.is_empty() {
			state.question.clone()
		} else {
			augment_question(&state.question, &state.retrieved_sections, self.excerpt_chars)
		};

		match self.answerer.answer(&prompt).await {
			Ok(response) =>
				ChatGraphState { answer: Some(response.answer), error: None, ..state },
			Err(err) => {
				tracing::error!(%err, "Chat agent failed.");

				ChatGraphState { answer: None, error: Some(err.to_string()), ..state }
			},
		}
	}

	fn chat_route(state: &ChatGraphState) -> ChatRoute {
		match state.answer.as_deref() {
			Some(answer) if !answer.is_empty() => ChatRoute::Pass,
			_ => ChatRoute::Fail,
		}
	}

	fn handle_error(state: ChatGraphState) -> ChatGraphState {
		tracing::error!(question = %state.question, "Error handling triggered.");

		ChatGraphState {
			retrieved_sections: Vec::new(),
			answer: None,
			error: Some(GRAPH_ERROR_MESSAGE.to_string()),
			..state
		}
	}
}

/// Renders the retrieved sections into the question text handed to the chat
/// agent. The state keeps the original question untouched.
pub fn augment_question(
	question: &str,
	sections: &[SectionHit],
	excerpt_chars: usize,
) -> String {
	let mut out = String::from(question);

	out.push_str("\n\nRelevant legal sections:\n");
	for (index, hit) in sections.iter().enumerate() {
		out.push_str(&format!(
			"\n{}. {}, {}\n{}\n",
			index + 1,
			hit.statute_title,
			hit.label,
			excerpt(&hit.text, excerpt_chars)
		));
	}

	out
}

fn excerpt(text: &str, max_chars: usize) -> String {
	if text.chars().count() <= max_chars {
		return text.to_string();
	}

	let mut truncated: String = text.chars().take(max_chars).collect();

	truncated.push_str("...");

	truncated
}
