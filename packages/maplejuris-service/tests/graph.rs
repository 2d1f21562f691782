use std::sync::{
	Arc, Mutex,
	atomic::{AtomicUsize, Ordering},
};

use maplejuris_config::Chat;
use maplejuris_service::{
	BoxFuture, ChatAgentResponse, ChatGraph, Error, GRAPH_ERROR_MESSAGE, QuestionAnswerer,
	Result, SectionHit, SectionRetriever,
};

fn section_hit(label: &str, similarity: f64, text: &str) -> SectionHit {
	SectionHit {
		id: label.to_string(),
		label: label.to_string(),
		text: text.to_string(),
		position: 1,
		statute_title: "Criminal Code".to_string(),
		statute_long_title: "An Act respecting the Criminal Law".to_string(),
		similarity,
	}
}

struct StubRetriever {
	hits: Vec<SectionHit>,
	calls: Arc<AtomicUsize>,
}
impl StubRetriever {
	fn new(hits: Vec<SectionHit>) -> Self {
		Self { hits, calls: Arc::new(AtomicUsize::new(0)) }
	}

	fn call_count(&self) -> Arc<AtomicUsize> {
		self.calls.clone()
	}
}
impl SectionRetriever for StubRetriever {
	fn search<'a>(&'a self, _query: &'a str, k: u32) -> BoxFuture<'a, Result<Vec<SectionHit>>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		let hits = self.hits.iter().take(k as usize).cloned().collect();

		Box::pin(async move { Ok(hits) })
	}
}

struct FailingRetriever;
impl SectionRetriever for FailingRetriever {
	fn search<'a>(&'a self, _query: &'a str, _k: u32) -> BoxFuture<'a, Result<Vec<SectionHit>>> {
		Box::pin(async move {
			Err(Error::Retrieval { message: "connection refused".to_string() })
		})
	}
}

struct SpyAnswerer {
	answer: String,
	prompts: Arc<Mutex<Vec<String>>>,
}
impl SpyAnswerer {
	fn new(answer: &str) -> Self {
		Self { answer: answer.to_string(), prompts: Arc::new(Mutex::new(Vec::new())) }
	}

	fn seen_prompts(&self) -> Arc<Mutex<Vec<String>>> {
		self.prompts.clone()
	}
}
impl QuestionAnswerer for SpyAnswerer {
	fn answer<'a>(&'a self, question: &'a str) -> BoxFuture<'a, Result<ChatAgentResponse>> {
		self.prompts.lock().expect("Prompt log must lock.").push(question.to_string());

		let answer = self.answer.clone();

		Box::pin(async move { Ok(ChatAgentResponse { answer }) })
	}
}

struct FailingAnswerer;
impl QuestionAnswerer for FailingAnswerer {
	fn answer<'a>(&'a self, _question: &'a str) -> BoxFuture<'a, Result<ChatAgentResponse>> {
		Box::pin(async move {
			Err(Error::Generation { message: "model exploded with secret detail".to_string() })
		})
	}
}

struct EmptyAnswerer;
impl QuestionAnswerer for EmptyAnswerer {
	fn answer<'a>(&'a self, _question: &'a str) -> BoxFuture<'a, Result<ChatAgentResponse>> {
		Box::pin(async move { Ok(ChatAgentResponse { answer: String::new() }) })
	}
}

fn chat_config() -> Chat {
	Chat { top_k: 5, excerpt_chars: 300, prompt_dir: None }
}

#[tokio::test]
async fn legal_question_retrieves_and_augments_the_prompt() {
	let long_section = "a".repeat(400);
	let retriever = StubRetriever::new(vec![
		section_hit("s 322", 0.93, "Every one commits theft who fraudulently takes..."),
		section_hit("s 334", 0.88, &long_section),
	]);
	let retriever_calls = retriever.call_count();
	let answerer = SpyAnswerer::new("Theft is punishable under the Criminal Code.");
	let prompts = answerer.seen_prompts();
	let graph = ChatGraph::new(Arc::new(retriever), Arc::new(answerer), &chat_config());

	let state = graph.run("What are the penalties for theft?").await.expect("Run must succeed.");

	assert_eq!(retriever_calls.load(Ordering::SeqCst), 1);
	assert!(state.needs_retrieval);
	assert_eq!(state.retrieved_sections.len(), 2);
	assert_eq!(state.question, "What are the penalties for theft?");
	assert_eq!(state.answer.as_deref(), Some("Theft is punishable under the Criminal Code."));
	assert!(state.error.is_none());

	let prompts = prompts.lock().expect("Prompt log must lock.");

	assert_eq!(prompts.len(), 1);
	assert!(prompts[0].contains("Criminal Code"));
	assert!(prompts[0].contains("s 322"));
	// The second hit is 400 chars long; only a 300-char excerpt may appear.
	assert!(prompts[0].contains(&"a".repeat(300)));
	assert!(!prompts[0].contains(&"a".repeat(301)));
	// The state keeps the unaugmented question.
	assert!(!state.question.contains("Relevant legal sections"));
}

#[tokio::test]
async fn general_question_skips_retrieval_entirely() {
	let retriever = StubRetriever::new(vec![section_hit("s 1", 0.5, "irrelevant")]);
	let retriever_calls = retriever.call_count();
	let answerer = SpyAnswerer::new("4.");
	let prompts = answerer.seen_prompts();
	let graph = ChatGraph::new(Arc::new(retriever), Arc::new(answerer), &chat_config());

	let state = graph.run("What is 2+2?").await.expect("Run must succeed.");

	assert_eq!(retriever_calls.load(Ordering::SeqCst), 0);
	assert!(!state.needs_retrieval);
	assert!(state.retrieved_sections.is_empty());
	assert_eq!(state.answer.as_deref(), Some("4."));

	let prompts = prompts.lock().expect("Prompt log must lock.");

	// The chat agent sees the raw question, unmodified.
	assert_eq!(prompts.as_slice(), ["What is 2+2?"]);
}

#[tokio::test]
async fn generation_failure_ends_with_the_fixed_error_message() {
	let graph = ChatGraph::new(
		Arc::new(StubRetriever::new(Vec::new())),
		Arc::new(FailingAnswerer),
		&chat_config(),
	);

	let state = graph.run("What is the capital of Jordan?").await.expect("Run must succeed.");

	assert_eq!(state.question, "What is the capital of Jordan?");
	assert!(state.answer.is_none());
	assert_eq!(state.error.as_deref(), Some(GRAPH_ERROR_MESSAGE));
	// The original failure detail must not leak into the terminal state.
	assert!(!state.error.as_deref().unwrap_or_default().contains("secret detail"));
}

#[tokio::test]
async fn empty_answer_is_routed_to_error_handling() {
	let graph = ChatGraph::new(
		Arc::new(StubRetriever::new(Vec::new())),
		Arc::new(EmptyAnswerer),
		&chat_config(),
	);

	let state = graph.run("What is the capital of Jordan?").await.expect("Run must succeed.");

	assert!(state.answer.is_none());
	assert_eq!(state.error.as_deref(), Some(GRAPH_ERROR_MESSAGE));
}

#[tokio::test]
async fn retrieval_failure_degrades_to_a_no_context_answer() {
	let answerer = SpyAnswerer::new("General answer without statute context.");
	let prompts = answerer.seen_prompts();
	let graph = ChatGraph::new(Arc::new(FailingRetriever), Arc::new(answerer), &chat_config());

	let state = graph.run("What is the penalty for theft?").await.expect("Run must succeed.");

	assert!(state.needs_retrieval);
	assert!(state.retrieved_sections.is_empty());
	assert_eq!(state.answer.as_deref(), Some("General answer without statute context."));
	// A successful chat step clears the retrieval error from the state.
	assert!(state.error.is_none());

	let prompts = prompts.lock().expect("Prompt log must lock.");

	assert_eq!(prompts.as_slice(), ["What is the penalty for theft?"]);
}

#[tokio::test]
async fn terminal_state_has_exactly_one_outcome() {
	for question in ["What is the penalty for theft?", "What is the capital of Jordan?"] {
		let graph = ChatGraph::new(
			Arc::new(StubRetriever::new(vec![section_hit("s 322", 0.9, "theft")])),
			Arc::new(SpyAnswerer::new("An answer.")),
			&chat_config(),
		);
		let state = graph.run(question).await.expect("Run must succeed.");

		assert_eq!(state.question, question);
		assert!(state.answer.is_some() ^ state.error.is_some());
	}
}

#[tokio::test]
async fn empty_question_fails_before_any_collaborator_call() {
	let retriever = StubRetriever::new(Vec::new());
	let retriever_calls = retriever.call_count();
	let answerer = SpyAnswerer::new("unused");
	let prompts = answerer.seen_prompts();
	let graph = ChatGraph::new(Arc::new(retriever), Arc::new(answerer), &chat_config());

	let err = graph.run("   ").await.expect_err("Empty question must fail.");

	assert!(matches!(err, Error::InvalidInput { .. }));
	assert_eq!(retriever_calls.load(Ordering::SeqCst), 0);
	assert!(prompts.lock().expect("Prompt log must lock.").is_empty());
}

#[tokio::test]
async fn repeated_runs_route_and_rank_identically() {
	let hits =
		vec![section_hit("s 322", 0.93, "first"), section_hit("s 334", 0.88, "second")];
	let graph = ChatGraph::new(
		Arc::new(StubRetriever::new(hits)),
		Arc::new(SpyAnswerer::new("Stable answer.")),
		&chat_config(),
	);

	let first = graph.run("What is the penalty for theft?").await.expect("Run must succeed.");
	let second = graph.run("What is the penalty for theft?").await.expect("Run must succeed.");

	assert_eq!(first.needs_retrieval, second.needs_retrieval);

	let labels = |state: &maplejuris_service::ChatGraphState| {
		state.retrieved_sections.iter().map(|hit| hit.label.clone()).collect::<Vec<_>>()
	};

	assert_eq!(labels(&first), labels(&second));
	assert_eq!(first.question, second.question);
}
