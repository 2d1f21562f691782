use serde::{Deserialize, Serialize};

/// One ranked similarity-search result over the statute corpus. Produced
/// fresh per query and owned by the caller for the duration of one request.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SectionHit {
	pub id: String,
	pub label: String,
	pub text: String,
	pub position: i32,
	pub statute_title: String,
	pub statute_long_title: String,
	pub similarity: f64,
}
