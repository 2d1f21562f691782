use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// The fixed output contract the model is instructed to follow. Versioned
/// with the response schema below; replies that do not match are rejected.
pub const FORMAT_INSTRUCTIONS: &str = "Respond with a single JSON object and nothing else. \
The object must have exactly one key, \"answer\", whose value is your complete answer as a string. \
Example: {\"answer\": \"Your answer here.\"}";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChatAgentResponse {
	pub answer: String,
}

/// Validates a raw model reply against the response schema. Tolerates a
/// Markdown code fence around the JSON object; anything else malformed is a
/// generation failure.
pub fn parse_response(raw: &str) -> Result<ChatAgentResponse> {
	let body = strip_code_fence(raw.trim());
	let response: ChatAgentResponse = serde_json::from_str(body).map_err(|err| {
		Error::Generation { message: format!("Reply does not match the response schema: {err}.") }
	})?;

	if response.answer.trim().is_empty() {
		return Err(Error::Generation { message: "Reply contained an empty answer.".to_string() });
	}

	Ok(response)
}

fn strip_code_fence(raw: &str) -> &str {
	let Some(stripped) = raw.strip_prefix("```") else {
		return raw;
	};
	let stripped = stripped.strip_prefix("json").unwrap_or(stripped);
	let stripped = stripped.strip_suffix("```").unwrap_or(stripped);

	stripped.trim()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_plain_json_reply() {
		let response = parse_response(r#"{"answer": "Theft is addressed in the Criminal Code."}"#)
			.expect("parse failed");
		assert_eq!(response.answer, "Theft is addressed in the Criminal Code.");
	}

	#[test]
	fn parses_fenced_json_reply() {
		let raw = "```json\n{\"answer\": \"Ottawa.\"}\n```";
		let response = parse_response(raw).expect("parse failed");
		assert_eq!(response.answer, "Ottawa.");
	}

	#[test]
	fn rejects_unknown_fields() {
		let err = parse_response(r#"{"answer": "x", "confidence": 0.9}"#)
			.expect_err("Unknown fields must be rejected.");
		assert!(matches!(err, Error::Generation { .. }));
	}

	#[test]
	fn rejects_empty_answer() {
		let err = parse_response(r#"{"answer": "  "}"#).expect_err("Empty answer must fail.");
		assert!(matches!(err, Error::Generation { .. }));
	}

	#[test]
	fn rejects_prose_reply() {
		let err = parse_response("The capital of Canada is Ottawa.")
			.expect_err("Prose reply must fail.");
		assert!(matches!(err, Error::Generation { .. }));
	}
}
