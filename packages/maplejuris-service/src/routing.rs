/// Keywords that mark a question as likely answerable from the statute
/// corpus. Matching favors precision: a miss only skips retrieval, while a
/// spurious hit only adds retrieval latency.
pub const RETRIEVAL_KEYWORDS: [&str; 13] = [
	"law",
	"legal",
	"act",
	"statute",
	"section",
	"penalty",
	"offence",
	"crime",
	"criminal",
	"regulation",
	"canada",
	"canadian",
	"legislation",
];

/// Pure, case-insensitive substring test against the fixed keyword set. No
/// stemming, no scoring.
pub fn needs_retrieval(question: &str) -> bool {
	let lowered = question.to_lowercase();

	RETRIEVAL_KEYWORDS.iter().any(|keyword| lowered.contains(keyword))
}
