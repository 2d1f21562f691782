use crate::{Error, Result, db::Db, models::SectionHit};

/// Nearest-neighbor search over embedded statute sections using pgvector
/// cosine distance. Results come back in non-increasing similarity order,
/// at most `k` of them. The embedding dimension must match the stored
/// `sections.embedding` column; the ingestion pipeline owns that schema.
pub async fn similar_sections(db: &Db, embedding: &[f32], k: i64) -> Result<Vec<SectionHit>> {
	if embedding.is_empty() {
		return Err(Error::InvalidArgument("Query embedding must be non-empty.".to_string()));
	}
	if k < 1 {
		return Err(Error::InvalidArgument("k must be at least 1.".to_string()));
	}

	let vector = format_vector(embedding);
	let hits = sqlx::query_as::<_, SectionHit>(
		"\
SELECT
	s.id::text AS id,
	s.label,
	s.text,
	s.position,
	st.short_title AS statute_title,
	st.long_title AS statute_long_title,
	1 - (s.embedding <=> $1::vector) AS similarity
FROM sections s
JOIN bodies b ON s.body_id = b.id
JOIN statutes st ON b.statute_id = st.id
WHERE s.embedding IS NOT NULL
	AND s.text IS NOT NULL
	AND s.text <> ''
ORDER BY s.embedding <=> $1::vector
LIMIT $2",
	)
	.bind(&vector)
	.bind(k)
	.fetch_all(&db.pool)
	.await?;

	Ok(hits)
}

/// Renders an embedding as a pgvector text literal, e.g. `[0.1,0.2,0.3]`.
fn format_vector(embedding: &[f32]) -> String {
	let mut out = String::with_capacity(embedding.len() * 12 + 2);

	out.push('[');
	for (index, value) in embedding.iter().enumerate() {
		if index > 0 {
			out.push(',');
		}
		out.push_str(&value.to_string());
	}
	out.push(']');

	out
}
