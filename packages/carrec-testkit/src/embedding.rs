/// Deterministic bag-of-words embedding for tests.
///
/// Each lowercase alphanumeric token is hashed into one of `dim` buckets and the result is
/// L2-normalized, so texts sharing words land close together under cosine similarity.
pub fn hash_embedding(text: &str, dim: usize) -> Vec<f32> {
	let dim = dim.max(1);
	let mut vec = vec![0.0_f32; dim];

	for token in text
		.split(|ch: char| !ch.is_alphanumeric())
		.filter(|token| !token.is_empty())
		.map(str::to_lowercase)
	{
		let hash = blake3::hash(token.as_bytes());
		let bytes = hash.as_bytes();
		let bucket = u64::from_le_bytes([
			bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
		]) as usize % dim;

		vec[bucket] += 1.0;
	}

	let norm = vec.iter().map(|value| value * value).sum::<f32>().sqrt();

	if norm > 0.0 {
		for value in &mut vec {
			*value /= norm;
		}
	}

	vec
}
