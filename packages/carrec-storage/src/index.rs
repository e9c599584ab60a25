//! File-backed similarity index.
//!
//! Vectors live in a `usearch` HNSW graph. An index directory holds the serialized graph
//! (`vectors-<blake3>.usearch`), the text and metadata of every entry (`entries-<blake3>.json`) and a
//! `manifest.json` naming both. Every file is written to a temporary name and renamed into place,
//! manifest last, so a reader sees either the previous build or the new one in full.

use std::{
	cmp::Ordering,
	fmt::{Debug, Formatter},
	io::ErrorKind,
	path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use tokio::fs;
use usearch::ffi::{IndexOptions, MetricKind, ScalarKind};
use uuid::Uuid;

use crate::{Error, Result};

pub const FORMAT_VERSION: u32 = 2;

const MANIFEST_FILE: &str = "manifest.json";
const ENTRIES_PREFIX: &str = "entries-";
const ENTRIES_SUFFIX: &str = ".json";
const VECTORS_PREFIX: &str = "vectors-";
const VECTORS_SUFFIX: &str = ".usearch";
const CONNECTIVITY: usize = 16;
const EXPANSION_ADD: usize = 128;
const EXPANSION_SEARCH: usize = 64;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
	pub text: String,
	pub metadata: Value,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IndexManifest {
	pub format_version: u32,
	/// `provider_id:model:dimensions` of the embedder that produced the vectors.
	pub embedding_version: String,
	pub vector_dim: u32,
	pub count: usize,
	#[serde(with = "crate::time_serde")]
	pub built_at: OffsetDateTime,
	pub entries_file: String,
	pub entries_checksum: String,
	pub vectors_file: String,
	pub vectors_checksum: String,
}

#[derive(Debug)]
pub struct SearchHit<'a> {
	/// Cosine similarity, higher is closer.
	pub score: f32,
	pub entry: &'a IndexEntry,
}

/// Cosine HNSW index keyed by insertion position.
pub struct VectorIndex {
	embedding_version: String,
	vector_dim: u32,
	graph: usearch::Index,
	entries: Vec<IndexEntry>,
}
impl VectorIndex {
	pub fn new(embedding_version: impl Into<String>, vector_dim: u32) -> Result<Self> {
		Ok(Self {
			embedding_version: embedding_version.into(),
			vector_dim,
			graph: new_graph(vector_dim)?,
			entries: Vec::new(),
		})
	}

	pub fn build(
		embedding_version: impl Into<String>,
		vector_dim: u32,
		items: Vec<(IndexEntry, Vec<f32>)>,
	) -> Result<Self> {
		let mut index = Self::new(embedding_version, vector_dim)?;

		index.graph.reserve(items.len()).map_err(index_error("reserve capacity"))?;
		index.entries.reserve(items.len());

		for (entry, vector) in items {
			index.insert(entry, &vector)?;
		}

		Ok(index)
	}

	pub fn embedding_version(&self) -> &str {
		&self.embedding_version
	}

	pub fn vector_dim(&self) -> u32 {
		self.vector_dim
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn entries(&self) -> &[IndexEntry] {
		&self.entries
	}

	pub fn insert(&mut self, entry: IndexEntry, vector: &[f32]) -> Result<()> {
		self.check_dim(vector.len())?;

		if self.graph.size() >= self.graph.capacity() {
			let capacity = (self.graph.capacity() * 2).max(64);

			self.graph.reserve(capacity).map_err(index_error("expand capacity"))?;
		}

		let key = self.entries.len() as u64;

		self.graph.add(key, vector).map_err(index_error("add vector"))?;
		self.entries.push(entry);

		Ok(())
	}

	/// Returns up to `k` entries by descending cosine similarity.
	///
	/// Equal scores keep insertion order.
	pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit<'_>>> {
		self.check_dim(query.len())?;

		if self.is_empty() || k == 0 {
			return Ok(Vec::new());
		}

		let matches = self.graph.search(query, k).map_err(index_error("search"))?;
		let mut hits = matches
			.keys
			.iter()
			.zip(&matches.distances)
			.filter_map(|(key, distance)| {
				let entry = self.entries.get(*key as usize)?;

				Some((*key, SearchHit { score: 1.0 - distance, entry }))
			})
			.collect::<Vec<_>>();

		hits.sort_by(|(key_a, a), (key_b, b)| {
			b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal).then(key_a.cmp(key_b))
		});

		Ok(hits.into_iter().map(|(_, hit)| hit).collect())
	}

	fn check_dim(&self, actual: usize) -> Result<()> {
		if actual != self.vector_dim as usize {
			return Err(Error::DimensionMismatch { expected: self.vector_dim, actual });
		}

		Ok(())
	}

	fn graph_bytes(&self) -> Result<Vec<u8>> {
		let mut bytes = vec![0; self.graph.serialized_length()];

		self.graph.save_to_buffer(&mut bytes).map_err(index_error("serialize graph"))?;

		Ok(bytes)
	}
}
impl Debug for VectorIndex {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("VectorIndex")
			.field("embedding_version", &self.embedding_version)
			.field("vector_dim", &self.vector_dim)
			.field("len", &self.entries.len())
			.finish()
	}
}

/// Location of a persisted index.
#[derive(Clone, Debug)]
pub struct IndexStore {
	dir: PathBuf,
}
impl IndexStore {
	pub fn new(dir: impl Into<PathBuf>) -> Self {
		Self { dir: dir.into() }
	}

	pub fn from_config(cfg: &carrec_config::Index) -> Self {
		Self::new(cfg.path.clone())
	}

	pub fn location(&self) -> &Path {
		&self.dir
	}

	/// Replaces whatever index is stored at this location.
	pub async fn persist(&self, index: &VectorIndex) -> Result<IndexManifest> {
		fs::create_dir_all(&self.dir).await?;

		let entries = serde_json::to_vec(&index.entries)?;
		let entries_checksum = blake3::hash(&entries).to_hex().to_string();
		let vectors = index.graph_bytes()?;
		let vectors_checksum = blake3::hash(&vectors).to_hex().to_string();
		let manifest = IndexManifest {
			format_version: FORMAT_VERSION,
			embedding_version: index.embedding_version.clone(),
			vector_dim: index.vector_dim,
			count: index.entries.len(),
			built_at: OffsetDateTime::now_utc(),
			entries_file: format!("{ENTRIES_PREFIX}{entries_checksum}{ENTRIES_SUFFIX}"),
			entries_checksum,
			vectors_file: format!("{VECTORS_PREFIX}{vectors_checksum}{VECTORS_SUFFIX}"),
			vectors_checksum,
		};

		write_atomic(&self.dir.join(&manifest.entries_file), &entries).await?;
		write_atomic(&self.dir.join(&manifest.vectors_file), &vectors).await?;
		write_atomic(&self.dir.join(MANIFEST_FILE), &serde_json::to_vec_pretty(&manifest)?).await?;
		self.remove_stale_blobs(&manifest).await;

		tracing::info!(
			path = %self.dir.display(),
			count = manifest.count,
			embedding_version = %manifest.embedding_version,
			"Persisted vector index."
		);

		Ok(manifest)
	}

	pub async fn load(&self) -> Result<VectorIndex> {
		let (manifest, index) = self.load_with_manifest().await?;

		tracing::debug!(
			path = %self.dir.display(),
			count = manifest.count,
			built_at = %manifest.built_at,
			"Loaded vector index."
		);

		Ok(index)
	}

	pub async fn load_with_manifest(&self) -> Result<(IndexManifest, VectorIndex)> {
		let raw = match fs::read(self.dir.join(MANIFEST_FILE)).await {
			Ok(raw) => raw,
			Err(err) if err.kind() == ErrorKind::NotFound =>
				return Err(Error::IndexMissing { path: self.dir.clone() }),
			Err(err) => return Err(err.into()),
		};
		let manifest: IndexManifest = serde_json::from_slice(&raw)
			.map_err(|err| self.corrupt(format!("unreadable manifest ({err})")))?;

		if manifest.format_version != FORMAT_VERSION {
			return Err(
				self.corrupt(format!("unsupported format version {}", manifest.format_version))
			);
		}

		let entries = self.read_blob(&manifest.entries_file, &manifest.entries_checksum).await?;
		let vectors = self.read_blob(&manifest.vectors_file, &manifest.vectors_checksum).await?;
		let entries: Vec<IndexEntry> = serde_json::from_slice(&entries)
			.map_err(|err| self.corrupt(format!("unreadable entries ({err})")))?;
		let graph = new_graph(manifest.vector_dim)?;

		graph
			.load_from_buffer(&vectors)
			.map_err(|err| self.corrupt(format!("unreadable vectors ({err})")))?;

		if entries.len() != manifest.count || graph.size() != manifest.count {
			return Err(self.corrupt(format!(
				"manifest lists {} entries but {} entries and {} vectors were stored",
				manifest.count,
				entries.len(),
				graph.size()
			)));
		}

		let index = VectorIndex {
			embedding_version: manifest.embedding_version.clone(),
			vector_dim: manifest.vector_dim,
			graph,
			entries,
		};

		Ok((manifest, index))
	}

	async fn read_blob(&self, file: &str, checksum: &str) -> Result<Vec<u8>> {
		if Path::new(file).file_name().and_then(|name| name.to_str()) != Some(file) {
			return Err(self.corrupt(format!("invalid blob name {file:?}")));
		}

		let bytes = match fs::read(self.dir.join(file)).await {
			Ok(bytes) => bytes,
			Err(err) if err.kind() == ErrorKind::NotFound =>
				return Err(self.corrupt(format!("{file} is missing"))),
			Err(err) => return Err(err.into()),
		};

		if blake3::hash(&bytes).to_hex().as_str() != checksum {
			return Err(self.corrupt(format!("checksum mismatch for {file}")));
		}

		Ok(bytes)
	}

	fn corrupt(&self, message: String) -> Error {
		Error::IndexCorrupt { path: self.dir.clone(), message }
	}

	async fn remove_stale_blobs(&self, manifest: &IndexManifest) {
		let mut dir = match fs::read_dir(&self.dir).await {
			Ok(dir) => dir,
			Err(err) => {
				tracing::warn!(
					error = %err,
					path = %self.dir.display(),
					"Failed to list index directory."
				);

				return;
			},
		};

		while let Ok(Some(item)) = dir.next_entry().await {
			let name = item.file_name();
			let Some(name) = name.to_str() else {
				continue;
			};

			let current = name == manifest.entries_file || name == manifest.vectors_file;
			let blob = (name.starts_with(ENTRIES_PREFIX) && name.ends_with(ENTRIES_SUFFIX))
				|| (name.starts_with(VECTORS_PREFIX) && name.ends_with(VECTORS_SUFFIX));

			if current || !blob {
				continue;
			}
			if let Err(err) = fs::remove_file(item.path()).await {
				tracing::warn!(error = %err, file = name, "Failed to remove stale index blob.");
			}
		}
	}
}

fn new_graph(vector_dim: u32) -> Result<usearch::Index> {
	let options = IndexOptions {
		dimensions: vector_dim as usize,
		metric: MetricKind::Cos,
		quantization: ScalarKind::F32,
		connectivity: CONNECTIVITY,
		expansion_add: EXPANSION_ADD,
		expansion_search: EXPANSION_SEARCH,
		multi: false,
	};

	usearch::Index::new(&options).map_err(index_error("create graph"))
}

fn index_error<E>(action: &'static str) -> impl Fn(E) -> Error
where
	E: std::fmt::Display,
{
	move |err| Error::Index { message: format!("Failed to {action}: {err}") }
}

async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
	let file_name = path.file_name().and_then(|name| name.to_str()).unwrap_or("index");
	let tmp = path.with_file_name(format!(".{file_name}.{}.tmp", Uuid::new_v4().simple()));

	fs::write(&tmp, bytes).await?;

	if let Err(err) = fs::rename(&tmp, path).await {
		let _ = fs::remove_file(&tmp).await;

		return Err(err.into());
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn entry(id: &str) -> IndexEntry {
		IndexEntry { text: id.to_string(), metadata: serde_json::json!({ "id": id }) }
	}

	fn ids<'a>(hits: &'a [SearchHit<'_>]) -> Vec<&'a str> {
		hits.iter().map(|hit| hit.entry.text.as_str()).collect()
	}

	#[test]
	fn search_orders_by_similarity_and_keeps_ties_stable() {
		let index = VectorIndex::build(
			"stub:m:2",
			2,
			vec![
				(entry("far"), vec![0.0, 1.0]),
				(entry("tie_a"), vec![1.0, 1.0]),
				(entry("near"), vec![1.0, 0.0]),
				(entry("tie_b"), vec![1.0, 1.0]),
			],
		)
		.expect("build failed");
		let hits = index.search(&[1.0, 0.0], 3).expect("search failed");

		assert_eq!(ids(&hits), vec!["near", "tie_a", "tie_b"]);
		assert!((hits[0].score - 1.0).abs() < 1e-4);
	}

	#[test]
	fn similarity_ignores_magnitude() {
		let index = VectorIndex::build(
			"stub:m:2",
			2,
			vec![(entry("long"), vec![5.0, 0.0]), (entry("orthogonal"), vec![0.0, 3.0])],
		)
		.expect("build failed");
		let hits = index.search(&[1.0, 0.0], 2).expect("search failed");

		assert_eq!(ids(&hits), vec!["long", "orthogonal"]);
		assert!((hits[0].score - 1.0).abs() < 1e-4);
		assert!(hits[1].score.abs() < 1e-4);
	}

	#[test]
	fn inserts_grow_past_initial_capacity() {
		let mut index = VectorIndex::new("stub:m:2", 2).expect("new failed");

		for i in 0..100 {
			index.insert(entry(&format!("e{i}")), &[1.0, i as f32]).expect("insert failed");
		}

		assert_eq!(index.len(), 100);
		assert_eq!(ids(&index.search(&[1.0, 0.0], 1).expect("search failed")), vec!["e0"]);
	}

	#[test]
	fn rejects_vectors_of_the_wrong_dimension() {
		let mut index = VectorIndex::new("stub:m:3", 3).expect("new failed");

		assert!(matches!(
			index.insert(entry("short"), &[1.0]),
			Err(Error::DimensionMismatch { expected: 3, actual: 1 })
		));
		assert!(index.is_empty());
		assert!(index.search(&[1.0, 0.0], 1).is_err());
	}
}
