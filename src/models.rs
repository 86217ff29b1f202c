//! Domain models for stored legal cases

use rand::Rng;
use serde::Deserialize;
use serde::Serialize;

/// Fixed dimensionality of every case embedding
pub const EMBEDDING_DIM: usize = 768;

/// A stored legal case: one principle, its ruling year, and its embedding.
///
/// Records are write-once: bulk-inserted at startup if the collection is
/// empty, never updated or deleted afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseRecord {
    pub text: String,
    pub year: i64,
    pub embedding: Vec<f32>,
}

impl CaseRecord {
    pub fn new(text: impl Into<String>, year: i64, embedding: Vec<f32>) -> Self {
        Self {
            text: text.into(),
            year,
            embedding,
        }
    }
}

/// A case as returned from a nearest-neighbor lookup: text and year only,
/// the embedding stays inside the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievedCase {
    pub text: String,
    pub year: i64,
}

impl From<&CaseRecord> for RetrievedCase {
    fn from(record: &CaseRecord) -> Self {
        Self {
            text: record.text.clone(),
            year: record.year,
        }
    }
}

/// Built-in sample cases, used both to seed an empty collection and as the
/// fallback result set when retrieval fails.
pub fn sample_cases(dimension: usize) -> Vec<CaseRecord> {
    let mut rng = rand::thread_rng();
    let mut random_embedding = || (0..dimension).map(|_| rng.gen::<f32>()).collect::<Vec<_>>();

    vec![
        CaseRecord::new(
            "Landlords must return security deposits within 30 days of lease termination",
            2022,
            random_embedding(),
        ),
        CaseRecord::new(
            "Employers must provide reasonable accommodations under ADA",
            2023,
            random_embedding(),
        ),
    ]
}

/// The sample cases as retrieval results, truncated to `limit`.
pub fn fallback_cases(limit: usize) -> Vec<RetrievedCase> {
    sample_cases(0)
        .iter()
        .take(limit)
        .map(RetrievedCase::from)
        .collect()
}
