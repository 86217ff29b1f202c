//! Case Store: persistent collection of legal cases with vector lookup
//!
//! The store is an external service (Milvus) reached over its RESTful API.
//! [`CollectionClient`] is the seam between the store logic and the wire
//! protocol, so tests can run against an in-memory backend.

pub mod milvus;

use async_trait::async_trait;
use tracing::debug;
use tracing::warn;

use crate::errors::CourtIqError;
use crate::errors::Result;
use crate::models::fallback_cases;
use crate::models::CaseRecord;
use crate::models::RetrievedCase;

pub use milvus::MilvusClient;

/// Backend operations against one named collection of case records.
#[async_trait]
pub trait CollectionClient: Send + Sync {
    /// Whether the collection exists.
    async fn has_collection(&self) -> Result<bool>;

    /// Create the collection with the case-record schema. The store may
    /// answer success if the collection already exists.
    async fn create_collection(&self, dimension: usize) -> Result<()>;

    /// Load the collection so it is searchable.
    async fn load_collection(&self) -> Result<()>;

    /// Number of entities currently stored.
    async fn entity_count(&self) -> Result<u64>;

    /// Bulk-insert case records.
    async fn insert(&self, records: &[CaseRecord]) -> Result<()>;

    /// Return up to `limit` records nearest to `vector` under L2 distance,
    /// in the store's own ranking order.
    async fn search(&self, vector: &[f32], limit: usize) -> Result<Vec<RetrievedCase>>;
}

/// The Case Store: schema bootstrap, one-time seeding, and nearest-neighbor
/// lookup with a never-fail fallback.
pub struct CaseStore<C: CollectionClient> {
    client: C,
    dimension: usize,
}

impl<C: CollectionClient> CaseStore<C> {
    /// Create a store over an already-connected backend client.
    ///
    /// The client handle is long-lived: opened once at startup and reused
    /// across requests without locking, since the store is never written
    /// to after the one-time seed.
    pub fn new(client: C, dimension: usize) -> Self {
        Self { client, dimension }
    }

    /// Idempotently guarantee the collection exists and is loaded.
    pub async fn ensure_schema(&self) -> Result<()> {
        if self.client.has_collection().await? {
            debug!("Collection already exists, loading");
        } else {
            self.client.create_collection(self.dimension).await?;
            debug!("Created collection with dimension {}", self.dimension);
        }
        self.client.load_collection().await
    }

    /// Insert `records` only if the store currently holds zero entities.
    ///
    /// Running this twice never duplicates data, which makes process
    /// startup idempotent.
    pub async fn seed_if_empty(&self, records: &[CaseRecord]) -> Result<()> {
        for record in records {
            if record.embedding.len() != self.dimension {
                return Err(CourtIqError::Retrieval(format!(
                    "embedding dimension {} does not match collection dimension {}",
                    record.embedding.len(),
                    self.dimension
                )));
            }
        }

        let count = self.client.entity_count().await?;
        if count > 0 {
            debug!("Collection already holds {} entities, skipping seed", count);
            return Ok(());
        }

        self.client.insert(records).await?;
        self.client.load_collection().await?;
        debug!("Seeded {} case records", records.len());
        Ok(())
    }

    /// Nearest-neighbor lookup returning up to `limit` cases, or a tagged
    /// retrieval error. Tie order is the backing store's own ranking order
    /// (insertion order for the in-memory test backend).
    pub async fn try_nearest(&self, vector: &[f32], limit: usize) -> Result<Vec<RetrievedCase>> {
        self.client.search(vector, limit).await
    }

    /// Nearest-neighbor lookup that never fails outward: any retrieval
    /// error is logged and substituted with the built-in sample cases, so
    /// the caller always receives some records.
    pub async fn nearest(&self, vector: &[f32], limit: usize) -> Vec<RetrievedCase> {
        match self.try_nearest(vector, limit).await {
            Ok(cases) => cases,
            Err(e) => {
                warn!("Search failed, returning sample cases: {}", e);
                fallback_cases(limit)
            }
        }
    }

    /// Dimensionality the store enforces on embeddings.
    pub fn dimension(&self) -> usize {
        self.dimension
    }
}
