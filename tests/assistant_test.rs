//! End-to-end pipeline tests against in-memory service doubles.

use std::sync::Mutex;

use async_trait::async_trait;
use courtiq::llm::TextGenerator;
use courtiq::models::sample_cases;
use courtiq::models::CaseRecord;
use courtiq::models::RetrievedCase;
use courtiq::rag::LegalAssistant;
use courtiq::rag::SUMMARY_UNAVAILABLE;
use courtiq::store::CaseStore;
use courtiq::store::CollectionClient;
use courtiq::CourtIqError;
use courtiq::Result;

const DIM: usize = 8;

/// In-memory collection backend with L2 search (stable sort, so ties keep
/// insertion order).
#[derive(Default)]
struct InMemoryCollection {
    exists: Mutex<bool>,
    rows: Mutex<Vec<CaseRecord>>,
}

#[async_trait]
impl CollectionClient for InMemoryCollection {
    async fn has_collection(&self) -> Result<bool> {
        Ok(*self.exists.lock().unwrap())
    }

    async fn create_collection(&self, _dimension: usize) -> Result<()> {
        *self.exists.lock().unwrap() = true;
        Ok(())
    }

    async fn load_collection(&self) -> Result<()> {
        Ok(())
    }

    async fn entity_count(&self) -> Result<u64> {
        Ok(self.rows.lock().unwrap().len() as u64)
    }

    async fn insert(&self, records: &[CaseRecord]) -> Result<()> {
        self.rows.lock().unwrap().extend_from_slice(records);
        Ok(())
    }

    async fn search(&self, vector: &[f32], limit: usize) -> Result<Vec<RetrievedCase>> {
        let rows = self.rows.lock().unwrap();
        let mut scored: Vec<(f32, RetrievedCase)> = rows
            .iter()
            .map(|row| {
                let dist: f32 = row
                    .embedding
                    .iter()
                    .zip(vector)
                    .map(|(a, b)| (a - b) * (a - b))
                    .sum();
                (dist, RetrievedCase::from(row))
            })
            .collect();
        scored.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
        Ok(scored.into_iter().take(limit).map(|(_, c)| c).collect())
    }
}

/// Backend where every call fails, as if the store were unreachable.
struct UnreachableCollection;

#[async_trait]
impl CollectionClient for UnreachableCollection {
    async fn has_collection(&self) -> Result<bool> {
        Err(CourtIqError::Retrieval("store unreachable".to_string()))
    }

    async fn create_collection(&self, _dimension: usize) -> Result<()> {
        Err(CourtIqError::Retrieval("store unreachable".to_string()))
    }

    async fn load_collection(&self) -> Result<()> {
        Err(CourtIqError::Retrieval("store unreachable".to_string()))
    }

    async fn entity_count(&self) -> Result<u64> {
        Err(CourtIqError::Retrieval("store unreachable".to_string()))
    }

    async fn insert(&self, _records: &[CaseRecord]) -> Result<()> {
        Err(CourtIqError::Retrieval("store unreachable".to_string()))
    }

    async fn search(&self, _vector: &[f32], _limit: usize) -> Result<Vec<RetrievedCase>> {
        Err(CourtIqError::Retrieval("store unreachable".to_string()))
    }
}

/// Generator that echoes its prompt verbatim.
struct EchoGenerator;

#[async_trait]
impl TextGenerator for EchoGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        Ok(prompt.to_string())
    }
}

/// Generator where every call fails.
struct FailingGenerator;

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Err(CourtIqError::Generation(
            "connection refused to generation service".to_string(),
        ))
    }
}

fn known_cases() -> Vec<CaseRecord> {
    // Identical embeddings so ranking ties resolve to insertion order.
    vec![
        CaseRecord::new(
            "Landlords must return security deposits within 30 days of lease termination",
            2022,
            vec![0.5; DIM],
        ),
        CaseRecord::new(
            "Employers must provide reasonable accommodations under ADA",
            2023,
            vec![0.5; DIM],
        ),
    ]
}

async fn seeded_store() -> CaseStore<InMemoryCollection> {
    let store = CaseStore::new(InMemoryCollection::default(), DIM);
    store.ensure_schema().await.unwrap();
    store.seed_if_empty(&known_cases()).await.unwrap();
    store
}

#[tokio::test]
async fn test_seed_if_empty_is_idempotent() -> Result<()> {
    let store = CaseStore::new(InMemoryCollection::default(), DIM);
    store.ensure_schema().await?;

    store.seed_if_empty(&known_cases()).await?;
    let count_after_first = store.try_nearest(&vec![0.0; DIM], 10).await?.len();

    store.seed_if_empty(&known_cases()).await?;
    let count_after_second = store.try_nearest(&vec![0.0; DIM], 10).await?.len();

    assert_eq!(count_after_first, 2);
    assert_eq!(count_after_second, 2);
    Ok(())
}

#[tokio::test]
async fn test_ensure_schema_is_idempotent() -> Result<()> {
    let store = seeded_store().await;

    // A second bootstrap must neither fail nor disturb the stored entities.
    store.ensure_schema().await?;
    let cases = store.try_nearest(&vec![0.0; DIM], 10).await?;
    assert_eq!(cases.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_seed_rejects_wrong_dimension() {
    let store = CaseStore::new(InMemoryCollection::default(), DIM);
    let bad = vec![CaseRecord::new("too short", 2020, vec![0.1; DIM - 1])];
    assert!(store.seed_if_empty(&bad).await.is_err());
}

#[tokio::test]
async fn test_nearest_returns_at_most_requested_count() -> Result<()> {
    let store = seeded_store().await;

    assert_eq!(store.try_nearest(&vec![0.0; DIM], 1).await?.len(), 1);
    // Asking for more than the store holds returns what exists.
    assert_eq!(store.try_nearest(&vec![0.0; DIM], 5).await?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_nearest_falls_back_when_store_fails() {
    let store = CaseStore::new(UnreachableCollection, DIM);

    assert!(store.try_nearest(&vec![0.0; DIM], 2).await.is_err());

    // The never-fail variant substitutes the built-in sample cases.
    let cases = store.nearest(&vec![0.0; DIM], 2).await;
    let expected: Vec<RetrievedCase> = sample_cases(0).iter().map(RetrievedCase::from).collect();
    assert_eq!(cases, expected);
}

#[tokio::test]
async fn test_answer_lists_cases_in_store_order() {
    let assistant = LegalAssistant::new(seeded_store().await, EchoGenerator, 2);

    let output = assistant.answer("deposit question").await;

    assert!(output.contains("## Summary"));
    assert!(output.contains("## Relevant Cases"));
    assert!(output.contains(
        "1. Landlords must return security deposits within 30 days of lease termination (2022)"
    ));
    assert!(output.contains("2. Employers must provide reasonable accommodations under ADA (2023)"));

    // The echoed prompt carries the fixed instruction and the context block.
    assert!(output.contains("Explain these legal principles simply:"));
}

#[tokio::test]
async fn test_answer_substitutes_summary_on_generation_failure() {
    let assistant = LegalAssistant::new(seeded_store().await, FailingGenerator, 2);

    let output = assistant.answer("any question").await;

    assert!(output.contains(SUMMARY_UNAVAILABLE));
    assert!(output.contains("connection refused to generation service"));
    // The case list is still present and intact.
    assert!(output.contains("## Relevant Cases"));
    assert!(output.contains("(2022)"));
}

#[tokio::test]
async fn test_answer_keeps_both_sections_when_everything_fails() {
    let store = CaseStore::new(UnreachableCollection, DIM);
    let assistant = LegalAssistant::new(store, FailingGenerator, 2);

    let output = assistant.answer("any question").await;

    assert!(output.contains("## Summary"));
    assert!(output.contains("## Relevant Cases"));
    assert!(output.contains(SUMMARY_UNAVAILABLE));
    // Fallback cases fill the source list.
    assert!(output.contains("1. Landlords must return security deposits"));
    assert!(output.contains("2. Employers must provide reasonable accommodations"));
}

#[tokio::test]
async fn test_answer_is_stateless_across_calls() {
    let assistant = LegalAssistant::new(seeded_store().await, EchoGenerator, 2);

    let first = assistant.answer("question one").await;
    let second = assistant.answer("question one").await;

    // Same store contents, same generator: the case list is identical.
    let list = |s: &str| s.split("## Relevant Cases").nth(1).unwrap().to_string();
    assert_eq!(list(&first), list(&second));
}
