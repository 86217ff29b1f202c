//! Retrieve-then-summarize pipeline: Retrieve -> Summarize -> Format

use rand::Rng;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::llm::TextGenerator;
use crate::models::RetrievedCase;
use crate::rag::ContextAssembler;
use crate::store::CaseStore;
use crate::store::CollectionClient;

/// Marker prefixed to the summary section when generation fails.
pub const SUMMARY_UNAVAILABLE: &str = "Summary unavailable";

/// The legal assistant: case retrieval plus plain-language summarization.
///
/// Holds no per-request state; both service handles are injected at
/// construction and live for the process lifetime.
pub struct LegalAssistant<C: CollectionClient, G: TextGenerator> {
    store: CaseStore<C>,
    generator: G,
    assembler: ContextAssembler,
    retrieval_limit: usize,
}

impl<C: CollectionClient, G: TextGenerator> LegalAssistant<C, G> {
    pub fn new(store: CaseStore<C>, generator: G, retrieval_limit: usize) -> Self {
        Self {
            store,
            generator,
            assembler: ContextAssembler,
            retrieval_limit,
        }
    }

    /// Answer a free-text legal query.
    ///
    /// Never fails outward: a retrieval failure degrades to the built-in
    /// sample cases, a generation failure degrades to a substitute summary
    /// carrying the failure detail. Neither is retried.
    pub async fn answer(&self, query: &str) -> String {
        info!("Processing query: {}", query);

        debug!("Step 1: Retrieving cases");
        let cases = self
            .store
            .nearest(&self.query_vector(query), self.retrieval_limit)
            .await;
        debug!("Retrieved {} cases", cases.len());

        debug!("Step 2: Generating summary");
        let summary = self.summarize(&cases).await;

        debug!("Step 3: Formatting result");
        self.format_result(&summary, &cases)
    }

    /// Summarize retrieved cases, substituting a fallback string on any
    /// generation failure.
    async fn summarize(&self, cases: &[RetrievedCase]) -> String {
        let context = self.assembler.assemble(cases);
        let prompt = format!("Explain these legal principles simply:\n{context}");

        match self.generator.generate(&prompt).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!("Generation failed, substituting fallback summary: {}", e);
                format!("{SUMMARY_UNAVAILABLE}: {e}")
            }
        }
    }

    /// Two-section output: summary, then the numbered source list.
    fn format_result(&self, summary: &str, cases: &[RetrievedCase]) -> String {
        format!(
            "## Summary\n{summary}\n\n## Relevant Cases\n{}",
            self.assembler.numbered_list(cases)
        )
    }

    /// Query vector for the nearest-neighbor lookup.
    ///
    /// Known limitation preserved from the observed behavior: the vector is
    /// random, not an embedding of `query`, so retrieval is effectively a
    /// sample of the collection. Swapping in a real embedding service means
    /// replacing this one function.
    fn query_vector(&self, _query: &str) -> Vec<f32> {
        let mut rng = rand::thread_rng();
        (0..self.store.dimension()).map(|_| rng.gen::<f32>()).collect()
    }
}
