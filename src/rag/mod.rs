//! Retrieval-augmented answering for legal queries
//!
//! End-to-end flow: nearest-neighbor case lookup, context assembly, LLM
//! summarization, and formatting of the combined result. Each step runs
//! sequentially; failures on either service edge degrade to substitute
//! values instead of surfacing to the caller.

pub mod context;
pub mod pipeline;

pub use context::ContextAssembler;
pub use pipeline::LegalAssistant;
pub use pipeline::SUMMARY_UNAVAILABLE;
