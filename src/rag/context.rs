//! Context assembly from retrieved cases

use crate::models::RetrievedCase;

/// Assembler for turning retrieved cases into prompt context and the
/// user-facing source list.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextAssembler;

impl ContextAssembler {
    /// Build the context block sent to the generator: one `- text (year)`
    /// line per case, in store order.
    pub fn assemble(&self, cases: &[RetrievedCase]) -> String {
        cases
            .iter()
            .map(|case| format!("- {} ({})", case.text, case.year))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Build the numbered source list shown to the user, in store order.
    pub fn numbered_list(&self, cases: &[RetrievedCase]) -> String {
        cases
            .iter()
            .enumerate()
            .map(|(idx, case)| format!("{}. {} ({})", idx + 1, case.text, case.year))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
