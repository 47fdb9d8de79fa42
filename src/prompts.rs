//! Prompt template for structured Q&A generation.
//!
//! Centralising the prompt here serves two purposes:
//!
//! 1. **Single source of truth** — changing the instructions (e.g. tightening
//!    the excerpt rule or adjusting answer length) requires editing exactly
//!    one place.
//!
//! 2. **Testability** — unit tests can inspect the assembled prompt directly
//!    without a real generation call, making prompt regressions easy to catch.
//!
//! The taxonomy is interpolated from [`crate::taxonomy`] so the prompt and
//! the aggregator's category validation can never drift apart.

use crate::taxonomy;

/// Instruction header. `{count}` and the taxonomy are interpolated by
/// [`qa_generation_prompt`].
const INSTRUCTIONS: &str = r#"You are a medical content specialist creating educational Q&A pairs from breast cancer patient information leaflets.

TASK: Extract or generate {count} question-answer pairs from the following medical document.

REQUIREMENTS:
1. Questions should be natural patient questions (max 100 words)
2. Answers must be factual, accurate, and comprehensive (max 2000 words)
3. Each Q&A must include:
   - A clear question a patient would ask
   - A detailed, evidence-based answer
   - The most appropriate category from: {categories}
   - A direct excerpt from the source that supports the answer

GUIDELINES:
- Focus on practical, actionable information
- Use empathetic, supportive language
- Be specific and avoid vague statements
- Include relevant medical terms with patient-friendly explanations
- Cite specific information from the document"#;

/// Output-shape reminder appended after the document content.
const OUTPUT_FORMAT: &str = r#"OUTPUT FORMAT (JSON array):
[
  {
    "question": "Patient's question here",
    "answer": "Comprehensive answer here",
    "category": "CATEGORY_NAME",
    "excerpt": "Direct quote from document supporting this answer"
  }
]

Generate the Q&A pairs now:"#;

/// Assemble the full generation prompt for one chunk.
///
/// `document` must already be truncated to the prompt character budget —
/// this function embeds it verbatim.
pub fn qa_generation_prompt(source_name: &str, document: &str, target_count: usize) -> String {
    let header = INSTRUCTIONS
        .replace("{count}", &target_count.to_string())
        .replace("{categories}", &taxonomy::comma_separated());

    format!(
        "{header}\n\nSOURCE DOCUMENT: {source_name}\n\nDOCUMENT CONTENT:\n{document}\n\n{OUTPUT_FORMAT}"
    )
}
