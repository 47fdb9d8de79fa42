//! The fixed category taxonomy for generated Q&A records.
//!
//! Fifteen labels covering the patient-information domain, plus a default
//! used when the model returns no category at all. The set is a process-wide
//! constant: the prompt interpolates it verbatim, and the aggregator checks
//! candidate labels against it. Keeping it in one place means the prompt and
//! the validation can never drift apart.

/// The closed set of category labels, in canonical order.
pub const CATEGORIES: [&str; 15] = [
    "SYMPTOMS",
    "SURGERY_PROCEDURES",
    "DRAINS_WOUND_CARE",
    "CANCER_TREATMENT",
    "MEDICATION",
    "SIDE_EFFECTS",
    "PRE_SURGERY_PREHAB",
    "POST_SURGERY_RECOVERY",
    "FOLLOW_UP_CARE",
    "LIFESTYLE",
    "NUTRITION",
    "EMOTIONAL_SUPPORT",
    "DIAGNOSIS_TESTING",
    "ADMIN_LOGISTICS",
    "SAFETY_RED_FLAGS",
];

/// Fallback label for records whose category is missing or blank.
///
/// Deliberately not a member of [`CATEGORIES`]: the prompt never offers it,
/// so its presence in output marks records the model failed to classify.
pub const DEFAULT_CATEGORY: &str = "GENERAL";

/// Whether `label` is a member of the taxonomy (exact match).
pub fn is_recognized(label: &str) -> bool {
    CATEGORIES.contains(&label)
}

/// The taxonomy as a comma-separated list, for prompt interpolation.
pub fn comma_separated() -> String {
    CATEGORIES.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_has_fifteen_labels() {
        assert_eq!(CATEGORIES.len(), 15);
    }

    #[test]
    fn recognizes_members_exactly() {
        assert!(is_recognized("MEDICATION"));
        assert!(is_recognized("SAFETY_RED_FLAGS"));
        assert!(!is_recognized("medication")); // case-sensitive
        assert!(!is_recognized("GENERAL")); // fallback is not a member
        assert!(!is_recognized(""));
    }

    #[test]
    fn comma_separated_is_prompt_ready() {
        let joined = comma_separated();
        assert!(joined.starts_with("SYMPTOMS, "));
        assert!(joined.ends_with("SAFETY_RED_FLAGS"));
        assert_eq!(joined.matches(", ").count(), 14);
    }
}
