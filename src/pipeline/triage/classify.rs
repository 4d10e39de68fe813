use super::types::ClarifyDecision;

/// Labels of the follow-up form. Any of them marks the input as already detailed.
pub const DETAILED_FORM_MARKERS: &[&str] =
    &["Duration:", "Severity:", "Pattern:", "Original symptoms:"];

/// Terms that make a first description too vague to act on (substring match).
///
/// Broad entries such as "head" or "bad" also fire inside otherwise specific
/// descriptions ("headache", "badly"). Kept as-is for compatibility.
pub const VAGUE_TERMS: &[&str] = &[
    "pain",
    "ache",
    "hurt",
    "discomfort",
    "not feeling well",
    "sick",
    "unwell",
    "bad",
    "weird",
    "strange",
    "odd",
    "symptoms",
    "problem",
    "issue",
    "head",
    "stomach",
    "throat",
];

/// Descriptions with fewer whitespace-separated tokens than this need follow-up.
pub const MIN_TOKEN_COUNT: usize = 4;

/// True when the text carries at least one follow-up form label (case-sensitive).
pub fn is_detailed_form(text: &str) -> bool {
    DETAILED_FORM_MARKERS.iter().any(|m| text.contains(m))
}

/// Decide whether a symptom description needs clarifying questions.
pub fn needs_more_info(text: &str) -> bool {
    if is_detailed_form(text) {
        return false;
    }

    let lower = text.to_lowercase();
    if VAGUE_TERMS.iter().any(|term| lower.contains(term)) {
        return true;
    }

    text.split_whitespace().count() < MIN_TOKEN_COUNT
}

pub fn classify(text: &str) -> ClarifyDecision {
    if needs_more_info(text) {
        ClarifyDecision::NeedsMoreInfo
    } else {
        ClarifyDecision::Proceed
    }
}
