use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Leading integer of a "N/10" severity answer.
static SEVERITY_SCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d{1,3})\s*(?:/\s*10)?").expect("static regex"));

/// Severity at or above which the fallback advises immediate attention.
pub const HIGH_SEVERITY_THRESHOLD: u8 = 7;

/// Duration words that count as a long-standing complaint.
const LONG_DURATION_WORDS: &[&str] = &["week", "month", "year"];

/// Follow-up answers embedded as `Label: value` lines in the symptom text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUpForm {
    pub original_symptoms: Option<String>,
    pub duration: Option<String>,
    pub severity: Option<String>,
    pub pattern: Option<String>,
}

impl FollowUpForm {
    /// Parse the labeled lines. Returns `None` when no known label is present.
    ///
    /// Each line is split on its first `:`; unknown labels are ignored and a
    /// repeated label keeps its last value.
    pub fn parse(text: &str) -> Option<Self> {
        let mut form = FollowUpForm::default();
        let mut found = false;

        for line in text.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim().to_string();
            let slot = match key.trim() {
                "Original symptoms" => &mut form.original_symptoms,
                "Duration" => &mut form.duration,
                "Severity" => &mut form.severity,
                "Pattern" => &mut form.pattern,
                _ => continue,
            };
            *slot = Some(value);
            found = true;
        }

        found.then_some(form)
    }

    /// Numeric severity from "N/10"; `None` when absent or not numeric.
    pub fn severity_score(&self) -> Option<u8> {
        let raw = self.severity.as_deref()?;
        let caps = SEVERITY_SCORE.captures(raw)?;
        caps.get(1)?.as_str().parse().ok()
    }

    pub fn is_high_severity(&self) -> bool {
        self.severity_score()
            .is_some_and(|score| score >= HIGH_SEVERITY_THRESHOLD)
    }

    /// True when the duration mentions weeks, months or years.
    pub fn is_long_duration(&self) -> bool {
        let Some(duration) = self.duration.as_deref() else {
            return false;
        };
        let lower = duration.to_lowercase();
        LONG_DURATION_WORDS.iter().any(|w| lower.contains(w))
    }
}
