use super::form::FollowUpForm;
use super::normalize::{dedup_preserving_order, maps_link};
use super::types::{AdviceSource, Location, StructuredAdvice};

pub const FALLBACK_NOTICE: &str = "For your specific symptoms, it's recommended to consult with a healthcare provider for proper diagnosis and treatment. They can provide personalized medical advice and appropriate medication recommendations.";

pub const FALLBACK_MEDICINES: &[&str] =
    &["Consult with a healthcare provider for specific medication recommendations"];

pub const GENERAL_PRECAUTIONS: &[&str] = &[
    "Monitor your symptoms and keep a log of any changes",
    "If symptoms worsen or persist, seek medical attention",
    "Stay hydrated and get adequate rest",
    "Consider keeping a symptom diary to share with your healthcare provider",
];

pub const HIGH_SEVERITY_PRECAUTION: &str =
    "Given the high severity, consider seeking immediate medical attention from a healthcare provider";

pub const LONG_DURATION_PRECAUTION: &str =
    "Due to the long duration, consultation with a healthcare provider is recommended";

pub const FALLBACK_LOCATIONS: &[&str] = &[
    "Available at nearby pharmacies (click map link below)",
    "Most medications available at major drugstore chains",
    "Check 24-hour pharmacies for urgent needs",
    "Consider pharmacy delivery services if needed",
    "For prescription medications, consult with a healthcare provider first",
];

/// Advice built without any backend, used when every tier failed.
///
/// Form answers in `text` add severity and duration precautions; nothing
/// else about the input changes the result.
pub fn fallback_advice(text: &str, location: Option<&Location>) -> StructuredAdvice {
    let mut precautions: Vec<String> = GENERAL_PRECAUTIONS.iter().map(|s| s.to_string()).collect();

    if let Some(form) = FollowUpForm::parse(text) {
        if form.is_high_severity() {
            precautions.push(HIGH_SEVERITY_PRECAUTION.to_string());
        }
        if form.is_long_duration() {
            precautions.push(LONG_DURATION_PRECAUTION.to_string());
        }
    }

    StructuredAdvice {
        medicines: FALLBACK_MEDICINES.iter().map(|s| s.to_string()).collect(),
        precautions,
        locations: dedup_preserving_order(
            FALLBACK_LOCATIONS.iter().map(|s| s.to_string()).collect(),
        ),
        map_link: maps_link(location),
        notice: Some(FALLBACK_NOTICE.to_string()),
        source: AdviceSource::Fallback,
    }
}
