/// Output layout demanded from every backend. The closing directive
/// suppresses any preamble before the first header.
pub const TRIAGE_OUTPUT_FORMAT: &str = r#"You must respond in this exact format:

POSSIBLE MEDICINES:
1. Medicine name (Brand name) - dosage and frequency
2. Medicine name (Brand name) - dosage and frequency
3. Medicine name (Brand name) - dosage and frequency

PRECAUTIONS:
- Safety step 1
- Safety step 2
- Safety step 3

WHERE TO FIND:
- Location 1
- Location 2
- Location 3

Do not include any other text. Start directly with POSSIBLE MEDICINES:"#;

/// Build the generation prompt for a symptom description.
///
/// Detailed-form input is framed as a request for treatment recommendations
/// around the whole labeled block; free text is framed as a general
/// description. The demanded layout is identical in both cases.
pub fn build_triage_prompt(symptoms: &str, detailed_form: bool) -> String {
    let symptoms = symptoms.trim();
    if detailed_form {
        format!(
            "Provide treatment recommendations for these symptoms:\n\n{symptoms}\n\n{TRIAGE_OUTPUT_FORMAT}"
        )
    } else {
        format!("Provide medical advice for: {symptoms}\n\n{TRIAGE_OUTPUT_FORMAT}")
    }
}
