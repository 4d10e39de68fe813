//! Backend text → three canonical sections.
//!
//! Every line goes through `classify_line`, which evaluates an ordered rule
//! table once and tags the line as a section header, content, or blank. Two
//! rule tables exist: exact headers (used when the text already starts with
//! `POSSIBLE MEDICINES:`) and keyword sniffing for free-form prose.

use std::collections::HashSet;

use super::types::{AdviceSource, Location, Section, StructuredAdvice};

pub const DEFAULT_MEDICINES: &[&str] =
    &["Consult with a healthcare provider for specific medication recommendations"];

pub const DEFAULT_PRECAUTIONS: &[&str] = &[
    "Monitor symptoms",
    "Rest and stay hydrated",
    "Seek medical attention if symptoms worsen",
];

pub const DEFAULT_LOCATIONS: &[&str] = &[
    "Local pharmacies",
    "Drug stores",
    "Consult healthcare provider",
];

/// Generic pharmacy search, used when no location was supplied.
pub const MAPS_SEARCH_URL: &str = "https://www.google.com/maps/search/pharmacies";

/// Map-search link centred on the caller when a location is known.
pub fn maps_link(location: Option<&Location>) -> String {
    match location {
        Some(loc) => format!("{MAPS_SEARCH_URL}/@{},{},15z", loc.latitude, loc.longitude),
        None => MAPS_SEARCH_URL.to_string(),
    }
}

/// Which rule table drives line classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    /// Case-sensitive exact header substrings.
    Headers,
    /// Case-insensitive keyword sniffing for irregular output.
    Keywords,
}

impl ParseMode {
    /// Text that already opens with the medicines header follows the layout.
    pub fn detect(raw: &str) -> Self {
        if raw.trim_start().starts_with(Section::Medicines.header()) {
            Self::Headers
        } else {
            Self::Keywords
        }
    }

    fn rules(self) -> &'static [LineRule] {
        match self {
            Self::Headers => HEADER_RULES,
            Self::Keywords => KEYWORD_RULES,
        }
    }
}

/// Classification of a single backend line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTag<'a> {
    Header(Section),
    /// Cleaned item text (bullet markers stripped).
    Content(&'a str),
    Blank,
}

/// A line matching any needle starts `section`.
struct LineRule {
    section: Section,
    needles: &'static [&'static str],
    /// Needles are lowercase and compared against the lowercased line.
    fold_case: bool,
}

impl LineRule {
    fn matches(&self, line: &str, lower: &str) -> bool {
        let haystack = if self.fold_case { lower } else { line };
        self.needles.iter().any(|n| haystack.contains(n))
    }
}

const HEADER_RULES: &[LineRule] = &[
    LineRule {
        section: Section::Medicines,
        needles: &["POSSIBLE MEDICINES:"],
        fold_case: false,
    },
    LineRule {
        section: Section::Precautions,
        needles: &["PRECAUTIONS:"],
        fold_case: false,
    },
    LineRule {
        section: Section::Locations,
        needles: &["WHERE TO FIND:"],
        fold_case: false,
    },
];

const KEYWORD_RULES: &[LineRule] = &[
    LineRule {
        section: Section::Medicines,
        needles: &["medicine", "medication", "treatment"],
        fold_case: true,
    },
    LineRule {
        section: Section::Precautions,
        needles: &["precaution", "warning", "caution"],
        fold_case: true,
    },
    LineRule {
        section: Section::Locations,
        needles: &["find", "location", "available"],
        fold_case: true,
    },
];

/// Tag one line. First matching rule wins; header lines are consumed.
pub fn classify_line(line: &str, mode: ParseMode) -> LineTag<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineTag::Blank;
    }

    let lower = trimmed.to_lowercase();
    if let Some(rule) = mode.rules().iter().find(|r| r.matches(trimmed, &lower)) {
        return LineTag::Header(rule.section);
    }

    match clean_item(trimmed) {
        "" => LineTag::Blank,
        item => LineTag::Content(item),
    }
}

/// Strip list markers ("- ", "• ", "* ") and trailing dashes.
fn clean_item(line: &str) -> &str {
    let mut rest = line.trim();
    loop {
        if let Some(r) = rest.strip_prefix(['-', '•']) {
            rest = r.trim_start();
        } else if let Some(r) = rest.strip_prefix("* ") {
            rest = r.trim_start();
        } else {
            break;
        }
    }
    rest.trim_end_matches(|c: char| c == '-' || c.is_whitespace())
}

/// Section items exactly as found in the backend text, before defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSections {
    pub medicines: Vec<String>,
    pub precautions: Vec<String>,
    pub locations: Vec<String>,
}

impl ParsedSections {
    fn items_mut(&mut self, section: Section) -> &mut Vec<String> {
        match section {
            Section::Medicines => &mut self.medicines,
            Section::Precautions => &mut self.precautions,
            Section::Locations => &mut self.locations,
        }
    }
}

/// Split backend text into sections. Lines before the first header are dropped.
pub fn parse_sections(raw: &str) -> ParsedSections {
    let mode = ParseMode::detect(raw);
    let mut parsed = ParsedSections::default();
    let mut current: Option<Section> = None;

    for line in raw.lines() {
        match classify_line(line, mode) {
            LineTag::Header(section) => current = Some(section),
            LineTag::Content(item) => {
                if let Some(section) = current {
                    parsed.items_mut(section).push(item.to_string());
                }
            }
            LineTag::Blank => {}
        }
    }

    parsed
}

/// Normalize backend text into advice with all three sections populated.
pub fn normalize(raw: &str, source: AdviceSource, location: Option<&Location>) -> StructuredAdvice {
    let parsed = parse_sections(raw);

    let filled: Vec<Section> = Section::ALL
        .into_iter()
        .filter(|s| match s {
            Section::Medicines => parsed.medicines.is_empty(),
            Section::Precautions => parsed.precautions.is_empty(),
            Section::Locations => parsed.locations.is_empty(),
        })
        .collect();
    if !filled.is_empty() {
        tracing::debug!(?filled, "Sections missing from backend output, using defaults");
    }

    StructuredAdvice {
        medicines: or_defaults(parsed.medicines, DEFAULT_MEDICINES),
        precautions: or_defaults(parsed.precautions, DEFAULT_PRECAUTIONS),
        locations: dedup_preserving_order(or_defaults(parsed.locations, DEFAULT_LOCATIONS)),
        map_link: maps_link(location),
        notice: None,
        source,
    }
}

fn or_defaults(items: Vec<String>, defaults: &[&str]) -> Vec<String> {
    if items.is_empty() {
        defaults.iter().map(|s| s.to_string()).collect()
    } else {
        items
    }
}

/// Drop repeated entries, keeping the first occurrence.
pub(crate) fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::triage::types::BackendKind;

    const LOCAL: AdviceSource = AdviceSource::Backend(BackendKind::Local);

    fn canonical_response() -> &'static str {
        "POSSIBLE MEDICINES:\n\
         1. Paracetamol (Tylenol) - 500mg every 6 hours\n\
         2. Ibuprofen (Advil) - 200mg every 8 hours\n\
         \n\
         PRECAUTIONS:\n\
         - Stay hydrated\n\
         - Avoid alcohol\n\
         - Rest\n\
         \n\
         WHERE TO FIND:\n\
         - Local pharmacy\n\
         - Supermarket health aisle\n"
    }

    #[test]
    fn canonical_layout_round_trips() {
        let advice = normalize(canonical_response(), LOCAL, None);
        assert_eq!(
            advice.medicines,
            vec![
                "1. Paracetamol (Tylenol) - 500mg every 6 hours",
                "2. Ibuprofen (Advil) - 200mg every 8 hours",
            ]
        );
        assert_eq!(advice.precautions, vec!["Stay hydrated", "Avoid alcohol", "Rest"]);
        assert_eq!(advice.locations, vec!["Local pharmacy", "Supermarket health aisle"]);
        assert_eq!(advice.source, LOCAL);
        assert!(advice.notice.is_none());
    }

    #[test]
    fn only_precautions_fills_other_sections_with_defaults() {
        let advice = normalize("PRECAUTIONS:\n- Keep warm\n- Sleep early", LOCAL, None);
        assert_eq!(advice.precautions, vec!["Keep warm", "Sleep early"]);
        assert_eq!(advice.medicines, DEFAULT_MEDICINES);
        assert_eq!(advice.locations, DEFAULT_LOCATIONS);
    }

    #[test]
    fn empty_text_is_all_defaults() {
        let advice = normalize("", LOCAL, None);
        assert_eq!(advice.medicines, DEFAULT_MEDICINES);
        assert_eq!(advice.precautions, DEFAULT_PRECAUTIONS);
        assert_eq!(advice.locations, DEFAULT_LOCATIONS);
    }

    #[test]
    fn leading_whitespace_still_selects_header_mode() {
        assert_eq!(
            ParseMode::detect("\n  POSSIBLE MEDICINES:\n- A"),
            ParseMode::Headers
        );
        assert_eq!(ParseMode::detect("Here you go:\nPOSSIBLE MEDICINES:"), ParseMode::Keywords);
    }

    #[test]
    fn header_mode_is_case_sensitive() {
        let parsed = parse_sections("POSSIBLE MEDICINES:\n- Antacid\nPrecautions:\n- Eat slowly");
        // A lowercase heading is content in header mode.
        assert_eq!(parsed.medicines, vec!["Antacid", "Precautions:", "Eat slowly"]);
        assert!(parsed.precautions.is_empty());
    }

    #[test]
    fn header_mode_drops_text_on_header_line() {
        let parsed = parse_sections("POSSIBLE MEDICINES: see below\n- Zinc lozenges");
        assert_eq!(parsed.medicines, vec!["Zinc lozenges"]);
    }

    #[test]
    fn repeated_header_appends() {
        let parsed = parse_sections(
            "POSSIBLE MEDICINES:\n- A\nPRECAUTIONS:\n- B\nPOSSIBLE MEDICINES:\n- C",
        );
        assert_eq!(parsed.medicines, vec!["A", "C"]);
        assert_eq!(parsed.precautions, vec!["B"]);
    }

    #[test]
    fn keyword_mode_sniffs_prose_headings() {
        let raw = "Sure, here is some guidance.\n\
                   Medications you could consider:\n\
                   Ibuprofen 200mg twice daily\n\
                   Some precautions:\n\
                   Drink plenty of water\n\
                   Where to find them:\n\
                   Any pharmacy nearby";
        let parsed = parse_sections(raw);
        assert_eq!(parsed.medicines, vec!["Ibuprofen 200mg twice daily"]);
        assert_eq!(parsed.precautions, vec!["Drink plenty of water"]);
        assert_eq!(parsed.locations, vec!["Any pharmacy nearby"]);
    }

    #[test]
    fn keyword_mode_skips_lines_before_any_section() {
        let parsed = parse_sections("Hello there\nGood luck\nWarnings\n- Do not drive");
        assert!(parsed.medicines.is_empty());
        assert_eq!(parsed.precautions, vec!["Do not drive"]);
    }

    #[test]
    fn keyword_rules_are_ordered() {
        // "treatment" (medicines) outranks "available" (locations).
        assert_eq!(
            classify_line("Treatment available", ParseMode::Keywords),
            LineTag::Header(Section::Medicines)
        );
        assert_eq!(
            classify_line("CAUTION", ParseMode::Keywords),
            LineTag::Header(Section::Precautions)
        );
    }

    #[test]
    fn classify_line_tags_blank_and_content() {
        assert_eq!(classify_line("   ", ParseMode::Headers), LineTag::Blank);
        assert_eq!(classify_line(" - ", ParseMode::Headers), LineTag::Blank);
        assert_eq!(
            classify_line("  - Rest well  ", ParseMode::Headers),
            LineTag::Content("Rest well")
        );
    }

    #[test]
    fn clean_item_strips_bullets() {
        assert_eq!(clean_item("- item"), "item");
        assert_eq!(clean_item("• item"), "item");
        assert_eq!(clean_item("* item"), "item");
        assert_eq!(clean_item("- - item -"), "item");
        assert_eq!(clean_item("**Bold** entry"), "**Bold** entry");
        assert_eq!(clean_item("1. Numbered stays"), "1. Numbered stays");
    }

    #[test]
    fn locations_are_deduplicated() {
        let advice = normalize(
            "POSSIBLE MEDICINES:\n- A\nWHERE TO FIND:\n- Pharmacy\n- Clinic\n- Pharmacy",
            LOCAL,
            None,
        );
        assert_eq!(advice.locations, vec!["Pharmacy", "Clinic"]);
    }

    #[test]
    fn map_link_uses_coordinates() {
        let loc = Location {
            latitude: 12.9,
            longitude: 77.6,
        };
        let link = maps_link(Some(&loc));
        assert!(link.contains("12.9"));
        assert!(link.contains("77.6"));
        assert_eq!(link, "https://www.google.com/maps/search/pharmacies/@12.9,77.6,15z");
    }

    #[test]
    fn map_link_without_location_is_generic() {
        assert_eq!(maps_link(None), MAPS_SEARCH_URL);
        let advice = normalize(canonical_response(), LOCAL, None);
        assert_eq!(advice.map_link, MAPS_SEARCH_URL);
    }
}
