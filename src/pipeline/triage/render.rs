// Markup-ready HTML fragment for a normalized result.
// Backend text is untrusted: every item is escaped before it reaches the page.

use std::fmt::Write as _;

use super::types::{Section, StructuredAdvice};

const MAPS_ICON_URL: &str = "https://maps.google.com/mapfiles/ms/icons/red-dot.png";

/// Render advice as `div.medical-response` holding one `div.response-section`
/// per section, with the map-link block inside the locations section.
pub fn render_html(advice: &StructuredAdvice) -> String {
    let mut html = String::from(r#"<div class="medical-response">"#);

    if let Some(notice) = &advice.notice {
        html.push_str("\n    <div class=\"response-section notice\">\n");
        html.push_str("        <h3>⚠️ IMPORTANT NOTE:</h3>\n");
        let _ = writeln!(html, "        <p>{}</p>", escape_html(notice));
        html.push_str("    </div>\n");
    }

    for section in Section::ALL {
        let _ = write!(
            html,
            "\n    <div class=\"response-section\">\n        <h3>{} {}</h3>\n        <ul>\n",
            section.icon(),
            section.header()
        );
        for item in advice.section(section) {
            let _ = writeln!(html, "            <li>{}</li>", escape_html(item));
        }
        html.push_str("        </ul>\n");

        if section == Section::Locations {
            let _ = write!(
                html,
                r#"        <div class="maps-link">
            <a href="{}" target="_blank" rel="noopener noreferrer" class="google-maps-btn">
                <img src="{MAPS_ICON_URL}" alt="Maps Icon" width="20" height="20">
                View Nearby Pharmacies on Google Maps
            </a>
        </div>
"#,
                escape_html(&advice.map_link)
            );
        }
        html.push_str("    </div>\n");
    }

    html.push_str("</div>");
    html
}

/// Escape the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::triage::normalize::{maps_link, normalize};
    use crate::pipeline::triage::types::{AdviceSource, BackendKind, Location};

    fn sample_advice() -> StructuredAdvice {
        normalize(
            "POSSIBLE MEDICINES:\n- Cetirizine\nPRECAUTIONS:\n- Avoid pollen\nWHERE TO FIND:\n- Pharmacy",
            AdviceSource::Backend(BackendKind::Cloud),
            None,
        )
    }

    #[test]
    fn sections_render_in_fixed_order() {
        let html = render_html(&sample_advice());
        let med = html.find("🏥 POSSIBLE MEDICINES:").unwrap();
        let pre = html.find("⚠️ PRECAUTIONS:").unwrap();
        let loc = html.find("🔍 WHERE TO FIND:").unwrap();
        assert!(med < pre && pre < loc);
        assert!(html.starts_with(r#"<div class="medical-response">"#));
        assert!(html.ends_with("</div>"));
    }

    #[test]
    fn items_render_as_list_entries() {
        let html = render_html(&sample_advice());
        assert!(html.contains("<li>Cetirizine</li>"));
        assert!(html.contains("<li>Avoid pollen</li>"));
        assert!(html.contains("<li>Pharmacy</li>"));
        assert_eq!(html.matches(r#"<div class="response-section">"#).count(), 3);
    }

    #[test]
    fn map_link_block_follows_locations() {
        let mut advice = sample_advice();
        advice.map_link = maps_link(Some(&Location {
            latitude: 48.85,
            longitude: 2.35,
        }));
        let html = render_html(&advice);
        let loc = html.find("WHERE TO FIND:").unwrap();
        let maps = html.find(r#"<div class="maps-link">"#).unwrap();
        assert!(maps > loc);
        assert!(html.contains("pharmacies/@48.85,2.35,15z"));
    }

    #[test]
    fn notice_renders_before_sections() {
        let mut advice = sample_advice();
        advice.notice = Some("See a doctor".into());
        let html = render_html(&advice);
        let notice = html.find("IMPORTANT NOTE:").unwrap();
        let med = html.find("POSSIBLE MEDICINES:").unwrap();
        assert!(notice < med);
        assert!(html.contains("<p>See a doctor</p>"));
    }

    #[test]
    fn backend_markup_is_escaped() {
        let advice = normalize(
            "POSSIBLE MEDICINES:\n- <script>alert('x')</script>",
            AdviceSource::Backend(BackendKind::Local),
            None,
        );
        let html = render_html(&advice);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#x27;x&#x27;)&lt;/script&gt;"));
    }

    #[test]
    fn escape_html_handles_ampersand_and_quotes() {
        assert_eq!(escape_html(r#"A & "B""#), "A &amp; &quot;B&quot;");
        assert_eq!(escape_html("plain"), "plain");
    }
}
