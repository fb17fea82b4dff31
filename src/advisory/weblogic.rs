use std::sync::OnceLock;

use regex::Regex;

use crate::models::WeblogicFlag;

/// Terms that mark a CVE as WebLogic-relevant wherever they appear in its
/// textual fields.
const SIGNAL_TERMS: &[&str] = &["weblogic", "wls", "fusion middleware"];

/// Advisory identifiers historically carried by Oracle WebLogic bulletins:
/// quarterly Critical Patch Update pages, out-of-band alert pages, and the
/// security-alerts section.
fn bulletin_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(cpu(jan|apr|jul|oct)20\d{2}|alert-cve-\d{4}-\d+|security-alert)")
            .expect("bulletin pattern is valid")
    })
}

/// Derive the WebLogic relevance flag for one CVE record.
///
/// Signal priority, first match wins (case-insensitive substring search):
/// affected-software terms, then description terms, then a known bulletin
/// pattern in an extracted advisory URL. File-path data from inventory rows
/// is deliberately not consulted; the two tables are joined only by CVE id.
pub fn classify(
    description: &str,
    affected_software: &str,
    advisories: &[String],
) -> (WeblogicFlag, Option<String>) {
    if let Some(term) = match_term(affected_software) {
        return (WeblogicFlag::Y, Some(term.to_string()));
    }
    if let Some(term) = match_term(description) {
        return (WeblogicFlag::Y, Some(term.to_string()));
    }
    if let Some(url) = advisories
        .iter()
        .find(|url| bulletin_pattern().is_match(url))
    {
        return (WeblogicFlag::Y, Some(url.clone()));
    }
    (WeblogicFlag::N, None)
}

fn match_term(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    SIGNAL_TERMS
        .iter()
        .find(|term| lower.contains(*term))
        .copied()
}
