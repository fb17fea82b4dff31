/// Marker substring identifying an official Oracle publication URL.
///
/// A heuristic, not a URL validator: a non-advisory oracle.com link is
/// admitted too.
const ORACLE_MARKER: &str = "oracle.com";

/// Extract candidate Oracle advisory URLs from a references field.
///
/// The field holds multiple URLs/tokens joined by `;` or `,` (mixed
/// delimiters allowed). Tokens are trimmed, empties dropped, and a token is
/// kept iff its lowercase form contains `oracle.com`. First-occurrence order
/// is preserved and identical duplicates are kept.
pub fn extract_advisories(references_text: &str) -> Vec<String> {
    // One lowered copy serves both the containment scan and the per-token
    // matches; most records reference no Oracle URL at all.
    let lowered = references_text.to_lowercase();
    if !lowered.contains(ORACLE_MARKER) {
        return Vec::new();
    }

    // Lowercasing never produces the delimiter characters, so both splits
    // yield the same token sequence.
    references_text
        .split([';', ','])
        .zip(lowered.split([';', ',']))
        .map(|(token, lower)| (token.trim(), lower.trim()))
        .filter(|(token, _)| !token.is_empty())
        .filter(|(_, lower)| lower.contains(ORACLE_MARKER))
        .map(|(token, _)| token.to_string())
        .collect()
}
