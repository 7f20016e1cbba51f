//! Citation and equation deduplication for merged parser outputs

use crate::types::document::Citation;

/// Whether two citation records refer to the same reference.
///
/// A shared external id (or, failing that, a shared DOI) identifies a
/// reference regardless of how each parser rendered its raw text; with
/// neither resolved on both sides, the full
/// `(external_id, doi, raw_text prefix)` key must match.
fn same_citation(a: &Citation, b: &Citation) -> bool {
    if let (Some(x), Some(y)) = (&a.external_id, &b.external_id) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (&a.doi, &b.doi) {
        return x == y;
    }
    a.dedup_key() == b.dedup_key()
}

/// Merge two citation lists, deduplicating per [`same_citation`].
///
/// The first occurrence of a reference holds its position; when a later
/// record matches it, the one with the longer `context` replaces it in
/// place. Base citations come before additions, so a parser citation
/// only loses to an enricher citation that carries more context.
pub fn merge_citations(base: Vec<Citation>, additions: Vec<Citation>) -> Vec<Citation> {
    let mut merged: Vec<Citation> = Vec::new();

    for citation in base.into_iter().chain(additions) {
        match merged.iter().position(|kept| same_citation(kept, &citation)) {
            Some(slot) => {
                if citation.context.len() > merged[slot].context.len() {
                    merged[slot] = citation;
                }
            }
            None => merged.push(citation),
        }
    }

    merged
}

/// Append equations not already present, comparing exact strings
pub fn merge_equations(equations: &mut Vec<String>, additions: Vec<String>) {
    for equation in additions {
        if !equations.contains(&equation) {
            equations.push(equation);
        }
    }
}
