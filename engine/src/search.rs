use crate::index::InvertedIndex;
use std::collections::HashMap;

/// One ranked retrieval result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub doc_id: String,
    pub score: u32,
}

/// Rank documents against a normalized query by uniform term overlap:
/// every query token present in the index credits each document in that
/// term's postings with the document's term frequency. No IDF and no
/// length normalization; this is boolean/term-count similarity.
///
/// Equal scores keep first-encountered order during aggregation, which
/// follows postings insertion order. That tie-break is
/// implementation-defined but stable within a run.
pub fn search(index: &InvertedIndex, query: &[String], k: usize) -> Vec<Hit> {
    let mut slot: HashMap<&str, usize> = HashMap::new();
    let mut hits: Vec<Hit> = Vec::new();
    for term in query {
        if let Some(postings) = index.postings(term) {
            for posting in postings {
                match slot.get(posting.doc_id.as_str()).copied() {
                    Some(i) => hits[i].score += posting.freq,
                    None => {
                        slot.insert(posting.doc_id.as_str(), hits.len());
                        hits.push(Hit {
                            doc_id: posting.doc_id.clone(),
                            score: posting.freq,
                        });
                    }
                }
            }
        }
    }
    // stable sort: ties stay in first-encountered order
    hits.sort_by(|a, b| b.score.cmp(&a.score));
    hits.truncate(k);
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::NormalizedDocument;

    fn index(docs: &[(&str, &str)]) -> InvertedIndex {
        InvertedIndex::from_documents(docs.iter().map(|(id, text)| NormalizedDocument {
            id: id.to_string(),
            tokens: text.split_whitespace().map(str::to_string).collect(),
        }))
    }

    fn query(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn aggregates_term_frequencies_across_query_tokens() {
        let idx = index(&[
            ("paris", "capital france paris paris"),
            ("berlin", "capital germany berlin"),
        ]);
        let hits = search(&idx, &query("capital france"), 2);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].doc_id, "paris");
        assert_eq!(hits[0].score, 2);
        assert_eq!(hits[1].doc_id, "berlin");
        assert_eq!(hits[1].score, 1);
    }

    #[test]
    fn term_frequency_weights_the_score() {
        let idx = index(&[("a", "rust rust rust"), ("b", "rust")]);
        let hits = search(&idx, &query("rust"), 2);
        assert_eq!(hits[0].doc_id, "a");
        assert_eq!(hits[0].score, 3);
        assert_eq!(hits[1].score, 1);
    }

    #[test]
    fn unknown_vocabulary_returns_empty_result() {
        let idx = index(&[("a", "something")]);
        assert!(search(&idx, &query("entirely different words"), 1).is_empty());
        assert!(search(&idx, &[], 1).is_empty());
    }

    #[test]
    fn ties_keep_first_encountered_order() {
        let idx = index(&[("first", "shared"), ("second", "shared")]);
        let hits = search(&idx, &query("shared"), 2);
        assert_eq!(hits[0].doc_id, "first");
        assert_eq!(hits[1].doc_id, "second");
    }

    #[test]
    fn truncates_to_k() {
        let idx = index(&[("a", "x"), ("b", "x"), ("c", "x")]);
        assert_eq!(search(&idx, &query("x"), 1).len(), 1);
    }
}
