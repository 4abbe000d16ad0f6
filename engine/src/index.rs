use crate::corpus::{corpus_files, DocumentIter};
use crate::normalize::Normalizer;
use anyhow::Result;
use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::path::Path;

/// A document's term frequency for one indexed term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    pub doc_id: String,
    pub freq: u32,
}

/// Build lifecycle of an index. Transitions are one-directional:
/// `Empty` → `Building` → `Ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexState {
    #[default]
    Empty,
    Building,
    Ready,
}

/// A document after normalization, ready for indexing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDocument {
    pub id: String,
    pub tokens: Vec<String>,
}

/// Returned when a structural mutation is attempted on a frozen index.
/// This is a programming error, not a recoverable runtime condition.
#[derive(Debug)]
pub struct IndexFrozenError;

impl fmt::Display for IndexFrozenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("inverted index is frozen; no further documents may be added")
    }
}

impl Error for IndexFrozenError {}

/// Term → postings map with raw term frequencies. No corpus-level
/// statistics are kept (no IDF, no length normalization), so the build is
/// strictly incremental and order-independent across documents.
///
/// Postings within a term keep document arrival order; that order is what
/// breaks score ties downstream, so it is implementation-defined but
/// stable for the duration of a run.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    postings: HashMap<String, Vec<Posting>>,
    state: IndexState,
    num_docs: usize,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> IndexState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == IndexState::Ready
    }

    pub fn num_docs(&self) -> usize {
        self.num_docs
    }

    pub fn num_terms(&self) -> usize {
        self.postings.len()
    }

    pub fn postings(&self, term: &str) -> Option<&[Posting]> {
        self.postings.get(term).map(Vec::as_slice)
    }

    /// Add one normalized document's term frequencies. Duplicate ids are
    /// tolerated; they simply contribute separate postings.
    pub fn add_document(&mut self, id: &str, tokens: &[String]) -> Result<(), IndexFrozenError> {
        if self.state == IndexState::Ready {
            return Err(IndexFrozenError);
        }
        self.state = IndexState::Building;
        self.num_docs += 1;

        let mut counts: HashMap<&str, u32> = HashMap::new();
        let mut first_seen: Vec<&str> = Vec::new();
        for token in tokens {
            let count = counts.entry(token.as_str()).or_insert(0);
            if *count == 0 {
                first_seen.push(token.as_str());
            }
            *count += 1;
        }
        for term in first_seen {
            self.postings
                .entry(term.to_string())
                .or_default()
                .push(Posting {
                    doc_id: id.to_string(),
                    freq: counts[term],
                });
        }
        Ok(())
    }

    /// Transition to `Ready`. After this no mutation is possible.
    pub fn freeze(&mut self) {
        self.state = IndexState::Ready;
    }

    pub fn from_documents<I>(documents: I) -> Self
    where
        I: IntoIterator<Item = NormalizedDocument>,
    {
        let mut index = Self::new();
        for doc in documents {
            index
                .add_document(&doc.id, &doc.tokens)
                .expect("index under construction is never frozen");
        }
        index.freeze();
        index
    }
}

/// Ingest every corpus file under `dir` and return a frozen index. The
/// build runs to completion before the index becomes visible, so no query
/// can observe a partially built one.
pub fn build_from_dir(dir: &Path, normalizer: &Normalizer) -> Result<InvertedIndex> {
    let files = corpus_files(dir)?;
    let total = files.len();
    let mut index = InvertedIndex::new();
    for (num, path) in files.iter().enumerate() {
        tracing::info!(file = %path.display(), num = num + 1, total, "indexing file");
        for document in DocumentIter::open(path)? {
            let document = document?;
            let tokens = normalizer.normalize(&document.text);
            index.add_document(&document.id, &tokens)?;
        }
    }
    index.freeze();
    tracing::info!(
        num_docs = index.num_docs(),
        num_terms = index.num_terms(),
        "index build complete"
    );
    Ok(index)
}
