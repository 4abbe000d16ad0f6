//! Lexical question answering over a fixed text corpus.
//!
//! The pipeline: parse corpus files into documents, normalize their text,
//! build an in-memory inverted index once, then answer trivia questions
//! (category + clue) by uniform term-overlap retrieval and score the
//! top-1 predictions against gold answers.

pub mod corpus;
pub mod eval;
pub mod index;
pub mod normalize;
pub mod query;
pub mod search;

pub use eval::{EvalRecord, EvalSummary};
pub use index::{IndexFrozenError, IndexState, InvertedIndex, NormalizedDocument, Posting};
pub use normalize::{Normalizer, Strategy};
pub use query::{Question, QuestionReader};
pub use search::{search, Hit};

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Batch facade tying the pipeline together: the corpus location, the one
/// normalizer shared by documents and queries, and the index.
///
/// The index is built at most once per engine. Every query entry point
/// goes through [`Engine::ensure_index`], so a not-yet-ready engine
/// builds before the first question is answered and a query can never
/// observe a partially built index.
pub struct Engine {
    corpus_dir: PathBuf,
    normalizer: Normalizer,
    index: InvertedIndex,
}

impl Engine {
    pub fn new(corpus_dir: impl Into<PathBuf>, strategy: Strategy) -> Self {
        Self {
            corpus_dir: corpus_dir.into(),
            normalizer: Normalizer::new(strategy),
            index: InvertedIndex::new(),
        }
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }

    /// Build the index from the corpus directory if it is not ready yet.
    pub fn ensure_index(&mut self) -> Result<()> {
        if !self.index.is_ready() {
            self.index = index::build_from_dir(&self.corpus_dir, &self.normalizer)?;
        }
        Ok(())
    }

    /// Top-1 retrieval for a single question.
    pub fn answer(&mut self, question: &Question) -> Result<Option<Hit>> {
        self.ensure_index()?;
        let tokens = self.normalizer.normalize(&question.query_text());
        Ok(search(&self.index, &tokens, 1).into_iter().next())
    }

    /// Evaluate a whole question file against the corpus.
    pub fn evaluate(&mut self, questions: &Path) -> Result<EvalSummary> {
        self.ensure_index()?;
        let reader = QuestionReader::open(questions)?;
        eval::evaluate(&self.index, &self.normalizer, reader)
    }
}
