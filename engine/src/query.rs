use crate::corpus::scrub;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

/// One trivia record: category, clue, and the gold answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    pub category: String,
    pub clue: String,
    pub answer: String,
}

impl Question {
    /// Category and clue joined into the retrieval query text, with the
    /// same character scrub the corpus parser applies to document bodies.
    pub fn query_text(&self) -> String {
        scrub(&format!("{} {}", self.category, self.clue))
    }
}

/// Reads repeating three-line question records. Blank lines between
/// records are tolerated and skipped; a truncated trailing record ends
/// the sequence without error.
pub struct QuestionReader<R> {
    lines: Lines<R>,
}

impl QuestionReader<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("open question file {}", path.display()))?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> QuestionReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }

    fn next_line(&mut self) -> Option<std::io::Result<String>> {
        loop {
            match self.lines.next() {
                Some(Ok(line)) if line.trim().is_empty() => continue,
                other => return other,
            }
        }
    }
}

impl<R: BufRead> Iterator for QuestionReader<R> {
    type Item = Result<Question>;

    fn next(&mut self) -> Option<Self::Item> {
        let category = match self.next_line()? {
            Ok(line) => line,
            Err(e) => return Some(Err(e.into())),
        };
        let clue = match self.next_line() {
            Some(Ok(line)) => line,
            Some(Err(e)) => return Some(Err(e.into())),
            None => return None,
        };
        let answer = match self.next_line() {
            Some(Ok(line)) => line,
            Some(Err(e)) => return Some(Err(e.into())),
            None => return None,
        };
        Some(Ok(Question {
            category,
            clue,
            answer,
        }))
    }
}
