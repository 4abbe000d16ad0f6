use anyhow::{Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

lazy_static! {
    static ref NON_ALNUM: Regex = Regex::new(r"[^a-zA-Z0-9]").expect("valid regex");
}

/// A corpus entry as extracted from a dump file: the bracket-delimited
/// title and the scrubbed body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    pub id: String,
    pub text: String,
}

/// Replace every non-alphanumeric character with a space.
///
/// Applied to document bodies and to query text alike, so the normalizer
/// downstream only ever sees alphanumeric tokens and whitespace.
pub fn scrub(text: &str) -> String {
    NON_ALNUM.replace_all(text, " ").into_owned()
}

/// `[[Title]]` starts a document; `[[File...` lines are embedded media
/// references inside a body, not boundaries.
fn is_boundary(line: &str) -> bool {
    line.starts_with("[[") && !line.starts_with("[[File")
}

// Strips exactly two characters from each end of the marker line; a
// malformed marker with no closing brackets loses its last two characters
// the same way.
fn doc_id_of(line: &str) -> String {
    let mut chars = line.trim_end().chars();
    for _ in 0..2 {
        chars.next();
        chars.next_back();
    }
    chars.as_str().to_string()
}

/// Enumerate the corpus files under `dir`, sorted so ingestion order (and
/// therefore postings order) is stable within a run. A missing or
/// unreadable directory is fatal.
pub fn corpus_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        anyhow::bail!("corpus directory not found: {}", dir.display());
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry =
            entry.with_context(|| format!("read corpus directory {}", dir.display()))?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Lazy document iterator over a single corpus file.
///
/// Redirect stubs (body contains `REDIRECT` or `redirect`) are skipped;
/// a file ending mid-document yields the partial document rather than an
/// error.
pub struct DocumentIter {
    lines: Lines<BufReader<File>>,
    // next boundary line, already consumed while reading the previous body
    pending: Option<String>,
}

impl DocumentIter {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("open corpus file {}", path.display()))?;
        Ok(Self {
            lines: BufReader::new(file).lines(),
            pending: None,
        })
    }
}

impl Iterator for DocumentIter {
    type Item = Result<RawDocument>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let header = match self.pending.take() {
                Some(line) => line,
                None => loop {
                    match self.lines.next() {
                        None => return None,
                        Some(Err(e)) => return Some(Err(e.into())),
                        Some(Ok(line)) if is_boundary(&line) => break line,
                        // anything before the first boundary belongs to no document
                        Some(Ok(_)) => continue,
                    }
                },
            };

            let id = doc_id_of(&header);
            let mut body = String::new();
            loop {
                match self.lines.next() {
                    None => break,
                    Some(Err(e)) => return Some(Err(e.into())),
                    Some(Ok(line)) => {
                        if is_boundary(&line) {
                            self.pending = Some(line);
                            break;
                        }
                        if !body.is_empty() {
                            body.push(' ');
                        }
                        body.push_str(&line);
                    }
                }
            }

            // Redirect entries carry no answerable content.
            if body.contains("REDIRECT") || body.contains("redirect") {
                continue;
            }

            return Some(Ok(RawDocument {
                id,
                text: scrub(&body),
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn parse(contents: &str) -> Vec<RawDocument> {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        DocumentIter::open(file.path())
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn splits_on_title_markers() {
        let docs = parse("[[Paris]]\nCity of light.\n[[Berlin]]\nGerman capital.\n");
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id, "Paris");
        assert_eq!(docs[1].id, "Berlin");
        assert_eq!(docs[1].text, "German capital ");
    }

    #[test]
    fn file_markers_are_body_lines() {
        let docs = parse("[[Paris]]\nBody.\n[[File:tower.jpg]]\nMore body.\n");
        assert_eq!(docs.len(), 1);
        assert!(docs[0].text.contains("File tower jpg"));
    }

    #[test]
    fn redirects_are_skipped() {
        let docs = parse(
            "[[Old name]]\n#REDIRECT [[New name]]\n[[Kept]]\nreal text\n[[Also old]]\nsee redirect page\n",
        );
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, "Kept");
    }

    #[test]
    fn marker_line_loses_two_chars_each_side() {
        assert_eq!(doc_id_of("[[Paris]]"), "Paris");
        // no closing brackets: the trim still takes two characters
        assert_eq!(doc_id_of("[[Title"), "Tit");
        let docs = parse("[[Unclosed\nbody text\n");
        assert_eq!(docs[0].id, "Unclos");
    }

    #[test]
    fn partial_trailing_document_is_emitted() {
        let docs = parse("[[Only]]\nbody without another marker");
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, "Only");
        assert_eq!(docs[0].text, "body without another marker");
    }

    #[test]
    fn scrub_replaces_punctuation_with_spaces() {
        assert_eq!(scrub("a-b's (c)!"), "a b s  c  ");
        assert_eq!(scrub("already clean 123"), "already clean 123");
    }

    #[test]
    fn missing_corpus_dir_is_fatal() {
        assert!(corpus_files(Path::new("/definitely/not/here")).is_err());
    }
}
