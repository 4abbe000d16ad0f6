use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::{HashMap, HashSet};
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref TOKEN: Regex = Regex::new(r"(?u)[\p{L}\p{N}]+").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","cannot","could",
            "did","do","does","doing","down","during",
            "each","few","for","from","further",
            "had","has","have","having","he","her","here","hers","herself","him","himself","his","how",
            "i","if","in","into","is","it","its","itself",
            "me","more","most","my","myself",
            "no","nor","not","of","off","on","once","only","or","other","our","ours","ourselves","out","over","own",
            "same","she","should","so","some","such",
            "than","that","the","their","theirs","them","themselves","then","there","these","they","this","those","through","to","too",
            "under","until","up","very",
            "was","we","were","what","when","where","which","while","who","whom","why","with","would",
            "you","your","yours","yourself","yourselves",
        ];
        words.iter().copied().collect()
    };
    static ref LEMMA_EXCEPTIONS: HashMap<&'static str, &'static str> = {
        let pairs: &[(&str, &str)] = &[
            ("men", "man"), ("women", "woman"), ("children", "child"),
            ("people", "person"), ("mice", "mouse"), ("geese", "goose"),
            ("feet", "foot"), ("teeth", "tooth"), ("lives", "life"),
            ("wives", "wife"), ("knives", "knife"), ("leaves", "leaf"),
            ("ran", "run"), ("went", "go"), ("gone", "go"),
            ("made", "make"), ("said", "say"), ("saw", "see"),
            ("seen", "see"), ("took", "take"), ("taken", "take"),
            ("came", "come"), ("gave", "give"), ("given", "give"),
            ("wrote", "write"), ("written", "write"), ("knew", "know"),
            ("known", "know"), ("found", "find"), ("thought", "think"),
            ("brought", "bring"), ("bought", "buy"), ("held", "hold"),
            ("kept", "keep"), ("met", "meet"), ("paid", "pay"),
            ("sold", "sell"), ("told", "tell"), ("won", "win"),
            ("lost", "lose"), ("grew", "grow"), ("grown", "grow"),
            ("drew", "draw"), ("drawn", "draw"), ("flew", "fly"),
            ("flown", "fly"), ("drove", "drive"), ("driven", "drive"),
            ("ate", "eat"), ("eaten", "eat"), ("fell", "fall"),
            ("fallen", "fall"), ("spoke", "speak"), ("spoken", "speak"),
            ("stood", "stand"), ("sat", "sit"), ("died", "die"),
            ("dying", "die"), ("better", "good"), ("best", "good"),
            ("worse", "bad"), ("worst", "bad"),
        ];
        pairs.iter().copied().collect()
    };
}

/// Token canonicalization strategy. Exactly one is in effect per run;
/// documents and queries must go through the same one or recall silently
/// degrades.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Dictionary base forms: irregular-form table plus inflectional
    /// suffix rules.
    Lemma,
    /// Snowball (English) rule-derived roots.
    Stem,
}

/// Reduces raw text to the canonical token sequence used for both
/// indexing and querying: NFKC fold, lowercase, alphanumeric token split,
/// stopword removal, then lemmatization or stemming per [`Strategy`].
pub struct Normalizer {
    strategy: Strategy,
    stemmer: Stemmer,
}

impl Normalizer {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            stemmer: Stemmer::create(Algorithm::English),
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn normalize(&self, text: &str) -> Vec<String> {
        let folded = text.nfkc().collect::<String>().to_lowercase();
        let mut tokens = Vec::new();
        for mat in TOKEN.find_iter(&folded) {
            let token = mat.as_str();
            if STOPWORDS.contains(token) {
                continue;
            }
            let canonical = match self.strategy {
                Strategy::Stem => self.stemmer.stem(token).to_string(),
                Strategy::Lemma => lemmatize(token),
            };
            // a canonical form can itself land on a stopword (cans -> can);
            // filter again so re-normalizing an output is a no-op
            if canonical.is_empty() || STOPWORDS.contains(canonical.as_str()) {
                continue;
            }
            tokens.push(canonical);
        }
        tokens
    }
}

/// Lemmas must be fixed points of the rules: one rule's output can expose
/// a further suffix (endings -> ending -> end), so reduce until stable.
fn lemmatize(token: &str) -> String {
    let mut current = token.to_string();
    loop {
        let next = lemmatize_once(&current);
        if next == current {
            return next;
        }
        current = next;
    }
}

fn lemmatize_once(token: &str) -> String {
    if let Some(base) = LEMMA_EXCEPTIONS.get(token) {
        return (*base).to_string();
    }
    if let Some(stem) = token.strip_suffix("ies") {
        if stem.len() >= 2 {
            return format!("{stem}y");
        }
    }
    if let Some(stem) = token.strip_suffix("ied") {
        if stem.len() >= 2 {
            return format!("{stem}y");
        }
    }
    // strip -ing/-ed only when the remainder has a vowel, so string,
    // spring, bred and the like keep their accidental suffixes
    if let Some(stem) = token.strip_suffix("ing") {
        if stem.len() >= 3 && has_vowel(stem) {
            return undouble(stem).to_string();
        }
    }
    if let Some(stem) = token.strip_suffix("ed") {
        if stem.len() >= 3 && has_vowel(stem) {
            return undouble(stem).to_string();
        }
    }
    if token.len() > 3
        && token.ends_with('s')
        && !token.ends_with("ss")
        && !token.ends_with("us")
        && !token.ends_with("is")
    {
        return token[..token.len() - 1].to_string();
    }
    token.to_string()
}

fn has_vowel(stem: &str) -> bool {
    stem.bytes()
        .any(|b| matches!(b, b'a' | b'e' | b'i' | b'o' | b'u' | b'y'))
}

// running -> runn -> run, but fall/pass/buzz keep their doubles
fn undouble(stem: &str) -> &str {
    let bytes = stem.as_bytes();
    let n = bytes.len();
    if n >= 2
        && bytes[n - 1] == bytes[n - 2]
        && bytes[n - 1].is_ascii_alphabetic()
        && !matches!(bytes[n - 1], b'l' | b's' | b'z')
    {
        &stem[..n - 1]
    } else {
        stem
    }
}
