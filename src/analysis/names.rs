/// Name similarity: split each stem on a delimiter set and group by the
/// leading token.
///
/// Two lookups are offered on top of the same tokenizer, and they are
/// deliberately different:
///
/// - [`search_by_leading_token`] matches the clustering key only.
/// - [`search_by_any_token`] matches any segment of the stem.
///
/// Both compare case-insensitively.
use crate::error::Error;
use crate::model::FileRecord;
use regex::Regex;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameCluster {
    pub token: String,
    pub files: Vec<FileRecord>,
}

/// Splits stems on a set of literal delimiters.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    pattern: Option<Regex>,
}

impl Tokenizer {
    /// Every delimiter is escaped, so `.` splits on a dot and nothing else.
    /// Empty delimiters are ignored; with none left, the stem is one token.
    pub fn new<S: AsRef<str>>(delimiters: &[S]) -> Result<Self, Error> {
        let escaped: Vec<String> = delimiters
            .iter()
            .map(|d| d.as_ref())
            .filter(|d| !d.is_empty())
            .map(regex::escape)
            .collect();

        let pattern = if escaped.is_empty() {
            None
        } else {
            Some(Regex::new(&escaped.join("|"))?)
        };

        Ok(Self { pattern })
    }

    /// Non-empty segments of `stem`, in order, original case.
    pub fn tokens<'a>(&self, stem: &'a str) -> Vec<&'a str> {
        match &self.pattern {
            Some(pattern) => pattern.split(stem).filter(|t| !t.is_empty()).collect(),
            None if stem.is_empty() => Vec::new(),
            None => vec![stem],
        }
    }

    /// First non-empty segment, lower-cased.
    pub fn leading_token(&self, stem: &str) -> Option<String> {
        self.tokens(stem).first().map(|t| t.to_lowercase())
    }
}

/// Clusters of files sharing a leading token. Only tokens with two or more
/// members survive; larger clusters come first, ties in first-occurrence order.
pub fn classify_by_name(records: &[FileRecord], tokenizer: &Tokenizer) -> Vec<NameCluster> {
    let mut clusters: Vec<NameCluster> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let Some(token) = tokenizer.leading_token(&record.stem()) else {
            continue;
        };
        match index.get(&token) {
            Some(&i) => clusters[i].files.push(record.clone()),
            None => {
                index.insert(token.clone(), clusters.len());
                clusters.push(NameCluster {
                    token,
                    files: vec![record.clone()],
                });
            }
        }
    }

    clusters.retain(|cluster| cluster.files.len() >= 2);
    clusters.sort_by(|a, b| b.files.len().cmp(&a.files.len()));
    clusters
}

/// Files whose leading token equals `query`.
pub fn search_by_leading_token(
    records: &[FileRecord],
    tokenizer: &Tokenizer,
    query: &str,
) -> Vec<FileRecord> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }
    records
        .iter()
        .filter(|record| tokenizer.leading_token(&record.stem()).as_deref() == Some(query.as_str()))
        .cloned()
        .collect()
}

/// Files with `query` as any of their tokens.
pub fn search_by_any_token(
    records: &[FileRecord],
    tokenizer: &Tokenizer,
    query: &str,
) -> Vec<FileRecord> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }
    records
        .iter()
        .filter(|record| {
            tokenizer
                .tokens(&record.stem())
                .iter()
                .any(|token| token.to_lowercase() == query)
        })
        .cloned()
        .collect()
}
