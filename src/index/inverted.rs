use std::collections::{HashMap, HashSet};

use crate::expansion::{consumed_tokens, PhraseCoverings};
use crate::types::{IndexPosting, DELETE_PLACEHOLDER, JOIN_MARKER};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostingOutcome {
    Added,
    /// This posting pushed the ngram over the cap; its postings were dropped.
    Banned,
    AlreadyBanned,
    /// The rendering canonicalized to an empty ngram.
    Skipped,
}

#[derive(Debug)]
struct NgramEntry {
    ngram: String,
    popularity: u64,
    postings: Vec<IndexPosting>,
}

/// Noisy ngram to phrase-occurrence index with a per-ngram posting cap.
///
/// Popularity counts every generation of an ngram, including those that
/// arrive after it was banned. Ngrams remember the order they were first
/// seen, which breaks popularity ties when the index is written.
#[derive(Debug)]
pub struct InvertedIndex {
    entries: Vec<NgramEntry>,
    lookup: HashMap<String, usize>,
    banned: HashSet<String>,
    max_postings: usize,
}

impl InvertedIndex {
    pub fn new(max_postings: usize) -> Self {
        Self {
            entries: Vec::new(),
            lookup: HashMap::new(),
            banned: HashSet::new(),
            max_postings,
        }
    }

    /// Adds every covering of `phrase`, start by start and best score first.
    pub fn add_coverings(
        &mut self,
        phrase: &str,
        coverings: &PhraseCoverings,
        canonicalize: impl Fn(&str) -> String,
    ) {
        for (start, covering) in coverings.iter() {
            for (rendering, log_prob) in covering.ranked() {
                let posting = IndexPosting {
                    phrase: phrase.to_string(),
                    start_position: start,
                    span_length: consumed_tokens(rendering),
                    log_prob,
                };
                self.record(canonicalize(rendering), posting);
            }
        }
    }

    pub fn record(&mut self, ngram: String, posting: IndexPosting) -> PostingOutcome {
        if ngram.is_empty() {
            return PostingOutcome::Skipped;
        }
        let idx = match self.lookup.get(&ngram) {
            Some(&idx) => idx,
            None => {
                self.entries.push(NgramEntry {
                    ngram: ngram.clone(),
                    popularity: 0,
                    postings: Vec::new(),
                });
                self.lookup.insert(ngram.clone(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };

        let entry = &mut self.entries[idx];
        entry.popularity += 1;
        if self.banned.contains(&ngram) {
            return PostingOutcome::AlreadyBanned;
        }

        entry.postings.push(posting);
        if entry.postings.len() > self.max_postings {
            entry.postings = Vec::new();
            tracing::debug!(
                ngram = ngram.as_str(),
                popularity = entry.popularity,
                "index: ngram banned"
            );
            self.banned.insert(ngram);
            return PostingOutcome::Banned;
        }
        PostingOutcome::Added
    }

    pub fn popularity(&self, ngram: &str) -> u64 {
        self.lookup
            .get(ngram)
            .map_or(0, |&idx| self.entries[idx].popularity)
    }

    pub fn postings(&self, ngram: &str) -> &[IndexPosting] {
        self.lookup
            .get(ngram)
            .map(|&idx| self.entries[idx].postings.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_banned(&self, ngram: &str) -> bool {
        self.banned.contains(ngram)
    }

    pub fn banned_count(&self) -> usize {
        self.banned.len()
    }

    pub fn ngram_count(&self) -> usize {
        self.entries.len()
    }

    pub fn posting_count(&self) -> usize {
        self.entries.iter().map(|e| e.postings.len()).sum()
    }

    /// Ngrams with their postings, most popular first. Banned ngrams come
    /// back with no postings.
    pub fn by_popularity(&self) -> Vec<(&str, &[IndexPosting])> {
        let mut order: Vec<&NgramEntry> = self.entries.iter().collect();
        order.sort_by(|a, b| b.popularity.cmp(&a.popularity));
        order
            .into_iter()
            .map(|e| (e.ngram.as_str(), e.postings.as_slice()))
            .collect()
    }
}

/// Turns placeholder and join markers into spaces and collapses whitespace.
pub fn canonical_ngram(rendering: &str) -> String {
    rendering
        .replace(|c: char| c == JOIN_MARKER || c == DELETE_PLACEHOLDER, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
