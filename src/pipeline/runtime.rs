use std::io::{BufRead, Write};

use crate::error::IndexError;
use crate::index::{write_index, InvertedIndex};
use crate::pipeline::traits::{NgramCanonicalizer, PhraseExpander};
use crate::types::IndexStats;
use crate::vocab::{parse_alignment_line, split_tokens, ReplacementTable};

const PROGRESS_EVERY_LINES: usize = 1_000;

/// Owns the replacement table and the index for one indexing run.
pub struct PhraseIndexer {
    table: ReplacementTable,
    index: InvertedIndex,
    expander: Box<dyn PhraseExpander>,
    canonicalizer: Box<dyn NgramCanonicalizer>,
    stats: IndexStats,
}

pub(crate) struct PhraseIndexerParts {
    pub table: ReplacementTable,
    pub max_postings_per_ngram: usize,
    pub expander: Box<dyn PhraseExpander>,
    pub canonicalizer: Box<dyn NgramCanonicalizer>,
}

impl PhraseIndexer {
    pub(crate) fn from_parts(parts: PhraseIndexerParts) -> Self {
        Self {
            table: parts.table,
            index: InvertedIndex::new(parts.max_postings_per_ngram),
            expander: parts.expander,
            canonicalizer: parts.canonicalizer,
            stats: IndexStats::default(),
        }
    }

    pub fn index_phrase(&mut self, phrase: &str) {
        let tokens = split_tokens(phrase);
        let coverings = self.expander.expand(&tokens, &self.table);
        let canonicalizer = &self.canonicalizer;
        self.index.add_coverings(phrase, &coverings, |rendering| {
            canonicalizer.canonicalize(rendering)
        });
        self.stats.phrases_indexed += 1;
    }

    /// Indexes the source facet of a `good:` line. Returns false when the
    /// line was skipped.
    pub fn index_alignment_line(&mut self, line: &str) -> bool {
        self.stats.lines_read += 1;
        let Some(triple) = parse_alignment_line(line) else {
            self.stats.lines_skipped += 1;
            return false;
        };
        self.index_phrase(triple.source);
        true
    }

    pub fn index_alignment_reader(&mut self, reader: impl BufRead) -> Result<IndexStats, IndexError> {
        for line in reader.lines() {
            let line = line.map_err(|e| IndexError::io("read alignment file", e))?;
            self.index_alignment_line(&line);
            if self.stats.lines_read % PROGRESS_EVERY_LINES == 0 {
                tracing::debug!(
                    lines = self.stats.lines_read,
                    ngrams = self.index.ngram_count(),
                    "indexer: progress"
                );
            }
        }
        Ok(self.stats)
    }

    pub fn write_index<W: Write>(&self, out: &mut W) -> Result<usize, IndexError> {
        let rows = write_index(&self.index, out)?;
        tracing::info!(
            lines_read = self.stats.lines_read,
            phrases = self.stats.phrases_indexed,
            skipped = self.stats.lines_skipped,
            ngrams = self.index.ngram_count(),
            banned = self.index.banned_count(),
            rows,
            "indexer: index written"
        );
        Ok(rows)
    }

    pub fn stats(&self) -> IndexStats {
        self.stats
    }

    pub fn table(&self) -> &ReplacementTable {
        &self.table
    }

    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }

    pub fn into_index(self) -> InvertedIndex {
        self.index
    }
}
