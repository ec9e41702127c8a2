use std::path::Path;

use crate::config::IndexConfig;
use crate::error::IndexError;
use crate::pipeline::defaults::{BoundedCoveringExpander, MarkerCollapsingCanonicalizer};
use crate::pipeline::runtime::{PhraseIndexer, PhraseIndexerParts};
use crate::pipeline::traits::{NgramCanonicalizer, PhraseExpander};
use crate::vocab::ReplacementTable;

pub struct PhraseIndexerBuilder {
    config: IndexConfig,
    table: Option<ReplacementTable>,
    expander: Option<Box<dyn PhraseExpander>>,
    canonicalizer: Option<Box<dyn NgramCanonicalizer>>,
}

impl PhraseIndexerBuilder {
    pub fn new(config: IndexConfig) -> Self {
        Self {
            config,
            table: None,
            expander: None,
            canonicalizer: None,
        }
    }

    /// Uses an already loaded table instead of reading `vocab_path`.
    pub fn with_table(mut self, table: ReplacementTable) -> Self {
        self.table = Some(table);
        self
    }

    pub fn with_expander(mut self, expander: Box<dyn PhraseExpander>) -> Self {
        self.expander = Some(expander);
        self
    }

    pub fn with_canonicalizer(mut self, canonicalizer: Box<dyn NgramCanonicalizer>) -> Self {
        self.canonicalizer = Some(canonicalizer);
        self
    }

    pub fn build(self) -> Result<PhraseIndexer, IndexError> {
        self.config.validate()?;

        let table = match self.table {
            Some(table) => table,
            None => ReplacementTable::load(Path::new(&self.config.vocab_path))?,
        };
        if table.is_empty() {
            tracing::warn!("replacement table is empty; the index will be empty too");
        }

        let limits = self.config.limits;
        Ok(PhraseIndexer::from_parts(PhraseIndexerParts {
            table,
            max_postings_per_ngram: self.config.max_postings_per_ngram,
            expander: self
                .expander
                .unwrap_or_else(|| Box::new(BoundedCoveringExpander { limits })),
            canonicalizer: self
                .canonicalizer
                .unwrap_or_else(|| Box::new(MarkerCollapsingCanonicalizer)),
        }))
    }
}
