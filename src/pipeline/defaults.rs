use crate::config::ExpansionLimits;
use crate::expansion::{expand_phrase, PhraseCoverings};
use crate::index::canonical_ngram;
use crate::pipeline::traits::{NgramCanonicalizer, PhraseExpander};
use crate::vocab::ReplacementTable;

pub struct BoundedCoveringExpander {
    pub limits: ExpansionLimits,
}

impl PhraseExpander for BoundedCoveringExpander {
    fn expand(&self, tokens: &[&str], table: &ReplacementTable) -> PhraseCoverings {
        expand_phrase(tokens, table, &self.limits)
    }
}

pub struct MarkerCollapsingCanonicalizer;

impl NgramCanonicalizer for MarkerCollapsingCanonicalizer {
    fn canonicalize(&self, rendering: &str) -> String {
        canonical_ngram(rendering)
    }
}
