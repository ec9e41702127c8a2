use crate::expansion::PhraseCoverings;
use crate::vocab::ReplacementTable;

pub trait PhraseExpander: Send + Sync {
    fn expand(&self, tokens: &[&str], table: &ReplacementTable) -> PhraseCoverings;
}

pub trait NgramCanonicalizer: Send + Sync {
    fn canonicalize(&self, rendering: &str) -> String;
}
