mod inverted;
mod writer;

pub use inverted::{canonical_ngram, InvertedIndex, PostingOutcome};
pub use writer::{format_log_prob, write_index};
