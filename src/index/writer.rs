use std::io::Write;

use crate::error::IndexError;
use crate::index::InvertedIndex;

/// Writes `ngram \t phrase \t start \t span \t log_prob` rows, most popular
/// ngram first and postings in insertion order. Returns the row count.
pub fn write_index<W: Write>(index: &InvertedIndex, out: &mut W) -> Result<usize, IndexError> {
    let mut rows = 0usize;
    for (ngram, postings) in index.by_popularity() {
        for posting in postings {
            writeln!(
                out,
                "{}\t{}\t{}\t{}\t{}",
                ngram,
                posting.phrase,
                posting.start_position,
                posting.span_length,
                format_log_prob(posting.log_prob)
            )
            .map_err(|e| IndexError::io("write index", e))?;
            rows += 1;
        }
    }
    out.flush().map_err(|e| IndexError::io("flush index", e))?;
    Ok(rows)
}

/// Shortest round-trip form, always with a fractional part.
pub fn format_log_prob(log_prob: f64) -> String {
    format!("{log_prob:?}")
}
