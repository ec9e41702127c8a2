use crate::types::{AlignedTriple, GOOD_ALIGNMENT_TAG};

const ALIGNMENT_FIELDS: usize = 4;

/// Parses `good:\tsource\ttarget\talignment`. Any other shape is skipped.
pub fn parse_alignment_line(line: &str) -> Option<AlignedTriple<'_>> {
    let fields: Vec<&str> = line.trim().split('\t').collect();
    if fields.len() != ALIGNMENT_FIELDS || fields[0] != GOOD_ALIGNMENT_TAG {
        return None;
    }
    Some(AlignedTriple {
        source: fields[1],
        target: fields[2],
        alignment: fields[3],
    })
}

/// Phrases are tokenized on single spaces; doubled spaces yield empty tokens.
pub fn split_tokens(phrase: &str) -> Vec<&str> {
    phrase.split(' ').collect()
}
