/// Token standing for an explicit space between words.
pub const SPACE_TOKEN: &str = "_";
/// Alignment marker for a source token with no counterpart in the target.
pub const DELETE_MARKER: &str = "<DELETE>";
/// Placeholder a deletion marker is rewritten to inside a rendering.
pub const DELETE_PLACEHOLDER: char = '=';
/// Joins several target characters aligned to one source token.
pub const JOIN_MARKER: char = '+';
/// First field of an alignment line that was aligned successfully.
pub const GOOD_ALIGNMENT_TAG: &str = "good:";

/// One line of the replacement table file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementRow {
    pub source: String,
    pub target: String,
    pub joint_freq: u64,
    pub source_freq: u64,
    pub target_freq: u64,
}

impl ReplacementRow {
    pub fn probability(&self) -> f64 {
        self.joint_freq as f64 / self.source_freq as f64
    }
}

/// Facets of a `good:` alignment line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignedTriple<'a> {
    pub source: &'a str,
    pub target: &'a str,
    pub alignment: &'a str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexPosting {
    pub phrase: String,
    /// Token position in the phrase where the rendering starts.
    pub start_position: usize,
    /// Number of space-delimited pieces in the rendering before canonicalization.
    pub span_length: usize,
    pub log_prob: f64,
}

/// Counters reported after an indexing pass over an alignment file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    pub lines_read: usize,
    pub phrases_indexed: usize,
    pub lines_skipped: usize,
}
