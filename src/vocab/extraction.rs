use std::collections::HashMap;
use std::io::BufRead;

use crate::config::ExtractionConfig;
use crate::error::IndexError;
use crate::types::{AlignedTriple, ReplacementRow, DELETE_MARKER, JOIN_MARKER, SPACE_TOKEN};
use crate::vocab::alignment_file::{parse_alignment_line, split_tokens};

const PROGRESS_EVERY_LINES: usize = 100_000;

/// How aligned fragments are cut out of a source/alignment pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentMode {
    /// Every window of up to `max_fragment_tokens` aligned tokens.
    SlidingWindows,
    /// Whole words, split where both sides align a space token, counted in clean form.
    WordFragments,
}

impl FragmentMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SlidingWindows => "sliding_windows",
            Self::WordFragments => "word_fragments",
        }
    }
}

#[derive(Debug, Default)]
struct SourceCounts {
    source: String,
    total: u64,
    targets: Vec<(String, u64)>,
    target_lookup: HashMap<String, usize>,
}

/// Joint, per-source and per-target fragment counts, in first-seen order.
#[derive(Debug, Default)]
pub struct ReplacementCounts {
    sources: Vec<SourceCounts>,
    source_lookup: HashMap<String, usize>,
    target_totals: HashMap<String, u64>,
}

impl ReplacementCounts {
    pub fn from_alignment_reader(
        reader: impl BufRead,
        mode: FragmentMode,
        config: &ExtractionConfig,
    ) -> Result<Self, IndexError> {
        let mut counts = Self::default();
        let mut used = 0usize;
        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| IndexError::io("read alignment file", e))?;
            if (idx + 1) % PROGRESS_EVERY_LINES == 0 {
                tracing::debug!(lines = idx + 1, "extraction: progress");
            }
            let Some(triple) = parse_alignment_line(&line) else {
                continue;
            };
            counts.add_triple(&triple, idx + 1, mode, config)?;
            used += 1;
        }
        tracing::info!(
            mode = mode.as_str(),
            aligned_lines = used,
            sources = counts.sources.len(),
            "extraction: counted replacement fragments"
        );
        Ok(counts)
    }

    pub fn add_triple(
        &mut self,
        triple: &AlignedTriple<'_>,
        line: usize,
        mode: FragmentMode,
        config: &ExtractionConfig,
    ) -> Result<(), IndexError> {
        let inputs = split_tokens(triple.source);
        let replacements = split_tokens(triple.alignment);
        if inputs.len() != replacements.len() {
            return Err(IndexError::LengthMismatch {
                line,
                source_tokens: inputs.len(),
                alignment_tokens: replacements.len(),
            });
        }

        match mode {
            FragmentMode::SlidingWindows => {
                // Window ends past the phrase clamp to it, so tail fragments are
                // counted once per overhanging end.
                let n = inputs.len();
                for begin in 0..n {
                    for end in begin + 1..=begin + config.max_fragment_tokens {
                        let end = end.min(n);
                        self.add_fragment(&inputs[begin..end], &replacements[begin..end], false);
                    }
                }
            }
            FragmentMode::WordFragments => {
                let mut begin = 0;
                for i in 0..inputs.len() {
                    // Aligned spaces on both sides are a safe word border.
                    if inputs[i] == SPACE_TOKEN && replacements[i] == SPACE_TOKEN {
                        self.add_fragment(&inputs[begin..i], &replacements[begin..i], true);
                        begin = i + 1;
                    }
                }
                if begin > 0 {
                    self.add_fragment(&inputs[begin..], &replacements[begin..], true);
                }
                self.add_fragment(&inputs, &replacements, true);
            }
        }
        Ok(())
    }

    pub fn add_fragment(&mut self, inputs: &[&str], replacements: &[&str], clean: bool) {
        if inputs.is_empty() && replacements.is_empty() {
            return;
        }
        let mut source = inputs.join(" ");
        let mut target = replacements.join(" ");
        if clean {
            target = clean_target(&target);
            source = clean_source(&source);
        }

        *self.target_totals.entry(target.clone()).or_default() += 1;
        let idx = match self.source_lookup.get(&source) {
            Some(&idx) => idx,
            None => {
                self.sources.push(SourceCounts {
                    source: source.clone(),
                    ..SourceCounts::default()
                });
                self.source_lookup.insert(source, self.sources.len() - 1);
                self.sources.len() - 1
            }
        };
        let entry = &mut self.sources[idx];
        entry.total += 1;
        match entry.target_lookup.get(&target) {
            Some(&t) => entry.targets[t].1 += 1,
            None => {
                entry.targets.push((target.clone(), 1));
                entry.target_lookup.insert(target, entry.targets.len() - 1);
            }
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = ReplacementRow> + '_ {
        self.sources.iter().flat_map(move |entry| {
            entry.targets.iter().map(move |(target, joint)| ReplacementRow {
                source: entry.source.clone(),
                target: target.clone(),
                joint_freq: *joint,
                source_freq: entry.total,
                target_freq: self.target_totals.get(target).copied().unwrap_or(0),
            })
        })
    }

    /// Rows kept for a misspell vocabulary: non-empty target and a joint/source
    /// ratio strictly above `min_probability`.
    pub fn misspell_rows(&self, min_probability: f64) -> impl Iterator<Item = ReplacementRow> + '_ {
        self.rows()
            .filter(move |row| !row.target.is_empty() && row.probability() > min_probability)
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }
}

fn clean_target(target: &str) -> String {
    target
        .replace(DELETE_MARKER, "")
        .replace(JOIN_MARKER, "")
        .replace(' ', "")
        .replace(SPACE_TOKEN, " ")
}

fn clean_source(source: &str) -> String {
    source.replace(' ', "").replace(SPACE_TOKEN, " ")
}
