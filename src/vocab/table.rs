use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::IndexError;
use crate::types::ReplacementRow;

const ROW_FIELDS: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct ReplacementCandidate {
    pub target: String,
    /// `joint_freq / source_freq`, always in (0, 1].
    pub probability: f64,
}

/// Source n-gram to noisy target lookup, immutable once loaded.
///
/// Candidates keep the order in which their rows first appeared, so every
/// downstream traversal is deterministic for a given table file.
#[derive(Debug, Clone, Default)]
pub struct ReplacementTable {
    sources: HashMap<String, Vec<ReplacementCandidate>>,
}

impl ReplacementTable {
    pub fn load(path: &Path) -> Result<Self, IndexError> {
        if !path.exists() {
            return Err(IndexError::MissingVocab {
                path: path.to_path_buf(),
            });
        }
        let file = File::open(path).map_err(|e| IndexError::io("open replacement vocab", e))?;
        let table = Self::from_reader(BufReader::new(file))?;
        tracing::info!(
            path = %path.display(),
            sources = table.source_count(),
            candidates = table.candidate_count(),
            "replacement table loaded"
        );
        Ok(table)
    }

    pub fn from_reader(reader: impl BufRead) -> Result<Self, IndexError> {
        let mut table = Self::default();
        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| IndexError::io("read replacement vocab", e))?;
            let row = parse_row(&line, idx + 1)?;
            table.insert_row(&row, idx + 1)?;
        }
        Ok(table)
    }

    /// Rows are numbered from 1 in error messages.
    pub fn from_rows(rows: impl IntoIterator<Item = ReplacementRow>) -> Result<Self, IndexError> {
        let mut table = Self::default();
        for (idx, row) in rows.into_iter().enumerate() {
            table.insert_row(&row, idx + 1)?;
        }
        Ok(table)
    }

    fn insert_row(&mut self, row: &ReplacementRow, line: usize) -> Result<(), IndexError> {
        validate_row(row, line)?;
        let probability = row.probability();
        let candidates = self.sources.entry(row.source.clone()).or_default();
        match candidates.iter_mut().find(|c| c.target == row.target) {
            Some(existing) => existing.probability = probability,
            None => candidates.push(ReplacementCandidate {
                target: row.target.clone(),
                probability,
            }),
        }
        Ok(())
    }

    pub fn candidates(&self, source: &str) -> Option<&[ReplacementCandidate]> {
        self.sources.get(source).map(Vec::as_slice)
    }

    pub fn probability(&self, source: &str, target: &str) -> Option<f64> {
        self.candidates(source)?
            .iter()
            .find(|c| c.target == target)
            .map(|c| c.probability)
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    pub fn candidate_count(&self) -> usize {
        self.sources.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

pub fn parse_row(line: &str, line_no: usize) -> Result<ReplacementRow, IndexError> {
    let fields: Vec<&str> = line.trim().split('\t').collect();
    if fields.len() != ROW_FIELDS {
        return Err(IndexError::parse(
            "replacement vocab",
            line_no,
            format!(
                "expected {ROW_FIELDS} tab-separated fields, got {}",
                fields.len()
            ),
        ));
    }
    let count = |name: &str, value: &str| {
        value.parse::<u64>().map_err(|e| {
            IndexError::parse(
                "replacement vocab",
                line_no,
                format!("{name} '{value}' is not a count: {e}"),
            )
        })
    };
    Ok(ReplacementRow {
        source: fields[0].to_string(),
        target: fields[1].to_string(),
        joint_freq: count("joint_freq", fields[2])?,
        source_freq: count("source_freq", fields[3])?,
        target_freq: count("target_freq", fields[4])?,
    })
}

fn validate_row(row: &ReplacementRow, line: usize) -> Result<(), IndexError> {
    if row.source.is_empty() || row.target.is_empty() {
        return Err(IndexError::invalid_row(
            line,
            format!("src={}; dst={}", row.source, row.target),
        ));
    }
    if row.source_freq == 0 {
        return Err(IndexError::invalid_row(line, "source_freq must be positive"));
    }
    if row.joint_freq == 0 || row.joint_freq > row.source_freq {
        return Err(IndexError::invalid_row(
            line,
            format!(
                "joint_freq {} must be in 1..={}",
                row.joint_freq, row.source_freq
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(source: &str, target: &str, joint: u64, total: u64) -> ReplacementRow {
        ReplacementRow {
            source: source.to_string(),
            target: target.to_string(),
            joint_freq: joint,
            source_freq: total,
            target_freq: joint,
        }
    }

    #[test]
    fn probability_is_joint_over_source() {
        let table =
            ReplacementTable::from_rows([row("a b", "x", 1, 2), row("a b", "y", 1, 4)]).unwrap();
        assert_eq!(table.probability("a b", "x"), Some(0.5));
        assert_eq!(table.probability("a b", "y"), Some(0.25));
        assert_eq!(table.source_count(), 1);
        assert_eq!(table.candidate_count(), 2);
    }

    #[test]
    fn candidates_keep_file_order_and_later_rows_override() {
        let table = ReplacementTable::from_rows([
            row("a", "q", 1, 10),
            row("a", "p", 2, 10),
            row("a", "q", 5, 10),
        ])
        .unwrap();
        let targets: Vec<&str> = table
            .candidates("a")
            .unwrap()
            .iter()
            .map(|c| c.target.as_str())
            .collect();
        assert_eq!(targets, vec!["q", "p"]);
        assert_eq!(table.probability("a", "q"), Some(0.5));
    }

    #[test]
    fn zero_source_freq_is_rejected() {
        let err = ReplacementTable::from_rows([row("a", "b", 0, 0)]).unwrap_err();
        assert!(matches!(err, IndexError::InvalidRow { line: 1, .. }));
    }

    #[test]
    fn joint_above_source_is_rejected() {
        let err = ReplacementTable::from_rows([row("a", "b", 3, 2)]).unwrap_err();
        assert!(matches!(err, IndexError::InvalidRow { .. }));
    }

    #[test]
    fn empty_target_is_rejected() {
        let err = ReplacementTable::from_rows([row("a", "", 1, 1)]).unwrap_err();
        assert!(matches!(err, IndexError::InvalidRow { .. }));
    }

    #[test]
    fn wrong_field_count_is_fatal() {
        let data = "a\tb\t1\t2\t3\nc\td\t1\t2\n";
        let err = ReplacementTable::from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, IndexError::Parse { line: 2, .. }));
    }

    #[test]
    fn non_numeric_count_is_fatal() {
        let err = parse_row("a\tb\tone\t2\t3", 1).unwrap_err();
        assert!(err.to_string().contains("joint_freq"));
    }

    #[test]
    fn reader_parses_tab_separated_rows() {
        let data = "a b\tx\t1\t2\t7\nb c\ty\t3\t4\t3\n";
        let table = ReplacementTable::from_reader(data.as_bytes()).unwrap();
        assert_eq!(table.probability("a b", "x"), Some(0.5));
        assert_eq!(table.probability("b c", "y"), Some(0.75));
        assert!(table.candidates("c").is_none());
    }

    #[test]
    fn missing_file_reports_missing_vocab() {
        let dir = tempfile::tempdir().unwrap();
        let err = ReplacementTable::load(&dir.path().join("absent.txt")).unwrap_err();
        assert!(matches!(err, IndexError::MissingVocab { .. }));
    }
}
