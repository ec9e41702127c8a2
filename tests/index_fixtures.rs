use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use asr_customization::{IndexConfig, PhraseIndexer, PhraseIndexerBuilder, ReplacementTable};
use libtest_mimic::{Arguments, Failed, Trial};
use serde::Deserialize;

const SUITE_NAME: &str = "phrase_index_matches_fixture";
const LOG_PROB_DELTA: f64 = 1e-9;
const BAN_PHRASES: usize = 100;

#[derive(Debug, Clone, Deserialize)]
struct IndexCase {
    id: String,
    #[serde(default)]
    config: Option<IndexConfig>,
    vocab: Vec<String>,
    alignment: Vec<String>,
    expected: Vec<ExpectedRow>,
    #[serde(default)]
    absent_ngrams: Vec<String>,
    #[serde(default)]
    banned: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ExpectedRow {
    ngram: String,
    phrase: String,
    start: usize,
    span: usize,
    log_prob: f64,
}

#[derive(Debug, PartialEq)]
struct WrittenRow {
    ngram: String,
    phrase: String,
    start: usize,
    span: usize,
    log_prob: f64,
}

fn main() {
    let args = Arguments::from_args();
    let repo_root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));

    let cases = match load_cases(&repo_root.join("test-data/index_cases.json")) {
        Ok(cases) => cases,
        Err(err) => {
            run_setup_failure(&args, err);
            return;
        }
    };
    if cases.is_empty() {
        run_setup_failure(&args, "No index cases found in test-data.".to_string());
        return;
    }

    let mut tests = Vec::with_capacity(cases.len() * 2 + 2);
    for case in cases {
        let deterministic = case.clone();
        tests.push(Trial::test(
            format!("{SUITE_NAME}::case::{}", case.id),
            move || run_case(&case).map_err(Failed::from),
        ));
        tests.push(Trial::test(
            format!("{SUITE_NAME}::deterministic::{}", deterministic.id),
            move || check_deterministic(&deterministic).map_err(Failed::from),
        ));
    }
    tests.push(Trial::test(
        format!("{SUITE_NAME}::ban::cap_holds_until_overflow"),
        || check_ban_after_cap().map_err(Failed::from),
    ));
    tests.push(Trial::test(
        format!("{SUITE_NAME}::threshold::no_posting_at_or_below_min_log_prob"),
        || check_threshold_bound().map_err(Failed::from),
    ));

    libtest_mimic::run(&args, tests).exit();
}

fn run_setup_failure(args: &Arguments, message: String) {
    let test = Trial::test(format!("{SUITE_NAME}::setup"), move || {
        Err(Failed::from(message))
    });
    libtest_mimic::run(args, vec![test]).exit();
}

fn load_cases(path: &Path) -> Result<Vec<IndexCase>, String> {
    let file = File::open(path)
        .map_err(|err| format!("Failed to open fixture '{}': {err}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|err| format!("Failed to parse fixture '{}': {err}", path.display()))
}

fn build_indexer(case: &IndexCase) -> Result<(PhraseIndexer, String), String> {
    let vocab = case.vocab.join("\n");
    let table = ReplacementTable::from_reader(vocab.as_bytes())
        .map_err(|err| format!("{}: vocab rejected: {err}", case.id))?;
    let mut indexer = PhraseIndexerBuilder::new(case.config.clone().unwrap_or_default())
        .with_table(table)
        .build()
        .map_err(|err| format!("{}: build failed: {err}", case.id))?;

    let alignment = case.alignment.join("\n");
    indexer
        .index_alignment_reader(alignment.as_bytes())
        .map_err(|err| format!("{}: indexing failed: {err}", case.id))?;

    let mut buf = Vec::new();
    indexer
        .write_index(&mut buf)
        .map_err(|err| format!("{}: write failed: {err}", case.id))?;
    let text =
        String::from_utf8(buf).map_err(|err| format!("{}: index is not utf-8: {err}", case.id))?;
    Ok((indexer, text))
}

fn parse_rows(text: &str) -> Result<Vec<WrittenRow>, String> {
    text.lines()
        .map(|line| {
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() != 5 {
                return Err(format!("malformed index row '{line}'"));
            }
            let number = |value: &str| {
                value
                    .parse::<usize>()
                    .map_err(|err| format!("bad integer '{value}' in '{line}': {err}"))
            };
            Ok(WrittenRow {
                ngram: fields[0].to_string(),
                phrase: fields[1].to_string(),
                start: number(fields[2])?,
                span: number(fields[3])?,
                log_prob: fields[4]
                    .parse::<f64>()
                    .map_err(|err| format!("bad log_prob in '{line}': {err}"))?,
            })
        })
        .collect()
}

fn run_case(case: &IndexCase) -> Result<(), String> {
    let (indexer, text) = build_indexer(case)?;
    let rows = parse_rows(&text)?;

    if rows.len() != case.expected.len() {
        return Err(format!(
            "{}: row count mismatch (expected {}, got {}):\n{text}",
            case.id,
            case.expected.len(),
            rows.len()
        ));
    }
    for (idx, (expected, observed)) in case.expected.iter().zip(rows.iter()).enumerate() {
        let same_key = observed.ngram == expected.ngram
            && observed.phrase == expected.phrase
            && observed.start == expected.start
            && observed.span == expected.span;
        if !same_key || (observed.log_prob - expected.log_prob).abs() > LOG_PROB_DELTA {
            return Err(format!(
                "{}: row #{idx} mismatch (expected {:?}, got {:?})",
                case.id, expected, observed
            ));
        }
    }

    for ngram in &case.absent_ngrams {
        if rows.iter().any(|row| &row.ngram == ngram) {
            return Err(format!("{}: ngram '{ngram}' should not be indexed", case.id));
        }
    }
    for ngram in &case.banned {
        if !indexer.index().is_banned(ngram) {
            return Err(format!("{}: ngram '{ngram}' should be banned", case.id));
        }
    }
    Ok(())
}

fn check_deterministic(case: &IndexCase) -> Result<(), String> {
    let (_, first) = build_indexer(case)?;
    let (_, second) = build_indexer(case)?;
    if first != second {
        return Err(format!(
            "{}: two runs differ:\n{first}\n---\n{second}",
            case.id
        ));
    }
    Ok(())
}

fn ban_case(phrases: usize) -> IndexCase {
    IndexCase {
        id: format!("ban_{phrases}"),
        config: None,
        vocab: vec!["z\tz\t1\t1\t1".to_string()],
        alignment: (0..phrases)
            .map(|i| format!("good:\tq{i} z\t-\t-"))
            .collect(),
        expected: Vec::new(),
        absent_ngrams: Vec::new(),
        banned: Vec::new(),
    }
}

fn check_ban_after_cap() -> Result<(), String> {
    let (indexer, text) = build_indexer(&ban_case(BAN_PHRASES))?;
    let rows = parse_rows(&text)?;
    let z_rows = rows.iter().filter(|row| row.ngram == "z").count();
    if z_rows != BAN_PHRASES || indexer.index().is_banned("z") {
        return Err(format!(
            "expected {BAN_PHRASES} postings for 'z' before the cap, got {z_rows}"
        ));
    }

    let (indexer, text) = build_indexer(&ban_case(BAN_PHRASES + 1))?;
    let rows = parse_rows(&text)?;
    if !indexer.index().is_banned("z") {
        return Err("'z' should be banned after overflowing the cap".to_string());
    }
    if rows.iter().any(|row| row.ngram == "z") {
        return Err("banned ngram 'z' must not be written".to_string());
    }
    if indexer.index().popularity("z") != (BAN_PHRASES + 1) as u64 {
        return Err(format!(
            "popularity of 'z' should keep counting, got {}",
            indexer.index().popularity("z")
        ));
    }
    Ok(())
}

fn check_threshold_bound() -> Result<(), String> {
    // ln(0.02) ~ -3.91 passes alone; two steps fall under -4.0.
    let case = IndexCase {
        id: "threshold".to_string(),
        config: None,
        vocab: vec![
            "a\tx\t1\t50\t1".to_string(),
            "b\ty\t1\t50\t1".to_string(),
            "c\tw\t1\t60\t1".to_string(),
        ],
        alignment: vec!["good:\ta b c\t-\t-".to_string()],
        expected: Vec::new(),
        absent_ngrams: Vec::new(),
        banned: Vec::new(),
    };
    let (_, text) = build_indexer(&case)?;
    let rows = parse_rows(&text)?;
    let min_log_prob = IndexConfig::default().limits.min_log_prob;
    if let Some(row) = rows.iter().find(|row| row.log_prob <= min_log_prob) {
        return Err(format!("posting at or below threshold: {row:?}"));
    }
    let ngrams: Vec<&str> = rows.iter().map(|row| row.ngram.as_str()).collect();
    if ngrams != ["x", "y"] {
        return Err(format!("expected only single-step postings, got {ngrams:?}"));
    }
    Ok(())
}
