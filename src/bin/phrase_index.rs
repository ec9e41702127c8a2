use std::io::Write;
use std::path::PathBuf;

use asr_customization::{
    write_replacement_rows, ExtractionConfig, FragmentMode, IndexConfig, PhraseIndexerBuilder,
    ReplacementCounts,
};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

#[path = "phrase_index/progress.rs"]
mod progress;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Count aligned fragments of up to N tokens into a replacement vocab.
    #[value(name = "get-replacement-vocab", alias = "get_replacement_vocab")]
    GetReplacementVocab,
    /// Count whole-word misspell fragments, dropping rare replacements.
    #[value(name = "get-sub-misspells", alias = "get_sub_misspells")]
    GetSubMisspells,
    /// Expand every phrase through the replacement vocab and write the ngram index.
    #[value(name = "index-by-vocab", alias = "index_by_vocab")]
    IndexByVocab,
}

impl Mode {
    fn as_str(self) -> &'static str {
        match self {
            Self::GetReplacementVocab => "get_replacement_vocab",
            Self::GetSubMisspells => "get_sub_misspells",
            Self::IndexByVocab => "index_by_vocab",
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "phrase_index")]
#[command(about = "Build replacement vocabularies and custom-phrase ngram indexes")]
struct Args {
    #[arg(long, env = "PHRASE_INDEX_MODE", value_enum)]
    mode: Mode,
    /// Alignment file with `good:\tsource\ttarget\talignment` lines.
    #[arg(long, env = "PHRASE_INDEX_ALIGNMENT_FILE")]
    alignment_file: PathBuf,
    #[arg(long, env = "PHRASE_INDEX_OUT_FILE")]
    out_file: PathBuf,
    #[arg(long, env = "PHRASE_INDEX_VOCAB_FILE")]
    vocab_file: PathBuf,
    /// JSON index config; explicit flags below take precedence.
    #[arg(long, env = "PHRASE_INDEX_CONFIG")]
    config: Option<PathBuf>,
    #[arg(long, env = "PHRASE_INDEX_MAX_POSTINGS")]
    max_postings_per_ngram: Option<usize>,
    #[arg(long, env = "PHRASE_INDEX_MIN_LOG_PROB", allow_hyphen_values = true)]
    min_log_prob: Option<f64>,
    #[arg(long, env = "PHRASE_INDEX_MAX_RENDERING_CHARS")]
    max_rendering_chars: Option<usize>,
    #[arg(
        long,
        env = "PHRASE_INDEX_MAX_FRAGMENT_TOKENS",
        default_value_t = ExtractionConfig::DEFAULT_MAX_FRAGMENT_TOKENS
    )]
    max_fragment_tokens: usize,
    #[arg(long, env = "PHRASE_INDEX_QUIET", default_value_t = false)]
    quiet: bool,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if let Err(err) = run(&args) {
        tracing::error!(mode = args.mode.as_str(), "{err}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), String> {
    match args.mode {
        Mode::GetReplacementVocab => extract(args, FragmentMode::SlidingWindows),
        Mode::GetSubMisspells => extract(args, FragmentMode::WordFragments),
        Mode::IndexByVocab => index_by_vocab(args),
    }
}

fn extract(args: &Args, mode: FragmentMode) -> Result<(), String> {
    let config = ExtractionConfig {
        max_fragment_tokens: args.max_fragment_tokens,
        ..ExtractionConfig::default()
    };
    if config.max_fragment_tokens == 0 {
        return Err("--max-fragment-tokens must be >= 1.".to_string());
    }

    let (reader, progress) = progress::open_with_progress(
        &args.alignment_file,
        "counting fragments",
        args.quiet,
    )?;
    let counts = ReplacementCounts::from_alignment_reader(reader, mode, &config)
        .map_err(|err| err.to_string())?;
    progress.finish_and_clear();

    let out_path = match mode {
        FragmentMode::SlidingWindows => &args.vocab_file,
        FragmentMode::WordFragments => &args.out_file,
    };
    let mut out = progress::create_output(out_path)?;
    let written = match mode {
        FragmentMode::SlidingWindows => write_replacement_rows(&mut out, counts.rows()),
        FragmentMode::WordFragments => write_replacement_rows(
            &mut out,
            counts.misspell_rows(config.min_misspell_probability),
        ),
    }
    .map_err(|err| err.to_string())?;
    out.flush()
        .map_err(|err| format!("Failed to flush '{}': {err}", out_path.display()))?;

    tracing::info!(
        mode = mode.as_str(),
        rows = written,
        out = %out_path.display(),
        "replacement vocab written"
    );
    Ok(())
}

fn index_by_vocab(args: &Args) -> Result<(), String> {
    let mut config = match args.config.as_ref() {
        Some(path) => IndexConfig::load(path).map_err(|err| err.to_string())?,
        None => IndexConfig::default(),
    };
    config.vocab_path = args.vocab_file.to_string_lossy().into_owned();
    if let Some(max_postings) = args.max_postings_per_ngram {
        config.max_postings_per_ngram = max_postings;
    }
    if let Some(min_log_prob) = args.min_log_prob {
        config.limits.min_log_prob = min_log_prob;
    }
    if let Some(max_chars) = args.max_rendering_chars {
        config.limits.max_rendering_chars = max_chars;
    }

    // Fails on a missing vocab before the alignment file is touched.
    let mut indexer = PhraseIndexerBuilder::new(config)
        .build()
        .map_err(|err| err.to_string())?;

    let (reader, progress) =
        progress::open_with_progress(&args.alignment_file, "indexing phrases", args.quiet)?;
    let stats = indexer
        .index_alignment_reader(reader)
        .map_err(|err| err.to_string())?;
    progress.finish_and_clear();
    tracing::info!(
        lines = stats.lines_read,
        phrases = stats.phrases_indexed,
        skipped = stats.lines_skipped,
        "phrases indexed"
    );

    let mut out = progress::create_output(&args.out_file)?;
    indexer
        .write_index(&mut out)
        .map_err(|err| err.to_string())?;
    Ok(())
}
