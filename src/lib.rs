pub mod config;
pub mod error;
pub mod expansion;
pub mod index;
pub mod pipeline;
pub mod types;
pub mod vocab;

pub use config::{ExpansionLimits, ExtractionConfig, IndexConfig};
pub use error::IndexError;
pub use index::{write_index, InvertedIndex};
pub use pipeline::builder::PhraseIndexerBuilder;
pub use pipeline::runtime::PhraseIndexer;
pub use pipeline::traits::{NgramCanonicalizer, PhraseExpander};
pub use types::{AlignedTriple, IndexPosting, IndexStats, ReplacementRow};
pub use vocab::{write_replacement_rows, FragmentMode, ReplacementCounts, ReplacementTable};
