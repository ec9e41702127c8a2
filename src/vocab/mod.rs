use std::io::Write;

use crate::error::IndexError;
use crate::types::ReplacementRow;

pub mod alignment_file;
pub mod extraction;
pub mod table;

pub use alignment_file::{parse_alignment_line, split_tokens};
pub use extraction::{FragmentMode, ReplacementCounts};
pub use table::{ReplacementCandidate, ReplacementTable};

/// Writes rows in the format [`ReplacementTable::from_reader`] reads back.
pub fn write_replacement_rows<W: Write>(
    out: &mut W,
    rows: impl IntoIterator<Item = ReplacementRow>,
) -> Result<usize, IndexError> {
    let mut written = 0usize;
    for row in rows {
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}",
            row.source, row.target, row.joint_freq, row.source_freq, row.target_freq
        )
        .map_err(|e| IndexError::io("write replacement vocab", e))?;
        written += 1;
    }
    Ok(written)
}
