use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use indicatif::{ProgressBar, ProgressBarIter, ProgressStyle};

/// Byte-based progress over an input file; hidden when `quiet` is set.
pub fn file_progress(len: u64, label: &str, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let progress = ProgressBar::new(len);
    progress.set_style(
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({eta}) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-"),
    );
    progress.set_message(label.to_string());
    progress
}

pub fn open_with_progress(
    path: &Path,
    label: &str,
    quiet: bool,
) -> Result<(BufReader<ProgressBarIter<File>>, ProgressBar), String> {
    let file = File::open(path)
        .map_err(|err| format!("Failed to open '{}': {err}", path.display()))?;
    let len = file.metadata().map(|m| m.len()).unwrap_or(0);
    let progress = file_progress(len, label, quiet);
    Ok((BufReader::new(progress.wrap_read(file)), progress))
}

pub fn create_output(path: &Path) -> Result<BufWriter<File>, String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| {
                format!(
                    "Failed to create output directory '{}': {err}",
                    parent.display()
                )
            })?;
        }
    }
    let file = File::create(path)
        .map_err(|err| format!("Failed to create output file '{}': {err}", path.display()))?;
    Ok(BufWriter::new(file))
}
