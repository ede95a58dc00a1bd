//! Directory batch processing.
//!
//! Every `*.pdf` in an input directory is outlined independently and written
//! to `<stem>.json` in the output directory. A document that cannot be read
//! or exceeds the page ceiling is reported and skipped; it never stops the
//! rest of the batch.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::outline::{outline_file, OutlineOptions};
use crate::render::{write_json, JsonFormat};

/// Options for a batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Per-document outline options
    pub outline: OutlineOptions,
    /// Process documents in parallel
    pub parallel: bool,
    /// Output JSON layout
    pub format: JsonFormat,
}

impl BatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set per-document outline options.
    pub fn with_outline_options(mut self, outline: OutlineOptions) -> Self {
        self.outline = outline;
        self
    }

    /// Process one document at a time.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set the output JSON layout.
    pub fn with_format(mut self, format: JsonFormat) -> Self {
        self.format = format;
        self
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            outline: OutlineOptions::default(),
            parallel: true,
            format: JsonFormat::Pretty,
        }
    }
}

/// What happened to one input document.
#[derive(Debug)]
pub enum BatchOutcome {
    /// The outline was written.
    Written {
        output: PathBuf,
        headings: usize,
        elapsed: Duration,
        budget_exceeded: bool,
    },
    /// The document was skipped; no output was written.
    Rejected(Error),
}

/// One processed input document.
#[derive(Debug)]
pub struct BatchEntry {
    pub source: PathBuf,
    pub outcome: BatchOutcome,
}

impl BatchEntry {
    pub fn is_written(&self) -> bool {
        matches!(self.outcome, BatchOutcome::Written { .. })
    }
}

/// Result of a batch run, entries in file-name order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub entries: Vec<BatchEntry>,
    pub elapsed: Duration,
}

impl BatchReport {
    /// Number of documents with an output file.
    pub fn written(&self) -> usize {
        self.entries.iter().filter(|e| e.is_written()).count()
    }

    /// Number of documents skipped.
    pub fn rejected(&self) -> usize {
        self.entries.len() - self.written()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// List the PDF files directly inside `dir`, sorted by file name.
///
/// The `.pdf` extension is matched case-insensitively.
pub fn collect_pdf_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_pdf = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf && path.is_file() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Output path for a source document: `<output_dir>/<stem>.json`.
pub fn output_path_for(source: &Path, output_dir: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());
    output_dir.join(format!("{}.json", stem))
}

/// Outline every PDF in `input_dir` into `output_dir`.
///
/// `on_entry` is called as each document finishes, possibly from several
/// threads at once. Only listing the input or creating the output directory
/// can fail the whole run.
pub fn process_directory<F>(
    input_dir: &Path,
    output_dir: &Path,
    options: &BatchOptions,
    on_entry: F,
) -> Result<BatchReport>
where
    F: Fn(&BatchEntry) + Sync,
{
    let started = Instant::now();
    fs::create_dir_all(output_dir)?;
    let files = collect_pdf_files(input_dir)?;
    log::info!(
        "Found {} PDF file(s) in {}",
        files.len(),
        input_dir.display()
    );

    let run = |source: &PathBuf| {
        let entry = BatchEntry {
            source: source.clone(),
            outcome: process_one(source, output_dir, options),
        };
        on_entry(&entry);
        entry
    };

    let entries: Vec<BatchEntry> = if options.parallel {
        files.par_iter().map(run).collect()
    } else {
        files.iter().map(run).collect()
    };

    let report = BatchReport {
        entries,
        elapsed: started.elapsed(),
    };
    log::info!(
        "Batch finished in {:.2}s: {} written, {} skipped",
        report.elapsed.as_secs_f64(),
        report.written(),
        report.rejected()
    );
    Ok(report)
}

fn process_one(source: &Path, output_dir: &Path, options: &BatchOptions) -> BatchOutcome {
    let result = outline_file(source, &options.outline).and_then(|guarded| {
        let output = output_path_for(source, output_dir);
        write_json(&guarded.outline, &output, options.format)?;
        Ok((output, guarded))
    });

    match result {
        Ok((output, guarded)) => {
            log::debug!(
                "{}: {} heading(s) in {:.2}s",
                source.display(),
                guarded.outline.len(),
                guarded.elapsed.as_secs_f64()
            );
            BatchOutcome::Written {
                output,
                headings: guarded.outline.len(),
                elapsed: guarded.elapsed,
                budget_exceeded: guarded.budget_exceeded,
            }
        }
        Err(e) => {
            log::warn!("Skipping {}: {}", source.display(), e);
            BatchOutcome::Rejected(e)
        }
    }
}
