//! Per-document limits around the inference pipeline.

use std::path::Path;
use std::time::{Duration, Instant};

use super::{infer_outline, OutlineOptions};
use crate::error::{Error, Result};
use crate::model::{Document, StructuredOutline};
use crate::parser::PdfParser;

/// An outline together with how the run went.
#[derive(Debug, Clone)]
pub struct GuardedOutline {
    /// The inferred outline
    pub outline: StructuredOutline,
    /// Pages in the source document
    pub page_count: u32,
    /// Wall-clock time for the whole run
    pub elapsed: Duration,
    /// Whether `elapsed` exceeded the advisory time budget
    pub budget_exceeded: bool,
}

/// Outline a PDF file: detect, load, check the page ceiling, parse, infer.
///
/// Unreadable files and documents over the page ceiling are errors. Going
/// over the time budget is not; it is flagged on the result and logged.
pub fn outline_file<P: AsRef<Path>>(path: P, options: &OutlineOptions) -> Result<GuardedOutline> {
    let path = path.as_ref();
    let started = Instant::now();
    let parser = PdfParser::open_with_options(path, options.parse.clone())?;
    run(&parser, options, started, &path.display().to_string())
}

/// Outline a PDF held in memory.
pub fn outline_bytes(data: &[u8], options: &OutlineOptions) -> Result<GuardedOutline> {
    let started = Instant::now();
    let parser = PdfParser::from_bytes_with_options(data, options.parse.clone())?;
    run(&parser, options, started, "<memory>")
}

/// Outline an already-parsed document under the same limits.
pub fn guard_document(document: &Document, options: &OutlineOptions) -> Result<GuardedOutline> {
    let started = Instant::now();
    check_page_count(document.page_count(), options.max_pages)?;
    let outline = infer_outline(document, options);
    Ok(finish(
        outline,
        document.page_count(),
        started,
        options.time_budget,
        "<document>",
    ))
}

fn run(
    parser: &PdfParser,
    options: &OutlineOptions,
    started: Instant,
    source: &str,
) -> Result<GuardedOutline> {
    let page_count = parser.page_count();
    check_page_count(page_count, options.max_pages)?;

    let document = parser.parse()?;
    let outline = infer_outline(&document, options);
    Ok(finish(
        outline,
        page_count,
        started,
        options.time_budget,
        source,
    ))
}

fn check_page_count(pages: u32, limit: u32) -> Result<()> {
    if pages > limit {
        return Err(Error::TooManyPages { pages, limit });
    }
    Ok(())
}

fn finish(
    outline: StructuredOutline,
    page_count: u32,
    started: Instant,
    budget: Duration,
    source: &str,
) -> GuardedOutline {
    let elapsed = started.elapsed();
    let budget_exceeded = elapsed > budget;
    if budget_exceeded {
        log::warn!(
            "{} took {:.2}s to process, over the {:.0}s budget",
            source,
            elapsed.as_secs_f64(),
            budget.as_secs_f64()
        );
    }
    GuardedOutline {
        outline,
        page_count,
        elapsed,
        budget_exceeded,
    }
}
