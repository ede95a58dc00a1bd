//! pdfoutline CLI - PDF outline extraction tool

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfoutline::{
    outline_file, process_directory, render, BatchEntry, BatchOptions, BatchOutcome, JsonFormat,
    OutlineOptions, ParseOptions,
};

#[derive(Parser)]
#[command(name = "pdfoutline")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract titles and heading outlines from PDF files", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Directory to read PDF files from
    #[arg(value_name = "INPUT_DIR", env = "PDFOUTLINE_INPUT", default_value = "/app/input")]
    input: PathBuf,

    /// Directory to write JSON outlines to
    #[arg(value_name = "OUTPUT_DIR", env = "PDFOUTLINE_OUTPUT", default_value = "/app/output")]
    output: PathBuf,

    /// Process one document at a time
    #[arg(long)]
    sequential: bool,

    #[command(flatten)]
    limits: LimitArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Clone)]
struct LimitArgs {
    /// Reject documents with more pages than this
    #[arg(long, value_name = "N", default_value_t = pdfoutline::outline::MAX_PAGES)]
    max_pages: u32,

    /// Advisory per-document time budget in seconds
    #[arg(long, value_name = "SECS", default_value_t = pdfoutline::outline::TIME_BUDGET.as_secs())]
    timeout: u64,

    /// Skip pages that fail to decode instead of rejecting the document
    #[arg(long)]
    lenient: bool,

    /// Output compact JSON
    #[arg(long)]
    compact: bool,
}

impl LimitArgs {
    fn outline_options(&self) -> OutlineOptions {
        let parse = if self.lenient {
            ParseOptions::new().lenient()
        } else {
            ParseOptions::new()
        };
        OutlineOptions::new()
            .with_max_pages(self.max_pages)
            .with_time_budget(Duration::from_secs(self.timeout))
            .with_parse_options(parse)
    }

    fn json_format(&self) -> JsonFormat {
        if self.compact {
            JsonFormat::Compact
        } else {
            JsonFormat::Pretty
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Outline a single PDF file
    File {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        limits: LimitArgs,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::File {
            input,
            output,
            limits,
        }) => cmd_file(&input, output.as_deref(), &limits),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => cmd_batch(&cli.input, &cli.output, cli.sequential, &cli.limits),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_batch(
    input: &Path,
    output: &Path,
    sequential: bool,
    limits: &LimitArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(output)?;
    if !input.exists() {
        fs::create_dir_all(input)?;
        println!(
            "{} {}",
            "Created input directory".yellow(),
            input.display()
        );
        println!("Place PDF files there and run again.");
        return Ok(());
    }

    let total = pdfoutline::batch::collect_pdf_files(input)?.len();
    if total == 0 {
        println!("{} {}", "No PDF files found in".yellow(), input.display());
        return Ok(());
    }

    let mut options = BatchOptions::new()
        .with_outline_options(limits.outline_options())
        .with_format(limits.json_format());
    if sequential {
        options = options.sequential();
    }

    log::debug!("Processing {} file(s), parallel={}", total, options.parallel);
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let report = process_directory(input, output, &options, |entry| {
        pb.println(describe(entry));
        pb.inc(1);
    })?;
    pb.finish_and_clear();

    println!(
        "\n{} {} written, {} skipped in {:.2}s",
        "Done:".green().bold(),
        report.written(),
        report.rejected(),
        report.elapsed.as_secs_f64()
    );
    println!("  {} {}", "└─".dimmed(), output.display());

    Ok(())
}

fn describe(entry: &BatchEntry) -> String {
    let name = entry
        .source
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    match &entry.outcome {
        BatchOutcome::Written {
            output,
            headings,
            elapsed,
            budget_exceeded,
        } => {
            let line = format!(
                "{} {} -> {} ({} headings, {:.2}s)",
                "✓".green(),
                name,
                output.display(),
                headings,
                elapsed.as_secs_f64()
            );
            if *budget_exceeded {
                format!("{} {}", line, "[over time budget]".yellow())
            } else {
                line
            }
        }
        BatchOutcome::Rejected(e) => format!("{} {}: {}", "✗".red(), name, e),
    }
}

fn cmd_file(
    input: &Path,
    output: Option<&Path>,
    limits: &LimitArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    log::info!("Outlining {}", input.display());
    let guarded = outline_file(input, &limits.outline_options())?;
    if guarded.budget_exceeded {
        eprintln!(
            "{} processing took {:.2}s",
            "Warning:".yellow().bold(),
            guarded.elapsed.as_secs_f64()
        );
    }

    let json = render::to_json(&guarded.outline, limits.json_format())?;
    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdfoutline".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF outline extraction tool");
    println!();
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_batch_defaults() {
        let cli = Cli::try_parse_from(["pdfoutline"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.limits.max_pages, 50);
        assert_eq!(cli.limits.timeout, 10);
        assert!(!cli.sequential);
    }

    #[test]
    fn test_batch_directories() {
        let cli = Cli::try_parse_from(["pdfoutline", "in", "out", "--max-pages", "5"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("in"));
        assert_eq!(cli.output, PathBuf::from("out"));
        assert_eq!(cli.limits.outline_options().max_pages, 5);
    }

    #[test]
    fn test_file_subcommand() {
        let cli =
            Cli::try_parse_from(["pdfoutline", "file", "doc.pdf", "-o", "doc.json", "--compact"])
                .unwrap();
        match cli.command {
            Some(Commands::File {
                input,
                output,
                limits,
            }) => {
                assert_eq!(input, PathBuf::from("doc.pdf"));
                assert_eq!(output, Some(PathBuf::from("doc.json")));
                assert_eq!(limits.json_format(), JsonFormat::Compact);
            }
            _ => panic!("expected file subcommand"),
        }
    }

    #[test]
    fn test_batch_on_temp_dirs() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        fs::write(input.path().join("junk.pdf"), b"junk").unwrap();

        let limits = Cli::try_parse_from(["pdfoutline"]).unwrap().limits;
        cmd_batch(input.path(), output.path(), true, &limits).unwrap();
        assert!(!output.path().join("junk.json").exists());
    }

    #[test]
    fn test_batch_creates_output_without_inputs() {
        let root = tempfile::tempdir().unwrap();
        let input = root.path().join("input");
        let output = root.path().join("output");

        let limits = Cli::try_parse_from(["pdfoutline"]).unwrap().limits;
        cmd_batch(&input, &output, false, &limits).unwrap();
        assert!(input.is_dir());
        assert!(output.is_dir());

        let empty_output = root.path().join("empty-output");
        cmd_batch(&input, &empty_output, false, &limits).unwrap();
        assert!(empty_output.is_dir());
    }
}
