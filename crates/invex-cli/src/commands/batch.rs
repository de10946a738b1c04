//! Batch processing command for multiple invoice files.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use invex_core::{
    DocumentPipeline, ExtractionEnvelope, InvexConfig, PopplerRasterizer, TesseractRecognizer,
};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Directory containing invoice files
    #[arg(required = true)]
    input_dir: PathBuf,

    /// Glob pattern applied inside the input directory
    #[arg(short, long, default_value = "*")]
    pattern: String,

    /// Write a summary CSV to this path
    #[arg(short, long)]
    summary: Option<PathBuf>,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct FileOutcome {
    path: PathBuf,
    envelope: Option<ExtractionEnvelope>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    // Load configuration
    let config = if let Some(path) = config_path {
        InvexConfig::from_file(std::path::Path::new(path))?
    } else {
        InvexConfig::default()
    };

    // Expand glob pattern, keeping only supported file types
    let pattern = args.input_dir.join(&args.pattern);
    let mut files: Vec<PathBuf> = glob(&pattern.to_string_lossy())?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            config.intake.is_allowed(ext)
        })
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!(
            "No matching invoice files found for pattern: {}",
            pattern.display()
        );
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let rasterizer = PopplerRasterizer::new(config.raster.clone());
    let recognizer = TesseractRecognizer::new(config.ocr.clone());
    let pipeline = DocumentPipeline::new(rasterizer, recognizer, config);

    let mut outcomes = Vec::with_capacity(files.len());
    for path in files {
        let file_start = Instant::now();
        let result = pipeline.process(&path).await;
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match result {
            Ok(envelope) => {
                outcomes.push(FileOutcome {
                    path,
                    envelope: Some(envelope),
                    error: None,
                    processing_time_ms,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    outcomes.push(FileOutcome {
                        path,
                        envelope: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed: {}", error_msg);
                }
            }
        }

        overall_pb.inc(1);
    }

    overall_pb.finish_with_message("Complete");

    let successful: Vec<_> = outcomes.iter().filter(|r| r.envelope.is_some()).collect();
    let failed: Vec<_> = outcomes.iter().filter(|r| r.error.is_some()).collect();

    // Generate summary if requested
    if let Some(summary_path) = &args.summary {
        write_summary(summary_path, &outcomes)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
        debug!("Summary rows: {}", outcomes.len());
    }

    // Print summary
    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        outcomes.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for outcome in &failed {
            println!(
                "  - {}: {}",
                outcome.path.display(),
                outcome.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn write_summary(path: &PathBuf, outcomes: &[FileOutcome]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "pages_processed",
        "tax_id",
        "invoice_date",
        "total_amount",
        "processing_time_ms",
        "error",
    ])?;

    for outcome in outcomes {
        let filename = outcome.path.file_name().and_then(|s| s.to_str()).unwrap_or("");

        if let Some(envelope) = &outcome.envelope {
            wtr.write_record([
                filename,
                "success",
                &envelope.metadata.pages_processed.to_string(),
                envelope.data.get("tax_id").unwrap_or(""),
                envelope.data.get("invoice_date").unwrap_or(""),
                envelope.data.get("total_amount").unwrap_or(""),
                &outcome.processing_time_ms.to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                &outcome.processing_time_ms.to_string(),
                outcome.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
