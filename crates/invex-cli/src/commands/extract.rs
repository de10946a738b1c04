//! Extract command - pull fields from a single invoice file.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::ProgressBar;
use tracing::{debug, info};

use invex_core::{
    DocumentPipeline, ExtractionEnvelope, InvexConfig, PopplerRasterizer, TesseractRecognizer,
};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file (PDF or image)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Per-page recognition timeout in seconds
    #[arg(short, long)]
    timeout: Option<u64>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON envelope
    Json,
    /// Plain text summary
    Text,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    // Load configuration
    let mut config = if let Some(path) = config_path {
        InvexConfig::from_file(std::path::Path::new(path))?
    } else {
        InvexConfig::default()
    };

    if let Some(timeout) = args.timeout {
        config.ocr.timeout_secs = timeout;
    }

    // Check input file exists
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Extracting fields...");

    let rasterizer = PopplerRasterizer::new(config.raster.clone());
    let recognizer = TesseractRecognizer::new(config.ocr.clone());
    let pipeline = DocumentPipeline::new(rasterizer, recognizer, config);

    let envelope = pipeline.process(&args.input).await?;

    pb.finish_with_message("Done");

    // Format output
    let output = format_envelope(&envelope, args.format)?;

    // Write output
    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn format_envelope(envelope: &ExtractionEnvelope, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(envelope)?),
        OutputFormat::Text => Ok(format_text(envelope)),
    }
}

fn format_text(envelope: &ExtractionEnvelope) -> String {
    let mut output = String::new();

    output.push_str("Fields:\n");
    for (name, value) in envelope.data.iter() {
        output.push_str(&format!("  {}: {}\n", name, value.unwrap_or("-")));
    }

    output.push_str("\n");
    output.push_str(&format!(
        "Pages processed: {}\n",
        envelope.metadata.pages_processed
    ));
    output.push_str(&format!(
        "Text length: {} characters\n",
        envelope.metadata.text_length
    ));

    output
}
