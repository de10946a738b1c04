//! Tools command - check external tool availability.

use clap::{Args, Subcommand};
use console::style;
use tokio::process::Command;
use tracing::debug;

use invex_core::InvexConfig;

/// Arguments for the tools command.
#[derive(Args)]
pub struct ToolsArgs {
    #[command(subcommand)]
    command: ToolsCommand,
}

#[derive(Subcommand)]
enum ToolsCommand {
    /// Verify that pdftoppm and tesseract can be launched
    Check,
}

pub async fn run(args: ToolsArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    match args.command {
        ToolsCommand::Check => check(config_path).await,
    }
}

async fn check(config_path: Option<&str>) -> anyhow::Result<()> {
    let config = if let Some(path) = config_path {
        InvexConfig::from_file(std::path::Path::new(path))?
    } else {
        InvexConfig::default()
    };

    let tools = [
        ("pdftoppm", config.raster.pdftoppm_path.as_str(), "-v"),
        ("tesseract", config.ocr.tesseract_path.as_str(), "--version"),
    ];

    let mut missing = Vec::new();
    for (name, binary, flag) in tools {
        match probe(binary, flag).await {
            Some(banner) => {
                println!("{} {} ({})", style("✓").green(), name, banner);
            }
            None => {
                println!(
                    "{} {} not found (looked for '{}')",
                    style("✗").red(),
                    name,
                    binary
                );
                missing.push(name);
            }
        }
    }

    // Language packs degrade recognition rather than block it, so report
    // them as warnings.
    if !missing.contains(&"tesseract") {
        if let Some(languages) = list_languages(&config.ocr.tesseract_path).await {
            for lang in &config.ocr.languages {
                if languages.iter().any(|l| l == lang) {
                    println!("{} language data: {}", style("✓").green(), lang);
                } else {
                    println!("{} language data missing: {}", style("⚠").yellow(), lang);
                }
            }
        }
    }

    if !missing.is_empty() {
        println!();
        anyhow::bail!(
            "Missing required tools: {}. Install poppler-utils and tesseract-ocr.",
            missing.join(", ")
        );
    }

    println!();
    println!("{} All required tools are available.", style("✓").green());

    Ok(())
}

/// Launch the binary with a version flag and pull the first banner line.
async fn probe(binary: &str, flag: &str) -> Option<String> {
    debug!("Probing {} {}", binary, flag);
    let output = Command::new(binary).arg(flag).output().await.ok()?;

    // pdftoppm prints its version banner on stderr
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let banner = stdout
        .lines()
        .chain(stderr.lines())
        .map(str::trim)
        .find(|line| !line.is_empty());

    Some(banner.unwrap_or("available").to_string())
}

/// Ask tesseract for its installed language packs.
async fn list_languages(binary: &str) -> Option<Vec<String>> {
    let output = Command::new(binary).arg("--list-langs").output().await.ok()?;

    // The listing starts with a banner line ending in ':'
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let languages: Vec<String> = stdout
        .lines()
        .chain(stderr.lines())
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.ends_with(':') && !line.contains(' '))
        .map(str::to_string)
        .collect();

    if languages.is_empty() {
        None
    } else {
        Some(languages)
    }
}
