use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::info;

use crate::config::ColsumConfig;
use crate::html::summarize_html;

/// Process a page once: read it, sum every table, write the augmented copy.
pub fn run_command(input: PathBuf, output: Option<PathBuf>, config: &ColsumConfig) -> Result<()> {
    info!("Summing tables in {:?}", input);

    if !input.exists() {
        return Err(anyhow::anyhow!("Input file not found: {:?}", input));
    }

    let html = std::fs::read_to_string(&input)?;
    let (result, stats) = summarize_html(&html, config)?;

    let output_path = output.unwrap_or_else(|| {
        let mut path = input.clone();
        let stem = path.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
        path.set_file_name(format!("{}_summed.html", stem));
        path
    });

    std::fs::write(&output_path, &result)?;
    info!("Augmented page saved to {:?}", output_path);

    println!("Calculation complete!");
    println!("   {}", stats.summary());
    println!("   Output file: {:?}", output_path);

    Ok(())
}

/// Persist the autorun preference.
pub fn autorun_command(enabled: bool, config_path: &Path) -> Result<()> {
    let mut config = ColsumConfig::load_or_default(config_path)?;
    config.autorun = enabled;
    config.save_to_file(config_path)?;

    println!(
        "{}",
        if enabled {
            "Auto-run enabled"
        } else {
            "Auto-run disabled"
        }
    );
    Ok(())
}

/// Show the active configuration.
pub fn status_command(config: &ColsumConfig, config_path: &Path) -> Result<()> {
    println!("colsum configuration ({:?})", config_path);
    println!("=========================");
    println!("Auto-run: {}", if config.autorun { "on" } else { "off" });
    println!("Recompute delay: {}ms", config.recompute_delay_ms);
    println!("Rescan delay: {}ms", config.rescan_delay_ms);
    println!("Log level: {}", config.log_level);
    Ok(())
}
