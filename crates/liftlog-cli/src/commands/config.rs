//! Config command handlers

use anyhow::{bail, Result};
use std::path::PathBuf;

use liftlog_core::Config;

use crate::output::Output;

/// Show the current configuration
pub fn show(output: &Output) -> Result<()> {
    let config = Config::load()?;

    if output.is_json() {
        println!(
            "{}",
            serde_json::json!({
                "api_url": config.api_url,
                "data_dir": config.data_dir,
                "config_file": Config::config_file_path(),
            })
        );
    } else {
        println!("api_url:  {}", config.api_url);
        println!("data_dir: {}", config.data_dir.display());
        println!();
        println!("Config file: {}", Config::config_file_path().display());
    }

    Ok(())
}

/// Set a configuration value and save it
pub fn set(key: String, value: String, output: &Output) -> Result<()> {
    let mut config = Config::load()?;

    match key.as_str() {
        "api_url" => config.api_url = value,
        "data_dir" => config.data_dir = PathBuf::from(value),
        _ => bail!("Unknown config key: {} (expected api_url or data_dir)", key),
    }

    config.save()?;
    output.success(&format!("Set {}", key));
    Ok(())
}
