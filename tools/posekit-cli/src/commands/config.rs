//! Show or write the effective configuration.

use std::path::PathBuf;

use posekit_common::config::{config_file_path, AppConfig};

pub fn run(config: &AppConfig, path: Option<PathBuf>, write: bool) -> anyhow::Result<()> {
    if write {
        let written = match path {
            Some(path) => {
                config.save_to(&path)?;
                path
            }
            None => config.save()?,
        };
        println!("Config written to: {}", written.display());
        return Ok(());
    }

    let source = path.unwrap_or_else(config_file_path);
    println!("# {}", source.display());
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
