use std::path::Path;

use anyhow::{bail, Result};

use autoboard_core::AppConfig;

pub fn run(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "Config file already exists: {}\nUse --force to overwrite it.",
            path.display()
        );
    }

    AppConfig::default().save_to(path)?;
    println!("Wrote default config to {}", path.display());

    Ok(())
}
