//! Default config dump

use anyhow::{Context, Result};
use sweetbite_toppings::EmitterConfig;

pub fn run() -> Result<()> {
    let text = EmitterConfig::default()
        .to_toml_string()
        .context("Failed to serialize default config")?;
    print!("{text}");
    Ok(())
}
