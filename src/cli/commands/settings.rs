//! Configuration display command.

use anyhow::bail;

use crate::config::{self, Config};

/// Print the config path and effective settings, writing a default file first
/// when `init` is set.
pub fn cmd_config(init: bool) -> anyhow::Result<()> {
    if init {
        write_default_config()?;
    }

    match config::config_path() {
        Some(path) => {
            let state = if path.exists() { "" } else { " (not created yet, defaults in use)" };
            println!("Config file: {}{}", path.display(), state);
        }
        None => println!("Config file: unavailable (no config directory on this system)"),
    }
    println!();

    let mut effective = config::load();
    if effective.spotify_token().is_some() {
        // Never echo the secret itself
        effective.credentials.spotify_access_token = Some("<set>".to_string());
    }
    print!("{}", toml::to_string_pretty(&effective)?);
    Ok(())
}

/// Never overwrites an existing file.
fn write_default_config() -> anyhow::Result<()> {
    if let Some(path) = config::config_path().filter(|p| p.exists()) {
        bail!("Config file already exists at {}", path.display());
    }
    config::save(&Config::default())?;
    println!("Wrote default configuration");
    Ok(())
}
