//! Command handler modules for the `fxb` CLI.

pub mod replay;

use anyhow::Result;

/// Load layered config from CLI path arguments.
pub fn load_config(paths: &[String]) -> Result<fxb_config::LoadedConfig> {
    let refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
    fxb_config::load_layered_yaml(&refs)
}

/// `fxb config-hash`
pub fn config_hash(paths: &[String]) -> Result<()> {
    let loaded = load_config(paths)?;
    println!("config_hash={}", loaded.config_hash);
    println!("{}", loaded.canonical_json);
    Ok(())
}
