use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use glimpse_config::Config;
use serde::{Deserialize, Serialize};

/// Working-directory config used when no user profile exists yet
const LOCAL_CONFIG: &str = "config.json";

/// `<config dir>/Glimpse`, e.g. `%APPDATA%\Glimpse` on Windows
fn glimpse_root() -> anyhow::Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join("Glimpse"))
        .context("Could not determine the user config directory")
}

fn profiles_dir() -> anyhow::Result<PathBuf> {
    Ok(glimpse_root()?.join("profiles"))
}

pub fn profile_path(name: &str) -> anyhow::Result<PathBuf> {
    Ok(profiles_dir()?.join(format!("{name}.json")))
}

/// Represents a user profile
#[derive(Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub value: Config,
}

/// Plain config file, as given with `--config` or found in the working directory
pub fn read_config_file(path: &Path) -> anyhow::Result<Config> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("Invalid config {}", path.display()))
}

pub fn read_profile(path: &Path) -> anyhow::Result<Config> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read profile {}", path.display()))?;
    let profile: Profile = serde_json::from_str(&data)
        .with_context(|| format!("Invalid profile {}", path.display()))?;
    Ok(profile.value)
}

pub fn write_profile(path: &Path, name: &str, config: &Config) -> anyhow::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let profile = Profile {
        name: name.to_string(),
        value: config.clone(),
    };
    fs::write(path, serde_json::to_string_pretty(&profile)?)
        .with_context(|| format!("Failed to write profile {}", path.display()))?;
    Ok(())
}

/// Config a fresh profile starts from: the local config file when present,
/// built-in defaults otherwise
fn seed_config(local: &Path) -> anyhow::Result<Config> {
    if local.exists() {
        tracing::info!("Loading {}", local.display());
        read_config_file(local)
    } else {
        Ok(Config::default())
    }
}

/// Create the named profile if it is missing. Returns its path.
pub fn init_user_config(name: &str) -> anyhow::Result<PathBuf> {
    let path = profile_path(name)?;
    if !path.exists() {
        let config = seed_config(Path::new(LOCAL_CONFIG))?;
        write_profile(&path, name, &config)?;
        tracing::info!("Created profile {}", path.display());
    }
    Ok(path)
}

/// Resolve the startup config: `--config` file, then the user profile, then
/// `config.json` in the working directory, then built-in defaults. A missing
/// profile is created from whichever of the last two was used.
pub fn load_config(explicit: Option<&Path>, profile: &str) -> anyhow::Result<Config> {
    let mut config = match explicit {
        Some(path) => read_config_file(path)?,
        None => load_or_create_profile(profile)?,
    };
    config.apply_env();
    Ok(config)
}

fn load_or_create_profile(name: &str) -> anyhow::Result<Config> {
    let path = match profile_path(name) {
        Ok(path) => path,
        Err(e) => {
            tracing::warn!("{e:#}; not using a user profile");
            return seed_config(Path::new(LOCAL_CONFIG));
        }
    };
    resolve_profile(&path, name, Path::new(LOCAL_CONFIG))
}

fn resolve_profile(path: &Path, name: &str, local: &Path) -> anyhow::Result<Config> {
    if path.exists() {
        tracing::info!("Loading profile {}", path.display());
        return read_profile(path);
    }

    let config = seed_config(local)?;
    match write_profile(path, name, &config) {
        Ok(()) => tracing::info!("Created profile {}", path.display()),
        Err(e) => tracing::warn!("Could not save profile: {e:#}"),
    }
    Ok(config)
}
