//! Loading and saving of the blacklist.
//!
//! Called by the host at process start and stop, never per frame.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use directories::ProjectDirs;
use eyre::{Context, Result};
use ron::ser::PrettyConfig;
use tracing::info;

use crate::blacklist::Blacklist;

pub static PROJECT_DIR: LazyLock<Option<ProjectDirs>> =
    LazyLock::new(|| ProjectDirs::from("org", "recdex-project", "recdex"));

pub const BLACKLIST_FILE: &str = "blacklist.ron";

/// The blacklist file location under the user's config directory.
#[must_use]
pub fn default_blacklist_path() -> Option<PathBuf> {
    PROJECT_DIR
        .as_ref()
        .map(|dirs| dirs.config_dir().join(BLACKLIST_FILE))
}

/// Loads the persisted blacklist. A missing file is not an error: it loads as
/// the default (empty) blacklist.
pub fn load_blacklist(path: &Path) -> Result<Blacklist> {
    if !path.exists() {
        info!("No blacklist file at '{}', starting empty", path.display());
        return Ok(Blacklist::default());
    }

    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read blacklist file '{}'", path.display()))?;
    let blacklist: Blacklist = ron::de::from_bytes(&bytes)
        .with_context(|| format!("Failed to parse blacklist file '{}'", path.display()))?;
    info!("Loaded blacklist from '{}'", path.display());
    Ok(blacklist)
}

/// Saves the blacklist, creating the parent directory if needed.
pub fn save_blacklist(path: &Path, blacklist: &Blacklist) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory '{}'", parent.display()))?;
    }

    let encoded = ron::Options::default()
        .to_string_pretty(blacklist, PrettyConfig::default())
        .context("Failed to encode blacklist")?;
    fs::write(path, encoded)
        .with_context(|| format!("Failed to write blacklist file '{}'", path.display()))?;
    info!("Saved blacklist to '{}'", path.display());
    Ok(())
}
