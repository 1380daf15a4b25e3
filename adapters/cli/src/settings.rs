//! Versioned engine settings read from a TOML file.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use overworld_world::{EngineContext, DEFAULT_SEED, DEFAULT_SPECIES_DRAW_LIMIT};
use serde::Deserialize;

const SUPPORTED_SETTINGS_VERSION: u32 = 1;

/// Engine configuration and the location of the world description.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Settings {
    /// World description path, resolved against the settings file directory.
    pub(crate) world: PathBuf,
    /// Seed and sampling limits handed to the world.
    pub(crate) engine: EngineContext,
    /// Log filter used when `RUST_LOG` is not set.
    pub(crate) log_filter: Option<String>,
}

impl Settings {
    /// Default settings path relative to the repository root.
    #[must_use]
    pub(crate) fn default_path() -> PathBuf {
        PathBuf::from("assets/overworld.toml")
    }

    /// Loads settings from the file at `path`.
    pub(crate) fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings at {}", path.display()))?;
        let base = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        parse_settings(&contents, &base)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    version: u32,
    world: PathBuf,
    seed: Option<u64>,
    species_draw_limit: Option<u32>,
    log_filter: Option<String>,
}

fn parse_settings(contents: &str, base_path: &Path) -> Result<Settings> {
    let file: SettingsFile =
        toml::from_str(contents).context("failed to parse settings toml contents")?;
    if file.version != SUPPORTED_SETTINGS_VERSION {
        bail!(
            "unsupported settings version {}; expected {}",
            file.version,
            SUPPORTED_SETTINGS_VERSION
        );
    }

    let species_draw_limit = file.species_draw_limit.unwrap_or(DEFAULT_SPECIES_DRAW_LIMIT);
    if species_draw_limit == 0 {
        bail!("species_draw_limit must be at least 1");
    }

    Ok(Settings {
        world: base_path.join(file.world),
        engine: EngineContext::new(file.seed.unwrap_or(DEFAULT_SEED), species_draw_limit),
        log_filter: file.log_filter,
    })
}
