//! Configuration loading for pyinspect
//!
//! Loads defaults from the `[tool.pyinspect]` section of the nearest
//! pyproject.toml. Explicit install arguments take precedence.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cache::ErrorCache;
use crate::error::{InspectError, Result};

pub const DEFAULT_KEEP_FRAMES: i64 = 2;

/// Settings as written in pyproject.toml. Every key is optional.
#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
pub struct FileConfig {
    pub keep_frames: Option<i64>,
    pub hide_locals: Option<bool>,
    pub all_locals: Option<bool>,
    pub relevant_only: Option<bool>,
    pub enable_prompt: Option<bool>,
    /// Directory holding the error cache
    pub cache_dir: Option<PathBuf>,
}

/// Resolved traceback hook settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookConfig {
    /// Frames kept besides the root frame, see `stack::selected_indices`
    pub keep_frames: i64,
    /// Skip local variable panels entirely
    pub hide_locals: bool,
    /// Show functions, modules and classes in the locals table
    pub all_locals: bool,
    /// Drop locals not named on the faulting line instead of dimming them
    pub relevant_only: bool,
    /// Offer an online search after the report
    pub enable_prompt: bool,
    pub cache_dir: Option<PathBuf>,
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            keep_frames: DEFAULT_KEEP_FRAMES,
            hide_locals: false,
            all_locals: false,
            relevant_only: false,
            enable_prompt: false,
            cache_dir: None,
        }
    }
}

/// Find pyproject.toml with a [tool.pyinspect] section, walking up from
/// `start_path`
pub fn find_config_pyproject_toml(start_path: &Path) -> Option<PathBuf> {
    let mut current = if start_path.is_file() {
        start_path.parent()?
    } else {
        start_path
    };

    loop {
        let pyproject = current.join("pyproject.toml");
        if pyproject.exists() {
            if let Ok(content) = std::fs::read_to_string(&pyproject) {
                if let Ok(value) = toml::from_str::<toml::Value>(&content) {
                    if let Some(tool) = value.get("tool") {
                        if tool.get("pyinspect").is_some() {
                            return Some(pyproject);
                        }
                    }
                }
            }
        }

        current = current.parent()?;
    }
}

/// Load configuration from pyproject.toml. With no explicit path, searches
/// upward from the working directory.
pub fn load_config(path: Option<&Path>) -> Option<FileConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            p.to_path_buf()
        } else {
            return None;
        }
    } else {
        find_config_pyproject_toml(&std::env::current_dir().ok()?)?
    };

    let content = std::fs::read_to_string(&config_path).ok()?;
    match parse_config(&content) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("ignoring {}: {}", config_path.display(), e);
            None
        }
    }
}

/// Parse the `[tool.pyinspect]` section of pyproject.toml content.
/// `Ok(None)` when the section is absent.
pub fn parse_config(content: &str) -> Result<Option<FileConfig>> {
    let value: toml::Value = toml::from_str(content)
        .map_err(|e| InspectError::config(format!("unparsable pyproject.toml: {}", e)))?;

    let Some(section) = value.get("tool").and_then(|tool| tool.get("pyinspect")) else {
        return Ok(None);
    };
    let parsed: std::result::Result<FileConfig, _> = section.clone().try_into();
    parsed
        .map(Some)
        .map_err(|e| InspectError::config(format!("invalid [tool.pyinspect]: {}", e)))
}

/// The error cache as located by a hook configured from pyproject.toml
/// alone. Readers of the cache use this so they find what the hook wrote.
pub fn configured_cache() -> Option<ErrorCache> {
    let file = load_config(None);
    ErrorCache::resolve(file.as_ref().and_then(|config| config.cache_dir.as_deref()))
}

/// Explicit arguments to `install_traceback`; `None` means "not given".
#[derive(Debug, Default, Clone, PartialEq)]
pub struct HookOverrides {
    pub keep_frames: Option<i64>,
    pub hide_locals: Option<bool>,
    pub all_locals: Option<bool>,
    pub relevant_only: Option<bool>,
    pub enable_prompt: Option<bool>,
}

/// Merge explicit arguments with config file settings.
/// Explicit arguments take precedence, then the file, then the defaults.
pub fn merge_config(file: Option<&FileConfig>, overrides: &HookOverrides) -> HookConfig {
    let defaults = HookConfig::default();
    let file = file.cloned().unwrap_or_default();

    HookConfig {
        keep_frames: overrides
            .keep_frames
            .or(file.keep_frames)
            .unwrap_or(defaults.keep_frames),
        hide_locals: overrides
            .hide_locals
            .or(file.hide_locals)
            .unwrap_or(defaults.hide_locals),
        all_locals: overrides
            .all_locals
            .or(file.all_locals)
            .unwrap_or(defaults.all_locals),
        relevant_only: overrides
            .relevant_only
            .or(file.relevant_only)
            .unwrap_or(defaults.relevant_only),
        enable_prompt: overrides
            .enable_prompt
            .or(file.enable_prompt)
            .unwrap_or(defaults.enable_prompt),
        cache_dir: file.cache_dir,
    }
}
