//! Single-slot on-disk record of the last uncaught error.
//!
//! The file holds `"<Type>: <message>" SEPARATOR "<docstring>"` and is
//! overwritten on every new error. The answer lookup reads it back later.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{InspectError, Result};

pub const SEPARATOR: &str = "-x-";
pub const CACHE_FILE_NAME: &str = "error_cache.txt";
pub const CACHE_DIR_ENV: &str = "PYINSPECT_CACHE_DIR";
pub const NO_MESSAGE: &str = "No message";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedError {
    /// `"<TypeName>: <first message argument>"`, used as the search query.
    pub query: String,
    pub doc: String,
}

impl CachedError {
    pub fn new(type_name: &str, message: Option<&str>, doc: Option<&str>) -> Self {
        CachedError {
            query: format!("{}: {}", type_name, message.unwrap_or(NO_MESSAGE)),
            doc: doc.map(str::trim).unwrap_or_default().to_string(),
        }
    }

    /// The error type part of the query.
    pub fn type_name(&self) -> &str {
        self.query.split(':').next().unwrap_or_default()
    }
}

fn resolve_dir(env: Option<OsString>, configured: Option<&Path>, home: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(dir) = env.filter(|dir| !dir.is_empty()) {
        return Some(PathBuf::from(dir));
    }
    if let Some(dir) = configured {
        return Some(dir.to_path_buf());
    }
    home.map(|home| home.join(".pyinspect"))
}

#[derive(Debug, Clone)]
pub struct ErrorCache {
    path: PathBuf,
}

impl ErrorCache {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        ErrorCache { path: path.into() }
    }

    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        ErrorCache::at(dir.as_ref().join(CACHE_FILE_NAME))
    }

    /// `$PYINSPECT_CACHE_DIR`, else `configured`, else `~/.pyinspect`.
    /// The hook and the answer lookup both locate the cache through here.
    pub fn resolve(configured: Option<&Path>) -> Option<Self> {
        resolve_dir(std::env::var_os(CACHE_DIR_ENV), configured, dirs::home_dir()).map(ErrorCache::in_dir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates or overwrites the record.
    pub fn store(&self, record: &CachedError) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| InspectError::io(parent, e))?;
            }
        }
        let contents = format!("{}{}{}", record.query, SEPARATOR, record.doc);
        fs::write(&self.path, contents).map_err(|e| InspectError::io(&self.path, e))
    }

    pub fn load(&self) -> Result<CachedError> {
        let text = fs::read_to_string(&self.path).map_err(|e| InspectError::io(&self.path, e))?;
        let mut fields = text.split(SEPARATOR);
        match (fields.next(), fields.next(), fields.next()) {
            (Some(query), Some(doc), None) => Ok(CachedError {
                query: query.to_string(),
                doc: doc.to_string(),
            }),
            _ => Err(InspectError::cache_format(
                &self.path,
                format!("expected two fields separated by '{}'", SEPARATOR),
            )),
        }
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }
}
