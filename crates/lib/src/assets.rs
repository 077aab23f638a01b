use std::{fs, path::PathBuf};

use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;

use crate::AssetError;

lazy_static! {
    static ref RE_DENIED_FILE_NAME_CHARS: Regex = Regex::new("[^0-9A-Za-z._-]").unwrap();
}

/// Flat directory of switch pictures, addressed by file name only.
///
/// Uploads with the same name overwrite each other.
#[derive(Debug, Clone)]
pub struct AssetStore {
    dir: PathBuf,
}

/// Reduces an uploaded name to a safe, flat file name.
pub fn clean_file_name(source: &str) -> Option<String> {
    let base = source.rsplit(['/', '\\']).next().unwrap_or(source);
    let clean = RE_DENIED_FILE_NAME_CHARS.replace_all(base, "_");
    let clean = clean.trim_start_matches('.');

    if clean.is_empty() || clean.chars().all(|c| c == '_') {
        None
    } else {
        Some(clean.to_string())
    }
}

impl AssetStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        AssetStore { dir: dir.into() }
    }

    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    /// Writes `contents` under the cleaned `file_name` and returns the name
    /// the picture should be referenced by.
    pub fn store(&self, file_name: &str, contents: &[u8]) -> Result<String, AssetError> {
        let name = clean_file_name(file_name)
            .ok_or_else(|| AssetError::InvalidFileName(file_name.to_string()))?;

        fs::create_dir_all(&self.dir).map_err(|source| AssetError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.path_for(&name);
        if path.exists() {
            warn!("Overwriting existing asset {}", path.display());
        }
        fs::write(&path, contents).map_err(|source| AssetError::Io {
            path: path.clone(),
            source,
        })?;

        debug!("Stored {} bytes as {}", contents.len(), path.display());
        Ok(name)
    }
}
