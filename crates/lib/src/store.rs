use std::{
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use log::{info, trace};
use tempfile::NamedTempFile;

use crate::{Office, StoreError};

/// File-backed persistence of the whole office collection as a JSON array.
///
/// Every save rewrites the full snapshot. The snapshot is first written to
/// a temporary file next to the target and then renamed over it, so a crash
/// mid-write leaves the previous file intact.
#[derive(Debug, Clone)]
pub struct OfficeStore {
    path: PathBuf,
}

impl OfficeStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        OfficeStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the registry. A missing file is an empty registry.
    pub fn load(&self) -> Result<Vec<Office>, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    "Registry file {} does not exist yet, starting empty",
                    self.path.display()
                );
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        trace!("Read {} bytes from {}", bytes.len(), self.path.display());
        let offices: Vec<Office> =
            serde_json::from_slice(&bytes).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;

        info!(
            "Loaded {} office(s) from {}",
            offices.len(),
            self.path.display()
        );
        Ok(offices)
    }

    pub fn save(&self, offices: &[Office]) -> Result<(), StoreError> {
        let data = serde_json::to_vec_pretty(offices).map_err(StoreError::Serialize)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let io_err = |source| StoreError::Io {
            path: dir.to_path_buf(),
            source,
        };

        fs::create_dir_all(dir).map_err(io_err)?;
        let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
        trace!("Writing registry snapshot to {}", tmp.path().display());
        tmp.write_all(&data).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&self.path)
            .map_err(|source| StoreError::Persist {
                path: self.path.clone(),
                source,
            })?;

        info!(
            "Saved {} office(s) to {}",
            offices.len(),
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{OfficeDraft, OfficeRegistry, SwitchDraft};

    fn sample_offices() -> Vec<Office> {
        let mut registry = OfficeRegistry::default();
        let hq = registry
            .add(OfficeDraft {
                name: "HQ".to_string(),
                latitude: 48.8566,
                longitude: 2.3522,
                is_sub_office: false,
                parent_office: None,
            })
            .unwrap();
        registry
            .add(OfficeDraft {
                name: "Annex".to_string(),
                latitude: 48.87,
                longitude: 2.33,
                is_sub_office: true,
                parent_office: Some(hq),
            })
            .unwrap();
        registry
            .add_switch(
                hq,
                SwitchDraft {
                    name: "core-1".to_string(),
                    ip_address: "10.1.0.1".to_string(),
                    picture: Some("core-1.png".to_string()),
                },
            )
            .unwrap();
        registry.into_offices()
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = OfficeStore::new(dir.path().join("offices_data.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = OfficeStore::new(dir.path().join("nested").join("offices_data.json"));
        let offices = sample_offices();

        store.save(&offices).unwrap();
        assert_eq!(store.load().unwrap(), offices);

        store.save(&[]).unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn save_leaves_no_temp_files_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = OfficeStore::new(dir.path().join("offices_data.json"));
        store.save(&sample_offices()).unwrap();
        store.save(&sample_offices()).unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("offices_data.json");
        fs::write(&path, "[{\"name\": \"HQ\",").unwrap();

        let err = OfficeStore::new(&path).load().unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));
    }

    #[test]
    fn persisted_layout_is_an_array_of_office_objects() {
        let dir = tempfile::tempdir().unwrap();
        let store = OfficeStore::new(dir.path().join("offices_data.json"));
        let offices = sample_offices();
        store.save(&offices).unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&fs::read(store.path()).unwrap()).unwrap();
        let array = raw.as_array().unwrap();
        assert_eq!(array.len(), 2);
        assert_eq!(array[0]["name"], "HQ");
        assert_eq!(array[0]["switches"][0]["ip_address"], "10.1.0.1");
        assert_eq!(array[1]["is_sub_office"], true);
        assert_eq!(array[1]["parent_office"], offices[0].id.0.to_string());
    }
}
