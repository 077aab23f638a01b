use std::path::PathBuf;

use thiserror::Error;

use crate::{OfficeId, SwitchId};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("an office named {0:?} already exists")]
    DuplicateName(String),
    #[error("office not found: {0}")]
    OfficeNotFound(String),
    #[error("switch {switch} not found in office {office}")]
    SwitchNotFound { office: OfficeId, switch: SwitchId },
    #[error("parent office not found: {0}")]
    ParentNotFound(String),
    #[error("sub-office {0:?} has no parent office")]
    MissingParent(String),
    #[error("office {0:?} is not a sub-office but a parent office was given")]
    UnexpectedParent(String),
    #[error("setting {parent:?} as parent of {office:?} would create a cycle")]
    ParentCycle { office: String, parent: String },
    #[error("validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse registry file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not serialize registry: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("could not replace registry file {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: tempfile::PersistError,
    },
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("I/O error on asset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid asset file name: {0:?}")]
    InvalidFileName(String),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error("no office selected")]
    NoSelection,
}

impl RegistryError {
    pub fn office_not_found(id: OfficeId) -> Self {
        Self::OfficeNotFound(id.to_string())
    }

    /// Whether the error means that something the caller asked for does
    /// not exist, as opposed to the request being invalid.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::OfficeNotFound(_) | Self::SwitchNotFound { .. } | Self::ParentNotFound(_)
        )
    }
}
