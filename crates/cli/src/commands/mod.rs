use std::{path::Path, process::Termination};

use anyhow::Context;
use office_registry::{PictureUpload, RegistryConfig, RegistryError, Session, SessionError};

pub mod add_office;
pub mod add_switch;
pub mod delete_office;
pub mod delete_switch;
pub mod list_offices;
pub mod office_info;
pub mod render_map;
pub mod update_office;
pub mod update_switch;

#[repr(u8)]
pub enum ExitCode {
    Ok = 0,
    FaultOrArgsError = 1,
    RequestUnsatisfied = 2,
}

impl Termination for ExitCode {
    fn report(self) -> std::process::ExitCode {
        std::process::ExitCode::from(self as u8)
    }
}

pub fn open_session(config: &RegistryConfig) -> anyhow::Result<Session> {
    Session::open(config)
        .with_context(|| format!("Opening registry {}", config.data_file.display()))
}

/// Turns user-facing registry failures into exit codes. Anything else is a
/// genuine fault and is propagated.
pub fn exit_for(err: SessionError) -> anyhow::Result<ExitCode> {
    match err {
        SessionError::Registry(err) if err.is_not_found() => {
            eprintln!("{}", err);
            Ok(ExitCode::RequestUnsatisfied)
        }
        SessionError::Registry(err) => {
            eprintln!("{}", err);
            Ok(ExitCode::FaultOrArgsError)
        }
        SessionError::NoSelection => {
            eprintln!("{}", err);
            Ok(ExitCode::FaultOrArgsError)
        }
        err => Err(err.into()),
    }
}

/// Shorthand for commands addressing an office by name.
pub fn office_not_found(name: &str) -> anyhow::Result<ExitCode> {
    exit_for(RegistryError::OfficeNotFound(name.to_string()).into())
}

pub fn read_picture(path: &Path) -> anyhow::Result<PictureUpload> {
    let contents =
        std::fs::read(path).with_context(|| format!("Reading picture {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("{} has no file name", path.display()))?;
    Ok(PictureUpload {
        file_name,
        contents,
    })
}
