use log::info;
use office_registry::{DeletePolicy, RegistryConfig};

use super::{ExitCode, exit_for, open_session};

#[derive(clap::Args)]
pub struct Args {
    /// Name of the office to delete
    #[arg(short, long)]
    pub name: String,

    /// Keep the sub-offices, leaving them with a dangling parent reference
    #[arg(long)]
    pub orphan: bool,
}

pub fn main(config: &RegistryConfig, args: Args) -> anyhow::Result<ExitCode> {
    let mut session = open_session(config)?;
    let Some(id) = session.registry().find(&args.name).map(|office| office.id) else {
        return super::office_not_found(&args.name);
    };

    let policy = if args.orphan {
        DeletePolicy::Orphan
    } else {
        DeletePolicy::Cascade
    };

    match session.apply(|registry| registry.delete(id, policy)) {
        Ok(removed) => {
            for office in removed {
                info!("{} deleted", office.name);
            }
            Ok(ExitCode::Ok)
        }
        Err(err) => exit_for(err),
    }
}
