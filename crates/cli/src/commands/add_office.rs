use log::info;
use office_registry::{OfficeForm, RegistryConfig};

use super::{ExitCode, exit_for, open_session};

#[derive(clap::Args)]
pub struct Args {
    /// Name of the new office
    #[arg(short, long)]
    pub name: String,

    #[arg(long, allow_hyphen_values = true)]
    pub latitude: String,

    #[arg(long, allow_hyphen_values = true)]
    pub longitude: String,

    /// Make the office a sub-office of the office with this name
    #[arg(short, long)]
    pub parent: Option<String>,
}

pub fn main(config: &RegistryConfig, args: Args) -> anyhow::Result<ExitCode> {
    let mut session = open_session(config)?;

    let form = OfficeForm {
        name: args.name,
        latitude: args.latitude,
        longitude: args.longitude,
        is_sub_office: args.parent.is_some(),
        parent_name: args.parent,
    };
    let draft = match form.into_draft(session.registry()) {
        Ok(draft) => draft,
        Err(err) => return exit_for(err.into()),
    };

    let name = draft.name.clone();
    match session.apply(|registry| registry.add(draft)) {
        Ok(id) => {
            info!("{} added", name);
            println!("{}", id);
            Ok(ExitCode::Ok)
        }
        Err(err) => exit_for(err),
    }
}
