use anyhow::bail;
use log::info;
use office_registry::{Office, OfficeForm, OfficeRegistry, RegistryConfig};

use super::{ExitCode, exit_for, open_session};

#[derive(clap::Args)]
pub struct Args {
    /// Current name of the office to update
    #[arg(short, long)]
    pub name: String,

    #[arg(long)]
    pub new_name: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    pub latitude: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    pub longitude: Option<String>,

    /// Make the office a sub-office of the office with this name
    #[arg(short, long, conflicts_with = "root")]
    pub parent: Option<String>,

    /// Make the office a top-level office
    #[arg(long)]
    pub root: bool,
}

/// Applies the given flags over the office's current values.
fn edit_form(registry: &OfficeRegistry, office: &Office, args: Args) -> anyhow::Result<OfficeForm> {
    let mut form = OfficeForm::from_office(registry, office);
    if let Some(name) = args.new_name {
        form.name = name;
    }
    if let Some(latitude) = args.latitude {
        form.latitude = latitude;
    }
    if let Some(longitude) = args.longitude {
        form.longitude = longitude;
    }

    if let Some(parent) = args.parent {
        form.is_sub_office = true;
        form.parent_name = Some(parent);
    } else if args.root {
        form.is_sub_office = false;
        form.parent_name = None;
    } else if form.is_sub_office && form.parent_name.is_none() {
        bail!(
            "the parent office of {:?} no longer exists; pass --parent <NAME> to re-attach it \
             or --root to make it a top-level office",
            office.name
        );
    }

    Ok(form)
}

pub fn main(config: &RegistryConfig, args: Args) -> anyhow::Result<ExitCode> {
    let mut session = open_session(config)?;
    let registry = session.registry();
    let Some(office) = registry.find(&args.name) else {
        return super::office_not_found(&args.name);
    };
    let id = office.id;

    let form = match edit_form(registry, office, args) {
        Ok(form) => form,
        Err(err) => {
            eprintln!("{}", err);
            return Ok(ExitCode::FaultOrArgsError);
        }
    };

    let draft = match form.into_draft(registry) {
        Ok(draft) => draft,
        Err(err) => return exit_for(err.into()),
    };

    let name = draft.name.clone();
    match session.apply(|registry| registry.update(id, draft)) {
        Ok(()) => {
            info!("{} updated", name);
            Ok(ExitCode::Ok)
        }
        Err(err) => exit_for(err),
    }
}
