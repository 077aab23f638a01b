use std::path::PathBuf;

use office_registry::{RegistryConfig, SwitchForm, SwitchId};

use super::{ExitCode, exit_for, open_session, read_picture};

#[derive(clap::Args)]
pub struct Args {
    /// Name of the office the switch is installed at
    #[arg(short, long)]
    pub office: String,

    /// ID of the switch, as shown by office-info
    #[arg(short, long)]
    pub switch: SwitchId,

    #[arg(short, long)]
    pub name: Option<String>,

    #[arg(short, long)]
    pub ip_address: Option<String>,

    /// Replace the picture of the switch
    #[arg(long)]
    pub picture: Option<PathBuf>,
}

pub fn main(config: &RegistryConfig, args: Args) -> anyhow::Result<ExitCode> {
    let mut session = open_session(config)?;
    let office_id = match session.select(&args.office) {
        Ok(id) => id,
        Err(err) => return exit_for(err),
    };
    if let Err(err) = session.begin_switch_edit(args.switch) {
        return exit_for(err);
    }

    let current = session.view(office_id);
    session.set_switch_buffer(SwitchForm {
        name: args.name.unwrap_or(current.switch_name),
        ip_address: args.ip_address.unwrap_or(current.ip_address),
    })?;

    let picture = args.picture.as_deref().map(read_picture).transpose()?;
    match session.submit_switch(picture) {
        Ok(_) => Ok(ExitCode::Ok),
        Err(err) => exit_for(err),
    }
}
