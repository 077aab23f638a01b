use log::info;
use office_registry::{RegistryConfig, SwitchId};

use super::{ExitCode, exit_for, open_session};

#[derive(clap::Args)]
pub struct Args {
    /// Name of the office the switch is installed at
    #[arg(short, long)]
    pub office: String,

    /// ID of the switch, as shown by office-info
    #[arg(short, long)]
    pub switch: SwitchId,
}

pub fn main(config: &RegistryConfig, args: Args) -> anyhow::Result<ExitCode> {
    let mut session = open_session(config)?;
    let office_id = match session.select(&args.office) {
        Ok(id) => id,
        Err(err) => return exit_for(err),
    };

    match session.apply(|registry| registry.delete_switch(office_id, args.switch)) {
        Ok(switch) => {
            // Pictures are never removed from the images directory.
            info!("Switch {} removed from {}", switch.name, args.office);
            Ok(ExitCode::Ok)
        }
        Err(err) => exit_for(err),
    }
}
