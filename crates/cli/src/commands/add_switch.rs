use std::path::PathBuf;

use office_registry::{RegistryConfig, SwitchForm};

use super::{ExitCode, exit_for, open_session, read_picture};

#[derive(clap::Args)]
pub struct Args {
    /// Name of the office the switch is installed at
    #[arg(short, long)]
    pub office: String,

    /// Name of the switch
    #[arg(short, long)]
    pub name: String,

    #[arg(short, long)]
    pub ip_address: String,

    /// Picture of the switch, copied into the images directory
    #[arg(long)]
    pub picture: Option<PathBuf>,
}

pub fn main(config: &RegistryConfig, args: Args) -> anyhow::Result<ExitCode> {
    let mut session = open_session(config)?;
    if let Err(err) = session.select(&args.office) {
        return exit_for(err);
    }

    let picture = args.picture.as_deref().map(read_picture).transpose()?;
    session.set_switch_buffer(SwitchForm {
        name: args.name,
        ip_address: args.ip_address,
    })?;

    match session.submit_switch(picture) {
        Ok(id) => {
            println!("{}", id);
            Ok(ExitCode::Ok)
        }
        Err(err) => exit_for(err),
    }
}
