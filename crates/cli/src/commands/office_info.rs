use office_registry::{RegistryConfig, search_url};

use super::{ExitCode, exit_for, open_session};

#[derive(clap::Args)]
pub struct Args {
    /// Name of the office to get information about
    #[arg(short, long)]
    pub name: String,
}

pub fn main(config: &RegistryConfig, args: Args) -> anyhow::Result<ExitCode> {
    let session = open_session(config)?;
    let registry = session.registry();
    let Some(office) = registry.find(&args.name) else {
        return super::office_not_found(&args.name);
    };

    println!("Office Information:");
    println!(" - ID: {}", office.id);
    println!(" - Name: {}", office.name);
    println!(" - Latitude: {}", office.latitude);
    println!(" - Longitude: {}", office.longitude);

    if office.is_sub_office {
        match registry.parent_of(office) {
            Ok(Some(parent)) => println!(" - Parent Office: {}", parent.name),
            Ok(None) => {}
            Err(err) => return exit_for(err.into()),
        }
    }

    println!(" - Map: {}", search_url(office.latitude, office.longitude));

    let children: Vec<_> = registry
        .children_of(office.id)
        .map(|child| child.name.as_str())
        .collect();
    if !children.is_empty() {
        println!(" - Sub-offices: {}", children.join(", "));
    }

    println!(" - Switches:");
    for switch in &office.switches {
        print!(
            "  - {} (IP: {}; ID: {})",
            switch.name, switch.ip_address, switch.id
        );
        match &switch.picture {
            Some(picture) => println!(" [{}]", session.assets().path_for(picture).display()),
            None => println!(),
        }
    }

    Ok(ExitCode::Ok)
}
