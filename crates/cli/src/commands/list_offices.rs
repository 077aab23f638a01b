use office_registry::{Office, OfficeRegistry, RegistryConfig};
use serde::Serialize;

use super::{ExitCode, open_session};

#[derive(clap::Args)]
pub struct Args {
    /// Only list sub-offices of the office with this name
    #[arg(short, long)]
    pub parent: Option<String>,

    /// Prints all the offices at once in JSON format
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct OfficeSummary<'a> {
    name: &'a str,
    latitude: f64,
    longitude: f64,
    parent_office: Option<&'a str>,
    switches: usize,
}

fn parent_name<'a>(registry: &'a OfficeRegistry, office: &Office) -> Option<&'a str> {
    office
        .parent_office
        .map(|id| registry.get(id).map_or("<missing>", |parent| parent.name.as_str()))
}

fn print_offices(
    registry: &OfficeRegistry,
    offices: Vec<&Office>,
    json: bool,
) -> anyhow::Result<()> {
    if json {
        let summaries: Vec<_> = offices
            .iter()
            .map(|office| OfficeSummary {
                name: &office.name,
                latitude: office.latitude,
                longitude: office.longitude,
                parent_office: parent_name(registry, office),
                switches: office.switches.len(),
            })
            .collect();
        println!("{}", serde_json::to_string(&summaries)?);
        return Ok(());
    }

    println!(
        "{:<30} | {:<22} | {:<30} | {}",
        "Name", "Coordinates", "Parent", "Switches"
    );
    for office in offices {
        println!(
            "{:<30} | {:<22} | {:<30} | {}",
            office.name,
            format!("{}, {}", office.latitude, office.longitude),
            parent_name(registry, office).unwrap_or("-"),
            office.switches.len()
        );
    }
    Ok(())
}

pub fn main(config: &RegistryConfig, args: Args) -> anyhow::Result<ExitCode> {
    let session = open_session(config)?;
    let registry = session.registry();

    let offices: Vec<&Office> = match args.parent {
        Some(name) => {
            let Some(parent) = registry.find(&name) else {
                return super::office_not_found(&name);
            };
            registry.children_of(parent.id).collect()
        }
        None => registry.offices().iter().collect(),
    };

    print_offices(registry, offices, args.json)?;
    Ok(ExitCode::Ok)
}
