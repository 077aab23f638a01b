use std::path::PathBuf;

use anyhow::Context;
use log::info;
use office_registry::RegistryConfig;

use super::{ExitCode, exit_for, open_session};

#[derive(clap::Args)]
pub struct Args {
    /// Name of the office to render
    #[arg(short, long)]
    pub name: String,

    /// Write the HTML page to this file instead of standard output
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the map description as JSON instead of HTML
    #[arg(long)]
    pub json: bool,
}

pub fn main(config: &RegistryConfig, args: Args) -> anyhow::Result<ExitCode> {
    let mut session = open_session(config)?;
    if let Err(err) = session.select(&args.name) {
        return exit_for(err);
    }

    let map = match session.render_selected() {
        Ok(map) => map,
        Err(err) => return exit_for(err),
    };

    let rendered = if args.json {
        serde_json::to_string_pretty(&map)?
    } else {
        map.to_html()
    };

    match args.output {
        Some(path) => {
            std::fs::write(&path, rendered)
                .with_context(|| format!("Writing map to {}", path.display()))?;
            info!("Map of {} written to {}", args.name, path.display());
        }
        None => println!("{}", rendered),
    }
    Ok(ExitCode::Ok)
}
