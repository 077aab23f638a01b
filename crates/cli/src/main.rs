use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::LevelFilter;
use office_registry::RegistryConfig;
mod commands;

#[derive(Parser)]
#[command(name = "office-registry")]
#[command(about = "A CLI tool for maintaining offices and the network switches installed at each")]
#[command(version)]
struct Cli {
    /// JSON file holding the office registry
    #[arg(
        long,
        global = true,
        env = "OFFICE_REGISTRY_DATA_FILE",
        default_value = "offices_data.json"
    )]
    data_file: PathBuf,

    /// Directory where switch pictures are stored
    #[arg(
        long,
        global = true,
        env = "OFFICE_REGISTRY_IMAGES_DIR",
        default_value = "images"
    )]
    images_dir: PathBuf,

    #[command(subcommand)]
    subcommand: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered offices
    ListOffices(commands::list_offices::Args),
    /// Get information about a specific office
    OfficeInfo(commands::office_info::Args),
    /// Register a new office
    AddOffice(commands::add_office::Args),
    /// Replace the details of an office
    UpdateOffice(commands::update_office::Args),
    /// Delete an office, and by default its sub-offices
    DeleteOffice(commands::delete_office::Args),
    /// Add a switch to an office
    AddSwitch(commands::add_switch::Args),
    /// Change a switch of an office
    UpdateSwitch(commands::update_switch::Args),
    /// Remove a switch from an office
    DeleteSwitch(commands::delete_switch::Args),
    /// Render the map of an office
    RenderMap(commands::render_map::Args),
}

fn main() -> anyhow::Result<commands::ExitCode> {
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    let config = RegistryConfig {
        data_file: cli.data_file,
        images_dir: cli.images_dir,
    };

    Ok(match cli.subcommand {
        Commands::ListOffices(args) => commands::list_offices::main(&config, args)?,
        Commands::OfficeInfo(args) => commands::office_info::main(&config, args)?,
        Commands::AddOffice(args) => commands::add_office::main(&config, args)?,
        Commands::UpdateOffice(args) => commands::update_office::main(&config, args)?,
        Commands::DeleteOffice(args) => commands::delete_office::main(&config, args)?,
        Commands::AddSwitch(args) => commands::add_switch::main(&config, args)?,
        Commands::UpdateSwitch(args) => commands::update_switch::main(&config, args)?,
        Commands::DeleteSwitch(args) => commands::delete_switch::main(&config, args)?,
        Commands::RenderMap(args) => commands::render_map::main(&config, args)?,
    })
}
