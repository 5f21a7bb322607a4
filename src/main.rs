//! Collage CLI - Layered Image Compositing
//!
//! Command-line interface for editing Collage project files.

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::{debug, warn};

use collage::cli::{commands, Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    debug!("Collage v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(cmd) => {
            let result = handle_command(cmd);
            if let Err(e) = &result {
                warn!("Command rejected: {}", e.root_cause());
            }
            result
        }
        None => {
            println!("Collage v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

fn handle_command(cmd: Commands) -> anyhow::Result<()> {
    match cmd {
        Commands::New {
            path,
            name,
            width,
            height,
            max_value,
        } => commands::new_project(&path, name.as_deref(), width, height, max_value)
            .with_context(|| format!("Failed to create project {}", path.display())),
        Commands::AddLayer { path, layer } => commands::add_layer(&path, &layer)
            .with_context(|| format!("Failed to add layer '{}'", layer)),
        Commands::RemoveLayer { path, layer } => commands::remove_layer(&path, &layer)
            .with_context(|| format!("Failed to remove layer '{}'", layer)),
        Commands::SetFilter {
            path,
            layer,
            filter,
        } => commands::set_filter(&path, &layer, &filter)
            .with_context(|| format!("Failed to set filter on layer '{}'", layer)),
        Commands::AddImage {
            path,
            layer,
            image,
            x,
            y,
        } => commands::add_image(&path, &layer, &image, x, y)
            .with_context(|| format!("Failed to place {} on layer '{}'", image.display(), layer)),
        Commands::Bake { path, layer } => commands::bake(&path, &layer)
            .with_context(|| format!("Failed to bake layer '{}'", layer)),
        Commands::SaveImage {
            path,
            output,
            quality,
        } => commands::save_image(&path, &output, quality)
            .with_context(|| format!("Failed to save image {}", output.display())),
        Commands::Info { path } => commands::show_info(&path)
            .with_context(|| format!("Failed to read project {}", path.display())),
        Commands::Filters => {
            commands::list_filters();
            Ok(())
        }
    }
}
