use anyhow::Result;
use clap::Parser;

mod cli;
mod config_cmds;
mod consensus_cmd;
mod pending_cmd;
mod settings;
mod store;
mod validate_cmd;

use cli::{Cli, Commands, ConfigCommands};

fn main() -> Result<()> {
    // Initialize tracing (output to stderr, initialize only once)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init()
        .ok();

    let cli = Cli::parse();
    let format = cli.format;
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Validate { schema, answers } => {
            validate_cmd::handle_validate(config_path, schema.as_deref(), &answers, format)
        }
        Commands::Consensus { source, counts } => {
            consensus_cmd::handle_consensus(config_path, &source, counts, format)
        }
        Commands::Vector { source } => consensus_cmd::handle_vector(config_path, &source, format),
        Commands::Pending {
            schema,
            annotations,
            images_dir,
            annotator,
        } => pending_cmd::handle_pending(
            config_path,
            schema.as_deref(),
            &annotations,
            &images_dir,
            &annotator,
            format,
        ),
        Commands::Schema { schema } => {
            config_cmds::handle_schema_show(config_path, schema.as_deref(), format)
        }
        Commands::Config { cmd } => match cmd {
            ConfigCommands::Show => config_cmds::handle_config_show(config_path, format),
            ConfigCommands::Init { force } => config_cmds::handle_config_init(force),
            ConfigCommands::Validate { schema } => {
                config_cmds::handle_config_validate(config_path, schema.as_deref())
            }
        },
    }
}
