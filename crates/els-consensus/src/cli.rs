use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "els")]
#[command(about = "ELS annotation consensus: validate answers, resolve majority votes, export feature vectors")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json)
    #[arg(long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Config file (defaults to .els/config.toml under the current directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate one annotator's answers against the schema
    Validate {
        /// Schema JSON file (defaults to the built-in ELS questionnaire)
        #[arg(long)]
        schema: Option<PathBuf>,

        /// Answers JSON file: {"<question>": <value>, ...}
        #[arg(long)]
        answers: PathBuf,
    },

    /// Resolve per-question consensus and tie flags for each image
    Consensus {
        #[command(flatten)]
        source: AnnotationSource,

        /// Also print per-option vote counts
        #[arg(long)]
        counts: bool,
    },

    /// Export the 0/1 feature vector of each image
    Vector {
        #[command(flatten)]
        source: AnnotationSource,
    },

    /// List images an annotator has not annotated yet
    Pending {
        /// Schema JSON file (defaults to the built-in ELS questionnaire)
        #[arg(long)]
        schema: Option<PathBuf>,

        /// Annotations JSON file
        #[arg(long)]
        annotations: PathBuf,

        /// Directory holding the image files
        #[arg(long)]
        images_dir: PathBuf,

        /// Annotator identifier
        #[arg(long)]
        annotator: String,
    },

    /// Print the schema in effect (built-in questionnaire unless --schema is given)
    Schema {
        /// Schema JSON file
        #[arg(long)]
        schema: Option<PathBuf>,
    },

    /// Show/manage configuration
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

/// Where annotations and their schema are read from.
#[derive(clap::Args, Debug, Clone)]
pub struct AnnotationSource {
    /// Schema JSON file (defaults to the built-in ELS questionnaire)
    #[arg(long)]
    pub schema: Option<PathBuf>,

    /// Annotations JSON file: {"<image>": [{"annotator_id": ..., "answers": {...}}]}
    #[arg(long)]
    pub annotations: PathBuf,

    /// Only report this image
    #[arg(long)]
    pub image: Option<String>,

    /// Skip records that fail validation instead of aborting
    #[arg(long)]
    pub skip_invalid: bool,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Write a default .els/config.toml in the current directory
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Validate the configuration against the schema in effect
    Validate {
        /// Schema JSON file
        #[arg(long)]
        schema: Option<PathBuf>,
    },
}
