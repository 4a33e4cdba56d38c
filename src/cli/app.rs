//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::options::QueryOptions;
use super::output::{Output, OutputFormat};
use super::{dot, query};

#[derive(Parser)]
#[command(name = "felipe")]
#[command(author, version, about = "Query and draw component dependency graphs")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format of query results
    #[arg(long, global = true, default_value = "yaml")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Query the components defined in a directory
    Query {
        /// Directory containing `*.yaml` component definitions
        src_dir: PathBuf,

        /// Filter used in the query (`key=value`)
        #[arg(long, short = 'f')]
        filter: Option<String>,

        /// Complementation used in the query (`dep=N` or `rdep=N`, negative N = unbounded)
        #[arg(long, short = 'c')]
        complementation: Option<String>,
    },

    /// Print components as a DOT graph
    Dot {
        /// File that defines components (default: stdin)
        #[arg(long = "src_file", short = 's', alias = "src-file")]
        src_file: Option<PathBuf>,

        /// File that defines faces of the nodes
        #[arg(long, short = 'f')]
        face: Option<PathBuf>,

        /// Filter used in the query (`key=value`)
        #[arg(long)]
        filter: Option<String>,

        /// Complementation used in the query (`dep=N` or `rdep=N`, negative N = unbounded)
        #[arg(long, short = 'c')]
        complementation: Option<String>,

        /// Render configuration file (default: the global config, if present)
        #[arg(long, env = "FELIPE_CONFIG")]
        config: Option<PathBuf>,
    },
}

/// Parses arguments and runs the selected command
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(cli.format, cli.verbose);

    output.verbose("felipe starting");

    match cli.command {
        Commands::Query {
            src_dir,
            filter,
            complementation,
        } => {
            let options = QueryOptions::parse(filter.as_deref(), complementation.as_deref())?;
            output.verbose_ctx("query", &format!("Reading definitions from: {}", src_dir.display()));
            query::run(&output, &src_dir, &options)?
        }

        Commands::Dot {
            src_file,
            face,
            filter,
            complementation,
            config,
        } => {
            let options = QueryOptions::parse(filter.as_deref(), complementation.as_deref())?;
            dot::run(
                &output,
                src_file.as_deref(),
                face.as_deref(),
                config.as_deref(),
                &options,
            )?
        }
    }

    Ok(())
}
