use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use workbench::common;
use workbench::config::Config;
use workbench::workbench_run::{self, OutputFormat, RunOptions};

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(short, long, global = true)]
    log_level: Option<String>,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive the map layers of a process execution
    Layers {
        #[clap(short, long)]
        process: PathBuf,
        #[clap(short, long)]
        execution: PathBuf,
        #[clap(flatten)]
        output: OutputArgs,
    },
    /// Build the provenance table of a single POI
    Provenance {
        #[clap(short, long)]
        input: PathBuf,
        #[clap(flatten)]
        output: OutputArgs,
    },
    /// Write a configuration file with the default palette
    Init {
        #[clap(short, long)]
        config: PathBuf,
    },
}

#[derive(clap::Args)]
struct OutputArgs {
    #[clap(short, long)]
    config: Option<PathBuf>,
    #[clap(short, long)]
    output: Option<PathBuf>,
    #[clap(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
    #[clap(short, long)]
    watch: bool,
}

impl From<OutputArgs> for RunOptions {
    fn from(args: OutputArgs) -> Self {
        RunOptions {
            config: args.config,
            output: args.output,
            format: args.format,
            watch: args.watch,
        }
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();
    setup_logging(&args.log_level);

    match args.command {
        Commands::Layers {
            process,
            execution,
            output,
        } => {
            workbench_run::execute_layers(&process, &execution, &output.into())?;
        }
        Commands::Provenance { input, output } => {
            workbench_run::execute_provenance(&input, &output.into())?;
        }
        Commands::Init { config } => {
            info!("Initializing configuration: {}", config.display());
            let serialized = Config::default().to_yaml()?;
            common::write_string_to_file(&config, &serialized)?;
        }
    }

    Ok(())
}

fn setup_logging(log_level: &Option<String>) {
    let log_level = match log_level
        .as_ref()
        .unwrap_or(&"info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("handlebars=off,{}", log_level)))
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}
