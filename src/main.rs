//! cidian CLI entry point

use cidian::{
    commands::{
        cmd_index, cmd_init, cmd_lookup, cmd_pipeline, cmd_status, print_lookup, print_run_report,
        print_status, ActionFlags,
    },
    config::Config,
    error::Result,
    progress::LogWriterFactory,
};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "cidian")]
#[command(version, about = "Build the Chinese dictionary database from Unihan, CEDICT-family dictionaries and Tatoeba", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Override the data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Delete the database prior to reconstructing it
    #[arg(long)]
    delete: bool,

    /// Download the dictionaries and the sentence corpus
    #[arg(long)]
    download: bool,

    /// Populate the database from downloaded files
    #[arg(long)]
    populate: bool,

    /// Remove indexes and defragment the database
    #[arg(long)]
    cleanup: bool,

    /// Zip the data directory for backup purposes
    #[arg(long)]
    zip: bool,

    /// Update (removes, downloads and populates the database)
    #[arg(long)]
    update: bool,

    /// Run all actions
    #[arg(long)]
    all: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl Cli {
    fn flags(&self) -> ActionFlags {
        ActionFlags {
            delete: self.delete,
            download: self.download,
            populate: self.populate,
            cleanup: self.cleanup,
            zip: self.zip,
            update: self.update,
            all: self.all,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Look up a word or characters in the built database
    Lookup {
        /// Simplified or traditional text
        text: String,
    },

    /// Show downloaded sources and database status
    Status,

    /// Recreate the lookup indexes removed by --cleanup
    Index,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(LogWriterFactory::default()))
        .with(filter)
        .init();

    // Handle completions command (doesn't need config)
    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "cidian", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(Commands::Init { force }) = cli.command {
        let config_path = cli.config.clone().unwrap_or_else(Config::default_config_path);
        let config = cmd_init(&config_path, cli.data_dir.clone(), force)?;
        println!("✓ cidian initialized successfully");
        println!("  Config: {}", config_path.display());
        println!("  Data directory: {}", config.data_dir.display());
        println!("\nNext step: cidian --all");
        return Ok(());
    }

    let mut config = Config::load_or_default(cli.config.as_deref())?;
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = data_dir.clone();
    }

    match &cli.command {
        Some(Commands::Lookup { text }) => {
            let result = cmd_lookup(&config, text).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_lookup(&result);
            }
        }

        Some(Commands::Status) => {
            let status = cmd_status(&config).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                print_status(&status);
            }
        }

        Some(Commands::Index) => {
            let indexes = cmd_index(&config).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&indexes)?);
            } else {
                println!("✓ Lookup indexes: {}", indexes.join(", "));
            }
        }

        Some(Commands::Init { .. }) | Some(Commands::Completions { .. }) => unreachable!(),

        None => {
            let flags = cli.flags();
            let report = cmd_pipeline(&config, flags).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_run_report(&report);
            }

            if !flags.any() {
                Cli::command().print_help()?;
            }
        }
    }

    Ok(())
}
