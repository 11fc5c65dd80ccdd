mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "adq",
    version,
    about = "Average Daily Quantities per dispensed quantity unit for prescribing data"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
pub struct TableArgs {
    /// Product table (CSV)
    #[arg(long, value_name = "FILE")]
    pub products: PathBuf,

    /// ADQ table (CSV)
    #[arg(long, value_name = "FILE")]
    pub adqs: PathBuf,

    /// Standard Quantity Unit table (CSV), oldest observations first
    #[arg(long, value_name = "FILE")]
    pub squs: PathBuf,

    /// Custom JSON configuration (default: built-in)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute ADQs per quantity for every drug code that resolves
    Compute {
        #[command(flatten)]
        tables: TableArgs,

        /// Write the result table to a CSV file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,

        /// Output format: table (default), json or csv
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Build the SQU table from Prescription Cost Analysis spreadsheets
    Squ {
        /// PCA files (xls, xlsx or ods), oldest first
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Where to write the SQU table (CSV)
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: PathBuf,

        /// Custom JSON configuration (default: built-in)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
    /// Show how each row of one drug code reconciles
    Inspect {
        /// Drug (BNF) code
        drug_code: String,

        #[command(flatten)]
        tables: TableArgs,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Show and validate configurations
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the built-in configuration
    Show,
    /// Validate a custom configuration file
    Validate {
        /// Path to JSON configuration
        file: PathBuf,
    },
    /// Print the configuration schema with field descriptions
    Schema,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compute {
            tables,
            out,
            output,
        } => commands::compute::run(&tables, out, &output),
        Commands::Squ { files, out, config } => commands::squ::run(&files, &out, config),
        Commands::Inspect {
            drug_code,
            tables,
            output,
        } => commands::inspect::run(&drug_code, &tables, &output),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(),
            ConfigAction::Validate { file } => commands::config::validate(&file),
            ConfigAction::Schema => commands::config::schema(),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
