//! Main CLI application structure

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use super::invoice::{self, ListFilter};
use super::output::{Output, OutputFormat};
use crate::service::InvoiceService;
use crate::storage::{Config, InvoiceStore};

#[derive(Parser)]
#[command(name = "invoices")]
#[command(author, version, about = "Line-per-record invoice store")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the configured format)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Record file to use, overriding the configuration
    #[arg(long, global = true, env = "INVOICES_FILE")]
    pub file: Option<PathBuf>,

    /// Configuration file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Save an invoice: insert when it has no id, update otherwise
    ///
    /// Examples:
    ///   invoices save '{"number": "FV/1", ...}'
    ///   cat invoice.json | invoices save -
    Save {
        /// Invoice JSON, or `-` to read from stdin
        document: String,
    },

    /// Show one invoice
    Show {
        /// Invoice ID
        id: String,
    },

    /// List invoices
    List {
        /// Only invoices issued on or after this date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Only invoices issued on or before this date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Only invoices for this buyer company ID
        #[arg(long)]
        buyer: Option<u64>,

        /// Only invoices from this seller company ID
        #[arg(long)]
        seller: Option<u64>,
    },

    /// Delete one invoice
    Delete {
        /// Invoice ID
        id: String,
    },

    /// Delete all invoices
    Clear,

    /// Count stored invoices
    Count,

    /// Check whether an invoice exists
    Exists {
        /// Invoice ID
        id: String,
    },

    /// Show the resolved configuration
    Config,
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(file) = &cli.file {
        config = config.with_file_path(file);
    }

    let format = cli
        .format
        .unwrap_or_else(|| config.output.default_format.into());
    let output = Output::new(format, cli.verbose);

    output.verbose_ctx(
        "config",
        &format!("Using record file: {}", config.database.file_path.display()),
    );

    let store = InvoiceStore::from_config(&config);
    let service = InvoiceService::new(Arc::new(store));

    match cli.command {
        Commands::Save { document } => invoice::save(&service, &output, &document)?,
        Commands::Show { id } => invoice::show(&service, &output, &id)?,
        Commands::List {
            from,
            to,
            buyer,
            seller,
        } => {
            let filter = ListFilter {
                from,
                to,
                buyer,
                seller,
            };
            invoice::list(&service, &output, &filter)?
        }
        Commands::Delete { id } => invoice::delete(&service, &output, &id)?,
        Commands::Clear => invoice::clear(&service, &output)?,
        Commands::Count => invoice::count(&service, &output)?,
        Commands::Exists { id } => invoice::exists(&service, &output, &id)?,
        Commands::Config => show_config(&output, &config)?,
    }

    output.verbose_ctx("run", "Command completed successfully");
    Ok(())
}

/// Installs a stderr subscriber; `RUST_LOG` overrides the default filter
fn init_logging(verbose: bool) {
    let default = if verbose { "invoice_store=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // A subscriber may already be installed when embedded; keep it
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn show_config(output: &Output, config: &Config) -> Result<()> {
    if output.is_json() {
        output.data(&serde_json::json!({
            "file_path": config.database.file_path.display().to_string(),
            "source": config.source.as_ref().map(|p| p.display().to_string()),
        }));
    } else {
        match &config.source {
            Some(source) => println!("# loaded from {}", source.display()),
            None => println!("# defaults (no config file found)"),
        }
        print!("{}", config.to_toml()?);
    }
    Ok(())
}
