//! Billing Portal CLI
//!
//! Terminal front end for the insurance billing portal. Stands in for the
//! web presentation layer: every store operation of `billing-core` is
//! reachable from a subcommand.

use anyhow::Result;
use clap::{Parser, Subcommand};

use billing_core::PortalConfig;

mod commands;
mod ui;

use commands::PortalContext;

#[derive(Parser)]
#[command(name = "billing-portal")]
#[command(about = "Manage insurance billing records", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Custom storage directory for the persisted session
    #[arg(long, global = true)]
    storage_dir: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with a Google identity credential
    Login {
        /// Identity credential (JWT) from the Google sign-in flow
        #[arg(long)]
        credential: Option<String>,

        /// Sign in directly with an email (development backends only)
        #[arg(long)]
        email: Option<String>,
    },

    /// Sign out and clear the persisted session
    Logout,

    /// Show the current session
    Whoami,

    /// List billing records
    List {
        /// Filter by product code
        #[arg(long)]
        product: Option<String>,

        /// Filter by location
        #[arg(long)]
        location: Option<String>,
    },

    /// Create a billing record
    Create {
        /// Insurance product code
        #[arg(long)]
        product: String,

        #[arg(long)]
        location: String,

        /// Premium paid, in major units (e.g., 12.34)
        #[arg(long)]
        premium: String,

        #[arg(long)]
        email: String,

        #[arg(long, default_value = "")]
        first_name: String,

        #[arg(long, default_value = "")]
        last_name: String,

        #[arg(long, default_value = "")]
        photo: String,
    },

    /// Update a billing record (only the given fields are sent)
    Update {
        /// Record id
        id: i64,

        #[arg(long)]
        location: Option<String>,

        /// Premium paid, in major units
        #[arg(long)]
        premium: Option<String>,

        #[arg(long)]
        email: Option<String>,
    },

    /// Delete a billing record
    Delete {
        /// Record id
        id: i64,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Reveal the unmasked email for a record
    Reveal {
        /// Record id
        id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("billing_cli=debug,billing_core=debug")
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("billing_cli=info,billing_core=warn")
            .init();
    }

    // Missing required configuration is fatal before any command logic runs.
    let config = match PortalConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            ui::error(&e.to_string());
            std::process::exit(1);
        }
    };

    // Setup storage directory
    let storage_dir = if let Some(dir) = cli.storage_dir {
        std::path::PathBuf::from(dir)
    } else {
        dirs::data_local_dir()
            .unwrap_or_else(|| std::path::PathBuf::from("."))
            .join("billing-portal")
    };

    let mut ctx = PortalContext::new(config, &storage_dir);

    // Dispatch commands
    match cli.command {
        Commands::Login { credential, email } => {
            commands::login::login(&mut ctx, credential, email).await?;
        }
        Commands::Logout => {
            commands::login::logout(&mut ctx)?;
        }
        Commands::Whoami => {
            commands::whoami::run(&ctx)?;
        }
        Commands::List { product, location } => {
            commands::records::list(&mut ctx, product, location).await?;
        }
        Commands::Create {
            product,
            location,
            premium,
            email,
            first_name,
            last_name,
            photo,
        } => {
            commands::records::create(
                &mut ctx, product, location, premium, email, first_name, last_name, photo,
            )
            .await?;
        }
        Commands::Update {
            id,
            location,
            premium,
            email,
        } => {
            commands::records::update(&mut ctx, id, location, premium, email).await?;
        }
        Commands::Delete { id, yes } => {
            commands::records::delete(&mut ctx, id, yes).await?;
        }
        Commands::Reveal { id } => {
            commands::reveal::run(&mut ctx, id).await?;
        }
    }

    Ok(())
}
