//! Essenza CLI - Database migrations and seeding.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! ez-cli migrate
//!
//! # Seed a demo catalog (idempotent)
//! ez-cli seed --demo-products 8
//!
//! # Seed and pre-register an admin account by email
//! ez-cli seed --admin-email boss@essenza.shop
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "ez-cli")]
#[command(author, version, about = "Essenza CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database with demo data
    Seed {
        /// Number of demo products to ensure exist
        #[arg(long, default_value_t = 8)]
        demo_products: usize,

        /// Pre-register an admin account for this email
        #[arg(long)]
        admin_email: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed {
            demo_products,
            admin_email,
        } => commands::seed::run(demo_products, admin_email.as_deref()).await?,
    }
    Ok(())
}
