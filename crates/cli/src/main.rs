//! Ironyard CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! iy-cli migrate
//!
//! # Load the catalog from YAML, replacing what is there
//! iy-cli seed catalog --file crates/storefront/seed/catalog.yaml --clear
//!
//! # Show the 20 most recent order requests
//! iy-cli orders list --limit 20
//!
//! # Show one order request with its lines
//! iy-cli orders show 0b6f1c9e-3f1a-4c8e-9d2a-5e7b8c9d0a1b
//! ```
//!
//! # Environment Variables
//!
//! - `IRONYARD_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

use ironyard_core::OrderId;

mod commands;

#[derive(Parser)]
#[command(name = "iy-cli")]
#[command(author, version, about = "Ironyard CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run storefront database migrations
    Migrate,
    /// Seed the database from files
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Inspect recorded order requests
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Upsert categories, brands and products from a YAML file
    Catalog {
        /// Path to the YAML catalog file
        #[arg(short, long)]
        file: String,

        /// Delete the existing catalog first (orders are kept)
        #[arg(long)]
        clear: bool,
    },
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List order requests, newest first
    List {
        /// Maximum number of orders to show
        #[arg(short, long, default_value_t = 20)]
        limit: i64,
    },
    /// Show a single order request
    Show {
        /// Order id (UUID)
        id: OrderId,
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
        Commands::Migrate => commands::migrate::storefront().await?,
        Commands::Seed { target } => match target {
            SeedTarget::Catalog { file, clear } => commands::seed::catalog(&file, clear).await?,
        },
        Commands::Orders { action } => match action {
            OrdersAction::List { limit } => commands::orders::list(limit).await?,
            OrdersAction::Show { id } => commands::orders::show(id).await?,
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_seed_catalog() {
        let cli = Cli::try_parse_from(["iy-cli", "seed", "catalog", "-f", "catalog.yaml", "--clear"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Seed {
                target: SeedTarget::Catalog { clear: true, .. }
            })
        ));
    }

    #[test]
    fn test_orders_show_requires_uuid() {
        let id = "0b6f1c9e-3f1a-4c8e-9d2a-5e7b8c9d0a1b";
        let cli = Cli::try_parse_from(["iy-cli", "orders", "show", id]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Orders {
                action: OrdersAction::Show { id: parsed }
            }) if parsed.to_string() == id
        ));
        assert!(Cli::try_parse_from(["iy-cli", "orders", "show", "42"]).is_err());
    }

    #[test]
    fn test_orders_list_default_limit() {
        let cli = Cli::try_parse_from(["iy-cli", "orders", "list"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Orders {
                action: OrdersAction::List { limit: 20 }
            })
        ));
    }
}
