//! FindMyStore CLI - search stores, compare prices and plan shopping trips.
//!
//! # Usage
//!
//! ```bash
//! # Grocery stores near Banjara Hills
//! fms stores --city "Banjara Hills" --category grocery
//!
//! # Stock of a product at store 3
//! fms stock 3 "Milk 1L"
//!
//! # Cheapest store for a product, capped at ₹150
//! fms cheapest "Rice 10kg" --max-price 150
//!
//! # Split a shopping list across stores
//! fms optimize "Milk 1L, Bread, Eggs (12)"
//! fms optimize --file list.yaml
//!
//! # Talk to the assistant (needs CLAUDE_API_KEY)
//! fms chat
//! ```
//!
//! Every invocation starts a fresh session: the store set, generated
//! inventory and alert subscriptions do not persist between runs. Set
//! `INVENTORY_SEED` for reproducible prices.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use findmystore_core::Category;
use rust_decimal::Decimal;

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "fms")]
#[command(author, version, about = "FindMyStore - local store finder and shopping planner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where to look for stores.
///
/// Without `--city` commands search the built-in demo stores.
#[derive(Debug, Clone, Args)]
pub struct ScopeArgs {
    /// City or neighbourhood to search
    #[arg(long)]
    pub city: Option<String>,

    /// Store category (grocery, pharmacy, electronics, clothing, bakery, restaurant)
    #[arg(long)]
    pub category: Option<Category>,

    /// Search radius in kilometres
    #[arg(long, default_value_t = 6.0)]
    pub radius_km: f64,

    /// Only stores open right now (live search with a category only)
    #[arg(long)]
    pub open_now: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List stores and make them the current store set
    Stores {
        #[command(flatten)]
        scope: ScopeArgs,
    },
    /// Show stock and price of a product at one store
    Stock {
        /// Store ID
        store_id: i32,
        /// Product name
        product: String,
        #[command(flatten)]
        scope: ScopeArgs,
    },
    /// Find the cheapest store that has a product in stock
    Cheapest {
        /// Product name
        product: String,
        /// Ignore offers above this price
        #[arg(long)]
        max_price: Option<Decimal>,
        #[command(flatten)]
        scope: ScopeArgs,
    },
    /// Compare a product's price across every store
    Compare {
        /// Product name
        product: String,
        #[command(flatten)]
        scope: ScopeArgs,
    },
    /// Plan the cheapest set of stores for a shopping list
    Optimize {
        /// Comma-separated items
        items: Option<String>,
        /// YAML file with a list of items
        #[arg(short, long, conflicts_with = "items")]
        file: Option<PathBuf>,
        #[command(flatten)]
        scope: ScopeArgs,
    },
    /// Google Maps driving directions to a store
    Directions {
        /// Store ID
        store_id: i32,
        /// Starting point (address or "lat,lng")
        #[arg(long)]
        origin: Option<String>,
        #[command(flatten)]
        scope: ScopeArgs,
    },
    /// Subscribe to restock alerts for a product (demo)
    Subscribe {
        /// Product name
        product: String,
        /// City to watch
        #[arg(long)]
        city: Option<String>,
    },
    /// Add stock for a product at a store (demo)
    Restock {
        /// Store ID
        store_id: i32,
        /// Product name
        product: String,
        /// Units to add
        #[arg(short, long)]
        quantity: Option<u32>,
    },
    /// Chat with the shopping assistant
    Chat {
        /// Send a single message instead of starting an interactive session
        #[arg(short, long)]
        message: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "findmystore_server=warn,findmystore_cli=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut ctx = commands::Context::load()?;

    match cli.command {
        Commands::Stores { scope } => commands::stores::list(&mut ctx, &scope).await?,
        Commands::Stock {
            store_id,
            product,
            scope,
        } => commands::stores::stock(&mut ctx, &scope, store_id, &product).await?,
        Commands::Cheapest {
            product,
            max_price,
            scope,
        } => commands::pricing::cheapest(&mut ctx, &scope, &product, max_price).await?,
        Commands::Compare { product, scope } => {
            commands::pricing::compare(&mut ctx, &scope, &product).await?;
        }
        Commands::Optimize { items, file, scope } => {
            let items = match file {
                Some(path) => commands::shopping::read_list_file(&path)?,
                None => commands::shopping::split_items(items.as_deref().unwrap_or_default()),
            };
            commands::shopping::optimize(&mut ctx, &scope, &items).await?;
        }
        Commands::Directions {
            store_id,
            origin,
            scope,
        } => commands::stores::directions(&mut ctx, &scope, store_id, origin.as_deref()).await?,
        Commands::Subscribe { product, city } => {
            commands::alerts::subscribe(&mut ctx, &product, city.as_deref())?;
        }
        Commands::Restock {
            store_id,
            product,
            quantity,
        } => commands::alerts::restock(&mut ctx, store_id, &product, quantity)?,
        Commands::Chat { message } => commands::chat::run(&mut ctx, message.as_deref()).await?,
    }
    Ok(())
}
