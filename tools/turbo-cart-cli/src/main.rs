//! turbo-cart - Command line shopping cart for TurboCommerce storefronts.
//!
//! Commands:
//! - `turbo-cart show` - List the cart
//! - `turbo-cart add <id>` - Add one unit of a product
//! - `turbo-cart remove <id>` - Remove a product
//! - `turbo-cart update <id> <amount>` - Set a product's amount
//! - `turbo-cart summary` - Show cart totals

mod commands;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use turbo_cart::CartError;

use commands::{ProductArgs, UpdateArgs};

/// turbo-cart - Manage a TurboCommerce shopping cart
#[derive(Parser)]
#[command(name = "turbo-cart")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the products in the cart
    Show,

    /// Add one unit of a product
    Add(ProductArgs),

    /// Remove a product from the cart
    Remove(ProductArgs),

    /// Set the amount of a product already in the cart
    Update(UpdateArgs),

    /// Show item counts and totals
    Summary,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = context::Context::load(config_path, output)?;

    // Execute command
    let result = match cli.command {
        Commands::Show => commands::show::run(&ctx).await,
        Commands::Add(args) => commands::add::run(args, &ctx).await,
        Commands::Remove(args) => commands::remove::run(args, &ctx).await,
        Commands::Update(args) => commands::update::run(args, &ctx).await,
        Commands::Summary => commands::summary::run(&ctx).await,
    };

    if let Err(e) = result {
        // Cart errors were already shown as a notice.
        if e.downcast_ref::<CartError>().is_some() {
            ctx.output.debug(&format!("{:#}", e));
        } else {
            ctx.output.error(&format!("{:#}", e));
        }
        std::process::exit(1);
    }

    Ok(())
}
