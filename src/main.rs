mod cli;

use crate::cli::app::App;
use cartlist::{ApiClient, ListController, SyncStrategy};
use clap::Parser;
use std::error::Error;

const DEFAULT_BACKEND_URL: &str = "http://localhost:4000";

#[derive(Parser)]
#[command(name = "cartlist")]
#[command(about = "Terminal client for the cartlist shopping list API")]
struct Cli {
    /// Base URL of the API server. Falls back to CARTLIST_BACKEND_URL.
    #[arg(long)]
    backend_url: Option<String>,

    /// Re-fetch the whole list after every change instead of merging locally.
    #[arg(long)]
    refetch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let backend_url = cli
        .backend_url
        .or_else(|| std::env::var("CARTLIST_BACKEND_URL").ok())
        .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());
    let strategy = if cli.refetch {
        SyncStrategy::Refetch
    } else {
        SyncStrategy::Optimistic
    };

    let api = ApiClient::new(&backend_url)?;
    let mut app = App::new(ListController::new(api, strategy));
    app.run().await?;
    Ok(())
}
