//! Composition client binary.
//!
//! Composition root: builds the HTTP client from the environment,
//! restores the session from the persisted token, and drives the
//! article listing against a running blog server.
//!
//! Configuration:
//! - `COMPOSITION_API_URL`: blog server base URL (default `http://localhost:8080`)
//! - `COMPOSITION_TOKEN_FILE`: token path (default `.composition-token`)
//! - `RUST_LOG`: tracing filter

use std::time::Duration;

use composition_api::{ApiConfig, HttpApi};
use composition_articles::{ArticlesEnvironment, ListingAction, ListingReducer, ListingState};
use composition_runtime::Store;
use composition_session::flows;
use composition_session::{FileTokenStore, SessionEnvironment, SessionReducer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const TOKEN_FILE_ENV: &str = "COMPOSITION_TOKEN_FILE";
const DEFAULT_TOKEN_FILE: &str = ".composition-token";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "composition=info,composition_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env();
    tracing::info!(base_url = %config.base_url, "Starting Composition client");
    let api = HttpApi::new(config);

    let token_path =
        std::env::var(TOKEN_FILE_ENV).unwrap_or_else(|_| DEFAULT_TOKEN_FILE.to_string());
    let tokens = FileTokenStore::new(token_path);

    // Restore the session from whatever token survived the last run.
    let session = flows::bootstrap(&tokens)?;
    if session.is_logged_in {
        println!("Signed in as {}", session.username);
    } else {
        println!("Not signed in");
    }

    let session_store = Store::new(
        session,
        SessionReducer::new(),
        SessionEnvironment::new(api.clone()),
    );

    // Drive the listing the way the routed view would: mount it with the
    // query string given on the command line (e.g. "?page=2").
    let query = std::env::args().nth(1).unwrap_or_default();
    let listing_store = Store::new(
        ListingState::default(),
        ListingReducer::new(),
        ArticlesEnvironment::new(api),
    );

    let mut fetch = listing_store.send(ListingAction::Mounted { query }).await?;
    fetch.wait().await;

    let listing = listing_store.state(Clone::clone).await;
    match listing.error {
        Some(message) => println!("Could not load page {}: {message}", listing.page),
        None => {
            println!("Page {} ({} previews)", listing.page, listing.previews.len());
            for preview in &listing.previews {
                println!(
                    "  #{} {} by {} ({})",
                    preview.id,
                    preview.title,
                    preview.username,
                    preview.created_at.format("%Y-%m-%d")
                );
            }
            if listing.show_previous() {
                println!("  [Previous: ?page={}]", listing.page - 1);
            }
            if listing.show_next() {
                println!("  [Next: ?page={}]", listing.page + 1);
            }
        },
    }

    listing_store.shutdown(Duration::from_secs(5)).await?;
    session_store.shutdown(Duration::from_secs(5)).await?;
    Ok(())
}
