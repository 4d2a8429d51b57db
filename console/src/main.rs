//! Ticketdesk console entry point.
//!
//! Thin glue only: environment, logging, one snapshot load, and a summary
//! of what the store holds. Presentation lives elsewhere.

use ticketdesk_client::HttpEntityStore;
use ticketdesk_console::{Config, Session};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_level))
        .init();

    tracing::info!(
        store = %config.store_url,
        authenticated = config.token.is_some(),
        "starting ticketdesk console"
    );

    let store = HttpEntityStore::new(&config.store_url, config.credentials());
    let mut session = Session::new(store);
    session.refresh().await?;

    for (status, count) in session.snapshot().counts_by_status() {
        tracing::info!(status = status.as_str(), count, "tickets by status");
    }
    let unlinked = session
        .snapshot()
        .enriched
        .iter()
        .filter(|row| row.resolved_customer_email.is_none())
        .count();
    tracing::info!(unlinked, "rows without a resolved customer email");

    Ok(())
}
