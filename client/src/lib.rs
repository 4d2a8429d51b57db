//! # Ticketdesk Entity Store Client
//!
//! The seam between the admin console and the entity store — the external
//! REST/JSON service holding the `tickets`, `orders`, and `customers`
//! collections. [`EntityStore`] is the object-safe trait the console
//! programs against; [`HttpEntityStore`] is the production implementation.
//!
//! ## Example
//!
//! ```no_run
//! use ticketdesk_client::{Credentials, EntityStore, HttpEntityStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = HttpEntityStore::new(
//!         "http://127.0.0.1:8000",
//!         Credentials::bearer("session-token"),
//!     );
//!
//!     let tickets = store.list_tickets().await?;
//!     println!("{} tickets", tickets.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Contract
//!
//! - List reads tolerate both a bare JSON array and a `{"results": [...]}`
//!   envelope; any other shape resolves to an empty collection.
//! - Write errors surface the store's response body verbatim.
//! - Credentials are an explicit constructor parameter; an absent token is
//!   tolerated and requests simply go out unauthenticated.

pub mod client;
pub mod error;

pub use client::{Credentials, EntityStore, HttpEntityStore};
pub use error::StoreError;
