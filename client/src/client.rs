//! Entity store client implementation.

use crate::error::StoreError;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use ticketdesk_core::types::{Customer, Order, Ticket, TicketPatch};

/// Read/partial-update access to the entity store's three collections.
///
/// The console programs against this trait; production uses
/// [`HttpEntityStore`], tests an in-memory fake.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Fetch the tickets snapshot.
    ///
    /// # Errors
    ///
    /// [`StoreError::Transport`] or [`StoreError::Api`] on failure; a
    /// malformed body is an empty snapshot, not an error.
    async fn list_tickets(&self) -> Result<Vec<Ticket>, StoreError>;

    /// Fetch the orders snapshot.
    ///
    /// # Errors
    ///
    /// As [`EntityStore::list_tickets`].
    async fn list_orders(&self) -> Result<Vec<Order>, StoreError>;

    /// Fetch the customers snapshot.
    ///
    /// # Errors
    ///
    /// As [`EntityStore::list_tickets`].
    async fn list_customers(&self) -> Result<Vec<Customer>, StoreError>;

    /// Apply a state-machine-planned patch to one ticket.
    ///
    /// # Errors
    ///
    /// [`StoreError::Api`] carries the store's error body verbatim;
    /// [`StoreError::Parse`] flags an undecodable success body. No retry.
    async fn update_ticket(&self, id: u64, patch: &TicketPatch) -> Result<Ticket, StoreError>;
}

/// Bearer credentials for the entity store.
///
/// Always an explicit parameter, never ambient process state. The token
/// comes from whatever login flow populated the process-local credential
/// store; when there is none, requests proceed unauthenticated.
#[derive(Clone, Debug, Default)]
pub struct Credentials(Option<String>);

impl Credentials {
    /// Authenticate with a bearer token.
    #[must_use]
    pub fn bearer(token: impl Into<String>) -> Self {
        Self(Some(token.into()))
    }

    /// No credentials; requests go out without an `Authorization` header.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self(None)
    }

    /// The bearer token, if any.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

/// Production entity store client over REST/JSON.
#[derive(Clone)]
pub struct HttpEntityStore {
    http: Client,
    base_url: String,
    credentials: Credentials,
}

impl HttpEntityStore {
    /// Create a client for the store at `base_url` with the given
    /// credentials.
    #[must_use]
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: Client::new(),
            base_url,
            credentials,
        }
    }

    fn collection_url(&self, resource: &str) -> String {
        format!("{}/api/{resource}/", self.base_url)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.credentials.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn list<T: DeserializeOwned>(&self, resource: &str) -> Result<Vec<T>, StoreError> {
        let response = self
            .authorize(self.http.get(self.collection_url(resource)))
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| StoreError::Parse(e.to_string()))?;
        Ok(decode_listing(resource, body))
    }
}

/// Decode a collection body: a bare list, a `{"results": [...]}` envelope,
/// or — for any other shape — an empty collection. Reads degrade, they
/// don't fail.
fn decode_listing<T: DeserializeOwned>(resource: &str, body: serde_json::Value) -> Vec<T> {
    let items = match body {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(mut envelope) => match envelope.remove("results") {
            Some(serde_json::Value::Array(items)) => items,
            _ => {
                tracing::warn!(resource, "collection body without a results list; treating as empty");
                return Vec::new();
            }
        },
        _ => {
            tracing::warn!(resource, "non-collection body; treating as empty");
            return Vec::new();
        }
    };
    match serde_json::from_value(serde_json::Value::Array(items)) {
        Ok(decoded) => decoded,
        Err(error) => {
            tracing::warn!(resource, %error, "undecodable collection items; treating as empty");
            Vec::new()
        }
    }
}

#[async_trait]
impl EntityStore for HttpEntityStore {
    async fn list_tickets(&self) -> Result<Vec<Ticket>, StoreError> {
        self.list("tickets").await
    }

    async fn list_orders(&self) -> Result<Vec<Order>, StoreError> {
        self.list("orders").await
    }

    async fn list_customers(&self) -> Result<Vec<Customer>, StoreError> {
        self.list("customers").await
    }

    async fn update_ticket(&self, id: u64, patch: &TicketPatch) -> Result<Ticket, StoreError> {
        let url = format!("{}{id}/", self.collection_url("tickets"));
        let response = self
            .authorize(self.http.patch(url))
            .json(patch)
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        if !status.is_success() {
            // The operator sees the store's complaint exactly as sent.
            return Err(StoreError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        serde_json::from_str(&body).map_err(|e| StoreError::Parse(e.to_string()))
    }
}
