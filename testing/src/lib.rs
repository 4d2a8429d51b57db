//! In-memory testing utilities for ticketdesk.
//!
//! Provides fast, deterministic test infrastructure for the console:
//! - [`MemoryEntityStore`]: a vector-backed (order-preserving) entity store
//!   fake behind the production [`EntityStore`] trait, with read/write
//!   counters and per-call failure injection
//! - [`fixtures`]: minimal entity builders

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Lock poisoning is a test bug, not a contract

pub mod fixtures;

use async_trait::async_trait;
use std::sync::Mutex;
use ticketdesk_client::{EntityStore, StoreError};
use ticketdesk_core::types::{Customer, Order, Ticket, TicketPatch};

#[derive(Debug, Default)]
struct Inner {
    tickets: Vec<Ticket>,
    orders: Vec<Order>,
    customers: Vec<Customer>,
    fail_next_read: Option<StoreError>,
    fail_next_write: Option<StoreError>,
    reads: usize,
    writes: usize,
}

/// In-memory entity store for fast, deterministic session tests.
///
/// Patches are applied the way the real store applies them: only the named
/// fields change. Failure injection arms exactly one upcoming call, which is
/// how "prior state survives a failed write" gets exercised.
///
/// # Example
///
/// ```
/// use ticketdesk_client::EntityStore;
/// use ticketdesk_core::types::TicketStatus;
/// use ticketdesk_testing::{MemoryEntityStore, fixtures};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryEntityStore::new();
/// store.put_ticket(fixtures::ticket(1, TicketStatus::Pending));
/// assert_eq!(store.list_tickets().await?.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MemoryEntityStore {
    inner: Mutex<Inner>,
}

impl MemoryEntityStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a ticket by id.
    pub fn put_ticket(&self, ticket: Ticket) {
        let mut inner = self.inner.lock().unwrap();
        match inner.tickets.iter_mut().find(|t| t.id == ticket.id) {
            Some(slot) => *slot = ticket,
            None => inner.tickets.push(ticket),
        }
    }

    /// Insert an order.
    pub fn put_order(&self, order: Order) {
        self.inner.lock().unwrap().orders.push(order);
    }

    /// Insert a customer.
    pub fn put_customer(&self, customer: Customer) {
        self.inner.lock().unwrap().customers.push(customer);
    }

    /// Current state of a ticket, for assertions.
    #[must_use]
    pub fn ticket(&self, id: u64) -> Option<Ticket> {
        self.inner
            .lock()
            .unwrap()
            .tickets
            .iter()
            .find(|t| t.id == id)
            .cloned()
    }

    /// Fail the next single list call with `error`.
    pub fn fail_next_read(&self, error: StoreError) {
        self.inner.lock().unwrap().fail_next_read = Some(error);
    }

    /// Fail the next single update call with `error`, leaving the stored
    /// data untouched.
    pub fn fail_next_write(&self, error: StoreError) {
        self.inner.lock().unwrap().fail_next_write = Some(error);
    }

    /// Number of list calls served (including the failed one).
    #[must_use]
    pub fn reads(&self) -> usize {
        self.inner.lock().unwrap().reads
    }

    /// Number of update calls attempted (including the failed one).
    #[must_use]
    pub fn writes(&self) -> usize {
        self.inner.lock().unwrap().writes
    }

    fn read<T>(&self, pick: impl FnOnce(&Inner) -> Vec<T>) -> Result<Vec<T>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.reads += 1;
        if let Some(error) = inner.fail_next_read.take() {
            return Err(error);
        }
        Ok(pick(&inner))
    }
}

/// Apply `patch` to `ticket` exactly as the entity store would: only the
/// named fields change.
pub fn apply_patch(ticket: &mut Ticket, patch: &TicketPatch) {
    if let Some(status) = patch.status {
        ticket.status = status;
    }
    if let Some(refund_status) = patch.refund_status {
        ticket.refund_status = refund_status;
    }
    for (slot, value) in [
        (&mut ticket.customer_payment, &patch.customer_payment),
        (&mut ticket.payment_date, &patch.payment_date),
        (&mut ticket.selling_price, &patch.selling_price),
        (&mut ticket.zone, &patch.zone),
        (&mut ticket.row, &patch.row),
        (&mut ticket.seat, &patch.seat),
    ] {
        if value.is_some() {
            slot.clone_from(value);
        }
    }
}

#[async_trait]
impl EntityStore for MemoryEntityStore {
    async fn list_tickets(&self) -> Result<Vec<Ticket>, StoreError> {
        self.read(|inner| inner.tickets.clone())
    }

    async fn list_orders(&self) -> Result<Vec<Order>, StoreError> {
        self.read(|inner| inner.orders.clone())
    }

    async fn list_customers(&self) -> Result<Vec<Customer>, StoreError> {
        self.read(|inner| inner.customers.clone())
    }

    async fn update_ticket(&self, id: u64, patch: &TicketPatch) -> Result<Ticket, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.writes += 1;
        if let Some(error) = inner.fail_next_write.take() {
            return Err(error);
        }
        let Some(ticket) = inner.tickets.iter_mut().find(|t| t.id == id) else {
            return Err(StoreError::Api {
                status: 404,
                message: format!(r#"{{"detail":"ticket {id} not found"}}"#),
            });
        };
        apply_patch(ticket, patch);
        Ok(ticket.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use ticketdesk_core::types::{RefundStatus, TicketStatus};

    #[tokio::test]
    async fn patches_touch_only_named_fields() {
        let store = MemoryEntityStore::new();
        let mut ticket = fixtures::ticket(1, TicketStatus::Pending);
        ticket.passport_name = Some("A. Holder".to_string());
        store.put_ticket(ticket);

        let patch = TicketPatch {
            status: Some(TicketStatus::Paid),
            customer_payment: Some("tx-1".to_string()),
            payment_date: Some("2026-08-01".to_string()),
            ..TicketPatch::default()
        };
        let updated = store.update_ticket(1, &patch).await.unwrap();
        assert_eq!(updated.status, TicketStatus::Paid);
        assert_eq!(updated.passport_name.as_deref(), Some("A. Holder"));
        assert_eq!(updated.refund_status, RefundStatus::None);
    }

    #[tokio::test]
    async fn injected_write_failure_leaves_data_untouched() {
        let store = MemoryEntityStore::new();
        store.put_ticket(fixtures::ticket(1, TicketStatus::Pending));
        store.fail_next_write(StoreError::Transport("connection reset".to_string()));

        let patch = TicketPatch {
            status: Some(TicketStatus::Paid),
            ..TicketPatch::default()
        };
        assert!(store.update_ticket(1, &patch).await.is_err());
        assert_eq!(store.ticket(1).unwrap().status, TicketStatus::Pending);
        assert_eq!(store.writes(), 1);

        // The failure was armed for one call only.
        assert!(store.update_ticket(1, &patch).await.is_ok());
    }

    #[tokio::test]
    async fn unknown_ticket_writes_are_api_errors() {
        let store = MemoryEntityStore::new();
        let patch = TicketPatch::default();
        assert!(matches!(
            store.update_ticket(99, &patch).await,
            Err(StoreError::Api { status: 404, .. })
        ));
    }
}
