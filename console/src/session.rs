//! The admin session: snapshot state plus the read and write paths.

use chrono::{DateTime, Utc};
use thiserror::Error;
use ticketdesk_client::{EntityStore, StoreError};
use ticketdesk_core::draft::{DraftError, TransitionDraft};
use ticketdesk_core::enrich::{CustomerIndex, EnrichedTicket, OrderIndex, enrich};
use ticketdesk_core::machine::{self, Transition, TransitionError};
use ticketdesk_core::types::{
    Customer, Order, RefundStatus, Ticket, TicketPatch, TicketStatus,
};
use ticketdesk_core::view::filter_tickets;

/// Session errors. None are fatal; every one is recoverable by operator
/// retry.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The targeted ticket is not in the current snapshot.
    #[error("ticket {0} is not in the current snapshot")]
    UnknownTicket(u64),

    /// The draft was incomplete or inconsistent; nothing left the console.
    #[error("draft error: {0}")]
    Draft(#[from] DraftError),

    /// The state machine rejected the transition; nothing was written.
    #[error("transition rejected: {0}")]
    Transition(#[from] TransitionError),

    /// The entity store call failed; prior state is preserved.
    #[error("entity store error: {0}")]
    Store(#[from] StoreError),
}

/// One consistent load of the three collections plus the derived rows.
#[derive(Debug, Default, Clone)]
pub struct Snapshot {
    /// Tickets as fetched.
    pub tickets: Vec<Ticket>,
    /// Orders as fetched.
    pub orders: Vec<Order>,
    /// Customers as fetched.
    pub customers: Vec<Customer>,
    /// Enriched rows, recomputed in full on every load.
    pub enriched: Vec<EnrichedTicket>,
    /// When this snapshot finished loading; `None` before the first load.
    pub loaded_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    /// Ticket counts per lifecycle status, in display order.
    #[must_use]
    pub fn counts_by_status(&self) -> [(TicketStatus, usize); 4] {
        TicketStatus::ALL.map(|status| {
            let count = self.tickets.iter().filter(|t| t.status == status).count();
            (status, count)
        })
    }
}

/// An operator's session against the entity store.
///
/// Reads and writes are serial per session; a write is always followed by a
/// [`Session::refresh`] so the displayed state reflects the store's latest
/// value even when other operators edit concurrently.
pub struct Session<S> {
    store: S,
    snapshot: Snapshot,
    last_error: Option<String>,
}

impl<S: EntityStore> Session<S> {
    /// Create a session with an empty snapshot; call [`Session::refresh`]
    /// before showing anything.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self {
            store,
            snapshot: Snapshot {
                tickets: Vec::new(),
                orders: Vec::new(),
                customers: Vec::new(),
                enriched: Vec::new(),
                loaded_at: None,
            },
            last_error: None,
        }
    }

    /// The underlying store (primarily for tests).
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// The current snapshot.
    #[must_use]
    pub const fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// The error from the last failed load or write, if the operator has
    /// not recovered it yet. One report per load cycle.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Fetch all three collections concurrently and rebuild the enriched
    /// rows.
    ///
    /// Aggregation only ever runs over a complete snapshot: if any fetch
    /// fails, the whole load cycle fails with that one error and the
    /// previous snapshot stays in place.
    ///
    /// # Errors
    ///
    /// [`SessionError::Store`] with the first fetch failure.
    pub async fn refresh(&mut self) -> Result<(), SessionError> {
        let store = &self.store;
        let loaded = tokio::try_join!(
            store.list_tickets(),
            store.list_orders(),
            store.list_customers(),
        );
        match loaded {
            Ok((tickets, orders, customers)) => {
                let order_index = OrderIndex::from_snapshot(&orders);
                let customer_index = CustomerIndex::from_snapshot(&customers);
                let enriched = enrich(&tickets, &order_index, &customer_index);
                tracing::info!(
                    tickets = tickets.len(),
                    orders = orders.len(),
                    customers = customers.len(),
                    "snapshot refreshed"
                );
                self.snapshot = Snapshot {
                    tickets,
                    orders,
                    customers,
                    enriched,
                    loaded_at: Some(Utc::now()),
                };
                self.last_error = None;
                Ok(())
            }
            Err(error) => {
                tracing::warn!(%error, "snapshot load failed; keeping previous snapshot");
                self.last_error = Some(error.to_string());
                Err(SessionError::Store(error))
            }
        }
    }

    /// The enriched rows matching `selector`: `"all"`, a status word in any
    /// case, or anything else for the empty fail-safe view.
    #[must_use]
    pub fn rows(&self, selector: &str) -> Vec<&EnrichedTicket> {
        filter_tickets(selector, &self.snapshot.enriched)
    }

    /// Submit a completed draft: validate, plan, write, reload.
    ///
    /// # Errors
    ///
    /// [`SessionError::Draft`] or [`SessionError::Transition`] before any
    /// network call; [`SessionError::Store`] when the write itself fails
    /// (snapshot untouched).
    pub async fn submit_draft(&mut self, draft: TransitionDraft) -> Result<(), SessionError> {
        let ticket_id = draft.ticket_id();
        let transition = draft.submit()?;
        self.submit_transition(ticket_id, &transition).await
    }

    /// Plan `transition` against the ticket's current status and execute it.
    ///
    /// # Errors
    ///
    /// As [`Session::submit_draft`], plus [`SessionError::UnknownTicket`].
    pub async fn submit_transition(
        &mut self,
        ticket_id: u64,
        transition: &Transition,
    ) -> Result<(), SessionError> {
        let (status, _) = self.ticket_state(ticket_id)?;
        let patch = machine::plan(status, transition)?;
        self.write_and_reload(ticket_id, &patch).await
    }

    /// `paid → cancel`; the refund sub-state enters as `in_process`.
    ///
    /// # Errors
    ///
    /// As [`Session::submit_transition`].
    pub async fn mark_cancelled(&mut self, ticket_id: u64) -> Result<(), SessionError> {
        self.submit_transition(ticket_id, &Transition::MarkCancelled)
            .await
    }

    /// Revert a ticket to `pending`, leaving auxiliary fields in place.
    ///
    /// # Errors
    ///
    /// As [`Session::submit_transition`].
    pub async fn revert_to_pending(&mut self, ticket_id: u64) -> Result<(), SessionError> {
        self.submit_transition(ticket_id, &Transition::RevertToPending)
            .await
    }

    /// Settle a cancelled ticket's refund: `in_process → refunded`.
    ///
    /// # Errors
    ///
    /// [`SessionError::Transition`] unless the ticket is cancelled with an
    /// in-process refund; otherwise as [`Session::submit_transition`].
    pub async fn mark_refunded(&mut self, ticket_id: u64) -> Result<(), SessionError> {
        let (status, refund) = self.ticket_state(ticket_id)?;
        let patch = machine::plan_refund(status, refund)?;
        self.write_and_reload(ticket_id, &patch).await
    }

    fn ticket_state(&self, ticket_id: u64) -> Result<(TicketStatus, RefundStatus), SessionError> {
        self.snapshot
            .tickets
            .iter()
            .find(|t| t.id == ticket_id)
            .map(|t| (t.status, t.refund_status))
            .ok_or(SessionError::UnknownTicket(ticket_id))
    }

    async fn write_and_reload(
        &mut self,
        ticket_id: u64,
        patch: &TicketPatch,
    ) -> Result<(), SessionError> {
        match self.store.update_ticket(ticket_id, patch).await {
            Ok(updated) => {
                tracing::info!(
                    ticket = ticket_id,
                    status = %updated.status,
                    "transition written"
                );
                // Reload unconditionally: the store's value is the truth,
                // including edits made meanwhile by other operators.
                self.refresh().await
            }
            Err(error) => {
                tracing::warn!(ticket = ticket_id, %error, "transition write failed");
                self.last_error = Some(error.to_string());
                Err(SessionError::Store(error))
            }
        }
    }
}
