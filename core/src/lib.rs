//! # Ticketdesk Core
//!
//! Domain logic for the ticketdesk admin console: the ticket lifecycle state
//! machine, the cross-entity aggregation engine, and the supporting pieces
//! that turn raw entity-store snapshots into something an operator can act on.
//!
//! The crate is pure: no I/O, no async, no clocks. State changes are never
//! executed here — the state machine validates an operator's intent and
//! returns a [`types::TicketPatch`] *describing* the write, which the
//! imperative shell (the console crate) submits to the entity store. That
//! split is what guarantees there is no partial-write path and no optimistic
//! mutation to roll back when a write fails.
//!
//! ```text
//! Entity Store snapshots                Operator intent
//!   tickets / orders / customers          TransitionDraft (draft)
//!          │                                     │ submit
//!          ▼                                     ▼
//!   ident::resolve ──> enrich::enrich      machine::plan
//!          │                                     │
//!          ▼                                     ▼
//!   view::filter_tickets ──> rows         TicketPatch ──> PATCH /tickets/{id}
//! ```
//!
//! See the [`machine`] module for the transition table and the [`enrich`]
//! module for the join semantics.

pub mod draft;
pub mod enrich;
pub mod ident;
pub mod machine;
pub mod types;
pub mod view;

pub use draft::{DraftError, DraftField, TransitionDraft};
pub use enrich::{CustomerIndex, EnrichedTicket, OrderIndex, enrich};
pub use machine::{Transition, TransitionError, TransitionKind};
pub use types::{
    Customer, EntityRef, Order, RefundStatus, Ticket, TicketPatch, TicketStatus,
};
pub use view::{Column, StatusFilter, filter_tickets};
