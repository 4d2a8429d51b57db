//! The transition request builder.
//!
//! A [`TransitionDraft`] is the pending-but-unconfirmed state of a
//! transition while the operator gathers its payload: opened against one
//! ticket and one transition kind with every field reset to empty, edited a
//! field at a time, and either dropped (no effect) or submitted. Submission
//! validates completeness and yields the typed [`Transition`] — an
//! incomplete draft is reported inline and never reaches the network.

use crate::machine::{Transition, TransitionKind};
use std::fmt;
use thiserror::Error;

/// One collectable field of a transition payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DraftField {
    /// Payment reference (`customer_payment`).
    CustomerPayment,
    /// Payment date (`payment_date`).
    PaymentDate,
    /// Selling price (`selling_price`).
    SellingPrice,
    /// Seating zone (`zone`).
    Zone,
    /// Seating row (`row`).
    Row,
    /// Seat number (`seat`).
    Seat,
}

impl DraftField {
    /// Wire name of the field, matching the ticket's JSON.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CustomerPayment => "customer_payment",
            Self::PaymentDate => "payment_date",
            Self::SellingPrice => "selling_price",
            Self::Zone => "zone",
            Self::Row => "row",
            Self::Seat => "seat",
        }
    }

    /// The fields `kind` requires, in the order the console collects them.
    #[must_use]
    pub const fn required_for(kind: TransitionKind) -> &'static [Self] {
        match kind {
            TransitionKind::MarkPaid => &[Self::CustomerPayment, Self::PaymentDate],
            TransitionKind::MarkCompleted => {
                &[Self::SellingPrice, Self::Zone, Self::Row, Self::Seat]
            }
            TransitionKind::MarkCancelled | TransitionKind::RevertToPending => &[],
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a draft edit or submission was rejected. Nothing left the console.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    /// The field is not part of this draft's transition.
    #[error("{field} does not belong to a {kind} draft")]
    ForeignField {
        /// The field the operator tried to edit.
        field: DraftField,
        /// The draft's transition kind.
        kind: TransitionKind,
    },

    /// One or more required fields are still empty.
    #[error("draft is incomplete: missing {}", .missing.join(", "))]
    Incomplete {
        /// Wire names of the empty fields.
        missing: Vec<&'static str>,
    },
}

/// Draft record for one in-flight transition.
///
/// Opening always resets: no field from a stale draft can leak into a new
/// transition. Dropping the draft is the cancel operation — no write, no
/// state change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionDraft {
    ticket_id: u64,
    kind: TransitionKind,
    values: Vec<(DraftField, String)>,
}

impl TransitionDraft {
    /// Open a draft for `kind` against `ticket_id`, every field empty.
    #[must_use]
    pub fn open(ticket_id: u64, kind: TransitionKind) -> Self {
        Self {
            ticket_id,
            kind,
            values: DraftField::required_for(kind)
                .iter()
                .map(|field| (*field, String::new()))
                .collect(),
        }
    }

    /// The ticket this draft targets.
    #[must_use]
    pub const fn ticket_id(&self) -> u64 {
        self.ticket_id
    }

    /// The transition this draft is collecting data for.
    #[must_use]
    pub const fn kind(&self) -> TransitionKind {
        self.kind
    }

    /// Current value of `field`, if it belongs to this draft.
    #[must_use]
    pub fn value(&self, field: DraftField) -> Option<&str> {
        self.values
            .iter()
            .find(|(slot, _)| *slot == field)
            .map(|(_, value)| value.as_str())
    }

    /// Update one field of the draft.
    ///
    /// # Errors
    ///
    /// [`DraftError::ForeignField`] when `field` is not in this transition's
    /// required-field set.
    pub fn edit(&mut self, field: DraftField, value: impl Into<String>) -> Result<(), DraftError> {
        let Some(slot) = self.values.iter_mut().find(|(slot, _)| *slot == field) else {
            return Err(DraftError::ForeignField {
                field,
                kind: self.kind,
            });
        };
        slot.1 = value.into();
        Ok(())
    }

    /// Validate completeness and hand off the typed transition.
    ///
    /// # Errors
    ///
    /// [`DraftError::Incomplete`] naming every still-empty field; the draft
    /// is consumed either way.
    pub fn submit(self) -> Result<Transition, DraftError> {
        let missing: Vec<&'static str> = self
            .values
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| field.name())
            .collect();
        if !missing.is_empty() {
            return Err(DraftError::Incomplete { missing });
        }

        Ok(match self.kind {
            TransitionKind::MarkPaid => Transition::MarkPaid {
                customer_payment: self.taken(DraftField::CustomerPayment),
                payment_date: self.taken(DraftField::PaymentDate),
            },
            TransitionKind::MarkCompleted => Transition::MarkCompleted {
                selling_price: self.taken(DraftField::SellingPrice),
                zone: self.taken(DraftField::Zone),
                row: self.taken(DraftField::Row),
                seat: self.taken(DraftField::Seat),
            },
            TransitionKind::MarkCancelled => Transition::MarkCancelled,
            TransitionKind::RevertToPending => Transition::RevertToPending,
        })
    }

    fn taken(&self, field: DraftField) -> String {
        self.value(field).unwrap_or_default().trim().to_string()
    }
}
