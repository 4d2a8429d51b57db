//! The ticket lifecycle state machine.
//!
//! Transitions are planned, not executed: [`plan`] validates an operator's
//! intent against the current status and the transition's required payload,
//! then returns the [`TicketPatch`] the shell submits to the entity store.
//! Rejection happens before any write exists to roll back; a failed store
//! write leaves in-memory state untouched by construction, and a retry is a
//! new explicit attempt.
//!
//! Transition table:
//!
//! | From | To | Required payload |
//! |---|---|---|
//! | `pending` | `paid` | `customer_payment`, `payment_date` |
//! | `paid` | `complete` | `selling_price`, `zone`, `row`, `seat` |
//! | `paid` | `cancel` | — (refund sub-state forced to `in_process`) |
//! | `paid` / `complete` / `cancel` | `pending` | — (aux fields left as-is) |
//!
//! The refund sub-state has a single guarded move, `in_process → refunded`,
//! valid only while the ticket is cancelled. Everything else on the refund
//! axis is an out-of-band administrative override, not part of this
//! contract.

use crate::types::{RefundStatus, TicketPatch, TicketStatus};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ============================================================================
// Transitions
// ============================================================================

/// An operator's transition intent, with the payload the transition needs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    /// `pending → paid`, recording how and when the customer paid.
    MarkPaid {
        /// Payment reference.
        customer_payment: String,
        /// Payment date, free text per the store.
        payment_date: String,
    },
    /// `paid → complete`, recording the sale and seat assignment.
    MarkCompleted {
        /// Selling price.
        selling_price: String,
        /// Seating zone.
        zone: String,
        /// Seating row.
        row: String,
        /// Seat number.
        seat: String,
    },
    /// `paid → cancel`; always enters with `refund_status = in_process`.
    MarkCancelled,
    /// Revert to `pending` from any later status.
    RevertToPending,
}

impl Transition {
    /// The payload-free kind of this transition.
    #[must_use]
    pub const fn kind(&self) -> TransitionKind {
        match self {
            Self::MarkPaid { .. } => TransitionKind::MarkPaid,
            Self::MarkCompleted { .. } => TransitionKind::MarkCompleted,
            Self::MarkCancelled => TransitionKind::MarkCancelled,
            Self::RevertToPending => TransitionKind::RevertToPending,
        }
    }
}

/// A transition without its payload: what the console's action menus offer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    /// `pending → paid`.
    MarkPaid,
    /// `paid → complete`.
    MarkCompleted,
    /// `paid → cancel`.
    MarkCancelled,
    /// Back to `pending`.
    RevertToPending,
}

impl TransitionKind {
    /// The transitions an operator may initiate from `status`, in the order
    /// the console offers them.
    #[must_use]
    pub const fn available_for(status: TicketStatus) -> &'static [Self] {
        match status {
            TicketStatus::Pending => &[Self::MarkPaid],
            TicketStatus::Paid => &[Self::MarkCompleted, Self::MarkCancelled, Self::RevertToPending],
            TicketStatus::Complete | TicketStatus::Cancel => &[Self::RevertToPending],
        }
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MarkPaid => "mark paid",
            Self::MarkCompleted => "mark completed",
            Self::MarkCancelled => "mark cancelled",
            Self::RevertToPending => "revert to pending",
        })
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Why a transition was rejected. Nothing was written.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    /// The transition does not exist from the ticket's current status.
    #[error("cannot {attempted} a {from} ticket")]
    NotAllowed {
        /// The ticket's current status.
        from: TicketStatus,
        /// What the operator tried to do.
        attempted: TransitionKind,
    },

    /// A required payload field is absent or empty.
    #[error("{field} is required to {attempted}")]
    MissingField {
        /// Wire name of the offending field.
        field: &'static str,
        /// The transition that needed it.
        attempted: TransitionKind,
    },

    /// Refund changes are only legal on a cancelled ticket.
    #[error("refund status can only change on a cancelled ticket (status is {status})")]
    RefundNotCancelled {
        /// The ticket's current status.
        status: TicketStatus,
    },

    /// The sole guarded refund move is `in_process → refunded`.
    #[error("refund is {refund}; only an in-process refund can be marked refunded")]
    RefundNotInProcess {
        /// The ticket's current refund sub-state.
        refund: RefundStatus,
    },
}

// ============================================================================
// Planning
// ============================================================================

fn require(
    attempted: TransitionKind,
    field: &'static str,
    value: &str,
) -> Result<String, TransitionError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TransitionError::MissingField { field, attempted });
    }
    Ok(trimmed.to_string())
}

/// Validate `transition` against `current` and plan the store write.
///
/// # Errors
///
/// [`TransitionError::NotAllowed`] when the pair is outside the transition
/// table, [`TransitionError::MissingField`] when a required payload field is
/// absent or empty. Either way, no write has happened.
pub fn plan(
    current: TicketStatus,
    transition: &Transition,
) -> Result<TicketPatch, TransitionError> {
    let attempted = transition.kind();
    match (transition, current) {
        (
            Transition::MarkPaid {
                customer_payment,
                payment_date,
            },
            TicketStatus::Pending,
        ) => Ok(TicketPatch {
            status: Some(TicketStatus::Paid),
            customer_payment: Some(require(attempted, "customer_payment", customer_payment)?),
            payment_date: Some(require(attempted, "payment_date", payment_date)?),
            ..TicketPatch::default()
        }),

        (
            Transition::MarkCompleted {
                selling_price,
                zone,
                row,
                seat,
            },
            TicketStatus::Paid,
        ) => Ok(TicketPatch {
            status: Some(TicketStatus::Complete),
            selling_price: Some(require(attempted, "selling_price", selling_price)?),
            zone: Some(require(attempted, "zone", zone)?),
            row: Some(require(attempted, "row", row)?),
            seat: Some(require(attempted, "seat", seat)?),
            ..TicketPatch::default()
        }),

        // Entry into cancel always re-initializes the refund sub-state,
        // whatever stale value the ticket carried.
        (Transition::MarkCancelled, TicketStatus::Paid) => Ok(TicketPatch {
            status: Some(TicketStatus::Cancel),
            refund_status: Some(RefundStatus::InProcess),
            ..TicketPatch::default()
        }),

        // Revert touches status only; aux fields from the prior state stay.
        (
            Transition::RevertToPending,
            TicketStatus::Paid | TicketStatus::Complete | TicketStatus::Cancel,
        ) => Ok(TicketPatch {
            status: Some(TicketStatus::Pending),
            ..TicketPatch::default()
        }),

        _ => Err(TransitionError::NotAllowed {
            from: current,
            attempted,
        }),
    }
}

/// Plan the sole guarded refund move, `in_process → refunded`.
///
/// # Errors
///
/// [`TransitionError::RefundNotCancelled`] off `cancel`,
/// [`TransitionError::RefundNotInProcess`] when the refund sub-state is not
/// `in_process`.
pub fn plan_refund(
    current: TicketStatus,
    refund: RefundStatus,
) -> Result<TicketPatch, TransitionError> {
    if current != TicketStatus::Cancel {
        return Err(TransitionError::RefundNotCancelled { status: current });
    }
    if refund != RefundStatus::InProcess {
        return Err(TransitionError::RefundNotInProcess { refund });
    }
    Ok(TicketPatch {
        refund_status: Some(RefundStatus::Refunded),
        ..TicketPatch::default()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn mark_paid() -> Transition {
        Transition::MarkPaid {
            customer_payment: "tx-99".to_string(),
            payment_date: "2026-08-01".to_string(),
        }
    }

    fn mark_completed() -> Transition {
        Transition::MarkCompleted {
            selling_price: "120".to_string(),
            zone: "B".to_string(),
            row: "4".to_string(),
            seat: "12".to_string(),
        }
    }

    #[test]
    fn pending_to_paid_carries_payment_fields() {
        let patch = plan(TicketStatus::Pending, &mark_paid()).unwrap();
        assert_eq!(patch.status, Some(TicketStatus::Paid));
        assert_eq!(patch.customer_payment.as_deref(), Some("tx-99"));
        assert_eq!(patch.payment_date.as_deref(), Some("2026-08-01"));
        assert_eq!(patch.refund_status, None);
    }

    #[test]
    fn pending_to_paid_rejects_empty_payment_before_any_write() {
        let transition = Transition::MarkPaid {
            customer_payment: String::new(),
            payment_date: "2026-08-01".to_string(),
        };
        assert_eq!(
            plan(TicketStatus::Pending, &transition),
            Err(TransitionError::MissingField {
                field: "customer_payment",
                attempted: TransitionKind::MarkPaid,
            })
        );

        let blank = Transition::MarkPaid {
            customer_payment: "   ".to_string(),
            payment_date: "2026-08-01".to_string(),
        };
        assert!(plan(TicketStatus::Pending, &blank).is_err());
    }

    #[test]
    fn pending_to_complete_does_not_exist() {
        assert_eq!(
            plan(TicketStatus::Pending, &mark_completed()),
            Err(TransitionError::NotAllowed {
                from: TicketStatus::Pending,
                attempted: TransitionKind::MarkCompleted,
            })
        );
    }

    #[test]
    fn paid_to_complete_requires_every_seating_field() {
        let patch = plan(TicketStatus::Paid, &mark_completed()).unwrap();
        assert_eq!(patch.status, Some(TicketStatus::Complete));
        assert_eq!(patch.seat.as_deref(), Some("12"));

        let missing_seat = Transition::MarkCompleted {
            selling_price: "120".to_string(),
            zone: "B".to_string(),
            row: "4".to_string(),
            seat: String::new(),
        };
        assert_eq!(
            plan(TicketStatus::Paid, &missing_seat),
            Err(TransitionError::MissingField {
                field: "seat",
                attempted: TransitionKind::MarkCompleted,
            })
        );
    }

    #[test]
    fn cancel_always_enters_with_refund_in_process() {
        let patch = plan(TicketStatus::Paid, &Transition::MarkCancelled).unwrap();
        assert_eq!(patch.status, Some(TicketStatus::Cancel));
        assert_eq!(patch.refund_status, Some(RefundStatus::InProcess));
    }

    #[test]
    fn cancel_is_only_reachable_from_paid() {
        for from in [TicketStatus::Pending, TicketStatus::Complete, TicketStatus::Cancel] {
            assert!(matches!(
                plan(from, &Transition::MarkCancelled),
                Err(TransitionError::NotAllowed { .. })
            ));
        }
    }

    #[test]
    fn revert_is_status_only_and_not_from_pending() {
        for from in [TicketStatus::Paid, TicketStatus::Complete, TicketStatus::Cancel] {
            let patch = plan(from, &Transition::RevertToPending).unwrap();
            assert_eq!(patch.status, Some(TicketStatus::Pending));
            // Aux fields from the prior state are left untouched.
            assert_eq!(patch, TicketPatch {
                status: Some(TicketStatus::Pending),
                ..TicketPatch::default()
            });
        }
        assert!(plan(TicketStatus::Pending, &Transition::RevertToPending).is_err());
    }

    #[test]
    fn refund_moves_forward_only_on_cancelled_tickets() {
        let patch = plan_refund(TicketStatus::Cancel, RefundStatus::InProcess).unwrap();
        assert_eq!(patch.refund_status, Some(RefundStatus::Refunded));
        assert_eq!(patch.status, None);

        assert_eq!(
            plan_refund(TicketStatus::Paid, RefundStatus::InProcess),
            Err(TransitionError::RefundNotCancelled {
                status: TicketStatus::Paid,
            })
        );
        assert_eq!(
            plan_refund(TicketStatus::Cancel, RefundStatus::Refunded),
            Err(TransitionError::RefundNotInProcess {
                refund: RefundStatus::Refunded,
            })
        );
        assert_eq!(
            plan_refund(TicketStatus::Cancel, RefundStatus::None),
            Err(TransitionError::RefundNotInProcess {
                refund: RefundStatus::None,
            })
        );
    }

    #[test]
    fn action_menus_follow_the_table() {
        assert_eq!(
            TransitionKind::available_for(TicketStatus::Pending),
            &[TransitionKind::MarkPaid]
        );
        assert_eq!(
            TransitionKind::available_for(TicketStatus::Paid),
            &[
                TransitionKind::MarkCompleted,
                TransitionKind::MarkCancelled,
                TransitionKind::RevertToPending,
            ]
        );
        assert_eq!(
            TransitionKind::available_for(TicketStatus::Complete),
            &[TransitionKind::RevertToPending]
        );
    }
}
