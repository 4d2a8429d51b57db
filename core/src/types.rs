//! Domain types for the ticketdesk admin console.
//!
//! Entities mirror what the entity store serves: [`Ticket`] is the mutable
//! subject of the workflow, [`Order`] and [`Customer`] are read-only context
//! used by the aggregation engine. [`TicketPatch`] is the partial-update body
//! produced by the state machine and submitted by the shell.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// ============================================================================
// Status enums
// ============================================================================

/// Lifecycle status of a ticket.
///
/// Tickets are created by the store in [`TicketStatus::Pending`] and move
/// exclusively through the transitions in [`crate::machine`]. The wire
/// representation is the lowercase word; parsing tolerates any casing since
/// the store is known to emit mixed case.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// Awaiting payment; the only entry state.
    Pending,
    /// Payment recorded; awaiting seating.
    Paid,
    /// Seated and sold; terminal.
    Complete,
    /// Cancelled; terminal except for its refund sub-state.
    Cancel,
}

impl TicketStatus {
    /// All statuses in display order.
    pub const ALL: [Self; 4] = [Self::Pending, Self::Paid, Self::Complete, Self::Cancel];

    /// Parse a wire word, ignoring case. Unknown words yield `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "paid" => Some(Self::Paid),
            "complete" => Some(Self::Complete),
            "cancel" => Some(Self::Cancel),
            _ => None,
        }
    }

    /// The lowercase wire word.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Complete => "complete",
            Self::Cancel => "cancel",
        }
    }

    /// Human-readable label, as shown to operators.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Paid => "Paid",
            Self::Complete => "Completed",
            Self::Cancel => "Cancelled",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TicketStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).ok_or_else(|| {
            serde::de::Error::custom(format!("unrecognized ticket status `{raw}`"))
        })
    }
}

/// Refund sub-state of a cancelled ticket.
///
/// Only meaningful while the ticket's status is [`TicketStatus::Cancel`]; a
/// stale value may persist on other statuses and is ignored for display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefundStatus {
    /// No refund activity.
    #[default]
    None,
    /// Refund initiated; set automatically on entry into `cancel`.
    InProcess,
    /// Refund settled; terminal.
    Refunded,
}

impl RefundStatus {
    /// Parse a wire word, ignoring case. Unknown words yield `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "none" => Some(Self::None),
            "in_process" => Some(Self::InProcess),
            "refunded" => Some(Self::Refunded),
            _ => None,
        }
    }

    /// The lowercase wire word.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::InProcess => "in_process",
            Self::Refunded => "refunded",
        }
    }

    /// Human-readable label, as shown to operators.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::InProcess => "In Process",
            Self::Refunded => "Refunded",
        }
    }
}

impl fmt::Display for RefundStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RefundStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).ok_or_else(|| {
            serde::de::Error::custom(format!("unrecognized refund status `{raw}`"))
        })
    }
}

// ============================================================================
// Entity references
// ============================================================================

/// A foreign-key value as the entity store serializes it: either a bare
/// number or a string with an embedded number (`"ORD-2024-00042"`).
///
/// Use [`EntityRef::resolve`] to recover the canonical numeric identifier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityRef {
    /// Already-canonical numeric identifier.
    Id(u64),
    /// Composite display string with the identifier embedded somewhere.
    Text(String),
}

impl EntityRef {
    /// The canonical numeric identifier, or `None` if unresolvable.
    #[must_use]
    pub fn resolve(&self) -> Option<u64> {
        match self {
            Self::Id(id) => Some(*id),
            Self::Text(text) => crate::ident::last_digit_run(text),
        }
    }
}

// ============================================================================
// Entities
// ============================================================================

/// A resale ticket as served by the entity store.
///
/// The transition-scoped fields (`customer_payment`, `payment_date`,
/// `selling_price`, `zone`, `row`, `seat`) are populated only once the
/// corresponding transition has occurred; reverting to `pending` leaves them
/// in place. The descriptive fields are carried through unchanged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    /// Store-assigned identifier, immutable.
    pub id: u64,
    /// Reference to the owning order, in whatever form the store used.
    pub order: Option<EntityRef>,
    /// Lifecycle status.
    pub status: TicketStatus,
    /// Refund sub-state; defaults to `none` when the store omits it.
    #[serde(default)]
    pub refund_status: RefundStatus,
    /// Payment reference, set on entry to `paid`.
    pub customer_payment: Option<String>,
    /// Payment date, set on entry to `paid`. Free text per the store.
    pub payment_date: Option<String>,
    /// Selling price, set on entry to `complete`. Free text per the store.
    pub selling_price: Option<String>,
    /// Seating zone, set on entry to `complete`.
    pub zone: Option<String>,
    /// Seating row, set on entry to `complete`.
    pub row: Option<String>,
    /// Seat number, set on entry to `complete`.
    pub seat: Option<String>,
    /// Passport name of the holder.
    pub passport_name: Option<String>,
    /// Facebook name of the holder.
    pub facebook_name: Option<String>,
    /// Membership code.
    pub member_code: Option<String>,
    /// Priority date.
    pub priority_date: Option<String>,
    /// First-priority marker.
    pub fst_pt: Option<String>,
}

/// An order, read-only from this core's perspective.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Store identifier, in whatever form the store used.
    pub id: Option<EntityRef>,
    /// Reference to the owning customer.
    pub customer: Option<EntityRef>,
}

/// A customer, read-only from this core's perspective.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// Store identifier, in whatever form the store used.
    pub id: Option<EntityRef>,
    /// Contact email, if the store has one.
    pub email: Option<String>,
}

// ============================================================================
// Patches
// ============================================================================

/// Partial-update body for `PATCH /tickets/{id}`.
///
/// Produced only by [`crate::machine`]; `None` fields are omitted from the
/// JSON body so the store touches nothing the transition did not name. This
/// is the effect *description* — building one has no side effect, and the
/// shell that submits it owns the failure handling.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TicketPatch {
    /// New lifecycle status, when the transition changes it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TicketStatus>,
    /// New refund sub-state, when the transition changes it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_status: Option<RefundStatus>,
    /// Payment reference accompanying `pending → paid`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_payment: Option<String>,
    /// Payment date accompanying `pending → paid`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<String>,
    /// Selling price accompanying `paid → complete`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selling_price: Option<String>,
    /// Seating zone accompanying `paid → complete`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    /// Seating row accompanying `paid → complete`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<String>,
    /// Seat number accompanying `paid → complete`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seat: Option<String>,
}
