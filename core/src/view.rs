//! Status-based view filtering and the per-status column sets.
//!
//! Filtering partitions enriched tickets for display; `all` is the identity
//! partition and an unknown selector fails safe to an empty view. The column
//! sets collapse the console's per-status tables into one data-driven lookup
//! keyed by the active filter.

use crate::enrich::EnrichedTicket;
use crate::types::TicketStatus;

/// Display-oriented status selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusFilter {
    /// Every ticket, regardless of status.
    All,
    /// Tickets in exactly one lifecycle status.
    Status(TicketStatus),
}

impl StatusFilter {
    /// Parse a selector word, ignoring case. Unknown selectors yield `None`.
    #[must_use]
    pub fn parse(selector: &str) -> Option<Self> {
        if selector.eq_ignore_ascii_case("all") {
            return Some(Self::All);
        }
        TicketStatus::parse(selector).map(Self::Status)
    }

    /// Whether `row` belongs to this partition.
    #[must_use]
    pub fn matches(self, row: &EnrichedTicket) -> bool {
        match self {
            Self::All => true,
            Self::Status(status) => row.status() == status,
        }
    }

    /// The columns the console shows for this partition, in display order.
    #[must_use]
    pub const fn columns(self) -> &'static [Column] {
        use Column::{
            CustomerPayment, Email, FacebookName, MemberCode, OrderId, PassportName,
            PaymentDate, Row, Seat, SellingPrice, Status, Zone,
        };
        match self {
            Self::All | Self::Status(TicketStatus::Pending) => &[
                OrderId, Email, PassportName, FacebookName, MemberCode, Status,
            ],
            Self::Status(TicketStatus::Paid) => &[
                OrderId, Email, PassportName, FacebookName, MemberCode, Status,
                CustomerPayment, PaymentDate,
            ],
            Self::Status(TicketStatus::Complete) => &[
                OrderId, Email, PassportName, FacebookName, MemberCode, Status,
                SellingPrice, Zone, Row, Seat,
            ],
            Self::Status(TicketStatus::Cancel) => &[
                OrderId, Email, PassportName, FacebookName, MemberCode,
                CustomerPayment, Status,
            ],
        }
    }
}

/// Filter enriched rows by a selector word.
///
/// `"all"` returns the full sequence unchanged; a known status returns the
/// matching subsequence in source order; an unknown selector returns the
/// empty view rather than failing loud.
#[must_use]
pub fn filter_tickets<'a>(selector: &str, rows: &'a [EnrichedTicket]) -> Vec<&'a EnrichedTicket> {
    let Some(filter) = StatusFilter::parse(selector) else {
        return Vec::new();
    };
    rows.iter().filter(|row| filter.matches(row)).collect()
}

/// One column of the console's ticket table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Column {
    /// Resolved order id.
    OrderId,
    /// Resolved customer email.
    Email,
    /// Passport name.
    PassportName,
    /// Facebook name.
    FacebookName,
    /// Member code.
    MemberCode,
    /// Status label (with refund suffix on cancelled rows).
    Status,
    /// Customer payment reference.
    CustomerPayment,
    /// Payment date.
    PaymentDate,
    /// Selling price.
    SellingPrice,
    /// Seating zone.
    Zone,
    /// Seating row.
    Row,
    /// Seat number.
    Seat,
}

impl Column {
    /// The column header.
    #[must_use]
    pub const fn header(self) -> &'static str {
        match self {
            Self::OrderId => "Order ID",
            Self::Email => "Email",
            Self::PassportName => "Passport Name",
            Self::FacebookName => "Facebook Name",
            Self::MemberCode => "Member Code",
            Self::Status => "Status",
            Self::CustomerPayment => "Customer Payment",
            Self::PaymentDate => "Payment Date",
            Self::SellingPrice => "Selling Price",
            Self::Zone => "Zone",
            Self::Row => "Row",
            Self::Seat => "Seat",
        }
    }

    /// The cell value for `row`, or `None` where the ticket has no data.
    #[must_use]
    pub fn value(self, row: &EnrichedTicket) -> Option<String> {
        match self {
            Self::OrderId => row.resolved_order_id.map(|id| id.to_string()),
            Self::Email => row.resolved_customer_email.clone(),
            Self::PassportName => row.ticket.passport_name.clone(),
            Self::FacebookName => row.ticket.facebook_name.clone(),
            Self::MemberCode => row.ticket.member_code.clone(),
            Self::Status => Some(row.status_label()),
            Self::CustomerPayment => row.ticket.customer_payment.clone(),
            Self::PaymentDate => row.ticket.payment_date.clone(),
            Self::SellingPrice => row.ticket.selling_price.clone(),
            Self::Zone => row.ticket.zone.clone(),
            Self::Row => row.ticket.row.clone(),
            Self::Seat => row.ticket.seat.clone(),
        }
    }
}
