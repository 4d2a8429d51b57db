//! Minimal entity builders for tests.
//!
//! Every builder fills only what the test names; everything else is `None`.

use ticketdesk_core::types::{
    Customer, EntityRef, Order, RefundStatus, Ticket, TicketStatus,
};

/// A bare ticket in `status` with no order reference.
#[must_use]
pub fn ticket(id: u64, status: TicketStatus) -> Ticket {
    Ticket {
        id,
        order: None,
        status,
        refund_status: RefundStatus::None,
        customer_payment: None,
        payment_date: None,
        selling_price: None,
        zone: None,
        row: None,
        seat: None,
        passport_name: None,
        facebook_name: None,
        member_code: None,
        priority_date: None,
        fst_pt: None,
    }
}

/// A ticket in `status` referencing `order_id` numerically.
#[must_use]
pub fn ticket_on_order(id: u64, status: TicketStatus, order_id: u64) -> Ticket {
    let mut fixture = ticket(id, status);
    fixture.order = Some(EntityRef::Id(order_id));
    fixture
}

/// An order owned by `customer_id`.
#[must_use]
pub fn order(id: u64, customer_id: u64) -> Order {
    Order {
        id: Some(EntityRef::Id(id)),
        customer: Some(EntityRef::Id(customer_id)),
    }
}

/// A customer with an email.
#[must_use]
pub fn customer(id: u64, email: &str) -> Customer {
    Customer {
        id: Some(EntityRef::Id(id)),
        email: Some(email.to_string()),
    }
}
