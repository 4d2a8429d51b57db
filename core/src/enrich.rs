//! Cross-entity aggregation engine.
//!
//! Joins tickets to orders to customers purely from client-held snapshots:
//! two lookup indices are built from the `orders` and `customers` snapshots,
//! then every ticket is projected into an [`EnrichedTicket`] carrying its
//! resolved order id and customer email. The enriched rows are a read-time
//! view — recomputed in full on every pass, never written back.
//!
//! Dirty data degrades, it never fails: an unresolvable or dangling
//! reference turns into `None` on the affected row, and every ticket in the
//! input appears in the output, in order. Admin visibility must not break on
//! a bad join.

use crate::ident::resolve_ref;
use crate::types::{Customer, Order, RefundStatus, Ticket, TicketStatus};
use serde::Serialize;
use std::collections::HashMap;

/// Lookup index from order id to the owning customer id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrderIndex(HashMap<u64, u64>);

impl OrderIndex {
    /// Build the index from an orders snapshot.
    ///
    /// Orders whose id or customer reference is unresolvable are skipped;
    /// duplicate order ids are last-write-wins.
    #[must_use]
    pub fn from_snapshot(orders: &[Order]) -> Self {
        let mut map = HashMap::with_capacity(orders.len());
        for order in orders {
            let (Some(order_id), Some(customer_id)) = (
                resolve_ref(order.id.as_ref()),
                resolve_ref(order.customer.as_ref()),
            ) else {
                continue;
            };
            map.insert(order_id, customer_id);
        }
        Self(map)
    }

    /// Customer id owning `order_id`, if the snapshot knows it.
    #[must_use]
    pub fn customer_of(&self, order_id: u64) -> Option<u64> {
        self.0.get(&order_id).copied()
    }

    /// Number of resolvable orders in the index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the index holds no orders.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Lookup index from customer id to contact email.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CustomerIndex(HashMap<u64, Option<String>>);

impl CustomerIndex {
    /// Build the index from a customers snapshot, skipping customers with
    /// unresolvable ids. A known customer without an email maps to `None`.
    #[must_use]
    pub fn from_snapshot(customers: &[Customer]) -> Self {
        let mut map = HashMap::with_capacity(customers.len());
        for customer in customers {
            let Some(customer_id) = resolve_ref(customer.id.as_ref()) else {
                continue;
            };
            map.insert(customer_id, customer.email.clone());
        }
        Self(map)
    }

    /// Email of `customer_id`, if the snapshot knows the customer and the
    /// customer has one.
    #[must_use]
    pub fn email_of(&self, customer_id: u64) -> Option<&str> {
        self.0.get(&customer_id).and_then(Option::as_deref)
    }

    /// Number of resolvable customers in the index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the index holds no customers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A ticket projected with its resolved order/customer linkage.
///
/// Derived, never persisted. Both resolved fields are `None` whenever the
/// join cannot be completed.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EnrichedTicket {
    /// The underlying ticket, unchanged.
    pub ticket: Ticket,
    /// Canonical id of the owning order, when resolvable.
    pub resolved_order_id: Option<u64>,
    /// Email of the customer behind the owning order, when the full chain
    /// resolves.
    pub resolved_customer_email: Option<String>,
}

impl EnrichedTicket {
    /// Lifecycle status of the underlying ticket.
    #[must_use]
    pub const fn status(&self) -> TicketStatus {
        self.ticket.status
    }

    /// Operator-facing status label, with the refund sub-state appended for
    /// cancelled tickets that have refund activity: `"Cancelled (In Process)"`.
    #[must_use]
    pub fn status_label(&self) -> String {
        let status = self.ticket.status;
        if status == TicketStatus::Cancel && self.ticket.refund_status != RefundStatus::None {
            format!("{} ({})", status.label(), self.ticket.refund_status.label())
        } else {
            status.label().to_string()
        }
    }
}

/// Project every ticket into an enriched row using the two indices.
///
/// Output cardinality equals input cardinality, order preserved; all
/// original fields pass through unchanged. Pure function of its inputs.
#[must_use]
pub fn enrich(
    tickets: &[Ticket],
    orders: &OrderIndex,
    customers: &CustomerIndex,
) -> Vec<EnrichedTicket> {
    tickets
        .iter()
        .map(|ticket| {
            let resolved_order_id = resolve_ref(ticket.order.as_ref());
            let resolved_customer_email = resolved_order_id
                .and_then(|order_id| orders.customer_of(order_id))
                .and_then(|customer_id| customers.email_of(customer_id))
                .map(str::to_string);
            EnrichedTicket {
                ticket: ticket.clone(),
                resolved_order_id,
                resolved_customer_email,
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::EntityRef;
    use proptest::prelude::*;

    fn ticket(id: u64, status: TicketStatus, order: Option<EntityRef>) -> Ticket {
        Ticket {
            id,
            order,
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

    fn order(id: u64, customer: u64) -> Order {
        Order {
            id: Some(EntityRef::Id(id)),
            customer: Some(EntityRef::Id(customer)),
        }
    }

    fn customer(id: u64, email: &str) -> Customer {
        Customer {
            id: Some(EntityRef::Id(id)),
            email: Some(email.to_string()),
        }
    }

    #[test]
    fn full_chain_resolves() {
        let tickets = vec![ticket(1, TicketStatus::Pending, Some(EntityRef::Id(10)))];
        let orders = OrderIndex::from_snapshot(&[order(10, 5)]);
        let customers = CustomerIndex::from_snapshot(&[customer(5, "a@x.com")]);

        let rows = enrich(&tickets, &orders, &customers);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].resolved_order_id, Some(10));
        assert_eq!(rows[0].resolved_customer_email.as_deref(), Some("a@x.com"));
        assert_eq!(rows[0].ticket, tickets[0]);
    }

    #[test]
    fn string_embedded_references_join_with_numeric_ones() {
        let tickets = vec![ticket(
            1,
            TicketStatus::Paid,
            Some(EntityRef::Text("ORD-2024-00042".to_string())),
        )];
        let orders = OrderIndex::from_snapshot(&[order(42, 5)]);
        let customers = CustomerIndex::from_snapshot(&[customer(5, "a@x.com")]);

        let rows = enrich(&tickets, &orders, &customers);
        assert_eq!(rows[0].resolved_order_id, Some(42));
        assert_eq!(rows[0].resolved_customer_email.as_deref(), Some("a@x.com"));
    }

    #[test]
    fn dangling_customer_degrades_to_no_email() {
        let tickets = vec![ticket(1, TicketStatus::Pending, Some(EntityRef::Id(10)))];
        let orders = OrderIndex::from_snapshot(&[order(10, 999)]);
        let customers = CustomerIndex::from_snapshot(&[customer(5, "a@x.com")]);

        let rows = enrich(&tickets, &orders, &customers);
        assert_eq!(rows[0].resolved_order_id, Some(10));
        assert_eq!(rows[0].resolved_customer_email, None);
    }

    #[test]
    fn unresolvable_order_reference_degrades_to_nulls() {
        let tickets = vec![ticket(
            1,
            TicketStatus::Pending,
            Some(EntityRef::Text("no-digits".to_string())),
        )];
        let rows = enrich(&tickets, &OrderIndex::default(), &CustomerIndex::default());
        assert_eq!(rows[0].resolved_order_id, None);
        assert_eq!(rows[0].resolved_customer_email, None);
    }

    #[test]
    fn orders_with_unresolvable_parts_are_skipped() {
        let orders = OrderIndex::from_snapshot(&[
            order(10, 5),
            Order {
                id: Some(EntityRef::Text("garbage".to_string())),
                customer: Some(EntityRef::Id(6)),
            },
            Order {
                id: Some(EntityRef::Id(11)),
                customer: None,
            },
        ]);
        assert_eq!(orders.len(), 1);
        assert_eq!(orders.customer_of(10), Some(5));
    }

    #[test]
    fn duplicate_order_ids_are_last_write_wins() {
        let orders = OrderIndex::from_snapshot(&[order(10, 5), order(10, 6)]);
        assert_eq!(orders.customer_of(10), Some(6));
    }

    #[test]
    fn customer_without_email_is_known_but_blank() {
        let customers = CustomerIndex::from_snapshot(&[Customer {
            id: Some(EntityRef::Id(5)),
            email: None,
        }]);
        assert_eq!(customers.len(), 1);
        assert_eq!(customers.email_of(5), None);
    }

    #[test]
    fn cancelled_label_carries_refund_state() {
        let mut t = ticket(1, TicketStatus::Cancel, None);
        t.refund_status = RefundStatus::InProcess;
        let rows = enrich(&[t], &OrderIndex::default(), &CustomerIndex::default());
        assert_eq!(rows[0].status_label(), "Cancelled (In Process)");

        let plain = ticket(2, TicketStatus::Paid, None);
        let rows = enrich(&[plain], &OrderIndex::default(), &CustomerIndex::default());
        assert_eq!(rows[0].status_label(), "Paid");
    }

    fn arb_ref() -> impl Strategy<Value = Option<EntityRef>> {
        prop_oneof![
            Just(None::<EntityRef>),
            (0u64..50).prop_map(|id| Some(EntityRef::Id(id))),
            ("[a-z]{0,6}[0-9]{0,4}").prop_map(|s| Some(EntityRef::Text(s))),
        ]
    }

    fn arb_tickets() -> impl Strategy<Value = Vec<Ticket>> {
        prop::collection::vec(
            ((0u64..1000), (0usize..4), arb_ref()).prop_map(|(id, status, order)| {
                ticket(id, TicketStatus::ALL[status], order)
            }),
            0..12,
        )
    }

    proptest! {
        #[test]
        fn enrichment_preserves_cardinality_order_and_fields(
            tickets in arb_tickets(),
            orders in prop::collection::vec((0u64..50, 0u64..50), 0..12),
            customers in prop::collection::vec((0u64..50, "[a-z]{1,6}@x\\.com"), 0..12),
        ) {
            let order_snapshot: Vec<Order> =
                orders.iter().map(|&(id, c)| order(id, c)).collect();
            let customer_snapshot: Vec<Customer> =
                customers.iter().map(|(id, email)| customer(*id, email)).collect();

            let rows = enrich(
                &tickets,
                &OrderIndex::from_snapshot(&order_snapshot),
                &CustomerIndex::from_snapshot(&customer_snapshot),
            );

            prop_assert_eq!(rows.len(), tickets.len());
            for (row, original) in rows.iter().zip(&tickets) {
                prop_assert_eq!(&row.ticket, original);
            }
        }
    }
}
