//! Execution reports.
//!
//! One report per state change, in emission order. Reports carry no
//! timestamp; the sink stamps transaction time as it writes them.

use crate::admission::{reason_text, OrderRequest, RejectReason};
use crate::fixed::{Price, Quantity};
use crate::order::{Order, OrderId, OrderStatus};

/// Execution event for one order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutionReport {
    pub order_id: OrderId,
    pub client_order_id: String,
    pub instrument: String,
    /// Wire side code as requested; 0 when the request had none.
    pub side: i64,
    pub status: OrderStatus,
    /// Quantity executed by this event. For `New` and `Reject` this is the
    /// full request quantity, echoed as received.
    pub exec_qty: i64,
    pub price: Price,
    /// Empty unless rejected.
    pub reason: String,
}

impl ExecutionReport {
    /// Report a refused request.
    pub fn rejected(order_id: OrderId, request: &OrderRequest, reasons: &[RejectReason]) -> Self {
        Self {
            order_id,
            client_order_id: request.client_order_id.clone(),
            instrument: request.instrument.clone(),
            side: request.side.unwrap_or(0),
            status: OrderStatus::Rejected,
            exec_qty: request.quantity.unwrap_or(0),
            price: request.price.unwrap_or(Price::ZERO),
            reason: reason_text(reasons),
        }
    }

    /// Report an admitted order at its current status.
    pub fn for_order(order: &Order, instrument: &str, exec_qty: Quantity, price: Price) -> Self {
        Self {
            order_id: order.order_id,
            client_order_id: order.client_order_id.clone(),
            instrument: instrument.to_string(),
            side: order.side.code(),
            status: order.status,
            exec_qty: exec_qty.as_raw() as i64,
            price,
            reason: String::new(),
        }
    }

    /// True for `Fill` and `Pfill` events.
    #[inline]
    pub fn is_trade(&self) -> bool {
        matches!(self.status, OrderStatus::Filled | OrderStatus::PartiallyFilled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{Side, SymbolId};

    #[test]
    fn test_rejected_echoes_request() {
        let request = OrderRequest::new("aa7", "Daisy", 1, 15, Price::from_units(-1));
        let reasons = [RejectReason::InvalidInstrument, RejectReason::InvalidPrice, RejectReason::InvalidSize];
        let report = ExecutionReport::rejected(OrderId(7), &request, &reasons);

        assert_eq!(report.status, OrderStatus::Rejected);
        assert_eq!(report.exec_qty, 15);
        assert_eq!(report.side, 1);
        assert_eq!(report.price, Price::from_units(-1));
        assert_eq!(report.reason, "Invalid instrument. Invalid price. Invalid size.");
        assert!(!report.is_trade());
    }

    #[test]
    fn test_rejected_malformed_defaults() {
        let request = OrderRequest {
            client_order_id: "x".into(),
            instrument: "Rose".into(),
            ..Default::default()
        };
        let reasons = [RejectReason::MalformedSide, RejectReason::MalformedPrice, RejectReason::MalformedQuantity];
        let report = ExecutionReport::rejected(OrderId(1), &request, &reasons);

        assert_eq!(report.side, 0);
        assert_eq!(report.exec_qty, 0);
        assert_eq!(report.price, Price::ZERO);
    }

    #[test]
    fn test_for_order_uses_current_status() {
        let mut order = Order::new(OrderId(3), 1, SymbolId(0), Side::Sell, Price::from_units(10), Quantity(60), "s1");
        order.fill(Quantity(50));

        let report = ExecutionReport::for_order(&order, "Rose", Quantity(50), Price::from_units(9));
        assert_eq!(report.status, OrderStatus::PartiallyFilled);
        assert_eq!(report.side, 2);
        assert_eq!(report.exec_qty, 50);
        assert_eq!(report.price, Price::from_units(9));
        assert!(report.reason.is_empty());
        assert!(report.is_trade());
    }
}
