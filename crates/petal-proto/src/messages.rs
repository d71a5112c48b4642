//! Execution report record layout.

use std::fmt::Display;

use petal_core::ExecutionReport;
use serde::{Serialize, Serializer};

/// Title cell of the first output row.
pub const REPORT_TITLE: &str = "execution_rep.csv";

/// Cells in the title row, title included.
pub const TITLE_WIDTH: usize = 6;

/// Column header row.
pub const REPORT_COLUMNS: [&str; 9] = [
    "Order ID",
    "Client Order ID",
    "Instrument",
    "Side",
    "Exec Status",
    "Quantity",
    "Price",
    "Reason",
    "Transaction time",
];

/// One output row, borrowing from its report.
#[derive(Debug, Serialize)]
pub struct ExecutionRecord<'a> {
    #[serde(serialize_with = "as_display")]
    pub order_id: petal_core::OrderId,
    pub client_order_id: &'a str,
    pub instrument: &'a str,
    pub side: i64,
    pub exec_status: &'static str,
    pub quantity: i64,
    #[serde(serialize_with = "as_display")]
    pub price: petal_core::Price,
    pub reason: &'a str,
    pub transaction_time: &'a str,
}

impl<'a> ExecutionRecord<'a> {
    /// Lay out a report stamped with `transaction_time`.
    pub fn new(report: &'a ExecutionReport, transaction_time: &'a str) -> Self {
        Self {
            order_id: report.order_id,
            client_order_id: &report.client_order_id,
            instrument: &report.instrument,
            side: report.side,
            exec_status: report.status.as_exec_str(),
            quantity: report.exec_qty,
            price: report.price,
            reason: &report.reason,
            transaction_time,
        }
    }
}

fn as_display<T: Display, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use petal_core::{OrderId, OrderStatus, Price};

    #[test]
    fn test_record_from_report() {
        let report = ExecutionReport {
            order_id: OrderId(12),
            client_order_id: "aa12".into(),
            instrument: "Lotus".into(),
            side: 2,
            status: OrderStatus::PartiallyFilled,
            exec_qty: 50,
            price: Price::new(1000, 2),
            reason: String::new(),
        };
        let record = ExecutionRecord::new(&report, "20240101-000000.000");

        assert_eq!(record.exec_status, "Pfill");
        assert_eq!(record.quantity, 50);
        assert_eq!(record.instrument, "Lotus");
        assert_eq!(record.transaction_time, "20240101-000000.000");
    }

    #[test]
    fn test_column_count() {
        assert_eq!(REPORT_COLUMNS.len(), 9);
        assert!(TITLE_WIDTH <= REPORT_COLUMNS.len());
    }
}
