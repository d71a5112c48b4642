//! Execution counters.

use std::fmt;

use petal_core::{ExecutionReport, OrderStatus};

/// Tallies of one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExecutionStats {
    pub requests: u64,
    pub admitted: u64,
    pub rejected: u64,
    pub new_reports: u64,
    pub fill_reports: u64,
    pub partial_fill_reports: u64,
    /// Sum of aggressor-side trade quantities.
    pub traded_qty: u64,
}

impl ExecutionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one request and the reports it produced.
    ///
    /// Trade reports come in aggressor/resting pairs; only the aggressor
    /// half counts towards traded quantity.
    pub fn record(&mut self, reports: &[ExecutionReport]) {
        self.requests += 1;
        match reports.first() {
            Some(first) if first.status == OrderStatus::Rejected => self.rejected += 1,
            Some(_) => self.admitted += 1,
            None => {}
        }

        for (idx, report) in reports.iter().enumerate() {
            match report.status {
                OrderStatus::New => self.new_reports += 1,
                OrderStatus::Filled => self.fill_reports += 1,
                OrderStatus::PartiallyFilled => self.partial_fill_reports += 1,
                OrderStatus::Rejected => {}
            }
            if report.is_trade() && idx % 2 == 0 {
                self.traded_qty += report.exec_qty as u64;
            }
        }
    }

    /// Total trade pairs.
    pub fn trades(&self) -> u64 {
        (self.fill_reports + self.partial_fill_reports) / 2
    }

    /// Total reports across all statuses.
    pub fn reports(&self) -> u64 {
        self.new_reports + self.fill_reports + self.partial_fill_reports + self.rejected
    }
}

impl fmt::Display for ExecutionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "requests={} admitted={} rejected={} new={} fill={} pfill={} trades={} traded_qty={}",
            self.requests,
            self.admitted,
            self.rejected,
            self.new_reports,
            self.fill_reports,
            self.partial_fill_reports,
            self.trades(),
            self.traded_qty,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petal_core::{MatchingEngine, OrderRequest, Price};

    #[test]
    fn test_stats_over_engine_run() {
        let mut engine = MatchingEngine::default();
        let mut stats = ExecutionStats::new();
        let requests = [
            OrderRequest::new("b1", "Lotus", 1, 50, Price::from_units(10)),
            OrderRequest::new("b2", "Lotus", 1, 30, Price::from_units(10)),
            OrderRequest::new("s1", "Lotus", 2, 60, Price::from_units(10)),
            OrderRequest::new("x", "Lotus", 1, 15, Price::from_units(-1)),
        ];
        for request in requests {
            let reports = engine.submit(request);
            stats.record(&reports);
        }

        assert_eq!(stats.requests, 4);
        assert_eq!(stats.admitted, 3);
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.new_reports, 2);
        assert_eq!(stats.fill_reports, 2);
        assert_eq!(stats.partial_fill_reports, 2);
        assert_eq!(stats.trades(), 2);
        assert_eq!(stats.traded_qty, 60);
        assert_eq!(stats.reports(), 7);
    }

    #[test]
    fn test_display() {
        let stats = ExecutionStats { requests: 1, admitted: 1, new_reports: 1, ..Default::default() };
        assert!(stats.to_string().starts_with("requests=1 admitted=1 rejected=0"));
    }
}
