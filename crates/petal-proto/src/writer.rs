//! Execution report writer.

use std::io::Write;

use chrono::NaiveDateTime;
use csv::WriterBuilder;
use petal_core::ExecutionReport;
use tracing::trace;

use crate::clock::{format_transact_time, TransactClock};
use crate::error::ProtoError;
use crate::messages::{ExecutionRecord, REPORT_COLUMNS, REPORT_TITLE, TITLE_WIDTH};

/// Writes execution reports as CSV, stamping each with transaction time.
pub struct ExecutionWriter<W: Write> {
    out: csv::Writer<W>,
    clock: TransactClock,
    written: u64,
}

impl<W: Write> ExecutionWriter<W> {
    /// Wrap a sink and write the title and column rows.
    pub fn new(sink: W) -> Result<Self, ProtoError> {
        let mut out = WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_writer(sink);

        let mut title = [""; TITLE_WIDTH];
        title[0] = REPORT_TITLE;
        out.write_record(title)?;
        out.write_record(REPORT_COLUMNS)?;

        Ok(Self {
            out,
            clock: TransactClock::new(),
            written: 0,
        })
    }

    /// Write one report stamped with the current time.
    pub fn write_report(&mut self, report: &ExecutionReport) -> Result<(), ProtoError> {
        let stamp = self.clock.now();
        self.write_report_at(report, stamp)
    }

    /// Write several reports in order.
    pub fn write_reports(&mut self, reports: &[ExecutionReport]) -> Result<(), ProtoError> {
        reports.iter().try_for_each(|r| self.write_report(r))
    }

    /// Write one report with an explicit stamp.
    pub fn write_report_at(&mut self, report: &ExecutionReport, stamp: NaiveDateTime) -> Result<(), ProtoError> {
        let time = format_transact_time(&stamp);
        self.out.serialize(ExecutionRecord::new(report, &time))?;
        self.written += 1;
        trace!(order_id = %report.order_id, status = report.status.as_exec_str(), "report written");
        Ok(())
    }

    /// Reports written so far.
    #[inline]
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn flush(&mut self) -> Result<(), ProtoError> {
        self.out.flush()?;
        Ok(())
    }

    /// Flush and return the sink.
    pub fn into_inner(self) -> Result<W, ProtoError> {
        self.out.into_inner().map_err(|e| ProtoError::Io(e.into_error()))
    }
}
