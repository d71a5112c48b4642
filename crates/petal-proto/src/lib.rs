//! Order and execution report file formats.
//!
//! Orders come in as CSV records and execution reports go out as CSV rows
//! stamped with local transaction time.

pub mod clock;
pub mod error;
pub mod messages;
pub mod parser;
pub mod writer;

pub use clock::{format_transact_time, TransactClock, TRANSACT_TIME_FORMAT};
pub use error::ProtoError;
pub use messages::{ExecutionRecord, REPORT_COLUMNS, REPORT_TITLE};
pub use parser::{parse_record, OrderReader, HEADER_LINES};
pub use writer::ExecutionWriter;
