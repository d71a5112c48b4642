//! Protocol error types.

use thiserror::Error;

/// Failures reading orders or writing execution reports.
///
/// Only transport failures are errors. A record with bad fields is still
/// an order request and is refused by admission instead.
#[derive(Error, Debug)]
pub enum ProtoError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}
