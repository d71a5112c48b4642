//! Admission gate.
//!
//! Every check runs on every request; a request that breaks several
//! rules is rejected once with all of their reasons.

use arrayvec::ArrayVec;
use thiserror::Error;

use crate::fixed::{Price, Quantity};
use crate::instrument::InstrumentRegistry;
use crate::order::{Side, SymbolId};

/// Order sizes must be a whole multiple of this lot.
pub const LOT_SIZE: i64 = 10;

/// Largest accepted order size.
pub const MAX_ORDER_QTY: i64 = 1000;

/// Number of independent admission checks.
pub const CHECK_COUNT: usize = 4;

/// A raw order request as read from the order source.
///
/// Numeric fields are `None` when the source value was missing or not a
/// number.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct OrderRequest {
    pub client_order_id: String,
    pub instrument: String,
    pub side: Option<i64>,
    pub quantity: Option<i64>,
    pub price: Option<Price>,
}

impl OrderRequest {
    /// Well-formed request.
    pub fn new(
        client_order_id: impl Into<String>,
        instrument: impl Into<String>,
        side: i64,
        quantity: i64,
        price: Price,
    ) -> Self {
        Self {
            client_order_id: client_order_id.into(),
            instrument: instrument.into(),
            side: Some(side),
            quantity: Some(quantity),
            price: Some(price),
        }
    }
}

/// Why a request was refused.
///
/// The display text is what appears on the reject report.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RejectReason {
    #[error("Invalid instrument.")]
    InvalidInstrument,
    #[error("Invalid side.")]
    InvalidSide,
    #[error("Invalid price.")]
    InvalidPrice,
    #[error("Invalid size.")]
    InvalidSize,
    #[error("Malformed side.")]
    MalformedSide,
    #[error("Malformed price.")]
    MalformedPrice,
    #[error("Malformed quantity.")]
    MalformedQuantity,
}

/// At most one reason per check.
pub type RejectReasons = ArrayVec<RejectReason, CHECK_COUNT>;

/// Validated request fields, ready to become an `Order`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Admitted {
    pub symbol: SymbolId,
    pub side: Side,
    pub price: Price,
    pub quantity: Quantity,
}

/// Run all admission checks.
pub fn admit(registry: &InstrumentRegistry, request: &OrderRequest) -> Result<Admitted, RejectReasons> {
    let mut reasons = RejectReasons::new();

    let symbol = registry.lookup(&request.instrument);
    if symbol.is_none() {
        reasons.push(RejectReason::InvalidInstrument);
    }

    let side = match request.side {
        None => {
            reasons.push(RejectReason::MalformedSide);
            None
        }
        Some(code) => {
            let side = Side::from_code(code);
            if side.is_none() {
                reasons.push(RejectReason::InvalidSide);
            }
            side
        }
    };

    let price = match request.price {
        None => {
            reasons.push(RejectReason::MalformedPrice);
            None
        }
        Some(price) if !price.is_positive() => {
            reasons.push(RejectReason::InvalidPrice);
            None
        }
        Some(price) => Some(price),
    };

    let quantity = match request.quantity {
        None => {
            reasons.push(RejectReason::MalformedQuantity);
            None
        }
        Some(qty) if !is_valid_size(qty) => {
            reasons.push(RejectReason::InvalidSize);
            None
        }
        Some(qty) => Some(Quantity(qty as u64)),
    };

    match (symbol, side, price, quantity) {
        (Some(symbol), Some(side), Some(price), Some(quantity)) => Ok(Admitted { symbol, side, price, quantity }),
        _ => {
            debug_assert!(!reasons.is_empty());
            Err(reasons)
        }
    }
}

/// Positive, a whole number of lots, and no larger than the size cap.
#[inline]
pub const fn is_valid_size(qty: i64) -> bool {
    qty > 0 && qty % LOT_SIZE == 0 && qty <= MAX_ORDER_QTY
}

/// Render reasons as a single space-separated string.
pub fn reason_text(reasons: &[RejectReason]) -> String {
    reasons
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
