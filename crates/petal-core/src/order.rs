//! Order types and lifecycle management.

use core::fmt;

use crate::fixed::{Price, Quantity};

/// Side of the order book.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Side {
    /// Bid side (buyers).
    Buy = 1,
    /// Ask side (sellers).
    Sell = 2,
}

impl Side {
    /// Decode the wire side code (`1` = buy, `2` = sell).
    #[inline(always)]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Side::Buy),
            2 => Some(Side::Sell),
            _ => None,
        }
    }

    /// Wire side code.
    #[inline(always)]
    pub const fn code(self) -> i64 {
        self as i64
    }

    /// Get the opposite side.
    #[inline(always)]
    pub const fn opposite(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// Check if this is the buy side.
    #[inline(always)]
    pub const fn is_buy(self) -> bool {
        matches!(self, Side::Buy)
    }

    /// Whether an order on this side at `price` crosses a resting order
    /// on the opposite side at `resting`.
    #[inline(always)]
    pub fn crosses(self, price: Price, resting: Price) -> bool {
        match self {
            Side::Buy => price >= resting,
            Side::Sell => price <= resting,
        }
    }
}

/// Order lifecycle state.
///
/// `New -> PartiallyFilled* -> Filled`, or `Rejected` straight from
/// admission. `Filled` and `Rejected` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    New,
    PartiallyFilled,
    Filled,
    Rejected,
}

impl OrderStatus {
    /// No further transitions possible.
    #[inline(always)]
    pub const fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Filled | OrderStatus::Rejected)
    }

    /// Execution status text used on execution reports.
    pub const fn as_exec_str(self) -> &'static str {
        match self {
            OrderStatus::New => "New",
            OrderStatus::PartiallyFilled => "Pfill",
            OrderStatus::Filled => "Fill",
            OrderStatus::Rejected => "Reject",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_exec_str())
    }
}

/// Instrument identifier.
///
/// Dense index into the engine's instrument registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct SymbolId(pub u32);

impl SymbolId {
    /// Index into per-instrument storage.
    #[inline(always)]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Exchange-assigned order identifier.
///
/// Dense and increasing from 1 over every request, rejected ones included.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct OrderId(pub u64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ord{}", self.0)
    }
}

/// An admitted order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Order {
    /// Order price.
    pub price: Price,
    /// Remaining quantity to fill.
    pub remaining_qty: Quantity,
    /// Unique order identifier.
    pub order_id: OrderId,
    /// Admission sequence; defines time priority.
    pub sequence: u64,
    /// Original quantity when order was placed.
    pub original_qty: Quantity,
    /// Instrument.
    pub symbol: SymbolId,
    /// Order side (buy/sell).
    pub side: Side,
    /// Current lifecycle state.
    pub status: OrderStatus,
    /// Caller-supplied reference, echoed on every report.
    pub client_order_id: String,
}

impl Order {
    /// Create a new order.
    pub fn new(
        order_id: OrderId,
        sequence: u64,
        symbol: SymbolId,
        side: Side,
        price: Price,
        qty: Quantity,
        client_order_id: impl Into<String>,
    ) -> Self {
        Self {
            price,
            remaining_qty: qty,
            order_id,
            sequence,
            original_qty: qty,
            symbol,
            side,
            status: OrderStatus::New,
            client_order_id: client_order_id.into(),
        }
    }

    /// Check if order is completely filled.
    #[inline(always)]
    pub const fn is_filled(&self) -> bool {
        self.remaining_qty.is_zero()
    }

    /// Fill the order by the given quantity and advance its status.
    ///
    /// # Panics
    /// Panics if `qty` is zero, exceeds the remaining quantity, or the
    /// order is already terminal.
    pub fn fill(&mut self, qty: Quantity) {
        assert!(!self.status.is_terminal(), "fill on terminal order {}", self.order_id);
        assert!(!qty.is_zero(), "zero fill on order {}", self.order_id);
        self.remaining_qty = self
            .remaining_qty
            .checked_sub(qty)
            .unwrap_or_else(|| panic!("fill quantity exceeds remaining on order {}", self.order_id));
        self.status = if self.remaining_qty.is_zero() {
            OrderStatus::Filled
        } else {
            OrderStatus::PartiallyFilled
        };
        debug_assert!(self.conserves_quantity());
    }

    /// Get filled quantity.
    #[inline(always)]
    pub const fn filled_qty(&self) -> Quantity {
        Quantity(self.original_qty.0 - self.remaining_qty.0)
    }

    /// `filled + remaining == original`.
    #[inline(always)]
    pub fn conserves_quantity(&self) -> bool {
        self.remaining_qty <= self.original_qty
            && self.filled_qty() + self.remaining_qty == self.original_qty
    }
}
