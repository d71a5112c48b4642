//! Order book data structures.
//!
//! Each side keeps its entries in one contiguous vector with the best
//! order at the tail:
//!
//! - bids ascend by price (highest bid last),
//! - asks descend by price (lowest ask last),
//! - within a price, the earliest admitted order sits nearest the tail.
//!
//! Matching therefore only ever touches `last()`, and a fully filled
//! maker is removed with `pop()`.

use tracing::trace;

use crate::fixed::{Price, Quantity};
use crate::level::{self, PriceLevel};
use crate::order::{Order, Side, SymbolId};
use crate::pool::{OrderHandle, OrderPool};

/// One resting order as seen by its book side.
///
/// Price and sequence are immutable for the life of an order, so they are
/// cached here and the side can be ordered without touching the pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BookEntry {
    pub price: Price,
    pub sequence: u64,
    pub handle: OrderHandle,
}

/// One side of the order book (Bids or Asks).
#[derive(Debug)]
pub struct BookSide {
    side: Side,
    entries: Vec<BookEntry>,
}

impl BookSide {
    /// Create an empty book side.
    pub fn new(side: Side) -> Self {
        Self {
            side,
            entries: Vec::new(),
        }
    }

    /// Which side this is.
    #[inline(always)]
    pub fn side(&self) -> Side {
        self.side
    }

    /// `a` has strictly lower price priority than `b` on this side.
    #[inline(always)]
    fn ranks_below(side: Side, a: Price, b: Price) -> bool {
        match side {
            Side::Buy => a < b,
            Side::Sell => a > b,
        }
    }

    /// Insert an entry at its priority position.
    ///
    /// The entry goes in front of (away from the tail) every entry with an
    /// equal price, so equal-priced orders match in admission order.
    pub fn insert(&mut self, entry: BookEntry) {
        let side = self.side;
        let idx = self
            .entries
            .partition_point(|e| Self::ranks_below(side, e.price, entry.price));
        self.entries.insert(idx, entry);
        trace!(?side, price = %entry.price, seq = entry.sequence, depth = self.entries.len(), "rest");
        debug_assert!(self.is_priority_ordered(), "{side:?} side out of priority order");
    }

    /// Best entry (tail).
    #[inline(always)]
    pub fn best(&self) -> Option<&BookEntry> {
        self.entries.last()
    }

    /// Best price.
    #[inline(always)]
    pub fn best_price(&self) -> Option<Price> {
        self.best().map(|e| e.price)
    }

    /// Remove the best entry.
    #[inline(always)]
    pub fn pop_best(&mut self) -> Option<BookEntry> {
        self.entries.pop()
    }

    /// Remove an entry by identity.
    pub fn remove(&mut self, handle: OrderHandle) -> Option<BookEntry> {
        if self.best()?.handle == handle {
            return self.pop_best();
        }
        let idx = self.entries.iter().rposition(|e| e.handle == handle)?;
        Some(self.entries.remove(idx))
    }

    /// Check if an incoming order from the opposite side at `price` would
    /// cross the best resting price.
    #[inline(always)]
    pub fn would_cross(&self, price: Price) -> bool {
        self.best()
            .map_or(false, |best| self.side.opposite().crosses(price, best.price))
    }

    /// Check if side is empty.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of resting orders.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries in matching priority order (best first).
    pub fn iter(&self) -> impl Iterator<Item = &BookEntry> + '_ {
        self.entries.iter().rev()
    }

    /// Price priority first, admission sequence second, best at the tail.
    pub fn is_priority_ordered(&self) -> bool {
        self.entries.windows(2).all(|pair| {
            let (behind, ahead) = (&pair[0], &pair[1]);
            Self::ranks_below(self.side, behind.price, ahead.price)
                || (behind.price == ahead.price && behind.sequence > ahead.sequence)
        })
    }
}

/// The complete order book for a single instrument.
///
/// Owns every resting order of that instrument through its pool.
#[derive(Debug)]
pub struct InstrumentBook {
    symbol: SymbolId,
    name: String,
    bids: BookSide,
    asks: BookSide,
    pool: OrderPool,
}

impl InstrumentBook {
    /// Create an empty book.
    pub fn new(symbol: SymbolId, name: impl Into<String>) -> Self {
        Self {
            symbol,
            name: name.into(),
            bids: BookSide::new(Side::Buy),
            asks: BookSide::new(Side::Sell),
            pool: OrderPool::new(),
        }
    }

    /// Instrument id.
    #[inline(always)]
    pub fn symbol(&self) -> SymbolId {
        self.symbol
    }

    /// Instrument name.
    #[inline(always)]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bid side.
    #[inline(always)]
    pub fn bids(&self) -> &BookSide {
        &self.bids
    }

    /// Ask side.
    #[inline(always)]
    pub fn asks(&self) -> &BookSide {
        &self.asks
    }

    /// Get immutable reference to appropriate side.
    #[inline(always)]
    pub fn side(&self, side: Side) -> &BookSide {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    /// Get mutable reference to appropriate side.
    #[inline(always)]
    pub(crate) fn side_mut(&mut self, side: Side) -> &mut BookSide {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }

    /// Move an order into the book on its own side.
    pub fn rest(&mut self, order: Order) -> OrderHandle {
        debug_assert_eq!(order.symbol, self.symbol, "order routed to wrong book");
        let entry_side = order.side;
        let (price, sequence) = (order.price, order.sequence);
        let handle = self.pool.insert(order);
        self.side_mut(entry_side).insert(BookEntry { price, sequence, handle });
        handle
    }

    /// Take an order out of the book, dropping its slot.
    ///
    /// # Panics
    /// Panics if the order is not resting on its side.
    pub fn release(&mut self, handle: OrderHandle) -> Order {
        let side = self.pool.get(handle).side;
        let removed = self.side_mut(side).remove(handle);
        assert!(removed.is_some(), "order handle {} not on {side:?} side", handle.0);
        let order = self.pool.remove(handle);
        trace!(instrument = %self.name, order_id = %order.order_id, "release");
        order
    }

    /// Look up a resting order.
    #[inline(always)]
    pub fn order(&self, handle: OrderHandle) -> &Order {
        self.pool.get(handle)
    }

    #[inline(always)]
    pub(crate) fn order_mut(&mut self, handle: OrderHandle) -> &mut Order {
        self.pool.get_mut(handle)
    }

    /// Resting orders on one side in matching priority order.
    pub fn resting(&self, side: Side) -> impl Iterator<Item = &Order> + '_ {
        self.side(side).iter().map(move |e| self.pool.get(e.handle))
    }

    /// Get best bid price.
    #[inline(always)]
    pub fn best_bid(&self) -> Option<Price> {
        self.bids.best_price()
    }

    /// Get best ask price.
    #[inline(always)]
    pub fn best_ask(&self) -> Option<Price> {
        self.asks.best_price()
    }

    /// Get the spread (best ask - best bid).
    pub fn spread(&self) -> Option<Price> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(Price(ask.0 - bid.0)),
            _ => None,
        }
    }

    /// Total resting orders on both sides.
    #[inline(always)]
    pub fn resting_count(&self) -> usize {
        self.bids.len() + self.asks.len()
    }

    /// Check if book is empty.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// Top `max_levels` price levels of one side, best first.
    pub fn depth(&self, side: Side, max_levels: usize) -> Vec<PriceLevel> {
        level::aggregate(
            self.resting(side).map(|o| (o.price, o.remaining_qty)),
            max_levels,
        )
    }

    /// Full structural check: both sides ordered, every entry backed by a
    /// live, non-terminal, quantity-conserving order on the right side, and
    /// nothing in the pool that is not on a side.
    pub fn check_invariants(&self) -> bool {
        let side_ok = |side: &BookSide| {
            side.is_priority_ordered()
                && side.iter().all(|e| {
                    self.pool.contains(e.handle) && {
                        let o = self.pool.get(e.handle);
                        o.side == side.side()
                            && o.price == e.price
                            && o.sequence == e.sequence
                            && !o.status.is_terminal()
                            && !o.remaining_qty.is_zero()
                            && o.conserves_quantity()
                    }
                })
        };
        side_ok(&self.bids) && side_ok(&self.asks) && self.pool.active() == self.resting_count()
    }

    /// Total remaining quantity on one side.
    pub fn total_qty(&self, side: Side) -> Quantity {
        self.resting(side)
            .fold(Quantity::ZERO, |acc, o| acc + o.remaining_qty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::OrderId;
    use proptest::prelude::*;

    fn entry(price: i64, sequence: u64) -> BookEntry {
        BookEntry {
            price: Price::from_units(price),
            sequence,
            handle: OrderHandle(sequence as u32),
        }
    }

    fn seqs(side: &BookSide) -> Vec<u64> {
        side.iter().map(|e| e.sequence).collect()
    }

    fn order(seq: u64, side: Side, price: i64, qty: u64) -> Order {
        Order::new(
            OrderId(seq),
            seq,
            SymbolId(0),
            side,
            Price::from_units(price),
            Quantity(qty),
            format!("c{seq}"),
        )
    }

    #[test]
    fn test_bid_side_best_is_highest() {
        let mut side = BookSide::new(Side::Buy);
        side.insert(entry(100, 1));
        side.insert(entry(110, 2));
        side.insert(entry(90, 3));

        assert_eq!(side.best_price(), Some(Price::from_units(110)));
        assert_eq!(seqs(&side), vec![2, 1, 3]);
    }

    #[test]
    fn test_ask_side_best_is_lowest() {
        let mut side = BookSide::new(Side::Sell);
        side.insert(entry(100, 1));
        side.insert(entry(110, 2));
        side.insert(entry(90, 3));

        assert_eq!(side.best_price(), Some(Price::from_units(90)));
        assert_eq!(seqs(&side), vec![3, 1, 2]);
    }

    #[test]
    fn test_equal_prices_keep_admission_order() {
        for s in [Side::Buy, Side::Sell] {
            let mut side = BookSide::new(s);
            side.insert(entry(10, 1));
            side.insert(entry(10, 2));
            side.insert(entry(10, 3));
            side.insert(entry(10, 4));

            // earliest admitted matches first regardless of run length
            assert_eq!(seqs(&side), vec![1, 2, 3, 4], "{s:?}");
            assert!(side.is_priority_ordered());
        }
    }

    #[test]
    fn test_equal_price_run_between_other_levels() {
        let mut side = BookSide::new(Side::Buy);
        side.insert(entry(9, 1));
        side.insert(entry(10, 2));
        side.insert(entry(11, 3));
        side.insert(entry(10, 4));

        assert_eq!(seqs(&side), vec![3, 2, 4, 1]);
    }

    #[test]
    fn test_remove_by_identity() {
        let mut side = BookSide::new(Side::Sell);
        side.insert(entry(10, 1));
        side.insert(entry(11, 2));
        side.insert(entry(12, 3));

        let removed = side.remove(OrderHandle(2)).unwrap();
        assert_eq!(removed.sequence, 2);
        assert_eq!(seqs(&side), vec![1, 3]);
        assert!(side.remove(OrderHandle(2)).is_none());
    }

    #[test]
    fn test_would_cross() {
        let mut asks = BookSide::new(Side::Sell);
        assert!(!asks.would_cross(Price::from_units(1_000)));

        asks.insert(entry(10, 1));
        assert!(asks.would_cross(Price::from_units(10)));
        assert!(asks.would_cross(Price::from_units(11)));
        assert!(!asks.would_cross(Price::new(999, 2)));

        let mut bids = BookSide::new(Side::Buy);
        bids.insert(entry(10, 1));
        assert!(bids.would_cross(Price::new(950, 2)));
        assert!(!bids.would_cross(Price::new(1001, 2)));
    }

    #[test]
    fn test_book_rest_and_release() {
        let mut book = InstrumentBook::new(SymbolId(0), "Rose");
        let h1 = book.rest(order(1, Side::Buy, 100, 50));
        let h2 = book.rest(order(2, Side::Sell, 101, 30));

        assert_eq!(book.best_bid(), Some(Price::from_units(100)));
        assert_eq!(book.best_ask(), Some(Price::from_units(101)));
        assert_eq!(book.spread(), Some(Price::from_units(1)));
        assert_eq!(book.resting_count(), 2);
        assert!(book.check_invariants());

        let released = book.release(h1);
        assert_eq!(released.order_id, OrderId(1));
        assert!(book.bids().is_empty());
        assert_eq!(book.order(h2).remaining_qty, Quantity(30));
        assert!(book.check_invariants());
    }

    #[test]
    fn test_book_depth() {
        let mut book = InstrumentBook::new(SymbolId(0), "Tulip");
        book.rest(order(1, Side::Sell, 12, 10));
        book.rest(order(2, Side::Sell, 11, 20));
        book.rest(order(3, Side::Sell, 11, 30));
        book.rest(order(4, Side::Sell, 13, 40));

        let depth = book.depth(Side::Sell, 2);
        assert_eq!(depth.len(), 2);
        assert_eq!(depth[0].price, Price::from_units(11));
        assert_eq!(depth[0].total_qty, Quantity(50));
        assert_eq!(depth[0].order_count, 2);
        assert_eq!(depth[1].price, Price::from_units(12));
        assert_eq!(book.total_qty(Side::Sell), Quantity(100));
    }

    proptest! {
        #[test]
        fn prop_side_stays_ordered(
            is_buy in any::<bool>(),
            prices in prop::collection::vec(1i64..20, 1..60),
            removals in prop::collection::vec(any::<prop::sample::Index>(), 0..20),
        ) {
            let mut side = BookSide::new(if is_buy { Side::Buy } else { Side::Sell });
            for (seq, price) in prices.iter().enumerate() {
                side.insert(entry(*price, seq as u64));
                prop_assert!(side.is_priority_ordered());
            }
            for idx in removals {
                if side.is_empty() {
                    break;
                }
                let handle = side.iter().nth(idx.index(side.len())).unwrap().handle;
                side.remove(handle);
                prop_assert!(side.is_priority_ordered());
            }
        }
    }
}
