//! Matching engine core.
//!
//! Admission, instrument dispatch and the crossing loop. One request is
//! processed to completion before the next; all state lives in the engine.

use arrayvec::ArrayVec;
use tracing::{debug, trace};

use crate::admission::{self, OrderRequest};
use crate::book::InstrumentBook;
use crate::fixed::Quantity;
use crate::instrument::{InstrumentRegistry, MAX_INSTRUMENTS};
use crate::order::{Order, OrderId, Side, SymbolId};
use crate::report::ExecutionReport;

/// The matching engine.
///
/// Owns one `InstrumentBook` per registered instrument plus the order id
/// and admission sequence counters.
#[derive(Debug)]
pub struct MatchingEngine {
    registry: InstrumentRegistry,
    books: ArrayVec<InstrumentBook, MAX_INSTRUMENTS>,
    /// Last issued order id.
    last_order_id: u64,
    /// Last issued admission sequence.
    last_sequence: u64,
}

impl MatchingEngine {
    /// Create an engine with an empty book for every registered instrument.
    pub fn new(registry: InstrumentRegistry) -> Self {
        let books = registry
            .iter()
            .map(|(symbol, name)| InstrumentBook::new(symbol, name))
            .collect();
        Self {
            registry,
            books,
            last_order_id: 0,
            last_sequence: 0,
        }
    }

    /// Submit one request; returns its execution reports in emission order.
    pub fn submit(&mut self, request: OrderRequest) -> Vec<ExecutionReport> {
        let mut reports = Vec::new();
        self.submit_into(request, &mut reports);
        reports
    }

    /// Submit one request, appending its execution reports to `reports`.
    pub fn submit_into(&mut self, request: OrderRequest, reports: &mut Vec<ExecutionReport>) {
        // Every request consumes an order id, admitted or not.
        self.last_order_id += 1;
        let order_id = OrderId(self.last_order_id);

        let admitted = match admission::admit(&self.registry, &request) {
            Ok(admitted) => admitted,
            Err(reasons) => {
                let report = ExecutionReport::rejected(order_id, &request, &reasons);
                debug!(%order_id, client_order_id = %request.client_order_id, reason = %report.reason, "reject");
                reports.push(report);
                return;
            }
        };

        self.last_sequence += 1;
        let order = Order::new(
            order_id,
            self.last_sequence,
            admitted.symbol,
            admitted.side,
            admitted.price,
            admitted.quantity,
            request.client_order_id,
        );
        Self::match_order(&mut self.books[admitted.symbol.index()], order, reports);
    }

    /// Core matching loop.
    ///
    /// The incoming order rests on its own side first, then trades against
    /// the opposite tail while prices cross. Each trade prints at the
    /// resting order's price and emits the aggressor's report followed by
    /// the resting order's.
    fn match_order(book: &mut InstrumentBook, order: Order, reports: &mut Vec<ExecutionReport>) {
        let (side, limit, original_qty) = (order.side, order.price, order.original_qty);
        let taker = book.rest(order);
        let mut crossed = false;

        loop {
            let maker = match book.side(side.opposite()).best() {
                Some(best) if side.crosses(limit, best.price) => best.handle,
                _ => break,
            };
            crossed = true;

            let trade_price = book.order(maker).price;
            let qty = book.order(taker).remaining_qty.min(book.order(maker).remaining_qty);

            book.order_mut(taker).fill(qty);
            book.order_mut(maker).fill(qty);

            reports.push(ExecutionReport::for_order(book.order(taker), book.name(), qty, trade_price));
            reports.push(ExecutionReport::for_order(book.order(maker), book.name(), qty, trade_price));
            debug!(
                instrument = book.name(),
                taker = %book.order(taker).order_id,
                maker = %book.order(maker).order_id,
                %qty,
                price = %trade_price,
                "trade"
            );

            if book.order(maker).is_filled() {
                book.release(maker);
            }
            if book.order(taker).is_filled() {
                book.release(taker);
                break;
            }
        }

        if !crossed {
            let resting = book.order(taker);
            trace!(instrument = book.name(), order_id = %resting.order_id, "new");
            reports.push(ExecutionReport::for_order(resting, book.name(), original_qty, limit));
        }

        debug_assert!(book.check_invariants(), "{} book inconsistent after match", book.name());
    }

    /// Book for an instrument name.
    pub fn book(&self, name: &str) -> Option<&InstrumentBook> {
        self.registry.lookup(name).map(|symbol| self.book_by_symbol(symbol))
    }

    /// Book for a registered symbol.
    #[inline]
    pub fn book_by_symbol(&self, symbol: SymbolId) -> &InstrumentBook {
        &self.books[symbol.index()]
    }

    /// All books in registry order.
    pub fn books(&self) -> impl Iterator<Item = &InstrumentBook> + '_ {
        self.books.iter()
    }

    /// The instrument whitelist.
    #[inline]
    pub fn registry(&self) -> &InstrumentRegistry {
        &self.registry
    }

    /// Requests processed so far (the last issued order id).
    #[inline]
    pub fn orders_seen(&self) -> u64 {
        self.last_order_id
    }

    /// Requests admitted so far.
    #[inline]
    pub fn orders_admitted(&self) -> u64 {
        self.last_sequence
    }

    /// Remaining quantity resting across all books.
    pub fn resting_qty(&self) -> Quantity {
        self.books
            .iter()
            .flat_map(|b| [b.total_qty(Side::Buy), b.total_qty(Side::Sell)])
            .fold(Quantity::ZERO, |acc, q| acc + q)
    }
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new(InstrumentRegistry::default())
    }
}
