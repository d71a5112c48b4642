//! Aggregated price level view.
//!
//! Book sides store individual orders; a `PriceLevel` is the read-only
//! roll-up of every resting order at one price, used for depth queries.

use crate::fixed::{Price, Quantity};

/// All resting quantity at a single price.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PriceLevel {
    /// Level price.
    pub price: Price,
    /// Total remaining quantity at this level.
    pub total_qty: Quantity,
    /// Number of orders at this level.
    pub order_count: usize,
}

impl PriceLevel {
    /// Start a level with one order.
    pub fn new(price: Price, qty: Quantity) -> Self {
        Self {
            price,
            total_qty: qty,
            order_count: 1,
        }
    }

    /// Fold another order at the same price into the level.
    #[inline]
    pub fn absorb(&mut self, qty: Quantity) {
        self.total_qty = self.total_qty + qty;
        self.order_count += 1;
    }
}

/// Roll a priority-ordered stream of `(price, qty)` into at most
/// `max_levels` levels, best first.
pub fn aggregate<I>(orders: I, max_levels: usize) -> Vec<PriceLevel>
where
    I: IntoIterator<Item = (Price, Quantity)>,
{
    let mut levels: Vec<PriceLevel> = Vec::new();
    for (price, qty) in orders {
        match levels.last_mut() {
            Some(level) if level.price == price => level.absorb(qty),
            _ => {
                if levels.len() == max_levels {
                    break;
                }
                levels.push(PriceLevel::new(price, qty));
            }
        }
    }
    levels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_merges_equal_prices() {
        let orders = vec![
            (Price::from_units(10), Quantity(50)),
            (Price::from_units(10), Quantity(30)),
            (Price::from_units(9), Quantity(20)),
        ];

        let levels = aggregate(orders, 10);
        assert_eq!(levels.len(), 2);
        assert_eq!(levels[0], PriceLevel { price: Price::from_units(10), total_qty: Quantity(80), order_count: 2 });
        assert_eq!(levels[1].total_qty, Quantity(20));
    }

    #[test]
    fn test_aggregate_truncates() {
        let orders = (0..5).map(|i| (Price::from_units(100 - i), Quantity(10)));
        let levels = aggregate(orders, 3);
        assert_eq!(levels.len(), 3);
        assert_eq!(levels[2].price, Price::from_units(98));
    }

    #[test]
    fn test_aggregate_zero_levels() {
        let orders = vec![(Price::from_units(10), Quantity(50))];
        assert!(aggregate(orders, 0).is_empty());
    }
}
