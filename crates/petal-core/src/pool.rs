//! Slot arena for resting orders.
//!
//! Every resting order lives in exactly one slot, owned by value. Book
//! sides refer to orders by `OrderHandle` only, so an order can never be
//! reachable from two places once its slot is released. Freed slots are
//! reused LIFO for cache locality on recently released slots.

use crate::order::Order;

/// Index into the order pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct OrderHandle(pub u32);

impl OrderHandle {
    /// Get raw index.
    #[inline(always)]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Growable pool of orders.
#[derive(Debug, Default)]
pub struct OrderPool {
    /// Slot storage; `None` marks a free slot.
    slots: Vec<Option<Order>>,
    /// LIFO free list.
    free_list: Vec<u32>,
}

impl OrderPool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pool with room for `capacity` orders before growing.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
        }
    }

    /// Move an order into the pool.
    #[inline]
    pub fn insert(&mut self, order: Order) -> OrderHandle {
        match self.free_list.pop() {
            Some(idx) => {
                debug_assert!(self.slots[idx as usize].is_none(), "free slot {idx} is occupied");
                self.slots[idx as usize] = Some(order);
                OrderHandle(idx)
            }
            None => {
                let idx = u32::try_from(self.slots.len()).expect("order pool exceeds u32 slots");
                self.slots.push(Some(order));
                OrderHandle(idx)
            }
        }
    }

    /// Release a slot, returning the order it held.
    ///
    /// # Panics
    /// Panics if the handle is not live.
    #[inline]
    pub fn remove(&mut self, handle: OrderHandle) -> Order {
        let order = self
            .slots
            .get_mut(handle.index())
            .and_then(Option::take)
            .unwrap_or_else(|| panic!("release of dead order handle {}", handle.0));
        self.free_list.push(handle.0);
        order
    }

    /// Get immutable reference to order.
    ///
    /// # Panics
    /// Panics if the handle is not live.
    #[inline(always)]
    pub fn get(&self, handle: OrderHandle) -> &Order {
        match self.slots.get(handle.index()) {
            Some(Some(order)) => order,
            _ => panic!("dead order handle {}", handle.0),
        }
    }

    /// Get mutable reference to order.
    ///
    /// # Panics
    /// Panics if the handle is not live.
    #[inline(always)]
    pub fn get_mut(&mut self, handle: OrderHandle) -> &mut Order {
        match self.slots.get_mut(handle.index()) {
            Some(Some(order)) => order,
            _ => panic!("dead order handle {}", handle.0),
        }
    }

    /// Check whether a handle refers to a live order.
    #[inline(always)]
    pub fn contains(&self, handle: OrderHandle) -> bool {
        matches!(self.slots.get(handle.index()), Some(Some(_)))
    }

    /// Number of live orders.
    #[inline(always)]
    pub fn active(&self) -> usize {
        self.slots.len() - self.free_list.len()
    }

    /// Number of slots ever allocated.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Check if pool holds no live orders.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.active() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::{Price, Quantity};
    use crate::order::{OrderId, Side, SymbolId};

    fn order(id: u64) -> Order {
        Order::new(
            OrderId(id),
            id,
            SymbolId(0),
            Side::Buy,
            Price::from_units(100),
            Quantity(1000),
            "c",
        )
    }

    #[test]
    fn test_pool_insert_remove() {
        let mut pool = OrderPool::new();
        assert!(pool.is_empty());

        let h1 = pool.insert(order(1));
        let h2 = pool.insert(order(2));
        assert_eq!(pool.active(), 2);
        assert_eq!(pool.get(h1).order_id, OrderId(1));
        assert_eq!(pool.get(h2).order_id, OrderId(2));

        let removed = pool.remove(h1);
        assert_eq!(removed.order_id, OrderId(1));
        assert_eq!(pool.active(), 1);
        assert!(!pool.contains(h1));

        // LIFO: next insert reuses h1's slot
        let h3 = pool.insert(order(3));
        assert_eq!(h3, h1);
        assert_eq!(pool.get(h3).order_id, OrderId(3));
        assert_eq!(pool.capacity(), 2);
    }

    #[test]
    fn test_pool_get_mut() {
        let mut pool = OrderPool::with_capacity(4);
        let handle = pool.insert(order(42));

        pool.get_mut(handle).fill(Quantity(400));
        assert_eq!(pool.get(handle).remaining_qty, Quantity(600));
    }

    #[test]
    #[should_panic(expected = "dead order handle")]
    fn test_pool_stale_handle_panics() {
        let mut pool = OrderPool::new();
        let handle = pool.insert(order(1));
        pool.remove(handle);
        pool.get(handle);
    }

    #[test]
    #[should_panic(expected = "release of dead order handle")]
    fn test_pool_double_release_panics() {
        let mut pool = OrderPool::new();
        let handle = pool.insert(order(1));
        pool.remove(handle);
        pool.remove(handle);
    }
}
