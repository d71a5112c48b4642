//! # Petal Core
//!
//! Multi-instrument limit order book and matching engine.
//!
//! ## Design Principles
//! - Price-time priority, trades print at the resting order's price
//! - Exact decimal prices (no floats)
//! - Orders live in a per-book arena, book sides hold handles
//! - Single-threaded and deterministic: same requests, same reports

pub mod fixed;
pub mod order;
pub mod pool;
pub mod level;
pub mod book;
pub mod instrument;
pub mod admission;
pub mod report;
pub mod engine;
pub mod error;

pub use fixed::{Price, Quantity};
pub use order::{Order, OrderId, OrderStatus, SymbolId, Side};
pub use pool::{OrderPool, OrderHandle};
pub use level::PriceLevel;
pub use book::{BookEntry, BookSide, InstrumentBook};
pub use instrument::{InstrumentRegistry, DEFAULT_INSTRUMENTS, MAX_INSTRUMENTS};
pub use admission::{OrderRequest, RejectReason, RejectReasons};
pub use report::ExecutionReport;
pub use engine::MatchingEngine;
pub use error::RegistryError;
