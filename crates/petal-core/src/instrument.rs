//! Instrument registry.
//!
//! Maps instrument names to dense `SymbolId`s at startup. The set is fixed
//! for the lifetime of an engine.

use arrayvec::ArrayVec;

use crate::error::RegistryError;
use crate::order::SymbolId;

/// Maximum instruments one engine can host.
pub const MAX_INSTRUMENTS: usize = 16;

/// Instruments traded when no explicit set is given.
pub const DEFAULT_INSTRUMENTS: [&str; 5] = ["Rose", "Lavender", "Lotus", "Tulip", "Orchid"];

/// Fixed whitelist of tradable instruments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentRegistry {
    names: ArrayVec<String, MAX_INSTRUMENTS>,
}

impl InstrumentRegistry {
    /// Build a registry; ids are assigned in iteration order.
    pub fn new<I, S>(names: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registered: ArrayVec<String, MAX_INSTRUMENTS> = ArrayVec::new();
        let mut count = 0usize;
        for name in names {
            let name = name.into();
            count += 1;
            if name.is_empty() {
                return Err(RegistryError::EmptyName);
            }
            if registered.contains(&name) {
                return Err(RegistryError::Duplicate { name });
            }
            // Past the limit keep counting so the error reports the full size.
            let _ = registered.try_push(name);
        }
        if count > MAX_INSTRUMENTS {
            return Err(RegistryError::TooMany { count, limit: MAX_INSTRUMENTS });
        }
        Ok(Self { names: registered })
    }

    /// Resolve a name. Matching is exact and case-sensitive.
    #[inline]
    pub fn lookup(&self, name: &str) -> Option<SymbolId> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|idx| SymbolId(idx as u32))
    }

    /// Name of a registered instrument.
    ///
    /// # Panics
    /// Panics if the id was not issued by this registry.
    #[inline]
    pub fn name(&self, symbol: SymbolId) -> &str {
        &self.names[symbol.index()]
    }

    /// Registered instruments in id order.
    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &str)> + '_ {
        self.names
            .iter()
            .enumerate()
            .map(|(idx, name)| (SymbolId(idx as u32), name.as_str()))
    }

    /// Number of instruments.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True if no instruments are registered.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for InstrumentRegistry {
    fn default() -> Self {
        Self {
            names: DEFAULT_INSTRUMENTS.iter().map(|n| n.to_string()).collect(),
        }
    }
}
