//! The seam between the engine and whatever store holds raw events.

use crate::{DivgrowthError, Result, SecurityHistory};

/// A provider of per-security event histories.
///
/// The engine performs no I/O; implementations load, validate and hand over
/// complete records. Records missing required fields are expected to be
/// dropped here, before they reach the engine.
pub trait EventSource: Send + Sync {
    /// Returns every security known to the source.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be read.
    fn securities(&self) -> Result<Vec<SecurityHistory>>;

    /// Returns the history of a single security. Symbols match ignoring
    /// ASCII case.
    ///
    /// # Errors
    ///
    /// Returns [`DivgrowthError::SymbolNotFound`] if `symbol` is unknown.
    fn security(&self, symbol: &str) -> Result<SecurityHistory> {
        self.securities()?
            .into_iter()
            .find(|history| history.symbol.eq_ignore_ascii_case(symbol))
            .ok_or_else(|| DivgrowthError::SymbolNotFound(symbol.to_string()))
    }
}

impl EventSource for Vec<SecurityHistory> {
    fn securities(&self) -> Result<Vec<SecurityHistory>> {
        Ok(self.clone())
    }
}
