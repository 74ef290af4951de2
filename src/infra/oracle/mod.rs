//! Analyzer capability boundary
//!
//! The analyzer is modeled as an injected interface so the convergence,
//! merge, and patch logic never depends on a concrete binary. Tests
//! substitute a deterministic fake at this seam.

mod ruff;

pub use ruff::RuffOracle;

use crate::error::OracleError;
use crate::models::diagnostic::Diagnostic;
use crate::models::oracle::OracleConfig;

/// One analyzer pass over one text snapshot. Must surface a descriptive
/// error for an invalid config/text pairing, never fail silently.
pub trait Oracle: Send + Sync {
    fn check(&self, text: &str, config: &OracleConfig) -> Result<Vec<Diagnostic>, OracleError>;
}
