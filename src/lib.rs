//! Importune - Convergent Auto-Import Formatter Library
//!
//! Turns the raw, possibly-conflicting fix suggestions of the Ruff analyzer
//! into a single consistent rewrite, iterated to a textual fixed point.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod infra;
pub mod models;
pub mod services;

pub use error::{ImportuneError, ImportuneResult};
