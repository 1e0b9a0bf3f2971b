//! # Booster CLI
//!
//! Command-line front end for the Booster engine: dashboard metrics for one
//! student, cached performance analyses through the Gemini API, and CSV
//! transcript export.
//!
//! - [`analyze`]: the `analyze` command over a configured cache and provider
//! - [`gemini`]: `AnalysisProvider` implementation over the Gemini REST API
//! - [`ledger`]: loading score ledgers and subject catalogs from JSON exports
//! - [`settings`]: configuration loading with a persistent analysis cache

pub mod analyze;
pub mod gemini;
pub mod ledger;
pub mod settings;

pub use gemini::GeminiProvider;
