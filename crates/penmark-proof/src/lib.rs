//! penmark-proof: remote proofing integrations.
//!
//! Implements the `Proofer` trait for the LanguageTool HTTP API and loads
//! the proofing section of the penmark configuration.

pub mod config;
pub mod languagetool;
pub mod mock;

pub use config::{create_proofer, load_config, load_config_from, PenmarkConfig, ProofingConfig};
pub use languagetool::LanguageToolProofer;
pub use penmark_core::error::ProofError;
