//! penmark-core: writing-assessment engine.
//!
//! Pure, deterministic checks (text metrics, task-point coverage, rubric
//! scoring, lexical and grammar heuristics) plus the [`traits::Proofer`] seam
//! for a remote proofing service, and the [`engine::Assessor`] that ties them
//! together.

pub mod aggregate;
pub mod catalog;
pub mod coverage;
pub mod engine;
pub mod error;
pub mod grammar;
pub mod highlight;
pub mod lexicon;
pub mod metrics;
pub mod model;
pub mod report;
pub mod scoring;
pub mod session;
pub mod spelling;
pub mod text;
pub mod traits;
