//! Core Module - Scan Logic
//!
//! Address classification, registry matching, traceability scoring and the
//! scan orchestrator. Everything here except the scanner is pure.

pub mod classifier;
pub mod registry;
pub mod risk_score;
pub mod scanner;

pub use classifier::*;
pub use registry::*;
pub use risk_score::*;
pub use scanner::*;
