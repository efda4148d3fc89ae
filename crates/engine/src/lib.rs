//! Synthesizes ranked, tooltip-annotated suggestions from the tiered
//! cache, a fixed pattern table, and shape-classified generators.

mod generators;
mod patterns;
mod suggestion;

pub use suggestion::{Suggestion, suggest};
