//! Tiered completion cache: ultra-hot slab, hot map, prediction TTL
//! cache, trie, and static fallback, plus the frecency stats feeding it.

mod cache;
mod fallback;
mod hot;
mod prediction;
mod seed;
mod stats;

pub use cache::TieredCache;
pub use hot::{HOT_MAP_CAP, ULTRA_HOT_CAP};
pub use prediction::PREDICTION_TTL;
pub use stats::CommandStats;
