//! Concurrent, frecency-ranked prefix index.
//!
//! [`Trie`] is the lowest layer of the autocompletion cache: a
//! character-indexed tree where every node holds a small, score-sorted
//! list of [`CompletionEntry`] values. Insertion also propagates a
//! decayed copy of the entry up to the last three ancestor prefixes, so
//! a shorter prefix than the one originally registered still surfaces
//! the completion (just ranked lower).
//!
//! Indexing is over the printable ASCII range only; see [`node::slot_for`]
//! for how wider input degrades (non-indexable characters are dropped
//! from the *key*, not from the completion's displayed text).

mod entry;
mod node;
mod trie;

pub use entry::{CompletionEntry, CompletionKind};
pub use node::{CHILD_SLOTS, index_path, slot_for};
pub use trie::{ANCESTOR_CAP, ANCESTOR_DECAY, ANCESTOR_LEVELS, NODE_CAP, Trie};
