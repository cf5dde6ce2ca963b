//! # FibRope
//!
//! A persistent rope (fancy string) for text editors. Ropes are immutable:
//! insert, erase, replace, append and split all return a new rope, sharing
//! every untouched subtree with the rope they came from. Keeping an old rope
//! around is all it takes to undo an edit.
//!
//! Positions are counted in chars (unicode scalar values). The rope isn't
//! grapheme aware.
//!
//! Besides the usual string operations, every node tracks line feeds so
//! ropes can convert between (line, column) positions and char offsets in
//! O(log n) time.
//!
//! Trees are kept shallow with the Fibonacci balance criterion: after an
//! append, if the tree holds fewer than fib(depth + 2) chars it is rebuilt from
//! its leaves.
//!
//! ```
//! use fibrope::Rope;
//!
//! let before = Rope::new("Hello\nworld!");
//! let after = before.insert_str(6, "cruel ");
//!
//! assert_eq!(after, "Hello\ncruel world!");
//! assert_eq!(before, "Hello\nworld!"); // Unchanged.
//! assert_eq!(after.line_count(), 2);
//! assert_eq!(after.find_line_start(1), 6);
//! ```
//!
//! With the `history` feature (on by default) the crate also ships a small
//! undo / redo stack, and with `finder` a Z-algorithm search and replace.

mod node;
mod rope;
mod balance;
mod iter;
mod error;
mod position;
mod fast_str_tools;

#[cfg(feature = "history")]
pub mod history;

#[cfg(feature = "finder")]
pub mod finder;

pub use crate::rope::Rope;
pub use crate::error::RopeError;
pub use crate::position::Position;
pub use crate::iter::{Chars, Chunks};
pub use crate::balance::MAX_DEPTH;

#[cfg(feature = "history")]
pub use crate::history::{History, Snapshot};

#[cfg(feature = "finder")]
pub use crate::finder::Finder;
