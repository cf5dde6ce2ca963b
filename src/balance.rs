// Depth bookkeeping for the rope.
//
// We use the classic Fibonacci criterion from Boehm et al: a tree of depth d is
// balanced if it holds at least fib(d + 2) chars. Appending repeatedly at one
// end makes the tree a linked list, so after every join we check the criterion
// and rebuild from the leaves when it fails.

use std::sync::Arc;
use crate::node::Node;

/// Ropes deeper than this are always considered unbalanced.
pub const MAX_DEPTH: usize = 64;

// Leaves are merged up to this many bytes when the tree is rebuilt, and big
// strings are cut into leaves of this size by Rope::chunked. Small in debug
// builds so tests exercise multi-leaf trees.
#[cfg(debug_assertions)]
pub(crate) const LEAF_CHUNK_BYTES: usize = 16;
#[cfg(not(debug_assertions))]
pub(crate) const LEAF_CHUNK_BYTES: usize = 1024;

const fn make_fibs() -> [u64; MAX_DEPTH] {
    let mut result = [0; MAX_DEPTH];
    result[0] = 1;
    result[1] = 1;
    let mut i = 2;
    while i < MAX_DEPTH {
        result[i] = result[i - 1] + result[i - 2];
        i += 1;
    }
    result
}

const FIBS: [u64; MAX_DEPTH] = make_fibs();

/// fib(0) = fib(1) = 1. Saturates past the end of the table.
pub(crate) fn fib(n: usize) -> u64 {
    FIBS.get(n).copied().unwrap_or(u64::MAX)
}

pub(crate) fn is_balanced(root: &Node) -> bool {
    match root {
        // A single leaf can't get any shallower.
        Node::Leaf(_) => true,
        Node::Branch(_) => {
            let depth = root.depth();
            depth < MAX_DEPTH - 2 && root.len_chars() as u64 >= fib(depth + 2)
        }
    }
}

/// Rebuild a minimal depth tree over the leaves of root. Content is unchanged.
pub(crate) fn rebuild(root: &Arc<Node>) -> Arc<Node> {
    let mut leaves = Vec::new();
    root.leaves(&mut leaves);
    let before = leaves.len();
    let leaves = merge_small_leaves(leaves);

    log::trace!("rebalancing rope: depth {}, {} leaves -> {} leaves",
        root.depth(), before, leaves.len());

    if leaves.is_empty() {
        Node::leaf("")
    } else {
        leaves_merge(&leaves)
    }
}

/// Drop empty leaves and glue runs of adjacent small leaves together while
/// they fit in LEAF_CHUNK_BYTES. Leaves which are already big are reused as-is.
fn merge_small_leaves(leaves: Vec<Arc<Node>>) -> Vec<Arc<Node>> {
    let mut result = Vec::with_capacity(leaves.len());
    // Leaves waiting to be glued together, and their total size in bytes.
    let mut pending: Vec<Arc<Node>> = Vec::new();
    let mut pending_bytes = 0;

    fn flush(pending: &mut Vec<Arc<Node>>, result: &mut Vec<Arc<Node>>) {
        if pending.len() <= 1 {
            result.append(pending);
            return;
        }

        let mut text = String::new();
        for leaf in pending.iter() {
            if let Node::Leaf(l) = leaf.as_ref() {
                text.push_str(l.as_str());
            }
        }
        result.push(Node::leaf(&text));
        pending.clear();
    }

    for leaf in leaves {
        let bytes = leaf.len_bytes();
        if bytes == 0 { continue; }

        if pending_bytes + bytes > LEAF_CHUNK_BYTES {
            flush(&mut pending, &mut result);
            pending_bytes = 0;
        }
        pending.push(leaf);
        pending_bytes += bytes;
    }
    flush(&mut pending, &mut result);
    result
}

/// Pair up a non-empty run of leaves into a balanced tree, splitting at the midpoint.
pub(crate) fn leaves_merge(leaves: &[Arc<Node>]) -> Arc<Node> {
    match leaves.len() {
        1 => leaves[0].clone(),
        2 => Node::branch(Some(leaves[0].clone()), Some(leaves[1].clone())),
        len => {
            let mid = len / 2;
            Node::branch(Some(leaves_merge(&leaves[..mid])), Some(leaves_merge(&leaves[mid..])))
        }
    }
}
