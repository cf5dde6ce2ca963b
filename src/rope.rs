use std::cmp::Ordering;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::Arc;
use crate::balance::{self, LEAF_CHUNK_BYTES};
use crate::error::RopeError;
use crate::fast_str_tools::chunk_boundary;
use crate::node::{Handle, Node};
use crate::Position;

/// A persistent rope. Every edit returns a new rope which shares all untouched
/// subtrees with the old one; the old rope stays valid and unchanged. Cloning
/// is an Arc bump.
///
/// Positions are in chars (unicode scalar values).
#[derive(Clone)]
pub struct Rope {
    pub(crate) root: Arc<Node>,
}

impl Rope {
    /// Create a rope holding text in a single leaf.
    pub fn new(text: &str) -> Self {
        Rope { root: Node::leaf(text) }
    }

    /// Create a rope from a big string, cutting it into leaf sized chunks
    /// (on char boundaries) and building a balanced tree over them.
    pub fn chunked(text: &str) -> Self {
        let mut leaves = Vec::new();
        push_chunks(&mut leaves, text);
        Self::from_leaves(leaves)
    }

    fn from_leaves(leaves: Vec<Arc<Node>>) -> Self {
        if leaves.is_empty() { Rope::default() }
        else { Rope { root: balance::leaves_merge(&leaves) } }
    }

    fn from_handle(h: Handle) -> Self {
        match h {
            Some(root) => Rope { root },
            None => Rope::default(),
        }
    }

    /// The number of chars in the rope. O(1).
    pub fn len_chars(&self) -> usize { self.root.len_chars() }

    /// The number of bytes the rope's contents take up when encoded as utf8. O(1).
    pub fn len_bytes(&self) -> usize { self.root.len_bytes() }

    pub fn is_empty(&self) -> bool { self.len_chars() == 0 }

    /// The char at index. Reading exactly one past the end returns '\0', which
    /// cursor logic uses as an end-of-buffer sentinel. Anything further is an
    /// error.
    pub fn char_at(&self, index: usize) -> Result<char, RopeError> {
        match index.cmp(&self.len_chars()) {
            Ordering::Less => self.root.char_at(index),
            Ordering::Equal => Ok('\0'),
            Ordering::Greater => Err(RopeError::IndexOutOfRange { index, len: self.len_chars() }),
        }
    }

    /// Up to len chars starting at start. Never fails: ranges running past the
    /// end of the rope are clipped.
    pub fn substr(&self, start: usize, len: usize) -> String {
        let mut result = String::with_capacity(len.min(self.len_bytes()));
        self.root.write_substring(start, len, &mut result);
        result
    }

    /// Join other onto the end of this rope, rebalancing if needed.
    pub fn append(&self, other: &Rope) -> Rope {
        if other.is_empty() { return self.clone(); }
        if self.is_empty() { return other.clone(); }

        Rope {
            root: Node::branch(Some(self.root.clone()), Some(other.root.clone()))
        }.rebalance()
    }

    pub fn append_str(&self, text: &str) -> Rope {
        self.append(&Rope::new(text))
    }

    pub fn prepend(&self, other: &Rope) -> Rope {
        other.append(self)
    }

    pub fn prepend_str(&self, text: &str) -> Rope {
        self.prepend(&Rope::new(text))
    }

    /// Insert other at char position index. Positions past the end insert at the end.
    pub fn insert(&self, index: usize, other: &Rope) -> Rope {
        if index == 0 {
            other.append(self)
        } else if index >= self.len_chars() {
            self.append(other)
        } else {
            let (left, right) = self.split(index);
            left.append(other).append(&right)
        }
    }

    pub fn insert_str(&self, index: usize, text: &str) -> Rope {
        self.insert(index, &Rope::new(text))
    }

    /// Remove len chars starting at start. The range is clipped to the rope.
    pub fn erase(&self, start: usize, len: usize) -> Rope {
        if len == 0 || start >= self.len_chars() { return self.clone(); }

        let (left, rest) = self.split(start);
        let (_removed, right) = rest.split(len);
        left.append(&right).rebalance()
    }

    pub fn replace(&self, start: usize, len: usize, other: &Rope) -> Rope {
        self.erase(start, len).insert(start, other)
    }

    pub fn replace_str(&self, start: usize, len: usize, text: &str) -> Rope {
        self.replace(start, len, &Rope::new(text))
    }

    /// Split into [0, index) and [index, len). Positions past the end split at the end.
    pub fn split(&self, index: usize) -> (Rope, Rope) {
        let (left, right) = self.root.split(index);
        (Rope::from_handle(left), Rope::from_handle(right))
    }

    /// Number of lines. Text without a trailing line feed still has one more line.
    pub fn line_count(&self) -> usize { self.root.lf_count() + 1 }

    /// Char offset where line begins. Returns len_chars() + 1 if there's no such line.
    pub fn find_line_start(&self, line: usize) -> usize {
        if line >= self.line_count() { return self.len_chars() + 1; }
        self.root.line_start(line).unwrap_or(self.len_chars() + 1)
    }

    /// Number of chars on line, not counting its line feed.
    pub fn line_length(&self, line: usize) -> Result<usize, RopeError> {
        let line_count = self.line_count();
        if line >= line_count {
            return Err(RopeError::LineOutOfRange { line, line_count });
        }

        let start = self.root.line_start(line)?;
        if line + 1 == line_count {
            Ok(self.len_chars() - start)
        } else {
            Ok(self.root.line_start(line + 1)? - start - 1)
        }
    }

    /// Flat char offset of (line, column). Columns aren't checked against the
    /// length of the line.
    pub fn index_from_pos(&self, line: usize, column: usize) -> usize {
        self.find_line_start(line) + column
    }

    /// The line containing the char at index. index may be len_chars().
    pub fn line_of(&self, index: usize) -> Result<usize, RopeError> {
        if index > self.len_chars() {
            return Err(RopeError::IndexOutOfRange { index, len: self.len_chars() });
        }
        Ok(self.root.line_of(index))
    }

    /// The (line, column) of the char at index. Inverse of index_from_pos.
    pub fn position_of(&self, index: usize) -> Result<Position, RopeError> {
        let line = self.line_of(index)?;
        Ok(Position { line, column: index - self.root.line_start(line)? })
    }

    /// Depth of the tree. A rope made of a single leaf has depth 0.
    pub fn depth(&self) -> usize { self.root.depth() }

    pub fn is_balanced(&self) -> bool { balance::is_balanced(&self.root) }

    /// Returns a balanced rope with the same content. Balanced ropes are
    /// returned unchanged.
    pub fn rebalance(&self) -> Rope {
        if self.is_balanced() { self.clone() }
        else { Rope { root: balance::rebuild(&self.root) } }
    }

    /// Verify the rope's internal bookkeeping. Panics if anything is wrong.
    pub fn check(&self) {
        self.root.check();
    }
}

fn push_chunks(leaves: &mut Vec<Arc<Node>>, mut text: &str) {
    while !text.is_empty() {
        let (byte_pos, _) = chunk_boundary(text, LEAF_CHUNK_BYTES);
        let (chunk, rem) = text.split_at(byte_pos);
        leaves.push(Node::leaf(chunk));
        text = rem;
    }
}

impl Default for Rope {
    fn default() -> Self {
        Rope::new("")
    }
}

impl From<&str> for Rope {
    fn from(s: &str) -> Self {
        Rope::new(s)
    }
}

impl From<String> for Rope {
    fn from(s: String) -> Self {
        Rope::new(&s)
    }
}

impl From<&Rope> for String {
    fn from(r: &Rope) -> Self {
        r.to_string()
    }
}

impl<'a> FromIterator<&'a str> for Rope {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        let mut leaves = Vec::new();
        for s in iter { push_chunks(&mut leaves, s); }
        Self::from_leaves(leaves)
    }
}

impl FromIterator<String> for Rope {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        let mut leaves = Vec::new();
        for s in iter { push_chunks(&mut leaves, &s); }
        Self::from_leaves(leaves)
    }
}

impl Display for Rope {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for s in self.chunks() {
            f.write_str(s)?;
        }
        Ok(())
    }
}

impl Debug for Rope {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Rope")
            .field(&self.to_string())
            .finish()
    }
}

impl PartialEq for Rope {
    // Compare chunk by chunk. The two ropes will usually be cut up differently,
    // so we walk both sides at once, comparing the overlapping prefix each time.
    fn eq(&self, other: &Rope) -> bool {
        if Arc::ptr_eq(&self.root, &other.root) { return true; }
        if self.len_bytes() != other.len_bytes()
                || self.len_chars() != other.len_chars() {
            return false
        }

        let mut other_iter = other.chunks();
        let mut os: &[u8] = &[];

        for s in self.chunks() {
            let mut s = s.as_bytes();
            while !s.is_empty() {
                if os.is_empty() {
                    match other_iter.next() {
                        Some(next) => os = next.as_bytes(),
                        None => return false,
                    }
                }

                let amt = s.len().min(os.len());
                if s[..amt] != os[..amt] { return false; }
                s = &s[amt..];
                os = &os[amt..];
            }
        }

        true
    }
}

impl Eq for Rope {}

impl PartialEq<str> for Rope {
    fn eq(&self, other: &str) -> bool {
        if self.len_bytes() != other.len() { return false; }
        let mut rest = other.as_bytes();
        for s in self.chunks() {
            let (head, tail) = rest.split_at(s.len());
            if head != s.as_bytes() { return false; }
            rest = tail;
        }
        true
    }
}

impl PartialEq<&str> for Rope {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl PartialEq<String> for Rope {
    fn eq(&self, other: &String) -> bool {
        self == other.as_str()
    }
}

impl PartialOrd for Rope {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rope {
    fn cmp(&self, other: &Self) -> Ordering {
        self.chars().cmp(other.chars())
    }
}
