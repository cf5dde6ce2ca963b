// Tree nodes for the persistent rope.
//
// A node is either a leaf holding a run of text, or a branch joining two
// subtrees. Nodes are only ever reachable through Arc and none of their fields
// can change after construction, so any number of ropes (including old
// versions kept around for undo) can share a subtree.

use std::sync::Arc;
use crate::error::RopeError;
use crate::fast_str_tools::*;

/// A possibly-empty subtree. None stands in for an empty side of a branch.
pub(crate) type Handle = Option<Arc<Node>>;

#[derive(Debug)]
pub(crate) enum Node {
    Leaf(Leaf),
    Branch(Branch),
}

#[derive(Debug)]
pub(crate) struct Leaf {
    text: Box<str>,
    num_chars: usize,

    /// Char offsets of every line feed in text. Strictly increasing, all < num_chars.
    line_feeds: Box<[usize]>,
}

#[derive(Debug)]
pub(crate) struct Branch {
    left: Handle,
    right: Handle,

    /// Chars in the left subtree. Index lookups route on this.
    weight: usize,
    num_chars: usize,
    num_bytes: usize,

    /// Line feeds in the left subtree. Line lookups route on this.
    lf_weight: usize,
    lf_count: usize,

    depth: usize,
}

impl Leaf {
    fn new(text: &str) -> Self {
        let num_chars = count_chars(text);
        Leaf {
            line_feeds: line_feed_offsets(text, num_chars == text.len()).into_boxed_slice(),
            text: text.into(),
            num_chars,
        }
    }

    pub(crate) fn as_str(&self) -> &str { &self.text }

    fn is_ascii(&self) -> bool { self.num_chars == self.text.len() }

    fn byte_idx(&self, char_idx: usize) -> usize {
        if self.is_ascii() { char_idx.min(self.text.len()) }
        else { char_to_byte_idx(&self.text, char_idx) }
    }

    fn char_at(&self, index: usize) -> Option<char> {
        if index >= self.num_chars { return None; }
        self.text[self.byte_idx(index)..].chars().next()
    }

    fn write_substring(&self, start: usize, len: usize, out: &mut String) {
        if start >= self.num_chars || len == 0 { return; }
        let end = start + len.min(self.num_chars - start);
        out.push_str(&self.text[self.byte_idx(start)..self.byte_idx(end)]);
    }

    fn split_at(&self, index: usize) -> (Leaf, Leaf) {
        let (a, b) = self.text.split_at(self.byte_idx(index));
        (Leaf::new(a), Leaf::new(b))
    }
}

impl Branch {
    pub(crate) fn left(&self) -> Option<&Arc<Node>> { self.left.as_ref() }
    pub(crate) fn right(&self) -> Option<&Arc<Node>> { self.right.as_ref() }
}

fn handle_chars(h: &Handle) -> usize { h.as_ref().map_or(0, |n| n.len_chars()) }
fn handle_bytes(h: &Handle) -> usize { h.as_ref().map_or(0, |n| n.len_bytes()) }
fn handle_lf_count(h: &Handle) -> usize { h.as_ref().map_or(0, |n| n.lf_count()) }
fn handle_depth(h: &Handle) -> usize { h.as_ref().map_or(0, |n| n.depth()) }

fn split_handle(h: &Handle, index: usize) -> (Handle, Handle) {
    match h {
        Some(n) => n.split(index),
        None => (None, None),
    }
}

impl Node {
    pub(crate) fn leaf(text: &str) -> Arc<Node> {
        Arc::new(Node::Leaf(Leaf::new(text)))
    }

    /// Build a branch over two (possibly empty) sides. All the aggregate
    /// statistics are computed here, once.
    pub(crate) fn branch(left: Handle, right: Handle) -> Arc<Node> {
        let weight = handle_chars(&left);
        let lf_weight = handle_lf_count(&left);
        Arc::new(Node::Branch(Branch {
            weight,
            num_chars: weight + handle_chars(&right),
            num_bytes: handle_bytes(&left) + handle_bytes(&right),
            lf_weight,
            lf_count: lf_weight + handle_lf_count(&right),
            depth: 1 + handle_depth(&left).max(handle_depth(&right)),
            left,
            right,
        }))
    }

    /// Concatenate two sides, skipping the branch if either side is empty.
    pub(crate) fn join(left: Handle, right: Handle) -> Handle {
        match (left, right) {
            (None, r) => r,
            (l, None) => l,
            (l, r) => Some(Node::branch(l, r)),
        }
    }

    pub(crate) fn len_chars(&self) -> usize {
        match self {
            Node::Leaf(l) => l.num_chars,
            Node::Branch(b) => b.num_chars,
        }
    }

    pub(crate) fn len_bytes(&self) -> usize {
        match self {
            Node::Leaf(l) => l.text.len(),
            Node::Branch(b) => b.num_bytes,
        }
    }

    pub(crate) fn lf_count(&self) -> usize {
        match self {
            Node::Leaf(l) => l.line_feeds.len(),
            Node::Branch(b) => b.lf_count,
        }
    }

    pub(crate) fn depth(&self) -> usize {
        match self {
            Node::Leaf(_) => 0,
            Node::Branch(b) => b.depth,
        }
    }

    pub(crate) fn char_at(&self, index: usize) -> Result<char, RopeError> {
        let out_of_range = RopeError::IndexOutOfRange { index, len: self.len_chars() };
        match self {
            Node::Leaf(l) => l.char_at(index).ok_or(out_of_range),
            Node::Branch(b) => {
                if index >= b.num_chars { return Err(out_of_range); }
                let (child, index) = if index < b.weight {
                    (&b.left, index)
                } else {
                    (&b.right, index - b.weight)
                };
                child.as_ref().ok_or(out_of_range)?.char_at(index)
            }
        }
    }

    /// Append the chars in [start, start+len) to out. Anything past the end of
    /// this node is silently ignored.
    pub(crate) fn write_substring(&self, start: usize, len: usize, out: &mut String) {
        match self {
            Node::Leaf(l) => l.write_substring(start, len, out),
            Node::Branch(b) => {
                if start >= b.weight {
                    if let Some(r) = &b.right {
                        r.write_substring(start - b.weight, len, out);
                    }
                    return;
                }

                if let Some(l) = &b.left {
                    l.write_substring(start, len, out);
                }

                let taken = b.weight - start;
                if len > taken {
                    if let Some(r) = &b.right {
                        r.write_substring(0, len - taken, out);
                    }
                }
            }
        }
    }

    /// Split into two subtrees at char offset index. Only the nodes on the path
    /// down to index are rebuilt; everything else is shared with self.
    pub(crate) fn split(self: &Arc<Self>, index: usize) -> (Handle, Handle) {
        match self.as_ref() {
            Node::Leaf(l) => {
                if index == 0 {
                    (None, Some(self.clone()))
                } else if index >= l.num_chars {
                    (Some(self.clone()), None)
                } else {
                    let (a, b) = l.split_at(index);
                    (Some(Arc::new(Node::Leaf(a))), Some(Arc::new(Node::Leaf(b))))
                }
            }
            Node::Branch(b) => {
                if index == b.weight {
                    (b.left.clone(), b.right.clone())
                } else if index < b.weight {
                    let (ll, lr) = split_handle(&b.left, index);
                    (ll, Node::join(lr, b.right.clone()))
                } else {
                    let (rl, rr) = split_handle(&b.right, index - b.weight);
                    (Node::join(b.left.clone(), rl), rr)
                }
            }
        }
    }

    /// Push every leaf under this node, in order.
    pub(crate) fn leaves(self: &Arc<Self>, out: &mut Vec<Arc<Node>>) {
        match self.as_ref() {
            Node::Leaf(_) => out.push(self.clone()),
            Node::Branch(b) => {
                if let Some(l) = &b.left { l.leaves(out); }
                if let Some(r) = &b.right { r.leaves(out); }
            }
        }
    }

    /// Char offset of the line feed with (zero based) index lf.
    pub(crate) fn find_line_feed(&self, lf: usize) -> Result<usize, RopeError> {
        if lf >= self.lf_count() {
            return Err(RopeError::LineOutOfRange { line: lf + 1, line_count: self.lf_count() + 1 });
        }

        match self {
            Node::Leaf(l) => Ok(l.line_feeds[lf]),
            Node::Branch(b) => {
                // lf < lf_count guarantees the side we pick exists.
                if lf < b.lf_weight {
                    b.left.as_ref().map_or(Ok(0), |n| n.find_line_feed(lf))
                } else {
                    let r = b.right.as_ref().map_or(Ok(0), |n| n.find_line_feed(lf - b.lf_weight))?;
                    Ok(b.weight + r)
                }
            }
        }
    }

    /// Char offset where line starts. Strict: errors if the line doesn't exist.
    pub(crate) fn line_start(&self, line: usize) -> Result<usize, RopeError> {
        if line == 0 { Ok(0) }
        else { Ok(self.find_line_feed(line - 1)? + 1) }
    }

    /// The number of line feeds strictly before char offset index.
    pub(crate) fn line_of(&self, index: usize) -> usize {
        match self {
            Node::Leaf(l) => l.line_feeds.partition_point(|&p| p < index),
            Node::Branch(b) => {
                if index < b.weight {
                    b.left.as_ref().map_or(0, |n| n.line_of(index))
                } else {
                    b.lf_weight + b.right.as_ref().map_or(0, |n| n.line_of(index - b.weight))
                }
            }
        }
    }

    /// Recursively verify every cached statistic. Panics on corruption.
    pub(crate) fn check(&self) {
        match self {
            Node::Leaf(l) => {
                assert_eq!(l.num_chars, count_chars(&l.text));
                let lfs: Vec<usize> = l.text.chars().enumerate()
                    .filter(|(_, c)| *c == '\n')
                    .map(|(i, _)| i)
                    .collect();
                assert_eq!(&lfs[..], &l.line_feeds[..]);
            }
            Node::Branch(b) => {
                assert_eq!(b.weight, handle_chars(&b.left));
                assert_eq!(b.num_chars, b.weight + handle_chars(&b.right));
                assert_eq!(b.num_bytes, handle_bytes(&b.left) + handle_bytes(&b.right));
                assert_eq!(b.lf_weight, handle_lf_count(&b.left));
                assert_eq!(b.lf_count, b.lf_weight + handle_lf_count(&b.right));
                assert_eq!(b.depth, 1 + handle_depth(&b.left).max(handle_depth(&b.right)));
                if let Some(l) = &b.left { l.check(); }
                if let Some(r) = &b.right { r.check(); }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;
    use crate::error::RopeError;
    use super::Node;

    fn flatten(n: &Node) -> String {
        let mut s = String::new();
        n.write_substring(0, usize::MAX, &mut s);
        s
    }

    fn sample() -> Arc<Node> {
        // "Hello\n" + ("wor" + "ld!\nbye")
        Node::branch(
            Some(Node::leaf("Hello\n")),
            Some(Node::branch(Some(Node::leaf("wor")), Some(Node::leaf("ld!\nbye")))),
        )
    }

    #[test]
    fn branch_statistics() {
        let n = sample();
        n.check();
        assert_eq!(n.len_chars(), 16);
        assert_eq!(n.len_bytes(), 16);
        assert_eq!(n.lf_count(), 2);
        assert_eq!(n.depth(), 2);

        let empty_sides = Node::branch(None, None);
        assert_eq!(empty_sides.len_chars(), 0);
        assert_eq!(empty_sides.depth(), 1);
        empty_sides.check();
    }

    #[test]
    fn char_at_routes_by_weight() {
        let n = sample();
        let s = flatten(&n);
        for (i, c) in s.chars().enumerate() {
            assert_eq!(n.char_at(i), Ok(c));
        }
        assert_eq!(n.char_at(16), Err(RopeError::IndexOutOfRange { index: 16, len: 16 }));
        assert!(Node::leaf("").char_at(0).is_err());
    }

    #[test]
    fn substring_is_tolerant() {
        let n = sample();
        let sub = |start, len| {
            let mut s = String::new();
            n.write_substring(start, len, &mut s);
            s
        };
        assert_eq!(sub(0, 5), "Hello");
        assert_eq!(sub(4, 6), "o\nworl");
        assert_eq!(sub(6, 3), "wor");
        assert_eq!(sub(8, 100), "rld!\nbye");
        assert_eq!(sub(17, 3), "");
        assert_eq!(sub(1000, 3), "");
        assert_eq!(sub(3, 0), "");
    }

    #[test]
    fn split_at_weight_reuses_children() {
        let n = sample();
        let Node::Branch(b) = n.as_ref() else { panic!("expected branch") };
        let (l, r) = n.split(6);
        assert!(Arc::ptr_eq(l.as_ref().unwrap(), b.left().unwrap()));
        assert!(Arc::ptr_eq(r.as_ref().unwrap(), b.right().unwrap()));
    }

    #[test]
    fn split_shares_untouched_subtrees() {
        let n = sample();
        let Node::Branch(b) = n.as_ref() else { panic!("expected branch") };
        let (l, r) = n.split(2);
        assert_eq!(flatten(l.as_ref().unwrap()), "He");
        assert_eq!(flatten(r.as_ref().unwrap()), "llo\nworld!\nbye");

        let r = r.unwrap();
        let Node::Branch(rb) = r.as_ref() else { panic!("expected branch") };
        assert!(Arc::ptr_eq(rb.right().unwrap(), b.right().unwrap()));
        r.check();
    }

    #[test]
    fn split_every_index() {
        let n = sample();
        let s = flatten(&n);
        for i in 0..=s.len() {
            let (l, r) = n.split(i);
            let mut joined = String::new();
            if let Some(l) = &l { l.check(); joined.push_str(&flatten(l)); }
            if let Some(r) = &r { r.check(); joined.push_str(&flatten(r)); }
            assert_eq!(joined, s);
        }
    }

    #[test]
    fn split_unicode_leaf() {
        let n = Node::leaf("aせbか");
        let (l, r) = n.split(2);
        assert_eq!(flatten(l.as_ref().unwrap()), "aせ");
        assert_eq!(flatten(r.as_ref().unwrap()), "bか");
    }

    #[test]
    fn line_feed_lookup() {
        let n = sample();
        assert_eq!(n.find_line_feed(0), Ok(5));
        assert_eq!(n.find_line_feed(1), Ok(12));
        assert_eq!(n.find_line_feed(2), Err(RopeError::LineOutOfRange { line: 3, line_count: 3 }));

        assert_eq!(n.line_start(0), Ok(0));
        assert_eq!(n.line_start(1), Ok(6));
        assert_eq!(n.line_start(2), Ok(13));
        assert!(n.line_start(3).is_err());
    }

    #[test]
    fn line_of_index() {
        let n = sample();
        assert_eq!(n.line_of(0), 0);
        assert_eq!(n.line_of(5), 0);
        assert_eq!(n.line_of(6), 1);
        assert_eq!(n.line_of(12), 1);
        assert_eq!(n.line_of(13), 2);
        assert_eq!(n.line_of(16), 2);
    }

    #[test]
    fn leaves_in_order() {
        let n = sample();
        let mut leaves = vec![];
        n.leaves(&mut leaves);
        let texts: Vec<String> = leaves.iter().map(|l| flatten(l)).collect();
        assert_eq!(texts, vec!["Hello\n", "wor", "ld!\nbye"]);
    }
}
