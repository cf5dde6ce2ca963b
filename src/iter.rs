use crate::node::Node;
use crate::Rope;

/// An iterator over the leaf strings in a rope, in order. Empty leaves are skipped.
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    // Subtrees still to visit. The next one to visit is on top.
    stack: Vec<&'a Node>,
}

impl<'a> Chunks<'a> {
    pub(crate) fn new(root: &'a Node) -> Self {
        Chunks { stack: vec![root] }
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(n) = self.stack.pop() {
            match n {
                Node::Leaf(l) => {
                    let s = l.as_str();
                    if !s.is_empty() { return Some(s); }
                }
                Node::Branch(b) => {
                    if let Some(r) = b.right() { self.stack.push(r); }
                    if let Some(l) = b.left() { self.stack.push(l); }
                }
            }
        }

        None
    }
}

/// An iterator over the chars in a rope.
#[derive(Debug, Clone)]
pub struct Chars<'a> {
    chunks: Chunks<'a>,
    current: std::str::Chars<'a>,
}

impl<'a> Iterator for Chars<'a> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        loop {
            if let Some(c) = self.current.next() { return Some(c); }
            self.current = self.chunks.next()?.chars();
        }
    }
}

impl Rope {
    /// Iterate over the rope's contents as a series of string slices.
    pub fn chunks(&self) -> Chunks<'_> {
        Chunks::new(&self.root)
    }

    pub fn chars(&self) -> Chars<'_> {
        Chars { chunks: self.chunks(), current: "".chars() }
    }
}
