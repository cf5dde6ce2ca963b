//! Search and replace over ropes using the Z-algorithm.
//!
//! The finder treats ropes purely as indexable char sequences. To search, it
//! builds `pattern + '\0' + text` as a (cheap, shared) rope and computes the Z
//! array over it: `z[i]` is the length of the longest common prefix of the
//! whole string and the suffix starting at i. Wherever `z[i]` reaches the
//! pattern length there's a match.

use crate::{Position, Rope, RopeError};

const SENTINEL: &str = "\0";

/// The Z array of text. z[0] is left at 0.
pub fn z_array(text: &Rope) -> Result<Vec<usize>, RopeError> {
    let len = text.len_chars();
    let mut z = vec![0; len];
    let (mut l, mut r) = (0, 0);

    for i in 1..len {
        if i < r {
            z[i] = (r - i).min(z[i - l]);
        }
        while i + z[i] < len && text.char_at(z[i])? == text.char_at(i + z[i])? {
            z[i] += 1;
        }
        if i + z[i] > r {
            l = i;
            r = i + z[i];
        }
    }

    Ok(z)
}

#[derive(Debug, Clone, Default)]
pub struct Finder {
    pattern: Rope,
    replacement: Rope,

    /// Start of each match, as a position and as a char offset. Both sorted.
    matches: Vec<Position>,
    match_indices: Vec<usize>,
}

impl Finder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pattern(pattern: &str) -> Self {
        Finder { pattern: Rope::new(pattern), ..Self::default() }
    }

    pub fn pattern(&self) -> &Rope { &self.pattern }
    pub fn replacement(&self) -> &Rope { &self.replacement }

    pub fn set_pattern(&mut self, pattern: Rope) { self.pattern = pattern; }
    pub fn set_replacement(&mut self, replacement: Rope) { self.replacement = replacement; }

    /// Type a char into the pattern prompt.
    pub fn push_pattern_char(&mut self, c: char) {
        let mut buf = [0; 4];
        self.pattern = self.pattern.append_str(c.encode_utf8(&mut buf));
    }

    /// Backspace in the pattern prompt. Does nothing if the pattern is empty.
    pub fn pop_pattern_char(&mut self) {
        let len = self.pattern.len_chars();
        if len > 0 {
            self.pattern = self.pattern.erase(len - 1, 1);
        }
    }

    pub fn matches(&self) -> &[Position] { &self.matches }
    pub fn match_indices(&self) -> &[usize] { &self.match_indices }

    pub fn clear(&mut self) {
        self.matches.clear();
        self.match_indices.clear();
    }

    /// Find every occurrence of the pattern in text (overlapping matches
    /// included). An empty pattern matches nothing.
    pub fn find_in(&mut self, text: &Rope) -> Result<&[Position], RopeError> {
        self.clear();

        let pattern_len = self.pattern.len_chars();
        if pattern_len == 0 { return Ok(&self.matches); }

        let z_text = self.pattern.append_str(SENTINEL).append(text);
        let z = z_array(&z_text)?;

        let mut pos = Position::default();
        for (i, c) in text.chars().enumerate() {
            if z[pattern_len + 1 + i] >= pattern_len {
                self.matches.push(pos);
                self.match_indices.push(i);
            }

            if c == '\n' {
                pos.line += 1;
                pos.column = 0;
            } else {
                pos.column += 1;
            }
        }

        log::debug!("finder: {} matches for a {} char pattern", self.matches.len(), pattern_len);
        Ok(&self.matches)
    }

    /// Replace every match in text with the replacement, returning the new
    /// rope. Overlapping matches are resolved left to right. Edits are applied
    /// from the end of the text backwards so earlier offsets stay valid.
    pub fn replace_in(&mut self, text: &Rope) -> Result<Rope, RopeError> {
        self.find_in(text)?;
        let pattern_len = self.pattern.len_chars();

        let mut chosen = Vec::with_capacity(self.match_indices.len());
        let mut next_free = 0;
        for &i in &self.match_indices {
            if i >= next_free {
                chosen.push(i);
                next_free = i + pattern_len;
            }
        }

        let result = chosen.iter().rev().fold(text.clone(), |rope, &i| {
            rope.erase(i, pattern_len).insert(i, &self.replacement)
        });

        log::debug!("finder: replaced {} matches", chosen.len());
        Ok(result)
    }

    /// The first match after current, wrapping around to the first match.
    pub fn next_match(&self, current: Position) -> Position {
        let idx = self.matches.partition_point(|m| *m <= current);
        self.matches.get(idx).or(self.matches.first()).copied().unwrap_or(current)
    }

    /// The last match before current, wrapping around to the last match.
    pub fn prev_match(&self, current: Position) -> Position {
        let idx = self.matches.partition_point(|m| *m < current);
        let found = if idx == 0 { self.matches.last() } else { self.matches.get(idx - 1) };
        found.copied().unwrap_or(current)
    }
}

#[cfg(test)]
mod test {
    use crate::{Finder, Position, Rope};
    use super::z_array;

    #[test]
    fn z_array_basic() {
        let z = z_array(&Rope::new("aabxaab")).unwrap();
        assert_eq!(z, vec![0, 1, 0, 0, 3, 1, 0]);
        assert!(z_array(&Rope::new("")).unwrap().is_empty());
    }

    #[test]
    fn finds_matches_with_positions() {
        let text = Rope::new("foo bar\nbar foo\nfoofoo");
        let mut f = Finder::with_pattern("foo");
        let matches = f.find_in(&text).unwrap().to_vec();
        assert_eq!(matches, vec![
            Position::new(0, 0),
            Position::new(1, 4),
            Position::new(2, 0),
            Position::new(2, 3),
        ]);
        assert_eq!(f.match_indices(), &[0, 12, 16, 19]);
    }

    #[test]
    fn overlapping_and_sentinel_in_text() {
        let mut f = Finder::with_pattern("aa");
        f.find_in(&Rope::new("aaaa")).unwrap();
        assert_eq!(f.match_indices(), &[0, 1, 2]);

        // The sentinel char showing up in the text doesn't hide matches.
        let mut f = Finder::with_pattern("a");
        f.find_in(&Rope::new("a\0a")).unwrap();
        assert_eq!(f.match_indices(), &[0, 2]);
    }

    #[test]
    fn empty_pattern_matches_nothing() {
        let mut f = Finder::new();
        assert!(f.find_in(&Rope::new("abc")).unwrap().is_empty());
        assert_eq!(f.replace_in(&Rope::new("abc")).unwrap(), "abc");
    }

    #[test]
    fn replace_all() {
        let mut f = Finder::with_pattern("cat");
        f.set_replacement(Rope::new("dog"));
        let text = Rope::chunked("the cat sat on the cat mat\ncat");
        let result = f.replace_in(&text).unwrap();
        assert_eq!(result, "the dog sat on the dog mat\ndog");
        result.check();
        // The input rope is untouched.
        assert_eq!(text, "the cat sat on the cat mat\ncat");
    }

    #[test]
    fn replace_with_different_length() {
        let mut f = Finder::with_pattern("ab");
        f.set_replacement(Rope::new(""));
        assert_eq!(f.replace_in(&Rope::new("xabyabz")).unwrap(), "xyz");

        f.set_replacement(Rope::new("<ab>"));
        assert_eq!(f.replace_in(&Rope::new("abab")).unwrap(), "<ab><ab>");
    }

    #[test]
    fn replace_overlapping_left_to_right() {
        let mut f = Finder::with_pattern("aa");
        f.set_replacement(Rope::new("b"));
        assert_eq!(f.replace_in(&Rope::new("aaa")).unwrap(), "ba");
    }

    #[test]
    fn unicode_pattern() {
        let mut f = Finder::with_pattern("かい");
        f.find_in(&Rope::new("せかい\nかい")).unwrap();
        assert_eq!(f.matches(), &[Position::new(0, 1), Position::new(1, 0)]);
    }

    #[test]
    fn next_and_prev_wrap() {
        let mut f = Finder::with_pattern("x");
        f.find_in(&Rope::new("x.x\n.x")).unwrap();
        let m = f.matches().to_vec();
        assert_eq!(m, vec![Position::new(0, 0), Position::new(0, 2), Position::new(1, 1)]);

        assert_eq!(f.next_match(Position::new(0, 0)), m[1]);
        assert_eq!(f.next_match(Position::new(0, 1)), m[1]);
        assert_eq!(f.next_match(Position::new(1, 1)), m[0]);
        assert_eq!(f.prev_match(Position::new(0, 2)), m[0]);
        assert_eq!(f.prev_match(Position::new(0, 0)), m[2]);
        assert_eq!(f.prev_match(Position::new(5, 0)), m[2]);

        let empty = Finder::new();
        assert_eq!(empty.next_match(Position::new(3, 3)), Position::new(3, 3));
        assert_eq!(empty.prev_match(Position::new(3, 3)), Position::new(3, 3));
    }

    #[test]
    fn pattern_editing() {
        let mut f = Finder::new();
        f.push_pattern_char('a');
        f.push_pattern_char('せ');
        assert_eq!(f.pattern(), &Rope::new("aせ"));
        f.pop_pattern_char();
        f.pop_pattern_char();
        f.pop_pattern_char();
        assert!(f.pattern().is_empty());
    }
}
