use wasm_bindgen::prelude::*;
use fibrope::{History, Position, Rope as FibRope, Snapshot};

/// An editable buffer for javascript. Every edit is recorded so it can be undone.
#[wasm_bindgen]
pub struct Rope {
    text: FibRope,
    history: History,
}

#[wasm_bindgen]
impl Rope {
    /// Create a new rope, optionally with initial content.
    #[wasm_bindgen(constructor)]
    pub fn new(s: Option<String>) -> Self {
        // Can't use Option<&str> in wasm-bindgen. The passed string is heap
        // allocated anyway.
        let text = s.map_or_else(FibRope::default, |s| FibRope::chunked(&s));
        Self { text, history: History::new() }
    }

    #[wasm_bindgen]
    pub fn from(s: String) -> Self {
        Self::new(Some(s))
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.text.clone(), Position::default(), true)
    }

    /// Insert new content at the specified position.
    #[wasm_bindgen]
    pub fn insert(&mut self, pos: usize, content: &str) {
        self.history.save(self.snapshot());
        self.text = self.text.insert_str(pos, content);
    }

    /// Remove (splice out) rope content of length del_len at the specified position.
    #[wasm_bindgen]
    pub fn remove(&mut self, pos: usize, del_len: usize) {
        self.history.save(self.snapshot());
        self.text = self.text.erase(pos, del_len);
    }

    /// Returns false if there was nothing to undo.
    #[wasm_bindgen]
    pub fn undo(&mut self) -> bool {
        match self.history.undo(self.snapshot()) {
            Some(prev) => { self.text = prev.rope; true }
            None => false,
        }
    }

    #[wasm_bindgen]
    pub fn redo(&mut self) -> bool {
        match self.history.redo(self.snapshot()) {
            Some(next) => { self.text = next.rope; true }
            None => false,
        }
    }

    #[wasm_bindgen(js_name=lineCount)]
    pub fn line_count(&self) -> usize {
        self.text.line_count()
    }

    #[wasm_bindgen(js_name=toString)]
    pub fn as_string(&self) -> String {
        self.text.to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn length(&self) -> usize {
        self.text.len_chars()
    }
}
