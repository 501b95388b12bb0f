/// Single-line text input with commit-and-clear semantics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputLine {
    buffer: String,
}

impl InputLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, c: char) {
        self.buffer.push(c);
    }

    pub fn backspace(&mut self) {
        self.buffer.pop();
    }

    /// Take the current text, leaving the line empty
    pub fn commit(&mut self) -> String {
        std::mem::take(&mut self.buffer)
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Width in characters, used to place the terminal cursor
    pub fn char_len(&self) -> usize {
        self.buffer.chars().count()
    }
}
