/// Maximum length in bytes of any editable text field.
pub const MAX_INPUT_LEN: usize = 256;

/// A single-line editable text value with a byte-offset cursor.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    cursor: usize,
}

impl TextInput {
    pub fn new(value: &str) -> Self {
        let mut input = Self::default();
        input.set(value);
        input
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Replace the whole value, truncated to [`MAX_INPUT_LEN`] on a char
    /// boundary, and put the cursor at the end.
    pub fn set(&mut self, value: &str) {
        let mut end = value.len().min(MAX_INPUT_LEN);
        while !value.is_char_boundary(end) {
            end -= 1;
        }
        self.value = value[..end].to_string();
        self.cursor = self.value.len();
    }

    /// Insert a character at the cursor. Returns `false` when the value is
    /// full and the character was rejected.
    pub fn insert(&mut self, c: char) -> bool {
        if self.value.len() + c.len_utf8() > MAX_INPUT_LEN {
            return false;
        }
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
        true
    }

    /// Delete the character before the cursor (backspace).
    pub fn delete_before(&mut self) {
        if let Some(prev) = self.value[..self.cursor].chars().next_back() {
            self.cursor -= prev.len_utf8();
            self.value.remove(self.cursor);
        }
    }

    /// Delete the character under the cursor.
    pub fn delete_at(&mut self) {
        if self.cursor < self.value.len() {
            self.value.remove(self.cursor);
        }
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = self.value[..self.cursor].chars().next_back() {
            self.cursor -= prev.len_utf8();
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = self.value[self.cursor..].chars().next() {
            self.cursor += next.len_utf8();
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.value.len();
    }
}
