/// Single-line text input with cursor support.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    text: String,
    /// Cursor position (byte index, always on a char boundary)
    cursor: usize,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Insert a character at the cursor
    pub fn insert(&mut self, ch: char) {
        self.text.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    /// Delete the character before the cursor (backspace)
    pub fn backspace(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.text.remove(prev);
            self.cursor = prev;
        }
    }

    /// Delete the character at the cursor (delete key)
    pub fn delete(&mut self) {
        if self.cursor < self.text.len() {
            self.text.remove(self.cursor);
        }
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.cursor = prev;
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.text.len() {
            let step = self.text[self.cursor..]
                .chars()
                .next()
                .map(char::len_utf8)
                .unwrap_or(0);
            self.cursor += step;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.len();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Drain the current text, leaving the input empty.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }

    /// Cursor position in characters (for display)
    pub fn cursor_char_pos(&self) -> usize {
        self.text[..self.cursor].chars().count()
    }

    fn prev_boundary(&self) -> Option<usize> {
        if self.cursor == 0 {
            return None;
        }
        self.text[..self.cursor].char_indices().last().map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_cycle() {
        let mut input = TextInput::new();
        for ch in "repo".chars() {
            input.insert(ch);
        }
        assert_eq!(input.text(), "repo");

        input.backspace();
        assert_eq!(input.text(), "rep");

        input.move_left();
        input.insert('a');
        assert_eq!(input.text(), "reap");

        input.move_home();
        input.delete();
        assert_eq!(input.text(), "eap");

        assert_eq!(input.take(), "eap");
        assert!(input.is_empty());
        assert_eq!(input.cursor_char_pos(), 0);
    }

    #[test]
    fn test_unicode_boundaries() {
        let mut input = TextInput::new();
        input.insert('日');
        input.insert('本');
        assert_eq!(input.cursor_char_pos(), 2);

        input.move_left();
        input.insert('語');
        assert_eq!(input.text(), "日語本");

        input.move_end();
        input.backspace();
        assert_eq!(input.text(), "日語");
    }
}
