// Compose line - the single-line input the user types messages into
//
// Holds the draft text and a cursor. Editing is char-boundary-safe;
// the displayed cursor column accounts for wide glyphs. Submission takes
// the whole value out, untrimmed, and leaves the input empty.

use unicode_width::UnicodeWidthStr;

/// Single-line edit buffer with a byte-indexed cursor.
#[derive(Debug, Default)]
pub struct Compose {
    value: String,
    /// Byte index of the cursor, always on a char boundary
    cursor: usize,
}

impl Compose {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current draft, untrimmed.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Take the draft out for submission, clearing the input. The clear is
    /// unconditional; it does not depend on what happens to the returned
    /// text afterwards.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.value)
    }

    pub fn insert(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Remove the char before the cursor, if any.
    pub fn backspace(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.value.remove(prev);
            self.cursor = prev;
        }
    }

    /// Remove the char under the cursor, if any.
    pub fn delete(&mut self) {
        if self.cursor < self.value.len() {
            self.value.remove(self.cursor);
        }
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.cursor = prev;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(c) = self.value[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.value.len();
    }

    /// Display column of the cursor, in terminal cells.
    pub fn cursor_column(&self) -> u16 {
        self.value[..self.cursor].width() as u16
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.value[..self.cursor]
            .char_indices()
            .last()
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> Compose {
        let mut compose = Compose::new();
        for c in text.chars() {
            compose.insert(c);
        }
        compose
    }

    #[test]
    fn typing_builds_the_value_at_the_cursor() {
        let mut compose = typed("helo");
        compose.move_left();
        compose.insert('l');
        assert_eq!(compose.value(), "hello");
    }

    #[test]
    fn take_returns_the_untrimmed_value_and_clears() {
        let mut compose = typed("  hello  ");

        assert_eq!(compose.take(), "  hello  ");
        assert_eq!(compose.value(), "");
        assert_eq!(compose.cursor_column(), 0);
    }

    #[test]
    fn take_on_empty_input_returns_empty() {
        let mut compose = Compose::new();
        assert_eq!(compose.take(), "");
    }

    #[test]
    fn backspace_and_delete_respect_char_boundaries() {
        let mut compose = typed("héllo");
        compose.move_home();
        compose.move_right();
        compose.move_right();

        compose.backspace();
        assert_eq!(compose.value(), "hllo");

        compose.delete();
        assert_eq!(compose.value(), "hlo");
    }

    #[test]
    fn backspace_at_start_is_a_no_op() {
        let mut compose = typed("hi");
        compose.move_home();
        compose.backspace();
        assert_eq!(compose.value(), "hi");
    }

    #[test]
    fn cursor_column_counts_display_cells_not_bytes() {
        let compose = typed("日本");
        // Two double-width glyphs occupy four cells
        assert_eq!(compose.cursor_column(), 4);
    }

    #[test]
    fn home_and_end_jump_the_cursor() {
        let mut compose = typed("hello");
        compose.move_home();
        compose.insert('>');
        compose.move_end();
        compose.insert('!');
        assert_eq!(compose.value(), ">hello!");
    }
}
