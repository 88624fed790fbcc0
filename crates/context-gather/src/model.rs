/// Text-model contract the gatherer reads from (spec §6). Lines are
/// 1-indexed, matching editor convention.
pub trait TextModel {
    fn get_text(&self) -> &str;
    fn get_line_content(&self, line: usize) -> Option<&str>;
    fn get_line_count(&self) -> usize;
    fn get_language_id(&self) -> &str;
}

/// A simple in-memory [`TextModel`], useful for tests and for callers that
/// already have the whole file in a `String`.
pub struct StringModel {
    lines: Vec<String>,
    language_id: String,
    text: String,
}

impl StringModel {
    pub fn new(text: impl Into<String>, language_id: impl Into<String>) -> Self {
        let text = text.into();
        let lines = text.split('\n').map(str::to_string).collect();
        Self { lines, language_id: language_id.into(), text }
    }
}

impl TextModel for StringModel {
    fn get_text(&self) -> &str {
        &self.text
    }

    fn get_line_content(&self, line: usize) -> Option<&str> {
        line.checked_sub(1).and_then(|idx| self.lines.get(idx)).map(String::as_str)
    }

    fn get_line_count(&self) -> usize {
        self.lines.len()
    }

    fn get_language_id(&self) -> &str {
        &self.language_id
    }
}
