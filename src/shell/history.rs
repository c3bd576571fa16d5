/// Lines entered in this session, oldest first, with an Up/Down cursor.
///
/// The cursor is `None` while the user is on the draft line (past the
/// newest entry). This is independent of undo/redo.
#[derive(Debug, Clone, Default)]
pub struct CommandHistory {
    entries: Vec<String>,
    cursor: Option<usize>,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `line` and put the cursor back on the draft.
    pub fn push(&mut self, line: &str) {
        self.entries.push(line.to_string());
        self.cursor = None;
    }

    /// Step to the next older entry. Stays on the oldest once reached.
    pub fn previous(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        let idx = match self.cursor {
            None => self.entries.len() - 1,
            Some(idx) => idx.saturating_sub(1),
        };
        self.cursor = Some(idx);
        Some(&self.entries[idx])
    }

    /// Step to the next newer entry. Past the newest, returns to the
    /// draft and yields `None`.
    pub fn next(&mut self) -> Option<&str> {
        match self.cursor {
            Some(idx) if idx + 1 < self.entries.len() => {
                self.cursor = Some(idx + 1);
                Some(&self.entries[idx + 1])
            }
            _ => {
                self.cursor = None;
                None
            }
        }
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
