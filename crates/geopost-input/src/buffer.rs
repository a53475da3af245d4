//! Composition buffer with cursor and selection.
//!
//! [`InputBuffer`] applies the decisions of a [`BoundedTextInput`] to an
//! owned string. Content-adding operations (typing, pasting, pre-filling) go
//! through the budget; navigation and deletion never do.
//!
//! Positions are character indices. The selection runs between an anchor
//! and the cursor and is replaced by the next insert or paste.

use std::ops::Range;

use crate::admission::{Admission, Cue};
use crate::bounded::BoundedTextInput;
use crate::{byte_offset, char_len};

/// Every operation a front-end can forward to the buffer.
#[derive(Debug, Clone, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum EditAction {
    /// A single typed character.
    InsertChar(char),
    /// Several characters typed as one keystroke (IME commit, compose key).
    InsertStr(String),
    /// Clipboard contents.
    Paste(String),
    /// Delete the selection, or the character before the cursor.
    Backspace,
    /// Delete the selection, or the character under the cursor.
    Delete,
    /// Cursor one character left.
    MoveLeft,
    /// Cursor one character right.
    MoveRight,
    /// Cursor to the start.
    MoveHome,
    /// Cursor to the end.
    MoveEnd,
    /// Extend the selection one character left.
    SelectLeft,
    /// Extend the selection one character right.
    SelectRight,
    /// Select everything.
    SelectAll,
    /// Return: enforce the budget and hand over the trimmed text.
    Submit,
    /// Drop all content.
    Clear,
}

impl EditAction {
    /// Whether the action can add characters and is therefore checked
    /// against the budget.
    pub fn adds_content(&self) -> bool {
        matches!(self, Self::InsertChar(_) | Self::InsertStr(_) | Self::Paste(_))
    }
}

/// What an operation did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditOutcome {
    /// The text changed.
    pub changed: bool,
    /// Feedback to give the user, if any.
    pub cue: Option<Cue>,
    /// Text handed over by [`EditAction::Submit`].
    pub submitted: Option<String>,
}

impl EditOutcome {
    fn unchanged() -> Self {
        Self::default()
    }

    fn changed(changed: bool) -> Self {
        Self {
            changed,
            ..Self::default()
        }
    }

    fn rejected() -> Self {
        Self {
            cue: Some(Cue::Bell),
            ..Self::default()
        }
    }
}

/// The text being composed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputBuffer {
    policy: BoundedTextInput,
    text: String,
    cursor: usize,
    anchor: Option<usize>,
}

impl Default for InputBuffer {
    fn default() -> Self {
        Self::new(BoundedTextInput::default())
    }
}

impl InputBuffer {
    /// An empty buffer governed by `policy`.
    pub fn new(policy: BoundedTextInput) -> Self {
        Self {
            policy,
            text: String::new(),
            cursor: 0,
            anchor: None,
        }
    }

    /// The budget in force.
    pub fn policy(&self) -> &BoundedTextInput {
        &self.policy
    }

    /// Current content.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Content length in characters.
    pub fn char_len(&self) -> usize {
        char_len(&self.text)
    }

    /// Whether the buffer holds no text.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Selected character range, if non-empty.
    pub fn selection(&self) -> Option<Range<usize>> {
        let anchor = self.anchor?;
        match anchor.cmp(&self.cursor) {
            std::cmp::Ordering::Less => Some(anchor..self.cursor),
            std::cmp::Ordering::Greater => Some(self.cursor..anchor),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Number of selected characters.
    pub fn selection_len(&self) -> usize {
        self.selection().map_or(0, |r| r.len())
    }

    /// The selected text, if any.
    pub fn selected_text(&self) -> Option<&str> {
        let range = self.selection()?;
        Some(&self.text[self.byte_range(range)])
    }

    /// Characters left in the budget.
    pub fn remaining(&self) -> usize {
        self.policy.remaining_count(&self.text)
    }

    /// Counter text, `"{remaining}/{max}"`.
    pub fn counter_label(&self) -> String {
        self.policy.counter_label(&self.text)
    }

    fn byte_range(&self, range: Range<usize>) -> Range<usize> {
        byte_offset(&self.text, range.start)..byte_offset(&self.text, range.end)
    }

    /// Range an insertion replaces: the selection, or an empty range at the
    /// cursor.
    fn target(&self) -> Range<usize> {
        self.selection().unwrap_or(self.cursor..self.cursor)
    }

    fn replace(&mut self, range: Range<usize>, with: &str) {
        let bytes = self.byte_range(range.clone());
        self.text.replace_range(bytes, with);
        self.cursor = range.start + char_len(with);
        self.anchor = None;
    }

    fn apply_admission(&mut self, admission: Admission) -> EditOutcome {
        match admission {
            Admission::Admit(text) => {
                let range = self.target();
                let changed = !text.is_empty() || !range.is_empty();
                self.replace(range, &text);
                EditOutcome::changed(changed)
            }
            Admission::Reject => EditOutcome::rejected(),
        }
    }

    // ── Content-adding operations ────────────────────────────────────

    /// Type one character.
    pub fn insert_char(&mut self, c: char) -> EditOutcome {
        let mut tmp = [0u8; 4];
        self.insert_str(c.encode_utf8(&mut tmp))
    }

    /// Type several characters as one keystroke. All or nothing.
    pub fn insert_str(&mut self, s: &str) -> EditOutcome {
        let admission = self.policy.evaluate_insert(&self.text, self.selection_len(), s);
        self.apply_admission(admission)
    }

    /// Paste clipboard text, keeping the prefix that fits.
    pub fn paste(&mut self, clipboard: &str) -> EditOutcome {
        let admission = self.policy.evaluate_paste(&self.text, self.selection_len(), clipboard);
        self.apply_admission(admission)
    }

    /// Replace the whole content programmatically (pre-fill), then cut it
    /// back to the budget.
    pub fn set_text(&mut self, text: &str) -> EditOutcome {
        let enforced = self.policy.enforce_limit(text);
        let changed = enforced.text != self.text;
        let cue = enforced.cue();
        self.text = enforced.text;
        self.cursor = self.char_len();
        self.anchor = None;
        EditOutcome {
            changed,
            cue,
            submitted: None,
        }
    }

    // ── Deletion ─────────────────────────────────────────────────────

    /// Delete the selection or the character before the cursor.
    pub fn backspace(&mut self) -> EditOutcome {
        if let Some(range) = self.selection() {
            self.replace(range, "");
            return EditOutcome::changed(true);
        }
        self.anchor = None;
        if self.cursor == 0 {
            return EditOutcome::unchanged();
        }
        self.replace(self.cursor - 1..self.cursor, "");
        EditOutcome::changed(true)
    }

    /// Delete the selection or the character under the cursor.
    pub fn delete(&mut self) -> EditOutcome {
        if let Some(range) = self.selection() {
            self.replace(range, "");
            return EditOutcome::changed(true);
        }
        self.anchor = None;
        if self.cursor >= self.char_len() {
            return EditOutcome::unchanged();
        }
        self.replace(self.cursor..self.cursor + 1, "");
        EditOutcome::changed(true)
    }

    /// Drop all content.
    pub fn clear(&mut self) -> EditOutcome {
        let changed = !self.text.is_empty();
        self.text.clear();
        self.cursor = 0;
        self.anchor = None;
        EditOutcome::changed(changed)
    }

    // ── Navigation ───────────────────────────────────────────────────

    /// Move left; with a selection, collapse to its start.
    pub fn move_left(&mut self) -> EditOutcome {
        self.cursor = match self.selection() {
            Some(range) => range.start,
            None => self.cursor.saturating_sub(1),
        };
        self.anchor = None;
        EditOutcome::unchanged()
    }

    /// Move right; with a selection, collapse to its end.
    pub fn move_right(&mut self) -> EditOutcome {
        self.cursor = match self.selection() {
            Some(range) => range.end,
            None => (self.cursor + 1).min(self.char_len()),
        };
        self.anchor = None;
        EditOutcome::unchanged()
    }

    /// Move to the start.
    pub fn move_home(&mut self) -> EditOutcome {
        self.cursor = 0;
        self.anchor = None;
        EditOutcome::unchanged()
    }

    /// Move to the end.
    pub fn move_end(&mut self) -> EditOutcome {
        self.cursor = self.char_len();
        self.anchor = None;
        EditOutcome::unchanged()
    }

    /// Extend the selection one character left.
    pub fn select_left(&mut self) -> EditOutcome {
        self.anchor.get_or_insert(self.cursor);
        self.cursor = self.cursor.saturating_sub(1);
        EditOutcome::unchanged()
    }

    /// Extend the selection one character right.
    pub fn select_right(&mut self) -> EditOutcome {
        self.anchor.get_or_insert(self.cursor);
        self.cursor = (self.cursor + 1).min(self.char_len());
        EditOutcome::unchanged()
    }

    /// Select all content.
    pub fn select_all(&mut self) -> EditOutcome {
        self.anchor = Some(0);
        self.cursor = self.char_len();
        EditOutcome::unchanged()
    }

    // ── Submission ───────────────────────────────────────────────────

    /// Return key: enforce the budget, then trim. On success the buffer is
    /// emptied and the text returned in [`EditOutcome::submitted`]. A
    /// whitespace-only buffer stays as it is and nothing is submitted. No
    /// newline is ever inserted.
    pub fn submit(&mut self) -> EditOutcome {
        let (enforced, submission) = self.policy.finalize(&self.text);
        let cue = enforced.cue();
        let mut changed = false;
        if enforced.was_trimmed {
            self.text = enforced.text;
            self.cursor = self.cursor.min(self.char_len());
            self.anchor = None;
            changed = true;
        }
        if let Some(text) = &submission {
            tracing::debug!(chars = char_len(text), "input submitted");
            self.clear();
            changed = true;
        }
        EditOutcome {
            changed,
            cue,
            submitted: submission,
        }
    }

    /// Dispatch an [`EditAction`].
    pub fn apply(&mut self, action: EditAction) -> EditOutcome {
        tracing::trace!(%action, "edit");
        match action {
            EditAction::InsertChar(c) => self.insert_char(c),
            EditAction::InsertStr(s) => self.insert_str(&s),
            EditAction::Paste(s) => self.paste(&s),
            EditAction::Backspace => self.backspace(),
            EditAction::Delete => self.delete(),
            EditAction::MoveLeft => self.move_left(),
            EditAction::MoveRight => self.move_right(),
            EditAction::MoveHome => self.move_home(),
            EditAction::MoveEnd => self.move_end(),
            EditAction::SelectLeft => self.select_left(),
            EditAction::SelectRight => self.select_right(),
            EditAction::SelectAll => self.select_all(),
            EditAction::Submit => self.submit(),
            EditAction::Clear => self.clear(),
        }
    }
}
