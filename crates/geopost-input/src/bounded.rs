//! The character-budget policy.
//!
//! Every function takes the current text as an argument and returns a
//! decision; nothing is stored besides the budget itself. Lengths are
//! counted in characters.

use geopost_models::DEFAULT_MAX_CHARS;

use crate::admission::{Admission, Enforced};
use crate::error::InputError;
use crate::{char_len, char_prefix};

/// A fixed maximum-length budget for composed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundedTextInput {
    max_chars: usize,
}

impl Default for BoundedTextInput {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
        }
    }
}

impl BoundedTextInput {
    /// Create a budget of `max_chars` characters.
    pub fn new(max_chars: usize) -> Result<Self, InputError> {
        if max_chars == 0 {
            return Err(InputError::ZeroBudget);
        }
        Ok(Self { max_chars })
    }

    /// The configured ceiling.
    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Characters that survive once the selection is replaced.
    fn kept_len(current_text: &str, selection_len: usize) -> usize {
        let len = char_len(current_text);
        len - selection_len.min(len)
    }

    /// Typing path: admit `incoming` unchanged if the result fits, otherwise
    /// reject the whole keystroke.
    pub fn evaluate_insert(&self, current_text: &str, selection_len: usize, incoming: &str) -> Admission {
        let prospective = Self::kept_len(current_text, selection_len) + char_len(incoming);
        if prospective <= self.max_chars {
            Admission::Admit(incoming.to_string())
        } else {
            tracing::debug!(prospective, max = self.max_chars, "insert rejected");
            Admission::Reject
        }
    }

    /// Paste path: admit the longest prefix of `clipboard` that fits. Only a
    /// paste with no room at all is rejected.
    pub fn evaluate_paste(&self, current_text: &str, selection_len: usize, clipboard: &str) -> Admission {
        let kept = Self::kept_len(current_text, selection_len);
        if kept >= self.max_chars {
            tracing::debug!(kept, max = self.max_chars, "paste rejected, no room left");
            return Admission::Reject;
        }
        let allowed = self.max_chars - kept;
        let admitted = char_prefix(clipboard, allowed);
        if admitted.len() < clipboard.len() {
            tracing::debug!(allowed, dropped = char_len(clipboard) - allowed, "paste truncated");
        }
        Admission::Admit(admitted.to_string())
    }

    /// Cut `current_text` back to the first `max_chars` characters.
    pub fn enforce_limit(&self, current_text: &str) -> Enforced {
        if char_len(current_text) > self.max_chars {
            tracing::debug!(max = self.max_chars, "text trimmed to budget");
            Enforced {
                text: char_prefix(current_text, self.max_chars).to_string(),
                was_trimmed: true,
            }
        } else {
            Enforced {
                text: current_text.to_string(),
                was_trimmed: false,
            }
        }
    }

    /// Characters still available, never negative.
    pub fn remaining_count(&self, current_text: &str) -> usize {
        self.max_chars.saturating_sub(char_len(current_text))
    }

    /// Live counter text, `"{remaining}/{max}"`.
    pub fn counter_label(&self, current_text: &str) -> String {
        format!("{}/{}", self.remaining_count(current_text), self.max_chars)
    }

    /// Trim surrounding whitespace. `None` means there is nothing to post.
    pub fn submit(&self, current_text: &str) -> Option<String> {
        let trimmed = current_text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// What Return does: [`enforce_limit`](Self::enforce_limit), then
    /// [`submit`](Self::submit) on the result. Returns the enforced text
    /// alongside the submission so the caller can update its buffer.
    pub fn finalize(&self, current_text: &str) -> (Enforced, Option<String>) {
        let enforced = self.enforce_limit(current_text);
        let submission = self.submit(&enforced.text);
        (enforced, submission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admission::Cue;
    use proptest::prelude::*;

    fn input() -> BoundedTextInput {
        BoundedTextInput::default()
    }

    #[test]
    fn zero_budget_rejected() {
        assert_eq!(BoundedTextInput::new(0), Err(InputError::ZeroBudget));
        assert_eq!(BoundedTextInput::new(1).unwrap().max_chars(), 1);
    }

    #[test]
    fn default_budget_matches_message_factory() {
        use geopost_models::{LocalClock, MessageFactory, ScriptedCoordinates};

        let factory = MessageFactory::new(LocalClock, ScriptedCoordinates::new(Vec::new()));
        assert_eq!(input().max_chars(), factory.budget());
    }

    #[test]
    fn default_budget_is_fifty() {
        assert_eq!(input().max_chars(), 50);
    }

    #[test]
    fn typing_fifty_first_char_is_rejected() {
        let full = "a".repeat(50);
        let adm = input().evaluate_insert(&full, 0, "b");
        assert_eq!(adm, Admission::Reject);
        assert_eq!(adm.cue(), Some(Cue::Bell));
    }

    #[test]
    fn typing_fiftieth_char_is_admitted() {
        let almost = "a".repeat(49);
        assert_eq!(
            input().evaluate_insert(&almost, 0, "b"),
            Admission::Admit("b".into())
        );
    }

    #[test]
    fn insert_replacing_selection_at_limit() {
        let full = "a".repeat(50);
        // Replacing one selected char with one new char keeps 50.
        assert!(input().evaluate_insert(&full, 1, "b").is_admitted());
        // Replacing one with two would reach 51.
        assert_eq!(input().evaluate_insert(&full, 1, "bc"), Admission::Reject);
    }

    #[test]
    fn insert_is_all_or_nothing() {
        let text = "a".repeat(48);
        assert_eq!(input().evaluate_insert(&text, 0, "xyz"), Admission::Reject);
    }

    #[test]
    fn paste_seventy_into_empty_keeps_first_fifty() {
        let clip: String = ('a'..='z').cycle().take(70).collect();
        let adm = input().evaluate_paste("", 0, &clip);
        assert_eq!(adm, Admission::Admit(clip[..50].to_string()));
        assert_eq!(adm.cue(), None);
    }

    #[test]
    fn paste_into_full_buffer_is_rejected() {
        let full = "a".repeat(50);
        let adm = input().evaluate_paste(&full, 0, "more");
        assert_eq!(adm, Admission::Reject);
        assert_eq!(adm.cue(), Some(Cue::Bell));
    }

    #[test]
    fn paste_into_full_buffer_over_selection_fits() {
        let full = "a".repeat(50);
        assert_eq!(
            input().evaluate_paste(&full, 3, "wxyz"),
            Admission::Admit("wxy".into())
        );
    }

    #[test]
    fn paste_into_overlong_text_is_rejected() {
        let over = "a".repeat(60);
        assert_eq!(input().evaluate_paste(&over, 5, "x"), Admission::Reject);
    }

    #[test]
    fn paste_versus_type_asymmetry() {
        // Same state, same incoming text: typing blocks everything, pasting
        // admits the prefix that fits.
        let text = "a".repeat(48);
        assert_eq!(input().evaluate_insert(&text, 0, "xyz"), Admission::Reject);
        assert_eq!(
            input().evaluate_paste(&text, 0, "xyz"),
            Admission::Admit("xy".into())
        );
    }

    #[test]
    fn paste_counts_characters_not_bytes() {
        let b = BoundedTextInput::new(3).unwrap();
        assert_eq!(
            b.evaluate_paste("", 0, "é✓🙂x"),
            Admission::Admit("é✓🙂".into())
        );
    }

    #[test]
    fn oversized_selection_is_clamped() {
        let b = BoundedTextInput::new(5).unwrap();
        assert!(b.evaluate_insert("abc", 99, "12345").is_admitted());
        assert_eq!(b.evaluate_insert("abc", 99, "123456"), Admission::Reject);
    }

    #[test]
    fn enforce_limit_trims_tail() {
        let text: String = "0123456789".repeat(6);
        let enforced = input().enforce_limit(&text);
        assert!(enforced.was_trimmed);
        assert_eq!(enforced.text, text[..50]);
        assert_eq!(enforced.cue(), Some(Cue::Bell));
    }

    #[test]
    fn enforce_limit_leaves_short_text() {
        let enforced = input().enforce_limit("This is a test message that is under the limit");
        assert!(!enforced.was_trimmed);
        assert_eq!(enforced.text, "This is a test message that is under the limit");
        assert_eq!(enforced.cue(), None);
    }

    #[test]
    fn remaining_and_counter() {
        assert_eq!(input().remaining_count(""), 50);
        assert_eq!(input().counter_label(""), "50/50");
        assert_eq!(input().counter_label("hello"), "45/50");
        assert_eq!(input().remaining_count(&"a".repeat(80)), 0);
        assert_eq!(input().counter_label(&"a".repeat(80)), "0/50");
    }

    #[test]
    fn submit_whitespace_only_is_suppressed() {
        assert_eq!(input().submit("   "), None);
        assert_eq!(input().submit("\n\t "), None);
        assert_eq!(input().submit(""), None);
    }

    #[test]
    fn submit_trims() {
        assert_eq!(input().submit("  Hello  "), Some("Hello".into()));
        assert_eq!(input().submit("a b"), Some("a b".into()));
    }

    #[test]
    fn finalize_enforces_before_submitting() {
        let b = BoundedTextInput::new(5).unwrap();
        let (enforced, submission) = b.finalize("abcdefgh");
        assert!(enforced.was_trimmed);
        assert_eq!(submission, Some("abcde".into()));

        // Trimming happens before whitespace is stripped.
        let (enforced, submission) = b.finalize("   abcdef");
        assert_eq!(enforced.text, "   ab");
        assert_eq!(submission, Some("ab".into()));
    }

    fn text_and_selection() -> impl Strategy<Value = (String, usize)> {
        ".{0,70}".prop_flat_map(|text| {
            let len = text.chars().count();
            (Just(text), 0..=len)
        })
    }

    proptest! {
        #[test]
        fn insert_admits_iff_fits(
            (text, sel) in text_and_selection(),
            incoming in ".{0,10}",
            max in 1usize..80,
        ) {
            let b = BoundedTextInput::new(max).unwrap();
            let fits = char_len(&text) - sel + char_len(&incoming) <= max;
            let adm = b.evaluate_insert(&text, sel, &incoming);
            prop_assert_eq!(adm.is_admitted(), fits);
            if fits {
                prop_assert_eq!(adm, Admission::Admit(incoming.clone()));
            }
        }

        #[test]
        fn paste_admits_exact_prefix(
            (text, sel) in text_and_selection(),
            clip in ".{0,90}",
            max in 1usize..80,
        ) {
            let b = BoundedTextInput::new(max).unwrap();
            let kept = char_len(&text) - sel;
            let adm = b.evaluate_paste(&text, sel, &clip);
            if kept < max {
                let allowed = max - kept;
                let expected: String = clip.chars().take(allowed).collect();
                prop_assert_eq!(adm, Admission::Admit(expected));
            } else {
                prop_assert_eq!(adm, Admission::Reject);
            }
        }

        #[test]
        fn enforce_limit_is_idempotent(text in ".{0,120}", max in 1usize..80) {
            let b = BoundedTextInput::new(max).unwrap();
            let once = b.enforce_limit(&text);
            let twice = b.enforce_limit(&once.text);
            prop_assert_eq!(&once.text, &twice.text);
            prop_assert!(!twice.was_trimmed);
            prop_assert!(char_len(&once.text) <= max);
            prop_assert!(text.starts_with(once.text.as_str()));
        }

        #[test]
        fn remaining_complements_length(text in ".{0,120}", max in 1usize..80) {
            let b = BoundedTextInput::new(max).unwrap();
            let len = char_len(&text);
            if len <= max {
                prop_assert_eq!(b.remaining_count(&text) + len, max);
            } else {
                prop_assert_eq!(b.remaining_count(&text), 0);
            }
        }
    }
}
