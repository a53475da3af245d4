//! # GeoPost Input
//!
//! Enforces the character budget of a message while it is being composed.
//!
//! * [`BoundedTextInput`] is the policy: pure functions that decide how much
//!   of an insert or paste is admitted, trim over-long text and finalize a
//!   submission. It holds no text.
//! * [`InputBuffer`] is the composition buffer a front-end edits. It tracks
//!   content, cursor and selection (all in characters) and routes every
//!   content-adding operation through the policy.
//!
//! Rejections are values ([`Admission::Reject`] plus a [`Cue`]), never
//! errors. Front-ends decide how to render the cue.
//!
//! ```rust
//! use geopost_input::{Admission, BoundedTextInput};
//!
//! let input = BoundedTextInput::default();
//! let full = "x".repeat(50);
//!
//! // Typing past the budget is blocked outright...
//! assert_eq!(input.evaluate_insert(&full, 0, "y"), Admission::Reject);
//! // ...while a paste is cut down to what still fits.
//! let pasted = input.evaluate_paste("", 0, &"z".repeat(70));
//! assert_eq!(pasted.admitted_text().map(|t| t.chars().count()), Some(50));
//! ```

pub mod admission;
pub mod bounded;
pub mod buffer;
pub mod error;

pub use admission::{Admission, Cue, Enforced};
pub use bounded::BoundedTextInput;
pub use buffer::{EditAction, EditOutcome, InputBuffer};
pub use error::InputError;
pub use geopost_models::DEFAULT_MAX_CHARS;

/// Number of characters (Unicode scalar values) in `s`.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// The first `n` characters of `s`, borrowed.
pub fn char_prefix(s: &str, n: usize) -> &str {
    &s[..byte_offset(s, n)]
}

/// Byte offset of the character at index `char_idx`, or `s.len()` past the end.
pub(crate) fn byte_offset(s: &str, char_idx: usize) -> usize {
    s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}
