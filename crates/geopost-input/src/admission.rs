//! Results of evaluating an edit against the budget.

/// Feedback a front-end should give the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Cue {
    /// Audible or visual "no" (terminal bell, flash).
    Bell,
}

/// Outcome of an insert or paste evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Insert exactly this text in place of the selection.
    Admit(String),
    /// Leave the buffer untouched.
    Reject,
}

impl Admission {
    /// Whether any insertion should happen.
    pub fn is_admitted(&self) -> bool {
        matches!(self, Self::Admit(_))
    }

    /// The text to insert, if admitted.
    pub fn admitted_text(&self) -> Option<&str> {
        match self {
            Self::Admit(text) => Some(text),
            Self::Reject => None,
        }
    }

    /// Consume and return the text to insert, if admitted.
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Admit(text) => Some(text),
            Self::Reject => None,
        }
    }

    /// Cue to emit. Only a full rejection is signalled; a truncated paste is
    /// silent.
    pub fn cue(&self) -> Option<Cue> {
        match self {
            Self::Admit(_) => None,
            Self::Reject => Some(Cue::Bell),
        }
    }
}

/// Result of [`BoundedTextInput::enforce_limit`](crate::BoundedTextInput::enforce_limit).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enforced {
    /// The text, cut to the budget if needed.
    pub text: String,
    /// Whether characters were dropped from the tail.
    pub was_trimmed: bool,
}

impl Enforced {
    /// [`Cue::Bell`] when trimming happened.
    pub fn cue(&self) -> Option<Cue> {
        self.was_trimmed.then_some(Cue::Bell)
    }
}
