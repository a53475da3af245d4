//! Error types for the `geopost-models` crate.
//!
//! All fallible constructors in this crate return variants of [`ModelError`].

/// Errors produced when constructing or validating model types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// The message text was empty once surrounding whitespace was removed.
    #[error("message text must not be empty")]
    EmptyText,

    /// The message text is longer than the configured budget.
    #[error("message text has {len} characters, limit is {max}")]
    TextTooLong {
        /// Character count of the rejected text.
        len: usize,
        /// The configured maximum.
        max: usize,
    },

    /// A timestamp string was not in `YYYY-MM-DD HH:MM:SS` form.
    #[error("invalid timestamp \"{value}\": {reason}")]
    InvalidTimestamp {
        /// The value that failed validation.
        value: String,
        /// Human-readable explanation.
        reason: String,
    },

    /// A bounding box was built with an empty or non-finite range.
    #[error("invalid bounding box: {reason}")]
    InvalidBoundingBox {
        /// Human-readable explanation.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_empty_text() {
        assert_eq!(
            ModelError::EmptyText.to_string(),
            "message text must not be empty"
        );
    }

    #[test]
    fn error_display_too_long() {
        let err = ModelError::TextTooLong { len: 51, max: 50 };
        assert_eq!(err.to_string(), "message text has 51 characters, limit is 50");
    }

    #[test]
    fn error_display_timestamp() {
        let err = ModelError::InvalidTimestamp {
            value: "yesterday".into(),
            reason: "expected YYYY-MM-DD HH:MM:SS".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid timestamp \"yesterday\": expected YYYY-MM-DD HH:MM:SS"
        );
    }

    #[test]
    fn error_display_bounding_box() {
        let err = ModelError::InvalidBoundingBox {
            reason: "latitude range is empty".into(),
        };
        assert_eq!(err.to_string(), "invalid bounding box: latitude range is empty");
    }
}
