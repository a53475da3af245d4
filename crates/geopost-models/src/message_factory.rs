//! # Message factory
//!
//! Turns finalized input text into a [`Message`] by stamping it with the
//! current time and a position. Both come from injected collaborators, so
//! tests can pin them down:
//!
//! ```rust
//! use geopost_models::{Coordinate, ManualClock, MessageFactory, ScriptedCoordinates};
//!
//! let clock = ManualClock::new("2024-01-01 10:00:00".parse().unwrap());
//! let coords = ScriptedCoordinates::new(vec![Coordinate::new(15.5, 32.5)]);
//! let mut factory = MessageFactory::new(clock, coords).max_chars(50);
//!
//! let msg = factory.compose("  Hello  ").unwrap();
//! assert_eq!(msg.text, "Hello");
//! assert_eq!(msg.timestamp.to_string(), "2024-01-01 10:00:00");
//! ```

use crate::clock::{Clock, LocalClock};
use crate::coordinate::{BoundingBox, CoordinateSource, ThreadCoordinates, UniformCoordinates};
use crate::error::ModelError;
use crate::message::Message;
use crate::DEFAULT_MAX_CHARS;

/// Builds validated messages from user text.
#[derive(Debug, Clone)]
pub struct MessageFactory<C, S> {
    clock: C,
    coordinates: S,
    max_chars: usize,
}

impl MessageFactory<LocalClock, ThreadCoordinates> {
    /// Local wall clock and thread-local randomness over
    /// [`BoundingBox::DEFAULT`].
    pub fn system() -> Self {
        Self::new(
            LocalClock,
            UniformCoordinates::thread_local(BoundingBox::DEFAULT),
        )
    }
}

impl<C: Clock, S: CoordinateSource> MessageFactory<C, S> {
    /// Create a factory with the default character budget.
    pub fn new(clock: C, coordinates: S) -> Self {
        Self {
            clock,
            coordinates,
            max_chars: DEFAULT_MAX_CHARS,
        }
    }

    /// Set the character budget (builder style).
    #[must_use]
    pub fn max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    /// The configured character budget.
    pub fn budget(&self) -> usize {
        self.max_chars
    }

    /// Trim `text` and stamp it with the current time and a fresh position.
    ///
    /// Fails with [`ModelError::EmptyText`] when nothing remains after
    /// trimming, and [`ModelError::TextTooLong`] when the trimmed text is
    /// over budget. Neither the clock nor the coordinate source is consulted
    /// on failure.
    pub fn compose(&mut self, text: &str) -> Result<Message, ModelError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ModelError::EmptyText);
        }
        let len = text.chars().count();
        if len > self.max_chars {
            return Err(ModelError::TextTooLong {
                len,
                max: self.max_chars,
            });
        }

        let timestamp = self.clock.now();
        let position = self.coordinates.next_coordinate();
        tracing::debug!(%timestamp, lat = position.lat, lon = position.lon, chars = len, "composed message");
        Ok(Message::new(text, timestamp, position))
    }
}
