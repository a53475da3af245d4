//! The persisted message record.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;
use crate::timestamp::Timestamp;

/// A posted note.
///
/// Field order matches the on-disk object: `text`, `timestamp`, `lat`, `lon`.
///
/// # Examples
///
/// ```
/// use geopost_models::{Coordinate, Message};
///
/// let msg = Message::new("Hello", "2024-01-01 10:00:00".parse().unwrap(), Coordinate::new(15.5, 32.5));
/// assert_eq!(msg.feed_line(), "2024-01-01 10:00:00 - Hello");
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Message {
    /// The note body.
    pub text: String,
    /// Local posting time.
    pub timestamp: Timestamp,
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lon: f64,
}

impl Message {
    /// Assemble a message from its parts. No validation is applied; use
    /// [`MessageFactory`](crate::MessageFactory) for user input.
    pub fn new(text: impl Into<String>, timestamp: Timestamp, position: Coordinate) -> Self {
        Self {
            text: text.into(),
            timestamp,
            lat: position.lat,
            lon: position.lon,
        }
    }

    /// Position as a [`Coordinate`].
    pub fn position(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }

    /// Length of the text in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// One feed row: `"{timestamp} - {text}"`.
    pub fn feed_line(&self) -> String {
        format!("{} - {}", self.timestamp, self.text)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.timestamp, self.text)
    }
}

/// Iterate stored messages newest first.
///
/// Storage keeps append order; reversing is purely a display concern.
pub fn newest_first(messages: &[Message]) -> impl DoubleEndedIterator<Item = &Message> + ExactSizeIterator {
    messages.iter().rev()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hello() -> Message {
        Message::new(
            "Hello",
            "2024-01-01 10:00:00".parse().unwrap(),
            Coordinate::new(15.5, 32.5),
        )
    }

    fn world() -> Message {
        Message::new(
            "World",
            "2024-01-01 10:01:00".parse().unwrap(),
            Coordinate::new(12.3, 30.1),
        )
    }

    #[test]
    fn serializes_flat_object() {
        let json = serde_json::to_value(hello()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "text": "Hello",
                "timestamp": "2024-01-01 10:00:00",
                "lat": 15.5,
                "lon": 32.5
            })
        );
    }

    #[test]
    fn serde_roundtrip() {
        let msg = world();
        let json = serde_json::to_string(&msg).unwrap();
        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(msg, back);
    }

    #[test]
    fn accepts_integer_coordinates() {
        let msg: Message = serde_json::from_str(
            r#"{"text":"x","timestamp":"2024-01-01 10:00:00","lat":15,"lon":32}"#,
        )
        .unwrap();
        assert_eq!(msg.position(), Coordinate::new(15.0, 32.0));
    }

    #[test]
    fn missing_field_fails() {
        let res = serde_json::from_str::<Message>(r#"{"text":"x","lat":1.0,"lon":2.0}"#);
        assert!(res.is_err());
    }

    #[test]
    fn feed_line_and_display_agree() {
        let msg = hello();
        assert_eq!(msg.feed_line(), "2024-01-01 10:00:00 - Hello");
        assert_eq!(msg.to_string(), msg.feed_line());
    }

    #[test]
    fn char_len_counts_scalars() {
        let msg = Message::new("héllo ✓", "2024-01-01 10:00:00".parse().unwrap(), Coordinate::new(0.0, 0.0));
        assert_eq!(msg.char_len(), 7);
    }

    #[test]
    fn newest_first_reverses() {
        let stored = vec![hello(), world()];
        let texts: Vec<&str> = newest_first(&stored).map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["World", "Hello"]);
        // The stored order is untouched.
        assert_eq!(stored[0].text, "Hello");
    }
}
