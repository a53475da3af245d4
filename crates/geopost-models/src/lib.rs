#![deny(missing_docs)]

//! # GeoPost Models
//!
//! Core data types for GeoPost, a note-posting utility whose entries are
//! stamped with the local time and a random position.
//!
//! ## Record layout
//!
//! ```text
//! Message
//! ├── text       (1..=max_chars characters, trimmed)
//! ├── timestamp  (Timestamp, "YYYY-MM-DD HH:MM:SS")
//! └── position   (Coordinate, flattened to `lat` / `lon`)
//! ```
//!
//! ## Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`message`] | The persisted `Message` record and feed helpers |
//! | [`timestamp`] | Second-precision local `Timestamp` |
//! | [`coordinate`] | `Coordinate`, `BoundingBox`, random coordinate sources |
//! | [`clock`] | Injectable `Clock` seam |
//! | [`message_factory`] | `MessageFactory`, which stamps finalized text |
//! | [`error`] | `ModelError` |

pub mod clock;
pub mod coordinate;
pub mod error;
pub mod message;
pub mod message_factory;
pub mod timestamp;

// Re-export all public types at crate root for convenience.
pub use clock::*;
pub use coordinate::*;
pub use error::*;
pub use message::*;
pub use message_factory::*;
pub use timestamp::*;

/// Default maximum number of characters in a message.
pub const DEFAULT_MAX_CHARS: usize = 50;
