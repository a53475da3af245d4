//! # GeoPost Store
//!
//! Durable, ordered, append-only persistence for posted
//! [`Message`](geopost_models::Message)s.
//!
//! * [`MessageStore`] owns a single JSON file holding an array of messages
//!   in append order. Every save rewrites the whole file through a
//!   temporary sibling and an atomic rename, so readers never see a partial
//!   write.
//! * [`StoreError`] separates unreadable data ([`StoreError::Corrupted`])
//!   from failing I/O ([`StoreError::Io`]). Neither is ever reported as an
//!   empty feed.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use geopost_models::{Coordinate, Message, Timestamp};
//! use geopost_store::MessageStore;
//!
//! # fn run() -> Result<(), geopost_store::StoreError> {
//! let store = MessageStore::new("messages.json");
//! let msg = Message::new("Hello", Timestamp::now(), Coordinate::new(15.5, 32.5));
//! let all = store.append(msg)?;
//! for m in all.iter().rev() {
//!     println!("{m}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod store;

pub use error::StoreError;
pub use store::{MessageStore, DEFAULT_STORE_FILE};
