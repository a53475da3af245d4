//! Glue between the composition buffer, the message factory and the store.
//!
//! The controller owns nothing the user sees. Front-ends hand it the
//! [`InputBuffer`] on Return and render whatever feed it gives back.

use geopost_input::{Cue, InputBuffer};
use geopost_models::{
    Clock, CoordinateSource, LocalClock, Message, MessageFactory, ModelError, ThreadCoordinates,
};
use geopost_store::{MessageStore, StoreError};

/// Failures while posting or reading the feed.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    /// The store could not be read or written.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The submitted text does not make a valid message.
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// A successful post.
#[derive(Debug, Clone, PartialEq)]
pub struct Posted {
    /// The stored record.
    pub message: Message,
    /// The feed reloaded after the append, oldest first.
    pub feed: Vec<Message>,
    /// Cue raised while finalizing the input (text cut to budget).
    pub cue: Option<Cue>,
}

/// What a Return press led to.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// A message was appended.
    Posted(Posted),
    /// Nothing to post (whitespace only). The store was not touched.
    Suppressed {
        /// Cue raised while finalizing the input.
        cue: Option<Cue>,
    },
}

/// Replace line breaks with spaces. Messages are single-line; Return submits
/// rather than inserting a newline, so pasted breaks are flattened the same
/// way before the budget is applied.
pub fn flatten_line_breaks(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\r', '\n'], " ")
}

/// Posts messages and serves the feed.
pub struct FeedController<C, S> {
    store: MessageStore,
    factory: MessageFactory<C, S>,
}

impl FeedController<LocalClock, ThreadCoordinates> {
    /// Wall clock and thread-local randomness over the default box.
    pub fn system(store: MessageStore, max_chars: usize) -> Self {
        Self::new(store, MessageFactory::system().max_chars(max_chars))
    }
}

impl<C: Clock, S: CoordinateSource> FeedController<C, S> {
    /// Combine a store with a message factory.
    pub fn new(store: MessageStore, factory: MessageFactory<C, S>) -> Self {
        Self { store, factory }
    }

    /// The backing store.
    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    /// The feed, oldest first.
    pub fn feed(&self) -> Result<Vec<Message>, StoreError> {
        self.store.load()
    }

    /// Stamp `text` and append it, then reload the feed from disk.
    pub fn post(&mut self, text: &str) -> Result<(Message, Vec<Message>), ControllerError> {
        let message = self.factory.compose(text)?;
        self.store.append(message.clone())?;
        let feed = self.store.load()?;
        tracing::info!(chars = message.char_len(), total = feed.len(), "posted message");
        Ok((message, feed))
    }

    /// Return pressed: enforce and trim the buffer, post the result.
    ///
    /// On failure the buffer is given back the finalized text so nothing
    /// the user typed is lost.
    pub fn submit(&mut self, buffer: &mut InputBuffer) -> Result<SubmitOutcome, ControllerError> {
        let outcome = buffer.submit();
        let Some(text) = outcome.submitted else {
            tracing::debug!("empty submission ignored");
            return Ok(SubmitOutcome::Suppressed { cue: outcome.cue });
        };

        match self.post(&text) {
            Ok((message, feed)) => Ok(SubmitOutcome::Posted(Posted {
                message,
                feed,
                cue: outcome.cue,
            })),
            Err(e) => {
                tracing::warn!(error = %e, "post failed, keeping input");
                buffer.set_text(&text);
                Err(e)
            }
        }
    }
}
