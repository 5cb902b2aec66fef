//! Collaborator boundaries: caller audio (speech in/out) and the room that
//! hosts the call.
//!
//! Speech synthesis, recognition and media transport live behind these
//! traits; the flow engine only ever sees text.

pub mod cli;
pub mod room;
pub mod scripted;

use async_trait::async_trait;

use crate::error::{SessionError, VoiceError};

pub use cli::CliVoice;
pub use room::LocalRooms;
pub use scripted::ScriptedVoice;

/// Speech I/O with the caller.
#[async_trait]
pub trait VoiceIo: Send + Sync {
    /// Synthesize and play an utterance.
    async fn prompt(&self, text: &str) -> Result<(), VoiceError>;

    /// Wait for the caller's next recognized utterance.
    ///
    /// `VoiceError::Disconnected` signals that the caller hung up.
    async fn listen_for_text(&self) -> Result<String, VoiceError>;
}

/// Room/session lifecycle owned by the media transport.
#[async_trait]
pub trait RoomLifecycle: Send + Sync {
    async fn create_room(&self, room: &str) -> Result<(), SessionError>;

    /// Tear the room down. Deleting an unknown or already deleted room
    /// succeeds.
    async fn delete_room(&self, room: &str) -> Result<(), SessionError>;
}
