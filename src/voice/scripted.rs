//! Scripted voice — replays canned caller replies and records prompts.
//!
//! Used for replaying recorded calls and in tests.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::VoiceError;
use crate::voice::VoiceIo;

/// Voice I/O backed by a fixed list of caller replies.
///
/// Once the script runs out the caller is considered disconnected.
#[derive(Default)]
pub struct ScriptedVoice {
    replies: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedVoice {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Everything the agent has said so far, in order.
    pub async fn prompts(&self) -> Vec<String> {
        self.prompts.lock().await.clone()
    }

    /// Replies not yet consumed.
    pub async fn remaining(&self) -> usize {
        self.replies.lock().await.len()
    }
}

#[async_trait]
impl VoiceIo for ScriptedVoice {
    async fn prompt(&self, text: &str) -> Result<(), VoiceError> {
        self.prompts.lock().await.push(text.to_string());
        Ok(())
    }

    async fn listen_for_text(&self) -> Result<String, VoiceError> {
        self.replies
            .lock()
            .await
            .pop_front()
            .ok_or(VoiceError::Disconnected)
    }
}
