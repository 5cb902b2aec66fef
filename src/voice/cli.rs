//! CLI voice — stdin/stdout stand-in for speech I/O, for local testing.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

use crate::error::VoiceError;
use crate::voice::VoiceIo;

/// Prints prompts to stdout and reads caller utterances from stdin.
///
/// End of input is treated as the caller hanging up.
pub struct CliVoice {
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl CliVoice {
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }
}

impl Default for CliVoice {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VoiceIo for CliVoice {
    async fn prompt(&self, text: &str) -> Result<(), VoiceError> {
        println!("\n🤖 {text}");
        Ok(())
    }

    async fn listen_for_text(&self) -> Result<String, VoiceError> {
        let mut lines = self.lines.lock().await;
        loop {
            eprint!("> ");
            match lines.next_line().await? {
                Some(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    return Ok(line.to_string());
                }
                None => return Err(VoiceError::Disconnected),
            }
        }
    }
}
