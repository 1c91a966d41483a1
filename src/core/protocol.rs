// src/core/protocol.rs

//! The newline-delimited wire codec.
//!
//! Inbound, clients send plain text lines terminated by `\n` (an optional
//! preceding `\r` is stripped). Outbound, every server message is framed as
//! `<text>\n*->` — the trailing `*->` is the prompt marker naive clients use
//! as a "ready for next input" cue, and it is deliberately not followed by a
//! newline.

use crate::core::errors::OpalError;
use bytes::{BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

/// The prompt marker appended after every outbound message.
pub const PROMPT: &str = "*->";

/// Codec for the line-oriented client protocol.
#[derive(Debug, Default)]
pub struct LineCodec {
    /// Offset up to which `decode` has already scanned for a newline, so a
    /// slowly arriving line is not re-scanned from the start on every call.
    scanned: usize,
}

impl LineCodec {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = OpalError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let Some(pos) = src[self.scanned..].iter().position(|b| *b == b'\n') else {
            // No complete line yet; remember how far we scanned and wait for
            // more data.
            self.scanned = src.len();
            return Ok(None);
        };

        let newline_index = self.scanned + pos;
        let mut line = src.split_to(newline_index + 1);
        self.scanned = 0;

        // Drop the trailing `\n` (and `\r` for clients that send CRLF).
        line.truncate(line.len() - 1);
        if line.last() == Some(&b'\r') {
            line.truncate(line.len() - 1);
        }

        Ok(Some(String::from_utf8_lossy(&line).into_owned()))
    }
}

impl<T: AsRef<str>> Encoder<T> for LineCodec {
    type Error = OpalError;

    fn encode(&mut self, item: T, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let item = item.as_ref();
        dst.reserve(item.len() + 1 + PROMPT.len());
        dst.put(item.as_bytes());
        dst.put_u8(b'\n');
        dst.put(PROMPT.as_bytes());
        Ok(())
    }
}
