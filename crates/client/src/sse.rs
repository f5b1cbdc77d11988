//! Incremental decoder for `text/event-stream` bodies.

use anyhow::bail;

/// Largest incomplete message the decoder will hold before giving up.
pub const MAX_PENDING_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SseMessage {
    pub event: Option<String>,
    pub data: String,
}

/// Buffers raw body chunks and hands out complete messages. Chunks may split
/// lines or UTF-8 sequences anywhere.
#[derive(Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    /// Fails once an unterminated message outgrows [`MAX_PENDING_BYTES`];
    /// the stream is unusable after that.
    pub fn push(&mut self, chunk: &[u8]) -> anyhow::Result<Vec<SseMessage>> {
        self.buffer
            .extend(chunk.iter().copied().filter(|byte| *byte != b'\r'));

        let mut messages = Vec::new();
        while let Some(end) = find_blank_line(&self.buffer) {
            let block: Vec<u8> = self.buffer.drain(..end + 2).collect();
            if let Some(message) = parse_block(&String::from_utf8_lossy(&block[..end])) {
                messages.push(message);
            }
        }

        if self.buffer.len() > MAX_PENDING_BYTES {
            self.buffer.clear();
            bail!("event stream message exceeds {} bytes", MAX_PENDING_BYTES);
        }
        Ok(messages)
    }
}

fn find_blank_line(buffer: &[u8]) -> Option<usize> {
    buffer.windows(2).position(|window| window == b"\n\n")
}

fn parse_block(block: &str) -> Option<SseMessage> {
    let mut message = SseMessage::default();
    let mut data_lines: Vec<&str> = Vec::new();

    for line in block.lines() {
        if line.is_empty() || line.starts_with(':') {
            continue;
        }
        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "event" => message.event = Some(value.to_string()),
            "data" => data_lines.push(value),
            _ => {}
        }
    }

    // Comment-only blocks (keep-alives) carry nothing to dispatch
    if data_lines.is_empty() {
        return None;
    }
    message.data = data_lines.join("\n");
    Some(message)
}
