//! Server-sent event framing
//!
//! Incremental parser over raw body chunks. The transport hands us
//! arbitrarily split byte chunks; a frame ends at a blank line, and only
//! `data:` fields matter to this protocol — the server never sets custom
//! event names or ids, and comment lines are keepalives.
//!
//! ```text
//! data: {"Started":{"coll_id":"0","clip_id":"3"}}
//! <blank line>
//! ```
//!
//! Multiple `data:` lines in one frame concatenate with a newline, per the
//! SSE framing rules. CRLF line endings are tolerated.

use bytes::{Buf, BytesMut};

/// Incremental SSE frame parser
#[derive(Debug, Default)]
pub struct SseParser {
    buf: BytesMut,
}

impl SseParser {
    /// Create an empty parser
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one transport chunk, draining every completed frame's data
    ///
    /// Frames with no `data:` field (keepalive comments, retry hints) are
    /// consumed silently and produce nothing.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(chunk);

        let mut payloads = Vec::new();
        while let Some(end) = find_frame_end(&self.buf) {
            let frame = self.buf.split_to(end);
            if let Some(data) = parse_frame(&frame) {
                payloads.push(data);
            }
        }

        payloads
    }

    /// Bytes of the unfinished trailing frame
    pub fn pending(&self) -> usize {
        self.buf.remaining()
    }
}

/// Index just past the blank-line delimiter of the first complete frame
fn find_frame_end(buf: &[u8]) -> Option<usize> {
    let mut last_was_newline = false;

    for (i, &byte) in buf.iter().enumerate() {
        match byte {
            b'\n' => {
                if last_was_newline {
                    return Some(i + 1);
                }
                last_was_newline = true;
            }
            // CR belongs to the preceding line ending.
            b'\r' => {}
            _ => last_was_newline = false,
        }
    }

    None
}

/// Concatenated `data:` payload of one frame, if it has any
fn parse_frame(frame: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(frame);
    let mut parts: Vec<&str> = Vec::new();

    for line in text.lines() {
        if let Some(value) = line.strip_prefix("data:") {
            parts.push(value.strip_prefix(' ').unwrap_or(value));
        }
        // Comments (":keepalive") and "event:"/"id:"/"retry:" fields are
        // irrelevant to this protocol.
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_frame() {
        let mut parser = SseParser::new();
        let payloads = parser.feed(b"data: {\"x\":1}\n\n");

        assert_eq!(payloads, ["{\"x\":1}"]);
        assert_eq!(parser.pending(), 0);
    }

    #[test]
    fn test_frame_split_across_chunks() {
        let mut parser = SseParser::new();

        assert!(parser.feed(b"data: {\"Started\":{\"col").is_empty());
        assert!(parser.pending() > 0);

        let payloads = parser.feed(b"l_id\":\"0\",\"clip_id\":\"1\"}}\n\n");
        assert_eq!(payloads, ["{\"Started\":{\"coll_id\":\"0\",\"clip_id\":\"1\"}}"]);
    }

    #[test]
    fn test_multiple_frames_in_one_chunk() {
        let mut parser = SseParser::new();
        let payloads = parser.feed(b"data: one\n\ndata: two\n\n");

        assert_eq!(payloads, ["one", "two"]);
    }

    #[test]
    fn test_multiline_data_concatenates() {
        let mut parser = SseParser::new();
        let payloads = parser.feed(b"data: [1,\ndata: 2]\n\n");

        assert_eq!(payloads, ["[1,\n2]"]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let mut parser = SseParser::new();
        let payloads = parser.feed(b"data: x\r\n\r\n");

        assert_eq!(payloads, ["x"]);
    }

    #[test]
    fn test_keepalive_and_non_data_fields_ignored() {
        let mut parser = SseParser::new();
        let payloads = parser.feed(b":keepalive\n\nevent: message\nid: 7\ndata: x\n\nretry: 500\n\n");

        assert_eq!(payloads, ["x"]);
    }

    #[test]
    fn test_data_without_space() {
        let mut parser = SseParser::new();
        let payloads = parser.feed(b"data:x\n\n");

        assert_eq!(payloads, ["x"]);
    }

    #[test]
    fn test_byte_at_a_time() {
        let mut parser = SseParser::new();
        let mut payloads = Vec::new();

        for &byte in b"data: abc\n\ndata: def\n\n" {
            payloads.extend(parser.feed(&[byte]));
        }

        assert_eq!(payloads, ["abc", "def"]);
    }
}
