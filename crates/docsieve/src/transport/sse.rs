//! Incremental decoder for `text/event-stream` bodies

use bytes::BytesMut;

/// Splits a server-sent event stream into event data payloads
///
/// Chunks may end anywhere, including mid-line. Multiple `data:` lines of
/// one event are joined with `\n`; other fields are ignored.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: BytesMut,
    data: Vec<String>,
}

impl SseDecoder {
    /// Create an empty decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and return the payloads of every event it completed
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line = self.buffer.split_to(pos + 1);
            let text = String::from_utf8_lossy(&line[..pos]);
            let text: &str = text.strip_suffix('\r').unwrap_or(&text);
            if let Some(event) = self.process_line(text) {
                events.push(event);
            }
        }
        events
    }

    /// Flush an event left unterminated at end of stream
    pub fn finish(&mut self) -> Option<String> {
        if !self.buffer.is_empty() {
            let line = self.buffer.split();
            let text = String::from_utf8_lossy(&line).into_owned();
            let text = text.strip_suffix('\r').unwrap_or(&text).to_string();
            self.process_line(&text);
        }
        self.take_event()
    }

    fn process_line(&mut self, line: &str) -> Option<String> {
        if line.is_empty() {
            return self.take_event();
        }
        if let Some(rest) = line.strip_prefix("data") {
            if rest.is_empty() {
                self.data.push(String::new());
            } else if let Some(value) = rest.strip_prefix(':') {
                self.data.push(value.strip_prefix(' ').unwrap_or(value).to_string());
            }
        }
        None
    }

    fn take_event(&mut self) -> Option<String> {
        if self.data.is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.data).join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_event() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed(b"event: message\ndata: {\"id\":1}\n\n");
        assert_eq!(events, vec!["{\"id\":1}".to_string()]);
    }

    #[test]
    fn test_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"data: {\"jsonrpc\":").is_empty());
        assert!(decoder.feed(b"\"2.0\"}\r").is_empty());
        let events = decoder.feed(b"\n\r\n: keep-alive\n\ndata: second\n\n");
        assert_eq!(
            events,
            vec!["{\"jsonrpc\":\"2.0\"}".to_string(), "second".to_string()]
        );
    }

    #[test]
    fn test_multiline_data_and_finish() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"data: line one\ndata:line two\n").is_empty());
        assert_eq!(decoder.finish().as_deref(), Some("line one\nline two"));
        assert_eq!(decoder.finish(), None);
    }

    #[test]
    fn test_ignores_other_fields() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed(b"id: 5\nretry: 100\ndataset: x\n\n");
        assert!(events.is_empty());
    }
}
