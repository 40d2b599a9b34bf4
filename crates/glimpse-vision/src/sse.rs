/// Meaningful content of one server-sent event line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    /// Text appended by this chunk
    Delta(String),
    /// `data: [DONE]`
    Done,
}

/// Interpret one line of an OpenAI-style completion stream.
///
/// Comments, blank lines, other fields, chunks without text and chunks that
/// are not valid JSON all yield `None`.
pub fn parse_sse_line(line: &str) -> Option<SseEvent> {
    let payload = line.strip_prefix("data:")?.trim();
    if payload == "[DONE]" {
        return Some(SseEvent::Done);
    }

    let chunk: serde_json::Value = match serde_json::from_str(payload) {
        Ok(chunk) => chunk,
        Err(e) => {
            tracing::trace!("Skipping malformed stream chunk: {e}");
            return None;
        }
    };

    chunk["choices"]
        .get(0)
        .and_then(|choice| choice["delta"]["content"].as_str())
        .filter(|text| !text.is_empty())
        .map(|text| SseEvent::Delta(text.to_string()))
}

/// Splits a byte stream into lines and parses each complete one.
///
/// Bytes are buffered until a newline so multi-byte characters split across
/// network chunks decode correctly.
#[derive(Debug, Default)]
pub struct SseDecoder {
    pending: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bytes: &[u8]) -> Vec<SseEvent> {
        self.pending.extend_from_slice(bytes);

        let mut events = Vec::new();
        while let Some(newline) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=newline).collect();
            let line = String::from_utf8_lossy(&line);
            if let Some(event) = parse_sse_line(line.trim_end_matches(['\r', '\n'])) {
                events.push(event);
            }
        }
        events
    }

    /// Parse whatever is left once the stream has ended
    pub fn finish(&mut self) -> Option<SseEvent> {
        let rest = std::mem::take(&mut self.pending);
        parse_sse_line(String::from_utf8_lossy(&rest).trim_end_matches('\r'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delta(text: &str) -> String {
        serde_json::json!({ "choices": [{ "delta": { "content": text } }] }).to_string()
    }

    #[test]
    fn test_parse_delta() {
        assert_eq!(
            parse_sse_line(&format!("data: {}", delta("Hel"))),
            Some(SseEvent::Delta("Hel".into()))
        );
        assert_eq!(
            parse_sse_line(&format!("data:{}", delta("lo"))),
            Some(SseEvent::Delta("lo".into()))
        );
    }

    #[test]
    fn test_parse_done() {
        assert_eq!(parse_sse_line("data: [DONE]"), Some(SseEvent::Done));
    }

    #[test]
    fn test_ignores_noise() {
        assert_eq!(parse_sse_line(""), None);
        assert_eq!(parse_sse_line(": OPENROUTER PROCESSING"), None);
        assert_eq!(parse_sse_line("event: message"), None);
        assert_eq!(parse_sse_line("data: {not json"), None);
        assert_eq!(parse_sse_line(r#"data: {"choices":[]}"#), None);
        assert_eq!(
            parse_sse_line(r#"data: {"choices":[{"delta":{"role":"assistant"}}]}"#),
            None
        );
        assert_eq!(parse_sse_line(&format!("data: {}", delta(""))), None);
    }

    #[test]
    fn test_decoder_handles_split_lines_and_crlf() {
        let body = format!("data: {}\r\n\r\ndata: {}\n\ndata: [DONE]\n", delta("答"), delta("案"));
        let bytes = body.as_bytes();
        // Split inside the first multi-byte character
        let cut = body.find('答').unwrap() + 1;

        let mut decoder = SseDecoder::new();
        let mut events = decoder.push(&bytes[..cut]);
        assert!(events.is_empty());
        events.extend(decoder.push(&bytes[cut..]));

        assert_eq!(
            events,
            vec![
                SseEvent::Delta("答".into()),
                SseEvent::Delta("案".into()),
                SseEvent::Done
            ]
        );
        assert_eq!(decoder.finish(), None);
    }

    #[test]
    fn test_decoder_finish_parses_trailing_line() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"data: [DO").is_empty());
        assert!(decoder.push(b"NE]").is_empty());
        assert_eq!(decoder.finish(), Some(SseEvent::Done));
    }
}
