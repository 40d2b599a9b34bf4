const OPEN_TAG: &str = "<answer>";
const CLOSE_TAG: &str = "</answer>";
const BOXED: &str = "\\boxed{";
const TEXT_WRAPPER: &str = "\\text{";
const FULLWIDTH_PAIRS: [(&str, &str); 2] = [("【", "】"), ("［", "］")];

/// Best-guess final answer in `text`, trimmed, or `None` when no marker is found.
///
/// Markers are tried in order: `<answer>` tags, `\boxed{\text{}}`, `\boxed{}`,
/// `[]`, then full-width brackets. The first kind with a complete match wins,
/// and within it the rightmost match. An unterminated `<answer>` is the last
/// resort so partial streaming replies still show something.
pub fn extract_answer(text: &str) -> Option<String> {
    let categories: [fn(&str) -> Option<&str>; 5] = [
        last_tag_pair,
        last_boxed_text,
        last_boxed,
        last_square_bracket,
        last_fullwidth_bracket,
    ];

    categories
        .iter()
        .find_map(|find| find(text))
        .or_else(|| unterminated_tag(text))
        .map(|inner| inner.trim().to_string())
}

/// Raw model reply together with its extracted answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub raw: String,
    pub extracted: Option<String>,
}

impl Analysis {
    pub fn from_raw(raw: String) -> Self {
        let extracted = extract_answer(&raw);
        Self { raw, extracted }
    }

    /// Extracted answer when it has content, the whole reply otherwise
    pub fn display_text(&self) -> &str {
        match self.extracted.as_deref() {
            Some(answer) if !answer.is_empty() => answer,
            _ => &self.raw,
        }
    }
}

fn last_tag_pair(text: &str) -> Option<&str> {
    last_pair(text, OPEN_TAG, CLOSE_TAG).map(|(_, inner)| inner)
}

fn last_square_bracket(text: &str) -> Option<&str> {
    last_pair(text, "[", "]").map(|(_, inner)| inner)
}

fn last_fullwidth_bracket(text: &str) -> Option<&str> {
    FULLWIDTH_PAIRS
        .iter()
        .filter_map(|(open, close)| last_pair(text, open, close))
        .max_by_key(|(end, _)| *end)
        .map(|(_, inner)| inner)
}

fn last_boxed_text(text: &str) -> Option<&str> {
    boxed_groups(text)
        .into_iter()
        .rev()
        .find_map(text_wrapper_inner)
}

fn last_boxed(text: &str) -> Option<&str> {
    boxed_groups(text).pop()
}

fn unterminated_tag(text: &str) -> Option<&str> {
    let start = text.rfind(OPEN_TAG)? + OPEN_TAG.len();
    let rest = &text[start..];
    (!rest.contains(CLOSE_TAG)).then_some(rest)
}

/// Non-overlapping `open ... close` pairs scanned left to right; the inner
/// text stops at the first `close` after each `open`.
///
/// Returns the rightmost pair as (end offset, inner text).
fn last_pair<'a>(text: &'a str, open: &str, close: &str) -> Option<(usize, &'a str)> {
    let mut cursor = 0;
    let mut last = None;

    while let Some(found) = text[cursor..].find(open) {
        let inner_start = cursor + found + open.len();
        let Some(len) = text[inner_start..].find(close) else {
            break;
        };
        let inner_end = inner_start + len;
        cursor = inner_end + close.len();
        last = Some((cursor, &text[inner_start..inner_end]));
    }

    last
}

/// Contents of every complete, brace-balanced `\boxed{...}` in order
fn boxed_groups(text: &str) -> Vec<&str> {
    let mut groups = Vec::new();
    let mut cursor = 0;

    while let Some(found) = text[cursor..].find(BOXED) {
        let inner_start = cursor + found + BOXED.len();
        match closing_brace(&text[inner_start..]) {
            Some(len) => {
                groups.push(&text[inner_start..inner_start + len]);
                cursor = inner_start + len + 1;
            }
            None => cursor = inner_start,
        }
    }

    groups
}

/// `\text{...}` filling a whole boxed group, if that is what it is
fn text_wrapper_inner(group: &str) -> Option<&str> {
    let body = group.trim().strip_prefix(TEXT_WRAPPER)?;
    let len = closing_brace(body)?;
    body[len + 1..].trim().is_empty().then(|| &body[..len])
}

/// Byte offset of the `}` closing a group whose `{` was just consumed.
/// Backslash escapes such as `\}` do not count.
fn closing_brace(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut escaped = false;

    for (i, c) in s.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '{' => depth += 1,
            '}' if depth == 0 => return Some(i),
            '}' => depth -= 1,
            _ => {}
        }
    }

    None
}
