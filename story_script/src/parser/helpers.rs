//! Byte-slice primitives shared by the parser stages.
//!
//! Every slice returned here borrows from its input, so text extracted from a
//! document always points into the original buffer.

const SPACES: &[u8] = b" \t\r\n";

/// Closing/opening line of a paragraph block.
pub(super) const PARAGRAPH_DELIMITER: &[u8] = b"~~~";

pub(super) fn trim_start(s: &[u8]) -> &[u8] {
    let skip = s.iter().take_while(|b| SPACES.contains(b)).count();
    &s[skip..]
}

pub(super) fn trim_end(s: &[u8]) -> &[u8] {
    let keep = s.len() - s.iter().rev().take_while(|b| SPACES.contains(b)).count();
    &s[..keep]
}

pub(super) fn trim(s: &[u8]) -> &[u8] {
    trim_start(trim_end(s))
}

/// Whitespace-only lines count as blank.
pub(super) fn is_blank(line: &[u8]) -> bool {
    trim(line).is_empty()
}

pub(super) fn is_comment(line: &[u8]) -> bool {
    trim_start(line).starts_with(b"#")
}

/// `[name]`, including the degenerate `[]`.
pub(super) fn is_label(s: &[u8]) -> bool {
    s.len() >= 2 && s[0] == b'[' && s[s.len() - 1] == b']'
}

/// Caller must have checked [`is_label`].
pub(super) fn strip_label(s: &[u8]) -> &[u8] {
    &s[1..s.len() - 1]
}

/// Split around the first `sep`, dropping the separator.
pub(super) fn split_once(s: &[u8], sep: u8) -> Option<(&[u8], &[u8])> {
    let at = s.iter().position(|&b| b == sep)?;
    Some((&s[..at], &s[at + 1..]))
}

/// One physical line of the document, without its `\n` / `\r\n` terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Line<'src> {
    /// 1-based.
    pub number: usize,
    /// Byte offset of the first byte of `text` in the document.
    pub offset: usize,
    pub text: &'src [u8],
}

/// Forward line reader that keeps count of line numbers.
#[derive(Debug, Clone)]
pub(super) struct Cursor<'src> {
    src: &'src [u8],
    pos: usize,
    line: usize,
}

impl<'src> Cursor<'src> {
    pub(super) fn new(src: &'src [u8]) -> Self {
        Self { src, pos: 0, line: 0 }
    }

    /// Number of the line most recently returned, 0 before the first.
    pub(super) fn line_number(&self) -> usize {
        self.line
    }
}

impl<'src> Iterator for Cursor<'src> {
    type Item = Line<'src>;

    fn next(&mut self) -> Option<Line<'src>> {
        if self.pos >= self.src.len() {
            return None;
        }
        let rest = &self.src[self.pos..];
        let offset = self.pos;
        let text = match rest.iter().position(|&b| b == b'\n') {
            Some(end) => {
                self.pos += end + 1;
                let line = &rest[..end];
                line.strip_suffix(b"\r").unwrap_or(line)
            },
            None => {
                self.pos = self.src.len();
                rest
            },
        };
        self.line += 1;
        Some(Line {
            number: self.line,
            offset,
            text,
        })
    }
}
