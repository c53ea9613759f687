//! Minimal scanner for legacy method source.
//!
//! The rewrite passes work on raw text, so they only need to know which
//! bytes are code and which belong to a string literal or a comment:
//!
//! - `// …` line comments (the newline stays code)
//! - `/* … */` block comments
//! - `"…"` string literals with `\` escapes; they never span a line
//!
//! All delimiters are ASCII, so scanning byte-wise never splits a UTF-8
//! sequence and every offset returned here is a valid `str` boundary.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Code,
    String,
    LineComment,
    BlockComment,
}

/// A contiguous byte range of one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub kind: SegmentKind,
    pub start: usize,
    pub end: usize,
}

impl Segment {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }

    pub fn is_code(&self) -> bool {
        self.kind == SegmentKind::Code
    }
}

/// Split `source` into code, string and comment segments covering every byte.
pub fn segments(source: &str) -> Vec<Segment> {
    let bytes = source.as_bytes();
    let mut result = Vec::new();
    let mut code_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if let Some((kind, end)) = non_code_at(bytes, i) {
            if code_start < i {
                result.push(Segment {
                    kind: SegmentKind::Code,
                    start: code_start,
                    end: i,
                });
            }
            result.push(Segment { kind, start: i, end });
            i = end;
            code_start = end;
            continue;
        }
        i += 1;
    }

    if code_start < bytes.len() {
        result.push(Segment {
            kind: SegmentKind::Code,
            start: code_start,
            end: bytes.len(),
        });
    }

    result
}

/// If `i` starts a string or comment, return the offset just past it.
pub fn skip_non_code(bytes: &[u8], i: usize) -> Option<usize> {
    non_code_at(bytes, i).map(|(_, end)| end)
}

fn non_code_at(bytes: &[u8], i: usize) -> Option<(SegmentKind, usize)> {
    match *bytes.get(i)? {
        b'/' if bytes.get(i + 1) == Some(&b'/') => {
            let mut j = i + 2;
            while j < bytes.len() && bytes[j] != b'\n' {
                j += 1;
            }
            Some((SegmentKind::LineComment, j))
        }
        b'/' if bytes.get(i + 1) == Some(&b'*') => {
            let mut j = i + 2;
            while j + 1 < bytes.len() {
                if bytes[j] == b'*' && bytes[j + 1] == b'/' {
                    return Some((SegmentKind::BlockComment, j + 2));
                }
                j += 1;
            }
            Some((SegmentKind::BlockComment, bytes.len()))
        }
        b'"' => {
            let mut j = i + 1;
            while j < bytes.len() && bytes[j] != b'"' && bytes[j] != b'\n' {
                if bytes[j] == b'\\' && bytes.get(j + 1).is_some_and(|&b| b != b'\n') {
                    j += 1;
                }
                j += 1;
            }
            if j < bytes.len() && bytes[j] == b'"' {
                j += 1;
            }
            Some((SegmentKind::String, j))
        }
        _ => None,
    }
}

/// Offset of the `)` matching the `(` at `open`, ignoring parentheses inside
/// strings and comments. `None` if the text ends first.
pub fn find_matching_paren(source: &str, open: usize) -> Option<usize> {
    let bytes = source.as_bytes();
    if bytes.get(open) != Some(&b'(') {
        return None;
    }
    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        if let Some(next) = skip_non_code(bytes, i) {
            i = next;
            continue;
        }
        match bytes[i] {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Split on `sep` where it appears in code at parenthesis depth zero.
///
/// Always returns at least one piece; an empty input yields `[""]`.
pub fn split_top_level(source: &str, sep: u8) -> Vec<&str> {
    let bytes = source.as_bytes();
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut piece_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if let Some(next) = skip_non_code(bytes, i) {
            i = next;
            continue;
        }
        match bytes[i] {
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            b if b == sep && depth == 0 => {
                pieces.push(&source[piece_start..i]);
                piece_start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    pieces.push(&source[piece_start..]);
    pieces
}

/// Offset of the first comment that starts in `line`, if any.
pub fn comment_start(line: &str) -> Option<usize> {
    segments(line)
        .into_iter()
        .find(|s| matches!(s.kind, SegmentKind::LineComment | SegmentKind::BlockComment))
        .map(|s| s.start)
}

/// For each line of `source` (as produced by `split_inclusive('\n')`), whether
/// the line begins inside a block comment opened on an earlier line.
pub fn lines_inside_block_comment(source: &str) -> Vec<bool> {
    let blocks: Vec<Segment> = segments(source)
        .into_iter()
        .filter(|s| s.kind == SegmentKind::BlockComment)
        .collect();

    let mut result = Vec::new();
    let mut offset = 0;
    let mut block = 0;
    for line in source.split_inclusive('\n') {
        while block < blocks.len() && blocks[block].end <= offset {
            block += 1;
        }
        let inside = blocks
            .get(block)
            .is_some_and(|b| b.start < offset && offset < b.end);
        result.push(inside);
        offset += line.len();
    }
    result
}

/// 1-based line number of a byte offset.
pub fn line_of(source: &str, offset: usize) -> usize {
    let end = offset.min(source.len());
    source.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
}
