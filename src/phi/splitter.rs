//! Segment splitting for converted PHI text.

/// Lines of one segment, right-trimmed, with their 1-based starting line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSegment {
    pub first_line: usize,
    pub lines: Vec<String>,
}

/// Split text into a header segment and one segment per separator line
///
/// The separator line opens its segment. The header segment is always
/// present, empty when the text starts with a separator.
pub fn split_segments(text: &str, separator: &str) -> Vec<TextSegment> {
    let mut segments = vec![TextSegment {
        first_line: 1,
        lines: Vec::new(),
    }];

    for (index, line) in text.lines().enumerate() {
        if line.starts_with(separator) {
            segments.push(TextSegment {
                first_line: index + 1,
                lines: Vec::new(),
            });
        }
        if let Some(current) = segments.last_mut() {
            current.lines.push(line.trim_end().to_string());
        }
    }

    segments
}
