//! HTTP Range request parsing module
//!
//! Single byte-range support (RFC 7233) for media and large bundles in the frontend.

/// Inclusive byte range resolved against a file size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    /// Number of bytes covered (a resolved range is never empty)
    pub const fn content_length(&self) -> usize {
        self.end - self.start + 1
    }
}

/// Range header parse result
#[derive(Debug, PartialEq, Eq)]
pub enum RangeParseResult {
    Valid(ByteRange),
    /// Should be answered with 416
    NotSatisfiable,
    /// No Range header, unsupported unit, or malformed: serve the full content
    None,
}

/// Parse a `Range` header (single range, bytes unit)
///
/// Accepted forms: `bytes=start-end`, `bytes=start-`, `bytes=-suffix`.
///
/// ```
/// use monocle::http::range::{parse_range_header, ByteRange, RangeParseResult};
///
/// assert_eq!(
///     parse_range_header(Some("bytes=0-99"), 1000),
///     RangeParseResult::Valid(ByteRange { start: 0, end: 99 })
/// );
/// assert_eq!(parse_range_header(None, 1000), RangeParseResult::None);
/// ```
pub fn parse_range_header(range_header: Option<&str>, file_size: usize) -> RangeParseResult {
    let Some(spec) = range_header.and_then(|h| h.trim().strip_prefix("bytes=")) else {
        return RangeParseResult::None;
    };
    if spec.contains(',') {
        return RangeParseResult::None;
    }
    let Some((first, last)) = spec.split_once('-') else {
        return RangeParseResult::None;
    };
    let (first, last) = (first.trim(), last.trim());

    if first.is_empty() {
        // Suffix range: last N bytes
        return match last.parse::<usize>() {
            Ok(0) => RangeParseResult::NotSatisfiable,
            Ok(_) if file_size == 0 => RangeParseResult::NotSatisfiable,
            Ok(suffix) => RangeParseResult::Valid(ByteRange {
                start: file_size.saturating_sub(suffix),
                end: file_size - 1,
            }),
            Err(_) => RangeParseResult::None,
        };
    }

    let Ok(start) = first.parse::<usize>() else {
        return RangeParseResult::None;
    };
    if start >= file_size {
        return RangeParseResult::NotSatisfiable;
    }

    let end = if last.is_empty() {
        file_size - 1
    } else {
        match last.parse::<usize>() {
            Ok(e) => e.min(file_size - 1),
            Err(_) => return RangeParseResult::None,
        }
    };

    if start > end {
        return RangeParseResult::NotSatisfiable;
    }
    RangeParseResult::Valid(ByteRange { start, end })
}
