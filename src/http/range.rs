//! HTTP Range request parsing module
//!
//! Single-range `bytes` parsing for media seeking, following RFC 7233.
//! A missing or unusable header falls back to `bytes=0-`, so every
//! satisfiable request is answered with a byte span of the file.

/// Range requested by the client, before the file size is known
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSpec {
    /// `bytes=start-end` or `bytes=start-`
    FromTo {
        /// First byte position
        start: u64,
        /// Last byte position, None means until end of file
        end: Option<u64>,
    },
    /// `bytes=-suffix`: the last `suffix` bytes
    Suffix(u64),
}

/// Range served when the request does not carry a usable one
pub const WHOLE_FILE: RangeSpec = RangeSpec::FromTo {
    start: 0,
    end: None,
};

impl RangeSpec {
    /// Parse the value of a `Range` header.
    ///
    /// Returns `None` for anything this server does not honor: other units,
    /// multi-range lists and non-numeric positions.
    ///
    /// # Examples
    /// ```
    /// use media_range_server::http::range::RangeSpec;
    ///
    /// assert_eq!(
    ///     RangeSpec::parse("bytes=100-"),
    ///     Some(RangeSpec::FromTo { start: 100, end: None })
    /// );
    /// assert_eq!(RangeSpec::parse("bytes=-20"), Some(RangeSpec::Suffix(20)));
    /// assert_eq!(RangeSpec::parse("items=0-1"), None);
    /// ```
    #[must_use]
    pub fn parse(header: &str) -> Option<Self> {
        // Range units are case-insensitive
        let (unit, spec) = header.trim().split_once('=')?;
        if !unit.trim().eq_ignore_ascii_case("bytes") {
            return None;
        }

        // Only support single range (not multi-range)
        if spec.contains(',') {
            return None;
        }

        let (start_str, end_str) = spec.split_once('-')?;
        let (start_str, end_str) = (start_str.trim(), end_str.trim());

        if start_str.is_empty() {
            return end_str.parse().ok().map(Self::Suffix);
        }

        let start = start_str.parse().ok()?;
        let end = if end_str.is_empty() {
            None
        } else {
            Some(end_str.parse().ok()?)
        };

        Some(Self::FromTo { start, end })
    }

    /// Resolve against the current file size.
    ///
    /// `None` means the range cannot be satisfied: start at or past EOF,
    /// an inverted range, a zero-length suffix, or any range over an empty
    /// file. An end past EOF is clamped to the last byte.
    #[must_use]
    pub fn resolve(self, total_size: u64) -> Option<ResolvedRange> {
        let last = total_size.checked_sub(1)?;
        match self {
            Self::FromTo { start, end } => {
                let end = end.map_or(last, |e| e.min(last));
                ResolvedRange::new(start, end, total_size)
            }
            Self::Suffix(0) => None,
            // Suffix larger than file is valid, just return whole file as range
            Self::Suffix(suffix) => {
                ResolvedRange::new(total_size.saturating_sub(suffix), last, total_size)
            }
        }
    }
}

/// Byte span that will actually be sent
///
/// Always satisfies `start <= end < total_size`, so `chunk_size()` is never
/// zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRange {
    start: u64,
    end: u64,
    total_size: u64,
}

impl ResolvedRange {
    /// Build a range, or `None` if `start <= end < total_size` does not hold
    #[must_use]
    pub const fn new(start: u64, end: u64, total_size: u64) -> Option<Self> {
        if start <= end && end < total_size {
            Some(Self {
                start,
                end,
                total_size,
            })
        } else {
            None
        }
    }

    #[inline]
    #[must_use]
    pub const fn start(&self) -> u64 {
        self.start
    }

    #[inline]
    #[must_use]
    pub const fn end(&self) -> u64 {
        self.end
    }

    #[inline]
    #[must_use]
    pub const fn total_size(&self) -> u64 {
        self.total_size
    }

    /// Number of bytes in the span (`Content-Length`)
    #[inline]
    #[must_use]
    pub const fn chunk_size(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Value of the `Content-Range` header
    #[must_use]
    pub fn content_range(&self) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, self.total_size)
    }
}

/// Range header parse result
#[derive(Debug, PartialEq, Eq)]
pub enum RangeParseResult {
    /// Span to serve with 206
    Valid(ResolvedRange),
    /// Nothing in the file matches the request - should return 416
    NotSatisfiable,
}

/// Parse an optional `Range` header against a file of `total_size` bytes.
///
/// A missing header and a header this server does not honor are both
/// treated as `bytes=0-`.
///
/// # Examples
/// ```
/// use media_range_server::http::range::{parse_range_header, RangeParseResult};
///
/// let RangeParseResult::Valid(range) = parse_range_header(Some("bytes=0-99"), 1000) else {
///     panic!("expected a valid range");
/// };
/// assert_eq!(range.chunk_size(), 100);
///
/// // No Range header: whole file
/// let RangeParseResult::Valid(range) = parse_range_header(None, 1000) else {
///     panic!("expected a valid range");
/// };
/// assert_eq!(range.content_range(), "bytes 0-999/1000");
/// ```
#[must_use]
pub fn parse_range_header(range_header: Option<&str>, total_size: u64) -> RangeParseResult {
    let spec = range_header.and_then(RangeSpec::parse).unwrap_or(WHOLE_FILE);
    spec.resolve(total_size)
        .map_or(RangeParseResult::NotSatisfiable, RangeParseResult::Valid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid(header: Option<&str>, total: u64) -> ResolvedRange {
        match parse_range_header(header, total) {
            RangeParseResult::Valid(r) => r,
            RangeParseResult::NotSatisfiable => panic!("Expected Valid for {header:?}"),
        }
    }

    #[test]
    fn test_no_range_serves_whole_file() {
        let r = valid(None, 100);
        assert_eq!((r.start(), r.end()), (0, 99));
        assert_eq!(r.chunk_size(), 100);
        assert_eq!(r.content_range(), "bytes 0-99/100");
    }

    #[test]
    fn test_standard_range() {
        let r = valid(Some("bytes=0-9"), 100);
        assert_eq!((r.start(), r.end()), (0, 9));
        assert_eq!(r.chunk_size(), 10);
    }

    #[test]
    fn test_open_range() {
        let r = valid(Some("bytes=100-"), 1000);
        assert_eq!((r.start(), r.end()), (100, 999));
        assert_eq!(r.chunk_size(), 900);
    }

    #[test]
    fn test_single_byte() {
        let r = valid(Some("bytes=0-0"), 100);
        assert_eq!(r.chunk_size(), 1);
        let r = valid(Some("bytes=99-99"), 100);
        assert_eq!(r.chunk_size(), 1);
        assert_eq!(r.content_range(), "bytes 99-99/100");
    }

    #[test]
    fn test_suffix_range() {
        let r = valid(Some("bytes=-20"), 100);
        assert_eq!((r.start(), r.end()), (80, 99));

        // Larger than the file: whole file
        let r = valid(Some("bytes=-500"), 100);
        assert_eq!((r.start(), r.end()), (0, 99));
    }

    #[test]
    fn test_end_clamped_to_file() {
        let r = valid(Some("bytes=50-5000"), 100);
        assert_eq!((r.start(), r.end()), (50, 99));
    }

    #[test]
    fn test_not_satisfiable() {
        for header in ["bytes=200-", "bytes=100-100", "bytes=-0"] {
            assert_eq!(
                parse_range_header(Some(header), 100),
                RangeParseResult::NotSatisfiable,
                "{header}"
            );
        }
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        assert_eq!(
            parse_range_header(Some("bytes=50-10"), 100),
            RangeParseResult::NotSatisfiable
        );
    }

    #[test]
    fn test_empty_file_is_degenerate() {
        // bytes=0- on a zero-byte file would be `0--1/0`; it gets 416 instead
        assert_eq!(parse_range_header(None, 0), RangeParseResult::NotSatisfiable);
        assert_eq!(
            parse_range_header(Some("bytes=0-"), 0),
            RangeParseResult::NotSatisfiable
        );
        assert_eq!(
            parse_range_header(Some("bytes=-10"), 0),
            RangeParseResult::NotSatisfiable
        );
    }

    #[test]
    fn test_malformed_falls_back_to_whole_file() {
        for header in [
            "bytes=a-b",
            "bytes=-",
            "bytes=5",
            "bytes=0-9,20-29",
            "items=0-9",
            "",
        ] {
            let r = valid(Some(header), 100);
            assert_eq!((r.start(), r.end()), (0, 99), "{header}");
        }
    }

    #[test]
    fn test_whitespace_tolerated() {
        assert_eq!(
            RangeSpec::parse(" bytes= 10 - 20 "),
            Some(RangeSpec::FromTo {
                start: 10,
                end: Some(20)
            })
        );
    }

    #[test]
    fn test_unit_is_case_insensitive() {
        let r = valid(Some("Bytes=0-9"), 100);
        assert_eq!((r.start(), r.end()), (0, 9));
        let r = valid(Some("BYTES=-5"), 100);
        assert_eq!((r.start(), r.end()), (95, 99));
        assert_eq!(RangeSpec::parse("bytesx=0-9"), None);
    }

    #[test]
    fn test_resolved_range_invariant() {
        assert!(ResolvedRange::new(0, 0, 1).is_some());
        assert!(ResolvedRange::new(1, 0, 10).is_none());
        assert!(ResolvedRange::new(0, 10, 10).is_none());
        assert!(ResolvedRange::new(0, 0, 0).is_none());
    }
}
