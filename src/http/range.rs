use crate::error::AppError;

/// An inclusive byte span resolved against a blob of known length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
    pub total: u64,
}

impl ByteRange {
    /// Span length in bytes; a resolved range spans at least one byte
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// `Content-Range` header value for a 206 response
    pub fn content_range(&self) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, self.total)
    }
}

/// Parse a `Range` header against a blob of `total` bytes.
///
/// Returns `Ok(None)` when no range was requested (serve the full blob).
/// Supports the single-range forms `bytes=a-b`, `bytes=a-`, and `bytes=-n`;
/// anything else is ignored rather than rejected, per RFC 7233 an
/// unparseable Range header is treated as absent. A parseable range that
/// lies outside the blob is a 416.
pub fn parse_range(header: Option<&str>, total: u64) -> Result<Option<ByteRange>, AppError> {
    let Some(header) = header else {
        return Ok(None);
    };

    let Some(spec) = header.trim().strip_prefix("bytes=") else {
        return Ok(None);
    };

    // Single range only; multipart ranges are not served
    if spec.contains(',') {
        return Ok(None);
    }

    let Some((start_str, end_str)) = spec.split_once('-') else {
        return Ok(None);
    };

    let (start, end) = match (start_str.trim(), end_str.trim()) {
        // bytes=-n : final n bytes
        ("", suffix) => {
            let Ok(n) = suffix.parse::<u64>() else {
                return Ok(None);
            };
            if n == 0 || total == 0 {
                return Err(AppError::RangeNotSatisfiable { len: total });
            }
            (total.saturating_sub(n), total - 1)
        }
        // bytes=a- : from a to the end
        (start, "") => {
            let Ok(start) = start.parse::<u64>() else {
                return Ok(None);
            };
            if start >= total {
                return Err(AppError::RangeNotSatisfiable { len: total });
            }
            (start, total - 1)
        }
        // bytes=a-b
        (start, end) => {
            let (Ok(start), Ok(end)) = (start.parse::<u64>(), end.parse::<u64>()) else {
                return Ok(None);
            };
            if start > end || start >= total {
                return Err(AppError::RangeNotSatisfiable { len: total });
            }
            // Clamp an end past the blob to the last byte, per RFC
            (start, end.min(total - 1))
        }
    };

    Ok(Some(ByteRange { start, end, total }))
}
