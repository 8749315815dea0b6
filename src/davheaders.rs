//! Parsing for the `X-Update-Range` request header.
//!
//! This is the header SabreDAV defined for partial updates,
//! <https://sabre.io/dav/http-patch/>.

use std::str::FromStr;

/// The content type required on partial-update PATCH requests.
pub(crate) const APPLICATION_SABREDAV_PARTIALUPDATE: &str = "application/x-sabredav-partialupdate";

/// A parsed `X-Update-Range` header value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum XUpdateRange {
    /// `append`: the write starts at the current end of the resource.
    Append,
    /// `bytes=..`: a byte range in one of three forms.
    Bytes(ByteRangeSpec),
}

/// The range token of a `bytes=` specification. Positions are kept signed
/// so that window resolution can detect underflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ByteRangeSpec {
    /// `bytes=A-B`: explicit inclusive window.
    FromTo(i64, i64),
    /// `bytes=A-`: start position only, the end follows from the content length.
    AllFrom(i64),
    /// `bytes=-B`: B is an offset subtracted from the current resource size.
    ///
    /// Note that this is not the common "last B bytes" suffix-range reading:
    /// the write starts at `current_size - B`.
    FromEndOffset(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RangeParseError {
    /// Not `append`, and not a single `A-B` token behind `bytes=`.
    BadFormat,
    /// `bytes=-`: neither position given.
    Empty,
    /// A position that is present but not an integer.
    NotANumber,
}

impl FromStr for XUpdateRange {
    type Err = RangeParseError;

    fn from_str(s: &str) -> Result<XUpdateRange, RangeParseError> {
        if s == "append" {
            return Ok(XUpdateRange::Append);
        }
        let spec = s.strip_prefix("bytes=").ok_or(RangeParseError::BadFormat)?;
        let parts: Vec<&str> = spec.split('-').collect();
        let &[start, end] = parts.as_slice() else {
            return Err(RangeParseError::BadFormat);
        };
        let num = |s: &str| s.parse::<i64>().map_err(|_| RangeParseError::NotANumber);
        match (start.is_empty(), end.is_empty()) {
            (true, true) => Err(RangeParseError::Empty),
            (false, true) => Ok(XUpdateRange::Bytes(ByteRangeSpec::AllFrom(num(start)?))),
            (true, false) => Ok(XUpdateRange::Bytes(ByteRangeSpec::FromEndOffset(num(end)?))),
            (false, false) => Ok(XUpdateRange::Bytes(ByteRangeSpec::FromTo(
                num(start)?,
                num(end)?,
            ))),
        }
    }
}
