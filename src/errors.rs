//
// The error type of the patch handler, and its mapping to
// HTTP status codes.
//
use std::error::Error;
use std::fmt;
use std::io;

use http::StatusCode;

use crate::davheaders::APPLICATION_SABREDAV_PARTIALUPDATE;
use crate::fs::FsError;

pub(crate) type DavResult<T> = Result<T, DavError>;

/// Error returned by the patch handler internals.
///
/// Every variant maps to exactly one HTTP status code (see
/// [`statuscode`](DavError::statuscode)). The handler never retries;
/// each error is terminal for the request it occurred in.
#[derive(Debug)]
#[non_exhaustive]
pub enum DavError {
    /// A plain status code with no further cause attached.
    Status(StatusCode),
    /// Malformed or inconsistent `X-Update-Range` value (400).
    BadRange(&'static str),
    /// Unparseable or empty numeric range fields (416).
    RangeNotSatisfiable(&'static str),
    /// Unsupported conditional header form (501).
    NotImplemented(&'static str),
    /// A conflicting lock is held by another client (423).
    Locked,
    /// Wildcard `If-Match`/`If-None-Match` semantics violated (412).
    PreconditionFailed,
    /// The request content type is not the partial-update type (415).
    UnsupportedMediaType,
    /// Missing or non-numeric `Content-Length` (411).
    LengthRequired,
    /// The target resource could not be opened for writing (405).
    OpenDenied(FsError),
    /// Lock creation failed for a reason other than a conflict (500).
    LockFailure,
    /// Error from the filesystem collaborator (404 for a missing
    /// resource, 500 for anything else).
    FsError(FsError),
    /// I/O error while transferring the request body (500).
    IoError(io::Error),
}

impl fmt::Display for DavError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DavError::Status(status) => write!(f, "{status}"),
            DavError::BadRange(msg) => write!(f, "X-Update-Range: {msg}"),
            DavError::RangeNotSatisfiable(msg) => write!(f, "X-Update-Range: {msg}"),
            DavError::NotImplemented(msg) => write!(f, "{msg}"),
            DavError::Locked => write!(f, "a conflicting lock is held on the resource"),
            DavError::PreconditionFailed => write!(f, "precondition failed"),
            DavError::UnsupportedMediaType => {
                write!(f, "content type must be {APPLICATION_SABREDAV_PARTIALUPDATE}")
            }
            DavError::LengthRequired => write!(f, "missing or invalid Content-Length"),
            DavError::OpenDenied(e) => write!(f, "resource cannot be opened for writing: {e}"),
            DavError::LockFailure => write!(f, "lock creation failed"),
            DavError::FsError(e) => write!(f, "filesystem error: {e}"),
            DavError::IoError(e) => write!(f, "io error: {e}"),
        }
    }
}

impl Error for DavError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DavError::OpenDenied(e) | DavError::FsError(e) => Some(e),
            DavError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FsError> for DavError {
    fn from(e: FsError) -> Self {
        DavError::FsError(e)
    }
}

impl From<io::Error> for DavError {
    fn from(e: io::Error) -> Self {
        DavError::IoError(e)
    }
}

impl DavError {
    /// The HTTP status code this error maps to.
    pub fn statuscode(&self) -> StatusCode {
        match self {
            DavError::Status(status) => *status,
            DavError::BadRange(_) => StatusCode::BAD_REQUEST,
            DavError::RangeNotSatisfiable(_) => StatusCode::RANGE_NOT_SATISFIABLE,
            DavError::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            DavError::Locked => StatusCode::LOCKED,
            DavError::PreconditionFailed => StatusCode::PRECONDITION_FAILED,
            DavError::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            DavError::LengthRequired => StatusCode::LENGTH_REQUIRED,
            DavError::OpenDenied(_) => StatusCode::METHOD_NOT_ALLOWED,
            DavError::LockFailure => StatusCode::INTERNAL_SERVER_ERROR,
            DavError::FsError(FsError::NotFound) => StatusCode::NOT_FOUND,
            DavError::FsError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            DavError::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
