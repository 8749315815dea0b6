use std::error::Error as StdError;
use std::io;
use std::sync::Arc;
use std::time::SystemTime;

use bytes::Buf;
use headers::HeaderMapExt;
use http::{Request, Response, StatusCode};
use http_body::Body as HttpBody;

use super::status_response;
use crate::body::Body;
use crate::davheaders::{
    ByteRangeSpec, RangeParseError, XUpdateRange, APPLICATION_SABREDAV_PARTIALUPDATE,
};
use crate::errors::{DavError, DavResult};
use crate::fs::{DavFile, DavFileSystem, FsError, OpenOptions, SeekFrom};
use crate::ls::{DavLockSystem, LockDetails, LockError};

// The write mode resolved from X-Update-Range, content length and
// current resource size. Request-scoped, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UpdateWindow {
    Append,
    Window(ByteWindow),
}

// Absolute inclusive byte window within the resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ByteWindow {
    start: u64,
    end: u64,
}

// Temporary exclusive lock held for the duration of one PATCH request.
// Dropping the guard releases the lock, on every exit path.
struct LockGuard {
    ls: Arc<dyn DavLockSystem>,
    token: Option<String>,
    at: SystemTime,
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if let Some(token) = self.token.take() {
            let _ = self.ls.unlock(self.at, &token);
        }
    }
}

// The lock gate. The client hasn't previously created locks (a nonempty
// `If` header is refused outright), but the resource may still be locked
// by another client. So a temporary lock is created that would conflict
// with another client's locks, and released at the end of the request.
fn confirm_lock(
    ls: &Arc<dyn DavLockSystem>,
    req: &Request<()>,
    path: &str,
) -> DavResult<LockGuard> {
    if req.headers().get("If").map_or(false, |v| !v.is_empty()) {
        return Err(DavError::NotImplemented("`If` header lock tokens are not supported"));
    }
    let at = SystemTime::now();
    if path.is_empty() {
        // Nothing to lock; the guard release is a no-op.
        return Ok(LockGuard {
            ls: ls.clone(),
            token: None,
            at,
        });
    }
    let token = ls
        .create(
            at,
            LockDetails {
                root: path.to_string(),
                duration: None,
                zero_depth: true,
            },
        )
        .map_err(|e| match e {
            LockError::Locked => DavError::Locked,
            LockError::Failure => DavError::LockFailure,
        })?;
    Ok(LockGuard {
        ls: ls.clone(),
        token: Some(token),
        at,
    })
}

// Only the wildcard forms of If-Match / If-None-Match are supported.
fn check_preconditions(req: &Request<()>, exists: bool) -> DavResult<()> {
    if let Some(if_match) = req.headers().get("If-Match") {
        if if_match.as_bytes() != b"*" {
            return Err(DavError::NotImplemented("only `If-Match: *` is supported"));
        }
        if !exists {
            return Err(DavError::PreconditionFailed);
        }
    }
    if let Some(if_none_match) = req.headers().get("If-None-Match") {
        if if_none_match.as_bytes() != b"*" {
            return Err(DavError::NotImplemented(
                "only `If-None-Match: *` is supported",
            ));
        }
        if exists {
            return Err(DavError::PreconditionFailed);
        }
    }
    Ok(())
}

// The range resolver: combine the parsed header with the declared
// content length and the current size of the resource into an
// absolute write window.
fn resolve_range(range: XUpdateRange, length: i64, cur_size: u64) -> DavResult<UpdateWindow> {
    let spec = match range {
        XUpdateRange::Append => return Ok(UpdateWindow::Append),
        XUpdateRange::Bytes(spec) => spec,
    };
    // A header near i64::MAX is syntactically valid; the derived end
    // position must not silently wrap.
    let end_of = |start: i64| {
        start
            .checked_add(length)
            .and_then(|end| end.checked_sub(1))
            .ok_or(DavError::BadRange("write window exceeds the addressable range"))
    };
    let (start, end) = match spec {
        ByteRangeSpec::FromTo(start, end) => (start, end),
        ByteRangeSpec::AllFrom(start) => (start, end_of(start)?),
        ByteRangeSpec::FromEndOffset(offset) => {
            let start = (cur_size as i64)
                .checked_sub(offset)
                .ok_or(DavError::BadRange("write window exceeds the addressable range"))?;
            (start, end_of(start)?)
        }
    };
    // The end position is redundant next to Content-Length. Treat a
    // mismatch as invalid input rather than guessing which one wins.
    if end - start != length - 1 {
        return Err(DavError::BadRange("end position does not match the content length"));
    }
    if start < 0 {
        return Err(DavError::BadRange("write window starts before position 0"));
    }
    Ok(UpdateWindow::Window(ByteWindow {
        start: start as u64,
        end: end as u64,
    }))
}

// Drain the request body into the open file.
async fn copy_body<ReqBody, ReqData, ReqError>(
    file: &mut dyn DavFile,
    body: ReqBody,
) -> DavResult<()>
where
    ReqBody: HttpBody<Data = ReqData, Error = ReqError> + Send,
    ReqData: Buf + Send + 'static,
    ReqError: StdError + Send + Sync + 'static,
{
    pin_utils::pin_mut!(body);
    while let Some(chunk) = body.data().await {
        let buf = chunk.map_err(|_| {
            DavError::IoError(io::Error::new(io::ErrorKind::UnexpectedEof, "UnexpectedEof"))
        })?;
        file.write_buf(Box::new(buf)).await.map_err(|e| {
            debug!("patch: write failed: {e}");
            DavError::Status(StatusCode::INTERNAL_SERVER_ERROR)
        })?;
    }
    file.flush().await.map_err(|e| {
        debug!("patch: flush failed: {e}");
        DavError::Status(StatusCode::INTERNAL_SERVER_ERROR)
    })?;
    Ok(())
}

impl crate::PatchHandler {
    // https://sabre.io/dav/http-patch/
    pub(crate) async fn handle_patch<ReqBody, ReqData, ReqError>(
        &self,
        req: &Request<()>,
        body: ReqBody,
        fs: &Arc<dyn DavFileSystem>,
        ls: &Arc<dyn DavLockSystem>,
        path: &str,
    ) -> DavResult<Response<Body>>
    where
        ReqBody: HttpBody<Data = ReqData, Error = ReqError> + Send,
        ReqData: Buf + Send + 'static,
        ReqError: StdError + Send + Sync + 'static,
    {
        // Serialize against other writers before reading any body bytes.
        let _lock = confirm_lock(ls, req, path)?;

        // Existence and size are re-queried on every request; caching
        // them would break the precondition semantics.
        let (exists, cur_size) = match fs.metadata(path).await {
            Ok(meta) => (true, meta.len()),
            Err(FsError::NotFound) => (false, 0),
            Err(e) => {
                debug!("patch: stat failed on {:?}: {}", path, e);
                return Err(DavError::FsError(e));
            }
        };

        check_preconditions(req, exists)?;

        match req.headers().get("Content-Type") {
            Some(ct) if ct.as_bytes() == APPLICATION_SABREDAV_PARTIALUPDATE.as_bytes() => {}
            _ => return Err(DavError::UnsupportedMediaType),
        }

        let length = req
            .headers()
            .typed_get::<headers::ContentLength>()
            .and_then(|l| i64::try_from(l.0).ok())
            .ok_or(DavError::LengthRequired)?;

        let range = req
            .headers()
            .get("X-Update-Range")
            .and_then(|v| v.to_str().ok())
            .ok_or(DavError::BadRange("the header must be `bytes=` or `append`"))?
            .parse::<XUpdateRange>()
            .map_err(|e| match e {
                RangeParseError::BadFormat => {
                    DavError::BadRange("the header must be `bytes=` or `append`")
                }
                RangeParseError::Empty => DavError::RangeNotSatisfiable("empty byte range"),
                RangeParseError::NotANumber => {
                    DavError::RangeNotSatisfiable("byte positions must be integers")
                }
            })?;

        let window = resolve_range(range, length, cur_size)?;
        let status = self.patch_write(fs, path, exists, window, body).await?;
        Ok(status_response(status))
    }

    // The patch writer: append to, or overwrite a window of, the
    // resource, creating it if absent. A short or long body is not
    // validated against the declared length here; the resolver has
    // already pinned the window, and the copy writes what it gets.
    async fn patch_write<ReqBody, ReqData, ReqError>(
        &self,
        fs: &Arc<dyn DavFileSystem>,
        path: &str,
        exists: bool,
        window: UpdateWindow,
        body: ReqBody,
    ) -> DavResult<StatusCode>
    where
        ReqBody: HttpBody<Data = ReqData, Error = ReqError> + Send,
        ReqData: Buf + Send + 'static,
        ReqError: StdError + Send + Sync + 'static,
    {
        let options = match window {
            UpdateWindow::Append => OpenOptions::append(),
            UpdateWindow::Window(_) => OpenOptions::write(),
        };
        let mut file = fs.open(path, options).await.map_err(DavError::OpenDenied)?;

        if let UpdateWindow::Window(w) = window {
            trace!("patch: write window {}..={} on {:?}", w.start, w.end, path);
            file.seek(SeekFrom::Start(w.start)).await.map_err(|e| {
                debug!("patch: seek failed: {e}");
                DavError::Status(StatusCode::INTERNAL_SERVER_ERROR)
            })?;
        } else {
            trace!("patch: append on {:?}", path);
        }

        copy_body(file.as_mut(), body).await?;

        if exists {
            Ok(StatusCode::OK)
        } else {
            Ok(StatusCode::CREATED)
        }
    }
}
