//
// This module contains the main entry point of the library,
// PatchHandler.
//
use std::error::Error as StdError;
use std::future::Future;
use std::io;
use std::sync::Arc;

use bytes::Buf;
use futures_util::future::BoxFuture;
use http::{Method, Request, Response, StatusCode};
use http_body::Body as HttpBody;
use percent_encoding::percent_decode_str;

use crate::body::Body;
use crate::errors::{DavError, DavResult};
use crate::fs::DavFileSystem;
use crate::ls::DavLockSystem;

pub mod handle_options;
pub mod handle_patch;

/// The wrapped base handler: a complete RFC 4918 WebDAV handler.
///
/// Every request the patch handler does not serve itself is handed to
/// this handler unmodified. Implemented for async closures, so a fake
/// can be plugged in just as easily as a real server.
pub trait WebDavHandler: Send + Sync + 'static {
    fn handle(&self, req: Request<Body>) -> BoxFuture<'static, Response<Body>>;
}

impl<F, R> WebDavHandler for F
where
    F: Fn(Request<Body>) -> R + Send + Sync + 'static,
    R: Future<Output = Response<Body>> + Send + 'static,
{
    fn handle(&self, req: Request<Body>) -> BoxFuture<'static, Response<Body>> {
        Box::pin((self)(req))
    }
}

/// Callback invoked after every locally handled request, with the error
/// that produced the response status, if any. Best effort; it cannot
/// change the response.
pub type RequestLogger = Arc<dyn Fn(&Request<()>, Option<&DavError>) + Send + Sync>;

/// Configuration of the handler.
#[derive(Clone)]
pub struct PatchBuilder {
    /// Prefix to be stripped off when handling a request.
    prefix: String,
    /// The wrapped base WebDAV handler.
    base: Arc<dyn WebDavHandler>,
    /// Filesystem backend. Without it, everything is passed through.
    fs: Option<Arc<dyn DavFileSystem>>,
    /// Locksystem backend. Without it, everything is passed through.
    ls: Option<Arc<dyn DavLockSystem>>,
    /// Only affects the OPTIONS capability sets.
    read_only: bool,
    /// Request logging callback.
    logger: Option<RequestLogger>,
}

impl PatchBuilder {
    /// Create a new configuration builder around a base handler.
    pub fn new(base: impl WebDavHandler) -> PatchBuilder {
        PatchBuilder {
            prefix: String::new(),
            base: Arc::new(base),
            fs: None,
            ls: None,
            read_only: false,
            logger: None,
        }
    }

    /// Use the configuration that was built to generate a PatchHandler.
    pub fn build(self) -> PatchHandler {
        self.into()
    }

    /// Prefix to be stripped off before translating the rest of
    /// the request path to a filesystem path.
    pub fn strip_prefix(self, prefix: impl Into<String>) -> Self {
        let mut this = self;
        this.prefix = prefix.into();
        this
    }

    /// Set the filesystem to write through.
    pub fn filesystem(self, fs: Arc<dyn DavFileSystem>) -> Self {
        let mut this = self;
        this.fs = Some(fs);
        this
    }

    /// Set the locksystem to use.
    pub fn locksystem(self, ls: Arc<dyn DavLockSystem>) -> Self {
        let mut this = self;
        this.ls = Some(ls);
        this
    }

    /// Advertise read-only capability sets on OPTIONS (default false).
    pub fn read_only(self, read_only: bool) -> Self {
        let mut this = self;
        this.read_only = read_only;
        this
    }

    /// Set a callback that is invoked after every locally handled request.
    pub fn logger<F>(self, logger: F) -> Self
    where
        F: Fn(&Request<()>, Option<&DavError>) + Send + Sync + 'static,
    {
        let mut this = self;
        this.logger = Some(Arc::new(logger));
        this
    }
}

/// The partial-update handler.
///
/// Serves `PATCH` (SabreDAV partial updates) and `OPTIONS` itself when
/// both a filesystem and a locksystem are configured, and forwards
/// everything else to the wrapped base handler.
#[derive(Clone)]
pub struct PatchHandler {
    pub(crate) prefix: Arc<String>,
    pub(crate) base: Arc<dyn WebDavHandler>,
    pub(crate) fs: Option<Arc<dyn DavFileSystem>>,
    pub(crate) ls: Option<Arc<dyn DavLockSystem>>,
    pub(crate) read_only: bool,
    pub(crate) logger: Option<RequestLogger>,
}

impl From<PatchBuilder> for PatchHandler {
    fn from(cfg: PatchBuilder) -> Self {
        Self {
            prefix: Arc::new(cfg.prefix),
            base: cfg.base,
            fs: cfg.fs,
            ls: cfg.ls,
            read_only: cfg.read_only,
            logger: cfg.logger,
        }
    }
}

impl PatchHandler {
    /// Return a configuration builder.
    pub fn builder(base: impl WebDavHandler) -> PatchBuilder {
        PatchBuilder::new(base)
    }

    /// Handle a request.
    ///
    /// `OPTIONS` and `PATCH` are handled here when both collaborators
    /// are configured; any other request goes to the base handler.
    pub async fn handle<ReqBody, ReqData, ReqError>(&self, req: Request<ReqBody>) -> Response<Body>
    where
        ReqBody: HttpBody<Data = ReqData, Error = ReqError> + Send + 'static,
        ReqData: Buf + Send + 'static,
        ReqError: StdError + Send + Sync + 'static,
    {
        if let (Some(fs), Some(ls)) = (&self.fs, &self.ls) {
            if req.method() == Method::OPTIONS || req.method() == Method::PATCH {
                return self.handle_inner(req, fs, ls).await;
            }
        }
        debug!("passing {} {} on to the base handler", req.method(), req.uri());
        self.base.handle(stream_request(req)).await
    }

    // internal dispatcher.
    async fn handle_inner<ReqBody, ReqData, ReqError>(
        &self,
        req: Request<ReqBody>,
        fs: &Arc<dyn DavFileSystem>,
        ls: &Arc<dyn DavLockSystem>,
    ) -> Response<Body>
    where
        ReqBody: HttpBody<Data = ReqData, Error = ReqError> + Send,
        ReqData: Buf + Send + 'static,
        ReqError: StdError + Send + Sync + 'static,
    {
        let (parts, body) = req.into_parts();
        let req = Request::from_parts(parts, ());

        debug!("== START REQUEST {} {}", req.method(), req.uri());

        let result = match self.strip_prefix(req.uri().path()) {
            Ok(path) if req.method() == Method::PATCH => {
                self.handle_patch(&req, body, fs, ls, &path).await
            }
            Ok(path) => self.handle_options(&req, fs, &path).await,
            Err(e) => Err(e),
        };

        let (resp, err) = match result {
            Ok(resp) => (resp, None),
            Err(e) => (status_response(e.statuscode()), Some(e)),
        };

        debug!("== END REQUEST result {}", resp.status());

        if let Some(logger) = &self.logger {
            logger(&req, err.as_ref());
        }
        resp
    }

    // Resolve the request path: strip the configured prefix, then
    // percent-decode the remainder.
    fn strip_prefix(&self, path: &str) -> DavResult<String> {
        let path = if self.prefix.is_empty() {
            path
        } else {
            match path.strip_prefix(self.prefix.as_str()) {
                Some(p) => p,
                None => return Err(DavError::Status(StatusCode::NOT_FOUND)),
            }
        };
        Ok(percent_decode_str(path).decode_utf8_lossy().into_owned())
    }
}

// Build a response carrying the short plain-text reason phrase for
// `status`, unless the status means "no content".
pub(crate) fn status_response(status: StatusCode) -> Response<Body> {
    let body = if status == StatusCode::NO_CONTENT {
        Body::empty()
    } else {
        Body::from(status.canonical_reason().unwrap_or(""))
    };
    let mut resp = Response::new(body);
    *resp.status_mut() = status;
    resp
}

// Re-wrap a generic request body as a crate `Body` so the request can
// be handed to the base handler trait object.
fn stream_request<ReqBody, ReqData, ReqError>(req: Request<ReqBody>) -> Request<Body>
where
    ReqBody: HttpBody<Data = ReqData, Error = ReqError> + Send + 'static,
    ReqData: Buf + Send + 'static,
    ReqError: StdError + Send + Sync + 'static,
{
    let (parts, body) = req.into_parts();
    let stream = async_stream::stream! {
        pin_utils::pin_mut!(body);
        while let Some(chunk) = body.data().await {
            match chunk {
                Ok(mut buf) => yield Ok(buf.copy_to_bytes(buf.remaining())),
                Err(e) => {
                    yield Err(io::Error::new(io::ErrorKind::UnexpectedEof, e.to_string()));
                    break;
                }
            }
        }
    };
    Request::from_parts(parts, Body::stream(stream))
}

#[cfg(all(test, feature = "memfs"))]
mod tests {
    use super::*;
    use crate::fs::memfs::MemFs;
    use crate::ls::memls::MemLs;
    use crate::ls::LockDetails;
    use futures_util::StreamExt;
    use parking_lot::Mutex;
    use std::time::SystemTime;

    fn base_handler() -> impl WebDavHandler {
        |_req: Request<Body>| async {
            Response::builder()
                .status(StatusCode::BAD_GATEWAY)
                .body(Body::from("base"))
                .unwrap()
        }
    }

    fn handler(fs: Arc<MemFs>, ls: Arc<MemLs>) -> PatchHandler {
        PatchHandler::builder(base_handler())
            .strip_prefix("/dav")
            .filesystem(fs)
            .locksystem(ls)
            .build()
    }

    fn patch(path: &str, range: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::PATCH)
            .uri(path)
            .header("Content-Type", "application/x-sabredav-partialupdate")
            .header("Content-Length", body.len().to_string())
            .header("X-Update-Range", range)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn options(path: &str) -> Request<Body> {
        Request::builder()
            .method(Method::OPTIONS)
            .uri(path)
            .body(Body::empty())
            .unwrap()
    }

    async fn collect(body: Body) -> Vec<u8> {
        let mut body = body;
        let mut out = Vec::new();
        while let Some(chunk) = body.next().await {
            out.extend_from_slice(&chunk.unwrap());
        }
        out
    }

    fn allow(resp: &Response<Body>) -> &str {
        resp.headers().get("Allow").unwrap().to_str().unwrap()
    }

    #[tokio::test]
    async fn options_on_unmapped_resource() {
        let h = handler(MemFs::new(), MemLs::new());
        let resp = h.handle(options("/dav/none")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(allow(&resp), "OPTIONS, LOCK, PUT, MKCOL");
        assert_eq!(
            resp.headers().get("DAV").unwrap(),
            "1, 2, sabredav-partialupdate"
        );
        assert_eq!(resp.headers().get("MS-Author-Via").unwrap(), "DAV");
        assert!(collect(resp.into_body()).await.is_empty());
    }

    #[tokio::test]
    async fn options_capability_sets() {
        let fs = MemFs::new();
        fs.create_dir("/d");
        fs.create_file("/f", b"x");

        let h = handler(fs.clone(), MemLs::new());
        let resp = h.handle(options("/dav/d")).await;
        assert_eq!(
            allow(&resp),
            "OPTIONS, LOCK, DELETE, PROPPATCH, COPY, MOVE, UNLOCK, PROPFIND"
        );
        let resp = h.handle(options("/dav/f")).await;
        assert_eq!(
            allow(&resp),
            "OPTIONS, LOCK, GET, HEAD, POST, DELETE, PROPPATCH, COPY, MOVE, UNLOCK, PROPFIND, PUT, PATCH"
        );

        let h = PatchHandler::builder(base_handler())
            .strip_prefix("/dav")
            .filesystem(fs)
            .locksystem(MemLs::new())
            .read_only(true)
            .build();
        let resp = h.handle(options("/dav/d")).await;
        assert_eq!(allow(&resp), "OPTIONS, COPY, PROPFIND");
        let resp = h.handle(options("/dav/f")).await;
        assert_eq!(allow(&resp), "OPTIONS, GET, HEAD, POST, PROPFIND");
    }

    #[tokio::test]
    async fn patch_overwrites_byte_window() {
        let fs = MemFs::new();
        fs.create_file("/f", b"hello");
        let h = handler(fs.clone(), MemLs::new());

        let resp = h.handle(patch("/dav/f", "bytes=10-19", "0123456789")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(collect(resp.into_body()).await, b"OK");

        let data = fs.contents("/f").unwrap();
        assert_eq!(data.len(), 20);
        assert_eq!(&data[..5], b"hello");
        assert_eq!(&data[5..10], &[0u8; 5]);
        assert_eq!(&data[10..], b"0123456789");
    }

    #[tokio::test]
    async fn patch_append_creates_resource() {
        let fs = MemFs::new();
        let h = handler(fs.clone(), MemLs::new());
        let resp = h.handle(patch("/dav/new", "append", "abc")).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(fs.contents("/new").unwrap().as_ref(), b"abc");
    }

    #[tokio::test]
    async fn patch_append_to_existing_resource() {
        let fs = MemFs::new();
        fs.create_file("/f", b"abc");
        let h = handler(fs.clone(), MemLs::new());
        let resp = h.handle(patch("/dav/f", "append", "def")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(fs.contents("/f").unwrap().as_ref(), b"abcdef");
    }

    #[tokio::test]
    async fn patch_start_only_derives_end() {
        let fs = MemFs::new();
        fs.create_file("/f", b"abcdef");
        let h = handler(fs.clone(), MemLs::new());
        let resp = h.handle(patch("/dav/f", "bytes=2-", "xyz")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(fs.contents("/f").unwrap().as_ref(), b"abxyzf");
    }

    #[tokio::test]
    async fn patch_offset_from_end_of_resource() {
        // bytes=-B starts at current size minus B, it is not a
        // "last B bytes" suffix range.
        let fs = MemFs::new();
        fs.create_file("/f", b"abcdef");
        let h = handler(fs.clone(), MemLs::new());
        let resp = h.handle(patch("/dav/f", "bytes=-4", "zz")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(fs.contents("/f").unwrap().as_ref(), b"abzzef");
    }

    #[tokio::test]
    async fn patch_rejects_inconsistent_window() {
        let fs = MemFs::new();
        fs.create_file("/f", b"abcdef");
        let h = handler(fs.clone(), MemLs::new());
        let resp = h.handle(patch("/dav/f", "bytes=5-3", "x")).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let resp = h.handle(patch("/dav/f", "bytes=0-5", "abc")).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(fs.contents("/f").unwrap().as_ref(), b"abcdef");
    }

    #[tokio::test]
    async fn patch_rejects_bad_ranges() {
        let fs = MemFs::new();
        let h = handler(fs, MemLs::new());
        let resp = h.handle(patch("/dav/f", "bytes=-", "x")).await;
        assert_eq!(resp.status(), StatusCode::RANGE_NOT_SATISFIABLE);
        let resp = h.handle(patch("/dav/f", "bytes=a-b", "x")).await;
        assert_eq!(resp.status(), StatusCode::RANGE_NOT_SATISFIABLE);
        let resp = h.handle(patch("/dav/f", "bogus", "x")).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        // i64::MAX start: valid syntax, but the window cannot be derived.
        let resp = h
            .handle(patch("/dav/f", "bytes=9223372036854775807-", "x"))
            .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn patch_rejects_oversized_content_length() {
        let h = handler(MemFs::new(), MemLs::new());
        let mut req = patch("/dav/f", "append", "x");
        // 2^63, one past what a signed length can hold.
        req.headers_mut()
            .insert("Content-Length", "9223372036854775808".parse().unwrap());
        let resp = h.handle(req).await;
        assert_eq!(resp.status(), StatusCode::LENGTH_REQUIRED);
    }

    #[tokio::test]
    async fn patch_stat_failure_is_internal_error() {
        #[derive(Debug)]
        struct BrokenFs;
        impl DavFileSystem for BrokenFs {
            fn metadata<'a>(
                &'a self,
                _path: &'a str,
            ) -> crate::fs::FsFuture<'a, Box<dyn crate::fs::DavMetaData>> {
                Box::pin(async { Err(crate::fs::FsError::Forbidden) })
            }
            fn open<'a>(
                &'a self,
                _path: &'a str,
                _options: crate::fs::OpenOptions,
            ) -> crate::fs::FsFuture<'a, Box<dyn crate::fs::DavFile>> {
                panic!("open after a failed stat");
            }
        }

        let h = PatchHandler::builder(base_handler())
            .strip_prefix("/dav")
            .filesystem(Arc::new(BrokenFs))
            .locksystem(MemLs::new())
            .build();
        let resp = h.handle(patch("/dav/f", "append", "x")).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn patch_requires_update_range_header() {
        let h = handler(MemFs::new(), MemLs::new());
        let req = Request::builder()
            .method(Method::PATCH)
            .uri("/dav/f")
            .header("Content-Type", "application/x-sabredav-partialupdate")
            .header("Content-Length", "1")
            .body(Body::from("x"))
            .unwrap();
        let resp = h.handle(req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn patch_requires_content_length() {
        let h = handler(MemFs::new(), MemLs::new());
        let req = Request::builder()
            .method(Method::PATCH)
            .uri("/dav/f")
            .header("Content-Type", "application/x-sabredav-partialupdate")
            .header("X-Update-Range", "append")
            .body(Body::from("x"))
            .unwrap();
        let resp = h.handle(req).await;
        assert_eq!(resp.status(), StatusCode::LENGTH_REQUIRED);
    }

    #[tokio::test]
    async fn patch_requires_partialupdate_content_type() {
        let h = handler(MemFs::new(), MemLs::new());
        let req = Request::builder()
            .method(Method::PATCH)
            .uri("/dav/f")
            .header("Content-Type", "text/plain")
            .header("Content-Length", "1")
            .header("X-Update-Range", "append")
            .body(Body::from("x"))
            .unwrap();
        let resp = h.handle(req).await;
        assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn patch_rejects_if_header() {
        let fs = MemFs::new();
        let h = handler(fs.clone(), MemLs::new());
        let mut req = patch("/dav/f", "append", "x");
        req.headers_mut()
            .insert("If", "(<opaquelocktoken:foo>)".parse().unwrap());
        let resp = h.handle(req).await;
        assert_eq!(resp.status(), StatusCode::NOT_IMPLEMENTED);
        assert!(fs.contents("/f").is_none());
    }

    #[tokio::test]
    async fn patch_preconditions() {
        let fs = MemFs::new();
        fs.create_file("/f", b"x");
        let h = handler(fs.clone(), MemLs::new());

        let mut req = patch("/dav/none", "append", "x");
        req.headers_mut().insert("If-Match", "*".parse().unwrap());
        let resp = h.handle(req).await;
        assert_eq!(resp.status(), StatusCode::PRECONDITION_FAILED);
        assert!(fs.contents("/none").is_none());

        let mut req = patch("/dav/f", "append", "x");
        req.headers_mut()
            .insert("If-None-Match", "*".parse().unwrap());
        let resp = h.handle(req).await;
        assert_eq!(resp.status(), StatusCode::PRECONDITION_FAILED);
        assert_eq!(fs.contents("/f").unwrap().as_ref(), b"x");

        let mut req = patch("/dav/f", "append", "x");
        req.headers_mut()
            .insert("If-Match", "\"some-etag\"".parse().unwrap());
        let resp = h.handle(req).await;
        assert_eq!(resp.status(), StatusCode::NOT_IMPLEMENTED);
    }

    #[tokio::test]
    async fn prefix_mismatch_is_not_found() {
        // No filesystem or lock activity for a path outside the prefix.
        #[derive(Debug)]
        struct PanicFs;
        impl DavFileSystem for PanicFs {
            fn metadata<'a>(
                &'a self,
                _path: &'a str,
            ) -> crate::fs::FsFuture<'a, Box<dyn crate::fs::DavMetaData>> {
                panic!("filesystem used");
            }
            fn open<'a>(
                &'a self,
                _path: &'a str,
                _options: crate::fs::OpenOptions,
            ) -> crate::fs::FsFuture<'a, Box<dyn crate::fs::DavFile>> {
                panic!("filesystem used");
            }
        }

        let h = PatchHandler::builder(base_handler())
            .strip_prefix("/dav")
            .filesystem(Arc::new(PanicFs))
            .locksystem(MemLs::new())
            .build();
        let resp = h.handle(patch("/other/f", "append", "x")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let resp = h.handle(options("/other/f")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn patch_conflicting_lock_is_locked() {
        let ls = MemLs::new();
        let token = ls
            .create(
                SystemTime::now(),
                LockDetails {
                    root: "/f".to_string(),
                    duration: None,
                    zero_depth: true,
                },
            )
            .unwrap();

        let fs = MemFs::new();
        let h = handler(fs.clone(), ls.clone());
        let resp = h.handle(patch("/dav/f", "append", "x")).await;
        assert_eq!(resp.status(), StatusCode::LOCKED);
        assert!(fs.contents("/f").is_none());

        // Releasing the other client's lock lets the write through.
        ls.unlock(SystemTime::now(), &token).unwrap();
        let resp = h.handle(patch("/dav/f", "append", "x")).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn patch_releases_lock_on_every_exit() {
        let ls = MemLs::new();
        let fs = MemFs::new();
        let h = handler(fs, ls.clone());

        // Success, validation failure, both must leave the path unlocked.
        let resp = h.handle(patch("/dav/f", "append", "x")).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let resp = h.handle(patch("/dav/f", "bytes=5-3", "x")).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let token = ls
            .create(
                SystemTime::now(),
                LockDetails {
                    root: "/f".to_string(),
                    duration: None,
                    zero_depth: true,
                },
            )
            .expect("temporary patch lock still held");
        ls.unlock(SystemTime::now(), &token).unwrap();
    }

    #[tokio::test]
    async fn pass_through_to_base_handler() {
        let h = handler(MemFs::new(), MemLs::new());
        let req = Request::builder()
            .method(Method::GET)
            .uri("/dav/f")
            .body(Body::empty())
            .unwrap();
        let resp = h.handle(req).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(collect(resp.into_body()).await, b"base");

        // Without a locksystem even PATCH is passed through.
        let h = PatchHandler::builder(base_handler())
            .strip_prefix("/dav")
            .filesystem(MemFs::new())
            .build();
        let resp = h.handle(patch("/dav/f", "append", "x")).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn logger_sees_outcome() {
        let seen: Arc<Mutex<Vec<Option<StatusCode>>>> = Arc::new(Mutex::new(Vec::new()));
        let record = seen.clone();
        let h = PatchHandler::builder(base_handler())
            .strip_prefix("/dav")
            .filesystem(MemFs::new())
            .locksystem(MemLs::new())
            .logger(move |_req, err| {
                record.lock().push(err.map(|e| e.statuscode()));
            })
            .build();

        let resp = h.handle(options("/dav/f")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let resp = h.handle(patch("/dav/f", "bogus", "x")).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let seen = seen.lock();
        assert_eq!(seen.as_slice(), &[None, Some(StatusCode::BAD_REQUEST)]);
    }
}
