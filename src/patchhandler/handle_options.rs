use std::sync::Arc;

use headers::HeaderMapExt;
use http::{Request, Response};

use crate::body::Body;
use crate::errors::DavResult;
use crate::fs::DavFileSystem;

impl crate::PatchHandler {
    pub(crate) async fn handle_options(
        &self,
        _req: &Request<()>,
        fs: &Arc<dyn DavFileSystem>,
        path: &str,
    ) -> DavResult<Response<Body>> {
        let mut res = Response::new(Body::empty());

        // A stat failure means "nothing there" for capability purposes,
        // it is never propagated as an error.
        let meta = fs.metadata(path).await.ok();
        let allow = match meta {
            None => "OPTIONS, LOCK, PUT, MKCOL",
            Some(meta) if meta.is_dir() => {
                if self.read_only {
                    "OPTIONS, COPY, PROPFIND"
                } else {
                    "OPTIONS, LOCK, DELETE, PROPPATCH, COPY, MOVE, UNLOCK, PROPFIND"
                }
            }
            Some(_) => {
                if self.read_only {
                    "OPTIONS, GET, HEAD, POST, PROPFIND"
                } else {
                    "OPTIONS, LOCK, GET, HEAD, POST, DELETE, PROPPATCH, COPY, MOVE, UNLOCK, PROPFIND, PUT, PATCH"
                }
            }
        };

        let h = res.headers_mut();
        h.insert("Allow", allow.parse().unwrap());
        // http://www.webdav.org/specs/rfc4918.html#dav.compliance.classes
        h.insert("DAV", "1, 2, sabredav-partialupdate".parse().unwrap());
        // http://msdn.microsoft.com/en-au/library/cc250217.aspx
        h.insert("MS-Author-Via", "DAV".parse().unwrap());
        h.typed_insert(headers::ContentLength(0));

        Ok(res)
    }
}
