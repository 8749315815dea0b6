//! ## SabreDAV partial-update handler
//!
//! Webdav (RFC4918) itself has no way to modify only part of a stored
//! resource. [SabreDAV partial updates][PATCH] fill that gap: a `PATCH`
//! request with content type `application/x-sabredav-partialupdate` and an
//! `X-Update-Range` header either appends to a resource or overwrites an
//! exact byte window within it.
//!
//! This library is a `handler` implementing that extension in front of an
//! existing Webdav server. It takes a `http::Request`, and either processes
//! it itself (`PATCH`, plus `OPTIONS` so the advertised capabilities stay
//! accurate) or hands it to the wrapped base handler untouched. The base
//! handler keeps responsibility for the whole RFC4918 method set.
//!
//! ## Backend interfaces.
//!
//! The backend interfaces are similar to the ones from the Go
//! `x/net/webdav` package:
//!
//! - you supply a [filesystem][crate::fs::DavFileSystem] for backend
//!   storage; only a stat and an open-for-write call are needed.
//! - you supply a [locksystem][crate::ls::DavLockSystem] so partial writes
//!   are serialized against other writers. A temporary exclusive zero-depth
//!   lock is taken per `PATCH` request and always released when the request
//!   finishes.
//! - requests the handler does not serve locally are forwarded to the
//!   wrapped [base handler][crate::WebDavHandler].
//!
//! Without a filesystem *and* a locksystem configured, everything is
//! passed through.
//!
//! ## Backends.
//!
//! Included are two filesystems:
//!
//! - [`LocalFs`](fs::localfs::LocalFs): writes to a directory on the local
//!   filesystem
//! - [`MemFs`](fs::memfs::MemFs): ephemeral in-memory filesystem
//!
//! and one locksystem, [`MemLs`](ls::memls::MemLs), an ephemeral in-memory
//! locksystem.
//!
//! ## Example.
//!
//! Example server using [hyper] that patches files under /tmp. The base
//! handler here only answers 405; in a real deployment it would be a
//! complete Webdav handler.
//!
//! ```no_run
//! use std::convert::Infallible;
//! use dav_patch::body::Body;
//! use dav_patch::fs::localfs::LocalFs;
//! use dav_patch::ls::memls::MemLs;
//! use dav_patch::PatchHandler;
//!
//! #[tokio::main]
//! async fn main() {
//!     let addr = ([127, 0, 0, 1], 4918).into();
//!
//!     let base = |_req: http::Request<Body>| async {
//!         http::Response::builder()
//!             .status(http::StatusCode::METHOD_NOT_ALLOWED)
//!             .body(Body::empty())
//!             .unwrap()
//!     };
//!
//!     let patch_server = PatchHandler::builder(base)
//!         .strip_prefix("/dav")
//!         .filesystem(LocalFs::new("/tmp", false))
//!         .locksystem(MemLs::new())
//!         .build();
//!
//!     let make_service = hyper::service::make_service_fn(move |_| {
//!         let patch_server = patch_server.clone();
//!         async move {
//!             let func = move |req| {
//!                 let patch_server = patch_server.clone();
//!                 async move {
//!                     Ok::<_, Infallible>(patch_server.handle(req).await)
//!                 }
//!             };
//!             Ok::<_, Infallible>(hyper::service::service_fn(func))
//!         }
//!     });
//!
//!     println!("Serving on {}", addr);
//!     let _ = hyper::Server::bind(&addr)
//!         .serve(make_service)
//!         .await
//!         .map_err(|e| eprintln!("server error: {}", e));
//! }
//! ```
//!
//! [PATCH]: https://sabre.io/dav/http-patch/

#![cfg_attr(docsrs, feature(doc_cfg))]

#[macro_use]
extern crate log;

mod davheaders;
mod errors;
mod patchhandler;

pub mod body;
pub mod fs;
pub mod ls;

pub use crate::errors::DavError;
pub use crate::patchhandler::{PatchBuilder, PatchHandler, RequestLogger, WebDavHandler};
