//! Interface of the filesystem collaborator.
//!
//! This is a narrow subset of a full WebDAV filesystem: the patch handler
//! only ever stats a path and opens a file for writing. Two backends are
//! bundled, [`LocalFs`](localfs::LocalFs) and [`MemFs`](memfs::MemFs);
//! anything else that serves WebDAV can implement these traits as well.

use std::fmt::Debug;
use std::future::Future;
use std::io;
use std::pin::Pin;

use bytes::Buf;

pub use std::io::SeekFrom;

#[cfg(feature = "localfs")]
pub mod localfs;
#[cfg(feature = "memfs")]
pub mod memfs;

pub type FsResult<T> = Result<T, FsError>;
/// Boxed future returned by the filesystem methods.
pub type FsFuture<'a, T> = Pin<Box<dyn Future<Output = FsResult<T>> + Send + 'a>>;

/// Errors generated by a filesystem backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsError {
    NotFound,
    Forbidden,
    NotImplemented,
    GeneralFailure,
}

impl std::fmt::Display for FsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FsError::NotFound => write!(f, "not found"),
            FsError::Forbidden => write!(f, "forbidden"),
            FsError::NotImplemented => write!(f, "not implemented"),
            FsError::GeneralFailure => write!(f, "general failure"),
        }
    }
}

impl std::error::Error for FsError {}

impl From<io::Error> for FsError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound => FsError::NotFound,
            io::ErrorKind::PermissionDenied => FsError::Forbidden,
            _ => FsError::GeneralFailure,
        }
    }
}

/// Options for [`open`](DavFileSystem::open).
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenOptions {
    pub read: bool,
    pub write: bool,
    pub append: bool,
    pub truncate: bool,
    pub create: bool,
}

impl OpenOptions {
    /// Read/write in append mode, creating the file if absent.
    pub fn append() -> OpenOptions {
        OpenOptions {
            read: true,
            write: true,
            append: true,
            create: true,
            ..OpenOptions::default()
        }
    }

    /// Read/write without truncation, creating the file if absent.
    pub fn write() -> OpenOptions {
        OpenOptions {
            read: true,
            write: true,
            create: true,
            ..OpenOptions::default()
        }
    }
}

/// Metadata of a resource, as returned by a stat lookup.
pub trait DavMetaData: Debug + Send + Sync {
    /// Size of the resource in bytes.
    fn len(&self) -> u64;
    /// Is this a collection (directory)?
    fn is_dir(&self) -> bool;
    /// Is this a regular file?
    fn is_file(&self) -> bool {
        !self.is_dir()
    }
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An open, writable file handle. Dropping the handle closes the file.
pub trait DavFile: Debug + Send {
    fn write_buf(&mut self, buf: Box<dyn Buf + Send>) -> FsFuture<()>;
    fn seek(&mut self, pos: SeekFrom) -> FsFuture<u64>;
    fn flush(&mut self) -> FsFuture<()>;
}

/// The filesystem collaborator the patch handler writes through.
///
/// Results are never cached by the handler; a stat is re-issued on
/// every request so precondition checks see the current state.
pub trait DavFileSystem: Send + Sync {
    /// Stat a resource.
    fn metadata<'a>(&'a self, path: &'a str) -> FsFuture<'a, Box<dyn DavMetaData>>;

    /// Open (and possibly create) a file.
    fn open<'a>(&'a self, path: &'a str, options: OpenOptions) -> FsFuture<'a, Box<dyn DavFile>>;
}
