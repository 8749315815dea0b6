//! Local filesystem access.
//!
//! This implementation is stateless. So the easiest way to use it
//! is to create a new instance in your handler every time
//! you need one.

use std::path::PathBuf;
use std::sync::Arc;

use bytes::Buf;
use futures_util::FutureExt;
use tokio::io::{AsyncSeekExt, AsyncWriteExt};

use crate::fs::*;

/// Local filesystem backend, serving files below a base directory.
pub struct LocalFs {
    basedir: PathBuf,
    public: bool,
}

#[derive(Debug)]
struct LocalFsFile(tokio::fs::File);

impl LocalFs {
    /// Create a new LocalFs, serving "base".
    ///
    /// If "public" is set to true, files created will be publically
    /// readable (mode 644), otherwise they will be private (mode 600).
    /// Umask still overrides this.
    pub fn new(base: impl Into<PathBuf>, public: bool) -> Arc<LocalFs> {
        Arc::new(LocalFs {
            basedir: base.into(),
            public,
        })
    }

    fn abs_path(&self, path: &str) -> PathBuf {
        let mut pathbuf = self.basedir.clone();
        pathbuf.push(path.trim_start_matches('/'));
        pathbuf
    }
}

impl DavFileSystem for LocalFs {
    fn metadata<'a>(&'a self, path: &'a str) -> FsFuture<'a, Box<dyn DavMetaData>> {
        async move {
            let meta = tokio::fs::metadata(self.abs_path(path)).await?;
            Ok(Box::new(meta) as _)
        }
        .boxed()
    }

    fn open<'a>(&'a self, path: &'a str, options: OpenOptions) -> FsFuture<'a, Box<dyn DavFile>> {
        async move {
            trace!("FS: open {path:?}");
            let path = self.abs_path(path);
            let mut opt = tokio::fs::OpenOptions::new();
            opt.read(options.read)
                .write(options.write)
                .append(options.append)
                .truncate(options.truncate)
                .create(options.create);
            #[cfg(unix)]
            if self.public {
                opt.mode(0o644);
            } else {
                opt.mode(0o600);
            }
            match opt.open(path).await {
                Ok(file) => Ok(Box::new(LocalFsFile(file)) as Box<dyn DavFile>),
                Err(e) => Err(e.into()),
            }
        }
        .boxed()
    }
}

impl DavFile for LocalFsFile {
    fn write_buf(&mut self, mut buf: Box<dyn Buf + Send>) -> FsFuture<()> {
        async move {
            while buf.remaining() > 0 {
                let n = self.0.write(buf.chunk()).await?;
                buf.advance(n);
            }
            Ok(())
        }
        .boxed()
    }

    fn seek(&mut self, pos: SeekFrom) -> FsFuture<u64> {
        async move { Ok(self.0.seek(pos).await?) }.boxed()
    }

    fn flush(&mut self) -> FsFuture<()> {
        async move { Ok(self.0.sync_all().await?) }.boxed()
    }
}

impl DavMetaData for std::fs::Metadata {
    fn len(&self) -> u64 {
        self.len()
    }
    fn is_dir(&self) -> bool {
        self.is_dir()
    }
    fn is_file(&self) -> bool {
        self.is_file()
    }
}
