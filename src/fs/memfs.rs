//! Ephemeral in-memory filesystem.
//!
//! Useful as a scratch backend and for testing. All entries live in a
//! single map guarded by a mutex; the lock is never held across awaits.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::{Buf, Bytes};
use futures_util::FutureExt;
use parking_lot::Mutex;

use crate::fs::*;

#[derive(Debug)]
enum MemEntry {
    Dir,
    File(Vec<u8>),
}

/// In-memory filesystem backend.
pub struct MemFs {
    entries: Arc<Mutex<HashMap<String, MemEntry>>>,
}

#[derive(Debug)]
struct MemFsFile {
    entries: Arc<Mutex<HashMap<String, MemEntry>>>,
    path: String,
    pos: u64,
    append: bool,
}

#[derive(Debug, Clone, Copy)]
struct MemMeta {
    len: u64,
    is_dir: bool,
}

impl MemFs {
    pub fn new() -> Arc<MemFs> {
        Arc::new(MemFs {
            entries: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// Create a collection (directory) entry.
    pub fn create_dir(&self, path: &str) {
        self.entries.lock().insert(path.to_string(), MemEntry::Dir);
    }

    /// Create or replace a file entry.
    pub fn create_file(&self, path: &str, data: &[u8]) {
        self.entries
            .lock()
            .insert(path.to_string(), MemEntry::File(data.to_vec()));
    }

    /// The current contents of a file entry, if present.
    pub fn contents(&self, path: &str) -> Option<Bytes> {
        match self.entries.lock().get(path) {
            Some(MemEntry::File(data)) => Some(Bytes::copy_from_slice(data)),
            _ => None,
        }
    }
}

impl DavFileSystem for MemFs {
    fn metadata<'a>(&'a self, path: &'a str) -> FsFuture<'a, Box<dyn DavMetaData>> {
        async move {
            let meta = match self.entries.lock().get(path) {
                Some(MemEntry::Dir) => MemMeta {
                    len: 0,
                    is_dir: true,
                },
                Some(MemEntry::File(data)) => MemMeta {
                    len: data.len() as u64,
                    is_dir: false,
                },
                None => return Err(FsError::NotFound),
            };
            Ok(Box::new(meta) as _)
        }
        .boxed()
    }

    fn open<'a>(&'a self, path: &'a str, options: OpenOptions) -> FsFuture<'a, Box<dyn DavFile>> {
        async move {
            trace!("FS: open {path:?}");
            {
                let mut entries = self.entries.lock();
                match entries.get_mut(path) {
                    Some(MemEntry::Dir) => return Err(FsError::Forbidden),
                    Some(MemEntry::File(data)) => {
                        if options.truncate {
                            data.clear();
                        }
                    }
                    None => {
                        if !options.create {
                            return Err(FsError::NotFound);
                        }
                        entries.insert(path.to_string(), MemEntry::File(Vec::new()));
                    }
                }
            }
            Ok(Box::new(MemFsFile {
                entries: self.entries.clone(),
                path: path.to_string(),
                pos: 0,
                append: options.append,
            }) as Box<dyn DavFile>)
        }
        .boxed()
    }
}

impl MemFsFile {
    fn write_at(&mut self, buf: &[u8]) -> FsResult<()> {
        let mut entries = self.entries.lock();
        let Some(MemEntry::File(data)) = entries.get_mut(&self.path) else {
            return Err(FsError::NotFound);
        };
        if self.append {
            data.extend_from_slice(buf);
            self.pos = data.len() as u64;
        } else {
            let pos = self.pos as usize;
            let end = pos + buf.len();
            if data.len() < end {
                data.resize(end, 0);
            }
            data[pos..end].copy_from_slice(buf);
            self.pos = end as u64;
        }
        Ok(())
    }
}

impl DavFile for MemFsFile {
    fn write_buf(&mut self, mut buf: Box<dyn Buf + Send>) -> FsFuture<()> {
        async move {
            let bytes = buf.copy_to_bytes(buf.remaining());
            self.write_at(&bytes)
        }
        .boxed()
    }

    fn seek(&mut self, pos: SeekFrom) -> FsFuture<u64> {
        async move {
            let len = match self.entries.lock().get(&self.path) {
                Some(MemEntry::File(data)) => data.len() as i64,
                _ => 0,
            };
            let newpos = match pos {
                SeekFrom::Start(n) => n as i64,
                SeekFrom::Current(n) => self.pos as i64 + n,
                SeekFrom::End(n) => len + n,
            };
            if newpos < 0 {
                return Err(FsError::GeneralFailure);
            }
            self.pos = newpos as u64;
            Ok(self.pos)
        }
        .boxed()
    }

    fn flush(&mut self) -> FsFuture<()> {
        async move { Ok(()) }.boxed()
    }
}

impl DavMetaData for MemMeta {
    fn len(&self) -> u64 {
        self.len
    }
    fn is_dir(&self) -> bool {
        self.is_dir
    }
}
