// Transport abstraction module
//
// Byte-range access to a container over persistent storage. Decoding only ever
// needs `len` and `read_range`, so the same codec runs over a file, a memory map
// or an in-memory buffer. Retry and timeout live here and nowhere else.

use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use memmap2::Mmap;
use thiserror::Error;

use crate::config::IoPolicy;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Not found")]
    NotFound,
    #[error("Timeout")]
    Timeout,
    #[error("Read of {len} bytes at offset {offset} exceeds length {available}")]
    OutOfRange { offset: u64, len: u64, available: u64 },
    #[error("Read failed after {attempts} attempts: {source}")]
    Exhausted {
        attempts: u32,
        #[source]
        source: std::io::Error,
    },
    #[error("Transport error: {0}")]
    Other(String),
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            ErrorKind::NotFound => TransportError::NotFound,
            ErrorKind::TimedOut => TransportError::Timeout,
            _ => TransportError::Other(err.to_string()),
        }
    }
}

/// Random access to the bytes of one container.
///
/// Implementations are shared read-only between worker threads.
pub trait Storage: Send + Sync {
    /// Total length in bytes.
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read exactly `len` bytes at `offset`.
    fn read_range(&self, offset: u64, len: u64) -> Result<Bytes, TransportError>;
}

impl<T: Storage + ?Sized> Storage for Arc<T> {
    fn len(&self) -> u64 {
        (**self).len()
    }

    fn read_range(&self, offset: u64, len: u64) -> Result<Bytes, TransportError> {
        (**self).read_range(offset, len)
    }
}

impl<T: Storage + ?Sized> Storage for Box<T> {
    fn len(&self) -> u64 {
        (**self).len()
    }

    fn read_range(&self, offset: u64, len: u64) -> Result<Bytes, TransportError> {
        (**self).read_range(offset, len)
    }
}

fn check_range(offset: u64, len: u64, available: u64) -> Result<(), TransportError> {
    match offset.checked_add(len) {
        Some(end) if end <= available => Ok(()),
        _ => Err(TransportError::OutOfRange { offset, len, available }),
    }
}

fn is_transient(err: &std::io::Error) -> bool {
    matches!(err.kind(), ErrorKind::Interrupted | ErrorKind::TimedOut | ErrorKind::WouldBlock)
}

/// In-memory container bytes.
#[derive(Clone)]
pub struct MemoryStorage {
    data: Bytes,
}

impl MemoryStorage {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }
}

impl Storage for MemoryStorage {
    fn len(&self) -> u64 {
        self.data.len() as u64
    }

    fn read_range(&self, offset: u64, len: u64) -> Result<Bytes, TransportError> {
        check_range(offset, len, self.len())?;
        let start = offset as usize;
        Ok(self.data.slice(start..start + len as usize))
    }
}

/// File on disk, read with seek + read under a lock, retrying transient failures.
#[derive(Debug)]
pub struct FileStorage {
    file: Mutex<File>,
    len: u64,
    policy: IoPolicy,
}

impl FileStorage {
    pub fn open(path: impl AsRef<Path>, policy: IoPolicy) -> Result<Self, TransportError> {
        let file = File::open(path.as_ref())?;
        Self::from_file(file, policy)
    }

    /// Open through tokio's blocking pool, giving up after `policy.open_timeout`.
    pub async fn open_with_timeout(path: impl AsRef<Path>, policy: IoPolicy) -> Result<Self, TransportError> {
        let open = tokio::fs::File::open(path.as_ref().to_path_buf());
        let file = match tokio::time::timeout(policy.open_timeout, open).await {
            Ok(file) => file?,
            Err(_) => return Err(TransportError::Timeout),
        };
        Self::from_file(file.into_std().await, policy)
    }

    pub fn from_file(file: File, policy: IoPolicy) -> Result<Self, TransportError> {
        let len = file.metadata()?.len();
        Ok(Self { file: Mutex::new(file), len, policy })
    }

    fn read_once(&self, offset: u64, buf: &mut [u8]) -> std::io::Result<()> {
        let mut file = self
            .file
            .lock()
            .map_err(|_| std::io::Error::other("file lock poisoned"))?;
        file.seek(SeekFrom::Start(offset))?;
        file.read_exact(buf)
    }
}

impl Storage for FileStorage {
    fn len(&self) -> u64 {
        self.len
    }

    fn read_range(&self, offset: u64, len: u64) -> Result<Bytes, TransportError> {
        check_range(offset, len, self.len)?;
        let mut buf = vec![0u8; len as usize];
        let attempts = self.policy.read_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.read_once(offset, &mut buf) {
                Ok(()) => return Ok(Bytes::from(buf)),
                Err(err) if is_transient(&err) && attempt < attempts => {
                    tracing::warn!(offset, len, attempt, error = %err, "transient read failure, retrying");
                    std::thread::sleep(self.policy.retry_backoff * attempt);
                    attempt += 1;
                }
                Err(err) if is_transient(&err) => {
                    return Err(TransportError::Exhausted { attempts, source: err });
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}

/// Read-only memory map of a container file.
pub struct MmapStorage {
    map: Mmap,
}

impl MmapStorage {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TransportError> {
        let file = File::open(path.as_ref())?;
        // SAFETY: the mapping is read-only; callers must not truncate the file while it is mapped.
        let map = unsafe { Mmap::map(&file)? };
        Ok(Self { map })
    }
}

impl Storage for MmapStorage {
    fn len(&self) -> u64 {
        self.map.len() as u64
    }

    fn read_range(&self, offset: u64, len: u64) -> Result<Bytes, TransportError> {
        check_range(offset, len, self.len())?;
        let start = offset as usize;
        Ok(Bytes::copy_from_slice(&self.map[start..start + len as usize]))
    }
}
