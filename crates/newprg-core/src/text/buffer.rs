//! Growable byte buffer with in-place editing.
//!
//! A [`Buffer`] owns one contiguous allocation and tracks three positions:
//! the start of the allocation (always offset `0`), the logical end of the
//! content and the end of the allocation. Content lives in `[0, end)`; the
//! bytes in `[end, capacity)` are always zero.
//!
//! Every position handed around inside this module is an *offset*, never a
//! pointer or slice into the allocation. Growing the buffer may move the
//! allocation, but offsets stay valid because they are re-applied to the
//! new storage.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::trace;

/// Default growth step used when callers have no better estimate.
pub const DEFAULT_INCREMENT: usize = 1024;

/// Errors raised by buffer operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// The file backing a buffer could not be read.
    #[error("cannot read {path}: {reason}")]
    Io { path: PathBuf, reason: String },

    /// The allocator refused to extend the buffer.
    #[error("out of memory while growing buffer by {requested} bytes")]
    OutOfMemory { requested: usize },
}

pub type BufferResult<T> = Result<T, BufferError>;

/// Owned, growable byte region with a logical end and a capacity end.
#[derive(Debug, Clone, Default)]
pub struct Buffer {
    /// Whole allocation; `data.len()` is the capacity end.
    data: Vec<u8>,
    /// Logical end of content.
    end: usize,
}

impl Buffer {
    /// Create an empty buffer with no capacity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy `bytes` into a new buffer with `slack` spare bytes after them.
    pub fn from_bytes(bytes: &[u8], slack: usize) -> BufferResult<Self> {
        let capacity = bytes.len().saturating_add(slack);
        let mut data = Vec::new();
        data.try_reserve_exact(capacity)
            .map_err(|_| BufferError::OutOfMemory {
                requested: capacity,
            })?;
        data.extend_from_slice(bytes);
        data.resize(capacity, 0);

        Ok(Self {
            data,
            end: bytes.len(),
        })
    }

    /// Read a whole file into a new buffer, leaving `slack` spare bytes.
    pub fn load(path: impl AsRef<Path>, slack: usize) -> BufferResult<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| BufferError::Io {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        trace!(path = %path.display(), bytes = bytes.len(), "Buffer loaded");
        Self::from_bytes(&bytes, slack)
    }

    /// Length of the content.
    pub fn len(&self) -> usize {
        self.end
    }

    pub fn is_empty(&self) -> bool {
        self.end == 0
    }

    /// Size of the allocation.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Spare bytes between the logical end and the capacity end.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.end
    }

    /// The content, `[start, end)`.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.end]
    }

    /// The content decoded as UTF-8, invalid sequences replaced.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(self.as_bytes()).into_owned()
    }

    /// Consume the buffer, returning only its content.
    pub fn into_bytes(mut self) -> Vec<u8> {
        self.data.truncate(self.end);
        self.data
    }

    /// Extend the allocation by `max(extra, increment)` zeroed bytes.
    pub fn grow(&mut self, extra: usize, increment: usize) -> BufferResult<()> {
        let by = extra.max(increment);
        self.data
            .try_reserve_exact(by)
            .map_err(|_| BufferError::OutOfMemory { requested: by })?;
        let capacity = self.data.len() + by;
        self.data.resize(capacity, 0);
        trace!(by, capacity, "Buffer grown");
        Ok(())
    }

    /// Offset of the first occurrence of `needle` at or after `from`.
    pub fn find_from(&self, needle: &[u8], from: usize) -> Option<usize> {
        if needle.is_empty() || from > self.end {
            return None;
        }
        self.data[from..self.end]
            .windows(needle.len())
            .position(|window| window == needle)
            .map(|at| at + from)
    }

    /// Whether `needle` occurs anywhere in the content.
    pub fn contains(&self, needle: impl AsRef<[u8]>) -> bool {
        self.find_from(needle.as_ref(), 0).is_some()
    }

    /// Insert `bytes` at offset `at`, growing by at least `growth_hint`
    /// when the spare capacity is too small.
    pub fn insert(&mut self, at: usize, bytes: &[u8], growth_hint: usize) -> BufferResult<()> {
        self.splice(at.min(self.end), 0, bytes, growth_hint)
    }

    /// Append `record` followed by a NUL terminator.
    pub fn push_record(&mut self, record: &str, growth_hint: usize) -> BufferResult<()> {
        let mut bytes = Vec::with_capacity(record.len() + 1);
        bytes.extend_from_slice(record.as_bytes());
        bytes.push(0);
        self.splice(self.end, 0, &bytes, growth_hint)
    }

    /// Replace every non-overlapping occurrence of `find`, left to right.
    ///
    /// Scanning resumes after each inserted replacement, so a replacement
    /// that itself contains `find` is never matched again. Returns the
    /// number of replacements made.
    pub fn replace_all(
        &mut self,
        find: impl AsRef<[u8]>,
        replacement: impl AsRef<[u8]>,
        growth_hint: usize,
    ) -> BufferResult<usize> {
        let find = find.as_ref();
        let replacement = replacement.as_ref();
        let mut cursor = 0;
        let mut count = 0;

        while let Some(at) = self.find_from(find, cursor) {
            self.splice(at, find.len(), replacement, growth_hint)?;
            cursor = at + replacement.len();
            count += 1;
        }

        Ok(count)
    }

    /// Remove the first occurrence of `pattern`. Returns `true` if one was
    /// removed.
    pub fn delete_first(&mut self, pattern: impl AsRef<[u8]>) -> bool {
        let pattern = pattern.as_ref();
        match self.find_from(pattern, 0) {
            Some(at) => {
                self.delete_range(at, at + pattern.len());
                true
            }
            None => false,
        }
    }

    /// Remove `[from, to)` and zero the vacated tail.
    pub(crate) fn delete_range(&mut self, from: usize, to: usize) {
        debug_assert!(from <= to && to <= self.end);
        let removed = to - from;
        self.data.copy_within(to..self.end, from);
        let new_end = self.end - removed;
        self.data[new_end..self.end].fill(0);
        self.end = new_end;
    }

    /// Overwrite a single content byte.
    pub(crate) fn set_byte(&mut self, at: usize, byte: u8) {
        debug_assert!(at < self.end);
        self.data[at] = byte;
    }

    /// Replace `removed` bytes at `at` with `inserted`.
    ///
    /// Growth happens before anything moves, and only when the spare
    /// capacity cannot hold the size difference.
    fn splice(
        &mut self,
        at: usize,
        removed: usize,
        inserted: &[u8],
        growth_hint: usize,
    ) -> BufferResult<()> {
        debug_assert!(at + removed <= self.end);

        if inserted.len() > removed {
            let needed = inserted.len() - removed;
            if needed > self.remaining() {
                self.grow(needed, growth_hint)?;
            }
        }

        let old_end = self.end;
        let new_end = old_end - removed + inserted.len();
        self.data.copy_within(at + removed..old_end, at + inserted.len());
        self.data[at..at + inserted.len()].copy_from_slice(inserted);
        if new_end < old_end {
            self.data[new_end..old_end].fill(0);
        }
        self.end = new_end;

        debug_assert!(self.end <= self.data.len());
        Ok(())
    }
}

impl From<&str> for Buffer {
    fn from(text: &str) -> Self {
        Self {
            data: text.as_bytes().to_vec(),
            end: text.len(),
        }
    }
}
