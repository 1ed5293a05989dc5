//! Bounded output sinks for rendered text.
//!
//! A [`FormatBuffer`] is an append-only byte sink with a fixed upper bound
//! on how much it retains. Writing past capacity is not an error: the excess
//! is silently clipped, while the buffer keeps counting the length the
//! output *would* have had. Comparing [`FormatBuffer::len`] against the
//! capacity after a render is how callers detect truncation.
//!
//! ```
//! # use ggfmt::buffer::FormatBuffer;
//! let mut backing = [0u8; 8];
//! let mut fb = FormatBuffer::new(&mut backing);
//! fb.write_str("hello world");
//! assert_eq!(fb.as_str(), "hello wo");
//! assert_eq!(fb.len(), 11);
//! assert!(fb.is_truncated());
//! ```
//!
//! The buffer is not internally synchronized; a single instance must not be
//! written by two calls concurrently.

enum Storage<'a> {
    /// Caller-owned backing; the engine never allocates or frees it.
    Fixed(&'a mut [u8]),
    /// Heap backing used by the String/stream entry points, where truncation
    /// semantics do not apply.
    Growable(Vec<u8>),
}

/// An append-only text sink with a truncation-safe cursor.
///
/// The clipping contract lets every converter over-produce freely: numeric
/// and string renderers write whatever length the value needs and rely on
/// the sink to stop retaining bytes once full.
pub struct FormatBuffer<'a> {
    storage: Storage<'a>,
    len: usize,
}

impl<'a> FormatBuffer<'a> {
    /// Create a sink over a caller-owned slice. At most `buf.len()` bytes
    /// are retained; no terminator slot is reserved.
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { storage: Storage::Fixed(buf), len: 0 }
    }

    /// Create a heap-backed sink that never truncates.
    pub fn growable() -> FormatBuffer<'static> {
        FormatBuffer { storage: Storage::Growable(Vec::new()), len: 0 }
    }

    /// Append `text`, clipping silently at capacity. The cursor always
    /// advances by the full text length, so `len()` reports the size the
    /// output would have had with enough room.
    pub fn write_str(&mut self, text: &str) {
        match &mut self.storage {
            Storage::Fixed(buf) => {
                let cap = buf.len();
                if self.len < cap {
                    let n = (cap - self.len).min(text.len());
                    buf[self.len..self.len + n].copy_from_slice(&text.as_bytes()[..n]);
                }
            }
            Storage::Growable(vec) => {
                vec.extend_from_slice(text.as_bytes());
            }
        }
        self.len += text.len();
    }

    /// Append a single ASCII byte. Fill and digit characters go through
    /// here so padding loops never round-trip a `&str`.
    pub(crate) fn write_ascii(&mut self, byte: u8) {
        debug_assert!(byte.is_ascii());
        match &mut self.storage {
            Storage::Fixed(buf) => {
                if self.len < buf.len() {
                    buf[self.len] = byte;
                }
            }
            Storage::Growable(vec) => {
                vec.push(byte);
            }
        }
        self.len += 1;
    }

    /// Append `count` copies of an ASCII fill byte.
    pub(crate) fn pad(&mut self, fill: u8, count: usize) {
        for _ in 0..count {
            self.write_ascii(fill);
        }
    }

    /// Total length written so far, including clipped bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// `true` if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of bytes actually retained.
    pub fn written(&self) -> usize {
        match &self.storage {
            Storage::Fixed(buf) => self.len.min(buf.len()),
            Storage::Growable(_) => self.len,
        }
    }

    /// The fixed capacity, or `None` for a growable sink.
    pub fn capacity(&self) -> Option<usize> {
        match &self.storage {
            Storage::Fixed(buf) => Some(buf.len()),
            Storage::Growable(_) => None,
        }
    }

    /// Free capacity left before writes start clipping. A growable sink
    /// reports `usize::MAX`.
    pub fn remaining(&self) -> usize {
        match &self.storage {
            Storage::Fixed(buf) => buf.len().saturating_sub(self.len),
            Storage::Growable(_) => usize::MAX,
        }
    }

    /// `true` once at least one byte has been clipped.
    pub fn is_truncated(&self) -> bool {
        match &self.storage {
            Storage::Fixed(buf) => self.len > buf.len(),
            Storage::Growable(_) => false,
        }
    }

    /// The retained bytes.
    pub fn as_bytes(&self) -> &[u8] {
        match &self.storage {
            Storage::Fixed(buf) => &buf[..self.len.min(buf.len())],
            Storage::Growable(vec) => vec,
        }
    }

    /// The retained content as text.
    ///
    /// Clipping happens at byte granularity, so a multi-byte character can
    /// be cut at the capacity boundary; the partial character is excluded
    /// here while still counting toward [`written`](Self::written).
    pub fn as_str(&self) -> &str {
        valid_prefix(self.as_bytes())
    }

    /// Consume the sink and return the total (pre-truncation) length.
    pub fn finish(self) -> usize {
        self.len
    }

    /// Consume the sink and copy the retained content into a `String`.
    pub fn into_string(self) -> String {
        match self.storage {
            Storage::Fixed(buf) => {
                let end = self.len.min(buf.len());
                valid_prefix(&buf[..end]).to_owned()
            }
            Storage::Growable(vec) => match String::from_utf8(vec) {
                Ok(s) => s,
                Err(e) => valid_prefix(&e.into_bytes()).to_owned(),
            },
        }
    }
}

/// Longest prefix of `bytes` that is valid UTF-8.
fn valid_prefix(bytes: &[u8]) -> &str {
    match std::str::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => std::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or(""),
    }
}
