//! Sample stream boundary
//!
//! A [`SampleStream`] is a pull source of timestamped media access units and
//! format-change notifications for one track segment. The renderer core
//! consumes it exclusively through [`crate::renderer::SourceReader`]; the
//! stream itself may be fed asynchronously by an upstream loader.

pub mod queue;

pub use queue::{SampleQueue, SampleQueueProducer, SampleQueueStream};

use tempo_common::{Format, Result};

/// Outcome of a single read attempt against a sample stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadResult {
    /// The format holder was populated with a new format; no sample data
    FormatChanged,

    /// The sample buffer was filled (possibly with an end-of-stream marker)
    BufferRead,

    /// Nothing available right now; try again on a later loop iteration
    NothingRead,
}

/// Reusable slot a read deposits a format change into
///
/// Ownership stays with the caller across calls; the stream never retains
/// a reference to it.
#[derive(Debug, Default)]
pub struct FormatHolder {
    pub format: Option<Format>,
}

impl FormatHolder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.format = None;
    }
}

/// Reusable slot a read deposits sample data into
///
/// Like [`FormatHolder`], the caller owns the slot and reuses it across
/// reads. `clear()` resets it for the next read without releasing the
/// payload allocation.
#[derive(Debug, Default)]
pub struct SampleBuffer {
    /// Encoded payload bytes
    pub data: Vec<u8>,

    /// Presentation timestamp in microseconds
    ///
    /// After a successful read through a `SourceReader` this has already
    /// been rebased onto the unified playback timeline.
    pub time_us: i64,

    /// Whether this buffer marks the end of the stream (no payload)
    pub end_of_stream: bool,

    /// Whether the sample is a random access point
    pub key_frame: bool,
}

impl SampleBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the slot for reuse; keeps the payload allocation
    pub fn clear(&mut self) {
        self.data.clear();
        self.time_us = 0;
        self.end_of_stream = false;
        self.key_frame = false;
    }

    /// Mark this buffer as an end-of-stream signal
    pub fn set_end_of_stream(&mut self) {
        self.data.clear();
        self.end_of_stream = true;
    }

    pub fn is_end_of_stream(&self) -> bool {
        self.end_of_stream
    }
}

/// Pull source of samples and format changes for one track segment
pub trait SampleStream: Send {
    /// Whether data is available to read right now
    fn is_ready(&self) -> bool;

    /// Propagate any error buffered by the upstream source, without
    /// blocking. Does nothing if no such error exists.
    fn poll_error(&mut self) -> Result<()>;

    /// Attempt to read the next format change or sample.
    ///
    /// Exactly one of the two slots is populated when the result is
    /// [`ReadResult::FormatChanged`] or [`ReadResult::BufferRead`]; neither
    /// is touched on [`ReadResult::NothingRead`]. Never blocks.
    fn read(&mut self, format: &mut FormatHolder, buffer: &mut SampleBuffer) -> ReadResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_buffer_clear_keeps_allocation() {
        let mut buffer = SampleBuffer::new();
        buffer.data.extend_from_slice(&[0u8; 256]);
        buffer.time_us = 42;
        buffer.key_frame = true;

        let cap = buffer.data.capacity();
        buffer.clear();

        assert!(buffer.data.is_empty());
        assert_eq!(buffer.data.capacity(), cap);
        assert_eq!(buffer.time_us, 0);
        assert!(!buffer.key_frame);
        assert!(!buffer.is_end_of_stream());
    }

    #[test]
    fn test_set_end_of_stream_drops_payload() {
        let mut buffer = SampleBuffer::new();
        buffer.data.extend_from_slice(&[1, 2, 3]);
        buffer.set_end_of_stream();

        assert!(buffer.is_end_of_stream());
        assert!(buffer.data.is_empty());
    }

    #[test]
    fn test_format_holder_clear() {
        let mut holder = FormatHolder::new();
        holder.format = Some(Format::audio("a", "audio/opus", 48_000, 2));
        holder.clear();
        assert!(holder.format.is_none());
    }
}
