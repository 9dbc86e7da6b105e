//! Lock-free sample queue
//!
//! A bounded single-producer single-consumer queue implementing
//! [`SampleStream`], for feeding a renderer from a background loader or
//! decoder thread. The producer half lives on the feeder thread; the stream
//! half is bound to a renderer and read from the render loop.
//!
//! Design:
//! - Lock-free ring buffer for the item path (no locks on the render loop)
//! - Overrun (producer found queue full) and underrun (reader found queue
//!   empty) counters with rate-limited logging
//! - A shared error slot: the feeder can park an upstream failure which the
//!   renderer surfaces through `poll_error` on its next loop iteration

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use ringbuf::{traits::*, HeapRb};
use tempo_common::{Error, Format, Result};
use tracing::{debug, trace, warn};

use super::{FormatHolder, ReadResult, SampleBuffer, SampleStream};

/// Default queue capacity in items
const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// One queued notification or access unit
#[derive(Debug)]
enum QueueItem {
    /// Format in effect for the samples that follow
    Format(Format),

    /// One timestamped access unit
    Sample {
        time_us: i64,
        key_frame: bool,
        data: Vec<u8>,
    },

    /// No more data in this segment
    EndOfStream,
}

/// Bounded SPSC sample queue
///
/// Split into producer and stream halves before use; each half can be moved
/// to a different thread.
pub struct SampleQueue {
    queue: HeapRb<QueueItem>,
    overruns: Arc<AtomicU64>,
    underruns: Arc<AtomicU64>,
    error: Arc<Mutex<Option<String>>>,
}

impl SampleQueue {
    /// Create a new queue with the given capacity in items
    pub fn new(capacity: Option<usize>) -> Self {
        let capacity = capacity.unwrap_or(DEFAULT_QUEUE_CAPACITY);
        debug!(capacity, "Creating sample queue");

        Self {
            queue: HeapRb::new(capacity),
            overruns: Arc::new(AtomicU64::new(0)),
            underruns: Arc::new(AtomicU64::new(0)),
            error: Arc::new(Mutex::new(None)),
        }
    }

    /// Split into producer and stream halves
    pub fn split(self) -> (SampleQueueProducer, SampleQueueStream) {
        let (prod, cons) = self.queue.split();

        let producer = SampleQueueProducer {
            producer: prod,
            overruns: Arc::clone(&self.overruns),
            error: Arc::clone(&self.error),
        };

        let stream = SampleQueueStream {
            consumer: cons,
            underruns: Arc::clone(&self.underruns),
            error: self.error,
        };

        (producer, stream)
    }
}

/// Producer half of the sample queue (feeder thread side)
pub struct SampleQueueProducer {
    producer: ringbuf::HeapProd<QueueItem>,
    overruns: Arc<AtomicU64>,
    error: Arc<Mutex<Option<String>>>,
}

impl SampleQueueProducer {
    /// Queue a format change taking effect for the samples that follow.
    ///
    /// Returns false if the queue was full (overrun).
    pub fn push_format(&mut self, format: Format) -> bool {
        self.push_item(QueueItem::Format(format))
    }

    /// Queue one timestamped access unit.
    ///
    /// Returns false if the queue was full (overrun); the feeder should back
    /// off and retry.
    pub fn push_sample(&mut self, time_us: i64, key_frame: bool, data: Vec<u8>) -> bool {
        self.push_item(QueueItem::Sample {
            time_us,
            key_frame,
            data,
        })
    }

    /// Queue the end-of-stream marker for this segment.
    ///
    /// Returns false if the queue was full (overrun).
    pub fn push_end_of_stream(&mut self) -> bool {
        self.push_item(QueueItem::EndOfStream)
    }

    /// Park an upstream failure for the reader to pick up via `poll_error`.
    ///
    /// The error is sticky: the reader keeps observing it on every poll.
    pub fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!(error = %message, "Upstream failure parked on sample queue");
        *lock_ignore_poison(&self.error) = Some(message);
    }

    /// Current queue fill level in items
    pub fn occupied_len(&self) -> usize {
        self.producer.occupied_len()
    }

    /// Queue capacity in items
    pub fn capacity(&self) -> usize {
        self.producer.capacity().into()
    }

    /// Total overruns observed so far
    pub fn overruns(&self) -> u64 {
        self.overruns.load(Ordering::Relaxed)
    }

    fn push_item(&mut self, item: QueueItem) -> bool {
        match self.producer.try_push(item) {
            Ok(()) => true,
            Err(_) => {
                let count = self.overruns.fetch_add(1, Ordering::Relaxed) + 1;
                if count % 1000 == 1 {
                    warn!(total = count, "Sample queue overrun");
                }
                false
            }
        }
    }
}

/// Stream half of the sample queue (render loop side)
///
/// Implements [`SampleStream`]; bind it to a renderer via
/// `RendererDriver::enable` or `replace_stream`.
pub struct SampleQueueStream {
    consumer: ringbuf::HeapCons<QueueItem>,
    underruns: Arc<AtomicU64>,
    error: Arc<Mutex<Option<String>>>,
}

impl SampleQueueStream {
    /// Total underruns observed so far
    pub fn underruns(&self) -> u64 {
        self.underruns.load(Ordering::Relaxed)
    }
}

impl SampleStream for SampleQueueStream {
    fn is_ready(&self) -> bool {
        !self.consumer.is_empty()
    }

    fn poll_error(&mut self) -> Result<()> {
        match lock_ignore_poison(&self.error).as_ref() {
            Some(message) => Err(Error::Stream(message.clone())),
            None => Ok(()),
        }
    }

    fn read(&mut self, format: &mut FormatHolder, buffer: &mut SampleBuffer) -> ReadResult {
        match self.consumer.try_pop() {
            Some(QueueItem::Format(f)) => {
                trace!(format_id = %f.id, "Format change read from queue");
                format.format = Some(f);
                ReadResult::FormatChanged
            }
            Some(QueueItem::Sample {
                time_us,
                key_frame,
                data,
            }) => {
                buffer.clear();
                buffer.time_us = time_us;
                buffer.key_frame = key_frame;
                buffer.data = data;
                ReadResult::BufferRead
            }
            Some(QueueItem::EndOfStream) => {
                buffer.clear();
                buffer.set_end_of_stream();
                ReadResult::BufferRead
            }
            None => {
                let count = self.underruns.fetch_add(1, Ordering::Relaxed) + 1;
                if count % 1000 == 1 {
                    trace!(total = count, "Sample queue empty on read");
                }
                ReadResult::NothingRead
            }
        }
    }
}

/// Lock a mutex, recovering the data if a panicking writer poisoned it.
fn lock_ignore_poison<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
