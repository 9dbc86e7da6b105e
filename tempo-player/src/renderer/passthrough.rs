//! Pass-through renderer
//!
//! A concrete renderer that forwards rebased samples straight into a
//! [`SampleSink`] without decoding. Useful for metadata/text tracks, for
//! piping already-decoded data to an output stage, and as the reference
//! implementation of the pull-read protocol: it exercises `read_source`,
//! source readiness, error polling, end-of-stream draining, and the media
//! clock surface.

use tempo_common::{Format, Result, TrackType};
use tracing::{debug, trace};

use crate::clock::MediaClock;
use crate::stream::{FormatHolder, ReadResult, SampleBuffer};

use super::capabilities::{AdaptiveSupport, FormatSupport, RendererCapabilities};
use super::core::RendererCore;
use super::driver::SourceReader;

/// Downstream consumer of rendered samples
///
/// The renderer checks `has_capacity` before every read so it never pulls a
/// sample it cannot deliver; `is_drained` reports whether everything written
/// has been emitted, which gates the renderer's ended state.
pub trait SampleSink: Send {
    /// Whether the sink can accept another sample right now
    fn has_capacity(&self) -> bool;

    /// Deliver one sample (timestamp already on the unified timeline)
    fn write(&mut self, buffer: &SampleBuffer) -> Result<()>;

    /// Whether everything written has been emitted downstream
    fn is_drained(&self) -> bool;
}

/// Renderer that forwards samples to a sink without decoding
pub struct PassthroughRenderer {
    track_type: TrackType,
    sink: Box<dyn SampleSink>,
    format_holder: FormatHolder,
    buffer: SampleBuffer,
    enabled_formats: Vec<Format>,
    current_format: Option<Format>,
    position_us: i64,
    received_end_of_stream: bool,
    provides_clock: bool,
}

impl PassthroughRenderer {
    pub fn new(track_type: TrackType, sink: Box<dyn SampleSink>) -> Self {
        Self {
            track_type,
            sink,
            format_holder: FormatHolder::new(),
            buffer: SampleBuffer::new(),
            enabled_formats: Vec::new(),
            current_format: None,
            position_us: 0,
            received_end_of_stream: false,
            provides_clock: false,
        }
    }

    /// Advertise this renderer as the pipeline's media clock.
    ///
    /// The clock reports the timestamp of the last sample delivered to the
    /// sink. At most one renderer per pipeline may do this.
    pub fn with_media_clock(mut self) -> Self {
        self.provides_clock = true;
        self
    }

    /// Format currently in effect, if a format change has been read
    pub fn current_format(&self) -> Option<&Format> {
        self.current_format.as_ref()
    }
}

impl RendererCapabilities for PassthroughRenderer {
    fn track_type(&self) -> TrackType {
        self.track_type
    }

    fn supports_format(&self, format: &Format) -> FormatSupport {
        if format.track_type() == self.track_type {
            FormatSupport::Handled
        } else {
            FormatSupport::UnsupportedType
        }
    }

    fn supports_mixed_mime_adaptation(&self) -> AdaptiveSupport {
        // No decoder to reconfigure; a MIME switch is invisible here.
        AdaptiveSupport::Seamless
    }
}

impl RendererCore for PassthroughRenderer {
    fn on_stream_changed(&mut self, formats: &[Format]) -> Result<()> {
        debug!(
            track_type = %self.track_type,
            format_count = formats.len(),
            "Pass-through renderer stream changed"
        );
        self.enabled_formats = formats.to_vec();
        Ok(())
    }

    fn on_reset(&mut self, position_us: i64, joining: bool) -> Result<()> {
        trace!(track_type = %self.track_type, position_us, joining, "Pass-through renderer reset");
        self.buffer.clear();
        self.format_holder.clear();
        self.received_end_of_stream = false;
        self.position_us = position_us;
        Ok(())
    }

    fn on_disabled(&mut self) -> Result<()> {
        self.enabled_formats.clear();
        self.current_format = None;
        self.buffer.clear();
        self.format_holder.clear();
        self.received_end_of_stream = false;
        Ok(())
    }

    fn render(
        &mut self,
        source: &mut SourceReader<'_>,
        _position_us: i64,
        _elapsed_realtime_us: i64,
    ) -> Result<()> {
        if self.received_end_of_stream {
            return Ok(());
        }

        loop {
            if !self.sink.has_capacity() {
                return Ok(());
            }

            match source.read_source(&mut self.format_holder, &mut self.buffer) {
                ReadResult::FormatChanged => {
                    let format = self.format_holder.format.take();
                    if let Some(ref f) = format {
                        debug!(track_type = %self.track_type, format_id = %f.id, "Format changed");
                    }
                    self.current_format = format;
                }
                ReadResult::BufferRead => {
                    if self.buffer.is_end_of_stream() {
                        debug!(track_type = %self.track_type, "Final end of stream reached");
                        self.received_end_of_stream = true;
                        return Ok(());
                    }
                    self.sink.write(&self.buffer)?;
                    self.position_us = self.buffer.time_us;
                    self.buffer.clear();
                }
                ReadResult::NothingRead => {
                    source.poll_source_error()?;
                    return Ok(());
                }
            }
        }
    }

    fn is_ready(&self, source: &SourceReader<'_>) -> bool {
        source.is_source_ready()
    }

    fn is_ended(&self, _source: &SourceReader<'_>) -> bool {
        self.received_end_of_stream && self.sink.is_drained()
    }

    fn media_clock(&self) -> Option<&dyn MediaClock> {
        if self.provides_clock {
            Some(self)
        } else {
            None
        }
    }
}

impl MediaClock for PassthroughRenderer {
    fn position_us(&self) -> i64 {
        self.position_us
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::renderer::driver::{RendererConfiguration, RendererDriver};
    use crate::stream::SampleQueue;

    /// Test sink recording written samples, with an adjustable capacity gate
    struct RecordingSink {
        written: Arc<Mutex<Vec<(i64, Vec<u8>)>>>,
        capacity: usize,
    }

    impl SampleSink for RecordingSink {
        fn has_capacity(&self) -> bool {
            self.written.lock().unwrap().len() < self.capacity
        }

        fn write(&mut self, buffer: &SampleBuffer) -> Result<()> {
            self.written
                .lock()
                .unwrap()
                .push((buffer.time_us, buffer.data.clone()));
            Ok(())
        }

        fn is_drained(&self) -> bool {
            true
        }
    }

    fn audio_config(offset_us: i64) -> RendererConfiguration {
        RendererConfiguration {
            formats: vec![Format::audio("a", "audio/opus", 48_000, 2)],
            position_us: 0,
            joining: false,
            offset_us,
        }
    }

    fn recording_renderer(capacity: usize) -> (RendererDriver, Arc<Mutex<Vec<(i64, Vec<u8>)>>>) {
        let written = Arc::new(Mutex::new(Vec::new()));
        let sink = RecordingSink {
            written: Arc::clone(&written),
            capacity,
        };
        let renderer = PassthroughRenderer::new(TrackType::Audio, Box::new(sink)).with_media_clock();
        (RendererDriver::new(Box::new(renderer)), written)
    }

    #[test]
    fn test_drains_samples_with_rebased_timestamps() {
        let (mut driver, written) = recording_renderer(16);
        let (mut producer, stream) = SampleQueue::new(Some(16)).split();

        producer.push_format(Format::audio("a", "audio/opus", 48_000, 2));
        producer.push_sample(5_000, true, vec![1]);
        producer.push_sample(6_000, false, vec![2]);

        driver.enable(audio_config(1_000), Box::new(stream)).unwrap();
        driver.start().unwrap();
        driver.render(0, 0).unwrap();

        let written = written.lock().unwrap();
        assert_eq!(written.as_slice(), &[(6_000, vec![1]), (7_000, vec![2])]);
    }

    #[test]
    fn test_stops_pulling_when_sink_full() {
        let (mut driver, written) = recording_renderer(1);
        let (mut producer, stream) = SampleQueue::new(Some(16)).split();

        producer.push_sample(0, true, vec![1]);
        producer.push_sample(1_000, false, vec![2]);

        driver.enable(audio_config(0), Box::new(stream)).unwrap();
        driver.start().unwrap();
        driver.render(0, 0).unwrap();

        // Sink capacity is one sample; the second stays queued upstream.
        assert_eq!(written.lock().unwrap().len(), 1);
        driver.render(0, 0).unwrap();
        assert_eq!(written.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_ends_after_final_end_of_stream() {
        let (mut driver, _written) = recording_renderer(16);
        let (mut producer, stream) = SampleQueue::new(Some(16)).split();

        producer.push_sample(0, true, vec![1]);
        producer.push_end_of_stream();

        driver.enable(audio_config(0), Box::new(stream)).unwrap();
        driver.start().unwrap();
        assert!(!driver.is_ended());

        driver.set_stream_final();
        driver.render(0, 0).unwrap();

        assert!(driver.is_ended());
        assert!(driver.has_read_stream_to_end());
        // Ready stays true: the renderer is satisfied, not stalled.
        assert!(driver.is_ready());
    }

    #[test]
    fn test_media_clock_tracks_last_emitted_sample() {
        let (mut driver, _written) = recording_renderer(16);
        let (mut producer, stream) = SampleQueue::new(Some(16)).split();

        producer.push_sample(2_500, true, vec![1]);

        driver.enable(audio_config(500), Box::new(stream)).unwrap();
        driver.start().unwrap();
        driver.render(0, 0).unwrap();

        let clock = driver.media_clock().expect("renderer advertises a clock");
        assert_eq!(clock.position_us(), 3_000);
    }

    #[test]
    fn test_upstream_error_surfaces_from_render() {
        let (mut driver, _written) = recording_renderer(16);
        let (mut producer, stream) = SampleQueue::new(Some(16)).split();

        driver.enable(audio_config(0), Box::new(stream)).unwrap();
        driver.start().unwrap();
        driver.render(0, 0).unwrap();

        producer.fail("segment fetch failed");
        let err = driver.render(0, 0).unwrap_err();
        assert!(matches!(err, crate::Error::Stream(_)));
    }

    #[test]
    fn test_capabilities_and_clock_opt_in() {
        let written = Arc::new(Mutex::new(Vec::new()));
        let sink = RecordingSink {
            written,
            capacity: 16,
        };
        let renderer = PassthroughRenderer::new(TrackType::Audio, Box::new(sink));
        assert_eq!(
            renderer.supports_format(&Format::video("v", "video/avc", 640, 480)),
            FormatSupport::UnsupportedType
        );
        assert_eq!(renderer.supports_mixed_mime_adaptation(), AdaptiveSupport::Seamless);

        let mut driver = RendererDriver::new(Box::new(renderer));
        let (mut producer, stream) = SampleQueue::new(Some(16)).split();
        producer.push_format(Format::audio("a2", "audio/flac", 44_100, 2));

        driver.enable(audio_config(0), Box::new(stream)).unwrap();
        driver.render(0, 0).unwrap();
        // No clock advertised on this one.
        assert!(driver.media_clock().is_none());
    }
}
