//! Renderer lifecycle state machine and stream binding
//!
//! [`RendererDriver`] owns the lifecycle state, the pipeline index, and the
//! currently bound sample stream for one concrete renderer, and drives the
//! renderer's hooks at the legal transition points. The coordinating loop
//! calls the lifecycle operations and `render`; the concrete renderer pulls
//! data through the [`SourceReader`] view it is handed inside `render`.
//!
//! Timestamps read from a bound stream are rebased by the offset supplied at
//! bind time, so that chained segment streams present one monotonic timeline
//! downstream. End-of-stream from a stream that is not final is swallowed
//! and reported as "nothing read": the segment ended, a replacement stream
//! is coming, and only the final segment's end-of-stream is terminal.

use tempo_common::time::format_us;
use tempo_common::{Error, Format, Result, TrackType};
use tracing::{debug, trace};

use crate::clock::MediaClock;
use crate::stream::{FormatHolder, ReadResult, SampleBuffer, SampleStream};

use super::capabilities::{AdaptiveSupport, FormatSupport};
use super::core::RendererCore;
use super::state::RendererState;

/// Enable-time configuration for a renderer
#[derive(Debug, Clone)]
pub struct RendererConfiguration {
    /// The formats the renderer will be asked to handle
    pub formats: Vec<Format>,

    /// Starting playback position in microseconds
    pub position_us: i64,

    /// Whether the renderer is joining playback already in progress
    pub joining: bool,

    /// Offset added to timestamps read from the initial stream
    pub offset_us: i64,
}

/// The stream currently bound to a renderer
///
/// The offset and the read-to-end flag are meaningful only while a stream
/// is bound; both are reset on every bind/rebind.
struct StreamBinding {
    stream: Box<dyn SampleStream>,
    offset_us: i64,
    read_end_of_stream: bool,
}

/// Lifecycle state machine for one concrete renderer
///
/// Owns a boxed [`RendererCore`] and everything the core is not allowed to
/// touch directly: the lifecycle state, the bound stream, the stream offset,
/// and the end-of-stream/finality flags. Not designed for concurrent use;
/// the coordinating loop drives one operation at a time.
pub struct RendererDriver {
    index: usize,
    state: RendererState,
    core: Box<dyn RendererCore>,
    binding: Option<StreamBinding>,
    stream_is_final: bool,
}

impl RendererDriver {
    /// Wrap a concrete renderer. The pipeline index defaults to 0 until
    /// assigned by [`crate::Pipeline`].
    pub fn new(core: Box<dyn RendererCore>) -> Self {
        Self {
            index: 0,
            state: RendererState::Disabled,
            core,
            binding: None,
            stream_is_final: false,
        }
    }

    /// Assign the renderer's position within the pipeline. Immutable once
    /// the pipeline is assembled.
    pub(crate) fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    /// The renderer's position within the pipeline
    pub fn index(&self) -> usize {
        self.index
    }

    /// Current lifecycle state
    pub fn state(&self) -> RendererState {
        self.state
    }

    /// Enable the renderer to consume from the given stream.
    ///
    /// Legal only from `Disabled`. Moves to `Enabled`, fires `on_enabled`,
    /// binds the stream (firing `on_stream_changed`), then fires `on_reset`
    /// with the starting position. A hook failure propagates without
    /// rolling back the transition; the caller is expected to disable the
    /// renderer afterwards.
    pub fn enable(
        &mut self,
        config: RendererConfiguration,
        stream: Box<dyn SampleStream>,
    ) -> Result<()> {
        if self.state != RendererState::Disabled {
            return Err(Error::InvalidState(format!(
                "enable called on renderer {} in {} state",
                self.index, self.state
            )));
        }

        debug!(
            index = self.index,
            joining = config.joining,
            position = %format_us(config.position_us),
            offset = %format_us(config.offset_us),
            "Enabling renderer"
        );

        self.state = RendererState::Enabled;
        self.core.on_enabled(config.joining)?;
        self.replace_stream(&config.formats, stream, config.offset_us)?;
        self.core.on_reset(config.position_us, config.joining)?;
        Ok(())
    }

    /// Replace the bound stream without leaving the current state.
    ///
    /// This is how the pipeline advances to the next playlist item for a
    /// gapless join. Illegal once the current stream has been marked final:
    /// final means no more streams will follow before the next disable.
    pub fn replace_stream(
        &mut self,
        formats: &[Format],
        stream: Box<dyn SampleStream>,
        offset_us: i64,
    ) -> Result<()> {
        if self.stream_is_final {
            return Err(Error::InvalidState(format!(
                "replace_stream called on renderer {} after its stream was marked final",
                self.index
            )));
        }

        debug!(index = self.index, offset_us, format_count = formats.len(), "Binding sample stream");

        self.binding = Some(StreamBinding {
            stream,
            offset_us,
            read_end_of_stream: false,
        });
        self.core.on_stream_changed(formats)
    }

    /// Reposition without a disable/enable cycle.
    ///
    /// Legal while `Enabled` or `Started`. Clears the stream-final flag and
    /// fires `on_reset` with `joining = false`.
    pub fn reset(&mut self, position_us: i64) -> Result<()> {
        if self.state == RendererState::Disabled {
            return Err(Error::InvalidState(format!(
                "reset called on renderer {} in {} state",
                self.index, self.state
            )));
        }

        debug!(index = self.index, position = %format_us(position_us), "Resetting renderer");

        self.stream_is_final = false;
        self.core.on_reset(position_us, false)
    }

    /// Start the renderer. Legal only from `Enabled`.
    pub fn start(&mut self) -> Result<()> {
        if self.state != RendererState::Enabled {
            return Err(Error::InvalidState(format!(
                "start called on renderer {} in {} state",
                self.index, self.state
            )));
        }

        debug!(index = self.index, "Starting renderer");

        self.state = RendererState::Started;
        self.core.on_started()
    }

    /// Stop the renderer back to `Enabled`. Legal only from `Started`.
    pub fn stop(&mut self) -> Result<()> {
        if self.state != RendererState::Started {
            return Err(Error::InvalidState(format!(
                "stop called on renderer {} in {} state",
                self.index, self.state
            )));
        }

        debug!(index = self.index, "Stopping renderer");

        self.state = RendererState::Enabled;
        self.core.on_stopped()
    }

    /// Disable the renderer. Legal only from `Enabled`.
    ///
    /// The stream binding and the stream-final flag are cleared whether or
    /// not the `on_disabled` hook succeeds.
    pub fn disable(&mut self) -> Result<()> {
        if self.state != RendererState::Enabled {
            return Err(Error::InvalidState(format!(
                "disable called on renderer {} in {} state",
                self.index, self.state
            )));
        }

        debug!(index = self.index, "Disabling renderer");

        self.state = RendererState::Disabled;
        let hook_result = self.core.on_disabled();
        self.binding = None;
        self.stream_is_final = false;
        hook_result
    }

    /// Mark the bound stream as the last one that will be supplied before
    /// the next disable. Consumed by the read protocol: only a final
    /// stream's end-of-stream is reported downstream.
    pub fn set_stream_final(&mut self) {
        trace!(index = self.index, "Current sample stream marked final");
        self.stream_is_final = true;
    }

    /// Whether the bound stream has been marked final
    pub fn stream_is_final(&self) -> bool {
        self.stream_is_final
    }

    /// Whether the renderer has read the bound stream to its end.
    ///
    /// True when no stream is bound.
    pub fn has_read_stream_to_end(&self) -> bool {
        self.binding
            .as_ref()
            .map_or(true, |binding| binding.read_end_of_stream)
    }

    /// One iteration of the cooperative render loop.
    ///
    /// Legal while `Enabled` or `Started`; observable output is only
    /// expected while `Started`. Never blocks: when the source has nothing,
    /// the concrete renderer returns having done nothing.
    pub fn render(&mut self, position_us: i64, elapsed_realtime_us: i64) -> Result<()> {
        if self.state == RendererState::Disabled {
            return Err(Error::InvalidState(format!(
                "render called on renderer {} in {} state",
                self.index, self.state
            )));
        }

        let binding = self.binding.as_mut().ok_or_else(|| {
            Error::InvalidState(format!("render called on renderer {} with no stream bound", self.index))
        })?;

        let mut source = SourceReader {
            binding,
            stream_is_final: self.stream_is_final,
        };
        self.core.render(&mut source, position_us, elapsed_realtime_us)
    }

    /// Whether the renderer can render immediately from the current
    /// position. See [`RendererCore::is_ready`].
    pub fn is_ready(&mut self) -> bool {
        match self.binding.as_mut() {
            Some(binding) => {
                let source = SourceReader {
                    binding,
                    stream_is_final: self.stream_is_final,
                };
                self.core.is_ready(&source)
            }
            None => false,
        }
    }

    /// Whether the renderer has finished all output for the current
    /// enabled span. See [`RendererCore::is_ended`].
    pub fn is_ended(&mut self) -> bool {
        match self.binding.as_mut() {
            Some(binding) => {
                let source = SourceReader {
                    binding,
                    stream_is_final: self.stream_is_final,
                };
                self.core.is_ended(&source)
            }
            None => false,
        }
    }

    /// The media clock this renderer advances, if any
    pub fn media_clock(&self) -> Option<&dyn MediaClock> {
        self.core.media_clock()
    }

    /// The track type the wrapped renderer consumes
    pub fn track_type(&self) -> TrackType {
        self.core.track_type()
    }

    /// Capability query: can the wrapped renderer handle this format?
    pub fn supports_format(&self, format: &Format) -> FormatSupport {
        self.core.supports_format(format)
    }

    /// Capability query: adaptive-switch support level
    pub fn supports_mixed_mime_adaptation(&self) -> AdaptiveSupport {
        self.core.supports_mixed_mime_adaptation()
    }
}

/// Borrowed view of the bound stream, handed to the concrete renderer
///
/// The sole sanctioned way a renderer consumes media data. Reads are
/// rebased onto the unified timeline and end-of-stream handling is folded
/// in, so the renderer never needs to know which segment it is playing.
pub struct SourceReader<'a> {
    binding: &'a mut StreamBinding,
    stream_is_final: bool,
}

impl SourceReader<'_> {
    /// Attempt to read the next format change or sample from the stream.
    ///
    /// - A non-end-of-stream sample has its timestamp incremented by the
    ///   stream offset before being returned.
    /// - An end-of-stream sample sets the read-to-end flag. If the stream
    ///   is final it is reported as read so the renderer drains and
    ///   finishes; otherwise it is swallowed and reported as
    ///   [`ReadResult::NothingRead`]: wait for the replacement stream.
    pub fn read_source(&mut self, format: &mut FormatHolder, buffer: &mut SampleBuffer) -> ReadResult {
        let result = self.binding.stream.read(format, buffer);
        if result == ReadResult::BufferRead {
            if buffer.is_end_of_stream() {
                self.binding.read_end_of_stream = true;
                return if self.stream_is_final {
                    ReadResult::BufferRead
                } else {
                    ReadResult::NothingRead
                };
            }
            buffer.time_us += self.binding.offset_us;
        }
        result
    }

    /// Whether the source can supply more data.
    ///
    /// Once end-of-stream has been read this stays true only for a final
    /// stream: nothing more is coming, so the renderer should consider
    /// itself satisfied rather than stalling.
    pub fn is_source_ready(&self) -> bool {
        if self.binding.read_end_of_stream {
            self.stream_is_final
        } else {
            self.binding.stream.is_ready()
        }
    }

    /// Propagate any error buffered by the upstream stream, without
    /// blocking. Renderers should poll this before declaring themselves
    /// not-ready so upstream failures surface promptly.
    pub fn poll_source_error(&mut self) -> Result<()> {
        self.binding.stream.poll_error()
    }

    /// Offset currently applied to timestamps from this stream
    pub fn offset_us(&self) -> i64 {
        self.binding.offset_us
    }

    /// Whether this stream has been marked final
    pub fn stream_is_final(&self) -> bool {
        self.stream_is_final
    }

    /// Whether end-of-stream has been read from this stream
    pub fn has_read_to_end(&self) -> bool {
        self.binding.read_end_of_stream
    }
}
