//! # Tempo Player Core (tempo-player)
//!
//! Playback-pipeline core: the renderer lifecycle state machine and the
//! pull-based sample-stream protocol that concrete renderers (audio, video,
//! text, metadata) are driven through.
//!
//! **Architecture:** a coordinating loop (out of scope here) owns a
//! [`Pipeline`] of [`renderer::RendererDriver`]s and drives each through
//! enable → start → stop → disable, calling `render` repeatedly on a
//! cooperative loop. Inside `render`, the concrete renderer pulls
//! timestamped samples from its bound [`stream::SampleStream`] through a
//! [`renderer::SourceReader`], which rebases every timestamp onto the
//! unified playback timeline and folds multi-segment end-of-stream
//! handling into a single three-way read result.

pub mod clock;
pub mod pipeline;
pub mod renderer;
pub mod stream;

pub use tempo_common::{DrmInitData, Error, Format, Result, TrackType};

pub use clock::MediaClock;
pub use pipeline::Pipeline;
pub use renderer::{
    AdaptiveSupport, FormatSupport, RendererConfiguration, RendererCore, RendererDriver,
    RendererState, SourceReader,
};
pub use stream::{FormatHolder, ReadResult, SampleBuffer, SampleStream};
