//! Concrete renderer behavior interface
//!
//! The lifecycle state machine lives in [`super::driver::RendererDriver`];
//! concrete renderers implement [`RendererCore`] and get called back at
//! well-defined transition points. The driver guarantees *when* each hook
//! fires and what invariants hold on entry; the implementation decides
//! *what happens* (acquiring a decoder, flushing buffers, and so on).

use tempo_common::{Format, Result};

use crate::clock::MediaClock;

use super::capabilities::RendererCapabilities;
use super::driver::SourceReader;

/// Behavior of one concrete renderer (audio, video, text, metadata)
///
/// All hooks default to no-ops; implementations override selectively. Hook
/// failures surface as playback-fatal errors to the coordinating loop; the
/// driver does not roll back the state transition already applied.
pub trait RendererCore: RendererCapabilities + Send {
    /// Called when the renderer transitions `Disabled → Enabled`.
    ///
    /// `joining` is true when the renderer is attaching to playback already
    /// in progress. A typical implementation acquires its decoder here.
    fn on_enabled(&mut self, joining: bool) -> Result<()> {
        let _ = joining;
        Ok(())
    }

    /// Called when a stream (and its format set) is bound or replaced.
    fn on_stream_changed(&mut self, formats: &[Format]) -> Result<()> {
        let _ = formats;
        Ok(())
    }

    /// Called on enable and on every reposition while enabled or started.
    fn on_reset(&mut self, position_us: i64, joining: bool) -> Result<()> {
        let _ = (position_us, joining);
        Ok(())
    }

    /// Called when the renderer transitions `Enabled → Started`.
    fn on_started(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called when the renderer transitions `Started → Enabled`.
    fn on_stopped(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called when the renderer transitions `Enabled → Disabled`.
    ///
    /// The driver unbinds the stream after this hook returns, whether it
    /// succeeded or not.
    fn on_disabled(&mut self) -> Result<()> {
        Ok(())
    }

    /// One unit of work on the cooperative render loop.
    ///
    /// Must return promptly; when no progress is possible, return having
    /// done nothing rather than block. `position_us` and
    /// `elapsed_realtime_us` are both measured at the start of the current
    /// loop iteration.
    fn render(
        &mut self,
        source: &mut SourceReader<'_>,
        position_us: i64,
        elapsed_realtime_us: i64,
    ) -> Result<()>;

    /// Whether the renderer can render immediately from the current
    /// position.
    ///
    /// While `Started`, false tells the coordinating loop to pause global
    /// progress until this renderer is ready again. While `Enabled`, true
    /// means the renderer is primed and may be started.
    fn is_ready(&self, source: &SourceReader<'_>) -> bool;

    /// Whether the renderer has irreversibly finished all output for the
    /// current enabled span (final end-of-stream consumed and internal
    /// buffering flushed).
    fn is_ended(&self, source: &SourceReader<'_>) -> bool;

    /// The media clock this renderer advances, if any.
    ///
    /// At most one renderer per pipeline may return `Some`.
    fn media_clock(&self) -> Option<&dyn MediaClock> {
        None
    }
}
