//! Media clock boundary
//!
//! A renderer that advances its own playback position (typically the audio
//! renderer, whose position is dictated by the output device) can expose a
//! [`MediaClock`]. The coordinating loop uses it as the source of time for
//! the whole pipeline; at most one renderer per pipeline may provide one,
//! enforced by [`crate::Pipeline`].

/// Source of the current playback position
pub trait MediaClock {
    /// Current playback position on the unified timeline, in microseconds
    fn position_us(&self) -> i64;
}
