//! Renderer capability reporting
//!
//! Consumed by track/format selection logic (out of scope here) to decide
//! which renderer handles which track, and whether formats can be switched
//! on a live renderer without a disable/enable cycle.

use serde::{Deserialize, Serialize};
use tempo_common::{Format, TrackType};

/// How well a renderer can handle a given format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatSupport {
    /// The format is handled
    Handled,

    /// Right track type and container, but the profile/level/resolution
    /// exceeds what this renderer can do
    ExceedsCapabilities,

    /// Right track type but an unsupported sub-type (e.g. an audio
    /// renderer offered an unknown audio codec)
    UnsupportedSubtype,

    /// Wrong track type entirely
    UnsupportedType,
}

/// Level of support for switching between differing formats on one stream
/// without re-enabling the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdaptiveSupport {
    /// Switches are seamless
    Seamless,

    /// Switches work but may glitch at the transition
    NotSeamless,

    /// Adaptive switching is not supported
    NotSupported,
}

/// Capability query surface of a renderer
pub trait RendererCapabilities {
    /// The track type this renderer consumes
    fn track_type(&self) -> TrackType;

    /// Whether this renderer can handle the given format
    fn supports_format(&self, format: &Format) -> FormatSupport;

    /// Whether this renderer can adapt between differing MIME types on one
    /// stream without a disable/enable cycle
    fn supports_mixed_mime_adaptation(&self) -> AdaptiveSupport {
        AdaptiveSupport::NotSupported
    }
}
