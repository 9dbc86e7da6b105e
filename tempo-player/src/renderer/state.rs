//! Renderer lifecycle states

use serde::{Deserialize, Serialize};

/// Lifecycle state of a renderer
///
/// The only legal transitions are
/// `Disabled → Enabled → Started → Enabled → Disabled`; the driver rejects
/// everything else as a contract violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererState {
    /// Initial state; no stream bound, no resources held
    Disabled,

    /// Enabled but not started. A renderer in this state typically holds
    /// the resources it needs for rendering (e.g. a decoder) and has a
    /// stream bound.
    Enabled,

    /// Started; calls to `render` are expected to produce output
    Started,
}

impl std::fmt::Display for RendererState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RendererState::Disabled => write!(f, "disabled"),
            RendererState::Enabled => write!(f, "enabled"),
            RendererState::Started => write!(f, "started"),
        }
    }
}
